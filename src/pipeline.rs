use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};
use url::Url;

use crate::fetcher::Fetch;
use crate::links::{self, SeedKind};
use crate::parser;
use crate::record::RawRecord;

/// Counters reported after a run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScrapeStats {
    pub seeds: usize,
    pub fetch_failures: usize,
    pub empty_profiles: usize,
}

pub struct Harvest {
    pub records: Vec<RawRecord>,
    pub stats: ScrapeStats,
}

/// Sequential driver: one location is fetched and extracted before the next.
pub struct Pipeline<F> {
    fetcher: F,
    base_url: Url,
    full_details: bool,
}

impl<F: Fetch> Pipeline<F> {
    pub fn new(fetcher: F, base_url: Url, full_details: bool) -> Self {
        Pipeline {
            fetcher,
            base_url,
            full_details,
        }
    }

    /// Walk the seeds in order until `limit` raw records are collected.
    pub async fn run(&self, seeds: &[String], limit: Option<usize>) -> Harvest {
        let mut records = Vec::new();
        let mut stats = ScrapeStats::default();
        let reached = |n: usize| limit.is_some_and(|max| n >= max);

        let pb = ProgressBar::new(seeds.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("=> "));
        }

        for seed in seeds {
            if reached(records.len()) {
                debug!("Limit reached, {} seeds left unvisited", seeds.len() - stats.seeds);
                break;
            }
            stats.seeds += 1;
            pb.set_message(format!("{} agents", records.len()));

            let Some(url) = self.resolve(seed) else {
                warn!("Skipping unusable seed location {:?}", seed);
                pb.inc(1);
                continue;
            };

            match links::classify(&url) {
                SeedKind::Profile => {
                    if let Some(record) = self.scrape_profile(&url, &mut stats).await {
                        records.push(record);
                    }
                }
                SeedKind::Listing => {
                    let Some(profile_urls) = self.listing_links(&url, &mut stats).await else {
                        pb.inc(1);
                        continue;
                    };
                    info!("Found {} agent links on {}", profile_urls.len(), url);
                    for profile_url in &profile_urls {
                        if reached(records.len()) {
                            break;
                        }
                        if let Some(record) = self.scrape_profile(profile_url, &mut stats).await {
                            records.push(record);
                        }
                    }
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        info!(
            "Collected {} agents from {} seeds ({} fetch failures, {} empty profiles)",
            records.len(),
            stats.seeds,
            stats.fetch_failures,
            stats.empty_profiles
        );

        Harvest { records, stats }
    }

    /// Fetch a listing page and collect its profile links.
    pub async fn listing_links(&self, url: &str, stats: &mut ScrapeStats) -> Option<Vec<String>> {
        let Some(html) = self.fetcher.fetch(url).await else {
            stats.fetch_failures += 1;
            return None;
        };
        Some(links::profile_links_in(&html, &self.base_url))
    }

    async fn scrape_profile(&self, url: &str, stats: &mut ScrapeStats) -> Option<RawRecord> {
        let Some(html) = self.fetcher.fetch(url).await else {
            stats.fetch_failures += 1;
            return None;
        };

        let extraction = parser::process_page(&html, url, self.full_details);
        if !extraction.diagnostics.is_empty() {
            debug!("{} heuristics misfired on {}", extraction.diagnostics.notes().len(), url);
            for note in extraction.diagnostics.notes() {
                debug!("  [{}] {}", note.stage, note.message);
            }
        }

        if !extraction.record.has_data() {
            warn!("Parsed empty agent profile from {}", url);
            stats.empty_profiles += 1;
            return None;
        }
        Some(extraction.record)
    }

    /// Absolute location for a seed; relative seeds hang off the base URL.
    pub fn resolve(&self, seed: &str) -> Option<String> {
        self.base_url.join(seed).ok().map(String::from)
    }
}
