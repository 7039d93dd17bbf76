mod cleaner;
mod export;
mod fetcher;
mod links;
mod parser;
mod pipeline;
mod record;
mod seeds;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;

use fetcher::HttpFetcher;
use links::SeedKind;
use pipeline::{Pipeline, ScrapeStats};

#[derive(Parser)]
#[command(name = "agent_scraper", about = "Realtor.com agent profile scraper")]
struct Cli {
    /// JSON settings file
    #[arg(long, global = true, default_value = "config/settings.example.json")]
    settings: PathBuf,
    /// Debug logging (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape seed locations, clean the agents and export them
    Run {
        /// Seed file (default: input_file from settings)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output directory (default: output_dir from settings)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Comma-separated export formats, e.g. json,csv,xml
        #[arg(long)]
        formats: Option<String>,
        /// Max agents to collect across all seeds
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Also collect specialties and individual reviews
        #[arg(long)]
        full: bool,
    },
    /// Classify seed locations and list the agent links on listing pages
    Links {
        /// Seed file (default: input_file from settings)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let t0 = Instant::now();
    let settings = settings::load(&cli.settings)?;
    let base_url = settings.base_url()?;
    let fetcher = HttpFetcher::new(settings.retry_policy())?;

    let result = match cli.command {
        Commands::Run {
            input,
            output_dir,
            formats,
            limit,
            full,
        } => {
            let input = input.unwrap_or_else(|| settings.input_file.clone());
            let seeds = seeds::load_seed_urls(&input)?;
            if seeds.is_empty() {
                println!("No seed URLs in {}.", input.display());
                return Ok(());
            }

            let full = full || settings.full_agent_details;
            println!(
                "Scraping {} seed locations{}...",
                seeds.len(),
                if full { " (full details)" } else { "" }
            );
            let t_scrape = Instant::now();
            let pipeline = Pipeline::new(fetcher, base_url, full);
            let harvest = pipeline.run(&seeds, limit).await;
            println!(
                "Collected {} agents ({} fetch failures) in {:.1}s",
                harvest.records.len(),
                harvest.stats.fetch_failures,
                t_scrape.elapsed().as_secs_f64()
            );

            if harvest.records.is_empty() {
                warn!("No agents were collected; nothing to export");
                return Ok(());
            }

            let cleaned = cleaner::clean_records(&harvest.records);
            let formats = match formats {
                Some(list) => settings::parse_format_list(&list),
                None => settings.export_formats(),
            };
            let output_dir = output_dir.unwrap_or_else(|| settings.output_dir.clone());
            let written = export::export_all(&cleaned, &output_dir, &formats)
                .context("Export failed")?;

            println!("Exported {} agents:", cleaned.len());
            for (format, path) in &written {
                println!("  {:<5} {}", format, path.display());
            }
            Ok(())
        }
        Commands::Links { input } => {
            let input = input.unwrap_or_else(|| settings.input_file.clone());
            let seeds = seeds::load_seed_urls(&input)?;
            let pipeline = Pipeline::new(fetcher, base_url, settings.full_agent_details);
            let mut stats = ScrapeStats::default();

            for seed in &seeds {
                let Some(url) = pipeline.resolve(seed) else {
                    println!("invalid  {}", seed);
                    continue;
                };
                match links::classify(&url) {
                    SeedKind::Profile => println!("profile  {}", url),
                    SeedKind::Listing => {
                        println!("listing  {}", url);
                        match pipeline.listing_links(&url, &mut stats).await {
                            Some(found) => {
                                for link in &found {
                                    println!("  -> {}", link);
                                }
                                println!("  ({} agent links)", found.len());
                            }
                            None => println!("  (fetch failed)"),
                        }
                    }
                }
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
