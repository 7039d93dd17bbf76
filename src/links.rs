use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::Selector;
use url::Url;

use crate::parser::dom::{css, DomNode, Page};

/// Path fragments that mark an agent profile URL.
const PROFILE_MARKERS: &[&str] = &["realestateagents", "/agents/"];

static PROFILE_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| css("a[href*='realestateagents'], a[href*='/agents/']"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    Profile,
    Listing,
}

pub fn classify(url: &str) -> SeedKind {
    if looks_like_profile(url) {
        SeedKind::Profile
    } else {
        SeedKind::Listing
    }
}

fn looks_like_profile(url: &str) -> bool {
    let lower = url.to_lowercase();
    let path = match Url::parse(&lower) {
        Ok(parsed) => parsed.path().to_string(),
        // Relative or scheme-less: everything before the query is the path.
        Err(_) => lower
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    PROFILE_MARKERS.iter().any(|marker| path.contains(marker))
}

/// Distinct profile links on a listing page, absolute against `base`, in
/// first-seen order.
pub fn collect_profile_links<N: DomNode>(root: N, base: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in root.select_all(&PROFILE_LINK_SEL) {
        let Some(href) = anchor.attr("href").filter(|h| !h.is_empty()) else {
            continue;
        };
        let Ok(full) = base.join(&href) else {
            continue;
        };
        let full = full.to_string();
        if seen.insert(full.clone()) {
            links.push(full);
        }
    }

    links
}

/// Parse a listing document and collect its profile links.
pub fn profile_links_in(html: &str, base: &Url) -> Vec<String> {
    let page = Page::parse(html);
    collect_profile_links(page.root(), base)
}
