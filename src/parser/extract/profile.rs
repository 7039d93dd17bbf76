use std::sync::LazyLock;

use scraper::Selector;

use super::Diagnostics;
use crate::parser::dom::{css, join_fragments, DomNode};
use crate::record::{RawPhone, RawRecord, Scalar};

static NAME_SEL: LazyLock<Selector> = LazyLock::new(|| css("h1"));
static BIO_SEL: LazyLock<Selector> =
    LazyLock::new(|| css("[data-testid='agent-description'], .agent-description, .bio"));
static PHOTO_SEL: LazyLock<Selector> =
    LazyLock::new(|| css("img[src*='ap.rdcpix.com'], img[alt*='agent photo']"));
static PHONE_SEL: LazyLock<Selector> =
    LazyLock::new(|| css("[data-testid='phone'], .agent-phone, a[href^='tel:']"));

const EXPERIENCE_MARKER: &str = "Years in Business";

/// Checked in order; the first label found in the phone text wins.
const PHONE_KINDS: &[(&str, &str)] = &[("mobile", "Mobile"), ("office", "Office"), ("fax", "Fax")];

const STAGE: &str = "profile";

/// Name, bio, photo, experience and phone numbers.
pub fn extract<N: DomNode>(root: N, record: &mut RawRecord, diag: &mut Diagnostics) {
    if let Some(name) = root.select_first(&NAME_SEL) {
        record.title = Some(name.text_content());
    }

    if let Some(bio) = root.select_first(&BIO_SEL) {
        record.description = Some(join_fragments(bio.text_content().split_whitespace()));
    }

    if let Some(img) = root.select_first(&PHOTO_SEL) {
        match img.attr("src").filter(|src| !src.is_empty()) {
            Some(src) => record.photo = Some(src),
            None => diag.note(STAGE, "profile photo element has no src"),
        }
    }

    if let Some(hit) = root.find_text(|t| t.contains(EXPERIENCE_MARKER)) {
        match hit.parent {
            Some(parent) => record.experience = Some(parent.text_content()),
            None => diag.note(STAGE, "experience marker has no enclosing element"),
        }
    }

    let phones: Vec<RawPhone> = root
        .select_all(&PHONE_SEL)
        .into_iter()
        .map(|node| {
            let text = node.text_content();
            RawPhone {
                kind: phone_kind(&text).map(String::from),
                number: Some(Scalar::Text(text)),
                ext: None,
            }
        })
        .collect();
    if !phones.is_empty() {
        record.phones = phones;
    }
}

fn phone_kind(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    PHONE_KINDS
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, label)| *label)
}
