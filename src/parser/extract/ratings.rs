use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;

use super::{digits_in, leading_float, Diagnostics};
use crate::parser::dom::{css, DomNode};
use crate::record::{RawRecord, Scalar};

static RATING_SEL: LazyLock<Selector> =
    LazyLock::new(|| css("[data-testid='rating'], .rating-value, .review-rating"));
static REVIEW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)review").unwrap());

const STAGE: &str = "ratings";

/// Aggregate rating and review count.
pub fn extract<N: DomNode>(root: N, record: &mut RawRecord, diag: &mut Diagnostics) {
    if let Some(el) = root.select_first(&RATING_SEL) {
        match leading_float(&el.text_content()) {
            Ok(rating) => record.agent_rating = Some(Scalar::Float(rating)),
            Err(e) => diag.note(STAGE, e),
        }
    }

    if let Some(hit) = root.find_text(|t| REVIEW_RE.is_match(t)) {
        match digits_in(hit.text.trim()) {
            Some(Ok(count)) => record.review_count = Some(Scalar::Int(count)),
            Some(Err(e)) => diag.note(STAGE, e),
            None => {}
        }
    }
}
