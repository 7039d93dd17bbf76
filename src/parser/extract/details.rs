use std::sync::LazyLock;

use scraper::Selector;

use super::{leading_float, Diagnostics};
use crate::parser::dom::{css, DomNode};
use crate::record::{RawRecord, RawReview, Scalar};

static SPECIALTY_SEL: LazyLock<Selector> =
    LazyLock::new(|| css("[data-testid='specialties'] li, .specialties li"));
static REVIEW_CARD_SEL: LazyLock<Selector> =
    LazyLock::new(|| css("[data-testid='review'], .review-card"));
static CARD_RATING_SEL: LazyLock<Selector> =
    LazyLock::new(|| css(".rating, [data-testid='rating']"));
static CARD_COMMENT_SEL: LazyLock<Selector> =
    LazyLock::new(|| css("p, .comment, .review-text"));

const STAGE: &str = "details";

/// Specialties list and individual review cards.
pub fn extract<N: DomNode>(root: N, record: &mut RawRecord, diag: &mut Diagnostics) {
    let specs: Vec<Scalar> = root
        .select_all(&SPECIALTY_SEL)
        .into_iter()
        .map(|li| li.text_content())
        .filter(|text| !text.is_empty())
        .map(Scalar::Text)
        .collect();
    if !specs.is_empty() {
        record.specializations = specs;
    }

    let reviews: Vec<RawReview> = root
        .select_all(&REVIEW_CARD_SEL)
        .into_iter()
        .map(|card| {
            let rating = card
                .select_first(&CARD_RATING_SEL)
                .and_then(|el| match leading_float(&el.text_content()) {
                    Ok(value) => Some(Scalar::Float(value)),
                    Err(e) => {
                        diag.note(STAGE, e);
                        None
                    }
                });
            let comment = card
                .select_first(&CARD_COMMENT_SEL)
                .map(|el| el.text_content());
            RawReview { rating, comment }
        })
        .collect();
    if !reviews.is_empty() {
        record.reviews = reviews;
    }
}
