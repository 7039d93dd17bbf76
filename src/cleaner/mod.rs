pub mod coerce;

use rayon::prelude::*;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::record::{
    Address, CleanedRecord, Office, Phone, RawAddress, RawOffice, RawPhone, RawRecord, RawReview,
    Review, Scalar,
};
use coerce::{collapse_whitespace, to_float, to_integer};

const MAX_COMMENT_CHARS: usize = 2000;

/// Clean every raw record, keeping input order and dropping records that
/// end up with nothing usable.
pub fn clean_records(raw: &[RawRecord]) -> Vec<CleanedRecord> {
    let cleaned: Vec<CleanedRecord> = raw.par_iter().map(clean_record).collect();

    cleaned
        .into_iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            if record.is_empty() {
                warn!("Skipping empty cleaned agent at index {}", idx);
                None
            } else {
                Some(record)
            }
        })
        .collect()
}

/// Normalize one record. Each field group is independent: a missing or
/// unusable group is skipped without affecting the others.
pub fn clean_record(raw: &RawRecord) -> CleanedRecord {
    let record = CleanedRecord {
        description: clean_text(raw.description.as_deref()),
        experience: clean_text(raw.experience.as_deref()),
        web_url: clean_text(raw.web_url.as_deref()),
        title: clean_text(raw.title.as_deref()),
        photo: clean_text(raw.photo.as_deref()),
        advertiser_id: clean_text(raw.advertiser_id.as_deref()),
        // A zero first_year is as good as missing; a zero review_count is real.
        first_year: raw
            .first_year
            .as_ref()
            .and_then(to_integer)
            .filter(|year| *year != 0),
        review_count: raw.review_count.as_ref().and_then(to_integer),
        agent_rating: raw.agent_rating.as_ref().and_then(to_float),
        phones: dedupe(raw.phones.iter().filter_map(clean_phone).collect()),
        address: raw
            .address
            .as_ref()
            .map(clean_address)
            .filter(|a| !a.is_empty()),
        office: raw
            .office
            .as_ref()
            .map(clean_office)
            .filter(|o| !o.is_empty()),
        specializations: clean_specializations(&raw.specializations),
        broker: raw
            .broker
            .as_ref()
            .map(clean_broker)
            .filter(|b| !b.is_empty()),
        recently_sold: raw
            .recently_sold
            .as_ref()
            .map(|block| coerce_activity(block, &["count"]))
            .filter(|b| !b.is_empty()),
        for_sale_price: raw
            .for_sale_price
            .as_ref()
            .map(|block| coerce_activity(block, &["min", "max", "count"]))
            .filter(|b| !b.is_empty()),
        reviews: raw.reviews.iter().filter_map(clean_review).collect(),
        recommendations: raw
            .recommendations
            .iter()
            .filter_map(|rec| rec.as_object().cloned())
            .collect(),
    };

    debug!(
        url = record.web_url.as_deref().unwrap_or(""),
        phones = record.phones.len(),
        reviews = record.reviews.len(),
        "Cleaned agent record"
    );
    record
}

fn clean_text(value: Option<&str>) -> Option<String> {
    value
        .filter(|s| !s.is_empty())
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty())
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Keep the first occurrence of each item.
fn dedupe<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

fn clean_phone(phone: &RawPhone) -> Option<Phone> {
    let original = phone.number.as_ref()?.to_string();
    let original = original.trim();
    if original.is_empty() {
        return None;
    }

    let digits: String = original
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    let number = if digits.is_empty() {
        original.to_string()
    } else {
        digits
    };

    let ext = phone
        .ext
        .as_ref()
        .filter(|e| e.is_truthy())
        .map(|e| e.to_string().trim().to_string())
        .filter(|e| !e.is_empty());

    Some(Phone {
        number,
        kind: trimmed(phone.kind.as_deref()),
        ext,
    })
}

fn clean_address(address: &RawAddress) -> Address {
    let field = |v: &Option<String>| clean_text(v.as_deref());
    Address {
        line: field(&address.line),
        city: field(&address.city),
        state: field(&address.state),
        postal_code: field(&address.postal_code),
        raw: field(&address.raw),
    }
}

fn clean_office(office: &RawOffice) -> Office {
    let from_raw = clean_text(office.raw_address.as_deref()).map(|raw| Address {
        raw: Some(raw),
        ..Default::default()
    });
    let structured = office
        .address
        .as_ref()
        .map(clean_address)
        .filter(|a| !a.is_empty());

    Office {
        name: trimmed(office.name.as_deref()),
        website: trimmed(office.website.as_deref()),
        address: structured.or(from_raw),
    }
}

fn clean_specializations(specs: &[Scalar]) -> Vec<String> {
    dedupe(
        specs
            .iter()
            .map(|s| s.to_string().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

fn clean_broker(broker: &Map<String, Value>) -> Map<String, Value> {
    broker
        .iter()
        .filter(|(_, v)| is_truthy(v))
        .filter_map(|(k, v)| {
            let text = collapse_whitespace(&stringify(v));
            (!text.is_empty()).then(|| (k.clone(), Value::String(text)))
        })
        .collect()
}

/// Copy the block, rewriting the named numeric keys in place. A key that is
/// present but holds no digits becomes `null` rather than disappearing.
fn coerce_activity(block: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    let mut out = block.clone();
    for key in keys {
        if let Some(value) = out.get_mut(*key) {
            *value = Scalar::from_json(value)
                .as_ref()
                .and_then(to_integer)
                .map_or(Value::Null, Value::from);
        }
    }
    out
}

fn clean_review(review: &RawReview) -> Option<Review> {
    let rating = review.rating.as_ref().and_then(to_float);
    let comment = review
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(truncate_comment);

    if rating.is_none() && comment.is_none() {
        return None;
    }
    Some(Review { rating, comment })
}

fn truncate_comment(text: &str) -> String {
    if text.chars().count() <= MAX_COMMENT_CHARS {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(MAX_COMMENT_CHARS).collect();
        format!("{}...", truncated)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
