use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::{digits_in, Diagnostics};
use crate::parser::dom::DomNode;
use crate::record::RawRecord;

static SOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)recently sold").unwrap());
static FOR_SALE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)for sale").unwrap());

/// Recently-sold count and the for-sale price summary. The price is kept as
/// raw text under `raw`.
pub fn extract<N: DomNode>(root: N, record: &mut RawRecord, diag: &mut Diagnostics) {
    if let Some(hit) = root.find_text(|t| SOLD_RE.is_match(t)) {
        match digits_in(hit.text.trim()) {
            Some(Ok(count)) => {
                let mut block = Map::new();
                block.insert("count".into(), Value::from(count));
                record.recently_sold = Some(block);
            }
            Some(Err(e)) => diag.note("activity", e),
            None => {}
        }
    }

    if let Some(hit) = root.find_text(|t| FOR_SALE_RE.is_match(t)) {
        let mut block = Map::new();
        block.insert("raw".into(), Value::String(hit.text.trim().to_string()));
        record.for_sale_price = Some(block);
    }
}
