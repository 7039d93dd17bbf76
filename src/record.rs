use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// A loosely-typed value as it comes off a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Zero and empty text count as "nothing there".
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Int(n) => *n != 0,
            Scalar::Float(f) => *f != 0.0,
            Scalar::Text(s) => !s.is_empty(),
        }
    }

    /// `null` has no scalar form; arrays and objects keep their JSON text.
    pub fn from_json(value: &Value) -> Option<Scalar> {
        match value {
            Value::Null => None,
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Scalar::Int(i)),
                None => n.as_f64().map(Scalar::Float),
            },
            Value::String(s) => Some(Scalar::Text(s.clone())),
            other => Some(Scalar::Text(other.to_string())),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

// ── Raw extraction output ──

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPhone {
    pub number: Option<Scalar>,
    pub kind: Option<String>,
    pub ext: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAddress {
    pub line: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub raw: Option<String>,
}

impl RawAddress {
    pub fn raw(text: impl Into<String>) -> Self {
        RawAddress {
            raw: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.postal_code.is_none()
            && self.raw.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOffice {
    pub name: Option<String>,
    pub website: Option<String>,
    pub raw_address: Option<String>,
    /// A structured address, when a source provides one, wins over `raw_address`.
    pub address: Option<RawAddress>,
}

impl RawOffice {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.website.is_none()
            && self.raw_address.is_none()
            && self.address.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawReview {
    pub rating: Option<Scalar>,
    pub comment: Option<String>,
}

/// Everything the extractor managed to pull out of one profile page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub web_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub experience: Option<String>,
    pub advertiser_id: Option<String>,
    pub first_year: Option<Scalar>,
    pub review_count: Option<Scalar>,
    pub agent_rating: Option<Scalar>,
    pub phones: Vec<RawPhone>,
    pub address: Option<RawAddress>,
    pub office: Option<RawOffice>,
    pub specializations: Vec<Scalar>,
    pub broker: Option<Map<String, Value>>,
    pub recently_sold: Option<Map<String, Value>>,
    pub for_sale_price: Option<Map<String, Value>>,
    pub reviews: Vec<RawReview>,
    /// Passed through as-is; non-object entries are discarded when cleaning.
    pub recommendations: Vec<Value>,
}

impl RawRecord {
    /// True when at least one field carries a truthy value.
    pub fn has_data(&self) -> bool {
        let text = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        let scalar = |v: &Option<Scalar>| v.as_ref().is_some_and(Scalar::is_truthy);
        let map = |v: &Option<Map<String, Value>>| v.as_ref().is_some_and(|m| !m.is_empty());

        text(&self.web_url)
            || text(&self.title)
            || text(&self.description)
            || text(&self.photo)
            || text(&self.experience)
            || text(&self.advertiser_id)
            || scalar(&self.first_year)
            || scalar(&self.review_count)
            || scalar(&self.agent_rating)
            || !self.phones.is_empty()
            || self.address.as_ref().is_some_and(|a| !a.is_empty())
            || self.office.as_ref().is_some_and(|o| !o.is_empty())
            || !self.specializations.is_empty()
            || map(&self.broker)
            || map(&self.recently_sold)
            || map(&self.for_sale_price)
            || !self.reviews.is_empty()
            || !self.recommendations.is_empty()
    }
}

// ── Cleaned, export-ready output ──

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Phone {
    pub number: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        *self == Address::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Office {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Office {
    pub fn is_empty(&self) -> bool {
        *self == Office::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A normalized agent profile. Every present field is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanedRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertiser_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_rating: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<Phone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<Office>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub specializations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broker: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recently_sold: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub for_sale_price: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<Map<String, Value>>,
}

impl CleanedRecord {
    pub fn is_empty(&self) -> bool {
        *self == CleanedRecord::default()
    }
}
