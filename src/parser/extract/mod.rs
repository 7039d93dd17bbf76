pub mod activity;
pub mod details;
pub mod office;
pub mod profile;
pub mod ratings;

use super::dom::DomNode;
use crate::record::RawRecord;

/// A heuristic that matched something it could not use.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub stage: &'static str,
    pub message: String,
}

/// Notes gathered while extracting one profile. Stages push here instead of
/// failing, so one bad field never costs the fields around it.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    notes: Vec<Note>,
}

impl Diagnostics {
    pub fn note(&mut self, stage: &'static str, message: impl Into<String>) {
        self.notes.push(Note {
            stage,
            message: message.into(),
        });
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

pub struct Extraction {
    pub record: RawRecord,
    pub diagnostics: Diagnostics,
}

/// Run every stage over one profile page. `full_details` adds the
/// specialties and individual reviews.
pub fn extract_all<N: DomNode>(root: N, url: &str, full_details: bool) -> Extraction {
    let mut record = RawRecord {
        web_url: Some(url.to_string()),
        ..Default::default()
    };
    let mut diagnostics = Diagnostics::default();

    profile::extract(root, &mut record, &mut diagnostics);
    office::extract(root, &mut record, &mut diagnostics);
    ratings::extract(root, &mut record, &mut diagnostics);
    activity::extract(root, &mut record, &mut diagnostics);
    if full_details {
        details::extract(root, &mut record, &mut diagnostics);
    }

    Extraction {
        record,
        diagnostics,
    }
}

/// First whitespace-delimited token as a finite float.
pub(crate) fn leading_float(text: &str) -> Result<f64, String> {
    let token = text
        .split_whitespace()
        .next()
        .ok_or_else(|| "empty rating text".to_string())?;
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(format!("rating token {:?} is not a number", token)),
    }
}

/// Every ASCII digit in `text`, parsed as one integer.
pub(crate) fn digits_in(text: &str) -> Option<Result<i64, String>> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    Some(
        digits
            .parse::<i64>()
            .map_err(|_| format!("digit run {:?} does not fit an integer", digits)),
    )
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::dom::Page;
    use crate::record::{RawAddress, Scalar};

    const URL: &str = "https://www.realtor.com/realestateagents/jane-doe_springfield_il_111";

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    fn extract_fixture(name: &str, full: bool) -> Extraction {
        let page = Page::parse(&fixture(name));
        extract_all(page.root(), URL, full)
    }

    #[test]
    fn agent_profile_basic_fields() {
        let r = extract_fixture("agent_profile", false).record;
        assert_eq!(r.web_url.as_deref(), Some(URL));
        assert_eq!(r.title.as_deref(), Some("Jane Doe"));
        assert_eq!(
            r.photo.as_deref(),
            Some("https://ap.rdcpix.com/abc123/jane-doe.jpg")
        );
        assert_eq!(
            r.description.as_deref(),
            Some("Helping families find their dream homes. Licensed since 2009.")
        );
        assert_eq!(r.experience.as_deref(), Some("Years in Business: 14"));
    }

    #[test]
    fn agent_profile_phones() {
        let r = extract_fixture("agent_profile", false).record;
        let numbers: Vec<String> = r
            .phones
            .iter()
            .filter_map(|p| p.number.as_ref().map(|n| n.to_string()))
            .collect();
        assert_eq!(
            numbers,
            vec!["(555) 123-4567 Mobile", "Office: 555.987.6543", "+1 555 000 1111"]
        );
        let kinds: Vec<Option<&str>> = r.phones.iter().map(|p| p.kind.as_deref()).collect();
        assert_eq!(kinds, vec![Some("Mobile"), Some("Office"), None]);
    }

    #[test]
    fn agent_profile_office_and_address() {
        let r = extract_fixture("agent_profile", false).record;
        let office = r.office.unwrap();
        assert_eq!(office.name.as_deref(), Some("Sunrise Realty"));
        assert_eq!(
            office.website.as_deref(),
            Some("https://sunrise-realty.example.com")
        );
        assert_eq!(
            office.raw_address.as_deref(),
            Some("Sunrise Realty Visit website 100 Main St, Springfield, IL 62701")
        );
        assert_eq!(r.address, Some(RawAddress::raw("200 Oak Ave Springfield, IL")));
    }

    #[test]
    fn agent_profile_ratings_and_activity() {
        let r = extract_fixture("agent_profile", false).record;
        assert_eq!(r.agent_rating, Some(Scalar::Float(4.8)));
        assert_eq!(r.review_count, Some(Scalar::Int(37)));
        assert_eq!(
            r.recently_sold.unwrap().get("count"),
            Some(&serde_json::json!(12))
        );
        assert_eq!(
            r.for_sale_price.unwrap().get("raw"),
            Some(&serde_json::json!("Homes for sale: $250K - $1.2M"))
        );
    }

    #[test]
    fn details_only_in_full_mode() {
        let basic = extract_fixture("agent_profile", false).record;
        assert!(basic.specializations.is_empty());
        assert!(basic.reviews.is_empty());

        let full = extract_fixture("agent_profile", true);
        let r = full.record;
        assert_eq!(
            r.specializations,
            vec![Scalar::from("Luxury"), Scalar::from("Luxury"), Scalar::from("Condos")]
        );
        assert_eq!(r.reviews.len(), 3);
        assert_eq!(r.reviews[0].rating, Some(Scalar::Float(5.0)));
        assert_eq!(r.reviews[0].comment.as_deref(), Some("Jane was fantastic!"));
        assert_eq!(r.reviews[1].rating, None);
        assert_eq!(r.reviews[1].comment.as_deref(), Some("Responsive and kind."));
        assert_eq!(r.reviews[2].rating, None);
        assert_eq!(r.reviews[2].comment, None);

        assert!(full
            .diagnostics
            .notes()
            .iter()
            .any(|n| n.stage == "details" && n.message.contains("N/A")));
    }

    #[test]
    fn minimal_profile_leaves_everything_else_absent() {
        let ex = extract_fixture("profile_minimal", true);
        let r = ex.record;
        assert_eq!(r.title.as_deref(), Some("John Roe"));
        assert_eq!(r.phones.len(), 1);
        assert_eq!(r.phones[0].number, Some(Scalar::from("555-222-3333")));
        assert_eq!(r.phones[0].kind, None);
        assert!(r.office.is_none());
        assert!(r.address.is_none());
        assert!(r.agent_rating.is_none());
        assert!(r.review_count.is_none());
        assert!(r.recently_sold.is_none());
        assert!(r.for_sale_price.is_none());
        assert!(r.specializations.is_empty());
        assert!(r.reviews.is_empty());
        assert!(ex.diagnostics.is_empty());
    }

    #[test]
    fn empty_document_yields_only_the_url() {
        let page = Page::parse("<html><body></body></html>");
        let r = extract_all(page.root(), URL, true).record;
        assert_eq!(
            r,
            RawRecord {
                web_url: Some(URL.to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn failing_stage_keeps_sibling_fields() {
        let page = Page::parse(
            r#"<html><body>
                 <h1>Pat Lee</h1>
                 <div class="rating-value">   </div>
                 <p>Recently sold: 4</p>
               </body></html>"#,
        );
        let ex = extract_all(page.root(), URL, false);
        assert_eq!(ex.record.title.as_deref(), Some("Pat Lee"));
        assert_eq!(ex.record.agent_rating, None);
        assert!(ex.record.recently_sold.is_some());
        assert!(ex.diagnostics.notes().iter().any(|n| n.stage == "ratings"));
    }

    #[test]
    fn leading_float_parsing() {
        assert_eq!(leading_float("4.8 out of 5"), Ok(4.8));
        assert!(leading_float("").is_err());
        assert!(leading_float("N/A").is_err());
        assert!(leading_float("NaN stars").is_err());
    }

    #[test]
    fn digits_in_text() {
        assert_eq!(digits_in("Based on 1,204 reviews"), Some(Ok(1204)));
        assert_eq!(digits_in("No reviews yet"), None);
        assert!(matches!(digits_in(&"9".repeat(30)), Some(Err(_))));
    }
}
