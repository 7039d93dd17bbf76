mod csv;
mod json;
mod xlsx;
mod xml;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::record::CleanedRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Xlsx,
    Xml,
}

impl ExportFormat {
    pub fn parse(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "excel" => Some(Self::Xlsx),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No export formats specified")]
    NoFormats,
    #[error("No agents to export")]
    NoRecords,
    #[error("Cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No exports were successfully generated")]
    NothingWritten,
}

/// Write one timestamped file per recognised format. Unknown formats and
/// single-format failures are logged; only an empty result is an error.
pub fn export_all(
    records: &[CleanedRecord],
    output_dir: &Path,
    formats: &[String],
) -> Result<Vec<(ExportFormat, PathBuf)>, ExportError> {
    let ids: Vec<&str> = formats
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect();
    if ids.is_empty() {
        return Err(ExportError::NoFormats);
    }
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }

    std::fs::create_dir_all(output_dir).map_err(|source| ExportError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let rows = to_rows(records);
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    let mut written: Vec<(ExportFormat, PathBuf)> = Vec::new();

    for id in ids {
        let Some(format) = ExportFormat::parse(id) else {
            warn!("Unknown export format '{}'; skipping.", id);
            continue;
        };
        if written.iter().any(|(done, _)| *done == format) {
            continue;
        }

        let path = output_dir.join(format!("agents_{}.{}", stamp, format.extension()));
        let result = match format {
            ExportFormat::Json => json::write(&rows, &path),
            ExportFormat::Csv => csv::write(&rows, &path),
            ExportFormat::Xlsx => xlsx::write(&rows, &path),
            ExportFormat::Xml => xml::write(&rows, &path),
        };
        match result {
            Ok(()) => {
                info!("Exported {} agents to {}: {}", rows.len(), format, path.display());
                written.push((format, path));
            }
            Err(e) => error!("Failed to export format '{}': {:#}", format, e),
        }
    }

    if written.is_empty() {
        return Err(ExportError::NothingWritten);
    }
    Ok(written)
}

/// Records as JSON objects, keys in field order, absent fields omitted.
fn to_rows(records: &[CleanedRecord]) -> Vec<Map<String, Value>> {
    records
        .iter()
        .filter_map(|r| match serde_json::to_value(r) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        })
        .collect()
}

/// Flat text for one value: strings as-is, nested values as compact JSON.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Address, Office, Phone};

    fn records() -> Vec<CleanedRecord> {
        vec![
            CleanedRecord {
                title: Some("Jane Doe".into()),
                web_url: Some("https://www.realtor.com/realestateagents/jane".into()),
                agent_rating: Some(4.8),
                review_count: Some(37),
                phones: vec![Phone {
                    number: "5551234567".into(),
                    kind: Some("Mobile".into()),
                    ext: None,
                }],
                office: Some(Office {
                    name: Some("Sunrise Realty".into()),
                    website: None,
                    address: Some(Address {
                        raw: Some("100 Main St".into()),
                        ..Default::default()
                    }),
                }),
                ..Default::default()
            },
            CleanedRecord {
                title: Some("John <Roe> & Co".into()),
                specializations: vec!["Condos".into()],
                ..Default::default()
            },
        ]
    }

    fn formats(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn only(written: &[(ExportFormat, PathBuf)], format: ExportFormat) -> String {
        let (_, path) = written.iter().find(|(f, _)| *f == format).unwrap();
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn format_identifiers() {
        assert_eq!(ExportFormat::parse(" JSON "), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse("excel"), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::parse("xls"), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::parse("parquet"), None);
        assert_eq!(ExportFormat::Xlsx.to_string(), "xlsx");
    }

    #[test]
    fn writes_every_known_format() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");
        let written = export_all(
            &records(),
            &out,
            &formats(&["json", "CSV", "excel", "xml", "parquet", "xlsx"]),
        )
        .unwrap();

        let kinds: Vec<ExportFormat> = written.iter().map(|(f, _)| *f).collect();
        assert_eq!(
            kinds,
            vec![ExportFormat::Json, ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Xml]
        );
        for (format, path) in &written {
            let name = path.file_name().unwrap().to_str().unwrap();
            assert!(name.starts_with("agents_"));
            assert!(name.ends_with(&format!("Z.{}", format.extension())));
            assert!(std::fs::metadata(path).unwrap().len() > 0);
        }
    }

    #[test]
    fn json_output_omits_absent_fields() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_all(&records(), dir.path(), &formats(&["json"])).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&only(&written, ExportFormat::Json)).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["phones"][0]["type"], "Mobile");
        assert_eq!(parsed[0]["office"]["address"]["raw"], "100 Main St");
        assert!(parsed[1].get("phones").is_none());
    }

    #[test]
    fn csv_header_is_sorted_union() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_all(&records(), dir.path(), &formats(&["csv"])).unwrap();
        let text = only(&written, ExportFormat::Csv);

        let mut reader = ::csv::Reader::from_reader(text.as_bytes());
        let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            header,
            vec![
                "agent_rating",
                "office",
                "phones",
                "review_count",
                "specializations",
                "title",
                "web_url"
            ]
        );

        let rows: Vec<::csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][0], "4.8");
        assert_eq!(&rows[0][2], r#"[{"number":"5551234567","type":"Mobile"}]"#);
        assert_eq!(&rows[1][0], "");
        assert_eq!(&rows[1][4], r#"["Condos"]"#);
    }

    #[test]
    fn xml_escapes_and_nests_json() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_all(&records(), dir.path(), &formats(&["xml"])).unwrap();
        let text = only(&written, ExportFormat::Xml);

        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(text.matches("<agent>").count(), 2);
        assert!(text.contains("<title>John &lt;Roe&gt; &amp; Co</title>"));
        assert!(text.contains("<review_count>37</review_count>"));
        let phones = text.find("<phones>").unwrap();
        assert!(text[phones..].contains("5551234567"));
    }

    #[test]
    fn empty_inputs_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            export_all(&records(), dir.path(), &formats(&[" ", ""])),
            Err(ExportError::NoFormats)
        ));
        assert!(matches!(
            export_all(&[], dir.path(), &formats(&["json"])),
            Err(ExportError::NoRecords)
        ));
        assert!(matches!(
            export_all(&records(), dir.path(), &formats(&["parquet"])),
            Err(ExportError::NothingWritten)
        ));
    }

    #[test]
    fn cell_text_rendering() {
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&Value::from("a \"b\"")), "a \"b\"");
        assert_eq!(cell_text(&Value::from(12)), "12");
        assert_eq!(cell_text(&serde_json::json!({"count": 3})), r#"{"count":3}"#);
    }
}
