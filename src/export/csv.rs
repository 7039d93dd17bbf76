use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;
use serde_json::{Map, Value};

use super::cell_text;

/// One row per record; columns are the sorted union of top-level keys.
pub fn write(rows: &[Map<String, Value>], path: &Path) -> Result<()> {
    let columns: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    let mut writer = ::csv::Writer::from_path(path)?;
    writer.write_record(&columns)?;
    for row in rows {
        writer.write_record(
            columns
                .iter()
                .map(|col| row.get(*col).map(cell_text).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    Ok(())
}
