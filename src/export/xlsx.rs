use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::{Map, Value};

use super::cell_text;

/// Excel refuses longer strings in a single cell.
const MAX_CELL_CHARS: usize = 32_767;

/// One worksheet; nested objects become dotted columns in first-seen order.
pub fn write(rows: &[Map<String, Value>], path: &Path) -> Result<()> {
    let flat: Vec<Vec<(String, &Value)>> = rows
        .iter()
        .map(|row| {
            let mut cells = Vec::new();
            flatten("", row, &mut cells);
            cells
        })
        .collect();

    let mut columns: Vec<&str> = Vec::new();
    let mut index: HashMap<&str, u16> = HashMap::new();
    for cells in &flat {
        for (name, _) in cells {
            if !index.contains_key(name.as_str()) {
                index.insert(name.as_str(), u16::try_from(columns.len())?);
                columns.push(name.as_str());
            }
        }
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in columns.iter().enumerate() {
        sheet.write_string(0, u16::try_from(col)?, *name)?;
    }
    for (i, cells) in flat.iter().enumerate() {
        let row = u32::try_from(i + 1)?;
        for (name, value) in cells {
            if let Some(&col) = index.get(name.as_str()) {
                write_cell(sheet, row, col, value)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn flatten<'a>(prefix: &str, map: &'a Map<String, Value>, out: &mut Vec<(String, &'a Value)>) {
    for (key, value) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(inner) => flatten(&name, inner, out),
            _ => out.push((name, value)),
        }
    }
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> Result<()> {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        Value::Number(n) => match n.as_f64() {
            Some(x) => {
                sheet.write_number(row, col, x)?;
            }
            None => {
                sheet.write_string(row, col, n.to_string())?;
            }
        },
        other => {
            let text: String = cell_text(other).chars().take(MAX_CELL_CHARS).collect();
            sheet.write_string(row, col, text)?;
        }
    }
    Ok(())
}
