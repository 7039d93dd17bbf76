use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::{Map, Value};

use super::cell_text;

/// `<agents><agent><field>..</field></agent></agents>`, nested values as JSON text.
pub fn write(rows: &[Map<String, Value>], path: &Path) -> Result<()> {
    let mut writer = Writer::new_with_indent(BufWriter::new(File::create(path)?), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("agents")))?;
    for row in rows {
        writer.write_event(Event::Start(BytesStart::new("agent")))?;
        for (key, value) in row {
            if value.is_null() {
                continue;
            }
            writer.write_event(Event::Start(BytesStart::new(key.as_str())))?;
            writer.write_event(Event::Text(BytesText::new(&cell_text(value))))?;
            writer.write_event(Event::End(BytesEnd::new(key.as_str())))?;
        }
        writer.write_event(Event::End(BytesEnd::new("agent")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("agents")))?;

    let mut out = writer.into_inner();
    std::io::Write::flush(&mut out)?;
    Ok(())
}
