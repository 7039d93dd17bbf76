use std::sync::LazyLock;

use scraper::Selector;

use super::Diagnostics;
use crate::parser::dom::{css, join_fragments, DomNode};
use crate::record::{RawAddress, RawOffice, RawRecord};

static OFFICE_SEL: LazyLock<Selector> =
    LazyLock::new(|| css("[data-testid='office-info'], .office-info, .brokerage"));
static H2_SEL: LazyLock<Selector> = LazyLock::new(|| css("h2"));
static H3_SEL: LazyLock<Selector> = LazyLock::new(|| css("h3"));
static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| css("a[href]"));
static ADDRESS_SEL: LazyLock<Selector> =
    LazyLock::new(|| css("[data-testid='address'], .agent-address, address"));

/// Office block (name, website, raw text as address fallback) and the
/// agent's own address.
pub fn extract<N: DomNode>(root: N, record: &mut RawRecord, diag: &mut Diagnostics) {
    if let Some(block) = root.select_first(&OFFICE_SEL) {
        let raw_text = join_fragments(block.text_content().split_whitespace());
        let office = RawOffice {
            name: block
                .select_first(&H2_SEL)
                .or_else(|| block.select_first(&H3_SEL))
                .map(|h| h.text_content()),
            website: block.select_first(&LINK_SEL).and_then(|a| a.attr("href")),
            raw_address: (!raw_text.is_empty()).then_some(raw_text),
            address: None,
        };
        if office.is_empty() {
            diag.note("office", "office block matched but held nothing");
        } else {
            record.office = Some(office);
        }
    }

    if let Some(addr) = root.select_first(&ADDRESS_SEL) {
        let text = join_fragments(addr.text_content().split_whitespace());
        record.address = Some(RawAddress::raw(text));
    }
}
