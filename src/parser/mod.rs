pub mod dom;
pub mod extract;

use dom::Page;
use extract::Extraction;

/// Parse fetched HTML and run the extraction stages over it.
pub fn process_page(html: &str, url: &str, full_details: bool) -> Extraction {
    let page = Page::parse(html);
    extract::extract_all(page.root(), url, full_details)
}
