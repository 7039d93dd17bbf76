use scraper::{ElementRef, Html, Selector};

/// A fetched page parsed into a queryable tree.
pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(content: &str) -> Self {
        Page {
            html: Html::parse_document(content),
        }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }
}

/// A text node found by [`DomNode::find_text`], with its enclosing element.
#[derive(Debug, Clone)]
pub struct TextHit<N> {
    pub text: String,
    pub parent: Option<N>,
}

/// What the extraction heuristics need from a document node.
///
/// Queries only look at descendants, never at the node itself.
pub trait DomNode: Copy {
    fn select_first(&self, selector: &Selector) -> Option<Self>;

    fn select_all(&self, selector: &Selector) -> Vec<Self>;

    /// Visible text: trimmed fragments joined by single spaces.
    fn text_content(&self) -> String;

    fn attr(&self, name: &str) -> Option<String>;

    /// First descendant text node (document order) accepted by `pred`.
    fn find_text<P>(&self, pred: P) -> Option<TextHit<Self>>
    where
        P: Fn(&str) -> bool;
}

impl<'a> DomNode for ElementRef<'a> {
    fn select_first(&self, selector: &Selector) -> Option<Self> {
        self.select(selector).next()
    }

    fn select_all(&self, selector: &Selector) -> Vec<Self> {
        self.select(selector).collect()
    }

    fn text_content(&self) -> String {
        join_fragments(self.text())
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }

    fn find_text<P>(&self, pred: P) -> Option<TextHit<Self>>
    where
        P: Fn(&str) -> bool,
    {
        self.descendants().find_map(|node| {
            let text: &str = node.value().as_text()?;
            if !pred(text) {
                return None;
            }
            Some(TextHit {
                text: text.to_string(),
                parent: node.parent().and_then(ElementRef::wrap),
            })
        })
    }
}

pub fn join_fragments<'t>(fragments: impl Iterator<Item = &'t str>) -> String {
    fragments
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compile a selector known at build time.
pub fn css(selector: &str) -> Selector {
    Selector::parse(selector).unwrap()
}
