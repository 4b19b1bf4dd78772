//! HTML content extractor
//!
//! Turns a fetched HTML document into plain text, a title, a snippet, and the
//! set of outbound links. Script/style and navigation-like regions are
//! stripped before text extraction so boilerplate does not dominate the
//! index. Parsing is lenient: malformed HTML degrades to partial text and
//! never fails the fetch.

use crate::url::normalize_url;
use scraper::node::Element;
use scraper::{Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

/// Maximum length of the stored snippet, in characters
const SNIPPET_LEN: usize = 200;

/// Tag names whose subtrees are excluded from text extraction
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "template",
];

/// Class-name fragments marking navigation/boilerplate regions
const SKIPPED_CLASS_HINTS: &[&str] = &["nav", "footer", "breadcrumb", "menu", "sidebar"];

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// The page title (empty if the document has none)
    pub title: String,

    /// Visible text with boilerplate regions removed
    pub text: String,

    /// Short description for result display (meta description when present,
    /// otherwise the leading text)
    pub snippet: String,

    /// Outbound links as normalized absolute URLs, deduplicated,
    /// discovery order preserved
    pub links: Vec<String>,
}

/// Parses HTML content and extracts title, text, snippet, and links
///
/// Relative hrefs are resolved against `base_url`; `javascript:`, `mailto:`,
/// `tel:`, and `data:` schemes, fragment-only anchors, and `download` links
/// are skipped. Surviving links are normalized and deduplicated.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The URL the content was fetched from
pub fn extract(html: &str, base_url: &Url) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let text = extract_text(&document);
    let snippet = extract_snippet(&document, &text);
    let links = extract_links(&document, base_url);

    ExtractedPage {
        title,
        text,
        snippet,
        links,
    }
}

/// Extracts the page title from the `<title>` element
fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Collects visible text in document order, skipping boilerplate subtrees
fn extract_text(document: &Html) -> String {
    let mut chunks: Vec<String> = Vec::new();
    let mut stack = vec![document.tree.root()];

    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    chunks.push(trimmed.to_string());
                }
            }
            Node::Element(element) if is_boilerplate(element) => {}
            _ => {
                // Children pushed in reverse so the stack pops them in
                // document order
                let children: Vec<_> = node.children().collect();
                stack.extend(children.into_iter().rev());
            }
        }
    }

    chunks.join(" ")
}

/// Checks whether an element starts a boilerplate region
///
/// Matches on tag name (script/style/nav/header/footer and friends) or on
/// navigation-flavored class names.
fn is_boilerplate(element: &Element) -> bool {
    let name = element.name();
    if name == "title" || SKIPPED_TAGS.contains(&name) {
        return true;
    }

    if let Some(class) = element.attr("class") {
        let class = class.to_ascii_lowercase();
        return SKIPPED_CLASS_HINTS.iter().any(|hint| class.contains(hint));
    }

    false
}

/// Builds the result snippet: meta description if present, leading text otherwise
fn extract_snippet(document: &Html, text: &str) -> String {
    if let Ok(selector) = Selector::parse(r#"meta[name="description"]"#) {
        if let Some(content) = document
            .select(&selector)
            .next()
            .and_then(|element| element.value().attr("content"))
        {
            let content = content.trim();
            if !content.is_empty() {
                return truncate_chars(content, SNIPPET_LEN);
            }
        }
    }

    truncate_chars(text, SNIPPET_LEN)
}

fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

/// Extracts normalized outbound links from `<a href>` elements
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut links = Vec::new();
    let mut seen = HashSet::new();

    for element in document.select(&selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(link) = resolve_link(href, base_url) {
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
    }

    links
}

/// Resolves a link href to a normalized absolute URL
///
/// Returns None for schemes that cannot be crawled, fragment-only anchors,
/// and hrefs that fail to resolve or normalize.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    normalize_url(absolute.as_str())
        .ok()
        .map(|u| u.to_string())
}
