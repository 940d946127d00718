//! Visible text extraction from the archived HTML.
//!
//! The crawler stores the page source; text damage only needs the words a reader
//! would see, so script, style and template content is skipped and attribute values
//! (link targets included) never reach the output.

use scraper::{ElementRef, Html};

/// Elements whose text content is never rendered.
const HIDDEN_ELEMENTS: &[&str] = &["head", "title", "script", "style", "noscript", "template"];

/// Elements that start a new line when rendered; inline elements do not break words.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "caption", "dd", "div", "dl",
    "dt", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "option", "p", "pre", "section", "table",
    "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Extracts the visible text of an HTML document.
///
/// Adjacent inline text is concatenated as rendered (`Hel<b>lo</b>` is one word) and
/// block elements separate words. The result is re-joined with single spaces, so it
/// has no leading, trailing or repeated whitespace.
///
/// # Arguments
///
/// * `html` - Raw page source
///
/// # Returns
///
/// The visible text, or an empty string for a page without any.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut rendered = String::with_capacity(html.len() / 2);
    collect_text(document.root_element(), &mut rendered);

    let words: Vec<&str> = rendered.split_whitespace().collect();
    log::trace!("Extracted {} words from {} bytes of HTML", words.len(), html.len());
    words.join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child.value().name();
        if HIDDEN_ELEMENTS.contains(&name) {
            continue;
        }
        let block = BLOCK_ELEMENTS.contains(&name);
        if block {
            out.push(' ');
        }
        collect_text(child, out);
        if block {
            out.push(' ');
        }
    }
}

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
