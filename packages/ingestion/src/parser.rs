//! Readable-content extraction.
//!
//! Takes raw page HTML and produces a title plus markdown content:
//! a readability-style heuristic picks the main content region, link
//! and image attributes are rewritten (absolute URLs, safe targets),
//! and the cleaned HTML is converted to markdown with htmd.

use scraper::{ElementRef, Html, Selector};

use crate::error::ParseError;
use crate::types::ParsedPage;

/// Main-content candidates, most specific first.
const MAIN_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role='main']",
    "#content",
    "#main",
    ".content",
    ".main",
    ".post-content",
    ".entry-content",
];

/// Elements stripped when falling back to the full body.
const BOILERPLATE_SELECTORS: &[&str] = &[
    "nav", "header", "footer", "aside", "script", "style", "noscript", "iframe",
];

/// Stateless extractor for raw page HTML.
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    /// Extract the readable article from `html`.
    ///
    /// `origin` is the scheme-and-host of the page's URL and is used to
    /// absolutize root-relative links and image sources. The title is
    /// taken from the raw document's `<title>` tag, falling back to the
    /// first heading of the extracted region.
    pub fn parse(&self, html: &str, origin: &str) -> Result<ParsedPage, ParseError> {
        let document = Html::parse_document(html);

        let region = extract_main_region(&document);
        let cleaned = rewrite_links(&region, origin);
        let content = to_markdown(&cleaned)?;

        if content.trim().is_empty() {
            return Err(ParseError::NoContent);
        }

        let title = extract_title(&document)
            .or_else(|| first_heading(&region))
            .unwrap_or_default();

        Ok(ParsedPage { title, content })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the main content region: the first matching content selector,
/// else the body stripped of boilerplate, else the whole document.
fn extract_main_region(document: &Html) -> String {
    for selector_str in MAIN_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(region) = document.select(&selector).next() {
                return region.html();
            }
        }
    }

    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            return remove_boilerplate(&body.html());
        }
    }

    document.html()
}

/// Strip boilerplate elements from an HTML string by serialized-form
/// replacement.
fn remove_boilerplate(html: &str) -> String {
    let document = Html::parse_fragment(html);
    let mut result = html.to_string();

    for selector_str in BOILERPLATE_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in document.select(&selector) {
                result = result.replace(&element.html(), "");
            }
        }
    }

    result
}

/// Rewrite anchors and images in a serialized HTML region:
/// - every anchor opens in a new tab with `rel="noopener noreferrer"`;
/// - root-relative `href`/`src` values get `origin` prefixed.
fn rewrite_links(html: &str, origin: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut result = html.to_string();

    if let Ok(anchors) = Selector::parse("a") {
        for element in fragment.select(&anchors) {
            let old = opening_tag(&element, &[]);
            let new = opening_tag(
                &element,
                &[
                    ("target", Rewrite::Set("_blank")),
                    ("rel", Rewrite::Set("noopener noreferrer")),
                    ("href", Rewrite::Absolutize(origin)),
                ],
            );
            result = result.replace(&old, &new);
        }
    }

    if let Ok(images) = Selector::parse("img") {
        for element in fragment.select(&images) {
            let old = opening_tag(&element, &[]);
            let new = opening_tag(&element, &[("src", Rewrite::Absolutize(origin))]);
            result = result.replace(&old, &new);
        }
    }

    result
}

enum Rewrite<'a> {
    /// Force the attribute to this value, adding it if absent.
    Set(&'a str),
    /// Prefix the origin onto a root-relative value, if present.
    Absolutize(&'a str),
}

/// Serialize an element's opening tag, applying attribute rewrites.
///
/// The untouched form must match scraper's own serialization exactly so
/// that string replacement in the region finds it: same attribute
/// order, same escaping.
fn opening_tag(element: &ElementRef, rewrites: &[(&str, Rewrite)]) -> String {
    let value = element.value();
    let mut attrs: Vec<(String, String)> = value
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    for (name, rewrite) in rewrites {
        match rewrite {
            Rewrite::Set(forced) => {
                if let Some(attr) = attrs.iter_mut().find(|(k, _)| k == name) {
                    attr.1 = (*forced).to_string();
                } else {
                    attrs.push((name.to_string(), (*forced).to_string()));
                }
            }
            Rewrite::Absolutize(origin) => {
                if let Some(attr) = attrs.iter_mut().find(|(k, _)| k == name) {
                    if attr.1.starts_with('/') && !attr.1.starts_with("//") {
                        attr.1 = format!("{}{}", origin.trim_end_matches('/'), attr.1);
                    }
                }
            }
        }
    }

    let mut tag = format!("<{}", value.name());
    for (k, v) in &attrs {
        tag.push(' ');
        tag.push_str(k);
        tag.push_str("=\"");
        tag.push_str(&escape_attr(v));
        tag.push('"');
    }
    tag.push('>');
    tag
}

/// Attribute-value escaping matching the html5ever serializer.
fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('\u{00a0}', "&nbsp;")
        .replace('"', "&quot;")
}

/// The `<title>` of the raw document, if present and non-empty.
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// First heading of the extracted region, as a title fallback.
fn first_heading(region_html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(region_html);
    let selector = Selector::parse("h1, h2").ok()?;
    fragment
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Convert cleaned HTML to markdown.
fn to_markdown(html: &str) -> Result<String, ParseError> {
    htmd::convert(html).map_err(|e| ParseError::Markdown(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
<head><title>Docs - Example</title></head>
<body>
<nav><a href="/">Home</a></nav>
<main>
  <h1>Getting Started</h1>
  <p>Install the tool and read the <a href="/docs/guide">guide</a>.</p>
  <img src="/assets/diagram.png" alt="diagram">
</main>
<footer>Footer text</footer>
</body>
</html>"#;

    #[test]
    fn test_parse_extracts_title_and_markdown() {
        let page = Parser::new().parse(PAGE, "https://example.com").unwrap();

        assert_eq!(page.title, "Docs - Example");
        assert!(page.content.contains("Getting Started"));
        assert!(page.content.contains("Install the tool"));
        // Footer and nav live outside <main> and must not leak in.
        assert!(!page.content.contains("Footer text"));
    }

    #[test]
    fn test_relative_urls_become_absolute() {
        let page = Parser::new().parse(PAGE, "https://example.com").unwrap();

        assert!(page.content.contains("https://example.com/docs/guide"));
        assert!(page.content.contains("https://example.com/assets/diagram.png"));
    }

    #[test]
    fn test_anchor_attributes_rewritten() {
        let html = r#"<p><a href="/about">About</a> and <a href="https://other.example">ext</a></p>"#;
        let rewritten = rewrite_links(html, "https://example.com");

        assert!(rewritten.contains(r#"href="https://example.com/about""#));
        assert!(rewritten.contains(r#"target="_blank""#));
        assert!(rewritten.contains(r#"rel="noopener noreferrer""#));
        // Absolute URLs are left alone.
        assert!(rewritten.contains(r#"href="https://other.example""#));
    }

    #[test]
    fn test_title_falls_back_to_first_heading() {
        let html = "<html><body><main><h1>Only Heading</h1><p>Body text.</p></main></body></html>";
        let page = Parser::new().parse(html, "https://example.com").unwrap();

        assert_eq!(page.title, "Only Heading");
    }

    #[test]
    fn test_empty_page_is_an_error() {
        let err = Parser::new().parse("<html><body></body></html>", "https://example.com");
        assert!(matches!(err, Err(ParseError::NoContent)));
    }

    #[test]
    fn test_body_fallback_strips_boilerplate() {
        let html = r#"<html><body>
<nav>Menu</nav>
<p>Actual article text that matters.</p>
<footer>Footer</footer>
</body></html>"#;
        let page = Parser::new().parse(html, "https://example.com").unwrap();

        assert!(page.content.contains("Actual article text"));
        assert!(!page.content.contains("Menu"));
        assert!(!page.content.contains("Footer"));
    }
}
