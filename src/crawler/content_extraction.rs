//! Content extraction functionality for the crawler module

use std::collections::HashSet;

use scraper::{Html, Node, Selector};
use tracing::warn;
use url::Url;

use crate::crawler::ExtractedPage;
use crate::crawler::error::CrawlError;

/// Title used when a page has neither a `<title>` nor an `<h1>`
pub const UNTITLED_PAGE: &str = "Untitled Page";

/// Language assumed when the root element carries no `lang`
pub const DEFAULT_LANGUAGE: &str = "en";

pub(crate) fn selector(css: &str) -> Result<Selector, CrawlError> {
    Selector::parse(css)
        .map_err(|e| CrawlError::Parse(format!("Failed to parse selector '{}': {}", css, e)))
}

/// Parse a fetched body into a document
///
/// Parsing is lenient, so the only bodies refused are the ones that are
/// not markup at all: empty bodies and binary payloads.
pub fn parse_document(html: &str) -> Result<Html, CrawlError> {
    if html.trim().is_empty() {
        return Err(CrawlError::Parse("Document is empty".to_string()));
    }
    if html.contains('\0') {
        return Err(CrawlError::Parse(
            "Document contains binary data, not HTML".to_string(),
        ));
    }
    Ok(Html::parse_document(html))
}

/// Refuse bodies whose declared media type is not HTML
///
/// A missing header is accepted; such bodies still have to survive
/// `parse_document`.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), CrawlError> {
    let Some(content_type) = content_type else {
        return Ok(());
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "text/html" | "application/xhtml+xml" => Ok(()),
        _ => Err(CrawlError::Parse(format!(
            "Unsupported content type: {}",
            content_type
        ))),
    }
}

/// Hostname of a URL with a leading `www.` removed
pub fn page_domain(url: &Url) -> Result<String, CrawlError> {
    let host = url
        .host_str()
        .ok_or_else(|| CrawlError::InvalidUrl(format!("URL has no host: {}", url)))?;
    Ok(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Extract the indexable fields of a parsed page
///
/// # Arguments
///
/// * `url` - The URL the page was fetched from
/// * `document` - The parsed page
/// * `exclude_selectors` - Elements whose text is left out of `content`
/// * `max_content_chars` - Upper bound on the length of `content`
pub fn extract_page(
    url: &Url,
    document: &Html,
    exclude_selectors: &[String],
    max_content_chars: usize,
) -> Result<ExtractedPage, CrawlError> {
    let title = first_text(document, "title")?
        .or(first_text(document, "h1")?)
        .unwrap_or_else(|| UNTITLED_PAGE.to_string());

    let description = first_attr(document, "meta[name=\"description\"]", "content")?
        .or(first_attr(document, "meta[property=\"og:description\"]", "content")?)
        .unwrap_or_default();

    let language = document
        .root_element()
        .value()
        .attr("lang")
        .map(|lang| lang.trim().chars().take(2).collect::<String>())
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    Ok(ExtractedPage {
        title,
        description,
        content: body_text(document, exclude_selectors, max_content_chars)?,
        language,
        domain: page_domain(url)?,
    })
}

/// Text of the first matching element, trimmed, if it is not blank
fn first_text(document: &Html, css: &str) -> Result<Option<String>, CrawlError> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty()))
}

/// Attribute of the first matching element, if it is not blank
fn first_attr(document: &Html, css: &str, attr: &str) -> Result<Option<String>, CrawlError> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

/// Whitespace-collapsed body text without boilerplate, truncated by characters
fn body_text(
    document: &Html,
    exclude_selectors: &[String],
    max_content_chars: usize,
) -> Result<String, CrawlError> {
    let body_selector = selector("body")?;
    let Some(body) = document.select(&body_selector).next() else {
        return Ok(String::new());
    };

    let mut excluded = HashSet::new();
    for css in exclude_selectors {
        match Selector::parse(css) {
            Ok(selector) => excluded.extend(body.select(&selector).map(|element| element.id())),
            Err(e) => warn!("Failed to parse selector '{}': {}", css, e),
        }
    }

    let mut parts = Vec::new();
    for node in body.descendants() {
        if let Node::Text(text) = node.value() {
            if node.ancestors().any(|ancestor| excluded.contains(&ancestor.id())) {
                continue;
            }
            parts.push(&**text);
        }
    }

    let collapsed = parts
        .iter()
        .flat_map(|part| part.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(collapsed.chars().take(max_content_chars).collect())
}
