//! Same-host link discovery

use std::collections::HashSet;

use scraper::Html;
use url::Url;

use crate::crawler::content_extraction::selector;
use crate::crawler::error::CrawlError;

/// Collect the links of a page that stay on the page's own host
///
/// Relative references are resolved against `source`, unresolvable ones are
/// dropped, fragments are stripped, and the result is deduplicated in
/// document order before being cut to `limit` entries.
pub fn discover_links(
    document: &Html,
    source: &Url,
    limit: usize,
) -> Result<Vec<String>, CrawlError> {
    let anchors = selector("a[href]")?;
    let Some(host) = source.host_str() else {
        return Ok(Vec::new());
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&anchors) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(mut resolved) = source.join(href.trim()) else {
            continue;
        };
        if resolved.host_str() != Some(host) {
            continue;
        }

        resolved.set_fragment(None);
        let link = resolved.to_string();
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links.truncate(limit);
    Ok(links)
}
