//! # HTML Rewriting
//!
//! Makes a third-party page displayable inside a frame of another origin:
//!
//! 1. Relative references in URL-bearing attributes are made absolute
//! 2. Relative `url(...)` references in inline styles and `<style>` blocks are made absolute
//! 3. A `<base>` element, a permissive CSP `<meta>` and a click relay script
//!    become the first children of `<head>`
//!
//! The document is parsed into a tree and only real attribute values and
//! stylesheet text are touched, so markup that merely looks like an
//! attribute (inside a script string, say) is left alone.

use regex::{Captures, Regex};
use scraper::{Html, Node, Selector, StrTendril};
use url::Url;

use crate::proxy::error::ProxyError;

/// Attributes whose values are URL references
const URL_ATTRIBUTES: [&str; 5] = ["src", "href", "action", "data-src", "poster"];

/// Attribute values starting with one of these are left untouched
const PRESERVED_PREFIXES: [&str; 7] = [
    "http://",
    "https://",
    "//",
    "data:",
    "javascript:",
    "#",
    "mailto:",
];

/// `url(...)` references starting with one of these are left untouched
const PRESERVED_CSS_PREFIXES: [&str; 5] = ["http://", "https://", "//", "data:", "#"];

const CSS_URL_PATTERN: &str = r#"(?i)url\(\s*(['"]?)([^'")]+)(['"]?)\s*\)"#;

/// Relays link clicks to the embedding window instead of navigating the frame
const NAVIGATION_RELAY: &str = "(function () {
  document.addEventListener('click', function (e) {
    var link = e.target && e.target.closest ? e.target.closest('a') : null;
    if (link && link.href) {
      e.preventDefault();
      window.parent.postMessage({ type: 'navigate', url: link.href }, '*');
    }
  });
})();";

/// Rewrites HTML documents against the origin they were fetched from
#[derive(Debug, Clone)]
pub struct HtmlRewriter {
    css_url: Regex,
    head: Selector,
    style: Selector,
}

impl HtmlRewriter {
    /// Create a rewriter
    pub fn new() -> Result<Self, ProxyError> {
        let css_url = Regex::new(CSS_URL_PATTERN)
            .map_err(|e| ProxyError::Setup(format!("Invalid CSS url pattern: {}", e)))?;
        let head = Selector::parse("head")
            .map_err(|e| ProxyError::Setup(format!("Invalid selector 'head': {}", e)))?;
        let style = Selector::parse("style")
            .map_err(|e| ProxyError::Setup(format!("Invalid selector 'style': {}", e)))?;

        Ok(Self {
            css_url,
            head,
            style,
        })
    }

    /// Rewrite a document fetched from `page_url`
    pub fn rewrite(&self, html: &str, page_url: &Url) -> String {
        let base = page_url.origin().ascii_serialization();
        let mut document = Html::parse_document(html);

        self.rewrite_attributes(&mut document, &base);
        self.rewrite_style_blocks(&mut document, &base);

        if self.inject_head(&mut document, &base) {
            document.html()
        } else {
            format!("{}{}", injected_markup(&base), document.html())
        }
    }

    fn rewrite_attributes(&self, document: &mut Html, base: &str) {
        for node in document.tree.values_mut() {
            let Node::Element(element) = node else {
                continue;
            };

            for (name, value) in element.attrs.iter_mut() {
                let name: &str = &name.local;
                let rewritten = if URL_ATTRIBUTES.contains(&name) {
                    absolute_reference(&**value, base)
                } else if name == "style" {
                    self.rewrite_css(&**value, base)
                } else {
                    None
                };

                if let Some(rewritten) = rewritten {
                    *value = StrTendril::from(rewritten);
                }
            }
        }
    }

    fn rewrite_style_blocks(&self, document: &mut Html, base: &str) {
        let text_ids: Vec<_> = document
            .select(&self.style)
            .flat_map(|style| style.children())
            .filter(|child| child.value().is_text())
            .map(|child| child.id())
            .collect();

        for id in text_ids {
            let Some(mut node) = document.tree.get_mut(id) else {
                continue;
            };
            if let Node::Text(text) = node.value() {
                if let Some(rewritten) = self.rewrite_css(&text.text, base) {
                    text.text = StrTendril::from(rewritten);
                }
            }
        }
    }

    /// Make every relative `url(...)` of a stylesheet absolute, `None` when nothing changed
    fn rewrite_css(&self, css: &str, base: &str) -> Option<String> {
        if !self.css_url.is_match(css) {
            return None;
        }

        let rewritten = self.css_url.replace_all(css, |caps: &Captures| {
            let path = caps[2].trim();
            if has_prefix(path, &PRESERVED_CSS_PREFIXES) {
                caps[0].to_string()
            } else if path.starts_with('/') {
                format!("url('{}{}')", base, path)
            } else {
                format!("url('{}/{}')", base, path)
            }
        });

        (rewritten != css).then(|| rewritten.into_owned())
    }

    /// Prepend the injected nodes to `<head>`, false when there is no head
    fn inject_head(&self, document: &mut Html, base: &str) -> bool {
        let Some(head_id) = document.select(&self.head).next().map(|head| head.id()) else {
            return false;
        };
        let Some(mut head) = document.tree.get_mut(head_id) else {
            return false;
        };

        let fragment = Html::parse_fragment(&injected_markup(base));
        for node in fragment.root_element().children().rev() {
            let mut inserted = head.prepend(node.value().clone());
            for child in node.children() {
                inserted.append(child.value().clone());
            }
        }

        true
    }
}

/// Rewrite a document fetched from `page_url`
pub fn rewrite_html(html: &str, page_url: &Url) -> Result<String, ProxyError> {
    Ok(HtmlRewriter::new()?.rewrite(html, page_url))
}

/// The nodes placed at the top of `<head>`, in document order
fn injected_markup(base: &str) -> String {
    format!(
        "<base href=\"{base}/\" target=\"_self\">\
         <meta http-equiv=\"Content-Security-Policy\" content=\"frame-ancestors *;\">\
         <script>{NAVIGATION_RELAY}</script>"
    )
}

/// Absolute form of a relative attribute reference, `None` when it must stay as is
fn absolute_reference(value: &str, base: &str) -> Option<String> {
    if value.is_empty() || has_prefix(value, &PRESERVED_PREFIXES) {
        return None;
    }
    let path = value.strip_prefix('/').unwrap_or(value);
    Some(format!("{}/{}", base, path))
}

fn has_prefix(value: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| {
        value
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}
