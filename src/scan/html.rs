//! HTML reference extractor
//!
//! Walks a declarative table of (element, attribute, kind) rules over a
//! parsed document and collects candidate resource URLs. The table is the
//! entire extraction policy: adding an element/attribute pair there is the
//! only change needed to start following it.
//!
//! Surfaces deliberately not scanned: inline `<style>` and `<script>`
//! bodies, `iframe` `srcdoc` documents, `meta http-equiv="Refresh"`
//! targets, and import maps.

use scraper::{Html, Selector};
use url::Url;

/// How an attribute's textual value maps to URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// The whole value is one URL.
    Single,
    /// The value is a list of URLs separated by runs of HTML whitespace.
    SpaceSeparated,
    /// The value is an image candidate list (`srcset` grammar).
    SrcSet,
    /// The value is a bare path in a non-URL attribute that still needs
    /// resolving against the base.
    SingleNeedsResolving,
}

/// One entry of the extraction policy table.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceRule {
    pub element: &'static str,
    pub attribute: &'static str,
    pub kind: RefKind,
}

const fn rule(element: &'static str, attribute: &'static str, kind: RefKind) -> ReferenceRule {
    ReferenceRule {
        element,
        attribute,
        kind,
    }
}

/// The entire HTML extraction policy.
pub const REFERENCE_RULES: &[ReferenceRule] = &[
    rule("link", "href", RefKind::Single),
    rule("a", "href", RefKind::Single),
    rule("area", "href", RefKind::Single),
    rule("source", "src", RefKind::Single),
    rule("img", "src", RefKind::Single),
    rule("iframe", "src", RefKind::Single),
    rule("embed", "src", RefKind::Single),
    rule("video", "src", RefKind::Single),
    rule("video", "poster", RefKind::Single),
    rule("audio", "src", RefKind::Single),
    rule("track", "src", RefKind::Single),
    rule("input", "src", RefKind::Single),
    rule("script", "src", RefKind::Single),
    rule("object", "data", RefKind::Single),
    rule("form", "action", RefKind::Single),
    rule("button", "formaction", RefKind::Single),
    rule("blockquote", "cite", RefKind::Single),
    rule("ins", "cite", RefKind::Single),
    rule("del", "cite", RefKind::Single),
    rule("a", "ping", RefKind::SpaceSeparated),
    rule("area", "ping", RefKind::SpaceSeparated),
    rule("link", "imagesrcset", RefKind::SrcSet),
    rule("source", "srcset", RefKind::SrcSet),
    rule("img", "srcset", RefKind::SrcSet),
    // One third-party versioning script stashes resource paths in id
    // attributes; a clearly-marked exception, not a general rule.
    rule("link", "id", RefKind::SingleNeedsResolving),
    rule("script", "id", RefKind::SingleNeedsResolving),
];

/// Extracts every candidate reference from `body`, resolved against the
/// document's base URI (`document_url`, or an explicit `<base href>` when
/// present).
pub fn scan(document_url: &Url, body: &str) -> Vec<Url> {
    let document = Html::parse_document(body);
    let base = effective_base(&document, document_url);
    let mut links = Vec::new();
    for rule in REFERENCE_RULES {
        let selector = match Selector::parse(&format!("{}[{}]", rule.element, rule.attribute)) {
            Ok(selector) => selector,
            Err(_) => continue,
        };
        for element in document.select(&selector) {
            let Some(value) = element.value().attr(rule.attribute) else {
                continue;
            };
            match rule.kind {
                RefKind::Single => {
                    links.extend(base.join(value).ok());
                }
                RefKind::SingleNeedsResolving => {
                    // the attribute is not a URL attribute; resolve its
                    // value like one anyway
                    links.extend(base.join(value).ok());
                }
                RefKind::SpaceSeparated => {
                    links.extend(
                        value
                            .split(is_html_whitespace)
                            .filter(|piece| !piece.is_empty())
                            .filter_map(|piece| base.join(piece).ok()),
                    );
                }
                RefKind::SrcSet => {
                    links.extend(
                        split_srcset(value)
                            .into_iter()
                            .filter_map(first_token)
                            .filter_map(|token| base.join(token).ok()),
                    );
                }
            }
        }
    }
    links
}

/// The document's base URI: an explicit `<base href>` wins over the
/// document URL.
fn effective_base(document: &Html, document_url: &Url) -> Url {
    let selector = match Selector::parse("base[href]") {
        Ok(selector) => selector,
        Err(_) => return document_url.clone(),
    };
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| document_url.join(href).ok())
        .unwrap_or_else(|| document_url.clone())
}

fn is_html_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\u{c}' | '\r' | ' ')
}

/// Splits an image candidate list on commas adjacent to whitespace. A comma
/// with no neighbouring whitespace belongs to the candidate.
fn split_srcset(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut iter = value.char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        if let Some(&(_, next)) = iter.peek() {
            if (c == ',' && is_html_whitespace(next)) || (is_html_whitespace(c) && next == ',') {
                parts.push(&value[start..i]);
                iter.next();
                start = i + c.len_utf8() + next.len_utf8();
            }
        }
    }
    parts.push(&value[start..]);
    parts
}

/// The first whitespace-delimited token of a candidate; descriptors after
/// it are discarded.
fn first_token(candidate: &str) -> Option<&str> {
    let trimmed = candidate.trim_start_matches(is_html_whitespace);
    let token = trimmed.split(is_html_whitespace).next().unwrap_or("");
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
