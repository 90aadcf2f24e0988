//! Format-specific reference scanners
//!
//! Each scanner takes the URL of the document it is scanning plus the
//! document text, and returns the absolute candidate URLs it found. The
//! crawl engine picks the scanner from the response's Content-Type.

pub mod css;
pub mod html;
pub mod js;
pub mod unescape;

use url::Url;

/// Strips any `;` parameter suffix from a Content-Type value and
/// case-folds it.
///
/// # Example
///
/// ```
/// use sitefold::scan::media_type_essence;
///
/// assert_eq!(media_type_essence("Text/HTML; charset=utf-8"), "text/html");
/// ```
pub fn media_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase()
}

/// Dispatches a document body to the scanner for its media type.
///
/// Returns `None` for media types that are stored but not scanned.
pub fn scan_links(content_type: &str, document_url: &Url, body: &str) -> Option<Vec<Url>> {
    match media_type_essence(content_type).as_str() {
        "text/html" => Some(html::scan(document_url, body)),
        "text/css" => Some(css::scan(document_url, body)),
        "application/javascript" => Some(js::scan(document_url, body)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn essence_strips_parameters_and_case() {
        assert_eq!(media_type_essence("text/html"), "text/html");
        assert_eq!(media_type_essence("Text/CSS ; charset=utf-8"), "text/css");
        assert_eq!(media_type_essence("APPLICATION/JAVASCRIPT"), "application/javascript");
    }

    #[test]
    fn unknown_types_are_not_scanned() {
        let url = Url::parse("https://example.net/a.bin").unwrap();
        assert!(scan_links("application/octet-stream", &url, "url(x.png)").is_none());
        assert!(scan_links("image/png", &url, "").is_none());
    }

    #[test]
    fn dispatch_by_media_type() {
        let url = Url::parse("https://example.net/dir/doc").unwrap();
        let html = scan_links("text/html; charset=utf-8", &url, "<img src=\"i.png\">").unwrap();
        assert_eq!(html[0].as_str(), "https://example.net/dir/i.png");

        let css = scan_links("text/css", &url, "a{background:url(b.png)}").unwrap();
        assert_eq!(css[0].as_str(), "https://example.net/dir/b.png");

        let js = scan_links("application/javascript", &url, "import \"c.js\";").unwrap();
        assert_eq!(js[0].as_str(), "https://example.net/dir/c.js");
    }
}
