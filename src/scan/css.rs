//! CSS reference extractor
//!
//! Finds `url(...)` functional notation in stylesheet text. Comments and
//! whitespace are normalized first; the normalization is not string-aware,
//! so comment-like or multi-space sequences inside quoted values are
//! normalized too — an accepted approximation.

use crate::scan::unescape::decode_css_escapes;
use url::Url;

/// Extracts the URLs referenced by `url(...)` tokens in `body`, resolved
/// against `base` (the stylesheet's own URL).
pub fn scan(base: &Url, body: &str) -> Vec<Url> {
    let text = collapse_whitespace(&strip_comments(body));
    let mut links = Vec::new();
    let mut search = 0;
    while let Some(found) = text[search..].find("url(") {
        let start = search + found;
        // `url` must not be the tail of a longer identifier
        if text[..start].chars().next_back().map_or(false, is_word_char) {
            search = start + 4;
            continue;
        }
        match match_url_value(&text[start + 4..]) {
            Some((raw, consumed)) => {
                if let Some(value) = parse_quoted_value(raw) {
                    if let Ok(url) = base.join(&value) {
                        links.push(url);
                    }
                }
                search = start + 4 + consumed;
            }
            None => search = start + 4,
        }
    }
    links
}

/// Replaces every `/* ... */` comment with one space. An unterminated
/// comment extends to end of input.
fn strip_comments(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        out.push(' ');
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Collapses every run of CSS whitespace to a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}') {
            in_run = true;
        } else {
            if in_run {
                out.push(' ');
                in_run = false;
            }
            out.push(c);
        }
    }
    if in_run {
        out.push(' ');
    }
    out
}

/// Matches the value and closing parenthesis after a `url(` token.
///
/// Returns the raw value (quotes included, when present) and the number of
/// bytes consumed up to and including the `)`.
fn match_url_value(rest: &str) -> Option<(&str, usize)> {
    let mut pos = 0;
    if rest[pos..].starts_with(' ') {
        pos += 1;
    }
    let value_start = pos;

    // Quoted value first; when it does not close properly, fall through and
    // let the unquoted scan pick the quote up as an ordinary character so
    // the mismatch is discarded by `parse_quoted_value`.
    if let Some(quote) = rest[pos..].chars().next().filter(|q| matches!(q, '"' | '\'')) {
        if let Some(end) = find_closing_quote(&rest[pos + 1..], quote) {
            let after = pos + 1 + end + quote.len_utf8();
            let mut close = after;
            if rest[close..].starts_with(' ') {
                close += 1;
            }
            if rest[close..].starts_with(')') {
                return Some((&rest[value_start..after], close + 1));
            }
        }
    }

    // Unquoted value: a backslash escapes any next character; an unescaped
    // space or `)` terminates.
    let mut end = None;
    let mut iter = rest[value_start..].char_indices();
    while let Some((i, c)) = iter.next() {
        match c {
            '\\' => {
                iter.next();
            }
            ' ' | ')' => {
                end = Some(value_start + i);
                break;
            }
            _ => {}
        }
    }
    let end = end?;
    let mut close = end;
    if rest[close..].starts_with(' ') {
        close += 1;
    }
    if !rest[close..].starts_with(')') {
        return None;
    }
    Some((&rest[value_start..end], close + 1))
}

/// Byte index of the closing quote within `s`, honouring backslash escapes.
fn find_closing_quote(s: &str, quote: char) -> Option<usize> {
    let mut iter = s.char_indices();
    while let Some((i, c)) = iter.next() {
        match c {
            '\\' => {
                iter.next();
            }
            c if c == quote => return Some(i),
            _ => {}
        }
    }
    None
}

/// Validates quoting and decodes CSS escapes. A value that opens with a
/// quote must close with the same quote or it is discarded.
fn parse_quoted_value(raw: &str) -> Option<String> {
    let mut value = raw;
    if let Some(quote) = value.chars().next().filter(|q| matches!(q, '"' | '\'')) {
        if value.len() < 2 || !value.ends_with(quote) {
            return None;
        }
        value = &value[1..value.len() - quote.len_utf8()];
    }
    Some(decode_css_escapes(value))
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.net/site/styles/main.css").unwrap()
    }

    fn scan_strings(body: &str) -> Vec<String> {
        scan(&base(), body).iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn unquoted_value() {
        assert_eq!(
            scan_strings(".a{background:url(a.png)}"),
            vec!["https://example.net/site/styles/a.png"]
        );
    }

    #[test]
    fn quoted_value_with_hex_escape_and_padding() {
        assert_eq!(
            scan_strings(".a{background:url( 'img/x\\2e png' )}"),
            vec!["https://example.net/site/styles/img/x.png"]
        );
    }

    #[test]
    fn double_quoted_value() {
        assert_eq!(
            scan_strings("@font-face{src:url(\"../fonts/a.woff2\")}"),
            vec!["https://example.net/site/fonts/a.woff2"]
        );
    }

    #[test]
    fn comment_is_stripped() {
        assert_eq!(
            scan_strings("/* url(commented.png) */ .x{background:url(real.png)}"),
            vec!["https://example.net/site/styles/real.png"]
        );
    }

    #[test]
    fn unterminated_comment_swallows_rest() {
        assert_eq!(scan_strings(".x{} /* url(gone.png)"), Vec::<String>::new());
    }

    #[test]
    fn mismatched_quotes_are_discarded() {
        assert_eq!(scan_strings(".x{background:url('a.png\")}"), Vec::<String>::new());
    }

    #[test]
    fn missing_close_paren_is_discarded() {
        assert_eq!(scan_strings(".x{background:url(a.png"), Vec::<String>::new());
    }

    #[test]
    fn unquoted_value_with_space_is_discarded() {
        assert_eq!(scan_strings(".x{background:url(a b.png)}"), Vec::<String>::new());
    }

    #[test]
    fn quoted_value_may_contain_spaces() {
        assert_eq!(
            scan_strings(".x{background:url('a b.png')}"),
            vec!["https://example.net/site/styles/a%20b.png"]
        );
    }

    #[test]
    fn multiple_urls() {
        let urls = scan_strings(".a{background:url(a.png)} .b{background:url('b.png')}");
        assert_eq!(
            urls,
            vec![
                "https://example.net/site/styles/a.png",
                "https://example.net/site/styles/b.png"
            ]
        );
    }

    #[test]
    fn url_token_requires_word_boundary() {
        assert_eq!(scan_strings(".x{background:kurl(a.png)}"), Vec::<String>::new());
    }

    #[test]
    fn newlines_collapse_inside_notation() {
        assert_eq!(
            scan_strings(".x{background:url(\n'a.png'\n)}"),
            vec!["https://example.net/site/styles/a.png"]
        );
    }
}
