//! JavaScript reference extractor
//!
//! Finds candidate resource URLs in script text: the module specifiers of
//! static `import` declarations, and free-standing string literals whose
//! content looks like a resource path. This is approximate lexing, not a
//! parser: comments are stripped without regard to string contents, and a
//! `/` is classified as regex-or-division from the token preceding it, a
//! heuristic that cannot resolve every ambiguity a full parser would.
//!
//! Known limitation: `${...}` interpolations inside template literals are
//! not understood; a nested string or backtick inside one can derail the
//! scan.

use crate::scan::unescape::decode_js_string;
use url::Url;

/// Keywords after which a `/` starts a regular-expression literal.
const REGEX_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "continue",
    "delete",
    "do",
    "else",
    "finally",
    "in",
    "instanceof",
    "return",
    "throw",
    "try",
    "typeof",
    "void",
];

/// Punctuators after which a `/` starts a regular-expression literal.
const REGEX_PUNCTUATORS: &[char] = &[
    '/', ',', '*', '!', '%', '&', '(', ':', ';', '<', '>', '?', '[', '^', '{', '|', '}', '~',
];

/// Extracts the URLs referenced by `body`, resolved against `base` (the
/// script's own URL).
///
/// Two scans run over the normalized text: static import declarations, then
/// free-standing string literals filtered by a file-extension heuristic.
pub fn scan(base: &Url, body: &str) -> Vec<Url> {
    let text = collapse_whitespace(&strip_comments(body));
    let mut links = Vec::new();
    for raw in import_specifiers(&text) {
        if let Some(value) = decode_js_string(raw) {
            if let Ok(url) = base.join(&value) {
                links.push(url);
            }
        }
    }
    for raw in quoted_strings(&text) {
        let Some(value) = decode_js_string(raw) else {
            continue;
        };
        if !has_resource_extension(&value) {
            continue;
        }
        if let Ok(url) = base.join(&value) {
            links.push(url);
        }
    }
    links
}

/// Replaces `//` line comments and `/* */` block comments with one space.
/// An unterminated block comment extends to end of input. Not string-aware.
fn strip_comments(body: &str) -> String {
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '/' {
            match chars.get(i + 1) {
                Some('/') => {
                    i += 2;
                    while i < chars.len() && !is_line_terminator(chars[i]) {
                        i += 1;
                    }
                    out.push(' ');
                    continue;
                }
                Some('*') => {
                    i += 2;
                    while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                        i += 1;
                    }
                    i = (i + 2).min(chars.len());
                    out.push(' ');
                    continue;
                }
                _ => {}
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Collapses whitespace runs: a run containing a line terminator becomes a
/// single `\n`, any other run a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    let mut has_terminator = false;
    for c in text.chars() {
        if is_line_terminator(c) {
            in_run = true;
            has_terminator = true;
        } else if is_horizontal_whitespace(c) {
            in_run = true;
        } else {
            if in_run {
                out.push(if has_terminator { '\n' } else { ' ' });
                in_run = false;
                has_terminator = false;
            }
            out.push(c);
        }
    }
    if in_run {
        out.push(if has_terminator { '\n' } else { ' ' });
    }
    out
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_horizontal_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\u{b}' | '\u{c}' | '\u{feff}') || is_space_separator(c)
}

/// Unicode `Space_Separator` (Zs) category.
fn is_space_separator(c: char) -> bool {
    matches!(
        c,
        ' ' | '\u{a0}' | '\u{1680}' | '\u{2000}'..='\u{200a}' | '\u{202f}' | '\u{205f}' | '\u{3000}'
    )
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '$' || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '$' || c == '_' || matches!(c, '\u{200c}' | '\u{200d}')
}

/// Resource-path heuristic: the value ends in a dot followed by one to four
/// alphanumerics.
fn has_resource_extension(value: &str) -> bool {
    let mut run = 0;
    for c in value.chars().rev() {
        if c.is_ascii_alphanumeric() {
            run += 1;
            if run > 4 {
                return false;
            }
        } else {
            return c == '.' && run >= 1;
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Character cursor shared by both scanning phases

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// One space or newline (runs are single characters after normalization).
    fn eat_ws(&mut self) -> bool {
        self.eat(' ') || self.eat('\n')
    }

    fn eat_literal(&mut self, lit: &str) -> bool {
        if self.text[self.pos..].starts_with(lit) {
            self.pos += lit.len();
            true
        } else {
            false
        }
    }

    /// A literal that must not run into a longer identifier.
    fn eat_keyword(&mut self, kw: &str) -> bool {
        let save = self.pos;
        if !self.eat_literal(kw) {
            return false;
        }
        if self.peek().map_or(false, is_identifier_continue) {
            self.pos = save;
            return false;
        }
        true
    }
}

/// Eats a quoted string literal, returning the raw text including quotes.
/// An unterminated literal runs to end of input (the decoder rejects it).
fn eat_string<'a>(c: &mut Cursor<'a>) -> Option<&'a str> {
    let start = c.pos;
    let quote = match c.peek() {
        Some(q @ ('"' | '\'')) => q,
        _ => return None,
    };
    c.bump();
    loop {
        match c.bump() {
            None => break,
            Some('\\') => {
                c.bump();
            }
            Some(ch) if ch == quote => break,
            Some(_) => {}
        }
    }
    Some(&c.text[start..c.pos])
}

// ---------------------------------------------------------------------------
// Phase A: static import declarations

/// Module specifiers of every complete static import statement. Statements
/// are anchored at the start of input or just after `;`/`\n`, and must end
/// at end of input or before `;`/`\n`.
fn import_specifiers(text: &str) -> Vec<&str> {
    let mut specs = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i <= text.len() {
        let at_boundary = i == 0 || matches!(bytes[i - 1], b';' | b'\n');
        if at_boundary {
            if let Some((spec, end)) = parse_import(text, i) {
                specs.push(spec);
                i = end.max(i + 1);
                continue;
            }
        }
        match bytes[i..].iter().position(|&b| b == b';' || b == b'\n') {
            Some(offset) => i += offset + 1,
            None => break,
        }
    }
    specs
}

/// Parses one static import statement starting at `start`. Returns the raw
/// module specifier and the position just past the statement.
fn parse_import(text: &str, start: usize) -> Option<(&str, usize)> {
    let mut c = Cursor { text, pos: start };
    c.eat(' ');
    if !c.eat_keyword("import") {
        return None;
    }

    let bare = c.pos;
    if !eat_binding_and_from(&mut c) {
        c.pos = bare;
    }
    c.eat_ws();
    let spec = eat_string(&mut c)?;
    c.eat(' ');
    match c.peek() {
        None | Some(';') | Some('\n') => Some((spec, c.pos)),
        _ => None,
    }
}

/// The import binding clause plus the `from` keyword: a default import, a
/// namespace import, a named list, or a default combined with either.
fn eat_binding_and_from(c: &mut Cursor) -> bool {
    let save = c.pos;

    // default import alone: `import name from "..."`
    if c.eat_ws() && eat_identifier(c) && eat_from(c) {
        return true;
    }
    c.pos = save;

    // optional `name ,` prefix, then `* as name` or `{ ... }`
    {
        let prefix = c.pos;
        if c.eat_ws() && eat_identifier(c) {
            c.eat_ws();
            if !c.eat(',') {
                c.pos = prefix;
            }
        } else {
            c.pos = prefix;
        }
    }
    if eat_namespace_or_named(c) && eat_from(c) {
        return true;
    }
    c.pos = save;
    false
}

fn eat_namespace_or_named(c: &mut Cursor) -> bool {
    let save = c.pos;
    c.eat_ws();
    if c.eat('*') {
        c.eat_ws();
        if c.eat_literal("as") && c.eat_ws() && eat_identifier(c) {
            return true;
        }
        c.pos = save;
        return false;
    }
    if c.eat('{') {
        loop {
            let item = c.pos;
            c.eat_ws();
            if !eat_import_specifier(c) {
                c.pos = item;
                break;
            }
            c.eat_ws();
            if !c.eat(',') {
                break;
            }
        }
        c.eat_ws();
        if c.eat('}') {
            return true;
        }
        c.pos = save;
        return false;
    }
    c.pos = save;
    false
}

/// One entry of a named-import list: `name`, `name as other`, or
/// `"string" as other`.
fn eat_import_specifier(c: &mut Cursor) -> bool {
    let save = c.pos;
    if eat_identifier(c) {
        let plain = c.pos;
        if c.eat_ws() && c.eat_literal("as") && c.eat_ws() && eat_identifier(c) {
            return true;
        }
        c.pos = plain;
        return true;
    }
    if eat_string(c).is_some() {
        c.eat_ws();
        if c.eat_literal("as") && c.eat_ws() && eat_identifier(c) {
            return true;
        }
        c.pos = save;
        return false;
    }
    false
}

/// `from`, separated from the binding by one whitespace or a word boundary.
fn eat_from(c: &mut Cursor) -> bool {
    let save = c.pos;
    if !c.eat_ws() {
        let prev = c.text[..c.pos].chars().next_back();
        if prev.map_or(true, is_word_char) {
            return false;
        }
    }
    if !c.eat_literal("from") {
        c.pos = save;
        return false;
    }
    true
}

/// An identifier: `$`, `_`, Unicode letters/digits, or `\uXXXX`/`\u{..}`
/// escapes.
fn eat_identifier(c: &mut Cursor) -> bool {
    if !eat_identifier_char(c, true) {
        return false;
    }
    while eat_identifier_char(c, false) {}
    true
}

fn eat_identifier_char(c: &mut Cursor, start: bool) -> bool {
    let save = c.pos;
    match c.peek() {
        Some('\\') => {
            c.bump();
            if !c.eat('u') {
                c.pos = save;
                return false;
            }
            if c.eat('{') {
                let mut digits = 0;
                while c.peek().map_or(false, |ch| ch.is_ascii_hexdigit()) {
                    c.bump();
                    digits += 1;
                }
                if digits == 0 || !c.eat('}') {
                    c.pos = save;
                    return false;
                }
            } else {
                for _ in 0..4 {
                    if !c.peek().map_or(false, |ch| ch.is_ascii_hexdigit()) {
                        c.pos = save;
                        return false;
                    }
                    c.bump();
                }
            }
            true
        }
        Some(ch) if (start && is_identifier_start(ch)) || (!start && is_identifier_continue(ch)) => {
            c.bump();
            true
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Phase B: free string scan

/// Every double- or single-quoted string literal in `text`. Template
/// literals and regular-expression literals are consumed so their contents
/// are skipped, but they are not reported.
fn quoted_strings(text: &str) -> Vec<&str> {
    let mut strings = Vec::new();
    let mut c = Cursor { text, pos: 0 };
    while let Some(ch) = c.peek() {
        match ch {
            '"' | '\'' => {
                if let Some(raw) = eat_string(&mut c) {
                    strings.push(raw);
                }
            }
            '`' => eat_template(&mut c),
            '/' => {
                if !regex_can_follow(&text[..c.pos]) || !eat_regex(&mut c) {
                    c.bump();
                }
            }
            _ => {
                c.bump();
            }
        }
    }
    strings
}

/// Consumes a template literal through its closing backtick (or end of
/// input). `${...}` interpolations are not interpreted.
fn eat_template(c: &mut Cursor) {
    c.bump();
    loop {
        match c.bump() {
            None => break,
            Some('\\') => {
                c.bump();
            }
            Some('`') => break,
            Some(_) => {}
        }
    }
}

/// Consumes a regular-expression literal, honouring character classes and
/// escapes. Returns false (cursor restored) when no terminating `/` exists.
fn eat_regex(c: &mut Cursor) -> bool {
    let save = c.pos;
    c.bump();
    loop {
        match c.bump() {
            None => {
                c.pos = save;
                return false;
            }
            Some('\\') => {
                c.bump();
            }
            Some('[') => loop {
                match c.bump() {
                    None => {
                        c.pos = save;
                        return false;
                    }
                    Some('\\') => {
                        c.bump();
                    }
                    Some(']') => break,
                    Some(_) => {}
                }
            },
            Some('/') => return true,
            Some(_) => {}
        }
    }
}

/// Decides whether a `/` ending `prefix` would start a regular expression
/// rather than a division operator, from the preceding token alone.
fn regex_can_follow(prefix: &str) -> bool {
    let mut chars = prefix.chars().rev();
    let Some(mut last) = chars.next() else {
        return true;
    };
    if last == ' ' || last == '\n' {
        match chars.next() {
            None => return true,
            Some(c) => last = c,
        }
    }
    if REGEX_PUNCTUATORS.contains(&last) {
        return true;
    }
    if last == '+' || last == '-' {
        // a sign counts only after whitespace or a word boundary, which
        // rules out the second half of `++`/`--`
        return chars
            .next()
            .map_or(false, |p| p == ' ' || p == '\n' || is_word_char(p));
    }
    if is_word_char(last) {
        let mut word = vec![last];
        for p in chars {
            if is_word_char(p) {
                word.push(p);
            } else {
                break;
            }
        }
        let word: String = word.into_iter().rev().collect();
        return REGEX_KEYWORDS.contains(&word.as_str());
    }
    false
}
