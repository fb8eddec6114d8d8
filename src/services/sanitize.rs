//! Output sanitization for bookmark text fields.
//!
//! Markup is filtered against an allow-list: known inline/structural tags
//! survive with a restricted attribute set, everything else is escaped so it
//! renders as text. Event handler attributes are never allowed, and `href` /
//! `src` values must use a web-safe scheme.

use crate::models::bookmark::Bookmark;

/// Tags that may pass through, with the attributes each one may keep.
const ALLOWED_TAGS: &[(&str, &[&str])] = &[
    ("a", &["href", "title", "target"]),
    ("abbr", &["title"]),
    ("b", &[]),
    ("blockquote", &["cite"]),
    ("br", &[]),
    ("code", &[]),
    ("del", &["datetime"]),
    ("em", &[]),
    ("h1", &[]),
    ("h2", &[]),
    ("h3", &[]),
    ("h4", &[]),
    ("h5", &[]),
    ("h6", &[]),
    ("hr", &[]),
    ("i", &[]),
    ("img", &["src", "alt", "title", "width", "height"]),
    ("ins", &["datetime"]),
    ("li", &[]),
    ("mark", &[]),
    ("ol", &[]),
    ("p", &[]),
    ("pre", &[]),
    ("s", &[]),
    ("small", &[]),
    ("span", &[]),
    ("strong", &[]),
    ("sub", &[]),
    ("sup", &[]),
    ("u", &[]),
    ("ul", &[]),
];

const URL_ATTRIBUTES: &[&str] = &["href", "src", "cite"];

const SAFE_URL_PREFIXES: &[&str] = &[
    "http://", "https://", "mailto:", "tel:", "#", "/", "./", "../",
];

/// Added to links that open a new browsing context.
const TARGET_REL: &str = "noopener noreferrer";

/// Sanitize the free-text fields of a bookmark.
///
/// `id`, `url` and `rating` are returned untouched.
pub fn sanitize(bookmark: Bookmark) -> Bookmark {
    Bookmark {
        title: sanitize_html(&bookmark.title),
        description: bookmark.description.as_deref().map(sanitize_html),
        ..bookmark
    }
}

/// Filter a fragment of HTML against the tag allow-list.
pub fn sanitize_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        out.push_str(&escape_text(&rest[..open]));
        let candidate = &rest[open..];

        match find_tag_end(candidate) {
            Some(end) => {
                out.push_str(&filter_tag(&candidate[..=end]));
                rest = &candidate[end + 1..];
            }
            None => {
                out.push_str("&lt;");
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(&escape_text(rest));
    out
}

/// Locate the `>` closing a tag that starts at `s[0] == '<'`.
///
/// Quoted attribute values may contain `>`. Returns `None` when another `<`
/// shows up first, in which case the opening `<` is stray text.
fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, ch) in s.char_indices().skip(1) {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '>') => return Some(idx),
            (None, '<') => return None,
            (None, _) => {}
        }
    }
    None
}

/// Rebuild an allowed tag with its permitted attributes, or escape it.
fn filter_tag(tag: &str) -> String {
    let inner = &tag[1..tag.len() - 1];
    let (closing, body) = match inner.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, inner),
    };

    let name_len = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    let name = body[..name_len].to_ascii_lowercase();

    let Some(allowed_attrs) = allowed_attributes(&name) else {
        return escape_text(tag);
    };

    if closing {
        return format!("</{name}>");
    }

    let mut rebuilt = format!("<{name}");
    let mut has_target = false;
    for (attr, value) in parse_attributes(&body[name_len..]) {
        if !allowed_attrs.contains(&attr.as_str()) {
            continue;
        }
        match value {
            Some(value) => {
                if URL_ATTRIBUTES.contains(&attr.as_str()) && !is_safe_url(&value) {
                    continue;
                }
                has_target |= attr == "target";
                rebuilt.push_str(&format!(" {attr}=\"{}\"", escape_attr(&value)));
            }
            None => {
                rebuilt.push(' ');
                rebuilt.push_str(&attr);
            }
        }
    }
    if has_target {
        rebuilt.push_str(&format!(" rel=\"{TARGET_REL}\""));
    }
    if inner.trim_end().ends_with('/') {
        rebuilt.push_str(" /");
    }
    rebuilt.push('>');
    rebuilt
}

fn allowed_attributes(name: &str) -> Option<&'static [&'static str]> {
    ALLOWED_TAGS
        .iter()
        .find(|(tag, _)| *tag == name)
        .map(|(_, attrs)| *attrs)
}

/// Split the attribute section of a tag into `(name, value)` pairs.
///
/// Names are lowercased. Values may be double-quoted, single-quoted or bare.
fn parse_attributes(s: &str) -> Vec<(String, Option<String>)> {
    let mut attrs = Vec::new();
    let mut chars = s.chars().peekable();

    loop {
        while chars
            .next_if(|c| c.is_whitespace() || *c == '/')
            .is_some()
        {}
        if chars.peek().is_none() {
            break;
        }

        let mut name = String::new();
        while let Some(c) = chars.next_if(|c| !c.is_whitespace() && !matches!(*c, '=' | '/')) {
            name.push(c.to_ascii_lowercase());
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let value = if chars.next_if_eq(&'=').is_some() {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            let mut value = String::new();
            match chars.peek().copied() {
                Some(q @ ('"' | '\'')) => {
                    chars.next();
                    for c in chars.by_ref() {
                        if c == q {
                            break;
                        }
                        value.push(c);
                    }
                }
                _ => {
                    while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                        value.push(c);
                    }
                }
            }
            Some(value)
        } else {
            None
        };

        // a bare `=value` with no name
        if name.is_empty() {
            continue;
        }
        attrs.push((name, value));
    }

    attrs
}

fn is_safe_url(value: &str) -> bool {
    let normalized: String = decode_char_refs(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    if SAFE_URL_PREFIXES.iter().any(|p| normalized.starts_with(p)) {
        return true;
    }
    // Relative paths without any scheme. A leftover `&` ahead of the path
    // is a reference we could not resolve, so it may still hide a colon.
    let head_len = normalized
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(normalized.len());
    !normalized.contains(':') && !normalized[..head_len].contains('&')
}

/// Resolve the character references a browser decodes in an attribute
/// value before it reads the URL scheme.
fn decode_char_refs(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match decode_char_ref(after) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode one reference from the text following `&`. Returns the character
/// and how many bytes it spans.
fn decode_char_ref(s: &str) -> Option<(char, usize)> {
    if s.starts_with('#') {
        let (radix, start) = match s[1..].chars().next() {
            Some('x' | 'X') => (16, 2),
            _ => (10, 1),
        };
        let digits = &s[start..];
        let len = digits
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(digits.len());
        if len == 0 {
            return None;
        }
        let code = u32::from_str_radix(&digits[..len], radix).ok()?;
        let ch = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
        let semicolon = usize::from(digits[len..].starts_with(';'));
        return Some((ch, start + len + semicolon));
    }

    let len = s
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(s.len());
    if !s[len..].starts_with(';') {
        return None;
    }
    let ch = match &s[..len] {
        "colon" => ':',
        "Tab" => '\t',
        "NewLine" => '\n',
        "sol" => '/',
        "quest" => '?',
        "num" => '#',
        "amp" => '&',
        "lpar" => '(',
        "rpar" => ')',
        _ => return None,
    };
    Some((ch, len + 1))
}

fn escape_text(s: &str) -> String {
    s.replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
