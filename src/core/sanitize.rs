//! Allowlist sanitizer for the rich-text bio.
//!
//! The bio editor produces a small subset of HTML. Everything outside that
//! subset is unwrapped to its text, except for elements whose content is
//! executable or invisible, which are dropped whole.

use regex::Regex;
use std::sync::OnceLock;

/// Formatting tags kept in a sanitized bio
const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "b", "strong", "i", "em", "u", "s", "ul", "ol", "li", "h1", "h2", "h3",
    "blockquote", "a",
];

/// Elements removed together with everything between their open and close tags
const DROPPED_WITH_CONTENT: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template",
];

const SAFE_URL_PREFIXES: &[&str] = &["http://", "https://", "mailto:"];

static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();
static ATTR_PATTERN: OnceLock<Regex> = OnceLock::new();
static ENTITY_PATTERN: OnceLock<Regex> = OnceLock::new();

// Comments, or a tag whose attributes may contain quoted `>`.
fn tag_pattern() -> &'static Regex {
    TAG_PATTERN.get_or_init(|| {
        Regex::new(r#"(?s)<!--.*?-->|<(/?)([a-zA-Z][a-zA-Z0-9]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
            .expect("tag pattern is valid")
    })
}

// One attribute name with its optional value.
fn attr_pattern() -> &'static Regex {
    ATTR_PATTERN.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*(?:=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
            .expect("attribute pattern is valid")
    })
}

fn entity_pattern() -> &'static Regex {
    ENTITY_PATTERN.get_or_init(|| {
        Regex::new(r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("entity pattern is valid")
    })
}

/// Sanitize bio HTML before it is stored
///
/// # Examples
///
/// ```
/// use iso_profiles::core::sanitize::sanitize_bio;
///
/// let dirty = r#"<p onclick="steal()">Salaam!</p><script>alert(1)</script>"#;
/// assert_eq!(sanitize_bio(dirty), "<p>Salaam!</p>");
/// ```
pub fn sanitize_bio(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;

    while let Some(caps) = tag_pattern().captures_at(html, pos) {
        let Some(whole) = caps.get(0) else { break };
        out.push_str(&escape_text(&html[pos..whole.start()]));
        pos = whole.end();

        // Comments have no tag name
        let Some(name) = caps.get(2) else { continue };
        let name = name.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());

        if DROPPED_WITH_CONTENT.contains(&name.as_str()) {
            if !closing {
                pos = skip_past_close(html, pos, &name);
            }
            continue;
        }

        if !ALLOWED_TAGS.contains(&name.as_str()) {
            continue;
        }

        match (name.as_str(), closing) {
            ("br", true) => {}
            ("br", false) => out.push_str("<br>"),
            (_, true) => {
                out.push_str("</");
                out.push_str(&name);
                out.push('>');
            }
            ("a", false) => {
                let attrs = caps.get(3).map_or("", |m| m.as_str());
                match safe_href(attrs) {
                    Some(href) => {
                        out.push_str("<a href=\"");
                        out.push_str(&escape_attr(&href));
                        out.push_str("\">");
                    }
                    None => out.push_str("<a>"),
                }
            }
            (_, false) => {
                out.push('<');
                out.push_str(&name);
                out.push('>');
            }
        }
    }

    out.push_str(&escape_text(&html[pos..]));
    out
}

/// Number of visible characters in a bio once markup is stripped
///
/// Character references such as `&amp;` count as one character.
pub fn visible_text_len(html: &str) -> usize {
    let clean = sanitize_bio(html);
    let text = tag_pattern().replace_all(&clean, "");
    entity_pattern().replace_all(&text, "_").chars().count()
}

/// Whether a link target uses a protocol allowed in bios
pub fn is_safe_url(url: &str) -> bool {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();

    if url.starts_with('#') || (url.starts_with('/') && !url.starts_with("//")) {
        return true;
    }

    SAFE_URL_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

/// Decoded value of the first `href` attribute, if its target is safe
fn safe_href(attrs: &str) -> Option<String> {
    let caps = attr_pattern()
        .captures_iter(attrs)
        .find(|caps| caps.get(1).is_some_and(|name| name.as_str().eq_ignore_ascii_case("href")))?;
    let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4))?;
    let href = decode_entities(value.as_str());
    let href = href.trim();
    is_safe_url(href).then(|| href.to_string())
}

/// Resolve character references; unknown named references are left as written
fn decode_entities(value: &str) -> String {
    entity_pattern()
        .replace_all(value, |caps: &regex::Captures<'_>| {
            let reference = &caps[0];
            decode_reference(&reference[1..reference.len() - 1])
                .map(String::from)
                .unwrap_or_else(|| reference.to_string())
        })
        .into_owned()
}

fn decode_reference(body: &str) -> Option<char> {
    if let Some(number) = body.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "colon" => Some(':'),
        "sol" => Some('/'),
        "tab" => Some('\t'),
        "newline" => Some('\n'),
        _ => None,
    }
}

/// Byte offset just past `</name ...>`, or the end of input if it never closes
fn skip_past_close(html: &str, from: usize, name: &str) -> usize {
    // ASCII lowercasing keeps byte offsets stable
    let rest = html[from..].to_ascii_lowercase();
    let needle = format!("</{}", name);

    match rest.find(&needle) {
        Some(start) => match rest[start..].find('>') {
            Some(end) => from + start + end + 1,
            None => html.len(),
        },
        None => html.len(),
    }
}

fn escape_text(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_formatting() {
        let html = "<p>Practicing <strong>Muslim</strong>, loves <em>hiking</em></p><ul><li>one</li></ul>";
        assert_eq!(sanitize_bio(html), html);
    }

    #[test]
    fn test_drops_script_with_content() {
        assert_eq!(
            sanitize_bio("<p>hi</p><SCRIPT type=\"x\">alert('x')</SCRIPT><p>there</p>"),
            "<p>hi</p><p>there</p>"
        );
    }

    #[test]
    fn test_unclosed_script_drops_rest() {
        assert_eq!(sanitize_bio("<p>hi</p><script>alert(1)"), "<p>hi</p>");
    }

    #[test]
    fn test_strips_attributes_and_handlers() {
        assert_eq!(
            sanitize_bio(r#"<p class="x" onmouseover="alert(1)">text</p>"#),
            "<p>text</p>"
        );
    }

    #[test]
    fn test_quoted_gt_inside_attribute() {
        assert_eq!(sanitize_bio(r#"<p title="a>b">text</p>"#), "<p>text</p>");
    }

    #[test]
    fn test_unwraps_unknown_tags() {
        assert_eq!(sanitize_bio("<div><span>kept</span></div>"), "kept");
    }

    #[test]
    fn test_links() {
        assert_eq!(
            sanitize_bio(r#"<a href="https://example.com" target="_blank">site</a>"#),
            r#"<a href="https://example.com">site</a>"#
        );
        assert_eq!(
            sanitize_bio(r#"<a href="javascript:alert(1)">x</a>"#),
            "<a>x</a>"
        );
        assert_eq!(sanitize_bio("<a href=/about>x</a>"), r#"<a href="/about">x</a>"#);
    }

    #[test]
    fn test_link_query_string_keeps_single_escape() {
        let html = r#"<a href="https://example.com/?a=1&amp;b=2">x</a>"#;
        assert_eq!(sanitize_bio(html), html);
        assert_eq!(
            sanitize_bio("<a href='https://example.com/?a=1&b=2'>x</a>"),
            html
        );
    }

    #[test]
    fn test_sanitizing_twice_changes_nothing() {
        let inputs = [
            r#"<a href="https://example.com/?a=1&amp;b=2&quot;" onclick="x()">x</a>"#,
            r#"<p title="a>b">3 < 5 &amp; 7 > 2</p><script>alert(1)</script>"#,
            "<div>a<br/>b</div><a href=javascript:alert(1)>no</a>",
        ];
        for html in inputs {
            let once = sanitize_bio(html);
            assert_eq!(sanitize_bio(&once), once, "input: {}", html);
        }
    }

    #[test]
    fn test_encoded_scheme_is_checked_after_decoding() {
        assert_eq!(
            sanitize_bio("<a href=\"&#106;avascript&colon;alert(1)\">x</a>"),
            "<a>x</a>"
        );
        assert_eq!(
            sanitize_bio("<a href=\"&#x68;ttps://example.com\">x</a>"),
            r#"<a href="https://example.com">x</a>"#
        );
    }

    #[test]
    fn test_href_taken_only_from_href_attribute() {
        assert_eq!(
            sanitize_bio(r#"<a title="see href=https://decoy.example" href="https://real.example">x</a>"#),
            r#"<a href="https://real.example">x</a>"#
        );
        assert_eq!(
            sanitize_bio(r#"<a data-href="https://decoy.example">x</a>"#),
            "<a>x</a>"
        );
        assert_eq!(
            sanitize_bio(r#"<a HREF="https://real.example" href="https://second.example">x</a>"#),
            r#"<a href="https://real.example">x</a>"#
        );
    }

    #[test]
    fn test_comments_removed_and_stray_brackets_escaped() {
        assert_eq!(sanitize_bio("a<!-- hidden -->b"), "ab");
        assert_eq!(sanitize_bio("3 < 5 and 7 > 2"), "3 &lt; 5 and 7 &gt; 2");
    }

    #[test]
    fn test_br_normalized() {
        assert_eq!(sanitize_bio("a<br/>b<BR>c</br>"), "a<br>b<br>c");
    }

    #[test]
    fn test_visible_text_len() {
        assert_eq!(visible_text_len("<p>abc</p><p>de</p>"), 5);
        assert_eq!(visible_text_len("<p>a &amp; b</p>"), 5);
        assert_eq!(visible_text_len("<script>long hidden text</script>x"), 1);
    }

    #[test]
    fn test_is_safe_url() {
        assert!(is_safe_url("https://reddit.com/u/someone"));
        assert!(is_safe_url("mailto:someone@example.com"));
        assert!(is_safe_url("#top"));
        assert!(!is_safe_url("//evil.example"));
        assert!(!is_safe_url("data:text/html,<b>x</b>"));
        assert!(!is_safe_url("JAVASCRIPT:alert(1)"));
    }
}
