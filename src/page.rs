//! Candidate Discovery
//!
//! Finds the navigable elements of an HTML page that match a target selector
//! and extracts a title (the element's text content) and a target (its raw
//! `href` attribute) for each, in document order.
//!
//! Only the selector subset a palette needs is supported: comma-separated
//! compounds of an optional tag name followed by `.class`, `#id`, `[attr]`
//! and `[attr=value]` qualifiers. Combinators are rejected.

use crate::error::{Result, SpotlightError};
use regex::{Captures, Regex};
use serde::Serialize;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;
use std::sync::OnceLock;

/// Phrasing elements whose tags do not break the surrounding text
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "font", "i", "kbd",
    "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u", "var",
];

/// Elements that never have content
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

// ============================================================================
// Candidate
// ============================================================================

/// A navigable element found on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Display title (trimmed text content)
    pub title: String,
    /// Navigation target, passed through unvalidated
    pub target: String,
}

impl Candidate {
    pub fn new(title: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            target: target.into(),
        }
    }
}

// ============================================================================
// Selector
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Qualifier {
    Class(String),
    Id(String),
    HasAttr(String),
    AttrEquals(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    /// Lowercased tag name, `None` for `*` or a bare qualifier list
    tag: Option<String>,
    qualifiers: Vec<Qualifier>,
}

impl Compound {
    fn matches(&self, tag: &str, attrs: &[(String, String)]) -> bool {
        if let Some(ref want) = self.tag {
            if !want.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        let attr = |name: &str| {
            attrs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        };

        self.qualifiers.iter().all(|q| match q {
            Qualifier::Class(class) => attr("class")
                .map(|v| v.split_whitespace().any(|c| c == class))
                .unwrap_or(false),
            Qualifier::Id(id) => attr("id") == Some(id.as_str()),
            Qualifier::HasAttr(name) => attr(name).is_some(),
            Qualifier::AttrEquals(name, value) => attr(name) == Some(value.as_str()),
        })
    }
}

/// A parsed target selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    compounds: Vec<Compound>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self> {
        let invalid = |msg: String| SpotlightError::InvalidSelector(source.to_string(), msg);

        if source.trim().is_empty() {
            return Err(invalid("selector is empty".to_string()));
        }

        let mut chars = source.chars().peekable();
        let mut compounds = Vec::new();

        loop {
            skip_whitespace(&mut chars);
            compounds.push(parse_compound(&mut chars).map_err(invalid)?);
            skip_whitespace(&mut chars);

            match chars.next() {
                None => break,
                Some(',') => continue,
                Some(c) => {
                    return Err(invalid(format!(
                        "unsupported selector syntax near '{}' (combinators are not supported)",
                        c
                    )))
                }
            }
        }

        Ok(Self {
            source: source.to_string(),
            compounds,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn matches(&self, tag: &str, attrs: &[(String, String)]) -> bool {
        self.compounds.iter().any(|c| c.matches(tag, attrs))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || c == ':'
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

fn read_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    ident
}

fn read_value(chars: &mut Peekable<Chars<'_>>) -> std::result::Result<String, String> {
    match chars.peek().copied() {
        Some(quote @ ('"' | '\'')) => {
            chars.next();
            let mut value = String::new();
            for c in chars.by_ref() {
                if c == quote {
                    return Ok(value);
                }
                value.push(c);
            }
            Err("unterminated quoted attribute value".to_string())
        }
        _ => {
            let value = read_ident(chars);
            if value.is_empty() {
                Err("expected attribute value after '='".to_string())
            } else {
                Ok(value)
            }
        }
    }
}

fn parse_compound(chars: &mut Peekable<Chars<'_>>) -> std::result::Result<Compound, String> {
    let mut tag = None;
    let mut universal = false;
    let mut qualifiers = Vec::new();

    match chars.peek() {
        Some('*') => {
            chars.next();
            universal = true;
        }
        Some(&c) if is_ident_char(c) => tag = Some(read_ident(chars).to_ascii_lowercase()),
        _ => {}
    }

    loop {
        match chars.peek() {
            Some('.') => {
                chars.next();
                let name = read_ident(chars);
                if name.is_empty() {
                    return Err("expected class name after '.'".to_string());
                }
                qualifiers.push(Qualifier::Class(name));
            }
            Some('#') => {
                chars.next();
                let name = read_ident(chars);
                if name.is_empty() {
                    return Err("expected id after '#'".to_string());
                }
                qualifiers.push(Qualifier::Id(name));
            }
            Some('[') => {
                chars.next();
                skip_whitespace(chars);
                let name = read_ident(chars);
                if name.is_empty() {
                    return Err("expected attribute name after '['".to_string());
                }
                skip_whitespace(chars);
                match chars.next() {
                    Some(']') => qualifiers.push(Qualifier::HasAttr(name)),
                    Some('=') => {
                        skip_whitespace(chars);
                        let value = read_value(chars)?;
                        skip_whitespace(chars);
                        if chars.next() != Some(']') {
                            return Err("expected ']' after attribute value".to_string());
                        }
                        qualifiers.push(Qualifier::AttrEquals(name, value));
                    }
                    _ => return Err("unterminated attribute qualifier".to_string()),
                }
            }
            _ => break,
        }
    }

    if tag.is_none() && !universal && qualifiers.is_empty() {
        return Err("expected a tag name, '*', class, id or attribute".to_string());
    }

    Ok(Compound { tag, qualifiers })
}

// ============================================================================
// HTML scanning
// ============================================================================

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<!--.*?-->|<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
            .expect("tag pattern is valid")
    })
}

fn attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .expect("attribute pattern is valid")
    })
}

fn markup_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?is)<!--.*?-->|<(script|style)\b[^>]*>.*?</(?:script|style)\s*>|</?([a-zA-Z][a-zA-Z0-9-]*)[^>]*>|<[^>]*>",
        )
        .expect("markup pattern is valid")
    })
}

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("entity pattern is valid")
    })
}

/// A start or end tag found in the document
struct Tag {
    start: usize,
    end: usize,
    closing: bool,
    self_closing: bool,
    name: String,
    attrs: Vec<(String, String)>,
}

fn scan_tags(html: &str) -> Vec<Tag> {
    tag_regex()
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(2)?.as_str().to_ascii_lowercase();
            let raw_attrs = caps.get(3).map(|m| m.as_str()).unwrap_or("");
            Some(Tag {
                start: whole.start(),
                end: whole.end(),
                closing: caps.get(1).is_some_and(|m| !m.as_str().is_empty()),
                self_closing: raw_attrs.trim_end().ends_with('/'),
                name,
                attrs: parse_attrs(raw_attrs),
            })
        })
        .collect()
}

fn parse_attrs(raw: &str) -> Vec<(String, String)> {
    attr_regex()
        .captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            Some((name, value))
        })
        .collect()
}

/// Byte offset where the content of the element opened by `tags[index]` ends
fn content_end(html: &str, tags: &[Tag], index: usize) -> usize {
    let open = &tags[index];
    let mut depth = 1usize;

    for tag in &tags[index + 1..] {
        if tag.name != open.name {
            continue;
        }
        if tag.closing {
            depth -= 1;
            if depth == 0 {
                return tag.start;
            }
        } else if !tag.self_closing {
            depth += 1;
        }
    }

    html.len()
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    entity_regex()
        .replace_all(text, |caps: &Captures<'_>| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };

            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Text content of a fragment: markup stripped, entities decoded,
/// whitespace collapsed and trimmed. Tags other than inline phrasing
/// elements separate words; script and style bodies are dropped.
fn text_content(fragment: &str) -> String {
    let stripped = markup_regex().replace_all(fragment, |caps: &Captures<'_>| {
        match caps.get(2) {
            Some(name) if INLINE_ELEMENTS.contains(&name.as_str().to_ascii_lowercase().as_str()) => "",
            Some(_) => " ",
            None => "",
        }
    });
    let decoded = decode_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Enumerate every element matching `selector`, in document order
pub fn discover(html: &str, selector: &Selector) -> Vec<Candidate> {
    let tags = scan_tags(html);
    let mut candidates = Vec::new();

    for (index, tag) in tags.iter().enumerate() {
        if tag.closing || !selector.matches(&tag.name, &tag.attrs) {
            continue;
        }

        let title = if tag.self_closing || VOID_ELEMENTS.contains(&tag.name.as_str()) {
            String::new()
        } else {
            text_content(&html[tag.end..content_end(html, &tags, index)])
        };

        let target = match tag.attrs.iter().find(|(k, _)| k == "href") {
            Some((_, href)) => href.clone(),
            None => {
                tracing::debug!(element = %tag.name, title = %title, "candidate has no href");
                String::new()
            }
        };

        candidates.push(Candidate { title, target });
    }

    tracing::debug!(selector = %selector.as_str(), count = candidates.len(), "discovered candidates");
    candidates
}

/// Read an HTML page from disk
pub fn load_page(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| SpotlightError::PageReadError(path.display().to_string(), e))
}
