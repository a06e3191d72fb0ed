//! Matchable Entries
//!
//! Each [`Entry`] wraps one candidate link and tests itself against a compiled
//! [`Pattern`]. A pattern matches when every query character appears in the
//! title, in order, ignoring case. Matching is a plain character scan, so
//! characters such as `.`, `*` or `(` in a query are always literal.

use crate::page::Candidate;
use crate::surface::Navigator;
use std::ops::Range;

// ============================================================================
// Pattern
// ============================================================================

/// Lowercase a single character.
///
/// Characters whose lowercase form expands to several code points are kept
/// as-is; matching is not locale aware.
#[inline]
fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// A compiled subsequence pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Query text as typed
    source: String,
    /// Case-folded query characters
    folded: Vec<char>,
}

impl Pattern {
    /// Compile a query. Returns `None` for the empty query, which never
    /// reaches the matcher.
    pub fn compile(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }

        Some(Self {
            source: query.to_string(),
            folded: query.chars().map(fold).collect(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, title: &str) -> bool {
        self.captures(title).is_some()
    }

    /// Locate every query character in `title`.
    ///
    /// When a character occurs several times, the latest occurrence that still
    /// leaves room for the rest of the query is captured. Scanning from the end
    /// of both strings gives exactly that embedding in one pass.
    pub fn captures(&self, title: &str) -> Option<Captures> {
        let mut hits: Vec<Range<usize>> = Vec::with_capacity(self.folded.len());
        let mut wanted = self.folded.iter().rev().peekable();

        for (pos, c) in title.char_indices().rev() {
            match wanted.peek() {
                Some(&&w) if fold(c) == w => {
                    hits.push(pos..pos + c.len_utf8());
                    wanted.next();
                }
                Some(_) => {}
                None => break,
            }
        }

        if wanted.peek().is_some() {
            return None;
        }

        hits.reverse();

        let mut spans = Vec::with_capacity(hits.len() * 2 + 1);
        let mut cursor = 0;
        for hit in hits {
            spans.push(cursor..hit.start);
            cursor = hit.end;
            spans.push(hit);
        }
        spans.push(cursor..title.len());

        Some(Captures { spans })
    }
}

// ============================================================================
// Captures
// ============================================================================

/// Byte spans of a successful match.
///
/// Spans alternate between the text before a matched character and the
/// matched character itself, ending with the trailing text:
/// `gap, char, gap, char, ..., char, gap`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures {
    spans: Vec<Range<usize>>,
}

impl Captures {
    pub fn spans(&self) -> &[Range<usize>] {
        &self.spans
    }

    /// Spans of the matched query characters only
    pub fn matched(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.spans.iter().skip(1).step_by(2).cloned()
    }

    /// Captured text for every span, gaps included
    pub fn texts<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.spans.iter().map(move |span| &title[span.clone()])
    }

    /// Build the highlighted rendering of `title`
    pub fn highlight(&self, title: &str) -> Highlight {
        let segments = self
            .spans
            .iter()
            .enumerate()
            .filter(|(_, span)| !span.is_empty())
            .map(|(i, span)| {
                let text = title[span.clone()].to_string();
                if i % 2 == 1 {
                    Segment::Emphasis(text)
                } else {
                    Segment::Plain(text)
                }
            })
            .collect();

        Highlight { segments }
    }
}

// ============================================================================
// Highlight
// ============================================================================

/// One run of rendered title text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Emphasis(String),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain(text) | Segment::Emphasis(text) => text,
        }
    }

    pub fn is_emphasis(&self) -> bool {
        matches!(self, Segment::Emphasis(_))
    }
}

/// Title text split into plain and emphasized runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlight {
    segments: Vec<Segment>,
}

impl Highlight {
    /// Unhighlighted rendering of `text`
    pub fn plain(text: &str) -> Self {
        let segments = if text.is_empty() {
            Vec::new()
        } else {
            vec![Segment::Plain(text.to_string())]
        };
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Full text, emphasis markers removed
    pub fn text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    /// Concatenation of the emphasized runs
    pub fn emphasized(&self) -> String {
        self.segments
            .iter()
            .filter(|s| s.is_emphasis())
            .map(Segment::text)
            .collect()
    }

    pub fn has_emphasis(&self) -> bool {
        self.segments.iter().any(Segment::is_emphasis)
    }

    /// Render as HTML: emphasis wrapped in `<mark>`, all text escaped
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Plain(text) => escape_html(text, &mut out),
                Segment::Emphasis(text) => {
                    out.push_str("<mark>");
                    escape_html(text, &mut out);
                    out.push_str("</mark>");
                }
            }
        }
        out
    }
}

fn escape_html(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

// ============================================================================
// Entry
// ============================================================================

/// One candidate plus its presentation state
#[derive(Debug, Clone)]
pub struct Entry {
    title: String,
    target: String,
    visible: bool,
    selected: bool,
    highlight: Highlight,
}

impl Entry {
    /// Create a hidden, unselected entry
    pub fn new(title: impl Into<String>, target: impl Into<String>) -> Self {
        let title = title.into();
        let highlight = Highlight::plain(&title);
        Self {
            title,
            target: target.into(),
            visible: false,
            selected: false,
            highlight,
        }
    }

    /// Test this entry against a pattern.
    ///
    /// On a match the highlight is rebuilt and the entry becomes visible.
    /// Otherwise the entry is hidden and its highlight reset to plain text.
    pub fn test(&mut self, pattern: &Pattern) -> bool {
        match pattern.captures(&self.title) {
            Some(captures) => {
                self.highlight = captures.highlight(&self.title);
                self.visible = true;
                true
            }
            None => {
                self.highlight = Highlight::plain(&self.title);
                self.visible = false;
                false
            }
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Navigate to this entry's target. Fire-and-forget.
    pub fn activate(&self, navigator: &mut dyn Navigator) {
        tracing::info!(title = %self.title, target = %self.target, "activating entry");
        navigator.navigate(&self.target);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }
}

impl From<Candidate> for Entry {
    fn from(candidate: Candidate) -> Self {
        Entry::new(candidate.title, candidate.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pattern(query: &str) -> Pattern {
        Pattern::compile(query).expect("non-empty query")
    }

    #[test]
    fn empty_query_does_not_compile() {
        assert!(Pattern::compile("").is_none());
    }

    #[test]
    fn captures_alternate_gaps_and_query_characters() {
        let title = "xAxBxC";
        let captures = pattern("abc").captures(title).unwrap();
        let texts: Vec<&str> = captures.texts(title).collect();
        assert_eq!(texts, vec!["x", "A", "x", "B", "x", "C", ""]);

        let highlight = captures.highlight(title);
        assert_eq!(
            highlight.segments(),
            &[
                Segment::Plain("x".into()),
                Segment::Emphasis("A".into()),
                Segment::Plain("x".into()),
                Segment::Emphasis("B".into()),
                Segment::Plain("x".into()),
                Segment::Emphasis("C".into()),
            ]
        );
        assert_eq!(highlight.to_html(), "x<mark>A</mark>x<mark>B</mark>x<mark>C</mark>");
    }

    #[test]
    fn out_of_order_characters_do_not_match() {
        assert!(!pattern("ba").is_match("abc"));
        assert!(!pattern("abcd").is_match("abc"));
        assert!(pattern("ac").is_match("abc"));
    }

    #[test]
    fn matching_ignores_case() {
        assert!(pattern("HOME").is_match("home page"));
        assert!(pattern("ünï").is_match("ÜNÏCODE"));
    }

    #[test]
    fn metacharacters_are_literal() {
        let p = pattern("a.c");
        assert!(!p.is_match("abc"));
        assert!(p.is_match("a.c"));
        assert!(!p.is_match("aXc"));

        assert!(pattern("(").is_match("f(x)"));
        assert!(!pattern("*").is_match("anything"));
        assert!(pattern("[a-z]").is_match("x[a-z]"));
    }

    #[test]
    fn repeated_characters_capture_the_latest_embedding() {
        let title = "banana";
        let highlight = pattern("an").captures(title).unwrap().highlight(title);
        assert_eq!(
            highlight.segments(),
            &[
                Segment::Plain("ban".into()),
                Segment::Emphasis("a".into()),
                Segment::Emphasis("n".into()),
                Segment::Plain("a".into()),
            ]
        );
    }

    #[test]
    fn captures_respect_multibyte_boundaries() {
        let title = "Café Menü";
        let captures = pattern("éü").captures(title).unwrap();
        let matched: Vec<&str> = captures.matched().map(|r| &title[r]).collect();
        assert_eq!(matched, vec!["é", "ü"]);
    }

    #[test]
    fn html_rendering_escapes_title_text() {
        let title = "<script>&";
        let highlight = pattern("s").captures(title).unwrap().highlight(title);
        assert_eq!(highlight.to_html(), "&lt;<mark>s</mark>cript&gt;&amp;");
    }

    #[test]
    fn entry_test_updates_visibility_and_highlight() {
        let mut entry = Entry::new("About", "/about");
        assert!(!entry.is_visible());

        assert!(entry.test(&pattern("bt")));
        assert!(entry.is_visible());
        assert_eq!(entry.highlight().emphasized(), "bt");

        assert!(!entry.test(&pattern("zz")));
        assert!(!entry.is_visible());
        assert!(!entry.highlight().has_emphasis());
        assert_eq!(entry.highlight().text(), "About");
    }

    #[test]
    fn presentation_toggles_are_idempotent() {
        let mut entry = Entry::new("Home", "/");
        entry.set_selected(true);
        entry.set_selected(true);
        assert!(entry.is_selected());
        entry.set_visible(true);
        entry.set_visible(false);
        entry.set_visible(false);
        assert!(!entry.is_visible());
        assert!(entry.is_selected());
    }

    #[test]
    fn activate_navigates_to_target_as_is() {
        struct Recorder(Vec<String>);
        impl Navigator for Recorder {
            fn navigate(&mut self, target: &str) {
                self.0.push(target.to_string());
            }
        }

        let mut nav = Recorder(Vec::new());
        Entry::new("Broken", "not a url").activate(&mut nav);
        Entry::new("Missing", "").activate(&mut nav);
        assert_eq!(nav.0, vec!["not a url".to_string(), String::new()]);
    }

    fn is_subsequence(title: &str, query: &str) -> bool {
        let mut title = title.chars().map(fold);
        query.chars().map(fold).all(|q| title.any(|t| t == q))
    }

    proptest! {
        #[test]
        fn match_iff_query_is_a_case_insensitive_subsequence(
            title in "[a-cA-C.*() ]{0,12}",
            query in "[a-cA-C.*() ]{1,4}",
        ) {
            let p = pattern(&query);
            prop_assert_eq!(p.is_match(&title), is_subsequence(&title, &query));
        }

        #[test]
        fn highlight_preserves_title_and_marks_query(
            title in "[a-dA-D]{0,12}",
            query in "[a-dA-D]{1,4}",
        ) {
            if let Some(captures) = pattern(&query).captures(&title) {
                let highlight = captures.highlight(&title);
                prop_assert_eq!(highlight.text(), title.clone());
                prop_assert_eq!(
                    highlight.emphasized().to_lowercase(),
                    query.to_lowercase()
                );
                prop_assert_eq!(captures.spans().len(), query.chars().count() * 2 + 1);
            }
        }
    }
}
