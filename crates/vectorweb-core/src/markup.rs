//! Rich-text fragments returned by the search service.
//!
//! Result content arrives as a string with simple inline markup (`<b>`,
//! `<em>`, `<br/>`, ...). It is parsed once at the wire boundary into a list of
//! [`Segment`]s; rendering and clipboard export both read the segments, so the
//! text a user sees and the text they copy can never disagree.
//!
//! Serializing back to markup escapes `&`, `<` and `>` inside text runs, and
//! parsing decodes those three entities, so text built with the builder
//! survives a round trip whatever characters it holds.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Anything that looks like a markup tag. Matches exactly what gets stripped
/// for plain-text export.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static TAG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<\s*(/)?\s*([A-Za-z][A-Za-z0-9]*)").unwrap());

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&(lt|gt|amp);").unwrap());

const EMPHASIS_TAGS: &[&str] = &["b", "strong", "i", "em"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text { text: String, emphasis: bool },
    LineBreak,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RichText {
    segments: Vec<Segment>,
}

enum Tag {
    Open,
    Close,
    Break,
    Other,
}

fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Single pass, so `&amp;lt;` decodes to `&lt;` and not `<`.
fn unescape(text: &str) -> Cow<'_, str> {
    ENTITY_RE.replace_all(text, |caps: &Captures| match &caps[1] {
        "lt" => "<",
        "gt" => ">",
        _ => "&",
    })
}

fn classify(tag: &str) -> Tag {
    let Some(caps) = TAG_NAME_RE.captures(tag) else {
        return Tag::Other;
    };
    let closing = caps.get(1).is_some();
    let name = caps[2].to_ascii_lowercase();
    if name == "br" {
        return Tag::Break;
    }
    if !EMPHASIS_TAGS.contains(&name.as_str()) {
        return Tag::Other;
    }
    // `<b/>` opens and closes nothing
    if tag.trim_end_matches('>').trim_end().ends_with('/') {
        return Tag::Other;
    }
    if closing {
        Tag::Close
    } else {
        Tag::Open
    }
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a markup string. Unknown tags are dropped; unbalanced closing
    /// tags are ignored. `&lt;`, `&gt;` and `&amp;` are decoded, other
    /// entities are kept as delivered.
    pub fn parse(raw: &str) -> Self {
        let mut out = Self::new();
        let mut depth = 0usize;
        let mut last = 0;

        for m in TAG_RE.find_iter(raw) {
            out.push(&unescape(&raw[last..m.start()]), depth > 0);
            last = m.end();
            match classify(m.as_str()) {
                Tag::Open => depth += 1,
                Tag::Close => depth = depth.saturating_sub(1),
                Tag::Break => out.segments.push(Segment::LineBreak),
                Tag::Other => {}
            }
        }
        out.push(&unescape(&raw[last..]), depth > 0);
        out
    }

    /// Append a plain run.
    pub fn text(mut self, text: &str) -> Self {
        self.push(text, false);
        self
    }

    /// Append an emphasized run.
    pub fn emphasis(mut self, text: &str) -> Self {
        self.push(text, true);
        self
    }

    pub fn line_break(mut self) -> Self {
        self.segments.push(Segment::LineBreak);
        self
    }

    fn push(&mut self, text: &str, emphasis: bool) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Text {
            text: prev,
            emphasis: prev_emphasis,
        }) = self.segments.last_mut()
        {
            if *prev_emphasis == emphasis {
                prev.push_str(text);
                return;
            }
        }
        self.segments.push(Segment::Text {
            text: text.to_string(),
            emphasis,
        });
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Text with all markup removed. Line breaks contribute nothing, matching
    /// a plain strip of every tag from the source markup.
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Text { text, .. } => Some(text.as_str()),
                Segment::LineBreak => None,
            })
            .collect()
    }

    /// Segments grouped into display lines, split at line breaks.
    pub fn lines(&self) -> Vec<Vec<(&str, bool)>> {
        let mut lines = vec![Vec::new()];
        for segment in &self.segments {
            match segment {
                Segment::Text { text, emphasis } => {
                    if let Some(line) = lines.last_mut() {
                        line.push((text.as_str(), *emphasis));
                    }
                }
                Segment::LineBreak => lines.push(Vec::new()),
            }
        }
        lines
    }

    /// Single-line preview: breaks become spaces, whitespace is collapsed,
    /// and the result is cut to `max_chars` with a trailing ellipsis.
    pub fn preview(&self, max_chars: usize) -> String {
        let joined: String = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Text { text, .. } => text.as_str(),
                Segment::LineBreak => " ",
            })
            .collect();
        let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.chars().count() <= max_chars {
            return collapsed;
        }
        let cut: String = collapsed.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", cut.trim_end())
    }

    /// Serialize back to simple markup (`<b>` for emphasis, `<br/>` for
    /// breaks). Inverse of [`RichText::parse`] for anything this type holds.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text {
                    text,
                    emphasis: true,
                } => {
                    out.push_str("<b>");
                    out.push_str(&escape(text));
                    out.push_str("</b>");
                }
                Segment::Text {
                    text,
                    emphasis: false,
                } => out.push_str(&escape(text)),
                Segment::LineBreak => out.push_str("<br/>"),
            }
        }
        out
    }
}

impl From<String> for RichText {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for RichText {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<RichText> for String {
    fn from(text: RichText) -> Self {
        text.to_markup()
    }
}
