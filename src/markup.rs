//! Restricted inline markup used in post messages.
//!
//! Posts carry a small HTML subset. This module turns it into an explicit
//! tree that the IDML story writer walks:
//!
//! | Markup | Result |
//! |--------|--------|
//! | `<p>…</p>` | one tagged [`Paragraph`] |
//! | text outside `<p>` | one untagged [`Paragraph`] |
//! | `<strong>`, `<b>` | bold [`Run`] |
//! | `<em>`, `<i>` | italic [`Run`] |
//! | `<del>`, `<s>`, `<strike>` | strikethrough [`Run`] |
//! | `<br>`, `<br/>`, `\n` | [`Inline::LineBreak`] |
//!
//! Unknown tags are dropped and their text kept. Entities are decoded one
//! by one; an unknown entity is kept as written.
//!
//! # Example
//!
//! ```
//! use tgpress::markup::{Inline, parse_markup};
//!
//! let paragraphs = parse_markup("<p>Hello <b>bold <i>both</i></b></p>");
//! assert_eq!(paragraphs.len(), 1);
//! assert!(paragraphs[0].tagged);
//!
//! let Inline::Run(last) = &paragraphs[0].inlines[2] else { panic!() };
//! assert_eq!(last.text, "both");
//! assert!(last.bold && last.italic);
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use quick_xml::escape::unescape;
use regex::Regex;
use serde::Serialize;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<\s*(/?)\s*([A-Za-z][A-Za-z0-9]*)[^>]*?(/?)\s*>").expect("valid tag regex")
});

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#?[A-Za-z0-9]+;").expect("valid entity regex"));

fn decode_entities(raw: &str) -> Cow<'_, str> {
    ENTITY_RE.replace_all(raw, |caps: &regex::Captures<'_>| {
        let entity = &caps[0];
        unescape(entity).map_or_else(|_| entity.to_string(), Cow::into_owned)
    })
}

/// A span of text sharing one set of character styles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
}

impl Run {
    /// Creates an unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if no character style applies.
    pub fn is_plain(&self) -> bool {
        !(self.bold || self.italic || self.strike)
    }

    fn same_style(&self, style: Style) -> bool {
        self.bold == style.bold && self.italic == style.italic && self.strike == style.strike
    }
}

/// Paragraph content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Inline {
    Run(Run),
    LineBreak,
}

/// A paragraph of inline content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Paragraph {
    /// `true` when the source wrapped it in `<p>`
    pub tagged: bool,
    pub inlines: Vec<Inline>,
}

impl Paragraph {
    /// Creates an empty paragraph.
    pub fn new(tagged: bool) -> Self {
        Self {
            tagged,
            inlines: Vec::new(),
        }
    }

    /// Creates an untagged paragraph holding one plain run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            tagged: false,
            inlines: vec![Inline::Run(Run::plain(text))],
        }
    }

    /// Returns `true` if the paragraph holds nothing.
    pub fn is_empty(&self) -> bool {
        self.inlines.is_empty()
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        if let Some(Inline::Run(last)) = self.inlines.last_mut() {
            if last.same_style(style) {
                last.text.push_str(text);
                return;
            }
        }
        self.inlines.push(Inline::Run(Run {
            text: text.to_string(),
            bold: style.bold,
            italic: style.italic,
            strike: style.strike,
        }));
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Style {
    bold: bool,
    italic: bool,
    strike: bool,
}

/// Nesting depth per formatting tag family.
#[derive(Debug, Default)]
struct Depths {
    bold: usize,
    italic: usize,
    strike: usize,
}

impl Depths {
    fn style(&self) -> Style {
        Style {
            bold: self.bold > 0,
            italic: self.italic > 0,
            strike: self.strike > 0,
        }
    }

    fn counter(&mut self, tag: &str) -> Option<&mut usize> {
        match tag {
            "b" | "strong" => Some(&mut self.bold),
            "i" | "em" => Some(&mut self.italic),
            "s" | "del" | "strike" => Some(&mut self.strike),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct MarkupParser {
    paragraphs: Vec<Paragraph>,
    current: Option<Paragraph>,
    depths: Depths,
}

impl MarkupParser {
    fn text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let decoded = decode_entities(raw);

        let blank = decoded.trim().is_empty();
        if blank && self.current.as_ref().is_none_or(Paragraph::is_empty) {
            return;
        }
        let paragraph = self.current.get_or_insert_with(|| Paragraph::new(false));

        let style = self.depths.style();
        for (i, line) in decoded.split('\n').enumerate() {
            if i > 0 {
                paragraph.inlines.push(Inline::LineBreak);
            }
            paragraph.push_text(line.strip_suffix('\r').unwrap_or(line), style);
        }
    }

    fn flush(&mut self) {
        if let Some(paragraph) = self.current.take() {
            if !paragraph.is_empty() {
                self.paragraphs.push(paragraph);
            }
        }
    }

    fn tag(&mut self, name: &str, closing: bool) {
        match name {
            "p" => {
                self.flush();
                if !closing {
                    self.current = Some(Paragraph::new(true));
                }
            }
            "br" => {
                if let Some(paragraph) = self.current.as_mut() {
                    paragraph.inlines.push(Inline::LineBreak);
                }
            }
            other => {
                if let Some(depth) = self.depths.counter(other) {
                    if closing {
                        *depth = depth.saturating_sub(1);
                    } else {
                        *depth += 1;
                    }
                }
            }
        }
    }

    fn finish(mut self) -> Vec<Paragraph> {
        self.flush();
        self.paragraphs
    }
}

/// Parses message markup into paragraphs.
///
/// Whitespace-only text that would open a new paragraph is ignored, so
/// newlines between `</p>` and `<p>` produce nothing.
pub fn parse_markup(input: &str) -> Vec<Paragraph> {
    let mut parser = MarkupParser::default();
    let mut last = 0;

    for caps in TAG_RE.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        parser.text(&input[last..whole.start()]);
        last = whole.end();

        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let name = caps
            .get(2)
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_default();
        parser.tag(&name, closing);
    }
    parser.text(&input[last..]);

    parser.finish()
}

/// Flattens paragraphs to plain text, one line per paragraph or break.
pub fn plain_text(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .map(|p| {
            p.inlines
                .iter()
                .map(|inline| match inline {
                    Inline::Run(run) => run.text.as_str(),
                    Inline::LineBreak => "\n",
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
