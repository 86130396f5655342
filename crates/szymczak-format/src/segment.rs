//! Segment splitter shared by every grammar level.
//!
//! Each level of the format is "split on a delimiter, drop or reject blank
//! pieces, check how many pieces came out". A `Splitter` captures one such
//! level as data so the parser walks the grammar with a table of splitters
//! instead of repeating the pattern per level.

use crate::error::{excerpt, GrammarLevel, ParseError};

/// Where a delimiter may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// A line whose trimmed content is exactly the delimiter (`---`, `-`, ...).
    Line(&'static str),
    /// Any occurrence inside the text.
    Inline(&'static str),
}

/// What to do with segments that are empty after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptySegments {
    /// Keep them; positions are significant.
    Keep,
    /// Drop them before the arity check.
    Skip,
    /// Treat them as a structural error.
    Reject,
}

/// Accepted number of segments after empty-segment handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::Between(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(min) => count >= min,
        }
    }

    fn describe(self) -> String {
        match self {
            Arity::Exactly(n) => format!("exactly {n}"),
            Arity::Between(min, max) => format!("between {min} and {max}"),
            Arity::AtLeast(min) => format!("at least {min}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Splitter {
    level: GrammarLevel,
    delimiter: Delimiter,
    arity: Arity,
    empties: EmptySegments,
}

impl Splitter {
    pub const fn new(level: GrammarLevel, delimiter: Delimiter) -> Self {
        Self {
            level,
            delimiter,
            arity: Arity::AtLeast(0),
            empties: EmptySegments::Skip,
        }
    }

    pub const fn arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    pub const fn empties(mut self, empties: EmptySegments) -> Self {
        self.empties = empties;
        self
    }

    pub fn level(&self) -> GrammarLevel {
        self.level
    }

    /// Split `text` into trimmed segments, enforcing the empty-segment policy
    /// and the arity.
    pub fn split<'a>(&self, text: &'a str) -> Result<Vec<&'a str>, ParseError> {
        let raw_segments = match self.delimiter {
            Delimiter::Line(delimiter) => split_at_lines(text, delimiter),
            Delimiter::Inline(delimiter) => text.split(delimiter).collect(),
        };

        let mut segments = Vec::with_capacity(raw_segments.len());
        for segment in raw_segments {
            let segment = segment.trim();
            if segment.is_empty() {
                match self.empties {
                    EmptySegments::Keep => {}
                    EmptySegments::Skip => continue,
                    EmptySegments::Reject => {
                        return Err(self.failure(
                            format!("empty segment around `{}`", self.delimiter_text()),
                            text,
                        ));
                    }
                }
            }
            segments.push(segment);
        }

        if !self.arity.accepts(segments.len()) {
            return Err(self.failure(
                format!(
                    "expected {} segment(s) separated by `{}`, found {}",
                    self.arity.describe(),
                    self.delimiter_text(),
                    segments.len()
                ),
                text,
            ));
        }

        Ok(segments)
    }

    fn delimiter_text(&self) -> &'static str {
        match self.delimiter {
            Delimiter::Line(d) | Delimiter::Inline(d) => d,
        }
    }

    fn failure(&self, message: String, raw: &str) -> ParseError {
        structural_error(self.level, message, raw)
    }
}

/// Build the error variant that matches a structural failure at `level`.
pub(crate) fn structural_error(level: GrammarLevel, message: String, raw: &str) -> ParseError {
    let raw = excerpt(raw);
    match level {
        GrammarLevel::Document => ParseError::MalformedDocument { message, raw },
        GrammarLevel::Preamble => ParseError::MalformedPreamble { message, raw },
        GrammarLevel::Timing => ParseError::MalformedTiming { message, raw },
        GrammarLevel::Quadruple => ParseError::MalformedQuadruple {
            level,
            message,
            raw,
        },
        GrammarLevel::Class | GrammarLevel::Group | GrammarLevel::Object | GrammarLevel::Relation => {
            ParseError::MalformedGroup {
                level,
                message,
                raw,
            }
        }
    }
}

fn split_at_lines<'a>(text: &'a str, delimiter: &str) -> Vec<&'a str> {
    let mut segments = Vec::new();
    let mut start = 0usize;
    let mut offset = 0usize;
    for line in text.split_inclusive('\n') {
        if line.trim() == delimiter {
            segments.push(&text[start..offset]);
            start = offset + line.len();
        }
        offset += line.len();
    }
    segments.push(&text[start..]);
    segments
}
