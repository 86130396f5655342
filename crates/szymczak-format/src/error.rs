//! Error taxonomy for the decoder.
//!
//! Every structural error names the grammar level it was detected at and
//! carries the offending raw substring, so malformed engine output can be
//! traced back to the exact fragment that broke.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grammar level at which a fragment was being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarLevel {
    Document,
    Preamble,
    Class,
    Group,
    Object,
    Relation,
    Quadruple,
    Timing,
}

impl std::fmt::Display for GrammarLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GrammarLevel::Document => "document",
            GrammarLevel::Preamble => "preamble",
            GrammarLevel::Class => "class",
            GrammarLevel::Group => "group",
            GrammarLevel::Object => "object",
            GrammarLevel::Relation => "relation",
            GrammarLevel::Quadruple => "quadruple",
            GrammarLevel::Timing => "timing",
        };
        f.write_str(name)
    }
}

/// Which preamble kind tag failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindRole {
    Object,
    Morphism,
}

impl std::fmt::Display for KindRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KindRole::Object => f.write_str("object"),
            KindRole::Morphism => f.write_str("morphism"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed document: {message} (near `{raw}`)")]
    MalformedDocument { message: String, raw: String },

    #[error("malformed preamble: {message} (near `{raw}`)")]
    MalformedPreamble { message: String, raw: String },

    #[error("invalid object descriptor `{raw}` at {level} level: {message}")]
    InvalidObjectDescriptor {
        level: GrammarLevel,
        message: String,
        raw: String,
    },

    #[error("malformed matrix `{raw}` at {level} level: {message}")]
    MalformedMatrix {
        level: GrammarLevel,
        message: String,
        raw: String,
    },

    #[error("malformed group at {level} level: {message} (near `{raw}`)")]
    MalformedGroup {
        level: GrammarLevel,
        message: String,
        raw: String,
    },

    #[error("malformed quadruple at {level} level: {message} (near `{raw}`)")]
    MalformedQuadruple {
        level: GrammarLevel,
        message: String,
        raw: String,
    },

    #[error("unsupported {role} kind `{value}`")]
    UnsupportedKind { role: KindRole, value: String },

    #[error("malformed timing trailer: {message} (near `{raw}`)")]
    MalformedTiming { message: String, raw: String },
}

impl ParseError {
    /// Grammar level the error was raised at.
    pub fn level(&self) -> GrammarLevel {
        match self {
            ParseError::MalformedDocument { .. } => GrammarLevel::Document,
            ParseError::MalformedPreamble { .. } | ParseError::UnsupportedKind { .. } => {
                GrammarLevel::Preamble
            }
            ParseError::InvalidObjectDescriptor { level, .. }
            | ParseError::MalformedMatrix { level, .. }
            | ParseError::MalformedGroup { level, .. }
            | ParseError::MalformedQuadruple { level, .. } => *level,
            ParseError::MalformedTiming { .. } => GrammarLevel::Timing,
        }
    }

    /// Re-tag an object or matrix error with the level of the enclosing
    /// grammar construct (quadruple fields are decoded by the same decoders).
    pub(crate) fn at_level(self, level: GrammarLevel) -> Self {
        match self {
            ParseError::InvalidObjectDescriptor { message, raw, .. } => {
                ParseError::InvalidObjectDescriptor {
                    level,
                    message,
                    raw,
                }
            }
            ParseError::MalformedMatrix { message, raw, .. } => ParseError::MalformedMatrix {
                level,
                message,
                raw,
            },
            other => other,
        }
    }
}

/// Shorten long raw fragments so error messages stay readable.
pub(crate) fn excerpt(raw: &str) -> String {
    const LIMIT: usize = 80;
    let raw = raw.trim();
    match raw.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &raw[..cut]),
        None => raw.to_string(),
    }
}
