//! Document parser.
//!
//! ```text
//! <preamble>
//! ===
//! ---                 class separator
//! -                   class-fixed-object group separator
//! Z2xZ3:              object descriptor, then one relation per line
//! 100000010000...
//! [===
//! <timings>]
//! ```
//!
//! The `Witnesses` revision replaces the group level with `--` separated
//! quadruple lines (see [`crate::witness`]). Both revisions go through the
//! same entrypoint; the revision is either given in [`ParseOptions`] or
//! detected from the body.

use serde::{Deserialize, Serialize};

use crate::error::{GrammarLevel, ParseError};
use crate::kind::{MorphismKind, ObjectKind};
use crate::preamble::{parse_preamble, Preamble};
use crate::relation::Relation;
use crate::segment::{structural_error, Arity, Delimiter, EmptySegments, Splitter};
use crate::timing::{parse_timings, Timings};
use crate::witness::{parse_witness_class, WitnessClass};
use crate::zn_module::ZnModule;

const DOCUMENT: Splitter = Splitter::new(GrammarLevel::Document, Delimiter::Line("==="))
    .empties(EmptySegments::Keep)
    .arity(Arity::Between(2, 3));

pub(crate) const CLASSES: Splitter = Splitter::new(GrammarLevel::Class, Delimiter::Line("---"));

const GROUPS: Splitter =
    Splitter::new(GrammarLevel::Class, Delimiter::Line("-")).arity(Arity::AtLeast(1));

const GROUP_LINES: Splitter =
    Splitter::new(GrammarLevel::Group, Delimiter::Inline("\n")).arity(Arity::AtLeast(1));

/// Format revision of the body grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Revision {
    /// `---` classes of `-` groups of `object:` + endomorphism lines.
    Classes,
    /// `---` classes of `--` separated isomorphism-witness quadruples.
    Witnesses,
}

impl Revision {
    /// Guess the revision from a body: any inline `--` or a bare `--` line
    /// means witness quadruples.
    pub fn detect(body: &str) -> Self {
        let witness = body.lines().map(str::trim).any(|line| line != "---" && line.contains("--"));
        if witness {
            Revision::Witnesses
        } else {
            Revision::Classes
        }
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Revision::Classes => f.write_str("classes"),
            Revision::Witnesses => f.write_str("witnesses"),
        }
    }
}

impl std::str::FromStr for Revision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classes" => Ok(Revision::Classes),
            "witnesses" => Ok(Revision::Witnesses),
            other => Err(format!("unknown revision `{other}` (expected `classes` or `witnesses`)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// `None` detects the revision from the body.
    pub revision: Option<Revision>,
}

impl ParseOptions {
    pub fn with_revision(revision: Revision) -> Self {
        Self {
            revision: Some(revision),
        }
    }
}

/// One object of an isomorphism class with the class's endomorphisms on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFixedObject {
    pub object: ZnModule,
    pub endomorphisms: Vec<Relation>,
}

pub type IsoClass = Vec<ClassFixedObject>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "revision", content = "classes", rename_all = "snake_case")]
pub enum Classes {
    Objects(Vec<IsoClass>),
    Witnesses(Vec<WitnessClass>),
}

impl Classes {
    pub fn len(&self) -> usize {
        match self {
            Classes::Objects(classes) => classes.len(),
            Classes::Witnesses(classes) => classes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Endomorphisms of a `Classes` document, or quadruples of a witness document.
    pub fn relation_count(&self) -> usize {
        match self {
            Classes::Objects(classes) => classes
                .iter()
                .flatten()
                .map(|group| group.endomorphisms.len())
                .sum(),
            Classes::Witnesses(classes) => classes.iter().map(Vec::len).sum(),
        }
    }

    pub fn revision(&self) -> Revision {
        match self {
            Classes::Objects(_) => Revision::Classes,
            Classes::Witnesses(_) => Revision::Witnesses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedOutput {
    pub preamble: Preamble,
    pub object_kind: ObjectKind,
    pub morphism_kind: MorphismKind,
    pub classes: Classes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timings: Option<Timings>,
}

impl ParsedOutput {
    pub fn revision(&self) -> Revision {
        self.classes.revision()
    }
}

/// Parse a document, detecting its revision.
pub fn parse(text: &str) -> Result<ParsedOutput, ParseError> {
    parse_with(text, &ParseOptions::default())
}

pub fn parse_with(text: &str, options: &ParseOptions) -> Result<ParsedOutput, ParseError> {
    let segments = DOCUMENT.split(text)?;
    let (raw_preamble, body) = (segments[0], segments[1]);

    let preamble = parse_preamble(raw_preamble)?;
    let object_kind = ObjectKind::resolve(&preamble.object_kind)?;
    let morphism_kind = MorphismKind::resolve(&preamble.morphism_kind)?;

    let revision = options.revision.unwrap_or_else(|| Revision::detect(body));
    tracing::debug!(
        functor = %preamble.functor_name,
        %object_kind,
        %morphism_kind,
        %revision,
        "decoded preamble"
    );

    let classes = match revision {
        Revision::Classes => Classes::Objects(
            CLASSES
                .split(body)?
                .into_iter()
                .map(|raw| parse_iso_class(raw, object_kind, morphism_kind))
                .collect::<Result<_, _>>()?,
        ),
        Revision::Witnesses => Classes::Witnesses(
            CLASSES
                .split(body)?
                .into_iter()
                .map(|raw| parse_witness_class(raw, object_kind, morphism_kind))
                .collect::<Result<_, _>>()?,
        ),
    };

    let timings = segments.get(2).map(|raw| parse_timings(raw)).transpose()?;

    tracing::debug!(
        classes = classes.len(),
        relations = classes.relation_count(),
        has_timings = timings.is_some(),
        "parsed document"
    );

    Ok(ParsedOutput {
        preamble,
        object_kind,
        morphism_kind,
        classes,
        timings,
    })
}

fn parse_iso_class(
    raw: &str,
    object_kind: ObjectKind,
    morphism_kind: MorphismKind,
) -> Result<IsoClass, ParseError> {
    GROUPS
        .split(raw)?
        .into_iter()
        .map(|group| parse_class_fixed_object(group, object_kind, morphism_kind))
        .collect()
}

fn parse_class_fixed_object(
    raw: &str,
    object_kind: ObjectKind,
    morphism_kind: MorphismKind,
) -> Result<ClassFixedObject, ParseError> {
    let lines = GROUP_LINES.split(raw)?;
    let (header, relation_lines) = (lines[0], &lines[1..]);
    let descriptor = header.strip_suffix(':').ok_or_else(|| {
        structural_error(
            GrammarLevel::Group,
            "object descriptor must be a line of its own ending in `:`".to_string(),
            header,
        )
    })?;
    let shape = object_kind.decode(descriptor)?;
    if relation_lines.is_empty() {
        return Err(structural_error(
            GrammarLevel::Relation,
            "object has no endomorphism lines".to_string(),
            raw,
        ));
    }

    let endomorphisms = relation_lines
        .iter()
        .map(|line| morphism_kind.decode_endomorphism(line, &shape))
        .collect::<Result<Vec<_>, _>>()?;
    let object = shape.into_module();

    tracing::trace!(
        object = %object,
        endomorphisms = endomorphisms.len(),
        "decoded class-fixed-object group"
    );
    Ok(ClassFixedObject {
        object,
        endomorphisms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREAMBLE: &str = "Functor name: Szymczak\n\
        Object: Zn-Module\n\
        Endomorphism: Relation\n\
        Number of endomorphisms: 3\n\
        Number of classes: 2\n\
        Every class has a map: true\n\
        Every class has a bijection: false\n";

    fn document(body: &str) -> String {
        format!("{PREAMBLE}===\n{body}")
    }

    #[test]
    fn parses_classes_and_groups() {
        let text = document("---\n-\n0:\n1\n-\nZ2:\n1001\n---\n-\nZ2:\n1100\n");
        let out = parse(&text).expect("parse");
        assert_eq!(out.revision(), Revision::Classes);
        let Classes::Objects(classes) = &out.classes else {
            panic!("expected object classes");
        };
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].len(), 2);
        assert!(classes[0][0].object.is_zero());
        assert_eq!(classes[0][1].endomorphisms[0].to_flat_string(), "1001");
        assert!(classes[1][0].endomorphisms[0].is_map());
        assert_eq!(out.classes.relation_count(), 3);
        assert!(out.timings.is_none());
    }

    #[test]
    fn missing_document_separator_is_malformed_document() {
        let err = parse(PREAMBLE).expect_err("should error");
        assert!(matches!(err, ParseError::MalformedDocument { .. }), "err={err:?}");
    }

    #[test]
    fn group_without_relations_is_malformed_group() {
        let err = parse(&document("---\n-\nZ2:\n")).expect_err("should error");
        assert!(matches!(err, ParseError::MalformedGroup { .. }), "err={err:?}");
    }

    #[test]
    fn invalid_object_descriptor_propagates() {
        let err = parse(&document("---\n-\n0x0:\n1001\n")).expect_err("should error");
        assert!(
            matches!(err, ParseError::InvalidObjectDescriptor { .. }),
            "err={err:?}"
        );
    }

    #[test]
    fn relation_size_must_match_object() {
        let err = parse(&document("---\n-\nZ3:\n1001\n")).expect_err("should error");
        match err {
            ParseError::MalformedMatrix { level, raw, .. } => {
                assert_eq!(level, GrammarLevel::Relation);
                assert_eq!(raw, "1001");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn object_and_relation_on_one_line_is_malformed_group() {
        for body in ["---\n-\nZ2:1001\n", "---\n-\nZ2:1001\n1001\n"] {
            let err = parse(&document(body)).expect_err(body);
            match err {
                ParseError::MalformedGroup { level, .. } => assert_eq!(level, GrammarLevel::Group),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn crlf_object_lines_are_accepted() {
        let out = parse(&document("---\r\n-\r\nZ2:\r\n1001\r\n")).expect("parse");
        assert_eq!(out.classes.relation_count(), 1);
    }

    #[test]
    fn short_relation_under_huge_object_fails_without_enumerating() {
        let err = parse(&document("---\n-\nZ10000xZ10000:\n1\n")).expect_err("should error");
        match err {
            ParseError::MalformedMatrix { raw, .. } => assert_eq!(raw, "1"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse(&document("---\n-\nZ100000xZ100000:\n1\n")).expect_err("should error");
        assert!(
            matches!(err, ParseError::InvalidObjectDescriptor { .. }),
            "err={err:?}"
        );
    }

    #[test]
    fn unknown_kind_fails_before_body() {
        // the body is garbage but the kind error must win
        let text = document("---\n-\n???\n").replace("Zn-Module", "Vector Space");
        let err = parse(&text).expect_err("should error");
        assert!(matches!(err, ParseError::UnsupportedKind { .. }), "err={err:?}");
    }

    #[test]
    fn empty_body_has_no_classes() {
        let out = parse(&document("")).expect("parse");
        assert!(out.classes.is_empty());
    }

    #[test]
    fn timing_trailer_is_parsed() {
        let text = document("---\n-\n0:\n1\n===\nCategory generated after: 5\n");
        let out = parse(&text).expect("parse");
        assert_eq!(out.timings.unwrap().category_generated_after, Some(5));
    }

    #[test]
    fn too_many_document_sections_are_rejected() {
        let text = document("---\n-\n0:\n1\n===\n\n===\n");
        let err = parse(&text).expect_err("should error");
        assert!(matches!(err, ParseError::MalformedDocument { .. }), "err={err:?}");
    }

    #[test]
    fn revision_detection() {
        assert_eq!(Revision::detect("---\n-\n0:\n1\n"), Revision::Classes);
        assert_eq!(Revision::detect("---\n0:1-0:1--1-1\n"), Revision::Witnesses);
        assert_eq!(Revision::detect("---\n--\n"), Revision::Witnesses);
        assert_eq!("witnesses".parse::<Revision>().unwrap(), Revision::Witnesses);
        assert!("v3".parse::<Revision>().is_err());
    }

    #[test]
    fn explicit_revision_overrides_detection() {
        let text = document("---\n-\n0:\n1\n");
        let err = parse_with(&text, &ParseOptions::with_revision(Revision::Witnesses))
            .expect_err("should error");
        assert_eq!(err.level(), GrammarLevel::Quadruple);
    }
}
