//! Isomorphism-witness quadruples.
//!
//! A witness class lists, one per `--` separated segment, a quadruple line
//!
//! ```text
//! <endo_object>:<endo>-<bij_object>:<bij>--<endo_to_bij>-<bij_to_endo>
//! ```
//!
//! where `endo` is an endomorphism of `endo_object`, `bij` an endomorphism of
//! `bij_object`, and the two cross relations witness the isomorphism between
//! them. Every split is strict: an empty piece anywhere is an error.

use serde::{Deserialize, Serialize};

use crate::error::{GrammarLevel, ParseError};
use crate::kind::{MorphismKind, ObjectKind};
use crate::relation::Relation;
use crate::segment::{Arity, Delimiter, EmptySegments, Splitter};
use crate::zn_module::{ModuleShape, ZnModule};

const QUADRUPLES: Splitter = Splitter::new(GrammarLevel::Quadruple, Delimiter::Line("--"))
    .empties(EmptySegments::Reject)
    .arity(Arity::AtLeast(1));

const QUADRUPLE_LINE: Splitter = Splitter::new(GrammarLevel::Quadruple, Delimiter::Inline("\n"))
    .empties(EmptySegments::Reject)
    .arity(Arity::Exactly(1));

const HALVES: Splitter = Splitter::new(GrammarLevel::Quadruple, Delimiter::Inline("--"))
    .empties(EmptySegments::Reject)
    .arity(Arity::Exactly(2));

const PAIR: Splitter = Splitter::new(GrammarLevel::Quadruple, Delimiter::Inline("-"))
    .empties(EmptySegments::Reject)
    .arity(Arity::Exactly(2));

const OBJECT_AND_RELATION: Splitter =
    Splitter::new(GrammarLevel::Quadruple, Delimiter::Inline(":"))
        .empties(EmptySegments::Reject)
        .arity(Arity::Exactly(2));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsoWitnessQuadruple {
    pub endo_object: ZnModule,
    pub endo: Relation,
    pub bij_object: ZnModule,
    pub bij: Relation,
    /// `|endo_object| x |bij_object|`
    pub endo_to_bij: Relation,
    /// `|bij_object| x |endo_object|`
    pub bij_to_endo: Relation,
}

pub type WitnessClass = Vec<IsoWitnessQuadruple>;

pub(crate) fn parse_witness_class(
    raw: &str,
    object_kind: ObjectKind,
    morphism_kind: MorphismKind,
) -> Result<WitnessClass, ParseError> {
    QUADRUPLES
        .split(raw)?
        .into_iter()
        .map(|segment| {
            let line = QUADRUPLE_LINE.split(segment)?[0];
            parse_quadruple(line, object_kind, morphism_kind)
        })
        .collect()
}

/// Decode one quadruple line.
pub fn parse_quadruple(
    line: &str,
    object_kind: ObjectKind,
    morphism_kind: MorphismKind,
) -> Result<IsoWitnessQuadruple, ParseError> {
    let halves = HALVES.split(line)?;
    let representatives = PAIR.split(halves[0])?;
    let cross = PAIR.split(halves[1])?;

    let (endo_object, endo) =
        parse_representative(representatives[0], object_kind, morphism_kind)?;
    let (bij_object, bij) = parse_representative(representatives[1], object_kind, morphism_kind)?;

    let endo_to_bij = morphism_kind.decode_cross(cross[0], &endo_object, &bij_object)?;
    let bij_to_endo = morphism_kind.decode_cross(cross[1], &bij_object, &endo_object)?;
    let (endo_object, bij_object) = (endo_object.into_module(), bij_object.into_module());

    tracing::trace!(
        endo_object = %endo_object,
        bij_object = %bij_object,
        "decoded witness quadruple"
    );
    Ok(IsoWitnessQuadruple {
        endo_object,
        endo,
        bij_object,
        bij,
        endo_to_bij,
        bij_to_endo,
    })
}

fn parse_representative(
    raw: &str,
    object_kind: ObjectKind,
    morphism_kind: MorphismKind,
) -> Result<(ModuleShape, Relation), ParseError> {
    let parts = OBJECT_AND_RELATION.split(raw)?;
    let object = object_kind
        .decode(parts[0])
        .map_err(|err| err.at_level(GrammarLevel::Quadruple))?;
    let relation = morphism_kind
        .decode_endomorphism(parts[1], &object)
        .map_err(|err| err.at_level(GrammarLevel::Quadruple))?;
    Ok((object, relation))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadruple(line: &str) -> Result<IsoWitnessQuadruple, ParseError> {
        parse_quadruple(line, ObjectKind::ZnModule, MorphismKind::Relation)
    }

    #[test]
    fn decodes_all_six_fields() {
        let q = quadruple("0:1-Z2:1001--11-11").expect("parse");
        assert!(q.endo_object.is_zero());
        assert!(q.endo.is_bijection());
        assert_eq!(q.bij_object.to_string(), "Z2");
        assert!(q.bij.is_bijection());
        assert_eq!((q.endo_to_bij.rows(), q.endo_to_bij.cols()), (1, 2));
        assert_eq!((q.bij_to_endo.rows(), q.bij_to_endo.cols()), (2, 1));
        assert!(q.endo_to_bij.classification().is_none());
    }

    #[test]
    fn cross_shapes_are_checked() {
        let err = quadruple("0:1-Z2:1001--1-11").expect_err("should error");
        match err {
            ParseError::MalformedMatrix { level, raw, .. } => {
                assert_eq!(level, GrammarLevel::Quadruple);
                assert_eq!(raw, "1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_fields_are_rejected() {
        for line in [
            "0:1-Z2:1001--11-",
            "0:1-Z2:1001--",
            "0:-Z2:1001--11-11",
            ":1-Z2:1001--11-11",
            "0:1--11-11",
        ] {
            let err = quadruple(line).expect_err(line);
            assert!(
                matches!(err, ParseError::MalformedQuadruple { .. }),
                "line={line} err={err:?}"
            );
        }
    }

    #[test]
    fn bad_object_is_reported_at_quadruple_level() {
        let err = quadruple("Q2:1001-Z2:1001--1001-1001").expect_err("should error");
        assert!(matches!(
            err,
            ParseError::InvalidObjectDescriptor {
                level: GrammarLevel::Quadruple,
                ..
            }
        ));
    }

    #[test]
    fn class_segments_hold_one_quadruple_each() {
        let class = parse_witness_class(
            "0:1-0:1--1-1\n--\nZ2:1001-Z2:0110--1001-1001",
            ObjectKind::ZnModule,
            MorphismKind::Relation,
        )
        .expect("parse");
        assert_eq!(class.len(), 2);
        assert!(class[1].bij.is_bijection());

        let err = parse_witness_class(
            "0:1-0:1--1-1\n0:1-0:1--1-1",
            ObjectKind::ZnModule,
            MorphismKind::Relation,
        )
        .expect_err("should error");
        assert!(matches!(err, ParseError::MalformedQuadruple { .. }));

        let err = parse_witness_class(
            "0:1-0:1--1-1\n--\n--\n0:1-0:1--1-1",
            ObjectKind::ZnModule,
            MorphismKind::Relation,
        )
        .expect_err("should error");
        assert!(matches!(err, ParseError::MalformedQuadruple { .. }));
    }
}
