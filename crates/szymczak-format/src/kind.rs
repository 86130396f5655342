//! Object and morphism kinds named in the preamble.
//!
//! Kinds are resolved once, before any body fragment is decoded, so an
//! unknown tag fails the whole parse up front.

use serde::{Deserialize, Serialize};

use crate::error::{GrammarLevel, KindRole, ParseError};
use crate::relation::Relation;
use crate::zn_module::{decode_shape, ModuleShape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum ObjectKind {
    /// Finite abelian groups given by torsion coefficients (`Zn-Module`).
    ZnModule,
    /// Modules over Z/base (`Z5-Module`); every coefficient divides `base`.
    ZnModuleOver { base: u64 },
}

impl ObjectKind {
    pub fn resolve(tag: &str) -> Result<Self, ParseError> {
        let tag = tag.trim();
        if tag == "Zn-Module" || tag == "Zn Module" {
            return Ok(ObjectKind::ZnModule);
        }
        if let Some(base) = tag
            .strip_prefix('Z')
            .and_then(|rest| rest.strip_suffix("-Module"))
            .and_then(|digits| digits.parse::<u64>().ok())
            .filter(|base| *base >= 1)
        {
            return Ok(ObjectKind::ZnModuleOver { base });
        }
        Err(ParseError::UnsupportedKind {
            role: KindRole::Object,
            value: tag.to_string(),
        })
    }

    /// Validate an object descriptor. Elements are enumerated later, with
    /// [`ModuleShape::into_module`], once the relations on it have decoded.
    pub fn decode(&self, raw: &str) -> Result<ModuleShape, ParseError> {
        match self {
            ObjectKind::ZnModule => decode_shape(raw, None),
            ObjectKind::ZnModuleOver { base } => decode_shape(raw, Some(*base)),
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::ZnModule => f.write_str("Zn-Module"),
            ObjectKind::ZnModuleOver { base } => write!(f, "Z{base}-Module"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphismKind {
    Relation,
}

impl MorphismKind {
    pub fn resolve(tag: &str) -> Result<Self, ParseError> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("relation") {
            return Ok(MorphismKind::Relation);
        }
        Err(ParseError::UnsupportedKind {
            role: KindRole::Morphism,
            value: tag.to_string(),
        })
    }

    /// Decode an endomorphism of `object`.
    pub fn decode_endomorphism(
        &self,
        raw: &str,
        object: &ModuleShape,
    ) -> Result<Relation, ParseError> {
        match self {
            MorphismKind::Relation => Relation::decode_endomorphism(raw, object.cardinality()),
        }
    }

    /// Decode a morphism `source -> target` between distinct objects.
    pub fn decode_cross(
        &self,
        raw: &str,
        source: &ModuleShape,
        target: &ModuleShape,
    ) -> Result<Relation, ParseError> {
        match self {
            MorphismKind::Relation => {
                Relation::decode_cross(raw, source.cardinality(), target.cardinality())
                    .map_err(|err| err.at_level(GrammarLevel::Quadruple))
            }
        }
    }
}

impl std::fmt::Display for MorphismKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MorphismKind::Relation => f.write_str("Relation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_object_kind_spellings() {
        assert_eq!(ObjectKind::resolve("Zn-Module").unwrap(), ObjectKind::ZnModule);
        assert_eq!(ObjectKind::resolve("Zn Module").unwrap(), ObjectKind::ZnModule);
        assert_eq!(
            ObjectKind::resolve("Z7-Module").unwrap(),
            ObjectKind::ZnModuleOver { base: 7 }
        );
    }

    #[test]
    fn unknown_object_kind_fails_fast() {
        for tag in ["Vector Space", "Z-Module", "Z0-Module", "zn-module"] {
            let err = ObjectKind::resolve(tag).expect_err(tag);
            assert_eq!(
                err,
                ParseError::UnsupportedKind {
                    role: KindRole::Object,
                    value: tag.to_string(),
                }
            );
        }
    }

    #[test]
    fn morphism_kind_is_case_insensitive() {
        assert_eq!(MorphismKind::resolve("Relation").unwrap(), MorphismKind::Relation);
        assert_eq!(MorphismKind::resolve("RELATION").unwrap(), MorphismKind::Relation);
        let err = MorphismKind::resolve("Map").expect_err("should error");
        assert!(err.to_string().contains("unsupported morphism kind `Map`"), "err={err}");
    }

    #[test]
    fn display_round_trips_through_resolve() {
        for kind in [ObjectKind::ZnModule, ObjectKind::ZnModuleOver { base: 12 }] {
            assert_eq!(ObjectKind::resolve(&kind.to_string()).unwrap(), kind);
        }
    }

    #[test]
    fn cross_decoding_uses_both_cardinalities() {
        let zero = ObjectKind::ZnModule.decode("0").unwrap();
        let z2 = ObjectKind::ZnModule.decode("Z2").unwrap();
        let r = MorphismKind::Relation
            .decode_cross("11", &zero, &z2)
            .expect("decode");
        assert_eq!((r.rows(), r.cols()), (1, 2));
        let err = MorphismKind::Relation
            .decode_cross("111", &zero, &z2)
            .expect_err("should error");
        assert_eq!(err.level(), GrammarLevel::Quadruple);
    }

    #[test]
    fn short_relation_on_huge_object_is_a_matrix_error() {
        let object = ObjectKind::ZnModule.decode("Z10000xZ10000").unwrap();
        let err = MorphismKind::Relation
            .decode_endomorphism("1", &object)
            .expect_err("should error");
        assert!(matches!(err, ParseError::MalformedMatrix { .. }), "err={err:?}");
    }
}
