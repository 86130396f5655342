//! Preamble: labeled `Label: value` lines before the first `===`.

use serde::{Deserialize, Serialize};

use crate::error::{excerpt, ParseError};

pub const FUNCTOR_NAME: &str = "Functor name";
pub const OBJECT: &str = "Object";
pub const ENDOMORPHISM: &str = "Endomorphism";
pub const MORPHISM: &str = "Morphism";
pub const NUMBER_OF_ENDOMORPHISMS: &str = "Number of endomorphisms";
pub const NUMBER_OF_CLASSES: &str = "Number of classes";
pub const MAP_HYPOTHESIS: &str = "Every class has a map";
pub const BIJECTION_HYPOTHESIS: &str = "Every class has a bijection";
pub const STRONG_BIJECTION_HYPOTHESIS: &str = "Every class has exactly one bijection";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preamble {
    pub functor_name: String,
    pub object_kind: String,
    pub morphism_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endomorphism_count: Option<usize>,
    pub class_count: usize,
    pub map_hypothesis: bool,
    pub bijection_hypothesis: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strong_bijection_hypothesis: Option<bool>,
}

/// Labeled lines of a block, in order. Lines without `: ` are skipped.
struct LabeledLines<'a> {
    raw: &'a str,
    entries: Vec<(&'a str, &'a str)>,
}

impl<'a> LabeledLines<'a> {
    fn new(raw: &'a str) -> Self {
        let entries = raw
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(label, value)| (label.trim(), value.trim()))
            .collect();
        Self { raw, entries }
    }

    /// First value recorded under `label`.
    fn find(&self, label: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| *v)
    }

    fn missing(&self, label: &str) -> ParseError {
        ParseError::MalformedPreamble {
            message: format!("missing required label `{label}`"),
            raw: excerpt(self.raw),
        }
    }

    fn required(&self, label: &str) -> Result<&'a str, ParseError> {
        match self.find(label) {
            Some(value) if !value.is_empty() => Ok(value),
            Some(_) => Err(ParseError::MalformedPreamble {
                message: format!("label `{label}` has an empty value"),
                raw: excerpt(self.raw),
            }),
            None => Err(self.missing(label)),
        }
    }

    fn count(&self, label: &str, value: &str) -> Result<usize, ParseError> {
        value.parse().map_err(|_| ParseError::MalformedPreamble {
            message: format!("`{label}` expects a non-negative integer, got `{value}`"),
            raw: excerpt(value),
        })
    }

    fn flag(&self, label: &str, value: &str) -> Result<bool, ParseError> {
        match value {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(ParseError::MalformedPreamble {
                message: format!("`{label}` expects `true` or `false`, got `{other}`"),
                raw: excerpt(other),
            }),
        }
    }
}

/// Decode the preamble block.
///
/// Unknown labels are ignored; when a label repeats, the first occurrence
/// wins. `Morphism` is accepted in place of `Endomorphism`.
pub fn parse_preamble(raw: &str) -> Result<Preamble, ParseError> {
    let lines = LabeledLines::new(raw);

    let functor_name = lines.required(FUNCTOR_NAME)?.to_string();
    let object_kind = lines.required(OBJECT)?.to_string();
    let morphism_kind = match lines.find(ENDOMORPHISM).or_else(|| lines.find(MORPHISM)) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => {
            return Err(ParseError::MalformedPreamble {
                message: format!("missing required label `{ENDOMORPHISM}` (or `{MORPHISM}`)"),
                raw: excerpt(raw),
            })
        }
    };

    let endomorphism_count = lines
        .find(NUMBER_OF_ENDOMORPHISMS)
        .map(|v| lines.count(NUMBER_OF_ENDOMORPHISMS, v))
        .transpose()?;
    let class_count = lines.count(NUMBER_OF_CLASSES, lines.required(NUMBER_OF_CLASSES)?)?;
    let map_hypothesis = lines.flag(MAP_HYPOTHESIS, lines.required(MAP_HYPOTHESIS)?)?;
    let bijection_hypothesis =
        lines.flag(BIJECTION_HYPOTHESIS, lines.required(BIJECTION_HYPOTHESIS)?)?;
    let strong_bijection_hypothesis = lines
        .find(STRONG_BIJECTION_HYPOTHESIS)
        .map(|v| lines.flag(STRONG_BIJECTION_HYPOTHESIS, v))
        .transpose()?;

    Ok(Preamble {
        functor_name,
        object_kind,
        morphism_kind,
        endomorphism_count,
        class_count,
        map_hypothesis,
        bijection_hypothesis,
        strong_bijection_hypothesis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "Functor name: Szymczak\n\
        Object: Zn-Module\n\
        Endomorphism: Relation\n\
        Number of endomorphisms: 6\n\
        Number of classes: 3\n\
        Every class has a map: true\n\
        Every class has a bijection: false\n\
        Every class has exactly one bijection: false\n";

    #[test]
    fn parses_all_labels() {
        let p = parse_preamble(FULL).expect("parse");
        assert_eq!(
            p,
            Preamble {
                functor_name: "Szymczak".to_string(),
                object_kind: "Zn-Module".to_string(),
                morphism_kind: "Relation".to_string(),
                endomorphism_count: Some(6),
                class_count: 3,
                map_hypothesis: true,
                bijection_hypothesis: false,
                strong_bijection_hypothesis: Some(false),
            }
        );
    }

    #[test]
    fn optional_labels_may_be_absent_and_morphism_is_accepted() {
        let raw = "Functor name: Szymczak\nObject: Z3-Module\nMorphism: Relation\n\
                   Number of classes: 0\nEvery class has a map: false\n\
                   Every class has a bijection: true\nGenerated by: engine v2\n";
        let p = parse_preamble(raw).expect("parse");
        assert_eq!(p.morphism_kind, "Relation");
        assert_eq!(p.endomorphism_count, None);
        assert_eq!(p.strong_bijection_hypothesis, None);
        assert!(!p.map_hypothesis);
        assert!(p.bijection_hypothesis);
    }

    #[test]
    fn missing_required_label_is_reported() {
        let raw = FULL.replace("Number of classes: 3\n", "");
        let err = parse_preamble(&raw).expect_err("should error");
        assert!(err.to_string().contains("`Number of classes`"), "err={err}");
    }

    #[test]
    fn flags_must_be_literal_booleans() {
        let raw = FULL.replace("a map: true", "a map: yes");
        let err = parse_preamble(&raw).expect_err("should error");
        assert!(err.to_string().contains("got `yes`"), "err={err}");
    }

    #[test]
    fn counts_must_be_integers() {
        let raw = FULL.replace("endomorphisms: 6", "endomorphisms: six");
        let err = parse_preamble(&raw).expect_err("should error");
        assert!(matches!(err, ParseError::MalformedPreamble { .. }));
    }

    #[test]
    fn first_occurrence_wins() {
        let raw = format!("{FULL}Functor name: Other\n");
        assert_eq!(parse_preamble(&raw).unwrap().functor_name, "Szymczak");
    }
}
