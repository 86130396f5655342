//! Class hypotheses recomputed from the decoded relations, and a
//! consistency report against what the preamble claims.

use serde::{Deserialize, Serialize};

use crate::hierarchy::{Classes, ParsedOutput};
use crate::preamble::{
    BIJECTION_HYPOTHESIS, MAP_HYPOTHESIS, NUMBER_OF_CLASSES, NUMBER_OF_ENDOMORPHISMS,
    STRONG_BIJECTION_HYPOTHESIS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hypotheses {
    pub map_in_every_class: bool,
    pub bijection_in_every_class: bool,
    /// Some object of every class carries exactly one bijection.
    /// `None` for witness documents, which have no per-object grouping.
    pub one_bijection_in_every_class: Option<bool>,
}

impl Hypotheses {
    pub fn compute(classes: &Classes) -> Self {
        match classes {
            Classes::Objects(classes) => Self {
                map_in_every_class: classes.iter().all(|class| {
                    class
                        .iter()
                        .any(|group| group.endomorphisms.iter().any(|r| r.is_map()))
                }),
                bijection_in_every_class: classes.iter().all(|class| {
                    class
                        .iter()
                        .any(|group| group.endomorphisms.iter().any(|r| r.is_bijection()))
                }),
                one_bijection_in_every_class: Some(classes.iter().all(|class| {
                    class.iter().any(|group| {
                        group
                            .endomorphisms
                            .iter()
                            .filter(|r| r.is_bijection())
                            .count()
                            == 1
                    })
                })),
            },
            Classes::Witnesses(classes) => Self {
                map_in_every_class: classes
                    .iter()
                    .all(|class| class.iter().any(|q| q.endo.is_map() || q.bij.is_map())),
                bijection_in_every_class: classes.iter().all(|class| {
                    class
                        .iter()
                        .any(|q| q.endo.is_bijection() || q.bij.is_bijection())
                }),
                one_bijection_in_every_class: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Inconsistency {
    Count {
        label: String,
        declared: usize,
        found: usize,
    },
    Hypothesis {
        label: String,
        declared: bool,
        computed: bool,
    },
}

impl std::fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Inconsistency::Count {
                label,
                declared,
                found,
            } => write!(f, "`{label}` declares {declared}, document has {found}"),
            Inconsistency::Hypothesis {
                label,
                declared,
                computed,
            } => write!(f, "`{label}` declares {declared}, relations give {computed}"),
        }
    }
}

/// Compare the preamble's counts and hypotheses with the decoded body.
pub fn check_consistency(output: &ParsedOutput) -> Vec<Inconsistency> {
    let preamble = &output.preamble;
    let mut findings = Vec::new();

    if preamble.class_count != output.classes.len() {
        findings.push(Inconsistency::Count {
            label: NUMBER_OF_CLASSES.to_string(),
            declared: preamble.class_count,
            found: output.classes.len(),
        });
    }

    if let (Some(declared), Classes::Objects(_)) = (preamble.endomorphism_count, &output.classes) {
        let found = output.classes.relation_count();
        if declared != found {
            findings.push(Inconsistency::Count {
                label: NUMBER_OF_ENDOMORPHISMS.to_string(),
                declared,
                found,
            });
        }
    }

    let computed = Hypotheses::compute(&output.classes);
    let mut compare = |label: &str, declared: bool, computed: bool| {
        if declared != computed {
            findings.push(Inconsistency::Hypothesis {
                label: label.to_string(),
                declared,
                computed,
            });
        }
    };
    compare(MAP_HYPOTHESIS, preamble.map_hypothesis, computed.map_in_every_class);
    compare(
        BIJECTION_HYPOTHESIS,
        preamble.bijection_hypothesis,
        computed.bijection_in_every_class,
    );
    if let (Some(declared), Some(computed)) = (
        preamble.strong_bijection_hypothesis,
        computed.one_bijection_in_every_class,
    ) {
        compare(STRONG_BIJECTION_HYPOTHESIS, declared, computed);
    }

    for finding in &findings {
        tracing::debug!(%finding, "preamble disagrees with body");
    }
    findings
}
