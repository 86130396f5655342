//! Canonical text emission, in the layout the engine writes.

use std::fmt::Write as _;

use crate::hierarchy::{Classes, ParsedOutput};
use crate::preamble::{
    BIJECTION_HYPOTHESIS, ENDOMORPHISM, FUNCTOR_NAME, MAP_HYPOTHESIS, MORPHISM,
    NUMBER_OF_CLASSES, NUMBER_OF_ENDOMORPHISMS, OBJECT, STRONG_BIJECTION_HYPOTHESIS,
};
use crate::timing::{CATEGORY_GENERATED_AFTER, ISO_CLASSES_GENERATED_AFTER};
use crate::witness::IsoWitnessQuadruple;

pub fn format_output(output: &ParsedOutput) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_output(&mut out, output);
    out
}

fn write_output(out: &mut String, output: &ParsedOutput) -> std::fmt::Result {
    let p = &output.preamble;
    let morphism_label = match output.classes {
        Classes::Objects(_) => ENDOMORPHISM,
        Classes::Witnesses(_) => MORPHISM,
    };

    writeln!(out, "{FUNCTOR_NAME}: {}", p.functor_name)?;
    writeln!(out, "{OBJECT}: {}", p.object_kind)?;
    writeln!(out, "{morphism_label}: {}", p.morphism_kind)?;
    if let Some(count) = p.endomorphism_count {
        writeln!(out, "{NUMBER_OF_ENDOMORPHISMS}: {count}")?;
    }
    writeln!(out, "{NUMBER_OF_CLASSES}: {}", p.class_count)?;
    writeln!(out, "{MAP_HYPOTHESIS}: {}", p.map_hypothesis)?;
    writeln!(out, "{BIJECTION_HYPOTHESIS}: {}", p.bijection_hypothesis)?;
    if let Some(strong) = p.strong_bijection_hypothesis {
        writeln!(out, "{STRONG_BIJECTION_HYPOTHESIS}: {strong}")?;
    }
    writeln!(out, "===")?;

    match &output.classes {
        Classes::Objects(classes) => {
            for class in classes {
                writeln!(out, "---")?;
                for group in class {
                    writeln!(out, "-")?;
                    writeln!(out, "{}:", group.object)?;
                    for relation in &group.endomorphisms {
                        writeln!(out, "{relation}")?;
                    }
                }
            }
        }
        Classes::Witnesses(classes) => {
            for class in classes {
                writeln!(out, "---")?;
                for (i, quadruple) in class.iter().enumerate() {
                    if i > 0 {
                        writeln!(out, "--")?;
                    }
                    writeln!(out, "{}", quadruple_line(quadruple))?;
                }
            }
        }
    }

    if let Some(timings) = &output.timings {
        writeln!(out, "===")?;
        if let Some(value) = timings.category_generated_after {
            writeln!(out, "{CATEGORY_GENERATED_AFTER}: {value}")?;
        }
        if let Some(value) = timings.iso_classes_generated_after {
            writeln!(out, "{ISO_CLASSES_GENERATED_AFTER}: {value}")?;
        }
    }
    Ok(())
}

/// `endo_object:endo-bij_object:bij--endo_to_bij-bij_to_endo`
pub fn quadruple_line(q: &IsoWitnessQuadruple) -> String {
    format!(
        "{}:{}-{}:{}--{}-{}",
        q.endo_object, q.endo, q.bij_object, q.bij, q.endo_to_bij, q.bij_to_endo
    )
}
