//! Optional timing trailer appended by benchmark runs of the engine.
//!
//! ```text
//! ===
//! Category generated after: 1200
//! Isomorphisms classes generated after: 3400
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{excerpt, ParseError};

pub const CATEGORY_GENERATED_AFTER: &str = "Category generated after";
pub const ISO_CLASSES_GENERATED_AFTER: &str = "Isomorphisms classes generated after";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    pub category_generated_after: Option<u64>,
    pub iso_classes_generated_after: Option<u64>,
}

impl Timings {
    /// Sum of the recorded phases, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.category_generated_after
            .unwrap_or(0)
            .saturating_add(self.iso_classes_generated_after.unwrap_or(0))
    }
}

pub fn parse_timings(raw: &str) -> Result<Timings, ParseError> {
    let mut timings = Timings::default();
    for line in raw.lines() {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let slot = match label.trim() {
            CATEGORY_GENERATED_AFTER => &mut timings.category_generated_after,
            ISO_CLASSES_GENERATED_AFTER => &mut timings.iso_classes_generated_after,
            _ => continue,
        };
        if slot.is_some() {
            continue;
        }
        let value = value.trim();
        *slot = Some(value.parse().map_err(|_| ParseError::MalformedTiming {
            message: format!("`{}` expects a non-negative integer", label.trim()),
            raw: excerpt(line),
        })?);
    }
    Ok(timings)
}
