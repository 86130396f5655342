//! Hypothesis survey over a results directory.
//!
//! Sweep runs store one file per (base, dimension) pair, named
//! `Z<base>-dim-<dim>`. Only the preamble of each file is decoded.

use anyhow::{Context, Result};
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;
use szymczak_format::parse_preamble;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyRow {
    pub base: u64,
    pub dim: u64,
    pub map_hypothesis: bool,
    pub bijection_hypothesis: bool,
    pub strong_bijection_hypothesis: Option<bool>,
}

impl fmt::Display for SurveyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strong = match self.strong_bijection_hypothesis {
            Some(v) => v.to_string(),
            None => "unknown".to_string(),
        };
        write!(
            f,
            "Z{}-Modules to dimension {}: {}, {}, {}",
            self.base, self.dim, self.map_hypothesis, self.bijection_hypothesis, strong
        )
    }
}

fn file_name_pattern() -> Result<Regex> {
    Ok(Regex::new(r"^Z(\d+)-dim-(\d+)$")?)
}

/// `(base, dim)` encoded in a result file name.
pub fn parse_file_name(pattern: &Regex, name: &str) -> Option<(u64, u64)> {
    let caps = pattern.captures(name)?;
    let base = caps.get(1)?.as_str().parse().ok()?;
    let dim = caps.get(2)?.as_str().parse().ok()?;
    Some((base, dim))
}

/// Text before the first `===` line.
fn preamble_section(text: &str) -> &str {
    let mut offset = 0usize;
    for line in text.split_inclusive('\n') {
        if line.trim() == "===" {
            return &text[..offset];
        }
        offset += line.len();
    }
    text
}

/// Survey rows sorted by base, then dimension. Files whose preamble does not
/// decode are logged and skipped.
pub fn survey(dir: &Path) -> Result<Vec<SurveyRow>> {
    let pattern = file_name_pattern()?;
    let mut rows = Vec::new();

    for entry in WalkDir::new(dir).into_iter() {
        let entry = entry.with_context(|| format!("failed to walk `{}`", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some((base, dim)) = entry
            .file_name()
            .to_str()
            .and_then(|name| parse_file_name(&pattern, name))
        else {
            continue;
        };

        let path = entry.path();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        match parse_preamble(preamble_section(&text)) {
            Ok(preamble) => rows.push(SurveyRow {
                base,
                dim,
                map_hypothesis: preamble.map_hypothesis,
                bijection_hypothesis: preamble.bijection_hypothesis,
                strong_bijection_hypothesis: preamble.strong_bijection_hypothesis,
            }),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping result file");
            }
        }
    }

    rows.sort_by_key(|row| (row.base, row.dim));
    tracing::info!(files = rows.len(), dir = %dir.display(), "survey complete");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preamble(map: bool, bij: bool, strong: bool) -> String {
        format!(
            "Functor name: Szymczak\nObject: Zn-Module\nEndomorphism: Relation\n\
             Number of classes: 1\nEvery class has a map: {map}\n\
             Every class has a bijection: {bij}\n\
             Every class has exactly one bijection: {strong}\n===\n---\n-\n0:\n1\n"
        )
    }

    #[test]
    fn file_names_carry_base_and_dimension() {
        let pattern = file_name_pattern().expect("pattern");
        assert_eq!(parse_file_name(&pattern, "Z5-dim-2"), Some((5, 2)));
        assert_eq!(parse_file_name(&pattern, "Z5-dim-2.pdf"), None);
        assert_eq!(parse_file_name(&pattern, "notes.txt"), None);
    }

    #[test]
    fn preamble_section_stops_at_separator() {
        assert_eq!(preamble_section("a: b\n===\nbody"), "a: b\n");
        assert_eq!(preamble_section("no separator"), "no separator");
    }

    #[test]
    fn reads_each_hypothesis_from_its_own_label() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("dim1");
        fs::create_dir_all(&nested).expect("mkdir");
        fs::write(nested.join("Z3-dim-1"), preamble(true, false, false)).expect("write");
        fs::write(nested.join("Z2-dim-2"), preamble(true, true, false)).expect("write");
        fs::write(nested.join("Z2-dim-1"), preamble(false, true, true)).expect("write");
        fs::write(nested.join("Z7-dim-1"), "garbage").expect("write");
        fs::write(nested.join("README"), "ignored").expect("write");

        let rows = survey(dir.path()).expect("survey");
        let lines: Vec<String> = rows.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "Z2-Modules to dimension 1: false, true, true",
                "Z2-Modules to dimension 2: true, true, false",
                "Z3-Modules to dimension 1: true, false, false",
            ]
        );
    }
}
