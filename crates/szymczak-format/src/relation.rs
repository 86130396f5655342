//! Relations between enumerated element sets, encoded as flat 0/1 strings.
//!
//! A relation from `S` to `T` is a `|S| × |T|` matrix read row-major: row
//! `i` is source element `i`, column `j` is target element `j`.
//!
//! Endomorphisms are classified on construction:
//! - **map**: every column sums to exactly 1
//! - **bijection**: every row and every column sums to exactly 1
//!
//! Cross morphisms (isomorphism witnesses between different objects) are
//! stored unclassified.

use serde::{Deserialize, Serialize};

use crate::error::{excerpt, GrammarLevel, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub is_map: bool,
    pub is_bijection: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    rows: usize,
    cols: usize,
    entries: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    classification: Option<Classification>,
}

impl Relation {
    /// Decode a square relation, inferring its dimension from the length.
    pub fn decode_square(raw: &str) -> Result<Self, ParseError> {
        let raw = raw.trim();
        let n = exact_sqrt(raw.len()).ok_or_else(|| {
            malformed(raw, format!("length {} is not a perfect square", raw.len()))
        })?;
        Self::decode_endomorphism(raw, n)
    }

    /// Decode an endomorphism of an object with `n` elements.
    pub fn decode_endomorphism(raw: &str, n: usize) -> Result<Self, ParseError> {
        let raw = raw.trim();
        let expected = n
            .checked_mul(n)
            .ok_or_else(|| malformed(raw, format!("dimension {n} is too large")))?;
        if raw.len() != expected {
            let message = match exact_sqrt(raw.len()) {
                None => format!(
                    "length {} is not a perfect square (object has {n} elements)",
                    raw.len()
                ),
                Some(found) => format!(
                    "dimension mismatch: relation is {found}x{found}, object has {n} elements"
                ),
            };
            return Err(malformed(raw, message));
        }

        let entries = parse_entries(raw)?;
        let mut relation = Self {
            rows: n,
            cols: n,
            entries,
            classification: None,
        };
        relation.classification = Some(Classification {
            is_map: relation.columns_sum_to_one(),
            is_bijection: relation.rows_sum_to_one() && relation.columns_sum_to_one(),
        });
        Ok(relation)
    }

    /// Decode an unclassified relation from an object with `rows` elements to
    /// an object with `cols` elements.
    pub fn decode_cross(raw: &str, rows: usize, cols: usize) -> Result<Self, ParseError> {
        let raw = raw.trim();
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| malformed(raw, format!("shape {rows}x{cols} is too large")))?;
        if raw.len() != expected {
            return Err(malformed(
                raw,
                format!(
                    "length {} does not match the {rows}x{cols} shape (expected {expected})",
                    raw.len()
                ),
            ));
        }
        Ok(Self {
            rows,
            cols,
            entries: parse_entries(raw)?,
            classification: None,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Entry at (`row`, `col`); `None` outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.entries.get(row * self.cols + col).copied()
    }

    /// Row-major rows of the matrix.
    pub fn matrix_rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        // chunks(0) panics, an empty matrix simply has no rows
        self.entries.chunks(self.cols.max(1)).take(self.rows)
    }

    /// `None` for cross morphisms.
    pub fn classification(&self) -> Option<Classification> {
        self.classification
    }

    pub fn is_map(&self) -> bool {
        self.classification.map_or(false, |c| c.is_map)
    }

    pub fn is_bijection(&self) -> bool {
        self.classification.map_or(false, |c| c.is_bijection)
    }

    pub fn row_sums(&self) -> Vec<usize> {
        self.matrix_rows()
            .map(|row| row.iter().map(|&e| e as usize).sum())
            .collect()
    }

    pub fn column_sums(&self) -> Vec<usize> {
        let mut sums = vec![0usize; self.cols];
        for row in self.matrix_rows() {
            for (sum, &e) in sums.iter_mut().zip(row) {
                *sum += e as usize;
            }
        }
        sums
    }

    fn rows_sum_to_one(&self) -> bool {
        self.row_sums().iter().all(|&s| s == 1)
    }

    fn columns_sum_to_one(&self) -> bool {
        self.column_sums().iter().all(|&s| s == 1)
    }

    /// Flatten back to the row-major 0/1 encoding.
    pub fn to_flat_string(&self) -> String {
        self.entries
            .iter()
            .map(|&e| if e == 1 { '1' } else { '0' })
            .collect()
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_flat_string())
    }
}

fn parse_entries(raw: &str) -> Result<Vec<u8>, ParseError> {
    raw.chars()
        .enumerate()
        .map(|(i, c)| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => Err(malformed(
                raw,
                format!("unexpected character `{other}` at position {i}"),
            )),
        })
        .collect()
}

fn exact_sqrt(len: usize) -> Option<usize> {
    let mut n = (len as f64).sqrt() as usize;
    // correct float rounding in either direction
    while n * n > len {
        n -= 1;
    }
    while (n + 1) * (n + 1) <= len {
        n += 1;
    }
    (n * n == len).then_some(n)
}

fn malformed(raw: &str, message: String) -> ParseError {
    ParseError::MalformedMatrix {
        level: GrammarLevel::Relation,
        message,
        raw: excerpt(raw),
    }
}
