//! Zn-module objects: `"0"` or `Z<n>(xZ<n>)*`.
//!
//! The descriptor only carries torsion coefficients. Elements are generated
//! in odometer order (first coefficient outermost, last varying fastest) and
//! rendered as space-separated components, e.g. `Z2xZ3` gives
//! `"0 0", "0 1", "0 2", "1 0", "1 1", "1 2"`.

use nom::{
    character::complete::{char as pchar, digit1},
    combinator::all_consuming,
    multi::separated_list1,
    sequence::preceded,
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::{excerpt, GrammarLevel, ParseError};

/// Validated torsion coefficients of an object, before its elements are
/// enumerated. Relations are checked against [`ModuleShape::cardinality`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleShape {
    torsion_coefficients: Vec<u64>,
    cardinality: usize,
}

impl ModuleShape {
    /// Check the coefficients and compute the element count. The square of
    /// the count (an endomorphism's entry count) must fit in `usize`.
    pub fn new(torsion_coefficients: Vec<u64>) -> Result<Self, String> {
        if torsion_coefficients.contains(&0) {
            return Err("torsion coefficients must be at least 1".to_string());
        }

        let mut cardinality = 1usize;
        for &c in &torsion_coefficients {
            let c = usize::try_from(c).map_err(|_| format!("coefficient {c} is too large"))?;
            cardinality = cardinality
                .checked_mul(c)
                .ok_or_else(|| "module has too many elements to enumerate".to_string())?;
        }
        if cardinality.checked_mul(cardinality).is_none() {
            return Err(format!(
                "module has {cardinality} elements; its endomorphisms cannot be stored"
            ));
        }

        Ok(Self {
            torsion_coefficients,
            cardinality,
        })
    }

    pub fn torsion_coefficients(&self) -> &[u64] {
        &self.torsion_coefficients
    }

    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// Enumerate the elements.
    pub fn into_module(self) -> ZnModule {
        if self.torsion_coefficients.is_empty() {
            return ZnModule::zero();
        }
        let elements = enumerate_elements(&self.torsion_coefficients, self.cardinality);
        ZnModule {
            torsion_coefficients: self.torsion_coefficients,
            elements,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZnModule {
    torsion_coefficients: Vec<u64>,
    elements: Vec<String>,
}

impl ZnModule {
    /// The zero module: no coefficients, one element `"0"`.
    pub fn zero() -> Self {
        Self {
            torsion_coefficients: Vec::new(),
            elements: vec!["0".to_string()],
        }
    }

    /// Build a module from its torsion coefficients, enumerating its elements.
    ///
    /// An empty coefficient list gives the zero module.
    pub fn from_coefficients(torsion_coefficients: Vec<u64>) -> Result<Self, String> {
        ModuleShape::new(torsion_coefficients).map(ModuleShape::into_module)
    }

    pub fn torsion_coefficients(&self) -> &[u64] {
        &self.torsion_coefficients
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn cardinality(&self) -> usize {
        self.elements.len()
    }

    pub fn is_zero(&self) -> bool {
        self.torsion_coefficients.is_empty()
    }
}

impl std::fmt::Display for ZnModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let parts: Vec<String> = self
            .torsion_coefficients
            .iter()
            .map(|c| format!("Z{c}"))
            .collect();
        f.write_str(&parts.join("x"))
    }
}

fn enumerate_elements(coefficients: &[u64], cardinality: usize) -> Vec<String> {
    let mut elements = Vec::with_capacity(cardinality);
    let mut digits = vec![0u64; coefficients.len()];
    loop {
        let rendered: Vec<String> = digits.iter().map(u64::to_string).collect();
        elements.push(rendered.join(" "));

        // advance the odometer from the rightmost position
        let mut position = coefficients.len();
        loop {
            if position == 0 {
                return elements;
            }
            position -= 1;
            digits[position] += 1;
            if digits[position] < coefficients[position] {
                break;
            }
            digits[position] = 0;
        }
    }
}

fn coefficient_list(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(pchar('x'), preceded(pchar('Z'), digit1))(input)
}

/// Decode an object descriptor.
pub fn decode_zn_module(raw: &str) -> Result<ZnModule, ParseError> {
    decode_shape(raw, None).map(ModuleShape::into_module)
}

/// Decode an object descriptor whose coefficients must all divide `base`
/// (the object is a Z/base-module).
pub fn decode_zn_module_over(raw: &str, base: u64) -> Result<ZnModule, ParseError> {
    decode_shape(raw, Some(base)).map(ModuleShape::into_module)
}

/// Decode and validate an object descriptor without enumerating elements.
pub fn decode_shape(raw: &str, base: Option<u64>) -> Result<ModuleShape, ParseError> {
    let invalid = |message: String| ParseError::InvalidObjectDescriptor {
        level: GrammarLevel::Object,
        message,
        raw: excerpt(raw),
    };

    let descriptor = raw.trim();
    if descriptor == "0" {
        return ModuleShape::new(Vec::new()).map_err(invalid);
    }

    let (_, tokens) = all_consuming(coefficient_list)(descriptor).map_err(|_| {
        invalid("expected `0` or `Z<n>` tokens joined by `x`".to_string())
    })?;

    let mut coefficients = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.len() > 1 && token.starts_with('0') {
            return Err(invalid(format!("coefficient `{token}` has a leading zero")));
        }
        let c: u64 = token
            .parse()
            .map_err(|_| invalid(format!("coefficient `{token}` is not a valid integer")))?;
        if c == 0 {
            return Err(invalid("coefficient `Z0` is not a cyclic group order".to_string()));
        }
        if let Some(base) = base {
            if base % c != 0 {
                return Err(invalid(format!(
                    "coefficient {c} does not divide the base ring order {base}"
                )));
            }
        }
        coefficients.push(c);
    }

    let shape = ModuleShape::new(coefficients).map_err(invalid)?;
    tracing::trace!(
        descriptor,
        cardinality = shape.cardinality(),
        "decoded zn-module descriptor"
    );
    Ok(shape)
}
