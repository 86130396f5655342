//! Decoder for Szymczak functor engine output.
//!
//! The engine prints a category's isomorphism classes as nested,
//! delimiter-separated text. This crate turns that text into a typed tree:
//! Zn-module objects with their enumerated elements, relations as 0/1
//! matrices classified as maps and bijections, grouped into classes (or into
//! isomorphism-witness quadruples for the `witnesses` revision).
//!
//! Parsing is pure: no I/O, no global state, and a parse either yields a
//! complete [`ParsedOutput`] or the first structural [`ParseError`].

pub mod error;
pub mod format;
pub mod hierarchy;
pub mod hypotheses;
pub mod kind;
pub mod preamble;
pub mod relation;
pub mod segment;
pub mod timing;
pub mod witness;
pub mod zn_module;

pub use error::{GrammarLevel, KindRole, ParseError};
pub use hierarchy::{
    parse, parse_with, ClassFixedObject, Classes, IsoClass, ParseOptions, ParsedOutput, Revision,
};
pub use preamble::{parse_preamble, Preamble};
pub use relation::{Classification, Relation};
pub use witness::{IsoWitnessQuadruple, WitnessClass};
pub use zn_module::{decode_shape, decode_zn_module, ModuleShape, ZnModule};
