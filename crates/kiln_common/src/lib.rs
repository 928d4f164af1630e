//! Shared foundational types used across the Kiln build accelerator.
//!
//! This crate provides interned project identifiers and artifact coordinates.

#![warn(missing_docs)]

pub mod coordinate;
pub mod ident;

pub use coordinate::{Coordinate, ParseCoordinateError};
pub use ident::{Ident, Interner};
