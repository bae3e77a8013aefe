//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - cosmological background quantities (`Cosmology`)
//! - the one-halo model configuration (`OneHaloConfig`, `Verbosity`)
//! - tabulation outputs (`Table`, `DecomposedTable`)

pub mod types;

pub use types::*;
