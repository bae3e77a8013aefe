//! `hod-curves` — the real-space one-halo term of galaxy clustering.
//!
//! Given a halo occupation model (mass function, concentration, occupation
//! statistics, pair-separation profiles), this crate tabulates the number
//! density excess of galaxy pairs residing in the same halo as a function of
//! separation, fits a cubic spline over the tabulation, and serves point
//! queries through the cached interpolant.
//!
//! The crate is a library on purpose:
//!
//! - the surrounding application owns configuration, fitting, and any CLI
//! - core logic stays testable without spawning processes
//! - the collaborator seam (`model::HaloModel`) keeps the integrand generic
//!   over the galaxy–halo model in use
//!
//! Entry point: [`onehalo::OneHaloTerm`].

pub mod debug;
pub mod domain;
pub mod error;
pub mod math;
pub mod model;
pub mod onehalo;
