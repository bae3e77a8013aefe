//! The one-halo real-space term.
//!
//! Responsibilities:
//!
//! - evaluate the pair-count integrand at a fixed separation (`integrand`)
//! - integrate it over halo mass and tabulate across separations (`tabulate`)
//! - serve point queries through a lazily rebuilt spline (`cache`)

pub mod cache;
pub mod integrand;
pub mod tabulate;

pub use cache::*;
pub use integrand::*;
pub use tabulate::*;
