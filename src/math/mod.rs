//! Numerical primitives: open-interval quadrature and cubic-spline interpolation.

pub mod quadrature;
pub mod spline;

pub use quadrature::*;
pub use spline::*;
