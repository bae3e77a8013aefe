//! Natural cubic spline interpolation.
//!
//! The tabulated one-halo curve is sampled on a fixed log-spaced grid and
//! then served through a smooth interpolant. A natural spline (second
//! derivative zero at both end knots, the "free boundary" convention) is the
//! right fit here: the curve flattens toward both ends of the tabulated
//! range, and we never extrapolate past the knots anyway.

use nalgebra::{DMatrix, DVector};

use crate::error::{ErrorKind, HaloError};

/// A natural cubic spline through tabulated points.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivatives at each knot, fixed at construction.
    y2: Vec<f64>,
}

impl CubicSpline {
    /// Fit a natural cubic spline through `(x, y)`.
    ///
    /// `x` must be strictly increasing and both slices finite, with at least
    /// 3 points.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self, HaloError> {
        if x.len() != y.len() {
            return Err(HaloError::new(
                ErrorKind::Numerics,
                format!("Spline knot/value length mismatch: {} vs {}.", x.len(), y.len()),
            ));
        }
        if x.len() < 3 {
            return Err(HaloError::new(
                ErrorKind::Numerics,
                "Spline fit needs at least 3 points.",
            ));
        }
        for i in 1..x.len() {
            if !(x[i].is_finite() && x[i] > x[i - 1]) {
                return Err(HaloError::new(
                    ErrorKind::Numerics,
                    format!("Spline knots must be finite and strictly increasing (index {i})."),
                ));
            }
        }
        if !x[0].is_finite() || y.iter().any(|v| !v.is_finite()) {
            return Err(HaloError::new(
                ErrorKind::Numerics,
                "Non-finite spline input.",
            ));
        }

        let n = x.len();
        let m = n - 2;

        // First-derivative continuity at each interior knot gives a
        // tridiagonal system for the interior second derivatives; the natural
        // boundary pins the end values to zero. At the table sizes used here
        // (~100 knots) a dense LU solve is fast enough that a hand-rolled
        // banded solver isn't worth carrying.
        let mut a = DMatrix::<f64>::zeros(m, m);
        let mut rhs = DVector::<f64>::zeros(m);
        for knot in 1..=m {
            let h_lo = x[knot] - x[knot - 1];
            let h_hi = x[knot + 1] - x[knot];
            let row = knot - 1;
            a[(row, row)] = (h_lo + h_hi) / 3.0;
            if row > 0 {
                a[(row, row - 1)] = h_lo / 6.0;
            }
            if row + 1 < m {
                a[(row, row + 1)] = h_hi / 6.0;
            }
            rhs[row] = (y[knot + 1] - y[knot]) / h_hi - (y[knot] - y[knot - 1]) / h_lo;
        }

        let interior = a.lu().solve(&rhs).ok_or_else(|| {
            HaloError::new(ErrorKind::Numerics, "Singular spline coefficient system.")
        })?;

        let mut y2 = vec![0.0; n];
        for (row, value) in interior.iter().enumerate() {
            y2[row + 1] = *value;
        }

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            y2,
        })
    }

    /// Evaluate the spline at `r`.
    ///
    /// Outside the knot range this continues the boundary polynomial; the
    /// caller is expected to range-guard first.
    pub fn eval(&self, r: f64) -> f64 {
        let n = self.x.len();
        let mut lo = 0;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.x[mid] > r {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let h = self.x[hi] - self.x[lo];
        let a = (self.x[hi] - r) / h;
        let b = (r - self.x[lo]) / h;
        a * self.y[lo]
            + b * self.y[hi]
            + ((a * a * a - a) * self.y2[lo] + (b * b * b - b) * self.y2[hi]) * h * h / 6.0
    }

    /// Knot range `[x_first, x_last]`.
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }
}
