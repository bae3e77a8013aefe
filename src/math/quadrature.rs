//! Open-interval numerical integration.
//!
//! The mass integrals tabulated by this crate have integrands that can vanish
//! (or, for steep occupation cutoffs, fall off extremely fast) toward an
//! endpoint, so we use an *open* rule: the integrand is never evaluated at
//! either endpoint. Successive midpoint-rule refinements triple the sample
//! count per stage, and polynomial extrapolation of the stage estimates to
//! zero step size accelerates convergence.
//!
//! The integrator is behind a small trait so the tabulation driver can be
//! exercised with stub quadrature in tests.

use crate::error::{ErrorKind, HaloError};

/// Relative accuracy target for the extrapolated integral.
const REL_TOL: f64 = 1.0e-6;

/// Maximum number of midpoint refinement stages before giving up.
const MAX_STAGES: usize = 14;

/// Number of consecutive stage estimates entering each extrapolation.
const EXTRAP_POINTS: usize = 5;

/// One-dimensional definite integration over `[a, b]`.
pub trait Integrator {
    fn integrate(&self, f: &dyn Fn(f64) -> f64, a: f64, b: f64) -> Result<f64, HaloError>;
}

/// Midpoint-rule refinement with Romberg-style extrapolation to zero step.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenRomberg;

impl OpenRomberg {
    /// Stage `stage` of the composite midpoint rule.
    ///
    /// Stage 0 uses the single interval midpoint; each later stage triples
    /// the number of points, reusing the previous running estimate `prev` so
    /// no abscissa is ever evaluated twice.
    fn midpoint_stage(f: &dyn Fn(f64) -> f64, a: f64, b: f64, stage: usize, prev: f64) -> f64 {
        if stage == 0 {
            return (b - a) * f(0.5 * (a + b));
        }
        let it = 3usize.pow(stage as u32 - 1);
        let del = (b - a) / (3.0 * it as f64);
        let ddel = 2.0 * del;
        let mut x = a + 0.5 * del;
        let mut sum = 0.0;
        for _ in 0..it {
            sum += f(x);
            x += ddel;
            sum += f(x);
            x += del;
        }
        (prev + (b - a) * sum / it as f64) / 3.0
    }
}

impl Integrator for OpenRomberg {
    fn integrate(&self, f: &dyn Fn(f64) -> f64, a: f64, b: f64) -> Result<f64, HaloError> {
        if a == b {
            return Ok(0.0);
        }

        // h[j] is the squared relative step of stage j: the midpoint rule's
        // error expansion is in even powers of the step, and tripling the
        // points divides the step by 3, so consecutive stages shrink h by 9.
        let mut h = Vec::with_capacity(MAX_STAGES);
        let mut s = Vec::with_capacity(MAX_STAGES);
        h.push(1.0);

        let mut prev = 0.0;
        for stage in 0..MAX_STAGES {
            let value = Self::midpoint_stage(f, a, b, stage, prev);
            prev = value;
            s.push(value);

            if s.len() >= EXTRAP_POINTS {
                let tail = s.len() - EXTRAP_POINTS;
                let (estimate, correction) = extrapolate_to_zero(&h[tail..s.len()], &s[tail..])?;
                if correction.abs() <= REL_TOL * estimate.abs() {
                    return Ok(estimate);
                }
            }

            h.push(h[stage] / 9.0);
        }

        Err(HaloError::new(
            ErrorKind::Numerics,
            format!("Quadrature failed to converge within {MAX_STAGES} stages."),
        ))
    }
}

/// Polynomial (Neville) extrapolation of stage estimates to `h = 0`.
///
/// Returns the extrapolated value and the magnitude of the final tableau
/// correction, which serves as the error estimate.
fn extrapolate_to_zero(h: &[f64], s: &[f64]) -> Result<(f64, f64), HaloError> {
    let n = h.len();
    let mut c = s.to_vec();
    let mut d = s.to_vec();

    // h is strictly decreasing toward zero, so the last point is nearest the
    // extrapolation target.
    let mut ns = n - 1;
    let mut y = s[ns];
    let mut dy = 0.0;
    if ns > 0 {
        ns -= 1;
    }

    for m in 1..n {
        for i in 0..(n - m) {
            let ho = h[i];
            let hp = h[i + m];
            let w = c[i + 1] - d[i];
            let den = ho - hp;
            if den == 0.0 {
                return Err(HaloError::new(
                    ErrorKind::Numerics,
                    "Degenerate step sizes in quadrature extrapolation.",
                ));
            }
            let scaled = w / den;
            d[i] = hp * scaled;
            c[i] = ho * scaled;
        }
        if 2 * (ns + 1) < n - m {
            dy = c[ns + 1];
        } else {
            dy = d[ns];
            if ns > 0 {
                ns -= 1;
            }
        }
        y += dy;
    }

    Ok((y, dy))
}
