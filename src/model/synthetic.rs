//! Analytic synthetic halo model.
//!
//! A self-contained [`HaloModel`] with smooth, physically shaped ingredients:
//! a power-law mass function with an exponential high-mass cutoff, a
//! power-law concentration–mass relation, a smooth central occupation step
//! with power-law satellites, Poisson satellite pairs, and compact polynomial
//! pair profiles. It is not calibrated against simulations; its job is to
//! give tests and quick experiments a deterministic model with realistic
//! orders of magnitude.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::LogNormal;

use crate::error::{ErrorKind, HaloError};
use crate::model::HaloModel;

/// Pivot mass for the power laws.
const M_PIVOT: f64 = 1.0e13;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticHaloModel {
    /// Mass-function normalization: dn/dlnM at the pivot mass.
    pub amplitude: f64,
    /// Low-mass logarithmic slope of dn/dlnM (positive: falling).
    pub slope: f64,
    /// Exponential cutoff mass of the mass function.
    pub m_cut: f64,
    /// Concentration at the pivot mass.
    pub c0: f64,
    /// Concentration power-law slope (negative: massive halos are less
    /// concentrated).
    pub c_slope: f64,
    /// Mass scale of the central occupation step.
    pub m_min_gal: f64,
    /// Width of the central step in ln M.
    pub sigma_ln_m: f64,
    /// Satellite normalization mass (one satellite per halo at `m_one`,
    /// modulo the central factor).
    pub m_one: f64,
    /// Satellite power-law slope.
    pub alpha_sat: f64,
}

impl SyntheticHaloModel {
    /// A fixed, hand-picked parameter set with realistic magnitudes.
    pub fn fiducial() -> Self {
        Self {
            amplitude: 1.0e-4,
            slope: 1.9,
            m_cut: 3.0e14,
            c0: 9.0,
            c_slope: -0.1,
            m_min_gal: 5.0e11,
            sigma_ln_m: 0.4,
            m_one: 1.0e13,
            alpha_sat: 1.0,
        }
    }

    /// A randomized parameter set, deterministic for a given seed.
    ///
    /// Parameters are drawn from ranges wide enough to exercise the
    /// integrand but narrow enough that every draw stays physically shaped
    /// (monotone concentration, positive occupations).
    pub fn random(seed: u64) -> Result<Self, HaloError> {
        let mut rng = StdRng::seed_from_u64(seed);

        let m_min_dist = LogNormal::new((5.0e11f64).ln(), 0.5)
            .map_err(|e| HaloError::new(ErrorKind::Config, format!("Mass scale distribution error: {e}")))?;
        let m_cut_dist = LogNormal::new((3.0e14f64).ln(), 0.4)
            .map_err(|e| HaloError::new(ErrorKind::Config, format!("Cutoff distribution error: {e}")))?;

        let m_min_gal: f64 = m_min_dist.sample(&mut rng);
        Ok(Self {
            amplitude: rng.gen_range(3.0e-5..=3.0e-4),
            slope: rng.gen_range(1.7..=2.0),
            m_cut: m_cut_dist.sample(&mut rng),
            c0: rng.gen_range(6.0..=12.0),
            c_slope: rng.gen_range(-0.15..=-0.05),
            m_min_gal,
            sigma_ln_m: rng.gen_range(0.2..=0.8),
            m_one: m_min_gal * rng.gen_range(10.0..=25.0),
            alpha_sat: rng.gen_range(0.9..=1.2),
        })
    }
}

impl HaloModel for SyntheticHaloModel {
    fn mass_function(&self, m: f64) -> f64 {
        // dn/dM = (dn/dlnM) / m.
        self.amplitude * (m / M_PIVOT).powf(1.0 - self.slope) * (-m / self.m_cut).exp() / m
    }

    fn concentration(&self, m: f64) -> f64 {
        self.c0 * (m / M_PIVOT).powf(self.c_slope)
    }

    fn central_occupation(&self, m: f64) -> f64 {
        // Smooth step from 0 to 1 across m_min_gal.
        let t = (m.ln() - self.m_min_gal.ln()) / self.sigma_ln_m;
        1.0 / (1.0 + (-t).exp())
    }

    fn satellite_occupation(&self, m: f64) -> f64 {
        self.central_occupation(m) * (m / self.m_one).powf(self.alpha_sat)
    }

    fn satellite_pair_moment(&self, m: f64) -> f64 {
        // Poisson satellites: <N(N-1)> = <N>².
        let nsat = self.satellite_occupation(m);
        nsat * nsat
    }

    fn pair_profile_sat_sat(&self, x: f64, _concentration: f64) -> f64 {
        // Compact polynomial profile on [0, 1): two satellites within the
        // virial radius can be at most one virial diameter apart. Unit
        // integral over the support.
        if x <= 0.0 || x >= 1.0 {
            return 0.0;
        }
        60.0 * x * x * (1.0 - x).powi(3)
    }

    fn pair_profile_cen_sat(&self, x: f64, _concentration: f64) -> f64 {
        // Central–satellite separations cannot exceed half the (doubled)
        // virial radius. Same shape as the satellite profile, compressed
        // onto [0, 1/2) with unit integral.
        if x <= 0.0 || x >= 0.5 {
            return 0.0;
        }
        let u = 2.0 * x;
        120.0 * u * u * (1.0 - u).powi(3)
    }
}
