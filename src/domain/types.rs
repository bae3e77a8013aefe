//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during tabulation
//! - exported alongside diagnostic bundles
//! - reloaded later for plotting or comparisons

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, HaloError};

/// Cosmological background quantities entering the spherical-overdensity
/// mass–radius relation.
///
/// Units are the caller's choice but must be mutually consistent: masses in
/// the units of `rho_crit × volume`, separations in the length unit of that
/// volume (conventionally M⊙/h and Mpc/h).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cosmology {
    /// Critical density of the universe.
    pub rho_crit: f64,
    /// Mean matter density fraction Ω_m.
    pub omega_m: f64,
    /// Halo overdensity threshold Δ relative to the mean matter density.
    pub delta_halo: f64,
}

impl Cosmology {
    /// Critical density in (M⊙/h) / (Mpc/h)³.
    pub const RHO_CRIT: f64 = 2.775e11;

    /// A flat ΛCDM background with Δ = 200 halos, adequate for quick checks.
    pub fn fiducial() -> Self {
        Self {
            rho_crit: Self::RHO_CRIT,
            omega_m: 0.3,
            delta_halo: 200.0,
        }
    }
}

/// Verbosity of the tabulation pass.
///
/// `Progress` emits one line per tabulated point on stderr. `Trace`
/// additionally appends per-point records to the diagnostic sink (see the
/// `debug` module). Diagnostics never alter computed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    Progress,
    Trace,
}

/// Full configuration of the one-halo term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHaloConfig {
    pub cosmology: Cosmology,

    /// Minimum halo mass allowed to host galaxies.
    pub m_low: f64,
    /// Maximum halo mass of the model; also sets the tabulated separation range.
    pub m_max: f64,

    /// Multiplicative boost applied to every concentration lookup.
    pub cvir_fac: f64,

    /// Mean galaxy number density of the sample.
    pub galaxy_density: f64,
    /// Second galaxy density for cross-correlations.
    ///
    /// `None` means "same sample on both sides", i.e. the auto-correlation
    /// normalization `galaxy_density²`.
    pub galaxy_density_2: Option<f64>,

    /// Whole-term switch. When `false`, evaluation returns 0 without ever
    /// tabulating.
    pub enabled: bool,

    /// Number of tabulated separations.
    pub table_size: usize,

    pub verbosity: Verbosity,

    /// Root of the diagnostic sink file name (used only at `Verbosity::Trace`).
    pub run_label: Option<String>,
}

/// Default tabulation length.
pub const DEFAULT_TABLE_SIZE: usize = 100;

impl OneHaloConfig {
    /// A quiet, enabled configuration with the default table size.
    pub fn new(cosmology: Cosmology, m_low: f64, m_max: f64, galaxy_density: f64) -> Self {
        Self {
            cosmology,
            m_low,
            m_max,
            cvir_fac: 1.0,
            galaxy_density,
            galaxy_density_2: None,
            enabled: true,
            table_size: DEFAULT_TABLE_SIZE,
            verbosity: Verbosity::Quiet,
            run_label: None,
        }
    }

    /// The pair of densities normalizing every tabulated sample.
    pub fn galaxy_density_pair(&self) -> (f64, f64) {
        let second = self.galaxy_density_2.unwrap_or(self.galaxy_density);
        (self.galaxy_density, second)
    }

    /// Validate the configuration before any tabulation work.
    pub fn validate(&self) -> Result<(), HaloError> {
        let c = &self.cosmology;
        if !(c.rho_crit.is_finite() && c.rho_crit > 0.0)
            || !(c.omega_m.is_finite() && c.omega_m > 0.0)
            || !(c.delta_halo.is_finite() && c.delta_halo > 0.0)
        {
            return Err(HaloError::new(
                ErrorKind::Config,
                "Cosmology fields must be finite and positive.",
            ));
        }
        if !(self.m_low.is_finite() && self.m_low > 0.0 && self.m_max.is_finite() && self.m_max > self.m_low)
        {
            return Err(HaloError::new(
                ErrorKind::Config,
                format!(
                    "Invalid halo mass bounds: m_low={:e}, m_max={:e} (must be finite, >0, and m_max>m_low).",
                    self.m_low, self.m_max
                ),
            ));
        }
        if !(self.cvir_fac.is_finite() && self.cvir_fac > 0.0) {
            return Err(HaloError::new(
                ErrorKind::Config,
                "Concentration boost factor must be finite and positive.",
            ));
        }
        let (da, db) = self.galaxy_density_pair();
        if !(da.is_finite() && da > 0.0 && db.is_finite() && db > 0.0) {
            return Err(HaloError::new(
                ErrorKind::Config,
                "Galaxy number densities must be finite and positive.",
            ));
        }
        if self.table_size < 3 {
            return Err(HaloError::new(
                ErrorKind::Config,
                "Table size must be >= 3 for spline interpolation.",
            ));
        }
        Ok(())
    }
}

/// A tabulated one-halo curve: paired separations and values, fixed length.
///
/// Separations are strictly increasing and log-uniformly spaced. Entries past
/// an early termination keep their zero value, so `r` and `xi` always have the
/// configured full length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub r: Vec<f64>,
    pub xi: Vec<f64>,
    /// Number of points whose mass integral evaluated to exactly zero.
    pub degenerate_points: usize,
}

impl Table {
    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    /// Tabulated domain `[r_min, r_max]`.
    pub fn domain(&self) -> (f64, f64) {
        (self.r[0], self.r[self.r.len() - 1])
    }
}

/// Per-separation satellite-satellite and central-satellite contributions.
///
/// Instrumentation output: the served one-halo value is always the combined
/// integral, but the decomposition is useful when inspecting which pair kind
/// dominates at a given separation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecomposedTable {
    pub r: Vec<f64>,
    pub sat_sat: Vec<f64>,
    pub cen_sat: Vec<f64>,
}
