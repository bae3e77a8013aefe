//! Spherical-overdensity relations between halo mass and radius.
//!
//! A halo of mass `m` is the region whose mean enclosed density equals
//! `Δ · Ω_m · ρ_crit`. The pair-separation profiles take their argument as
//! `x = r / rvir` with a virial radius defined as *twice* the characteristic
//! overdensity radius, so both forms are provided.

use std::f64::consts::PI;

use crate::domain::Cosmology;

/// Characteristic overdensity radius: `(3m / (4π·Δ·Ω_m·ρ_crit))^(1/3)`.
pub fn halo_radius(m: f64, cosmology: &Cosmology) -> f64 {
    (3.0 * m / (4.0 * PI * cosmology.delta_halo * cosmology.omega_m * cosmology.rho_crit))
        .powf(1.0 / 3.0)
}

/// Virial radius under the doubled-radius convention used by the pair profiles.
pub fn virial_radius(m: f64, cosmology: &Cosmology) -> f64 {
    2.0 * halo_radius(m, cosmology)
}

/// Mass enclosed by a sphere of `radius` at the overdensity threshold.
///
/// Inverse of [`halo_radius`].
pub fn enclosed_mass(radius: f64, cosmology: &Cosmology) -> f64 {
    4.0 / 3.0 * PI * cosmology.rho_crit * cosmology.delta_halo * cosmology.omega_m * radius.powi(3)
}
