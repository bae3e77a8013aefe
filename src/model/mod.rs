//! Halo-model collaborator contracts.
//!
//! The one-halo core consumes a handful of halo-population lookups (mass
//! function, concentration, occupation statistics, pair-separation profiles)
//! through one trait so that:
//!
//! - the integrand stays generic over the surrounding galaxy–halo model
//! - tests can instrument or stub individual lookups

pub mod synthetic;
pub mod virial;

pub use synthetic::SyntheticHaloModel;

/// Halo-population lookups consumed by the pair-count integrand.
///
/// All methods are pure functions of their arguments plus the model's own
/// (frozen) parameters. Masses are in the same unit system as the
/// [`Cosmology`](crate::domain::Cosmology) in use.
pub trait HaloModel {
    /// Halo number density per unit mass at mass `m` (dn/dM).
    fn mass_function(&self, m: f64) -> f64;

    /// Dimensionless halo concentration at mass `m`, before any boost factor.
    fn concentration(&self, m: f64) -> f64;

    /// Expected number of satellite galaxies in a halo of mass `m`.
    fn satellite_occupation(&self, m: f64) -> f64;

    /// Expected number of central galaxies in a halo of mass `m`, in `[0, 1]`.
    fn central_occupation(&self, m: f64) -> f64;

    /// Second moment of the satellite occupation distribution at mass `m`,
    /// i.e. the expected number of satellite–satellite pairs times two.
    fn satellite_pair_moment(&self, m: f64) -> f64;

    /// Satellite–satellite pair separation profile at `x = r / rvir`.
    ///
    /// This is the radial derivative of the pair fraction within `x`,
    /// normalized to unit integral over the profile's support.
    fn pair_profile_sat_sat(&self, x: f64, concentration: f64) -> f64;

    /// Central–satellite pair separation profile at `x = r / rvir`.
    fn pair_profile_cen_sat(&self, x: f64, concentration: f64) -> f64;
}

/// Shared references to a model are models too, so callers can keep hold of
/// an instrumented model while the term owns a borrow of it.
impl<M: HaloModel + ?Sized> HaloModel for &M {
    fn mass_function(&self, m: f64) -> f64 {
        (**self).mass_function(m)
    }
    fn concentration(&self, m: f64) -> f64 {
        (**self).concentration(m)
    }
    fn satellite_occupation(&self, m: f64) -> f64 {
        (**self).satellite_occupation(m)
    }
    fn central_occupation(&self, m: f64) -> f64 {
        (**self).central_occupation(m)
    }
    fn satellite_pair_moment(&self, m: f64) -> f64 {
        (**self).satellite_pair_moment(m)
    }
    fn pair_profile_sat_sat(&self, x: f64, concentration: f64) -> f64 {
        (**self).pair_profile_sat_sat(x, concentration)
    }
    fn pair_profile_cen_sat(&self, x: f64, concentration: f64) -> f64 {
        (**self).pair_profile_cen_sat(x, concentration)
    }
}
