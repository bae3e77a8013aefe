//! Tabulation of the one-halo term over a log-spaced separation grid.
//!
//! One tabulated point = one mass integral: at separation `r`, the combined
//! integrand is integrated over `ln m` between the lightest halo large enough
//! to host the pair and the model's maximum mass, then normalized by the
//! pair-density prefactor `1 / (2π r² n_a n_b)`.
//!
//! The grid runs from a fixed physical floor up to just under the maximum
//! pair separation inside the heaviest halo, and is processed strictly in
//! increasing order so the early-termination rule can cut off the negligible
//! tail.

use std::f64::consts::PI;

use rayon::prelude::*;

use crate::debug::TraceSink;
use crate::domain::{DecomposedTable, OneHaloConfig, Table, Verbosity};
use crate::error::{ErrorKind, HaloError};
use crate::math::Integrator;
use crate::model::{HaloModel, virial};
use crate::onehalo::integrand::PairIntegrand;

/// Fixed lower edge of the tabulated separation range.
pub const R_MIN: f64 = 0.01;

/// Tabulation stops once a value falls below this; the one-halo term is
/// negligible beyond a few virial radii.
pub const EARLY_STOP_THRESHOLD: f64 = 1.0e-10;

/// Upper edge factor relative to the maximum halo's characteristic radius,
/// just under the largest pair separation that halo can host.
const R_MAX_FACTOR: f64 = 1.9;

/// One tabulated sample with its normalization.
#[derive(Debug, Clone, Copy)]
pub struct PointSample {
    pub value: f64,
    pub prefactor: f64,
    /// The mass integral evaluated to exactly zero.
    pub degenerate: bool,
}

/// Largest tabulated separation for this configuration.
pub fn max_separation(config: &OneHaloConfig) -> f64 {
    R_MAX_FACTOR * virial::halo_radius(config.m_max, &config.cosmology)
}

/// Log-uniform grid of `n` separations from `r_lo` to `r_hi` (inclusive).
pub fn separation_grid(r_lo: f64, r_hi: f64, n: usize) -> Result<Vec<f64>, HaloError> {
    if !(r_lo.is_finite() && r_hi.is_finite() && r_lo > 0.0 && r_hi > r_lo) {
        return Err(HaloError::new(
            ErrorKind::Config,
            format!("Invalid separation range: [{r_lo}, {r_hi}] (must be finite, >0, increasing)."),
        ));
    }
    if n < 2 {
        return Err(HaloError::new(
            ErrorKind::Config,
            "Separation grid needs at least 2 points.",
        ));
    }

    let ln_lo = r_lo.ln();
    let step = (r_hi.ln() - ln_lo) / (n as f64 - 1.0);
    let mut grid: Vec<f64> = (0..n).map(|i| (ln_lo + step * i as f64).exp()).collect();
    // Pin the endpoints: the exp/ln round trip can be off by an ulp, and the
    // table domain must be exactly [r_lo, r_hi].
    grid[0] = r_lo;
    grid[n - 1] = r_hi;
    Ok(grid)
}

/// Log-mass integration bounds at separation `r`.
///
/// Only halos whose characteristic radius exceeds half the separation can
/// host a pair that far apart, so the lower bound is the mass enclosed at
/// `r / 2`, floored at the configured minimum mass.
fn mass_bounds(config: &OneHaloConfig, r: f64) -> Result<(f64, f64), HaloError> {
    let m_lo = virial::enclosed_mass(0.5 * r, &config.cosmology).max(config.m_low);
    if m_lo >= config.m_max {
        return Err(HaloError::new(
            ErrorKind::Numerics,
            format!("Empty mass integration interval at r={r}: m_lo={m_lo:e} >= m_max={:e}.", config.m_max),
        ));
    }
    Ok((m_lo.ln(), config.m_max.ln()))
}

fn pair_prefactor(config: &OneHaloConfig, r: f64) -> f64 {
    let (density_a, density_b) = config.galaxy_density_pair();
    1.0 / (2.0 * PI * r * r * density_a * density_b)
}

/// Compute one tabulated value of the one-halo term at separation `r`.
pub fn tabulate_one_point<M: HaloModel, Q: Integrator>(
    model: &M,
    config: &OneHaloConfig,
    integrator: &Q,
    r: f64,
) -> Result<PointSample, HaloError> {
    let prefactor = pair_prefactor(config, r);
    let (ln_lo, ln_hi) = mass_bounds(config, r)?;

    let integrand = PairIntegrand::new(model, config, r);
    let raw = integrator.integrate(&|ln_m| integrand.combined(ln_m), ln_lo, ln_hi)?;

    Ok(PointSample {
        value: prefactor * raw,
        prefactor,
        degenerate: raw == 0.0,
    })
}

/// Tabulate the one-halo term across the full separation grid.
///
/// The returned table always has the configured full length; entries after an
/// early termination keep their zero value.
pub fn build_table<M: HaloModel, Q: Integrator>(
    model: &M,
    config: &OneHaloConfig,
    integrator: &Q,
) -> Result<Table, HaloError> {
    config.validate()?;

    let n = config.table_size;
    let r_hi = max_separation(config);
    let r = separation_grid(R_MIN, r_hi, n)?;
    let mut xi = vec![0.0; n];
    let mut degenerate_points = 0;

    if config.verbosity >= Verbosity::Progress {
        eprintln!("one_halo> tabulating {n} points in [{R_MIN:.4}, {r_hi:.4}]");
    }
    let mut sink = TraceSink::open(config)?;

    for (i, &ri) in r.iter().enumerate() {
        let sample = tabulate_one_point(model, config, integrator, ri)?;
        xi[i] = sample.value;
        if sample.degenerate {
            degenerate_points += 1;
        }

        if config.verbosity >= Verbosity::Progress {
            eprintln!("one_halo> {ri:.6} {:.6e} {:.6e}", sample.value, sample.prefactor);
        }
        if let Some(sink) = sink.as_mut() {
            sink.record(ri, sample.value, sample.prefactor)?;
        }

        if sample.value < EARLY_STOP_THRESHOLD {
            break;
        }
    }

    Ok(Table {
        r,
        xi,
        degenerate_points,
    })
}

/// Tabulate the satellite–satellite and central–satellite contributions
/// separately across the full grid.
///
/// Instrumentation companion to [`build_table`]: the served term always uses
/// the combined integral, but the decomposition shows which pair kind
/// dominates where. Central–satellite pairs cannot reach beyond half the
/// maximum pair separation, so that integral is skipped (zero) for larger
/// `r`. There is no early-termination contract here, and every integrand
/// binds its own separation, so the grid is evaluated in parallel.
pub fn build_decomposed_table<M, Q>(
    model: &M,
    config: &OneHaloConfig,
    integrator: &Q,
) -> Result<DecomposedTable, HaloError>
where
    M: HaloModel + Sync,
    Q: Integrator + Sync,
{
    config.validate()?;

    let r_hi = max_separation(config);
    let r = separation_grid(R_MIN, r_hi, config.table_size)?;
    let cen_sat_limit = 0.5 * r_hi;

    let parts: Vec<(f64, f64)> = r
        .par_iter()
        .map(|&ri| -> Result<(f64, f64), HaloError> {
            let prefactor = pair_prefactor(config, ri);
            let (ln_lo, ln_hi) = mass_bounds(config, ri)?;
            let integrand = PairIntegrand::new(model, config, ri);

            let ss = prefactor * integrator.integrate(&|ln_m| integrand.sat_sat(ln_m), ln_lo, ln_hi)?;
            let cs = if ri < cen_sat_limit {
                prefactor * integrator.integrate(&|ln_m| integrand.cen_sat(ln_m), ln_lo, ln_hi)?
            } else {
                0.0
            };
            Ok((ss, cs))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (sat_sat, cen_sat) = parts.into_iter().unzip();
    Ok(DecomposedTable { r, sat_sat, cen_sat })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Cosmology;
    use crate::math::OpenRomberg;
    use crate::model::SyntheticHaloModel;

    fn base_config() -> OneHaloConfig {
        OneHaloConfig::new(Cosmology::fiducial(), 1.0e11, 1.0e15, 1.0e-3)
    }

    /// Stub integrator: every integral is exactly zero.
    struct ZeroIntegrator;
    impl Integrator for ZeroIntegrator {
        fn integrate(&self, _f: &dyn Fn(f64) -> f64, _a: f64, _b: f64) -> Result<f64, HaloError> {
            Ok(0.0)
        }
    }

    /// Synthetic model with pair profiles compressed onto x < 0.25 (still
    /// smooth), so separations beyond a quarter of the largest virial radius
    /// have exactly zero contribution.
    struct CompactModel(SyntheticHaloModel);
    impl HaloModel for CompactModel {
        fn mass_function(&self, m: f64) -> f64 {
            self.0.mass_function(m)
        }
        fn concentration(&self, m: f64) -> f64 {
            self.0.concentration(m)
        }
        fn satellite_occupation(&self, m: f64) -> f64 {
            self.0.satellite_occupation(m)
        }
        fn central_occupation(&self, m: f64) -> f64 {
            self.0.central_occupation(m)
        }
        fn satellite_pair_moment(&self, m: f64) -> f64 {
            self.0.satellite_pair_moment(m)
        }
        fn pair_profile_sat_sat(&self, x: f64, c: f64) -> f64 {
            self.0.pair_profile_sat_sat(4.0 * x, c)
        }
        fn pair_profile_cen_sat(&self, x: f64, c: f64) -> f64 {
            self.0.pair_profile_cen_sat(4.0 * x, c)
        }
    }

    #[test]
    fn grid_matches_closed_form() {
        let grid = separation_grid(0.01, 3.0, 100).unwrap();
        assert_eq!(grid.len(), 100);
        let dr = ((3.0f64).ln() - (0.01f64).ln()) / 99.0;
        for (i, &r) in grid.iter().enumerate() {
            let expected = (i as f64 * dr + (0.01f64).ln()).exp();
            assert!(
                ((r - expected) / expected).abs() < 1e-14,
                "grid point {i}: {r} vs {expected}"
            );
        }
        assert!(grid.windows(2).all(|w| w[0] < w[1]), "grid not increasing");
        assert!((grid[0] - 0.01).abs() < 1e-15);
        assert!((grid[99] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn grid_rejects_bad_ranges() {
        assert!(separation_grid(0.0, 1.0, 10).is_err());
        assert!(separation_grid(1.0, 0.5, 10).is_err());
        assert!(separation_grid(0.1, 1.0, 1).is_err());
    }

    #[test]
    fn mass_bounds_floor_at_configured_minimum() {
        let config = base_config();
        // At tiny separations every halo qualifies, so the floor applies.
        let (ln_lo, ln_hi) = mass_bounds(&config, R_MIN).unwrap();
        assert!((ln_lo - config.m_low.ln()).abs() < 1e-12);
        assert!((ln_hi - config.m_max.ln()).abs() < 1e-12);

        // Near the top of the range the geometric bound takes over.
        let r_big = 0.9 * max_separation(&config);
        let (ln_lo_big, _) = mass_bounds(&config, r_big).unwrap();
        assert!(ln_lo_big > ln_lo);
    }

    #[test]
    fn zero_quadrature_yields_all_zero_table_and_degenerate_signal() {
        let config = base_config();
        let model = SyntheticHaloModel::fiducial();
        let table = build_table(&model, &config, &ZeroIntegrator).unwrap();

        assert_eq!(table.len(), config.table_size);
        assert!(table.xi.iter().all(|&v| v == 0.0));
        // The first point is degenerate and triggers the early stop, so no
        // later point is ever integrated.
        assert_eq!(table.degenerate_points, 1);
    }

    #[test]
    fn fiducial_table_is_positive_and_full_length() {
        let config = base_config();
        let model = SyntheticHaloModel::fiducial();
        let table = build_table(&model, &config, &OpenRomberg).unwrap();

        assert_eq!(table.len(), config.table_size);
        assert_eq!(table.r[0], R_MIN);
        assert!(table.xi[0] > 0.0, "first sample should be positive");
        assert!(table.xi.iter().all(|&v| v >= 0.0));
        assert_eq!(table.degenerate_points, 0);
    }

    #[test]
    fn early_termination_zeroes_the_tail() {
        let config = base_config();
        let model = CompactModel(SyntheticHaloModel::fiducial());
        let table = build_table(&model, &config, &OpenRomberg).unwrap();

        let first_small = table
            .xi
            .iter()
            .position(|&v| v < EARLY_STOP_THRESHOLD)
            .expect("compact model must fall below the threshold before r_max");
        assert!(first_small > 0, "compact model should still have close pairs");
        for (i, &v) in table.xi.iter().enumerate().skip(first_small + 1) {
            assert_eq!(v, 0.0, "entry {i} past early stop should be untouched");
        }
    }

    #[test]
    fn cross_correlation_density_rescales_table() {
        let model = SyntheticHaloModel::fiducial();
        let mut config = base_config();
        config.table_size = 10;

        let auto = build_table(&model, &config, &OpenRomberg).unwrap();
        config.galaxy_density_2 = Some(2.0e-3);
        let cross = build_table(&model, &config, &OpenRomberg).unwrap();

        for (a, c) in auto.xi.iter().zip(cross.xi.iter()) {
            if *a > 0.0 {
                assert!((c * 2.0 - a).abs() < 1e-9 * a, "expected halved values");
            }
        }
    }

    #[test]
    fn decomposed_table_matches_combined() {
        let model = SyntheticHaloModel::fiducial();
        let mut config = base_config();
        config.table_size = 12;

        let combined = build_table(&model, &config, &OpenRomberg).unwrap();
        let parts = build_decomposed_table(&model, &config, &OpenRomberg).unwrap();

        assert_eq!(parts.r, combined.r);
        let cen_sat_limit = 0.5 * max_separation(&config);
        for i in 0..combined.len() {
            if combined.xi[i] == 0.0 {
                continue;
            }
            // Beyond the central-satellite reach the decomposition skips the
            // cs integral, so only compare where both parts are present.
            if parts.r[i] < cen_sat_limit {
                let sum = parts.sat_sat[i] + parts.cen_sat[i];
                let rel = (sum - combined.xi[i]).abs() / combined.xi[i];
                assert!(rel < 1e-4, "decomposition off at r={}: {rel}", parts.r[i]);
            }
        }
    }

    #[test]
    fn empty_mass_interval_is_fatal() {
        let config = base_config();
        // A separation far beyond the grid: the geometric lower bound exceeds
        // the maximum halo mass, leaving nothing to integrate over.
        let r = 4.0 * max_separation(&config);
        let model = SyntheticHaloModel::fiducial();
        let err = tabulate_one_point(&model, &config, &OpenRomberg, r).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Numerics);
    }
}
