//! Lazily built, invalidatable interpolant over the tabulated one-halo term.
//!
//! [`OneHaloTerm`] is the public entry point of the crate: a memoized scalar
//! function of separation. The first evaluation tabulates the term and fits a
//! spline; later evaluations reuse the cached pair until `invalidate()` marks
//! it stale (upstream model parameters changed), after which the next
//! evaluation rebuilds.
//!
//! Rebuilds construct a complete new (table, spline) snapshot off to the side
//! and install it in one assignment, so a caller can never observe an old
//! grid with new values or vice versa.

use crate::domain::{DecomposedTable, OneHaloConfig, Table};
use crate::error::{ErrorKind, HaloError};
use crate::math::{CubicSpline, Integrator, OpenRomberg};
use crate::model::HaloModel;
use crate::onehalo::tabulate;

/// Table and interpolant built together and replaced together.
struct Snapshot {
    table: Table,
    spline: CubicSpline,
}

/// Summary of tabulation work done so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildReport {
    /// Number of full table builds over the lifetime of this value.
    pub builds: usize,
    /// Degenerate (exactly-zero integral) points in the current table.
    pub degenerate_points: usize,
}

/// The memoized one-halo term.
pub struct OneHaloTerm<M: HaloModel, Q: Integrator = OpenRomberg> {
    model: M,
    integrator: Q,
    config: OneHaloConfig,
    snapshot: Option<Snapshot>,
    stale: bool,
    builds: usize,
}

impl<M: HaloModel> OneHaloTerm<M> {
    /// A term evaluated with the default open-interval quadrature.
    pub fn new(model: M, config: OneHaloConfig) -> Self {
        Self::with_integrator(model, OpenRomberg, config)
    }
}

impl<M: HaloModel, Q: Integrator> OneHaloTerm<M, Q> {
    pub fn with_integrator(model: M, integrator: Q, config: OneHaloConfig) -> Self {
        Self {
            model,
            integrator,
            config,
            snapshot: None,
            stale: false,
            builds: 0,
        }
    }

    /// The one-halo correlation term at separation `r`.
    ///
    /// Returns 0 when the term is disabled (without tabulating) and for any
    /// `r` outside the tabulated range; otherwise serves the spline value,
    /// rebuilding the tabulation first if none exists or it has been
    /// invalidated.
    pub fn evaluate(&mut self, r: f64) -> Result<f64, HaloError> {
        if !self.config.enabled {
            return Ok(0.0);
        }

        let snapshot = self.current()?;
        let (r_lo, r_hi) = snapshot.table.domain();
        if r < r_lo || r > r_hi {
            return Ok(0.0);
        }
        Ok(snapshot.spline.eval(r))
    }

    /// Mark the cached tabulation stale; the next evaluation rebuilds.
    ///
    /// The current data stays in place (and servable to inspection via
    /// [`table`](Self::table)) until that rebuild completes.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn build_report(&self) -> BuildReport {
        BuildReport {
            builds: self.builds,
            degenerate_points: self
                .snapshot
                .as_ref()
                .map_or(0, |snapshot| snapshot.table.degenerate_points),
        }
    }

    /// The current tabulation, if one has been built.
    pub fn table(&self) -> Option<&Table> {
        self.snapshot.as_ref().map(|snapshot| &snapshot.table)
    }

    pub fn config(&self) -> &OneHaloConfig {
        &self.config
    }

    /// Per-pair-kind tabulation over the same grid (instrumentation; not
    /// cached and not part of the evaluate path).
    pub fn decompose(&self) -> Result<DecomposedTable, HaloError>
    where
        M: Sync,
        Q: Sync,
    {
        tabulate::build_decomposed_table(&self.model, &self.config, &self.integrator)
    }

    fn current(&mut self) -> Result<&Snapshot, HaloError> {
        if self.stale || self.snapshot.is_none() {
            let table = tabulate::build_table(&self.model, &self.config, &self.integrator)?;
            let spline = CubicSpline::fit(&table.r, &table.xi)?;
            self.snapshot = Some(Snapshot { table, spline });
            self.stale = false;
            self.builds += 1;
        }
        self.snapshot
            .as_ref()
            .ok_or_else(|| HaloError::new(ErrorKind::Numerics, "One-halo snapshot unavailable."))
    }
}
