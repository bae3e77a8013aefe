//! Diagnostic sinks for tabulation passes.
//!
//! Diagnostics are strictly one-way: nothing written here feeds back into
//! computed values, and tabulation must produce identical results whether or
//! not a sink is open.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::{OneHaloConfig, Table, Verbosity};
use crate::error::{ErrorKind, HaloError};

/// Directory for diagnostic output, created on demand.
const DEBUG_DIR: &str = "debug";

/// Default file-name root when the configuration carries no run label.
const DEFAULT_LABEL: &str = "one_halo";

/// Per-point trace sink appended to during tabulation.
pub struct TraceSink {
    file: File,
    path: PathBuf,
}

impl TraceSink {
    /// Open a sink when tracing is enabled; `Ok(None)` otherwise.
    pub fn open(config: &OneHaloConfig) -> Result<Option<Self>, HaloError> {
        if config.verbosity < Verbosity::Trace {
            return Ok(None);
        }

        let dir = PathBuf::from(DEBUG_DIR);
        create_dir_all(&dir)
            .map_err(|e| HaloError::new(ErrorKind::Io, format!("Failed to create debug dir: {e}")))?;

        let label = config.run_label.as_deref().unwrap_or(DEFAULT_LABEL);
        let ts = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("{label}_{ts}.1halo"));

        let mut file = File::create(&path)
            .map_err(|e| HaloError::new(ErrorKind::Io, format!("Failed to create trace file: {e}")))?;
        writeln!(file, "# r xi prefactor")
            .map_err(|e| HaloError::new(ErrorKind::Io, format!("Failed to write trace header: {e}")))?;

        Ok(Some(Self { file, path }))
    }

    /// Append one tabulated point.
    pub fn record(&mut self, r: f64, value: f64, prefactor: f64) -> Result<(), HaloError> {
        writeln!(self.file, "{r:.6} {value:.6e} {prefactor:.6e}")
            .map_err(|e| HaloError::new(ErrorKind::Io, format!("Failed to write trace record: {e}")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write a standalone bundle (configuration + full table) for offline
/// inspection.
pub fn write_table_bundle(config: &OneHaloConfig, table: &Table) -> Result<PathBuf, HaloError> {
    let dir = PathBuf::from(DEBUG_DIR);
    create_dir_all(&dir)
        .map_err(|e| HaloError::new(ErrorKind::Io, format!("Failed to create debug dir: {e}")))?;

    let label = config.run_label.as_deref().unwrap_or(DEFAULT_LABEL);
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{label}_table_{ts}.md"));

    let mut file = File::create(&path)
        .map_err(|e| HaloError::new(ErrorKind::Io, format!("Failed to create bundle file: {e}")))?;

    let write = |file: &mut File, line: String| -> Result<(), HaloError> {
        writeln!(file, "{line}")
            .map_err(|e| HaloError::new(ErrorKind::Io, format!("Failed to write bundle: {e}")))
    };

    write(&mut file, "# one-halo table bundle".to_string())?;
    write(&mut file, format!("- generated: {}", Local::now().to_rfc3339()))?;
    write(
        &mut file,
        format!("- mass bounds: [{:.3e}, {:.3e}]", config.m_low, config.m_max),
    )?;
    let (da, db) = config.galaxy_density_pair();
    write(&mut file, format!("- galaxy densities: {da:.4e} {db:.4e}"))?;
    write(
        &mut file,
        format!("- degenerate points: {}", table.degenerate_points),
    )?;
    write(&mut file, String::new())?;
    write(&mut file, "| r | xi |".to_string())?;
    write(&mut file, "| - | - |".to_string())?;
    for (r, xi) in table.r.iter().zip(table.xi.iter()) {
        write(&mut file, format!("| {r:.6} | {xi:.6e} |"))?;
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Cosmology;

    fn quiet_config() -> OneHaloConfig {
        OneHaloConfig::new(Cosmology::fiducial(), 1.0e11, 1.0e15, 1.0e-3)
    }

    #[test]
    fn sink_closed_below_trace() {
        let mut config = quiet_config();
        assert!(TraceSink::open(&config).unwrap().is_none());
        config.verbosity = Verbosity::Progress;
        assert!(TraceSink::open(&config).unwrap().is_none());
    }

    #[test]
    fn bundle_dumps_config_and_table() {
        let mut config = quiet_config();
        config.run_label = Some("bundle_test".to_string());
        let table = Table {
            r: vec![0.01, 0.1, 1.0],
            xi: vec![1.0e4, 2.0e2, 3.0],
            degenerate_points: 0,
        };

        let path = write_table_bundle(&config, &table).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("mass bounds"));
        assert!(contents.contains("| 0.010000 |"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn sink_records_points_at_trace() {
        let mut config = quiet_config();
        config.verbosity = Verbosity::Trace;
        config.run_label = Some("sink_test".to_string());

        let mut sink = TraceSink::open(&config).unwrap().unwrap();
        sink.record(0.01, 1.5e3, 1.6e9).unwrap();
        sink.record(0.02, 7.0e2, 4.0e8).unwrap();

        let path = sink.path().to_path_buf();
        drop(sink);
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with('#'));
        assert!(lines[1].starts_with("0.010000"));

        std::fs::remove_file(&path).unwrap();
    }
}
