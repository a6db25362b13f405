//! Optional user defaults for the Newton iteration.
//!
//! Looked up as `<dir>/.gseim/solver.conf` where `<dir>` is `$GSEIM_HOME`
//! if set, else `$HOME`. The file holds `key=value` lines (`itmax`, `vtol`,
//! `itol`; `#` comments). `--config <path>` bypasses the ambient lookup.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use gseim_solver::ConvergenceCriteria;

use crate::error::RunError;

/// Newton overrides loaded from `solver.conf`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SolverDefaults {
    pub itmax: Option<usize>,
    pub vtol: Option<f64>,
    pub itol: Option<f64>,
}

impl SolverDefaults {
    /// Load defaults from an explicit path, or from the ambient location.
    ///
    /// The ambient lookup is best-effort: an unset or unusable home
    /// directory (batch environments run with `HOME=not set`) yields no
    /// overrides. An explicit `--config` path must be readable.
    pub fn load(explicit: Option<&Path>) -> Result<Self, RunError> {
        if let Some(path) = explicit {
            let text = fs::read_to_string(path).map_err(|source| RunError::Config {
                path: path.to_path_buf(),
                source,
            })?;
            return Self::parse(path, &text);
        }

        let Some(path) = ambient_path() else {
            return Ok(Self::default());
        };
        match fs::read_to_string(&path) {
            Ok(text) => Self::parse(&path, &text),
            Err(_) => Ok(Self::default()),
        }
    }

    fn parse(path: &Path, text: &str) -> Result<Self, RunError> {
        let mut defaults = Self::default();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let bad = || RunError::BadConfig {
                path: path.to_path_buf(),
                line: idx + 1,
                message: format!("expected itmax=, vtol= or itol=, got '{line}'"),
            };
            let Some((key, value)) = line.split_once('=') else {
                return Err(bad());
            };
            let value = value.trim();
            match key.trim() {
                "itmax" => defaults.itmax = Some(value.parse().map_err(|_| bad())?),
                "vtol" => defaults.vtol = Some(value.parse().map_err(|_| bad())?),
                "itol" => defaults.itol = Some(value.parse().map_err(|_| bad())?),
                _ => return Err(bad()),
            }
        }
        Ok(defaults)
    }

    /// Fold the overrides into the solver's convergence criteria.
    pub fn apply(&self, criteria: &mut ConvergenceCriteria) {
        if let Some(itmax) = self.itmax {
            criteria.max_iterations = itmax;
        }
        if let Some(vtol) = self.vtol {
            criteria.v_abstol = vtol;
        }
        if let Some(itol) = self.itol {
            criteria.i_abstol = itol;
        }
    }
}

/// Ambient config path, if a usable home directory exists.
fn ambient_path() -> Option<PathBuf> {
    let home = env::var_os("GSEIM_HOME").or_else(|| env::var_os("HOME"))?;
    let dir = PathBuf::from(home);
    if !dir.is_dir() {
        return None;
    }
    Some(dir.join(".gseim").join("solver.conf"))
}
