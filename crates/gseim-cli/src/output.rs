//! Result artifact emission.
//!
//! One text row per solved timepoint: time, then each requested output
//! variable. Every field is formatted `{:>16.7e}`, fields are separated by
//! a single space, lines end with `\n`, no header. The file is written to
//! a temp file in the destination directory and renamed into place, so a
//! failed run never leaves a partial artifact.

use std::fmt::Write as _;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use gseim_parser::OutputVar;
use gseim_solver::TransientResult;
use nalgebra::DVector;
use tempfile::NamedTempFile;

/// Artifact path: the input path with its extension replaced by `.dat`.
pub fn artifact_path(input: &Path) -> PathBuf {
    input.with_extension("dat")
}

fn column_value(var: &OutputVar, solution: &DVector<f64>, num_nodes: usize) -> f64 {
    match var {
        // v(0) reads as the reference voltage.
        OutputVar::NodeVoltage { node, .. } => match node.matrix_index() {
            Some(i) => solution[i],
            None => 0.0,
        },
        OutputVar::BranchCurrent { branch, .. } => solution[num_nodes + branch],
    }
}

fn render_row(time: f64, outputs: &[OutputVar], solution: &DVector<f64>, num_nodes: usize) -> String {
    let mut row = String::new();
    let _ = write!(row, "{time:>16.7e}");
    for var in outputs {
        let _ = write!(row, " {:>16.7e}", column_value(var, solution, num_nodes));
    }
    row.push('\n');
    row
}

/// Write the result artifact atomically.
pub fn write_artifact(
    path: &Path,
    outputs: &[OutputVar],
    result: &TransientResult,
) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        for point in &result.points {
            let row = render_row(point.time, outputs, &point.solution, result.num_nodes);
            writer.write_all(row.as_bytes())?;
        }
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
