//! Export of run artifacts: delimited position/score tracks for external
//! plotting plus a JSON run summary.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use ndarray::Array1;
use serde::Serialize;

use crate::filters::linear::FilterRun;
use crate::trajectory::GroundTruth;
use crate::types::linalg::{POS_X, POS_Y};

/// Comma-delimited `truth_x,truth_y,est_x,est_y` rows, one per step, no
/// header. Plain enough for gnuplot or matplotlib to consume directly.
pub fn write_positions(path: &Path, truth: &GroundTruth, run: &FilterRun) -> io::Result<()> {
    check_rows("position export", truth.len(), run.len())?;
    let mut out = BufWriter::new(File::create(path)?);
    for k in 0..run.len() {
        writeln!(
            out,
            "{:.6},{:.6},{:.6},{:.6}",
            truth.position[[k, 0]],
            truth.position[[k, 1]],
            run.states[k][POS_X],
            run.states[k][POS_Y],
        )?;
    }
    out.flush()?;
    log::debug!("wrote {} position rows to {}", run.len(), path.display());
    Ok(())
}

/// Space-delimited `time nees` rows, one per step, no header.
pub fn write_nees(path: &Path, times: &Array1<f64>, scores: &[f64]) -> io::Result<()> {
    check_rows("NEES export", times.len(), scores.len())?;
    let mut out = BufWriter::new(File::create(path)?);
    for (t, score) in times.iter().zip(scores) {
        writeln!(out, "{:.6} {:.6}", t, score)?;
    }
    out.flush()?;
    log::debug!("wrote {} NEES rows to {}", scores.len(), path.display());
    Ok(())
}

/// Session summary saved next to the exported tracks.
#[derive(Serialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub steps: usize,
    pub dt: f64,
    pub phi_s: f64,
    pub noise_injected: bool,
    pub rng_seed: u64,
    pub mean_nees: f64,
    pub final_truth_position: (f64, f64),
    pub final_estimate_position: (f64, f64),
    pub positions_file: String,
    pub nees_file: String,
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let body = serde_json::to_string_pretty(summary)?;
    fs::write(path, body)
}

fn check_rows(name: &'static str, expected: usize, actual: usize) -> io::Result<()> {
    if expected != actual {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("length mismatch for {name}: expected {expected} rows, got {actual}"),
        ));
    }
    Ok(())
}
