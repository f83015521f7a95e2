use std::io::BufRead;

use anyhow::{Context, Result};
use forwarder_common::Sample;
use tracing::warn;

/// Reads one JSON sample per line. Blank lines are ignored and malformed
/// lines are logged and skipped, so one bad record does not drop the rest.
pub fn read_samples(reader: impl BufRead) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read sample input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Sample>(line) {
            Ok(sample) => samples.push(sample),
            Err(err) => warn!("Skipping malformed sample on line {}: {}", index + 1, err),
        }
    }

    Ok(samples)
}
