//! Process-end summary: structured log lines and the optional JSON file.

use std::path::Path;

use arena_types::ArenaReport;
use tracing::info;

use crate::error::EngineError;

/// Log the final report through `tracing`.
pub fn log_report(report: &ArenaReport) {
    info!(
        admitted = report.admitted,
        unserved = ?report.unserved,
        "Competition finished"
    );
    for total in &report.station_totals {
        info!(station = %total.station, served = total.served, "Station total");
    }
    for (place, entry) in (1_u32..).zip(report.podium.iter()) {
        info!(place, participant = %entry.participant, score = entry.score, "Podium");
    }
}

/// Write the report to `path` as pretty-printed JSON.
pub fn write_json(path: &Path, report: &ArenaReport) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(report).map_err(|e| EngineError::Summary {
        message: format!("failed to serialize report: {e}"),
    })?;
    std::fs::write(path, json).map_err(|e| EngineError::Summary {
        message: format!("failed to write {}: {e}", path.display()),
    })?;
    info!(path = %path.display(), "Summary written");
    Ok(())
}
