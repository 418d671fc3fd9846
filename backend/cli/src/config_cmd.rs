//! `ringforge config`: effective config (secrets masked) plus validation findings.

use anyhow::Result;
use ringforge_config::{redacted_snapshot, validate, RingConfig};

use crate::terminal_output::{note_error, note_success, note_warn};

pub fn run(config: &RingConfig) -> Result<()> {
    let snapshot = redacted_snapshot(config)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    let report = validate(config);
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for error in &report.errors {
        note_error(&format!("{}: {}", error.path, error.message));
    }
    if report.is_valid() {
        note_success("Configuration is valid");
    }
    Ok(())
}
