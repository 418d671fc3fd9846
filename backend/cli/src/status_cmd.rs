//! CLI Status Command
//!
//! Reports uptime and cache sizes of a running server.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::terminal_output::{note_error, note_success, render_pairs};

pub async fn run(base_url: &str) -> Result<()> {
    let url = format!("{}/api/health", base_url.trim_end_matches('/'));
    let resp = match reqwest::get(&url).await {
        Ok(resp) => resp,
        Err(_) => {
            note_error(&format!("ringforge is not running at {base_url}"));
            return Ok(());
        }
    };

    let body: Value = resp.json().await.context("Health endpoint returned invalid JSON")?;
    note_success(&format!("ringforge is up at {base_url}"));
    print!("{}", render_pairs(&summary(&body)));
    Ok(())
}

fn summary(health: &Value) -> Vec<(&'static str, String)> {
    let field = |v: &Value| match v {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    };
    vec![
        ("status", field(&health["status"])),
        ("uptime (s)", field(&health["uptime_seconds"])),
        ("cached replies", field(&health["cache_entries"]["replies"])),
        ("cached audio", field(&health["cache_entries"]["audio"])),
    ]
}
