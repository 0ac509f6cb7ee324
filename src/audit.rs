//! Audit log: one JSON object per decision, appended best-effort.
//!
//! The audit writer must never delay or alter a verdict, so every
//! failure — missing home, unwritable directory, full disk — is
//! swallowed. `Pass` decisions carry no opinion and are not recorded.

use std::io::Write;

use serde_json::json;

use crate::config::AuditConfig;
use crate::eval::Decision;

/// Append one audit record. `layer` names the driver stage that decided
/// (`parse`, `redirect`, `guidance`, `assign`, `command`, `file`).
pub fn record(config: &AuditConfig, tool: &str, input: &str, decision: &Decision, layer: &str) {
    if !config.enabled {
        return;
    }
    let Some(label) = decision.audit_label() else {
        return;
    };
    let Some(path) = log_path(config) else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    else {
        return;
    };
    let record = json!({
        "ts": timestamp_now(),
        "tool": tool,
        "input": truncate(input, 500),
        "decision": label,
        "reason": decision.reason().unwrap_or(""),
        "layer": layer,
    });
    let _ = writeln!(file, "{record}");
}

fn log_path(config: &AuditConfig) -> Option<std::path::PathBuf> {
    if !config.path.is_empty() {
        return Some(std::path::PathBuf::from(&config.path));
    }
    let home = std::env::var_os("HOME")?;
    Some(std::path::Path::new(&home).join(".local/share/hall-pass/audit.log"))
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// ISO-8601 UTC timestamp without external deps.
pub(crate) fn timestamp_now() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = dur.as_secs();
    let days = secs / 86400;
    let rem = secs % 86400;
    let h = rem / 3600;
    let m = (rem % 3600) / 60;
    let s = rem % 60;
    let (year, month, day) = epoch_days_to_date(days);
    format!("{year:04}-{month:02}-{day:02}T{h:02}:{m:02}:{s:02}Z")
}

/// Convert days since the Unix epoch to (year, month, day).
/// Civil-from-days algorithm (Howard Hinnant).
fn epoch_days_to_date(days: u64) -> (u64, u64, u64) {
    let z = days + 719468;
    let era = z / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}
