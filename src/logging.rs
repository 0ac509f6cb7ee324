//! Debug logging to ~/.local/share/hall-pass/debug.log.
//!
//! Enabled by `[debug] enabled = true` or `HALL_PASS_DEBUG=1`.
//! Best-effort: failures are silently ignored, logging must never block
//! the hook.

use std::io::Write;

use crate::config::DebugConfig;

/// Environment variable that forces debug logging on.
pub const DEBUG_ENV: &str = "HALL_PASS_DEBUG";

pub fn enabled(config: &DebugConfig) -> bool {
    config.enabled || std::env::var(DEBUG_ENV).is_ok_and(|v| v == "1")
}

/// Append one line to the debug log.
pub fn debug(config: &DebugConfig, message: &str) {
    if !enabled(config) {
        return;
    }
    let Some(home) = std::env::var_os("HOME") else {
        return;
    };
    let dir = std::path::Path::new(&home).join(".local/share/hall-pass");
    let _ = std::fs::create_dir_all(&dir);
    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("debug.log"))
    else {
        return;
    };
    let oneline = message.replace('\n', " ");
    let _ = writeln!(file, "{} {}", crate::audit::timestamp_now(), oneline);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default() {
        assert!(!enabled(&DebugConfig::default()));
    }

    #[test]
    fn config_flag_enables() {
        assert!(enabled(&DebugConfig { enabled: true }));
    }
}
