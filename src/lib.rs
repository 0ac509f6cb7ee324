//! hall-pass: a PreToolUse permission hook for Claude Code.
//!
//! Before the assistant runs a shell command or writes a file, the host
//! sends the proposed tool call on stdin; hall-pass answers with one of
//! three verdicts: allow (skip the user prompt), ask (prompt, optionally
//! with advice for the assistant), or silence (the host's own policy
//! applies). Commands are parsed with a real shell parser — pipes,
//! substitutions, loops, heredocs — so every program the command would
//! start is judged, not just the first word.
//!
//! # Architecture
//!
//! - **[`parse`]** — lexer + recursive-descent parser flattening the
//!   command tree into invocations and redirects.
//! - **[`registry`]** — static safelist / inspected / DB-client /
//!   dangerous-env sets.
//! - **[`paths`]** — three-tier glob path policy.
//! - **[`sql`]** — inline-SQL extraction and read-only classification.
//! - **[`guidance`]** — feedback rules suggesting better tool choices.
//! - **[`inspect`]** — per-program argument inspectors (git, find,
//!   xargs, sed, awk, kill, chmod, docker, interpreters).
//! - **[`eval`]** — the decision pipeline and driver.
//! - **[`config`]** — embedded defaults + user TOML overlay.
//! - **[`audit`]** / **[`logging`]** — best-effort JSONL audit log and
//!   debug log.

pub mod audit;
pub mod config;
pub mod eval;
pub mod guidance;
pub mod inspect;
pub mod logging;
pub mod parse;
pub mod paths;
pub mod registry;
pub mod sql;

use eval::{Engine, Evaluation};

/// Evaluate a command string against the default configuration.
///
/// This is the entry point for tests and simple embedding; the CLI
/// builds its [`Engine`] from the loaded user configuration instead.
pub fn evaluate(command: &str) -> Evaluation {
    let engine = Engine::new(config::Config::default_config());
    engine.evaluate_command(command)
}
