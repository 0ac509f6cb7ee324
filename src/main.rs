//! hall-pass: PreToolUse hook binary.
//!
//! Reads one JSON tool-call payload from stdin and answers on stdout:
//!
//! - allow / ask → a `hookSpecificOutput` envelope,
//! - no opinion → empty stdout (the host applies its default policy).
//!
//! Exit code is 0 for every valid decision; nonzero only when the host
//! payload itself is unusable.

use std::io::Read;

use serde::Deserialize;

use hall_pass::config::Config;
use hall_pass::eval::{Decision, Engine, Evaluation};
use hall_pass::{audit, logging};

#[derive(Deserialize)]
struct HookInput {
    tool_name: Option<String>,
    tool_input: Option<ToolInput>,
}

#[derive(Deserialize)]
struct ToolInput {
    command: Option<String>,
    file_path: Option<String>,
}

fn main() {
    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        eprintln!("hall-pass: failed to read stdin");
        std::process::exit(2);
    }

    let payload: HookInput = match serde_json::from_str(&input) {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("hall-pass: malformed hook payload: {e}");
            std::process::exit(2);
        }
    };

    let config = Config::load();
    logging::debug(&config.debug, &format!("payload: {}", input.trim()));

    let tool = payload.tool_name.as_deref().unwrap_or("");
    let tool_input = payload.tool_input.unwrap_or(ToolInput {
        command: None,
        file_path: None,
    });

    let engine = Engine::new(config);
    let (evaluation, audited_input) = match tool {
        "Bash" => {
            let Some(command) = tool_input.command else {
                eprintln!("hall-pass: Bash payload missing tool_input.command");
                std::process::exit(2);
            };
            (engine.evaluate_command(&command), command)
        }
        "Write" | "Edit" => {
            let Some(file_path) = tool_input.file_path else {
                eprintln!("hall-pass: {tool} payload missing tool_input.file_path");
                std::process::exit(2);
            };
            (engine.evaluate_file(&file_path), file_path)
        }
        // Tools this hook has no opinion about.
        _ => std::process::exit(0),
    };

    audit::record(
        &engine.config().audit,
        tool,
        &audited_input,
        &evaluation.decision,
        evaluation.layer,
    );
    logging::debug(
        &engine.config().debug,
        &format!(
            "decision[{}]: {:?}",
            evaluation.layer, evaluation.decision
        ),
    );

    emit(&evaluation);
}

/// Write the host envelope for a decision. `Pass` stays silent.
fn emit(evaluation: &Evaluation) {
    let output = match &evaluation.decision {
        Decision::Allow(reason) => serde_json::json!({
            "hookSpecificOutput": {
                "hookEventName": "PreToolUse",
                "permissionDecision": "allow",
                "permissionDecisionReason": reason,
            }
        }),
        Decision::Ask { reason, suggestion } => {
            let mut inner = serde_json::json!({
                "hookEventName": "PreToolUse",
                "permissionDecision": "ask",
                "permissionDecisionReason": reason,
            });
            if let Some(suggestion) = suggestion {
                inner["additionalContext"] = serde_json::Value::String(suggestion.clone());
            }
            serde_json::json!({ "hookSpecificOutput": inner })
        }
        Decision::Pass => return,
    };
    match serde_json::to_string(&output) {
        Ok(line) => println!("{line}"),
        Err(e) => {
            eprintln!("hall-pass: failed to serialize decision: {e}");
            std::process::exit(2);
        }
    }
}
