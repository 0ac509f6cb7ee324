//! Feedback rules: spot poor tool choices and say what to use instead.
//!
//! Rules look at the whole pipeline, not one invocation, so they can
//! phrase advice differently when e.g. `curl` feeds the offending
//! one-liner. First matching rule wins; JSON detection runs before the
//! generic string-ops rule so JSON-handling code is not double-flagged.

use crate::parse::CommandInvocation;

const JSON_MARKERS: &[&str] = &[
    "json.load", "json.loads", "json.dump", "json.dumps", "JSON.parse",
    "JSON.stringify", "json", "JSON",
];

const STRING_OP_MARKERS: &[&str] = &[
    ".split(", ".strip(", ".replace(", ".join(", ".upper()", ".lower()",
    ".startswith(", ".endswith(", ".find(", ".count(", ".trim(",
    ".toUpperCase(", ".toLowerCase(", ".startsWith(", ".endsWith(",
    ".indexOf(", ".includes(", "re.sub(", "re.match(", "re.search(",
    "re.findall(",
];

/// Run every rule against the pipeline; the first hit returns its
/// suggestion text.
pub fn check(pipeline: &[CommandInvocation]) -> Option<String> {
    pipeline
        .iter()
        .find_map(|inv| check_invocation(inv, pipeline))
}

/// Run the rules focused on one invocation, with the pipeline available
/// for context (phrasing changes when `curl` feeds the one-liner). Used
/// directly when evaluating sub-commands that are not in the pipeline
/// list themselves.
pub fn check_invocation(
    inv: &CommandInvocation,
    pipeline: &[CommandInvocation],
) -> Option<String> {
    let code = inline_code(inv)?;
    json_rule(inv, code, pipeline).or_else(|| string_ops_rule(inv, code))
}

/// The inline program text of a `python -c` / `node -e` style invocation.
fn inline_code(inv: &CommandInvocation) -> Option<&str> {
    let flags: &[&str] = match inv.name.as_str() {
        "python" | "python3" => &["-c"],
        "node" => &["-e", "--eval", "-p", "--print"],
        _ => return None,
    };
    let mut iter = inv.tail().iter();
    while let Some(arg) = iter.next() {
        if flags.contains(&arg.as_str()) {
            return iter.next().map(|s| s.as_str());
        }
    }
    None
}

fn interpreter_label(name: &str) -> &'static str {
    if name.starts_with("python") {
        "a Python one-liner"
    } else {
        "a Node one-liner"
    }
}

fn json_rule(
    inv: &CommandInvocation,
    code: &str,
    pipeline: &[CommandInvocation],
) -> Option<String> {
    if !JSON_MARKERS.iter().any(|m| code.contains(m)) {
        return None;
    }
    let fetching = pipeline
        .iter()
        .any(|i| i.name == "curl" || i.name == "wget");
    let label = interpreter_label(&inv.name);
    if fetching {
        Some(format!(
            "This pipeline downloads JSON and parses it with {label}. \
             Pipe into `jq` instead — e.g. `curl ... | jq '.field'` — \
             it is faster, composable, and needs no inline code."
        ))
    } else {
        Some(format!(
            "Parsing JSON with {label} — prefer `jq` for JSON work \
             (e.g. `jq '.field' file.json`)."
        ))
    }
}

fn string_ops_rule(inv: &CommandInvocation, code: &str) -> Option<String> {
    if !STRING_OP_MARKERS.iter().any(|m| code.contains(m)) {
        return None;
    }
    let label = interpreter_label(&inv.name);
    Some(format!(
        "Doing string manipulation with {label} — shell builtins handle \
         this directly: `sed` or `awk` for edits and extraction, `tr` for \
         character translation, `cut` for fields."
    ))
}
