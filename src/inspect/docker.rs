//! docker: read-only and lifecycle subcommands pass; containers that
//! can reach back into the host need a human.

use crate::eval::Decision;
use crate::parse::CommandInvocation;

/// Subcommands that only observe, build, or manage auth/compose state.
const SAFE_SUBCOMMANDS: &[&str] = &[
    "ps", "images", "logs", "inspect", "stats", "top", "version", "info",
    "network", "volume", "system", "build", "pull", "tag", "login",
    "logout", "compose", "container", "image",
];

/// Container lifecycle operations on existing containers.
const LIFECYCLE_SUBCOMMANDS: &[&str] = &["stop", "rm", "rmi", "restart"];

const HOST_ESCAPE_FLAGS: &[&str] = &[
    "--privileged",
    "--pid=host",
    "--net=host",
    "--network=host",
];

pub fn inspect(inv: &CommandInvocation) -> Decision {
    let args = inv.tail();
    let Some(subcommand) = args.first().map(|s| s.as_str()) else {
        return Decision::allow("bare docker prints help");
    };

    if SAFE_SUBCOMMANDS.contains(&subcommand) {
        return Decision::allow(format!("docker {subcommand} is safe"));
    }
    if LIFECYCLE_SUBCOMMANDS.contains(&subcommand) {
        return Decision::allow(format!("docker {subcommand} manages containers"));
    }
    if subcommand == "run" || subcommand == "exec" {
        if let Some(reason) = host_escape(args) {
            return Decision::ask(reason);
        }
        return Decision::allow(format!("docker {subcommand} without host access"));
    }
    Decision::ask(format!("docker {subcommand} requires confirmation"))
}

/// Flags on `run`/`exec` that break container isolation.
fn host_escape(args: &[String]) -> Option<String> {
    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        let arg = arg.as_str();
        if HOST_ESCAPE_FLAGS.contains(&arg) {
            return Some(format!("docker with {arg} escapes container isolation"));
        }
        let volume = if arg == "-v" || arg == "--volume" {
            iter.peek().map(|v| v.as_str())
        } else if let Some(v) = arg.strip_prefix("--volume=") {
            Some(v)
        } else if let Some(v) = arg.strip_prefix("-v=") {
            Some(v)
        } else {
            None
        };
        if let Some(volume) = volume {
            if volume.starts_with("/:") {
                return Some("docker mounting the host root filesystem".into());
            }
        }
    }
    None
}
