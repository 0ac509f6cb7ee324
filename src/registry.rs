//! Static command registries.
//!
//! These are tuning knobs, not algorithms: flat name sets consulted by
//! the evaluator. Programs that can execute arbitrary code through flags
//! (`python -c`, `node -e`) or proxy other programs (`xargs`,
//! `find -exec`) must never appear in [`ALWAYS_SAFE`]; they belong in
//! [`INSPECTED`] so their arguments get looked at.

use crate::parse::CommandInvocation;

/// Read-only / no-side-effect programs approved without inspection, plus
/// task runners that take no inline-code flags.
pub const ALWAYS_SAFE: &[&str] = &[
    // text and file readers
    "grep", "rg", "sort", "uniq", "head", "tail", "wc", "jq", "cat", "ls",
    "file", "stat", "diff", "comm", "tr", "cut", "rev", "column", "paste",
    "nl", "fold", "strings", "xxd", "od", "less", "more",
    "md5sum", "sha1sum", "sha256sum", "sha512sum", "cksum",
    // environment and system introspection
    "echo", "printf", "date", "pwd", "cd", "chdir", "which", "whereis", "type",
    "printenv", "uname", "hostname", "id", "whoami", "groups", "nproc",
    "uptime", "df", "du", "free", "realpath", "readlink", "dirname",
    "basename", "seq", "true", "false", "test", "[", "sleep", "tty",
    "ps", "pgrep", "tree", "locale",
    // task runners without inline-code flags
    "gh", "bun", "npm", "npx", "pnpm", "yarn", "cargo", "shfmt",
];

/// Programs whose safety depends on their arguments; each has a named
/// inspector.
pub const INSPECTED: &[&str] = &[
    "git", "xargs", "env", "source", ".", "find", "sed", "awk", "kill",
    "chmod", "docker", "node", "python", "python3",
];

/// Database clients whose inline SQL gets classified.
pub const DB_CLIENTS: &[&str] = &["psql", "mysql", "sqlite3"];

/// Environment variables that change what an otherwise-safe program
/// executes. Any inline assignment of one of these forces a prompt.
pub const DANGEROUS_ENV: &[&str] = &[
    "LD_PRELOAD",
    "LD_LIBRARY_PATH",
    "DYLD_INSERT_LIBRARIES",
    "DYLD_LIBRARY_PATH",
    "BASH_ENV",
    "ENV",
    "PROMPT_COMMAND",
];

/// Wrappers that change how a command runs, not what it does.
pub const TRANSPARENT_WRAPPERS: &[&str] = &["nohup", "nice", "timeout"];

/// What a path-aware command does to the paths it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOperation {
    Read,
    Write,
    Delete,
}

const PATH_READERS: &[&str] = &[
    "cat", "head", "tail", "less", "more", "file", "stat", "wc", "strings",
    "diff", "md5sum", "sha1sum", "sha256sum", "sha512sum", "cksum", "xxd",
    "od",
];

const PATH_WRITERS: &[&str] = &["cp", "mv", "mkdir", "touch", "tee", "ln", "install"];

const PATH_DELETERS: &[&str] = &["rm", "rmdir", "unlink"];

const PATH_PERMISSION_CHANGERS: &[&str] = &["chmod", "chown", "chgrp"];

/// The path operation a command performs, or `None` when its positional
/// arguments are not file paths. Restricting this to a fixed set avoids
/// false positives like `docker compose --env-file .env.local`.
pub fn path_operation(name: &str) -> Option<PathOperation> {
    if PATH_DELETERS.contains(&name) {
        Some(PathOperation::Delete)
    } else if PATH_READERS.contains(&name) {
        Some(PathOperation::Read)
    } else if PATH_WRITERS.contains(&name) || PATH_PERMISSION_CHANGERS.contains(&name) {
        Some(PathOperation::Write)
    } else {
        None
    }
}

/// True when an inline assignment list touches a dangerous variable.
pub fn has_dangerous_assign(inv: &CommandInvocation) -> Option<&str> {
    inv.assigns
        .iter()
        .map(|(name, _)| name.as_str())
        .find(|name| DANGEROUS_ENV.contains(name))
}
