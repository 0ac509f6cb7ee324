//! Glob-based path access policy.
//!
//! Three tiers, checked strictest first: `protected` paths deny every
//! operation, `read_only` paths deny writes and deletes, `no_delete`
//! paths deny only deletes. Candidate paths are expanded (`~`) and
//! lexically absolutized before matching; matching is case-sensitive and
//! `**` spans directories.

use glob::Pattern;

use crate::registry::PathOperation;

/// Patterns that are always active, independent of configuration.
pub const DEFAULT_PROTECTED: &[&str] = &[
    "**/.env",
    "**/.env.*",
    "**/credentials*",
    "**/secret*",
    "~/.ssh/**",
    "~/.aws/**",
    "~/.gnupg/**",
    "**/*.pem",
    "**/*id_rsa*",
];

/// Compiled three-tier policy plus the process-start snapshot of home
/// and working directory, so later checks stay free of I/O.
pub struct PathPolicy {
    protected: Vec<Pattern>,
    read_only: Vec<Pattern>,
    no_delete: Vec<Pattern>,
    home: String,
    cwd: String,
}

impl PathPolicy {
    /// Build from configured globs, snapshotting `$HOME` and the current
    /// directory. User patterns extend the baked-in protected set.
    pub fn from_env(protected: &[String], read_only: &[String], no_delete: &[String]) -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
        let cwd = std::env::current_dir()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "/".to_string());
        Self::with_roots(protected, read_only, no_delete, &home, &cwd)
    }

    /// Build with explicit home and cwd.
    pub fn with_roots(
        protected: &[String],
        read_only: &[String],
        no_delete: &[String],
        home: &str,
        cwd: &str,
    ) -> Self {
        let mut protected_patterns: Vec<Pattern> = DEFAULT_PROTECTED
            .iter()
            .filter_map(|p| compile(p, home))
            .collect();
        protected_patterns.extend(protected.iter().filter_map(|p| compile(p, home)));
        PathPolicy {
            protected: protected_patterns,
            read_only: read_only.iter().filter_map(|p| compile(p, home)).collect(),
            no_delete: no_delete.iter().filter_map(|p| compile(p, home)).collect(),
            home: home.to_string(),
            cwd: cwd.to_string(),
        }
    }

    /// Decide whether `op` on `path` is permitted. `Err` carries the
    /// denial reason.
    pub fn check(&self, path: &str, op: PathOperation) -> Result<(), String> {
        let resolved = self.resolve(path);
        if let Some(pat) = first_match(&self.protected, &resolved) {
            return Err(format!("{path} matches protected path pattern `{pat}`"));
        }
        if matches!(op, PathOperation::Write | PathOperation::Delete) {
            if let Some(pat) = first_match(&self.read_only, &resolved) {
                return Err(format!("{path} matches read-only path pattern `{pat}`"));
            }
        }
        if op == PathOperation::Delete {
            if let Some(pat) = first_match(&self.no_delete, &resolved) {
                return Err(format!("{path} matches no-delete path pattern `{pat}`"));
            }
        }
        Ok(())
    }

    /// Expand `~`, absolutize against the snapshotted cwd, and collapse
    /// `.` / `..` components lexically. No filesystem access: symlinks
    /// are out of scope for a syntactic gate.
    fn resolve(&self, path: &str) -> String {
        let expanded = if path == "~" {
            self.home.clone()
        } else if let Some(rest) = path.strip_prefix("~/") {
            format!("{}/{}", self.home, rest)
        } else {
            path.to_string()
        };
        // A surviving `~` means no home was available; patterns keep
        // their `~` too, so leave it alone instead of joining to cwd.
        if expanded.starts_with('~') {
            return expanded;
        }
        let absolute = if expanded.starts_with('/') {
            expanded
        } else {
            format!("{}/{}", self.cwd, expanded)
        };
        normalize(&absolute)
    }
}

fn compile(pattern: &str, home: &str) -> Option<Pattern> {
    let expanded = if pattern == "~" {
        home.to_string()
    } else if let Some(rest) = pattern.strip_prefix("~/") {
        format!("{home}/{rest}")
    } else {
        pattern.to_string()
    };
    Pattern::new(&expanded).ok()
}

fn first_match<'a>(patterns: &'a [Pattern], path: &str) -> Option<&'a str> {
    patterns
        .iter()
        .find(|p| p.matches(path))
        .map(|p| p.as_str())
}

/// Collapse `.` and `..` components without touching the filesystem.
fn normalize(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    let mut out = String::from("/");
    out.push_str(&stack.join("/"));
    out
}

/// Heuristic for whether a positional argument names a file: it
/// contains a slash or starts with `.` or `~`. Anything else is left
/// alone so flags-as-words and plain tokens don't trip path checks.
pub fn looks_like_path(arg: &str) -> bool {
    arg.contains('/') || arg.starts_with('.') || arg.starts_with('~')
}
