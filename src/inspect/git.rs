//! Git policy: subcommand, flag, branch, and config-injection checks.

use crate::eval::{Decision, EvalContext};
use crate::parse::CommandInvocation;

/// Read-only or easily reversible subcommands.
const SAFE_SUBCOMMANDS: &[&str] = &[
    "status", "log", "diff", "show", "branch", "tag", "remote", "describe",
    "rev-parse", "rev-list", "ls-files", "ls-tree", "cat-file", "reflog",
    "shortlog", "blame", "bisect", "name-rev", "cherry", "count-objects",
    "fsck", "verify-pack", "whatchanged", "add", "commit", "stash", "fetch",
    "pull", "merge", "cherry-pick", "revert", "notes", "worktree",
    "checkout", "switch", "restore", "gc", "prune", "repack",
];

/// Subcommands that discard work no matter how they are spelled.
const ALWAYS_DESTRUCTIVE: &[&str] = &["reset", "clean"];

/// Subcommands whose target branch decides.
const BRANCH_GATED: &[&str] = &["push", "rebase"];

const PUSH_FORCE_FLAGS: &[&str] = &[
    "--force",
    "-f",
    "--force-with-lease",
    "--force-if-includes",
];

/// Pre-subcommand flags that consume a following value.
const TWO_ARG_PRE_FLAGS: &[&str] = &["-C", "--git-dir", "--work-tree"];

/// Config keys that let a `git -c` injection run arbitrary programs.
/// Comparison is case-insensitive; `*` segments match by prefix/suffix.
const DANGEROUS_CONFIG_KEYS: &[&str] = &[
    "core.fsmonitor",
    "core.sshcommand",
    "core.hookspath",
    "diff.external",
    "credential.helper",
];

#[derive(Debug, Default)]
struct GitInvocation {
    /// `key=value` operands of `-c` / `--config` pre-flags.
    configs: Vec<String>,
    subcommand: Option<String>,
    flags: Vec<String>,
    positionals: Vec<String>,
}

fn parse_git(inv: &CommandInvocation) -> GitInvocation {
    let mut parsed = GitInvocation::default();
    let mut iter = inv.tail().iter().peekable();
    // Pre-subcommand flags.
    while let Some(arg) = iter.peek() {
        let arg = arg.as_str();
        if arg == "-c" || arg == "--config" {
            iter.next();
            if let Some(value) = iter.next() {
                parsed.configs.push(value.clone());
            }
        } else if TWO_ARG_PRE_FLAGS.contains(&arg) {
            iter.next();
            iter.next();
        } else if let Some(inline) = arg.strip_prefix("-c").filter(|s| !s.is_empty()) {
            let inline = inline.to_string();
            iter.next();
            parsed.configs.push(inline);
        } else if arg.starts_with("--") && arg.contains('=') {
            iter.next();
        } else if arg.starts_with('-') {
            iter.next();
        } else {
            break;
        }
    }
    parsed.subcommand = iter.next().cloned();
    for arg in iter {
        if arg.starts_with('-') {
            parsed.flags.push(arg.clone());
        } else {
            parsed.positionals.push(arg.clone());
        }
    }
    parsed
}

fn key_is_dangerous(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    if DANGEROUS_CONFIG_KEYS.contains(&key.as_str()) {
        return true;
    }
    if key.starts_with("pager.") || key.starts_with("alias.") {
        return true;
    }
    key.starts_with("filter.") && (key.ends_with(".clean") || key.ends_with(".smudge"))
}

pub fn inspect(ctx: &EvalContext<'_>, inv: &CommandInvocation) -> Decision {
    let git = parse_git(inv);

    // `-c key=value` injection beats everything else: it poisons any
    // subcommand, including read-only ones.
    for config in &git.configs {
        let key = config.split('=').next().unwrap_or(config);
        if key_is_dangerous(key) {
            return Decision::ask(format!(
                "git -c {key} can execute arbitrary commands"
            ));
        }
    }

    let Some(subcommand) = git.subcommand.as_deref() else {
        return Decision::allow("bare git prints help");
    };

    if ALWAYS_DESTRUCTIVE.contains(&subcommand) {
        return Decision::ask(format!("git {subcommand} discards work"));
    }

    // Destructive spellings of otherwise tame subcommands.
    match subcommand {
        "push" => {
            let forced = git.flags.iter().any(|f| {
                PUSH_FORCE_FLAGS.contains(&f.as_str())
                    || f.starts_with("--force-with-lease=")
            });
            if forced {
                return Decision::ask("git push --force requires confirmation");
            }
        }
        "checkout" | "restore" => {
            if git.positionals.iter().any(|p| p == ".") {
                return Decision::ask(format!(
                    "git {subcommand} . overwrites local changes"
                ));
            }
        }
        "branch" => {
            if git
                .flags
                .iter()
                .any(|f| f == "-D" || f == "-d" || f == "--force")
            {
                return Decision::ask("git branch deletion requires confirmation");
            }
        }
        "stash" => {
            if git
                .positionals
                .iter()
                .any(|p| p == "drop" || p == "clear")
            {
                return Decision::ask("git stash drop/clear discards stashed work");
            }
        }
        _ => {}
    }

    if BRANCH_GATED.contains(&subcommand) {
        for positional in &git.positionals {
            let target = positional
                .split(':')
                .next_back()
                .unwrap_or(positional)
                .trim_start_matches('+');
            if ctx
                .engine
                .protected_branches()
                .iter()
                .any(|b| b == target)
            {
                return Decision::ask(format!(
                    "git {subcommand} targets protected branch `{target}`"
                ));
            }
        }
        return Decision::allow(format!("git {subcommand} to unprotected ref"));
    }

    if subcommand == "config" {
        for positional in &git.positionals {
            let dangerous = key_is_dangerous(positional)
                || DANGEROUS_CONFIG_KEYS
                    .iter()
                    .any(|k| positional.to_ascii_lowercase().starts_with(k));
            if dangerous {
                return Decision::ask(format!(
                    "git config touching `{positional}` can execute arbitrary commands"
                ));
            }
        }
        return Decision::allow("git config on a harmless key");
    }

    if SAFE_SUBCOMMANDS.contains(&subcommand) {
        return Decision::allow(format!("git {subcommand} is safe"));
    }

    Decision::ask(format!("git {subcommand} requires confirmation"))
}
