//! Transparent-wrapper unwrapping.
//!
//! `nohup`, `nice`, and `timeout` change process lifetime or scheduling
//! but not what the wrapped command does, so the gate evaluates the
//! inner command instead. Each wrapper has its own flag-skipping rule;
//! nesting (`nohup nice bun ...`) unwraps recursively. Inline
//! assignments stay attached to the result.

use crate::parse::{basename, CommandInvocation};

/// Strip transparent wrappers until the head is a real command. Returns
/// the original invocation when no inner command can be identified.
pub fn unwrap_wrappers(inv: &CommandInvocation) -> CommandInvocation {
    let mut current = inv.clone();
    loop {
        let inner = match current.name.as_str() {
            "nohup" => inner_words(current.tail(), skip_none),
            "nice" => inner_words(current.tail(), skip_nice_flags),
            "timeout" => inner_words(current.tail(), skip_timeout_flags),
            _ => return current,
        };
        match inner {
            Some(words) => {
                let assigns = std::mem::take(&mut current.assigns);
                match CommandInvocation::from_words(words, assigns) {
                    Some(next) => current = next,
                    None => return current,
                }
            }
            None => return current,
        }
    }
}

/// Apply a wrapper's flag-skipping rule and return the inner command
/// words, or `None` when nothing follows the flags.
fn inner_words(
    tail: &[String],
    skip: fn(&[String]) -> usize,
) -> Option<Vec<String>> {
    let start = skip(tail);
    if start >= tail.len() {
        return None;
    }
    let mut words: Vec<String> = tail[start..].to_vec();
    words[0] = basename(&words[0]).to_string();
    Some(words)
}

/// nohup takes no flags; the inner command starts immediately.
fn skip_none(_tail: &[String]) -> usize {
    0
}

/// nice: `-n N`, `-nN`, `--adjustment N`, `--adjustment=N`, BSD `-N`.
fn skip_nice_flags(tail: &[String]) -> usize {
    let mut i = 0;
    while i < tail.len() {
        let arg = tail[i].as_str();
        if arg == "-n" || arg == "--adjustment" {
            i += 2;
        } else if arg.starts_with("--adjustment=") {
            i += 1;
        } else if let Some(rest) = arg.strip_prefix("-n") {
            if rest.chars().all(|c| c.is_ascii_digit() || c == '-') {
                i += 1;
            } else {
                break;
            }
        } else if arg.starts_with('-')
            && arg[1..].chars().all(|c| c.is_ascii_digit())
            && arg.len() > 1
        {
            // BSD form: nice -19 cmd
            i += 1;
        } else {
            break;
        }
    }
    i
}

/// timeout: signal/kill-after flags (with or without `=`), three
/// booleans, then one positional DURATION before the inner command.
fn skip_timeout_flags(tail: &[String]) -> usize {
    let mut i = 0;
    while i < tail.len() {
        let arg = tail[i].as_str();
        match arg {
            "-s" | "--signal" | "-k" | "--kill-after" => i += 2,
            "--preserve-status" | "--foreground" | "-v" | "--verbose" => i += 1,
            _ if arg.starts_with("--signal=") || arg.starts_with("--kill-after=") => i += 1,
            _ => break,
        }
    }
    // The DURATION positional.
    if i < tail.len() {
        i += 1;
    }
    i
}
