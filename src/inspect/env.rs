//! env: prints the environment when bare, proxies a command otherwise.
//!
//! `env NAME=VALUE cmd` puts the assignments in argument position where
//! the inline-assign check cannot see them, so they are re-extracted
//! here and attached to the proxied invocation before re-evaluation.

use crate::eval::{Decision, EvalContext};
use crate::parse::CommandInvocation;
use crate::registry::DANGEROUS_ENV;

/// env flags that consume a following value.
const TWO_ARG_FLAGS: &[&str] = &["-u", "--unset", "-C", "--chdir"];

pub fn inspect(ctx: &EvalContext<'_>, inv: &CommandInvocation) -> Decision {
    let args = inv.tail();
    let mut assigns: Vec<(String, String)> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if TWO_ARG_FLAGS.contains(&arg) {
            i += 2;
            continue;
        }
        if arg.starts_with("-S") || arg.starts_with("--split-string") {
            // -S re-splits its operand into a fresh command line,
            // sidestepping the parsed tree.
            return Decision::ask("env -S builds a new command line");
        }
        if arg.starts_with("--unset=") || arg.starts_with("--chdir=") {
            i += 1;
            continue;
        }
        if arg.starts_with('-') && arg.len() > 1 {
            i += 1;
            continue;
        }
        if let Some((name, value)) = split_assignment(arg) {
            if DANGEROUS_ENV.contains(&name) {
                return Decision::ask(format!("env setting {name} can hijack what runs"));
            }
            assigns.push((name.to_string(), value.to_string()));
            i += 1;
            continue;
        }
        // First non-assignment word starts the proxied command.
        let words: Vec<String> = args[i..].to_vec();
        let Some(sub) = CommandInvocation::from_words(words, assigns) else {
            break;
        };
        let verdict = ctx.evaluate_sub(&sub);
        if verdict.is_allow() {
            return Decision::allow(format!("env wrapping safe `{}`", sub.name));
        }
        return verdict;
    }
    Decision::allow("bare env prints the environment")
}

/// `NAME=value` with a valid identifier before the `=`.
fn split_assignment(arg: &str) -> Option<(&str, &str)> {
    let eq = arg.find('=')?;
    let name = &arg[..eq];
    let mut chars = name.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((name, &arg[eq + 1..]))
}
