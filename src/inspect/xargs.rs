//! xargs: transparent argument feeder — the wrapped command decides.

use crate::eval::{Decision, EvalContext};
use crate::parse::CommandInvocation;

/// xargs flags that consume a following value.
const TWO_ARG_FLAGS: &[&str] = &["-I", "-L", "-n", "-P", "-d", "-s", "-a", "-R"];

pub fn inspect(ctx: &EvalContext<'_>, inv: &CommandInvocation) -> Decision {
    let args = inv.tail();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if TWO_ARG_FLAGS.contains(&arg) {
            i += 2;
            continue;
        }
        if arg.starts_with('-') && arg.len() > 1 {
            i += 1;
            continue;
        }
        // First non-flag word starts the wrapped command.
        let words: Vec<String> = args[i..].to_vec();
        let Some(sub) = CommandInvocation::from_words(words, vec![]) else {
            break;
        };
        let verdict = ctx.evaluate_sub(&sub);
        if verdict.is_allow() {
            return Decision::allow(format!("xargs wrapping safe `{}`", sub.name));
        }
        return verdict;
    }
    // No wrapped command: xargs defaults to echo.
    Decision::allow("bare xargs echoes its input")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::eval::Engine;
    use crate::parse::parse;

    fn eval(cmd: &str) -> Decision {
        let engine = Engine::new(Config::default_config());
        let parsed = parse(cmd).unwrap();
        let inv = parsed
            .invocations
            .iter()
            .find(|i| i.name == "xargs")
            .expect("xargs invocation")
            .clone();
        let ctx = engine.context(&parsed.invocations);
        inspect(&ctx, &inv)
    }

    #[test]
    fn bare_xargs_allowed() {
        assert!(eval("xargs").is_allow());
        assert!(eval("xargs -n 1").is_allow());
    }

    #[test]
    fn safe_wrapped_command_allowed() {
        assert!(eval("xargs grep -l foo").is_allow());
        assert!(eval("xargs -n 1 wc -l").is_allow());
        assert!(eval("xargs -I {} cat {}").is_allow());
    }

    #[test]
    fn unsafe_wrapped_command_asks() {
        assert!(!eval("xargs rm -rf").is_allow());
        assert!(!eval("echo /tmp | xargs rm -rf").is_allow());
    }

    #[test]
    fn wrapped_inspected_command_recurses() {
        assert!(!eval("xargs chmod 777").is_allow());
        assert!(eval("xargs git status").is_allow());
    }

    #[test]
    fn flag_values_are_not_commands() {
        // `-I` consumes `{}`; the command is `cat`, not `{}`.
        assert!(eval("xargs -I {} cat").is_allow());
    }
}
