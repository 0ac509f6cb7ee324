//! find: safe on its own, but `-delete` destroys and `-exec` runs
//! arbitrary programs.

use crate::eval::{Decision, EvalContext};
use crate::parse::CommandInvocation;

pub fn inspect(ctx: &EvalContext<'_>, inv: &CommandInvocation) -> Decision {
    let args = inv.tail();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-delete" => return Decision::ask("find -delete removes files"),
            "-ok" | "-okdir" => {
                return Decision::ask("find -ok runs commands interactively")
            }
            "-exec" | "-execdir" => {
                let mut words = Vec::new();
                i += 1;
                while i < args.len() && args[i] != ";" && args[i] != "+" {
                    words.push(args[i].clone());
                    i += 1;
                }
                let Some(sub) = CommandInvocation::from_words(words, vec![]) else {
                    return Decision::ask("find -exec without a command");
                };
                let verdict = ctx.evaluate_sub(&sub);
                if !verdict.is_allow() {
                    return verdict;
                }
            }
            _ => {}
        }
        i += 1;
    }
    Decision::allow("find without destructive actions")
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
        let inv = parsed.invocations[0].clone();
        let ctx = engine.context(&parsed.invocations);
        inspect(&ctx, &inv)
    }

    #[test]
    fn plain_find_allowed() {
        assert!(eval("find . -name '*.ts'").is_allow());
        assert!(eval("find /tmp -type f -mtime +7").is_allow());
    }

    #[test]
    fn delete_asks() {
        assert!(!eval("find . -delete").is_allow());
        assert!(!eval("find /tmp -name '*.log' -delete").is_allow());
    }

    #[test]
    fn ok_asks() {
        assert!(!eval("find . -ok rm {} \\;").is_allow());
    }

    #[test]
    fn exec_safe_command_allowed() {
        assert!(eval("find . -name '*.ts' -exec grep -l foo {} \\;").is_allow());
        assert!(eval("find . -exec wc -l {} +").is_allow());
    }

    #[test]
    fn exec_unsafe_command_asks() {
        assert!(!eval("find . -exec rm -rf {} \\;").is_allow());
        assert!(!eval("find . -execdir chmod 777 {} \\;").is_allow());
    }

    #[test]
    fn every_exec_clause_must_be_safe() {
        assert!(!eval("find . -exec cat {} \\; -exec rm {} \\;").is_allow());
        assert!(eval("find . -exec cat {} \\; -exec wc -l {} \\;").is_allow());
    }

    #[test]
    fn exec_without_command_asks() {
        assert!(!eval("find . -exec \\;").is_allow());
    }
}
