//! Interpreters and `source`: inline code and sourced scripts execute
//! arbitrary programs, so they always prompt.

use crate::eval::Decision;
use crate::parse::CommandInvocation;

/// `node -e` / `python -c` style inline code.
pub fn inspect_interpreter(inv: &CommandInvocation) -> Decision {
    let inline_flags: &[&str] = match inv.name.as_str() {
        "node" => &["-e", "--eval", "-p", "--print"],
        _ => &["-c"],
    };
    for arg in inv.tail() {
        if inline_flags.contains(&arg.as_str()) {
            return Decision::ask(format!(
                "{} {} runs inline code",
                inv.name, arg
            ));
        }
    }
    Decision::allow(format!("{} running a script file", inv.name))
}

/// `source` / `.` executes a file in the current shell.
pub fn inspect_source(_inv: &CommandInvocation) -> Decision {
    Decision::ask("sourcing a script executes its contents")
}
