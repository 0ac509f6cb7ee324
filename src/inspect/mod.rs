//! Named inspectors: per-program argument analyzers.
//!
//! Each inspector is a small pure function from an invocation (plus the
//! evaluation context, for the ones that recurse) to a [`Decision`].
//! Dispatch is one flat match on the program name — the hot path is a
//! single comparison chain, no trait objects.

pub mod chmod;
pub mod docker;
pub mod env;
pub mod find;
pub mod git;
pub mod kill;
pub mod script;
pub mod text;
pub mod xargs;

use crate::eval::{Decision, EvalContext};
use crate::parse::CommandInvocation;

/// Run the inspector registered for `inv.name`, if any.
pub fn inspect(ctx: &EvalContext<'_>, inv: &CommandInvocation) -> Option<Decision> {
    let decision = match inv.name.as_str() {
        "git" => git::inspect(ctx, inv),
        "xargs" => xargs::inspect(ctx, inv),
        "env" => env::inspect(ctx, inv),
        "find" => find::inspect(ctx, inv),
        "sed" => text::inspect_sed(inv),
        "awk" => text::inspect_awk(inv),
        "kill" => kill::inspect(inv),
        "chmod" => chmod::inspect(inv),
        "docker" => docker::inspect(inv),
        "node" | "python" | "python3" => script::inspect_interpreter(inv),
        "source" | "." => script::inspect_source(inv),
        _ => return None,
    };
    Some(decision)
}
