//! Evaluation context handed to inspectors.
//!
//! Inspectors that wrap other programs (`xargs`, `find -exec`) must
//! re-enter the evaluator without naming it — that would make the
//! inspector modules depend on the evaluator module and back again. The
//! context therefore carries the engine state plus a plain function
//! pointer to the per-invocation evaluator, bound once per request.

use super::decision::Decision;
use super::Engine;
use crate::parse::CommandInvocation;

pub struct EvalContext<'a> {
    pub engine: &'a Engine,
    /// Every invocation in the current pipeline, for rules that need
    /// cross-command context.
    pub pipeline: &'a [CommandInvocation],
    pub(super) eval_fn: fn(&EvalContext<'_>, &CommandInvocation) -> Decision,
}

impl<'a> EvalContext<'a> {
    pub(super) fn new(
        engine: &'a Engine,
        pipeline: &'a [CommandInvocation],
        eval_fn: fn(&EvalContext<'_>, &CommandInvocation) -> Decision,
    ) -> Self {
        EvalContext {
            engine,
            pipeline,
            eval_fn,
        }
    }

    /// Evaluate a sub-command on behalf of a wrapping program.
    ///
    /// `Pass` is escalated to `Ask` here: "no opinion" about the inner
    /// command is not a safety statement once another program is going
    /// to execute it.
    pub fn evaluate_sub(&self, inv: &CommandInvocation) -> Decision {
        match (self.eval_fn)(self, inv) {
            Decision::Pass => Decision::ask(format!(
                "`{}` is not auto-approved when run through another command",
                inv.name
            )),
            decision => decision,
        }
    }
}
