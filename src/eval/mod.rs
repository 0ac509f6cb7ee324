//! Evaluation engine: the per-invocation pipeline and the top-level
//! decision driver.
//!
//! [`Engine`] holds the per-process snapshot (configuration, compiled
//! path policy, safelists). Evaluation itself is pure: no I/O, no
//! mutation, deterministic from the inputs — the only environment reads
//! happen once in [`Engine::new`].

pub mod context;
pub mod decision;
pub mod unwrap;

pub use context::EvalContext;
pub use decision::Decision;
pub use unwrap::unwrap_wrappers;

use std::collections::HashSet;

use crate::config::Config;
use crate::guidance;
use crate::inspect;
use crate::parse::{self, CommandInvocation, RedirectOp};
use crate::paths::{looks_like_path, PathPolicy};
use crate::registry::{self, PathOperation};
use crate::sql;

/// A decision plus the driver stage that produced it (for the audit
/// log's `layer` field).
#[derive(Debug)]
pub struct Evaluation {
    pub decision: Decision,
    pub layer: &'static str,
}

impl Evaluation {
    fn new(decision: Decision, layer: &'static str) -> Self {
        Evaluation { decision, layer }
    }
}

pub struct Engine {
    config: Config,
    policy: PathPolicy,
    safe: HashSet<String>,
    db_clients: HashSet<String>,
}

impl Engine {
    /// Build from configuration, snapshotting `$HOME` and the working
    /// directory for path resolution.
    pub fn new(config: Config) -> Self {
        let policy = PathPolicy::from_env(
            &config.paths.protected,
            &config.paths.read_only,
            &config.paths.no_delete,
        );
        Self::assemble(config, policy)
    }

    /// Build with an explicit path policy (deterministic tests).
    pub fn with_policy(config: Config, policy: PathPolicy) -> Self {
        Self::assemble(config, policy)
    }

    fn assemble(config: Config, policy: PathPolicy) -> Self {
        let mut safe: HashSet<String> =
            registry::ALWAYS_SAFE.iter().map(|s| s.to_string()).collect();
        safe.extend(config.commands.safe.iter().cloned());
        let mut db_clients: HashSet<String> =
            registry::DB_CLIENTS.iter().map(|s| s.to_string()).collect();
        db_clients.extend(config.commands.db_clients.iter().cloned());
        Engine {
            config,
            policy,
            safe,
            db_clients,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn protected_branches(&self) -> &[String] {
        &self.config.git.protected_branches
    }

    fn is_safe(&self, name: &str) -> bool {
        self.safe.contains(name)
    }

    fn is_db_client(&self, name: &str) -> bool {
        self.db_clients.contains(name)
    }

    pub(crate) fn context<'a>(
        &'a self,
        pipeline: &'a [CommandInvocation],
    ) -> EvalContext<'a> {
        EvalContext::new(self, pipeline, evaluate_invocation)
    }

    /// Decide a full shell command string.
    pub fn evaluate_command(&self, command: &str) -> Evaluation {
        if command.trim().is_empty() {
            return Evaluation::new(Decision::ask("empty command"), "parse");
        }
        let parsed = match parse::parse(command) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Evaluation::new(
                    Decision::ask(format!("parse failed: {e}")),
                    "parse",
                );
            }
        };

        // Redirect targets are checked once for the whole pipeline; a
        // denial here cannot be overridden by any per-command verdict.
        for redirect in &parsed.redirects {
            let op = match redirect.op {
                RedirectOp::Write => PathOperation::Write,
                RedirectOp::Read => PathOperation::Read,
            };
            if let Err(reason) = self.policy.check(&redirect.path, op) {
                return Evaluation::new(Decision::ask(reason), "redirect");
            }
        }

        if let Some(suggestion) = guidance::check(&parsed.invocations) {
            return Evaluation::new(
                Decision::guide("a better tool exists for this", suggestion),
                "guidance",
            );
        }

        if parsed.invocations.is_empty() {
            if parsed.bare_assignment {
                return Evaluation::new(
                    Decision::allow("assignment only, nothing executes"),
                    "assign",
                );
            }
            // Comment-only or redirect-only input: no opinion.
            return Evaluation::new(Decision::Pass, "command");
        }

        let ctx = self.context(&parsed.invocations);
        for inv in &parsed.invocations {
            let verdict = evaluate_invocation(&ctx, inv);
            if !verdict.is_allow() {
                return Evaluation::new(verdict, "command");
            }
        }
        Evaluation::new(
            Decision::allow(format!(
                "{} command(s) approved",
                parsed.invocations.len()
            )),
            "command",
        )
    }

    /// Decide a Write/Edit tool call on a file path.
    pub fn evaluate_file(&self, path: &str) -> Evaluation {
        match self.policy.check(path, PathOperation::Write) {
            Ok(()) => Evaluation::new(Decision::Pass, "file"),
            Err(reason) => Evaluation::new(Decision::ask(reason), "file"),
        }
    }
}

/// The per-invocation pipeline. Order matters; first non-Allow wins:
/// unwrap → dangerous env → guidance → path check → safelist →
/// inspector → DB client → Pass.
fn evaluate_invocation(ctx: &EvalContext<'_>, inv: &CommandInvocation) -> Decision {
    let inv = unwrap_wrappers(inv);

    if let Some(var) = registry::has_dangerous_assign(&inv) {
        return Decision::ask(format!("inline {var} can hijack what runs"));
    }

    if let Some(suggestion) = guidance::check_invocation(&inv, ctx.pipeline) {
        return Decision::guide("a better tool exists for this", suggestion);
    }

    if let Some(op) = registry::path_operation(&inv.name) {
        for arg in inv.tail() {
            if arg.starts_with('-') || !looks_like_path(arg) {
                continue;
            }
            if let Err(reason) = ctx.engine.policy.check(arg, op) {
                return Decision::ask(reason);
            }
        }
    }

    if ctx.engine.is_safe(&inv.name) {
        return Decision::allow(format!("{} is auto-approved", inv.name));
    }

    if let Some(verdict) = inspect::inspect(ctx, &inv) {
        return verdict;
    }

    if ctx.engine.is_db_client(&inv.name) {
        return match sql::extract_sql(&inv) {
            Some(text) if sql::is_read_only(&text) => {
                Decision::allow(format!("{} running read-only SQL", inv.name))
            }
            Some(_) => Decision::ask(format!("{} SQL is not read-only", inv.name)),
            None => Decision::ask(format!("interactive {} session", inv.name)),
        };
    }

    Decision::Pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::PathPolicy;

    fn engine() -> Engine {
        let config = Config::default_config();
        let policy = PathPolicy::with_roots(
            &config.paths.protected,
            &config.paths.read_only,
            &config.paths.no_delete,
            "/home/dev",
            "/project",
        );
        Engine::with_policy(config, policy)
    }

    fn decide(cmd: &str) -> Decision {
        engine().evaluate_command(cmd).decision
    }

    // ── Driver-level behavior ──

    #[test]
    fn empty_command_asks() {
        assert_eq!(decide(""), Decision::ask("empty command"));
        assert!(matches!(decide("   "), Decision::Ask { .. }));
    }

    #[test]
    fn parse_failure_asks() {
        let d = decide("echo 'unterminated");
        match d {
            Decision::Ask { reason, .. } => assert!(reason.contains("parse failed")),
            other => panic!("expected ask, got {other:?}"),
        }
    }

    #[test]
    fn bare_assignment_allowed() {
        assert!(decide("FOO=bar").is_allow());
        assert!(decide("FOO=bar BAZ=qux").is_allow());
    }

    #[test]
    fn comment_only_passes() {
        assert_eq!(decide("# nothing to see"), Decision::Pass);
    }

    #[test]
    fn unknown_command_passes() {
        assert_eq!(decide("some-unknown-command --flag"), Decision::Pass);
    }

    #[test]
    fn short_circuit_on_first_non_allow() {
        // rm is unknown->pass as a sub-decision? No: rm alone is Pass at
        // top level, so the chain passes through the host.
        assert_eq!(decide("ls && some-unknown-command"), Decision::Pass);
        // An Ask earlier in the chain wins even if later commands are safe.
        let d = decide("find . -delete && ls");
        assert!(matches!(d, Decision::Ask { .. }));
    }

    #[test]
    fn all_safe_pipeline_allowed() {
        assert!(decide("grep -r foo /path | head -20").is_allow());
        assert!(decide("cat notes.txt | sort | uniq -c | head").is_allow());
    }

    // ── Pipeline steps ──

    #[test]
    fn dangerous_env_asks_even_on_safe_command() {
        let d = decide("LD_PRELOAD=evil.so ls");
        match d {
            Decision::Ask { reason, .. } => assert!(reason.contains("LD_PRELOAD")),
            other => panic!("expected ask, got {other:?}"),
        }
    }

    #[test]
    fn harmless_env_on_safe_runner_allowed() {
        assert!(decide("TEST_URL=http://localhost:3334 bun test server/").is_allow());
    }

    #[test]
    fn wrapped_safe_command_allowed() {
        assert!(decide("nohup bun run dev").is_allow());
        assert!(decide("timeout 30 grep -r foo .").is_allow());
        assert!(decide("nice -n 10 cargo build").is_allow());
    }

    #[test]
    fn wrapper_does_not_hide_dangerous_env() {
        assert!(matches!(
            decide("BASH_ENV=evil.sh nohup ls"),
            Decision::Ask { .. }
        ));
    }

    #[test]
    fn protected_path_read_asks() {
        let d = decide("cat /project/.env");
        assert!(matches!(d, Decision::Ask { .. }), "got {d:?}");
    }

    #[test]
    fn protected_redirect_asks() {
        let d = decide("echo hacked > ~/.ssh/authorized_keys");
        assert!(matches!(d, Decision::Ask { .. }), "got {d:?}");
    }

    #[test]
    fn read_redirect_of_protected_file_asks() {
        let d = decide("wc -l < .env");
        assert!(matches!(d, Decision::Ask { .. }), "got {d:?}");
    }

    #[test]
    fn ordinary_redirect_with_safe_command_allowed() {
        assert!(decide("echo data > /tmp/out.txt").is_allow());
    }

    #[test]
    fn guidance_beats_plain_inspection() {
        let d = decide("curl -s http://x | python3 -c 'import json; json.loads(1)'");
        match d {
            Decision::Ask {
                suggestion: Some(s),
                ..
            } => assert!(s.contains("jq")),
            other => panic!("expected guidance, got {other:?}"),
        }
    }

    #[test]
    fn db_client_read_only_allowed() {
        assert!(decide("psql -c 'SELECT DISTINCT id FROM t LIMIT 1'").is_allow());
        assert!(decide("sqlite3 db 'SELECT 1'").is_allow());
    }

    #[test]
    fn db_client_write_asks() {
        assert!(matches!(
            decide("psql -c 'SELECT 1; DROP TABLE u'"),
            Decision::Ask { .. }
        ));
        assert!(matches!(
            decide("sqlite3 db 'DROP TABLE t'"),
            Decision::Ask { .. }
        ));
    }

    #[test]
    fn interactive_db_session_asks() {
        assert!(matches!(decide("psql mydb"), Decision::Ask { .. }));
    }

    #[test]
    fn substituted_commands_are_evaluated() {
        // `$(chmod 777 x)` hides a mutation inside a safe-looking echo.
        let d = decide("echo $(chmod 777 x)");
        assert!(matches!(d, Decision::Ask { .. }), "got {d:?}");
    }

    #[test]
    fn xargs_recursion_asks_for_unknown() {
        let d = decide("echo /tmp | xargs rm -rf");
        assert!(matches!(d, Decision::Ask { .. }), "got {d:?}");
    }

    #[test]
    fn quoting_does_not_change_the_verdict() {
        let plain = decide("rm -rf /");
        let single = decide("'rm' -rf /");
        let double = decide("\"rm\" -rf /");
        assert_eq!(plain, single);
        assert_eq!(plain, double);
    }

    #[test]
    fn eval_falls_through_to_pass() {
        // eval/bash -c have no inspector and are not safelisted; the host
        // prompt is the backstop.
        assert_eq!(decide("eval 'rm -rf /'"), Decision::Pass);
        assert_eq!(decide("bash -c 'rm -rf /'"), Decision::Pass);
    }

    #[test]
    fn user_safelist_extends() {
        let mut config = Config::default_config();
        config.commands.safe.push("my-tool".into());
        let policy = PathPolicy::with_roots(&[], &[], &[], "/home/dev", "/project");
        let engine = Engine::with_policy(config, policy);
        assert!(engine.evaluate_command("my-tool --run").decision.is_allow());
    }

    // ── File tool ──

    #[test]
    fn file_write_to_protected_path_asks() {
        let e = engine().evaluate_file("/project/.env");
        assert!(matches!(e.decision, Decision::Ask { .. }));
        assert_eq!(e.layer, "file");
    }

    #[test]
    fn file_write_to_ordinary_path_passes() {
        let e = engine().evaluate_file("/project/src/main.rs");
        assert_eq!(e.decision, Decision::Pass);
    }

    // ── Layer reporting ──

    #[test]
    fn layers_are_reported() {
        assert_eq!(engine().evaluate_command("echo 'x").layer, "parse");
        assert_eq!(
            engine().evaluate_command("echo x > .env").layer,
            "redirect"
        );
        assert_eq!(engine().evaluate_command("FOO=bar").layer, "assign");
        assert_eq!(engine().evaluate_command("ls").layer, "command");
    }
}
