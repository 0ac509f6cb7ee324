use hall_pass::eval::Decision;

fn decide(command: &str) -> Decision {
    hall_pass::evaluate(command).decision
}

fn is_allow(command: &str) -> bool {
    decide(command).is_allow()
}

fn is_ask(command: &str) -> bool {
    matches!(decide(command), Decision::Ask { .. })
}

fn suggestion_for(command: &str) -> Option<String> {
    match decide(command) {
        Decision::Ask { suggestion, .. } => suggestion,
        _ => None,
    }
}

macro_rules! decision_test {
    ($name:ident, $cmd:expr, allow) => {
        #[test]
        fn $name() {
            assert!(is_allow($cmd), "expected ALLOW for: {} → {:?}", $cmd, decide($cmd));
        }
    };
    ($name:ident, $cmd:expr, ask) => {
        #[test]
        fn $name() {
            assert!(is_ask($cmd), "expected ASK for: {} → {:?}", $cmd, decide($cmd));
        }
    };
    ($name:ident, $cmd:expr, pass) => {
        #[test]
        fn $name() {
            assert_eq!(decide($cmd), Decision::Pass, "expected PASS for: {}", $cmd);
        }
    };
}

// ── ALLOW: read-only pipelines ──

decision_test!(allow_grep_head_pipeline, "grep -r foo /path | head -20", allow);
decision_test!(allow_simple_ls, "ls -la", allow);
decision_test!(allow_rg, "rg 'pattern' src/", allow);
decision_test!(allow_sort_uniq, "sort names.txt | uniq -c | sort -rn", allow);
decision_test!(allow_jq, "cat data.json | jq '.items[] | .id'", allow);
decision_test!(allow_wc, "wc -l src/main.rs", allow);
decision_test!(allow_diff, "diff a.txt b.txt", allow);
decision_test!(allow_date, "date +%Y-%m-%d", allow);
decision_test!(allow_which_multiple, "which cargo rustc gcc", allow);
decision_test!(allow_safe_chain, "pwd && ls -la && echo done", allow);

// ── ALLOW: task runners with env prefixes ──

decision_test!(
    allow_bun_test_with_env,
    "TEST_URL=http://localhost:3334 bun test server/",
    allow
);
decision_test!(allow_npm_run, "npm run build", allow);
decision_test!(allow_gh_pr_list, "gh pr list", allow);
decision_test!(allow_cargo_test, "cargo test", allow);

// ── ASK: dangerous env vars ──

decision_test!(ask_ld_preload, "LD_PRELOAD=evil.so ls", ask);
decision_test!(ask_ld_library_path, "LD_LIBRARY_PATH=/tmp/libs grep x", ask);
decision_test!(ask_bash_env, "BASH_ENV=evil.sh echo hi", ask);
decision_test!(ask_prompt_command, "PROMPT_COMMAND='rm -rf /' cat f", ask);

// ── env as a proxy ──

decision_test!(allow_bare_env, "env", allow);
decision_test!(allow_env_safe_command, "env FOO=bar grep x f", allow);
decision_test!(ask_env_ld_preload, "env LD_PRELOAD=evil.so ls", ask);
decision_test!(ask_env_python_inline, "env python3 -c 'print(1)'", ask);
decision_test!(ask_env_node_inline, "env node -e 'evil()'", ask);
decision_test!(ask_env_unknown_command, "env rm -rf /tmp/x", ask);
decision_test!(ask_env_split_string, "env -S 'rm -rf /'", ask);

// ── Transparent wrappers ──

decision_test!(allow_nohup_safe, "nohup bun run dev", allow);
decision_test!(allow_timeout_safe, "timeout 30 grep -r foo .", allow);
decision_test!(allow_nice_nested, "nohup nice -n 10 timeout 5m cargo build", allow);
decision_test!(ask_timeout_wrapping_find_delete, "timeout 60 find . -delete", ask);

// ── Recursion: xargs and find -exec ──

decision_test!(ask_echo_xargs_rm, "echo /tmp | xargs rm -rf", ask);
decision_test!(allow_xargs_grep, "find . -name '*.rs' | xargs grep -l unsafe", allow);
decision_test!(
    allow_find_exec_grep,
    "find . -name '*.ts' -exec grep -l foo {} \\;",
    allow
);
decision_test!(ask_find_delete, "find . -delete", ask);
decision_test!(ask_find_exec_rm, "find . -name '*.log' -exec rm {} \\;", ask);

// ── Git policy ──

decision_test!(allow_git_status, "git status", allow);
decision_test!(allow_git_log, "git log --oneline -10", allow);
decision_test!(ask_git_force_push, "git push --force", ask);
decision_test!(allow_git_push_feature, "git push origin feat/x", allow);
decision_test!(ask_git_push_main, "git push origin main", ask);
decision_test!(ask_git_push_refspec_main, "git push origin HEAD:main", ask);
decision_test!(
    ask_git_config_injection,
    "git -c core.fsmonitor=\"rm -rf /\" status",
    ask
);
decision_test!(allow_git_color_config, "git -c color.ui=false status", allow);
decision_test!(ask_git_reset, "git reset --hard HEAD~2", ask);
decision_test!(ask_git_clean, "git clean -fd", ask);
decision_test!(ask_git_checkout_dot, "git checkout .", ask);
decision_test!(ask_git_stash_drop, "git stash drop", ask);

// ── SQL classification ──

decision_test!(
    allow_psql_select,
    "psql -c \"SELECT DISTINCT id FROM t LIMIT 1\"",
    allow
);
decision_test!(ask_psql_mixed, "psql -c \"SELECT 1; DROP TABLE u\"", ask);
decision_test!(ask_sqlite_drop, "sqlite3 db \"DROP TABLE t\"", ask);
decision_test!(allow_sqlite_select, "sqlite3 db \"SELECT 1\"", allow);
decision_test!(allow_psql_describe, "psql -c '\\dt'", allow);
decision_test!(ask_psql_shell_escape, "psql -c '\\! rm -rf /'", ask);
decision_test!(allow_mysql_show, "mysql -e 'SHOW TABLES'", allow);
decision_test!(ask_interactive_psql, "psql mydb", ask);
decision_test!(allow_sqlite_schema, "sqlite3 app.db .schema", allow);
decision_test!(ask_sqlite_system, "sqlite3 app.db '.system ls'", ask);

// ── Path policy ──

decision_test!(ask_redirect_to_ssh, "echo hacked > ~/.ssh/authorized_keys", ask);
decision_test!(ask_cat_env_file, "cat /project/.env", ask);
decision_test!(ask_cat_env_variant, "cat ./.env.production", ask);
decision_test!(ask_head_pem, "head -5 certs/server.pem", ask);
decision_test!(ask_cp_onto_aws_config, "cp evil ~/.aws/credentials", ask);
decision_test!(allow_cat_ordinary, "cat src/main.rs", allow);
decision_test!(allow_redirect_tmp, "echo data > /tmp/scratch.txt", allow);

// ── Guidance (feedback) rules ──

#[test]
fn json_one_liner_gets_jq_advice() {
    let cmd = "curl -s https://api.test | python3 -c \"import json,sys; print(json.load(sys.stdin)['id'])\"";
    assert!(is_ask(cmd));
    let advice = suggestion_for(cmd).expect("should carry a suggestion");
    assert!(advice.contains("jq"), "advice was: {advice}");
}

#[test]
fn string_one_liner_gets_shell_advice() {
    let cmd = "python3 -c \"print('a,b,c'.split(',')[0])\"";
    assert!(is_ask(cmd));
    let advice = suggestion_for(cmd).expect("should carry a suggestion");
    assert!(
        advice.contains("sed") || advice.contains("cut"),
        "advice was: {advice}"
    );
}

#[test]
fn node_json_one_liner_gets_jq_advice() {
    let cmd = "node -e 'console.log(JSON.parse(body).id)'";
    let advice = suggestion_for(cmd).expect("should carry a suggestion");
    assert!(advice.contains("jq"));
}

#[test]
fn plain_interpreter_inline_code_is_a_plain_ask() {
    // No JSON, no string ops: still asks (inline code), but without advice.
    let cmd = "python3 -c 'print(40 + 2)'";
    assert!(is_ask(cmd));
    assert_eq!(suggestion_for(cmd), None);
}

// ── Pass-through ──

decision_test!(pass_unknown_command, "some-unknown-command --flag", pass);
decision_test!(pass_eval, "eval 'rm -rf /'", pass);
decision_test!(pass_bash_dash_c, "bash -c 'rm -rf /'", pass);
decision_test!(pass_curl_alone, "curl https://example.com", pass);

// ── Boundary cases ──

decision_test!(ask_empty_command, "", ask);
decision_test!(allow_assignment_only, "FOO=bar BAZ=qux", allow);
decision_test!(ask_kill_pid_one, "kill 1", ask);
decision_test!(allow_kill_pid_ten, "kill 10", allow);
decision_test!(ask_chmod_0777, "chmod 0777 f", ask);
decision_test!(allow_chmod_0644, "chmod 0644 f", allow);
decision_test!(ask_chmod_4755, "chmod 4755 f", ask);
decision_test!(ask_chmod_1777, "chmod 1777 f", ask);
decision_test!(ask_chmod_777, "chmod 777 f", ask);
decision_test!(ask_chmod_666, "chmod 666 f", ask);

// ── Quoting ──

#[test]
fn quoting_is_transparent() {
    let verdicts = [
        decide("rm -rf /"),
        decide("'rm' -rf /"),
        decide("\"rm\" -rf /"),
        decide("/bin/rm -rf /"),
    ];
    for v in &verdicts[1..] {
        assert_eq!(v, &verdicts[0]);
    }
}

#[test]
fn substitution_cannot_hide_commands() {
    assert!(is_ask("echo \"$(chmod 777 /tmp/x)\""));
    assert!(is_ask("ls `find . -delete`"));
}

#[test]
fn quoted_substitution_is_inert_text() {
    assert!(is_allow("echo '$(chmod 777 /tmp/x)'"));
}

// ── Compound structures ──

decision_test!(allow_subshell_safe, "(cd /tmp && ls)", allow);
decision_test!(ask_loop_body_checked, "for f in *.log; do chmod 666 $f; done", ask);
decision_test!(
    allow_loop_body_safe,
    "for f in src/*.rs; do wc -l $f; done",
    allow
);
decision_test!(
    ask_case_arm_checked,
    "case $1 in x) find . -delete;; esac",
    ask
);
decision_test!(ask_heredoc_unquoted_substitution, "cat <<EOF\n$(chmod 777 x)\nEOF", ask);
decision_test!(allow_heredoc_quoted_body, "cat <<'EOF'\n$(chmod 777 x)\nEOF", allow);

#[test]
fn later_commands_cannot_rescue_a_prompt() {
    // Short-circuit: the find -delete decides, ls after it is irrelevant.
    assert!(is_ask("find . -delete && ls"));
}

#[test]
fn sed_in_place_asks_but_filter_does_not() {
    assert!(is_ask("sed -i 's/a/b/' file.txt"));
    assert!(is_allow("sed 's/a/b/' file.txt"));
}

#[test]
fn awk_system_asks_but_filter_does_not() {
    assert!(is_ask("awk '{system(\"id\")}'"));
    assert!(is_allow("ps aux | awk '{print $2}'"));
}

#[test]
fn docker_inspection_allowed_privileged_asks() {
    assert!(is_allow("docker ps -a"));
    assert!(is_ask("docker run --privileged img"));
    assert!(is_ask("docker run -v /:/host img"));
}

#[test]
fn source_always_asks() {
    assert!(is_ask("source ./env.sh"));
    assert!(is_ask(". ./env.sh"));
}

#[test]
fn parse_failure_never_allows() {
    for cmd in ["echo 'unterminated", "ls $(", "cat \"half"] {
        let d = decide(cmd);
        assert!(
            matches!(d, Decision::Ask { .. }),
            "parse failure must ask: {cmd} → {d:?}"
        );
    }
}

#[test]
fn every_verdict_is_one_of_the_three() {
    // Smoke the full matrix of shapes; the driver must always produce a
    // well-formed verdict, never panic.
    let inputs = [
        "",
        "ls",
        "rm -rf /",
        "git push origin main",
        "a | b | c && d ; e",
        "for i in 1 2 3; do echo $i; done",
        "cat <<EOF\nhello\nEOF",
        "echo \\",
        "x=1 y=2 z=3",
        "(((ls)))",
        "find / -name '*' -exec chmod 777 {} +",
        "psql -c '\\copy t to stdout'",
    ];
    for cmd in inputs {
        let _ = decide(cmd);
    }
}
