//! Inline-SQL extraction and read-only classification.
//!
//! A DB-client invocation is auto-approved only when every statement it
//! would run is provably read-only. Extraction knows each client's flag
//! conventions; classification splits statements with a scanner that
//! honors string literals and comments, then judges each statement by
//! its leading keyword. Anything unrecognized is treated as not
//! read-only — uncertainty always prompts.

use crate::parse::CommandInvocation;

/// psql backslash commands that only introspect. `\!`, `\copy`, `\i`,
/// `\o`, `\w` and friends touch the filesystem or run programs and are
/// deliberately absent.
const PSQL_META_ALLOWED: &[&str] = &[
    "d", "da", "db", "dc", "dd", "df", "dg", "di", "dl", "dm", "dn", "do",
    "dp", "ds", "dt", "du", "dv", "dx", "dE", "dO", "dT", "l", "list",
    "conninfo", "encoding", "pset", "x", "t", "a", "timing", "echo", "sf",
    "sv", "g", "gx", "if", "h", "help", "?", "z",
];

/// sqlite3 dot commands that only introspect or change display settings.
/// `.import`, `.restore`, `.open`, `.output`, `.save`, `.backup`,
/// `.read`, `.system`, `.shell` reach outside the session.
const SQLITE_DOT_ALLOWED: &[&str] = &[
    "schema", "fullschema", "tables", "databases", "indexes", "indices",
    "headers", "header", "mode", "dump", "show", "stats", "print", "help",
    "version", "timer", "echo", "nullvalue", "width", "separator", "changes",
    "dbinfo", "lint", "scanstats",
];

/// Statement kinds that never write.
const READ_ONLY_KEYWORDS: &[&str] = &["select", "with", "show", "values"];

/// sqlite3 flags that consume a value, skipped while hunting for the
/// positional `db_file SQL` pair.
const SQLITE_VALUE_FLAGS: &[&str] = &["-cmd", "-separator", "-newline"];

/// Pull the inline SQL out of a DB-client invocation.
///
/// `None` means there is no inline SQL — an interactive session, which
/// the caller must treat as not read-only.
pub fn extract_sql(inv: &CommandInvocation) -> Option<String> {
    match inv.name.as_str() {
        "psql" => flag_value(inv.tail(), &["-c", "--command"]),
        "mysql" => flag_value(inv.tail(), &["-e", "--execute"]),
        "sqlite3" => sqlite_positional_sql(inv.tail()),
        _ => None,
    }
}

/// Value of a `-c SQL` / `--command SQL` / `--command=SQL` flag.
fn flag_value(args: &[String], flags: &[&str]) -> Option<String> {
    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        for flag in flags {
            if arg == flag {
                return iter.peek().map(|v| v.to_string());
            }
            if flag.starts_with("--") {
                if let Some(value) = arg.strip_prefix(&format!("{flag}=")) {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// sqlite3 usage is `sqlite3 [opts] db_file [SQL]`; the SQL is the
/// second positional argument.
fn sqlite_positional_sql(args: &[String]) -> Option<String> {
    let mut positionals = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if SQLITE_VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        positionals.push(arg.clone());
        if positionals.len() == 2 {
            break;
        }
    }
    positionals.into_iter().nth(1)
}

/// Classify a piece of inline SQL. True only when every statement is
/// provably read-only.
pub fn is_read_only(sql: &str) -> bool {
    let trimmed = sql.trim();
    if trimmed.is_empty() {
        return true;
    }
    if let Some(meta) = trimmed.strip_prefix('\\') {
        return psql_meta_read_only(meta);
    }
    if let Some(dot) = trimmed.strip_prefix('.') {
        return sqlite_dot_read_only(dot);
    }
    let statements = split_statements(trimmed);
    // The PRAGMA shortcut only applies to a lone statement; trailing
    // statements get judged on their own.
    if statements.len() == 1 {
        let lone = statements[0].trim();
        // get() instead of slicing: byte 6 may not be a char boundary.
        if lone
            .get(..6)
            .is_some_and(|p| p.eq_ignore_ascii_case("pragma"))
        {
            return !lone.contains('=');
        }
    }
    if statements.is_empty() {
        return true;
    }
    statements.iter().all(|s| statement_read_only(s))
}

/// `\dt+`, `\d tablename`, `\x` — allowed when the command word (before
/// `+` or whitespace) is in the introspection set.
fn psql_meta_read_only(meta: &str) -> bool {
    let word: String = meta
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '+')
        .collect();
    if word.is_empty() {
        return false;
    }
    PSQL_META_ALLOWED.contains(&word.as_str())
}

fn sqlite_dot_read_only(dot: &str) -> bool {
    let word: String = dot.chars().take_while(|c| !c.is_whitespace()).collect();
    if word.is_empty() {
        return false;
    }
    SQLITE_DOT_ALLOWED.contains(&word.as_str())
}

fn statement_read_only(statement: &str) -> bool {
    let mut rest = statement.trim();
    // Tolerate a parenthesized leading query: `(SELECT 1) UNION ...`.
    while let Some(stripped) = rest.strip_prefix('(') {
        rest = stripped.trim_start();
    }
    let keyword: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if keyword.is_empty() {
        return false;
    }
    let lower = keyword.to_ascii_lowercase();
    if !READ_ONLY_KEYWORDS.contains(&lower.as_str()) {
        return false;
    }
    if lower == "with" {
        // A CTE prologue can front INSERT/UPDATE/DELETE; the main verb
        // after the CTE bodies decides.
        return with_statement_read_only(rest);
    }
    true
}

/// After `WITH name AS (...) [, name AS (...)]*`, the next top-level
/// keyword is the real verb.
fn with_statement_read_only(statement: &str) -> bool {
    let chars: Vec<char> = statement.chars().collect();
    let mut i = 0;
    let mut depth = 0u32;
    let mut in_single = false;
    let mut in_double = false;
    while i < chars.len() {
        let c = chars[i];
        if in_single {
            if c == '\'' {
                in_single = false;
            }
            i += 1;
            continue;
        }
        if in_double {
            if c == '"' {
                in_double = false;
            }
            i += 1;
            continue;
        }
        match c {
            '\'' => in_single = true,
            '"' => in_double = true,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 && c.is_ascii_alphabetic() {
            let mut word = String::new();
            while i < chars.len() && chars[i].is_ascii_alphabetic() {
                word.push(chars[i]);
                i += 1;
            }
            match word.to_ascii_lowercase().as_str() {
                "select" | "values" => return true,
                "insert" | "update" | "delete" | "merge" => return false,
                _ => {}
            }
            continue;
        }
        i += 1;
    }
    // Never saw a main verb; `WITH` alone proves nothing.
    false
}

/// Split on top-level semicolons, honoring `'…'`, `"…"`, `--` line
/// comments, and `/* … */` block comments.
fn split_statements(sql: &str) -> Vec<String> {
    let chars: Vec<char> = sql.chars().collect();
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut i = 0;
    let mut in_single = false;
    let mut in_double = false;
    while i < chars.len() {
        let c = chars[i];
        if in_single {
            current.push(c);
            if c == '\'' {
                // `''` is an escaped quote inside the literal.
                if chars.get(i + 1) == Some(&'\'') {
                    current.push('\'');
                    i += 2;
                    continue;
                }
                in_single = false;
            }
            i += 1;
            continue;
        }
        if in_double {
            current.push(c);
            if c == '"' {
                in_double = false;
            }
            i += 1;
            continue;
        }
        match c {
            '\'' => {
                in_single = true;
                current.push(c);
                i += 1;
            }
            '"' => {
                in_double = true;
                current.push(c);
                i += 1;
            }
            '-' if chars.get(i + 1) == Some(&'-') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() {
                    if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            ';' => {
                let stmt = current.trim().to_string();
                if !stmt.is_empty() {
                    statements.push(stmt);
                }
                current.clear();
                i += 1;
            }
            _ => {
                current.push(c);
                i += 1;
            }
        }
    }
    let stmt = current.trim().to_string();
    if !stmt.is_empty() {
        statements.push(stmt);
    }
    statements
}
