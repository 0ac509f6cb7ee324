//! Types produced by the shell parser and consumed by the eval layer.

use thiserror::Error;

/// A single program invocation discovered anywhere in the parse tree.
///
/// `args[0]` is always the path-stripped program name, so
/// `/usr/bin/grep -r foo` and `grep -r foo` produce the same invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Basename of the program (`/usr/bin/grep` → `grep`).
    pub name: String,
    /// All words including the (stripped) program name, quotes resolved.
    pub args: Vec<String>,
    /// Inline `VAR=value` prefixes attached to this invocation.
    pub assigns: Vec<(String, String)>,
}

impl CommandInvocation {
    /// Build an invocation from resolved words, stripping the program path.
    pub fn from_words(mut words: Vec<String>, assigns: Vec<(String, String)>) -> Option<Self> {
        let first = words.first()?;
        let name = basename(first).to_string();
        words[0] = name.clone();
        Some(CommandInvocation {
            name,
            args: words,
            assigns,
        })
    }

    /// Arguments after the program name.
    pub fn tail(&self) -> &[String] {
        &self.args[1..]
    }
}

/// Strip a leading directory path from a program word.
pub fn basename(word: &str) -> &str {
    word.rsplit('/').next().unwrap_or(word)
}

/// Direction of a file redirection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOp {
    /// `>`, `>>`, `>|`, `&>`, `&>>` and fd-prefixed forms like `2>`.
    Write,
    /// `<`.
    Read,
}

/// An I/O redirection with a file target, discovered anywhere in the tree.
///
/// fd duplications (`2>&1`, `>&-`), heredocs, and herestrings carry no
/// file path and produce no `Redirect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// The target path, quotes resolved.
    pub path: String,
    pub op: RedirectOp,
}

/// The fully flattened result of parsing one command string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Every program invocation, in source order (substitution commands
    /// are emitted before the invocation whose word contains them).
    pub invocations: Vec<CommandInvocation>,
    /// Every file redirection attached to any statement.
    pub redirects: Vec<Redirect>,
    /// True when the input contained at least one standalone assignment
    /// statement (`FOO=bar` with no command word).
    pub bare_assignment: bool,
}

/// Why a command string could not be parsed.
///
/// The driver maps every variant to an `Ask` verdict; parse failure is
/// never grounds to allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unterminated quote")]
    UnterminatedQuote,
    #[error("unterminated substitution")]
    UnterminatedSubstitution,
    #[error("unexpected token `{0}`")]
    UnexpectedToken(String),
    #[error("unexpected end of input (expected `{0}`)")]
    UnexpectedEof(&'static str),
    #[error("redirection without a target")]
    MissingRedirectTarget,
    #[error("command nesting too deep")]
    TooDeep,
}

/// One piece of a shell word. Adjacent parts concatenate into the word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordPart {
    /// Literal text; quoting already resolved.
    Literal(String),
    /// `$NAME` or `${...}`, kept as written — expansion outcomes are not
    /// evaluated, only the syntax is.
    Param(String),
    /// The inner command text of `$(...)` or backticks.
    CommandSub(String),
    /// The inner command of `<(...)` / `>(...)`; the char is the sigil.
    ProcessSub(char, String),
    /// `$((...))`, kept as written.
    Arith(String),
}

/// A shell word: a run of parts with no intervening whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Word {
    pub parts: Vec<WordPart>,
}

impl Word {
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Flatten to a plain string for matching. Dynamic parts keep their
    /// source syntax (`$HOME`, `$(cmd)`), so downstream heuristics see
    /// what the user typed rather than a guessed runtime value.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                WordPart::Literal(s) | WordPart::Param(s) | WordPart::Arith(s) => {
                    out.push_str(s);
                }
                WordPart::CommandSub(inner) => {
                    out.push_str("$(");
                    out.push_str(inner);
                    out.push(')');
                }
                WordPart::ProcessSub(sigil, inner) => {
                    out.push(*sigil);
                    out.push('(');
                    out.push_str(inner);
                    out.push(')');
                }
            }
        }
        out
    }

    /// Inner command strings of every substitution in this word.
    pub fn substitutions(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                WordPart::CommandSub(inner) | WordPart::ProcessSub(_, inner) => {
                    Some(inner.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// Split into `(name, value)` when the word is a `NAME=value`
    /// assignment (valid identifier before the first `=`).
    pub fn as_assignment(&self) -> Option<(String, String)> {
        let text = self.text();
        let eq = text.find('=')?;
        let name = &text[..eq];
        if name.is_empty() {
            return None;
        }
        let mut chars = name.chars();
        let first = chars.next()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        // The name must come from literal text, not an expansion.
        match self.parts.first() {
            Some(WordPart::Literal(lit)) if lit.starts_with(name) => {}
            _ => return None,
        }
        Some((name.to_string(), text[eq + 1..].to_string()))
    }
}
