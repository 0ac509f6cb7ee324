//! Char-walking shell lexer.
//!
//! Produces a flat token stream: resolved words, control operators, and
//! redirection tokens. Quoting is resolved here; the parser above never
//! sees a quote character. Heredoc bodies are collected when the lexer
//! reaches the end of the line that introduced them, so operators on the
//! delimiter line (`cat <<'EOF' | foo`) still tokenize normally.

use super::types::{ParseError, Word, WordPart};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Token {
    Word(Word),
    And,        // &&
    Or,         // ||
    Pipe,       // |
    PipeBoth,   // |&
    Semi,       // ;
    Amp,        // &
    DblSemi,    // ;;
    SemiAmp,    // ;&
    DblSemiAmp, // ;;&
    Newline,
    LParen,
    RParen,
    Redirect(RedirectToken),
    Eof,
}

/// A lexed redirection. Only `Write`/`Read` carry a file target; the
/// other forms move data without naming a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum RedirectToken {
    Write(Word),
    Read(Word),
    Dup,
    Heredoc { quoted: bool, body: String },
    Herestring(Word),
}

struct PendingHeredoc {
    delimiter: String,
    quoted: bool,
    strip_tabs: bool,
    token_index: usize,
}

pub(super) struct Lexer {
    input: Vec<char>,
    pos: usize,
    pending_heredocs: Vec<PendingHeredoc>,
}

pub(super) fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(input).run()
}

impl Lexer {
    fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            pos: 0,
            pending_heredocs: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn skip_blank(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == ' ' || ch == '\t' {
                self.advance();
            } else if ch == '\\' && self.peek_at(1) == Some('\n') {
                // Line continuation.
                self.advance();
                self.advance();
            } else if ch == '#' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_blank();
            let Some(ch) = self.peek() else {
                self.collect_heredoc_bodies(&mut tokens);
                tokens.push(Token::Eof);
                return Ok(tokens);
            };
            match ch {
                '\n' => {
                    self.advance();
                    self.collect_heredoc_bodies(&mut tokens);
                    tokens.push(Token::Newline);
                }
                ';' => {
                    self.advance();
                    if self.peek() == Some(';') {
                        self.advance();
                        if self.peek() == Some('&') {
                            self.advance();
                            tokens.push(Token::DblSemiAmp);
                        } else {
                            tokens.push(Token::DblSemi);
                        }
                    } else if self.peek() == Some('&') {
                        self.advance();
                        tokens.push(Token::SemiAmp);
                    } else {
                        tokens.push(Token::Semi);
                    }
                }
                '|' => {
                    self.advance();
                    match self.peek() {
                        Some('|') => {
                            self.advance();
                            tokens.push(Token::Or);
                        }
                        Some('&') => {
                            self.advance();
                            tokens.push(Token::PipeBoth);
                        }
                        _ => tokens.push(Token::Pipe),
                    }
                }
                '&' => {
                    self.advance();
                    match self.peek() {
                        Some('&') => {
                            self.advance();
                            tokens.push(Token::And);
                        }
                        Some('>') => {
                            // &> file / &>> file — write redirect.
                            self.advance();
                            if self.peek() == Some('>') {
                                self.advance();
                            }
                            let target = self.redirect_target()?;
                            tokens.push(Token::Redirect(RedirectToken::Write(target)));
                        }
                        _ => tokens.push(Token::Amp),
                    }
                }
                '(' => {
                    self.advance();
                    tokens.push(Token::LParen);
                }
                ')' => {
                    self.advance();
                    tokens.push(Token::RParen);
                }
                '<' | '>' => {
                    // Process substitution is a word part, not a redirect.
                    if self.peek_at(1) == Some('(') {
                        let word = self.read_word()?;
                        tokens.push(Token::Word(word));
                    } else {
                        let tok = self.read_redirect(&mut tokens)?;
                        tokens.push(tok);
                    }
                }
                c if c.is_ascii_digit() && self.fd_prefix_len().is_some() => {
                    let skip = self.fd_prefix_len().unwrap_or(0);
                    for _ in 0..skip {
                        self.advance();
                    }
                    let tok = self.read_redirect(&mut tokens)?;
                    tokens.push(tok);
                }
                _ => {
                    let word = self.read_word()?;
                    if !word.is_empty() {
                        tokens.push(Token::Word(word));
                    }
                }
            }
        }
    }

    /// Length of a standalone fd prefix (`2` in `2>&1`) at the current
    /// position, or `None` when the digits are just the start of a word.
    fn fd_prefix_len(&self) -> Option<usize> {
        let mut n = 0;
        while let Some(c) = self.peek_at(n) {
            if c.is_ascii_digit() {
                n += 1;
            } else {
                break;
            }
        }
        if n == 0 {
            return None;
        }
        match self.peek_at(n) {
            Some('<') | Some('>') => Some(n),
            _ => None,
        }
    }

    /// Lex a redirection starting at `<` or `>` (fd prefix already
    /// consumed). Needs the token list to register heredocs for body
    /// collection at end of line.
    fn read_redirect(&mut self, tokens: &mut Vec<Token>) -> Result<Token, ParseError> {
        match self.advance() {
            Some('>') => {
                match self.peek() {
                    Some('>') => {
                        self.advance();
                        let target = self.redirect_target()?;
                        Ok(Token::Redirect(RedirectToken::Write(target)))
                    }
                    Some('|') => {
                        self.advance();
                        let target = self.redirect_target()?;
                        Ok(Token::Redirect(RedirectToken::Write(target)))
                    }
                    Some('&') => {
                        self.advance();
                        match self.peek() {
                            Some(c) if c.is_ascii_digit() => {
                                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                                    self.advance();
                                }
                                Ok(Token::Redirect(RedirectToken::Dup))
                            }
                            Some('-') => {
                                self.advance();
                                Ok(Token::Redirect(RedirectToken::Dup))
                            }
                            // `>& file` — historical both-streams write.
                            _ => {
                                let target = self.redirect_target()?;
                                Ok(Token::Redirect(RedirectToken::Write(target)))
                            }
                        }
                    }
                    _ => {
                        let target = self.redirect_target()?;
                        Ok(Token::Redirect(RedirectToken::Write(target)))
                    }
                }
            }
            Some('<') => {
                match self.peek() {
                    Some('<') => {
                        self.advance();
                        if self.peek() == Some('<') {
                            self.advance();
                            let target = self.redirect_target()?;
                            return Ok(Token::Redirect(RedirectToken::Herestring(target)));
                        }
                        let strip_tabs = if self.peek() == Some('-') {
                            self.advance();
                            true
                        } else {
                            false
                        };
                        let (delimiter, quoted) = self.read_heredoc_delimiter()?;
                        self.pending_heredocs.push(PendingHeredoc {
                            delimiter,
                            quoted,
                            strip_tabs,
                            token_index: tokens.len(),
                        });
                        Ok(Token::Redirect(RedirectToken::Heredoc {
                            quoted,
                            body: String::new(),
                        }))
                    }
                    Some('&') => {
                        self.advance();
                        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '-') {
                            self.advance();
                        }
                        Ok(Token::Redirect(RedirectToken::Dup))
                    }
                    Some('>') => {
                        // `<>` opens read-write; classify as a write.
                        self.advance();
                        let target = self.redirect_target()?;
                        Ok(Token::Redirect(RedirectToken::Write(target)))
                    }
                    _ => {
                        let target = self.redirect_target()?;
                        Ok(Token::Redirect(RedirectToken::Read(target)))
                    }
                }
            }
            _ => Err(ParseError::UnexpectedToken("redirect".into())),
        }
    }

    fn redirect_target(&mut self) -> Result<Word, ParseError> {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.advance();
        }
        let word = self.read_word()?;
        if word.is_empty() {
            return Err(ParseError::MissingRedirectTarget);
        }
        Ok(word)
    }

    fn read_heredoc_delimiter(&mut self) -> Result<(String, bool), ParseError> {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.advance();
        }
        let mut delimiter = String::new();
        let mut quoted = false;
        loop {
            match self.peek() {
                Some('\'') => {
                    quoted = true;
                    self.advance();
                    loop {
                        match self.advance() {
                            Some('\'') => break,
                            Some(c) => delimiter.push(c),
                            None => return Err(ParseError::UnterminatedQuote),
                        }
                    }
                }
                Some('"') => {
                    quoted = true;
                    self.advance();
                    loop {
                        match self.advance() {
                            Some('"') => break,
                            Some(c) => delimiter.push(c),
                            None => return Err(ParseError::UnterminatedQuote),
                        }
                    }
                }
                Some('\\') => {
                    quoted = true;
                    self.advance();
                    if let Some(c) = self.advance() {
                        delimiter.push(c);
                    }
                }
                Some(c) if !c.is_whitespace() && !is_operator_char(c) => {
                    delimiter.push(c);
                    self.advance();
                }
                _ => break,
            }
        }
        if delimiter.is_empty() {
            return Err(ParseError::MissingRedirectTarget);
        }
        Ok((delimiter, quoted))
    }

    /// Consume heredoc bodies queued on the line that just ended and patch
    /// the corresponding tokens. A missing closing delimiter swallows the
    /// rest of the input as the body.
    fn collect_heredoc_bodies(&mut self, tokens: &mut [Token]) {
        for pending in std::mem::take(&mut self.pending_heredocs) {
            let mut body = String::new();
            loop {
                if self.pos >= self.input.len() {
                    break;
                }
                let mut line = String::new();
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    line.push(c);
                    self.advance();
                }
                let had_newline = self.peek() == Some('\n');
                if had_newline {
                    self.advance();
                }
                let check = if pending.strip_tabs {
                    line.trim_start_matches('\t')
                } else {
                    line.as_str()
                };
                if check == pending.delimiter {
                    break;
                }
                body.push_str(&line);
                body.push('\n');
                if !had_newline {
                    break;
                }
            }
            if let Some(Token::Redirect(RedirectToken::Heredoc {
                body: slot, ..
            })) = tokens.get_mut(pending.token_index)
            {
                *slot = body;
            }
        }
    }

    /// Read one word: parts concatenated until unquoted whitespace or an
    /// operator character.
    fn read_word(&mut self) -> Result<Word, ParseError> {
        let mut parts: Vec<WordPart> = Vec::new();
        let mut lit = String::new();

        macro_rules! flush {
            () => {
                if !lit.is_empty() {
                    parts.push(WordPart::Literal(std::mem::take(&mut lit)));
                }
            };
        }

        loop {
            let Some(ch) = self.peek() else { break };
            match ch {
                ' ' | '\t' | '\n' => break,
                ';' | '&' | '|' | '(' | ')' => break,
                '<' | '>' => {
                    if self.peek_at(1) == Some('(') {
                        flush!();
                        self.advance();
                        self.advance();
                        let inner = self.read_balanced_parens()?;
                        parts.push(WordPart::ProcessSub(ch, inner));
                    } else {
                        break;
                    }
                }
                '\\' => {
                    self.advance();
                    match self.advance() {
                        Some('\n') => {} // continuation
                        Some(c) => lit.push(c),
                        None => {}
                    }
                }
                '\'' => {
                    self.advance();
                    loop {
                        match self.advance() {
                            Some('\'') => break,
                            Some(c) => lit.push(c),
                            None => return Err(ParseError::UnterminatedQuote),
                        }
                    }
                }
                '"' => {
                    self.advance();
                    self.read_double_quoted(&mut parts, &mut lit)?;
                }
                '`' => {
                    flush!();
                    self.advance();
                    let inner = self.read_backtick()?;
                    parts.push(WordPart::CommandSub(inner));
                }
                '$' => {
                    self.read_dollar(&mut parts, &mut lit)?;
                }
                _ => {
                    lit.push(ch);
                    self.advance();
                }
            }
        }
        if !lit.is_empty() {
            parts.push(WordPart::Literal(lit));
        }
        Ok(Word { parts })
    }

    /// Body of a `"..."` span: `$`-forms and backticks stay live,
    /// backslash only escapes `"` `\` `$` `` ` `` and newline.
    fn read_double_quoted(
        &mut self,
        parts: &mut Vec<WordPart>,
        lit: &mut String,
    ) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                None => return Err(ParseError::UnterminatedQuote),
                Some('"') => {
                    self.advance();
                    return Ok(());
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some(c @ ('"' | '\\' | '$' | '`')) => lit.push(c),
                        Some('\n') => {}
                        Some(c) => {
                            lit.push('\\');
                            lit.push(c);
                        }
                        None => return Err(ParseError::UnterminatedQuote),
                    }
                }
                Some('`') => {
                    if !lit.is_empty() {
                        parts.push(WordPart::Literal(std::mem::take(lit)));
                    }
                    self.advance();
                    let inner = self.read_backtick()?;
                    parts.push(WordPart::CommandSub(inner));
                }
                Some('$') => {
                    self.read_dollar(parts, lit)?;
                }
                Some(c) => {
                    lit.push(c);
                    self.advance();
                }
            }
        }
    }

    /// Handle a `$` at the current position: `$((…))`, `$(…)`, `${…}`,
    /// `$NAME`, or a literal dollar sign.
    fn read_dollar(
        &mut self,
        parts: &mut Vec<WordPart>,
        lit: &mut String,
    ) -> Result<(), ParseError> {
        debug_assert_eq!(self.peek(), Some('$'));
        match self.peek_at(1) {
            Some('(') => {
                if !lit.is_empty() {
                    parts.push(WordPart::Literal(std::mem::take(lit)));
                }
                self.advance(); // $
                self.advance(); // (
                if self.peek() == Some('(') {
                    self.advance();
                    let inner = self.read_arith()?;
                    parts.push(WordPart::Arith(format!("$(({inner}))")));
                } else {
                    let inner = self.read_balanced_parens()?;
                    parts.push(WordPart::CommandSub(inner));
                }
            }
            Some('{') => {
                if !lit.is_empty() {
                    parts.push(WordPart::Literal(std::mem::take(lit)));
                }
                self.advance();
                self.advance();
                let mut depth = 1u32;
                let mut inner = String::new();
                loop {
                    match self.advance() {
                        Some('{') => {
                            depth += 1;
                            inner.push('{');
                        }
                        Some('}') => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                            inner.push('}');
                        }
                        Some(c) => inner.push(c),
                        None => return Err(ParseError::UnterminatedSubstitution),
                    }
                }
                parts.push(WordPart::Param(format!("${{{inner}}}")));
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                if !lit.is_empty() {
                    parts.push(WordPart::Literal(std::mem::take(lit)));
                }
                self.advance();
                let mut name = String::new();
                while let Some(c) = self.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
                parts.push(WordPart::Param(format!("${name}")));
            }
            Some(c) if c.is_ascii_digit() || "@*#?$!-".contains(c) => {
                if !lit.is_empty() {
                    parts.push(WordPart::Literal(std::mem::take(lit)));
                }
                self.advance();
                self.advance();
                parts.push(WordPart::Param(format!("${c}")));
            }
            _ => {
                lit.push('$');
                self.advance();
            }
        }
        Ok(())
    }

    /// Read up to the `)` balancing an already-consumed `(`, honoring
    /// quotes and escapes inside.
    fn read_balanced_parens(&mut self) -> Result<String, ParseError> {
        let mut depth = 1u32;
        let mut inner = String::new();
        let (mut sq, mut dq) = (false, false);
        loop {
            let Some(c) = self.advance() else {
                return Err(ParseError::UnterminatedSubstitution);
            };
            match c {
                '\\' if !sq => {
                    inner.push(c);
                    if let Some(next) = self.advance() {
                        inner.push(next);
                    }
                    continue;
                }
                '\'' if !dq => sq = !sq,
                '"' if !sq => dq = !dq,
                '(' if !sq && !dq => depth += 1,
                ')' if !sq && !dq => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(inner.trim().to_string());
                    }
                }
                _ => {}
            }
            inner.push(c);
        }
    }

    /// Read up to the `))` closing an arithmetic expansion.
    fn read_arith(&mut self) -> Result<String, ParseError> {
        let mut depth = 2u32;
        let mut inner = String::new();
        loop {
            let Some(c) = self.advance() else {
                return Err(ParseError::UnterminatedSubstitution);
            };
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        // Trim the first `)` that made it into inner.
                        if inner.ends_with(')') {
                            inner.pop();
                        }
                        return Ok(inner);
                    }
                }
                _ => {}
            }
            inner.push(c);
        }
    }

    fn read_backtick(&mut self) -> Result<String, ParseError> {
        let mut inner = String::new();
        loop {
            match self.advance() {
                Some('`') => return Ok(inner.trim().to_string()),
                Some('\\') => {
                    // Inside backticks, backslash escapes `$`, `` ` ``, `\`.
                    match self.advance() {
                        Some(c @ ('$' | '`' | '\\')) => inner.push(c),
                        Some(c) => {
                            inner.push('\\');
                            inner.push(c);
                        }
                        None => return Err(ParseError::UnterminatedSubstitution),
                    }
                }
                Some(c) => inner.push(c),
                None => return Err(ParseError::UnterminatedSubstitution),
            }
        }
    }
}

fn is_operator_char(c: char) -> bool {
    matches!(c, ';' | '&' | '|' | '(' | ')' | '<' | '>')
}
