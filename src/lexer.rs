//! A module implementing lexical analysis (tokenization) for the shell's command lines.
//!
//! Quoting, escaping and `$name` interpolation are all resolved here, so the
//! tokens handed to the parser are final argument strings plus pipe markers.

use crate::env::Environment;
use crate::error::{Result, ShellError};

/// Represents a token resulting from lexical analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A fully expanded word with quotes and escapes removed.
    Word(String),
    /// The pipe operator, `|`, outside of quotes and unescaped.
    PipeOp,
}

impl Token {
    /// The token's text; `"|"` for the pipe operator.
    pub fn as_str(&self) -> &str {
        match self {
            Token::Word(w) => w,
            Token::PipeOp => "|",
        }
    }
}

/// Quoting context of the scanner. Each mode has its own set of special characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    /// Inside `"..."`: variables expand, spaces and pipes are text.
    WeakQuotes,
    /// Inside `'...'`: everything but `'` and `\` is text.
    FullQuotes,
}

impl Mode {
    fn is_special(self, ch: char) -> bool {
        match self {
            Mode::Normal => matches!(ch, '"' | '\'' | '$' | '\\' | '|' | ' '),
            Mode::WeakQuotes => matches!(ch, '"' | '$' | '\\'),
            Mode::FullQuotes => matches!(ch, '\'' | '\\'),
        }
    }

    /// `self` flips between `a` and `b`; any other mode is left as is.
    fn toggle(self, a: Mode, b: Mode) -> Mode {
        if self == a {
            b
        } else if self == b {
            a
        } else {
            self
        }
    }
}

struct LexingFSM<'a> {
    input: Vec<char>,
    pos: usize,
    mode: Mode,
    escaped: bool,
    buffer: String,
    env: &'a Environment,
}

impl<'a> LexingFSM<'a> {
    /// Creates a new instance of the lexical analysis Finite State Machine.
    ///
    /// # Arguments
    /// * `line` - The input string to be lexed.
    /// * `env` - Variables used for `$name` interpolation.
    fn new(line: &str, env: &'a Environment) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
            mode: Mode::Normal,
            escaped: false,
            buffer: String::new(),
            env,
        }
    }

    /// Performs lexical analysis on the input string and returns a vector of tokens.
    ///
    /// # Returns
    /// A vector of tokens on success, or [`ShellError::QuoteMismatch`] if a quote
    /// is left open, or [`ShellError::UnknownVariable`] under the strict policy.
    fn make_tokens(&mut self) -> Result<Vec<Token>> {
        let mut out = Vec::new();

        while let Some(ch) = self.read_char() {
            if self.escaped {
                self.escaped = false;
                self.buffer.push(ch);
                continue;
            }
            if !self.mode.is_special(ch) {
                self.buffer.push(ch);
                continue;
            }
            match ch {
                '\\' => self.escaped = true,
                ' ' => self.flush(&mut out),
                '\'' => self.mode = self.mode.toggle(Mode::FullQuotes, Mode::Normal),
                '"' => self.mode = self.mode.toggle(Mode::WeakQuotes, Mode::Normal),
                '|' => {
                    self.flush(&mut out);
                    out.push(Token::PipeOp);
                }
                '$' => self.handle_variable()?,
                _ => unreachable!("{ch:?} is not special in {:?}", self.mode),
            }
        }

        if self.mode != Mode::Normal {
            return Err(ShellError::QuoteMismatch);
        }

        self.flush(&mut out);
        Ok(out)
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    /// Push the buffer as a word unless it is empty.
    fn flush(&mut self, out: &mut Vec<Token>) {
        if !self.buffer.is_empty() {
            out.push(Token::Word(std::mem::take(&mut self.buffer)));
        }
    }

    /// Consume the name following `$` and append its value.
    ///
    /// The value is inserted verbatim: quotes or `$` inside it are not rescanned.
    /// A `$` that isn't followed by a name expands to nothing.
    fn handle_variable(&mut self) -> Result<()> {
        let name = self.read_variable_name();
        if name.is_empty() {
            return Ok(());
        }
        let value = self.env.resolve(&name)?;
        self.buffer.push_str(&value);
        Ok(())
    }

    /// Reads the longest `[A-Za-z_][A-Za-z0-9_]*` prefix at the cursor.
    fn read_variable_name(&mut self) -> String {
        let mut name = String::new();
        if let Some(c) = self.peek_char() {
            if !(c.is_ascii_alphabetic() || c == '_') {
                return name;
            }
        }
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        name
    }
}

/// The main entry point function to perform lexical analysis.
///
/// Creates and runs the finite state machine to tokenize the input line,
/// expanding variables from `env` along the way.
pub fn split_into_tokens(line: &str, env: &Environment) -> Result<Vec<Token>> {
    let mut lexer = LexingFSM::new(line, env);
    lexer.make_tokens()
}
