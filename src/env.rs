use crate::command::ExitCode;
use crate::error::{Result, ShellError};
use serde::Deserialize;
use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// What `$name` expands to when `name` is neither a shell variable nor set in
/// the process environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownVariablePolicy {
    /// Expand to the empty string, like a POSIX shell.
    #[default]
    Empty,
    /// Fail the whole line with [`ShellError::UnknownVariable`].
    Error,
}

/// Mutable, user-level state of the shell: variables, working directory and
/// the exit request.
///
/// The environment contains:
/// - `vars`: variables assigned in this shell with `name=value`. They are also
///   exported to external commands.
/// - `current_dir`: the directory relative file names are resolved against.
/// - `should_exit`/`exit_code`: set by `exit`, checked by the read loop.
///
/// Process environment variables are not copied in; lookups fall back to them.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Variables assigned in the shell.
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// When set to true, indicates that an interactive loop should exit.
    pub should_exit: bool,
    /// Status the process should exit with once `should_exit` is set.
    pub exit_code: ExitCode,
    /// How to expand names that resolve nowhere.
    pub unknown_variables: UnknownVariablePolicy,
}

impl Environment {
    /// Fresh environment rooted at the process working directory.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars: HashMap::new(),
            current_dir,
            should_exit: false,
            exit_code: 0,
            unknown_variables: UnknownVariablePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnknownVariablePolicy) -> Self {
        self.unknown_variables = policy;
        self
    }

    /// Get the value of a variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Like [`get_var`](Self::get_var), with the unknown-variable policy applied.
    pub fn resolve(&self, key: &str) -> Result<String> {
        match self.get_var(key) {
            Some(value) => Ok(value),
            None => match self.unknown_variables {
                UnknownVariablePolicy::Empty => Ok(String::new()),
                UnknownVariablePolicy::Error => Err(ShellError::UnknownVariable(key.to_string())),
            },
        }
    }

    /// Set or override a variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Whether the shell itself holds `key`. The process environment never counts.
    pub fn has_var(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Ask the read loop to stop after the current line.
    pub fn request_exit(&mut self, code: ExitCode) {
        self.should_exit = true;
        self.exit_code = code;
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
