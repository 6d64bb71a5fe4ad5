use std::io;
use thiserror::Error;

/// Result type used across the shell core.
pub type Result<T, E = ShellError> = std::result::Result<T, E>;

/// Everything that can go wrong between reading a line and printing its output.
///
/// The read loop reports these to the user and keeps going; none of them
/// terminates the shell.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A quote was opened and never closed.
    #[error("quotes mismatch")]
    QuoteMismatch,

    /// The right-hand side of `name=value` produced more than one token.
    #[error("too many values for variable assignment: {}", .0.join(", "))]
    TooManyAssignmentValues(Vec<String>),

    /// A `|` at the start, at the end or next to another `|`.
    #[error("pipe locations create an empty command")]
    EmptyPipelineStage,

    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// Rejected by flag parsing or by the command's validator.
    #[error("{command}: {message}")]
    InvalidArguments { command: String, message: String },

    #[error("{0}: command not found")]
    CommandNotFound(String),

    /// The command ran (or tried to) and failed.
    #[error("{command}: {reason}")]
    CommandExecution { command: String, reason: String },

    /// A file named by an argument could not be read.
    #[error("{path}: {source}")]
    FileAccess {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("command {0} is already registered")]
    DuplicateCommand(String),
}

impl ShellError {
    pub(crate) fn invalid_arguments(command: &str, message: impl Into<String>) -> Self {
        ShellError::InvalidArguments {
            command: command.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn execution(command: &str, reason: impl ToString) -> Self {
        ShellError::CommandExecution {
            command: command.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn file_access(path: &str, source: io::Error) -> Self {
        ShellError::FileAccess {
            path: path.to_string(),
            source,
        }
    }
}
