//! A tiny, embeddable command-line interpreter.
//!
//! A line goes through three steps:
//! - [`lexer`] splits it into words, honouring quotes, escapes and `$name`
//!   substitution, and marks the `|` operators.
//! - [`parser`] performs `name=value` assignments, or groups the words into
//!   pipeline stages.
//! - [`executor`] runs each stage, passing its output lines to the next one.
//!
//! Built-in commands (`echo`, `wc`, `cat`, `grep`, `pwd`, `cd`, `ls`, `exit`)
//! are assembled from the four [`stages`]; any other name is looked up on
//! `PATH` and run as a child process.
//!
//! The main entry point is [`Interpreter`].

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod executor;
mod external;
mod interpreter;
pub mod lexer;
pub mod parser;
pub mod stages;

pub use config::Config;
pub use error::{Result, ShellError};
pub use executor::{Executor, Fallback, Registry};
pub use external::{ExternalCommand, PathFallback, find_command_path};
pub use interpreter::{Interpreter, render};
