use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::lexer::{self, Token};
use regex::Regex;
use std::sync::LazyLock;

/// `name = anything`, with optional spaces around the name.
static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[A-Za-z_][A-Za-z0-9_]*\s*=").expect("assignment pattern is valid")
});

/// One command of a pipeline: its name and raw (already expanded) arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub name: String,
    pub args: Vec<String>,
}

impl Stage {
    /// Convenience for building stages by hand, mostly in tests.
    pub fn new(name: &str, args: &[&str]) -> Self {
        Stage {
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Commands in execution order. Output of each stage is piped into the next.
pub type Pipeline = Vec<Stage>;

/// Record of a performed `name=value` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub value: String,
    /// The shell's previous value, `None` if the variable didn't exist.
    pub previous: Option<String>,
}

/// Whether `line` is a variable assignment rather than a command.
pub fn is_assignment(line: &str) -> bool {
    ASSIGNMENT.is_match(line)
}

/// Parses a command line into a pipeline.
///
/// An assignment is performed on `env` immediately and yields an empty
/// pipeline. Anything else is tokenized and split at `|`.
pub fn parse(line: &str, env: &mut Environment) -> Result<Pipeline> {
    if is_assignment(line) {
        let assignment = parse_assignment(line, env)?;
        tracing::debug!(
            name = %assignment.name,
            value = %assignment.value,
            previous = ?assignment.previous,
            "variable assigned"
        );
        return Ok(Pipeline::new());
    }
    let tokens = lexer::split_into_tokens(line, env)?;
    let pipeline = group_into_stages(tokens)?;
    tracing::trace!(stages = pipeline.len(), "parsed pipeline");
    Ok(pipeline)
}

/// Performs the assignment in `line` on `env`.
///
/// The name is everything before the first `=`, trimmed. The value is the
/// right-hand side tokenized like a command line: it must give at most one
/// token, none meaning the empty string.
pub fn parse_assignment(line: &str, env: &mut Environment) -> Result<Assignment> {
    let (name, rest) = line.split_once('=').unwrap_or((line, ""));
    let name = name.trim().to_string();

    let mut values: Vec<String> = lexer::split_into_tokens(rest, env)?
        .into_iter()
        .map(|t| t.as_str().to_string())
        .collect();
    if values.len() > 1 {
        return Err(ShellError::TooManyAssignmentValues(values));
    }
    let value = values.pop().unwrap_or_default();

    let previous = env.vars.get(&name).cloned();
    env.set_var(name.clone(), value.clone());
    Ok(Assignment {
        name,
        value,
        previous,
    })
}

/// Splits the flat token list at pipe operators. Every stage must be non-empty.
fn group_into_stages(tokens: Vec<Token>) -> Result<Pipeline> {
    if tokens.is_empty() {
        return Ok(Pipeline::new());
    }

    let mut stages = Pipeline::new();
    let mut current: Vec<String> = Vec::new();
    for token in tokens {
        match token {
            Token::PipeOp => stages.push(finish_stage(&mut current)?),
            Token::Word(word) => current.push(word),
        }
    }
    stages.push(finish_stage(&mut current)?);
    Ok(stages)
}

fn finish_stage(words: &mut Vec<String>) -> Result<Stage> {
    let mut words = std::mem::take(words).into_iter();
    let name = words.next().ok_or(ShellError::EmptyPipelineStage)?;
    Ok(Stage {
        name,
        args: words.collect(),
    })
}
