use crate::command::ExitCode;
use crate::config::Config;
use crate::env::Environment;
use crate::error::Result;
use crate::executor::Executor;
use crate::parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::Path;

/// A minimal shell: reads a line, runs it as a pipeline, prints the result.
///
/// The interpreter owns the [`Environment`] (variables, working directory,
/// exit request) and an [`Executor`] holding the registered commands.
///
/// Example
/// ```
/// use mini_shell::Interpreter;
/// let mut sh = Interpreter::new().unwrap();
/// sh.run_line("greeting=hello").unwrap();
/// let out = sh.run_line("echo $greeting world | wc").unwrap();
/// assert_eq!(out, vec!["1 2 12\n"]);
/// ```
pub struct Interpreter {
    env: Environment,
    executor: Executor,
}

impl Interpreter {
    /// Builtins, `PATH` fallback and a fresh environment.
    pub fn new() -> Result<Self> {
        Ok(Self::from_parts(Environment::new(), Executor::with_builtins()?))
    }

    pub fn with_config(config: &Config) -> Result<Self> {
        let env = Environment::new().with_policy(config.shell.unknown_variables);
        Ok(Self::from_parts(env, Executor::with_builtins()?))
    }

    pub fn from_parts(env: Environment, executor: Executor) -> Self {
        Self { env, executor }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Run a single command by name with arguments and no piped input.
    pub fn run(&mut self, name: &str, args: &[&str]) -> Result<Vec<String>> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.executor.execute(name, &args, &[], &mut self.env)
    }

    /// Parse and execute one command line.
    ///
    /// Assignments and blank lines produce no output.
    pub fn run_line(&mut self, line: &str) -> Result<Vec<String>> {
        let pipeline = parser::parse(line, &mut self.env)?;
        self.executor.run_pipeline(&pipeline, &mut self.env)
    }

    /// Runs `line` and prints its output to stdout, or the error to stderr.
    ///
    /// Returns whether the line succeeded.
    pub fn eval_print(&mut self, line: &str) -> bool {
        match self.run_line(line) {
            Ok(output) => {
                if let Some(text) = render(&output) {
                    println!("{text}");
                }
                true
            }
            Err(err) => {
                tracing::debug!(error = ?err, line, "line failed");
                eprintln!("error: {err}");
                false
            }
        }
    }

    /// Interactive read loop.
    ///
    /// Ends on end of input or after `exit`, returning the status the process
    /// should exit with. Ctrl-C discards the current line.
    pub fn repl(&mut self, config: &Config) -> anyhow::Result<ExitCode> {
        let mut rl = DefaultEditor::new()?;
        let history = config.history_path();
        if let Some(path) = &history {
            if let Err(err) = rl.load_history(path) {
                tracing::debug!(path = %path.display(), error = %err, "no history loaded");
            }
        }

        loop {
            match rl.readline(&config.shell.prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if let Err(err) = rl.add_history_entry(line.as_str()) {
                        tracing::warn!(error = %err, "can't record history entry");
                    }
                    self.eval_print(&line);
                    if self.env.should_exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    save_history(&mut rl, history.as_deref());
                    return Err(err.into());
                }
            }
        }

        save_history(&mut rl, history.as_deref());
        Ok(self.env.exit_code)
    }
}

fn save_history(rl: &mut DefaultEditor, path: Option<&Path>) {
    let Some(path) = path else { return };
    if let Some(parent) = path.parent() {
        if let Err(err) = std::fs::create_dir_all(parent) {
            tracing::warn!(dir = %parent.display(), error = %err, "can't create history directory");
            return;
        }
    }
    if let Err(err) = rl.save_history(path) {
        tracing::warn!(path = %path.display(), error = %err, "can't save history");
    }
}

/// Text to print for a pipeline's output: entries joined with newlines,
/// trailing newlines removed. `None` when there is nothing to print.
pub fn render(output: &[String]) -> Option<String> {
    if output.is_empty() {
        return None;
    }
    Some(output.join("\n").trim_end_matches('\n').to_string())
}
