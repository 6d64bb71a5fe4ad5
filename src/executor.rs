use crate::builtin;
use crate::command::{Descriptor, Invocation};
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::external::PathFallback;
use crate::parser::Stage;
use std::collections::HashMap;

/// Runs names that are not registered commands.
pub trait Fallback {
    /// `Ok` holds the command's output lines; an unknown program is
    /// [`ShellError::CommandNotFound`].
    fn run(&self, name: &str, args: &[String], piped: &[String], env: &Environment) -> Result<Vec<String>>;
}

/// Commands known by name.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    commands: HashMap<&'static str, Descriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every builtin command.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        for descriptor in builtin::all() {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, descriptor: Descriptor) -> Result<()> {
        if self.commands.contains_key(descriptor.name) {
            return Err(ShellError::DuplicateCommand(descriptor.name.to_string()));
        }
        self.commands.insert(descriptor.name, descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.commands.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Runs one registered command: parse flags, validate, map each parameter,
/// reduce with the piped input, run the body once per item, collect.
///
/// The first failing step aborts the command; the body never sees an item
/// whose mapping failed.
pub fn run_descriptor(
    descriptor: &Descriptor,
    args: &[String],
    piped: &[String],
    env: &mut Environment,
) -> Result<Vec<String>> {
    let raw: Vec<&str> = args.iter().map(String::as_str).collect();
    let (parameters, body) = match (descriptor.parse)(descriptor.name, &raw)? {
        Invocation::Help(text) => return Ok(vec![text]),
        Invocation::Run { parameters, body } => (parameters, body),
    };

    let stages = descriptor.stages;
    stages
        .validator
        .validate(&parameters, piped)
        .map_err(|message| ShellError::invalid_arguments(descriptor.name, message))?;

    let mapped = parameters
        .iter()
        .map(|p| stages.mapper.apply(p, env))
        .collect::<Result<Vec<_>>>()?;
    let items = stages.reducer.reduce(piped, mapped, env)?;
    tracing::trace!(items = items.len(), "reduced");

    let mut results = Vec::with_capacity(items.len());
    for item in items {
        results.push(body.exec(item, env)?);
    }
    Ok(stages.collector.collect(results))
}

/// Dispatches commands to the registry, or to the fallback for unknown names.
pub struct Executor {
    registry: Registry,
    fallback: Option<Box<dyn Fallback>>,
}

impl Executor {
    /// Executor without a fallback: unknown names are not found.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            fallback: None,
        }
    }

    /// Builtins plus programs from `PATH`.
    pub fn with_builtins() -> Result<Self> {
        Ok(Self::new(Registry::with_builtins()?).with_fallback(PathFallback))
    }

    pub fn with_fallback(mut self, fallback: impl Fallback + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Executes a single command with the previous stage's output as `piped`.
    #[tracing::instrument(level = "debug", skip(self, args, piped, env), fields(piped = piped.len()))]
    pub fn execute(
        &self,
        name: &str,
        args: &[String],
        piped: &[String],
        env: &mut Environment,
    ) -> Result<Vec<String>> {
        if let Some(descriptor) = self.registry.get(name) {
            return run_descriptor(descriptor, args, piped, env);
        }
        match &self.fallback {
            Some(fallback) => fallback.run(name, args, piped, env),
            None => Err(ShellError::CommandNotFound(name.to_string())),
        }
    }

    /// Runs the stages left to right, feeding each one's output to the next.
    ///
    /// Stops after a stage that asked the shell to exit.
    pub fn run_pipeline(&self, pipeline: &[Stage], env: &mut Environment) -> Result<Vec<String>> {
        let mut piped = Vec::new();
        for stage in pipeline {
            piped = self.execute(&stage.name, &stage.args, &piped, env)?;
            if env.should_exit {
                tracing::debug!(command = %stage.name, "exit requested, pipeline stopped");
                break;
            }
        }
        Ok(piped)
    }
}
