use crate::command::Item;
use crate::env::Environment;
use crate::error::{Result, ShellError};
use std::fs;

/// Turns each raw argument into an [`Item`]. Piped input is never mapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mapper {
    /// The argument as a plain word.
    #[default]
    Identity,
    /// The lines of the named file.
    NameToFile,
    /// The lines of the named file, together with the name.
    NameToFileAndName,
}

impl Mapper {
    pub fn apply(self, arg: &str, env: &Environment) -> Result<Item> {
        match self {
            Mapper::Identity => Ok(Item::Word(arg.to_string())),
            Mapper::NameToFile => Ok(Item::Lines(read_lines(arg, env)?)),
            Mapper::NameToFileAndName => Ok(Item::File {
                name: arg.to_string(),
                lines: read_lines(arg, env)?,
            }),
        }
    }
}

/// Reads `name` relative to the shell's working directory and splits it into
/// lines without their terminators.
pub(crate) fn read_lines(name: &str, env: &Environment) -> Result<Vec<String>> {
    let content = fs::read_to_string(env.current_dir.join(name))
        .map_err(|e| ShellError::file_access(name, e))?;
    Ok(content.lines().map(str::to_string).collect())
}
