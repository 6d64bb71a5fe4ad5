use crate::env::Environment;
use crate::error::Result;
use crate::stages::Stages;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Input of one invocation of a command body, as produced by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A raw argument.
    Word(String),
    /// Lines of text: piped input or a file's contents.
    Lines(Vec<String>),
    /// A file's lines together with the name it was read from.
    File { name: String, lines: Vec<String> },
    /// Several items handed to the body at once.
    Group(Vec<Item>),
    Pair(Box<Item>, Box<Item>),
}

impl Item {
    /// Text of every word in a group, or of a single word.
    ///
    /// Lines are included one per entry, so a group mixing both still reads sensibly.
    pub fn into_words(self) -> Vec<String> {
        match self {
            Item::Word(w) => vec![w],
            Item::Lines(lines) | Item::File { lines, .. } => lines,
            Item::Group(items) => items.into_iter().flat_map(Item::into_words).collect(),
            Item::Pair(a, b) => {
                let mut words = a.into_words();
                words.extend(b.into_words());
                words
            }
        }
    }
}

/// What a command body returns for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Line(String),
    Lines(Vec<String>),
}

impl Output {
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Output::Line(line) => vec![line],
            Output::Lines(lines) => lines,
        }
    }
}

/// Object-safe per-item execution of a command whose flags are already parsed.
pub trait CommandBody {
    /// Runs the command over one item.
    fn exec(&self, item: Item, env: &mut Environment) -> Result<Output>;
}

/// Result of parsing a command's raw arguments.
pub enum Invocation {
    /// Flags were recognized; `parameters` are the remaining positional arguments.
    Run {
        parameters: Vec<String>,
        body: Box<dyn CommandBody>,
    },
    /// The user asked for `--help`.
    Help(String),
}

/// Parses raw arguments for the command `name`.
pub type ParseFn = fn(name: &str, args: &[&str]) -> Result<Invocation>;

/// Static declaration of a command: its stage choices and how to obtain its body.
///
/// Descriptors are plain data. [`Registry`](crate::executor::Registry) stores
/// them and the executor runs any of them the same way.
#[derive(Clone, Copy)]
pub struct Descriptor {
    pub name: &'static str,
    pub stages: Stages,
    pub parse: ParseFn,
}

impl std::fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.name)
            .field("stages", &self.stages)
            .finish_non_exhaustive()
    }
}
