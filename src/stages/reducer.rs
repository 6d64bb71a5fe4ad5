use super::mapper::read_lines;
use crate::command::Item;
use crate::env::Environment;
use crate::error::Result;

/// Decides how piped input and mapped arguments combine into the items a
/// command body runs over, once per item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reducer {
    /// Piped input as one item, then each argument as another.
    #[default]
    Identity,
    /// Piped input is dropped; all arguments become a single group.
    IgnorePipedAndUnite,
    /// Arguments if there are any, otherwise the piped input.
    IgnorePipedIfArgs,
    /// Exactly one invocation with an empty group.
    CallOnce,
    /// First argument paired with the piped input when it is the only argument,
    /// otherwise with the lines of the file named by the second argument.
    SecondToFileOrPiped,
}

impl Reducer {
    /// `args` are the mapped parameters in order.
    pub fn reduce(self, piped: &[String], args: Vec<Item>, env: &Environment) -> Result<Vec<Item>> {
        let piped_item = || Item::Lines(piped.to_vec());
        Ok(match self {
            Reducer::Identity => std::iter::once(piped_item()).chain(args).collect(),
            Reducer::IgnorePipedAndUnite => vec![Item::Group(args)],
            Reducer::IgnorePipedIfArgs if args.is_empty() => vec![piped_item()],
            Reducer::IgnorePipedIfArgs => args,
            Reducer::CallOnce => vec![Item::Group(Vec::new())],
            Reducer::SecondToFileOrPiped => {
                let mut args = args.into_iter();
                let Some(first) = args.next() else {
                    // validators keep this from happening; run over nothing
                    return Ok(Vec::new());
                };
                let source = match args.next() {
                    None => piped_item(),
                    Some(Item::Word(name)) => Item::Lines(read_lines(&name, env)?),
                    Some(already_read) => already_read,
                };
                vec![Item::Pair(Box::new(first), Box::new(source))]
            }
        })
    }
}
