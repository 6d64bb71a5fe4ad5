use crate::command::Output;

/// Folds the per-item results of a command into the stage's lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Collector {
    /// One line per result. A multi-line result is joined with `\n`.
    #[default]
    Identity,
    /// All lines of all results, flattened one level.
    ConcatLists,
}

impl Collector {
    pub fn collect(self, results: Vec<Output>) -> Vec<String> {
        match self {
            Collector::Identity => results
                .into_iter()
                .map(|r| match r {
                    Output::Line(line) => line,
                    Output::Lines(lines) => lines.join("\n"),
                })
                .collect(),
            Collector::ConcatLists => results.into_iter().flat_map(Output::into_lines).collect(),
        }
    }
}
