//! The four pluggable steps every builtin is assembled from.
//!
//! A command picks one variant of each family; the executor runs them as
//! validate → map each argument → reduce with piped input → run body per item → collect.

mod collector;
mod mapper;
mod reducer;
mod validator;

pub use collector::Collector;
pub use mapper::Mapper;
pub use reducer::Reducer;
pub use validator::Validator;

/// A command's stage choices. Defaults to the identity of each family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stages {
    pub validator: Validator,
    pub mapper: Mapper,
    pub reducer: Reducer,
    pub collector: Collector,
}
