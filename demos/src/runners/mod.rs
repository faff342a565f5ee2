//! Search runners shared by the demo binaries.

mod search;

pub use search::{SearchOutcome, SearchRunner};
