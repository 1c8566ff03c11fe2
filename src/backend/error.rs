use thiserror::Error;

/// User-facing refusals. The messages are shown verbatim in the notice window.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("Need at least two columns (Category, Value)")]
    NotEnoughColumns { found: usize },
    #[error("Render a chart first")]
    NoChart,
    #[error("Please enter some data before proceeding.")]
    NoEntryData,
}
