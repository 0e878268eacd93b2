use thiserror::Error;

/// Failure modes of the filter pipeline.
///
/// Every variant is unrecoverable for the run in progress: the recursion is
/// strictly sequential, so a corrupted step would poison every later one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// An input sequence does not match the run length.
    #[error("length mismatch for {name}: expected {expected} entries, got {actual}")]
    ShapeMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A matrix the recursion must invert has no inverse.
    #[error("{matrix} is singular at step {step}")]
    SingularMatrix { step: usize, matrix: &'static str },

    /// A tuning constant outside its valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type FilterResult<T> = Result<T, FilterError>;
