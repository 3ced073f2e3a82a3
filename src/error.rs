use thiserror::Error;

/// Everything that can stop an evaluation from producing gradients.
///
/// Shape problems are configuration errors in the supplied parameters; the
/// evaluator reports them and never broadcasts around them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("shape mismatch in {context}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        context: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("invalid fixture: {0}")]
    InvalidFixture(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn shape(
        context: impl Into<String>,
        expected: (usize, usize),
        found: (usize, usize),
    ) -> Error {
        Error::ShapeMismatch {
            context: context.into(),
            expected,
            found,
        }
    }
}
