use thiserror::Error;

/// Errors surfaced by the threshold scheme.
///
/// Every variant is a local precondition violation reported straight back to
/// the caller; nothing is retried and no operation leaves a partial result.
#[derive(Debug, Error)]
pub enum ThresholdError {
    #[error("invalid threshold: t = {t} must satisfy 1 <= t <= n = {n}")]
    InvalidThreshold { t: usize, n: usize },

    #[error("insufficient shares: got {got}, need {need}")]
    InsufficientShares { got: usize, need: usize },

    #[error("duplicate share index {0}")]
    DuplicateShareIndex(u32),

    #[error("malformed commitment set: {got} points, expected {expected}")]
    MalformedCommitment { got: usize, expected: usize },

    #[error("degenerate mask point")]
    DegenerateMask,

    #[error("point is not on the curve")]
    InvalidPoint,

    #[error("scalar is not a canonical field element")]
    InvalidScalar,

    #[error("message is {len} bytes, at most {max} fit under the field modulus")]
    MessageTooLong { len: usize, max: usize },

    #[error("message does not fit below the field modulus")]
    MessageOutOfRange,

    #[error("malformed record: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
