/*!
# Evaluation Errors

Failures that can occur while resolving references against a
[`WalkedPath`](crate::path::WalkedPath). Parse-time failures live next to the
parser in [`PathParseError`](crate::path::PathParseError).

A key that simply does not satisfy a pattern is not an error: matching
returns `None` for that case.
*/
use std::error::Error;
use std::fmt;

/// Represents errors that can occur while evaluating a path element against
/// the walked path of a tree traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// A reference points further up the walked path than it reaches.
    OutOfRange {
        /// Requested ancestor depth
        depth: usize,
        /// Number of steps currently on the walked path
        len: usize,
    },
    /// A reference names a capture group its target match did not produce.
    MissingCaptureGroup {
        /// Requested capture group
        group: usize,
        /// Number of groups available on the target, including group 0
        available: usize,
    },
    /// The element carries no concrete value, e.g. a wildcard on the
    /// output side of a rule. Holds the canonical form of the element.
    NotEvaluable(String),
}

impl Error for EvaluationError {}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { depth, len } => {
                write!(
                    f,
                    "Reference depth {depth} is out of range for a walked \
                     path of length {len}"
                )
            }
            Self::MissingCaptureGroup { group, available } => {
                write!(
                    f,
                    "Capture group {group} does not exist, only {available} \
                     group(s) available"
                )
            }
            Self::NotEvaluable(element) => {
                write!(f, "Path element `{element}` cannot be evaluated")
            }
        }
    }
}
