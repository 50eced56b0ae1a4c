use std::fmt;

/// An error produced by the node/edge infrastructure or by any layer built
/// on top of it (BDD, ZDD, NPN canonicalisation).
///
/// Every variant is recoverable: raising one never leaves the manager that
/// raised it in an inconsistent state (spec.md §7). Memory exhaustion during
/// node creation is the one fatal condition and is not represented here —
/// it aborts the process the way an allocation failure normally does in
/// Rust.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DdError {
    /// An index, variable id, or level fell outside its valid range.
    OutOfRange {
        what: &'static str,
        value: usize,
        bound: usize,
    },
    /// A handle (`Bdd`, `Zdd`, `BddVar`, ...) was passed to an operation on
    /// a manager that did not create it.
    ManagerMismatch { op: &'static str },
    /// An operand did not satisfy a shape precondition, e.g. `cofactor`
    /// received a non-cube, or `to_varlist` was applied to a BDD that is
    /// not a positive cube.
    ShapePrecondition { op: &'static str, detail: String },
    /// A truth-table string had the wrong length or contained characters
    /// other than `0`/`1`.
    InvalidTruthString { expected_len: usize, actual_len: usize },
    /// Deserialisation hit a bad signature or an unexpected end of stream.
    Deserialization { detail: String },
    /// An edge or handle no longer refers to a live node.
    InvalidHandle,
}

impl fmt::Display for DdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DdError::OutOfRange { what, value, bound } => {
                write!(f, "{what} {value} is out of range (bound {bound})")
            }
            DdError::ManagerMismatch { op } => {
                write!(f, "{op}: operand belongs to a different manager")
            }
            DdError::ShapePrecondition { op, detail } => {
                write!(f, "{op}: {detail}")
            }
            DdError::InvalidTruthString { expected_len, actual_len } => {
                write!(
                    f,
                    "truth-table string has length {actual_len}, expected {expected_len}"
                )
            }
            DdError::Deserialization { detail } => write!(f, "deserialization failed: {detail}"),
            DdError::InvalidHandle => write!(f, "handle does not refer to a live node"),
        }
    }
}

impl std::error::Error for DdError {}

pub type DdResult<T> = Result<T, DdError>;
