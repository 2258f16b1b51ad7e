/// Alias for `Result<T, SzError>`.
pub type SzResult<T> = Result<T, SzError>;

/// Errors raised when a formulation violates its contract.
#[derive(Debug, thiserror::Error)]
pub enum SzError {
    /// The role specification contains no roles at all.
    #[error("formulation defines no roles")]
    NoRoles,

    /// More filled roles are required to start than the formulation has.
    #[error(
        "formulation requires {required} filled role(s) to start but only {available} non-observer role(s) exist"
    )]
    UnsatisfiableRoleSpec {
        /// The configured `min_players_to_start`.
        required: usize,
        /// Number of non-observer roles in the spec.
        available: usize,
    },

    /// A role's minimum player count exceeds its maximum.
    #[error("role \"{role}\" requires at least {min} player(s) but allows at most {max}")]
    InvalidRoleBounds {
        /// The role name.
        role: String,
        /// Per-role minimum.
        min: usize,
        /// Per-role maximum.
        max: usize,
    },

    /// The formulation could not build its initial problem.
    #[error("formulation setup failed: {0}")]
    Setup(String),

    /// Filesystem error while a formulation prepared its problem instance.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure reported by an operator's transition function.
///
/// The engine reports the message and leaves the history untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransitionError(pub String);

impl TransitionError {
    /// Create a transition error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Error for an argument that is missing or of the wrong kind.
    pub fn bad_argument(index: usize, expected: &str) -> Self {
        Self(format!("argument {} must be {expected}", index + 1))
    }
}
