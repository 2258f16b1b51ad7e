//! Core types for SOLUZION: the contract between a problem formulation and
//! the session engine that plays it.
//!
//! A formulation supplies a [`State`] type, an [`OperatorSet`] of legal moves,
//! a [`RoleSpec`] describing who plays, and [`Metadata`]. This crate knows
//! nothing about terminals or prompting; see `sz-engine` for that.

/// Error types used throughout the crate.
pub mod error;
/// The formulation trait, metadata, and problem construction.
pub mod formulation;
/// Operators and operator sets.
pub mod operator;
/// Parameter descriptors and argument values.
pub mod param;
/// Roles and role specifications.
pub mod role;
/// The state abstraction.
pub mod state;

/// Re-export error types.
pub use error::{SzError, SzResult, TransitionError};
/// Re-export formulation types.
pub use formulation::{Formulation, Metadata, Problem, ProblemConfig};
/// Re-export operator types.
pub use operator::{Operator, OperatorName, OperatorSet};
/// Re-export parameter types.
pub use param::{
    Arg, ParamDescriptor, ParamKind, ParameterSource, int_arg, real_arg, text_arg,
};
/// Re-export role types.
pub use role::{Role, RoleId, RoleSpec};
/// Re-export the state trait.
pub use state::State;
