//! The role-gated status workflow: the transition table and the engine
//! that executes transitions against the case store.

pub mod engine;
pub mod transitions;

pub use engine::{TransitionEngine, Vote};
pub use transitions::{allowed_transitions, is_transition_allowed, Role};

use thiserror::Error;

use crate::cases::Status;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{role} may not move a case from {from} to {to}")]
    ForbiddenTransition {
        role: Role,
        from: Status,
        to: Status,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Compound write partially applied: {0}")]
    InconsistentState(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
