// Aidboard Library - Case-Management Dashboard Core
// This exposes the core components for testing and integration

pub mod cases;
pub mod config;
pub mod payments;
pub mod presence;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod views;
pub mod workflow;

// Re-export key types for easy access
pub use cases::{Case, CaseId, FamilyKey, HelpReason, Purpose, Region, Status};
pub use config::{config, init_config, AidboardConfig};
pub use payments::{parse_amount, record_payment, validate_amount, PaymentDraft};
pub use presence::{PresencePoller, PresenceSnapshot};
pub use session::{ActivityPeriod, AuthSession, User};
pub use store::{CachedStore, CaseListFilter, CaseStore, MemoryStore, StatusChange, StoreError};
pub use telemetry::{create_workflow_span, generate_correlation_id, init_telemetry};
pub use views::{CaseQuery, DateRange, LedgerSummary, PaymentTab, SearchFields, ViewState};
pub use workflow::{
    allowed_transitions, is_transition_allowed, Role, TransitionEngine, Vote, WorkflowError,
};
