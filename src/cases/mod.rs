//! The case aggregate and its nested entities.

pub mod family;
pub mod types;

pub use family::FamilyKey;
pub use types::{
    AidAmount, Case, CaseId, Document, DocumentType, FamilyPhoneNumber, FamilyWorker,
    HelpReason, HistoryEntry, NewCase, Note, Payment, PaymentStatus, Poll, Purpose, Region,
    Status,
};
