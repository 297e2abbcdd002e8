//! The case-store collaborator: the async seam between the core and the
//! backing REST store. Defined as a trait to enable testing with
//! in-memory doubles.

pub mod cached;
pub mod error;
pub mod memory;

pub use cached::CachedStore;
pub use error::StoreError;
pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::cases::{
    AidAmount, Case, CaseId, Document, DocumentType, HistoryEntry, NewCase, Note, Payment,
    Poll, Status,
};
use crate::session::{ActivityPeriod, NewUser, User, UserActivity, UserUpdate};

/// Server-side filter for list reads. Both fields unset means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CaseListFilter {
    /// Exact status match.
    pub status: Option<Status>,
    /// Any-of status match (`status__in` upstream). Empty means no bound.
    pub status_in: Vec<Status>,
}

impl CaseListFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_status_in(statuses: impl Into<Vec<Status>>) -> Self {
        Self {
            status_in: statuses.into(),
            ..Self::default()
        }
    }

    pub fn matches(&self, case: &Case) -> bool {
        let exact = self.status.map_or(true, |s| case.status == s);
        let any_of = self.status_in.is_empty() || self.status_in.contains(&case.status);
        exact && any_of
    }
}

/// One status write, carried as a single payload so the compound
/// "amount + aid entry + status" mutation hits the store atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub new_status: Status,
    pub actor: String,
    pub approved_amount: Option<f64>,
    pub aid_amounts: Vec<AidAmount>,
}

impl StatusChange {
    pub fn new(new_status: Status, actor: impl Into<String>) -> Self {
        Self {
            new_status,
            actor: actor.into(),
            approved_amount: None,
            aid_amounts: Vec::new(),
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.approved_amount = Some(amount);
        self.aid_amounts = vec![AidAmount { amount }];
        self
    }
}

/// Operations the core needs from the backing store. All fallible.
#[async_trait]
pub trait CaseStore: Send + Sync {
    async fn list_cases(&self, filter: &CaseListFilter) -> Result<Vec<Case>, StoreError>;
    async fn get_case(&self, id: CaseId) -> Result<Case, StoreError>;
    async fn create_case(&self, fields: NewCase) -> Result<Case, StoreError>;

    /// Applies one status change, appending the history entry in the same
    /// write. Returns the case as the store sees it afterwards.
    async fn update_case_status(
        &self,
        id: CaseId,
        change: StatusChange,
    ) -> Result<Case, StoreError>;

    async fn list_history(&self, id: CaseId) -> Result<Vec<HistoryEntry>, StoreError>;
    async fn create_note(
        &self,
        id: CaseId,
        text: &str,
        author: &str,
    ) -> Result<Note, StoreError>;

    /// Creates or updates the single payment record on a case.
    async fn create_payment(&self, id: CaseId, payment: Payment) -> Result<Payment, StoreError>;

    async fn list_polls(&self, filter: &CaseListFilter) -> Result<Vec<Poll>, StoreError>;
    async fn upload_document(
        &self,
        id: CaseId,
        name: &str,
        url: &str,
        document_type: DocumentType,
    ) -> Result<Document, StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn update_user(&self, id: u64, update: UserUpdate) -> Result<User, StoreError>;
    async fn delete_user(&self, id: u64) -> Result<(), StoreError>;
    async fn online_users(&self) -> Result<Vec<User>, StoreError>;
    async fn user_activity_stats(
        &self,
        period: ActivityPeriod,
    ) -> Result<Vec<UserActivity>, StoreError>;
}

#[async_trait]
impl<S: CaseStore + ?Sized> CaseStore for Arc<S> {
    async fn list_cases(&self, filter: &CaseListFilter) -> Result<Vec<Case>, StoreError> {
        (**self).list_cases(filter).await
    }

    async fn get_case(&self, id: CaseId) -> Result<Case, StoreError> {
        (**self).get_case(id).await
    }

    async fn create_case(&self, fields: NewCase) -> Result<Case, StoreError> {
        (**self).create_case(fields).await
    }

    async fn update_case_status(
        &self,
        id: CaseId,
        change: StatusChange,
    ) -> Result<Case, StoreError> {
        (**self).update_case_status(id, change).await
    }

    async fn list_history(&self, id: CaseId) -> Result<Vec<HistoryEntry>, StoreError> {
        (**self).list_history(id).await
    }

    async fn create_note(
        &self,
        id: CaseId,
        text: &str,
        author: &str,
    ) -> Result<Note, StoreError> {
        (**self).create_note(id, text, author).await
    }

    async fn create_payment(&self, id: CaseId, payment: Payment) -> Result<Payment, StoreError> {
        (**self).create_payment(id, payment).await
    }

    async fn list_polls(&self, filter: &CaseListFilter) -> Result<Vec<Poll>, StoreError> {
        (**self).list_polls(filter).await
    }

    async fn upload_document(
        &self,
        id: CaseId,
        name: &str,
        url: &str,
        document_type: DocumentType,
    ) -> Result<Document, StoreError> {
        (**self).upload_document(id, name, url, document_type).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        (**self).list_users().await
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        (**self).create_user(user).await
    }

    async fn update_user(&self, id: u64, update: UserUpdate) -> Result<User, StoreError> {
        (**self).update_user(id, update).await
    }

    async fn delete_user(&self, id: u64) -> Result<(), StoreError> {
        (**self).delete_user(id).await
    }

    async fn online_users(&self) -> Result<Vec<User>, StoreError> {
        (**self).online_users().await
    }

    async fn user_activity_stats(
        &self,
        period: ActivityPeriod,
    ) -> Result<Vec<UserActivity>, StoreError> {
        (**self).user_activity_stats(period).await
    }
}
