//! TTL read cache over a [`CaseStore`]. A performance shim, not a
//! correctness requirement: every mutation invalidates the affected
//! entries before returning, so a read issued after a write never sees
//! the pre-write snapshot.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::cases::{
    Case, CaseId, Document, DocumentType, HistoryEntry, NewCase, Note, Payment, Poll,
};
use crate::session::{ActivityPeriod, NewUser, User, UserActivity, UserUpdate};

use super::{CaseListFilter, CaseStore, StatusChange, StoreError};

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_CAPACITY: u64 = 1_000;

pub struct CachedStore<S> {
    inner: S,
    lists: Cache<CaseListFilter, Arc<Vec<Case>>>,
    cases: Cache<CaseId, Arc<Case>>,
}

impl<S> CachedStore<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL, DEFAULT_CAPACITY)
    }

    pub fn with_ttl(inner: S, ttl: Duration, capacity: u64) -> Self {
        Self {
            inner,
            lists: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            cases: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drops every cached read touching the given case. List snapshots
    /// cannot be invalidated per-entry (any filter may contain the case),
    /// so they are cleared wholesale.
    async fn invalidate_case(&self, id: CaseId) {
        self.lists.invalidate_all();
        self.cases.invalidate(&id).await;
    }
}

#[async_trait]
impl<S: CaseStore> CaseStore for CachedStore<S> {
    async fn list_cases(&self, filter: &CaseListFilter) -> Result<Vec<Case>, StoreError> {
        if let Some(cached) = self.lists.get(filter).await {
            tracing::debug!(?filter, "case list served from cache");
            return Ok((*cached).clone());
        }
        let cases = self.inner.list_cases(filter).await?;
        self.lists
            .insert(filter.clone(), Arc::new(cases.clone()))
            .await;
        Ok(cases)
    }

    async fn get_case(&self, id: CaseId) -> Result<Case, StoreError> {
        if let Some(cached) = self.cases.get(&id).await {
            tracing::debug!(case = %id, "case served from cache");
            return Ok((*cached).clone());
        }
        let case = self.inner.get_case(id).await?;
        self.cases.insert(id, Arc::new(case.clone())).await;
        Ok(case)
    }

    async fn create_case(&self, fields: NewCase) -> Result<Case, StoreError> {
        let case = self.inner.create_case(fields).await?;
        self.lists.invalidate_all();
        Ok(case)
    }

    async fn update_case_status(
        &self,
        id: CaseId,
        change: StatusChange,
    ) -> Result<Case, StoreError> {
        let case = self.inner.update_case_status(id, change).await?;
        self.invalidate_case(id).await;
        Ok(case)
    }

    async fn list_history(&self, id: CaseId) -> Result<Vec<HistoryEntry>, StoreError> {
        self.inner.list_history(id).await
    }

    async fn create_note(
        &self,
        id: CaseId,
        text: &str,
        author: &str,
    ) -> Result<Note, StoreError> {
        let note = self.inner.create_note(id, text, author).await?;
        self.invalidate_case(id).await;
        Ok(note)
    }

    async fn create_payment(&self, id: CaseId, payment: Payment) -> Result<Payment, StoreError> {
        let payment = self.inner.create_payment(id, payment).await?;
        self.invalidate_case(id).await;
        Ok(payment)
    }

    async fn list_polls(&self, filter: &CaseListFilter) -> Result<Vec<Poll>, StoreError> {
        self.inner.list_polls(filter).await
    }

    async fn upload_document(
        &self,
        id: CaseId,
        name: &str,
        url: &str,
        document_type: DocumentType,
    ) -> Result<Document, StoreError> {
        let document = self
            .inner
            .upload_document(id, name, url, document_type)
            .await?;
        self.invalidate_case(id).await;
        Ok(document)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.inner.list_users().await
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        self.inner.create_user(user).await
    }

    async fn update_user(&self, id: u64, update: UserUpdate) -> Result<User, StoreError> {
        self.inner.update_user(id, update).await
    }

    async fn delete_user(&self, id: u64) -> Result<(), StoreError> {
        self.inner.delete_user(id).await
    }

    async fn online_users(&self) -> Result<Vec<User>, StoreError> {
        self.inner.online_users().await
    }

    async fn user_activity_stats(
        &self,
        period: ActivityPeriod,
    ) -> Result<Vec<UserActivity>, StoreError> {
        self.inner.user_activity_stats(period).await
    }
}
