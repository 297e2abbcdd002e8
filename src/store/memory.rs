//! In-memory store. The reference implementation of store-side side
//! effects (history append, payment upsert) and the test double for
//! everything built on [`CaseStore`](super::CaseStore).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::cases::{
    Case, CaseId, Document, DocumentType, HistoryEntry, NewCase, Note, Payment, Poll, Status,
};
use crate::session::{ActivityPeriod, NewUser, User, UserActivity, UserUpdate};

use super::{CaseListFilter, CaseStore, StatusChange, StoreError};

#[derive(Debug, Default)]
struct Inner {
    cases: Vec<Case>,
    history: HashMap<CaseId, Vec<HistoryEntry>>,
    users: Vec<User>,
    next_case_id: u64,
    next_user_id: u64,
}

#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_case_id: 1,
                next_user_id: 1,
                ..Inner::default()
            }),
        }
    }

    /// Seeds the store with an existing collection, e.g. a test fixture.
    pub fn with_cases(cases: Vec<Case>) -> Self {
        let next_case_id = cases.iter().map(|c| c.id.0).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(Inner {
                cases,
                next_case_id,
                next_user_id: 1,
                ..Inner::default()
            }),
        }
    }
}

impl Inner {
    fn case_mut(&mut self, id: CaseId) -> Result<&mut Case, StoreError> {
        self.cases
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("case {id}")))
    }

    fn case(&self, id: CaseId) -> Result<&Case, StoreError> {
        self.cases
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("case {id}")))
    }
}

#[async_trait]
impl CaseStore for MemoryStore {
    async fn list_cases(&self, filter: &CaseListFilter) -> Result<Vec<Case>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .cases
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn get_case(&self, id: CaseId) -> Result<Case, StoreError> {
        let inner = self.inner.lock().await;
        inner.case(id).cloned()
    }

    async fn create_case(&self, fields: NewCase) -> Result<Case, StoreError> {
        if fields.full_name.trim().is_empty() {
            return Err(StoreError::Validation("full_name is required".to_string()));
        }
        if fields.phone_number.trim().is_empty() {
            return Err(StoreError::Validation(
                "phone_number is required".to_string(),
            ));
        }
        let mut inner = self.inner.lock().await;
        let id = CaseId(inner.next_case_id);
        inner.next_case_id += 1;
        let case = Case {
            id,
            full_name: fields.full_name,
            phone_number: fields.phone_number,
            region: fields.region,
            detailed_address: fields.detailed_address,
            purpose: fields.purpose,
            description: fields.description,
            created_at: Utc::now(),
            status: fields.status.unwrap_or(Status::NewMessage),
            approved_amount: None,
            polls: Vec::new(),
            payment: None,
            aid_amounts: Vec::new(),
            documents: Vec::new(),
            notes: Vec::new(),
        };
        inner.cases.push(case.clone());
        Ok(case)
    }

    async fn update_case_status(
        &self,
        id: CaseId,
        change: StatusChange,
    ) -> Result<Case, StoreError> {
        let mut inner = self.inner.lock().await;
        let entry = {
            let case = inner.case_mut(id)?;
            let old_status = case.status;
            case.status = change.new_status;
            if let Some(amount) = change.approved_amount {
                case.approved_amount = Some(amount);
            }
            if !change.aid_amounts.is_empty() {
                case.aid_amounts = change.aid_amounts.clone();
            }
            HistoryEntry {
                old_status,
                new_status: change.new_status,
                changed_by: change.actor.clone(),
                changed_at: Utc::now(),
            }
        };
        inner.history.entry(id).or_default().push(entry);
        inner.case(id).cloned()
    }

    async fn list_history(&self, id: CaseId) -> Result<Vec<HistoryEntry>, StoreError> {
        let inner = self.inner.lock().await;
        inner.case(id)?;
        Ok(inner.history.get(&id).cloned().unwrap_or_default())
    }

    async fn create_note(
        &self,
        id: CaseId,
        text: &str,
        author: &str,
    ) -> Result<Note, StoreError> {
        let mut inner = self.inner.lock().await;
        let note = Note {
            text: text.to_string(),
            author: author.to_string(),
            created_at: Utc::now(),
        };
        inner.case_mut(id)?.notes.push(note.clone());
        Ok(note)
    }

    async fn create_payment(&self, id: CaseId, payment: Payment) -> Result<Payment, StoreError> {
        let mut inner = self.inner.lock().await;
        // Upsert: a case carries at most one payment record.
        inner.case_mut(id)?.payment = Some(payment.clone());
        Ok(payment)
    }

    async fn list_polls(&self, filter: &CaseListFilter) -> Result<Vec<Poll>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .cases
            .iter()
            .filter(|c| filter.matches(c))
            .flat_map(|c| c.polls.iter().cloned())
            .collect())
    }

    async fn upload_document(
        &self,
        id: CaseId,
        name: &str,
        url: &str,
        document_type: DocumentType,
    ) -> Result<Document, StoreError> {
        let mut inner = self.inner.lock().await;
        let document = Document {
            name: name.to_string(),
            url: url.to_string(),
            document_type,
            uploaded_at: Utc::now(),
        };
        inner.case_mut(id)?.documents.push(document.clone());
        Ok(document)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.clone())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        if user.username.trim().is_empty() {
            return Err(StoreError::Validation("username is required".to_string()));
        }
        let mut inner = self.inner.lock().await;
        if inner.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Validation(format!(
                "username {:?} is taken",
                user.username
            )));
        }
        let id = inner.next_user_id;
        inner.next_user_id += 1;
        let user = User {
            id,
            username: user.username,
            role: user.role,
            is_online: false,
            last_seen: None,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: u64, update: UserUpdate) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().await;
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))?;
        if let Some(username) = update.username {
            user.username = username;
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, id: u64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        if inner.users.len() == before {
            return Err(StoreError::NotFound(format!("user {id}")));
        }
        Ok(())
    }

    async fn online_users(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().filter(|u| u.is_online).cloned().collect())
    }

    async fn user_activity_stats(
        &self,
        period: ActivityPeriod,
    ) -> Result<Vec<UserActivity>, StoreError> {
        let inner = self.inner.lock().await;
        let cutoff = period.cutoff(Utc::now());
        let mut stats: HashMap<&str, UserActivity> = HashMap::new();
        for entry in inner.history.values().flatten() {
            if let Some(cutoff) = cutoff {
                if entry.changed_at < cutoff {
                    continue;
                }
            }
            let activity =
                stats
                    .entry(entry.changed_by.as_str())
                    .or_insert_with(|| UserActivity {
                        username: entry.changed_by.clone(),
                        actions: 0,
                        last_action: None,
                    });
            activity.actions += 1;
            if activity.last_action.map_or(true, |t| entry.changed_at > t) {
                activity.last_action = Some(entry.changed_at);
            }
        }
        let mut out: Vec<UserActivity> = stats.into_values().collect();
        out.sort_by(|a, b| b.actions.cmp(&a.actions));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::{Purpose, Region};

    fn new_case(name: &str) -> NewCase {
        NewCase {
            full_name: name.to_string(),
            phone_number: "+992 90 000 0001".to_string(),
            region: Region::Sughd,
            detailed_address: String::new(),
            purpose: Purpose::NeedsHelp,
            description: String::new(),
            status: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_monotonic_ids_and_defaults_to_new_message() {
        let store = MemoryStore::new();
        let a = store.create_case(new_case("A")).await.unwrap();
        let b = store.create_case(new_case("B")).await.unwrap();
        assert_eq!(a.id, CaseId(1));
        assert_eq!(b.id, CaseId(2));
        assert_eq!(a.status, Status::NewMessage);
    }

    #[tokio::test]
    async fn status_change_appends_history_in_the_same_write() {
        let store = MemoryStore::new();
        let case = store.create_case(new_case("A")).await.unwrap();
        store
            .update_case_status(case.id, StatusChange::new(Status::Submitted, "op"))
            .await
            .unwrap();
        store
            .update_case_status(case.id, StatusChange::new(Status::UnderReview, "op"))
            .await
            .unwrap();

        let history = store.list_history(case.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].old_status, Status::NewMessage);
        assert_eq!(history[0].new_status, Status::Submitted);
        assert_eq!(history[1].new_status, Status::UnderReview);
        assert_eq!(history[1].changed_by, "op");
    }

    #[tokio::test]
    async fn unknown_case_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get_case(CaseId(42)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn activity_stats_count_history_per_actor() {
        let store = MemoryStore::new();
        let case = store.create_case(new_case("A")).await.unwrap();
        for target in [Status::Submitted, Status::UnderReview] {
            store
                .update_case_status(case.id, StatusChange::new(target, "rustam"))
                .await
                .unwrap();
        }
        store
            .update_case_status(case.id, StatusChange::new(Status::HelpLater, "zarina"))
            .await
            .unwrap();

        let stats = store
            .user_activity_stats(ActivityPeriod::Day)
            .await
            .unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].username, "rustam");
        assert_eq!(stats[0].actions, 2);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        let user = NewUser {
            username: "dilshod".to_string(),
            password: "secret".to_string(),
            role: "operator".to_string(),
        };
        store.create_user(user.clone()).await.unwrap();
        let err = store.create_user(user).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
