//! End-to-end tests for the status transition engine running against the
//! in-memory store.

use async_trait::async_trait;

use aidboard::cases::{
    Case, CaseId, Document, DocumentType, HistoryEntry, NewCase, Note, Payment, Poll, Purpose,
    Region, Status,
};
use aidboard::session::{ActivityPeriod, AuthSession, NewUser, User, UserActivity, UserUpdate};
use aidboard::store::{CaseListFilter, CaseStore, MemoryStore, StatusChange, StoreError};
use aidboard::workflow::{TransitionEngine, Vote, WorkflowError};

fn session(username: &str, role: &str) -> AuthSession {
    AuthSession::open(User {
        id: 1,
        username: username.to_string(),
        role: role.to_string(),
        is_online: true,
        last_seen: None,
    })
}

fn new_case(name: &str, status: Status) -> NewCase {
    NewCase {
        full_name: name.to_string(),
        phone_number: "+992 90 111 2233".to_string(),
        region: Region::Khatlon,
        detailed_address: "Bokhtar".to_string(),
        purpose: Purpose::NeedsHelp,
        description: "needs help with treatment".to_string(),
        status: Some(status),
    }
}

async fn seed(store: &MemoryStore, status: Status) -> Case {
    store.create_case(new_case("Ali Karimov", status)).await.unwrap()
}

#[tokio::test]
async fn compound_transition_writes_amount_aid_entry_and_history_together() {
    let store = MemoryStore::new();
    let case = seed(&store, Status::UnderReview).await;
    let engine = TransitionEngine::new(store);
    let reviewer = session("zarina", "reviewer");

    let updated = engine
        .transition(&reviewer, case.id, Status::ToAccountant, Some(150.50))
        .await
        .unwrap();

    assert_eq!(updated.status, Status::ToAccountant);
    assert_eq!(updated.approved_amount, Some(150.50));
    assert_eq!(updated.approved_aid(), Some(150.50));

    let history = engine.store().list_history(case.id).await.unwrap();
    let last = history.last().unwrap();
    assert_eq!(last.old_status, Status::UnderReview);
    assert_eq!(last.new_status, Status::ToAccountant);
    assert_eq!(last.changed_by, "zarina");
}

#[tokio::test]
async fn non_positive_amounts_abort_before_anything_is_written() {
    let store = MemoryStore::new();
    let case = seed(&store, Status::UnderReview).await;
    let engine = TransitionEngine::new(store);
    let reviewer = session("zarina", "reviewer");

    for amount in [Some(0.0), Some(-5.0), None] {
        let err = engine
            .transition(&reviewer, case.id, Status::ToAccountant, amount)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidAmount(_)), "{amount:?}");
    }

    let after = engine.store().get_case(case.id).await.unwrap();
    assert_eq!(after.status, Status::UnderReview);
    assert_eq!(after.approved_amount, None);
    assert!(engine.store().list_history(case.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn free_text_amount_is_rejected_as_invalid() {
    let store = MemoryStore::new();
    let case = seed(&store, Status::UnderReview).await;
    let engine = TransitionEngine::new(store);
    let reviewer = session("zarina", "reviewer");

    let err = engine
        .transition_with_raw_amount(&reviewer, case.id, Status::ToAccountant, "abc")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidAmount(_)));

    let after = engine.store().get_case(case.id).await.unwrap();
    assert_eq!(after.status, Status::UnderReview);
}

#[tokio::test]
async fn forbidden_transition_fails_and_leaves_the_case_untouched() {
    let store = MemoryStore::new();
    let case = seed(&store, Status::ToAccountant).await;
    let engine = TransitionEngine::new(store);
    let operator = session("rustam", "operator");

    // Operators have no rights once the case is with the accountant.
    let err = engine
        .transition(&operator, case.id, Status::Approved, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::ForbiddenTransition {
            from: Status::ToAccountant,
            to: Status::Approved,
            ..
        }
    ));

    let after = engine.store().get_case(case.id).await.unwrap();
    assert_eq!(after.status, Status::ToAccountant);
    assert!(engine.store().list_history(case.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn superuser_can_force_any_move_including_out_of_deleted() {
    let store = MemoryStore::new();
    let case = seed(&store, Status::Deleted).await;
    let engine = TransitionEngine::new(store);
    let root = session("admin", "superuser");

    let updated = engine
        .transition(&root, case.id, Status::Submitted, None)
        .await
        .unwrap();
    assert_eq!(updated.status, Status::Submitted);
}

#[tokio::test]
async fn unknown_role_gets_superuser_rights() {
    let store = MemoryStore::new();
    let case = seed(&store, Status::Approved).await;
    let engine = TransitionEngine::new(store);
    let odd = session("ghost", "some-new-role");

    let updated = engine
        .transition(&odd, case.id, Status::BankCard, None)
        .await
        .unwrap();
    assert_eq!(updated.status, Status::BankCard);
}

#[tokio::test]
async fn missing_case_surfaces_not_found() {
    let engine = TransitionEngine::new(MemoryStore::new());
    let reviewer = session("zarina", "reviewer");

    let err = engine
        .transition(&reviewer, CaseId(404), Status::UnderReview, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Store(StoreError::NotFound(_))));
}

#[tokio::test]
async fn approved_vote_posts_a_note_then_moves_the_case() {
    let store = MemoryStore::new();
    let case = seed(&store, Status::UnderReview).await;
    let engine = TransitionEngine::new(store);
    let reviewer = session("zarina", "reviewer");

    let updated = engine
        .vote(&reviewer, case.id, Vote::Approved, "family verified", Some(200.0))
        .await
        .unwrap();

    assert_eq!(updated.status, Status::ToAccountant);
    assert_eq!(updated.approved_amount, Some(200.0));
    assert_eq!(updated.notes.len(), 1);
    assert_eq!(updated.notes[0].text, "Vote: APPROVED - family verified");
    assert_eq!(updated.notes[0].author, "zarina");
}

#[tokio::test]
async fn rejected_vote_needs_no_amount() {
    let store = MemoryStore::new();
    let case = seed(&store, Status::UnderReview).await;
    let engine = TransitionEngine::new(store);
    let reviewer = session("zarina", "reviewer");

    let updated = engine
        .vote(&reviewer, case.id, Vote::Rejected, "incomplete documents", None)
        .await
        .unwrap();
    assert_eq!(updated.status, Status::Rejected);
    assert_eq!(updated.notes[0].text, "Vote: REJECTED - incomplete documents");
}

#[tokio::test]
async fn empty_note_text_is_rejected() {
    let store = MemoryStore::new();
    let case = seed(&store, Status::Submitted).await;
    let engine = TransitionEngine::new(store);
    let operator = session("rustam", "operator");

    let err = engine.add_note(&operator, case.id, "   ").await.unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));

    let note = engine
        .add_note(&operator, case.id, "called the family")
        .await
        .unwrap();
    assert_eq!(note.author, "rustam");
}

/// Store double that loses the amount part of a compound write, the way
/// a backend without multi-field atomicity might.
struct AmountDroppingStore {
    inner: MemoryStore,
}

#[async_trait]
impl CaseStore for AmountDroppingStore {
    async fn list_cases(&self, filter: &CaseListFilter) -> Result<Vec<Case>, StoreError> {
        self.inner.list_cases(filter).await
    }

    async fn get_case(&self, id: CaseId) -> Result<Case, StoreError> {
        self.inner.get_case(id).await
    }

    async fn create_case(&self, fields: NewCase) -> Result<Case, StoreError> {
        self.inner.create_case(fields).await
    }

    async fn update_case_status(
        &self,
        id: CaseId,
        change: StatusChange,
    ) -> Result<Case, StoreError> {
        let stripped = StatusChange::new(change.new_status, change.actor);
        self.inner.update_case_status(id, stripped).await
    }

    async fn list_history(&self, id: CaseId) -> Result<Vec<HistoryEntry>, StoreError> {
        self.inner.list_history(id).await
    }

    async fn create_note(&self, id: CaseId, text: &str, author: &str) -> Result<Note, StoreError> {
        self.inner.create_note(id, text, author).await
    }

    async fn create_payment(&self, id: CaseId, payment: Payment) -> Result<Payment, StoreError> {
        self.inner.create_payment(id, payment).await
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
        self.inner.upload_document(id, name, url, document_type).await
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

#[tokio::test]
async fn partially_applied_compound_write_is_reported_as_inconsistent() {
    let inner = MemoryStore::new();
    let case = seed(&inner, Status::UnderReview).await;
    let engine = TransitionEngine::new(AmountDroppingStore { inner });
    let reviewer = session("zarina", "reviewer");

    let err = engine
        .transition(&reviewer, case.id, Status::ToAccountant, Some(150.50))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InconsistentState(_)));
}
