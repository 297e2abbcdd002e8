//! Executes status transitions against the case store, enforcing the
//! transition table and the compound amount write.

use tracing::Instrument;

use crate::cases::{Case, CaseId, Note, Status};
use crate::payments::validate_amount;
use crate::session::AuthSession;
use crate::store::{CaseStore, StatusChange};
use crate::telemetry::{create_workflow_span, generate_correlation_id};

use super::transitions::is_transition_allowed;
use super::WorkflowError;

/// Committee decision on a case under review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Approved,
    Rejected,
}

impl Vote {
    fn label(&self) -> &'static str {
        match self {
            Vote::Approved => "APPROVED",
            Vote::Rejected => "REJECTED",
        }
    }

    fn target(&self) -> Status {
        match self {
            Vote::Approved => Status::ToAccountant,
            Vote::Rejected => Status::Rejected,
        }
    }
}

pub struct TransitionEngine<S> {
    store: S,
}

impl<S: CaseStore> TransitionEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Moves a case to `target` on behalf of the session's user.
    ///
    /// `amount` is consulted only for the compound `under_review ->
    /// to_accountant` move, where a positive approved amount must land in
    /// the same store write as the status. Any validation failure aborts
    /// before the store is touched, so an error never leaves partial
    /// state behind.
    pub async fn transition(
        &self,
        session: &AuthSession,
        id: CaseId,
        target: Status,
        amount: Option<f64>,
    ) -> Result<Case, WorkflowError> {
        let correlation_id = generate_correlation_id();
        let span = create_workflow_span(
            "transition",
            Some(id.0),
            Some(session.role().as_str()),
            Some(&correlation_id),
        );

        async move {
            let case = self.store.get_case(id).await?;
            let from = case.status;

            if !is_transition_allowed(session.role(), from, target) {
                tracing::warn!(
                    correlation_id = %correlation_id,
                    case = %id,
                    role = %session.role(),
                    from = %from,
                    to = %target,
                    "forbidden transition attempt"
                );
                return Err(WorkflowError::ForbiddenTransition {
                    role: session.role(),
                    from,
                    to: target,
                });
            }

            let mut change = StatusChange::new(target, session.username());
            if from == Status::UnderReview && target == Status::ToAccountant {
                let amount = amount.ok_or_else(|| {
                    WorkflowError::InvalidAmount(
                        "an approved amount is required to send a case to the accountant"
                            .to_string(),
                    )
                })?;
                change = change.with_amount(validate_amount(amount)?);
            }

            let updated = self.store.update_case_status(id, change.clone()).await?;
            verify_applied(&updated, &change)?;

            tracing::info!(
                correlation_id = %correlation_id,
                case = %id,
                actor = session.username(),
                from = %from,
                to = %target,
                amount = change.approved_amount,
                "case status changed"
            );
            Ok(updated)
        }
        .instrument(span)
        .await
    }

    /// Transition with a user-entered amount string; non-numeric input is
    /// rejected before anything is written.
    pub async fn transition_with_raw_amount(
        &self,
        session: &AuthSession,
        id: CaseId,
        target: Status,
        raw_amount: &str,
    ) -> Result<Case, WorkflowError> {
        let amount = crate::payments::parse_amount(raw_amount)?;
        self.transition(session, id, target, Some(amount)).await
    }

    /// Committee vote: records the decision as a note, then performs the
    /// matching transition. The note survives even if the transition is
    /// later refused, serving as an audit trace of the attempted vote.
    pub async fn vote(
        &self,
        session: &AuthSession,
        id: CaseId,
        vote: Vote,
        comment: &str,
        amount: Option<f64>,
    ) -> Result<Case, WorkflowError> {
        let text = format!("Vote: {} - {}", vote.label(), comment);
        self.store
            .create_note(id, &text, session.username())
            .await?;
        self.transition(session, id, vote.target(), amount).await
    }

    /// Appends a note to the case trail. Write-through: the returned note
    /// is the store's confirmed copy, nothing is applied locally first.
    pub async fn add_note(
        &self,
        session: &AuthSession,
        id: CaseId,
        text: &str,
    ) -> Result<Note, WorkflowError> {
        if text.trim().is_empty() {
            return Err(WorkflowError::Validation("note text is empty".to_string()));
        }
        let note = self
            .store
            .create_note(id, text, session.username())
            .await?;
        Ok(note)
    }
}

/// The store should echo back exactly what was written. A mismatch means
/// the compound write was applied partially and must not pass silently.
fn verify_applied(updated: &Case, change: &StatusChange) -> Result<(), WorkflowError> {
    if updated.status != change.new_status {
        return Err(WorkflowError::InconsistentState(format!(
            "store reports status {} after a write of {}",
            updated.status, change.new_status
        )));
    }
    if let Some(amount) = change.approved_amount {
        if updated.approved_amount != Some(amount) {
            return Err(WorkflowError::InconsistentState(format!(
                "approved amount {amount} was not persisted with the status"
            )));
        }
        if updated.approved_aid() != Some(amount) {
            return Err(WorkflowError::InconsistentState(format!(
                "aid-amount entry for {amount} was not persisted with the status"
            )));
        }
    }
    Ok(())
}
