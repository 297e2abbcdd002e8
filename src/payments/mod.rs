//! Payment recording and amount validation: the monetary facts on a
//! case must stay self-consistent with its workflow position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cases::{CaseId, Payment, PaymentStatus, Status};
use crate::session::AuthSession;
use crate::store::CaseStore;
use crate::workflow::WorkflowError;

/// Statuses in which payment collection is legitimate.
pub const PAYABLE_STATUSES: [Status; 2] = [Status::ToAccountant, Status::Approved];

/// Accountant input for creating or updating a case's payment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDraft {
    pub payment_date: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    pub document_number: String,
    pub comment: String,
}

impl From<PaymentDraft> for Payment {
    fn from(draft: PaymentDraft) -> Self {
        Payment {
            payment_date: draft.payment_date,
            payment_status: draft.payment_status,
            document_number: draft.document_number,
            comment: draft.comment,
        }
    }
}

/// Rejects non-finite and non-positive amounts.
pub fn validate_amount(amount: f64) -> Result<f64, WorkflowError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(WorkflowError::InvalidAmount(format!(
            "amount must be a positive number, got {amount}"
        )));
    }
    Ok(amount)
}

/// Parses a user-entered amount string. Free text, so anything that is
/// not a positive finite number is an [`WorkflowError::InvalidAmount`].
pub fn parse_amount(input: &str) -> Result<f64, WorkflowError> {
    let trimmed = input.trim();
    let amount: f64 = trimmed.parse().map_err(|_| {
        WorkflowError::InvalidAmount(format!("amount {trimmed:?} is not a number"))
    })?;
    validate_amount(amount)
}

/// Creates or updates the payment record on a case. Legal only while the
/// case sits with the accountant or is approved; never touches `status`.
/// Idempotent per case: a second call updates the one payment entity.
pub async fn record_payment<S: CaseStore>(
    store: &S,
    session: &AuthSession,
    id: CaseId,
    draft: PaymentDraft,
) -> Result<Payment, WorkflowError> {
    let case = store.get_case(id).await?;
    if !PAYABLE_STATUSES.contains(&case.status) {
        return Err(WorkflowError::Validation(format!(
            "payments may only be recorded while a case is with the accountant or approved, \
             case {id} is {}",
            case.status
        )));
    }
    let payment = store.create_payment(id, draft.into()).await?;
    tracing::info!(
        case = %id,
        actor = session.username(),
        status = ?payment.payment_status,
        document = %payment.document_number,
        "payment recorded"
    );
    Ok(payment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_amount_rejects_zero_negative_and_non_finite() {
        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-5.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
        assert_eq!(validate_amount(150.50).unwrap(), 150.50);
    }

    #[test]
    fn parse_amount_rejects_free_text() {
        assert!(matches!(
            parse_amount("abc"),
            Err(WorkflowError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_amount(""),
            Err(WorkflowError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_amount("-5"),
            Err(WorkflowError::InvalidAmount(_))
        ));
        assert_eq!(parse_amount(" 150.50 ").unwrap(), 150.50);
    }
}
