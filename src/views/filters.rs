//! The individual view predicates. Each is pure; [`CaseQuery`] composes
//! them with AND semantics.
//!
//! [`CaseQuery`]: super::CaseQuery

use chrono::{DateTime, Utc};

use crate::cases::Case;

use super::query::{DateRange, PaymentTab, SearchFields};

/// Case-insensitive substring match over the fields the screen enables.
/// A blank query passes everything.
pub fn matches_search(case: &Case, query: &str, fields: SearchFields) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    (fields.name && case.full_name.to_lowercase().contains(&query))
        || (fields.phone && case.phone_number.to_lowercase().contains(&query))
        || (fields.id && case.id.to_string().contains(&query))
}

pub fn matches_payment_tab(case: &Case, tab: PaymentTab) -> bool {
    match tab {
        PaymentTab::All => true,
        PaymentTab::Paid => case.is_paid(),
        PaymentTab::Unpaid => !case.is_paid(),
    }
}

/// The date the ledger reasons about: when the case was paid, or when it
/// was created if no payment exists yet.
pub fn reference_date(case: &Case) -> DateTime<Utc> {
    case.payment
        .as_ref()
        .map(|p| p.payment_date)
        .unwrap_or(case.created_at)
}

pub fn matches_date_range(case: &Case, range: DateRange) -> bool {
    if range.is_unbounded() {
        return true;
    }
    range.contains(reference_date(case))
}
