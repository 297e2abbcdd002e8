use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cases::Status;

/// Acting role of the signed-in user; determines transition rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Operator,
    Reviewer,
    Accountant,
    Superuser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "operator",
            Role::Reviewer => "reviewer",
            Role::Accountant => "accountant",
            Role::Superuser => "superuser",
        }
    }

    /// Strict parse: only the four known role strings.
    pub fn parse_strict(raw: &str) -> Option<Role> {
        match raw.trim() {
            "operator" => Some(Role::Operator),
            "reviewer" => Some(Role::Reviewer),
            "accountant" => Some(Role::Accountant),
            "superuser" => Some(Role::Superuser),
            _ => None,
        }
    }

    /// Lenient parse used at the session boundary: an unknown role string
    /// gets superuser rights. This preserves upstream behavior but is a
    /// known security risk, so it is logged loudly every time it fires.
    pub fn parse_lenient(raw: &str) -> Role {
        match Role::parse_strict(raw) {
            Some(role) => role,
            None => {
                tracing::warn!(
                    role = raw,
                    "unknown role string, falling back to superuser permissions"
                );
                Role::Superuser
            }
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single source of truth for "who can move a case from status X to
/// which statuses". Pure and deterministic; callers enforce the result.
pub fn allowed_transitions(role: Role, current: Status) -> BTreeSet<Status> {
    match role {
        // Superusers reach all nine other statuses from anywhere.
        Role::Superuser => Status::ALL
            .iter()
            .copied()
            .filter(|s| *s != current)
            .collect(),
        Role::Operator => operator_targets(current).iter().copied().collect(),
        Role::Reviewer => reviewer_targets(current).iter().copied().collect(),
        Role::Accountant => accountant_targets(current).iter().copied().collect(),
    }
}

pub fn is_transition_allowed(role: Role, from: Status, to: Status) -> bool {
    allowed_transitions(role, from).contains(&to)
}

const fn operator_targets(current: Status) -> &'static [Status] {
    use Status::*;
    match current {
        NewMessage => &[Submitted, UnderReview, Rejected, HelpLater, Deleted],
        Submitted => &[UnderReview, Rejected, HelpLater, FamilyVideo],
        Rejected => &[Submitted, UnderReview, HelpLater],
        HelpLater => &[Submitted, UnderReview, Rejected],
        BankCard => &[ToAccountant],
        UnderReview | ToAccountant | Approved | FamilyVideo | Deleted => &[],
    }
}

const fn reviewer_targets(current: Status) -> &'static [Status] {
    use Status::*;
    match current {
        // Intake stages mirror the operator's rights.
        NewMessage => &[Submitted, UnderReview, Rejected, HelpLater, Deleted],
        Submitted => &[UnderReview, Rejected, HelpLater, FamilyVideo],
        Rejected => &[Submitted, UnderReview, HelpLater],
        HelpLater => &[Submitted, UnderReview, Rejected],
        UnderReview => &[FamilyVideo, Rejected, HelpLater, Submitted, ToAccountant, BankCard],
        FamilyVideo => &[Submitted, Rejected, ToAccountant],
        ToAccountant | Approved | BankCard | Deleted => &[],
    }
}

const fn accountant_targets(current: Status) -> &'static [Status] {
    use Status::*;
    match current {
        FamilyVideo => &[Approved, Rejected],
        ToAccountant => &[Rejected, BankCard, Approved],
        Approved => &[Rejected],
        BankCard => &[Approved, Rejected],
        NewMessage | Submitted | UnderReview | Rejected | HelpLater | Deleted => &[],
    }
}
