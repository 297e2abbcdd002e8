use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Unique numeric case identity, assigned by the store at creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CaseId(pub u64);

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Workflow status of a case. Never null; every case carries exactly one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    NewMessage,
    Submitted,
    UnderReview,
    ToAccountant,
    Rejected,
    Approved,
    FamilyVideo,
    HelpLater,
    BankCard,
    Deleted,
}

impl Status {
    pub const ALL: [Status; 10] = [
        Status::NewMessage,
        Status::Submitted,
        Status::UnderReview,
        Status::ToAccountant,
        Status::Rejected,
        Status::Approved,
        Status::FamilyVideo,
        Status::HelpLater,
        Status::BankCard,
        Status::Deleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NewMessage => "new_message",
            Status::Submitted => "submitted",
            Status::UnderReview => "under_review",
            Status::ToAccountant => "to_accountant",
            Status::Rejected => "rejected",
            Status::Approved => "approved",
            Status::FamilyVideo => "family_video",
            Status::HelpLater => "help_later",
            Status::BankCard => "bank_card",
            Status::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Administrative region an application originates from.
/// Wire values are the exact strings the upstream store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "НТМ")]
    Ntm,
    #[serde(rename = "ХАТЛОН")]
    Khatlon,
    #[serde(rename = "СУҒД")]
    Sughd,
    #[serde(rename = "ВМКБ")]
    Vmkb,
    #[serde(rename = "БЕРУН АЗ ТҶК")]
    OutsideCountry,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Ntm,
        Region::Khatlon,
        Region::Sughd,
        Region::Vmkb,
        Region::OutsideCountry,
    ];
}

/// Why the applicant contacted the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purpose {
    #[serde(rename = "Пешниҳод дорам")]
    Offer,
    #[serde(rename = "Кӯмак лозим")]
    NeedsHelp,
}

/// Help-reason category recorded on the survey (poll) level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HelpReason {
    #[serde(rename = "Табобат")]
    Treatment,
    #[serde(rename = "Таҳсилот")]
    Education,
    #[serde(rename = "Хӯрок")]
    Food,
    #[serde(rename = "Таъмири хона")]
    HomeRepair,
    #[serde(rename = "Дастгирии тиҷорат")]
    BusinessSupport,
    #[serde(rename = "Ниёзи аввали")]
    BasicNeeds,
}

impl HelpReason {
    pub const ALL: [HelpReason; 6] = [
        HelpReason::Treatment,
        HelpReason::Education,
        HelpReason::Food,
        HelpReason::HomeRepair,
        HelpReason::BusinessSupport,
        HelpReason::BasicNeeds,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

/// Payment record attached to a case. At most one exists per case;
/// accountant actions create or update it, never duplicate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_date: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    pub document_number: String,
    pub comment: String,
}

/// Approved monetary amount entry. The first entry is the amount the
/// committee approved when the case moved to the accountant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AidAmount {
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Passport,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub url: String,
    pub document_type: DocumentType,
    pub uploaded_at: DateTime<Utc>,
}

/// Free-text comment on a case. The note list is an append-only trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Status-change audit record, written by the store on every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub old_status: Status,
    pub new_status: Status,
    pub changed_by: String,
    pub changed_at: DateTime<Utc>,
}

/// A household member with income, listed on the survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyWorker {
    pub name: String,
    pub job: String,
    pub monthly_income: f64,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyPhoneNumber {
    pub person_name: String,
    pub phone_number: String,
}

/// Survey/questionnaire data collected from the applicant's household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub family_members: u32,
    pub monthly_income: f64,
    pub date_of_birth: Option<NaiveDate>,
    pub financial_status: String,
    pub help_reason: HelpReason,
    pub profession: String,
    #[serde(default)]
    pub family_workers: Vec<FamilyWorker>,
    #[serde(default)]
    pub family_phone_numbers: Vec<FamilyPhoneNumber>,
}

/// The root aggregate: one aid application ("form") and everything
/// attached to it. History is served separately by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub full_name: String,
    pub phone_number: String,
    pub region: Region,
    pub detailed_address: String,
    pub purpose: Purpose,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub status: Status,
    pub approved_amount: Option<f64>,
    #[serde(default)]
    pub polls: Vec<Poll>,
    pub payment: Option<Payment>,
    #[serde(default)]
    pub aid_amounts: Vec<AidAmount>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Case {
    /// The survey attached to this case, if one was filled in.
    /// Stores may carry more than one; only the first is meaningful.
    pub fn first_poll(&self) -> Option<&Poll> {
        self.polls.first()
    }

    /// The approved amount as recorded in the first aid-amount entry.
    pub fn approved_aid(&self) -> Option<f64> {
        self.aid_amounts.first().map(|a| a.amount)
    }

    pub fn is_paid(&self) -> bool {
        matches!(
            self.payment,
            Some(Payment {
                payment_status: PaymentStatus::Paid,
                ..
            })
        )
    }

    pub fn help_reason(&self) -> Option<HelpReason> {
        self.first_poll().map(|p| p.help_reason)
    }
}

/// Creation payload for a new case. Status defaults to `new_message`
/// when the operator does not submit immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCase {
    pub full_name: String,
    pub phone_number: String,
    pub region: Region,
    pub detailed_address: String,
    pub purpose: Purpose,
    pub description: String,
    pub status: Option<Status>,
}
