use chrono::{DateTime, NaiveDate, Utc};

use crate::cases::{Case, HelpReason, Purpose, Region, Status};

use super::filters;

/// Which case fields a screen's free-text search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFields {
    pub name: bool,
    pub phone: bool,
    pub id: bool,
}

impl SearchFields {
    /// Applications and families screens search by name or phone.
    pub const NAME_AND_PHONE: SearchFields = SearchFields {
        name: true,
        phone: true,
        id: false,
    };
    /// The accounting ledger searches by name or case id.
    pub const NAME_AND_ID: SearchFields = SearchFields {
        name: true,
        phone: false,
        id: true,
    };
    pub const ALL: SearchFields = SearchFields {
        name: true,
        phone: true,
        id: true,
    };
}

impl Default for SearchFields {
    fn default() -> Self {
        SearchFields::ALL
    }
}

/// Tri-state payment tab on the accounting screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaymentTab {
    #[default]
    All,
    Unpaid,
    Paid,
}

/// Inclusive date window over a case's reference date (payment date,
/// falling back to creation date). An unset bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Builds a range from user-editable text inputs. Malformed dates
    /// fail soft: they become "no bound" rather than an error.
    pub fn parse(from: &str, to: &str) -> Self {
        Self {
            from: parse_date_lenient(from),
            to: parse_date_lenient(to),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// `to` is treated as end-of-day, so a bound of 2024-01-31 still
    /// admits 2024-01-31T23:59:59.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if let Some(from) = self.from {
            let start = from.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
            if start.map_or(false, |start| instant < start) {
                return false;
            }
        }
        if let Some(to) = self.to {
            let end = to.and_hms_opt(23, 59, 59).map(|t| t.and_utc());
            if end.map_or(false, |end| instant > end) {
                return false;
            }
        }
        true
    }
}

fn parse_date_lenient(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// All filter parameters a screen can apply to the case collection.
/// Pure predicates, combined with AND; `None` (or `All`) always passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseQuery {
    pub search: String,
    pub search_fields: SearchFields,
    pub status: Option<Status>,
    pub payment_tab: PaymentTab,
    pub region: Option<Region>,
    pub purpose: Option<Purpose>,
    pub help_reason: Option<HelpReason>,
    pub date_range: DateRange,
    pub unique_families: bool,
}

impl CaseQuery {
    pub fn matches(&self, case: &Case) -> bool {
        filters::matches_search(case, &self.search, self.search_fields)
            && self.status.map_or(true, |s| case.status == s)
            && filters::matches_payment_tab(case, self.payment_tab)
            && self.region.map_or(true, |r| case.region == r)
            && self.purpose.map_or(true, |p| case.purpose == p)
            && self
                .help_reason
                .map_or(true, |hr| case.help_reason() == Some(hr))
            && filters::matches_date_range(case, self.date_range)
    }

    /// Applies every predicate, then the optional family dedup. The
    /// result keeps the store's original order.
    pub fn apply(&self, cases: &[Case]) -> Vec<Case> {
        let filtered: Vec<Case> = cases.iter().filter(|c| self.matches(c)).cloned().collect();
        if self.unique_families {
            super::dedup_families(filtered)
        } else {
            filtered
        }
    }
}
