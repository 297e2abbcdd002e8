//! Derived-view computation: every screen reduces the same fetched case
//! collection to what it displays, recomputed in memory on each filter
//! change with no server round trip.

pub mod activity;
pub mod filters;
pub mod pagination;
pub mod query;
pub mod summary;

pub use activity::{new_case_notifications, recent_activity, RECENT_ACTIVITY_LIMIT};
pub use pagination::{page_count, paginate, DEFAULT_PAGE_SIZE};
pub use query::{CaseQuery, DateRange, PaymentTab, SearchFields};
pub use summary::LedgerSummary;

use std::collections::HashSet;

use crate::cases::{Case, FamilyKey, HelpReason, Purpose, Region, Status};

/// One representative per family, keeping the first occurrence in the
/// store-provided order.
pub fn dedup_families(cases: Vec<Case>) -> Vec<Case> {
    let mut seen: HashSet<FamilyKey> = HashSet::with_capacity(cases.len());
    cases
        .into_iter()
        .filter(|case| seen.insert(FamilyKey::of(case)))
        .collect()
}

/// One page of a derived view, plus the statistics of the whole
/// filtered set (aggregation ignores pagination).
#[derive(Debug, Clone, PartialEq)]
pub struct CasePage {
    pub items: Vec<Case>,
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    pub summary: LedgerSummary,
}

/// A screen's filter state plus its current page. Every filter mutation
/// resets the page to 1, so a narrowed result set never points past its
/// own end.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    query: CaseQuery,
    page: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            query: CaseQuery::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_search_fields(mut self, fields: SearchFields) -> Self {
        self.query.search_fields = fields;
        self
    }

    pub fn with_unique_families(mut self, unique: bool) -> Self {
        self.query.unique_families = unique;
        self
    }

    pub fn query(&self) -> &CaseQuery {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.page = 1;
    }

    pub fn set_status(&mut self, status: Option<Status>) {
        self.query.status = status;
        self.page = 1;
    }

    pub fn set_payment_tab(&mut self, tab: PaymentTab) {
        self.query.payment_tab = tab;
        self.page = 1;
    }

    pub fn set_region(&mut self, region: Option<Region>) {
        self.query.region = region;
        self.page = 1;
    }

    pub fn set_purpose(&mut self, purpose: Option<Purpose>) {
        self.query.purpose = purpose;
        self.page = 1;
    }

    pub fn set_help_reason(&mut self, reason: Option<HelpReason>) {
        self.query.help_reason = reason;
        self.page = 1;
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.query.date_range = range;
        self.page = 1;
    }

    /// Runs the whole pipeline: predicates, dedup, aggregation over the
    /// filtered set, pagination last.
    pub fn select(&self, cases: &[Case]) -> CasePage {
        let filtered = self.query.apply(cases);
        let summary = LedgerSummary::compute(&filtered);
        let items = paginate(&filtered, self.page, self.page_size).to_vec();
        CasePage {
            total: filtered.len(),
            page: self.page,
            pages: page_count(filtered.len(), self.page_size),
            items,
            summary,
        }
    }
}
