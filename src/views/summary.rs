use crate::cases::Case;

/// Ledger statistics over a filtered (not paginated) case collection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LedgerSummary {
    pub total_cases: usize,
    pub paid_cases: usize,
    pub unpaid_cases: usize,
    /// Sum of the first aid-amount entry across all cases.
    pub total_amount: f64,
    /// Same sum restricted to the paid subset.
    pub paid_amount: f64,
}

impl LedgerSummary {
    pub fn compute(cases: &[Case]) -> Self {
        let mut summary = LedgerSummary {
            total_cases: cases.len(),
            ..LedgerSummary::default()
        };
        for case in cases {
            let amount = case.approved_aid().unwrap_or(0.0);
            summary.total_amount += amount;
            if case.is_paid() {
                summary.paid_cases += 1;
                summary.paid_amount += amount;
            }
        }
        summary.unpaid_cases = summary.total_cases - summary.paid_cases;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::{AidAmount, CaseId, Payment, PaymentStatus, Purpose, Region, Status};

    fn case(id: u64, amount: f64, paid: bool) -> Case {
        Case {
            id: CaseId(id),
            full_name: format!("case {id}"),
            phone_number: format!("+992 {id}"),
            region: Region::Sughd,
            detailed_address: String::new(),
            purpose: Purpose::NeedsHelp,
            description: String::new(),
            created_at: "2024-02-01T08:00:00Z".parse().unwrap(),
            status: Status::ToAccountant,
            approved_amount: Some(amount),
            polls: Vec::new(),
            payment: paid.then(|| Payment {
                payment_date: "2024-02-10T08:00:00Z".parse().unwrap(),
                payment_status: PaymentStatus::Paid,
                document_number: format!("D-{id}"),
                comment: String::new(),
            }),
            aid_amounts: vec![AidAmount { amount }],
            documents: Vec::new(),
            notes: Vec::new(),
        }
    }

    #[test]
    fn sums_first_aid_entry_over_filtered_set_and_paid_subset() {
        let cases = vec![case(1, 100.0, true), case(2, 50.5, false), case(3, 25.0, true)];
        let summary = LedgerSummary::compute(&cases);
        assert_eq!(summary.total_cases, 3);
        assert_eq!(summary.paid_cases, 2);
        assert_eq!(summary.unpaid_cases, 1);
        assert_eq!(summary.total_amount, 175.5);
        assert_eq!(summary.paid_amount, 125.0);
    }

    #[test]
    fn empty_collection_yields_zeroes() {
        assert_eq!(LedgerSummary::compute(&[]), LedgerSummary::default());
    }
}
