//! Per-member monthly history over a range.

use serde::Serialize;

use crate::calendar::{MonthName, MonthRange, YearKey};
use crate::ledger::{normalize_name, ContributionLedger};

use super::Report;

/// Payment state of one walked month for the member.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RowStatus {
    Paid,
    Unpaid,
    NoRecord,
}

/// Which rows the caller wants to see. Filtered-out rows contribute
/// nothing to the summary either: the report reflects only what was
/// asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Paid,
    Unpaid,
    NoRecord,
}

impl StatusFilter {
    pub fn admits(&self, status: RowStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Paid => status == RowStatus::Paid,
            StatusFilter::Unpaid => status == RowStatus::Unpaid,
            StatusFilter::NoRecord => status == RowStatus::NoRecord,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndividualRow {
    pub year: YearKey,
    pub month: MonthName,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct IndividualSummary {
    pub total_amount: i64,
    pub total_paid: i64,
    pub total_unpaid: i64,
    pub months_paid: usize,
    pub months_unpaid: usize,
    pub months_without_record: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndividualReport {
    pub title: String,
    pub subtitle: String,
    pub member_name: String,
    pub rows: Vec<IndividualRow>,
    pub summary: IndividualSummary,
}

/// Walks the range chronologically, emitting one row per admitted month.
pub fn individual_report(
    ledger: &ContributionLedger,
    range: &MonthRange,
    member_name: &str,
    filter: StatusFilter,
) -> Report {
    let needle = normalize_name(member_name);
    let mut rows = Vec::new();
    let mut summary = IndividualSummary::default();

    for (year, month) in range.months() {
        let record = ledger
            .bucket(&year, month)
            .and_then(|bucket| bucket.find_member(&needle));
        let (status, amount) = match record {
            Some(record) if record.paid => (RowStatus::Paid, Some(record.amount)),
            Some(record) => (RowStatus::Unpaid, Some(record.amount)),
            None => (RowStatus::NoRecord, None),
        };
        if !filter.admits(status) {
            continue;
        }
        match status {
            RowStatus::Paid => {
                summary.months_paid += 1;
                summary.total_paid += amount.unwrap_or(0);
            }
            RowStatus::Unpaid => {
                summary.months_unpaid += 1;
                summary.total_unpaid += amount.unwrap_or(0);
            }
            RowStatus::NoRecord => summary.months_without_record += 1,
        }
        summary.total_amount += amount.unwrap_or(0);
        rows.push(IndividualRow {
            year,
            month,
            status,
            amount,
        });
    }

    Report::Individual(IndividualReport {
        title: format!("Contribution history for {}", member_name.trim()),
        subtitle: range.label(),
        member_name: member_name.trim().to_string(),
        rows,
        summary,
    })
}
