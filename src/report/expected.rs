//! Baseline-vs-actual comparison for expected monthly contributors.

use serde::{Deserialize, Serialize};

use crate::calendar::MonthRange;
use crate::ledger::{normalize_name, ContributionLedger};

use super::Report;

/// A caller-declared baseline: who should give, and how much per month.
/// Independent of actual contribution history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpectedMember {
    pub name: String,
    pub monthly_amount: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExpectedMemberRow {
    pub name: String,
    /// Months in range that had a bucket at all; months with no bucket do
    /// not count as expected and never inflate what is owed.
    pub expected_months: usize,
    pub total_expected: i64,
    pub total_paid: i64,
    pub total_owed: i64,
    pub never_contributed: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ExpectedSummary {
    pub member_count: usize,
    pub total_expected: i64,
    pub total_paid: i64,
    pub total_owed: i64,
    pub never_contributed_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExpectedMembersReport {
    pub title: String,
    pub subtitle: String,
    pub rows: Vec<ExpectedMemberRow>,
    pub summary: ExpectedSummary,
}

/// Cross-references the baseline against actual entries over the range.
///
/// Per walked month with a bucket: a paid record counts its actual amount
/// toward paid; a missing or unpaid record owes the full expected amount.
/// Rows come out alphabetically by name.
pub fn expected_members_report(
    ledger: &ContributionLedger,
    range: &MonthRange,
    baseline: &[ExpectedMember],
) -> Report {
    let months = range.months();
    let mut rows: Vec<ExpectedMemberRow> = baseline
        .iter()
        .map(|member| {
            let needle = normalize_name(&member.name);
            let mut row = ExpectedMemberRow {
                name: member.name.trim().to_string(),
                expected_months: 0,
                total_expected: 0,
                total_paid: 0,
                total_owed: 0,
                never_contributed: true,
            };
            for (year, month) in &months {
                let Some(bucket) = ledger.bucket(year, *month) else {
                    continue;
                };
                row.expected_months += 1;
                row.total_expected += member.monthly_amount;
                match bucket.find_member(&needle) {
                    Some(record) if record.paid => {
                        row.never_contributed = false;
                        row.total_paid += record.amount;
                    }
                    Some(_) => {
                        // Appeared but did not pay: still owes the month.
                        row.never_contributed = false;
                        row.total_owed += member.monthly_amount;
                    }
                    None => row.total_owed += member.monthly_amount,
                }
            }
            row
        })
        .collect();
    rows.sort_by(|a, b| normalize_name(&a.name).cmp(&normalize_name(&b.name)));

    let mut summary = ExpectedSummary {
        member_count: rows.len(),
        ..ExpectedSummary::default()
    };
    for row in &rows {
        summary.total_expected += row.total_expected;
        summary.total_paid += row.total_paid;
        summary.total_owed += row.total_owed;
        if row.never_contributed {
            summary.never_contributed_count += 1;
        }
    }

    Report::ExpectedMembers(ExpectedMembersReport {
        title: "Expected members".to_string(),
        subtitle: range.label(),
        rows,
        summary,
    })
}
