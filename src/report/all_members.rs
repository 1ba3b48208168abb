//! Per-member accumulation across every month in a range.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::calendar::MonthRange;
use crate::ledger::{normalize_name, ContributionLedger};

use super::Report;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MemberTotalsRow {
    pub name: String,
    pub total_amount: i64,
    pub paid_amount: i64,
    pub unpaid_amount: i64,
    pub months_contributed: usize,
    pub months_outstanding: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct AllMembersSummary {
    pub member_count: usize,
    pub total_amount: i64,
    pub total_paid: i64,
    pub total_unpaid: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AllMembersReport {
    pub title: String,
    pub subtitle: String,
    pub rows: Vec<MemberTotalsRow>,
    pub summary: AllMembersSummary,
}

/// Accumulates each member's totals over the range. Rows come out in
/// alphabetical order of the normalized member name.
pub fn all_members_report(ledger: &ContributionLedger, range: &MonthRange) -> Report {
    let mut members: BTreeMap<String, MemberTotalsRow> = BTreeMap::new();

    for (year, month) in range.months() {
        let Some(bucket) = ledger.bucket(&year, month) else {
            continue;
        };
        for record in &bucket.contributions {
            let row = members
                .entry(normalize_name(&record.name))
                .or_insert_with(|| MemberTotalsRow {
                    name: record.name.trim().to_string(),
                    ..MemberTotalsRow::default()
                });
            row.total_amount += record.amount;
            if record.paid {
                row.paid_amount += record.amount;
            } else {
                row.unpaid_amount += record.amount;
                row.months_outstanding += 1;
            }
            row.months_contributed += 1;
        }
    }

    let mut summary = AllMembersSummary {
        member_count: members.len(),
        ..AllMembersSummary::default()
    };
    for row in members.values() {
        summary.total_amount += row.total_amount;
        summary.total_paid += row.paid_amount;
        summary.total_unpaid += row.unpaid_amount;
    }

    Report::AllMembers(AllMembersReport {
        title: "All members".to_string(),
        subtitle: range.label(),
        rows: members.into_values().collect(),
        summary,
    })
}
