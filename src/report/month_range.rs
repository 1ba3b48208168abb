//! Per-month totals over a range, without member granularity.

use serde::Serialize;

use crate::calendar::{MonthName, MonthRange, YearKey};
use crate::ledger::{ContributionLedger, ContributionTotals};

use super::Report;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthTotalsRow {
    pub year: YearKey,
    pub month: MonthName,
    pub totals: ContributionTotals,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct MonthRangeSummary {
    pub grand_total: i64,
    pub grand_paid: i64,
    pub grand_unpaid: i64,
    pub months_walked: usize,
    pub months_with_records: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthRangeReport {
    pub title: String,
    pub subtitle: String,
    pub rows: Vec<MonthTotalsRow>,
    pub summary: MonthRangeSummary,
}

/// One row per walked month, in chronological order, plus grand totals.
pub fn month_range_report(ledger: &ContributionLedger, range: &MonthRange) -> Report {
    let mut rows = Vec::with_capacity(range.len());
    let mut summary = MonthRangeSummary::default();

    for (year, month) in range.months() {
        let totals = ledger
            .bucket(&year, month)
            .map(|bucket| bucket.totals())
            .unwrap_or_default();
        summary.months_walked += 1;
        if totals.record_count > 0 {
            summary.months_with_records += 1;
        }
        summary.grand_total += totals.total;
        summary.grand_paid += totals.paid_amount;
        summary.grand_unpaid += totals.unpaid_amount;
        rows.push(MonthTotalsRow { year, month, totals });
    }

    Report::MonthRange(MonthRangeReport {
        title: "Monthly summary".to_string(),
        subtitle: range.label(),
        rows,
        summary,
    })
}
