use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::{MonthName, YearKey};

/// A single member's entry in a month bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContributionRecord {
    pub name: String,
    pub amount: i64,
    pub paid: bool,
}

/// All contributions recorded for one calendar month.
///
/// `total` is never stored stale: every mutation path recomputes it via
/// `recompute_total` before returning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthBucket {
    #[serde(default)]
    pub contributions: Vec<ContributionRecord>,
    pub total: i64,
}

impl MonthBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recompute_total(&mut self) {
        self.total = self.contributions.iter().map(|record| record.amount).sum();
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    /// Paid/unpaid breakdown of this bucket.
    pub fn totals(&self) -> ContributionTotals {
        let mut totals = ContributionTotals::default();
        totals.accumulate(self);
        totals
    }

    pub fn find_member(&self, normalized: &str) -> Option<&ContributionRecord> {
        self.contributions
            .iter()
            .find(|record| normalize_name(&record.name) == normalized)
    }
}

/// Aggregated paid/unpaid figures over one or more buckets.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContributionTotals {
    pub total: i64,
    pub paid_amount: i64,
    pub unpaid_amount: i64,
    pub paid_count: usize,
    pub unpaid_count: usize,
    pub record_count: usize,
}

impl ContributionTotals {
    pub fn accumulate(&mut self, bucket: &MonthBucket) {
        for record in &bucket.contributions {
            self.total += record.amount;
            self.record_count += 1;
            if record.paid {
                self.paid_amount += record.amount;
                self.paid_count += 1;
            } else {
                self.unpaid_amount += record.amount;
                self.unpaid_count += 1;
            }
        }
    }
}

/// The year → month → bucket hierarchy for periodic contributions.
///
/// Keys are validated `YearKey`/`MonthName` values, so `BTreeMap`
/// iteration order is chronological.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContributionLedger {
    #[serde(default)]
    pub years: BTreeMap<YearKey, BTreeMap<MonthName, MonthBucket>>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl ContributionLedger {
    pub fn new() -> Self {
        Self {
            years: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn bucket(&self, year: &YearKey, month: MonthName) -> Option<&MonthBucket> {
        self.years.get(year).and_then(|months| months.get(&month))
    }

    pub fn bucket_mut(&mut self, year: &YearKey, month: MonthName) -> Option<&mut MonthBucket> {
        self.years
            .get_mut(year)
            .and_then(|months| months.get_mut(&month))
    }

    pub fn ensure_bucket(&mut self, year: YearKey, month: MonthName) -> &mut MonthBucket {
        self.years
            .entry(year)
            .or_default()
            .entry(month)
            .or_default()
    }

    pub fn contains_month(&self, year: &YearKey, month: MonthName) -> bool {
        self.bucket(year, month).is_some()
    }

    /// Iterates every bucket in chronological order.
    pub fn iter_chronological(
        &self,
    ) -> impl Iterator<Item = (&YearKey, MonthName, &MonthBucket)> {
        self.years.iter().flat_map(|(year, months)| {
            months.iter().map(move |(month, bucket)| (year, *month, bucket))
        })
    }

    /// Finds the most recent non-empty bucket strictly before the given
    /// month, searching backward across the whole ledger.
    pub fn latest_populated_before(
        &self,
        year: &YearKey,
        month: MonthName,
    ) -> Option<(YearKey, MonthName, &MonthBucket)> {
        let target = (year.number(), month.index());
        self.iter_chronological()
            .filter(|(y, m, bucket)| {
                (y.number(), m.index()) < target && !bucket.is_empty()
            })
            .last()
            .map(|(y, m, bucket)| (y.clone(), m, bucket))
    }

    /// Sum of every paid contribution across the entire ledger, used for
    /// budget balance reporting. Not date-scoped.
    pub fn total_paid_income(&self) -> i64 {
        self.iter_chronological()
            .flat_map(|(_, _, bucket)| bucket.contributions.iter())
            .filter(|record| record.paid)
            .map(|record| record.amount)
            .sum()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Canonical form used for member name comparisons everywhere in the core.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
