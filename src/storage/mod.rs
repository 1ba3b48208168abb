//! The persistence gateway boundary: whole-snapshot exchange, lenient
//! ingestion of foreign data, and debounced save scheduling.

pub mod json_backend;

pub use json_backend::JsonStorage;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::calendar::{MonthName, YearKey};
use crate::errors::LedgerResult;
use crate::ledger::{
    BlacklistRegistry, BudgetLedger, CampaignLedger, ContributionLedger, ContributionRecord,
};

/// The whole in-memory state, exchanged with the remote store as one
/// object. Partial or field-level writes do not exist at this boundary;
/// the last completed save wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub contributions: ContributionLedger,
    #[serde(default)]
    pub blacklist: BlacklistRegistry,
    #[serde(default)]
    pub campaigns: CampaignLedger,
    #[serde(default)]
    pub budget: BudgetLedger,
}

/// What lenient ingestion dropped or repaired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitationReport {
    pub dropped_year_keys: usize,
    pub dropped_month_keys: usize,
    pub dropped_records: usize,
    pub repaired_totals: usize,
}

impl SanitationReport {
    pub fn is_clean(&self) -> bool {
        *self == SanitationReport::default()
    }
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Ingests untyped snapshot data, dropping malformed year/month keys
    /// and coercing contribution shape instead of failing the whole load.
    /// Bucket totals are recomputed, never trusted from the wire.
    pub fn from_value(value: Value) -> (Snapshot, SanitationReport) {
        let mut report = SanitationReport::default();
        let mut snapshot = Snapshot::empty();

        let Value::Object(mut root) = value else {
            return (snapshot, report);
        };

        if let Some(raw) = root.remove("contributions") {
            snapshot.contributions = ingest_contributions(raw, &mut report);
        }
        if let Some(raw) = root.remove("blacklist") {
            if let Ok(blacklist) = serde_json::from_value(raw) {
                snapshot.blacklist = blacklist;
            }
        }
        if let Some(raw) = root.remove("campaigns") {
            if let Ok(campaigns) = serde_json::from_value(raw) {
                snapshot.campaigns = campaigns;
            }
        }
        if let Some(raw) = root.remove("budget") {
            if let Ok(budget) = serde_json::from_value(raw) {
                snapshot.budget = budget;
            }
        }

        if !report.is_clean() {
            warn!(
                dropped_years = report.dropped_year_keys,
                dropped_months = report.dropped_month_keys,
                dropped_records = report.dropped_records,
                repaired_totals = report.repaired_totals,
                "snapshot sanitized on load"
            );
        }
        (snapshot, report)
    }
}

fn ingest_contributions(raw: Value, report: &mut SanitationReport) -> ContributionLedger {
    let mut ledger = ContributionLedger::new();
    let Value::Object(mut outer) = raw else {
        return ledger;
    };
    let Some(Value::Object(years)) = outer.remove("years") else {
        return ledger;
    };
    for (year_raw, months_raw) in years {
        let Ok(year) = YearKey::parse(&year_raw) else {
            report.dropped_year_keys += 1;
            continue;
        };
        let Value::Object(months) = months_raw else {
            report.dropped_year_keys += 1;
            continue;
        };
        for (month_raw, bucket_raw) in months {
            let Ok(month) = MonthName::parse(&month_raw) else {
                report.dropped_month_keys += 1;
                continue;
            };
            let (records, stored_total) = ingest_bucket(bucket_raw, report);
            let bucket = ledger.ensure_bucket(year.clone(), month);
            bucket.contributions = records;
            bucket.recompute_total();
            if stored_total != Some(bucket.total) {
                report.repaired_totals += 1;
            }
        }
    }
    ledger
}

fn ingest_bucket(
    raw: Value,
    report: &mut SanitationReport,
) -> (Vec<ContributionRecord>, Option<i64>) {
    let Value::Object(mut bucket) = raw else {
        return (Vec::new(), None);
    };
    let stored_total = bucket.get("total").and_then(Value::as_i64);
    let mut records = Vec::new();
    if let Some(Value::Array(entries)) = bucket.remove("contributions") {
        for entry in entries {
            match coerce_record(entry) {
                Some(record) => records.push(record),
                None => report.dropped_records += 1,
            }
        }
    }
    (records, stored_total)
}

fn coerce_record(raw: Value) -> Option<ContributionRecord> {
    let name = raw.get("name")?.as_str()?.trim().to_string();
    if name.is_empty() {
        return None;
    }
    let amount = raw.get("amount")?.as_i64()?;
    if amount <= 0 {
        return None;
    }
    let paid = raw.get("paid").and_then(Value::as_bool).unwrap_or(false);
    Some(ContributionRecord { name, amount, paid })
}

/// Abstraction over the remote store. The core exchanges whole snapshots
/// and nothing else.
pub trait StorageBackend {
    fn save(&self, snapshot: &Snapshot) -> LedgerResult<()>;
    fn load(&self) -> LedgerResult<(Snapshot, SanitationReport)>;
}

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

/// Trailing-edge debounce for snapshot saves: every mutation restarts the
/// window, and a save becomes due once the window elapses after the most
/// recent one. Single-threaded poll model; no internal timers.
#[derive(Debug, Clone)]
pub struct SaveDebouncer {
    window: Duration,
    dirty_since: Option<Instant>,
}

impl SaveDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            dirty_since: None,
        }
    }

    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty_since = Some(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    pub fn due(&self, now: Instant) -> bool {
        self.dirty_since
            .map(|since| now.duration_since(since) >= self.window)
            .unwrap_or(false)
    }

    /// Saves the snapshot when a save is due; returns whether one ran.
    pub fn flush<B: StorageBackend>(
        &mut self,
        backend: &B,
        snapshot: &Snapshot,
        now: Instant,
    ) -> LedgerResult<bool> {
        if !self.due(now) {
            return Ok(false);
        }
        backend.save(snapshot)?;
        self.dirty_since = None;
        Ok(true)
    }
}

impl Default for SaveDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
