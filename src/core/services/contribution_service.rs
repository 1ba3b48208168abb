//! Business logic for the periodic contribution ledger.

use tracing::debug;

use crate::actor::Actor;
use crate::calendar::{MonthName, YearKey};
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{
    normalize_name, BlacklistRegistry, ContributionLedger, ContributionRecord,
    ContributionTotals,
};

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;
pub const AMOUNT_MIN: i64 = 1;
pub const AMOUNT_MAX: i64 = 1_000_000;

/// What a carry-forward run did to the target month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarryForwardOutcome {
    /// True when the target bucket did not exist before the call.
    pub created: bool,
    /// Records written into a new or overwritten bucket.
    pub seeded: usize,
    /// Records appended by an additive merge into an existing bucket.
    pub appended: usize,
    /// Source records dropped because their member is now blacklisted.
    pub skipped_blacklisted: usize,
}

/// Validated mutations and aggregations over a [`ContributionLedger`].
pub struct ContributionService;

impl ContributionService {
    /// Adds a contribution record, recomputing the bucket total.
    pub fn add(
        ledger: &mut ContributionLedger,
        blacklist: &BlacklistRegistry,
        actor: &Actor,
        year: YearKey,
        month: MonthName,
        name: &str,
        amount: i64,
        paid: bool,
    ) -> LedgerResult<()> {
        actor.ensure_can_write()?;
        let name = validate_name(name)?;
        validate_amount(amount)?;
        ensure_not_blacklisted(blacklist, &name)?;
        let bucket = ledger.ensure_bucket(year.clone(), month);
        bucket.contributions.push(ContributionRecord { name, amount, paid });
        bucket.recompute_total();
        ledger.touch();
        debug!(%year, %month, amount, "contribution added");
        Ok(())
    }

    /// Edits the record at `index`. The blacklist is consulted only when
    /// the member name actually changed.
    pub fn edit(
        ledger: &mut ContributionLedger,
        blacklist: &BlacklistRegistry,
        actor: &Actor,
        year: &YearKey,
        month: MonthName,
        index: usize,
        name: &str,
        amount: i64,
        paid: bool,
    ) -> LedgerResult<()> {
        actor.ensure_can_write()?;
        let name = validate_name(name)?;
        validate_amount(amount)?;
        let bucket = ledger
            .bucket_mut(year, month)
            .ok_or_else(|| missing_month(year, month))?;
        let record = bucket.contributions.get_mut(index).ok_or_else(|| {
            LedgerError::NotFound(format!(
                "no contribution at index {} in {} {}",
                index, month, year
            ))
        })?;
        if normalize_name(&record.name) != normalize_name(&name) {
            ensure_not_blacklisted(blacklist, &name)?;
        }
        record.name = name;
        record.amount = amount;
        record.paid = paid;
        bucket.recompute_total();
        ledger.touch();
        Ok(())
    }

    /// Removes the record at `index` and returns it.
    pub fn remove(
        ledger: &mut ContributionLedger,
        actor: &Actor,
        year: &YearKey,
        month: MonthName,
        index: usize,
    ) -> LedgerResult<ContributionRecord> {
        actor.ensure_can_write()?;
        let bucket = ledger
            .bucket_mut(year, month)
            .ok_or_else(|| missing_month(year, month))?;
        if index >= bucket.contributions.len() {
            return Err(LedgerError::NotFound(format!(
                "no contribution at index {} in {} {}",
                index, month, year
            )));
        }
        let removed = bucket.contributions.remove(index);
        bucket.recompute_total();
        ledger.touch();
        Ok(removed)
    }

    /// Flips the paid flag of the record at `index`; returns the new state.
    pub fn toggle_paid(
        ledger: &mut ContributionLedger,
        actor: &Actor,
        year: &YearKey,
        month: MonthName,
        index: usize,
    ) -> LedgerResult<bool> {
        actor.ensure_can_write()?;
        let bucket = ledger
            .bucket_mut(year, month)
            .ok_or_else(|| missing_month(year, month))?;
        let record = bucket.contributions.get_mut(index).ok_or_else(|| {
            LedgerError::NotFound(format!(
                "no contribution at index {} in {} {}",
                index, month, year
            ))
        })?;
        record.paid = !record.paid;
        let paid = record.paid;
        bucket.recompute_total();
        ledger.touch();
        Ok(paid)
    }

    /// Monthly setup: seeds the target month from the most recent populated
    /// bucket anywhere before it, skipping now-blacklisted members.
    ///
    /// When the month already exists, `overwrite = true` replaces the
    /// bucket wholesale; `overwrite = false` appends only members missing
    /// from it, leaving existing records and their paid flags untouched.
    /// Operators re-run monthly setup after partial manual entry, so the
    /// additive path must never lose recorded payments.
    pub fn carry_forward(
        ledger: &mut ContributionLedger,
        blacklist: &BlacklistRegistry,
        actor: &Actor,
        year: YearKey,
        month: MonthName,
        overwrite: bool,
    ) -> LedgerResult<CarryForwardOutcome> {
        actor.ensure_can_write()?;
        let mut outcome = CarryForwardOutcome {
            created: !ledger.contains_month(&year, month),
            ..CarryForwardOutcome::default()
        };

        let mut carried: Vec<ContributionRecord> = Vec::new();
        if let Some((source_year, source_month, bucket)) =
            ledger.latest_populated_before(&year, month)
        {
            debug!(
                source = %format!("{} {}", source_month, source_year),
                target = %format!("{} {}", month, year),
                "carry-forward source selected"
            );
            for record in &bucket.contributions {
                if blacklist.contains(&record.name) {
                    outcome.skipped_blacklisted += 1;
                    continue;
                }
                // New month starts with nothing collected.
                carried.push(ContributionRecord {
                    name: record.name.clone(),
                    amount: record.amount,
                    paid: false,
                });
            }
        }

        if outcome.created || overwrite {
            let bucket = ledger.ensure_bucket(year, month);
            outcome.seeded = carried.len();
            bucket.contributions = carried;
            bucket.recompute_total();
        } else {
            let bucket = ledger.ensure_bucket(year, month);
            for record in carried {
                let already_present = bucket
                    .contributions
                    .iter()
                    .any(|existing| {
                        normalize_name(&existing.name) == normalize_name(&record.name)
                    });
                if !already_present {
                    bucket.contributions.push(record);
                    outcome.appended += 1;
                }
            }
            bucket.recompute_total();
        }
        ledger.touch();
        Ok(outcome)
    }

    /// Paid/unpaid breakdown for one month. Pure; missing months yield
    /// zeroed totals.
    pub fn month_totals(
        ledger: &ContributionLedger,
        year: &YearKey,
        month: MonthName,
    ) -> ContributionTotals {
        ledger
            .bucket(year, month)
            .map(|bucket| bucket.totals())
            .unwrap_or_default()
    }

    /// Paid/unpaid breakdown across every month of one year. Pure.
    pub fn yearly_totals(ledger: &ContributionLedger, year: &YearKey) -> ContributionTotals {
        let mut totals = ContributionTotals::default();
        if let Some(months) = ledger.years.get(year) {
            for bucket in months.values() {
                totals.accumulate(bucket);
            }
        }
        totals
    }
}

fn validate_name(raw: &str) -> LedgerResult<String> {
    let name = raw.trim();
    let len = name.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(LedgerError::Validation(format!(
            "name must be {} to {} characters, got {}",
            NAME_MIN_LEN, NAME_MAX_LEN, len
        )));
    }
    Ok(name.to_string())
}

fn validate_amount(amount: i64) -> LedgerResult<()> {
    if !(AMOUNT_MIN..=AMOUNT_MAX).contains(&amount) {
        return Err(LedgerError::Validation(format!(
            "amount must be between {} and {}, got {}",
            AMOUNT_MIN, AMOUNT_MAX, amount
        )));
    }
    Ok(())
}

fn ensure_not_blacklisted(blacklist: &BlacklistRegistry, name: &str) -> LedgerResult<()> {
    if blacklist.contains(name) {
        Err(LedgerError::Validation(format!(
            "`{}` is blacklisted",
            name
        )))
    } else {
        Ok(())
    }
}

fn missing_month(year: &YearKey, month: MonthName) -> LedgerError {
    LedgerError::NotFound(format!("no bucket for {} {}", month, year))
}
