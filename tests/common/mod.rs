//! Shared fixtures for the integration suites.

use contribution_core::actor::{Actor, Role};
use contribution_core::calendar::{MonthName, MonthRange, YearKey};
use contribution_core::core::services::ContributionService;
use contribution_core::ledger::{BlacklistRegistry, ContributionLedger};

pub fn admin() -> Actor {
    Actor::new("ops", Role::Admin)
}

pub fn year(raw: &str) -> YearKey {
    YearKey::parse(raw).expect("4-digit year")
}

pub fn range(start: MonthName, start_year: &str, end: MonthName, end_year: &str) -> MonthRange {
    MonthRange::new(start, year(start_year), end, year(end_year)).expect("valid range")
}

pub fn add_contribution(
    ledger: &mut ContributionLedger,
    blacklist: &BlacklistRegistry,
    y: &str,
    month: MonthName,
    name: &str,
    amount: i64,
    paid: bool,
) {
    ContributionService::add(ledger, blacklist, &admin(), year(y), month, name, amount, paid)
        .expect("valid contribution");
}
