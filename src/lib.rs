#![doc(test(attr(deny(warnings))))]

//! Contribution Core tracks periodic member contributions, fundraising
//! campaigns, and expense budgets for a small organization, and produces
//! financial reports over arbitrary month ranges.
//!
//! Ledgers are plain mutable aggregates passed explicitly to stateless
//! services; reads never block on writes, and the persistence gateway
//! exchanges whole snapshots with a debounced save.

pub mod actor;
pub mod calendar;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod report;
pub mod storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::from_default_env()
            .add_directive("contribution_core=info".parse().expect("valid directive"));
        fmt().with_env_filter(filter).init();
        tracing::info!("Contribution Core tracing initialized.");
    });
}
