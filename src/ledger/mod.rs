//! Ledger aggregates: contributions, blacklist, campaigns, and expenses.
//!
//! Aggregates are plain mutable values passed explicitly to the service
//! layer; there are no module-level singletons.

pub mod blacklist;
pub mod budget;
pub mod campaign;
pub mod contribution;

pub use blacklist::BlacklistRegistry;
pub use budget::{BudgetLedger, Expense};
pub use campaign::{Campaign, CampaignLedger, CampaignPledge, CampaignStatus};
pub use contribution::{
    normalize_name, ContributionLedger, ContributionRecord, ContributionTotals, MonthBucket,
};
