pub mod budget_service;
pub mod campaign_service;
pub mod contribution_service;

pub use budget_service::{BalanceSheet, BudgetService, ExpenseUpdate};
pub use campaign_service::{CampaignOverview, CampaignService, PledgeUpdate};
pub use contribution_service::{CarryForwardOutcome, ContributionService};
