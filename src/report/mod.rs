//! The reporting engine: pure, deterministic report builders over ledger
//! snapshots and an inclusive month range.
//!
//! Each report kind is a closed variant with its own row and summary
//! shapes; nothing here mutates a ledger.

pub mod all_members;
pub mod expected;
pub mod individual;
pub mod month_range;

pub use all_members::{all_members_report, AllMembersReport, AllMembersSummary, MemberTotalsRow};
pub use expected::{
    expected_members_report, ExpectedMember, ExpectedMemberRow, ExpectedMembersReport,
    ExpectedSummary,
};
pub use individual::{
    individual_report, IndividualReport, IndividualRow, IndividualSummary, RowStatus,
    StatusFilter,
};
pub use month_range::{month_range_report, MonthRangeReport, MonthRangeSummary, MonthTotalsRow};

use serde::Serialize;

/// A finished report of any kind, ready to hand to a rendering or export
/// layer as plain data.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Report {
    Individual(IndividualReport),
    AllMembers(AllMembersReport),
    ExpectedMembers(ExpectedMembersReport),
    MonthRange(MonthRangeReport),
}

impl Report {
    pub fn title(&self) -> &str {
        match self {
            Report::Individual(report) => &report.title,
            Report::AllMembers(report) => &report.title,
            Report::ExpectedMembers(report) => &report.title,
            Report::MonthRange(report) => &report.title,
        }
    }

    pub fn subtitle(&self) -> &str {
        match self {
            Report::Individual(report) => &report.subtitle,
            Report::AllMembers(report) => &report.subtitle,
            Report::ExpectedMembers(report) => &report.subtitle,
            Report::MonthRange(report) => &report.subtitle,
        }
    }
}
