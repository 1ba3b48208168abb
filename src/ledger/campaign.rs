use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Resolved,
}

/// One contributor's pledge toward a campaign.
///
/// Invariant: `0 <= amount_paid <= pledged_amount` at all times; writes
/// that would break it are rejected before any state changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignPledge {
    pub id: Uuid,
    pub contributor_name: String,
    pub pledged_amount: f64,
    pub amount_paid: f64,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CampaignPledge {
    pub fn new(contributor_name: impl Into<String>, pledged_amount: f64, amount_paid: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            contributor_name: contributor_name.into(),
            pledged_amount,
            amount_paid,
            date: Utc::now(),
            notes: None,
        }
    }

    pub fn outstanding(&self) -> f64 {
        self.pledged_amount - self.amount_paid
    }
}

/// An ad-hoc fundraising campaign and its pledges.
///
/// `amount_raised` is maintained by delta on every pledge mutation, never
/// recomputed wholesale in the mutation path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub id: Uuid,
    pub purpose: String,
    pub target_amount: f64,
    pub amount_raised: f64,
    pub date_created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: CampaignStatus,
    #[serde(default)]
    pub pledges: BTreeMap<Uuid, CampaignPledge>,
}

impl Campaign {
    pub fn new(purpose: impl Into<String>, target_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            purpose: purpose.into(),
            target_amount,
            amount_raised: 0.0,
            date_created: Utc::now(),
            target_date: None,
            reason: None,
            notes: None,
            status: CampaignStatus::Active,
            pledges: BTreeMap::new(),
        }
    }

    pub fn total_paid(&self) -> f64 {
        self.pledges.values().map(|pledge| pledge.amount_paid).sum()
    }

    /// Raw pledged-vs-target ratio, unclamped. Summary math uses this.
    pub fn raw_pledge_ratio(&self) -> f64 {
        if self.target_amount > 0.0 {
            self.amount_raised / self.target_amount
        } else {
            0.0
        }
    }

    /// Raw paid-vs-pledged ratio, unclamped.
    pub fn raw_paid_ratio(&self) -> f64 {
        if self.amount_raised > 0.0 {
            self.total_paid() / self.amount_raised
        } else {
            0.0
        }
    }

    /// Pledge progress as a whole percentage, clamped to 0..=100 for display.
    pub fn pledge_progress(&self) -> u8 {
        clamp_percent(self.raw_pledge_ratio())
    }

    /// Paid progress as a whole percentage, clamped to 0..=100 for display.
    pub fn paid_progress(&self) -> u8 {
        clamp_percent(self.raw_paid_ratio())
    }

    /// Recomputes the raised total from the pledges. Exists for tests and
    /// debug assertions; production reads trust the delta-maintained field.
    pub fn verify_raised_total(&self) -> bool {
        let recomputed: f64 = self
            .pledges
            .values()
            .map(|pledge| pledge.pledged_amount)
            .sum();
        (recomputed - self.amount_raised).abs() < 1e-6
    }
}

fn clamp_percent(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// All campaigns, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CampaignLedger {
    #[serde(default)]
    pub campaigns: BTreeMap<Uuid, Campaign>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl CampaignLedger {
    pub fn new() -> Self {
        Self {
            campaigns: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn insert(&mut self, campaign: Campaign) -> Uuid {
        let id = campaign.id;
        self.campaigns.insert(id, campaign);
        self.touch();
        id
    }

    pub fn campaign(&self, id: Uuid) -> Option<&Campaign> {
        self.campaigns.get(&id)
    }

    pub fn campaign_mut(&mut self, id: Uuid) -> Option<&mut Campaign> {
        self.campaigns.get_mut(&id)
    }

    /// Campaigns ordered by creation date, oldest first.
    pub fn by_creation_date(&self) -> Vec<&Campaign> {
        let mut all: Vec<&Campaign> = self.campaigns.values().collect();
        all.sort_by(|a, b| a.date_created.cmp(&b.date_created));
        all
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped_but_ratios_are_raw() {
        let mut campaign = Campaign::new("Roof repair", 1000.0);
        campaign.amount_raised = 1500.0;
        assert_eq!(campaign.pledge_progress(), 100);
        assert!((campaign.raw_pledge_ratio() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn verify_raised_total_detects_drift() {
        let mut campaign = Campaign::new("Well", 5000.0);
        let pledge = CampaignPledge::new("Amina", 400.0, 0.0);
        campaign.pledges.insert(pledge.id, pledge);
        campaign.amount_raised = 400.0;
        assert!(campaign.verify_raised_total());
        campaign.amount_raised = 300.0;
        assert!(!campaign.verify_raised_total());
    }
}
