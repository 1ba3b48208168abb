//! Business logic for fundraising campaigns and their pledges.
//!
//! `amount_raised` is adjusted by delta in every mutation path; it is
//! never recomputed wholesale here.

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::actor::Actor;
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{Campaign, CampaignLedger, CampaignPledge, CampaignStatus};

/// Partial-update payload for a pledge. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PledgeUpdate {
    pub contributor_name: Option<String>,
    pub pledged_amount: Option<f64>,
    pub amount_paid: Option<f64>,
    pub notes: Option<String>,
}

/// Range-wide view across all campaigns. Ratios are raw and unclamped.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CampaignOverview {
    pub active_count: usize,
    pub resolved_count: usize,
    pub total_target: f64,
    pub total_raised: f64,
    pub total_paid: f64,
    pub raised_ratio: f64,
}

pub struct CampaignService;

impl CampaignService {
    /// Creates a campaign and returns its id. Campaigns start active with
    /// nothing raised.
    pub fn create(
        ledger: &mut CampaignLedger,
        actor: &Actor,
        purpose: &str,
        target_amount: f64,
        target_date: Option<NaiveDate>,
        reason: Option<String>,
        notes: Option<String>,
    ) -> LedgerResult<Uuid> {
        actor.ensure_can_write()?;
        if purpose.trim().is_empty() {
            return Err(LedgerError::Validation("purpose must not be empty".into()));
        }
        if target_amount <= 0.0 {
            return Err(LedgerError::Validation(format!(
                "target amount must be positive, got {}",
                target_amount
            )));
        }
        let mut campaign = Campaign::new(purpose.trim(), target_amount);
        campaign.target_date = target_date;
        campaign.reason = reason;
        campaign.notes = notes;
        let id = ledger.insert(campaign);
        debug!(%id, "campaign created");
        Ok(id)
    }

    /// Adds a pledge, incrementing the campaign's raised total.
    pub fn add_pledge(
        ledger: &mut CampaignLedger,
        actor: &Actor,
        campaign_id: Uuid,
        contributor_name: &str,
        pledged_amount: f64,
        amount_paid: f64,
        notes: Option<String>,
    ) -> LedgerResult<Uuid> {
        actor.ensure_can_write()?;
        if contributor_name.trim().is_empty() {
            return Err(LedgerError::Validation(
                "contributor name must not be empty".into(),
            ));
        }
        if pledged_amount <= 0.0 {
            return Err(LedgerError::Validation(format!(
                "pledged amount must be positive, got {}",
                pledged_amount
            )));
        }
        if amount_paid < 0.0 || amount_paid > pledged_amount {
            return Err(LedgerError::Validation(format!(
                "amount paid {} must be within 0 and the pledged {}",
                amount_paid, pledged_amount
            )));
        }
        let campaign = campaign_mut(ledger, campaign_id)?;
        let mut pledge = CampaignPledge::new(contributor_name.trim(), pledged_amount, amount_paid);
        pledge.notes = notes;
        let pledge_id = pledge.id;
        campaign.pledges.insert(pledge_id, pledge);
        campaign.amount_raised += pledged_amount;
        ledger.touch();
        Ok(pledge_id)
    }

    /// Adds a payment toward a pledge. A payment that would push the paid
    /// total past the pledged amount is rejected and leaves state unchanged.
    pub fn record_payment(
        ledger: &mut CampaignLedger,
        actor: &Actor,
        campaign_id: Uuid,
        pledge_id: Uuid,
        payment_amount: f64,
    ) -> LedgerResult<f64> {
        actor.ensure_can_write()?;
        if payment_amount <= 0.0 {
            return Err(LedgerError::Validation(format!(
                "payment must be positive, got {}",
                payment_amount
            )));
        }
        let campaign = campaign_mut(ledger, campaign_id)?;
        let pledge = pledge_mut(campaign, pledge_id)?;
        let new_total = pledge.amount_paid + payment_amount;
        if new_total > pledge.pledged_amount {
            return Err(LedgerError::Overpayment(format!(
                "payment of {} would bring paid to {}, over the pledged {}",
                payment_amount, new_total, pledge.pledged_amount
            )));
        }
        pledge.amount_paid = new_total;
        ledger.touch();
        Ok(new_total)
    }

    /// Applies a partial update. A pledged-amount change adjusts the
    /// campaign's raised total by the delta.
    pub fn update_pledge(
        ledger: &mut CampaignLedger,
        actor: &Actor,
        campaign_id: Uuid,
        pledge_id: Uuid,
        updates: PledgeUpdate,
    ) -> LedgerResult<()> {
        actor.ensure_can_write()?;
        let campaign = campaign_mut(ledger, campaign_id)?;
        let pledge = pledge_mut(campaign, pledge_id)?;

        let new_pledged = updates.pledged_amount.unwrap_or(pledge.pledged_amount);
        let new_paid = updates.amount_paid.unwrap_or(pledge.amount_paid);
        if new_pledged <= 0.0 {
            return Err(LedgerError::Validation(format!(
                "pledged amount must be positive, got {}",
                new_pledged
            )));
        }
        if new_paid < 0.0 || new_paid > new_pledged {
            return Err(LedgerError::Validation(format!(
                "amount paid {} must be within 0 and the pledged {}",
                new_paid, new_pledged
            )));
        }
        if let Some(name) = &updates.contributor_name {
            if name.trim().is_empty() {
                return Err(LedgerError::Validation(
                    "contributor name must not be empty".into(),
                ));
            }
        }

        let delta = new_pledged - pledge.pledged_amount;
        pledge.pledged_amount = new_pledged;
        pledge.amount_paid = new_paid;
        if let Some(name) = updates.contributor_name {
            pledge.contributor_name = name.trim().to_string();
        }
        if let Some(notes) = updates.notes {
            pledge.notes = Some(notes);
        }
        campaign.amount_raised += delta;
        ledger.touch();
        Ok(())
    }

    /// Removes a pledge, decrementing the raised total first.
    pub fn remove_pledge(
        ledger: &mut CampaignLedger,
        actor: &Actor,
        campaign_id: Uuid,
        pledge_id: Uuid,
    ) -> LedgerResult<CampaignPledge> {
        actor.ensure_can_write()?;
        let campaign = campaign_mut(ledger, campaign_id)?;
        let pledge = campaign.pledges.remove(&pledge_id).ok_or_else(|| {
            LedgerError::NotFound(format!("no pledge {} in campaign", pledge_id))
        })?;
        campaign.amount_raised -= pledge.pledged_amount;
        ledger.touch();
        Ok(pledge)
    }

    /// Removes a campaign and all its pledges as one operation.
    pub fn remove_campaign(
        ledger: &mut CampaignLedger,
        actor: &Actor,
        campaign_id: Uuid,
    ) -> LedgerResult<Campaign> {
        actor.ensure_can_write()?;
        let campaign = ledger
            .campaigns
            .remove(&campaign_id)
            .ok_or_else(|| LedgerError::NotFound(format!("no campaign {}", campaign_id)))?;
        ledger.touch();
        debug!(id = %campaign_id, pledges = campaign.pledges.len(), "campaign removed");
        Ok(campaign)
    }

    pub fn resolve(
        ledger: &mut CampaignLedger,
        actor: &Actor,
        campaign_id: Uuid,
    ) -> LedgerResult<()> {
        Self::set_status(ledger, actor, campaign_id, CampaignStatus::Resolved)
    }

    pub fn reopen(
        ledger: &mut CampaignLedger,
        actor: &Actor,
        campaign_id: Uuid,
    ) -> LedgerResult<()> {
        Self::set_status(ledger, actor, campaign_id, CampaignStatus::Active)
    }

    fn set_status(
        ledger: &mut CampaignLedger,
        actor: &Actor,
        campaign_id: Uuid,
        status: CampaignStatus,
    ) -> LedgerResult<()> {
        actor.ensure_can_write()?;
        let campaign = campaign_mut(ledger, campaign_id)?;
        campaign.status = status;
        ledger.touch();
        Ok(())
    }

    /// Aggregates all campaigns into one overview. Pure.
    pub fn overview(ledger: &CampaignLedger) -> CampaignOverview {
        let mut overview = CampaignOverview::default();
        for campaign in ledger.campaigns.values() {
            match campaign.status {
                CampaignStatus::Active => overview.active_count += 1,
                CampaignStatus::Resolved => overview.resolved_count += 1,
            }
            overview.total_target += campaign.target_amount;
            overview.total_raised += campaign.amount_raised;
            overview.total_paid += campaign.total_paid();
        }
        if overview.total_target > 0.0 {
            overview.raised_ratio = overview.total_raised / overview.total_target;
        }
        overview
    }
}

fn campaign_mut(ledger: &mut CampaignLedger, id: Uuid) -> LedgerResult<&mut Campaign> {
    ledger
        .campaign_mut(id)
        .ok_or_else(|| LedgerError::NotFound(format!("no campaign {}", id)))
}

fn pledge_mut(campaign: &mut Campaign, id: Uuid) -> LedgerResult<&mut CampaignPledge> {
    campaign
        .pledges
        .get_mut(&id)
        .ok_or_else(|| LedgerError::NotFound(format!("no pledge {} in campaign", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Role;

    fn admin() -> Actor {
        Actor::new("ops", Role::Admin)
    }

    fn campaign_with_pledge(pledged: f64, paid: f64) -> (CampaignLedger, Uuid, Uuid) {
        let mut ledger = CampaignLedger::new();
        let campaign_id =
            CampaignService::create(&mut ledger, &admin(), "New roof", 5000.0, None, None, None)
                .unwrap();
        let pledge_id = CampaignService::add_pledge(
            &mut ledger,
            &admin(),
            campaign_id,
            "Amina",
            pledged,
            paid,
            None,
        )
        .unwrap();
        (ledger, campaign_id, pledge_id)
    }

    #[test]
    fn create_requires_positive_target() {
        let mut ledger = CampaignLedger::new();
        let err = CampaignService::create(&mut ledger, &admin(), "Roof", 0.0, None, None, None)
            .expect_err("zero target must fail");
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn add_pledge_increments_raised() {
        let (ledger, campaign_id, _) = campaign_with_pledge(400.0, 100.0);
        let campaign = ledger.campaign(campaign_id).unwrap();
        assert_eq!(campaign.amount_raised, 400.0);
        assert!(campaign.verify_raised_total());
    }

    #[test]
    fn add_pledge_rejects_paid_over_pledged() {
        let mut ledger = CampaignLedger::new();
        let campaign_id =
            CampaignService::create(&mut ledger, &admin(), "Well", 1000.0, None, None, None)
                .unwrap();
        let err = CampaignService::add_pledge(
            &mut ledger,
            &admin(),
            campaign_id,
            "Kofi",
            200.0,
            250.0,
            None,
        )
        .expect_err("paid over pledged must fail");
        assert!(matches!(err, LedgerError::Validation(_)));
        assert_eq!(ledger.campaign(campaign_id).unwrap().amount_raised, 0.0);
    }

    #[test]
    fn add_pledge_to_unknown_campaign_is_not_found() {
        let mut ledger = CampaignLedger::new();
        let err = CampaignService::add_pledge(
            &mut ledger,
            &admin(),
            Uuid::new_v4(),
            "Kofi",
            200.0,
            0.0,
            None,
        )
        .expect_err("unknown campaign");
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[test]
    fn record_payment_accumulates_within_pledge() {
        let (mut ledger, campaign_id, pledge_id) = campaign_with_pledge(400.0, 100.0);
        let total =
            CampaignService::record_payment(&mut ledger, &admin(), campaign_id, pledge_id, 150.0)
                .unwrap();
        assert_eq!(total, 250.0);
    }

    #[test]
    fn overpayment_is_rejected_and_state_unchanged() {
        let (mut ledger, campaign_id, pledge_id) = campaign_with_pledge(400.0, 300.0);
        let err =
            CampaignService::record_payment(&mut ledger, &admin(), campaign_id, pledge_id, 200.0)
                .expect_err("overpayment must fail");
        assert!(matches!(err, LedgerError::Overpayment(_)));
        let pledge = &ledger.campaign(campaign_id).unwrap().pledges[&pledge_id];
        assert_eq!(pledge.amount_paid, 300.0);
        assert_eq!(pledge.pledged_amount, 400.0);
    }

    #[test]
    fn update_pledge_adjusts_raised_by_delta() {
        let (mut ledger, campaign_id, pledge_id) = campaign_with_pledge(400.0, 100.0);
        CampaignService::update_pledge(
            &mut ledger,
            &admin(),
            campaign_id,
            pledge_id,
            PledgeUpdate {
                pledged_amount: Some(600.0),
                ..PledgeUpdate::default()
            },
        )
        .unwrap();
        let campaign = ledger.campaign(campaign_id).unwrap();
        assert_eq!(campaign.amount_raised, 600.0);
        assert!(campaign.verify_raised_total());

        // Shrinking below the already-paid amount must be refused.
        let err = CampaignService::update_pledge(
            &mut ledger,
            &admin(),
            campaign_id,
            pledge_id,
            PledgeUpdate {
                pledged_amount: Some(50.0),
                ..PledgeUpdate::default()
            },
        )
        .expect_err("paid would exceed pledged");
        assert!(matches!(err, LedgerError::Validation(_)));
        assert_eq!(ledger.campaign(campaign_id).unwrap().amount_raised, 600.0);
    }

    #[test]
    fn remove_pledge_and_campaign_keep_raised_consistent() {
        let (mut ledger, campaign_id, pledge_id) = campaign_with_pledge(400.0, 0.0);
        CampaignService::add_pledge(
            &mut ledger,
            &admin(),
            campaign_id,
            "Kofi",
            250.0,
            0.0,
            None,
        )
        .unwrap();
        let removed =
            CampaignService::remove_pledge(&mut ledger, &admin(), campaign_id, pledge_id).unwrap();
        assert_eq!(removed.pledged_amount, 400.0);
        let campaign = ledger.campaign(campaign_id).unwrap();
        assert_eq!(campaign.amount_raised, 250.0);
        assert!(campaign.verify_raised_total());

        let removed_campaign =
            CampaignService::remove_campaign(&mut ledger, &admin(), campaign_id).unwrap();
        assert_eq!(removed_campaign.pledges.len(), 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn resolve_and_reopen_flip_status() {
        let (mut ledger, campaign_id, _) = campaign_with_pledge(400.0, 0.0);
        CampaignService::resolve(&mut ledger, &admin(), campaign_id).unwrap();
        assert_eq!(
            ledger.campaign(campaign_id).unwrap().status,
            CampaignStatus::Resolved
        );
        CampaignService::reopen(&mut ledger, &admin(), campaign_id).unwrap();
        assert_eq!(
            ledger.campaign(campaign_id).unwrap().status,
            CampaignStatus::Active
        );
    }

    #[test]
    fn overview_totals_span_all_campaigns() {
        let (mut ledger, first, _) = campaign_with_pledge(400.0, 100.0);
        let second =
            CampaignService::create(&mut ledger, &admin(), "Van", 2000.0, None, None, None)
                .unwrap();
        CampaignService::add_pledge(&mut ledger, &admin(), second, "Kofi", 500.0, 500.0, None)
            .unwrap();
        CampaignService::resolve(&mut ledger, &admin(), first).unwrap();

        let overview = CampaignService::overview(&ledger);
        assert_eq!(overview.active_count, 1);
        assert_eq!(overview.resolved_count, 1);
        assert_eq!(overview.total_target, 7000.0);
        assert_eq!(overview.total_raised, 900.0);
        assert_eq!(overview.total_paid, 600.0);
        assert!((overview.raised_ratio - 900.0 / 7000.0).abs() < 1e-12);
    }
}
