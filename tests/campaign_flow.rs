mod common;

use common::admin;
use contribution_core::core::services::{CampaignService, PledgeUpdate};
use contribution_core::errors::LedgerError;
use contribution_core::ledger::CampaignLedger;

#[test]
fn raised_total_stays_consistent_through_pledge_lifecycle() {
    let mut ledger = CampaignLedger::new();
    let campaign_id = CampaignService::create(
        &mut ledger,
        &admin(),
        "Community well",
        10_000.0,
        None,
        Some("Borehole ran dry".into()),
        None,
    )
    .unwrap();

    let amina = CampaignService::add_pledge(
        &mut ledger, &admin(), campaign_id, "Amina", 2_000.0, 500.0, None,
    )
    .unwrap();
    let kofi = CampaignService::add_pledge(
        &mut ledger, &admin(), campaign_id, "Kofi", 1_500.0, 0.0, None,
    )
    .unwrap();
    assert!(ledger.campaign(campaign_id).unwrap().verify_raised_total());

    CampaignService::update_pledge(
        &mut ledger,
        &admin(),
        campaign_id,
        amina,
        PledgeUpdate {
            pledged_amount: Some(2_500.0),
            ..PledgeUpdate::default()
        },
    )
    .unwrap();
    assert!(ledger.campaign(campaign_id).unwrap().verify_raised_total());

    CampaignService::remove_pledge(&mut ledger, &admin(), campaign_id, kofi).unwrap();
    let campaign = ledger.campaign(campaign_id).unwrap();
    assert!(campaign.verify_raised_total());
    assert_eq!(campaign.amount_raised, 2_500.0);
}

#[test]
fn payments_accumulate_and_never_exceed_the_pledge() {
    let mut ledger = CampaignLedger::new();
    let campaign_id =
        CampaignService::create(&mut ledger, &admin(), "Roof", 5_000.0, None, None, None).unwrap();
    let pledge_id = CampaignService::add_pledge(
        &mut ledger, &admin(), campaign_id, "Wanjiru", 1_000.0, 0.0, None,
    )
    .unwrap();

    CampaignService::record_payment(&mut ledger, &admin(), campaign_id, pledge_id, 400.0).unwrap();
    CampaignService::record_payment(&mut ledger, &admin(), campaign_id, pledge_id, 600.0).unwrap();

    let err = CampaignService::record_payment(&mut ledger, &admin(), campaign_id, pledge_id, 0.01)
        .expect_err("pledge is already fully paid");
    assert!(matches!(err, LedgerError::Overpayment(_)));

    let pledge = &ledger.campaign(campaign_id).unwrap().pledges[&pledge_id];
    assert_eq!(pledge.amount_paid, 1_000.0);
    assert_eq!(pledge.outstanding(), 0.0);
}

#[test]
fn progress_views_clamp_for_display_only() {
    let mut ledger = CampaignLedger::new();
    let campaign_id =
        CampaignService::create(&mut ledger, &admin(), "Van", 1_000.0, None, None, None).unwrap();
    CampaignService::add_pledge(
        &mut ledger, &admin(), campaign_id, "Amina", 1_500.0, 1_500.0, None,
    )
    .unwrap();

    let campaign = ledger.campaign(campaign_id).unwrap();
    assert_eq!(campaign.pledge_progress(), 100);
    assert!(campaign.raw_pledge_ratio() > 1.0);

    let overview = CampaignService::overview(&ledger);
    assert!((overview.raised_ratio - 1.5).abs() < 1e-12);
}

#[test]
fn removing_a_campaign_discards_all_pledges_at_once() {
    let mut ledger = CampaignLedger::new();
    let keep =
        CampaignService::create(&mut ledger, &admin(), "Keep", 500.0, None, None, None).unwrap();
    let drop =
        CampaignService::create(&mut ledger, &admin(), "Drop", 800.0, None, None, None).unwrap();
    CampaignService::add_pledge(&mut ledger, &admin(), drop, "Amina", 100.0, 0.0, None).unwrap();
    CampaignService::add_pledge(&mut ledger, &admin(), drop, "Kofi", 200.0, 0.0, None).unwrap();

    let removed = CampaignService::remove_campaign(&mut ledger, &admin(), drop).unwrap();
    assert_eq!(removed.pledges.len(), 2);
    assert_eq!(ledger.len(), 1);
    assert!(ledger.campaign(keep).is_some());
    assert!(matches!(
        CampaignService::remove_campaign(&mut ledger, &admin(), drop),
        Err(LedgerError::NotFound(_))
    ));
}
