use super::{setup, START, UNLOCK_TIME};
use crate::{
    Error, ManagementFeeMintedEvent, StrategyReportedEvent, UpdateProfitMaxUnlockTimeEvent,
    SECONDS_PER_YEAR,
};
use soroban_sdk::{testutils::Address as _, Address};

// ============================================
// GAINS & PROFIT UNLOCK
// ============================================

#[test]
fn test_gain_is_locked_then_released() {
    let s = setup();
    let (user, strategy) = s.funded_strategy(1_000);
    s.airdrop_gain(&strategy, 100);

    let (gain, loss) = s.vault.process_report(&s.gov, &strategy.address);
    assert_eq!(
        s.last_event::<StrategyReportedEvent>("strategy_reported"),
        Some(StrategyReportedEvent {
            strategy: strategy.address.clone(),
            gain: 100,
            loss: 0,
            current_debt: 1_100,
            protocol_fees: 0,
            total_fees: 0,
            total_refunds: 0,
        })
    );

    assert_eq!((gain, loss), (100, 0));
    assert_eq!(s.vault.strategies(&strategy.address).current_debt, 1_100);
    assert_eq!(s.vault.total_debt(), 1_100);
    assert_eq!(s.vault.total_assets(), 1_100);

    // Profit is fully locked at first, the price does not jump
    assert_eq!(s.vault.total_supply(), 1_100);
    assert_eq!(s.vault.balance(&s.vault.address), 100);
    assert_eq!(s.vault.price_per_share(), 10_000_000);
    assert_eq!(s.vault.full_profit_unlock_date(), START + UNLOCK_TIME);
    assert_eq!(s.vault.profit_unlocking_rate(), 10_000_000_000);
    assert_eq!(s.vault.last_profit_update(), START);

    s.advance(UNLOCK_TIME / 2);
    assert_eq!(s.vault.unlocked_shares(), 50);
    assert_eq!(s.vault.balance(&s.vault.address), 50);
    assert_eq!(s.vault.total_supply(), 1_050);
    assert_eq!(s.vault.convert_to_assets(&1_000), 1_047);
    assert_eq!(s.vault.price_per_share(), 10_476_190);

    s.advance(UNLOCK_TIME / 2);
    assert_eq!(s.vault.unlocked_shares(), 100);
    assert_eq!(s.vault.total_supply(), 1_000);
    assert_eq!(s.vault.price_per_share(), 11_000_000);

    assert_eq!(s.vault.redeem(&user, &1_000, &user, &user), 1_100);
    assert_eq!(s.asset.balance(&user), 1_100);
    assert_eq!(s.vault.total_assets(), 0);
    assert_eq!(s.vault.total_supply(), 0);
}

#[test]
fn test_catch_up_burns_released_shares() {
    let s = setup();
    let (_, strategy) = s.funded_strategy(1_000);
    s.airdrop_gain(&strategy, 100);
    s.vault.process_report(&s.gov, &strategy.address);

    s.advance(UNLOCK_TIME / 4);
    // Any mutating call settles the released shares
    s.vault.set_minimum_total_idle(&s.gov, &0);

    assert_eq!(s.vault.unlocked_shares(), 0);
    assert_eq!(s.vault.balance(&s.vault.address), 75);
    assert_eq!(s.vault.last_profit_update(), START + UNLOCK_TIME / 4);
    assert_eq!(s.vault.total_supply(), 1_075);
    assert_eq!(s.vault.full_profit_unlock_date(), START + UNLOCK_TIME);
}

#[test]
fn test_price_holds_after_full_unlock() {
    let s = setup();
    let (_, strategy) = s.funded_strategy(1_000);
    s.airdrop_gain(&strategy, 1_000);
    s.vault.process_report(&s.gov, &strategy.address);
    assert_eq!(s.vault.price_per_share(), 10_000_000);

    s.advance(UNLOCK_TIME);
    assert_eq!(s.vault.price_per_share(), 20_000_000);

    for _ in 0..3 {
        s.advance(UNLOCK_TIME * 7);
        assert_eq!(s.vault.price_per_share(), 20_000_000);

        s.vault.set_minimum_total_idle(&s.gov, &0);
        assert_eq!(s.vault.unlocked_shares(), 0);
        assert_eq!(s.vault.balance(&s.vault.address), 0);
        assert_eq!(s.vault.total_supply(), 1_000);
        assert_eq!(s.vault.price_per_share(), 20_000_000);
    }
}

#[test]
fn test_conversions_round_trip_at_price() {
    let s = setup();
    let (_, strategy) = s.funded_strategy(1_000);
    s.airdrop_gain(&strategy, 1_000);
    s.vault.process_report(&s.gov, &strategy.address);
    s.advance(UNLOCK_TIME);

    for x in [1i128, 3, 7, 999, 12_345] {
        let back = s.vault.convert_to_assets(&s.vault.convert_to_shares(&x));
        assert!(back <= x);
        assert!(x <= back + 1);
    }
}

#[test]
fn test_second_gain_extends_schedule() {
    let s = setup();
    let (_, strategy) = s.funded_strategy(1_000);
    s.airdrop_gain(&strategy, 100);
    s.vault.process_report(&s.gov, &strategy.address);

    s.advance(UNLOCK_TIME / 2);
    s.airdrop_gain(&strategy, 105);
    s.vault.process_report(&s.gov, &strategy.address);

    // 50 old shares keep 5_000s, 100 new shares get the full window
    let expected_period = (50 * 5_000 + 100 * UNLOCK_TIME) / 150;
    assert_eq!(s.vault.balance(&s.vault.address), 150);
    assert_eq!(
        s.vault.full_profit_unlock_date(),
        START + UNLOCK_TIME / 2 + expected_period
    );
    assert_eq!(s.vault.total_assets(), 1_205);
}

#[test]
fn test_loss_burns_locked_profit_first() {
    let s = setup();
    let (_, strategy) = s.funded_strategy(1_000);
    s.airdrop_gain(&strategy, 100);
    s.vault.process_report(&s.gov, &strategy.address);

    strategy.lose(&50);
    let (gain, loss) = s.vault.process_report(&s.gov, &strategy.address);

    assert_eq!((gain, loss), (0, 50));
    assert_eq!(s.vault.total_assets(), 1_050);
    assert_eq!(s.vault.total_supply(), 1_050);
    assert_eq!(s.vault.balance(&s.vault.address), 50);
    assert_eq!(s.vault.price_per_share(), 10_000_000);
    assert_eq!(s.vault.full_profit_unlock_date(), START + UNLOCK_TIME);

    // Beyond the buffer the loss reaches holders
    strategy.lose(&200);
    s.vault.process_report(&s.gov, &strategy.address);

    assert_eq!(s.vault.total_assets(), 850);
    assert_eq!(s.vault.total_supply(), 1_000);
    assert_eq!(s.vault.balance(&s.vault.address), 0);
    assert_eq!(s.vault.full_profit_unlock_date(), 0);
    assert_eq!(s.vault.price_per_share(), 8_500_000);
}

#[test]
fn test_plain_loss_lowers_price() {
    let s = setup();
    let (user, strategy) = s.funded_strategy(1_000);
    strategy.lose(&100);

    s.vault.process_report(&s.gov, &strategy.address);
    assert_eq!(
        s.last_event::<StrategyReportedEvent>("strategy_reported"),
        Some(StrategyReportedEvent {
            strategy: strategy.address.clone(),
            gain: 0,
            loss: 100,
            current_debt: 900,
            protocol_fees: 0,
            total_fees: 0,
            total_refunds: 0,
        })
    );

    assert_eq!(s.vault.total_debt(), 900);
    assert_eq!(s.vault.total_supply(), 1_000);
    assert_eq!(s.vault.convert_to_assets(&s.vault.balance(&user)), 900);
}

#[test]
fn test_no_free_shares_after_total_loss() {
    let s = setup();
    let (alice, strategy) = s.funded_strategy(1_000);
    strategy.lose(&1_000);
    assert_eq!(s.vault.process_report(&s.gov, &strategy.address), (0, 1_000));

    assert_eq!(s.vault.total_assets(), 0);
    assert_eq!(s.vault.total_supply(), 1_000);
    assert_eq!(s.vault.price_per_share(), 0);

    let bob = s.user_with(1_000);
    assert_eq!(
        s.vault.try_mint(&bob, &1_000, &bob),
        Err(Ok(Error::CannotMintZero))
    );
    assert_eq!(
        s.vault.try_deposit(&bob, &1_000, &bob),
        Err(Ok(Error::CannotMintZero))
    );
    assert_eq!(s.asset.balance(&bob), 1_000);
    assert_eq!(s.vault.balance(&bob), 0);

    // A later recovery belongs to the holders who bore the loss
    s.airdrop_gain(&strategy, 1_000);
    assert_eq!(s.vault.process_report(&s.gov, &strategy.address), (1_000, 0));
    assert_eq!(s.vault.total_supply(), 1_000);
    assert_eq!(s.vault.convert_to_assets(&s.vault.balance(&alice)), 1_000);
}

#[test]
fn test_report_updates_last_report() {
    let s = setup();
    let (_, strategy) = s.funded_strategy(1_000);

    s.advance(3_600);
    assert_eq!(s.vault.process_report(&s.gov, &strategy.address), (0, 0));
    assert_eq!(s.vault.strategies(&strategy.address).last_report, START + 3_600);
}

#[test]
fn test_report_inactive_strategy() {
    let s = setup();
    let unknown = Address::generate(&s.env);

    assert_eq!(
        s.vault.try_process_report(&s.gov, &unknown),
        Err(Ok(Error::InactiveStrategy))
    );
}

// ============================================
// UNLOCK WINDOW CONFIGURATION
// ============================================

#[test]
fn test_zero_unlock_time_releases_everything() {
    let s = setup();
    let (_, strategy) = s.funded_strategy(1_000);
    s.airdrop_gain(&strategy, 100);
    s.vault.process_report(&s.gov, &strategy.address);

    s.vault.set_profit_max_unlock_time(&s.gov, &0);
    assert_eq!(
        s.last_event::<UpdateProfitMaxUnlockTimeEvent>("update_profit_max_unlock_time"),
        Some(UpdateProfitMaxUnlockTimeEvent {
            profit_max_unlock_time: 0,
        })
    );

    assert_eq!(s.vault.balance(&s.vault.address), 0);
    assert_eq!(s.vault.full_profit_unlock_date(), 0);
    assert_eq!(s.vault.profit_unlocking_rate(), 0);
    assert_eq!(s.vault.price_per_share(), 11_000_000);

    // Later gains go straight to the price
    s.airdrop_gain(&strategy, 110);
    s.vault.process_report(&s.gov, &strategy.address);
    assert_eq!(s.vault.total_supply(), 1_000);
    assert_eq!(s.vault.price_per_share(), 12_100_000);
}

#[test]
fn test_unlock_time_bounded_by_a_year() {
    let s = setup();

    assert_eq!(
        s.vault
            .try_set_profit_max_unlock_time(&s.gov, &(SECONDS_PER_YEAR + 1)),
        Err(Ok(Error::ProfitUnlockTimeTooLong))
    );

    s.vault
        .set_profit_max_unlock_time(&s.gov, &SECONDS_PER_YEAR);
    assert_eq!(s.vault.profit_max_unlock_time(), SECONDS_PER_YEAR);
}

// ============================================
// ACCOUNTANT FEES & REFUNDS
// ============================================

#[test]
fn test_performance_fee_paid_in_shares() {
    let s = setup();
    let (user, strategy) = s.funded_strategy(1_000);
    let accountant = s.accountant();
    accountant.set_performance_fee(&s.gov, &1_000);
    s.airdrop_gain(&strategy, 100);

    s.vault.process_report(&s.gov, &strategy.address);
    assert_eq!(
        s.last_event::<StrategyReportedEvent>("strategy_reported"),
        Some(StrategyReportedEvent {
            strategy: strategy.address.clone(),
            gain: 100,
            loss: 0,
            current_debt: 1_100,
            protocol_fees: 0,
            total_fees: 10,
            total_refunds: 0,
        })
    );

    assert_eq!(s.vault.balance(&accountant.address), 10);
    assert_eq!(s.vault.balance(&s.vault.address), 90);
    assert_eq!(s.vault.total_supply(), 1_100);

    s.advance(UNLOCK_TIME);
    assert_eq!(s.vault.total_supply(), 1_010);
    assert_eq!(s.vault.convert_to_assets(&s.vault.balance(&user)), 1_089);
}

#[test]
fn test_protocol_fee_split() {
    let s = setup();
    let (_, strategy) = s.funded_strategy(1_000);
    let accountant = s.accountant();
    accountant.set_performance_fee(&s.gov, &1_000);
    let protocol = Address::generate(&s.env);
    s.vault.set_protocol_fee(&s.gov, &5_000, &Some(protocol.clone()));
    assert_eq!(s.vault.protocol_fee(), (5_000, Some(protocol.clone())));
    s.airdrop_gain(&strategy, 100);

    s.vault.process_report(&s.gov, &strategy.address);
    let event = s
        .last_event::<StrategyReportedEvent>("strategy_reported")
        .unwrap();
    assert_eq!(event.total_fees, 10);
    assert_eq!(event.protocol_fees, 5);

    assert_eq!(s.vault.balance(&accountant.address), 5);
    assert_eq!(s.vault.balance(&protocol), 5);
    assert_eq!(s.vault.total_supply(), 1_100);
}

#[test]
fn test_protocol_fee_needs_recipient() {
    let s = setup();
    let (_, strategy) = s.funded_strategy(1_000);
    let accountant = s.accountant();
    accountant.set_performance_fee(&s.gov, &1_000);
    s.vault.set_protocol_fee(&s.gov, &5_000, &None);
    s.airdrop_gain(&strategy, 100);

    s.vault.process_report(&s.gov, &strategy.address);

    assert_eq!(s.vault.balance(&accountant.address), 10);
    assert_eq!(
        s.vault.try_set_protocol_fee(&s.gov, &10_001, &None),
        Err(Ok(Error::InvalidFee))
    );
}

#[test]
fn test_refund_covers_loss() {
    let s = setup();
    let (user, strategy) = s.funded_strategy(1_000);
    let accountant = s.accountant();
    accountant.set_refund_ratio(&s.gov, &10_000);
    s.asset_admin.mint(&accountant.address, &100);
    let expiration = s.env.ledger().sequence() + 1_000;
    accountant.approve_vault(&s.gov, &100, &expiration);
    strategy.lose(&50);

    s.vault.process_report(&s.gov, &strategy.address);
    assert_eq!(
        s.last_event::<StrategyReportedEvent>("strategy_reported"),
        Some(StrategyReportedEvent {
            strategy: strategy.address.clone(),
            gain: 0,
            loss: 50,
            current_debt: 950,
            protocol_fees: 0,
            total_fees: 0,
            total_refunds: 50,
        })
    );

    assert_eq!(s.vault.total_idle(), 50);
    assert_eq!(s.vault.total_debt(), 950);
    assert_eq!(s.vault.total_assets(), 1_000);
    assert_eq!(s.vault.total_supply(), 1_000);
    assert_eq!(s.vault.price_per_share(), 10_000_000);
    assert_eq!(s.vault.convert_to_assets(&s.vault.balance(&user)), 1_000);
    assert_eq!(s.asset.balance(&accountant.address), 50);
}

#[test]
fn test_refund_capped_by_allowance() {
    let s = setup();
    let (_, strategy) = s.funded_strategy(1_000);
    let accountant = s.accountant();
    accountant.set_refund_ratio(&s.gov, &10_000);
    s.asset_admin.mint(&accountant.address, &100);
    let expiration = s.env.ledger().sequence() + 1_000;
    accountant.approve_vault(&s.gov, &20, &expiration);
    strategy.lose(&50);

    s.vault.process_report(&s.gov, &strategy.address);
    let event = s
        .last_event::<StrategyReportedEvent>("strategy_reported")
        .unwrap();
    assert_eq!(event.total_refunds, 20);

    assert_eq!(s.vault.total_idle(), 20);
    assert_eq!(s.vault.total_assets(), 970);
    assert_eq!(s.vault.total_supply(), 1_000);
    assert_eq!(s.asset.balance(&accountant.address), 80);
}

#[test]
fn test_accountant_can_be_removed() {
    let s = setup();
    let (_, strategy) = s.funded_strategy(1_000);
    let accountant = s.accountant();
    accountant.set_performance_fee(&s.gov, &1_000);
    assert_eq!(s.vault.accountant(), Some(accountant.address.clone()));

    s.vault.set_accountant(&s.gov, &None);
    s.airdrop_gain(&strategy, 100);
    s.vault.process_report(&s.gov, &strategy.address);

    assert_eq!(s.vault.accountant(), None);
    assert_eq!(s.vault.balance(&accountant.address), 0);
    assert_eq!(s.vault.balance(&s.vault.address), 100);
}

// ============================================
// MANAGEMENT FEE
// ============================================

#[test]
fn test_management_fee_accrues_over_time() {
    let s = setup();
    let recipient = Address::generate(&s.env);
    s.vault.set_fee_recipient(&s.gov, &Some(recipient.clone()));
    s.vault.set_management_fee(&s.gov, &200);
    assert_eq!(s.vault.management_fee(), 200);
    assert_eq!(s.vault.fee_recipient(), Some(recipient.clone()));
    s.depositor(1_000_000);

    s.advance(SECONDS_PER_YEAR);
    // Views already price in the pending fee
    assert_eq!(s.vault.convert_to_assets(&1_000_000), 980_392);

    s.vault.set_minimum_total_idle(&s.gov, &0);
    assert_eq!(
        s.last_event::<ManagementFeeMintedEvent>("management_fee_minted"),
        Some(ManagementFeeMintedEvent {
            recipient: recipient.clone(),
            shares: 20_000,
            period: SECONDS_PER_YEAR,
        })
    );

    assert_eq!(s.vault.balance(&recipient), 20_000);
    assert_eq!(s.vault.total_supply(), 1_020_000);
    assert_eq!(s.vault.convert_to_assets(&1_000_000), 980_392);
}

#[test]
fn test_management_fee_needs_recipient() {
    let s = setup();
    s.vault.set_management_fee(&s.gov, &200);
    s.depositor(1_000_000);

    s.advance(SECONDS_PER_YEAR);
    s.vault.set_minimum_total_idle(&s.gov, &0);
    assert_eq!(s.vault.total_supply(), 1_000_000);

    // The skipped year is not charged once a recipient appears
    let recipient = Address::generate(&s.env);
    s.vault.set_fee_recipient(&s.gov, &Some(recipient.clone()));
    assert_eq!(s.vault.balance(&recipient), 0);

    assert_eq!(
        s.vault.try_set_management_fee(&s.gov, &10_001),
        Err(Ok(Error::InvalidFee))
    );
}
