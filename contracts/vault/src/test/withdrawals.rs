use super::setup;
use crate::{DebtUpdatedEvent, Error, WithdrawnEvent};
use soroban_sdk::{testutils::Address as _, vec, Address, Vec};

#[test]
fn test_withdraw_pulls_from_strategy() {
    let s = setup();
    let (user, strategy) = s.funded_strategy(1_000);

    let shares = s.vault.withdraw(&user, &400, &user, &user);
    assert_eq!(
        s.last_event::<DebtUpdatedEvent>("debt_updated"),
        Some(DebtUpdatedEvent {
            strategy: strategy.address.clone(),
            current_debt: 1_000,
            new_debt: 600,
        })
    );

    assert_eq!(shares, 400);
    assert_eq!(s.vault.strategies(&strategy.address).current_debt, 600);
    assert_eq!(s.vault.total_debt(), 600);
    assert_eq!(s.vault.total_idle(), 0);
    assert_eq!(s.asset.balance(&user), 400);
    assert_eq!(s.vault.balance(&user), 600);
}

#[test]
fn test_withdraw_uses_idle_first() {
    let s = setup();
    let user = s.depositor(1_000);
    let strategy = s.added_strategy();
    s.vault.update_debt(&s.gov, &strategy.address, &600, &0);

    s.vault.withdraw(&user, &800, &user, &user);

    assert_eq!(s.vault.strategies(&strategy.address).current_debt, 200);
    assert_eq!(s.vault.total_idle(), 0);
    assert_eq!(s.vault.total_assets(), 200);
    assert_eq!(s.asset.balance(&user), 800);
}

#[test]
fn test_custom_queue_unless_default_enforced() {
    let s = setup();
    let user = s.depositor(1_000);
    let first = s.added_strategy();
    let second = s.added_strategy();
    s.vault.update_debt(&s.gov, &first.address, &500, &0);
    s.vault.update_debt(&s.gov, &second.address, &500, &0);

    let hint = vec![&s.env, second.address.clone()];
    s.vault
        .withdraw_with_loss(&user, &300, &user, &user, &0, &hint);
    assert_eq!(s.vault.strategies(&first.address).current_debt, 500);
    assert_eq!(s.vault.strategies(&second.address).current_debt, 200);

    s.vault.set_use_default_queue(&s.gov, &true);
    assert!(s.vault.use_default_queue());
    s.vault
        .withdraw_with_loss(&user, &300, &user, &user, &0, &hint);
    assert_eq!(s.vault.strategies(&first.address).current_debt, 200);
    assert_eq!(s.vault.strategies(&second.address).current_debt, 200);
}

#[test]
fn test_custom_queue_with_unknown_strategy() {
    let s = setup();
    let (user, _) = s.funded_strategy(1_000);
    let unknown = Address::generate(&s.env);

    assert_eq!(
        s.vault.try_withdraw_with_loss(
            &user,
            &100,
            &user,
            &user,
            &0,
            &vec![&s.env, unknown]
        ),
        Err(Ok(Error::InactiveStrategy))
    );
}

#[test]
fn test_insufficient_idle() {
    let s = setup();
    let (user, strategy) = s.funded_strategy(1_000);
    strategy.lock(&800);

    assert_eq!(
        s.vault.try_withdraw(&user, &500, &user, &user),
        Err(Ok(Error::InsufficientIdle))
    );
    assert_eq!(s.vault.max_withdraw(&user), 200);

    // Nothing to pull from once the strategy leaves the queue
    s.vault.set_default_queue(&s.gov, &Vec::new(&s.env));
    assert_eq!(
        s.vault.try_withdraw(&user, &100, &user, &user),
        Err(Ok(Error::InsufficientIdle))
    );
    assert_eq!(s.vault.max_withdraw(&user), 0);
}

#[test]
fn test_max_withdraw_counts_idle_and_liquidity() {
    let s = setup();
    let user = s.depositor(1_000);
    let strategy = s.added_strategy();
    s.vault.update_debt(&s.gov, &strategy.address, &600, &0);
    strategy.lock(&500);

    assert_eq!(s.vault.max_withdraw(&user), 500);
    assert_eq!(s.vault.max_redeem(&user), 500);

    assert_eq!(s.vault.withdraw(&user, &500, &user, &user), 500);
    assert_eq!(s.vault.max_withdraw(&user), 0);
}

#[test]
fn test_unrealised_loss_shared_on_exit() {
    let s = setup();
    let alice = s.depositor(500);
    let bob = s.depositor(500);
    let strategy = s.added_strategy();
    s.vault.update_debt(&s.gov, &strategy.address, &1_000, &0);
    strategy.lose(&100);

    assert_eq!(
        s.vault.assess_unrealised_losses(&strategy.address, &500),
        50
    );
    assert_eq!(s.vault.max_withdraw(&alice), 0);
    assert_eq!(
        s.vault
            .max_withdraw_with_loss(&alice, &10_000, &Vec::new(&s.env)),
        500
    );
    assert_eq!(s.vault.max_redeem(&alice), 500);
    assert_eq!(
        s.vault.try_withdraw(&alice, &500, &alice, &alice),
        Err(Ok(Error::TooMuchLoss))
    );

    let received = s.vault.redeem(&alice, &500, &alice, &alice);
    assert_eq!(
        s.last_event::<WithdrawnEvent>("withdrawn"),
        Some(WithdrawnEvent {
            sender: alice.clone(),
            receiver: alice.clone(),
            owner: alice.clone(),
            assets: 450,
            shares: 500,
            loss: 50,
        })
    );

    assert_eq!(received, 450);
    assert_eq!(s.vault.strategies(&strategy.address).current_debt, 500);
    assert_eq!(s.vault.total_debt(), 500);

    // The remaining holder bears the same share, not more
    assert_eq!(s.vault.redeem(&bob, &500, &bob, &bob), 450);
    assert_eq!(s.vault.total_supply(), 0);
}

#[test]
fn test_withdraw_within_tolerated_loss() {
    let s = setup();
    let user = s.depositor(1_000);
    let strategy = s.added_strategy();
    s.vault.update_debt(&s.gov, &strategy.address, &1_000, &0);
    strategy.lose(&100);

    // 10% of 500 covers the 50 shortfall
    let shares = s
        .vault
        .withdraw_with_loss(&user, &500, &user, &user, &1_000, &Vec::new(&s.env));

    assert_eq!(shares, 500);
    assert_eq!(s.asset.balance(&user), 450);
}

#[test]
fn test_withdraw_limit_module() {
    let s = setup();
    let module = s.limit_module();
    module.set_withdraw_limit(&s.gov, &300);
    s.vault
        .set_withdraw_limit_module(&s.gov, &Some(module.address.clone()));
    assert_eq!(s.vault.withdraw_limit_module(), Some(module.address.clone()));
    let user = s.depositor(1_000);

    assert_eq!(s.vault.max_withdraw(&user), 300);
    assert_eq!(s.vault.max_redeem(&user), 300);
    assert_eq!(
        s.vault.try_withdraw(&user, &301, &user, &user),
        Err(Ok(Error::ExceedWithdrawLimit))
    );

    s.vault.withdraw(&user, &300, &user, &user);
    assert_eq!(s.asset.balance(&user), 300);

    s.vault.set_withdraw_limit_module(&s.gov, &None);
    assert_eq!(s.vault.max_withdraw(&user), 700);
}
