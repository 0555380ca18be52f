// Only the generated clients are called
#![allow(dead_code)]

use soroban_sdk::{contractclient, Address, Env, Vec};

/// Yield source the vault lends idle assets to
///
/// Strategies are share-based: the vault holds strategy shares and values its
/// position through `convert_to_assets(balance(vault))`.
#[contractclient(name = "StrategyClient")]
pub trait StrategyInterface {
    fn asset(env: Env) -> Address;

    fn total_assets(env: Env) -> i128;

    fn balance(env: Env, id: Address) -> i128;

    fn convert_to_assets(env: Env, shares: i128) -> i128;

    fn convert_to_shares(env: Env, assets: i128) -> i128;

    /// Account `assets` already transferred in and mint shares to `receiver`
    fn deposit(env: Env, assets: i128, receiver: Address) -> i128;

    /// Burn shares of `owner` and send up to `assets` to `receiver`
    fn withdraw(env: Env, assets: i128, receiver: Address, owner: Address) -> i128;

    fn max_deposit(env: Env, receiver: Address) -> i128;

    fn max_withdraw(env: Env, owner: Address) -> i128;

    fn transfer(env: Env, from: Address, to: Address, amount: i128);
}

/// Fee and refund policy consulted on every strategy report
#[contractclient(name = "AccountantClient")]
pub trait AccountantInterface {
    /// Returns `(total_fees, total_refunds)` in asset units
    fn report(env: Env, strategy: Address, gain: i128, loss: i128) -> (i128, i128);
}

#[contractclient(name = "DepositLimitModuleClient")]
pub trait DepositLimitModuleInterface {
    fn available_deposit_limit(env: Env, receiver: Address) -> i128;
}

#[contractclient(name = "WithdrawLimitModuleClient")]
pub trait WithdrawLimitModuleInterface {
    fn available_withdraw_limit(
        env: Env,
        owner: Address,
        max_loss: u32,
        strategies: Vec<Address>,
    ) -> i128;
}
