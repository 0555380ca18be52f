#![no_std]

mod admin;
mod debt;
mod error;
mod events;
mod fees;
mod interfaces;
mod ledger;
mod math;
mod report;
mod roles;
mod storage;
mod strategies;
mod unlock;
mod user_ops;

pub use error::Error;
pub use events::*;
pub use roles::{Role, ALL_ROLES};
pub use storage::{StrategyChangeType, StrategyParams, MAX_BPS, MAX_QUEUE, SECONDS_PER_YEAR, UNLIMITED};

use admin::Admin;
use debt::DebtAllocator;
use fees::Fees;
use ledger::Ledger;
use report::ReportProcessor;
use roles::Roles;
use storage::Storage;
use strategies::Strategies;
use unlock::ProfitUnlockEngine;
use user_ops::{UserOps, DEFAULT_REDEEM_MAX_LOSS, DEFAULT_WITHDRAW_MAX_LOSS};

use soroban_sdk::{contract, contractimpl, Address, Env, String, Vec};

#[contract]
pub struct AllocatorVault;

#[contractimpl]
impl AllocatorVault {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// Initialize the vault
    ///
    /// `governance` receives every role. Deposits are closed until a
    /// deposit limit or deposit limit module is configured.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `ProfitUnlockTimeTooLong`: Unlock window above one year
    pub fn initialize(
        env: Env,
        governance: Address,
        asset: Address,
        name: String,
        symbol: String,
        profit_max_unlock_time: u64,
    ) -> Result<(), Error> {
        governance.require_auth();
        Admin::initialize(&env, &governance, &asset, name, symbol, profit_max_unlock_time)
    }

    // ============================================
    // ROLES
    // ============================================

    /// Replace the role mask of `account`
    ///
    /// # Errors
    /// - `Unauthorized`: Caller lacks `GovernanceManager`
    pub fn set_role(env: Env, caller: Address, account: Address, roles: u32) -> Result<(), Error> {
        Roles::set_roles(&env, &caller, &account, roles)
    }

    pub fn add_role(env: Env, caller: Address, account: Address, role: Role) -> Result<(), Error> {
        Roles::add_role(&env, &caller, &account, role)
    }

    pub fn remove_role(env: Env, caller: Address, account: Address, role: Role) -> Result<(), Error> {
        Roles::remove_role(&env, &caller, &account, role)
    }

    pub fn roles(env: Env, account: Address) -> u32 {
        Storage::get_roles(&env, &account)
    }

    pub fn has_role(env: Env, account: Address, role: Role) -> bool {
        roles::has_role(Storage::get_roles(&env, &account), role)
    }

    // ============================================
    // STRATEGY MANAGEMENT
    // ============================================

    /// Add a strategy, optionally appending it to the default queue
    ///
    /// # Errors
    /// - `Unauthorized`: Caller lacks `AddStrategyManager`
    /// - `InvalidStrategy`: Strategy is the vault itself
    /// - `InvalidAsset`: Strategy manages another asset
    /// - `StrategyAlreadyActive`: Strategy was already added
    pub fn add_strategy(
        env: Env,
        caller: Address,
        strategy: Address,
        add_to_queue: bool,
    ) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::AddStrategyManager)?;
        Ledger::sync(&env)?;
        Strategies::add(&env, &strategy, add_to_queue)
    }

    /// Remove a strategy that carries no debt
    ///
    /// # Errors
    /// - `Unauthorized`: Caller lacks `RevokeStrategyManager`
    /// - `StrategyNotActive`: Strategy was never added
    /// - `StrategyHasDebt`: Strategy still carries debt
    pub fn revoke_strategy(env: Env, caller: Address, strategy: Address) -> Result<(), Error> {
        Self::revoke(&env, &caller, &strategy, false)
    }

    /// Remove a strategy and write its outstanding debt off as a loss
    pub fn force_revoke_strategy(env: Env, caller: Address, strategy: Address) -> Result<(), Error> {
        Self::revoke(&env, &caller, &strategy, true)
    }

    /// # Errors
    /// - `Unauthorized`: Caller lacks `MaxDebtManager`
    /// - `InactiveStrategy`: Strategy is not active
    pub fn update_max_debt_for_strategy(
        env: Env,
        caller: Address,
        strategy: Address,
        new_max_debt: i128,
    ) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::MaxDebtManager)?;
        Ledger::sync(&env)?;
        Strategies::update_max_debt(&env, &caller, &strategy, new_max_debt)
    }

    /// # Errors
    /// - `Unauthorized`: Caller lacks `QueueManager`
    /// - `QueueTooLong`: More than `MAX_QUEUE` strategies
    /// - `InactiveStrategy`: Queue holds a strategy that is not active
    pub fn set_default_queue(
        env: Env,
        caller: Address,
        new_default_queue: Vec<Address>,
    ) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::QueueManager)?;
        Ledger::sync(&env)?;
        Strategies::set_default_queue(&env, &new_default_queue)
    }

    pub fn set_use_default_queue(env: Env, caller: Address, use_default_queue: bool) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::QueueManager)?;
        let mut state = Ledger::sync(&env)?;
        Admin::set_use_default_queue(&env, &mut state, use_default_queue);
        Storage::set_state(&env, &state);
        Ok(())
    }

    pub fn set_auto_allocate(env: Env, caller: Address, auto_allocate: bool) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::DebtManager)?;
        let mut state = Ledger::sync(&env)?;
        Admin::set_auto_allocate(&env, &mut state, auto_allocate);
        Storage::set_state(&env, &state);
        Ok(())
    }

    // ============================================
    // DEBT MANAGEMENT
    // ============================================

    /// Move a strategy's debt toward `target_debt`, returning the new debt
    ///
    /// # Errors
    /// - `Unauthorized`: Caller lacks `DebtManager`
    /// - `InactiveStrategy`, `NoDebtChange`, `NothingToWithdraw`,
    ///   `UnrealisedLosses`, `TooMuchLoss`
    pub fn update_debt(
        env: Env,
        caller: Address,
        strategy: Address,
        target_debt: i128,
        max_loss: u32,
    ) -> Result<i128, Error> {
        Roles::enforce(&env, &caller, Role::DebtManager)?;
        let mut state = Ledger::sync(&env)?;
        let new_debt = DebtAllocator::update_debt(&env, &mut state, &strategy, target_debt, max_loss)?;
        Storage::set_state(&env, &state);
        Ok(new_debt)
    }

    /// Buy up to `amount` of a strategy's debt for its strategy shares
    ///
    /// # Errors
    /// - `Unauthorized`: Caller lacks `DebtPurchaser`
    /// - `InactiveStrategy`, `NothingToBuy`, `CannotBuyZero`
    pub fn buy_debt(env: Env, caller: Address, strategy: Address, amount: i128) -> Result<i128, Error> {
        Roles::enforce(&env, &caller, Role::DebtPurchaser)?;
        let mut state = Ledger::sync(&env)?;
        let bought = DebtAllocator::buy_debt(&env, &mut state, &caller, &strategy, amount)?;
        Storage::set_state(&env, &state);
        Ok(bought)
    }

    // ============================================
    // REPORTING
    // ============================================

    /// Reconcile a strategy's debt with its current value
    ///
    /// Returns `(gain, loss)`.
    ///
    /// # Errors
    /// - `Unauthorized`: Caller lacks `ReportingManager`
    /// - `InactiveStrategy`: Strategy is not active
    pub fn process_report(env: Env, caller: Address, strategy: Address) -> Result<(i128, i128), Error> {
        Roles::enforce(&env, &caller, Role::ReportingManager)?;
        let mut state = Ledger::sync(&env)?;
        let outcome = ReportProcessor::process_report(&env, &mut state, &strategy)?;
        Storage::set_state(&env, &state);
        Ok((outcome.gain, outcome.loss))
    }

    // ============================================
    // CONFIGURATION
    // ============================================

    pub fn set_accountant(env: Env, caller: Address, accountant: Option<Address>) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::AccountantManager)?;
        Ledger::sync(&env)?;
        Admin::set_accountant(&env, accountant)
    }

    /// Annual management fee in basis points of supply
    ///
    /// # Errors
    /// - `Unauthorized`: Caller lacks `AccountantManager`
    /// - `InvalidFee`: Fee above 10_000
    pub fn set_management_fee(env: Env, caller: Address, fee_bps: u32) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::AccountantManager)?;
        Ledger::sync(&env)?;
        Fees::set_management_fee(&env, fee_bps)
    }

    pub fn set_fee_recipient(env: Env, caller: Address, recipient: Option<Address>) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::AccountantManager)?;
        Ledger::sync(&env)?;
        Fees::set_fee_recipient(&env, recipient)
    }

    /// Route `fee_bps` of every report's fee shares to `recipient`
    pub fn set_protocol_fee(
        env: Env,
        caller: Address,
        fee_bps: u32,
        recipient: Option<Address>,
    ) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::GovernanceManager)?;
        Ledger::sync(&env)?;
        Fees::set_protocol_fee(&env, fee_bps, recipient)
    }

    /// # Errors
    /// - `Unauthorized`: Caller lacks `DepositLimitManager`
    /// - `UsingModule`: A deposit limit module is set and `force` is false
    /// - `VaultShutdown`: Vault is shut down
    pub fn set_deposit_limit(
        env: Env,
        caller: Address,
        deposit_limit: i128,
        force: bool,
    ) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::DepositLimitManager)?;
        let mut state = Ledger::sync(&env)?;
        Admin::set_deposit_limit(&env, &mut state, deposit_limit, force)?;
        Storage::set_state(&env, &state);
        Ok(())
    }

    /// # Errors
    /// - `Unauthorized`: Caller lacks `DepositLimitManager`
    /// - `UsingDepositLimit`: A finite deposit limit is set and `force` is false
    /// - `VaultShutdown`: Vault is shut down
    pub fn set_deposit_limit_module(
        env: Env,
        caller: Address,
        module: Option<Address>,
        force: bool,
    ) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::DepositLimitManager)?;
        let mut state = Ledger::sync(&env)?;
        Admin::set_deposit_limit_module(&env, &mut state, module, force)?;
        Storage::set_state(&env, &state);
        Ok(())
    }

    pub fn set_withdraw_limit_module(env: Env, caller: Address, module: Option<Address>) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::WithdrawLimitManager)?;
        Ledger::sync(&env)?;
        Admin::set_withdraw_limit_module(&env, module)
    }

    pub fn set_minimum_total_idle(env: Env, caller: Address, minimum_total_idle: i128) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::MinimumIdleManager)?;
        let mut state = Ledger::sync(&env)?;
        Admin::set_minimum_total_idle(&env, &mut state, minimum_total_idle)?;
        Storage::set_state(&env, &state);
        Ok(())
    }

    /// # Errors
    /// - `Unauthorized`: Caller lacks `ProfitUnlockManager`
    /// - `ProfitUnlockTimeTooLong`: Window above one year
    pub fn set_profit_max_unlock_time(env: Env, caller: Address, seconds: u64) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::ProfitUnlockManager)?;
        let mut state = Ledger::sync(&env)?;
        ProfitUnlockEngine::set_profit_max_unlock_time(&env, &mut state, seconds)?;
        Storage::set_state(&env, &state);
        Ok(())
    }

    /// Close deposits permanently; the caller gains `DebtManager` to unwind
    ///
    /// # Errors
    /// - `Unauthorized`: Caller lacks `EmergencyManager`
    /// - `VaultShutdown`: Vault already shut down
    pub fn shutdown_vault(env: Env, caller: Address) -> Result<(), Error> {
        Roles::enforce(&env, &caller, Role::EmergencyManager)?;
        let mut state = Ledger::sync(&env)?;
        Admin::shutdown(&env, &mut state, &caller)?;
        Storage::set_state(&env, &state);
        Ok(())
    }

    // ============================================
    // DEPOSITS & WITHDRAWALS
    // ============================================

    /// Deposit `assets` and mint shares to `receiver`
    ///
    /// # Errors
    /// - `VaultShutdown`, `InvalidReceiver`, `ExceedDepositLimit`, `CannotMintZero`
    pub fn deposit(env: Env, sender: Address, assets: i128, receiver: Address) -> Result<i128, Error> {
        sender.require_auth();
        UserOps::deposit(&env, &sender, assets, &receiver)
    }

    /// Mint exactly `shares` to `receiver`, returning the assets pulled
    pub fn mint(env: Env, sender: Address, shares: i128, receiver: Address) -> Result<i128, Error> {
        sender.require_auth();
        UserOps::mint(&env, &sender, shares, &receiver)
    }

    /// Withdraw exactly `assets`, tolerating no loss
    pub fn withdraw(
        env: Env,
        sender: Address,
        assets: i128,
        receiver: Address,
        owner: Address,
    ) -> Result<i128, Error> {
        sender.require_auth();
        UserOps::withdraw(
            &env,
            &sender,
            assets,
            &receiver,
            &owner,
            DEFAULT_WITHDRAW_MAX_LOSS,
            &Vec::new(&env),
        )
    }

    pub fn withdraw_with_loss(
        env: Env,
        sender: Address,
        assets: i128,
        receiver: Address,
        owner: Address,
        max_loss: u32,
        strategies: Vec<Address>,
    ) -> Result<i128, Error> {
        sender.require_auth();
        UserOps::withdraw(&env, &sender, assets, &receiver, &owner, max_loss, &strategies)
    }

    /// Redeem `shares`, accepting any realised loss
    pub fn redeem(
        env: Env,
        sender: Address,
        shares: i128,
        receiver: Address,
        owner: Address,
    ) -> Result<i128, Error> {
        sender.require_auth();
        UserOps::redeem(
            &env,
            &sender,
            shares,
            &receiver,
            &owner,
            DEFAULT_REDEEM_MAX_LOSS,
            &Vec::new(&env),
        )
    }

    pub fn redeem_with_loss(
        env: Env,
        sender: Address,
        shares: i128,
        receiver: Address,
        owner: Address,
        max_loss: u32,
        strategies: Vec<Address>,
    ) -> Result<i128, Error> {
        sender.require_auth();
        UserOps::redeem(&env, &sender, shares, &receiver, &owner, max_loss, &strategies)
    }

    // ============================================
    // SHARE TOKEN
    // ============================================

    pub fn balance(env: Env, id: Address) -> Result<i128, Error> {
        Ledger::balance(&env, &id)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        Ledger::transfer(&env, &from, &to, amount)
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        spender.require_auth();
        Ledger::spend_allowance(&env, &from, &spender, amount)?;
        Ledger::transfer(&env, &from, &to, amount)
    }

    pub fn approve(env: Env, owner: Address, spender: Address, amount: i128) -> Result<(), Error> {
        owner.require_auth();
        Ledger::approve(&env, &owner, &spender, amount)
    }

    pub fn allowance(env: Env, owner: Address, spender: Address) -> i128 {
        Storage::get_allowance(&env, &owner, &spender)
    }

    pub fn name(env: Env) -> Result<String, Error> {
        Ok(Storage::get_config(&env)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, Error> {
        Ok(Storage::get_config(&env)?.symbol)
    }

    pub fn decimals(env: Env) -> Result<u32, Error> {
        Ok(Storage::get_config(&env)?.decimals)
    }

    /// Circulating supply, excluding profit shares already unlocked
    pub fn total_supply(env: Env) -> Result<i128, Error> {
        let state = Storage::get_state(&env)?;
        Ledger::total_supply(&env, &state)
    }

    // ============================================
    // ACCOUNTING VIEWS
    // ============================================

    pub fn total_assets(env: Env) -> Result<i128, Error> {
        Ledger::total_assets(&Storage::get_state(&env)?)
    }

    pub fn total_idle(env: Env) -> Result<i128, Error> {
        Ok(Storage::get_state(&env)?.total_idle)
    }

    pub fn total_debt(env: Env) -> Result<i128, Error> {
        Ok(Storage::get_state(&env)?.total_debt)
    }

    pub fn convert_to_shares(env: Env, assets: i128) -> Result<i128, Error> {
        UserOps::convert_to_shares(&env, assets)
    }

    pub fn convert_to_assets(env: Env, shares: i128) -> Result<i128, Error> {
        UserOps::convert_to_assets(&env, shares)
    }

    pub fn preview_deposit(env: Env, assets: i128) -> Result<i128, Error> {
        UserOps::convert_to_shares(&env, assets)
    }

    pub fn preview_mint(env: Env, shares: i128) -> Result<i128, Error> {
        UserOps::preview_mint(&env, shares)
    }

    pub fn preview_withdraw(env: Env, assets: i128) -> Result<i128, Error> {
        UserOps::preview_withdraw(&env, assets)
    }

    pub fn preview_redeem(env: Env, shares: i128) -> Result<i128, Error> {
        UserOps::convert_to_assets(&env, shares)
    }

    pub fn price_per_share(env: Env) -> Result<i128, Error> {
        UserOps::price_per_share(&env)
    }

    pub fn max_deposit(env: Env, receiver: Address) -> Result<i128, Error> {
        UserOps::max_deposit(&env, &receiver)
    }

    pub fn max_mint(env: Env, receiver: Address) -> Result<i128, Error> {
        UserOps::max_mint(&env, &receiver)
    }

    pub fn max_withdraw(env: Env, owner: Address) -> Result<i128, Error> {
        UserOps::max_withdraw(&env, &owner, DEFAULT_WITHDRAW_MAX_LOSS, &Vec::new(&env))
    }

    pub fn max_withdraw_with_loss(
        env: Env,
        owner: Address,
        max_loss: u32,
        strategies: Vec<Address>,
    ) -> Result<i128, Error> {
        UserOps::max_withdraw(&env, &owner, max_loss, &strategies)
    }

    pub fn max_redeem(env: Env, owner: Address) -> Result<i128, Error> {
        UserOps::max_redeem(&env, &owner, DEFAULT_REDEEM_MAX_LOSS, &Vec::new(&env))
    }

    pub fn max_redeem_with_loss(
        env: Env,
        owner: Address,
        max_loss: u32,
        strategies: Vec<Address>,
    ) -> Result<i128, Error> {
        UserOps::max_redeem(&env, &owner, max_loss, &strategies)
    }

    /// Loss `assets_needed` would realise if pulled from `strategy` now
    pub fn assess_unrealised_losses(
        env: Env,
        strategy: Address,
        assets_needed: i128,
    ) -> Result<i128, Error> {
        let params = Storage::get_strategy(&env, &strategy);
        if !params.is_active() {
            return Err(Error::InactiveStrategy);
        }
        DebtAllocator::assess_share_of_unrealised_losses(&env, &strategy, params.current_debt, assets_needed)
    }

    // ============================================
    // CONFIGURATION VIEWS
    // ============================================

    pub fn asset(env: Env) -> Result<Address, Error> {
        Ok(Storage::get_config(&env)?.asset)
    }

    pub fn accountant(env: Env) -> Result<Option<Address>, Error> {
        Ok(Storage::get_config(&env)?.accountant)
    }

    pub fn deposit_limit_module(env: Env) -> Result<Option<Address>, Error> {
        Ok(Storage::get_config(&env)?.deposit_limit_module)
    }

    pub fn withdraw_limit_module(env: Env) -> Result<Option<Address>, Error> {
        Ok(Storage::get_config(&env)?.withdraw_limit_module)
    }

    pub fn minimum_total_idle(env: Env) -> Result<i128, Error> {
        Ok(Storage::get_state(&env)?.minimum_total_idle)
    }

    pub fn deposit_limit(env: Env) -> Result<i128, Error> {
        Ok(Storage::get_state(&env)?.deposit_limit)
    }

    pub fn auto_allocate(env: Env) -> Result<bool, Error> {
        Ok(Storage::get_state(&env)?.auto_allocate)
    }

    pub fn use_default_queue(env: Env) -> Result<bool, Error> {
        Ok(Storage::get_state(&env)?.use_default_queue)
    }

    pub fn is_shutdown(env: Env) -> Result<bool, Error> {
        Ok(Storage::get_state(&env)?.shutdown)
    }

    pub fn default_queue(env: Env) -> Vec<Address> {
        Storage::get_default_queue(&env)
    }

    pub fn strategies(env: Env, strategy: Address) -> StrategyParams {
        Storage::get_strategy(&env, &strategy)
    }

    pub fn management_fee(env: Env) -> Result<u32, Error> {
        Ok(Storage::get_fees(&env)?.management_fee)
    }

    pub fn fee_recipient(env: Env) -> Result<Option<Address>, Error> {
        Ok(Storage::get_fees(&env)?.fee_recipient)
    }

    pub fn protocol_fee(env: Env) -> Result<(u32, Option<Address>), Error> {
        let fees = Storage::get_fees(&env)?;
        Ok((fees.protocol_fee_bps, fees.protocol_fee_recipient))
    }

    // ============================================
    // PROFIT UNLOCK VIEWS
    // ============================================

    pub fn profit_max_unlock_time(env: Env) -> Result<u64, Error> {
        Ok(Storage::get_unlock(&env)?.profit_max_unlock_time)
    }

    pub fn full_profit_unlock_date(env: Env) -> Result<u64, Error> {
        Ok(Storage::get_unlock(&env)?.full_profit_unlock_date)
    }

    pub fn profit_unlocking_rate(env: Env) -> Result<i128, Error> {
        Ok(Storage::get_unlock(&env)?.profit_unlocking_rate)
    }

    pub fn last_profit_update(env: Env) -> Result<u64, Error> {
        Ok(Storage::get_unlock(&env)?.last_profit_update)
    }

    pub fn unlocked_shares(env: Env) -> Result<i128, Error> {
        ProfitUnlockEngine::unlocked_shares(&env)
    }
}

impl AllocatorVault {
    fn revoke(env: &Env, caller: &Address, strategy: &Address, force: bool) -> Result<(), Error> {
        Roles::enforce(env, caller, Role::RevokeStrategyManager)?;
        let mut state = Ledger::sync(env)?;
        Strategies::revoke(env, &mut state, strategy, force)?;
        Storage::set_state(env, &state);
        Ok(())
    }
}

#[cfg(test)]
mod test;
