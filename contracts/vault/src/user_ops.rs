use crate::debt::{unrealised_loss_share, DebtAllocator};
use crate::error::Error;
use crate::events::{DepositEvent, WithdrawnEvent};
use crate::interfaces::{DepositLimitModuleClient, StrategyClient, WithdrawLimitModuleClient};
use crate::ledger::{assets_for, shares_for, Ledger, Totals};
use crate::math::{add, mul_div, sub, Rounding};
use crate::storage::{Storage, VaultState, MAX_BPS, UNLIMITED};
use soroban_sdk::{token, Address, Env, Symbol, Vec};

/// Loss tolerated by `withdraw` unless the caller says otherwise
pub const DEFAULT_WITHDRAW_MAX_LOSS: u32 = 0;
/// Loss tolerated by `redeem` unless the caller says otherwise
pub const DEFAULT_REDEEM_MAX_LOSS: u32 = 10_000;

/// Queue walked when idle cannot cover a withdrawal
///
/// A caller supplied hint is honoured unless the vault enforces its default
/// queue.
pub fn withdrawal_queue(env: &Env, state: &VaultState, strategies: &Vec<Address>) -> Vec<Address> {
    if !strategies.is_empty() && !state.use_default_queue {
        return strategies.clone();
    }
    Storage::get_default_queue(env)
}

pub struct UserOps;

impl UserOps {
    // ============================================
    // DEPOSITS
    // ============================================

    /// Deposit `assets` from `sender` and mint shares to `receiver`
    ///
    /// # Errors
    /// - `VaultShutdown` if the vault is shut down
    /// - `InvalidReceiver` if `receiver` is the vault
    /// - `ExceedDepositLimit` if `assets` is above `max_deposit(receiver)`
    /// - `CannotMintZero` if `assets` converts to no shares
    pub fn deposit(
        env: &Env,
        sender: &Address,
        assets: i128,
        receiver: &Address,
    ) -> Result<i128, Error> {
        let mut state = Ledger::sync(env)?;
        Self::check_deposit(env, &state, assets, receiver)?;

        let shares = shares_for(assets, Ledger::synced_totals(&state)?, Rounding::Down)?;
        if shares <= 0 {
            return Err(Error::CannotMintZero);
        }

        Self::issue(env, &mut state, sender, receiver, assets, shares)?;
        Ok(shares)
    }

    /// Mint exactly `shares` to `receiver`, pulling the assets they cost
    ///
    /// # Errors
    /// - `CannotMintZero` if `shares` is not positive or costs no assets
    /// - the `deposit` errors on the asset amount
    pub fn mint(
        env: &Env,
        sender: &Address,
        shares: i128,
        receiver: &Address,
    ) -> Result<i128, Error> {
        let mut state = Ledger::sync(env)?;
        if shares <= 0 {
            return Err(Error::CannotMintZero);
        }

        // A vault with supply but no assets prices shares at zero
        let assets = assets_for(shares, Ledger::synced_totals(&state)?, Rounding::Up)?;
        if assets <= 0 {
            return Err(Error::CannotMintZero);
        }
        Self::check_deposit(env, &state, assets, receiver)?;

        Self::issue(env, &mut state, sender, receiver, assets, shares)?;
        Ok(assets)
    }

    fn check_deposit(
        env: &Env,
        state: &VaultState,
        assets: i128,
        receiver: &Address,
    ) -> Result<(), Error> {
        if state.shutdown {
            return Err(Error::VaultShutdown);
        }
        if *receiver == env.current_contract_address() {
            return Err(Error::InvalidReceiver);
        }
        if assets < 0 {
            return Err(Error::InvalidAmount);
        }
        if assets > Self::max_deposit_for(env, state, receiver)? {
            return Err(Error::ExceedDepositLimit);
        }
        Ok(())
    }

    fn issue(
        env: &Env,
        state: &mut VaultState,
        sender: &Address,
        receiver: &Address,
        assets: i128,
        shares: i128,
    ) -> Result<(), Error> {
        let vault = env.current_contract_address();
        let asset = token::Client::new(env, &Storage::get_config(env)?.asset);
        asset.transfer(sender, &vault, &assets);

        state.total_idle = add(state.total_idle, assets)?;
        Ledger::mint(env, state, receiver, shares)?;

        env.events().publish(
            (Symbol::new(env, "deposit"), receiver.clone()),
            DepositEvent {
                sender: sender.clone(),
                owner: receiver.clone(),
                assets,
                shares,
            },
        );

        if state.auto_allocate {
            DebtAllocator::auto_allocate(env, state)?;
        }

        Storage::set_state(env, state);
        Ok(())
    }

    // ============================================
    // WITHDRAWALS
    // ============================================

    /// Withdraw exactly `assets` to `receiver`, burning shares of `owner`
    pub fn withdraw(
        env: &Env,
        sender: &Address,
        assets: i128,
        receiver: &Address,
        owner: &Address,
        max_loss: u32,
        strategies: &Vec<Address>,
    ) -> Result<i128, Error> {
        let mut state = Ledger::sync(env)?;
        let shares = shares_for(assets, Ledger::synced_totals(&state)?, Rounding::Up)?;
        Self::redeem_internal(
            env, &mut state, sender, receiver, owner, assets, shares, max_loss, strategies,
        )?;
        Ok(shares)
    }

    /// Burn `shares` of `owner` and send what they are worth to `receiver`
    ///
    /// Returns the assets actually paid, which is lower than the share value
    /// when strategy losses were realised on the way out.
    pub fn redeem(
        env: &Env,
        sender: &Address,
        shares: i128,
        receiver: &Address,
        owner: &Address,
        max_loss: u32,
        strategies: &Vec<Address>,
    ) -> Result<i128, Error> {
        let mut state = Ledger::sync(env)?;
        let assets = assets_for(shares, Ledger::synced_totals(&state)?, Rounding::Down)?;
        Self::redeem_internal(
            env, &mut state, sender, receiver, owner, assets, shares, max_loss, strategies,
        )
    }

    /// # Errors
    /// - `InvalidReceiver` if `receiver` is the vault
    /// - `NoSharesToRedeem` / `NoAssetsToWithdraw` for empty requests
    /// - `InvalidMaxLoss` if `max_loss` is above 10_000 bps
    /// - `ExceedWithdrawLimit` if the withdraw limit module refuses
    /// - `InsufficientShares` / `InsufficientAllowance`
    /// - `InactiveStrategy` if the queue references a removed strategy
    /// - `InsufficientIdle` if the queue cannot cover the request
    /// - `TooMuchLoss` if realised losses exceed `max_loss`
    #[allow(clippy::too_many_arguments)]
    fn redeem_internal(
        env: &Env,
        state: &mut VaultState,
        sender: &Address,
        receiver: &Address,
        owner: &Address,
        assets: i128,
        shares: i128,
        max_loss: u32,
        strategies: &Vec<Address>,
    ) -> Result<i128, Error> {
        let vault = env.current_contract_address();
        if *receiver == vault {
            return Err(Error::InvalidReceiver);
        }
        if shares <= 0 {
            return Err(Error::NoSharesToRedeem);
        }
        if assets <= 0 {
            return Err(Error::NoAssetsToWithdraw);
        }
        if max_loss as i128 > MAX_BPS {
            return Err(Error::InvalidMaxLoss);
        }

        let config = Storage::get_config(env)?;
        if let Some(module) = config.withdraw_limit_module.as_ref() {
            let limit = WithdrawLimitModuleClient::new(env, module).available_withdraw_limit(
                owner,
                &max_loss,
                strategies,
            );
            if assets > limit {
                return Err(Error::ExceedWithdrawLimit);
            }
        }

        if Storage::get_balance(env, owner) < shares {
            return Err(Error::InsufficientShares);
        }
        if sender != owner {
            Ledger::spend_allowance(env, owner, sender, shares)?;
        }

        let asset = token::Client::new(env, &config.asset);
        let mut requested = assets;
        let mut idle = state.total_idle;

        if requested > idle {
            let mut needed = requested - idle;

            for strategy in withdrawal_queue(env, state, strategies).iter() {
                let mut params = Storage::get_strategy(env, &strategy);
                if !params.is_active() {
                    return Err(Error::InactiveStrategy);
                }

                let client = StrategyClient::new(env, &strategy);
                let current_debt = params.current_debt;
                let mut to_withdraw = needed.min(current_debt);
                let max_withdraw = client.max_withdraw(&vault);

                let mut loss_share = DebtAllocator::assess_share_of_unrealised_losses(
                    env,
                    &strategy,
                    current_debt,
                    to_withdraw,
                )?;
                if loss_share > 0 {
                    // Scale the loss down to what the strategy can release
                    let wanted = to_withdraw - loss_share;
                    if max_withdraw < wanted {
                        loss_share = mul_div(loss_share, max_withdraw, wanted, Rounding::Down)?;
                        to_withdraw = max_withdraw + loss_share;
                    }

                    to_withdraw -= loss_share;
                    requested -= loss_share;
                    needed -= loss_share;
                    state.total_debt = sub(state.total_debt, loss_share)?;

                    // Fully lost strategy, write it down before moving on
                    if max_withdraw == 0 {
                        let new_debt = current_debt - loss_share;
                        params.current_debt = new_debt;
                        Storage::set_strategy(env, &strategy, &params);
                        DebtAllocator::publish_debt_updated(env, &strategy, current_debt, new_debt);
                    }
                }

                to_withdraw = to_withdraw.min(max_withdraw);
                if to_withdraw <= 0 {
                    continue;
                }

                let pre_balance = asset.balance(&vault);
                client.withdraw(&to_withdraw, &vault, &vault);
                let withdrawn = sub(asset.balance(&vault), pre_balance)?;

                let mut loss = 0;
                if withdrawn > to_withdraw {
                    to_withdraw = withdrawn.min(current_debt);
                } else if withdrawn < to_withdraw {
                    loss = to_withdraw - withdrawn;
                }

                idle = add(idle, to_withdraw - loss)?;
                requested -= loss;
                needed -= to_withdraw;
                state.total_debt = sub(state.total_debt, to_withdraw)?;

                let new_debt = (current_debt - (to_withdraw + loss_share)).max(0);
                params.current_debt = new_debt;
                Storage::set_strategy(env, &strategy, &params);
                DebtAllocator::publish_debt_updated(env, &strategy, current_debt, new_debt);

                if requested <= idle {
                    break;
                }
            }

            if idle < requested {
                return Err(Error::InsufficientIdle);
            }
        }

        let loss = assets - requested;
        if loss > 0 && (max_loss as i128) < MAX_BPS {
            let tolerated = mul_div(assets, max_loss as i128, MAX_BPS, Rounding::Down)?;
            if loss > tolerated {
                return Err(Error::TooMuchLoss);
            }
        }

        Ledger::burn(env, state, owner, shares)?;
        state.total_idle = sub(idle, requested)?;
        Storage::set_state(env, state);

        asset.transfer(&vault, receiver, &requested);

        env.events().publish(
            (Symbol::new(env, "withdrawn"), owner.clone()),
            WithdrawnEvent {
                sender: sender.clone(),
                receiver: receiver.clone(),
                owner: owner.clone(),
                assets: requested,
                shares,
                loss,
            },
        );
        Ok(requested)
    }

    // ============================================
    // LIMITS
    // ============================================

    pub fn max_deposit(env: &Env, receiver: &Address) -> Result<i128, Error> {
        let state = Storage::get_state(env)?;
        Self::max_deposit_for(env, &state, receiver)
    }

    fn max_deposit_for(env: &Env, state: &VaultState, receiver: &Address) -> Result<i128, Error> {
        if state.shutdown || *receiver == env.current_contract_address() {
            return Ok(0);
        }

        let config = Storage::get_config(env)?;
        if let Some(module) = config.deposit_limit_module.as_ref() {
            return Ok(DepositLimitModuleClient::new(env, module).available_deposit_limit(receiver));
        }

        if state.deposit_limit == UNLIMITED {
            return Ok(UNLIMITED);
        }
        let total_assets = Ledger::total_assets(state)?;
        Ok((state.deposit_limit - total_assets).max(0))
    }

    pub fn max_mint(env: &Env, receiver: &Address) -> Result<i128, Error> {
        let max_deposit = Self::max_deposit(env, receiver)?;
        shares_for(max_deposit, Ledger::totals(env)?, Rounding::Down)
    }

    /// Assets `owner` could withdraw right now within `max_loss`
    ///
    /// Without a withdraw limit module this walks the withdrawal queue the
    /// same way a withdrawal would, stopping before unrealised losses push
    /// past `max_loss`.
    pub fn max_withdraw(
        env: &Env,
        owner: &Address,
        max_loss: u32,
        strategies: &Vec<Address>,
    ) -> Result<i128, Error> {
        if max_loss as i128 > MAX_BPS {
            return Err(Error::InvalidMaxLoss);
        }

        let state = Storage::get_state(env)?;
        let totals = Ledger::totals(env)?;
        let max_assets = assets_for(Storage::get_balance(env, owner), totals, Rounding::Down)?;

        let config = Storage::get_config(env)?;
        if let Some(module) = config.withdraw_limit_module.as_ref() {
            let limit = WithdrawLimitModuleClient::new(env, module).available_withdraw_limit(
                owner,
                &max_loss,
                strategies,
            );
            return Ok(limit.min(max_assets));
        }

        if max_assets <= state.total_idle {
            return Ok(max_assets);
        }

        let vault = env.current_contract_address();
        let mut have = state.total_idle;
        let mut loss = 0;

        for strategy in withdrawal_queue(env, &state, strategies).iter() {
            let params = Storage::get_strategy(env, &strategy);
            if !params.is_active() {
                return Err(Error::InactiveStrategy);
            }

            let client = StrategyClient::new(env, &strategy);
            let current_debt = params.current_debt;
            let mut to_withdraw = (max_assets - have).min(current_debt);

            let strategy_assets = client.convert_to_assets(&client.balance(&vault));
            let mut unrealised = unrealised_loss_share(current_debt, strategy_assets, to_withdraw)?;

            let strategy_limit = client.max_withdraw(&vault);
            let wanted = to_withdraw - unrealised;
            if strategy_limit < wanted {
                if wanted > 0 {
                    unrealised = mul_div(unrealised, strategy_limit, wanted, Rounding::Down)?;
                }
                to_withdraw = strategy_limit + unrealised;
            }

            if to_withdraw <= 0 {
                continue;
            }

            if unrealised > 0 && (max_loss as i128) < MAX_BPS {
                let tolerated = mul_div(
                    add(have, to_withdraw)?,
                    max_loss as i128,
                    MAX_BPS,
                    Rounding::Down,
                )?;
                if add(loss, unrealised)? > tolerated {
                    break;
                }
            }

            have = add(have, to_withdraw)?;
            if have >= max_assets {
                break;
            }
            loss = add(loss, unrealised)?;
        }

        Ok(have.min(max_assets))
    }

    pub fn max_redeem(
        env: &Env,
        owner: &Address,
        max_loss: u32,
        strategies: &Vec<Address>,
    ) -> Result<i128, Error> {
        let max_withdraw = Self::max_withdraw(env, owner, max_loss, strategies)?;
        let shares = shares_for(max_withdraw, Ledger::totals(env)?, Rounding::Down)?;
        Ok(shares.min(Storage::get_balance(env, owner)))
    }

    // ============================================
    // PREVIEWS
    // ============================================

    pub fn convert_to_shares(env: &Env, assets: i128) -> Result<i128, Error> {
        shares_for(assets, Ledger::totals(env)?, Rounding::Down)
    }

    pub fn convert_to_assets(env: &Env, shares: i128) -> Result<i128, Error> {
        assets_for(shares, Ledger::totals(env)?, Rounding::Down)
    }

    pub fn preview_mint(env: &Env, shares: i128) -> Result<i128, Error> {
        assets_for(shares, Ledger::totals(env)?, Rounding::Up)
    }

    pub fn preview_withdraw(env: &Env, assets: i128) -> Result<i128, Error> {
        shares_for(assets, Ledger::totals(env)?, Rounding::Up)
    }

    pub fn price_per_share(env: &Env) -> Result<i128, Error> {
        let decimals = Storage::get_config(env)?.decimals;
        let unit = 10i128.checked_pow(decimals).ok_or(Error::MathOverflow)?;
        let totals: Totals = Ledger::totals(env)?;
        assets_for(unit, totals, Rounding::Down)
    }
}
