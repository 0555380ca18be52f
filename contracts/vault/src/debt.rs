use crate::error::Error;
use crate::events::{DebtPurchasedEvent, DebtUpdatedEvent};
use crate::interfaces::StrategyClient;
use crate::math::{add, mul_div, sub, Rounding};
use crate::storage::{Storage, VaultState, MAX_BPS, UNLIMITED};
use soroban_sdk::{log, token, Address, Env, Symbol};

/// Part of `assets_needed` the caller must absorb when the strategy is worth
/// less than its recorded debt
///
/// Formula: assets_needed − assets_needed × strategy_assets / current_debt,
/// rounded against the caller.
pub fn unrealised_loss_share(
    current_debt: i128,
    strategy_assets: i128,
    assets_needed: i128,
) -> Result<i128, Error> {
    if strategy_assets >= current_debt || current_debt == 0 {
        return Ok(0);
    }
    let users_share = mul_div(assets_needed, strategy_assets, current_debt, Rounding::Down)?;
    sub(assets_needed, users_share)
}

pub struct DebtAllocator;

impl DebtAllocator {
    /// Value of the vault's position in `strategy`
    pub fn strategy_assets(env: &Env, strategy: &Address) -> i128 {
        let client = StrategyClient::new(env, strategy);
        let shares = client.balance(&env.current_contract_address());
        client.convert_to_assets(&shares)
    }

    pub fn assess_share_of_unrealised_losses(
        env: &Env,
        strategy: &Address,
        current_debt: i128,
        assets_needed: i128,
    ) -> Result<i128, Error> {
        let strategy_assets = Self::strategy_assets(env, strategy);
        unrealised_loss_share(current_debt, strategy_assets, assets_needed)
    }

    /// Move the strategy's debt toward `target_debt`
    ///
    /// Increases are capped by the strategy's max debt, its max deposit and
    /// the idle above the minimum floor. Decreases may be raised to restore
    /// the floor and accept partial fulfilment within `max_loss`. When the
    /// vault is shut down the target is always zero.
    ///
    /// Returns the strategy's new debt.
    ///
    /// # Errors
    /// - `InactiveStrategy` if the strategy is not active
    /// - `NoDebtChange` if the target equals the current debt
    /// - `NothingToWithdraw` if the strategy cannot release anything
    /// - `UnrealisedLosses` if the strategy must report a loss first
    /// - `TooMuchLoss` if the realised shortfall exceeds `max_loss`
    pub fn update_debt(
        env: &Env,
        state: &mut VaultState,
        strategy: &Address,
        target_debt: i128,
        max_loss: u32,
    ) -> Result<i128, Error> {
        if target_debt < 0 {
            return Err(Error::InvalidAmount);
        }
        if max_loss as i128 > MAX_BPS {
            return Err(Error::InvalidMaxLoss);
        }

        let mut params = Storage::get_strategy(env, strategy);
        if !params.is_active() {
            return Err(Error::InactiveStrategy);
        }

        let mut new_debt = if state.shutdown { 0 } else { target_debt };
        let current_debt = params.current_debt;
        if new_debt == current_debt {
            return Err(Error::NoDebtChange);
        }

        let vault = env.current_contract_address();
        let client = StrategyClient::new(env, strategy);
        let asset = token::Client::new(env, &Storage::get_config(env)?.asset);

        if current_debt > new_debt {
            let mut assets_to_withdraw = current_debt - new_debt;

            // Keep the idle floor even if that means pulling more
            if add(state.total_idle, assets_to_withdraw)? < state.minimum_total_idle {
                assets_to_withdraw = (state.minimum_total_idle - state.total_idle).min(current_debt);
            }

            let withdrawable = client.max_withdraw(&vault);
            if withdrawable == 0 {
                return Err(Error::NothingToWithdraw);
            }
            assets_to_withdraw = assets_to_withdraw.min(withdrawable);

            let unrealised =
                Self::assess_share_of_unrealised_losses(env, strategy, current_debt, assets_to_withdraw)?;
            if unrealised != 0 {
                return Err(Error::UnrealisedLosses);
            }

            let pre_balance = asset.balance(&vault);
            client.withdraw(&assets_to_withdraw, &vault, &vault);
            let post_balance = asset.balance(&vault);

            let withdrawn = sub(post_balance, pre_balance)?.min(current_debt);

            if withdrawn < assets_to_withdraw && (max_loss as i128) < MAX_BPS {
                let loss = assets_to_withdraw - withdrawn;
                let tolerated = mul_div(assets_to_withdraw, max_loss as i128, MAX_BPS, Rounding::Down)?;
                if loss > tolerated {
                    return Err(Error::TooMuchLoss);
                }
            } else if withdrawn > assets_to_withdraw {
                assets_to_withdraw = withdrawn;
            }

            state.total_idle = add(state.total_idle, withdrawn)?;
            state.total_debt = sub(state.total_debt, assets_to_withdraw)?;
            new_debt = current_debt - assets_to_withdraw;
        } else {
            if new_debt > params.max_debt {
                new_debt = params.max_debt;
                if new_debt < current_debt {
                    return Ok(current_debt);
                }
            }

            let max_deposit = client.max_deposit(&vault);
            if max_deposit <= 0 {
                return Ok(current_debt);
            }
            if state.total_idle <= state.minimum_total_idle {
                return Ok(current_debt);
            }

            let available_idle = state.total_idle - state.minimum_total_idle;
            let assets_to_deposit = (new_debt - current_debt)
                .min(max_deposit)
                .min(available_idle);

            if assets_to_deposit > 0 {
                asset.transfer(&vault, strategy, &assets_to_deposit);
                client.deposit(&assets_to_deposit, &vault);

                state.total_idle = sub(state.total_idle, assets_to_deposit)?;
                state.total_debt = add(state.total_debt, assets_to_deposit)?;
            }
            new_debt = current_debt + assets_to_deposit;
        }

        if new_debt == current_debt {
            return Ok(current_debt);
        }

        params.current_debt = new_debt;
        Storage::set_strategy(env, strategy, &params);

        log!(env, "debt updated", strategy.clone(), current_debt, new_debt);
        Self::publish_debt_updated(env, strategy, current_debt, new_debt);
        Ok(new_debt)
    }

    /// Push idle above the floor into the default queue, in order
    pub fn auto_allocate(env: &Env, state: &mut VaultState) -> Result<(), Error> {
        for strategy in Storage::get_default_queue(env).iter() {
            if state.total_idle <= state.minimum_total_idle {
                break;
            }
            match Self::update_debt(env, state, &strategy, UNLIMITED, 0) {
                Ok(_) | Err(Error::NoDebtChange) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Sell part of a strategy position to `buyer` at book value
    ///
    /// The buyer pays `amount` of the asset into idle and receives the
    /// matching fraction of the vault's strategy shares.
    ///
    /// # Errors
    /// - `InactiveStrategy` if the strategy is not active
    /// - `NothingToBuy` if it has no debt or `amount` is not positive
    /// - `CannotBuyZero` if the purchase maps to zero strategy shares
    pub fn buy_debt(
        env: &Env,
        state: &mut VaultState,
        buyer: &Address,
        strategy: &Address,
        amount: i128,
    ) -> Result<i128, Error> {
        let mut params = Storage::get_strategy(env, strategy);
        if !params.is_active() {
            return Err(Error::InactiveStrategy);
        }

        let current_debt = params.current_debt;
        if current_debt <= 0 || amount <= 0 {
            return Err(Error::NothingToBuy);
        }
        let amount = amount.min(current_debt);

        let vault = env.current_contract_address();
        let client = StrategyClient::new(env, strategy);
        let shares = mul_div(client.balance(&vault), amount, current_debt, Rounding::Down)?;
        if shares == 0 {
            return Err(Error::CannotBuyZero);
        }

        let asset = token::Client::new(env, &Storage::get_config(env)?.asset);
        asset.transfer(buyer, &vault, &amount);

        let new_debt = current_debt - amount;
        params.current_debt = new_debt;
        Storage::set_strategy(env, strategy, &params);
        state.total_debt = sub(state.total_debt, amount)?;
        state.total_idle = add(state.total_idle, amount)?;

        Self::publish_debt_updated(env, strategy, current_debt, new_debt);

        client.transfer(&vault, buyer, &shares);

        log!(env, "debt purchased", strategy.clone(), amount, shares);
        env.events().publish(
            (Symbol::new(env, "debt_purchased"), strategy.clone()),
            DebtPurchasedEvent {
                strategy: strategy.clone(),
                amount,
            },
        );
        Ok(amount)
    }

    pub fn publish_debt_updated(env: &Env, strategy: &Address, current_debt: i128, new_debt: i128) {
        env.events().publish(
            (Symbol::new(env, "debt_updated"), strategy.clone()),
            DebtUpdatedEvent {
                strategy: strategy.clone(),
                current_debt,
                new_debt,
            },
        );
    }
}
