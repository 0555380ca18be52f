use crate::debt::DebtAllocator;
use crate::error::Error;
use crate::events::StrategyReportedEvent;
use crate::interfaces::AccountantClient;
use crate::ledger::{shares_for, Ledger};
use crate::math::{add, mul_div, sub, Rounding};
use crate::storage::{Storage, VaultState, MAX_BPS};
use crate::unlock::ProfitUnlockEngine;
use soroban_sdk::{log, token, Address, Env, Symbol};

/// Outcome of a strategy report
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReportOutcome {
    pub gain: i128,
    pub loss: i128,
    pub total_fees: i128,
    pub total_refunds: i128,
}

pub struct ReportProcessor;

impl ReportProcessor {
    /// Reconcile a strategy's recorded debt with what it is worth now
    ///
    /// Gains and accountant refunds are minted as locked shares to the vault
    /// and released over the profit unlock window. Losses and fees burn from
    /// that locked buffer first; anything beyond it lowers the share price.
    /// Fees are paid in shares to the accountant and the protocol recipient.
    ///
    /// # Errors
    /// - `InactiveStrategy` if the strategy is not active
    pub fn process_report(
        env: &Env,
        state: &mut VaultState,
        strategy: &Address,
    ) -> Result<ReportOutcome, Error> {
        let mut params = Storage::get_strategy(env, strategy);
        if !params.is_active() {
            return Err(Error::InactiveStrategy);
        }

        let vault = env.current_contract_address();
        let config = Storage::get_config(env)?;
        let fee_config = Storage::get_fees(env)?;
        let unlock = Storage::get_unlock(env)?;
        let asset = token::Client::new(env, &config.asset);

        let strategy_assets = DebtAllocator::strategy_assets(env, strategy);
        let current_debt = params.current_debt;
        let (gain, loss) = if strategy_assets > current_debt {
            (strategy_assets - current_debt, 0)
        } else {
            (0, current_debt - strategy_assets)
        };

        let mut total_fees = 0;
        let mut total_refunds = 0;
        if let Some(accountant) = config.accountant.as_ref() {
            let (fees, refunds) = AccountantClient::new(env, accountant).report(strategy, &gain, &loss);
            total_fees = fees.max(0);
            if refunds > 0 {
                total_refunds = refunds
                    .min(asset.balance(accountant))
                    .min(asset.allowance(accountant, &vault))
                    .max(0);
            }
        }

        // Everything is priced at the pre-report totals
        let totals = Ledger::synced_totals(state)?;

        let mut shares_to_burn = 0;
        let mut total_fees_shares = 0;
        let mut protocol_fee_shares = 0;
        let charged = add(loss, total_fees)?;
        if charged > 0 {
            shares_to_burn = shares_for(charged, totals, Rounding::Up)?;
            if total_fees > 0 {
                total_fees_shares = mul_div(shares_to_burn, total_fees, charged, Rounding::Down)?;
                if fee_config.protocol_fee_recipient.is_some() {
                    protocol_fee_shares = mul_div(
                        total_fees_shares,
                        fee_config.protocol_fee_bps as i128,
                        MAX_BPS,
                        Rounding::Down,
                    )?;
                }
            }
        }

        let mut shares_to_lock = 0;
        let profit = add(gain, total_refunds)?;
        if profit > 0 && unlock.profit_max_unlock_time != 0 {
            shares_to_lock = shares_for(profit, totals, Rounding::Down)?;
        }

        // Net the lock against the burn on the vault's own balance
        let total_supply = state.total_supply;
        let ending_supply = sub(add(total_supply, shares_to_lock)?, shares_to_burn)?;
        if ending_supply > total_supply {
            Ledger::mint(env, state, &vault, ending_supply - total_supply)?;
        } else if ending_supply < total_supply {
            let locked = Storage::get_balance(env, &vault);
            Ledger::burn(env, state, &vault, (total_supply - ending_supply).min(locked))?;
        }
        let newly_locked = (shares_to_lock - shares_to_burn).max(0);

        if total_refunds > 0 {
            if let Some(accountant) = config.accountant.as_ref() {
                asset.transfer_from(&vault, accountant, &vault, &total_refunds);
                state.total_idle = add(state.total_idle, total_refunds)?;
            }
        }

        if gain > 0 {
            params.current_debt = add(current_debt, gain)?;
            state.total_debt = add(state.total_debt, gain)?;
        } else if loss > 0 {
            params.current_debt = sub(current_debt, loss)?;
            state.total_debt = sub(state.total_debt, loss)?;
        }

        if total_fees_shares > 0 {
            if let Some(accountant) = config.accountant.as_ref() {
                Ledger::mint(env, state, accountant, total_fees_shares - protocol_fee_shares)?;
            }
            if let Some(recipient) = fee_config.protocol_fee_recipient.as_ref() {
                Ledger::mint(env, state, recipient, protocol_fee_shares)?;
            }
        }

        ProfitUnlockEngine::relock(env, newly_locked)?;

        params.last_report = env.ledger().timestamp();
        Storage::set_strategy(env, strategy, &params);

        let protocol_fees = if fee_config.protocol_fee_recipient.is_some() {
            mul_div(total_fees, fee_config.protocol_fee_bps as i128, MAX_BPS, Rounding::Down)?
        } else {
            0
        };

        log!(env, "strategy reported", strategy.clone(), gain, loss, total_fees);
        env.events().publish(
            (Symbol::new(env, "strategy_reported"), strategy.clone()),
            StrategyReportedEvent {
                strategy: strategy.clone(),
                gain,
                loss,
                current_debt: params.current_debt,
                protocol_fees,
                total_fees,
                total_refunds,
            },
        );

        Ok(ReportOutcome {
            gain,
            loss,
            total_fees,
            total_refunds,
        })
    }
}
