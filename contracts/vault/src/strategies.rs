use crate::error::Error;
use crate::events::{
    StrategyChangedEvent, StrategyReportedEvent, UpdateDefaultQueueEvent, UpdatedMaxDebtEvent,
};
use crate::interfaces::StrategyClient;
use crate::math::sub;
use crate::storage::{
    StrategyChangeType, StrategyParams, Storage, VaultState, MAX_QUEUE,
};
use soroban_sdk::{log, Address, Env, Symbol, Vec};

pub struct Strategies;

impl Strategies {
    /// Register a strategy, optionally appending it to the default queue
    ///
    /// The queue silently stays as is once it holds `MAX_QUEUE` entries.
    ///
    /// # Errors
    /// - `InvalidStrategy` if `strategy` is the vault itself
    /// - `InvalidAsset` if the strategy manages another asset
    /// - `StrategyAlreadyActive` if it was already added
    pub fn add(env: &Env, strategy: &Address, add_to_queue: bool) -> Result<(), Error> {
        if *strategy == env.current_contract_address() {
            return Err(Error::InvalidStrategy);
        }

        let config = Storage::get_config(env)?;
        if StrategyClient::new(env, strategy).asset() != config.asset {
            return Err(Error::InvalidAsset);
        }

        if Storage::get_strategy(env, strategy).is_active() {
            return Err(Error::StrategyAlreadyActive);
        }

        let now = env.ledger().timestamp();
        Storage::set_strategy(
            env,
            strategy,
            &StrategyParams {
                activation: now,
                last_report: now,
                current_debt: 0,
                max_debt: 0,
            },
        );

        if add_to_queue {
            let mut queue = Storage::get_default_queue(env);
            if queue.len() < MAX_QUEUE {
                queue.push_back(strategy.clone());
                Storage::set_default_queue(env, &queue);
            }
        }

        log!(env, "strategy added", strategy.clone());
        Self::publish_change(env, strategy, StrategyChangeType::Added);
        Ok(())
    }

    /// Remove a strategy from the vault and the default queue
    ///
    /// A forced revoke writes any outstanding debt off as a loss.
    ///
    /// # Errors
    /// - `StrategyNotActive` if the strategy was never added
    /// - `StrategyHasDebt` if it still carries debt and `force` is false
    pub fn revoke(
        env: &Env,
        state: &mut VaultState,
        strategy: &Address,
        force: bool,
    ) -> Result<(), Error> {
        let params = Storage::get_strategy(env, strategy);
        if !params.is_active() {
            return Err(Error::StrategyNotActive);
        }

        let loss = params.current_debt;
        if loss != 0 {
            if !force {
                return Err(Error::StrategyHasDebt);
            }
            state.total_debt = sub(state.total_debt, loss)?;

            log!(env, "strategy force revoked with loss", strategy.clone(), loss);
            env.events().publish(
                (Symbol::new(env, "strategy_reported"), strategy.clone()),
                StrategyReportedEvent {
                    strategy: strategy.clone(),
                    gain: 0,
                    loss,
                    current_debt: 0,
                    protocol_fees: 0,
                    total_fees: 0,
                    total_refunds: 0,
                },
            );
        }

        Storage::remove_strategy(env, strategy);

        let queue = Storage::get_default_queue(env);
        let mut remaining = Vec::new(env);
        for entry in queue.iter() {
            if entry != *strategy {
                remaining.push_back(entry);
            }
        }
        Storage::set_default_queue(env, &remaining);

        Self::publish_change(env, strategy, StrategyChangeType::Revoked);
        Ok(())
    }

    /// # Errors
    /// - `QueueTooLong` if more than `MAX_QUEUE` entries are given
    /// - `InactiveStrategy` if any entry is not an active strategy
    pub fn set_default_queue(env: &Env, queue: &Vec<Address>) -> Result<(), Error> {
        if queue.len() > MAX_QUEUE {
            return Err(Error::QueueTooLong);
        }
        for strategy in queue.iter() {
            if !Storage::get_strategy(env, &strategy).is_active() {
                return Err(Error::InactiveStrategy);
            }
        }

        Storage::set_default_queue(env, queue);

        env.events().publish(
            (Symbol::new(env, "update_default_queue"),),
            UpdateDefaultQueueEvent {
                new_default_queue: queue.clone(),
            },
        );
        Ok(())
    }

    pub fn update_max_debt(
        env: &Env,
        sender: &Address,
        strategy: &Address,
        new_max_debt: i128,
    ) -> Result<(), Error> {
        if new_max_debt < 0 {
            return Err(Error::InvalidAmount);
        }
        let mut params = Storage::get_strategy(env, strategy);
        if !params.is_active() {
            return Err(Error::InactiveStrategy);
        }
        params.max_debt = new_max_debt;
        Storage::set_strategy(env, strategy, &params);

        env.events().publish(
            (Symbol::new(env, "updated_max_debt"), strategy.clone()),
            UpdatedMaxDebtEvent {
                sender: sender.clone(),
                strategy: strategy.clone(),
                new_debt: new_max_debt,
            },
        );
        Ok(())
    }

    fn publish_change(env: &Env, strategy: &Address, change_type: StrategyChangeType) {
        env.events().publish(
            (Symbol::new(env, "strategy_changed"), strategy.clone()),
            StrategyChangedEvent {
                strategy: strategy.clone(),
                change_type,
            },
        );
    }
}
