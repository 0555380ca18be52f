#![no_std]

mod error;
mod events;
mod fees;
mod interfaces;
mod storage;

pub use error::Error;
use events::{FeeConfigUpdatedEvent, ReportEvent};
use interfaces::StrategyClient;
pub use storage::FeeConfig;
use storage::{AccountantConfig, Storage};

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Symbol};

/// Fee and refund policy for one vault
///
/// Fees are taken in vault shares by the vault itself; refunds are paid
/// out of this contract's asset balance through an allowance to the vault.
#[contract]
pub struct Accountant;

#[contractimpl]
impl Accountant {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the accountant with zero fees
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, governance: Address, asset: Address, vault: Address) -> Result<(), Error> {
        if Storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }

        governance.require_auth();

        Storage::set_config(
            &env,
            &AccountantConfig {
                governance,
                asset,
                vault,
            },
        );
        Storage::set_default_fees(
            &env,
            &FeeConfig {
                management_fee: 0,
                performance_fee: 0,
                refund_ratio: 0,
            },
        );
        Ok(())
    }

    /// # Errors
    /// - `Unauthorized`: Caller is not governance
    /// - `InvalidFee`: Fee above 10_000
    pub fn set_management_fee(env: Env, caller: Address, fee_bps: u32) -> Result<(), Error> {
        Self::update_default(&env, &caller, |fees| fees.management_fee = fee_bps)
    }

    pub fn set_performance_fee(env: Env, caller: Address, fee_bps: u32) -> Result<(), Error> {
        Self::update_default(&env, &caller, |fees| fees.performance_fee = fee_bps)
    }

    pub fn set_refund_ratio(env: Env, caller: Address, ratio_bps: u32) -> Result<(), Error> {
        Self::update_default(&env, &caller, |fees| fees.refund_ratio = ratio_bps)
    }

    /// Override the default policy for one strategy, `None` removes the override
    pub fn set_fee_config(
        env: Env,
        caller: Address,
        strategy: Address,
        config: Option<FeeConfig>,
    ) -> Result<(), Error> {
        Self::require_governance(&env, &caller)?;
        if let Some(config) = config.as_ref() {
            fees::validate(config)?;
        }
        Storage::set_custom_fees(&env, &strategy, &config);

        let effective = Self::fees(env.clone(), strategy.clone())?;
        env.events().publish(
            (Symbol::new(&env, "fee_config_updated"), strategy.clone()),
            FeeConfigUpdatedEvent {
                strategy: Some(strategy),
                config: effective,
            },
        );
        Ok(())
    }

    /// Let the vault pull up to `amount` of refunds
    pub fn approve_vault(
        env: Env,
        caller: Address,
        amount: i128,
        expiration_ledger: u32,
    ) -> Result<(), Error> {
        let config = Self::require_governance(&env, &caller)?;
        token::Client::new(&env, &config.asset).approve(
            &env.current_contract_address(),
            &config.vault,
            &amount,
            &expiration_ledger,
        );
        Ok(())
    }

    // ============================================
    // VAULT INTERFACE
    // ============================================

    /// Fees and refunds owed on a strategy report
    ///
    /// Returns `(total_fees, total_refunds)` in asset units. Refunds never
    /// exceed this contract's asset balance.
    pub fn report(env: Env, strategy: Address, gain: i128, loss: i128) -> Result<(i128, i128), Error> {
        let config = Storage::get_config(&env)?;
        config.vault.require_auth();

        let fee_config = Self::fees(env.clone(), strategy.clone())?;
        let now = env.ledger().timestamp();
        let elapsed = Storage::get_last_report(&env, &strategy)
            .map(|last| now.saturating_sub(last))
            .unwrap_or(0);

        let client = StrategyClient::new(&env, &strategy);
        let value = client.convert_to_assets(&client.balance(&config.vault));

        let (total_fees, mut total_refunds) = fees::assess(&fee_config, value, gain, loss, elapsed)?;
        if total_refunds > 0 {
            let balance = token::Client::new(&env, &config.asset).balance(&env.current_contract_address());
            total_refunds = total_refunds.min(balance);
        }

        Storage::set_last_report(&env, &strategy, now);

        log!(&env, "report assessed", strategy.clone(), total_fees, total_refunds);
        env.events().publish(
            (Symbol::new(&env, "report"), strategy.clone()),
            ReportEvent {
                strategy,
                gain,
                loss,
                total_fees,
                total_refunds,
            },
        );
        Ok((total_fees, total_refunds))
    }

    // ============================================
    // VIEWS
    // ============================================

    /// Policy applied to `strategy`
    pub fn fees(env: Env, strategy: Address) -> Result<FeeConfig, Error> {
        match Storage::get_custom_fees(&env, &strategy) {
            Some(custom) => Ok(custom),
            None => Storage::get_default_fees(&env),
        }
    }

    pub fn default_fees(env: Env) -> Result<FeeConfig, Error> {
        Storage::get_default_fees(&env)
    }

    pub fn vault(env: Env) -> Result<Address, Error> {
        Ok(Storage::get_config(&env)?.vault)
    }
}

impl Accountant {
    fn require_governance(env: &Env, caller: &Address) -> Result<AccountantConfig, Error> {
        caller.require_auth();

        let config = Storage::get_config(env)?;
        if *caller != config.governance {
            return Err(Error::Unauthorized);
        }
        Ok(config)
    }

    fn update_default(env: &Env, caller: &Address, update: impl FnOnce(&mut FeeConfig)) -> Result<(), Error> {
        Self::require_governance(env, caller)?;

        let mut default = Storage::get_default_fees(env)?;
        update(&mut default);
        fees::validate(&default)?;
        Storage::set_default_fees(env, &default);

        env.events().publish(
            (Symbol::new(env, "fee_config_updated"),),
            FeeConfigUpdatedEvent {
                strategy: None,
                config: default,
            },
        );
        Ok(())
    }
}
