#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::LimitUpdatedEvent;
use storage::{Limits, Storage, UNLIMITED};

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol, Vec};

/// Governance-set deposit and withdraw caps a vault can delegate to
#[contract]
pub struct LimitModule;

#[contractimpl]
impl LimitModule {
    /// Initialize with both limits unlimited
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, governance: Address) -> Result<(), Error> {
        if Storage::has_governance(&env) {
            return Err(Error::AlreadyInitialized);
        }

        governance.require_auth();

        Storage::set_governance(&env, &governance);
        Storage::set_limits(
            &env,
            &Limits {
                deposit_limit: UNLIMITED,
                withdraw_limit: UNLIMITED,
            },
        );
        Ok(())
    }

    /// # Errors
    /// - `Unauthorized`: Caller is not governance
    /// - `InvalidAmount`: Negative limit
    pub fn set_deposit_limit(env: Env, caller: Address, limit: i128) -> Result<(), Error> {
        let mut limits = Self::authorize(&env, &caller, limit)?;
        limits.deposit_limit = limit;
        Storage::set_limits(&env, &limits);

        env.events().publish(
            (Symbol::new(&env, "deposit_limit_updated"),),
            LimitUpdatedEvent { new_limit: limit },
        );
        Ok(())
    }

    pub fn set_withdraw_limit(env: Env, caller: Address, limit: i128) -> Result<(), Error> {
        let mut limits = Self::authorize(&env, &caller, limit)?;
        limits.withdraw_limit = limit;
        Storage::set_limits(&env, &limits);

        env.events().publish(
            (Symbol::new(&env, "withdraw_limit_updated"),),
            LimitUpdatedEvent { new_limit: limit },
        );
        Ok(())
    }

    pub fn available_deposit_limit(env: Env, _receiver: Address) -> Result<i128, Error> {
        Ok(Storage::get_limits(&env)?.deposit_limit)
    }

    pub fn available_withdraw_limit(
        env: Env,
        _owner: Address,
        _max_loss: u32,
        _strategies: Vec<Address>,
    ) -> Result<i128, Error> {
        Ok(Storage::get_limits(&env)?.withdraw_limit)
    }
}

impl LimitModule {
    fn authorize(env: &Env, caller: &Address, limit: i128) -> Result<Limits, Error> {
        caller.require_auth();

        if *caller != Storage::get_governance(env)? {
            return Err(Error::Unauthorized);
        }
        if limit < 0 {
            return Err(Error::InvalidAmount);
        }
        Storage::get_limits(env)
    }
}
