use crate::error::Error;
use soroban_sdk::{contracttype, Address, Env};

pub const UNLIMITED: i128 = i128::MAX;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Limits {
    /// Assets any receiver may still deposit
    pub deposit_limit: i128,
    /// Assets any owner may withdraw in one call
    pub withdraw_limit: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Governance,
    Limits,
}

pub struct Storage;

impl Storage {
    pub fn has_governance(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::Governance)
    }

    pub fn get_governance(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Governance)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_governance(env: &Env, governance: &Address) {
        env.storage().instance().set(&DataKey::Governance, governance);
    }

    pub fn get_limits(env: &Env) -> Result<Limits, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Limits)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_limits(env: &Env, limits: &Limits) {
        env.storage().instance().set(&DataKey::Limits, limits);
    }
}
