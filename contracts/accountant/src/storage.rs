use crate::error::Error;
use soroban_sdk::{contracttype, Address, Env};

pub const MAX_BPS: i128 = 10_000;
pub const SECONDS_PER_YEAR: u64 = 31_556_952;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountantConfig {
    pub governance: Address,
    pub asset: Address,
    /// Only caller allowed to report
    pub vault: Address,
}

/// Fee policy, all values in basis points
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeConfig {
    /// Annualized fee on the strategy's value
    pub management_fee: u32,
    /// Fee on reported gains
    pub performance_fee: u32,
    /// Share of gains and losses paid back to the vault
    pub refund_ratio: u32,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
    DefaultFees,
    CustomFees(Address),
    LastReport(Address),
}

pub struct Storage;

impl Storage {
    pub fn is_initialized(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::Config)
    }

    pub fn get_config(env: &Env) -> Result<AccountantConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_config(env: &Env, config: &AccountantConfig) {
        env.storage().instance().set(&DataKey::Config, config);
    }

    pub fn get_default_fees(env: &Env) -> Result<FeeConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::DefaultFees)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_default_fees(env: &Env, fees: &FeeConfig) {
        env.storage().instance().set(&DataKey::DefaultFees, fees);
    }

    pub fn get_custom_fees(env: &Env, strategy: &Address) -> Option<FeeConfig> {
        env.storage()
            .persistent()
            .get(&DataKey::CustomFees(strategy.clone()))
    }

    pub fn set_custom_fees(env: &Env, strategy: &Address, fees: &Option<FeeConfig>) {
        let key = DataKey::CustomFees(strategy.clone());
        match fees {
            Some(fees) => env.storage().persistent().set(&key, fees),
            None => env.storage().persistent().remove(&key),
        }
    }

    pub fn get_last_report(env: &Env, strategy: &Address) -> Option<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::LastReport(strategy.clone()))
    }

    pub fn set_last_report(env: &Env, strategy: &Address, timestamp: u64) {
        env.storage()
            .persistent()
            .set(&DataKey::LastReport(strategy.clone()), &timestamp);
    }
}
