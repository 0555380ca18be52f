use crate::error::Error;
use soroban_sdk::{contracttype, Address, Env};

pub const UNLIMITED: i128 = i128::MAX;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrategyConfig {
    /// Operator allowed to turn the test knobs
    pub admin: Address,
    pub asset: Address,
    /// Only depositor
    pub vault: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrategyState {
    /// Assets backing the share supply
    pub total_assets: i128,
    pub total_supply: i128,
    /// Assets that cannot be withdrawn
    pub locked: i128,
    /// Assets withheld from upcoming withdrawals
    pub pending_loss: i128,
    /// Cap on total assets accepted through deposits
    pub max_debt: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
    State,
    Balance(Address),
}

pub struct Storage;

impl Storage {
    pub fn is_initialized(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::Config)
    }

    pub fn get_config(env: &Env) -> Result<StrategyConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_config(env: &Env, config: &StrategyConfig) {
        env.storage().instance().set(&DataKey::Config, config);
    }

    pub fn get_state(env: &Env) -> Result<StrategyState, Error> {
        env.storage()
            .instance()
            .get(&DataKey::State)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_state(env: &Env, state: &StrategyState) {
        env.storage().instance().set(&DataKey::State, state);
    }

    pub fn get_balance(env: &Env, owner: &Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Balance(owner.clone()))
            .unwrap_or(0)
    }

    pub fn set_balance(env: &Env, owner: &Address, amount: i128) {
        let key = DataKey::Balance(owner.clone());
        if amount == 0 {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, &amount);
        }
    }
}
