use crate::error::Error;
use soroban_sdk::{contracttype, Address, Env, String, Vec};

// Constants
pub const MAX_BPS: i128 = 10_000; // 100% = 10,000 basis points
pub const MAX_BPS_EXTENDED: i128 = 1_000_000_000_000; // unlocking rate precision
pub const MAX_QUEUE: u32 = 10;
pub const SECONDS_PER_YEAR: u64 = 31_556_952;
/// Sentinel for "no limit" on deposit limits, max debt and conversions.
pub const UNLIMITED: i128 = i128::MAX;

/// Static vault configuration and pluggable collaborators
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultConfig {
    /// Underlying token accepted by the vault
    pub asset: Address,
    pub name: String,
    pub symbol: String,
    /// Share decimals, copied from the asset
    pub decimals: u32,
    /// Fee / refund policy consulted on every report
    pub accountant: Option<Address>,
    pub deposit_limit_module: Option<Address>,
    pub withdraw_limit_module: Option<Address>,
}

/// Pool-wide accounting
///
/// `total_idle + total_debt` is the vault's total assets. `total_supply` is the
/// raw minted supply and still contains shares that unlocked since the last
/// catch-up.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultState {
    /// Assets held directly by the vault
    pub total_idle: i128,
    /// Sum of `current_debt` over every strategy
    pub total_debt: i128,
    /// Raw share supply (including the vault's locked shares)
    pub total_supply: i128,
    /// Idle floor kept out of strategies
    pub minimum_total_idle: i128,
    /// Cap on total assets accepted through deposits
    pub deposit_limit: i128,
    /// Push new deposits into the default queue
    pub auto_allocate: bool,
    /// Ignore caller supplied withdrawal queues
    pub use_default_queue: bool,
    pub shutdown: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeConfig {
    /// Annualized management fee in basis points of supply
    pub management_fee: u32,
    pub fee_recipient: Option<Address>,
    /// Timestamp the management fee was last accrued up to
    pub last_fee_charge: u64,
    /// Share of report fees routed to the protocol, in basis points
    pub protocol_fee_bps: u32,
    pub protocol_fee_recipient: Option<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProfitUnlock {
    /// Window new profit is spread over
    pub profit_max_unlock_time: u64,
    /// Timestamp at which every locked share is released
    pub full_profit_unlock_date: u64,
    /// Shares released per second, scaled by MAX_BPS_EXTENDED
    pub profit_unlocking_rate: i128,
    pub last_profit_update: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrategyParams {
    /// Timestamp the strategy was added, 0 when inactive
    pub activation: u64,
    pub last_report: u64,
    /// Assets the vault considers lent to the strategy
    pub current_debt: i128,
    pub max_debt: i128,
}

impl StrategyParams {
    pub fn inactive() -> Self {
        StrategyParams {
            activation: 0,
            last_report: 0,
            current_debt: 0,
            max_debt: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.activation != 0
    }
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StrategyChangeType {
    Added = 0,
    Revoked = 1,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
    State,
    Fees,
    Unlock,
    DefaultQueue,
    Strategy(Address),
    Balance(Address),
    Allowance(Address, Address), // (owner, spender)
    Roles(Address),
}

pub struct Storage;

impl Storage {
    // Config
    pub fn is_initialized(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::Config)
    }

    pub fn get_config(env: &Env) -> Result<VaultConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_config(env: &Env, config: &VaultConfig) {
        env.storage().instance().set(&DataKey::Config, config);
    }

    // Pool state
    pub fn get_state(env: &Env) -> Result<VaultState, Error> {
        env.storage()
            .instance()
            .get(&DataKey::State)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_state(env: &Env, state: &VaultState) {
        env.storage().instance().set(&DataKey::State, state);
    }

    // Fees
    pub fn get_fees(env: &Env) -> Result<FeeConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Fees)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_fees(env: &Env, fees: &FeeConfig) {
        env.storage().instance().set(&DataKey::Fees, fees);
    }

    // Profit unlocking
    pub fn get_unlock(env: &Env) -> Result<ProfitUnlock, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Unlock)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_unlock(env: &Env, unlock: &ProfitUnlock) {
        env.storage().instance().set(&DataKey::Unlock, unlock);
    }

    // Default queue
    pub fn get_default_queue(env: &Env) -> Vec<Address> {
        env.storage()
            .instance()
            .get(&DataKey::DefaultQueue)
            .unwrap_or_else(|| Vec::new(env))
    }

    pub fn set_default_queue(env: &Env, queue: &Vec<Address>) {
        env.storage().instance().set(&DataKey::DefaultQueue, queue);
    }

    // Strategies
    pub fn get_strategy(env: &Env, strategy: &Address) -> StrategyParams {
        env.storage()
            .persistent()
            .get(&DataKey::Strategy(strategy.clone()))
            .unwrap_or_else(StrategyParams::inactive)
    }

    pub fn set_strategy(env: &Env, strategy: &Address, params: &StrategyParams) {
        env.storage()
            .persistent()
            .set(&DataKey::Strategy(strategy.clone()), params);
    }

    pub fn remove_strategy(env: &Env, strategy: &Address) {
        env.storage()
            .persistent()
            .remove(&DataKey::Strategy(strategy.clone()));
    }

    // Share balances
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

    pub fn get_allowance(env: &Env, owner: &Address, spender: &Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Allowance(owner.clone(), spender.clone()))
            .unwrap_or(0)
    }

    pub fn set_allowance(env: &Env, owner: &Address, spender: &Address, amount: i128) {
        let key = DataKey::Allowance(owner.clone(), spender.clone());
        if amount == 0 {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, &amount);
        }
    }

    // Roles
    pub fn get_roles(env: &Env, account: &Address) -> u32 {
        env.storage()
            .persistent()
            .get(&DataKey::Roles(account.clone()))
            .unwrap_or(0)
    }

    pub fn set_roles(env: &Env, account: &Address, roles: u32) {
        let key = DataKey::Roles(account.clone());
        if roles == 0 {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, &roles);
        }
    }
}
