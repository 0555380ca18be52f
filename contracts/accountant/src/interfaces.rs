// Only the generated clients are called
#![allow(dead_code)]

use soroban_sdk::{contractclient, Address, Env};

/// Read-only view of a strategy used to value the vault's position
#[contractclient(name = "StrategyClient")]
pub trait StrategyInterface {
    fn balance(env: Env, id: Address) -> i128;

    fn convert_to_assets(env: Env, shares: i128) -> i128;
}
