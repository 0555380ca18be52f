use crate::storage::FeeConfig;
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReportEvent {
    pub strategy: Address,
    pub gain: i128,
    pub loss: i128,
    pub total_fees: i128,
    pub total_refunds: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeConfigUpdatedEvent {
    /// `None` for the default configuration
    pub strategy: Option<Address>,
    pub config: FeeConfig,
}
