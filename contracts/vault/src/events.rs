use crate::storage::StrategyChangeType;
use soroban_sdk::{contracttype, Address, Vec};

// ============================================
// SHARE TOKEN
// ============================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub sender: Address,
    pub owner: Address,
    pub assets: i128,
    pub shares: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub sender: Address,
    pub receiver: Address,
    pub owner: Address,
    pub assets: i128,
    pub shares: i128,
    /// Unrealised or realised strategy loss charged to this withdrawal
    pub loss: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApprovalEvent {
    pub owner: Address,
    pub spender: Address,
    pub amount: i128,
}

// ============================================
// STRATEGIES & DEBT
// ============================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrategyChangedEvent {
    pub strategy: Address,
    pub change_type: StrategyChangeType,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrategyReportedEvent {
    pub strategy: Address,
    pub gain: i128,
    pub loss: i128,
    pub current_debt: i128,
    pub protocol_fees: i128,
    pub total_fees: i128,
    pub total_refunds: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DebtUpdatedEvent {
    pub strategy: Address,
    pub current_debt: i128,
    pub new_debt: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DebtPurchasedEvent {
    pub strategy: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdatedMaxDebtEvent {
    pub sender: Address,
    pub strategy: Address,
    pub new_debt: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdateDefaultQueueEvent {
    pub new_default_queue: Vec<Address>,
}

// ============================================
// FEES
// ============================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ManagementFeeMintedEvent {
    pub recipient: Address,
    pub shares: i128,
    /// Seconds the fee was accrued over
    pub period: u64,
}

// ============================================
// CONFIGURATION
// ============================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdateAddressEvent {
    pub new_address: Option<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdateAmountEvent {
    pub new_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdateFlagEvent {
    pub new_value: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdateProfitMaxUnlockTimeEvent {
    pub profit_max_unlock_time: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleSetEvent {
    pub account: Address,
    pub roles: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShutdownEvent {
    pub sender: Address,
}
