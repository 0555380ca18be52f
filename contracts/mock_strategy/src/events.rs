use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub receiver: Address,
    pub assets: i128,
    pub shares: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub receiver: Address,
    pub owner: Address,
    pub assets: i128,
    pub shares: i128,
    /// Assets withheld from the receiver by an injected loss
    pub loss: i128,
}
