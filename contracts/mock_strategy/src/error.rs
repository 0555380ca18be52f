use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,
    /// Amount must be positive
    InvalidAmount = 3,
    /// Holder has fewer shares than required
    InsufficientShares = 4,
    /// Deposit above max_deposit
    ExceedDepositLimit = 5,
    /// Withdrawal above max_withdraw
    ExceedWithdrawLimit = 6,
    /// Checked arithmetic overflowed
    MathOverflow = 7,
}
