use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-5)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-15)
    // ============================================
    /// Caller does not hold the role required by the entry point
    Unauthorized = 10,

    // ============================================
    // STRATEGY ERRORS (20-29)
    // ============================================
    /// Strategy address cannot be used (e.g. the vault itself)
    InvalidStrategy = 20,
    /// Strategy was already added
    StrategyAlreadyActive = 21,
    /// Revoking a strategy that was never added
    StrategyNotActive = 22,
    /// Revoking a strategy that still carries debt without forcing
    StrategyHasDebt = 23,
    /// Operation references a strategy that is not active
    InactiveStrategy = 24,
    /// Strategy manages a different asset than the vault
    InvalidAsset = 25,

    // ============================================
    // QUEUE & DEBT ERRORS (30-39)
    // ============================================
    /// Default queue longer than MAX_QUEUE
    QueueTooLong = 30,
    /// Target debt equals current debt
    NoDebtChange = 31,
    /// Strategy cannot release anything right now
    NothingToWithdraw = 32,
    /// Strategy holds losses that must be reported first
    UnrealisedLosses = 33,
    /// Realised loss is above the tolerated max_loss
    TooMuchLoss = 34,
    /// Strategy has no debt to purchase or amount is zero
    NothingToBuy = 35,
    /// Purchase would transfer zero strategy shares
    CannotBuyZero = 36,

    // ============================================
    // SHARE & AMOUNT ERRORS (40-49)
    // ============================================
    /// Owner holds fewer shares than requested
    InsufficientShares = 40,
    /// Redeeming zero shares
    NoSharesToRedeem = 41,
    /// Withdrawal resolves to zero assets
    NoAssetsToWithdraw = 42,
    /// Deposit resolves to zero shares
    CannotMintZero = 43,
    /// Idle plus everything the queue could release is below the request
    InsufficientIdle = 44,
    /// Spender allowance too low
    InsufficientAllowance = 45,
    /// Amount must be positive
    InvalidAmount = 46,
    /// max_loss above 10_000 basis points
    InvalidMaxLoss = 47,
    /// Receiver cannot be the vault itself
    InvalidReceiver = 48,

    // ============================================
    // LIMIT ERRORS (50-59)
    // ============================================
    /// Deposit above max_deposit
    ExceedDepositLimit = 50,
    /// Withdrawal above max_withdraw
    ExceedWithdrawLimit = 51,
    /// A deposit limit module is configured
    UsingModule = 52,
    /// A finite deposit limit is configured
    UsingDepositLimit = 53,

    // ============================================
    // CONFIGURATION ERRORS (60-69)
    // ============================================
    /// Profit unlock window longer than one year
    ProfitUnlockTimeTooLong = 60,
    /// Fee above 10_000 basis points
    InvalidFee = 61,
    /// Vault is shut down
    VaultShutdown = 62,

    // ============================================
    // ARITHMETIC ERRORS (70-79)
    // ============================================
    /// Checked arithmetic overflowed
    MathOverflow = 70,
}
