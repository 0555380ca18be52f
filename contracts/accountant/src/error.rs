use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,
    /// Caller is not governance
    Unauthorized = 3,
    /// Fee or ratio above 10_000 basis points
    InvalidFee = 4,
    /// Checked arithmetic overflowed
    MathOverflow = 5,
}
