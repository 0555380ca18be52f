use crate::error::Error;
use crate::events::{ManagementFeeMintedEvent, UpdateAddressEvent, UpdateAmountEvent};
use crate::ledger::Ledger;
use crate::math::{mul_div, Rounding};
use crate::storage::{FeeConfig, Storage, VaultState, MAX_BPS, SECONDS_PER_YEAR};
use soroban_sdk::{Address, Env, Symbol};

/// Shares owed to the fee recipient for `elapsed` seconds over `supply`
///
/// Formula: supply × fee_bps × elapsed / (MAX_BPS × SECONDS_PER_YEAR)
pub fn management_fee_shares(supply: i128, fee_bps: u32, elapsed: u64) -> Result<i128, Error> {
    if supply <= 0 || fee_bps == 0 || elapsed == 0 {
        return Ok(0);
    }
    let rate = (fee_bps as i128)
        .checked_mul(elapsed as i128)
        .ok_or(Error::MathOverflow)?;
    mul_div(
        supply,
        rate,
        MAX_BPS * SECONDS_PER_YEAR as i128,
        Rounding::Down,
    )
}

pub struct Fees;

impl Fees {
    fn elapsed(env: &Env, fees: &FeeConfig) -> u64 {
        env.ledger().timestamp().saturating_sub(fees.last_fee_charge)
    }

    /// Fee shares accrued since the last charge and not yet minted
    pub fn pending_shares(env: &Env, supply: i128) -> Result<i128, Error> {
        let fees = Storage::get_fees(env)?;
        if fees.fee_recipient.is_none() {
            return Ok(0);
        }
        management_fee_shares(supply, fees.management_fee, Self::elapsed(env, &fees))
    }

    /// Mint the accrued management fee and advance the charge clock
    ///
    /// With no recipient or a zero fee nothing is minted but the clock
    /// still moves, so the skipped period is never charged later.
    pub fn accrue(env: &Env, state: &mut VaultState) -> Result<(), Error> {
        let mut fees = Storage::get_fees(env)?;
        let elapsed = Self::elapsed(env, &fees);
        if elapsed == 0 {
            return Ok(());
        }

        if let Some(recipient) = fees.fee_recipient.clone() {
            let shares = management_fee_shares(state.total_supply, fees.management_fee, elapsed)?;
            if shares > 0 {
                Ledger::mint(env, state, &recipient, shares)?;

                env.events().publish(
                    (Symbol::new(env, "management_fee_minted"), recipient.clone()),
                    ManagementFeeMintedEvent {
                        recipient,
                        shares,
                        period: elapsed,
                    },
                );
            }
        }

        fees.last_fee_charge = env.ledger().timestamp();
        Storage::set_fees(env, &fees);
        Ok(())
    }

    // ============================================
    // CONFIGURATION
    // ============================================

    pub fn set_management_fee(env: &Env, fee_bps: u32) -> Result<(), Error> {
        if fee_bps as i128 > MAX_BPS {
            return Err(Error::InvalidFee);
        }
        let mut fees = Storage::get_fees(env)?;
        fees.management_fee = fee_bps;
        Storage::set_fees(env, &fees);

        env.events().publish(
            (Symbol::new(env, "update_management_fee"),),
            UpdateAmountEvent {
                new_amount: fee_bps as i128,
            },
        );
        Ok(())
    }

    pub fn set_fee_recipient(env: &Env, recipient: Option<Address>) -> Result<(), Error> {
        let mut fees = Storage::get_fees(env)?;
        fees.fee_recipient = recipient.clone();
        Storage::set_fees(env, &fees);

        env.events().publish(
            (Symbol::new(env, "update_fee_recipient"),),
            UpdateAddressEvent {
                new_address: recipient,
            },
        );
        Ok(())
    }

    pub fn set_protocol_fee(
        env: &Env,
        fee_bps: u32,
        recipient: Option<Address>,
    ) -> Result<(), Error> {
        if fee_bps as i128 > MAX_BPS {
            return Err(Error::InvalidFee);
        }
        let mut fees = Storage::get_fees(env)?;
        fees.protocol_fee_bps = fee_bps;
        fees.protocol_fee_recipient = recipient.clone();
        Storage::set_fees(env, &fees);

        env.events().publish(
            (Symbol::new(env, "update_protocol_fee"),),
            UpdateAddressEvent {
                new_address: recipient,
            },
        );
        Ok(())
    }
}
