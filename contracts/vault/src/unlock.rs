use crate::error::Error;
use crate::events::UpdateProfitMaxUnlockTimeEvent;
use crate::ledger::Ledger;
use crate::math::{add, mul_div, sub, Rounding};
use crate::storage::{ProfitUnlock, Storage, VaultState, MAX_BPS_EXTENDED, SECONDS_PER_YEAR};
use soroban_sdk::{log, Env, Symbol};

/// Shares of the locked buffer released by `now`
///
/// Before the unlock date the release is linear in the elapsed time, at or
/// after it the whole buffer is free.
pub fn unlocked_at(unlock: &ProfitUnlock, locked: i128, now: u64) -> Result<i128, Error> {
    if unlock.full_profit_unlock_date > now {
        let elapsed = now.saturating_sub(unlock.last_profit_update) as i128;
        let released = mul_div(
            unlock.profit_unlocking_rate,
            elapsed,
            MAX_BPS_EXTENDED,
            Rounding::Down,
        )?;
        return Ok(released.min(locked));
    }
    if unlock.full_profit_unlock_date != 0 {
        return Ok(locked);
    }
    Ok(0)
}

/// Blend `newly_locked` shares into the running schedule
///
/// Shares still locked keep their remaining time, new shares get the full
/// window, and the combined buffer unlocks linearly over the weighted period.
pub fn reschedule(
    unlock: &mut ProfitUnlock,
    total_locked: i128,
    newly_locked: i128,
    now: u64,
) -> Result<(), Error> {
    if total_locked <= 0 {
        unlock.full_profit_unlock_date = 0;
        return Ok(());
    }

    let previously_locked_time = if unlock.full_profit_unlock_date > now {
        let remaining = (unlock.full_profit_unlock_date - now) as i128;
        sub(total_locked, newly_locked)?
            .checked_mul(remaining)
            .ok_or(Error::MathOverflow)?
    } else {
        0
    };

    let new_time = newly_locked
        .checked_mul(unlock.profit_max_unlock_time as i128)
        .ok_or(Error::MathOverflow)?;
    let mut period = add(previously_locked_time, new_time)? / total_locked;
    if period == 0 {
        period = 1;
    }

    unlock.profit_unlocking_rate = mul_div(total_locked, MAX_BPS_EXTENDED, period, Rounding::Down)?;
    unlock.full_profit_unlock_date = now + period as u64;
    unlock.last_profit_update = now;
    Ok(())
}

pub struct ProfitUnlockEngine;

impl ProfitUnlockEngine {
    pub fn unlocked_shares(env: &Env) -> Result<i128, Error> {
        let unlock = Storage::get_unlock(env)?;
        let locked = Storage::get_balance(env, &env.current_contract_address());
        unlocked_at(&unlock, locked, env.ledger().timestamp())
    }

    /// Burn whatever unlocked since the last update
    pub fn catch_up(env: &Env, state: &mut VaultState) -> Result<(), Error> {
        let now = env.ledger().timestamp();
        let mut unlock = Storage::get_unlock(env)?;
        let vault = env.current_contract_address();
        let locked = Storage::get_balance(env, &vault);

        let released = unlocked_at(&unlock, locked, now)?;
        Ledger::burn(env, state, &vault, released)?;

        if unlock.full_profit_unlock_date > now {
            unlock.last_profit_update = now;
            Storage::set_unlock(env, &unlock);
        }
        Ok(())
    }

    /// Recompute the schedule after `newly_locked` shares joined the buffer
    pub fn relock(env: &Env, newly_locked: i128) -> Result<(), Error> {
        let mut unlock = Storage::get_unlock(env)?;
        let total_locked = Storage::get_balance(env, &env.current_contract_address());
        reschedule(&mut unlock, total_locked, newly_locked, env.ledger().timestamp())?;
        Storage::set_unlock(env, &unlock);
        Ok(())
    }

    /// Change the window profit is spread over
    ///
    /// A zero window releases the whole buffer immediately and disables
    /// locking on later reports.
    ///
    /// # Errors
    /// - `ProfitUnlockTimeTooLong` if `seconds` exceeds one year
    pub fn set_profit_max_unlock_time(
        env: &Env,
        state: &mut VaultState,
        seconds: u64,
    ) -> Result<(), Error> {
        if seconds > SECONDS_PER_YEAR {
            return Err(Error::ProfitUnlockTimeTooLong);
        }

        let mut unlock = Storage::get_unlock(env)?;
        if seconds == 0 {
            let vault = env.current_contract_address();
            let locked = Storage::get_balance(env, &vault);
            Ledger::burn(env, state, &vault, locked)?;
            unlock.profit_unlocking_rate = 0;
            unlock.full_profit_unlock_date = 0;
            log!(env, "profit locking disabled, released", locked);
        }
        unlock.profit_max_unlock_time = seconds;
        Storage::set_unlock(env, &unlock);

        env.events().publish(
            (Symbol::new(env, "update_profit_max_unlock_time"),),
            UpdateProfitMaxUnlockTimeEvent {
                profit_max_unlock_time: seconds,
            },
        );
        Ok(())
    }
}
