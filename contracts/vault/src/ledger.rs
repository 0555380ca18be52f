use crate::error::Error;
use crate::events::{ApprovalEvent, TransferEvent};
use crate::fees::Fees;
use crate::math::{add, mul_div, sub, Rounding};
use crate::storage::{Storage, VaultState, UNLIMITED};
use crate::unlock::ProfitUnlockEngine;
use soroban_sdk::{Address, Env, Symbol};

/// Total assets and share supply used by conversions
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Totals {
    pub assets: i128,
    pub supply: i128,
}

/// Shares worth `assets` at the given totals
///
/// `0` and `UNLIMITED` pass through. An empty vault converts 1:1, a vault
/// with supply but no assets issues nothing.
pub fn shares_for(assets: i128, totals: Totals, rounding: Rounding) -> Result<i128, Error> {
    if assets == 0 || assets == UNLIMITED {
        return Ok(assets);
    }
    if totals.supply == 0 {
        return Ok(assets);
    }
    if totals.assets == 0 {
        return Ok(0);
    }
    mul_div(assets, totals.supply, totals.assets, rounding)
}

/// Assets redeemable for `shares` at the given totals
pub fn assets_for(shares: i128, totals: Totals, rounding: Rounding) -> Result<i128, Error> {
    if shares == 0 || shares == UNLIMITED {
        return Ok(shares);
    }
    if totals.supply == 0 {
        return Ok(shares);
    }
    mul_div(shares, totals.assets, totals.supply, rounding)
}

pub struct Ledger;

impl Ledger {
    // ============================================
    // TOTALS
    // ============================================

    pub fn total_assets(state: &VaultState) -> Result<i128, Error> {
        add(state.total_idle, state.total_debt)
    }

    /// Raw supply minus the shares unlocked since the last catch-up
    pub fn total_supply(env: &Env, state: &VaultState) -> Result<i128, Error> {
        sub(state.total_supply, ProfitUnlockEngine::unlocked_shares(env)?)
    }

    /// Totals as a catch-up at the current timestamp would leave them
    pub fn totals(env: &Env) -> Result<Totals, Error> {
        let state = Storage::get_state(env)?;
        let supply = Self::total_supply(env, &state)?;
        let pending_fee = Fees::pending_shares(env, supply)?;

        Ok(Totals {
            assets: Self::total_assets(&state)?,
            supply: add(supply, pending_fee)?,
        })
    }

    /// Totals of an already synced state
    pub fn synced_totals(state: &VaultState) -> Result<Totals, Error> {
        Ok(Totals {
            assets: Self::total_assets(state)?,
            supply: state.total_supply,
        })
    }

    /// Release unlocked profit then accrue the management fee
    ///
    /// Every mutating entry point runs this before touching the pool.
    pub fn sync(env: &Env) -> Result<VaultState, Error> {
        let mut state = Storage::get_state(env)?;
        ProfitUnlockEngine::catch_up(env, &mut state)?;
        Fees::accrue(env, &mut state)?;
        Storage::set_state(env, &state);
        Ok(state)
    }

    // ============================================
    // SHARE BALANCES
    // ============================================

    /// Balance as seen by holders; the vault's own balance excludes unlocked shares
    pub fn balance(env: &Env, id: &Address) -> Result<i128, Error> {
        let balance = Storage::get_balance(env, id);
        if *id == env.current_contract_address() {
            return sub(balance, ProfitUnlockEngine::unlocked_shares(env)?);
        }
        Ok(balance)
    }

    pub fn mint(env: &Env, state: &mut VaultState, to: &Address, amount: i128) -> Result<(), Error> {
        if amount == 0 {
            return Ok(());
        }
        let balance = add(Storage::get_balance(env, to), amount)?;
        Storage::set_balance(env, to, balance);
        state.total_supply = add(state.total_supply, amount)?;
        Ok(())
    }

    pub fn burn(env: &Env, state: &mut VaultState, from: &Address, amount: i128) -> Result<(), Error> {
        if amount == 0 {
            return Ok(());
        }
        let balance = Storage::get_balance(env, from);
        if balance < amount {
            return Err(Error::InsufficientShares);
        }
        Storage::set_balance(env, from, balance - amount);
        state.total_supply = sub(state.total_supply, amount)?;
        Ok(())
    }

    /// Move shares between holders
    ///
    /// # Errors
    /// - `InvalidReceiver` if `to` is the vault
    /// - `InvalidAmount` if `amount` is negative
    /// - `InsufficientShares` if `from` holds less than `amount`
    pub fn transfer(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
        if *to == env.current_contract_address() {
            return Err(Error::InvalidReceiver);
        }
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }

        let from_balance = Storage::get_balance(env, from);
        if from_balance < amount {
            return Err(Error::InsufficientShares);
        }
        Storage::set_balance(env, from, from_balance - amount);
        let to_balance = add(Storage::get_balance(env, to), amount)?;
        Storage::set_balance(env, to, to_balance);

        env.events().publish(
            (Symbol::new(env, "transfer"), from.clone()),
            TransferEvent {
                from: from.clone(),
                to: to.clone(),
                amount,
            },
        );
        Ok(())
    }

    pub fn approve(env: &Env, owner: &Address, spender: &Address, amount: i128) -> Result<(), Error> {
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        Storage::set_allowance(env, owner, spender, amount);

        env.events().publish(
            (Symbol::new(env, "approval"), owner.clone()),
            ApprovalEvent {
                owner: owner.clone(),
                spender: spender.clone(),
                amount,
            },
        );
        Ok(())
    }

    /// Consume `amount` of the allowance `owner` granted to `spender`
    ///
    /// An `UNLIMITED` allowance is never decreased.
    pub fn spend_allowance(
        env: &Env,
        owner: &Address,
        spender: &Address,
        amount: i128,
    ) -> Result<(), Error> {
        let allowance = Storage::get_allowance(env, owner, spender);
        if allowance == UNLIMITED {
            return Ok(());
        }
        if allowance < amount {
            return Err(Error::InsufficientAllowance);
        }
        Storage::set_allowance(env, owner, spender, allowance - amount);
        Ok(())
    }
}
