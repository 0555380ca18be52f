#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::{DepositEvent, WithdrawEvent};
use storage::{StrategyConfig, StrategyState, Storage, UNLIMITED};

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Symbol};

/// Convert between assets and shares over the strategy's tracked totals
///
/// An empty strategy converts 1:1, a strategy with supply but no assets
/// issues nothing.
fn convert(amount: i128, numerator: i128, denominator: i128, round_up: bool) -> Result<i128, Error> {
    if numerator == 0 {
        return Ok(amount);
    }
    if denominator == 0 {
        return Ok(0);
    }
    let product = amount.checked_mul(numerator).ok_or(Error::MathOverflow)?;
    let quotient = product / denominator;
    if round_up && product % denominator != 0 {
        return Ok(quotient + 1);
    }
    Ok(quotient)
}

fn shares_for(assets: i128, state: &StrategyState, round_up: bool) -> Result<i128, Error> {
    if state.total_supply == 0 {
        return Ok(assets);
    }
    convert(assets, state.total_supply, state.total_assets, round_up)
}

fn assets_for(shares: i128, state: &StrategyState) -> Result<i128, Error> {
    if state.total_supply == 0 {
        return Ok(shares);
    }
    shares
        .checked_mul(state.total_assets)
        .ok_or(Error::MathOverflow)
        .map(|v| v / state.total_supply)
}

/// Share-accounting strategy for a single vault
///
/// Gains are harvested from the token balance; losses, locked liquidity and
/// capacity limits are injected by the admin.
#[contract]
pub struct MockStrategy;

#[contractimpl]
impl MockStrategy {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address, asset: Address, vault: Address) -> Result<(), Error> {
        if Storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }

        Storage::set_config(&env, &StrategyConfig { admin, asset, vault });
        Storage::set_state(
            &env,
            &StrategyState {
                total_assets: 0,
                total_supply: 0,
                locked: 0,
                pending_loss: 0,
                max_debt: UNLIMITED,
            },
        );
        Ok(())
    }

    // ============================================
    // VAULT INTERFACE
    // ============================================

    pub fn asset(env: Env) -> Result<Address, Error> {
        Ok(Storage::get_config(&env)?.asset)
    }

    pub fn total_assets(env: Env) -> Result<i128, Error> {
        Ok(Storage::get_state(&env)?.total_assets)
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        Storage::get_balance(&env, &id)
    }

    pub fn convert_to_assets(env: Env, shares: i128) -> Result<i128, Error> {
        assets_for(shares, &Storage::get_state(&env)?)
    }

    pub fn convert_to_shares(env: Env, assets: i128) -> Result<i128, Error> {
        shares_for(assets, &Storage::get_state(&env)?, false)
    }

    /// Account for `assets` the vault already transferred in
    ///
    /// # Errors
    /// - `InvalidAmount`: Amount not positive
    /// - `ExceedDepositLimit`: Above `max_deposit`
    pub fn deposit(env: Env, assets: i128, receiver: Address) -> Result<i128, Error> {
        let config = Storage::get_config(&env)?;
        config.vault.require_auth();

        if assets <= 0 {
            return Err(Error::InvalidAmount);
        }
        if assets > Self::max_deposit(env.clone(), receiver.clone())? {
            return Err(Error::ExceedDepositLimit);
        }

        let mut state = Storage::get_state(&env)?;
        let shares = shares_for(assets, &state, false)?;
        if shares <= 0 {
            return Err(Error::InvalidAmount);
        }

        state.total_assets = state.total_assets.checked_add(assets).ok_or(Error::MathOverflow)?;
        state.total_supply = state.total_supply.checked_add(shares).ok_or(Error::MathOverflow)?;
        Storage::set_state(&env, &state);
        Storage::set_balance(&env, &receiver, Storage::get_balance(&env, &receiver) + shares);

        env.events().publish(
            (Symbol::new(&env, "deposit"), receiver.clone()),
            DepositEvent {
                receiver,
                assets,
                shares,
            },
        );
        Ok(shares)
    }

    /// Burn shares of `owner` and pay `assets` to `receiver`
    ///
    /// A pending injected loss is withheld from the payout and burned.
    ///
    /// # Errors
    /// - `InvalidAmount`: Amount not positive
    /// - `ExceedWithdrawLimit`: Above `max_withdraw(owner)`
    /// - `InsufficientShares`: Owner cannot cover the shares
    pub fn withdraw(env: Env, assets: i128, receiver: Address, owner: Address) -> Result<i128, Error> {
        owner.require_auth();

        if assets <= 0 {
            return Err(Error::InvalidAmount);
        }
        if assets > Self::max_withdraw(env.clone(), owner.clone())? {
            return Err(Error::ExceedWithdrawLimit);
        }

        let mut state = Storage::get_state(&env)?;
        let shares = shares_for(assets, &state, true)?;
        let balance = Storage::get_balance(&env, &owner);
        if balance < shares {
            return Err(Error::InsufficientShares);
        }

        let loss = state.pending_loss.min(assets);
        state.pending_loss -= loss;
        state.total_assets -= assets;
        state.total_supply -= shares;
        Storage::set_state(&env, &state);
        Storage::set_balance(&env, &owner, balance - shares);

        let asset = token::Client::new(&env, &Storage::get_config(&env)?.asset);
        let this = env.current_contract_address();
        if loss > 0 {
            asset.burn(&this, &loss);
        }
        asset.transfer(&this, &receiver, &(assets - loss));

        env.events().publish(
            (Symbol::new(&env, "withdraw"), owner.clone()),
            WithdrawEvent {
                receiver,
                owner,
                assets,
                shares,
                loss,
            },
        );
        Ok(shares)
    }

    pub fn max_deposit(env: Env, _receiver: Address) -> Result<i128, Error> {
        let state = Storage::get_state(&env)?;
        if state.max_debt == UNLIMITED {
            return Ok(UNLIMITED);
        }
        Ok((state.max_debt - state.total_assets).max(0))
    }

    pub fn max_withdraw(env: Env, owner: Address) -> Result<i128, Error> {
        let state = Storage::get_state(&env)?;
        let owned = assets_for(Storage::get_balance(&env, &owner), &state)?;
        let liquid = (state.total_assets - state.locked).max(0);
        Ok(owned.min(liquid))
    }

    /// Move strategy shares, used when the vault sells debt
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();

        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        let from_balance = Storage::get_balance(&env, &from);
        if from_balance < amount {
            return Err(Error::InsufficientShares);
        }
        Storage::set_balance(&env, &from, from_balance - amount);
        Storage::set_balance(&env, &to, Storage::get_balance(&env, &to) + amount);
        Ok(())
    }

    // ============================================
    // TEST KNOBS
    // ============================================

    /// Recognise every token the strategy holds as its assets
    pub fn harvest(env: Env) -> Result<i128, Error> {
        let config = Storage::get_config(&env)?;
        config.admin.require_auth();

        let mut state = Storage::get_state(&env)?;
        state.total_assets = token::Client::new(&env, &config.asset).balance(&env.current_contract_address());
        Storage::set_state(&env, &state);

        log!(&env, "harvested", state.total_assets);
        Ok(state.total_assets)
    }

    /// Destroy `amount` of the strategy's assets
    pub fn lose(env: Env, amount: i128) -> Result<(), Error> {
        let config = Storage::get_config(&env)?;
        config.admin.require_auth();

        let mut state = Storage::get_state(&env)?;
        if amount <= 0 || amount > state.total_assets {
            return Err(Error::InvalidAmount);
        }
        token::Client::new(&env, &config.asset).burn(&env.current_contract_address(), &amount);
        state.total_assets -= amount;
        Storage::set_state(&env, &state);
        Ok(())
    }

    /// Withhold `amount` from upcoming withdrawals
    pub fn set_loss(env: Env, amount: i128) -> Result<(), Error> {
        Storage::get_config(&env)?.admin.require_auth();

        let mut state = Storage::get_state(&env)?;
        state.pending_loss = amount.max(0);
        Storage::set_state(&env, &state);
        Ok(())
    }

    pub fn lock(env: Env, amount: i128) -> Result<(), Error> {
        Storage::get_config(&env)?.admin.require_auth();

        let mut state = Storage::get_state(&env)?;
        state.locked = state.locked.checked_add(amount).ok_or(Error::MathOverflow)?;
        Storage::set_state(&env, &state);
        Ok(())
    }

    pub fn unlock(env: Env, amount: i128) -> Result<(), Error> {
        Storage::get_config(&env)?.admin.require_auth();

        let mut state = Storage::get_state(&env)?;
        state.locked = (state.locked - amount).max(0);
        Storage::set_state(&env, &state);
        Ok(())
    }

    pub fn set_max_debt(env: Env, max_debt: i128) -> Result<(), Error> {
        Storage::get_config(&env)?.admin.require_auth();

        let mut state = Storage::get_state(&env)?;
        state.max_debt = max_debt;
        Storage::set_state(&env, &state);
        Ok(())
    }
}
