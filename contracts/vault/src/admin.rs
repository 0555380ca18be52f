use crate::error::Error;
use crate::events::{ShutdownEvent, UpdateAddressEvent, UpdateAmountEvent, UpdateFlagEvent};
use crate::roles::{Role, Roles, ALL_ROLES};
use crate::storage::{
    FeeConfig, ProfitUnlock, Storage, VaultConfig, VaultState, SECONDS_PER_YEAR, UNLIMITED,
};
use soroban_sdk::{log, token, Address, Env, String, Symbol};

pub struct Admin;

impl Admin {
    /// Set up an empty vault over `asset` with `governance` holding every role
    ///
    /// Deposits stay closed until a deposit limit or module is configured.
    ///
    /// # Errors
    /// - `AlreadyInitialized` if the vault was set up before
    /// - `ProfitUnlockTimeTooLong` if the unlock window exceeds one year
    pub fn initialize(
        env: &Env,
        governance: &Address,
        asset: &Address,
        name: String,
        symbol: String,
        profit_max_unlock_time: u64,
    ) -> Result<(), Error> {
        if Storage::is_initialized(env) {
            return Err(Error::AlreadyInitialized);
        }
        if profit_max_unlock_time > SECONDS_PER_YEAR {
            return Err(Error::ProfitUnlockTimeTooLong);
        }

        let decimals = token::Client::new(env, asset).decimals();

        Storage::set_config(
            env,
            &VaultConfig {
                asset: asset.clone(),
                name,
                symbol,
                decimals,
                accountant: None,
                deposit_limit_module: None,
                withdraw_limit_module: None,
            },
        );
        Storage::set_state(
            env,
            &VaultState {
                total_idle: 0,
                total_debt: 0,
                total_supply: 0,
                minimum_total_idle: 0,
                deposit_limit: 0,
                auto_allocate: false,
                use_default_queue: false,
                shutdown: false,
            },
        );
        Storage::set_fees(
            env,
            &FeeConfig {
                management_fee: 0,
                fee_recipient: None,
                last_fee_charge: env.ledger().timestamp(),
                protocol_fee_bps: 0,
                protocol_fee_recipient: None,
            },
        );
        Storage::set_unlock(
            env,
            &ProfitUnlock {
                profit_max_unlock_time,
                full_profit_unlock_date: 0,
                profit_unlocking_rate: 0,
                last_profit_update: 0,
            },
        );

        Roles::write(env, governance, ALL_ROLES);

        log!(env, "vault initialized", asset.clone(), governance.clone());
        Ok(())
    }

    pub fn set_accountant(env: &Env, accountant: Option<Address>) -> Result<(), Error> {
        let mut config = Storage::get_config(env)?;
        config.accountant = accountant.clone();
        Storage::set_config(env, &config);

        Self::publish_address(env, "update_accountant", accountant);
        Ok(())
    }

    /// # Errors
    /// - `UsingModule` if a deposit limit module is set and `force` is false
    pub fn set_deposit_limit(
        env: &Env,
        state: &mut VaultState,
        deposit_limit: i128,
        force: bool,
    ) -> Result<(), Error> {
        if state.shutdown {
            return Err(Error::VaultShutdown);
        }
        if deposit_limit < 0 {
            return Err(Error::InvalidAmount);
        }

        let mut config = Storage::get_config(env)?;
        if config.deposit_limit_module.is_some() {
            if !force {
                return Err(Error::UsingModule);
            }
            config.deposit_limit_module = None;
            Storage::set_config(env, &config);
            Self::publish_address(env, "update_deposit_limit_module", None);
        }

        state.deposit_limit = deposit_limit;
        Self::publish_amount(env, "update_deposit_limit", deposit_limit);
        Ok(())
    }

    /// # Errors
    /// - `UsingDepositLimit` if a finite deposit limit is set and `force` is false
    pub fn set_deposit_limit_module(
        env: &Env,
        state: &mut VaultState,
        module: Option<Address>,
        force: bool,
    ) -> Result<(), Error> {
        if state.shutdown {
            return Err(Error::VaultShutdown);
        }

        if state.deposit_limit != UNLIMITED {
            if !force {
                return Err(Error::UsingDepositLimit);
            }
            state.deposit_limit = UNLIMITED;
            Self::publish_amount(env, "update_deposit_limit", UNLIMITED);
        }

        let mut config = Storage::get_config(env)?;
        config.deposit_limit_module = module.clone();
        Storage::set_config(env, &config);

        Self::publish_address(env, "update_deposit_limit_module", module);
        Ok(())
    }

    pub fn set_withdraw_limit_module(env: &Env, module: Option<Address>) -> Result<(), Error> {
        let mut config = Storage::get_config(env)?;
        config.withdraw_limit_module = module.clone();
        Storage::set_config(env, &config);

        Self::publish_address(env, "update_withdraw_limit_module", module);
        Ok(())
    }

    pub fn set_minimum_total_idle(
        env: &Env,
        state: &mut VaultState,
        minimum_total_idle: i128,
    ) -> Result<(), Error> {
        if minimum_total_idle < 0 {
            return Err(Error::InvalidAmount);
        }
        state.minimum_total_idle = minimum_total_idle;
        Self::publish_amount(env, "update_minimum_total_idle", minimum_total_idle);
        Ok(())
    }

    pub fn set_auto_allocate(env: &Env, state: &mut VaultState, auto_allocate: bool) {
        state.auto_allocate = auto_allocate;
        Self::publish_flag(env, "update_auto_allocate", auto_allocate);
    }

    pub fn set_use_default_queue(env: &Env, state: &mut VaultState, use_default_queue: bool) {
        state.use_default_queue = use_default_queue;
        Self::publish_flag(env, "update_use_default_queue", use_default_queue);
    }

    /// Close deposits for good and let `sender` unwind strategy debt
    pub fn shutdown(env: &Env, state: &mut VaultState, sender: &Address) -> Result<(), Error> {
        if state.shutdown {
            return Err(Error::VaultShutdown);
        }

        state.shutdown = true;
        state.deposit_limit = 0;
        Self::publish_amount(env, "update_deposit_limit", 0);

        let mut config = Storage::get_config(env)?;
        if config.deposit_limit_module.is_some() {
            config.deposit_limit_module = None;
            Storage::set_config(env, &config);
            Self::publish_address(env, "update_deposit_limit_module", None);
        }

        let roles = Storage::get_roles(env, sender) | Role::DebtManager.mask();
        Roles::write(env, sender, roles);

        log!(env, "vault shutdown", sender.clone());
        env.events().publish(
            (Symbol::new(env, "shutdown"),),
            ShutdownEvent {
                sender: sender.clone(),
            },
        );
        Ok(())
    }

    fn publish_address(env: &Env, topic: &str, new_address: Option<Address>) {
        env.events()
            .publish((Symbol::new(env, topic),), UpdateAddressEvent { new_address });
    }

    fn publish_amount(env: &Env, topic: &str, new_amount: i128) {
        env.events()
            .publish((Symbol::new(env, topic),), UpdateAmountEvent { new_amount });
    }

    fn publish_flag(env: &Env, topic: &str, new_value: bool) {
        env.events()
            .publish((Symbol::new(env, topic),), UpdateFlagEvent { new_value });
    }
}
