use crate::error::Error;
use crate::events::RoleSetEvent;
use crate::storage::Storage;
use soroban_sdk::{contracttype, Address, Env, Symbol};

/// Permissions guarding the vault's mutating entry points
///
/// Each principal carries a `u32` mask with one bit per role.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// Grants and revokes every other role
    GovernanceManager = 0,
    AddStrategyManager = 1,
    RevokeStrategyManager = 2,
    AccountantManager = 3,
    QueueManager = 4,
    ReportingManager = 5,
    DebtManager = 6,
    MaxDebtManager = 7,
    DepositLimitManager = 8,
    WithdrawLimitManager = 9,
    MinimumIdleManager = 10,
    ProfitUnlockManager = 11,
    DebtPurchaser = 12,
    EmergencyManager = 13,
}

pub const ALL_ROLES: u32 = (1 << 14) - 1;

impl Role {
    pub fn mask(self) -> u32 {
        1 << (self as u32)
    }
}

pub fn has_role(roles: u32, role: Role) -> bool {
    roles & role.mask() != 0
}

pub struct Roles;

impl Roles {
    /// Authenticate `caller` and require it to hold `role`
    pub fn enforce(env: &Env, caller: &Address, role: Role) -> Result<(), Error> {
        caller.require_auth();

        if !has_role(Storage::get_roles(env, caller), role) {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    /// Replace the whole role mask of `account`
    pub fn set_roles(env: &Env, caller: &Address, account: &Address, roles: u32) -> Result<(), Error> {
        Self::enforce(env, caller, Role::GovernanceManager)?;
        Self::write(env, account, roles & ALL_ROLES);
        Ok(())
    }

    pub fn add_role(env: &Env, caller: &Address, account: &Address, role: Role) -> Result<(), Error> {
        Self::enforce(env, caller, Role::GovernanceManager)?;
        let roles = Storage::get_roles(env, account) | role.mask();
        Self::write(env, account, roles);
        Ok(())
    }

    pub fn remove_role(
        env: &Env,
        caller: &Address,
        account: &Address,
        role: Role,
    ) -> Result<(), Error> {
        Self::enforce(env, caller, Role::GovernanceManager)?;
        let roles = Storage::get_roles(env, account) & !role.mask();
        Self::write(env, account, roles);
        Ok(())
    }

    /// Unchecked grant, used by initialization and emergency shutdown
    pub fn write(env: &Env, account: &Address, roles: u32) {
        Storage::set_roles(env, account, roles);

        env.events().publish(
            (Symbol::new(env, "role_set"), account.clone()),
            RoleSetEvent {
                account: account.clone(),
                roles,
            },
        );
    }
}
