use crate::{AllocatorVault, AllocatorVaultClient, UNLIMITED};
use accountant::{Accountant, AccountantClient};
use limit_module::{LimitModule, LimitModuleClient};
use mock_strategy::{MockStrategy, MockStrategyClient};
use soroban_sdk::{
    testutils::{Address as _, Events, Ledger},
    token::{self, StellarAssetClient},
    Address, Env, String, Symbol, TryFromVal, Val,
};

mod reporting;
mod withdrawals;

pub const START: u64 = 1_000_000;
pub const UNLOCK_TIME: u64 = 10_000;

pub struct Setup<'a> {
    pub env: Env,
    pub gov: Address,
    pub asset: token::Client<'a>,
    pub asset_admin: StellarAssetClient<'a>,
    pub vault: AllocatorVaultClient<'a>,
}

/// Vault over a fresh asset with unlimited deposits and a 10_000s unlock window
pub fn setup<'a>() -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(START);

    let gov = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(gov.clone());

    let vault_id = env.register(AllocatorVault, ());
    let vault = AllocatorVaultClient::new(&env, &vault_id);
    vault.initialize(
        &gov,
        &sac.address(),
        &String::from_str(&env, "Allocator Vault"),
        &String::from_str(&env, "avUSD"),
        &UNLOCK_TIME,
    );
    vault.set_deposit_limit(&gov, &UNLIMITED, &false);

    Setup {
        gov,
        asset: token::Client::new(&env, &sac.address()),
        asset_admin: StellarAssetClient::new(&env, &sac.address()),
        vault,
        env,
    }
}

impl<'a> Setup<'a> {
    pub fn user_with(&self, amount: i128) -> Address {
        let user = Address::generate(&self.env);
        if amount > 0 {
            self.asset_admin.mint(&user, &amount);
        }
        user
    }

    /// Fund a new user and deposit everything for them
    pub fn depositor(&self, amount: i128) -> Address {
        let user = self.user_with(amount);
        self.vault.deposit(&user, &amount, &user);
        user
    }

    pub fn strategy(&self) -> MockStrategyClient<'a> {
        let id = self.env.register(MockStrategy, ());
        let strategy = MockStrategyClient::new(&self.env, &id);
        strategy.initialize(&self.gov, &self.asset.address, &self.vault.address);
        strategy
    }

    /// Active strategy in the default queue with unlimited max debt
    pub fn added_strategy(&self) -> MockStrategyClient<'a> {
        let strategy = self.strategy();
        self.vault.add_strategy(&self.gov, &strategy.address, &true);
        self.vault
            .update_max_debt_for_strategy(&self.gov, &strategy.address, &UNLIMITED);
        strategy
    }

    /// Strategy holding `debt` of a single depositor's funds
    pub fn funded_strategy(&self, debt: i128) -> (Address, MockStrategyClient<'a>) {
        let user = self.depositor(debt);
        let strategy = self.added_strategy();
        self.vault.update_debt(&self.gov, &strategy.address, &debt, &0);
        (user, strategy)
    }

    pub fn accountant(&self) -> AccountantClient<'a> {
        let id = self.env.register(Accountant, ());
        let accountant = AccountantClient::new(&self.env, &id);
        accountant.initialize(&self.gov, &self.asset.address, &self.vault.address);
        self.vault.set_accountant(&self.gov, &Some(id));
        accountant
    }

    pub fn limit_module(&self) -> LimitModuleClient<'a> {
        let id = self.env.register(LimitModule, ());
        let module = LimitModuleClient::new(&self.env, &id);
        module.initialize(&self.gov);
        module
    }

    /// Send `amount` of new tokens to the strategy and recognise them
    pub fn airdrop_gain(&self, strategy: &MockStrategyClient, amount: i128) {
        self.asset_admin.mint(&strategy.address, &amount);
        strategy.harvest();
    }

    pub fn advance(&self, seconds: u64) {
        let now = self.env.ledger().timestamp();
        self.env.ledger().set_timestamp(now + seconds);
    }

    /// Payload of the last vault event published under `name` by the most
    /// recent invocation
    pub fn last_event<T: TryFromVal<Env, Val>>(&self, name: &str) -> Option<T> {
        let topic = Symbol::new(&self.env, name);
        let mut found = None;
        for (contract, topics, data) in self.env.events().all().iter() {
            if contract != self.vault.address {
                continue;
            }
            let first = topics
                .get(0)
                .and_then(|v| Symbol::try_from_val(&self.env, &v).ok());
            if first == Some(topic.clone()) {
                found = T::try_from_val(&self.env, &data).ok();
            }
        }
        found
    }
}
