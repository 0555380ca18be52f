use soroban_sdk::contracttype;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LimitUpdatedEvent {
    pub new_limit: i128,
}
