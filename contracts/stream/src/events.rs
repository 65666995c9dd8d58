use soroban_sdk::{contracttype, symbol_short, Address, Env};

// ---------------------------------------------------------------------------
// Event payloads
// ---------------------------------------------------------------------------
//
// Every ledger event is published with topics `(name, token, party)` so
// indexers can filter by token and by the account that initiated the change.
// Amounts are always in smallest token units, never PRECISION-scaled, except
// for `amount_per_sec` which mirrors the stored (scaled) rate.

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deposited {
    pub token: Address,
    pub account: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BalanceWithdrawn {
    pub token: Address,
    pub account: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamCreated {
    pub token: Address,
    pub sender: Address,
    pub recipient: Address,
    pub amount_per_sec: i128,
    pub start_time: u64,
    pub stop_time: u64,
}

/// Published when a rate change restarts a stream in place.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamUpdated {
    pub token: Address,
    pub sender: Address,
    pub recipient: Address,
    pub amount_per_sec: i128,
    pub start_time: u64,
    pub stop_time: u64,
}

/// `amount` is the gross figure debited from the sender; the recipient got
/// `amount - fee`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawn {
    pub token: Address,
    pub sender: Address,
    pub recipient: Address,
    pub amount: i128,
    pub fee: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamCancelled {
    pub token: Address,
    pub sender: Address,
    pub recipient: Address,
    pub settled: i128,
}

pub fn deposited(env: &Env, token: &Address, account: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("deposited"), token.clone(), account.clone()),
        Deposited {
            token: token.clone(),
            account: account.clone(),
            amount,
        },
    );
}

pub fn balance_withdrawn(env: &Env, token: &Address, account: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("bal_out"), token.clone(), account.clone()),
        BalanceWithdrawn {
            token: token.clone(),
            account: account.clone(),
            amount,
        },
    );
}

pub fn stream_created(env: &Env, event: StreamCreated) {
    env.events().publish(
        (
            symbol_short!("created"),
            event.token.clone(),
            event.sender.clone(),
        ),
        event,
    );
}

pub fn stream_updated(env: &Env, event: StreamUpdated) {
    env.events().publish(
        (
            symbol_short!("updated"),
            event.token.clone(),
            event.sender.clone(),
        ),
        event,
    );
}

pub fn withdrawn(env: &Env, event: Withdrawn) {
    env.events().publish(
        (
            symbol_short!("withdrew"),
            event.token.clone(),
            event.recipient.clone(),
        ),
        event,
    );
}

pub fn stream_cancelled(env: &Env, event: StreamCancelled) {
    env.events().publish(
        (
            symbol_short!("cancelled"),
            event.token.clone(),
            event.sender.clone(),
        ),
        event,
    );
}

pub fn fee_updated(env: &Env, old_fee_bps: u32, new_fee_bps: u32) {
    env.events().publish(
        (symbol_short!("fee"), symbol_short!("updated")),
        (old_fee_bps, new_fee_bps),
    );
}

pub fn pause_toggled(env: &Env, paused: bool) {
    env.events().publish((symbol_short!("paused"),), paused);
}

pub fn owner_updated(env: &Env, old_owner: &Address, new_owner: &Address) {
    env.events().publish(
        (symbol_short!("owner"), symbol_short!("updated")),
        (old_owner.clone(), new_owner.clone()),
    );
}
