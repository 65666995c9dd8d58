//! Custodial balances per (token, account) and the token movements that
//! back them.
//!
//! Balances are only ever changed through [`credit`] and [`debit`]. Both keep
//! the invariant that `balance * PRECISION` fits in an `i128`, which is what
//! the accrual engine relies on when it turns a balance into a scaled budget.

use soroban_sdk::{contracttype, token, Address, Env};

use crate::{accrual::PRECISION, ContractError, TTL_EXTEND_TO, TTL_THRESHOLD};

/// Storage key for one custodial balance, and for the sender-side index of
/// streams drawing on it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountKey {
    pub token: Address,
    pub account: Address,
}

#[contracttype]
enum LedgerKey {
    Balance(AccountKey),
}

impl AccountKey {
    pub fn new(token: &Address, account: &Address) -> Self {
        AccountKey {
            token: token.clone(),
            account: account.clone(),
        }
    }
}

pub fn balance_of(env: &Env, key: &AccountKey) -> i128 {
    env.storage()
        .persistent()
        .get(&LedgerKey::Balance(key.clone()))
        .unwrap_or(0)
}

/// Balance expressed in the accrual engine's scaled units.
pub fn scaled_balance_of(env: &Env, key: &AccountKey) -> Result<i128, ContractError> {
    balance_of(env, key)
        .checked_mul(PRECISION)
        .ok_or(ContractError::ArithmeticOverflow)
}

pub fn credit(env: &Env, key: &AccountKey, amount: i128) -> Result<i128, ContractError> {
    if amount < 0 {
        return Err(ContractError::InvalidAmount);
    }
    let updated = balance_of(env, key)
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    // A balance that cannot be scaled could never be streamed from.
    updated
        .checked_mul(PRECISION)
        .ok_or(ContractError::ArithmeticOverflow)?;
    write_balance(env, key, updated);
    Ok(updated)
}

pub fn debit(env: &Env, key: &AccountKey, amount: i128) -> Result<i128, ContractError> {
    if amount < 0 {
        return Err(ContractError::InvalidAmount);
    }
    let current = balance_of(env, key);
    if amount > current {
        return Err(ContractError::InsufficientBalance);
    }
    let updated = current - amount;
    write_balance(env, key, updated);
    Ok(updated)
}

fn write_balance(env: &Env, key: &AccountKey, amount: i128) {
    let storage_key = LedgerKey::Balance(key.clone());
    if amount == 0 {
        env.storage().persistent().remove(&storage_key);
        return;
    }
    env.storage().persistent().set(&storage_key, &amount);
    env.storage()
        .persistent()
        .extend_ttl(&storage_key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Moves `amount` of `token` from `from` into the contract. `from` must have
/// authorised the enclosing call.
pub fn pull(
    env: &Env,
    token: &Address,
    from: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    let client = token::Client::new(env, token);
    if client.balance(from) < amount {
        return Err(ContractError::InsufficientBalance);
    }
    client.transfer(from, &env.current_contract_address(), &amount);
    Ok(())
}

/// Pays `amount` of `token` out of the contract to `to`.
pub fn push(env: &Env, token: &Address, to: &Address, amount: i128) {
    if amount == 0 {
        return;
    }
    token::Client::new(env, token).transfer(&env.current_contract_address(), to, &amount);
}
