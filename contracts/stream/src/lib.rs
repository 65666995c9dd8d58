#![no_std]

mod accrual;
mod events;
mod ledger;

use soroban_sdk::{contract, contracterror, contractimpl, contracttype, log, Address, Env, Vec};

pub use accrual::PRECISION;
pub use events::{
    BalanceWithdrawn, Deposited, StreamCancelled, StreamCreated, StreamUpdated, Withdrawn,
};

pub use ledger::AccountKey;

/// Basis-point denominator for the protocol fee.
pub const BPS_DENOMINATOR: i128 = 10_000;
/// Highest protocol fee the owner may set (10%).
pub const MAX_PROTOCOL_FEE_BPS: u32 = 1_000;
/// Upper bound on live streams one sender may run per token. Every withdrawal
/// evaluates all of them, so this bounds the work of a single call.
pub const MAX_STREAMS_PER_SENDER: u32 = 32;

pub(crate) const TTL_THRESHOLD: u32 = 17_280;
pub(crate) const TTL_EXTEND_TO: u32 = 120_960;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Process-wide protocol settings, mutable by the owner only.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub owner: Address,
    pub protocol_fee_bps: u32,
    pub paused: bool,
}

#[contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidAmount = 3,
    InvalidRecipient = 4,
    StreamAlreadyExists = 5,
    StreamNotFound = 6,
    Unauthorized = 7,
    InsufficientBalance = 8,
    WithdrawExceedsAvailable = 9,
    ContractPaused = 10,
    InvalidFee = 11,
    ArithmeticOverflow = 12,
    TooManyStreams = 13,
}

/// A live stream. `amount_per_sec` and `withdrawn` are scaled by
/// [`PRECISION`]; `stop_time == 0` means the stream never ends on its own.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Stream {
    pub amount_per_sec: i128,
    pub start_time: u64,
    pub stop_time: u64,
    pub withdrawn: i128,
}

/// Stream record joined with a live accrual, for polling UIs.
///
/// `amount_per_sec`, `withdrawn` and `withdrawable_amount` are scaled by
/// [`PRECISION`]; `sender_balance` is in token units. Every field is zero
/// when no stream exists for the triple.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamView {
    pub amount_per_sec: i128,
    pub start_time: u64,
    pub stop_time: u64,
    pub withdrawn: i128,
    pub withdrawable_amount: i128,
    pub sender_balance: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamKey {
    pub token: Address,
    pub sender: Address,
    pub recipient: Address,
}

/// Namespace for all contract storage keys. Balances live in `ledger`.
#[contracttype]
pub enum DataKey {
    Config,               // Instance storage for owner, fee and pause flag.
    Stream(StreamKey),    // Persistent, one record per (token, sender, recipient).
    Outgoing(AccountKey), // Persistent, a sender's recipients in creation order.
}

impl StreamKey {
    fn new(token: &Address, sender: &Address, recipient: &Address) -> Self {
        StreamKey {
            token: token.clone(),
            sender: sender.clone(),
            recipient: recipient.clone(),
        }
    }

    fn pool(&self) -> AccountKey {
        AccountKey::new(&self.token, &self.sender)
    }
}

// ---------------------------------------------------------------------------
// Storage helpers
// ---------------------------------------------------------------------------

fn get_config(env: &Env) -> Result<Config, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(ContractError::NotInitialized)
}

fn save_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn load_stream(env: &Env, key: &StreamKey) -> Option<Stream> {
    env.storage()
        .persistent()
        .get(&DataKey::Stream(key.clone()))
}

fn save_stream(env: &Env, key: &StreamKey, stream: &Stream) {
    let key = DataKey::Stream(key.clone());
    env.storage().persistent().set(&key, stream);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn load_outgoing(env: &Env, pool: &AccountKey) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Outgoing(pool.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

fn save_outgoing(env: &Env, pool: &AccountKey, recipients: &Vec<Address>) {
    let key = DataKey::Outgoing(pool.clone());
    if recipients.is_empty() {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, recipients);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Deletes the stream record and drops the recipient from the sender's index.
fn remove_stream(env: &Env, key: &StreamKey) {
    env.storage()
        .persistent()
        .remove(&DataKey::Stream(key.clone()));

    let pool = key.pool();
    let mut recipients = load_outgoing(env, &pool);
    if let Some(index) = position_of(&recipients, &key.recipient) {
        recipients.remove(index);
    }
    save_outgoing(env, &pool, &recipients);
}

fn position_of(recipients: &Vec<Address>, recipient: &Address) -> Option<u32> {
    recipients
        .iter()
        .position(|candidate| candidate == *recipient)
        .map(|index| index as u32)
}

// ---------------------------------------------------------------------------
// Internal Helpers
// ---------------------------------------------------------------------------

impl StreamPay {
    /// Config of an initialised, unpaused contract; the gate for every
    /// mutating entry point.
    fn active_config(env: &Env) -> Result<Config, ContractError> {
        let config = get_config(env)?;
        if config.paused {
            return Err(ContractError::ContractPaused);
        }
        Ok(config)
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<Config, ContractError> {
        let config = get_config(env)?;
        if *caller != config.owner {
            return Err(ContractError::Unauthorized);
        }
        caller.require_auth();
        Ok(config)
    }

    /// Withdrawable amount (scaled) of every stream the sender runs on this
    /// token, paired with the recipients in creation order.
    fn pool_allocations(
        env: &Env,
        pool: &AccountKey,
    ) -> Result<(Vec<Address>, Vec<i128>), ContractError> {
        let recipients = load_outgoing(env, pool);
        let mut streams = Vec::new(env);
        for recipient in recipients.iter() {
            let key = StreamKey::new(&pool.token, &pool.account, &recipient);
            // Index and records are written together; a gap is corrupt state.
            let stream = load_stream(env, &key).ok_or(ContractError::StreamNotFound)?;
            streams.push_back(stream);
        }

        let budget = ledger::scaled_balance_of(env, pool)?;
        let allocations = accrual::allocate(env, &streams, budget, env.ledger().timestamp());
        if accrual::committed(&allocations) == budget && budget > 0 {
            log!(env, "sender balance fully committed", pool.account, pool.token);
        }
        Ok((recipients, allocations))
    }

    /// Scaled withdrawable amount of one stream under the pooled balance cap.
    fn withdrawable_scaled(env: &Env, key: &StreamKey) -> Result<i128, ContractError> {
        let (recipients, allocations) = Self::pool_allocations(env, &key.pool())?;
        Ok(position_of(&recipients, &key.recipient)
            .and_then(|index| allocations.get(index))
            .unwrap_or(0))
    }

    fn validate_new_stream(
        env: &Env,
        key: &StreamKey,
        amount_per_sec: i128,
        duration: u64,
    ) -> Result<Stream, ContractError> {
        if amount_per_sec <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        if key.recipient == key.sender || key.recipient == env.current_contract_address() {
            return Err(ContractError::InvalidRecipient);
        }
        if load_stream(env, key).is_some() {
            return Err(ContractError::StreamAlreadyExists);
        }
        if load_outgoing(env, &key.pool()).len() >= MAX_STREAMS_PER_SENDER {
            return Err(ContractError::TooManyStreams);
        }
        Self::fresh_stream(env, amount_per_sec, duration)
    }

    fn fresh_stream(
        env: &Env,
        amount_per_sec: i128,
        duration: u64,
    ) -> Result<Stream, ContractError> {
        let now = env.ledger().timestamp();
        let stop_time = if duration == 0 {
            0
        } else {
            now.checked_add(duration)
                .ok_or(ContractError::ArithmeticOverflow)?
        };
        Ok(Stream {
            amount_per_sec: accrual::to_scaled(amount_per_sec)?,
            start_time: now,
            stop_time,
            withdrawn: 0,
        })
    }

    fn persist_new_stream(env: &Env, key: &StreamKey, stream: &Stream) {
        save_stream(env, key, stream);

        let pool = key.pool();
        let mut recipients = load_outgoing(env, &pool);
        recipients.push_back(key.recipient.clone());
        save_outgoing(env, &pool, &recipients);

        events::stream_created(
            env,
            StreamCreated {
                token: key.token.clone(),
                sender: key.sender.clone(),
                recipient: key.recipient.clone(),
                amount_per_sec: stream.amount_per_sec,
                start_time: stream.start_time,
                stop_time: stream.stop_time,
            },
        );
    }

    fn deposit_funds(
        env: &Env,
        token: &Address,
        account: &Address,
        amount: i128,
    ) -> Result<i128, ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        // Tokens move first; nothing is credited unless the transfer succeeds.
        ledger::pull(env, token, account, amount)?;
        let balance = ledger::credit(env, &AccountKey::new(token, account), amount)?;
        events::deposited(env, token, account, amount);
        Ok(balance)
    }

    /// Pays `amount` units of a stream's accrual: the sender's balance drops
    /// by `amount`, the recipient receives it net of the protocol fee and the
    /// owner receives the fee. The caller persists `stream`.
    fn settle(
        env: &Env,
        config: &Config,
        key: &StreamKey,
        stream: &mut Stream,
        amount: i128,
    ) -> Result<(), ContractError> {
        stream.withdrawn = stream
            .withdrawn
            .checked_add(accrual::to_scaled(amount)?)
            .ok_or(ContractError::ArithmeticOverflow)?;

        let fee = accrual::protocol_fee(amount, config.protocol_fee_bps)?;
        ledger::debit(env, &key.pool(), amount)?;
        ledger::push(env, &key.token, &key.recipient, amount - fee);
        ledger::push(env, &key.token, &config.owner, fee);

        events::withdrawn(
            env,
            Withdrawn {
                token: key.token.clone(),
                sender: key.sender.clone(),
                recipient: key.recipient.clone(),
                amount,
                fee,
            },
        );
        Ok(())
    }

    /// A stream past its stop time that has paid out everything it ever will.
    fn is_exhausted(stream: &Stream, now: u64) -> bool {
        stream.stop_time != 0
            && now >= stream.stop_time
            && stream.withdrawn >= accrual::streamed_at(stream, stream.stop_time)
    }
}

// ---------------------------------------------------------------------------
// Contract Implementation
// ---------------------------------------------------------------------------

#[contract]
pub struct StreamPay;

#[contractimpl]
impl StreamPay {
    /// Initialise the ledger with its owner.
    ///
    /// Must be called exactly once. The protocol fee starts at zero and the
    /// contract starts unpaused.
    ///
    /// # Errors
    /// - `AlreadyInitialized` on any later call
    pub fn init(env: Env, owner: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(ContractError::AlreadyInitialized);
        }
        save_config(
            &env,
            &Config {
                owner,
                protocol_fee_bps: 0,
                paused: false,
            },
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Balance ledger
    // -----------------------------------------------------------------------

    /// Move `amount` of `token` from `account` into its custodial balance.
    ///
    /// The balance immediately backs every stream `account` runs on `token`,
    /// so this is also how a sender tops up streams that ran dry.
    ///
    /// # Returns
    /// - The account's custodial balance after the deposit
    ///
    /// # Errors
    /// - `ContractPaused`, `NotInitialized`
    /// - `InvalidAmount` if `amount <= 0`
    /// - `InsufficientBalance` if `account` holds less than `amount` of `token`
    /// - `ArithmeticOverflow` if the balance would exceed what the accrual
    ///   engine can scale
    ///
    /// # Events
    /// - `deposited(token, account)` with a [`Deposited`] payload
    pub fn deposit(
        env: Env,
        token: Address,
        account: Address,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::active_config(&env)?;
        account.require_auth();
        Self::deposit_funds(&env, &token, &account, amount)
    }

    /// Withdraw principal that no recipient has a claim on yet.
    ///
    /// Whatever the account's streams have accrued (up to the balance) stays
    /// behind for the recipients. `amount == 0` takes all of the free
    /// principal.
    ///
    /// # Returns
    /// - The amount transferred back to `account`
    ///
    /// # Errors
    /// - `ContractPaused`, `NotInitialized`
    /// - `InvalidAmount` if `amount < 0`
    /// - `InsufficientBalance` if `amount` exceeds the free principal
    pub fn withdraw_balance(
        env: Env,
        token: Address,
        account: Address,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::active_config(&env)?;
        account.require_auth();
        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let pool = AccountKey::new(&token, &account);
        let (_, allocations) = Self::pool_allocations(&env, &pool)?;
        let owed = accrual::to_units_ceil(accrual::committed(&allocations));
        let free = (ledger::balance_of(&env, &pool) - owed).max(0);

        let payout = if amount == 0 { free } else { amount };
        if payout > free {
            return Err(ContractError::InsufficientBalance);
        }
        if payout == 0 {
            return Ok(0);
        }

        ledger::debit(&env, &pool, payout)?;
        ledger::push(&env, &token, &account, payout);
        events::balance_withdrawn(&env, &token, &account, payout);
        Ok(payout)
    }

    /// Custodial balance of `account` in `token`, in token units.
    pub fn get_balance(env: Env, token: Address, account: Address) -> i128 {
        ledger::balance_of(&env, &AccountKey::new(&token, &account))
    }

    // -----------------------------------------------------------------------
    // Streams
    // -----------------------------------------------------------------------

    /// Open a stream paying `amount_per_sec` units of `token` from the
    /// sender's custodial balance to `recipient`.
    ///
    /// Nothing is reserved up front: the stream is a claim on the sender's
    /// balance, shared with every other stream the sender runs on `token`.
    /// `duration == 0` streams until cancelled; otherwise accrual stops
    /// `duration` seconds from now.
    ///
    /// # Returns
    /// - The stored stream record (rate scaled by [`PRECISION`])
    ///
    /// # Errors
    /// - `ContractPaused`, `NotInitialized`
    /// - `InvalidAmount` if `amount_per_sec <= 0`
    /// - `InvalidRecipient` if `recipient` is the sender or this contract
    /// - `StreamAlreadyExists` if the triple already has a stream
    /// - `TooManyStreams` past [`MAX_STREAMS_PER_SENDER`]
    /// - `InsufficientBalance` if the sender's balance is zero
    ///
    /// # Events
    /// - `created(token, sender)` with a [`StreamCreated`] payload
    pub fn create_stream(
        env: Env,
        token: Address,
        sender: Address,
        recipient: Address,
        amount_per_sec: i128,
        duration: u64,
    ) -> Result<Stream, ContractError> {
        Self::active_config(&env)?;
        sender.require_auth();

        let key = StreamKey::new(&token, &sender, &recipient);
        let stream = Self::validate_new_stream(&env, &key, amount_per_sec, duration)?;
        if ledger::balance_of(&env, &key.pool()) <= 0 {
            return Err(ContractError::InsufficientBalance);
        }

        Self::persist_new_stream(&env, &key, &stream);
        Ok(stream)
    }

    /// `deposit` followed by `create_stream`, as one unit.
    ///
    /// The stream is validated before any tokens move, so a rejected stream
    /// never leaves a deposit behind.
    #[allow(clippy::too_many_arguments)]
    pub fn create_stream_with_deposit(
        env: Env,
        token: Address,
        sender: Address,
        recipient: Address,
        amount_per_sec: i128,
        duration: u64,
        deposit_amount: i128,
    ) -> Result<Stream, ContractError> {
        Self::active_config(&env)?;
        sender.require_auth();

        if deposit_amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        let key = StreamKey::new(&token, &sender, &recipient);
        let stream = Self::validate_new_stream(&env, &key, amount_per_sec, duration)?;

        Self::deposit_funds(&env, &token, &sender, deposit_amount)?;
        Self::persist_new_stream(&env, &key, &stream);
        Ok(stream)
    }

    /// Pay out accrued tokens to the stream's recipient.
    ///
    /// `amount == 0` withdraws everything currently withdrawable. The sender's
    /// balance is debited by the gross amount; the recipient receives it minus
    /// the protocol fee, which goes to the owner. Calling with nothing to
    /// withdraw and `amount == 0` returns 0 without side effects.
    ///
    /// A stream past its stop time that has paid out in full is deleted.
    ///
    /// # Returns
    /// - The gross amount paid, in token units
    ///
    /// # Errors
    /// - `ContractPaused`, `NotInitialized`
    /// - `InvalidAmount` if `amount < 0`
    /// - `StreamNotFound` if the triple has no stream
    /// - `WithdrawExceedsAvailable` if `amount` is more than has accrued
    ///
    /// # Events
    /// - `withdrew(token, recipient)` with a [`Withdrawn`] payload
    pub fn withdraw(
        env: Env,
        token: Address,
        sender: Address,
        recipient: Address,
        amount: i128,
    ) -> Result<i128, ContractError> {
        let config = Self::active_config(&env)?;
        recipient.require_auth();
        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let key = StreamKey::new(&token, &sender, &recipient);
        let mut stream = load_stream(&env, &key).ok_or(ContractError::StreamNotFound)?;
        let available = Self::withdrawable_scaled(&env, &key)?;

        let payout = if amount == 0 {
            accrual::to_units(available)
        } else {
            if accrual::to_scaled(amount)? > available {
                return Err(ContractError::WithdrawExceedsAvailable);
            }
            amount
        };
        if payout == 0 {
            return Ok(0);
        }

        Self::settle(&env, &config, &key, &mut stream, payout)?;

        if Self::is_exhausted(&stream, env.ledger().timestamp()) {
            log!(&env, "stream paid out in full, closing", sender, recipient);
            remove_stream(&env, &key);
        } else {
            save_stream(&env, &key, &stream);
        }
        Ok(payout)
    }

    /// Close a stream, paying the recipient everything accrued so far.
    ///
    /// Settlement is identical to a full `withdraw` (same fee). Principal the
    /// stream never consumed simply stays in the sender's balance. The record
    /// is deleted, so the same triple can open a new stream afterwards.
    ///
    /// # Authorization
    /// - `caller` must be the stream's sender or recipient, and must sign
    ///
    /// # Returns
    /// - The gross amount settled to the recipient
    ///
    /// # Errors
    /// - `ContractPaused`, `NotInitialized`
    /// - `Unauthorized` if `caller` is neither party
    /// - `StreamNotFound` if the triple has no stream
    ///
    /// # Events
    /// - `withdrew(token, recipient)` when something was settled
    /// - `cancelled(token, sender)` with a [`StreamCancelled`] payload
    pub fn cancel_stream(
        env: Env,
        token: Address,
        sender: Address,
        recipient: Address,
        caller: Address,
    ) -> Result<i128, ContractError> {
        let config = Self::active_config(&env)?;
        if caller != sender && caller != recipient {
            return Err(ContractError::Unauthorized);
        }
        caller.require_auth();

        let key = StreamKey::new(&token, &sender, &recipient);
        let mut stream = load_stream(&env, &key).ok_or(ContractError::StreamNotFound)?;
        let settled = accrual::to_units(Self::withdrawable_scaled(&env, &key)?);

        if settled > 0 {
            Self::settle(&env, &config, &key, &mut stream, settled)?;
        }
        remove_stream(&env, &key);

        events::stream_cancelled(
            &env,
            StreamCancelled {
                token,
                sender,
                recipient,
                settled,
            },
        );
        Ok(settled)
    }

    /// Change a stream's rate (and duration) in place.
    ///
    /// Pending accrual is settled to the recipient first, exactly as
    /// `withdraw(.., 0)` would. The stream then restarts now with the new
    /// terms and keeps its place in the sender's stream order. Accrual the
    /// sender's balance could not cover is not carried over.
    ///
    /// # Errors
    /// - `ContractPaused`, `NotInitialized`
    /// - `InvalidAmount` if `amount_per_sec <= 0`
    /// - `StreamNotFound` if the triple has no stream
    ///
    /// # Events
    /// - `withdrew(token, recipient)` when something was settled
    /// - `updated(token, sender)` with a [`StreamUpdated`] payload
    pub fn update_stream(
        env: Env,
        token: Address,
        sender: Address,
        recipient: Address,
        amount_per_sec: i128,
        duration: u64,
    ) -> Result<Stream, ContractError> {
        let config = Self::active_config(&env)?;
        sender.require_auth();
        if amount_per_sec <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        let key = StreamKey::new(&token, &sender, &recipient);
        let mut stream = load_stream(&env, &key).ok_or(ContractError::StreamNotFound)?;
        let settled = accrual::to_units(Self::withdrawable_scaled(&env, &key)?);
        if settled > 0 {
            Self::settle(&env, &config, &key, &mut stream, settled)?;
        }

        let restarted = Self::fresh_stream(&env, amount_per_sec, duration)?;
        save_stream(&env, &key, &restarted);

        events::stream_updated(
            &env,
            StreamUpdated {
                token,
                sender,
                recipient,
                amount_per_sec: restarted.amount_per_sec,
                start_time: restarted.start_time,
                stop_time: restarted.stop_time,
            },
        );
        Ok(restarted)
    }

    /// Stream record plus live accrual and the sender's balance.
    ///
    /// Returns an all-zero view when the triple has no stream, so UIs can
    /// poll cancelled or never-created streams without special cases.
    pub fn get_stream(
        env: Env,
        token: Address,
        sender: Address,
        recipient: Address,
    ) -> Result<StreamView, ContractError> {
        let key = StreamKey::new(&token, &sender, &recipient);
        let Some(stream) = load_stream(&env, &key) else {
            return Ok(StreamView {
                amount_per_sec: 0,
                start_time: 0,
                stop_time: 0,
                withdrawn: 0,
                withdrawable_amount: 0,
                sender_balance: 0,
            });
        };

        Ok(StreamView {
            amount_per_sec: stream.amount_per_sec,
            start_time: stream.start_time,
            stop_time: stream.stop_time,
            withdrawn: stream.withdrawn,
            withdrawable_amount: Self::withdrawable_scaled(&env, &key)?,
            sender_balance: ledger::balance_of(&env, &key.pool()),
        })
    }

    /// Whole token units the recipient could withdraw right now; 0 when the
    /// triple has no stream.
    pub fn withdrawable(
        env: Env,
        token: Address,
        sender: Address,
        recipient: Address,
    ) -> Result<i128, ContractError> {
        let key = StreamKey::new(&token, &sender, &recipient);
        if load_stream(&env, &key).is_none() {
            return Ok(0);
        }
        Ok(accrual::to_units(Self::withdrawable_scaled(&env, &key)?))
    }

    pub fn stream_exists(env: Env, token: Address, sender: Address, recipient: Address) -> bool {
        load_stream(&env, &StreamKey::new(&token, &sender, &recipient)).is_some()
    }

    /// Recipients of the sender's live streams on `token`, oldest first.
    pub fn outgoing_streams(env: Env, token: Address, sender: Address) -> Vec<Address> {
        load_outgoing(&env, &AccountKey::new(&token, &sender))
    }

    // -----------------------------------------------------------------------
    // Admin
    // -----------------------------------------------------------------------

    pub fn get_config(env: Env) -> Result<Config, ContractError> {
        get_config(&env)
    }

    pub fn owner(env: Env) -> Result<Address, ContractError> {
        Ok(get_config(&env)?.owner)
    }

    pub fn protocol_fee_bps(env: Env) -> Result<u32, ContractError> {
        Ok(get_config(&env)?.protocol_fee_bps)
    }

    pub fn paused(env: Env) -> Result<bool, ContractError> {
        Ok(get_config(&env)?.paused)
    }

    /// Set the fee taken on every subsequent withdrawal, in basis points.
    ///
    /// # Errors
    /// - `Unauthorized` unless `caller` is the owner
    /// - `InvalidFee` above [`MAX_PROTOCOL_FEE_BPS`]
    pub fn set_protocol_fee(
        env: Env,
        caller: Address,
        fee_bps: u32,
    ) -> Result<(), ContractError> {
        let mut config = Self::require_owner(&env, &caller)?;
        if fee_bps > MAX_PROTOCOL_FEE_BPS {
            return Err(ContractError::InvalidFee);
        }

        let old_fee_bps = config.protocol_fee_bps;
        config.protocol_fee_bps = fee_bps;
        save_config(&env, &config);
        events::fee_updated(&env, old_fee_bps, fee_bps);
        Ok(())
    }

    /// Circuit breaker: while paused every mutating stream or balance call
    /// fails with `ContractPaused`. Reads and admin calls keep working.
    ///
    /// # Errors
    /// - `Unauthorized` unless `caller` is the owner
    pub fn set_paused(env: Env, caller: Address, paused: bool) -> Result<(), ContractError> {
        let mut config = Self::require_owner(&env, &caller)?;
        config.paused = paused;
        save_config(&env, &config);
        events::pause_toggled(&env, paused);
        Ok(())
    }

    /// Hand ownership (fee and pause control, fee income) to `new_owner`.
    ///
    /// # Errors
    /// - `Unauthorized` unless `caller` is the owner
    pub fn transfer_ownership(
        env: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        let mut config = Self::require_owner(&env, &caller)?;
        config.owner = new_owner.clone();
        save_config(&env, &config);
        events::owner_updated(&env, &caller, &new_owner);
        Ok(())
    }
}
