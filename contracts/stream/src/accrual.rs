//! Accrual math for streams drawing on a shared custodial balance.
//!
//! All amounts here are scaled by [`PRECISION`]. A sender's streams on one
//! token are always evaluated together: the sender's balance is a single pool
//! and the sum of what every recipient may withdraw never exceeds it.
//!
//! For a stream `i` let `owed_i(t)` be what it has streamed by second `t`
//! minus what it already withdrew, and let `F(t)` be the sum over all of the
//! sender's streams. `F` never decreases. While `F(now)` fits in the budget
//! every stream is simply owed `owed_i(now)`. Once it does not, accrual stops
//! at the solvency horizon `h`, the last second where `F(h)` still fits; the
//! budget left over after `F(h)` goes to each stream's accrual during the
//! following second, in stream creation order.

use soroban_sdk::{Env, Vec};

use crate::{ContractError, Stream, BPS_DENOMINATOR};

/// Fixed-point scale of stored rates and withdrawn totals.
pub const PRECISION: i128 = 100_000_000_000_000_000_000;

/// Gross amount a stream has produced by `at`, ignoring its sender's balance.
///
/// Saturates rather than overflowing: a saturated value is larger than any
/// budget the ledger can hold, so it only ever reads as "insolvent".
pub fn streamed_at(stream: &Stream, at: u64) -> i128 {
    let end = if stream.stop_time == 0 {
        at
    } else {
        at.min(stream.stop_time)
    };
    let elapsed = end.saturating_sub(stream.start_time);
    stream.amount_per_sec.saturating_mul(elapsed as i128)
}

/// Streamed but not yet withdrawn, before the balance cap.
pub fn owed_at(stream: &Stream, at: u64) -> i128 {
    streamed_at(stream, at)
        .saturating_sub(stream.withdrawn)
        .max(0)
}

fn total_owed_at(streams: &Vec<Stream>, at: u64) -> i128 {
    streams
        .iter()
        .fold(0i128, |total, stream| total.saturating_add(owed_at(&stream, at)))
}

/// Last second at or before `now` at which `budget` still covered every
/// stream. Only meaningful when `F(now) > budget`.
fn solvency_horizon(streams: &Vec<Stream>, budget: i128, now: u64) -> u64 {
    // Nothing is owed before the earliest start, so `lo` always fits.
    let mut lo = streams
        .iter()
        .map(|stream| stream.start_time)
        .min()
        .unwrap_or(now)
        .min(now);
    let mut hi = now;

    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if total_owed_at(streams, mid) <= budget {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Withdrawable amount of every stream, in the order given.
///
/// `streams` must be all of one sender's streams on one token, in creation
/// order, and `budget` that sender's scaled balance.
pub fn allocate(env: &Env, streams: &Vec<Stream>, budget: i128, now: u64) -> Vec<i128> {
    let mut allocations = Vec::new(env);

    if total_owed_at(streams, now) <= budget {
        for stream in streams.iter() {
            allocations.push_back(owed_at(&stream, now));
        }
        return allocations;
    }

    let horizon = solvency_horizon(streams, budget, now);
    let mut leftover = budget - total_owed_at(streams, horizon);

    for stream in streams.iter() {
        let settled = owed_at(&stream, horizon);
        let next_second = owed_at(&stream, horizon + 1).saturating_sub(settled);
        let share = next_second.min(leftover);
        leftover -= share;
        allocations.push_back(settled + share);
    }
    allocations
}

/// Scaled amount of the budget already spoken for by recipients.
pub fn committed(allocations: &Vec<i128>) -> i128 {
    allocations
        .iter()
        .fold(0i128, |total, amount| total.saturating_add(amount))
}

/// Converts a scaled amount to whole token units, rounding down.
pub fn to_units(scaled: i128) -> i128 {
    scaled / PRECISION
}

/// Converts a scaled amount to whole token units, rounding up.
pub fn to_units_ceil(scaled: i128) -> i128 {
    let units = scaled / PRECISION;
    if scaled % PRECISION > 0 {
        units + 1
    } else {
        units
    }
}

pub fn to_scaled(units: i128) -> Result<i128, ContractError> {
    units
        .checked_mul(PRECISION)
        .ok_or(ContractError::ArithmeticOverflow)
}

/// Protocol fee on a withdrawal of `amount` units, rounded down.
pub fn protocol_fee(amount: i128, fee_bps: u32) -> Result<i128, ContractError> {
    amount
        .checked_mul(fee_bps as i128)
        .map(|gross| gross / BPS_DENOMINATOR)
        .ok_or(ContractError::ArithmeticOverflow)
}
