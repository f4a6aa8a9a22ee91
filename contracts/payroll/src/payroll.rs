//! Reward-per-token accounting for a single quarry.

use std::cmp;

use log::{debug, trace, warn};

use crate::error::{PayrollError, Result, SnapshotViolation};
use crate::snapshot::{ParticipantSnapshot, PoolSnapshot};

uint::construct_uint! {
    /// 192-bit unsigned integer used for intermediate products.
    pub struct U192(3);
}

/// Number of seconds in a 365-day year.
pub const SECONDS_PER_YEAR: u128 = 86_400 * 365;

/// Fixed-point scaling factor of `reward_per_token_stored`.
///
/// This is the on-chain program's constant: every reward-per-token value it
/// persists is multiplied by `u64::MAX`. Any other value here would make
/// every prediction disagree with the chain.
pub const PRECISION_MULTIPLIER: u128 = u64::MAX as u128;

// ── Core reward engine ──────────────────────────────────────────────────────

/// Latest time at which rewards were still being distributed.
pub fn last_time_reward_applicable(pool: &PoolSnapshot, now: i64) -> i64 {
    cmp::min(now, pool.famine_time)
}

/// Seconds of distribution since the last checkpoint.
///
/// Queries older than the checkpoint clamp to zero instead of going negative.
fn time_worked(pool: &PoolSnapshot, now: i64) -> Result<u64> {
    let elapsed = last_time_reward_applicable(pool, now)
        .checked_sub(pool.last_checkpoint_time)
        .ok_or(PayrollError::ArithmeticOverflow)?;
    Ok(cmp::max(0, elapsed) as u64)
}

fn validate_query(pool: &PoolSnapshot, now: i64) -> Result<()> {
    pool.validate()?;
    if now < 0 {
        return Err(SnapshotViolation::NegativeTimestamp.into());
    }
    Ok(())
}

fn narrow(value: U192) -> Result<u128> {
    u128::try_from(value).map_err(|_| PayrollError::ArithmeticOverflow)
}

fn reward_per_token_unchecked(pool: &PoolSnapshot, now: i64) -> Option<u128> {
    if pool.total_deposited == 0 {
        return Some(pool.reward_per_token_stored);
    }

    let time_worked = time_worked(pool, now).ok()?;

    // Scale before dividing by the year so sub-unit rates survive.
    let increment = U192::from(time_worked)
        .checked_mul(PRECISION_MULTIPLIER.into())?
        .checked_mul(pool.annual_rate.into())?
        .checked_div(SECONDS_PER_YEAR.into())?
        .checked_div(pool.total_deposited.into())?;

    pool.reward_per_token_stored
        .checked_add(narrow(increment).ok()?)
}

/// Computes the up-to-date reward-per-token of `pool` at `now`.
///
/// ```text
/// Δrpt = time_worked × PRECISION_MULTIPLIER × annual_rate / SECONDS_PER_YEAR / total_deposited
/// rpt  = reward_per_token_stored + Δrpt
/// ```
///
/// With nothing deposited the stored value is returned unchanged.
pub fn reward_per_token(pool: &PoolSnapshot, now: i64) -> Result<u128> {
    validate_query(pool, now)?;
    let rpt = reward_per_token_unchecked(pool, now).ok_or(PayrollError::ArithmeticOverflow)?;
    trace!(
        "reward_per_token: now={} stored={} current={}",
        now,
        pool.reward_per_token_stored,
        rpt
    );
    Ok(rpt)
}

/// Computes everything `participant` is owed at `now`, including rewards
/// already accrued but not yet claimed.
///
/// ```text
/// earned = deposited × (rpt − reward_per_token_paid) / PRECISION_MULTIPLIER + reward_accrued
/// ```
///
/// A participant whose `reward_per_token_paid` is ahead of the pool is
/// rejected: on unsigned math the subtraction would otherwise wrap into an
/// enormous reward.
pub fn rewards_earned(
    pool: &PoolSnapshot,
    participant: &ParticipantSnapshot,
    now: i64,
) -> Result<u128> {
    participant.validate_against(pool)?;
    let current = reward_per_token(pool, now)?;
    let net_new_rewards = current
        .checked_sub(participant.reward_per_token_paid)
        .ok_or(SnapshotViolation::RewardsPerTokenPaidAhead)?;

    let earned = U192::from(participant.deposited)
        .checked_mul(net_new_rewards.into())
        .and_then(|v| v.checked_div(PRECISION_MULTIPLIER.into()))
        .and_then(|v| v.checked_add(participant.reward_accrued.into()))
        .ok_or(PayrollError::ArithmeticOverflow)?;
    let earned = narrow(earned)?;

    debug!(
        "rewards_earned: now={} deposited={} accrued={} earned={}",
        now, participant.deposited, participant.reward_accrued, earned
    );
    Ok(earned)
}

// ── Sanity bound ────────────────────────────────────────────────────────────

/// Upper bound on what the whole pool could have produced for a miner last
/// settled at `reward_per_token_paid`: everything emitted since the
/// checkpoint plus the pool's entire backlog since the miner's settlement.
pub fn claimable_upper_bound(
    pool: &PoolSnapshot,
    now: i64,
    reward_per_token_paid: u128,
) -> Result<u128> {
    validate_query(pool, now)?;
    let time_worked = time_worked(pool, now)?;

    let pool_rewards_accrued = U192::from(time_worked)
        .checked_mul(pool.annual_rate.into())
        .and_then(|v| v.checked_div(SECONDS_PER_YEAR.into()))
        .ok_or(PayrollError::ArithmeticOverflow)?;

    let net_rewards_per_token = pool
        .reward_per_token_stored
        .checked_sub(reward_per_token_paid)
        .ok_or(SnapshotViolation::RewardsPerTokenPaidAhead)?;
    let net_pool_rewards = U192::from(net_rewards_per_token)
        .checked_mul(pool.total_deposited.into())
        .and_then(|v| v.checked_div(PRECISION_MULTIPLIER.into()))
        .ok_or(PayrollError::ArithmeticOverflow)?;

    pool_rewards_accrued
        .checked_add(net_pool_rewards)
        .ok_or(PayrollError::ArithmeticOverflow)
        .and_then(narrow)
}

/// Rejects an `amount_claimable` the pool could not have produced.
///
/// Rounding order makes the bound fall one unit short in some cases. Once the
/// newly claimable amount is past the bound, the mine program only lets the
/// claim through if the whole `amount_claimable`, accrued rewards included,
/// is within one unit of it. A miner carrying accrued rewards into such a
/// rounding case is therefore rejected on chain, and here.
pub fn sanity_check(
    pool: &PoolSnapshot,
    now: i64,
    amount_claimable: u128,
    participant: &ParticipantSnapshot,
) -> Result<()> {
    let upper_bound = claimable_upper_bound(pool, now, participant.reward_per_token_paid)?;
    let newly_claimable = amount_claimable
        .checked_sub(participant.reward_accrued.into())
        .ok_or(SnapshotViolation::ClaimBelowAccrued)?;

    if upper_bound < newly_claimable {
        warn!(
            "now: {}, rewards_upperbound: {}, amount_claimable: {}, pool: {:?}, participant: {:?}",
            now, upper_bound, amount_claimable, pool, participant,
        );
        if upper_bound.saturating_add(1) < amount_claimable {
            return Err(PayrollError::UpperboundExceeded);
        }
    }
    Ok(())
}
