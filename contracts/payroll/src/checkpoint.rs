//! Predicts the state the mine program persists when it checkpoints a quarry
//! and settles a miner. Nothing here is written anywhere: every function
//! returns fresh snapshots and leaves its inputs untouched.

use std::cmp;

use log::debug;

use crate::error::{PayrollError, Result, SnapshotViolation};
use crate::payroll::{last_time_reward_applicable, reward_per_token, rewards_earned, sanity_check};
use crate::rewarder::QuarryShare;
use crate::snapshot::{ParticipantSnapshot, PoolSnapshot};

/// An action for a miner to take on a quarry.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StakeAction {
    /// Deposit into the quarry.
    Stake,
    /// Withdraw from the quarry.
    Withdraw,
}

/// Pool and miner after a settlement.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Settlement {
    pub pool: PoolSnapshot,
    pub participant: ParticipantSnapshot,
}

/// Pool and miner after a claim, plus the amount paid out before fees.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Claim {
    pub pool: PoolSnapshot,
    pub participant: ParticipantSnapshot,
    pub amount: u64,
}

/// Brings `pool` up to date as of `now`.
///
/// The checkpoint never moves backwards: a query older than the current
/// checkpoint leaves it where it is.
pub fn predict_checkpoint(pool: &PoolSnapshot, now: i64) -> Result<PoolSnapshot> {
    let reward_per_token_stored = reward_per_token(pool, now)?;
    let last_checkpoint_time = cmp::max(
        pool.last_checkpoint_time,
        last_time_reward_applicable(pool, now),
    );
    Ok(PoolSnapshot {
        reward_per_token_stored,
        last_checkpoint_time,
        ..*pool
    })
}

/// Checkpoints `pool` and re-syncs its annual rate with the rewarder, as the
/// mine program does whenever it touches a quarry.
pub fn predict_checkpoint_with_rate(
    pool: &PoolSnapshot,
    share: &QuarryShare,
    now: i64,
) -> Result<PoolSnapshot> {
    let checkpointed = predict_checkpoint(pool, now)?;
    Ok(PoolSnapshot {
        annual_rate: share.annual_rate()?,
        ..checkpointed
    })
}

fn checkpoint(pool: &PoolSnapshot, share: Option<&QuarryShare>, now: i64) -> Result<PoolSnapshot> {
    match share {
        Some(share) => predict_checkpoint_with_rate(pool, share, now),
        None => predict_checkpoint(pool, now),
    }
}

/// Checkpoints `pool` and moves everything `participant` earned so far into
/// `reward_accrued`.
///
/// With a `share`, the checkpointed pool also takes the rewarder's current
/// rate. Earnings up to `now` are always computed at the pool's old rate.
pub fn predict_settlement(
    pool: &PoolSnapshot,
    participant: &ParticipantSnapshot,
    share: Option<&QuarryShare>,
    now: i64,
) -> Result<Settlement> {
    let checkpointed = checkpoint(pool, share, now)?;

    let earned = rewards_earned(pool, participant, now)?;
    sanity_check(pool, now, earned, participant)?;
    let reward_accrued = u64::try_from(earned).map_err(|_| PayrollError::ArithmeticOverflow)?;

    debug!(
        "settled miner at {}: accrued {} -> {}",
        now, participant.reward_accrued, reward_accrued
    );
    Ok(Settlement {
        pool: checkpointed,
        participant: ParticipantSnapshot {
            reward_accrued,
            reward_per_token_paid: checkpointed.reward_per_token_stored,
            ..*participant
        },
    })
}

/// Settles, then applies a deposit or withdrawal of `amount`.
pub fn predict_stake_action(
    pool: &PoolSnapshot,
    participant: &ParticipantSnapshot,
    action: StakeAction,
    amount: u64,
    share: Option<&QuarryShare>,
    now: i64,
) -> Result<Settlement> {
    let Settlement {
        mut pool,
        mut participant,
    } = predict_settlement(pool, participant, share, now)?;

    match action {
        StakeAction::Stake => {
            participant.deposited = participant
                .deposited
                .checked_add(amount)
                .ok_or(PayrollError::ArithmeticOverflow)?;
            pool.total_deposited = pool
                .total_deposited
                .checked_add(amount)
                .ok_or(PayrollError::ArithmeticOverflow)?;
        }
        StakeAction::Withdraw => {
            participant.deposited = participant
                .deposited
                .checked_sub(amount)
                .ok_or(SnapshotViolation::WithdrawExceedsDeposit)?;
            pool.total_deposited = pool
                .total_deposited
                .checked_sub(amount)
                .ok_or(SnapshotViolation::DepositExceedsTotal)?;
        }
    }

    Ok(Settlement { pool, participant })
}

/// Settles, then pays out everything accrued.
pub fn predict_claim(
    pool: &PoolSnapshot,
    participant: &ParticipantSnapshot,
    share: Option<&QuarryShare>,
    now: i64,
) -> Result<Claim> {
    let Settlement { pool, participant } = predict_settlement(pool, participant, share, now)?;
    Ok(Claim {
        pool,
        amount: participant.reward_accrued,
        participant: ParticipantSnapshot {
            reward_accrued: 0,
            ..participant
        },
    })
}
