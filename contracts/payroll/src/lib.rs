//! Client-side mirror of the quarry mine reward accounting.
//!
//! The mine program keeps, per quarry, a fixed-point accumulator of rewards
//! owed per staked token. This crate reproduces its arithmetic exactly so a
//! client can tell what a miner may claim at any instant without sending a
//! transaction.
//!
//! ```text
//! let rpt    = payroll::reward_per_token(&pool, now)?;
//! let earned = payroll::rewards_earned(&pool, &miner, now)?;
//! ```

pub mod checkpoint;
pub mod error;
pub mod payroll;
pub mod rewarder;
pub mod snapshot;

#[cfg(test)]
mod test;

pub use checkpoint::{
    predict_checkpoint, predict_checkpoint_with_rate, predict_claim, predict_settlement,
    predict_stake_action, Claim, Settlement, StakeAction,
};
pub use error::{PayrollError, Result, SnapshotViolation};
pub use payroll::{
    claimable_upper_bound, last_time_reward_applicable, reward_per_token, rewards_earned,
    sanity_check, PRECISION_MULTIPLIER, SECONDS_PER_YEAR,
};
pub use rewarder::{quarry_annual_rate, QuarryShare, MAX_ANNUAL_REWARDS_RATE};
pub use snapshot::{ParticipantSnapshot, PoolSnapshot, RewarderSnapshot};
