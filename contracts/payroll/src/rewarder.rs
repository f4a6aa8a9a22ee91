//! Splitting a rewarder's annual rate between its quarries.

use crate::error::{PayrollError, Result};
use crate::snapshot::RewarderSnapshot;

/// Largest annual rate a rewarder accepts on chain.
pub const MAX_ANNUAL_REWARDS_RATE: u64 = u64::MAX >> 3;

/// A quarry's stake in a rewarder's emissions.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct QuarryShare {
    pub rewarder: RewarderSnapshot,
    pub rewards_share: u64,
}

impl QuarryShare {
    pub fn new(rewarder: RewarderSnapshot, rewards_share: u64) -> Self {
        Self {
            rewarder,
            rewards_share,
        }
    }

    /// See [quarry_annual_rate].
    pub fn annual_rate(&self) -> Result<u64> {
        quarry_annual_rate(&self.rewarder, self.rewards_share)
    }
}

/// Annual rate a quarry holding `rewards_share` receives from `rewarder`.
///
/// ```text
/// quarry_rate = annual_rate × rewards_share / total_rewards_shares
/// ```
///
/// Rounds down, so a rewarder split across `n` quarries under-distributes by
/// at most `n` units a year.
pub fn quarry_annual_rate(rewarder: &RewarderSnapshot, rewards_share: u64) -> Result<u64> {
    if rewards_share > rewarder.total_rewards_shares {
        return Err(PayrollError::InvalidRewardsShare);
    }

    if rewarder.total_rewards_shares == 0 || rewarder.annual_rate == 0 || rewards_share == 0 {
        return Ok(0);
    }

    let rate = u128::from(rewarder.annual_rate)
        .checked_mul(rewards_share.into())
        .and_then(|v| v.checked_div(rewarder.total_rewards_shares.into()))
        .ok_or(PayrollError::ArithmeticOverflow)?;
    u64::try_from(rate).map_err(|_| PayrollError::ArithmeticOverflow)
}
