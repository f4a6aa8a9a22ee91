//! Read-only views of quarry, miner and rewarder state.
//!
//! Snapshots are decoded once, at the edge of the SDK, and then passed by
//! value into the calculators. Nothing in this crate mutates them; the
//! prediction helpers in [crate::checkpoint] return fresh copies instead.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapshotViolation};

/// State of a quarry at its last checkpoint.
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolSnapshot {
    /// Timestamp after which rewards stop accruing.
    pub famine_time: i64,
    /// Timestamp of the last checkpoint.
    pub last_checkpoint_time: i64,
    /// Reward units issued per 365-day year across the whole pool.
    pub annual_rate: u64,
    /// Reward units owed per staked token, scaled by
    /// [crate::payroll::PRECISION_MULTIPLIER].
    #[serde(with = "u128_string")]
    pub reward_per_token_stored: u128,
    /// Total stake deposited into the pool.
    pub total_deposited: u64,
}

impl PoolSnapshot {
    pub fn new(
        famine_time: i64,
        last_checkpoint_time: i64,
        annual_rate: u64,
        reward_per_token_stored: u128,
        total_deposited: u64,
    ) -> Self {
        Self {
            famine_time,
            last_checkpoint_time,
            annual_rate,
            reward_per_token_stored,
            total_deposited,
        }
    }

    /// Rejects snapshots carrying a negative timestamp.
    pub fn validate(&self) -> Result<()> {
        if self.famine_time < 0 || self.last_checkpoint_time < 0 {
            return Err(SnapshotViolation::NegativeTimestamp.into());
        }
        Ok(())
    }
}

/// A miner's position within a quarry.
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParticipantSnapshot {
    /// Tokens the miner has staked.
    pub deposited: u64,
    /// Pool reward-per-token at the miner's last settlement.
    #[serde(with = "u128_string")]
    pub reward_per_token_paid: u128,
    /// Rewards settled but not yet claimed.
    pub reward_accrued: u64,
}

impl ParticipantSnapshot {
    pub fn new(deposited: u64, reward_per_token_paid: u128, reward_accrued: u64) -> Self {
        Self {
            deposited,
            reward_per_token_paid,
            reward_accrued,
        }
    }

    /// Checks that this miner fits inside `pool`.
    pub fn validate_against(&self, pool: &PoolSnapshot) -> Result<()> {
        if self.deposited > pool.total_deposited {
            return Err(SnapshotViolation::DepositExceedsTotal.into());
        }
        Ok(())
    }
}

/// Rewarder fields needed to split its rate between quarries.
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewarderSnapshot {
    /// Reward units issued per year across every quarry of the rewarder.
    pub annual_rate: u64,
    /// Sum of the rewards shares of all quarries.
    pub total_rewards_shares: u64,
}

/// JSON numbers above `u64::MAX` lose precision in most decoders, so 128-bit
/// accumulators travel as decimal strings. Plain numbers are still accepted
/// on input.
mod u128_string {
    use std::fmt;

    use serde::{de, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        deserializer.deserialize_any(U128Visitor)
    }

    struct U128Visitor;

    impl<'de> de::Visitor<'de> for U128Visitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an unsigned 128-bit integer or its decimal string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
            v.parse::<u128>().map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
            Ok(v.into())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
            u128::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
        }
    }
}
