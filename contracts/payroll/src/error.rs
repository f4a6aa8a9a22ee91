//! Errors returned by the reward accounting routines.

use thiserror::Error;

/// Which invariant a snapshot broke.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum SnapshotViolation {
    /// A timestamp (or the query time) is below zero.
    NegativeTimestamp = 1,
    /// The participant holds more stake than the whole pool.
    DepositExceedsTotal = 2,
    /// The participant was settled against a reward-per-token value the
    /// pool has not reached yet.
    RewardsPerTokenPaidAhead = 3,
    /// A claim is smaller than what the participant had already accrued.
    ClaimBelowAccrued = 4,
    /// A withdrawal asks for more than the participant deposited.
    WithdrawExceedsDeposit = 5,
}

impl std::fmt::Display for SnapshotViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            SnapshotViolation::NegativeTimestamp => "timestamp is negative",
            SnapshotViolation::DepositExceedsTotal => "deposited exceeds pool total",
            SnapshotViolation::RewardsPerTokenPaidAhead => {
                "reward_per_token_paid is ahead of the pool"
            }
            SnapshotViolation::ClaimBelowAccrued => "claimable amount is below reward_accrued",
            SnapshotViolation::WithdrawExceedsDeposit => "withdrawal exceeds deposited balance",
        };
        f.write_str(msg)
    }
}

/// Payroll errors
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum PayrollError {
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(SnapshotViolation),

    #[error("arithmetic overflow in reward calculation")]
    ArithmeticOverflow,

    #[error("rewards share exceeds the rewarder's total shares")]
    InvalidRewardsShare,

    #[error("claimable amount exceeds the rewards upper bound")]
    UpperboundExceeded,
}

impl PayrollError {
    /// Stable numeric code, matching the numbering of [SnapshotViolation]
    /// for snapshot errors and starting at 100 for the rest.
    pub fn code(&self) -> u32 {
        match self {
            PayrollError::InvalidSnapshot(violation) => *violation as u32,
            PayrollError::ArithmeticOverflow => 100,
            PayrollError::InvalidRewardsShare => 101,
            PayrollError::UpperboundExceeded => 102,
        }
    }
}

impl From<SnapshotViolation> for PayrollError {
    fn from(violation: SnapshotViolation) -> Self {
        PayrollError::InvalidSnapshot(violation)
    }
}

pub type Result<T, E = PayrollError> = std::result::Result<T, E>;
