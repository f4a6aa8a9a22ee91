#![cfg(test)]

use crate::*;

const SECONDS_PER_DAY: i64 = 86_400;

fn to_unit(amt: u64) -> u64 {
    amt * 1_000_000
}

fn quarry_for(rewarder: &RewarderSnapshot, rewards_share: u64) -> PoolSnapshot {
    PoolSnapshot {
        famine_time: i64::MAX,
        annual_rate: quarry_annual_rate(rewarder, rewards_share).unwrap(),
        ..Default::default()
    }
}

fn sim_stake(now: i64, pool: &mut PoolSnapshot, miner: &mut ParticipantSnapshot, amount: u64) {
    let next = predict_stake_action(pool, miner, StakeAction::Stake, amount, None, now).unwrap();
    *pool = next.pool;
    *miner = next.participant;
}

fn sim_withdraw(now: i64, pool: &mut PoolSnapshot, miner: &mut ParticipantSnapshot, amount: u64) {
    let next = predict_stake_action(pool, miner, StakeAction::Withdraw, amount, None, now).unwrap();
    *pool = next.pool;
    *miner = next.participant;
}

fn sim_claim(now: i64, pool: &mut PoolSnapshot, miner: &mut ParticipantSnapshot) -> u64 {
    let claim = predict_claim(pool, miner, None, now).unwrap();
    *pool = claim.pool;
    *miner = claim.participant;
    claim.amount
}

#[test]
fn test_lifecycle_one_miner() {
    let daily_rate = to_unit(5_000);
    let rewarder = RewarderSnapshot {
        annual_rate: daily_rate * 365,
        total_rewards_shares: 100,
    };
    let pool = &mut quarry_for(&rewarder, 100);
    let miner = &mut ParticipantSnapshot::default();
    assert_eq!(pool.annual_rate, rewarder.annual_rate);

    let mut now: i64 = 0;
    let total_to_stake = to_unit(500);
    sim_stake(now, pool, miner, total_to_stake);
    assert_eq!(miner.deposited, total_to_stake);
    assert_eq!(pool.total_deposited, total_to_stake);

    // Six days later, withdraw half.
    now += SECONDS_PER_DAY * 6;
    let withdraw_amount = to_unit(250);
    sim_withdraw(now, pool, miner, withdraw_amount);
    assert!(pool.reward_per_token_stored > 0);
    assert_eq!(
        u128::from(miner.reward_accrued),
        miner.reward_per_token_paid * u128::from(total_to_stake) / PRECISION_MULTIPLIER
    );
    assert_eq!(miner.reward_accrued, daily_rate * 6);
    assert_eq!(miner.deposited, total_to_stake - withdraw_amount);

    let expected = miner.reward_accrued;
    assert_eq!(sim_claim(now, pool, miner), expected);
    // No double claim.
    assert_eq!(sim_claim(now, pool, miner), 0);

    // Withdraw the rest six days later; the only miner gets the whole rate.
    now += SECONDS_PER_DAY * 6;
    sim_withdraw(now, pool, miner, withdraw_amount);
    assert_eq!(miner.deposited, 0);
    assert_eq!(pool.total_deposited, 0);
    assert_eq!(sim_claim(now, pool, miner), expected);

    // Nothing staked, nothing earned.
    now += SECONDS_PER_DAY * 6;
    assert_eq!(sim_claim(now, pool, miner), 0);
}

#[test]
fn test_lifecycle_two_miners() {
    let daily_rate = to_unit(5_000);
    let rewarder = RewarderSnapshot {
        annual_rate: daily_rate * 365,
        total_rewards_shares: 100,
    };
    let pool = &mut quarry_for(&rewarder, 100);
    let miner_one = &mut ParticipantSnapshot::default();
    let miner_two = &mut ParticipantSnapshot::default();

    let mut now: i64 = 0;
    let total_to_stake = to_unit(500);
    sim_stake(now, pool, miner_one, total_to_stake);
    sim_stake(now, pool, miner_two, total_to_stake);
    assert_eq!(pool.total_deposited, total_to_stake * 2);

    // Miner two leaves after three days.
    now += SECONDS_PER_DAY * 3;
    sim_withdraw(now, pool, miner_two, total_to_stake);
    assert_eq!(
        u128::from(miner_two.reward_accrued),
        miner_two.reward_per_token_paid * u128::from(total_to_stake) / PRECISION_MULTIPLIER
    );
    assert_eq!(miner_two.deposited, 0);

    now += SECONDS_PER_DAY * 3;
    let total_distributed = daily_rate * 6;
    assert_eq!(sim_claim(now, pool, miner_one), total_distributed * 3 / 4);
    assert_eq!(sim_claim(now, pool, miner_two), total_distributed / 4);

    now += SECONDS_PER_DAY * 6;
    let expected_one = daily_rate * 6;
    assert_eq!(sim_claim(now, pool, miner_one), expected_one);
    assert_eq!(sim_claim(now, pool, miner_two), 0);

    // Miner two comes back; the rate is split evenly again.
    sim_stake(now, pool, miner_two, total_to_stake);
    now += SECONDS_PER_DAY * 6;
    assert_eq!(sim_claim(now, pool, miner_one), expected_one / 2);
    assert_eq!(sim_claim(now, pool, miner_two), expected_one / 2);
}

#[test]
fn test_prediction_does_not_require_checkpoint() {
    // Querying far ahead equals checkpointing daily along the way.
    let pool = PoolSnapshot::new(i64::MAX, 0, to_unit(5_000) * 365, 0, to_unit(1_000));
    let miner = ParticipantSnapshot::new(to_unit(250), 0, 0);
    let horizon = SECONDS_PER_DAY * 30;

    let direct = rewards_earned(&pool, &miner, horizon).unwrap();

    let mut stepped = pool;
    for day in 1..=30 {
        stepped = predict_checkpoint(&stepped, SECONDS_PER_DAY * day).unwrap();
    }
    assert_eq!(rewards_earned(&stepped, &miner, horizon).unwrap(), direct);
    assert_eq!(direct, u128::from(to_unit(5_000) * 30 / 4));
}

#[test]
fn test_famine_mid_period() {
    let pool = PoolSnapshot::new(
        SECONDS_PER_DAY * 2,
        0,
        to_unit(5_000) * 365,
        0,
        to_unit(100),
    );
    let miner = ParticipantSnapshot::new(to_unit(100), 0, 0);

    let at_famine = rewards_earned(&pool, &miner, SECONDS_PER_DAY * 2).unwrap();
    assert_eq!(at_famine, u128::from(to_unit(10_000)));
    assert_eq!(
        rewards_earned(&pool, &miner, SECONDS_PER_DAY * 400).unwrap(),
        at_famine
    );

    let settled = predict_settlement(&pool, &miner, None, SECONDS_PER_DAY * 400).unwrap();
    assert_eq!(settled.pool.last_checkpoint_time, SECONDS_PER_DAY * 2);
    assert_eq!(u128::from(settled.participant.reward_accrued), at_famine);
}

#[test]
fn test_snapshots_are_not_mutated() {
    let pool = PoolSnapshot::new(1_000_000, 0, 365 * 86_400, 0, 100);
    let miner = ParticipantSnapshot::new(50, 0, 0);
    let (pool_before, miner_before) = (pool, miner);

    let first = predict_claim(&pool, &miner, None, 100).unwrap();
    let second = predict_claim(&pool, &miner, None, 100).unwrap();
    assert_eq!(first, second);
    assert_eq!(pool, pool_before);
    assert_eq!(miner, miner_before);
}
