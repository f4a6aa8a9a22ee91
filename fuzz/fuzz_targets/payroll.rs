#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use payroll::{
    predict_checkpoint, predict_settlement, reward_per_token, rewards_earned, ParticipantSnapshot,
    PoolSnapshot,
};

#[derive(Arbitrary, Debug)]
struct Input {
    pool: PoolSnapshot,
    miner: ParticipantSnapshot,
    now: i64,
    later: u32,
}

fuzz_target!(|input: Input| {
    let Input {
        pool,
        miner,
        now,
        later,
    } = input;

    // Errors are fine; panics and non-monotonic results are not.
    let Ok(rpt) = reward_per_token(&pool, now) else {
        return;
    };
    assert!(rpt >= pool.reward_per_token_stored);

    if let Ok(next) = reward_per_token(&pool, now.saturating_add(later.into())) {
        assert!(next >= rpt);
    }

    if let Ok(earned) = rewards_earned(&pool, &miner, now) {
        assert!(earned >= u128::from(miner.reward_accrued));
        assert_eq!(rewards_earned(&pool, &miner, now), Ok(earned));
    }

    if let Ok(checkpointed) = predict_checkpoint(&pool, now) {
        assert!(checkpointed.last_checkpoint_time >= pool.last_checkpoint_time);
        assert_eq!(checkpointed.reward_per_token_stored, rpt);
    }

    let _ = predict_settlement(&pool, &miner, None, now);
});
