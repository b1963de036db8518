use proptest::prelude::*;
use studyquest_core::core_api::{
    CharacterState, Counters, WeeklyQuota, adjust_weekly_quota, apply_exp_and_hp, heal_full,
    record_boss_encounter, record_practice, record_study_hour, record_study_hours, reset_weekly,
    toggle_auxiliary_resource,
};
use studyquest_core::quota::QuotaField;

fn state_at(level: u32, exp: u32) -> CharacterState {
    CharacterState {
        level,
        exp,
        ..CharacterState::default()
    }
}

#[test]
fn single_rollover_carries_remainder() {
    let state = apply_exp_and_hp(state_at(1, 90), 30, 0);
    assert_eq!(state.level, 2);
    assert_eq!(state.exp, 20);
}

#[test]
fn large_gain_cascades_through_several_levels() {
    let state = apply_exp_and_hp(state_at(1, 90), 230, 0);
    assert_eq!(state.level, 4);
    assert_eq!(state.exp, 20);
}

#[test]
fn exactly_one_hundred_levels_up_once() {
    let state = apply_exp_and_hp(state_at(5, 0), 100, 0);
    assert_eq!(state.level, 6);
    assert_eq!(state.exp, 0);
}

#[test]
fn hp_never_goes_below_zero() {
    let start = CharacterState {
        hp: 5,
        max_hp: 240,
        ..CharacterState::default()
    };
    let state = apply_exp_and_hp(start, 0, -20);
    assert_eq!(state.hp, 0);
    assert!(state.is_exhausted());
}

#[test]
fn hp_never_exceeds_max() {
    let start = CharacterState {
        hp: 230,
        ..CharacterState::default()
    };
    let state = apply_exp_and_hp(start, 0, 500);
    assert_eq!(state.hp, 240);
}

#[test]
fn study_hour_trades_hp_for_exp() {
    let state = record_study_hour(CharacterState::default());
    assert_eq!(state.exp, 10);
    assert_eq!(state.hp, 230);
    assert_eq!(state.today, Counters::default());
}

#[test]
fn study_hours_match_repeated_single_hours() {
    let mut repeated = CharacterState::default();
    for _ in 0..30 {
        repeated = record_study_hour(repeated);
    }
    assert_eq!(record_study_hours(CharacterState::default(), 30), repeated);
    assert_eq!(repeated.level, 4);
    assert_eq!(repeated.hp, 0);
}

#[test]
fn study_hours_at_u32_max_finish() {
    let state = record_study_hours(CharacterState::default(), u32::MAX);
    assert_eq!(state.hp, 0);
    assert_eq!(state.level, 1 + (u64::from(u32::MAX) * 10 / 100) as u32);
}

#[test]
fn extreme_exp_deltas_stay_in_range() {
    let up = apply_exp_and_hp(state_at(1, 0), i64::MAX, 0);
    assert_eq!(up.level, u32::MAX);
    assert!(up.holds_invariants());

    let down = apply_exp_and_hp(state_at(u32::MAX, 50), i64::MIN, 0);
    assert_eq!(down.level, 1);
    assert_eq!(down.exp, 0);
}

#[test]
fn practice_counts_and_rewards_per_question() {
    let start = CharacterState {
        today: Counters { mcq: 3, boss: 0 },
        total: Counters { mcq: 60, boss: 6 },
        ..CharacterState::default()
    };
    let state = record_practice(start, 5);
    assert_eq!(state.today.mcq, 8);
    assert_eq!(state.total.mcq, 65);
    assert_eq!(state.today.boss, 0);
    assert_eq!(state.total.boss, 6);
    assert_eq!(state.exp, 10);
    assert_eq!(state.hp, 240 - 25);
}

#[test]
fn boss_counts_and_rewards_per_encounter() {
    let state = record_boss_encounter(state_at(12, 86), 1);
    assert_eq!(state.today.boss, 1);
    assert_eq!(state.total.boss, 1);
    assert_eq!(state.level, 12);
    assert_eq!(state.exp, 96);
    assert_eq!(state.hp, 220);

    let state = record_boss_encounter(state, 2);
    assert_eq!(state.today.boss, 3);
    assert_eq!(state.level, 13);
    assert_eq!(state.exp, 16);
    assert_eq!(state.hp, 180);
}

#[test]
fn heal_full_only_touches_hp() {
    let start = record_practice(CharacterState::default(), 4);
    let healed = heal_full(start);
    assert_eq!(healed.hp, healed.max_hp);
    assert_eq!(CharacterState { hp: start.hp, ..healed }, start);
}

#[test]
fn heal_full_is_idempotent() {
    let start = record_boss_encounter(CharacterState::default(), 3);
    assert_eq!(heal_full(heal_full(start)), heal_full(start));
}

#[test]
fn toggle_flips_visibility_only() {
    let start = CharacterState::default();
    let shown = toggle_auxiliary_resource(start);
    assert!(shown.show_ap);
    assert_eq!(shown.ap, start.ap);
    assert_eq!(toggle_auxiliary_resource(shown), start);
}

#[test]
fn weekly_quota_clamps_at_both_ends() {
    let start = CharacterState::default();
    let state = adjust_weekly_quota(start, QuotaField::Zhonghui, -5);
    assert_eq!(state.weekly.zhonghui_done, 0);

    let start = CharacterState {
        weekly: WeeklyQuota {
            zhonghui_done: 2,
            ..WeeklyQuota::default()
        },
        ..CharacterState::default()
    };
    let state = adjust_weekly_quota(start, QuotaField::Zhonghui, 5);
    assert_eq!(state.weekly.zhonghui_done, 3);
    assert_eq!(state.weekly.zhonghui_target, 3);
}

#[test]
fn weekly_quota_fields_are_independent() {
    let state = adjust_weekly_quota(CharacterState::default(), QuotaField::Essay, 4);
    assert_eq!(state.weekly.essay_done, 4);
    assert_eq!(state.weekly.zhonghui_done, 0);

    let state = adjust_weekly_quota(state, QuotaField::Essay, -1);
    assert_eq!(state.weekly.essay_done, 3);
}

#[test]
fn reset_then_increment_starts_from_zero() {
    for prior in 0..=5 {
        let start = CharacterState {
            weekly: WeeklyQuota {
                zhonghui_done: prior.min(3),
                essay_done: prior,
                ..WeeklyQuota::default()
            },
            ..CharacterState::default()
        };
        let reset = reset_weekly(start);
        assert_eq!(reset.weekly.zhonghui_target, 3);
        assert_eq!(reset.weekly.essay_target, 5);

        let state = adjust_weekly_quota(reset, QuotaField::Zhonghui, 1);
        assert_eq!(state.weekly.zhonghui_done, 1);
        let state = adjust_weekly_quota(reset, QuotaField::Essay, 1);
        assert_eq!(state.weekly.essay_done, 1);
    }
}

fn arb_state() -> impl Strategy<Value = CharacterState> {
    (1u32..500, 0u32..100, 0u32..1000, any::<bool>(), 0u32..=100).prop_flat_map(
        |(level, exp, max_hp, show_ap, ap)| {
            (0..=max_hp).prop_map(move |hp| CharacterState {
                level,
                exp,
                hp,
                max_hp,
                show_ap,
                ap,
                ..CharacterState::default()
            })
        },
    )
}

proptest! {
    #[test]
    fn exp_and_hp_stay_in_range(
        state in arb_state(),
        exp_delta in -100_000i64..100_000,
        hp_delta in -10_000i64..10_000,
    ) {
        let next = apply_exp_and_hp(state, exp_delta, hp_delta);
        prop_assert!(next.exp <= 99);
        prop_assert!(next.hp <= next.max_hp);
        prop_assert!(next.level >= 1);
        prop_assert!(next.holds_invariants());
        prop_assert_eq!(next.max_hp, state.max_hp);
    }

    #[test]
    fn any_i64_delta_stays_in_range(
        state in arb_state(),
        exp_delta in any::<i64>(),
        hp_delta in any::<i64>(),
    ) {
        let next = apply_exp_and_hp(state, exp_delta, hp_delta);
        prop_assert!(next.holds_invariants());
    }

    #[test]
    fn loss_matches_stepwise_loss(state in arb_state(), loss in 0u32..500) {
        let mut stepwise = state;
        for _ in 0..loss {
            stepwise = apply_exp_and_hp(stepwise, -1, 0);
        }
        prop_assert_eq!(apply_exp_and_hp(state, -i64::from(loss), 0), stepwise);
    }

    #[test]
    fn positive_gain_matches_closed_form(state in arb_state(), gain in 0i64..100_000) {
        let next = apply_exp_and_hp(state, gain, 0);
        let total = i64::from(state.exp) + gain;
        prop_assert_eq!(i64::from(next.level), i64::from(state.level) + total / 100);
        prop_assert_eq!(i64::from(next.exp), total % 100);
    }

    #[test]
    fn weekly_done_never_leaves_target_range(
        field in prop_oneof![Just(QuotaField::Zhonghui), Just(QuotaField::Essay)],
        deltas in proptest::collection::vec(-10i64..10, 0..20),
    ) {
        let mut state = CharacterState::default();
        for delta in deltas {
            state = adjust_weekly_quota(state, field, delta);
            prop_assert!(state.weekly.zhonghui_done <= state.weekly.zhonghui_target);
            prop_assert!(state.weekly.essay_done <= state.weekly.essay_target);
        }
    }

    #[test]
    fn counters_never_decrease(mcq in 0u32..50, boss in 0u32..50) {
        let start = CharacterState::default();
        let next = record_boss_encounter(record_practice(start, mcq), boss);
        prop_assert!(next.today.mcq >= start.today.mcq);
        prop_assert!(next.total.boss >= start.total.boss);
        prop_assert_eq!(next.total.mcq, mcq);
        prop_assert_eq!(next.today.boss, boss);
    }
}
