use crate::quota::QuotaField;

use super::types::{CharacterState, EXP_PER_LEVEL};

const STUDY_HOUR_EXP: i64 = 10;
const STUDY_HOUR_HP: i64 = -10;
const PRACTICE_EXP: i64 = 2;
const PRACTICE_HP: i64 = -5;
const BOSS_EXP: i64 = 10;
const BOSS_HP: i64 = -20;

/// Adds experience and health in one step.
///
/// A gain large enough to cross several level boundaries cascades through
/// all of them; a loss walks levels back down but never below level 1.
/// Levels are carried in closed form, so the cost does not depend on the
/// size of `exp_delta`. Level saturates at `u32::MAX`.
pub fn apply_exp_and_hp(state: CharacterState, exp_delta: i64, hp_delta: i64) -> CharacterState {
    let per_level = i128::from(EXP_PER_LEVEL);
    let running = i128::from(state.exp) + i128::from(exp_delta);
    let level = i128::from(state.level);

    let (level, exp) = if running >= 0 {
        (level + running / per_level, running % per_level)
    } else {
        let levels_down = (-running + per_level - 1) / per_level;
        if levels_down < level {
            (level - levels_down, running.rem_euclid(per_level))
        } else {
            (1, 0)
        }
    };

    let level = level.clamp(1, i128::from(u32::MAX)) as u32;
    let exp = exp.clamp(0, per_level - 1) as u32;
    let hp = i64::from(state.hp)
        .saturating_add(hp_delta)
        .clamp(0, i64::from(state.max_hp)) as u32;

    if level != state.level {
        log::debug!("level {} -> {level}", state.level);
    }

    CharacterState {
        level,
        exp,
        hp,
        ..state
    }
}

pub fn record_study_hour(state: CharacterState) -> CharacterState {
    record_study_hours(state, 1)
}

pub fn record_study_hours(state: CharacterState, hours: u32) -> CharacterState {
    let n = i64::from(hours);
    apply_exp_and_hp(state, STUDY_HOUR_EXP * n, STUDY_HOUR_HP * n)
}

pub fn record_practice(mut state: CharacterState, count: u32) -> CharacterState {
    state.today.mcq = state.today.mcq.saturating_add(count);
    state.total.mcq = state.total.mcq.saturating_add(count);
    let n = i64::from(count);
    apply_exp_and_hp(state, PRACTICE_EXP * n, PRACTICE_HP * n)
}

pub fn record_boss_encounter(mut state: CharacterState, count: u32) -> CharacterState {
    state.today.boss = state.today.boss.saturating_add(count);
    state.total.boss = state.total.boss.saturating_add(count);
    let n = i64::from(count);
    apply_exp_and_hp(state, BOSS_EXP * n, BOSS_HP * n)
}

pub fn heal_full(state: CharacterState) -> CharacterState {
    CharacterState {
        hp: state.max_hp,
        ..state
    }
}

pub fn toggle_auxiliary_resource(state: CharacterState) -> CharacterState {
    CharacterState {
        show_ap: !state.show_ap,
        ..state
    }
}

/// Moves a weekly `done` counter by `delta`, pinned to `[0, target]`.
pub fn adjust_weekly_quota(
    mut state: CharacterState,
    field: QuotaField,
    delta: i64,
) -> CharacterState {
    let weekly = &mut state.weekly;
    let (done, target) = match field {
        QuotaField::Zhonghui => (&mut weekly.zhonghui_done, weekly.zhonghui_target),
        QuotaField::Essay => (&mut weekly.essay_done, weekly.essay_target),
    };
    *done = i64::from(*done)
        .saturating_add(delta)
        .clamp(0, i64::from(target)) as u32;
    state
}

pub fn reset_weekly(mut state: CharacterState) -> CharacterState {
    state.weekly.zhonghui_done = 0;
    state.weekly.essay_done = 0;
    state
}
