mod action;
mod engine;
mod error;
mod session;
mod types;

pub use action::{Action, apply_action};
pub use engine::{
    adjust_weekly_quota, apply_exp_and_hp, heal_full, record_boss_encounter, record_practice,
    record_study_hour, record_study_hours, reset_weekly, toggle_auxiliary_resource,
};
pub use error::{CoreError, CoreErrorCode};
pub use session::Session;
pub use types::{
    AP_MAX, CharacterState, Counters, DEFAULT_ESSAY_TARGET, DEFAULT_MAX_HP,
    DEFAULT_ZHONGHUI_TARGET, EXP_PER_LEVEL, StateDefaults, WeeklyQuota, load_or_default,
};
