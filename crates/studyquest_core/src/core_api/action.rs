use serde::{Deserialize, Serialize};

use crate::quota::QuotaField;

use super::engine;
use super::types::CharacterState;

/// One discrete user action, as a host would collect it from a button or a
/// command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Serialized as `study_hour`; `hours` defaults to 1 when absent.
    #[serde(rename = "study_hour")]
    Study {
        #[serde(default = "one_hour")]
        hours: u32,
    },
    Practice { count: u32 },
    Boss { count: u32 },
    HealFull,
    ToggleAp,
    AdjustWeekly { field: QuotaField, delta: i64 },
    ResetWeekly,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Study { .. } => "study_hour",
            Self::Practice { .. } => "practice",
            Self::Boss { .. } => "boss",
            Self::HealFull => "heal_full",
            Self::ToggleAp => "toggle_ap",
            Self::AdjustWeekly { .. } => "adjust_weekly",
            Self::ResetWeekly => "reset_weekly",
        }
    }
}

fn one_hour() -> u32 {
    1
}

pub fn apply_action(state: CharacterState, action: &Action) -> CharacterState {
    log::debug!("applying {}", action.name());
    match *action {
        Action::Study { hours } => engine::record_study_hours(state, hours),
        Action::Practice { count } => engine::record_practice(state, count),
        Action::Boss { count } => engine::record_boss_encounter(state, count),
        Action::HealFull => engine::heal_full(state),
        Action::ToggleAp => engine::toggle_auxiliary_resource(state),
        Action::AdjustWeekly { field, delta } => engine::adjust_weekly_quota(state, field, delta),
        Action::ResetWeekly => engine::reset_weekly(state),
    }
}
