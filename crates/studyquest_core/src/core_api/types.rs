use serde::{Deserialize, Serialize};

use super::error::{CoreError, CoreErrorCode};

/// Experience consumed by one level-up.
pub const EXP_PER_LEVEL: u32 = 100;
pub const AP_MAX: u32 = 100;
pub const DEFAULT_MAX_HP: u32 = 240;
pub const DEFAULT_ZHONGHUI_TARGET: u32 = 3;
pub const DEFAULT_ESSAY_TARGET: u32 = 5;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub mcq: u32,
    pub boss: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyQuota {
    pub zhonghui_done: u32,
    pub zhonghui_target: u32,
    pub essay_done: u32,
    pub essay_target: u32,
}

impl WeeklyQuota {
    pub fn new(zhonghui_target: u32, essay_target: u32) -> Self {
        Self {
            zhonghui_done: 0,
            zhonghui_target,
            essay_done: 0,
            essay_target,
        }
    }
}

impl Default for WeeklyQuota {
    fn default() -> Self {
        Self::new(DEFAULT_ZHONGHUI_TARGET, DEFAULT_ESSAY_TARGET)
    }
}

/// The whole character sheet. Field names on the wire match the record the
/// browser panel keeps in localStorage, so either host can read the other's
/// saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterState {
    pub level: u32,
    pub exp: u32,
    pub hp: u32,
    #[serde(rename = "maxHp")]
    pub max_hp: u32,
    #[serde(rename = "showAP")]
    pub show_ap: bool,
    pub ap: u32,
    pub today: Counters,
    pub total: Counters,
    pub weekly: WeeklyQuota,
}

/// Host-tunable knobs for building a fresh state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateDefaults {
    pub starting_level: u32,
    pub max_hp: u32,
    pub zhonghui_target: u32,
    pub essay_target: u32,
}

impl Default for StateDefaults {
    fn default() -> Self {
        Self {
            starting_level: 1,
            max_hp: DEFAULT_MAX_HP,
            zhonghui_target: DEFAULT_ZHONGHUI_TARGET,
            essay_target: DEFAULT_ESSAY_TARGET,
        }
    }
}

impl StateDefaults {
    pub fn build(&self) -> CharacterState {
        CharacterState {
            level: self.starting_level.max(1),
            exp: 0,
            hp: self.max_hp,
            max_hp: self.max_hp,
            show_ap: false,
            ap: AP_MAX,
            today: Counters::default(),
            total: Counters::default(),
            weekly: WeeklyQuota::new(self.zhonghui_target, self.essay_target),
        }
    }
}

impl Default for CharacterState {
    fn default() -> Self {
        StateDefaults::default().build()
    }
}

impl CharacterState {
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Parse,
                format!("failed to parse character state: {e}"),
            )
        })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("character state always serializes")
    }

    /// Pulls a record that came from outside the engine back inside the
    /// invariants. Values already in range are left alone.
    pub fn normalized(mut self) -> Self {
        self.level = self.level.max(1);
        self.exp = self.exp.min(EXP_PER_LEVEL - 1);
        self.hp = self.hp.min(self.max_hp);
        self.ap = self.ap.min(AP_MAX);
        self.weekly.zhonghui_done = self.weekly.zhonghui_done.min(self.weekly.zhonghui_target);
        self.weekly.essay_done = self.weekly.essay_done.min(self.weekly.essay_target);
        self
    }

    pub fn holds_invariants(&self) -> bool {
        self.level >= 1
            && self.exp < EXP_PER_LEVEL
            && self.hp <= self.max_hp
            && self.weekly.zhonghui_done <= self.weekly.zhonghui_target
            && self.weekly.essay_done <= self.weekly.essay_target
    }

    /// Fraction of the way to the next level, in `[0, 1)`.
    pub fn level_up_progress(&self) -> f64 {
        f64::from(self.exp) / f64::from(EXP_PER_LEVEL)
    }

    pub fn is_exhausted(&self) -> bool {
        self.hp == 0
    }
}

/// Reads a persisted record, substituting `fallback` when nothing was stored
/// or the stored text does not parse.
pub fn load_or_default(raw: Option<&str>, fallback: CharacterState) -> CharacterState {
    let Some(raw) = raw else {
        log::info!("no stored character state, starting from defaults");
        return fallback;
    };

    match CharacterState::from_json(raw) {
        Ok(state) => {
            if !state.holds_invariants() {
                log::warn!("stored character state was out of range, clamping");
            }
            state.normalized()
        }
        Err(err) => {
            log::warn!("discarding stored character state: {err}");
            fallback
        }
    }
}
