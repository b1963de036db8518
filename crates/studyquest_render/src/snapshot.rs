use std::fmt::Write as _;

use serde::Deserialize;
use serde_json::{Map as JsonMap, Value as JsonValue};
use studyquest_core::core_api::{
    AP_MAX, CharacterState, CoreError, CoreErrorCode, Counters, EXP_PER_LEVEL, WeeklyQuota,
};

use crate::bar::{DEFAULT_BAR_WIDTH, render_bar};

const DEFAULT_FILE_PREFIX: &str = "StudyQuest_Permanent_Save";
const PAYLOAD_FENCE_OPEN: &str = "```json\n";
const PAYLOAD_FENCE_CLOSE: &str = "\n```";

/// Everything about an export that is not part of the character state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMeta {
    pub title: String,
    pub player: String,
    /// Already formatted to minute precision, see [`crate::format_timestamp`].
    pub timestamp: String,
    pub countdown: Option<String>,
    pub file_prefix: String,
    pub bar_width: usize,
}

impl SnapshotMeta {
    pub fn new(
        title: impl Into<String>,
        player: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            player: player.into(),
            timestamp: timestamp.into(),
            countdown: None,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    pub fn with_countdown(mut self, countdown: impl Into<String>) -> Self {
        self.countdown = Some(countdown.into());
        self
    }

    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    /// Title as shown in the header, with the countdown appended when set.
    pub fn display_title(&self) -> String {
        match &self.countdown {
            Some(countdown) => format!("{}  ⏳ {}", self.title, countdown),
            None => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotExport {
    pub file_name: String,
    pub document: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Gauge {
    pub current: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ApGauge {
    pub current: u32,
    pub max: u32,
    pub visible: bool,
}

/// The machine-readable block embedded in an exported document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SnapshotPayload {
    pub title: String,
    pub player: String,
    pub level: u32,
    pub update: String,
    pub exp: Gauge,
    pub hp: Gauge,
    /// Absent in exports made before the AP gauge was recorded.
    pub ap: Option<ApGauge>,
    pub today: Counters,
    pub total: Counters,
    pub weekly: WeeklyQuota,
}

impl SnapshotPayload {
    pub fn to_state(&self) -> CharacterState {
        let (ap, show_ap) = match self.ap {
            Some(gauge) => (gauge.current, gauge.visible),
            None => (AP_MAX, false),
        };
        let state = CharacterState {
            level: self.level,
            exp: self.exp.current,
            hp: self.hp.current,
            max_hp: self.hp.max,
            show_ap,
            ap,
            today: self.today,
            total: self.total,
            weekly: self.weekly,
        };
        if !state.holds_invariants() {
            log::warn!("snapshot payload out of range, clamping");
        }
        state.normalized()
    }
}

pub fn serialize_snapshot(state: &CharacterState, meta: &SnapshotMeta) -> SnapshotExport {
    let payload = render_payload_json(state, meta);
    let payload = serde_json::to_string_pretty(&payload).expect("json values always serialize");
    let width = meta.bar_width;
    let display_title = meta.display_title();

    let mut out = String::new();
    writeln!(&mut out, "## Snapshot — {}", meta.timestamp).expect("writing to String cannot fail");
    writeln!(&mut out, "**{display_title}**  ").expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "{}  Lv.{}　{}",
        meta.player, state.level, meta.timestamp
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    writeln!(
        &mut out,
        "EXP: [{}]   {} / {}  ",
        render_bar(i64::from(state.exp), i64::from(EXP_PER_LEVEL), width),
        state.exp,
        EXP_PER_LEVEL
    )
    .expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "HP : [{}] {} / {}  ",
        render_bar(i64::from(state.hp), i64::from(state.max_hp), width),
        state.hp,
        state.max_hp
    )
    .expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "AP : [{}] {} / {}  ",
        render_bar(i64::from(state.ap), i64::from(AP_MAX), width),
        state.ap,
        AP_MAX
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    writeln!(
        &mut out,
        "⚔️ Today: MCQ {}   Boss {}  ",
        state.today.mcq, state.today.boss
    )
    .expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "🗡️ Total: MCQ {}   Boss {}  ",
        state.total.mcq, state.total.boss
    )
    .expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "📌 Weekly: Zhonghui {} / {}   Essay {} / {}",
        state.weekly.zhonghui_done,
        state.weekly.zhonghui_target,
        state.weekly.essay_done,
        state.weekly.essay_target
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    writeln!(&mut out, "<details>").expect("writing to String cannot fail");
    writeln!(&mut out, "<summary>Raw (for scripts / diffing)</summary>")
        .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(&mut out, "{PAYLOAD_FENCE_OPEN}{payload}{PAYLOAD_FENCE_CLOSE}")
        .expect("writing to String cannot fail");
    writeln!(&mut out, "</details>").expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(&mut out, "---").expect("writing to String cannot fail");

    SnapshotExport {
        file_name: export_file_name(&meta.file_prefix, &meta.timestamp),
        document: out,
    }
}

/// Canonical payload; key order is part of the export format.
pub fn render_payload_json(state: &CharacterState, meta: &SnapshotMeta) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert(
        "title".to_string(),
        JsonValue::String(meta.display_title()),
    );
    out.insert("player".to_string(), JsonValue::String(meta.player.clone()));
    out.insert("level".to_string(), JsonValue::from(state.level));
    out.insert(
        "update".to_string(),
        JsonValue::String(meta.timestamp.clone()),
    );
    out.insert("exp".to_string(), gauge_to_json(state.exp, EXP_PER_LEVEL));
    out.insert("hp".to_string(), gauge_to_json(state.hp, state.max_hp));

    let mut ap = JsonMap::new();
    ap.insert("current".to_string(), JsonValue::from(state.ap));
    ap.insert("max".to_string(), JsonValue::from(AP_MAX));
    ap.insert("visible".to_string(), JsonValue::Bool(state.show_ap));
    out.insert("ap".to_string(), JsonValue::Object(ap));

    out.insert("today".to_string(), counters_to_json(&state.today));
    out.insert("total".to_string(), counters_to_json(&state.total));
    out.insert("weekly".to_string(), weekly_to_json(&state.weekly));

    JsonValue::Object(out)
}

/// Pulls the fenced JSON payload back out of an exported document.
///
/// The payload is the last fence in the document; header text such as a
/// title may contain a fence of its own, but JSON strings cannot hold a raw
/// newline, so the last opening fence is always the real one.
pub fn extract_payload(document: &str) -> Result<SnapshotPayload, CoreError> {
    let start = document.rfind(PAYLOAD_FENCE_OPEN).ok_or_else(|| {
        CoreError::new(
            CoreErrorCode::InvalidPayload,
            "document has no ```json block",
        )
    })? + PAYLOAD_FENCE_OPEN.len();
    let body = &document[start..];
    let end = body.find(PAYLOAD_FENCE_CLOSE).ok_or_else(|| {
        CoreError::new(
            CoreErrorCode::InvalidPayload,
            "```json block is not closed",
        )
    })?;

    serde_json::from_str(&body[..end]).map_err(|e| {
        CoreError::new(
            CoreErrorCode::InvalidPayload,
            format!("failed to parse snapshot payload: {e}"),
        )
    })
}

pub fn export_file_name(prefix: &str, timestamp: &str) -> String {
    let prefix = sanitize_file_component(prefix);
    let stamp = sanitize_file_component(timestamp);
    match (prefix.is_empty(), stamp.is_empty()) {
        (true, true) => "snapshot.md".to_string(),
        (true, false) => format!("{stamp}.md"),
        (false, true) => format!("{prefix}.md"),
        (false, false) => format!("{prefix}_{stamp}.md"),
    }
}

/// Replaces `/` and `:` with `-` and whitespace with `_`; drops the other
/// characters Windows refuses in file names.
pub fn sanitize_file_component(text: &str) -> String {
    text.trim()
        .chars()
        .filter_map(|c| match c {
            '/' | '\\' | ':' => Some('-'),
            c if c.is_whitespace() => Some('_'),
            '*' | '?' | '"' | '<' | '>' | '|' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

fn gauge_to_json(current: u32, max: u32) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("current".to_string(), JsonValue::from(current));
    m.insert("max".to_string(), JsonValue::from(max));
    JsonValue::Object(m)
}

fn counters_to_json(counters: &Counters) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("mcq".to_string(), JsonValue::from(counters.mcq));
    m.insert("boss".to_string(), JsonValue::from(counters.boss));
    JsonValue::Object(m)
}

fn weekly_to_json(weekly: &WeeklyQuota) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert(
        "zhonghui_done".to_string(),
        JsonValue::from(weekly.zhonghui_done),
    );
    m.insert(
        "zhonghui_target".to_string(),
        JsonValue::from(weekly.zhonghui_target),
    );
    m.insert("essay_done".to_string(), JsonValue::from(weekly.essay_done));
    m.insert(
        "essay_target".to_string(),
        JsonValue::from(weekly.essay_target),
    );
    JsonValue::Object(m)
}
