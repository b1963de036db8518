use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use studyquest_core::core_api::{
    Action, CharacterState, StateDefaults, apply_action as apply_core_action, load_or_default,
};
use studyquest_render::{
    DEFAULT_BAR_WIDTH, DEFAULT_UTC_OFFSET, MAX_BAR_WIDTH, SnapshotExport, SnapshotMeta,
    countdown_label, format_timestamp, local_date, parse_utc_offset, render_dashboard,
    serialize_snapshot,
};
use wasm_bindgen::prelude::*;

/// localStorage key the page keeps the character record under.
pub const STORAGE_KEY: &str = "studyquest-panel-state";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WebStateOptions {
    pub starting_level: Option<u32>,
    pub max_hp: Option<u32>,
    pub zhonghui_target: Option<u32>,
    pub essay_target: Option<u32>,
}

impl WebStateOptions {
    fn defaults(&self) -> StateDefaults {
        let base = StateDefaults::default();
        StateDefaults {
            starting_level: self.starting_level.unwrap_or(base.starting_level),
            max_hp: self.max_hp.unwrap_or(base.max_hp),
            zhonghui_target: self.zhonghui_target.unwrap_or(base.zhonghui_target),
            essay_target: self.essay_target.unwrap_or(base.essay_target),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WebDisplayOptions {
    /// `Date.now()` on the page; required because wasm has no clock of its own.
    pub now_ms: Option<f64>,
    pub utc_offset: Option<String>,
    pub title: Option<String>,
    pub player: Option<String>,
    pub countdown: Option<String>,
    /// `YYYY-MM-DD`; ignored when `countdown` is given.
    pub exam_date: Option<String>,
    pub file_prefix: Option<String>,
    pub bar_width: Option<usize>,
}

#[derive(Debug, Clone)]
struct WebError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct WebErrorPayload {
    code: String,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct WebSnapshot {
    file_name: String,
    document: String,
}

impl From<SnapshotExport> for WebSnapshot {
    fn from(export: SnapshotExport) -> Self {
        Self {
            file_name: export.file_name,
            document: export.document,
        }
    }
}

impl WebError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_js_value(&self) -> JsValue {
        let payload = WebErrorPayload {
            code: self.code.to_string(),
            message: self.message.clone(),
        };
        serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| {
            JsValue::from_str(&format!("{}: {}", payload.code, payload.message))
        })
    }
}

#[wasm_bindgen]
pub fn storage_key() -> String {
    STORAGE_KEY.to_string()
}

#[wasm_bindgen]
pub fn default_state(options: JsValue) -> Result<String, JsValue> {
    let options: WebStateOptions = parse_options(options).map_err(|err| err.to_js_value())?;
    Ok(options.defaults().build().to_json())
}

/// Takes whatever `localStorage.getItem` returned and hands back a record
/// that is safe to render, falling back to a fresh sheet.
#[wasm_bindgen]
pub fn load_state(stored: Option<String>, options: JsValue) -> Result<String, JsValue> {
    let options: WebStateOptions = parse_options(options).map_err(|err| err.to_js_value())?;
    Ok(load_state_impl(stored.as_deref(), &options).to_json())
}

#[wasm_bindgen]
pub fn apply_action(state_json: &str, action: JsValue) -> Result<String, JsValue> {
    let action = parse_action(action).map_err(|err| err.to_js_value())?;
    apply_action_impl(state_json, &action)
        .map(|state| state.to_json())
        .map_err(|err| err.to_js_value())
}

#[wasm_bindgen]
pub fn render_dashboard_text(state_json: &str, options: JsValue) -> Result<String, JsValue> {
    let options: WebDisplayOptions = parse_options(options).map_err(|err| err.to_js_value())?;
    render_dashboard_text_impl(state_json, &options).map_err(|err| err.to_js_value())
}

/// Returns `{ file_name, document }` for the page to offer as a download.
#[wasm_bindgen]
pub fn export_snapshot(state_json: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let options: WebDisplayOptions = parse_options(options).map_err(|err| err.to_js_value())?;
    let snapshot = export_snapshot_impl(state_json, &options).map_err(|err| err.to_js_value())?;
    serde_wasm_bindgen::to_value(&snapshot).map_err(|err| {
        WebError::new(
            "render_failed",
            format!("failed to convert snapshot for the page: {err}"),
        )
        .to_js_value()
    })
}

fn load_state_impl(stored: Option<&str>, options: &WebStateOptions) -> CharacterState {
    let stored = stored.filter(|raw| !raw.trim().is_empty());
    load_or_default(stored, options.defaults().build())
}

fn apply_action_impl(state_json: &str, action: &Action) -> Result<CharacterState, WebError> {
    let state = parse_state(state_json)?;
    Ok(apply_core_action(state, action))
}

fn render_dashboard_text_impl(
    state_json: &str,
    options: &WebDisplayOptions,
) -> Result<String, WebError> {
    let state = parse_state(state_json)?;
    let meta = snapshot_meta(options)?;
    Ok(render_dashboard(&state, &meta))
}

fn export_snapshot_impl(
    state_json: &str,
    options: &WebDisplayOptions,
) -> Result<WebSnapshot, WebError> {
    let state = parse_state(state_json)?;
    let meta = snapshot_meta(options)?;
    Ok(serialize_snapshot(&state, &meta).into())
}

fn parse_state(state_json: &str) -> Result<CharacterState, WebError> {
    CharacterState::from_json(state_json)
        .map(CharacterState::normalized)
        .map_err(|err| WebError::new("invalid_state", err.message))
}

fn parse_action(action: JsValue) -> Result<Action, WebError> {
    serde_wasm_bindgen::from_value(action).map_err(|err| {
        WebError::new(
            "invalid_action",
            format!("Failed to parse action: {err}"),
        )
    })
}

fn parse_options<T>(options: JsValue) -> Result<T, WebError>
where
    T: Default + for<'de> Deserialize<'de>,
{
    if options.is_null() || options.is_undefined() {
        return Ok(T::default());
    }

    serde_wasm_bindgen::from_value(options).map_err(|err| {
        WebError::new(
            "invalid_options",
            format!("Failed to parse web options: {err}"),
        )
    })
}

fn snapshot_meta(options: &WebDisplayOptions) -> Result<SnapshotMeta, WebError> {
    let now = parse_now(options.now_ms)?;
    let offset = parse_offset(options.utc_offset.as_deref())?;

    let mut meta = SnapshotMeta::new(
        options.title.clone().unwrap_or_else(|| "StudyQuest".to_string()),
        options.player.clone().unwrap_or_else(|| "Player".to_string()),
        format_timestamp(now, offset),
    )
    .with_bar_width(parse_bar_width(options.bar_width)?);
    if let Some(prefix) = &options.file_prefix {
        meta = meta.with_file_prefix(prefix.clone());
    }

    let countdown = match (&options.countdown, &options.exam_date) {
        (Some(label), _) => Some(label.clone()),
        (None, Some(raw)) => {
            let exam = parse_exam_date(raw)?;
            Some(countdown_label(local_date(now, offset), exam))
        }
        (None, None) => None,
    };
    if let Some(countdown) = countdown {
        meta = meta.with_countdown(countdown);
    }
    Ok(meta)
}

fn parse_now(now_ms: Option<f64>) -> Result<DateTime<Utc>, WebError> {
    let Some(now_ms) = now_ms else {
        return Err(WebError::new(
            "invalid_options",
            "now_ms is required (pass Date.now())",
        ));
    };
    if !now_ms.is_finite() {
        return Err(WebError::new(
            "invalid_options",
            format!("now_ms must be a finite number, got {now_ms}"),
        ));
    }

    DateTime::from_timestamp_millis(now_ms as i64).ok_or_else(|| {
        WebError::new(
            "invalid_options",
            format!("now_ms {now_ms} is out of range"),
        )
    })
}

fn parse_bar_width(raw: Option<usize>) -> Result<usize, WebError> {
    match raw {
        None => Ok(DEFAULT_BAR_WIDTH),
        Some(width) if (1..=MAX_BAR_WIDTH).contains(&width) => Ok(width),
        Some(width) => Err(WebError::new(
            "invalid_options",
            format!("bar_width must be between 1 and {MAX_BAR_WIDTH}, got {width}"),
        )),
    }
}

fn parse_offset(raw: Option<&str>) -> Result<FixedOffset, WebError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_UTC_OFFSET);
    parse_utc_offset(raw).map_err(|message| WebError::new("invalid_options", message))
}

fn parse_exam_date(raw: &str) -> Result<NaiveDate, WebError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|err| {
        WebError::new(
            "invalid_options",
            format!("Invalid exam_date '{raw}', expected YYYY-MM-DD: {err}"),
        )
    })
}
