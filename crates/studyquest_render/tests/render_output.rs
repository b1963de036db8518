use studyquest_core::core_api::{Action, CharacterState, Counters, Session, WeeklyQuota};
use studyquest_core::quota::QuotaField;
use studyquest_render::{
    SnapshotMeta, export_file_name, extract_payload, render_bar, render_dashboard,
    render_payload_json, sanitize_file_component, serialize_snapshot,
};

fn sample_state() -> CharacterState {
    CharacterState {
        level: 12,
        exp: 86,
        hp: 230,
        max_hp: 240,
        show_ap: false,
        ap: 100,
        today: Counters { mcq: 3, boss: 0 },
        total: Counters { mcq: 60, boss: 6 },
        weekly: WeeklyQuota {
            zhonghui_done: 1,
            zhonghui_target: 3,
            essay_done: 4,
            essay_target: 5,
        },
    }
}

fn sample_meta() -> SnapshotMeta {
    SnapshotMeta::new("115 CPA Online", "Roy", "2025/10/18  09:05").with_countdown("D-339")
}

#[test]
fn bar_examples() {
    assert_eq!(render_bar(50, 100, 20), format!("{}{}", "▮".repeat(10), "░".repeat(10)));
    assert_eq!(render_bar(0, 100, 20), "░".repeat(20));
    assert_eq!(render_bar(100, 100, 20), "▮".repeat(20));
}

#[test]
fn bar_clamps_and_guards_zero_max() {
    assert_eq!(render_bar(150, 100, 10), "▮".repeat(10));
    assert_eq!(render_bar(-5, 100, 10), "░".repeat(10));
    assert_eq!(render_bar(10, 0, 10), "░".repeat(10));
    assert_eq!(render_bar(33, 100, 7).chars().count(), 7);
}

#[test]
fn payload_uses_canonical_key_order() {
    let value = render_payload_json(&sample_state(), &sample_meta());
    let keys: Vec<&str> = value
        .as_object()
        .expect("payload should be an object")
        .keys()
        .map(String::as_str)
        .collect();

    assert_eq!(
        keys,
        vec![
            "title", "player", "level", "update", "exp", "hp", "ap", "today", "total", "weekly",
        ]
    );

    let weekly: Vec<&str> = value["weekly"]
        .as_object()
        .expect("weekly should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        weekly,
        vec!["zhonghui_done", "zhonghui_target", "essay_done", "essay_target"]
    );
    assert_eq!(value["title"], "115 CPA Online  ⏳ D-339");
    assert_eq!(value["exp"]["max"], 100);
    assert_eq!(value["hp"]["current"], 230);
}

#[test]
fn document_lines_appear_in_order() {
    let export = serialize_snapshot(&sample_state(), &sample_meta());
    let doc = &export.document;

    let expected = [
        "## Snapshot — 2025/10/18  09:05\n",
        "**115 CPA Online  ⏳ D-339**  \n",
        "Roy  Lv.12　2025/10/18  09:05\n",
        "EXP: [▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮░░░]   86 / 100  \n",
        "HP : [▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮░] 230 / 240  \n",
        "AP : [▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮] 100 / 100  \n",
        "⚔️ Today: MCQ 3   Boss 0  \n",
        "🗡️ Total: MCQ 60   Boss 6  \n",
        "📌 Weekly: Zhonghui 1 / 3   Essay 4 / 5\n",
        "<details>\n",
        "```json\n{\n",
        "\n```\n</details>\n",
        "---\n",
    ];
    let mut cursor = 0;
    for needle in expected {
        let found = doc[cursor..]
            .find(needle)
            .unwrap_or_else(|| panic!("missing or out of order: {needle:?}\n{doc}"));
        cursor += found + needle.len();
    }
}

#[test]
fn payload_round_trips_to_identical_state() {
    let mut session = Session::new(sample_state());
    session.apply_all(&[
        Action::Boss { count: 2 },
        Action::ToggleAp,
        Action::AdjustWeekly {
            field: QuotaField::Zhonghui,
            delta: 1,
        },
    ]);
    let state = *session.state();

    let export = serialize_snapshot(&state, &sample_meta());
    let payload = extract_payload(&export.document).expect("payload should parse back");
    assert_eq!(payload.to_state(), state);
    assert_eq!(payload.update, "2025/10/18  09:05");
    assert_eq!(payload.player, "Roy");
}

#[test]
fn fence_inside_header_text_does_not_shadow_payload() {
    let state = sample_state();
    let meta = SnapshotMeta::new("```json\n{}\n```", "Roy\n```json\n[]", "2025/10/18  09:05");

    let export = serialize_snapshot(&state, &meta);
    let payload = extract_payload(&export.document).expect("real payload should be found");
    assert_eq!(payload.title, "```json\n{}\n```");
    assert_eq!(payload.player, "Roy\n```json\n[]");
    assert_eq!(payload.to_state(), state);
}

#[test]
fn payload_without_ap_block_still_loads() {
    let doc = "intro\n```json\n{\n  \"title\": \"t\",\n  \"player\": \"Roy\",\n  \"level\": 12,\n  \
               \"update\": \"2025/10/18  09:05\",\n  \"exp\": {\"current\": 86, \"max\": 100},\n  \
               \"hp\": {\"current\": 240, \"max\": 240},\n  \"today\": {\"mcq\": 3, \"boss\": 0},\n  \
               \"total\": {\"mcq\": 60, \"boss\": 6},\n  \"weekly\": {\"zhonghui_done\": 0, \
               \"zhonghui_target\": 3, \"essay_done\": 0, \"essay_target\": 5}\n}\n```\n";
    let state = extract_payload(doc).expect("legacy payload parses").to_state();
    assert_eq!(state.level, 12);
    assert_eq!(state.ap, 100);
    assert!(!state.show_ap);
}

#[test]
fn extract_payload_reports_missing_block() {
    let err = extract_payload("## Snapshot\nno payload here\n").expect_err("should fail");
    assert!(err.message.contains("no ```json block"));

    let err = extract_payload("```json\n{\"level\": 1}\n```\n").expect_err("should fail");
    assert!(err.message.contains("failed to parse snapshot payload"));
}

#[test]
fn file_name_replaces_unsafe_characters() {
    let export = serialize_snapshot(
        &sample_state(),
        &sample_meta().with_file_prefix("115_CPA_Online_Permanent_Save"),
    );
    assert_eq!(
        export.file_name,
        "115_CPA_Online_Permanent_Save_2025-10-18__09-05.md"
    );
    assert!(!export.file_name.contains(&['/', ':', ' '][..]));

    assert_eq!(sanitize_file_component(" a/b:c d "), "a-b-c_d");
    assert_eq!(export_file_name("", "2025/01/02  03:04"), "2025-01-02__03-04.md");
    assert_eq!(export_file_name("My Save?", ""), "My_Save.md");
}

#[test]
fn dashboard_hides_ap_until_toggled() {
    let state = sample_state();
    let rendered = render_dashboard(&state, &sample_meta());
    assert!(rendered.starts_with("115 CPA Online  ⏳ D-339\nRoy  Lv.12  2025/10/18  09:05\n"));
    assert!(rendered.contains("EXP  [▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮░░░] 86 / 100"));
    assert!(rendered.contains("HP   ["));
    assert!(!rendered.contains("AP   ["));
    assert!(rendered.contains("  Zhonghui: 1 / 3 sessions"));
    assert!(rendered.contains("  Essay:    4 / 5 questions"));

    let shown = CharacterState {
        show_ap: true,
        ..state
    };
    assert!(render_dashboard(&shown, &sample_meta()).contains("AP   [▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮▮] 100 / 100"));
}

#[test]
fn dashboard_flags_exhaustion() {
    let state = CharacterState {
        hp: 0,
        ..sample_state()
    };
    let rendered = render_dashboard(&state, &sample_meta().with_bar_width(10));
    assert!(rendered.contains("HP   [░░░░░░░░░░] 0 / 240"));
    assert!(rendered.contains("out of HP"));
}
