use std::fmt::Write as _;

use studyquest_core::core_api::{AP_MAX, CharacterState, EXP_PER_LEVEL};
use studyquest_core::quota::QuotaField;

use crate::bar::render_bar;
use crate::snapshot::SnapshotMeta;

const LABEL_WIDTH: usize = 5;

/// Status panel a host prints after every action. The AP gauge only shows
/// while it is toggled on.
pub fn render_dashboard(state: &CharacterState, meta: &SnapshotMeta) -> String {
    let width = meta.bar_width;
    let mut out = String::new();

    writeln!(&mut out, "{}", meta.display_title()).expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "{}  Lv.{}  {}",
        meta.player, state.level, meta.timestamp
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    write_gauge(
        &mut out,
        "EXP",
        state.exp,
        EXP_PER_LEVEL,
        render_bar(i64::from(state.exp), i64::from(EXP_PER_LEVEL), width),
    );
    write_gauge(
        &mut out,
        "HP",
        state.hp,
        state.max_hp,
        render_bar(i64::from(state.hp), i64::from(state.max_hp), width),
    );
    if state.show_ap {
        write_gauge(
            &mut out,
            "AP",
            state.ap,
            AP_MAX,
            render_bar(i64::from(state.ap), i64::from(AP_MAX), width),
        );
    }
    if state.is_exhausted() {
        writeln!(&mut out, "  (out of HP, time for a full heal)")
            .expect("writing to String cannot fail");
    }
    writeln!(&mut out).expect("writing to String cannot fail");

    writeln!(
        &mut out,
        "Today  MCQ {}  Boss {}",
        state.today.mcq, state.today.boss
    )
    .expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "Total  MCQ {}  Boss {}",
        state.total.mcq, state.total.boss
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    writeln!(&mut out, "Weekly Mission").expect("writing to String cannot fail");
    for field in QuotaField::ALL {
        let (done, target, unit) = match field {
            QuotaField::Zhonghui => (
                state.weekly.zhonghui_done,
                state.weekly.zhonghui_target,
                "sessions",
            ),
            QuotaField::Essay => (
                state.weekly.essay_done,
                state.weekly.essay_target,
                "questions",
            ),
        };
        let label = format!("{}:", field.label());
        writeln!(&mut out, "  {label:<10}{done} / {target} {unit}")
            .expect("writing to String cannot fail");
    }

    out
}

fn write_gauge(out: &mut String, label: &str, current: u32, max: u32, bar: String) {
    writeln!(
        out,
        "{label:<width$}[{bar}] {current} / {max}",
        width = LABEL_WIDTH
    )
    .expect("writing to String cannot fail");
}
