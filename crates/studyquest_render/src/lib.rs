pub mod bar;
pub mod clock;
mod dashboard;
mod snapshot;

pub use bar::{
    DEFAULT_BAR_WIDTH, EMPTY_GLYPH, FILLED_GLYPH, MAX_BAR_WIDTH, filled_cells, render_bar,
};
pub use clock::{
    DEFAULT_UTC_OFFSET, countdown_label, format_timestamp, local_date, parse_utc_offset,
};
pub use dashboard::render_dashboard;
pub use snapshot::{
    ApGauge, Gauge, SnapshotExport, SnapshotMeta, SnapshotPayload, export_file_name,
    extract_payload, render_payload_json, sanitize_file_component, serialize_snapshot,
};
