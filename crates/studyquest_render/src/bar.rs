pub const FILLED_GLYPH: char = '▮';
pub const EMPTY_GLYPH: char = '░';
pub const DEFAULT_BAR_WIDTH: usize = 20;
/// Widest bar a host should accept from user input.
pub const MAX_BAR_WIDTH: usize = 80;

/// Number of filled cells for `current / max` on a bar `width` cells wide.
///
/// A non-positive `max` renders as empty.
pub fn filled_cells(current: i64, max: i64, width: usize) -> usize {
    if max <= 0 || width == 0 {
        return 0;
    }
    let ratio = current as f64 / max as f64;
    let cells = (ratio * width as f64).round();
    cells.clamp(0.0, width as f64) as usize
}

pub fn render_bar(current: i64, max: i64, width: usize) -> String {
    let filled = filled_cells(current, max, width);
    let mut out = String::with_capacity(width * FILLED_GLYPH.len_utf8());
    out.extend(std::iter::repeat_n(FILLED_GLYPH, filled));
    out.extend(std::iter::repeat_n(EMPTY_GLYPH, width - filled));
    out
}
