//! SEPA view: the trend-template candidate table.

use ratatui::layout::Rect;
use ratatui::Frame;

use rankboard_core::Board;

use crate::app::AppState;
use crate::ui::tables;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, board: &Board) {
    tables::render_sepa_table(f, area, &board.sepa_candidates, app.scroll);
}
