pub mod confirm;
pub mod help;

use ratatui::{layout::Rect, Frame};

use crate::interactive::app::{AppMode, BoardApp};

/// Draw the active popup, if any. Draws on top of everything.
pub fn draw_popup(frame: &mut Frame, area: Rect, app: &BoardApp) {
    match app.mode {
        AppMode::ConfirmDelete(issue_id) => confirm::draw(frame, area, app, issue_id),
        AppMode::Help => help::draw(frame, area),
        AppMode::Normal | AppMode::Grabbing => {}
    }
}
