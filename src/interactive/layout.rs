use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Top-level layout regions
pub struct AppLayout {
    pub header: Rect,
    pub banner: Rect,
    pub lanes: [Rect; 3],
    pub notifications: Rect,
    pub footer: Rect,
}

/// Calculate the top-level layout. The banner row only takes space while the
/// store has an error to show.
pub fn app_layout(area: Rect, has_error: bool, notification_count: usize) -> AppLayout {
    let banner_height = if has_error { 3 } else { 0 };
    let notif_height = if notification_count > 0 {
        (notification_count as u16).min(3) + 2
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(6),
            Constraint::Length(notif_height),
            Constraint::Length(1),
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[2]);

    AppLayout {
        header: chunks[0],
        banner: chunks[1],
        lanes: [columns[0], columns[1], columns[2]],
        notifications: chunks[3],
        footer: chunks[4],
    }
}

/// Center a popup of given width/height in the area
pub fn centered_popup(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_collapses_without_error() {
        let layout = app_layout(Rect::new(0, 0, 90, 30), false, 0);
        assert_eq!(layout.banner.height, 0);
        assert_eq!(layout.notifications.height, 0);
        assert_eq!(layout.lanes[0].width + layout.lanes[1].width + layout.lanes[2].width, 90);
    }

    #[test]
    fn test_banner_and_notifications_take_rows() {
        let layout = app_layout(Rect::new(0, 0, 90, 30), true, 5);
        assert_eq!(layout.banner.height, 3);
        assert_eq!(layout.notifications.height, 5);
    }

    #[test]
    fn test_centered_popup_fits_small_area() {
        let popup = centered_popup(60, 20, Rect::new(0, 0, 40, 10));
        assert_eq!(popup, Rect::new(0, 0, 40, 10));
    }
}
