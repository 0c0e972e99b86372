use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::constants::NOTIFICATION_TTL_SECS;
use crate::interactive::app::{BoardApp, NotificationKind};

pub fn draw(frame: &mut Frame, area: Rect, app: &BoardApp) {
    if area.height == 0 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // newest first
    let lines: Vec<Line> = app
        .active_notifications()
        .rev()
        .take(3)
        .map(|n| {
            let (icon, color) = match n.kind {
                NotificationKind::Success => ("✓", Color::Green),
                NotificationKind::Error => ("✗", Color::Red),
                NotificationKind::Loading => ("⟳", Color::Yellow),
                NotificationKind::Info => ("ⓘ", Color::Blue),
            };
            let timer = match n.kind {
                NotificationKind::Success | NotificationKind::Info => {
                    let remaining = NOTIFICATION_TTL_SECS.saturating_sub(n.created_at.elapsed().as_secs());
                    format!("[{}s]", remaining)
                }
                _ => String::new(),
            };
            Line::from(vec![
                Span::styled(format!(" {} ", icon), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(n.message.clone(), Style::default().fg(color)),
                Span::styled(format!("  {}", timer), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
