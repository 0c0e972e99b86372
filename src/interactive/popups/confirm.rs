use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::formatting::truncate;
use crate::interactive::app::BoardApp;
use crate::interactive::layout::centered_popup;
use crate::models::IssueId;

/// Asks before deleting the selected issue.
pub fn draw(frame: &mut Frame, area: Rect, app: &BoardApp, issue_id: IssueId) {
    let width: u16 = 48;
    let height: u16 = 6;
    let popup_area = centered_popup(width, height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Delete issue ")
        .border_style(Style::default().fg(Color::Red));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let title = app
        .store
        .issue(issue_id)
        .map(|issue| truncate(&issue.title, inner.width.saturating_sub(2) as usize))
        .unwrap_or_default();

    let message = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Delete #{}?", issue_id),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(title, Style::default().fg(Color::Gray))),
    ]);
    frame.render_widget(message, Rect::new(inner.x, inner.y, inner.width, 2));

    let options_area = Rect::new(
        inner.x,
        inner.y + inner.height.saturating_sub(1),
        inner.width,
        1,
    );
    let options_line = Line::from(vec![
        Span::styled("[", Style::default().fg(Color::DarkGray)),
        Span::styled("Y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::styled("]es  ", Style::default().fg(Color::DarkGray)),
        Span::styled("[", Style::default().fg(Color::DarkGray)),
        Span::styled("N", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::styled("]o", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(options_line), options_area);
}
