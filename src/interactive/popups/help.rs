use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::interactive::layout::centered_popup;

const BINDINGS: &[(&str, &str)] = &[
    ("h/l ←/→", "Focus lane"),
    ("j/k ↓/↑", "Select card"),
    ("Space", "Grab card / drop on focused lane"),
    ("Enter", "Drop grabbed card"),
    ("Esc", "Put grabbed card back"),
    ("< / >", "Move card one lane left / right"),
    ("1 2 3", "Move card to To Do / In Progress / Done"),
    ("e", "Edit description in $EDITOR"),
    ("d", "Delete card"),
    ("r", "Reload issues"),
    ("c", "Dismiss error banner"),
    ("?", "This help"),
    ("q", "Quit"),
];

/// Draw the keyboard shortcuts overlay.
pub fn draw(frame: &mut Frame, area: Rect) {
    let width: u16 = 56;
    let height: u16 = BINDINGS.len() as u16 + 4;
    let popup_area = centered_popup(width, height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Keyboard Shortcuts ")
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(Color::White);

    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("{:<10}", key), key_style),
                Span::styled(*desc, desc_style),
            ])
        })
        .collect();

    let content_area = Rect::new(
        inner.x + 1,
        inner.y,
        inner.width.saturating_sub(2),
        inner.height.saturating_sub(1),
    );
    frame.render_widget(Paragraph::new(lines), content_area);

    let footer_area = Rect::new(
        inner.x + 1,
        inner.y + inner.height.saturating_sub(1),
        inner.width.saturating_sub(2),
        1,
    );
    let footer = Paragraph::new(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(footer, footer_area);
}
