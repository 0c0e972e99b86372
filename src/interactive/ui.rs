use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::app::{AppMode, BoardApp};
use super::layout::app_layout;
use super::{notifications, popups};
use crate::board::Lane;
use crate::formatting::truncate;
use crate::models::{Issue, IssuePriority, IssueStatus};

pub fn draw(frame: &mut Frame, app: &BoardApp) {
    let notification_count = app.active_notifications().count();
    let layout = app_layout(frame.size(), app.store.error().is_some(), notification_count);

    draw_header(frame, layout.header, app);
    if let Some(error) = app.store.error() {
        draw_error_banner(frame, layout.banner, error);
    }

    let lanes = app.store.lanes();
    for (index, lane) in lanes.iter().enumerate() {
        draw_lane(frame, layout.lanes[index], app, index, lane);
    }

    if notification_count > 0 {
        notifications::draw(frame, layout.notifications, app);
    }
    draw_footer(frame, layout.footer, app);

    popups::draw_popup(frame, frame.size(), app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &BoardApp) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(30)])
        .split(area);

    let title = format!(
        " {} ",
        truncate(&app.project.name, header_chunks[0].width.saturating_sub(4) as usize)
    );
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(header, header_chunks[0]);

    let info = if app.store.is_loading() {
        " Loading... ".to_string()
    } else if app.store.has_pending_moves() {
        format!(" Issues: {} | saving ⟳ ", app.store.issues().len())
    } else {
        format!(" Issues: {} ", app.store.issues().len())
    };
    let info_widget = Paragraph::new(info)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(info_widget, header_chunks[1]);
}

fn draw_error_banner(frame: &mut Frame, area: Rect, error: &str) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(" ✗ ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::styled(error.to_string(), Style::default().fg(Color::Red)),
        Span::styled("  (c to dismiss)", Style::default().fg(Color::DarkGray)),
    ]))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)));
    frame.render_widget(banner, area);
}

fn lane_color(status: IssueStatus) -> Color {
    match status {
        IssueStatus::ToDo => Color::White,
        IssueStatus::InProgress => Color::Yellow,
        IssueStatus::Done => Color::Green,
    }
}

fn priority_marker(priority: IssuePriority) -> Span<'static> {
    match priority {
        IssuePriority::High => Span::styled("! ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        IssuePriority::Medium => Span::styled("! ", Style::default().fg(Color::Yellow)),
        IssuePriority::Low => Span::raw("  "),
    }
}

fn card_item<'a>(issue: &Issue, width: usize, grabbed: bool) -> ListItem<'a> {
    let id = format!("#{} ", issue.id);
    let title_width = width.saturating_sub(id.len() + 4);
    let mut spans = vec![
        priority_marker(issue.priority),
        Span::styled(id, Style::default().fg(Color::Blue)),
        Span::raw(truncate(&issue.title, title_width)),
    ];
    if grabbed {
        spans.push(Span::styled(" ⇅", Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)));
    }
    ListItem::new(Line::from(spans))
}

fn draw_lane(frame: &mut Frame, area: Rect, app: &BoardApp, index: usize, lane: &Lane<'_>) {
    let focused = app.lane == index;
    let dropping = focused && app.mode == AppMode::Grabbing;

    let border_style = if dropping {
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
    } else if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut title = vec![Span::styled(
        format!(" {} ({}) ", lane.status, lane.len()),
        Style::default().fg(lane_color(lane.status)).add_modifier(Modifier::BOLD),
    )];
    if dropping {
        title.push(Span::styled("drop here ", Style::default().fg(Color::Magenta)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(title))
        .border_style(border_style);

    let grabbed_id = app.grabbed.map(|payload| payload.issue_id);
    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = lane
        .issues
        .iter()
        .map(|issue| card_item(issue, width, grabbed_id == Some(issue.id)))
        .collect();

    if items.is_empty() {
        let empty = Paragraph::new(Span::styled(" No issues", Style::default().fg(Color::DarkGray))).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(if focused {
            Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        })
        .highlight_symbol(if focused { "▶" } else { " " });

    let mut state = ListState::default();
    state.select(Some(app.cursors[index]));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &BoardApp) {
    let hints = match app.mode {
        AppMode::Grabbing => " h/l choose lane · space/enter drop · esc put back",
        AppMode::ConfirmDelete(_) => " y confirm · any other key cancels",
        AppMode::Help => " any key closes help",
        AppMode::Normal => " h/l lane · j/k card · space grab · </> move · e edit · d delete · r reload · ? help · q quit",
    };
    let footer = Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray)));
    frame.render_widget(footer, area);
}
