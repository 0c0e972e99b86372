use std::env;
use std::io;
use std::process::Command;
use std::sync::Arc;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::app::{Action, BoardApp};
use super::event::{Event, EventHandler};
use crate::client::ApiClient;
use crate::constants::TICK_RATE_MS;
use crate::error::KanbanResult;
use crate::logging::{log_debug, log_error, log_info};
use crate::models::Project;
use crate::store::IssueStore;

type BoardTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Leaves raw mode and the alternate screen. Safe to call more than once,
/// which the panic hook relies on.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

pub async fn run_board(client: Arc<ApiClient>, project: Project) -> KanbanResult<()> {
    log_info(&format!("Opening board for project {} ({})", project.id, project.name));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    log_debug("Terminal initialized");

    let mut app = BoardApp::new(project, IssueStore::new(client));
    let result = run_loop(&mut terminal, &mut app).await;

    restore_terminal();
    terminal.show_cursor()?;

    if app.store.has_pending_moves() {
        log_info("Waiting for unsaved moves before exit");
        for reconciliation in app.store.settle().await {
            log_debug(&format!("Settled on exit: {:?}", reconciliation));
        }
    }

    log_info("Board closed");
    result
}

async fn run_loop(terminal: &mut BoardTerminal, app: &mut BoardApp) -> KanbanResult<()> {
    terminal.draw(|f| super::ui::draw(f, app))?;
    app.refresh().await;
    let events = EventHandler::new(TICK_RATE_MS);

    while !app.should_quit {
        terminal.draw(|f| super::ui::draw(f, app))?;

        match events.recv()? {
            Event::Key(key_event) => {
                log_debug(&format!("Key pressed: {:?}, Mode: {:?}", key_event.code, app.mode));
                match app.handle_key(key_event.code) {
                    Action::None => {}
                    Action::Refresh => app.refresh().await,
                    Action::EditDescription(issue_id) => {
                        let current = app
                            .store
                            .issue(issue_id)
                            .and_then(|issue| issue.description.clone())
                            .unwrap_or_default();
                        let edited = launch_external_editor(terminal, &current)?;
                        app.apply_description(issue_id, edited).await;
                    }
                    Action::Delete(issue_id) => app.delete_issue(issue_id).await,
                }
            }
            Event::Resize => terminal.autoresize()?,
            Event::Tick => app.on_tick(),
        }
    }

    Ok(())
}

fn editor_command() -> String {
    env::var("EDITOR")
        .or_else(|_| env::var("VISUAL"))
        .unwrap_or_else(|_| {
            ["nano", "vim", "vi"]
                .into_iter()
                .find(|candidate| {
                    Command::new("which")
                        .arg(candidate)
                        .output()
                        .map(|o| o.status.success())
                        .unwrap_or(false)
                })
                .unwrap_or("vi")
                .to_string()
        })
}

/// Suspends the board, edits `content` in the user's editor and returns the
/// saved text, or `None` when the editor exits unsuccessfully.
fn launch_external_editor(terminal: &mut BoardTerminal, content: &str) -> KanbanResult<Option<String>> {
    let temp_file = tempfile::Builder::new()
        .prefix("kanban-issue-")
        .suffix(".md")
        .tempfile()?;
    std::fs::write(temp_file.path(), content)?;

    let editor = editor_command();

    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    terminal.show_cursor()?;

    log_debug(&format!("Launching editor: {}", editor));
    let status = Command::new(&editor).arg(temp_file.path()).status();

    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.hide_cursor()?;
    terminal.clear()?;

    match status {
        Ok(status) if status.success() => {
            let edited = std::fs::read_to_string(temp_file.path())?;
            Ok(Some(edited.trim_end().to_string()))
        }
        Ok(_) => Ok(None),
        Err(e) => {
            log_error(&format!("Failed to launch editor '{}': {}", editor, e));
            Ok(None)
        }
    }
}
