use std::panic;
use std::process;

use kanban_cli::cli::build_cli;
use kanban_cli::commands::{
    auth::handle_auth, board::handle_board, issues::handle_issues, projects::handle_projects,
};
use kanban_cli::interactive::restore_terminal;
use kanban_cli::logging::{get_log_file_path, init_logging, log_info, log_panic_info};

#[tokio::main]
async fn main() {
    // logging is best-effort; the CLI works without a cache dir
    let _ = init_logging();

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        log_panic_info(info);
        if let Some(path) = get_log_file_path() {
            eprintln!("Details were written to {}", path.display());
        }
        default_hook(info);
    }));

    let matches = build_cli().get_matches();
    if let Some((name, _)) = matches.subcommand() {
        log_info(&format!("Running '{}'", name));
    }

    let result = match matches.subcommand() {
        Some(("auth", sub_matches)) => handle_auth(sub_matches).await,
        Some(("projects", sub_matches)) => handle_projects(sub_matches).await,
        Some(("issues", sub_matches)) => handle_issues(sub_matches).await,
        Some(("board", sub_matches)) => handle_board(sub_matches).await,
        _ => {
            eprintln!("Unknown command. Use 'kanban --help' for available commands.");
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
