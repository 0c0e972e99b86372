use clap::ArgMatches;

use super::resolve_project_id;
use crate::cli_context::CliContext;
use crate::error::KanbanResult;
use crate::formatting::print_board;
use crate::interactive::run_board;
use crate::store::{IssueStore, ProjectStore};

pub async fn handle_board(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_board_impl(matches)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_board_impl(matches: &ArgMatches) -> KanbanResult<()> {
    let project_id = resolve_project_id(matches)?;
    let mut context = CliContext::load()?;
    let client = context.authenticated_client()?;

    if matches.get_flag("print") {
        let mut store = IssueStore::new(client);
        store.fetch_issues(project_id).await?;
        print_board(store.issues());
        return Ok(());
    }

    let mut projects = ProjectStore::new(client.clone());
    let project = projects.fetch_project(project_id).await?;
    run_board(client, project).await
}
