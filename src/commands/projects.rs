use clap::ArgMatches;
use colored::*;

use super::confirm;
use crate::cli_context::CliContext;
use crate::error::{KanbanError, KanbanResult};
use crate::formatting::{print_projects, print_single_project};
use crate::models::{ProjectDraft, ProjectId};
use crate::store::ProjectStore;

pub async fn handle_projects(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_projects_impl(matches)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_projects_impl(matches: &ArgMatches) -> KanbanResult<()> {
    let mut context = CliContext::load()?;
    let client = context.authenticated_client()?;
    let mut store = ProjectStore::new(client);

    let result = match matches.subcommand() {
        Some(("show", sub)) => show(&mut store, sub).await,
        Some(("create", sub)) => create(&mut store, sub).await,
        Some(("update", sub)) => update(&mut store, sub).await,
        Some(("delete", sub)) => delete(&mut store, sub).await,
        Some(("list", sub)) => list(&mut store, sub.get_flag("json")).await,
        _ => list(&mut store, false).await,
    };

    if result.is_err() {
        if let Some(message) = store.error() {
            println!("{} {}", "❌".red(), message);
        }
    }
    result
}

fn project_id(matches: &ArgMatches) -> KanbanResult<ProjectId> {
    matches
        .get_one::<ProjectId>("id")
        .copied()
        .ok_or_else(|| KanbanError::InvalidInput("Project ID is required".to_string()))
}

async fn list(store: &mut ProjectStore, json: bool) -> KanbanResult<()> {
    store.fetch_projects().await?;
    if !json && !store.projects().is_empty() {
        println!("Found {} projects:", store.projects().len());
    }
    print_projects(store.projects(), json)
}

async fn show(store: &mut ProjectStore, matches: &ArgMatches) -> KanbanResult<()> {
    let project = store.fetch_project(project_id(matches)?).await?;
    print_single_project(&project);
    Ok(())
}

async fn create(store: &mut ProjectStore, matches: &ArgMatches) -> KanbanResult<()> {
    let name = matches
        .get_one::<String>("name")
        .ok_or_else(|| KanbanError::InvalidInput("Project name is required".to_string()))?;
    let mut draft = ProjectDraft::new(name.as_str());
    if let Some(description) = matches.get_one::<String>("description") {
        draft = draft.with_description(description.as_str());
    }

    let project = store.create_project(draft).await?;
    println!(
        "{} Created project {} {}",
        "✅".green(),
        project.id.to_string().blue(),
        project.name.bold()
    );
    Ok(())
}

async fn update(store: &mut ProjectStore, matches: &ArgMatches) -> KanbanResult<()> {
    let id = project_id(matches)?;
    let name = matches.get_one::<String>("name");
    let description = matches.get_one::<String>("description");
    if name.is_none() && description.is_none() {
        return Err(KanbanError::InvalidInput(
            "Nothing to update. Pass --name and/or --description".to_string(),
        ));
    }

    // full update: start from the server's copy
    let current = store.fetch_project(id).await?;
    let mut draft = ProjectDraft::from(&current);
    if let Some(name) = name {
        draft.name = name.clone();
    }
    if let Some(description) = description {
        draft.description = Some(description.clone());
    }

    let project = store.update_project(id, draft).await?;
    println!("{} Updated project {}", "✅".green(), project.name.bold());
    Ok(())
}

async fn delete(store: &mut ProjectStore, matches: &ArgMatches) -> KanbanResult<()> {
    let id = project_id(matches)?;
    let project = store.fetch_project(id).await?;

    let prompt = format!("Delete project '{}' and all of its issues?", project.name);
    if !confirm(&prompt, matches)? {
        println!("{}", "Cancelled.".dimmed());
        return Ok(());
    }

    store.delete_project(id).await?;
    println!("{} Deleted project {}", "✅".green(), project.name.bold());
    Ok(())
}
