use clap::ArgMatches;
use colored::*;

use super::{confirm, parse_arg, resolve_project_id};
use crate::cli_context::CliContext;
use crate::error::{KanbanError, KanbanResult};
use crate::formatting::{format_status_color, print_issues, print_single_issue, OutputFormat};
use crate::models::{Issue, IssueDraft, IssueId, IssuePriority, IssueStatus};
use crate::store::{IssueStore, Reconciliation};

pub async fn handle_issues(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_issues_impl(matches)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_issues_impl(matches: &ArgMatches) -> KanbanResult<()> {
    let mut context = CliContext::load()?;
    let client = context.authenticated_client()?;
    let mut store = IssueStore::new(client);

    let result = match matches.subcommand() {
        Some(("list", sub)) => list(&mut store, sub).await,
        Some(("show", sub)) => show(&mut store, sub).await,
        Some(("create", sub)) => create(&mut store, sub).await,
        Some(("update", sub)) => update(&mut store, sub).await,
        Some(("delete", sub)) => delete(&mut store, sub).await,
        Some(("move", sub)) => move_issue(&mut store, sub).await,
        _ => {
            println!("Usage: kanban issues <list|show|create|update|delete|move>");
            Ok(())
        }
    };

    if let Err(e) = &result {
        if !e.is_validation() {
            if let Some(message) = store.error() {
                println!("{} {}", "❌".red(), message);
            }
        }
    }
    result
}

fn issue_id(matches: &ArgMatches) -> KanbanResult<IssueId> {
    matches
        .get_one::<IssueId>("id")
        .copied()
        .ok_or_else(|| KanbanError::InvalidInput("Issue ID is required".to_string()))
}

async fn list(store: &mut IssueStore, matches: &ArgMatches) -> KanbanResult<()> {
    let project_id = resolve_project_id(matches)?;
    let format = parse_arg::<OutputFormat>(matches, "format")?.unwrap_or(OutputFormat::Simple);
    let status = parse_arg::<IssueStatus>(matches, "status")?;

    store.fetch_issues(project_id).await?;

    let issues: Vec<Issue> = store
        .issues()
        .iter()
        .filter(|issue| status.map_or(true, |s| issue.status == s))
        .cloned()
        .collect();

    if format != OutputFormat::Json && !issues.is_empty() {
        println!("Found {} issues:", issues.len());
    }
    print_issues(&issues, format)
}

async fn show(store: &mut IssueStore, matches: &ArgMatches) -> KanbanResult<()> {
    let issue = store.get_issue(issue_id(matches)?).await?;
    print_single_issue(&issue);
    Ok(())
}

async fn create(store: &mut IssueStore, matches: &ArgMatches) -> KanbanResult<()> {
    let project_id = resolve_project_id(matches)?;
    let title = matches
        .get_one::<String>("title")
        .ok_or_else(|| KanbanError::InvalidInput("Title is required".to_string()))?;

    let mut draft = IssueDraft::new(project_id, title.as_str());
    if let Some(description) = matches.get_one::<String>("description") {
        draft = draft.with_description(description.as_str());
    }
    if let Some(status) = parse_arg::<IssueStatus>(matches, "status")? {
        draft = draft.with_status(status);
    }
    if let Some(priority) = parse_arg::<IssuePriority>(matches, "priority")? {
        draft = draft.with_priority(priority);
    }
    if let Some(assignee_id) = matches.get_one::<u64>("assignee") {
        draft = draft.with_assignee(*assignee_id);
    }

    let issue = store.create_issue(draft).await?;
    println!(
        "{} Created issue {} {}",
        "✅".green(),
        format!("#{}", issue.id).blue(),
        issue.title.bold()
    );
    Ok(())
}

async fn update(store: &mut IssueStore, matches: &ArgMatches) -> KanbanResult<()> {
    let id = issue_id(matches)?;
    let title = matches.get_one::<String>("title");
    let description = matches.get_one::<String>("description");
    let status = parse_arg::<IssueStatus>(matches, "status")?;
    let priority = parse_arg::<IssuePriority>(matches, "priority")?;
    let assignee_id = matches.get_one::<u64>("assignee");

    if title.is_none()
        && description.is_none()
        && status.is_none()
        && priority.is_none()
        && assignee_id.is_none()
    {
        return Err(KanbanError::InvalidInput(
            "Nothing to update. Pass at least one of --title, --description, --status, --priority, --assignee"
                .to_string(),
        ));
    }

    // updates send every field, so start from the server's copy
    let current = store.get_issue(id).await?;
    let mut draft = IssueDraft::from(&current);
    if let Some(title) = title {
        draft.title = title.clone();
    }
    if let Some(description) = description {
        draft.description = Some(description.clone());
    }
    if let Some(status) = status {
        draft.status = status;
    }
    if let Some(priority) = priority {
        draft.priority = priority;
    }
    if let Some(assignee_id) = assignee_id {
        draft.assignee_id = Some(*assignee_id);
    }

    let issue = store.update_issue(id, draft).await?;
    println!(
        "{} Updated issue {} {}",
        "✅".green(),
        format!("#{}", issue.id).blue(),
        issue.title.bold()
    );
    Ok(())
}

async fn delete(store: &mut IssueStore, matches: &ArgMatches) -> KanbanResult<()> {
    let id = issue_id(matches)?;
    let issue = store.get_issue(id).await?;

    if !confirm(&format!("Delete issue #{} '{}'?", issue.id, issue.title), matches)? {
        println!("{}", "Cancelled.".dimmed());
        return Ok(());
    }

    store.delete_issue(id).await?;
    println!("{} Deleted issue {}", "✅".green(), format!("#{}", id).blue());
    Ok(())
}

/// Moves through the same optimistic path as the board, then waits for the
/// server so the exit status reflects what was persisted.
async fn move_issue(store: &mut IssueStore, matches: &ArgMatches) -> KanbanResult<()> {
    let id = issue_id(matches)?;
    let target = parse_arg::<IssueStatus>(matches, "status")?
        .ok_or_else(|| KanbanError::InvalidInput("Target status is required".to_string()))?;

    let issue = store.get_issue(id).await?;
    store.fetch_issues(issue.project_id).await?;

    let ticket = store.move_issue(id, target)?;
    println!(
        "{} {} → {}",
        format!("#{}", id).blue(),
        format_status_color(ticket.previous_status),
        format_status_color(ticket.status)
    );

    for reconciliation in store.settle().await {
        match reconciliation {
            Reconciliation::Confirmed { status, .. } => {
                println!("{} Moved to {}", "✅".green(), format_status_color(status));
            }
            Reconciliation::RolledBack { restored, error, .. } => {
                return Err(KanbanError::StateError(format!(
                    "move rolled back to '{}': {}",
                    restored, error
                )));
            }
            Reconciliation::Superseded { .. } | Reconciliation::Stale { .. } => {}
        }
    }
    Ok(())
}
