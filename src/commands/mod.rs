pub mod auth;
pub mod board;
pub mod issues;
pub mod projects;

use clap::ArgMatches;
use dialoguer::Confirm;

use crate::config::load_config;
use crate::error::{ErrorContext, KanbanError, KanbanResult};
use crate::models::ProjectId;

/// Asks before a destructive action unless `--yes` was passed.
pub(crate) fn confirm(prompt: &str, matches: &ArgMatches) -> KanbanResult<bool> {
    if matches.get_flag("yes") {
        return Ok(true);
    }

    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

/// `--project`, falling back to the configured default project.
pub(crate) fn resolve_project_id(matches: &ArgMatches) -> KanbanResult<ProjectId> {
    if let Some(project_id) = matches.get_one::<ProjectId>("project") {
        return Ok(*project_id);
    }

    load_config().default_project_id.ok_or_else(|| {
        KanbanError::InvalidInput(
            "No project given. Pass --project <ID> or run 'kanban auth config --default-project <ID>'"
                .to_string(),
        )
    })
}

pub(crate) fn parse_arg<T>(matches: &ArgMatches, name: &str) -> KanbanResult<Option<T>>
where
    T: std::str::FromStr<Err = KanbanError>,
{
    matches
        .get_one::<String>(name)
        .map(|value| value.parse())
        .transpose()
}
