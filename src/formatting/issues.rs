use std::str::FromStr;

use colored::*;

use super::utils::*;
use crate::board::partition;
use crate::error::{KanbanError, KanbanResult};
use crate::models::{Issue, IssueStatus};

const BOARD_COLUMN_WIDTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Table,
    Json,
    Board,
}

impl FromStr for OutputFormat {
    type Err = KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(OutputFormat::Simple),
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "board" => Ok(OutputFormat::Board),
            other => Err(KanbanError::InvalidInput(format!("unknown format '{}'", other))),
        }
    }
}

pub fn format_status_color(status: IssueStatus) -> ColoredString {
    match status {
        IssueStatus::ToDo => status.as_str().normal(),
        IssueStatus::InProgress => status.as_str().yellow(),
        IssueStatus::Done => status.as_str().green(),
    }
}

pub fn get_status_icon(status: IssueStatus) -> &'static str {
    match status {
        IssueStatus::ToDo => "○",
        IssueStatus::InProgress => "◐",
        IssueStatus::Done => "✓",
    }
}

fn format_assignee(assignee_id: Option<u64>) -> ColoredString {
    match assignee_id {
        Some(id) => format!("user #{}", id).green(),
        None => "Unassigned".dimmed(),
    }
}

pub fn print_issues(issues: &[Issue], format: OutputFormat) -> KanbanResult<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(issues)?);
        return Ok(());
    }

    if issues.is_empty() {
        println!("{}", "No issues found.".dimmed());
        return Ok(());
    }

    match format {
        OutputFormat::Table => {
            println!("{}", "─".repeat(96).dimmed());
            println!(
                "{:<8} {:<44} {:<12} {:<8} {:<16}",
                "ID".bold(),
                "Title".bold(),
                "Status".bold(),
                "Priority".bold(),
                "Assignee".bold()
            );
            println!("{}", "─".repeat(96).dimmed());

            for issue in issues {
                println!(
                    "{:<8} {:<44} {:<12} {:<8} {:<16}",
                    format!("#{}", issue.id).blue(),
                    truncate(&issue.title, 44),
                    format_status_color(issue.status),
                    format_priority(issue.priority),
                    format_assignee(issue.assignee_id)
                );
            }
            println!("{}", "─".repeat(96).dimmed());
        }
        OutputFormat::Board => print_board(issues),
        _ => {
            for lane in partition(issues) {
                if lane.is_empty() {
                    continue;
                }
                println!(
                    "\n{} {} ({})",
                    get_status_icon(lane.status),
                    lane.status.as_str().bold(),
                    lane.len()
                );
                println!("{}", "─".repeat(50).dimmed());

                for issue in &lane.issues {
                    let desc_preview = issue
                        .description
                        .as_deref()
                        .map(clean_description)
                        .filter(|cleaned| !cleaned.is_empty())
                        .map(|cleaned| format!("\n    {}", cleaned.dimmed()))
                        .unwrap_or_default();

                    println!(
                        "{} {} - {} ({}){}",
                        format_priority_indicator(issue.priority),
                        format!("#{}", issue.id).blue(),
                        issue.title,
                        format_assignee(issue.assignee_id),
                        desc_preview
                    );
                }
            }
        }
    }
    Ok(())
}

/// Three lanes side by side, one card per row.
pub fn print_board(issues: &[Issue]) {
    let lanes = partition(issues);
    let separator = "─".repeat(BOARD_COLUMN_WIDTH);

    let headers: Vec<String> = lanes
        .iter()
        .map(|lane| {
            let title = format!("{} {} ({})", get_status_icon(lane.status), lane.status, lane.len());
            fit(&title, BOARD_COLUMN_WIDTH).bold().to_string()
        })
        .collect();
    println!("{}", headers.join(" │ "));
    println!("{}", [separator.as_str(); 3].join("─┼─").dimmed());

    let rows = lanes.iter().map(|lane| lane.len()).max().unwrap_or(0);
    for row in 0..rows {
        let cells: Vec<String> = lanes
            .iter()
            .map(|lane| match lane.get(row) {
                Some(issue) => {
                    let text = fit(&format!("#{} {}", issue.id, issue.title), BOARD_COLUMN_WIDTH);
                    match lane.status {
                        IssueStatus::Done => text.dimmed().to_string(),
                        _ => text,
                    }
                }
                None => " ".repeat(BOARD_COLUMN_WIDTH),
            })
            .collect();
        println!("{}", cells.join(" │ "));
    }
}

pub fn print_single_issue(issue: &Issue) {
    println!("\n{}", "═".repeat(80).blue());
    println!("{} {}", format!("#{}", issue.id).blue().bold(), issue.title.bold());
    println!("{}", "─".repeat(80).dimmed());

    println!(
        "{}: {} {} | {}: {} | {}: {} | {}: {}",
        "Status".dimmed(),
        get_status_icon(issue.status),
        format_status_color(issue.status),
        "Priority".dimmed(),
        format_priority(issue.priority),
        "Assignee".dimmed(),
        format_assignee(issue.assignee_id),
        "Project".dimmed(),
        issue.project_id.to_string().cyan()
    );

    if let Some(desc) = issue.description.as_deref().filter(|d| !d.trim().is_empty()) {
        println!("\n{}", "Description".bold().underline());
        println!("{}", "─".repeat(80).dimmed());
        println!("{}", desc);
    }

    println!("{}", "═".repeat(80).blue());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("board".parse::<OutputFormat>().unwrap(), OutputFormat::Board);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_status_icons_are_distinct() {
        let icons: Vec<&str> = IssueStatus::ALL.iter().map(|s| get_status_icon(*s)).collect();
        assert_eq!(icons, vec!["○", "◐", "✓"]);
    }
}
