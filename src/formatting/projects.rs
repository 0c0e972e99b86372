use colored::*;

use super::utils::truncate;
use crate::error::KanbanResult;
use crate::models::Project;

pub fn print_projects(projects: &[Project], json: bool) -> KanbanResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("{}", "No projects found.".dimmed());
        return Ok(());
    }

    println!("{}", "─".repeat(80).dimmed());
    println!("{:<8} {:<28} {:<44}", "ID".bold(), "Name".bold(), "Description".bold());
    println!("{}", "─".repeat(80).dimmed());
    for project in projects {
        let description = project.description.as_deref().unwrap_or("");
        println!(
            "{:<8} {:<28} {:<44}",
            project.id.to_string().blue(),
            truncate(&project.name, 28),
            truncate(description, 44).dimmed()
        );
    }
    println!("{}", "─".repeat(80).dimmed());
    Ok(())
}

pub fn print_single_project(project: &Project) {
    println!("\n{} {}", project.id.to_string().blue().bold(), project.name.bold());
    println!("{}", "─".repeat(60).dimmed());
    println!("{}: {}", "Owner".dimmed(), format!("user #{}", project.owner_id).green());
    match project.description.as_deref() {
        Some(description) if !description.trim().is_empty() => println!("\n{}", description),
        _ => println!("\n{}", "No description".dimmed()),
    }
}
