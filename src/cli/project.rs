//! Project command implementations

use colored::Colorize;

use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::client::WorkspaceApi;
use crate::client::models::Project;
use crate::error::{ApiError, Result};
use crate::output::json::format_json;
use crate::output::print_list;
use crate::output::rows::ProjectRow;

/// Find a project by ID or by case-insensitive name.
pub async fn resolve_project(
    ctx: &CommandContext,
    workspace_id: i64,
    id_or_name: &str,
) -> Result<Project> {
    if let Ok(id) = id_or_name.parse::<i64>() {
        return ctx.client.get_project(workspace_id, id).await;
    }

    let projects = ctx.client.get_projects(workspace_id).await?;
    find_by_name(projects, id_or_name)
        .ok_or_else(|| ApiError::NotFound(format!("project '{}'", id_or_name)).into())
}

fn find_by_name(projects: Vec<Project>, name: &str) -> Option<Project> {
    let mut matches = projects
        .into_iter()
        .filter(|p| p.name.eq_ignore_ascii_case(name));
    // Prefer an active project over an archived one with the same name
    let first = matches.next()?;
    if first.is_active() {
        return Some(first);
    }
    Some(matches.find(Project::is_active).unwrap_or(first))
}

pub async fn list(opts: &GlobalOptions, all: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let workspace_id = ctx.workspace_id().await?;

    let mut projects = ctx.client.get_projects(workspace_id).await?;
    if !all {
        projects.retain(Project::is_active);
    }
    projects.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    print_list::<Project, ProjectRow>(&projects, ctx.format)
}

pub async fn create(opts: &GlobalOptions, name: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let workspace_id = ctx.workspace_id().await?;

    let project = ctx.client.create_project(workspace_id, name).await?;
    match ctx.format {
        OutputFormat::Table => println!(
            "{} Created project {} ({})",
            "✓".green(),
            project.name.bold(),
            project.id
        ),
        OutputFormat::Json => println!("{}", format_json(&project)?),
    }
    Ok(())
}
