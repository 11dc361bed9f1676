use anyhow::{Context, Result};
use std::fs;
use taskboard_core::report::ReportRequest;
use taskboard_core::view::filter_and_sort;

use super::{open_repo, project_scope, task_view};
use crate::FilterArgs;

/// Write the whole filtered and sorted list, unpaginated, together with the
/// report request that reproduces it.
pub fn run(filter: FilterArgs, output: String) -> Result<()> {
    let repo = open_repo()?;
    let project = project_scope(&filter);
    let tasks = repo
        .project_tasks(project.as_deref())
        .context("failed to load tasks")?;

    let config = task_view(&filter)?;
    let rows = filter_and_sort(&tasks, &config);
    let count = rows.len();
    let request = ReportRequest::from_config(project, &config, &tasks);

    let report = serde_json::json!({
        "request": request,
        "generatedAt": chrono::Utc::now(),
        "totalCount": count,
        "tasks": rows,
    });
    fs::write(&output, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("failed to write {}", output))?;
    tracing::info!(path = %output, count, "report exported");

    println!("Exported {} tasks to {}", count, output);
    Ok(())
}
