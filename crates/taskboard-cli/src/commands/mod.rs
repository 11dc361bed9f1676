pub mod board;
pub mod export;
pub mod init;
pub mod list;
pub mod meeting;
pub mod reorder;
pub mod task;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::env;
use std::str::FromStr;
use taskboard_core::model::{Priority, Status, Task};
use taskboard_core::view::{SortDirection, TaskField, TaskSortKey, TaskViewConfig, ALL};
use taskboard_store::Repository;

use crate::FilterArgs;

/// Acting user recorded as `assignedBy` / `submittedBy`.
pub const USER_ENV: &str = "TASKBOARD_USER";

pub fn open_repo() -> Result<Repository> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    Repository::discover(&cwd).context("not a taskboard directory (run `taskboard init`)")
}

pub fn acting_user() -> String {
    env::var(USER_ENV)
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| "anonymous".to_string())
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}' (expected YYYY-MM-DD)", raw))
}

pub fn direction(desc: bool) -> SortDirection {
    if desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    }
}

/// Filter values are compared against labels ("High", "In Progress"), so
/// accept any spelling the parsers accept and store the label.
fn filter_value<T: FromStr>(raw: &str, label: impl Fn(T) -> &'static str) -> Result<String>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if raw.eq_ignore_ascii_case(ALL) {
        return Ok(ALL.to_string());
    }
    Ok(label(raw.parse::<T>()?).to_string())
}

/// Task view configuration from command-line filters. Pagination is left at
/// its defaults.
pub fn task_view(filter: &FilterArgs) -> Result<TaskViewConfig> {
    let mut config = TaskViewConfig::default();
    if let Some(search) = &filter.search {
        config = config.with_search(search.as_str());
    }
    if let Some(priority) = &filter.priority {
        config = config.with_filter(
            TaskField::Priority,
            filter_value::<Priority>(priority, |p| p.label())?,
        );
    }
    if let Some(status) = &filter.status {
        config = config.with_filter(
            TaskField::Status,
            filter_value::<Status>(status, |s| s.label())?,
        );
    }
    if let Some(name) = &filter.assigned_to {
        config = config.with_filter(TaskField::AssignedTo, name.as_str());
    }
    if let Some(project) = &filter.project {
        config = config.with_filter(TaskField::Project, project.as_str());
    }
    if let (Some(from), Some(to)) = (&filter.from, &filter.to) {
        config = config.with_date_range(parse_date(from)?, parse_date(to)?);
    }
    if let Some(sort) = &filter.sort {
        config = config.with_sort(sort.parse::<TaskSortKey>()?, direction(filter.desc));
    }
    Ok(config)
}

/// The project a filter narrows to, unless it is absent or `all`.
pub fn project_scope(filter: &FilterArgs) -> Option<String> {
    filter
        .project
        .clone()
        .filter(|p| !p.eq_ignore_ascii_case(ALL))
}

pub fn print_task_row(task: &Task) {
    println!(
        "{:<8}  {:<11}  {:<6}  {:<10}  {:<14}  {}",
        task.task_id.short(),
        task.status.label(),
        task.priority.label(),
        task.deadline
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".into()),
        task.member_name().unwrap_or("-"),
        task.title,
    );
}
