use anyhow::{Context, Result};
use taskboard_core::report::assigned_members;
use taskboard_core::view::{derive, visible_pages, PAGER_WINDOW};

use super::{open_repo, print_task_row, project_scope, task_view};
use crate::ListArgs;

pub fn run(args: ListArgs, json: bool) -> Result<()> {
    let repo = open_repo()?;
    let tasks = repo
        .project_tasks(project_scope(&args.filter).as_deref())
        .context("failed to load tasks")?;

    let page_size = args.page_size.unwrap_or(repo.config.page_size);
    let config = task_view(&args.filter)?.with_page(args.page, page_size);
    let page = derive(&tasks, &config)?;

    if json {
        let output = serde_json::json!({
            "view": config,
            "page": page,
            "assignedMembers": assigned_members(&tasks),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if page.total_count == 0 {
        println!("No tasks match");
        return Ok(());
    }

    println!(
        "{:<8}  {:<11}  {:<6}  {:<10}  {:<14}  {}",
        "ID", "STATUS", "PRIO", "DEADLINE", "ASSIGNEE", "TITLE"
    );
    for task in &page.items {
        print_task_row(task);
    }
    println!();

    let pager: Vec<String> = visible_pages(page.page, page.total_pages, PAGER_WINDOW)
        .into_iter()
        .map(|n| if n == page.page { format!("[{}]", n) } else { n.to_string() })
        .collect();
    println!(
        "Page {} of {} ({} tasks)  {}",
        page.page,
        page.total_pages,
        page.total_count,
        pager.join(" ")
    );
    Ok(())
}
