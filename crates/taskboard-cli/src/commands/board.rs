use anyhow::{Context, Result};
use taskboard_core::board::BoardIndex;

use super::open_repo;

pub fn run(project: Option<String>, json: bool) -> Result<()> {
    let repo = open_repo()?;
    let index = repo
        .board(project.as_deref())
        .context("failed to load board")?;

    if json {
        println!("{}", serde_json::to_string_pretty(index.groups())?);
    } else {
        print_board(&index);
    }
    Ok(())
}

pub fn print_board(index: &BoardIndex) {
    for (n, group) in index.groups().iter().enumerate() {
        if n > 0 {
            println!();
        }
        println!("{} ({})", group.status, group.tasks.len());
        if group.tasks.is_empty() {
            println!("  (empty)");
        }
        for task in &group.tasks {
            println!("  {}  [{}] {}", task.task_id.short(), task.priority, task.title);
        }
    }
}
