use anyhow::{Context, Result};
use taskboard_core::id::TaskId;
use taskboard_core::model::Status;
use taskboard_core::reorder::DropTarget;

use super::board::print_board;
use super::open_repo;

/// `taskboard move`: exactly one of `target` (a card) or `to` (a column).
pub fn run(
    dragged: String,
    target: Option<String>,
    to: Option<String>,
    project: Option<String>,
    json: bool,
) -> Result<()> {
    let repo = open_repo()?;

    let drop_target = match (target, to) {
        (Some(id), _) => DropTarget::Task(TaskId::parse(&id)?),
        (None, Some(column)) => DropTarget::Group(column.parse::<Status>()?),
        (None, None) => anyhow::bail!("give a target task or --to <status>"),
    };

    let outcome = repo
        .apply_move(project.as_deref(), &dragged, &drop_target)
        .with_context(|| format!("failed to move task '{}'", dragged))?;

    if json {
        let output = serde_json::json!({
            "taskId": outcome.moved_task.task_id,
            "statusChanged": outcome.status_changed,
            "statusUpdate": outcome.status_update(),
            "board": outcome.index.groups(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if outcome.status_changed {
        println!(
            "Moved {} to {}",
            outcome.moved_task.task_id.short(),
            outcome.moved_task.status
        );
    } else {
        println!(
            "Reordered {} within {}",
            outcome.moved_task.task_id.short(),
            outcome.moved_task.status
        );
    }
    println!();
    print_board(&outcome.index);
    Ok(())
}
