//! Drag-and-drop moves on a [`BoardIndex`].
//!
//! A move never touches stored data. It returns the new index and, when the
//! task changed column, the status update the caller has to persist.

use serde::Serialize;

use crate::board::BoardIndex;
use crate::error::CoreError;
use crate::id::TaskId;
use crate::model::{Status, Task};

/// Where the dragged card was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// On top of another card.
    Task(TaskId),
    /// On a column's empty area.
    Group(Status),
}

/// Persistence instruction emitted by a cross-column move.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub task_id: TaskId,
    pub new_status: Status,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub index: BoardIndex,
    pub status_changed: bool,
    pub moved_task: Task,
}

impl MoveOutcome {
    pub fn status_update(&self) -> Option<StatusUpdate> {
        self.status_changed.then(|| StatusUpdate {
            task_id: self.moved_task.task_id.clone(),
            new_status: self.moved_task.status,
        })
    }
}

/// Move `dragged` onto `target`.
///
/// Cross-column moves set the task's status to the destination column and put
/// it at the head of that column, wherever it was released. Same-column moves
/// put the task at the position the target card holds once the dragged card
/// has been taken out. Dropping a card on itself, or on its own column's empty
/// area, returns the index unchanged.
///
/// Fails with [`CoreError::NotFound`] when either end is not on the board.
pub fn move_task(
    index: &BoardIndex,
    dragged: &TaskId,
    target: &DropTarget,
) -> Result<MoveOutcome, CoreError> {
    let (source, source_pos) = index
        .locate(dragged)
        .ok_or_else(|| CoreError::NotFound(format!("dragged task {}", dragged)))?;

    let dest = match target {
        DropTarget::Task(id) => index
            .locate(id)
            .map(|(status, _)| status)
            .ok_or_else(|| CoreError::NotFound(format!("drop target task {}", id)))?,
        DropTarget::Group(status) => index
            .group(*status)
            .map(|g| g.status)
            .ok_or_else(|| CoreError::NotFound(format!("drop target column {}", status)))?,
    };

    let is_noop = match target {
        DropTarget::Task(id) => id == dragged,
        DropTarget::Group(status) => *status == source,
    };
    if is_noop {
        let moved_task = index
            .get(dragged)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("dragged task {}", dragged)))?;
        return Ok(MoveOutcome {
            index: index.clone(),
            status_changed: false,
            moved_task,
        });
    }

    let mut next = index.clone();
    let mut moved = next
        .group_mut(source)
        .map(|g| g.tasks.remove(source_pos))
        .ok_or_else(|| CoreError::NotFound(format!("column {}", source)))?;

    let dest_group = next
        .group_mut(dest)
        .ok_or_else(|| CoreError::NotFound(format!("column {}", dest)))?;

    let status_changed = source != dest;
    if status_changed {
        moved.status = dest;
        dest_group.tasks.insert(0, moved.clone());
    } else {
        let at = match target {
            DropTarget::Task(target_id) => dest_group
                .tasks
                .iter()
                .position(|t| &t.task_id == target_id)
                .ok_or_else(|| CoreError::NotFound(format!("drop target task {}", target_id)))?,
            DropTarget::Group(_) => dest_group.tasks.len(),
        };
        dest_group.tasks.insert(at, moved.clone());
    }

    Ok(MoveOutcome {
        index: next,
        status_changed,
        moved_task: moved,
    })
}
