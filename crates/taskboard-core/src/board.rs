//! Grouping index: the kanban projection of a flat task list.

use serde::Serialize;

use crate::id::TaskId;
use crate::model::{Status, Task};

/// One board column: every task sharing `status`, in display order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Group {
    pub status: Status,
    pub tasks: Vec<Task>,
}

/// Ordered mapping from status to the ordered tasks in that status.
///
/// Column order is the order of the `statuses` passed to [`build`].
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct BoardIndex {
    groups: Vec<Group>,
}

impl BoardIndex {
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn statuses(&self) -> impl Iterator<Item = Status> + '_ {
        self.groups.iter().map(|g| g.status)
    }

    pub fn group(&self, status: Status) -> Option<&Group> {
        self.groups.iter().find(|g| g.status == status)
    }

    pub(crate) fn group_mut(&mut self, status: Status) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.status == status)
    }

    /// Ids of one column, in order. Empty if the status is not on the board.
    pub fn ids(&self, status: Status) -> Vec<&TaskId> {
        self.group(status)
            .map(|g| g.tasks.iter().map(|t| &t.task_id).collect())
            .unwrap_or_default()
    }

    /// Column and position currently holding `id`.
    pub fn locate(&self, id: &TaskId) -> Option<(Status, usize)> {
        self.groups.iter().find_map(|g| {
            g.tasks
                .iter()
                .position(|t| &t.task_id == id)
                .map(|pos| (g.status, pos))
        })
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.groups
            .iter()
            .flat_map(|g| g.tasks.iter())
            .find(|t| &t.task_id == id)
    }

    /// Total number of tasks across all columns.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.tasks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `tasks` into one group per entry of `statuses`.
///
/// Relative order of same-status tasks is preserved. A task whose status is
/// not listed is left out of every group. Repeated statuses collapse to their
/// first occurrence.
pub fn build(tasks: &[Task], statuses: &[Status]) -> BoardIndex {
    let mut groups: Vec<Group> = Vec::with_capacity(statuses.len());
    for &status in statuses {
        if groups.iter().all(|g| g.status != status) {
            groups.push(Group {
                status,
                tasks: Vec::new(),
            });
        }
    }

    for task in tasks {
        if let Some(group) = groups.iter_mut().find(|g| g.status == task.status) {
            group.tasks.push(task.clone());
        }
    }

    BoardIndex { groups }
}
