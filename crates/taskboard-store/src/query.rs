//! Lookups over loaded snapshots.

use taskboard_core::id::MIN_PREFIX_LEN;
use taskboard_core::model::{Meeting, Task};

use crate::error::StoreError;

/// Tasks of one project, or every task when `project_id` is `None`.
pub fn tasks_for_project<'a>(tasks: &'a [Task], project_id: Option<&str>) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| project_id.map_or(true, |p| t.project_id == p))
        .collect()
}

pub fn meetings_for_project<'a>(
    meetings: &'a [Meeting],
    project_id: Option<&str>,
) -> Vec<&'a Meeting> {
    meetings
        .iter()
        .filter(|m| project_id.map_or(true, |p| m.project_id == p))
        .collect()
}

/// Find the position of a task by exact id, or by a unique prefix of at
/// least [`MIN_PREFIX_LEN`] chars.
pub fn resolve_task(tasks: &[Task], id_or_prefix: &str) -> Result<usize, StoreError> {
    resolve(tasks, id_or_prefix, |t| t.task_id.as_str())
        .map_err(|miss| miss.into_error(id_or_prefix, StoreError::TaskNotFound))
}

pub fn resolve_meeting(meetings: &[Meeting], id_or_prefix: &str) -> Result<usize, StoreError> {
    resolve(meetings, id_or_prefix, |m| m.meeting_id.as_str())
        .map_err(|miss| miss.into_error(id_or_prefix, StoreError::MeetingNotFound))
}

enum Miss {
    NotFound,
    Ambiguous(usize),
}

impl Miss {
    fn into_error(self, wanted: &str, not_found: fn(String) -> StoreError) -> StoreError {
        match self {
            Miss::NotFound => not_found(wanted.to_string()),
            Miss::Ambiguous(count) => StoreError::AmbiguousPrefix {
                prefix: wanted.to_string(),
                count,
            },
        }
    }
}

fn resolve<T>(items: &[T], id_or_prefix: &str, id_of: impl Fn(&T) -> &str) -> Result<usize, Miss> {
    let wanted = id_or_prefix.trim();
    if let Some(pos) = items.iter().position(|item| id_of(item) == wanted) {
        return Ok(pos);
    }
    if wanted.len() < MIN_PREFIX_LEN {
        return Err(Miss::NotFound);
    }

    let matches: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| id_of(item).starts_with(wanted))
        .map(|(pos, _)| pos)
        .collect();
    match matches.as_slice() {
        [] => Err(Miss::NotFound),
        [only] => Ok(*only),
        many => Err(Miss::Ambiguous(many.len())),
    }
}
