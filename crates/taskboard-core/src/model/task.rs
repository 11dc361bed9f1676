use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::status::{Priority, Status};
use crate::id::TaskId;

/// Denormalised display data for the assignee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeDetails {
    pub member_name: String,
}

/// A unit of work.
///
/// `task_id` never changes after creation. Moving a task on the board only
/// ever touches `status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: Status,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_details: Option<AssigneeDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_by: Option<String>,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub project_name: String,
}

impl Task {
    /// A task with only the required fields set; used by the store when
    /// creating and by tests.
    pub fn new(task_id: TaskId, title: impl Into<String>, status: Status, priority: Priority) -> Self {
        Self {
            task_id,
            title: title.into(),
            description: None,
            status,
            priority,
            deadline: None,
            assigned_to: None,
            assigned_to_details: None,
            assigned_by: None,
            project_id: String::new(),
            project_name: String::new(),
        }
    }

    pub fn member_name(&self) -> Option<&str> {
        self.assigned_to_details
            .as_ref()
            .map(|d| d.member_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_wire_format() {
        let mut task = Task::new("t1".into(), "Draft contract", Status::Planned, Priority::High);
        task.assigned_to = Some("emp-7".into());
        task.assigned_to_details = Some(AssigneeDetails {
            member_name: "Ravi".into(),
        });
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["taskId"], "t1");
        assert_eq!(json["assignedToDetails"]["memberName"], "Ravi");
        assert!(json.get("deadline").is_none());
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let task: Task = serde_json::from_str(
            r#"{"taskId":"t9","title":"Call client","status":"In Progress","priority":"Low"}"#,
        )
        .unwrap();
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.member_name(), None);
        assert!(task.project_id.is_empty());
    }
}
