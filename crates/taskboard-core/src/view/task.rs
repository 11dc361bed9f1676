use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{SortValue, ViewConfig, Viewable};
use crate::error::CoreError;
use crate::model::Task;

pub type TaskViewConfig = ViewConfig<TaskField, TaskSortKey>;

/// Task fields that take an equality filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TaskField {
    Priority,
    Status,
    /// Matches the assignee's display name.
    AssignedTo,
    #[serde(rename = "projectId")]
    Project,
}

impl FromStr for TaskField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            "assignedTo" | "assigned_to" => Ok(Self::AssignedTo),
            "projectId" | "project_id" | "project" => Ok(Self::Project),
            other => Err(CoreError::InvalidConfig(format!("unknown filter field '{}'", other))),
        }
    }
}

/// Task sort keys. `AssigneeName` is the nested
/// `assignedToDetails.memberName` lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskSortKey {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "taskId")]
    TaskId,
    #[serde(rename = "priority")]
    Priority,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "deadline")]
    Deadline,
    #[serde(rename = "projectName")]
    ProjectName,
    #[serde(rename = "assignedBy")]
    AssignedBy,
    #[serde(rename = "assignedToDetails.memberName")]
    AssigneeName,
}

impl TaskSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::TaskId => "taskId",
            Self::Priority => "priority",
            Self::Status => "status",
            Self::Deadline => "deadline",
            Self::ProjectName => "projectName",
            Self::AssignedBy => "assignedBy",
            Self::AssigneeName => "assignedToDetails.memberName",
        }
    }
}

impl fmt::Display for TaskSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskSortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "taskId" | "task_id" | "id" => Ok(Self::TaskId),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            "deadline" => Ok(Self::Deadline),
            "projectName" | "project_name" | "project" => Ok(Self::ProjectName),
            "assignedBy" | "assigned_by" => Ok(Self::AssignedBy),
            "assignedToDetails.memberName" | "assignee" | "assignedTo" => Ok(Self::AssigneeName),
            other => Err(CoreError::InvalidConfig(format!("unknown sort key '{}'", other))),
        }
    }
}

impl Viewable for Task {
    type Field = TaskField;
    type SortKey = TaskSortKey;

    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.title.as_str(), self.project_name.as_str(), self.task_id.as_str()];
        text.extend(self.assigned_by.as_deref());
        text.extend(self.member_name());
        text
    }

    fn field_value(&self, field: TaskField) -> Option<String> {
        match field {
            TaskField::Priority => Some(self.priority.label().to_string()),
            TaskField::Status => Some(self.status.label().to_string()),
            TaskField::AssignedTo => self.member_name().map(str::to_string),
            TaskField::Project => Some(self.project_id.clone()),
        }
    }

    fn view_date(&self) -> Option<NaiveDate> {
        self.deadline
    }

    fn sort_value(&self, key: TaskSortKey) -> Option<SortValue> {
        match key {
            TaskSortKey::Title => Some(SortValue::text(&self.title)),
            TaskSortKey::TaskId => Some(SortValue::text(self.task_id.as_str())),
            TaskSortKey::Priority => Some(SortValue::text(self.priority.label())),
            TaskSortKey::Status => Some(SortValue::text(self.status.label())),
            TaskSortKey::Deadline => self.deadline.map(SortValue::Date),
            TaskSortKey::ProjectName => Some(SortValue::text(&self.project_name)),
            TaskSortKey::AssignedBy => self.assigned_by.as_deref().map(SortValue::text),
            TaskSortKey::AssigneeName => self
                .assigned_to_details
                .as_ref()
                .map(|details| SortValue::text(&details.member_name)),
        }
    }
}
