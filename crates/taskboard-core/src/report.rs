//! Assignee lookups and the descriptor sent along with a task report export.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::Task;
use crate::view::{TaskField, TaskViewConfig};

/// Distinct assignee display names in first-seen order, for the
/// "assigned to" filter choices.
pub fn assigned_members(tasks: &[Task]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in tasks.iter().filter_map(Task::member_name) {
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Display name → person id. A later task wins when a name maps to
/// more than one id.
pub fn member_ids(tasks: &[Task]) -> BTreeMap<String, String> {
    tasks
        .iter()
        .filter_map(|t| Some((t.member_name()?.to_string(), t.assigned_to.clone()?)))
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}

/// What a report backend needs to reproduce the list view: the filters
/// with the assignee resolved to a person id, and `sortKey` as
/// `<key>_<asc|desc>`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub filter: ReportFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
}

impl ReportRequest {
    pub fn from_config(project_id: Option<String>, config: &TaskViewConfig, tasks: &[Task]) -> Self {
        let active = |field: TaskField| {
            config
                .active_filters()
                .find(|(f, _)| **f == field)
                .map(|(_, v)| v.to_string())
        };
        let ids = member_ids(tasks);
        let assigned_to = active(TaskField::AssignedTo).and_then(|name| ids.get(&name).cloned());
        let search = config.search.trim();

        let filter = ReportFilter {
            search: (!search.is_empty()).then(|| search.to_string()),
            priority: active(TaskField::Priority),
            status: active(TaskField::Status),
            assigned_to: assigned_to.clone(),
            date_from: config.date_range.map(|r| r.from.format("%Y-%m-%d").to_string()),
            date_to: config.date_range.map(|r| r.to.format("%Y-%m-%d").to_string()),
        };

        Self {
            project_id,
            assigned_to,
            filter,
            sort_key: config
                .sort
                .map(|s| format!("{}_{}", s.key.as_str(), s.direction.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssigneeDetails, Priority, Status};
    use crate::view::{SortDirection, TaskSortKey, ALL};
    use chrono::NaiveDate;

    fn assigned(id: &str, person: &str, name: &str) -> Task {
        let mut t = Task::new(id.into(), id, Status::Pending, Priority::Low);
        t.assigned_to = Some(person.into());
        t.assigned_to_details = Some(AssigneeDetails {
            member_name: name.into(),
        });
        t
    }

    #[test]
    fn members_are_unique_in_first_seen_order() {
        let tasks = vec![
            assigned("1", "e2", "Zara"),
            assigned("2", "e1", "Anil"),
            assigned("3", "e2", "Zara"),
            Task::new("4".into(), "x", Status::Pending, Priority::Low),
        ];
        assert_eq!(assigned_members(&tasks), vec!["Zara", "Anil"]);
        assert_eq!(member_ids(&tasks).get("Anil").map(String::as_str), Some("e1"));
    }

    #[test]
    fn request_resolves_assignee_and_formats_sort() {
        let tasks = vec![assigned("1", "emp-42", "Zara")];
        let config = TaskViewConfig::default()
            .with_search("  audit ")
            .with_filter(TaskField::AssignedTo, "Zara")
            .with_filter(TaskField::Status, ALL)
            .with_date_range(
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            )
            .with_sort(TaskSortKey::Deadline, SortDirection::Desc);

        let request = ReportRequest::from_config(Some("p-7".into()), &config, &tasks);
        assert_eq!(request.assigned_to.as_deref(), Some("emp-42"));
        assert_eq!(request.filter.search.as_deref(), Some("audit"));
        assert_eq!(request.filter.status, None);
        assert_eq!(request.filter.date_from.as_deref(), Some("2025-01-01"));
        assert_eq!(request.sort_key.as_deref(), Some("deadline_desc"));

        let json = serde_json::to_value(&request).unwrap();
        assert!(json["filter"].get("priority").is_none());
        assert_eq!(json["sortKey"], "deadline_desc");
    }
}
