use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{SortValue, ViewConfig, Viewable};
use crate::error::CoreError;
use crate::model::Meeting;

pub type MeetingViewConfig = ViewConfig<MeetingField, MeetingSortKey>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum MeetingField {
    MeetingMode,
    Status,
    #[serde(rename = "projectId")]
    Project,
}

impl FromStr for MeetingField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meetingMode" | "meeting_mode" | "mode" => Ok(Self::MeetingMode),
            "status" => Ok(Self::Status),
            "projectId" | "project_id" | "project" => Ok(Self::Project),
            other => Err(CoreError::InvalidConfig(format!("unknown filter field '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum MeetingSortKey {
    Title,
    MeetingDate,
    Status,
    MeetingMode,
    ProjectName,
}

impl MeetingSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::MeetingDate => "meetingDate",
            Self::Status => "status",
            Self::MeetingMode => "meetingMode",
            Self::ProjectName => "projectName",
        }
    }
}

impl FromStr for MeetingSortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "meetingDate" | "meeting_date" | "date" => Ok(Self::MeetingDate),
            "status" => Ok(Self::Status),
            "meetingMode" | "meeting_mode" | "mode" => Ok(Self::MeetingMode),
            "projectName" | "project_name" | "project" => Ok(Self::ProjectName),
            other => Err(CoreError::InvalidConfig(format!("unknown sort key '{}'", other))),
        }
    }
}

impl Viewable for Meeting {
    type Field = MeetingField;
    type SortKey = MeetingSortKey;

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.agenda.as_str(),
            self.summary.as_str(),
            self.meeting_id.as_str(),
        ]
    }

    fn field_value(&self, field: MeetingField) -> Option<String> {
        match field {
            MeetingField::MeetingMode => Some(self.meeting_mode.as_str().to_string()),
            MeetingField::Status => Some(self.status.as_str().to_string()),
            MeetingField::Project => Some(self.project_id.clone()),
        }
    }

    /// Calendar day of the meeting, so a `to` bound covers the whole day.
    fn view_date(&self) -> Option<NaiveDate> {
        Some(self.meeting_date.date_naive())
    }

    fn sort_value(&self, key: MeetingSortKey) -> Option<SortValue> {
        match key {
            MeetingSortKey::Title => Some(SortValue::text(&self.title)),
            MeetingSortKey::MeetingDate => Some(SortValue::Timestamp(self.meeting_date.timestamp())),
            MeetingSortKey::Status => Some(SortValue::text(self.status.as_str())),
            MeetingSortKey::MeetingMode => Some(SortValue::text(self.meeting_mode.as_str())),
            MeetingSortKey::ProjectName => Some(SortValue::text(&self.project_name)),
        }
    }
}
