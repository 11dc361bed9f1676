use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MeetingMode {
    Online,
    Offline,
}

impl MeetingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for MeetingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeetingMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            _ => Err(CoreError::InvalidConfig(format!("unknown meeting mode '{}'", s))),
        }
    }
}

/// Lifecycle of a minutes record: saved as a draft, then finalised.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MomStatus {
    Draft,
    Final,
}

impl MomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for MomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MomStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "final" => Ok(Self::Final),
            _ => Err(CoreError::InvalidConfig(format!("unknown minutes status '{}'", s))),
        }
    }
}

/// Explanation filed when minutes were recorded too long after the meeting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShowCause {
    pub reason: String,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
}

/// Minutes of a project meeting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub meeting_id: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub project_name: String,
    pub title: String,
    #[serde(default)]
    pub agenda: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub notes: String,
    pub meeting_mode: MeetingMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    pub status: MomStatus,
    pub meeting_date: DateTime<Utc>,
    /// Free text such as `"1h 30m"` or `"45m"`.
    #[serde(default)]
    pub duration: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_cause: Option<ShowCause>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_enums_on_the_wire() {
        assert_eq!(serde_json::to_string(&MeetingMode::Online).unwrap(), "\"online\"");
        assert_eq!(serde_json::to_string(&MomStatus::Final).unwrap(), "\"final\"");
        assert_eq!("Offline".parse::<MeetingMode>().unwrap(), MeetingMode::Offline);
        assert!("hybrid".parse::<MeetingMode>().is_err());
    }
}
