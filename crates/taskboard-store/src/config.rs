use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use taskboard_core::minutes::DEFAULT_SHOW_CAUSE_THRESHOLD_MINUTES;
use taskboard_core::model::{Status, BOARD_STATUSES, LIST_STATUSES};
use taskboard_core::view::DEFAULT_PAGE_SIZE;

use crate::error::StoreError;

pub const CONFIG_VERSION: u32 = 1;

/// Per-board settings, stored as `.taskboard/config.json`.
///
/// Every field has a default so older or hand-edited files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardConfig {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    /// Kanban columns, in order.
    pub board_statuses: Vec<Status>,
    /// Status vocabulary of the flat list.
    pub list_statuses: Vec<Status>,
    pub page_size: usize,
    pub show_cause_threshold_minutes: i64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            created_at: Utc::now(),
            board_statuses: BOARD_STATUSES.to_vec(),
            list_statuses: LIST_STATUSES.to_vec(),
            page_size: DEFAULT_PAGE_SIZE,
            show_cause_threshold_minutes: DEFAULT_SHOW_CAUSE_THRESHOLD_MINUTES,
        }
    }
}

impl BoardConfig {
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let config: Self = serde_json::from_slice(&fs::read(path)?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), StoreError> {
        if self.page_size == 0 {
            return Err(StoreError::Validation("config: pageSize must be positive".into()));
        }
        if self.board_statuses.is_empty() {
            return Err(StoreError::Validation("config: boardStatuses is empty".into()));
        }
        Ok(())
    }

    /// Every status either view can show; new tasks must use one of these.
    pub fn known_statuses(&self) -> impl Iterator<Item = Status> + '_ {
        self.board_statuses
            .iter()
            .chain(self.list_statuses.iter())
            .copied()
    }
}
