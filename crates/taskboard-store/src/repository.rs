use crate::config::BoardConfig;
use crate::error::StoreError;
use crate::lockfile::{read_json_or_default, Lockfile};
use crate::query;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use taskboard_core::board::{build, BoardIndex};
use taskboard_core::error::CoreError;
use taskboard_core::id::TaskId;
use taskboard_core::minutes::{self, MeetingDraft};
use taskboard_core::model::{
    AssigneeDetails, Meeting, MomStatus, Priority, ShowCause, Status, Task,
};
use taskboard_core::reorder::{move_task, DropTarget, MoveOutcome, StatusUpdate};
use taskboard_core::serialize::mint_id;
use tracing::{debug, info, warn};

const BOARD_DIR: &str = ".taskboard";
const CONFIG_FILE: &str = "config.json";
const TASKS_FILE: &str = "tasks.json";
const MEETINGS_FILE: &str = "meetings.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskFile {
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MeetingFile {
    #[serde(default)]
    meetings: Vec<Meeting>,
}

/// Fields of a task to be created; the store assigns the id.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Status,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
    pub assigned_to: Option<String>,
    pub assignee_name: Option<String>,
    pub assigned_by: Option<String>,
    pub project_id: String,
    pub project_name: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>, status: Status, priority: Priority) -> Self {
        Self {
            title: title.into(),
            description: None,
            status,
            priority,
            deadline: None,
            assigned_to: None,
            assignee_name: None,
            assigned_by: None,
            project_id: String::new(),
            project_name: String::new(),
        }
    }

    fn into_task(self, task_id: TaskId) -> Task {
        Task {
            task_id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            deadline: self.deadline,
            assigned_to: self.assigned_to,
            assigned_to_details: self
                .assignee_name
                .map(|member_name| AssigneeDetails { member_name }),
            assigned_by: self.assigned_by,
            project_id: self.project_id,
            project_name: self.project_name,
        }
    }
}

/// Partial update of a task. `None` leaves a field as it is; the inner
/// `Option` of the clearable fields distinguishes "clear" from "keep".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub deadline: Option<Option<NaiveDate>>,
    pub assignee: Option<Option<(String, String)>>,
}

/// A board on disk: `.taskboard/` with its config, tasks and minutes.
pub struct Repository {
    root: PathBuf,
    dir: PathBuf,
    pub config: BoardConfig,
}

impl Repository {
    /// Create a new board at `path`.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        let dir = root.join(BOARD_DIR);

        if dir.exists() {
            return Err(StoreError::RepositoryExists(dir.display().to_string()));
        }
        fs::create_dir_all(&dir)?;

        let config = BoardConfig::default();
        config.save(&dir.join(CONFIG_FILE))?;

        let repo = Self { root, dir, config };
        Lockfile::acquire(repo.tasks_path())?.write_json(&TaskFile::default())?;
        Lockfile::acquire(repo.meetings_path())?.write_json(&MeetingFile::default())?;
        info!(dir = %repo.dir.display(), "board initialized");
        Ok(repo)
    }

    /// Open the board at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        let dir = root.join(BOARD_DIR);

        if !dir.exists() {
            return Err(StoreError::RepositoryNotFound(root.display().to_string()));
        }
        let config = BoardConfig::load(&dir.join(CONFIG_FILE))?;
        debug!(dir = %dir.display(), "board opened");
        Ok(Self { root, dir, config })
    }

    /// Search upward from `start` for a `.taskboard/` directory.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut current = start.as_ref().to_path_buf();
        loop {
            if current.join(BOARD_DIR).exists() {
                return Self::open(&current);
            }
            if !current.pop() {
                return Err(StoreError::RepositoryNotFound(
                    start.as_ref().display().to_string(),
                ));
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn tasks_path(&self) -> PathBuf {
        self.dir.join(TASKS_FILE)
    }

    fn meetings_path(&self) -> PathBuf {
        self.dir.join(MEETINGS_FILE)
    }

    /// Locked read-modify-write of the task list.
    fn with_tasks<R>(
        &self,
        f: impl FnOnce(&mut Vec<Task>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let lock = Lockfile::acquire(self.tasks_path())?;
        let mut file: TaskFile = lock.read_json()?;
        let out = f(&mut file.tasks)?;
        lock.write_json(&file)?;
        Ok(out)
    }

    fn with_meetings<R>(
        &self,
        f: impl FnOnce(&mut Vec<Meeting>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let lock = Lockfile::acquire(self.meetings_path())?;
        let mut file: MeetingFile = lock.read_json()?;
        let out = f(&mut file.meetings)?;
        lock.write_json(&file)?;
        Ok(out)
    }

    fn check_status(&self, status: Status) -> Result<(), StoreError> {
        if self.config.known_statuses().any(|s| s == status) {
            Ok(())
        } else {
            Err(CoreError::InvalidStatus(status.to_string()).into())
        }
    }

    // -- tasks --------------------------------------------------------------

    pub fn tasks(&self) -> Result<Vec<Task>, StoreError> {
        let file: TaskFile = read_json_or_default(&self.tasks_path())?;
        debug!(count = file.tasks.len(), "tasks loaded");
        Ok(file.tasks)
    }

    /// Tasks of one project, or all tasks.
    pub fn project_tasks(&self, project_id: Option<&str>) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks()?;
        Ok(query::tasks_for_project(&tasks, project_id)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn task(&self, id_or_prefix: &str) -> Result<Task, StoreError> {
        let tasks = self.tasks()?;
        let pos = query::resolve_task(&tasks, id_or_prefix)?;
        Ok(tasks[pos].clone())
    }

    /// Create a task and mint its id.
    pub fn create_task(&self, new: NewTask) -> Result<Task, StoreError> {
        if new.title.trim().is_empty() {
            return Err(StoreError::Validation("title is required".into()));
        }
        self.check_status(new.status)?;

        self.with_tasks(|tasks| {
            let now = Utc::now().to_rfc3339();
            let mut seq = tasks.len();
            let task_id = loop {
                let candidate = mint_id("task", &new, &format!("{}#{}", now, seq))?;
                if tasks.iter().all(|t| t.task_id != candidate) {
                    break candidate;
                }
                seq += 1;
            };
            let task = new.into_task(task_id);
            info!(task = %task.task_id, status = %task.status, "task created");
            tasks.push(task.clone());
            Ok(task)
        })
    }

    /// Add a task that already carries its id, e.g. one imported from
    /// another system.
    pub fn insert_task(&self, task: Task) -> Result<Task, StoreError> {
        if task.title.trim().is_empty() {
            return Err(StoreError::Validation("title is required".into()));
        }
        self.check_status(task.status)?;

        self.with_tasks(|tasks| {
            if tasks.iter().any(|t| t.task_id == task.task_id) {
                return Err(StoreError::DuplicateTask(task.task_id.to_string()));
            }
            info!(task = %task.task_id, "task inserted");
            tasks.push(task.clone());
            Ok(task)
        })
    }

    pub fn update_task(&self, id_or_prefix: &str, patch: TaskPatch) -> Result<Task, StoreError> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(StoreError::Validation("title is required".into()));
            }
        }
        if let Some(status) = patch.status {
            self.check_status(status)?;
        }

        self.with_tasks(|tasks| {
            let pos = query::resolve_task(tasks, id_or_prefix)?;
            let task = &mut tasks[pos];
            if let Some(title) = patch.title {
                task.title = title;
            }
            if let Some(description) = patch.description {
                task.description = description;
            }
            if let Some(status) = patch.status {
                task.status = status;
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            if let Some(deadline) = patch.deadline {
                task.deadline = deadline;
            }
            if let Some(assignee) = patch.assignee {
                match assignee {
                    Some((person_id, member_name)) => {
                        task.assigned_to = Some(person_id);
                        task.assigned_to_details = Some(AssigneeDetails { member_name });
                    }
                    None => {
                        task.assigned_to = None;
                        task.assigned_to_details = None;
                    }
                }
            }
            info!(task = %task.task_id, "task updated");
            Ok(task.clone())
        })
    }

    /// Persist the status change emitted by a board move.
    pub fn update_status(&self, update: &StatusUpdate) -> Result<Task, StoreError> {
        self.check_status(update.new_status)?;
        self.with_tasks(|tasks| {
            let task = tasks
                .iter_mut()
                .find(|t| t.task_id == update.task_id)
                .ok_or_else(|| StoreError::TaskNotFound(update.task_id.to_string()))?;
            task.status = update.new_status;
            info!(task = %task.task_id, status = %task.status, "status updated");
            Ok(task.clone())
        })
    }

    pub fn delete_task(&self, id_or_prefix: &str) -> Result<Task, StoreError> {
        self.with_tasks(|tasks| {
            let pos = query::resolve_task(tasks, id_or_prefix)?;
            let removed = tasks.remove(pos);
            info!(task = %removed.task_id, "task deleted");
            Ok(removed)
        })
    }

    /// Kanban projection of the current snapshot.
    pub fn board(&self, project_id: Option<&str>) -> Result<BoardIndex, StoreError> {
        let tasks = self.project_tasks(project_id)?;
        Ok(build(&tasks, &self.config.board_statuses))
    }

    /// Move a card on a fresh snapshot and persist the resulting status
    /// change under the task-file lock.
    ///
    /// Ids may be unique prefixes. If persisting fails nothing on disk
    /// changes and the computed outcome is dropped.
    pub fn apply_move(
        &self,
        project_id: Option<&str>,
        dragged: &str,
        target: &DropTarget,
    ) -> Result<MoveOutcome, StoreError> {
        let board_statuses = self.config.board_statuses.clone();
        self.with_tasks(|tasks| {
            let scoped: Vec<Task> = query::tasks_for_project(tasks, project_id)
                .into_iter()
                .cloned()
                .collect();
            let index = build(&scoped, &board_statuses);

            let dragged_id = scoped[query::resolve_task(&scoped, dragged)?].task_id.clone();
            let target = match target {
                DropTarget::Task(id) => {
                    let pos = query::resolve_task(&scoped, id.as_str())?;
                    DropTarget::Task(scoped[pos].task_id.clone())
                }
                group => group.clone(),
            };

            let outcome = move_task(&index, &dragged_id, &target).map_err(|e| {
                warn!(dragged = %dragged_id, error = %e, "move rejected on current snapshot");
                StoreError::from(e)
            })?;

            if let Some(update) = outcome.status_update() {
                let task = tasks
                    .iter_mut()
                    .find(|t| t.task_id == update.task_id)
                    .ok_or_else(|| StoreError::TaskNotFound(update.task_id.to_string()))?;
                task.status = update.new_status;
                info!(task = %update.task_id, status = %update.new_status, "card moved to another column");
            } else {
                debug!(task = %dragged_id, "card moved within its column");
            }
            Ok(outcome)
        })
    }

    // -- meeting minutes ----------------------------------------------------

    pub fn meetings(&self) -> Result<Vec<Meeting>, StoreError> {
        let file: MeetingFile = read_json_or_default(&self.meetings_path())?;
        debug!(count = file.meetings.len(), "meetings loaded");
        Ok(file.meetings)
    }

    pub fn project_meetings(&self, project_id: Option<&str>) -> Result<Vec<Meeting>, StoreError> {
        let meetings = self.meetings()?;
        Ok(query::meetings_for_project(&meetings, project_id)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn meeting(&self, id_or_prefix: &str) -> Result<Meeting, StoreError> {
        let meetings = self.meetings()?;
        let pos = query::resolve_meeting(&meetings, id_or_prefix)?;
        Ok(meetings[pos].clone())
    }

    /// Record minutes from a validated draft.
    pub fn create_meeting(
        &self,
        project_id: &str,
        project_name: &str,
        draft: MeetingDraft,
        status: MomStatus,
    ) -> Result<Meeting, StoreError> {
        draft
            .validate()
            .map_err(|errors| StoreError::Validation(minutes::describe_errors(&errors)))?;
        let meeting_date = draft
            .starts_at()
            .ok_or_else(|| StoreError::Validation("meetingDate: Meeting date is required".into()))?;
        let duration = draft
            .resolved_duration()
            .ok_or_else(|| StoreError::Validation("duration: Duration is required".into()))?;

        self.with_meetings(|meetings| {
            let now = Utc::now();
            let seed = serde_json::json!({
                "projectId": project_id,
                "title": draft.title,
                "meetingDate": meeting_date,
            });
            let mut seq = meetings.len();
            let meeting_id = loop {
                let candidate = mint_id("meeting", &seed, &format!("{}#{}", now.to_rfc3339(), seq))?
                    .to_string();
                if meetings.iter().all(|m| m.meeting_id != candidate) {
                    break candidate;
                }
                seq += 1;
            };

            let meeting = Meeting {
                meeting_id,
                project_id: project_id.to_string(),
                project_name: project_name.to_string(),
                title: draft.title,
                agenda: draft.agenda,
                summary: draft.summary,
                notes: draft.notes,
                meeting_mode: draft.meeting_mode,
                meeting_link: draft.meeting_link.filter(|l| !l.trim().is_empty()),
                status,
                meeting_date,
                duration,
                created_at: now,
                updated_at: None,
                show_cause: None,
            };
            info!(meeting = %meeting.meeting_id, status = %meeting.status, "minutes recorded");
            meetings.push(meeting.clone());
            Ok(meeting)
        })
    }

    /// Turn draft minutes into final ones.
    pub fn finalize_meeting(&self, id_or_prefix: &str) -> Result<Meeting, StoreError> {
        self.with_meetings(|meetings| {
            let pos = query::resolve_meeting(meetings, id_or_prefix)?;
            let meeting = &mut meetings[pos];
            if meeting.status == MomStatus::Final {
                return Err(StoreError::Validation(format!(
                    "minutes {} are already final",
                    meeting.meeting_id
                )));
            }
            meeting.status = MomStatus::Final;
            meeting.updated_at = Some(Utc::now());
            info!(meeting = %meeting.meeting_id, "minutes finalized");
            Ok(meeting.clone())
        })
    }

    /// File the explanation for late minutes. Refused when the minutes were
    /// on time.
    pub fn submit_show_cause(
        &self,
        id_or_prefix: &str,
        reason: &str,
        submitted_by: &str,
    ) -> Result<Meeting, StoreError> {
        let reason = minutes::check_show_cause_reason(reason)?;
        let threshold = self.config.show_cause_threshold_minutes;

        self.with_meetings(|meetings| {
            let pos = query::resolve_meeting(meetings, id_or_prefix)?;
            let meeting = &mut meetings[pos];
            let required = minutes::delay_check(meeting, threshold)
                .is_some_and(|check| check.show_cause_required);
            if !required {
                return Err(StoreError::Validation(format!(
                    "minutes {} were recorded on time; no show cause needed",
                    meeting.meeting_id
                )));
            }
            meeting.show_cause = Some(ShowCause {
                reason,
                submitted_by: submitted_by.to_string(),
                submitted_at: Utc::now(),
            });
            info!(meeting = %meeting.meeting_id, by = submitted_by, "show cause submitted");
            Ok(meeting.clone())
        })
    }
}
