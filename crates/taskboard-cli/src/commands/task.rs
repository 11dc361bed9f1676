use anyhow::{bail, Context, Result};
use taskboard_core::id::TaskId;
use taskboard_core::model::{AssigneeDetails, Priority, Status, Task};
use taskboard_store::{NewTask, TaskPatch};

use super::{acting_user, open_repo, parse_date};

pub struct AddArgs {
    pub title: String,
    pub id: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub deadline: Option<String>,
    /// (person id, display name)
    pub assignee: Option<(String, String)>,
    pub project: String,
    pub project_name: String,
}

pub struct UpdateArgs {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub deadline: Option<String>,
    pub clear_deadline: bool,
    pub assignee: Option<(String, String)>,
    pub unassign: bool,
}

pub fn add(args: AddArgs, json: bool) -> Result<()> {
    let repo = open_repo()?;

    let status: Status = args.status.parse()?;
    let priority: Priority = args.priority.parse()?;
    let mut new = NewTask::new(args.title, status, priority);
    new.description = args.description;
    new.deadline = args.deadline.as_deref().map(parse_date).transpose()?;
    if let Some((id, name)) = args.assignee {
        new.assigned_to = Some(id);
        new.assignee_name = Some(name);
    }
    new.assigned_by = Some(acting_user());
    new.project_id = args.project;
    new.project_name = args.project_name;

    let task = match args.id {
        Some(raw) => repo
            .insert_task(imported(TaskId::parse(&raw)?, new))
            .context("failed to add task")?,
        None => repo.create_task(new).context("failed to create task")?,
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("Created task {} ({})", task.task_id, task.status);
    }
    Ok(())
}

pub fn show(id: String, json: bool) -> Result<()> {
    let repo = open_repo()?;
    let task = repo
        .task(&id)
        .with_context(|| format!("task '{}' not found", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        print_task(&task);
    }
    Ok(())
}

pub fn update(id: String, args: UpdateArgs, json: bool) -> Result<()> {
    let repo = open_repo()?;

    let deadline = match (args.deadline, args.clear_deadline) {
        (Some(raw), _) => Some(Some(parse_date(&raw)?)),
        (None, true) => Some(None),
        (None, false) => None,
    };
    let assignee = match (args.assignee, args.unassign) {
        (Some(pair), _) => Some(Some(pair)),
        (None, true) => Some(None),
        (None, false) => None,
    };
    let patch = TaskPatch {
        title: args.title,
        description: args.description.map(Some),
        status: args.status.as_deref().map(str::parse::<Status>).transpose()?,
        priority: args.priority.as_deref().map(str::parse::<Priority>).transpose()?,
        deadline,
        assignee,
    };
    if patch == TaskPatch::default() {
        bail!("nothing to update");
    }

    let task = repo
        .update_task(&id, patch)
        .with_context(|| format!("failed to update task '{}'", id))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("Updated task {}", task.task_id);
    }
    Ok(())
}

pub fn delete(id: String, json: bool) -> Result<()> {
    let repo = open_repo()?;
    let task = repo
        .delete_task(&id)
        .with_context(|| format!("failed to delete task '{}'", id))?;
    if json {
        println!("{}", serde_json::json!({ "deleted": task.task_id }));
    } else {
        println!("Deleted task {} ({})", task.task_id, task.title);
    }
    Ok(())
}

fn imported(task_id: TaskId, new: NewTask) -> Task {
    let mut task = Task::new(task_id, new.title, new.status, new.priority);
    task.description = new.description;
    task.deadline = new.deadline;
    task.assigned_to = new.assigned_to;
    task.assigned_to_details = new
        .assignee_name
        .map(|member_name| AssigneeDetails { member_name });
    task.assigned_by = new.assigned_by;
    task.project_id = new.project_id;
    task.project_name = new.project_name;
    task
}

fn print_task(task: &Task) {
    println!("task {}", task.task_id);
    println!("Title:    {}", task.title);
    println!("Status:   {}", task.status);
    println!("Priority: {}", task.priority);
    if let Some(deadline) = task.deadline {
        println!("Deadline: {}", deadline.format("%Y-%m-%d"));
    }
    if !task.project_id.is_empty() {
        println!("Project:  {} ({})", task.project_name, task.project_id);
    }
    if let Some(name) = task.member_name() {
        println!(
            "Assignee: {} <{}>",
            name,
            task.assigned_to.as_deref().unwrap_or("-")
        );
    }
    if let Some(by) = &task.assigned_by {
        println!("Assigned by: {}", by);
    }
    if let Some(description) = &task.description {
        println!();
        println!("    {}", description);
    }
}
