use anyhow::{Context, Result};
use chrono::NaiveTime;
use taskboard_core::minutes::{self, MeetingDraft};
use taskboard_core::model::{Meeting, MeetingMode, MomStatus};
use taskboard_core::view::{
    derive, visible_pages, MeetingField, MeetingSortKey, MeetingViewConfig, ALL, PAGER_WINDOW,
};

use super::{acting_user, direction, open_repo, parse_date};

pub struct AddArgs {
    pub project: String,
    pub project_name: String,
    pub title: String,
    pub agenda: String,
    pub summary: String,
    pub notes: String,
    pub mode: String,
    pub link: Option<String>,
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration: String,
    pub finalize: bool,
}

pub struct ListArgs {
    pub search: Option<String>,
    pub mode: Option<String>,
    pub status: Option<String>,
    pub project: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort: Option<String>,
    pub desc: bool,
    pub page: usize,
    pub page_size: Option<usize>,
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .with_context(|| format!("invalid time '{}' (expected HH:MM)", raw))
}

pub fn add(args: AddArgs, json: bool) -> Result<()> {
    let repo = open_repo()?;

    let draft = MeetingDraft {
        title: args.title,
        agenda: args.agenda,
        summary: args.summary,
        notes: args.notes,
        meeting_mode: args.mode.parse::<MeetingMode>()?,
        meeting_link: args.link,
        meeting_date: args.date.as_deref().map(parse_date).transpose()?,
        start_time: args.start.as_deref().map(parse_time).transpose()?,
        end_time: args.end.as_deref().map(parse_time).transpose()?,
        duration: args.duration,
    };
    let status = if args.finalize {
        MomStatus::Final
    } else {
        MomStatus::Draft
    };

    let meeting = repo
        .create_meeting(&args.project, &args.project_name, draft, status)
        .context("failed to record minutes")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&meeting)?);
    } else {
        println!("Recorded minutes {} ({})", meeting.meeting_id, meeting.status);
    }
    Ok(())
}

fn meeting_view(args: &ListArgs, page_size: usize) -> Result<MeetingViewConfig> {
    let mut config = MeetingViewConfig::default();
    if let Some(search) = &args.search {
        config = config.with_search(search.as_str());
    }
    if let Some(mode) = args.mode.as_deref().filter(|m| !m.eq_ignore_ascii_case(ALL)) {
        config = config.with_filter(MeetingField::MeetingMode, mode.parse::<MeetingMode>()?.as_str());
    }
    if let Some(status) = args.status.as_deref().filter(|s| !s.eq_ignore_ascii_case(ALL)) {
        config = config.with_filter(MeetingField::Status, status.parse::<MomStatus>()?.as_str());
    }
    if let Some(project) = &args.project {
        config = config.with_filter(MeetingField::Project, project.as_str());
    }
    if let (Some(from), Some(to)) = (&args.from, &args.to) {
        config = config.with_date_range(parse_date(from)?, parse_date(to)?);
    }
    if let Some(sort) = &args.sort {
        config = config.with_sort(sort.parse::<MeetingSortKey>()?, direction(args.desc));
    }
    Ok(config.with_page(args.page, page_size))
}

pub fn list(args: ListArgs, json: bool) -> Result<()> {
    let repo = open_repo()?;
    let meetings = repo.meetings().context("failed to load minutes")?;

    let page_size = args.page_size.unwrap_or(repo.config.page_size);
    let config = meeting_view(&args, page_size)?;
    let page = derive(&meetings, &config)?;

    if json {
        let output = serde_json::json!({ "view": config, "page": page });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if page.total_count == 0 {
        println!("No minutes match");
        return Ok(());
    }
    for meeting in &page.items {
        println!(
            "{:<8}  {}  {:<7}  {:<5}  {}",
            short(&meeting.meeting_id),
            meeting.meeting_date.format("%Y-%m-%d %H:%M"),
            meeting.meeting_mode,
            meeting.status,
            meeting.title
        );
    }
    println!();
    let pager: Vec<String> = visible_pages(page.page, page.total_pages, PAGER_WINDOW)
        .into_iter()
        .map(|n| if n == page.page { format!("[{}]", n) } else { n.to_string() })
        .collect();
    println!(
        "Page {} of {} ({} minutes)  {}",
        page.page,
        page.total_pages,
        page.total_count,
        pager.join(" ")
    );
    Ok(())
}

pub fn show(id: String, json: bool) -> Result<()> {
    let repo = open_repo()?;
    let meeting = repo
        .meeting(&id)
        .with_context(|| format!("minutes '{}' not found", id))?;
    let delay = minutes::delay_check(&meeting, repo.config.show_cause_threshold_minutes);

    if json {
        let output = serde_json::json!({ "meeting": meeting, "delay": delay });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_meeting(&meeting);
    match delay {
        Some(check) if check.show_cause_required => {
            println!();
            println!(
                "Recorded {} minutes after the meeting ended: show cause required",
                check.delay_minutes
            );
        }
        Some(_) => {}
        None => {
            println!();
            println!("Duration '{}' not understood; delay not checked", meeting.duration);
        }
    }
    Ok(())
}

pub fn finalize(id: String, json: bool) -> Result<()> {
    let repo = open_repo()?;
    let meeting = repo
        .finalize_meeting(&id)
        .with_context(|| format!("failed to finalize minutes '{}'", id))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&meeting)?);
    } else {
        println!("Finalized minutes {}", meeting.meeting_id);
    }
    Ok(())
}

pub fn show_cause(id: String, reason: String, json: bool) -> Result<()> {
    let repo = open_repo()?;
    let meeting = repo
        .submit_show_cause(&id, &reason, &acting_user())
        .with_context(|| format!("failed to submit show cause for '{}'", id))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&meeting)?);
    } else {
        println!("Show cause recorded for {}", meeting.meeting_id);
    }
    Ok(())
}

fn short(id: &str) -> &str {
    &id[..id.len().min(8)]
}

fn print_meeting(meeting: &Meeting) {
    println!("minutes {}", meeting.meeting_id);
    println!("Title:    {}", meeting.title);
    println!("Project:  {} ({})", meeting.project_name, meeting.project_id);
    println!("Date:     {}", meeting.meeting_date.format("%Y-%m-%d %H:%M %Z"));
    println!("Duration: {}", meeting.duration);
    println!("Mode:     {}", meeting.meeting_mode);
    if let Some(link) = &meeting.meeting_link {
        println!("Link:     {}", link);
    }
    println!("Status:   {}", meeting.status);
    println!();
    println!("Agenda:");
    println!("    {}", meeting.agenda);
    println!("Summary:");
    println!("    {}", meeting.summary);
    println!("Notes:");
    println!("    {}", meeting.notes);
    if let Some(cause) = &meeting.show_cause {
        println!();
        println!(
            "Show cause ({} at {}): {}",
            cause.submitted_by,
            cause.submitted_at.format("%Y-%m-%d %H:%M"),
            cause.reason
        );
    }
}
