mod commands;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskboard", about = "Kanban board, task list and meeting minutes", version)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new board in the current directory
    Init,

    /// Create, inspect, change and remove tasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Show the kanban board
    Board {
        /// Only tasks of this project
        #[arg(long)]
        project: Option<String>,
    },

    /// Drag a card onto another card, or onto a column with --to
    Move {
        /// Task being dragged (full id or prefix, minimum 4 chars)
        dragged: String,

        /// Task it is dropped on
        #[arg(required_unless_present = "to", conflicts_with = "to")]
        target: Option<String>,

        /// Column it is dropped on (its empty area)
        #[arg(long)]
        to: Option<String>,

        /// Board of this project only
        #[arg(long)]
        project: Option<String>,
    },

    /// Search, filter, sort and page through the task list
    List(ListArgs),

    /// Write the filtered, sorted task list and its report request to a file
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Destination file
        #[arg(short, long)]
        output: String,
    },

    /// Record and review meeting minutes
    Meeting {
        #[command(subcommand)]
        action: MeetingAction,
    },
}

/// Filters shared by `list` and `export`.
#[derive(Args, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive text search
    #[arg(long)]
    pub search: Option<String>,

    /// low, medium, high or all
    #[arg(long)]
    pub priority: Option<String>,

    /// Status name or all
    #[arg(long)]
    pub status: Option<String>,

    /// Assignee display name or all
    #[arg(long)]
    pub assigned_to: Option<String>,

    /// Project id or all
    #[arg(long)]
    pub project: Option<String>,

    /// Deadline on or after (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Deadline on or before (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Sort key (title, taskId, priority, status, deadline, projectName,
    /// assignedBy, assignedToDetails.memberName)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Args, Clone, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (defaults to the board's pageSize)
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Subcommand)]
enum TaskAction {
    /// Create a task
    Add {
        #[arg(short, long)]
        title: String,

        /// Keep an id issued elsewhere instead of minting one
        #[arg(long)]
        id: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long, default_value = "Planned")]
        status: String,

        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: String,

        /// YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,

        /// Assignee person id
        #[arg(long, requires = "assignee_name")]
        assignee_id: Option<String>,

        /// Assignee display name
        #[arg(long, requires = "assignee_id")]
        assignee_name: Option<String>,

        #[arg(long, default_value = "")]
        project: String,

        #[arg(long, default_value = "")]
        project_name: String,
    },

    /// Show one task
    Show {
        /// Task id (full or prefix, minimum 4 chars)
        id: String,
    },

    /// Change fields of a task
    Update {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        /// YYYY-MM-DD
        #[arg(long, conflicts_with = "clear_deadline")]
        deadline: Option<String>,

        #[arg(long)]
        clear_deadline: bool,

        #[arg(long, requires = "assignee_name", conflicts_with = "unassign")]
        assignee_id: Option<String>,

        #[arg(long, requires = "assignee_id")]
        assignee_name: Option<String>,

        #[arg(long)]
        unassign: bool,
    },

    /// Remove a task
    Delete { id: String },
}

#[derive(Subcommand)]
enum MeetingAction {
    /// Record minutes of a meeting
    Add {
        #[arg(long)]
        project: String,

        #[arg(long, default_value = "")]
        project_name: String,

        #[arg(short, long)]
        title: String,

        #[arg(long, default_value = "")]
        agenda: String,

        #[arg(long, default_value = "")]
        summary: String,

        #[arg(long, default_value = "")]
        notes: String,

        /// online or offline
        #[arg(long, default_value = "offline")]
        mode: String,

        /// Meeting ID or link (required for online meetings)
        #[arg(long)]
        link: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,

        /// HH:MM
        #[arg(long)]
        start: Option<String>,

        /// HH:MM
        #[arg(long)]
        end: Option<String>,

        /// e.g. "1h 30m"; derived from --start/--end when omitted
        #[arg(long, default_value = "")]
        duration: String,

        /// Save as final instead of draft
        #[arg(long)]
        r#final: bool,
    },

    /// List minutes
    List {
        #[arg(long)]
        search: Option<String>,

        /// online, offline or all
        #[arg(long)]
        mode: Option<String>,

        /// draft, final or all
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        project: Option<String>,

        #[arg(long, requires = "to")]
        from: Option<String>,

        #[arg(long, requires = "from")]
        to: Option<String>,

        /// title, meetingDate, status, meetingMode or projectName
        #[arg(long)]
        sort: Option<String>,

        #[arg(long, requires = "sort")]
        desc: bool,

        #[arg(long, default_value = "1")]
        page: usize,

        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show minutes and whether they were recorded late
    Show { id: String },

    /// Mark draft minutes final
    Finalize { id: String },

    /// Explain why minutes were recorded late
    ShowCause {
        id: String,

        #[arg(long)]
        reason: String,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Task { action } => match action {
            TaskAction::Add {
                title,
                id,
                description,
                status,
                priority,
                deadline,
                assignee_id,
                assignee_name,
                project,
                project_name,
            } => commands::task::add(
                commands::task::AddArgs {
                    title,
                    id,
                    description,
                    status,
                    priority,
                    deadline,
                    assignee: assignee_id.zip(assignee_name),
                    project,
                    project_name,
                },
                cli.json,
            ),
            TaskAction::Show { id } => commands::task::show(id, cli.json),
            TaskAction::Update {
                id,
                title,
                description,
                status,
                priority,
                deadline,
                clear_deadline,
                assignee_id,
                assignee_name,
                unassign,
            } => commands::task::update(
                id,
                commands::task::UpdateArgs {
                    title,
                    description,
                    status,
                    priority,
                    deadline,
                    clear_deadline,
                    assignee: assignee_id.zip(assignee_name),
                    unassign,
                },
                cli.json,
            ),
            TaskAction::Delete { id } => commands::task::delete(id, cli.json),
        },
        Commands::Board { project } => commands::board::run(project, cli.json),
        Commands::Move {
            dragged,
            target,
            to,
            project,
        } => commands::reorder::run(dragged, target, to, project, cli.json),
        Commands::List(args) => commands::list::run(args, cli.json),
        Commands::Export { filter, output } => commands::export::run(filter, output),
        Commands::Meeting { action } => match action {
            MeetingAction::Add {
                project,
                project_name,
                title,
                agenda,
                summary,
                notes,
                mode,
                link,
                date,
                start,
                end,
                duration,
                r#final,
            } => commands::meeting::add(
                commands::meeting::AddArgs {
                    project,
                    project_name,
                    title,
                    agenda,
                    summary,
                    notes,
                    mode,
                    link,
                    date,
                    start,
                    end,
                    duration,
                    finalize: r#final,
                },
                cli.json,
            ),
            MeetingAction::List {
                search,
                mode,
                status,
                project,
                from,
                to,
                sort,
                desc,
                page,
                page_size,
            } => commands::meeting::list(
                commands::meeting::ListArgs {
                    search,
                    mode,
                    status,
                    project,
                    from,
                    to,
                    sort,
                    desc,
                    page,
                    page_size,
                },
                cli.json,
            ),
            MeetingAction::Show { id } => commands::meeting::show(id, cli.json),
            MeetingAction::Finalize { id } => commands::meeting::finalize(id, cli.json),
            MeetingAction::ShowCause { id, reason } => {
                commands::meeting::show_cause(id, reason, cli.json)
            }
        },
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
