//! CLI entry point for taskboard.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use commands::Session;
use taskboard_app::ProjectConfig;

mod commands;

/// In-memory task dashboard.
#[derive(Parser, Debug)]
#[command(
    name = "taskboard",
    version,
    about = "taskboard: task statistics and filtered task lists over an in-memory dataset"
)]
struct Cli {
    /// Directory to search for `.taskboard/config.toml` (defaults to current).
    #[arg(long)]
    dir: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

/// Output rendering for list-like commands.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pipe-separated columns for reading.
    #[default]
    Table,
    /// Pretty-printed JSON for scripts.
    Json,
}

/// Subcommands; also the grammar of each `session` line.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show aggregate statistics.
    Stats {
        /// Output rendering.
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// List tasks, optionally filtered.
    Ls {
        /// Keep tasks in this status (`pending`, `in_progress`, `completed`).
        #[arg(long)]
        status: Option<String>,
        /// Keep tasks with this priority (`low`, `medium`, `high`, `urgent`).
        #[arg(long)]
        priority: Option<String>,
        /// Case-insensitive search over title, category and assignee.
        #[arg(short = 's', long = "search")]
        search: Option<String>,
        /// Keep tasks in this category id.
        #[arg(long)]
        category: Option<u64>,
        /// Keep tasks assigned to this user id.
        #[arg(long)]
        assignee: Option<u64>,
        /// Keep only overdue tasks.
        #[arg(long)]
        overdue: bool,
        /// Output rendering.
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show a single task with its comments.
    Show {
        /// Task id.
        #[arg(long)]
        task: String,
    },

    /// List the first tasks of the session.
    Recent {
        /// Number of tasks; `dashboard.recent_limit` when omitted.
        #[arg(long)]
        limit: Option<usize>,
        /// Output rendering.
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// List tasks assigned to the session's user.
    Mine {
        /// Output rendering.
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Create a new task.
    New {
        /// Task title.
        #[arg(long)]
        title: String,
        /// Initial status; `pending` when omitted.
        #[arg(long)]
        status: Option<String>,
        /// Priority; `medium` when omitted.
        #[arg(long)]
        priority: Option<String>,
        /// RFC3339 or `YYYY-MM-DDTHH:MM` (UTC).
        #[arg(long)]
        due: Option<String>,
        /// Category id.
        #[arg(long, default_value_t = 1)]
        category: u64,
        /// Assignee user id.
        #[arg(long, default_value_t = 1)]
        assignee: u64,
    },

    /// Edit an existing task; omitted fields keep their current value.
    Edit {
        /// Task id.
        #[arg(long)]
        task: String,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New status.
        #[arg(long)]
        status: Option<String>,
        /// New priority.
        #[arg(long)]
        priority: Option<String>,
        /// New deadline, same forms as `new --due`.
        #[arg(long)]
        due: Option<String>,
        /// New category id.
        #[arg(long)]
        category: Option<u64>,
        /// New assignee user id.
        #[arg(long)]
        assignee: Option<u64>,
    },

    /// Delete a task.
    Rm {
        /// Task id.
        #[arg(long)]
        task: String,
    },

    /// Add a comment to a task as the session's user.
    Comment {
        /// Task id.
        #[arg(long)]
        task: String,
        /// Comment text.
        #[arg(long, short = 'm')]
        message: String,
    },

    /// Check credentials and print a session token.
    Login {
        /// Login name.
        #[arg(long)]
        username: String,
        /// Password.
        #[arg(long)]
        password: String,
    },

    /// Read commands from stdin, one per line, against a single session.
    Session,
}

fn main() -> Result<()> {
    let Cli { dir, cmd } = Cli::parse();

    install_tracing();

    let dir = dir.unwrap_or_else(|| ".".to_owned());
    let config = ProjectConfig::discover(&dir)?;
    let mut session = Session::from_config(config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cmd {
        Command::Session => {
            let stdin = std::io::stdin();
            commands::run_session(&mut session, stdin.lock(), &mut out)
        }
        other => commands::run(other, &mut session, &mut out),
    }
}

fn install_tracing() {
    // Logs go to stderr so stdout stays parseable.
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// `RUST_LOG` directives when set and valid, INFO otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
