use std::io::{BufRead, Write};

use anyhow::Result;
use clap::Parser;
use taskboard_app::{Credentials, EntityStore, ProjectConfig, TaskService};
use tracing::debug;

use crate::Command;

mod handlers;

/// One in-memory session: the configured dataset plus the mutation service over it.
pub struct Session {
    service: TaskService,
    credentials: Credentials,
    recent_limit: usize,
}

impl Session {
    /// Seed a new session from configuration.
    pub fn from_config(config: ProjectConfig) -> Result<Self> {
        let seed = config.load_seed()?;
        Ok(Self {
            service: TaskService::new(EntityStore::new(seed)),
            credentials: Credentials::from(&config.auth),
            recent_limit: config.dashboard.recent_limit,
        })
    }
}

/// Execute one command against the session, writing its output to `out`.
pub fn run(command: Command, session: &mut Session, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Stats { format } => handlers::handle_stats(session, format, out),
        Command::Ls {
            status,
            priority,
            search,
            category,
            assignee,
            overdue,
            format,
        } => handlers::handle_ls(
            session,
            handlers::LsArgs {
                status,
                priority,
                search,
                category,
                assignee,
                overdue,
            },
            format,
            out,
        ),
        Command::Show { task } => handlers::handle_show(session, &task, out),
        Command::Recent { limit, format } => handlers::handle_recent(session, limit, format, out),
        Command::Mine { format } => handlers::handle_mine(session, format, out),
        Command::New {
            title,
            status,
            priority,
            due,
            category,
            assignee,
        } => handlers::handle_new(
            session,
            handlers::NewArgs {
                title,
                status,
                priority,
                due,
                category,
                assignee,
            },
            out,
        ),
        Command::Edit {
            task,
            title,
            status,
            priority,
            due,
            category,
            assignee,
        } => handlers::handle_edit(
            session,
            &task,
            handlers::EditArgs {
                title,
                status,
                priority,
                due,
                category,
                assignee,
            },
            out,
        ),
        Command::Rm { task } => handlers::handle_rm(session, &task, out),
        Command::Comment { task, message } => {
            handlers::handle_comment(session, &task, &message, out)
        }
        Command::Login { username, password } => {
            handlers::handle_login(session, &username, &password, out)
        }
        Command::Session => {
            writeln!(out, "already in a session")?;
            Ok(())
        }
    }
}

/// Line-oriented command reader used by `taskboard session`.
#[derive(Parser, Debug)]
#[command(name = "taskboard", no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    cmd: Command,
}

/// Execute commands from `input` until EOF or `exit`. A failing line is reported and the
/// session continues with its state intact.
pub fn run_session(session: &mut Session, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if matches!(trimmed, "exit" | "quit") {
            break;
        }

        let words = match shell_words::split(trimmed) {
            Ok(words) => words,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            }
        };
        let command = match SessionLine::try_parse_from(words) {
            Ok(parsed) => parsed.cmd,
            Err(err) => {
                write!(out, "{}", err.render())?;
                continue;
            }
        };

        debug!(?command, "session command");
        if let Err(err) = run(command, session, out) {
            writeln!(out, "error: {err:#}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::from_config(ProjectConfig::default())
            .unwrap_or_else(|err| panic!("default session must load: {err}"))
    }

    fn run_script(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        run_session(session, script.as_bytes(), &mut out)
            .unwrap_or_else(|err| panic!("session must run: {err}"));
        String::from_utf8(out).unwrap_or_else(|err| panic!("utf8 output: {err}"))
    }

    #[test]
    fn mutations_accumulate_within_a_session() {
        let mut session = session();
        let output = run_script(
            &mut session,
            "new --title \"Write release notes\" --category 4 --assignee 2\n\
             rm --task 1\n\
             # comment lines are skipped\n\
             \n\
             comment --task 6 -m \"Outline agreed\"\n\
             show --task 6\n",
        );
        assert!(output.contains("Created task 6"));
        assert!(output.contains("Added comment 1 to task 6"));
        assert!(output.contains("Outline agreed"));
        assert!(output.contains("Deleted task 1"));
        assert!(output.contains("Write release notes"));

        let store = session.service.store();
        assert_eq!(store.statistics().total_tasks, 5);
        assert!(store.task(taskboard_core::TaskId(1)).is_none());
    }

    #[test]
    fn errors_are_reported_and_session_continues() {
        let mut session = session();
        let output = run_script(
            &mut session,
            "edit --task 99 --title nope\n\
             new --title x --category 42\n\
             bogus-command\n\
             new --title \"unterminated\n\
             ls --status pending\n",
        );
        assert!(output.contains("task 99 not found"));
        assert!(output.contains("unknown category id 42"));
        assert!(output.contains("error:"));
        assert!(output.contains("Design landing page mockups"));
        assert_eq!(session.service.store().tasks().len(), 5);
    }

    #[test]
    fn exit_stops_reading() {
        let mut session = session();
        let output = run_script(&mut session, "exit\nrm --task 1\n");
        assert!(output.is_empty());
        assert_eq!(session.service.store().tasks().len(), 5);
    }
}
