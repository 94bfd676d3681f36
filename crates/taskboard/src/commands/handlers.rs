use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result};
use taskboard_app::{TaskFilterBuilder, TaskInput, parse_optional_timestamp};
use taskboard_core::{CategoryId, Priority, SystemClock, Task, TaskId, TaskStatus, UserId};
use time::macros::format_description;

use super::Session;
use crate::OutputFormat;

pub(super) struct LsArgs {
    pub(super) status: Option<String>,
    pub(super) priority: Option<String>,
    pub(super) search: Option<String>,
    pub(super) category: Option<u64>,
    pub(super) assignee: Option<u64>,
    pub(super) overdue: bool,
}

pub(super) struct NewArgs {
    pub(super) title: String,
    pub(super) status: Option<String>,
    pub(super) priority: Option<String>,
    pub(super) due: Option<String>,
    pub(super) category: u64,
    pub(super) assignee: u64,
}

pub(super) struct EditArgs {
    pub(super) title: Option<String>,
    pub(super) status: Option<String>,
    pub(super) priority: Option<String>,
    pub(super) due: Option<String>,
    pub(super) category: Option<u64>,
    pub(super) assignee: Option<u64>,
}

pub(super) fn handle_stats(
    session: &Session,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let stats = session.service.store().statistics();
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(stats)?)?,
        OutputFormat::Table => {
            writeln!(out, "Total: {}", stats.total_tasks)?;
            for status in TaskStatus::ALL {
                writeln!(out, "{}: {}", status.label(), stats.by_status(status))?;
            }
            writeln!(out, "Overdue: {}", stats.overdue_tasks)?;
            writeln!(out, "Completion: {:.1}%", stats.completion_rate)?;
            writeln!(out, "Avg completion time: {} days", stats.average_completion_time)?;
            writeln!(out)?;
            writeln!(out, "Priority | Tasks")?;
            writeln!(out, "-------- | -----")?;
            for priority in Priority::ALL.iter().rev() {
                writeln!(out, "{} | {}", priority.label(), stats.by_priority(*priority))?;
            }
            writeln!(out)?;
            writeln!(out, "Category | Tasks")?;
            writeln!(out, "-------- | -----")?;
            for category in session.service.store().categories() {
                let count = stats.by_category(&category.name).unwrap_or_default();
                writeln!(out, "{} | {count}", category.name)?;
            }
        }
    }
    Ok(())
}

pub(super) fn handle_ls(
    session: &Session,
    args: LsArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let LsArgs {
        status,
        priority,
        search,
        category,
        assignee,
        overdue,
    } = args;

    let filter = TaskFilterBuilder::new()
        .with_status(status.as_deref())?
        .with_priority(priority.as_deref())?
        .with_text(search)
        .with_category(category.map(CategoryId))
        .with_assignee(assignee.map(UserId))
        .with_overdue_only(overdue)
        .build();
    let view = session.service.store().filter(&filter);

    if view.is_empty() {
        if view.is_filtered() {
            writeln!(out, "No tasks matched the provided filters")?;
        } else {
            writeln!(out, "No tasks found")?;
        }
        return Ok(());
    }
    render_tasks(view.tasks(), format, out)
}

pub(super) fn handle_show(session: &Session, task: &str, out: &mut impl Write) -> Result<()> {
    let id = parse_task_id(task)?;
    let task = session
        .service
        .store()
        .task(id)
        .with_context(|| format!("task {id} not found"))?;
    writeln!(out, "{}", serde_json::to_string_pretty(task)?)?;
    Ok(())
}

pub(super) fn handle_recent(
    session: &Session,
    limit: Option<usize>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let limit = limit.unwrap_or(session.recent_limit);
    let tasks: Vec<&Task> = session.service.store().recent(limit).iter().collect();
    if tasks.is_empty() {
        writeln!(out, "No tasks found")?;
        return Ok(());
    }
    render_tasks(&tasks, format, out)
}

pub(super) fn handle_mine(session: &Session, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let mine = session.service.my_tasks();
    if mine.is_empty() {
        writeln!(out, "No tasks assigned to you")?;
        return Ok(());
    }
    render_tasks(mine.tasks(), format, out)
}

pub(super) fn handle_new(session: &mut Session, args: NewArgs, out: &mut impl Write) -> Result<()> {
    let NewArgs {
        title,
        status,
        priority,
        due,
        category,
        assignee,
    } = args;

    let mut input = TaskInput::new(title, CategoryId(category), UserId(assignee));
    input.status = parse_token(status.as_deref())?;
    input.priority = parse_token(priority.as_deref())?;
    input.due_date = parse_optional_timestamp("due", due.as_deref())?;

    let task = session.service.create_task(input)?;
    writeln!(out, "Created task {}: {}", task.id, task.title)?;
    Ok(())
}

pub(super) fn handle_edit(
    session: &mut Session,
    task: &str,
    args: EditArgs,
    out: &mut impl Write,
) -> Result<()> {
    let id = parse_task_id(task)?;
    let EditArgs {
        title,
        status,
        priority,
        due,
        category,
        assignee,
    } = args;

    // Omitted flags keep the stored value; an unknown id falls through to the service.
    let existing = session.service.store().task(id).cloned();
    let mut input = TaskInput::new(
        title
            .or_else(|| existing.as_ref().map(|task| task.title.clone()))
            .unwrap_or_default(),
        category
            .map(CategoryId)
            .or_else(|| existing.as_ref().map(|task| task.category.id))
            .unwrap_or_default(),
        assignee
            .map(UserId)
            .or_else(|| existing.as_ref().map(|task| task.assigned_to.id))
            .unwrap_or_default(),
    );
    input.status = parse_token(status.as_deref())?.or_else(|| existing.as_ref().map(|task| task.status));
    input.priority =
        parse_token(priority.as_deref())?.or_else(|| existing.as_ref().map(|task| task.priority));
    input.due_date = parse_optional_timestamp("due", due.as_deref())?
        .or_else(|| existing.as_ref().map(|task| task.due_date));

    let task = session.service.update_task(id, input)?;
    writeln!(out, "Updated task {}: {}", task.id, task.title)?;
    Ok(())
}

pub(super) fn handle_rm(session: &mut Session, task: &str, out: &mut impl Write) -> Result<()> {
    let id = parse_task_id(task)?;
    if session.service.delete_task(id) {
        writeln!(out, "Deleted task {id}")?;
    } else {
        writeln!(out, "Task {id} did not exist")?;
    }
    Ok(())
}

pub(super) fn handle_comment(
    session: &mut Session,
    task: &str,
    message: &str,
    out: &mut impl Write,
) -> Result<()> {
    let id = parse_task_id(task)?;
    let comment = session.service.add_comment(id, message)?;
    writeln!(out, "Added comment {} to task {id}", comment.id)?;
    Ok(())
}

pub(super) fn handle_login(
    session: &Session,
    username: &str,
    password: &str,
    out: &mut impl Write,
) -> Result<()> {
    let token = session.credentials.verify(username, password, &SystemClock)?;
    let user = session.service.store().current_user();
    writeln!(out, "Logged in as {} <{}>", user.full_name, user.email)?;
    writeln!(out, "token: {token}")?;
    Ok(())
}

fn render_tasks(tasks: &[&Task], format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(tasks)?)?,
        OutputFormat::Table => render_task_table(tasks, out)?,
    }
    Ok(())
}

fn render_task_table(tasks: &[&Task], out: &mut impl Write) -> Result<()> {
    writeln!(out, "ID | Status | Priority | Title | Category | Assignee | Due")?;
    writeln!(out, "-- | ------ | -------- | ----- | -------- | -------- | ---")?;

    for task in tasks {
        let due = task
            .due_date
            .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))?;
        let due = if task.is_overdue {
            format!("{due} (overdue)")
        } else {
            due
        };
        writeln!(
            out,
            "{} | {} | {} | {} | {} | {} | {}",
            task.id,
            task.status.label(),
            task.priority.label(),
            task.title,
            task.category.name,
            task.assigned_to.full_name,
            due
        )?;
    }
    Ok(())
}

fn parse_token<T>(raw: Option<&str>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Ok(Some(value.parse()?)),
    }
}

fn parse_task_id(raw: &str) -> Result<TaskId> {
    TaskId::from_str(raw).with_context(|| format!("Invalid task id: {raw}"))
}
