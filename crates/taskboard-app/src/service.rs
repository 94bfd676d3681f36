//! Task mutation service: the only path that adds, edits or removes tasks.

use taskboard_core::{
    Category, CategoryId, Clock, Comment, FilteredTasks, Priority, SystemClock, Task, TaskFilter,
    TaskId, TaskStatus, UserId, UserRef,
};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::store::EntityStore;

/// Reasons a mutation was refused. A refused mutation leaves the store untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// No task carries the id.
    #[error("task {id} not found")]
    NotFound {
        /// The requested id.
        id: TaskId,
    },
    /// The category or assignee id is not in the store.
    #[error("unknown {kind} id {id}")]
    InvalidReference {
        /// `"category"` or `"user"`.
        kind: &'static str,
        /// The unknown id.
        id: u64,
    },
    /// Every id of this kind is taken.
    #[error("no {kind} ids left to assign")]
    IdsExhausted {
        /// `"task"` or `"comment"`.
        kind: &'static str,
    },
    /// Comment text is blank.
    #[error("comment content must not be empty")]
    EmptyComment,
}

/// Fields accepted by create and update. Unset optional fields fall back to
/// `pending`, `medium` and "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    /// Task title.
    pub title: String,
    /// Workflow status; `pending` when unset.
    pub status: Option<TaskStatus>,
    /// Urgency; `medium` when unset.
    pub priority: Option<Priority>,
    /// Deadline; the write instant when unset.
    pub due_date: Option<OffsetDateTime>,
    /// Category to snapshot onto the task.
    pub category_id: CategoryId,
    /// Assignee to snapshot onto the task.
    pub assigned_to_id: UserId,
}

impl TaskInput {
    /// Input with only the required fields set.
    #[must_use]
    pub fn new(title: impl Into<String>, category_id: CategoryId, assigned_to_id: UserId) -> Self {
        Self {
            title: title.into(),
            status: None,
            priority: None,
            due_date: None,
            category_id,
            assigned_to_id,
        }
    }
}

struct Resolved {
    title: String,
    status: TaskStatus,
    priority: Priority,
    due_date: OffsetDateTime,
    category: Category,
    assigned_to: UserRef,
}

/// Service façade owning the session's [`EntityStore`].
pub struct TaskService<C = SystemClock> {
    store: EntityStore,
    clock: C,
}

impl TaskService<SystemClock> {
    /// Service on the wall clock.
    #[must_use]
    pub const fn new(store: EntityStore) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<C> TaskService<C> {
    /// Service with an explicit clock.
    pub const fn with_clock(store: EntityStore, clock: C) -> Self {
        Self { store, clock }
    }

    /// Read access to the store.
    pub const fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Give the store back.
    pub fn into_store(self) -> EntityStore {
        self.store
    }

    /// Tasks assigned to the session's user.
    pub fn my_tasks(&self) -> FilteredTasks<'_> {
        let me = self.store.current_user().id;
        self.store.filter(&TaskFilter::builder().assignee(me).build())
    }
}

impl<C: Clock> TaskService<C> {
    /// Create a task owned by the session's user.
    ///
    /// # Errors
    /// Returns [`TaskError::InvalidReference`] when the category or assignee is unknown, or
    /// [`TaskError::IdsExhausted`] when no task id is left.
    pub fn create_task(&mut self, input: TaskInput) -> Result<Task, TaskError> {
        let now = self.clock.now();
        let resolved = self.resolve(input, now)?;
        let Some(id) = self.store.next_task_id() else {
            warn!("task id space exhausted");
            return Err(TaskError::IdsExhausted { kind: "task" });
        };

        let task = Task {
            id,
            is_overdue: Task::overdue_at(resolved.due_date, now),
            completed_at: Task::completion_stamp(resolved.status, None, now),
            comments: Vec::new(),
            title: resolved.title,
            status: resolved.status,
            priority: resolved.priority,
            due_date: resolved.due_date,
            category: resolved.category,
            assigned_to: resolved.assigned_to,
            created_by: self.store.current_user().snapshot(),
            created_at: now,
        };
        self.store.insert(task.clone());
        debug!(task = %task.id, status = %task.status, "task created");
        Ok(task)
    }

    /// Overwrite the editable fields of an existing task. Author, creation time and comments
    /// stay; the completion stamp follows the new status.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for an unknown id, or
    /// [`TaskError::InvalidReference`] when the category or assignee is unknown.
    pub fn update_task(&mut self, id: TaskId, input: TaskInput) -> Result<Task, TaskError> {
        let Some(existing) = self.store.task(id) else {
            warn!(task = %id, "update of unknown task");
            return Err(TaskError::NotFound { id });
        };
        let created_by = existing.created_by.clone();
        let created_at = existing.created_at;
        let completed_at = existing.completed_at;
        let comments = existing.comments.clone();

        let now = self.clock.now();
        let resolved = self.resolve(input, now)?;
        let task = Task {
            id,
            is_overdue: Task::overdue_at(resolved.due_date, now),
            completed_at: Task::completion_stamp(resolved.status, completed_at, now),
            comments,
            title: resolved.title,
            status: resolved.status,
            priority: resolved.priority,
            due_date: resolved.due_date,
            category: resolved.category,
            assigned_to: resolved.assigned_to,
            created_by,
            created_at,
        };
        if self.store.replace(task.clone()).is_none() {
            return Err(TaskError::NotFound { id });
        }
        debug!(task = %id, status = %task.status, "task updated");
        Ok(task)
    }

    /// Remove a task. Returns whether something was removed; an unknown id is a no-op.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let removed = self.store.remove(id).is_some();
        debug!(task = %id, removed, "task delete");
        removed
    }

    /// Append a comment by the session's user to a task.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for an unknown task, [`TaskError::EmptyComment`] for
    /// blank content, or [`TaskError::IdsExhausted`] when no comment id is left.
    pub fn add_comment(&mut self, id: TaskId, content: &str) -> Result<Comment, TaskError> {
        if self.store.task(id).is_none() {
            warn!(task = %id, "comment on unknown task");
            return Err(TaskError::NotFound { id });
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(TaskError::EmptyComment);
        }
        let Some(comment_id) = self.store.next_comment_id() else {
            warn!("comment id space exhausted");
            return Err(TaskError::IdsExhausted { kind: "comment" });
        };

        let comment = Comment {
            id: comment_id,
            content: content.to_owned(),
            author: self.store.current_user().snapshot(),
            created_at: self.clock.now(),
        };
        if self.store.push_comment(id, comment.clone()).is_none() {
            return Err(TaskError::NotFound { id });
        }
        debug!(task = %id, comment = %comment.id, "comment added");
        Ok(comment)
    }

    fn resolve(&self, input: TaskInput, now: OffsetDateTime) -> Result<Resolved, TaskError> {
        let TaskInput {
            title,
            status,
            priority,
            due_date,
            category_id,
            assigned_to_id,
        } = input;

        let Some(category) = self.store.category(category_id).cloned() else {
            warn!(category = %category_id, "rejecting unknown category");
            return Err(TaskError::InvalidReference {
                kind: "category",
                id: category_id.get(),
            });
        };
        let Some(assigned_to) = self.store.user(assigned_to_id).cloned() else {
            warn!(user = %assigned_to_id, "rejecting unknown assignee");
            return Err(TaskError::InvalidReference {
                kind: "user",
                id: assigned_to_id.get(),
            });
        };

        Ok(Resolved {
            title,
            status: status.unwrap_or_default(),
            priority: priority.unwrap_or_default(),
            due_date: due_date.unwrap_or(now),
            category,
            assigned_to,
        })
    }
}
