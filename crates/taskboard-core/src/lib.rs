//! Domain types, statistics and filtering for the task dashboard.

/// Injectable time source.
pub mod clock;
/// Task list filtering.
pub mod filter;
/// Identifier types.
pub mod id;
/// Status and priority vocabularies.
pub mod state;
/// Aggregate statistics over a task collection.
pub mod stats;
/// Free-text search over task fields.
pub mod text_matcher;

pub use clock::{Clock, FixedClock, SystemClock};
pub use filter::{FilteredTasks, TaskFilter, TaskFilterBuilder, filter};
pub use id::{CategoryId, CommentId, TaskId, UserId};
pub use state::{ParseTokenError, Priority, TaskStatus};
pub use stats::{Statistics, recompute};
pub use text_matcher::TextMatcher;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Snapshot of a user embedded into tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// Identifier of the user.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Display name.
    pub full_name: String,
}

/// The logged-in user of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Identifier of the user.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Display name.
    pub full_name: String,
}

impl CurrentUser {
    /// Reduce to the snapshot stored on tasks.
    #[must_use]
    pub fn snapshot(&self) -> UserRef {
        UserRef {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

/// Grouping for tasks. Names are unique within a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Identifier of the category.
    pub id: CategoryId,
    /// Unique display name.
    pub name: String,
    /// Opaque colour hint, usually `#rrggbb`.
    pub color: String,
}

/// A task record with its related entities copied in at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier of the task.
    pub id: TaskId,
    /// Human-readable title.
    pub title: String,
    /// Workflow status.
    pub status: TaskStatus,
    /// Urgency.
    pub priority: Priority,
    /// Deadline.
    #[serde(with = "time::serde::rfc3339")]
    pub due_date: OffsetDateTime,
    /// Category snapshot.
    pub category: Category,
    /// Assignee snapshot.
    pub assigned_to: UserRef,
    /// Author snapshot, fixed at creation.
    pub created_by: UserRef,
    /// Creation instant, fixed at creation.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// `due_date < now` as of the last write. Not recomputed on read.
    pub is_overdue: bool,
    /// Instant the task entered [`TaskStatus::Completed`]; `None` in any other status.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    /// Discussion on the task, oldest first.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A note left on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Identifier of the comment.
    pub id: CommentId,
    /// Comment body.
    pub content: String,
    /// Author snapshot.
    pub author: UserRef,
    /// Creation instant.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Task {
    /// Overdue rule: the deadline lies strictly before `now`.
    #[must_use]
    pub fn overdue_at(due_date: OffsetDateTime, now: OffsetDateTime) -> bool {
        due_date < now
    }

    /// Completion stamp after a write that leaves the task in `status`.
    ///
    /// Entering `completed` stamps `now`, staying there keeps the earlier stamp and any
    /// other status clears it.
    #[must_use]
    pub fn completion_stamp(
        status: TaskStatus,
        previous: Option<OffsetDateTime>,
        now: OffsetDateTime,
    ) -> Option<OffsetDateTime> {
        match status {
            TaskStatus::Completed => Some(previous.unwrap_or(now)),
            TaskStatus::Pending | TaskStatus::InProgress => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use time::macros::datetime;

    pub fn category(id: u64, name: &str) -> Category {
        Category {
            id: CategoryId(id),
            name: name.into(),
            color: "#007bff".into(),
        }
    }

    pub fn user(id: u64, full_name: &str) -> UserRef {
        UserRef {
            id: UserId(id),
            username: full_name.to_ascii_lowercase().replace(' ', "_"),
            full_name: full_name.into(),
        }
    }

    pub fn task(id: u64, title: &str, status: TaskStatus, priority: Priority, category: &Category) -> Task {
        Task {
            id: TaskId(id),
            title: title.into(),
            status,
            priority,
            due_date: datetime!(2025-09-15 14:00 UTC),
            category: category.clone(),
            assigned_to: user(2, "Jane Smith"),
            created_by: user(1, "John Doe"),
            created_at: datetime!(2025-08-25 09:00 UTC),
            is_overdue: false,
            completed_at: None,
            comments: Vec::new(),
        }
    }
}
