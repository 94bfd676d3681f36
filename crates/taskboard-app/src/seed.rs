//! Seed datasets: the built-in sample and JSON files with the same shape.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use taskboard_core::{
    Category, CategoryId, CommentId, CurrentUser, Priority, Task, TaskId, TaskStatus, UserId,
    UserRef,
};
use thiserror::Error;
use time::macros::datetime;

/// Errors raised while loading a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    Io {
        /// Seed file location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The seed file is not valid seed JSON.
    #[error("failed to parse seed file {path}: {source}")]
    Json {
        /// Seed file location.
        path: PathBuf,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// A task points at a category or user that is not in the seed.
    #[error("task {task} references unknown {kind} {id}")]
    InvalidReference {
        /// Offending task.
        task: TaskId,
        /// `"category"` or `"user"`.
        kind: &'static str,
        /// The dangling id.
        id: u64,
    },
    /// A task or comment id outside `1..u64::MAX`.
    #[error("{kind} id {id} is out of range")]
    InvalidId {
        /// `"task"` or `"comment"`.
        kind: &'static str,
        /// The rejected id.
        id: u64,
    },
    /// Two tasks share an id.
    #[error("duplicate task id {0}")]
    DuplicateTask(TaskId),
    /// Two comments share an id.
    #[error("duplicate comment id {0}")]
    DuplicateComment(CommentId),
    /// Two categories share a name.
    #[error("duplicate category name {0:?}")]
    DuplicateCategory(String),
}

/// Everything an [`EntityStore`](crate::store::EntityStore) starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    /// Tasks in display order.
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Users available for assignment.
    pub users: Vec<UserRef>,
    /// Categories available for tasks.
    pub categories: Vec<Category>,
    /// The session's user.
    pub current_user: CurrentUser,
}

impl SeedData {
    /// Read and validate a JSON seed file.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed, or when it breaks a
    /// reference or uniqueness rule.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let seed: Self = serde_json::from_str(&contents).map_err(|source| SeedError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        seed.validate()?;
        Ok(seed)
    }

    /// Check that task and comment ids are unique and in range, that category names are
    /// unique and that every task references a known category and assignee.
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), SeedError> {
        let mut names = HashSet::new();
        for category in &self.categories {
            if !names.insert(category.name.as_str()) {
                return Err(SeedError::DuplicateCategory(category.name.clone()));
            }
        }

        let category_ids: HashSet<CategoryId> = self.categories.iter().map(|c| c.id).collect();
        let user_ids: HashSet<UserId> = self.users.iter().map(|u| u.id).collect();
        let mut task_ids = HashSet::new();
        let mut comment_ids = HashSet::new();
        for task in &self.tasks {
            if !task.id.is_assignable() {
                return Err(SeedError::InvalidId {
                    kind: "task",
                    id: task.id.get(),
                });
            }
            if !task_ids.insert(task.id) {
                return Err(SeedError::DuplicateTask(task.id));
            }
            for comment in &task.comments {
                if !comment.id.is_assignable() {
                    return Err(SeedError::InvalidId {
                        kind: "comment",
                        id: comment.id.get(),
                    });
                }
                if !comment_ids.insert(comment.id) {
                    return Err(SeedError::DuplicateComment(comment.id));
                }
            }
            if !category_ids.contains(&task.category.id) {
                return Err(SeedError::InvalidReference {
                    task: task.id,
                    kind: "category",
                    id: task.category.id.get(),
                });
            }
            if !user_ids.contains(&task.assigned_to.id) {
                return Err(SeedError::InvalidReference {
                    task: task.id,
                    kind: "user",
                    id: task.assigned_to.id.get(),
                });
            }
        }
        Ok(())
    }
}

fn user(id: u64, username: &str, full_name: &str) -> UserRef {
    UserRef {
        id: UserId(id),
        username: username.into(),
        full_name: full_name.into(),
    }
}

fn category(id: u64, name: &str, color: &str) -> Category {
    Category {
        id: CategoryId(id),
        name: name.into(),
        color: color.into(),
    }
}

/// The dashboard's built-in sample: five tasks, six users, five categories, logged in as
/// `john_doe`.
#[must_use]
pub fn sample_data() -> SeedData {
    let users = vec![
        user(1, "john_doe", "John Doe"),
        user(2, "jane_smith", "Jane Smith"),
        user(3, "mike_wilson", "Mike Wilson"),
        user(4, "sarah_chen", "Sarah Chen"),
        user(5, "alex_garcia", "Alex Garcia"),
        user(6, "alice_brown", "Alice Brown"),
    ];
    let categories = vec![
        category(1, "Development", "#007bff"),
        category(2, "Design", "#28a745"),
        category(3, "Testing", "#ffc107"),
        category(4, "Documentation", "#6c757d"),
        category(5, "Bug Fixes", "#dc3545"),
    ];

    let u = |idx: usize| users[idx - 1].clone();
    let c = |idx: usize| categories[idx - 1].clone();

    let tasks = vec![
        Task {
            id: TaskId(1),
            title: "Implement user authentication".into(),
            status: TaskStatus::InProgress,
            priority: Priority::High,
            due_date: datetime!(2025-09-15 14:00 UTC),
            category: c(1),
            assigned_to: u(2),
            created_by: u(1),
            created_at: datetime!(2025-08-25 09:00 UTC),
            is_overdue: false,
            completed_at: None,
            comments: Vec::new(),
        },
        Task {
            id: TaskId(2),
            title: "Design landing page mockups".into(),
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            due_date: datetime!(2025-09-10 17:00 UTC),
            category: c(2),
            assigned_to: u(3),
            created_by: u(1),
            created_at: datetime!(2025-08-28 11:15 UTC),
            is_overdue: true,
            completed_at: None,
            comments: Vec::new(),
        },
        Task {
            id: TaskId(3),
            title: "Fix login bug on mobile".into(),
            status: TaskStatus::Completed,
            priority: Priority::Urgent,
            due_date: datetime!(2025-08-30 12:00 UTC),
            category: c(5),
            assigned_to: u(4),
            created_by: u(6),
            created_at: datetime!(2025-08-26 14:30 UTC),
            is_overdue: false,
            completed_at: Some(datetime!(2025-08-29 16:00 UTC)),
            comments: Vec::new(),
        },
        Task {
            id: TaskId(4),
            title: "Write API documentation".into(),
            status: TaskStatus::Pending,
            priority: Priority::Low,
            due_date: datetime!(2025-09-20 16:00 UTC),
            category: c(4),
            assigned_to: u(5),
            created_by: u(2),
            created_at: datetime!(2025-08-27 13:45 UTC),
            is_overdue: false,
            completed_at: None,
            comments: Vec::new(),
        },
        Task {
            id: TaskId(5),
            title: "Optimize database queries".into(),
            status: TaskStatus::InProgress,
            priority: Priority::Medium,
            due_date: datetime!(2025-09-12 10:00 UTC),
            category: c(1),
            assigned_to: u(1),
            created_by: u(4),
            created_at: datetime!(2025-08-29 08:20 UTC),
            is_overdue: false,
            completed_at: None,
            comments: Vec::new(),
        },
    ];

    let current_user = CurrentUser {
        id: UserId(1),
        username: "john_doe".into(),
        email: "john@example.com".into(),
        first_name: "John".into(),
        last_name: "Doe".into(),
        full_name: "John Doe".into(),
    };

    SeedData {
        tasks,
        users,
        categories,
        current_user,
    }
}
