//! Session-scoped entity store shared by CLI and other front-ends.

use taskboard_core::{
    Category, CategoryId, Comment, CommentId, CurrentUser, FilteredTasks, Statistics, Task,
    TaskFilter, TaskId, UserId, UserRef, recompute,
};
use tracing::info;

use crate::seed::SeedData;

/// Authoritative collections of one session plus their derived statistics.
///
/// Every method that touches the task list recomputes [`Statistics`] before returning,
/// so [`statistics`](Self::statistics) never lags behind [`tasks`](Self::tasks).
#[derive(Debug, Clone)]
pub struct EntityStore {
    tasks: Vec<Task>,
    users: Vec<UserRef>,
    categories: Vec<Category>,
    current_user: CurrentUser,
    statistics: Statistics,
}

impl EntityStore {
    /// Build a store from a seed dataset.
    #[must_use]
    pub fn new(seed: SeedData) -> Self {
        let SeedData {
            tasks,
            users,
            categories,
            current_user,
        } = seed;
        let statistics = recompute(&tasks, &categories);
        let store = Self {
            tasks,
            users,
            categories,
            current_user,
            statistics,
        };
        store.log_loaded();
        store
    }

    /// Replace every collection and rebuild statistics.
    pub fn initialize(
        &mut self,
        tasks: Vec<Task>,
        users: Vec<UserRef>,
        categories: Vec<Category>,
        current_user: CurrentUser,
    ) {
        self.tasks = tasks;
        self.users = users;
        self.categories = categories;
        self.current_user = current_user;
        self.recompute_statistics();
        self.log_loaded();
    }

    fn log_loaded(&self) {
        info!(
            tasks = self.tasks.len(),
            users = self.users.len(),
            categories = self.categories.len(),
            user = %self.current_user.username,
            "entity store initialized"
        );
    }

    /// Look up a task by id.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// All tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The first `limit` tasks in insertion order.
    #[must_use]
    pub fn recent(&self, limit: usize) -> &[Task] {
        &self.tasks[..limit.min(self.tasks.len())]
    }

    /// Apply a filter to the task list.
    #[must_use]
    pub fn filter(&self, filter: &TaskFilter) -> FilteredTasks<'_> {
        filter.apply(&self.tasks)
    }

    /// Known users.
    #[must_use]
    pub fn users(&self) -> &[UserRef] {
        &self.users
    }

    /// Look up a user by id.
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&UserRef> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Known categories.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by id.
    #[must_use]
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// The session's user.
    #[must_use]
    pub const fn current_user(&self) -> &CurrentUser {
        &self.current_user
    }

    /// Statistics of the current task list.
    #[must_use]
    pub const fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Rebuild statistics from the current collections.
    pub fn recompute_statistics(&mut self) -> &Statistics {
        self.statistics = recompute(&self.tasks, &self.categories);
        &self.statistics
    }

    /// Identifier the next created task receives; `None` once the id space is used up.
    #[must_use]
    pub fn next_task_id(&self) -> Option<TaskId> {
        TaskId::next_after(self.tasks.iter().map(|task| task.id))
    }

    /// Identifier the next comment receives. Comment ids are unique across all tasks.
    #[must_use]
    pub fn next_comment_id(&self) -> Option<CommentId> {
        CommentId::next_after(
            self.tasks
                .iter()
                .flat_map(|task| task.comments.iter().map(|comment| comment.id)),
        )
    }

    pub(crate) fn insert(&mut self, task: Task) {
        self.tasks.push(task);
        self.recompute_statistics();
    }

    /// Swap in `task` for the entry with the same id. Returns the previous record.
    pub(crate) fn replace(&mut self, task: Task) -> Option<Task> {
        let slot = self.tasks.iter_mut().find(|existing| existing.id == task.id)?;
        let previous = std::mem::replace(slot, task);
        self.recompute_statistics();
        Some(previous)
    }

    /// Append a comment to a task. Comments do not feed statistics.
    pub(crate) fn push_comment(&mut self, id: TaskId, comment: Comment) -> Option<&Comment> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.comments.push(comment);
        task.comments.last()
    }

    pub(crate) fn remove(&mut self, id: TaskId) -> Option<Task> {
        let idx = self.tasks.iter().position(|task| task.id == id)?;
        let removed = self.tasks.remove(idx);
        self.recompute_statistics();
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_data;
    use taskboard_core::TaskStatus;

    fn store() -> EntityStore {
        EntityStore::new(sample_data())
    }

    #[test]
    fn new_store_derives_statistics_from_seed() {
        let store = store();
        let stats = store.statistics();
        assert_eq!(stats.total_tasks, 5);
        assert_eq!(stats.pending_tasks, 2);
        assert_eq!(stats.in_progress_tasks, 2);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.overdue_tasks, 1);
        assert_eq!(stats.by_category("Testing"), Some(0));
        assert_eq!(stats.by_category("Development"), Some(2));
    }

    #[test]
    fn tasks_keep_insertion_order() {
        let store = store();
        let ids: Vec<u64> = store.tasks().iter().map(|task| task.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn missing_task_is_absent_not_error() {
        let store = store();
        assert!(store.task(TaskId(99)).is_none());
        assert_eq!(
            store.task(TaskId(3)).map(|task| task.title.as_str()),
            Some("Fix login bug on mobile")
        );
    }

    #[test]
    fn initialize_replaces_collections_and_statistics() {
        let mut store = store();
        let seed = sample_data();
        let categories = seed.categories.clone();
        store.initialize(Vec::new(), seed.users, categories, seed.current_user);

        assert!(store.tasks().is_empty());
        assert_eq!(store.statistics().total_tasks, 0);
        assert_eq!(store.statistics().tasks_by_category.len(), 5);
        assert_eq!(store.next_task_id(), Some(TaskId(1)));
        assert_eq!(store.next_comment_id(), Some(CommentId(1)));
    }

    #[test]
    fn recent_is_clamped_to_collection_size() {
        let store = store();
        assert_eq!(store.recent(2).len(), 2);
        assert_eq!(store.recent(50).len(), 5);
        assert!(store.recent(0).is_empty());
    }

    #[test]
    fn internal_mutators_recompute_statistics() {
        let mut store = store();
        let mut task = store
            .task(TaskId(2))
            .cloned()
            .unwrap_or_else(|| panic!("seed task 2 must exist"));
        task.status = TaskStatus::Completed;
        assert!(store.replace(task).is_some());
        assert_eq!(store.statistics().completed_tasks, 2);

        assert!(store.remove(TaskId(2)).is_some());
        assert_eq!(store.statistics().total_tasks, 4);
        assert_eq!(store.statistics().completed_tasks, 1);
        assert!(store.remove(TaskId(2)).is_none());
    }

    #[test]
    fn comments_attach_to_their_task_and_leave_statistics_alone() {
        let mut store = store();
        let before = store.statistics().clone();
        let comment = Comment {
            id: CommentId(1),
            content: "Needs a second review".into(),
            author: store.current_user().snapshot(),
            created_at: time::macros::datetime!(2025-09-02 09:00 UTC),
        };

        assert!(store.push_comment(TaskId(99), comment.clone()).is_none());
        assert_eq!(store.push_comment(TaskId(1), comment.clone()), Some(&comment));
        assert_eq!(store.task(TaskId(1)).map(|task| task.comments.len()), Some(1));
        assert_eq!(store.next_comment_id(), Some(CommentId(2)));
        assert_eq!(store.statistics(), &before);
    }

    #[test]
    fn lookups_resolve_reference_data() {
        let store = store();
        assert_eq!(
            store.category(CategoryId(5)).map(|c| c.name.as_str()),
            Some("Bug Fixes")
        );
        assert_eq!(
            store.user(UserId(6)).map(|u| u.full_name.as_str()),
            Some("Alice Brown")
        );
        assert!(store.user(UserId(7)).is_none());
    }
}
