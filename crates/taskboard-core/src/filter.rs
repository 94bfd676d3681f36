use serde::{Deserialize, Serialize};

use crate::{CategoryId, Priority, Task, TaskStatus, TextMatcher, UserId};

/// Predicates applied to a task list. Every set predicate must hold (logical AND);
/// unset predicates match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Exact status.
    pub status: Option<TaskStatus>,
    /// Exact priority.
    pub priority: Option<Priority>,
    /// Normalized search text over title, category name and assignee name.
    pub text: Option<String>,
    /// Category id of the stored snapshot.
    pub category: Option<CategoryId>,
    /// Assignee id of the stored snapshot.
    pub assignee: Option<UserId>,
    /// Only tasks whose stored overdue flag is set.
    #[serde(default)]
    pub overdue_only: bool,
}

impl TaskFilter {
    /// Start building a filter.
    #[must_use]
    pub fn builder() -> TaskFilterBuilder {
        TaskFilterBuilder::new()
    }

    /// True when no predicate is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.text.is_none()
            && self.category.is_none()
            && self.assignee.is_none()
            && !self.overdue_only
    }

    /// Evaluate every predicate against a task.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|status| task.status != status) {
            return false;
        }
        if self.priority.is_some_and(|priority| task.priority != priority) {
            return false;
        }
        if self.category.is_some_and(|category| task.category.id != category) {
            return false;
        }
        if self.assignee.is_some_and(|assignee| task.assigned_to.id != assignee) {
            return false;
        }
        if self.overdue_only && !task.is_overdue {
            return false;
        }
        self.text
            .as_deref()
            .and_then(TextMatcher::new)
            .is_none_or(|matcher| matcher.matches(task))
    }

    /// Produce the order-preserving view of `tasks` that satisfies this filter.
    #[must_use]
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> FilteredTasks<'a> {
        if self.is_empty() {
            return FilteredTasks {
                tasks: tasks.iter().collect(),
                filtered: false,
            };
        }
        FilteredTasks {
            tasks: tasks.iter().filter(|task| self.matches(task)).collect(),
            filtered: true,
        }
    }
}

/// Read-only result of applying a [`TaskFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredTasks<'a> {
    tasks: Vec<&'a Task>,
    filtered: bool,
}

impl<'a> FilteredTasks<'a> {
    /// Matching tasks in input order.
    #[must_use]
    pub fn tasks(&self) -> &[&'a Task] {
        &self.tasks
    }

    /// Consume into the matching tasks.
    #[must_use]
    pub fn into_tasks(self) -> Vec<&'a Task> {
        self.tasks
    }

    /// Whether any predicate was applied. Distinguishes "nothing matched" from
    /// "nothing to show".
    #[must_use]
    pub const fn is_filtered(&self) -> bool {
        self.filtered
    }

    /// No task in the view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Iterate over the view.
    pub fn iter(&self) -> impl Iterator<Item = &'a Task> + '_ {
        self.tasks.iter().copied()
    }
}

/// Filter by the dashboard's three list controls: status, priority and search text.
#[must_use]
pub fn filter<'a>(
    tasks: &'a [Task],
    status: Option<TaskStatus>,
    priority: Option<Priority>,
    search: Option<&str>,
) -> FilteredTasks<'a> {
    let mut builder = TaskFilterBuilder::new();
    if let Some(status) = status {
        builder = builder.status(status);
    }
    if let Some(priority) = priority {
        builder = builder.priority(priority);
    }
    if let Some(search) = search {
        builder = builder.text(search);
    }
    builder.build().apply(tasks)
}

/// Builder for [`TaskFilter`].
#[derive(Debug, Clone, Default)]
pub struct TaskFilterBuilder {
    filter: TaskFilter,
}

impl TaskFilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require an exact status.
    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.filter.status = Some(status);
        self
    }

    /// Require an exact priority.
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.filter.priority = Some(priority);
        self
    }

    /// Set the search text. Blank input clears it.
    #[must_use]
    pub fn text(mut self, text: impl AsRef<str>) -> Self {
        self.filter.text = TextMatcher::new(text.as_ref()).map(|matcher| matcher.needle().to_owned());
        self
    }

    /// Require a category.
    #[must_use]
    pub const fn category(mut self, category: CategoryId) -> Self {
        self.filter.category = Some(category);
        self
    }

    /// Require an assignee.
    #[must_use]
    pub const fn assignee(mut self, assignee: UserId) -> Self {
        self.filter.assignee = Some(assignee);
        self
    }

    /// Only keep overdue tasks.
    #[must_use]
    pub const fn overdue_only(mut self, overdue_only: bool) -> Self {
        self.filter.overdue_only = overdue_only;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> TaskFilter {
        self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{category, task, user};
    use crate::TaskId;

    fn sample() -> Vec<Task> {
        let dev = category(1, "Development");
        let design = category(2, "Design");
        let bugs = category(5, "Bug Fixes");
        let mut tasks = vec![
            task(1, "Implement user authentication", TaskStatus::InProgress, Priority::High, &dev),
            task(2, "Design landing page mockups", TaskStatus::Pending, Priority::Medium, &design),
            task(3, "Fix login bug on mobile", TaskStatus::Completed, Priority::Urgent, &bugs),
            task(4, "Write API documentation", TaskStatus::Pending, Priority::Low, &dev),
        ];
        tasks[1].is_overdue = true;
        tasks[3].assigned_to = user(5, "Alex Garcia");
        tasks
    }

    fn ids(view: &FilteredTasks<'_>) -> Vec<TaskId> {
        view.iter().map(|task| task.id).collect()
    }

    #[test]
    fn no_predicates_returns_input_unchanged() {
        let tasks = sample();
        let view = filter(&tasks, None, None, None);
        assert!(!view.is_filtered());
        assert_eq!(ids(&view), vec![TaskId(1), TaskId(2), TaskId(3), TaskId(4)]);
    }

    #[test]
    fn blank_search_counts_as_no_predicate() {
        let tasks = sample();
        let view = filter(&tasks, None, None, Some("   "));
        assert!(!view.is_filtered());
        assert_eq!(view.len(), tasks.len());
    }

    #[test]
    fn status_predicate_preserves_order() {
        let tasks = sample();
        let view = filter(&tasks, Some(TaskStatus::Pending), None, None);
        assert_eq!(ids(&view), vec![TaskId(2), TaskId(4)]);
    }

    #[test]
    fn predicates_combine_with_and() {
        let tasks = sample();
        let view = filter(&tasks, Some(TaskStatus::Pending), Some(Priority::Low), Some("api"));
        assert_eq!(ids(&view), vec![TaskId(4)]);

        let none = filter(&tasks, Some(TaskStatus::Completed), Some(Priority::Low), None);
        assert!(none.is_empty());
        assert!(none.is_filtered());
    }

    #[test]
    fn search_spans_category_and_assignee() {
        let tasks = sample();
        assert_eq!(ids(&filter(&tasks, None, None, Some("BUG"))), vec![TaskId(3)]);
        assert_eq!(ids(&filter(&tasks, None, None, Some("development"))), vec![TaskId(1), TaskId(4)]);
        assert_eq!(ids(&filter(&tasks, None, None, Some("garcia"))), vec![TaskId(4)]);
    }

    #[test]
    fn extended_predicates_filter_by_reference_and_overdue() {
        let tasks = sample();
        let by_category = TaskFilter::builder().category(CategoryId(1)).build().apply(&tasks);
        assert_eq!(ids(&by_category), vec![TaskId(1), TaskId(4)]);

        let by_assignee = TaskFilter::builder().assignee(UserId(5)).build().apply(&tasks);
        assert_eq!(ids(&by_assignee), vec![TaskId(4)]);

        let overdue = TaskFilter::builder().overdue_only(true).build().apply(&tasks);
        assert_eq!(ids(&overdue), vec![TaskId(2)]);
    }

    #[test]
    fn builder_normalizes_text() {
        let filter = TaskFilter::builder().text("  Login ").build();
        assert_eq!(filter.text.as_deref(), Some("login"));
        assert!(TaskFilter::builder().text("").build().is_empty());
    }
}
