use std::collections::BTreeMap;

use serde::Serialize;
use time::Duration;

use crate::{Category, Priority, Task, TaskStatus};

/// Aggregate counts over a task collection.
///
/// Always produced by [`recompute`]; never edited field by field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// Number of tasks.
    pub total_tasks: usize,
    /// Tasks in [`TaskStatus::Pending`].
    pub pending_tasks: usize,
    /// Tasks in [`TaskStatus::InProgress`].
    pub in_progress_tasks: usize,
    /// Tasks in [`TaskStatus::Completed`].
    pub completed_tasks: usize,
    /// Tasks whose stored overdue flag is set.
    pub overdue_tasks: usize,
    /// Count per priority. Every priority is present.
    pub tasks_by_priority: BTreeMap<Priority, usize>,
    /// Count per known category name. Every known category is present.
    pub tasks_by_category: BTreeMap<String, usize>,
    /// Completed share of all tasks, in percent. `0.0` for an empty collection.
    pub completion_rate: f64,
    /// Mean creation-to-completion time of completed tasks in whole days, rounded down.
    /// `0` when no completed task carries a completion stamp.
    pub average_completion_time: i64,
}

impl Default for Statistics {
    fn default() -> Self {
        recompute(&[], &[])
    }
}

impl Statistics {
    /// Count for a single status.
    #[must_use]
    pub const fn by_status(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending_tasks,
            TaskStatus::InProgress => self.in_progress_tasks,
            TaskStatus::Completed => self.completed_tasks,
        }
    }

    /// Count for a single priority.
    #[must_use]
    pub fn by_priority(&self, priority: Priority) -> usize {
        self.tasks_by_priority.get(&priority).copied().unwrap_or(0)
    }

    /// Count for a category name; `None` when the category is unknown.
    #[must_use]
    pub fn by_category(&self, name: &str) -> Option<usize> {
        self.tasks_by_category.get(name).copied()
    }
}

/// Rebuild [`Statistics`] from scratch.
///
/// Categories are matched by id against the snapshot stored on each task, so a task whose
/// category was renamed after the write still counts towards that category.
#[must_use]
pub fn recompute(tasks: &[Task], categories: &[Category]) -> Statistics {
    let count_status = |status: TaskStatus| tasks.iter().filter(|task| task.status == status).count();

    let tasks_by_priority = Priority::ALL
        .into_iter()
        .map(|priority| {
            let count = tasks.iter().filter(|task| task.priority == priority).count();
            (priority, count)
        })
        .collect();

    let tasks_by_category = categories
        .iter()
        .map(|category| {
            let count = tasks
                .iter()
                .filter(|task| task.category.id == category.id)
                .count();
            (category.name.clone(), count)
        })
        .collect();

    let total_tasks = tasks.len();
    let completed_tasks = count_status(TaskStatus::Completed);

    Statistics {
        total_tasks,
        pending_tasks: count_status(TaskStatus::Pending),
        in_progress_tasks: count_status(TaskStatus::InProgress),
        completed_tasks,
        overdue_tasks: tasks.iter().filter(|task| task.is_overdue).count(),
        tasks_by_priority,
        tasks_by_category,
        completion_rate: completion_rate(completed_tasks, total_tasks),
        average_completion_time: average_completion_days(tasks),
    }
}

#[allow(clippy::cast_precision_loss)]
fn completion_rate(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

fn average_completion_days(tasks: &[Task]) -> i64 {
    let (total, count) = tasks
        .iter()
        .filter(|task| task.status == TaskStatus::Completed)
        .filter_map(|task| task.completed_at.map(|done| done - task.created_at))
        .fold((Duration::ZERO, 0_i32), |(total, count), elapsed| {
            (total.saturating_add(elapsed), count.saturating_add(1))
        });
    if count == 0 {
        return 0;
    }
    (total / count).whole_seconds().div_euclid(Duration::DAY.whole_seconds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{category, task};
    use time::macros::datetime;

    #[test]
    fn empty_collection_is_zero_filled() {
        let categories = vec![category(1, "Development"), category(2, "Design")];
        let stats = recompute(&[], &categories);

        assert_eq!(stats.total_tasks, 0);
        assert_eq!(stats.tasks_by_priority.len(), Priority::ALL.len());
        assert!(stats.tasks_by_priority.values().all(|&count| count == 0));
        assert_eq!(stats.by_category("Development"), Some(0));
        assert_eq!(stats.by_category("Design"), Some(0));
        assert!(stats.completion_rate.abs() < f64::EPSILON);
        assert_eq!(stats.average_completion_time, 0);
    }

    #[test]
    fn status_counts_sum_to_total() {
        let dev = category(1, "Development");
        let tasks = vec![
            task(1, "a", TaskStatus::Pending, Priority::Low, &dev),
            task(2, "b", TaskStatus::InProgress, Priority::High, &dev),
            task(3, "c", TaskStatus::Completed, Priority::High, &dev),
            task(4, "d", TaskStatus::Pending, Priority::Urgent, &dev),
        ];
        let stats = recompute(&tasks, std::slice::from_ref(&dev));

        assert_eq!(
            stats.pending_tasks + stats.in_progress_tasks + stats.completed_tasks,
            stats.total_tasks
        );
        assert_eq!(stats.by_status(TaskStatus::Pending), 2);
        assert_eq!(stats.by_priority(Priority::High), 2);
        assert_eq!(stats.by_priority(Priority::Medium), 0);
        assert_eq!(stats.by_category("Development"), Some(4));
        assert!((stats.completion_rate - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn categories_match_by_id_and_unknown_ones_are_not_listed() {
        let dev = category(1, "Development");
        let mut renamed = dev.clone();
        renamed.name = "Dev (old name)".into();
        let orphan = category(9, "Archived");
        let tasks = vec![
            task(1, "a", TaskStatus::Pending, Priority::Low, &renamed),
            task(2, "b", TaskStatus::Pending, Priority::Low, &orphan),
        ];
        let stats = recompute(&tasks, &[dev, category(2, "Design")]);

        assert_eq!(stats.by_category("Development"), Some(1));
        assert_eq!(stats.by_category("Design"), Some(0));
        assert_eq!(stats.by_category("Archived"), None);
        assert_eq!(stats.tasks_by_category.len(), 2);
    }

    #[test]
    fn overdue_counts_stored_flag() {
        let dev = category(1, "Development");
        let mut late = task(1, "late", TaskStatus::Completed, Priority::Low, &dev);
        late.is_overdue = true;
        let on_time = task(2, "on time", TaskStatus::Pending, Priority::Low, &dev);
        let stats = recompute(&[late, on_time], &[dev]);
        assert_eq!(stats.overdue_tasks, 1);
    }

    #[test]
    fn average_completion_time_floors_the_mean_in_days() {
        let dev = category(1, "Development");
        // created 2025-08-25 09:00
        let mut quick = task(1, "quick", TaskStatus::Completed, Priority::Low, &dev);
        quick.completed_at = Some(datetime!(2025-08-26 21:00 UTC));
        let mut slow = task(2, "slow", TaskStatus::Completed, Priority::Low, &dev);
        slow.completed_at = Some(datetime!(2025-08-29 09:00 UTC));
        let mut reopened = task(3, "reopened", TaskStatus::InProgress, Priority::Low, &dev);
        reopened.completed_at = Some(datetime!(2025-12-01 00:00 UTC));
        let unstamped = task(4, "unstamped", TaskStatus::Completed, Priority::Low, &dev);

        // (1.5 days + 4 days) / 2 = 2.75 days
        let stats = recompute(&[quick, slow, reopened, unstamped], &[dev]);
        assert_eq!(stats.average_completion_time, 2);
    }

    #[test]
    fn priority_keys_serialize_as_wire_names() {
        let json = serde_json::to_value(Statistics::default())
            .unwrap_or_else(|err| panic!("must serialize statistics: {err}"));
        let by_priority = &json["tasks_by_priority"];
        for priority in Priority::ALL {
            assert_eq!(by_priority[priority.as_str()], 0);
        }
    }
}
