use crate::Task;

/// Case-insensitive substring matcher for the searchable task fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for blank inputs.
    ///
    /// Surrounding whitespace is trimmed on purpose, so `" bug "` searches for `bug`
    /// and a whitespace-only query counts as no query.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    /// Normalized needle.
    #[must_use]
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Title, category name or assignee name contains the query.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_field(&task.title)
            || self.matches_field(&task.category.name)
            || self.matches_field(&task.assigned_to.full_name)
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{category, task, user};
    use crate::{Priority, TaskStatus};

    fn matcher(query: &str) -> TextMatcher {
        TextMatcher::new(query).unwrap_or_else(|| panic!("matcher must exist for {query:?}"))
    }

    #[test]
    fn matcher_skips_blank_queries() {
        assert!(TextMatcher::new("").is_none());
        assert!(TextMatcher::new("   ").is_none());
        assert!(TextMatcher::new("\n").is_none());
    }

    #[test]
    fn matcher_trims_surrounding_whitespace() {
        assert_eq!(matcher("  Login Bug \t").needle(), "login bug");
    }

    #[test]
    fn matcher_finds_text_across_fields() {
        let mut sample = task(
            1,
            "Fix login bug on mobile",
            TaskStatus::Completed,
            Priority::Urgent,
            &category(5, "Bug Fixes"),
        );
        sample.assigned_to = user(4, "Sarah Chen");

        assert!(matcher("LOGIN").matches(&sample));
        assert!(matcher("fixes").matches(&sample));
        assert!(matcher("sarah").matches(&sample));
        assert!(!matcher("design").matches(&sample));
    }

    #[test]
    fn matcher_ignores_fields_outside_the_search_set() {
        let sample = task(
            1,
            "Write API documentation",
            TaskStatus::Pending,
            Priority::Low,
            &category(4, "Documentation"),
        );
        // creator and status are not searchable
        assert!(!matcher("john").matches(&sample));
        assert!(!matcher("pending").matches(&sample));
    }
}
