
use taskboard_core::{
    CategoryId, ParseTokenError, Priority, TaskFilter, TaskFilterBuilder as CoreTaskFilterBuilder,
    TaskStatus, UserId,
};
use thiserror::Error;
use time::{
    OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

/// Error type returned while constructing task filters from user-facing inputs.
#[derive(Debug, Error)]
pub enum FilterBuildError {
    /// Status token outside the known vocabulary.
    #[error("invalid status: {0}")]
    InvalidStatus(#[source] ParseTokenError),
    /// Priority token outside the known vocabulary.
    #[error("invalid priority: {0}")]
    InvalidPriority(#[source] ParseTokenError),
    /// Timestamp in neither accepted form.
    #[error("invalid {field} timestamp: {source}")]
    InvalidTimestamp {
        /// Name of the offending input.
        field: &'static str,
        /// Parser failure.
        #[source]
        source: time::error::Parse,
    },
}

/// Result alias for filter construction helpers.
pub type FilterBuildResult<T> = Result<T, FilterBuildError>;

/// Builder that accepts user-facing strings and normalizes them into [`TaskFilter`] values.
///
/// Empty or whitespace-only strings mean "match all", the same as leaving a list control
/// on its blank option.
#[derive(Debug, Clone, Default)]
pub struct TaskFilterBuilder {
    status: Option<TaskStatus>,
    priority: Option<Priority>,
    text: Option<String>,
    category: Option<CategoryId>,
    assignee: Option<UserId>,
    overdue_only: bool,
}

impl TaskFilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the status predicate from a token such as `in_progress` or `In Progress`.
    ///
    /// # Errors
    /// Returns an error if the token does not name a status.
    pub fn with_status(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        self.status = parse_optional(token, |value| value.parse()).map_err(FilterBuildError::InvalidStatus)?;
        Ok(self)
    }

    /// Configure the priority predicate.
    ///
    /// # Errors
    /// Returns an error if the token does not name a priority.
    pub fn with_priority(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        self.priority =
            parse_optional(token, |value| value.parse()).map_err(FilterBuildError::InvalidPriority)?;
        Ok(self)
    }

    /// Configure the optional search text (whitespace-only inputs become `None`).
    #[must_use]
    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.text = text.and_then(|raw| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });
        self
    }

    /// Restrict to a category.
    #[must_use]
    pub const fn with_category(mut self, category: Option<CategoryId>) -> Self {
        self.category = category;
        self
    }

    /// Restrict to an assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: Option<UserId>) -> Self {
        self.assignee = assignee;
        self
    }

    /// Keep only overdue tasks.
    #[must_use]
    pub const fn with_overdue_only(mut self, overdue_only: bool) -> Self {
        self.overdue_only = overdue_only;
        self
    }

    /// Build the final [`TaskFilter`].
    #[must_use]
    pub fn build(self) -> TaskFilter {
        let mut builder = CoreTaskFilterBuilder::new().overdue_only(self.overdue_only);

        if let Some(status) = self.status {
            builder = builder.status(status);
        }
        if let Some(priority) = self.priority {
            builder = builder.priority(priority);
        }
        if let Some(text) = self.text {
            builder = builder.text(text);
        }
        if let Some(category) = self.category {
            builder = builder.category(category);
        }
        if let Some(assignee) = self.assignee {
            builder = builder.assignee(assignee);
        }

        builder.build()
    }
}

fn parse_optional<T>(
    token: Option<&str>,
    parse: impl FnOnce(&str) -> Result<T, ParseTokenError>,
) -> Result<Option<T>, ParseTokenError> {
    match token.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse(value).map(Some),
    }
}

/// Parse a due date. Accepts RFC3339 and the minute-precision `YYYY-MM-DDTHH:MM` form
/// produced by date-time pickers, which is read as UTC.
///
/// # Errors
/// Returns an error if the string matches neither form.
pub fn parse_timestamp(s: &str) -> Result<OffsetDateTime, time::error::Parse> {
    let trimmed = s.trim();
    match OffsetDateTime::parse(trimmed, &Rfc3339) {
        Ok(parsed) => Ok(parsed),
        Err(rfc_err) => PrimitiveDateTime::parse(
            trimmed,
            format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        )
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|_| rfc_err),
    }
}

/// Parse an optional due-date argument; blank strings count as absent.
///
/// # Errors
/// Returns an error if a non-blank value fails to parse.
pub fn parse_optional_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> FilterBuildResult<Option<OffsetDateTime>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let parsed =
        parse_timestamp(raw).map_err(|source| FilterBuildError::InvalidTimestamp { field, source })?;
    Ok(Some(normalize_timestamp(parsed)))
}

/// Normalize timestamps to UTC to avoid offset mismatches across interfaces.
#[must_use]
pub const fn normalize_timestamp(dt: OffsetDateTime) -> OffsetDateTime {
    dt.to_offset(UtcOffset::UTC)
}
