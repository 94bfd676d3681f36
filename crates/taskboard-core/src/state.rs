use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Token that does not name a known status or priority.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {token}")]
pub struct ParseTokenError {
    /// Which vocabulary the token was checked against.
    pub kind: &'static str,
    /// Raw token as supplied.
    pub token: String,
}

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    Pending,
    /// Actively being worked on.
    InProgress,
    /// Finished.
    Completed,
}

impl TaskStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Wire representation (`pending`, `in_progress`, `completed`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Human-readable label used by dashboards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(ParseTokenError {
                kind: "status",
                token: s.to_owned(),
            }),
        }
    }
}

/// Urgency of a task, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Regular work.
    #[default]
    Medium,
    /// Should be picked up soon.
    High,
    /// Drop everything.
    Urgent,
}

impl Priority {
    /// Every priority, least urgent first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Human-readable label used by dashboards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParseTokenError {
                kind: "priority",
                token: s.to_owned(),
            }),
        }
    }
}

fn normalize_token(token: &str) -> String {
    token.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tokens_accept_label_and_wire_forms() {
        for token in ["in_progress", "In Progress", "in-progress", " INPROGRESS "] {
            let parsed: TaskStatus = token
                .parse()
                .unwrap_or_else(|err| panic!("must parse {token:?}: {err}"));
            assert_eq!(parsed, TaskStatus::InProgress);
        }
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        let Err(err) = "cancelled".parse::<TaskStatus>() else {
            panic!("cancelled is not a dashboard status");
        };
        assert_eq!(err.kind, "status");
        assert!("critical".parse::<Priority>().is_err());
    }

    #[test]
    fn priorities_order_by_urgency() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::High < Priority::Urgent);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress)
            .unwrap_or_else(|err| panic!("must serialize status: {err}"));
        assert_eq!(json, "\"in_progress\"");
    }
}
