//! Task status state machine.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a task.
///
/// The serialised names are the canonical status values stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Task has been captured but work has not started.
    #[serde(rename = "backlog")]
    Backlog,
    /// Task is being worked on.
    #[serde(rename = "andamento")]
    InProgress,
    /// Task is awaiting review.
    #[serde(rename = "review")]
    Review,
    /// Task has been completed. Terminal.
    #[serde(rename = "concluida")]
    Done,
    /// Task is stalled by one or more blockers.
    #[serde(rename = "bloqueada")]
    Blocked,
}

impl TaskStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Backlog,
        Self::InProgress,
        Self::Review,
        Self::Done,
        Self::Blocked,
    ];

    /// Returns the statuses reachable from `self` in one transition.
    #[must_use]
    pub const fn successors(self) -> &'static [Self] {
        match self {
            Self::Backlog => &[Self::InProgress],
            Self::InProgress => &[Self::Review, Self::Blocked],
            Self::Review => &[Self::Done, Self::InProgress],
            Self::Blocked => &[Self::InProgress],
            Self::Done => &[],
        }
    }

    /// Returns whether `target` is a valid successor of `self`.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.successors().contains(&target)
    }

    /// Returns whether the status has no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "andamento",
            Self::Review => "review",
            Self::Done => "concluida",
            Self::Blocked => "bloqueada",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    /// Parses canonical names and their English aliases.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "backlog" => Ok(Self::Backlog),
            "andamento" | "in_progress" | "in-progress" => Ok(Self::InProgress),
            "review" => Ok(Self::Review),
            "concluida" | "done" => Ok(Self::Done),
            "bloqueada" | "blocked" => Ok(Self::Blocked),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(value)
    }
}
