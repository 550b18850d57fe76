//! Task priority levels.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task priority from 1 (most urgent) to 5 (routine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    /// Most urgent level.
    pub const URGENT: Self = Self(1);
    /// High priority.
    pub const HIGH: Self = Self(2);
    /// Medium priority.
    pub const MEDIUM: Self = Self(3);
    /// Low priority.
    pub const LOW: Self = Self(4);
    /// Routine work; the default for new tasks.
    pub const ROUTINE: Self = Self(5);

    /// Every level, most urgent first.
    pub const ALL: [Self; 5] = [
        Self::URGENT,
        Self::HIGH,
        Self::MEDIUM,
        Self::LOW,
        Self::ROUTINE,
    ];

    /// Creates a validated priority.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for `priority` when the value is outside
    /// `1..=5`.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::new(
                "priority",
                format!("{value} is outside the range 1-5"),
            ))
        }
    }

    /// Returns the numeric level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the display label for the level.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self.0 {
            1 => "urgent",
            2 => "high",
            3 => "medium",
            4 => "low",
            _ => "routine",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::ROUTINE
    }
}

impl TryFrom<u8> for Priority {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    /// Parses `3`, `P3`, or a level label such as `medium`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let digits = normalized.strip_prefix('p').unwrap_or(&normalized);
        if let Ok(level) = digits.parse::<u8>() {
            return Self::new(level);
        }
        Self::ALL
            .into_iter()
            .find(|priority| priority.label() == normalized)
            .ok_or_else(|| ValidationError::new("priority", format!("unknown priority '{value}'")))
    }
}
