//! Identifier newtypes for workspace aggregates and their children.
//!
//! These types wrap UUIDs so that workspace, task, template, and blocker
//! identifiers cannot be mixed up.

use super::ParseIdError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value.trim())
                    .map(Self)
                    .map_err(|_| ParseIdError {
                        kind: $kind,
                        value: value.to_owned(),
                    })
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for a workspace.
    WorkspaceId,
    "workspace"
);

uuid_identifier!(
    /// Unique identifier for a task or subtask within a workspace.
    TaskId,
    "task"
);

uuid_identifier!(
    /// Unique identifier for a template within a workspace.
    TemplateId,
    "template"
);

uuid_identifier!(
    /// Unique identifier for a blocker within its task.
    BlockerId,
    "blocker"
);
