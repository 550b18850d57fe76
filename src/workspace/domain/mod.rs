//! Domain model for workspaces, tasks, and templates.
//!
//! Everything here is pure: timestamps come from an injected
//! [`mockable::Clock`] and persistence stays behind the repository port.

mod error;
mod ids;
mod priority;
mod status;
mod task;
mod template;
mod validation;
mod workspace;

pub use error::{ParseIdError, ParseTaskStatusError, ValidationError, WorkspaceDomainError};
pub use ids::{BlockerId, TaskId, TemplateId, WorkspaceId};
pub use priority::Priority;
pub use status::TaskStatus;
pub use task::{Blocker, Comment, NewTask, Task, TaskUpdate};
pub use template::{NewTemplate, SubtaskTemplate, TaskOverrides, Template, TemplateUpdate};
pub use workspace::Workspace;
