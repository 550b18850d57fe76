//! Application services for workspace, task, and template orchestration.
//!
//! Every mutating call loads the workspace aggregate, changes an owned copy,
//! and saves it once. A rejected change never reaches the repository.

mod error;
mod task;
mod template;
mod unit_of_work;
mod workspace;

pub use error::{WorkspaceServiceError, WorkspaceServiceResult};
pub use task::TaskService;
pub use template::TemplateService;
pub use workspace::WorkspaceService;
