//! Workspace aggregate root.

use super::{
    Task, TaskId, Template, TemplateId, ValidationError, WorkspaceDomainError, WorkspaceId,
    validation::require_non_empty,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Named container owning tasks and templates.
///
/// The aggregate is loaded and saved as one unit. Task identifiers are unique
/// across the whole task tree and template identifiers across the template
/// list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    id: WorkspaceId,
    name: String,
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    templates: Vec<Template>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Creates an empty workspace.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the trimmed name is empty.
    pub fn new(name: impl Into<String>, clock: &impl Clock) -> Result<Self, ValidationError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: WorkspaceId::new(),
            name: require_non_empty("workspace name", name)?,
            tasks: Vec::new(),
            templates: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the workspace identifier.
    #[must_use]
    pub const fn id(&self) -> WorkspaceId {
        self.id
    }

    /// Returns the workspace name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the top-level tasks in creation order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the templates in creation order.
    #[must_use]
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Renames the workspace.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the trimmed name is empty.
    pub fn rename(
        &mut self,
        name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), ValidationError> {
        self.name = require_non_empty("workspace name", name)?;
        self.touch(clock);
        Ok(())
    }

    /// Appends a top-level task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::DuplicateTask`] when the task, or any
    /// of its subtasks, reuses an identifier already in the workspace.
    pub fn add_task(&mut self, task: Task, clock: &impl Clock) -> Result<(), WorkspaceDomainError> {
        if let Some(duplicate) = first_duplicate(&task, self) {
            return Err(WorkspaceDomainError::DuplicateTask(duplicate));
        }
        self.tasks.push(task);
        self.touch(clock);
        Ok(())
    }

    /// Looks up a task or subtask by identifier.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find_map(|task| task.find(id))
    }

    /// Mutable counterpart of [`Workspace::task`].
    ///
    /// Prefer [`Workspace::update_task`], which also refreshes the workspace
    /// timestamp.
    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find_map(|task| task.find_mut(id))
    }

    /// Applies `apply` to a task and refreshes the workspace timestamp on
    /// success.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::TaskNotFound`] when no task has the
    /// identifier, or whatever error `apply` returns.
    pub fn update_task<T>(
        &mut self,
        id: TaskId,
        clock: &impl Clock,
        apply: impl FnOnce(&mut Task) -> Result<T, WorkspaceDomainError>,
    ) -> Result<T, WorkspaceDomainError> {
        let task = self
            .task_mut(id)
            .ok_or(WorkspaceDomainError::TaskNotFound(id))?;
        let outcome = apply(task)?;
        self.touch(clock);
        Ok(outcome)
    }

    /// Removes a task or subtask, returning it with its own subtasks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::TaskNotFound`] when no task has the
    /// identifier.
    pub fn remove_task(
        &mut self,
        id: TaskId,
        clock: &impl Clock,
    ) -> Result<Task, WorkspaceDomainError> {
        let removed =
            remove_from(&mut self.tasks, id).ok_or(WorkspaceDomainError::TaskNotFound(id))?;
        self.touch(clock);
        Ok(removed)
    }

    /// Appends a template.
    pub fn add_template(&mut self, template: Template, clock: &impl Clock) {
        self.templates.push(template);
        self.touch(clock);
    }

    /// Looks up a template by identifier.
    #[must_use]
    pub fn template(&self, id: TemplateId) -> Option<&Template> {
        self.templates.iter().find(|template| template.id() == id)
    }

    /// Applies `apply` to a template and refreshes the workspace timestamp on
    /// success.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::TemplateNotFound`] when no template has
    /// the identifier, or whatever error `apply` returns.
    pub fn update_template<T>(
        &mut self,
        id: TemplateId,
        clock: &impl Clock,
        apply: impl FnOnce(&mut Template) -> Result<T, WorkspaceDomainError>,
    ) -> Result<T, WorkspaceDomainError> {
        let template = self
            .templates
            .iter_mut()
            .find(|template| template.id() == id)
            .ok_or(WorkspaceDomainError::TemplateNotFound(id))?;
        let outcome = apply(template)?;
        self.touch(clock);
        Ok(outcome)
    }

    /// Removes a template, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::TemplateNotFound`] when no template has
    /// the identifier.
    pub fn remove_template(
        &mut self,
        id: TemplateId,
        clock: &impl Clock,
    ) -> Result<Template, WorkspaceDomainError> {
        let index = self
            .templates
            .iter()
            .position(|template| template.id() == id)
            .ok_or(WorkspaceDomainError::TemplateNotFound(id))?;
        let removed = self.templates.remove(index);
        self.touch(clock);
        Ok(removed)
    }

    /// Checks the structure of an aggregate built outside this type, such as
    /// one read back from an export.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::DuplicateTask`] or
    /// [`WorkspaceDomainError::DuplicateTemplate`] for a reused identifier,
    /// and [`WorkspaceDomainError::MisplacedSubtask`] when a parent link does
    /// not name the task holding it.
    pub fn validate_structure(&self) -> Result<(), WorkspaceDomainError> {
        let mut task_ids = HashSet::new();
        let mut pending: Vec<(Option<TaskId>, &Task)> =
            self.tasks.iter().map(|task| (None, task)).collect();
        while let Some((holder, task)) = pending.pop() {
            if task.parent_id() != holder {
                return Err(WorkspaceDomainError::MisplacedSubtask {
                    task_id: task.id(),
                    recorded: task.parent_id(),
                    holder,
                });
            }
            if !task_ids.insert(task.id()) {
                return Err(WorkspaceDomainError::DuplicateTask(task.id()));
            }
            pending.extend(task.subtasks().iter().map(|subtask| (Some(task.id()), subtask)));
        }

        let mut template_ids = HashSet::new();
        if let Some(duplicate) = self
            .templates
            .iter()
            .find(|template| !template_ids.insert(template.id()))
        {
            return Err(WorkspaceDomainError::DuplicateTemplate(duplicate.id()));
        }
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Returns the first identifier in `task`'s tree already used in `workspace`.
fn first_duplicate(task: &Task, workspace: &Workspace) -> Option<TaskId> {
    if workspace.task(task.id()).is_some() {
        return Some(task.id());
    }
    task.subtasks()
        .iter()
        .find_map(|subtask| first_duplicate(subtask, workspace))
}

/// Removes the task with `id` from `tasks` or from any nested subtask list.
fn remove_from(tasks: &mut Vec<Task>, id: TaskId) -> Option<Task> {
    if let Some(index) = tasks.iter().position(|task| task.id() == id) {
        return Some(tasks.remove(index));
    }
    tasks
        .iter_mut()
        .find_map(|task| remove_from(task.subtasks_mut(), id))
}
