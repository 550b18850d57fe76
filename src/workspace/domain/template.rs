//! Task templates and instantiation.

use super::{
    NewTask, Priority, Task, TemplateId, ValidationError, WorkspaceDomainError,
    validation::{MIN_NAME_LEN, clean_list, require_min_len},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Structural blueprint for a subtask produced by a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskTemplate {
    /// Subtask name.
    pub name: String,
    /// Subtask description.
    #[serde(default)]
    pub description: String,
    /// Priority override; the produced parent's priority applies when unset.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Subtask tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SubtaskTemplate {
    /// Creates a blueprint with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            priority: None,
            tags: Vec::new(),
        }
    }

    fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_min_len("subtask template name", self.name, MIN_NAME_LEN)?,
            description: self.description.trim().to_owned(),
            priority: self.priority,
            tags: clean_list(self.tags),
        })
    }
}

/// Input for creating a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTemplate {
    name: String,
    description: String,
    default_priority: Priority,
    default_tags: Vec<String>,
    default_assignees: Vec<String>,
    subtask_templates: Vec<SubtaskTemplate>,
}

impl NewTemplate {
    /// Creates a request with the required template name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            default_priority: Priority::default(),
            default_tags: Vec::new(),
            default_assignees: Vec::new(),
            subtask_templates: Vec::new(),
        }
    }

    /// Sets the description copied into produced tasks.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the default priority.
    #[must_use]
    pub const fn with_default_priority(mut self, priority: Priority) -> Self {
        self.default_priority = priority;
        self
    }

    /// Sets the default tags.
    #[must_use]
    pub fn with_default_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.default_tags = tags.into_iter().collect();
        self
    }

    /// Sets the default assignees.
    #[must_use]
    pub fn with_default_assignees(mut self, assignees: impl IntoIterator<Item = String>) -> Self {
        self.default_assignees = assignees.into_iter().collect();
        self
    }

    /// Sets the subtask blueprints.
    #[must_use]
    pub fn with_subtask_templates(
        mut self,
        subtasks: impl IntoIterator<Item = SubtaskTemplate>,
    ) -> Self {
        self.subtask_templates = subtasks.into_iter().collect();
        self
    }
}

/// Partial update applied to an existing template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateUpdate {
    name: Option<String>,
    description: Option<String>,
    default_priority: Option<Priority>,
    default_tags: Option<Vec<String>>,
    default_assignees: Option<Vec<String>>,
    subtask_templates: Option<Vec<SubtaskTemplate>>,
}

impl TemplateUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the default priority.
    #[must_use]
    pub const fn with_default_priority(mut self, priority: Priority) -> Self {
        self.default_priority = Some(priority);
        self
    }

    /// Replaces the default tags.
    #[must_use]
    pub fn with_default_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.default_tags = Some(tags.into_iter().collect());
        self
    }

    /// Replaces the default assignees.
    #[must_use]
    pub fn with_default_assignees(mut self, assignees: impl IntoIterator<Item = String>) -> Self {
        self.default_assignees = Some(assignees.into_iter().collect());
        self
    }

    /// Replaces the subtask blueprints.
    #[must_use]
    pub fn with_subtask_templates(
        mut self,
        subtasks: impl IntoIterator<Item = SubtaskTemplate>,
    ) -> Self {
        self.subtask_templates = Some(subtasks.into_iter().collect());
        self
    }

    /// Returns whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.default_priority.is_none()
            && self.default_tags.is_none()
            && self.default_assignees.is_none()
            && self.subtask_templates.is_none()
    }
}

/// Field-by-field overrides applied on top of template defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskOverrides {
    name: Option<String>,
    due_date: Option<DateTime<Utc>>,
    priority: Option<Priority>,
    tags: Option<Vec<String>>,
    assignees: Option<Vec<String>>,
    description: Option<String>,
}

impl TaskOverrides {
    /// Creates overrides that keep every template default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the task name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the due date; templates carry none.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Overrides the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Overrides the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    /// Overrides the assignees.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = String>) -> Self {
        self.assignees = Some(assignees.into_iter().collect());
        self
    }

    /// Overrides the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Reusable blueprint for pre-filled tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    id: TemplateId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    default_priority: Priority,
    #[serde(default)]
    default_tags: Vec<String>,
    #[serde(default)]
    default_assignees: Vec<String>,
    #[serde(default)]
    subtask_templates: Vec<SubtaskTemplate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Template {
    /// Creates a template.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the template name or a subtask
    /// blueprint name is shorter than three characters.
    pub fn new(request: NewTemplate, clock: &impl Clock) -> Result<Self, ValidationError> {
        let NewTemplate {
            name,
            description,
            default_priority,
            default_tags,
            default_assignees,
            subtask_templates,
        } = request;
        let timestamp = clock.utc();

        Ok(Self {
            id: TemplateId::new(),
            name: require_min_len("name", name, MIN_NAME_LEN)?,
            description: description.trim().to_owned(),
            default_priority,
            default_tags: clean_list(default_tags),
            default_assignees: clean_list(default_assignees),
            subtask_templates: validate_blueprints(subtask_templates)?,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the template identifier.
    #[must_use]
    pub const fn id(&self) -> TemplateId {
        self.id
    }

    /// Returns the template name, used as the default task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description copied into produced tasks.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the default priority.
    #[must_use]
    pub const fn default_priority(&self) -> Priority {
        self.default_priority
    }

    /// Returns the default tags.
    #[must_use]
    pub fn default_tags(&self) -> &[String] {
        &self.default_tags
    }

    /// Returns the default assignees.
    #[must_use]
    pub fn default_assignees(&self) -> &[String] {
        &self.default_assignees
    }

    /// Returns the subtask blueprints.
    #[must_use]
    pub fn subtask_templates(&self) -> &[SubtaskTemplate] {
        &self.subtask_templates
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

    /// Applies a partial update.
    ///
    /// Every field is validated before any is written, so a rejected update
    /// leaves the template unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when a new name or blueprint name is too
    /// short.
    pub fn apply_update(
        &mut self,
        update: TemplateUpdate,
        clock: &impl Clock,
    ) -> Result<(), ValidationError> {
        let TemplateUpdate {
            name,
            description,
            default_priority,
            default_tags,
            default_assignees,
            subtask_templates,
        } = update;

        let new_name = name
            .map(|value| require_min_len("name", value, MIN_NAME_LEN))
            .transpose()?;
        let new_blueprints = subtask_templates.map(validate_blueprints).transpose()?;

        if let Some(value) = new_name {
            self.name = value;
        }
        if let Some(value) = description {
            self.description = value.trim().to_owned();
        }
        if let Some(value) = default_priority {
            self.default_priority = value;
        }
        if let Some(value) = default_tags {
            self.default_tags = clean_list(value);
        }
        if let Some(value) = default_assignees {
            self.default_assignees = clean_list(value);
        }
        if let Some(value) = new_blueprints {
            self.subtask_templates = value;
        }
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Produces a new task from the template defaults and `overrides`.
    ///
    /// Tags and assignees are copied, so later edits to the task never reach
    /// the template. Each subtask blueprint becomes a subtask sharing the
    /// task's due date.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::Validation`] when an overridden name is
    /// too short.
    pub fn instantiate(
        &self,
        overrides: TaskOverrides,
        clock: &impl Clock,
    ) -> Result<Task, WorkspaceDomainError> {
        let TaskOverrides {
            name,
            due_date,
            priority,
            tags,
            assignees,
            description,
        } = overrides;

        let request = NewTask::new(name.unwrap_or_else(|| self.name.clone()))
            .with_optional_due_date(due_date)
            .with_priority(priority.unwrap_or(self.default_priority))
            .with_tags(tags.unwrap_or_else(|| self.default_tags.clone()))
            .with_assignees(assignees.unwrap_or_else(|| self.default_assignees.clone()))
            .with_description(description.unwrap_or_else(|| self.description.clone()));
        let mut task = Task::new(request, clock)?;

        for blueprint in &self.subtask_templates {
            let subtask = NewTask::new(blueprint.name.clone())
                .with_optional_due_date(task.due_date())
                .with_priority(blueprint.priority.unwrap_or(task.priority()))
                .with_tags(blueprint.tags.clone())
                .with_description(blueprint.description.clone());
            task.add_subtask(subtask, clock)?;
        }
        Ok(task)
    }
}

fn validate_blueprints(
    blueprints: Vec<SubtaskTemplate>,
) -> Result<Vec<SubtaskTemplate>, ValidationError> {
    blueprints
        .into_iter()
        .map(SubtaskTemplate::validated)
        .collect()
}
