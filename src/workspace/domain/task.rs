//! Task entity, blockers, and comments.

use super::{
    BlockerId, Priority, TaskId, TaskStatus, ValidationError, WorkspaceDomainError,
    validation::{MIN_BLOCKER_LEN, MIN_NAME_LEN, clean_list, require_min_len, require_non_empty},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A note marking a task as stalled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blocker {
    id: BlockerId,
    description: String,
    created_at: DateTime<Utc>,
}

impl Blocker {
    /// Returns the blocker identifier.
    #[must_use]
    pub const fn id(&self) -> BlockerId {
        self.id
    }

    /// Returns the blocker description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns when the blocker was added.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A free-text comment on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    text: String,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Returns the comment text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns when the comment was added.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    name: String,
    due_date: Option<DateTime<Utc>>,
    assignees: Vec<String>,
    priority: Priority,
    tags: Vec<String>,
    description: String,
}

impl NewTask {
    /// Creates a request with the required task name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            due_date: None,
            assignees: Vec::new(),
            priority: Priority::default(),
            tags: Vec::new(),
            description: String::new(),
        }
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_optional_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Sets the assignees.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = String>) -> Self {
        self.assignees = assignees.into_iter().collect();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Changes to an existing task. Omitted fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    name: Option<String>,
    description: Option<String>,
    due_date: Option<Option<DateTime<Utc>>>,
    priority: Option<Priority>,
    assignees: Option<Vec<String>>,
    tags: Option<Vec<String>>,
}

impl TaskUpdate {
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

    /// Moves the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(Some(due_date));
        self
    }

    /// Clears the due date.
    #[must_use]
    pub const fn without_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the assignees.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = String>) -> Self {
        self.assignees = Some(assignees.into_iter().collect());
        self
    }

    /// Replaces the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    /// Returns whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.assignees.is_none()
            && self.tags.is_none()
    }
}

/// A unit of work inside a workspace.
///
/// A subtask is a task whose `parent_id` names the task owning it in its
/// `subtasks` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: String,
    due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    assignees: Vec<String>,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    description: String,
    status: TaskStatus,
    #[serde(default)]
    subtasks: Vec<Task>,
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(default)]
    blockers: Vec<Blocker>,
    parent_id: Option<TaskId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task in the [`TaskStatus::Backlog`] status.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the trimmed name is shorter than
    /// three characters.
    pub fn new(request: NewTask, clock: &impl Clock) -> Result<Self, ValidationError> {
        Self::build(request, None, clock)
    }

    fn build(
        request: NewTask,
        parent_id: Option<TaskId>,
        clock: &impl Clock,
    ) -> Result<Self, ValidationError> {
        let NewTask {
            name,
            due_date,
            assignees,
            priority,
            tags,
            description,
        } = request;
        let timestamp = clock.utc();

        Ok(Self {
            id: TaskId::new(),
            name: require_min_len("name", name, MIN_NAME_LEN)?,
            due_date,
            assignees: clean_list(assignees),
            priority,
            tags: clean_list(tags),
            description: description.trim().to_owned(),
            status: TaskStatus::Backlog,
            subtasks: Vec::new(),
            comments: Vec::new(),
            blockers: Vec::new(),
            parent_id,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Rebuilds a top-level task from a flat record, such as a CSV row,
    /// keeping the recorded identifier and status. Subtasks, comments and
    /// blockers start empty.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the trimmed name is shorter than
    /// three characters.
    pub fn from_record(
        id: TaskId,
        status: TaskStatus,
        request: NewTask,
        clock: &impl Clock,
    ) -> Result<Self, ValidationError> {
        let mut task = Self::build(request, None, clock)?;
        task.id = id;
        task.status = status;
        Ok(task)
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the assignees in insertion order.
    #[must_use]
    pub fn assignees(&self) -> &[String] {
        &self.assignees
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the tags in insertion order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the direct subtasks.
    #[must_use]
    pub fn subtasks(&self) -> &[Self] {
        &self.subtasks
    }

    /// Returns the comments, oldest first.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Returns the active blockers, oldest first.
    #[must_use]
    pub fn blockers(&self) -> &[Blocker] {
        &self.blockers
    }

    /// Returns the owning task for subtasks.
    #[must_use]
    pub const fn parent_id(&self) -> Option<TaskId> {
        self.parent_id
    }

    /// Returns whether this task is a subtask of another task.
    #[must_use]
    pub const fn is_subtask(&self) -> bool {
        self.parent_id.is_some()
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

    /// Moves the task to `target` along the status state machine.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::InvalidTransition`] when `target` is
    /// not a successor of the current status; the task is left unchanged.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), WorkspaceDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(WorkspaceDomainError::InvalidTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Adds a blocker and forces the task into [`TaskStatus::Blocked`].
    ///
    /// The status change bypasses the transition table and applies from any
    /// status, [`TaskStatus::Done`] included.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::Validation`] when the trimmed
    /// description is shorter than five characters.
    pub fn add_blocker(
        &mut self,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<BlockerId, WorkspaceDomainError> {
        let blocker = Blocker {
            id: BlockerId::new(),
            description: require_min_len("blocker description", description, MIN_BLOCKER_LEN)?,
            created_at: clock.utc(),
        };
        let blocker_id = blocker.id;
        self.blockers.push(blocker);
        self.status = TaskStatus::Blocked;
        self.touch(clock);
        Ok(blocker_id)
    }

    /// Removes a blocker, returning it.
    ///
    /// When the last blocker goes and the task is blocked, the task returns
    /// to [`TaskStatus::InProgress`]. Any other status is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::BlockerNotFound`] when the task has no
    /// blocker with `blocker_id`; the blocker list is left unchanged.
    pub fn remove_blocker(
        &mut self,
        blocker_id: BlockerId,
        clock: &impl Clock,
    ) -> Result<Blocker, WorkspaceDomainError> {
        let index = self
            .blockers
            .iter()
            .position(|blocker| blocker.id == blocker_id)
            .ok_or(WorkspaceDomainError::BlockerNotFound {
                task_id: self.id,
                blocker_id,
            })?;
        let removed = self.blockers.remove(index);
        if self.blockers.is_empty() && self.status == TaskStatus::Blocked {
            self.status = TaskStatus::InProgress;
        }
        self.touch(clock);
        Ok(removed)
    }

    /// Appends a comment.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::Validation`] when the text is blank.
    pub fn add_comment(
        &mut self,
        text: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), WorkspaceDomainError> {
        self.comments.push(Comment {
            text: require_non_empty("comment", text)?,
            created_at: clock.utc(),
        });
        self.touch(clock);
        Ok(())
    }

    /// Creates a subtask owned by this task and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::Validation`] when the subtask name is
    /// too short.
    pub fn add_subtask(
        &mut self,
        request: NewTask,
        clock: &impl Clock,
    ) -> Result<TaskId, WorkspaceDomainError> {
        let subtask = Self::build(request, Some(self.id), clock)?;
        let subtask_id = subtask.id;
        self.subtasks.push(subtask);
        self.touch(clock);
        Ok(subtask_id)
    }

    /// Adds a tag unless it is already present. Returns whether it was added.
    pub fn add_tag(&mut self, tag: impl Into<String>, clock: &impl Clock) -> bool {
        let raw = tag.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || self.tags.iter().any(|existing| existing == trimmed) {
            return false;
        }
        self.tags.push(trimmed.to_owned());
        self.touch(clock);
        true
    }

    /// Removes a tag. Returns whether it was present.
    pub fn remove_tag(&mut self, tag: &str, clock: &impl Clock) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag.trim());
        let removed = self.tags.len() != before;
        if removed {
            self.touch(clock);
        }
        removed
    }

    /// Replaces the assignees.
    pub fn set_assignees(&mut self, assignees: impl IntoIterator<Item = String>, clock: &impl Clock) {
        self.assignees = clean_list(assignees);
        self.touch(clock);
    }

    /// Sets or clears the due date.
    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>, clock: &impl Clock) {
        self.due_date = due_date;
        self.touch(clock);
    }

    /// Sets the priority.
    pub fn set_priority(&mut self, priority: Priority, clock: &impl Clock) {
        self.priority = priority;
        self.touch(clock);
    }

    /// Applies `update`. The name is validated before any field changes, so
    /// a rejected update leaves the task untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when a new name is shorter than three
    /// characters.
    pub fn apply_update(
        &mut self,
        update: TaskUpdate,
        clock: &impl Clock,
    ) -> Result<(), ValidationError> {
        let TaskUpdate {
            name,
            description,
            due_date,
            priority,
            assignees,
            tags,
        } = update;
        let new_name = name
            .map(|value| require_min_len("name", value, MIN_NAME_LEN))
            .transpose()?;

        if let Some(value) = new_name {
            self.name = value;
        }
        if let Some(value) = description {
            self.description = value.trim().to_owned();
        }
        if let Some(value) = due_date {
            self.set_due_date(value, clock);
        }
        if let Some(value) = priority {
            self.set_priority(value, clock);
        }
        if let Some(value) = assignees {
            self.set_assignees(value, clock);
        }
        if let Some(value) = tags {
            self.tags = clean_list(value);
        }
        self.touch(clock);
        Ok(())
    }

    /// Returns this task or one of its descendants by identifier.
    #[must_use]
    pub fn find(&self, id: TaskId) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.subtasks.iter().find_map(|subtask| subtask.find(id))
    }

    /// Mutable counterpart of [`Task::find`].
    pub fn find_mut(&mut self, id: TaskId) -> Option<&mut Self> {
        if self.id == id {
            return Some(self);
        }
        self.subtasks
            .iter_mut()
            .find_map(|subtask| subtask.find_mut(id))
    }

    pub(super) const fn subtasks_mut(&mut self) -> &mut Vec<Self> {
        &mut self.subtasks
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
