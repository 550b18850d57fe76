//! Task orchestration service.

use super::{
    WorkspaceServiceResult,
    unit_of_work::{load, modify},
};
use crate::{
    dashboard::domain::TemporalQuery,
    workspace::{
        domain::{
            BlockerId, NewTask, Priority, Task, TaskId, TaskStatus, TaskUpdate,
            WorkspaceDomainError, WorkspaceId,
        },
        ports::WorkspaceRepository,
    },
};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Creates, transitions, and queries tasks inside a workspace.
#[derive(Clone)]
pub struct TaskService<R, C>
where
    R: WorkspaceRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    offset: FixedOffset,
}

impl<R, C> TaskService<R, C>
where
    R: WorkspaceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a task service whose calendar days are UTC days.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            offset: Utc.fix(),
        }
    }

    /// Sets the offset that defines calendar days for date queries.
    #[must_use]
    pub const fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Creates a top-level task.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceServiceError::WorkspaceNotFound`] for unknown
    /// workspaces and [`super::WorkspaceServiceError::Domain`] when the task
    /// fails validation.
    pub async fn create_task(
        &self,
        workspace_id: WorkspaceId,
        request: NewTask,
    ) -> WorkspaceServiceResult<Task> {
        let clock = &*self.clock;
        let task = modify(&*self.repository, workspace_id, |workspace| {
            let task = Task::new(request, clock)?;
            workspace.add_task(task.clone(), clock)?;
            Ok(task)
        })
        .await?;
        info!(%workspace_id, task_id = %task.id(), name = task.name(), "created task");
        Ok(task)
    }

    /// Returns a task or subtask.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::TaskNotFound`] wrapped in
    /// [`super::WorkspaceServiceError::Domain`] when the task does not exist.
    pub async fn get_task(
        &self,
        workspace_id: WorkspaceId,
        task_id: TaskId,
    ) -> WorkspaceServiceResult<Task> {
        let workspace = load(&*self.repository, workspace_id).await?;
        let task = workspace
            .task(task_id)
            .cloned()
            .ok_or(WorkspaceDomainError::TaskNotFound(task_id))?;
        Ok(task)
    }

    /// Returns the top-level tasks in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceServiceError::WorkspaceNotFound`] for unknown
    /// workspaces.
    pub async fn list_tasks(&self, workspace_id: WorkspaceId) -> WorkspaceServiceResult<Vec<Task>> {
        let workspace = load(&*self.repository, workspace_id).await?;
        debug!(%workspace_id, count = workspace.tasks().len(), "listed tasks");
        Ok(workspace.tasks().to_vec())
    }

    /// Moves a task along the status state machine.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::InvalidTransition`] wrapped in
    /// [`super::WorkspaceServiceError::Domain`] when the move is not allowed;
    /// nothing is saved in that case.
    pub async fn update_status(
        &self,
        workspace_id: WorkspaceId,
        task_id: TaskId,
        status: TaskStatus,
    ) -> WorkspaceServiceResult<Task> {
        let task = self
            .modify_task(workspace_id, task_id, |task, clock| {
                task.transition_to(status, clock)
            })
            .await?;
        info!(%workspace_id, %task_id, %status, "updated task status");
        Ok(task)
    }

    /// Changes a task's name, description, due date, priority, assignees or
    /// tags. Status and blockers have their own operations.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceServiceError::Domain`] when the task is
    /// missing or a new name is too short; nothing is saved in that case.
    pub async fn update_task(
        &self,
        workspace_id: WorkspaceId,
        task_id: TaskId,
        update: TaskUpdate,
    ) -> WorkspaceServiceResult<Task> {
        let task = self
            .modify_task(workspace_id, task_id, |task, clock| {
                task.apply_update(update, clock).map_err(Into::into)
            })
            .await?;
        info!(%workspace_id, %task_id, "updated task");
        Ok(task)
    }

    /// Adds a blocker, which forces the task into the blocked status.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceServiceError::Domain`] when the task is
    /// missing or the description is too short.
    pub async fn add_blocker(
        &self,
        workspace_id: WorkspaceId,
        task_id: TaskId,
        description: &str,
    ) -> WorkspaceServiceResult<BlockerId> {
        let clock = &*self.clock;
        let blocker_id = modify(&*self.repository, workspace_id, |workspace| {
            Ok(workspace.update_task(task_id, clock, |task| {
                task.add_blocker(description, clock)
            })?)
        })
        .await?;
        info!(%workspace_id, %task_id, %blocker_id, "added blocker");
        Ok(blocker_id)
    }

    /// Removes a blocker, returning the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::BlockerNotFound`] wrapped in
    /// [`super::WorkspaceServiceError::Domain`] for unknown blockers.
    pub async fn remove_blocker(
        &self,
        workspace_id: WorkspaceId,
        task_id: TaskId,
        blocker_id: BlockerId,
    ) -> WorkspaceServiceResult<Task> {
        let task = self
            .modify_task(workspace_id, task_id, |task, clock| {
                task.remove_blocker(blocker_id, clock).map(drop)
            })
            .await?;
        info!(%workspace_id, %task_id, %blocker_id, status = %task.status(), "removed blocker");
        Ok(task)
    }

    /// Appends a comment to a task.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceServiceError::Domain`] when the task is
    /// missing or the text is blank.
    pub async fn add_comment(
        &self,
        workspace_id: WorkspaceId,
        task_id: TaskId,
        text: &str,
    ) -> WorkspaceServiceResult<Task> {
        let task = self
            .modify_task(workspace_id, task_id, |task, clock| task.add_comment(text, clock))
            .await?;
        debug!(%workspace_id, %task_id, comments = task.comments().len(), "added comment");
        Ok(task)
    }

    /// Creates a subtask under `parent_id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceServiceError::Domain`] when the parent is
    /// missing or the subtask fails validation.
    pub async fn add_subtask(
        &self,
        workspace_id: WorkspaceId,
        parent_id: TaskId,
        request: NewTask,
    ) -> WorkspaceServiceResult<Task> {
        let clock = &*self.clock;
        let subtask = modify(&*self.repository, workspace_id, |workspace| {
            let subtask_id =
                workspace.update_task(parent_id, clock, |parent| parent.add_subtask(request, clock))?;
            let subtask = workspace
                .task(subtask_id)
                .cloned()
                .ok_or(WorkspaceDomainError::TaskNotFound(subtask_id))?;
            Ok(subtask)
        })
        .await?;
        info!(%workspace_id, %parent_id, task_id = %subtask.id(), "created subtask");
        Ok(subtask)
    }

    /// Deletes a task or subtask together with its own subtasks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::TaskNotFound`] wrapped in
    /// [`super::WorkspaceServiceError::Domain`] when the task does not exist.
    pub async fn delete_task(
        &self,
        workspace_id: WorkspaceId,
        task_id: TaskId,
    ) -> WorkspaceServiceResult<Task> {
        let clock = &*self.clock;
        let removed = modify(&*self.repository, workspace_id, |workspace| {
            Ok(workspace.remove_task(task_id, clock)?)
        })
        .await?;
        info!(%workspace_id, %task_id, "deleted task");
        Ok(removed)
    }

    /// Returns the tasks due on a calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceServiceError::WorkspaceNotFound`] for unknown
    /// workspaces.
    pub async fn tasks_on_date(
        &self,
        workspace_id: WorkspaceId,
        date: NaiveDate,
    ) -> WorkspaceServiceResult<Vec<Task>> {
        self.query(workspace_id, |query, tasks| query.on_date(tasks, date))
            .await
    }

    /// Returns the tasks due within `days` days of `start`, both ends
    /// included.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceServiceError::WorkspaceNotFound`] for unknown
    /// workspaces.
    pub async fn tasks_by_date_range(
        &self,
        workspace_id: WorkspaceId,
        start: DateTime<Utc>,
        days: u32,
    ) -> WorkspaceServiceResult<Vec<Task>> {
        self.query(workspace_id, |query, tasks| {
            query.by_date_range(tasks, start, days)
        })
        .await
    }

    /// Returns the tasks with exactly `priority`.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceServiceError::WorkspaceNotFound`] for unknown
    /// workspaces.
    pub async fn tasks_by_priority(
        &self,
        workspace_id: WorkspaceId,
        priority: Priority,
    ) -> WorkspaceServiceResult<Vec<Task>> {
        self.query(workspace_id, |query, tasks| {
            query.by_priority(tasks, priority)
        })
        .await
    }

    /// Returns the unfinished tasks whose due date has passed.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceServiceError::WorkspaceNotFound`] for unknown
    /// workspaces.
    pub async fn overdue_tasks(&self, workspace_id: WorkspaceId) -> WorkspaceServiceResult<Vec<Task>> {
        self.query(workspace_id, |query, tasks| query.overdue(tasks))
            .await
    }

    async fn modify_task(
        &self,
        workspace_id: WorkspaceId,
        task_id: TaskId,
        apply: impl FnOnce(&mut Task, &C) -> Result<(), WorkspaceDomainError> + Send,
    ) -> WorkspaceServiceResult<Task> {
        let clock = &*self.clock;
        modify(&*self.repository, workspace_id, |workspace| {
            workspace.update_task(task_id, clock, |task| {
                apply(task, clock)?;
                Ok(task.clone())
            })
            .map_err(Into::into)
        })
        .await
    }

    async fn query(
        &self,
        workspace_id: WorkspaceId,
        select: impl for<'t> FnOnce(&TemporalQuery, &'t [Task]) -> Vec<&'t Task> + Send,
    ) -> WorkspaceServiceResult<Vec<Task>> {
        let workspace = load(&*self.repository, workspace_id).await?;
        let query = TemporalQuery::at(&*self.clock, self.offset);
        let selected: Vec<Task> = select(&query, workspace.tasks())
            .into_iter()
            .cloned()
            .collect();
        debug!(%workspace_id, count = selected.len(), "queried tasks");
        Ok(selected)
    }
}
