//! Template management and instantiation service.

use super::{
    WorkspaceServiceResult,
    unit_of_work::{load, modify},
};
use crate::workspace::{
    domain::{
        NewTemplate, Task, TaskOverrides, Template, TemplateId, TemplateUpdate,
        WorkspaceDomainError, WorkspaceId,
    },
    ports::WorkspaceRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Manages templates and produces tasks from them.
#[derive(Clone)]
pub struct TemplateService<R, C>
where
    R: WorkspaceRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TemplateService<R, C>
where
    R: WorkspaceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new template service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a template in a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceServiceError::Domain`] when the template
    /// fails validation.
    pub async fn create_template(
        &self,
        workspace_id: WorkspaceId,
        request: NewTemplate,
    ) -> WorkspaceServiceResult<Template> {
        let clock = &*self.clock;
        let template = modify(&*self.repository, workspace_id, |workspace| {
            let template = Template::new(request, clock)?;
            workspace.add_template(template.clone(), clock);
            Ok(template)
        })
        .await?;
        info!(%workspace_id, template_id = %template.id(), name = template.name(), "created template");
        Ok(template)
    }

    /// Returns the templates of a workspace in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceServiceError::WorkspaceNotFound`] for unknown
    /// workspaces.
    pub async fn list_templates(
        &self,
        workspace_id: WorkspaceId,
    ) -> WorkspaceServiceResult<Vec<Template>> {
        let workspace = load(&*self.repository, workspace_id).await?;
        debug!(%workspace_id, count = workspace.templates().len(), "listed templates");
        Ok(workspace.templates().to_vec())
    }

    /// Returns one template.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::TemplateNotFound`] wrapped in
    /// [`super::WorkspaceServiceError::Domain`] for unknown templates.
    pub async fn get_template(
        &self,
        workspace_id: WorkspaceId,
        template_id: TemplateId,
    ) -> WorkspaceServiceResult<Template> {
        let workspace = load(&*self.repository, workspace_id).await?;
        let template = workspace
            .template(template_id)
            .cloned()
            .ok_or(WorkspaceDomainError::TemplateNotFound(template_id))?;
        Ok(template)
    }

    /// Applies a partial update to a template.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceServiceError::Domain`] when the template is
    /// missing or an updated field fails validation.
    pub async fn update_template(
        &self,
        workspace_id: WorkspaceId,
        template_id: TemplateId,
        update: TemplateUpdate,
    ) -> WorkspaceServiceResult<Template> {
        let clock = &*self.clock;
        let template = modify(&*self.repository, workspace_id, |workspace| {
            Ok(workspace.update_template(template_id, clock, |template| {
                template.apply_update(update, clock)?;
                Ok(template.clone())
            })?)
        })
        .await?;
        info!(%workspace_id, %template_id, "updated template");
        Ok(template)
    }

    /// Deletes a template. Tasks produced from it are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::TemplateNotFound`] wrapped in
    /// [`super::WorkspaceServiceError::Domain`] for unknown templates.
    pub async fn delete_template(
        &self,
        workspace_id: WorkspaceId,
        template_id: TemplateId,
    ) -> WorkspaceServiceResult<Template> {
        let clock = &*self.clock;
        let removed = modify(&*self.repository, workspace_id, |workspace| {
            Ok(workspace.remove_template(template_id, clock)?)
        })
        .await?;
        info!(%workspace_id, %template_id, "deleted template");
        Ok(removed)
    }

    /// Produces a task from a template and appends it to the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::TemplateNotFound`] wrapped in
    /// [`super::WorkspaceServiceError::Domain`] for unknown templates, or a
    /// validation error when an overridden name is too short.
    pub async fn create_task_from_template(
        &self,
        workspace_id: WorkspaceId,
        template_id: TemplateId,
        overrides: TaskOverrides,
    ) -> WorkspaceServiceResult<Task> {
        let clock = &*self.clock;
        let task = modify(&*self.repository, workspace_id, |workspace| {
            let template = workspace
                .template(template_id)
                .ok_or(WorkspaceDomainError::TemplateNotFound(template_id))?;
            let task = template.instantiate(overrides, clock)?;
            workspace.add_task(task.clone(), clock)?;
            Ok(task)
        })
        .await?;
        info!(
            %workspace_id,
            %template_id,
            task_id = %task.id(),
            subtasks = task.subtasks().len(),
            "created task from template"
        );
        Ok(task)
    }
}
