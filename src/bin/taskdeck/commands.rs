//! Command handlers.

use crate::{
    app::App,
    cli::{
        BackupCommand, Command, TaskCommand, TaskEdit, TaskFields, TemplateCommand,
        TransferFormat, WorkspaceCommand,
    },
    dates::{DayBoundary, parse_date_input},
    render::Renderer,
};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use std::io::Write;
use taskdeck::workspace::{
    adapters::spreadsheet,
    domain::{
        NewTask, NewTemplate, Priority, SubtaskTemplate, Task, TaskId, TaskOverrides,
        TaskStatus, TaskUpdate, TemplateUpdate, Workspace,
    },
};
use tracing::info;

/// Runs one parsed command.
pub async fn run<W: Write>(app: &App, command: Command, out: &mut Renderer<W>) -> Result<()> {
    match command {
        Command::Workspace(action) => run_workspace(app, action, out).await,
        Command::Task(action) => run_task(app, action, out).await,
        Command::Template(action) => run_template(app, action, out).await,
        Command::Dashboard => {
            let report = app.dashboard.build_dashboard(app.workspace_id()?).await?;
            Ok(out.dashboard(&report)?)
        }
        Command::Backup(action) => run_backup(app, action, out).await,
    }
}

async fn run_workspace<W: Write>(
    app: &App,
    command: WorkspaceCommand,
    out: &mut Renderer<W>,
) -> Result<()> {
    match command {
        WorkspaceCommand::Create { name, activate } => {
            let workspace = app.workspaces.create_workspace(&name).await?;
            if activate {
                app.session.activate(workspace.id())?;
            }
            out.line(&format!("created workspace {} {}", workspace.id(), workspace.name()))?;
        }
        WorkspaceCommand::List => {
            let workspaces = app.workspaces.list_workspaces().await?;
            out.workspaces(&workspaces, app.session.active()?)?;
        }
        WorkspaceCommand::Show => {
            let workspace = app.workspaces.get_workspace(app.workspace_id()?).await?;
            out.workspace(&workspace)?;
        }
        WorkspaceCommand::Rename { name } => {
            let workspace = app
                .workspaces
                .rename_workspace(app.workspace_id()?, &name)
                .await?;
            out.line(&format!("renamed workspace {} to {}", workspace.id(), workspace.name()))?;
        }
        WorkspaceCommand::Delete { id } => {
            app.workspaces.delete_workspace(id).await?;
            if app.session.active()? == Some(id) {
                app.session.clear()?;
            }
            out.line(&format!("deleted workspace {id}"))?;
        }
        WorkspaceCommand::Use { id } => {
            let workspace = app.workspaces.get_workspace(id).await?;
            app.session.activate(id)?;
            out.line(&format!("active workspace is now {} {}", id, workspace.name()))?;
        }
        WorkspaceCommand::Export { output, format } => {
            let workspace = app.workspaces.get_workspace(app.workspace_id()?).await?;
            let encoded = encode_workspace(&workspace, format)?;
            match output {
                Some(path) => {
                    // Export paths are arbitrary user paths outside the data
                    // directory capability, so they go through std::fs.
                    std::fs::write(&path, encoded).with_context(|| format!("write {path}"))?;
                    info!(workspace_id = %workspace.id(), %path, ?format, "exported workspace");
                    out.line(&format!("exported workspace {} to {path}", workspace.id()))?;
                }
                None => out.raw(encoded.trim_end())?,
            }
        }
        WorkspaceCommand::Import { path, format, name } => {
            // Like export, the source is a user path outside the data directory.
            let contents =
                std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
            let workspace = decode_workspace(app, &contents, format, name.as_deref())
                .with_context(|| format!("{path} is not an exported workspace"))?;
            let imported = app.workspaces.import_workspace(workspace).await?;
            out.line(&format!(
                "imported workspace {} {}",
                imported.id(),
                imported.name()
            ))?;
        }
    }
    Ok(())
}

async fn run_task<W: Write>(app: &App, command: TaskCommand, out: &mut Renderer<W>) -> Result<()> {
    let workspace_id = app.workspace_id()?;
    match command {
        TaskCommand::Add(fields) => {
            let task = app
                .tasks
                .create_task(workspace_id, new_task(app, fields)?)
                .await?;
            out.line(&format!("created task {} {}", task.id(), task.name()))?;
        }
        TaskCommand::List {
            status,
            priority,
            on,
            from,
            days,
            overdue,
        } => {
            let mut tasks = if let Some(date) = on {
                app.tasks.tasks_on_date(workspace_id, date).await?
            } else if let Some(start) = from {
                let start_at = parse_date_input(&start, app.offset, DayBoundary::Start)?;
                app.tasks
                    .tasks_by_date_range(workspace_id, start_at, days)
                    .await?
            } else if overdue {
                app.tasks.overdue_tasks(workspace_id).await?
            } else if let Some(level) = priority {
                app.tasks.tasks_by_priority(workspace_id, level).await?
            } else {
                app.tasks.list_tasks(workspace_id).await?
            };
            retain_matching(&mut tasks, status, priority);
            out.tasks(&tasks)?;
        }
        TaskCommand::Show { id } => {
            let task = app.tasks.get_task(workspace_id, id).await?;
            out.task(&task)?;
        }
        TaskCommand::Edit(edit) => {
            let (id, update) = task_update(app, edit)?;
            if update.is_empty() {
                out.line("nothing to update")?;
                return Ok(());
            }
            let task = app.tasks.update_task(workspace_id, id, update).await?;
            out.line(&format!("updated task {} {}", task.id(), task.name()))?;
        }
        TaskCommand::Status { id, status } => {
            let task = app.tasks.update_status(workspace_id, id, status).await?;
            out.line(&format!("task {} is now {}", task.id(), task.status()))?;
        }
        TaskCommand::Block { id, description } => {
            let blocker_id = app.tasks.add_blocker(workspace_id, id, &description).await?;
            out.line(&format!("task {id} blocked by {blocker_id}"))?;
        }
        TaskCommand::Unblock { id, blocker } => {
            let task = app.tasks.remove_blocker(workspace_id, id, blocker).await?;
            out.line(&format!("removed blocker {blocker}; task {id} is {}", task.status()))?;
        }
        TaskCommand::Comment { id, text } => {
            let task = app.tasks.add_comment(workspace_id, id, &text).await?;
            out.line(&format!("task {id} has {} comments", task.comments().len()))?;
        }
        TaskCommand::Subtask { parent, fields } => {
            let subtask = app
                .tasks
                .add_subtask(workspace_id, parent, new_task(app, fields)?)
                .await?;
            out.line(&format!("created subtask {} under {parent}", subtask.id()))?;
        }
        TaskCommand::Delete { id } => {
            let removed = app.tasks.delete_task(workspace_id, id).await?;
            out.line(&format!(
                "deleted task {} with {} subtasks",
                removed.id(),
                removed.subtasks().len()
            ))?;
        }
    }
    Ok(())
}

async fn run_template<W: Write>(
    app: &App,
    command: TemplateCommand,
    out: &mut Renderer<W>,
) -> Result<()> {
    let workspace_id = app.workspace_id()?;
    match command {
        TemplateCommand::Add {
            name,
            description,
            priority,
            tags,
            assignees,
            subtasks,
        } => {
            let request = NewTemplate::new(name)
                .with_description(description)
                .with_default_priority(priority)
                .with_default_tags(tags)
                .with_default_assignees(assignees)
                .with_subtask_templates(subtasks.into_iter().map(SubtaskTemplate::new));
            let template = app.templates.create_template(workspace_id, request).await?;
            out.line(&format!("created template {} {}", template.id(), template.name()))?;
        }
        TemplateCommand::List => {
            let templates = app.templates.list_templates(workspace_id).await?;
            out.templates(&templates)?;
        }
        TemplateCommand::Show { id } => {
            let template = app.templates.get_template(workspace_id, id).await?;
            out.template(&template)?;
        }
        TemplateCommand::Update {
            id,
            name,
            description,
            priority,
            tags,
            assignees,
            subtasks,
        } => {
            let mut update = TemplateUpdate::new();
            if let Some(value) = name {
                update = update.with_name(value);
            }
            if let Some(value) = description {
                update = update.with_description(value);
            }
            if let Some(value) = priority {
                update = update.with_default_priority(value);
            }
            if let Some(value) = tags {
                update = update.with_default_tags(value);
            }
            if let Some(value) = assignees {
                update = update.with_default_assignees(value);
            }
            if let Some(value) = subtasks {
                update = update.with_subtask_templates(value.into_iter().map(SubtaskTemplate::new));
            }
            if update.is_empty() {
                out.line("nothing to update")?;
                return Ok(());
            }
            let template = app.templates.update_template(workspace_id, id, update).await?;
            out.line(&format!("updated template {}", template.id()))?;
        }
        TemplateCommand::Delete { id } => {
            let removed = app.templates.delete_template(workspace_id, id).await?;
            out.line(&format!("deleted template {} {}", removed.id(), removed.name()))?;
        }
        TemplateCommand::Use {
            id,
            name,
            due,
            priority,
            tags,
            assignees,
            description,
        } => {
            let mut overrides = TaskOverrides::new();
            if let Some(value) = name {
                overrides = overrides.with_name(value);
            }
            if let Some(value) = parse_due(app, due.as_deref())? {
                overrides = overrides.with_due_date(value);
            }
            if let Some(value) = priority {
                overrides = overrides.with_priority(value);
            }
            if let Some(value) = tags {
                overrides = overrides.with_tags(value);
            }
            if let Some(value) = assignees {
                overrides = overrides.with_assignees(value);
            }
            if let Some(value) = description {
                overrides = overrides.with_description(value);
            }
            let task = app
                .templates
                .create_task_from_template(workspace_id, id, overrides)
                .await?;
            out.line(&format!(
                "created task {} {} with {} subtasks",
                task.id(),
                task.name(),
                task.subtasks().len()
            ))?;
        }
    }
    Ok(())
}

async fn run_backup<W: Write>(
    app: &App,
    command: BackupCommand,
    out: &mut Renderer<W>,
) -> Result<()> {
    match command {
        BackupCommand::List => {
            let names = app.store.list_backups().await?;
            out.backups(&names)?;
        }
        BackupCommand::Restore { name } => {
            app.store.restore_backup(&name).await?;
            out.line(&format!("restored {name}"))?;
        }
    }
    Ok(())
}

fn new_task(app: &App, fields: TaskFields) -> Result<NewTask> {
    let TaskFields {
        name,
        due,
        priority,
        assignees,
        tags,
        description,
    } = fields;
    Ok(NewTask::new(name)
        .with_optional_due_date(parse_due(app, due.as_deref())?)
        .with_priority(priority)
        .with_assignees(assignees)
        .with_tags(tags)
        .with_description(description))
}

fn task_update(app: &App, edit: TaskEdit) -> Result<(TaskId, TaskUpdate)> {
    let TaskEdit {
        id,
        name,
        description,
        due,
        clear_due,
        priority,
        tags,
        assignees,
    } = edit;
    let mut update = TaskUpdate::new();
    if let Some(value) = name {
        update = update.with_name(value);
    }
    if let Some(value) = description {
        update = update.with_description(value);
    }
    if let Some(value) = parse_due(app, due.as_deref())? {
        update = update.with_due_date(value);
    }
    if clear_due {
        update = update.without_due_date();
    }
    if let Some(value) = priority {
        update = update.with_priority(value);
    }
    if let Some(value) = tags {
        update = update.with_tags(value);
    }
    if let Some(value) = assignees {
        update = update.with_assignees(value);
    }
    Ok((id, update))
}

fn encode_workspace(workspace: &Workspace, format: TransferFormat) -> Result<String> {
    match format {
        TransferFormat::Json => {
            serde_json::to_string_pretty(workspace).context("encode workspace")
        }
        TransferFormat::Csv => {
            let mut buffer = Vec::new();
            spreadsheet::write_tasks(workspace, &mut buffer).context("encode tasks as CSV")?;
            String::from_utf8(buffer).context("CSV output is not UTF-8")
        }
    }
}

fn decode_workspace(
    app: &App,
    contents: &str,
    format: TransferFormat,
    name: Option<&str>,
) -> Result<Workspace> {
    match format {
        TransferFormat::Json => {
            if name.is_some() {
                bail!("--name only applies to CSV imports");
            }
            Ok(serde_json::from_str(contents)?)
        }
        TransferFormat::Csv => Ok(spreadsheet::read_workspace(
            contents.as_bytes(),
            name.unwrap_or(spreadsheet::DEFAULT_IMPORT_NAME),
            &app.clock,
        )?),
    }
}

fn parse_due(app: &App, due: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    due.map(|raw| parse_date_input(raw, app.offset, DayBoundary::End))
        .transpose()
}

fn retain_matching(
    tasks: &mut Vec<Task>,
    status: Option<TaskStatus>,
    priority: Option<Priority>,
) {
    tasks.retain(|task| {
        status.is_none_or(|wanted| task.status() == wanted)
            && priority.is_none_or(|wanted| task.priority() == wanted)
    });
}
