//! CSV export and import of a workspace's top-level tasks.
//!
//! One row per top-level task with the columns `id`, `name`, `status`,
//! `priority`, `dueDate`, `assignees` and `tags`. List columns are joined
//! with `;`. Subtasks, comments, blockers and templates have no columns and
//! are left out of the export.

use crate::workspace::domain::{
    NewTask, ParseIdError, Priority, Task, TaskId, TaskStatus, ValidationError, Workspace,
    WorkspaceDomainError,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Header row written before the task rows.
pub const COLUMNS: [&str; 7] = [
    "id",
    "name",
    "status",
    "priority",
    "dueDate",
    "assignees",
    "tags",
];

/// Name given to a workspace imported from CSV when none is supplied.
pub const DEFAULT_IMPORT_NAME: &str = "Imported Workspace";

const LIST_SEPARATOR: &str = ";";

/// Errors raised while reading or writing task CSV.
#[derive(Debug, Error)]
pub enum TaskCsvError {
    /// The CSV could not be read, written, or deserialised.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A row's `id` column is not a task identifier.
    #[error("row {row}: {source}")]
    Id {
        /// One-based data row number.
        row: usize,
        /// Parse failure.
        #[source]
        source: ParseIdError,
    },

    /// A row describes a task the domain rejects.
    #[error("row {row}: {source}")]
    Task {
        /// One-based data row number.
        row: usize,
        /// Domain rejection.
        #[source]
        source: WorkspaceDomainError,
    },

    /// The workspace name is blank.
    #[error(transparent)]
    Name(#[from] ValidationError),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRow {
    #[serde(default)]
    id: String,
    name: String,
    status: TaskStatus,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    assignees: String,
    #[serde(default)]
    tags: String,
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id().to_string(),
            name: task.name().to_owned(),
            status: task.status(),
            priority: Some(task.priority()),
            due_date: task.due_date(),
            assignees: task.assignees().join(LIST_SEPARATOR),
            tags: task.tags().join(LIST_SEPARATOR),
        }
    }

    fn into_task(self, row: usize, clock: &impl Clock) -> Result<Task, TaskCsvError> {
        let id = if self.id.is_empty() {
            TaskId::new()
        } else {
            self.id
                .parse::<TaskId>()
                .map_err(|source| TaskCsvError::Id { row, source })?
        };
        let request = NewTask::new(self.name)
            .with_priority(self.priority.unwrap_or_default())
            .with_optional_due_date(self.due_date)
            .with_assignees(split_list(&self.assignees))
            .with_tags(split_list(&self.tags));
        Task::from_record(id, self.status, request, clock).map_err(|source| TaskCsvError::Task {
            row,
            source: source.into(),
        })
    }
}

fn split_list(joined: &str) -> Vec<String> {
    joined.split(LIST_SEPARATOR).map(str::to_owned).collect()
}

/// Writes the workspace's top-level tasks as CSV, header first.
///
/// # Errors
///
/// Returns [`TaskCsvError::Csv`] when `writer` fails.
pub fn write_tasks<W: io::Write>(workspace: &Workspace, writer: W) -> Result<(), TaskCsvError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(COLUMNS)?;
    for task in workspace.tasks() {
        csv_writer.serialize(TaskRow::from_task(task))?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Builds a new workspace named `name` with one top-level task per row.
///
/// Rows keep a filled `id` column as the task identifier and get a fresh
/// one when it is empty. Statuses are taken as recorded.
///
/// # Errors
///
/// Returns [`TaskCsvError::Name`] for a blank workspace name,
/// [`TaskCsvError::Csv`] for malformed rows, and [`TaskCsvError::Id`] or
/// [`TaskCsvError::Task`] when a row cannot become a task.
pub fn read_workspace<R: io::Read>(
    reader: R,
    name: &str,
    clock: &impl Clock,
) -> Result<Workspace, TaskCsvError> {
    let mut workspace = Workspace::new(name, clock)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    for (index, record) in csv_reader.deserialize::<TaskRow>().enumerate() {
        let row = index + 1;
        let task = record?.into_task(row, clock)?;
        workspace
            .add_task(task, clock)
            .map_err(|source| TaskCsvError::Task { row, source })?;
    }
    Ok(workspace)
}
