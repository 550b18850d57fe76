//! Command-line grammar.

use camino::Utf8PathBuf;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use taskdeck::workspace::domain::{BlockerId, Priority, TaskId, TaskStatus, TemplateId, WorkspaceId};

/// Workspace and task manager.
#[derive(Debug, Parser)]
#[command(name = "taskdeck", version, about = "Workspace and task manager")]
pub struct Cli {
    /// Directory holding the workspace store. Defaults to `~/.taskdeck`.
    #[arg(long, global = true, env = "TASKDECK_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<Utf8PathBuf>,

    /// Workspace to operate on. Defaults to the active workspace.
    #[arg(long, short = 'w', global = true, value_name = "ID")]
    pub workspace: Option<WorkspaceId>,

    /// Log filter such as `info` or `taskdeck=debug`.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Evaluate due dates as of this RFC 3339 instant instead of now.
    #[arg(long, global = true, value_name = "INSTANT")]
    pub now: Option<DateTime<Utc>>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level command groups.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage workspaces.
    #[command(subcommand)]
    Workspace(WorkspaceCommand),
    /// Manage tasks in the selected workspace.
    #[command(subcommand)]
    Task(TaskCommand),
    /// Manage task templates in the selected workspace.
    #[command(subcommand)]
    Template(TemplateCommand),
    /// Show due-date metrics and alerts for the selected workspace.
    Dashboard,
    /// List or restore store backups.
    #[command(subcommand)]
    Backup(BackupCommand),
}

/// Workspace subcommands.
#[derive(Debug, Subcommand)]
pub enum WorkspaceCommand {
    /// Create a workspace.
    Create {
        /// Workspace name.
        name: String,
        /// Make the new workspace the active one.
        #[arg(long = "use")]
        activate: bool,
    },
    /// List workspaces.
    List,
    /// Show the selected workspace.
    Show,
    /// Rename the selected workspace.
    Rename {
        /// New name.
        name: String,
    },
    /// Delete a workspace and everything in it.
    Delete {
        /// Workspace to delete.
        id: WorkspaceId,
    },
    /// Make a workspace the active one.
    Use {
        /// Workspace to activate.
        id: WorkspaceId,
    },
    /// Write the selected workspace as JSON, or its top-level tasks as CSV.
    Export {
        /// Output file. Writes to stdout when omitted.
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<Utf8PathBuf>,
        /// File format.
        #[arg(long, short = 'f', value_enum, default_value_t = TransferFormat::Json)]
        format: TransferFormat,
    },
    /// Import a workspace previously written by `export`.
    Import {
        /// File to read.
        path: Utf8PathBuf,
        /// File format.
        #[arg(long, short = 'f', value_enum, default_value_t = TransferFormat::Json)]
        format: TransferFormat,
        /// Name of the new workspace when importing CSV.
        #[arg(long)]
        name: Option<String>,
    },
}

/// Export and import file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransferFormat {
    /// The whole workspace, as stored.
    Json,
    /// One row per top-level task.
    Csv,
}

/// Fields shared by task and subtask creation.
#[derive(Debug, Args)]
pub struct TaskFields {
    /// Task name, at least three characters.
    pub name: String,
    /// Due date as `YYYY-MM-DD` (end of that day) or RFC 3339.
    #[arg(long, value_name = "DATE")]
    pub due: Option<String>,
    /// Priority from 1 (urgent) to 5 (routine).
    #[arg(long, short = 'p', default_value = "5")]
    pub priority: Priority,
    /// Assignee. May be repeated.
    #[arg(long = "assignee", value_name = "NAME")]
    pub assignees: Vec<String>,
    /// Tag. May be repeated.
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
    /// Longer description.
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,
}

/// Fields accepted by `task edit`.
#[derive(Debug, Args)]
pub struct TaskEdit {
    /// Task or subtask identifier.
    pub id: TaskId,
    /// New name.
    #[arg(long)]
    pub name: Option<String>,
    /// New description.
    #[arg(long, short = 'd')]
    pub description: Option<String>,
    /// New due date as `YYYY-MM-DD` or RFC 3339.
    #[arg(long, value_name = "DATE", conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date.
    #[arg(long)]
    pub clear_due: bool,
    /// New priority.
    #[arg(long, short = 'p')]
    pub priority: Option<Priority>,
    /// Replacement tags.
    #[arg(long = "tag", value_name = "TAG", num_args = 0..)]
    pub tags: Option<Vec<String>>,
    /// Replacement assignees.
    #[arg(long = "assignee", value_name = "NAME", num_args = 0..)]
    pub assignees: Option<Vec<String>>,
}

/// Task subcommands.
#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Create a task.
    Add(TaskFields),
    /// List top-level tasks, optionally filtered.
    List {
        /// Only tasks with this status.
        #[arg(long)]
        status: Option<TaskStatus>,
        /// Only tasks with this priority.
        #[arg(long, short = 'p')]
        priority: Option<Priority>,
        /// Only tasks due on this calendar date.
        #[arg(long, value_name = "YYYY-MM-DD", conflicts_with_all = ["from", "overdue"])]
        on: Option<NaiveDate>,
        /// Only tasks due from this date on; see `--days`.
        #[arg(long, value_name = "DATE", conflicts_with = "overdue")]
        from: Option<String>,
        /// Length of the `--from` range in days.
        #[arg(long, default_value_t = 7, requires = "from")]
        days: u32,
        /// Only unfinished tasks past their due date.
        #[arg(long)]
        overdue: bool,
    },
    /// Show a task with its subtasks, blockers, and comments.
    Show {
        /// Task or subtask identifier.
        id: TaskId,
    },
    /// Change task fields. Omitted fields are kept.
    Edit(TaskEdit),
    /// Move a task to another status.
    Status {
        /// Task identifier.
        id: TaskId,
        /// Target status: backlog, andamento, review, concluida, bloqueada.
        status: TaskStatus,
    },
    /// Add a blocker, marking the task as blocked.
    Block {
        /// Task identifier.
        id: TaskId,
        /// What blocks the task, at least five characters.
        description: String,
    },
    /// Remove a blocker.
    Unblock {
        /// Task identifier.
        id: TaskId,
        /// Blocker identifier.
        blocker: BlockerId,
    },
    /// Comment on a task.
    Comment {
        /// Task identifier.
        id: TaskId,
        /// Comment text.
        text: String,
    },
    /// Create a subtask.
    Subtask {
        /// Parent task identifier.
        parent: TaskId,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Delete a task with its subtasks.
    Delete {
        /// Task identifier.
        id: TaskId,
    },
}

/// Template subcommands.
#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// Create a template.
    Add {
        /// Template name, used as the default task name.
        name: String,
        /// Description copied into produced tasks.
        #[arg(long, short = 'd', default_value = "")]
        description: String,
        /// Default priority.
        #[arg(long, short = 'p', default_value = "5")]
        priority: Priority,
        /// Default tag. May be repeated.
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// Default assignee. May be repeated.
        #[arg(long = "assignee", value_name = "NAME")]
        assignees: Vec<String>,
        /// Subtask produced with every task. May be repeated.
        #[arg(long = "subtask", value_name = "NAME")]
        subtasks: Vec<String>,
    },
    /// List templates.
    List,
    /// Show a template.
    Show {
        /// Template identifier.
        id: TemplateId,
    },
    /// Change template fields. Omitted fields are kept.
    Update {
        /// Template identifier.
        id: TemplateId,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New description.
        #[arg(long, short = 'd')]
        description: Option<String>,
        /// New default priority.
        #[arg(long, short = 'p')]
        priority: Option<Priority>,
        /// Replacement default tags.
        #[arg(long = "tag", value_name = "TAG", num_args = 0..)]
        tags: Option<Vec<String>>,
        /// Replacement default assignees.
        #[arg(long = "assignee", value_name = "NAME", num_args = 0..)]
        assignees: Option<Vec<String>>,
        /// Replacement subtask blueprints.
        #[arg(long = "subtask", value_name = "NAME", num_args = 0..)]
        subtasks: Option<Vec<String>>,
    },
    /// Delete a template. Tasks created from it are kept.
    Delete {
        /// Template identifier.
        id: TemplateId,
    },
    /// Create a task from a template.
    Use {
        /// Template identifier.
        id: TemplateId,
        /// Task name instead of the template name.
        #[arg(long)]
        name: Option<String>,
        /// Due date as `YYYY-MM-DD` or RFC 3339.
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
        /// Priority instead of the template default.
        #[arg(long, short = 'p')]
        priority: Option<Priority>,
        /// Tags instead of the template defaults.
        #[arg(long = "tag", value_name = "TAG", num_args = 0..)]
        tags: Option<Vec<String>>,
        /// Assignees instead of the template defaults.
        #[arg(long = "assignee", value_name = "NAME", num_args = 0..)]
        assignees: Option<Vec<String>>,
        /// Description instead of the template description.
        #[arg(long, short = 'd')]
        description: Option<String>,
    },
}

/// Backup subcommands.
#[derive(Debug, Subcommand)]
pub enum BackupCommand {
    /// List backups, newest first.
    List,
    /// Replace the store with a backup. The current state is backed up first.
    Restore {
        /// Backup file name as printed by `backup list`.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[rstest]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[rstest]
    fn parses_task_add_with_repeated_flags() -> eyre::Result<()> {
        let cli = Cli::try_parse_from([
            "taskdeck", "task", "add", "Write report", "--due", "2024-06-10", "-p", "2",
            "--tag", "docs", "--tag", "q2", "--assignee", "ana",
        ])?;
        let Command::Task(TaskCommand::Add(fields)) = cli.command else {
            eyre::bail!("expected task add");
        };
        eyre::ensure!(fields.name == "Write report", "name");
        eyre::ensure!(fields.due.as_deref() == Some("2024-06-10"), "due");
        eyre::ensure!(fields.priority == Priority::HIGH, "priority");
        eyre::ensure!(fields.tags == ["docs", "q2"], "tags");
        eyre::ensure!(fields.assignees == ["ana"], "assignees");
        Ok(())
    }

    #[rstest]
    #[case("andamento", TaskStatus::InProgress)]
    #[case("done", TaskStatus::Done)]
    fn parses_status_names_and_aliases(
        #[case] raw: &str,
        #[case] expected: TaskStatus,
    ) -> eyre::Result<()> {
        let id = TaskId::new().to_string();
        let cli = Cli::try_parse_from(["taskdeck", "task", "status", id.as_str(), raw])?;
        let Command::Task(TaskCommand::Status { status, .. }) = cli.command else {
            eyre::bail!("expected task status");
        };
        eyre::ensure!(status == expected, "parsed {status}, expected {expected}");
        Ok(())
    }

    #[rstest]
    fn parses_task_edit_with_cleared_due_date() -> eyre::Result<()> {
        let id = TaskId::new().to_string();
        let cli = Cli::try_parse_from([
            "taskdeck", "task", "edit", id.as_str(), "--clear-due", "-p", "1", "--tag",
        ])?;
        let Command::Task(TaskCommand::Edit(edit)) = cli.command else {
            eyre::bail!("expected task edit");
        };
        eyre::ensure!(edit.clear_due && edit.due.is_none(), "due date");
        eyre::ensure!(edit.priority == Some(Priority::URGENT), "priority");
        eyre::ensure!(edit.tags == Some(Vec::new()), "tags cleared");
        eyre::ensure!(edit.assignees.is_none(), "assignees kept");
        Ok(())
    }

    #[rstest]
    fn parses_csv_export() -> eyre::Result<()> {
        let cli = Cli::try_parse_from(["taskdeck", "workspace", "export", "--format", "csv"])?;
        let Command::Workspace(WorkspaceCommand::Export { format, output }) = cli.command else {
            eyre::bail!("expected workspace export");
        };
        eyre::ensure!(format == TransferFormat::Csv, "format");
        eyre::ensure!(output.is_none(), "stdout");
        Ok(())
    }

    #[rstest]
    fn rejects_out_of_range_priority() {
        let result = Cli::try_parse_from(["taskdeck", "task", "add", "Write report", "-p", "9"]);
        assert!(result.is_err());
    }
}
