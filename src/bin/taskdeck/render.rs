//! Plain-text output.

use chrono::{DateTime, FixedOffset, Utc};
use std::io::{self, Write};
use taskdeck::{
    dashboard::domain::DashboardReport,
    workspace::domain::{Task, Template, Workspace, WorkspaceId},
};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Writes domain values as text, showing dates in `offset`.
pub struct Renderer<W> {
    out: W,
    offset: FixedOffset,
}

impl<W: Write> Renderer<W> {
    /// Creates a renderer writing to `out`.
    pub const fn new(out: W, offset: FixedOffset) -> Self {
        Self { out, offset }
    }

    /// Writes a single line.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    /// One line per workspace, marking the active one with `*`.
    pub fn workspaces(
        &mut self,
        workspaces: &[Workspace],
        active: Option<WorkspaceId>,
    ) -> io::Result<()> {
        if workspaces.is_empty() {
            return self.line("no workspaces");
        }
        for workspace in workspaces {
            let marker = if Some(workspace.id()) == active { "*" } else { " " };
            writeln!(
                self.out,
                "{marker} {}  {}  ({} tasks, {} templates)",
                workspace.id(),
                workspace.name(),
                workspace.tasks().len(),
                workspace.templates().len()
            )?;
        }
        Ok(())
    }

    /// Workspace header followed by its task tree.
    pub fn workspace(&mut self, workspace: &Workspace) -> io::Result<()> {
        writeln!(self.out, "{}  {}", workspace.id(), workspace.name())?;
        writeln!(self.out, "created {}", self.date(workspace.created_at()))?;
        writeln!(self.out, "updated {}", self.date(workspace.updated_at()))?;
        self.tasks(workspace.tasks())
    }

    /// Task tree, subtasks indented under their parent.
    pub fn tasks(&mut self, tasks: &[Task]) -> io::Result<()> {
        if tasks.is_empty() {
            return self.line("no tasks");
        }
        for task in tasks {
            self.task_tree(task, 0)?;
        }
        Ok(())
    }

    fn task_tree(&mut self, task: &Task, depth: usize) -> io::Result<()> {
        self.task_line(task, depth)?;
        for subtask in task.subtasks() {
            self.task_tree(subtask, depth.saturating_add(1))?;
        }
        Ok(())
    }

    fn task_line(&mut self, task: &Task, depth: usize) -> io::Result<()> {
        let indent = "  ".repeat(depth);
        let due = task
            .due_date()
            .map_or_else(|| "no due date".to_owned(), |due| self.date(due));
        writeln!(
            self.out,
            "{indent}{}  [{}] {} {}  due {due}",
            task.id(),
            task.status(),
            task.priority(),
            task.name()
        )
    }

    /// Full task detail.
    pub fn task(&mut self, task: &Task) -> io::Result<()> {
        self.task_line(task, 0)?;
        if let Some(parent) = task.parent_id() {
            writeln!(self.out, "parent      {parent}")?;
        }
        if !task.description().is_empty() {
            writeln!(self.out, "description {}", task.description())?;
        }
        if !task.assignees().is_empty() {
            writeln!(self.out, "assignees   {}", task.assignees().join(", "))?;
        }
        if !task.tags().is_empty() {
            writeln!(self.out, "tags        {}", task.tags().join(", "))?;
        }
        for blocker in task.blockers() {
            writeln!(
                self.out,
                "blocker     {}  {}  ({})",
                blocker.id(),
                blocker.description(),
                self.date(blocker.created_at())
            )?;
        }
        for comment in task.comments() {
            writeln!(
                self.out,
                "comment     {}  {}",
                self.date(comment.created_at()),
                comment.text()
            )?;
        }
        for subtask in task.subtasks() {
            self.task_tree(subtask, 1)?;
        }
        Ok(())
    }

    /// One line per template.
    pub fn templates(&mut self, templates: &[Template]) -> io::Result<()> {
        if templates.is_empty() {
            return self.line("no templates");
        }
        for template in templates {
            writeln!(
                self.out,
                "{}  {} {}  ({} subtasks)",
                template.id(),
                template.default_priority(),
                template.name(),
                template.subtask_templates().len()
            )?;
        }
        Ok(())
    }

    /// Full template detail.
    pub fn template(&mut self, template: &Template) -> io::Result<()> {
        writeln!(self.out, "{}  {}", template.id(), template.name())?;
        writeln!(self.out, "priority    {}", template.default_priority())?;
        if !template.description().is_empty() {
            writeln!(self.out, "description {}", template.description())?;
        }
        if !template.default_tags().is_empty() {
            writeln!(self.out, "tags        {}", template.default_tags().join(", "))?;
        }
        if !template.default_assignees().is_empty() {
            writeln!(self.out, "assignees   {}", template.default_assignees().join(", "))?;
        }
        for blueprint in template.subtask_templates() {
            let priority = blueprint
                .priority
                .map_or_else(|| "inherit".to_owned(), |value| value.to_string());
            writeln!(self.out, "subtask     {} ({priority})", blueprint.name)?;
        }
        Ok(())
    }

    /// Dashboard metrics, alerts, distributions, and task sections.
    pub fn dashboard(&mut self, report: &DashboardReport) -> io::Result<()> {
        let metrics = report.metrics;
        writeln!(
            self.out,
            "total {}  due today {}  overdue {}  blocked {}  upcoming {}",
            metrics.total, metrics.due_today, metrics.overdue, metrics.blocked, metrics.upcoming
        )?;
        for alert in &report.alerts {
            writeln!(self.out, "[{}] {}", alert.level, alert.message)?;
        }

        let statuses: Vec<String> = report
            .distributions
            .status
            .iter()
            .map(|(status, count)| format!("{status}={count}"))
            .collect();
        writeln!(self.out, "status   {}", statuses.join(" "))?;
        let priorities: Vec<String> = report
            .distributions
            .priority
            .iter()
            .map(|(priority, count)| format!("{priority}={count}"))
            .collect();
        writeln!(self.out, "priority {}", priorities.join(" "))?;

        self.section("due today", &report.today_tasks)?;
        self.section("overdue", &report.overdue_tasks)?;
        self.section("upcoming", &report.upcoming_tasks)?;
        self.section("blocked", &report.blocked_tasks)
    }

    fn section(&mut self, title: &str, tasks: &[Task]) -> io::Result<()> {
        if tasks.is_empty() {
            return Ok(());
        }
        writeln!(self.out)?;
        writeln!(self.out, "{title}:")?;
        for task in tasks {
            self.task_line(task, 1)?;
        }
        Ok(())
    }

    /// Backup names, newest first.
    pub fn backups(&mut self, names: &[String]) -> io::Result<()> {
        if names.is_empty() {
            return self.line("no backups");
        }
        for name in names {
            self.line(name)?;
        }
        Ok(())
    }

    /// Raw text, such as exported JSON.
    pub fn raw(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        writeln!(self.out)
    }

    fn date(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.offset)
            .format(DATE_FORMAT)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockable::DefaultClock;
    use rstest::rstest;
    use taskdeck::{
        clock::FixedClock,
        dashboard::domain::TemporalQuery,
        workspace::domain::{NewTask, Priority},
    };

    fn render(apply: impl FnOnce(&mut Renderer<&mut Vec<u8>>) -> io::Result<()>) -> eyre::Result<String> {
        let mut buffer = Vec::new();
        let offset = FixedOffset::east_opt(0).ok_or_else(|| eyre::eyre!("offset"))?;
        apply(&mut Renderer::new(&mut buffer, offset))?;
        Ok(String::from_utf8(buffer)?)
    }

    #[rstest]
    fn task_detail_lists_blockers_and_tags() -> eyre::Result<()> {
        let mut task = Task::new(
            NewTask::new("Write report")
                .with_priority(Priority::HIGH)
                .with_tags(["docs".to_owned()]),
            &DefaultClock,
        )?;
        task.add_blocker("Waiting on data", &DefaultClock)?;

        let text = render(|renderer| renderer.task(&task))?;
        eyre::ensure!(text.contains("[bloqueada] P2 Write report"), "header: {text}");
        eyre::ensure!(text.contains("tags        docs"), "tags: {text}");
        eyre::ensure!(text.contains("Waiting on data"), "blocker: {text}");
        eyre::ensure!(text.contains("no due date"), "due: {text}");
        Ok(())
    }

    #[rstest]
    fn empty_dashboard_shows_zeroed_distributions() -> eyre::Result<()> {
        let now = Utc
            .with_ymd_and_hms(2024, 6, 10, 0, 0, 0)
            .single()
            .ok_or_else(|| eyre::eyre!("instant"))?;
        let offset = FixedOffset::east_opt(0).ok_or_else(|| eyre::eyre!("offset"))?;
        let query = TemporalQuery::at(&FixedClock::new(now), offset);
        let report = DashboardReport::build(&[], &query, 7);

        let text = render(|renderer| renderer.dashboard(&report))?;
        eyre::ensure!(text.contains("total 0"), "metrics: {text}");
        eyre::ensure!(text.contains("backlog=0"), "status: {text}");
        eyre::ensure!(text.contains("P5=0"), "priority: {text}");
        eyre::ensure!(!text.contains('['), "no alerts expected: {text}");
        Ok(())
    }
}
