//! Unit tests for template validation, updates, and instantiation.

use crate::workspace::domain::{
    NewTemplate, Priority, SubtaskTemplate, TaskOverrides, TaskStatus, Template, TemplateUpdate,
};
use chrono::{TimeZone, Utc};
use eyre::{OptionExt, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[fixture]
fn release_template(clock: DefaultClock) -> eyre::Result<Template> {
    let review = SubtaskTemplate {
        priority: Some(Priority::URGENT),
        tags: vec!["qa".to_owned()],
        ..SubtaskTemplate::new("Review changelog")
    };
    let request = NewTemplate::new("Weekly release")
        .with_description("Ship the weekly build")
        .with_default_priority(Priority::HIGH)
        .with_default_tags(["release".to_owned()])
        .with_default_assignees(["ana".to_owned()])
        .with_subtask_templates([SubtaskTemplate::new("Tag build"), review]);
    Ok(Template::new(request, &clock)?)
}

#[rstest]
fn template_name_is_validated(clock: DefaultClock) {
    assert!(Template::new(NewTemplate::new("ab"), &clock).is_err());
}

#[rstest]
fn blueprint_name_is_validated(clock: DefaultClock) {
    let request =
        NewTemplate::new("Valid name").with_subtask_templates([SubtaskTemplate::new(" x ")]);
    assert!(Template::new(request, &clock).is_err());
}

#[rstest]
fn instantiate_uses_template_defaults(
    clock: DefaultClock,
    release_template: eyre::Result<Template>,
) -> eyre::Result<()> {
    let template = release_template?;

    let task = template.instantiate(TaskOverrides::new(), &clock)?;

    ensure!(task.name() == "Weekly release");
    ensure!(task.description() == "Ship the weekly build");
    ensure!(task.priority() == Priority::HIGH);
    ensure!(task.tags() == ["release"]);
    ensure!(task.assignees() == ["ana"]);
    ensure!(task.status() == TaskStatus::Backlog);
    ensure!(task.due_date().is_none());
    Ok(())
}

#[rstest]
fn overrides_replace_defaults(
    clock: DefaultClock,
    release_template: eyre::Result<Template>,
) -> eyre::Result<()> {
    let template = release_template?;
    let due = Utc
        .with_ymd_and_hms(2024, 6, 14, 18, 0, 0)
        .single()
        .ok_or_eyre("valid due date")?;
    let overrides = TaskOverrides::new()
        .with_name("Hotfix release")
        .with_due_date(due)
        .with_priority(Priority::URGENT)
        .with_tags(["hotfix".to_owned()])
        .with_assignees(Vec::new())
        .with_description("Patch only");

    let task = template.instantiate(overrides, &clock)?;

    ensure!(task.name() == "Hotfix release");
    ensure!(task.due_date() == Some(due));
    ensure!(task.priority() == Priority::URGENT);
    ensure!(task.tags() == ["hotfix"]);
    ensure!(task.assignees().is_empty());
    ensure!(task.description() == "Patch only");
    Ok(())
}

#[rstest]
fn blueprints_become_subtasks_of_the_new_task(
    clock: DefaultClock,
    release_template: eyre::Result<Template>,
) -> eyre::Result<()> {
    let template = release_template?;
    let due = Utc
        .with_ymd_and_hms(2024, 6, 14, 18, 0, 0)
        .single()
        .ok_or_eyre("valid due date")?;

    let task = template.instantiate(TaskOverrides::new().with_due_date(due), &clock)?;

    let names: Vec<&str> = task.subtasks().iter().map(|subtask| subtask.name()).collect();
    ensure!(names == ["Tag build", "Review changelog"]);
    ensure!(
        task.subtasks()
            .iter()
            .all(|subtask| subtask.parent_id() == Some(task.id()) && subtask.due_date() == Some(due))
    );
    let priorities: Vec<Priority> = task
        .subtasks()
        .iter()
        .map(|subtask| subtask.priority())
        .collect();
    ensure!(priorities == [Priority::HIGH, Priority::URGENT]);
    Ok(())
}

#[rstest]
fn instances_are_independent_of_the_template(
    clock: DefaultClock,
    release_template: eyre::Result<Template>,
) -> eyre::Result<()> {
    let template = release_template?;
    let snapshot = template.clone();

    let mut first = template.instantiate(TaskOverrides::new(), &clock)?;
    first.add_tag("edited", &clock);
    first.set_assignees(["bruno".to_owned()], &clock);
    let second = template.instantiate(TaskOverrides::new(), &clock)?;

    ensure!(template == snapshot, "template must not observe task edits");
    ensure!(second.tags() == ["release"]);
    ensure!(second.assignees() == ["ana"]);
    ensure!(first.id() != second.id());
    Ok(())
}

#[rstest]
fn overridden_name_is_validated(
    clock: DefaultClock,
    release_template: eyre::Result<Template>,
) -> eyre::Result<()> {
    let template = release_template?;
    let result = template.instantiate(TaskOverrides::new().with_name("no"), &clock);
    ensure!(result.is_err());
    Ok(())
}

#[rstest]
fn update_replaces_only_given_fields(
    clock: DefaultClock,
    release_template: eyre::Result<Template>,
) -> eyre::Result<()> {
    let mut template = release_template?;

    template.apply_update(
        TemplateUpdate::new()
            .with_name("Monthly release")
            .with_default_tags(["monthly".to_owned()]),
        &clock,
    )?;

    ensure!(template.name() == "Monthly release");
    ensure!(template.default_tags() == ["monthly"]);
    ensure!(template.default_priority() == Priority::HIGH);
    ensure!(template.default_assignees() == ["ana"]);
    ensure!(template.subtask_templates().len() == 2);
    Ok(())
}

#[rstest]
fn rejected_update_leaves_template_unchanged(
    clock: DefaultClock,
    release_template: eyre::Result<Template>,
) -> eyre::Result<()> {
    let mut template = release_template?;
    let before = template.clone();

    let result = template.apply_update(
        TemplateUpdate::new()
            .with_description("Changed")
            .with_subtask_templates([SubtaskTemplate::new("ok")]),
        &clock,
    );

    ensure!(result.is_err());
    ensure!(template == before);
    Ok(())
}

#[rstest]
fn empty_update_is_detected() {
    assert!(TemplateUpdate::new().is_empty());
    assert!(!TemplateUpdate::new().with_name("x").is_empty());
}
