//! Unit tests for blocker management and its coupling to task status.

use crate::workspace::domain::{BlockerId, NewTask, Task, TaskStatus, WorkspaceDomainError};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[fixture]
fn in_progress_task(clock: DefaultClock) -> eyre::Result<Task> {
    let mut task = Task::new(NewTask::new("Blocker test"), &clock)?;
    task.transition_to(TaskStatus::InProgress, &clock)?;
    Ok(task)
}

#[rstest]
#[case(&[])]
#[case(&[TaskStatus::InProgress])]
#[case(&[TaskStatus::InProgress, TaskStatus::Review])]
#[case(&[TaskStatus::InProgress, TaskStatus::Review, TaskStatus::Done])]
#[case(&[TaskStatus::InProgress, TaskStatus::Blocked])]
fn add_blocker_always_blocks(
    clock: DefaultClock,
    #[case] path: &[TaskStatus],
) -> eyre::Result<()> {
    let mut task = Task::new(NewTask::new("Blocker test"), &clock)?;
    for &step in path {
        task.transition_to(step, &clock)?;
    }

    let blocker_id = task.add_blocker("Waiting on vendor", &clock)?;

    ensure!(task.status() == TaskStatus::Blocked);
    ensure!(task.blockers().len() == 1);
    ensure!(task.blockers().iter().any(|blocker| blocker.id() == blocker_id));
    Ok(())
}

#[rstest]
fn add_blocker_rejects_short_description(
    clock: DefaultClock,
    in_progress_task: eyre::Result<Task>,
) -> eyre::Result<()> {
    let mut task = in_progress_task?;
    let before = task.clone();

    let result = task.add_blocker("  abc  ", &clock);

    let Err(WorkspaceDomainError::Validation(err)) = &result else {
        bail!("expected a validation error, got {result:?}");
    };
    ensure!(err.field == "blocker description");
    ensure!(task == before, "rejected blocker must not change the task");
    Ok(())
}

#[rstest]
fn removing_last_blocker_resumes_work(
    clock: DefaultClock,
    in_progress_task: eyre::Result<Task>,
) -> eyre::Result<()> {
    let mut task = in_progress_task?;
    let blocker_id = task.add_blocker("Waiting on vendor", &clock)?;

    let removed = task.remove_blocker(blocker_id, &clock)?;

    ensure!(removed.id() == blocker_id);
    ensure!(removed.description() == "Waiting on vendor");
    ensure!(task.blockers().is_empty());
    ensure!(task.status() == TaskStatus::InProgress);
    Ok(())
}

#[rstest]
fn removing_one_of_two_blockers_keeps_task_blocked(
    clock: DefaultClock,
    in_progress_task: eyre::Result<Task>,
) -> eyre::Result<()> {
    let mut task = in_progress_task?;
    let first = task.add_blocker("Waiting on vendor", &clock)?;
    let second = task.add_blocker("Needs legal review", &clock)?;

    task.remove_blocker(first, &clock)?;

    ensure!(task.status() == TaskStatus::Blocked);
    ensure!(task.blockers().len() == 1);
    ensure!(task.blockers().iter().all(|blocker| blocker.id() == second));
    Ok(())
}

#[rstest]
fn removing_unknown_blocker_is_rejected(
    clock: DefaultClock,
    in_progress_task: eyre::Result<Task>,
) -> eyre::Result<()> {
    let mut task = in_progress_task?;
    task.add_blocker("Waiting on vendor", &clock)?;
    let before = task.clone();
    let unknown = BlockerId::new();

    let result = task.remove_blocker(unknown, &clock);

    ensure!(
        result
            == Err(WorkspaceDomainError::BlockerNotFound {
                task_id: task.id(),
                blocker_id: unknown,
            })
    );
    ensure!(task == before, "blockers must be untouched");
    Ok(())
}

#[rstest]
fn removing_last_blocker_after_manual_resume_keeps_status(
    clock: DefaultClock,
    in_progress_task: eyre::Result<Task>,
) -> eyre::Result<()> {
    let mut task = in_progress_task?;
    let blocker_id = task.add_blocker("Waiting on vendor", &clock)?;
    task.transition_to(TaskStatus::InProgress, &clock)?;
    task.transition_to(TaskStatus::Review, &clock)?;

    task.remove_blocker(blocker_id, &clock)?;

    ensure!(task.status() == TaskStatus::Review);
    ensure!(task.blockers().is_empty());
    Ok(())
}

#[rstest]
fn blocking_a_finished_task_reopens_it_as_blocked(clock: DefaultClock) -> eyre::Result<()> {
    let mut task = Task::new(NewTask::new("Blocker test"), &clock)?;
    for step in [TaskStatus::InProgress, TaskStatus::Review, TaskStatus::Done] {
        task.transition_to(step, &clock)?;
    }

    let blocker_id = task.add_blocker("Regression found", &clock)?;
    ensure!(task.status() == TaskStatus::Blocked);

    task.remove_blocker(blocker_id, &clock)?;
    ensure!(task.status() == TaskStatus::InProgress);
    Ok(())
}
