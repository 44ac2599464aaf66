//! Concurrent claims against the `PostgreSQL` task store.

use std::sync::Arc;

use super::helpers::{PostgresContext, postgres_context};
use eyre::{Result, ensure};
use rstest::rstest;
use taskdesk::failure::FailureKind;
use taskdesk::task::domain::{TaskRevision, TaskStatus};
use taskdesk::user::domain::RoleFlags;

#[rstest]
fn concurrent_claims_yield_exactly_one_assignee(
    postgres_context: Option<PostgresContext>,
) -> Result<()> {
    let Some(context) = postgres_context else {
        return Ok(());
    };
    let carol = context.register("carol", 1, RoleFlags::customer())?;
    let employees = (0..8_u16)
        .map(|seq| context.register(&format!("worker{seq}"), 100 + seq, RoleFlags::employee()))
        .collect::<Result<Vec<_>>>()?;
    let task = context.runtime.block_on(context.tasks.create_task(&carol, "Fix sink"))?;

    let outcomes = context.runtime.block_on(async {
        let handles: Vec<_> = employees
            .iter()
            .cloned()
            .map(|employee| {
                let service = Arc::clone(&context.tasks);
                let task_id = task.id();
                tokio::spawn(async move { service.claim_task(&employee, task_id).await })
            })
            .collect();
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(handle.await?);
        }
        Ok::<_, tokio::task::JoinError>(outcomes)
    })?;

    let mut winners = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(claimed) => winners.push(claimed),
            Err(err) => ensure!(
                err.kind() == FailureKind::Conflict,
                "losing claim reported {}",
                err.kind()
            ),
        }
    }
    ensure!(winners.len() == 1, "expected one winner, got {}", winners.len());
    let stored = context.runtime.block_on(context.tasks.get_task(task.id()))?;
    ensure!(stored.status() == TaskStatus::InProgress, "status {}", stored.status());
    ensure!(
        winners.first().and_then(|winner| winner.assignee()) == stored.assignee(),
        "stored assignee differs from the winner"
    );
    ensure!(
        stored.revision() == TaskRevision::new(1),
        "exactly one write must land, revision {}",
        stored.revision()
    );
    Ok(())
}
