//! Concurrent claim tests against the in-memory store.

use std::sync::Arc;

use super::helpers::{Backend, backend};
use rstest::rstest;
use taskdesk::failure::FailureKind;
use taskdesk::task::domain::TaskStatus;
use taskdesk::user::domain::RoleFlags;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_concurrent_claims_yield_one_assignee(backend: Backend) -> Result<(), eyre::Report> {
    let carol = backend.register("carol", 1, RoleFlags::customer()).await?;
    let mut employees = Vec::new();
    for seq in 0..8_u16 {
        employees.push(
            backend
                .register(&format!("worker{seq}"), 100 + seq, RoleFlags::employee())
                .await?,
        );
    }
    let task = backend.tasks.create_task(&carol, "Fix sink").await?;

    let tasks = Arc::new(backend.tasks);
    let handles: Vec<_> = employees
        .iter()
        .cloned()
        .map(|employee| {
            let service = Arc::clone(&tasks);
            let task_id = task.id();
            tokio::spawn(async move { service.claim_task(&employee, task_id).await })
        })
        .collect();

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await? {
            Ok(claimed) => winners.push(claimed),
            Err(err) => eyre::ensure!(
                err.kind() == FailureKind::Conflict,
                "losing claim reported {}",
                err.kind()
            ),
        }
    }

    eyre::ensure!(winners.len() == 1, "expected one winner, got {}", winners.len());
    let stored = tasks.get_task(task.id()).await?;
    eyre::ensure!(stored.status() == TaskStatus::InProgress, "task not in progress");
    eyre::ensure!(
        winners.first().and_then(|winner| winner.assignee()) == stored.assignee(),
        "stored assignee differs from winner"
    );
    Ok(())
}
