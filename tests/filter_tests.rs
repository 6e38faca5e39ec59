//! Filter and search selection over live task streams
mod common;

use anjez::*;
use chrono::{Duration, Utc};
use common::{memory_repository, titles};
use std::time::Duration as StdDuration;
use tokio::time::timeout;

async fn next(view: &mut FilteredTasks) -> Vec<Task> {
    timeout(StdDuration::from_secs(2), view.next())
        .await
        .expect("filtered view emits")
        .expect("filtered view open")
}

async fn seed_overdue(repo: &TaskRepository) {
    let past = Utc::now() - Duration::days(2);
    repo.create_task(TaskDraft::new("task1").due(past)).await.unwrap();
    let done = repo.create_task(TaskDraft::new("task2").due(past)).await.unwrap();
    let mut done = repo.task(&done.id).await.unwrap();
    done.status = TaskStatus::Completed;
    repo.update_task(done).await.unwrap();
    repo.create_task(TaskDraft::new("task3")).await.unwrap();
}

#[tokio::test]
async fn test_overdue_filter_keeps_open_past_due_tasks() {
    let repo = memory_repository();
    seed_overdue(&repo).await;

    let engine = FilterEngine::new(repo);
    engine.set_filter(TaskFilter::Overdue);
    assert_eq!(titles(&engine.current().await), vec!["task1"]);
}

#[tokio::test]
async fn test_search_bypasses_filter_only_under_all() {
    let repo = memory_repository();
    repo.create_task(TaskDraft::new("Team meeting").priority(Priority::High))
        .await
        .unwrap();
    repo.create_task(TaskDraft::new("Groceries").priority(Priority::High))
        .await
        .unwrap();
    repo.create_task(TaskDraft::new("Call").description("Client meeting notes"))
        .await
        .unwrap();

    let engine = FilterEngine::new(repo);
    engine.set_query("meeting");
    assert_eq!(titles(&engine.current().await), vec!["Team meeting", "Call"]);

    // Other filters ignore the query
    engine.set_filter(TaskFilter::HighPriority);
    assert_eq!(
        titles(&engine.current().await),
        vec!["Team meeting", "Groceries"]
    );
}

#[tokio::test]
async fn test_filtered_view_switches_to_latest_selection() {
    let repo = memory_repository();
    seed_overdue(&repo).await;
    let engine = FilterEngine::new(repo.clone());

    let mut view = engine.filtered_tasks();
    assert_eq!(next(&mut view).await.len(), 3);

    engine.set_filter(TaskFilter::Completed);
    assert_eq!(titles(&next(&mut view).await), vec!["task2"]);

    engine.set_filter(TaskFilter::Overdue);
    assert_eq!(titles(&next(&mut view).await), vec!["task1"]);

    // Writes re-emit through the current source only
    repo.create_task(TaskDraft::new("task4").due(Utc::now() - Duration::hours(1)))
        .await
        .unwrap();
    assert_eq!(titles(&next(&mut view).await), vec!["task1", "task4"]);
    assert_eq!(titles(&view.latest()), vec!["task1", "task4"]);
}

#[tokio::test]
async fn test_filtered_view_follows_query_changes() {
    let repo = memory_repository();
    repo.create_task(TaskDraft::new("Buy milk")).await.unwrap();
    repo.create_task(TaskDraft::new("Buy bread")).await.unwrap();
    repo.create_task(TaskDraft::new("Walk dog")).await.unwrap();
    let engine = FilterEngine::new(repo);

    let mut view = engine.filtered_tasks();
    assert_eq!(next(&mut view).await.len(), 3);

    engine.set_query("buy");
    assert_eq!(titles(&next(&mut view).await), vec!["Buy milk", "Buy bread"]);

    engine.set_query("");
    assert_eq!(next(&mut view).await.len(), 3);
}

#[tokio::test]
async fn test_unknown_filter_is_rejected() {
    assert_eq!(
        "someday".parse::<TaskFilter>(),
        Err(ValidationError::InvalidFilter("someday".to_string()))
    );
    assert_eq!("".parse::<TaskFilter>(), Ok(TaskFilter::All));
}
