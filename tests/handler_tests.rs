//! Command surface tests
mod common;

use common::{extract_id_from_response, get_test_handler};

#[tokio::test]
async fn test_add_and_list_tasks() {
    let (handler, _dir) = get_test_handler();

    let response = handler
        .handle_add_task(
            "Team meeting".to_string(),
            Some("weekly sync".to_string()),
            Some("high".to_string()),
            Some("2020-01-01".to_string()),
        )
        .await
        .unwrap();
    assert!(response.starts_with("Task created with ID: "));

    handler
        .handle_add_task("Groceries".to_string(), None, None, None)
        .await
        .unwrap();

    let list = handler.handle_list_tasks(None, None).await.unwrap();
    assert!(list.contains("Filter: All"));
    assert!(list.contains("Found 2 task(s)"));

    let overdue = handler
        .handle_list_tasks(Some("overdue".to_string()), None)
        .await
        .unwrap();
    assert!(overdue.contains("Team meeting"));
    assert!(!overdue.contains("Groceries"));

    // Selection is remembered
    let again = handler.handle_list_tasks(None, None).await.unwrap();
    assert!(again.contains("Filter: Overdue"));
}

#[tokio::test]
async fn test_invalid_arguments_are_rejected() {
    let (handler, _dir) = get_test_handler();
    assert!(
        handler
            .handle_add_task("  ".to_string(), None, None, None)
            .await
            .is_err()
    );
    assert!(
        handler
            .handle_add_task("x".to_string(), None, Some("urgent".to_string()), None)
            .await
            .is_err()
    );
    assert!(
        handler
            .handle_add_task("x".to_string(), None, None, Some("tomorrow".to_string()))
            .await
            .is_err()
    );
    assert!(
        handler
            .handle_list_tasks(Some("someday".to_string()), None)
            .await
            .is_err()
    );
    let list = handler.handle_list_tasks(None, None).await.unwrap();
    assert!(list.contains("No tasks found"));
}

#[tokio::test]
async fn test_edit_and_toggle() {
    let (handler, _dir) = get_test_handler();
    let id = extract_id_from_response(
        &handler
            .handle_add_task("Draft".to_string(), None, None, None)
            .await
            .unwrap(),
    );

    let edited = handler
        .handle_edit_task(
            id.clone(),
            Some("Final".to_string()),
            None,
            Some("low".to_string()),
            None,
            None,
        )
        .await
        .unwrap();
    assert!(edited.contains("title, priority"));
    assert!(edited.contains("Final"));

    let unchanged = handler
        .handle_edit_task(id.clone(), None, None, None, None, None)
        .await
        .unwrap();
    assert!(unchanged.starts_with("No changes"));

    let toggled = handler.handle_toggle_status(id.clone()).await.unwrap();
    assert!(toggled.ends_with("In progress"));
    assert!(handler.handle_toggle_status("missing".to_string()).await.is_err());
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let (handler, _dir) = get_test_handler();
    let id = extract_id_from_response(
        &handler
            .handle_add_task("Old".to_string(), None, None, None)
            .await
            .unwrap(),
    );

    let prompt = handler.handle_delete_task(id.clone(), false).await.unwrap();
    assert!(prompt.contains("confirm=true"));
    assert!(handler.handle_statistics().await.unwrap().contains("Total: 1"));

    handler.handle_delete_task(id.clone(), true).await.unwrap();
    assert!(handler.handle_statistics().await.unwrap().contains("Total: 0"));
    assert!(handler.handle_delete_task(id, true).await.is_err());
}

#[tokio::test]
async fn test_subtask_commands() {
    let (handler, _dir) = get_test_handler();
    let task_id = extract_id_from_response(
        &handler
            .handle_add_task("Trip".to_string(), None, None, None)
            .await
            .unwrap(),
    );
    let sub_id = extract_id_from_response(
        &handler
            .handle_add_subtask(task_id.clone(), "Pack".to_string())
            .await
            .unwrap(),
    );
    handler
        .handle_add_subtask(task_id.clone(), "Book".to_string())
        .await
        .unwrap();

    let toggled = handler.handle_toggle_subtask(sub_id.clone()).await.unwrap();
    assert!(toggled.contains("(1/2 done)"));

    let list = handler.handle_list_subtasks(task_id.clone()).await.unwrap();
    assert!(list.contains("Subtasks (1/2 done)"));
    assert!(list.contains("- [x] Pack"));

    handler.handle_delete_subtask(sub_id).await.unwrap();
    let list = handler.handle_list_subtasks(task_id).await.unwrap();
    assert!(list.contains("Subtasks (0/1 done)"));
}

#[tokio::test]
async fn test_export_and_import_commands() {
    let (handler, dir) = get_test_handler();
    handler
        .handle_add_task("Backed up".to_string(), None, None, None)
        .await
        .unwrap();
    let path = dir.path().join("backup.toml");
    let path_arg = path.to_str().unwrap().to_string();

    let exported = handler.handle_export(path_arg.clone()).await.unwrap();
    assert!(exported.starts_with("Exported 1 task(s)"));

    let (other, _other_dir) = get_test_handler();
    let imported = other.handle_import(path_arg.clone()).await.unwrap();
    assert!(imported.starts_with("Imported 1 task(s)"));
    other.handle_import(path_arg).await.unwrap();
    assert!(other.handle_statistics().await.unwrap().contains("Total: 1"));

    std::fs::write(dir.path().join("bad.toml"), "tasks = 3").unwrap();
    assert!(
        other
            .handle_import(dir.path().join("bad.toml").to_str().unwrap().to_string())
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_import_tolerates_unknown_priority_and_status() {
    let (handler, dir) = get_test_handler();
    let path = dir.path().join("foreign.toml");
    std::fs::write(
        &path,
        r#"exported_at = "2025-03-15T10:30:00Z"

[[tasks]]
id = "foreign-1"
title = "From another app"
priority = "URGENT"
status = "ARCHIVED"
"#,
    )
    .unwrap();

    let imported = handler
        .handle_import(path.to_str().unwrap().to_string())
        .await
        .unwrap();
    assert!(imported.starts_with("Imported 1 task(s)"));

    let list = handler.handle_list_tasks(None, None).await.unwrap();
    assert!(list.contains("From another app"));
    assert!(list.contains("priority: Medium"));
    assert!(list.contains("status: New"));
}

#[tokio::test]
async fn test_settings_persist_app_lock() {
    let (handler, dir) = get_test_handler();
    let shown = handler.handle_settings(None).await.unwrap();
    assert!(shown.contains("App lock: disabled"));

    let enabled = handler.handle_settings(Some(true)).await.unwrap();
    assert!(enabled.contains("App lock: enabled"));
    assert!(enabled.contains("Biometric authentication: unavailable"));
    assert!(dir.path().join("anjez_prefs.toml").exists());
}

#[tokio::test]
async fn test_reorder_and_remind_commands() {
    let (handler, _dir) = get_test_handler();
    let first = extract_id_from_response(
        &handler
            .handle_add_task("first".to_string(), None, None, Some("2020-01-01".to_string()))
            .await
            .unwrap(),
    );
    let second = extract_id_from_response(
        &handler
            .handle_add_task("second".to_string(), None, None, None)
            .await
            .unwrap(),
    );

    let reordered = handler
        .handle_reorder_tasks(vec![second.clone(), first.clone()])
        .await
        .unwrap();
    assert!(reordered.contains("0. second"));
    assert!(handler.handle_reorder_tasks(vec![]).await.is_err());

    let reminded = handler.handle_remind(None, None).await.unwrap();
    assert!(reminded.starts_with("Sent 1 reminder(s)"));
    let single = handler.handle_remind(Some(second), None).await.unwrap();
    assert!(single.contains("Reminder sent for 'second'"));
}
