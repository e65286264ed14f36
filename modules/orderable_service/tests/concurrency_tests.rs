//! Concurrent requests against one menu

use orderable_service::{Content, OrderingError};
use std::sync::Arc;

mod common;
use common::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_moves_keep_menu_dense() {
    print_test_header(
        "test_concurrent_moves_keep_menu_dense",
        "Racing moves either apply or fail cleanly; positions are never duplicated",
    );
    let (service, store) = create_test_service();
    seed_menu(&service, MAIN_MENU, &["A", "B", "C", "D", "E", "F"]).await;

    let mut tasks = Vec::new();
    for i in 0..64u32 {
        let service = Arc::clone(&service);
        tasks.push(tokio::spawn(async move {
            let staged = service.begin_move(i % 6).constrained_by(MAIN_MENU);
            if i % 2 == 0 {
                staged.up_one().await
            } else {
                staged.down_one().await
            }
        }));
    }

    let mut applied = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(menu) => {
                applied += 1;
                assert_eq!(menu.len(), 6);
            }
            Err(OrderingError::InvalidMove { .. }) | Err(OrderingError::ConcurrencyConflict { .. }) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }
    println!("   applied {} of 64 moves", applied);

    assert!(applied > 0);
    assert_dense(&store.all());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_never_share_a_position() {
    let (service, store) = create_test_service();

    let mut tasks = Vec::new();
    for i in 0..32 {
        let service = Arc::clone(&service);
        tasks.push(tokio::spawn(async move {
            service
                .append(Content::draft(MAIN_MENU, format!("Item {}", i), format!("item-{}", i), ""))
                .await
        }));
    }

    let mut created = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert!(e.is_retryable(), "unexpected error: {:?}", e),
        }
    }

    let menu = store.all();
    assert_eq!(menu.len(), created);
    assert_dense(&menu);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deletes_and_moves() {
    let (service, store) = create_test_service();
    let seeded = seed_menu(&service, MAIN_MENU, &["A", "B", "C", "D", "E", "F", "G", "H"]).await;

    let mut tasks = Vec::new();
    for content in seeded.iter().step_by(3) {
        let service = Arc::clone(&service);
        let id = content.id;
        tasks.push(tokio::spawn(async move { service.remove(id).await.map(|_| ()) }));
    }
    for position in 0..8u32 {
        let service = Arc::clone(&service);
        tasks.push(tokio::spawn(async move {
            service
                .begin_move(position)
                .constrained_by(MAIN_MENU)
                .down_one()
                .await
                .map(|_| ())
        }));
    }

    for task in tasks {
        if let Err(e) = task.await.unwrap() {
            assert!(
                matches!(
                    e,
                    OrderingError::InvalidMove { .. }
                        | OrderingError::NotFound { .. }
                        | OrderingError::EntityNotFound { .. }
                        | OrderingError::ConcurrencyConflict { .. }
                ),
                "unexpected error: {:?}",
                e
            );
        }
    }

    assert_dense(&store.all());
}
