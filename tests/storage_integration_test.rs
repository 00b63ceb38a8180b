use review_analyzer::models::{NewReview, SentimentResult};
use review_analyzer::storage::{connect_store, ListQuery, StorageConfig, StorageType};

/// 创建测试用的评论
fn create_test_review(name: &str) -> NewReview {
    NewReview::new(
        name,
        "Layar jernih, baterai awet, harga pas",
        SentimentResult::new("positive", 0.8731),
        vec!["Layar jernih".to_string(), "Baterai awet".to_string()],
    )
}

#[tokio::test]
async fn test_memory_store_via_manager() {
    let store = connect_store(&StorageConfig::new("memory://")).await.unwrap();
    assert_eq!(store.storage_type(), StorageType::Memory);

    let stored = store.create(create_test_review("Tablet")).await.unwrap();
    let page = store.list(ListQuery::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.reviews, vec![stored]);
}

#[cfg(feature = "storage-sqlite")]
#[tokio::test]
async fn test_sqlite_store_persists_across_connections() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("reviews.db");
    let config = StorageConfig::new(format!("sqlite://{}?mode=rwc", db_path.display()));

    let stored = {
        let store = connect_store(&config).await.expect("Failed to open SQLite store");
        assert_eq!(store.storage_type(), StorageType::SQLite);

        store.create(create_test_review("Phone A")).await.unwrap();
        store.create(create_test_review("Phone B")).await.unwrap()
    };

    // 重新打开同一个数据库文件
    let store = connect_store(&config).await.expect("Failed to reopen SQLite store");
    let fetched = store.get(stored.id).await.unwrap().expect("review should exist");
    assert_eq!(fetched, stored);
    assert_eq!(fetched.key_points, vec!["Layar jernih", "Baterai awet"]);

    let page = store.list(ListQuery::new(1, 0)).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.reviews[0].product_name, "Phone B");
}

#[cfg(feature = "storage-sqlite")]
#[tokio::test]
async fn test_sqlite_pagination_and_delete() {
    let store = connect_store(&StorageConfig::new("sqlite::memory:")).await.unwrap();

    let mut ids = Vec::new();
    for name in ["A", "B", "C", "D"] {
        ids.push(store.create(create_test_review(name)).await.unwrap().id);
    }

    let page = store.list(ListQuery::new(2, 1)).await.unwrap();
    assert_eq!(page.total, 4);
    let names: Vec<_> = page.reviews.iter().map(|r| r.product_name.as_str()).collect();
    assert_eq!(names, vec!["C", "B"]);

    assert!(store.delete(ids[0]).await.unwrap());
    assert!(!store.delete(ids[0]).await.unwrap());
    assert_eq!(store.list(ListQuery::default()).await.unwrap().total, 3);
}

#[tokio::test]
async fn test_unsupported_backend_is_rejected() {
    let result = connect_store(&StorageConfig::new("mongodb://localhost/reviews")).await;
    assert!(result.is_err());
}
