use chrono::NaiveDate;
use inews_core::{ApiKeys, AppPaths};
use inews_storage::Stores;
use serde_json::json;

#[tokio::test]
async fn fresh_home_gets_layout_and_seeded_settings() {
    let home = tempfile::tempdir().unwrap();
    let paths = AppPaths::from_home(home.path());

    let stores = Stores::ensure_project_files(&paths).await.unwrap();

    assert!(paths.headlines_dir.is_dir());
    assert!(paths.folders_dir.is_dir());
    assert!(paths.settings_file.is_file());
    assert_eq!(stores.settings.load_api_keys().await, ApiKeys::default());
    assert!(stores.headlines.load_today().await.is_none());
    assert!(stores.folders.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn same_day_batches_collapse_duplicate_titles() {
    let home = tempfile::tempdir().unwrap();
    let paths = AppPaths::from_home(home.path());
    let stores = Stores::ensure_project_files(&paths).await.unwrap();

    tokio::fs::write(
        paths.headlines_dir.join("2024-01-01-a.json"),
        json!({ "articles": [{ "title": "X" }] }).to_string(),
    )
    .await
    .unwrap();
    tokio::fs::write(
        paths.headlines_dir.join("2024-01-01-b.json"),
        json!({ "articles": [{ "title": "X" }, { "title": "Y" }] }).to_string(),
    )
    .await
    .unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let collection = stores.headlines.load_today_on(today).await.unwrap();
    assert_eq!(collection.len(), 2);
    assert!(collection.contains_title("X"));
    assert!(collection.contains_title("Y"));

    let tomorrow = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    assert!(stores.headlines.load_today_on(tomorrow).await.is_none());
    assert_eq!(stores.headlines.load_previous_on(tomorrow).await.unwrap().len(), 2);
}
