use futures::future::join_all;
use inews_core::{Article, ArticleCollection};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Pull the articles out of a parsed batch document.
///
/// Returns `None` when the document has no `articles` array. Individual
/// entries that are not article objects are dropped.
pub fn parse_batch(value: Value, origin: &Path) -> Option<Vec<Article>> {
    let entries = match value {
        Value::Object(mut map) => match map.remove("articles") {
            Some(Value::Array(entries)) => entries,
            _ => return None,
        },
        _ => return None,
    };

    let articles = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Article>(entry) {
            Ok(article) => Some(article),
            Err(e) => {
                warn!("Skipping malformed article in {}: {}", origin.display(), e);
                None
            }
        })
        .collect();
    Some(articles)
}

/// Read one batch file. Every failure is logged and yields `None`.
pub async fn read_batch(path: &Path) -> Option<Vec<Article>> {
    let data = match tokio::fs::read_to_string(path).await {
        Ok(data) => data,
        Err(e) => {
            warn!("Error processing file {}: {}", path.display(), e);
            return None;
        }
    };
    let value: Value = match serde_json::from_str(&data) {
        Ok(value) => value,
        Err(e) => {
            warn!("Error processing file {}: {}", path.display(), e);
            return None;
        }
    };
    let articles = parse_batch(value, path);
    if articles.is_none() {
        warn!("Invalid data format in the file: {}", path.display());
    }
    articles
}

/// Read all files concurrently, then dedup in the order given.
///
/// `join_all` yields results in input order, so the first path always wins a
/// title collision no matter which read finishes first.
pub async fn merge_batch_files(paths: &[PathBuf]) -> ArticleCollection {
    let batches = join_all(paths.iter().map(|path| read_batch(path))).await;
    let collection = ArticleCollection::dedup_from(batches.into_iter().flatten().flatten());
    debug!(
        "Merged {} articles from {} files",
        collection.len(),
        paths.len()
    );
    collection
}
