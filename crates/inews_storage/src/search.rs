use inews_core::{Article, ArticleCollection, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::batch::read_batch;

pub const SEARCH_RESULTS_FILE: &str = "search_results.json";

/// Holds the most recent search, replaced on every new query.
#[derive(Debug, Clone)]
pub struct SearchResultStore {
    dir: PathBuf,
}

impl SearchResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SEARCH_RESULTS_FILE)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn write(&self, articles: &[Article]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path();
        let body = serde_json::to_string_pretty(&serde_json::json!({ "articles": articles }))?;
        tokio::fs::write(&path, body).await?;
        info!("Cached {} search results", articles.len());
        Ok(path)
    }

    /// The last search, or `None` when nothing usable has been cached
    pub async fn load(&self) -> Option<ArticleCollection> {
        let path = self.path();
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return None;
        }
        read_batch(&path).await.map(ArticleCollection::dedup_from)
    }
}
