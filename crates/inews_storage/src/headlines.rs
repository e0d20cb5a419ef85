use chrono::{Days, NaiveDate, Utc};
use inews_core::{Article, ArticleCollection, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

use crate::batch::merge_batch_files;

const BATCH_EXTENSION: &str = ".json";

/// The current date in UTC, which is what batch file names are stamped with.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn date_prefix(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn batch_date(name: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(name.get(..10)?, "%Y-%m-%d").ok()
}

/// Date-partitioned cache of fetched headline batches.
///
/// Each fetch lands in its own `<YYYY-MM-DD>-<suffix>.json` file. Loads merge
/// every matching file newest first and keep one article per title.
#[derive(Debug, Clone)]
pub struct HeadlineStore {
    dir: PathBuf,
}

impl HeadlineStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn load_today(&self) -> Option<ArticleCollection> {
        self.load_today_on(today_utc()).await
    }

    pub async fn load_today_on(&self, today: NaiveDate) -> Option<ArticleCollection> {
        let prefix = date_prefix(today);
        self.load_matching("today's", |name| name.starts_with(&prefix))
            .await
    }

    pub async fn load_previous(&self) -> Option<ArticleCollection> {
        self.load_previous_on(today_utc()).await
    }

    pub async fn load_previous_on(&self, today: NaiveDate) -> Option<ArticleCollection> {
        let prefix = date_prefix(today);
        self.load_matching("previous", |name| !name.starts_with(&prefix))
            .await
    }

    async fn load_matching<F>(&self, label: &str, matches: F) -> Option<ArticleCollection>
    where
        F: Fn(&str) -> bool,
    {
        match self.try_load_matching(matches).await {
            Ok(collection) => collection,
            Err(e) => {
                error!("Error loading {} headlines: {}", label, e);
                None
            }
        }
    }

    async fn try_load_matching<F>(&self, matches: F) -> Result<Option<ArticleCollection>>
    where
        F: Fn(&str) -> bool,
    {
        let Some(names) = self.batch_names().await? else {
            return Ok(None);
        };
        let mut names: Vec<String> = names.into_iter().filter(|name| matches(name)).collect();
        if names.is_empty() {
            return Ok(None);
        }

        names.sort_by(|a, b| b.cmp(a));
        let paths: Vec<PathBuf> = names.iter().map(|name| self.dir.join(name)).collect();
        Ok(Some(merge_batch_files(&paths).await))
    }

    /// Names of every `.json` file in the directory, or `None` when it does not exist
    async fn batch_names(&self) -> Result<Option<Vec<String>>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Ok(name) = entry.file_name().into_string() {
                if name.ends_with(BATCH_EXTENSION) {
                    names.push(name);
                }
            }
        }
        Ok(Some(names))
    }

    /// Write a new batch stamped with the current UTC time.
    /// Existing batches are never overwritten.
    pub async fn write_batch(&self, articles: &[Article]) -> Result<PathBuf> {
        let stamp = Utc::now().format("%Y-%m-%d-%H%M%S%3f").to_string();
        self.write_stamped(&stamp, articles).await
    }

    async fn write_stamped(&self, stamp: &str, articles: &[Article]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let body = serde_json::to_string_pretty(&serde_json::json!({ "articles": articles }))?;

        let mut attempt = 0u32;
        loop {
            let name = match attempt {
                0 => format!("{}{}", stamp, BATCH_EXTENSION),
                // `_` sorts after `.`, keeping the later batch first in descending order
                n => format!("{}_{:03}{}", stamp, n, BATCH_EXTENSION),
            };
            let path = self.dir.join(name);
            let file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;
            match file {
                Ok(mut file) => {
                    file.write_all(body.as_bytes()).await?;
                    file.flush().await?;
                    info!("Cached {} headlines in {}", articles.len(), path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub async fn remove_today(&self) -> Result<usize> {
        self.remove_today_on(today_utc()).await
    }

    /// Delete today's batches so the next load triggers a fresh fetch
    pub async fn remove_today_on(&self, today: NaiveDate) -> Result<usize> {
        let prefix = date_prefix(today);
        self.remove_where(|name| name.starts_with(&prefix)).await
    }

    pub async fn prune_older_than(&self, days: u32) -> Result<usize> {
        self.prune_older_than_on(today_utc(), days).await
    }

    /// Delete batches dated more than `days` before `today`.
    /// Files without a date prefix are kept.
    pub async fn prune_older_than_on(&self, today: NaiveDate, days: u32) -> Result<usize> {
        // A lookback reaching past the calendar keeps everything
        let Some(cutoff) = today.checked_sub_days(Days::new(u64::from(days))) else {
            return Ok(0);
        };
        self.remove_where(|name| batch_date(name).is_some_and(|date| date < cutoff))
            .await
    }

    async fn remove_where<F>(&self, matches: F) -> Result<usize>
    where
        F: Fn(&str) -> bool,
    {
        let Some(names) = self.batch_names().await? else {
            return Ok(0);
        };

        let mut removed = 0;
        for name in names.iter().filter(|name| matches(name)) {
            tokio::fs::remove_file(self.dir.join(name)).await?;
            debug!("Removed headline batch {}", name);
            removed += 1;
        }
        Ok(removed)
    }
}
