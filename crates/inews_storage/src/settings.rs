use anyhow::anyhow;
use inews_core::{ApiKeys, HeadlineSettings, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info};

const KEYS_SECTION: &str = "keys";
const HEADLINES_SECTION: &str = "headlines";

/// The user's `settings.json`.
///
/// Reads seed a default document when the file is missing. Writes are
/// read-modify-write on a single section and leave unknown fields alone.
/// There is no locking: concurrent writers race and the last one wins.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn default_document() -> Value {
        json!({
            KEYS_SECTION: ApiKeys::default(),
            HEADLINES_SECTION: HeadlineSettings::default(),
        })
    }

    /// Seed the default document if no settings file exists yet
    pub async fn ensure(&self) -> Result<()> {
        self.load_document().await.map(|_| ())
    }

    /// Parse the settings document, writing the defaults first if it is absent
    async fn load_document(&self) -> Result<Value> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let document = Self::default_document();
                self.save_document(&document).await?;
                info!("Created settings file at {}", self.path.display());
                Ok(document)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save_document(&self, document: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_string_pretty(document)?).await?;
        Ok(())
    }

    async fn load_section<T>(&self, section: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let document = self.load_document().await?;
        match document.get(section) {
            Some(value) if !value.is_null() => Ok(serde_json::from_value(value.clone())?),
            _ => Ok(T::default()),
        }
    }

    async fn write_section<T>(&self, section: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let mut document = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => serde_json::from_str(&data)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Value::Object(Map::new()),
            Err(e) => return Err(e.into()),
        };
        let root = document
            .as_object_mut()
            .ok_or_else(|| anyhow!("settings file {} is not a JSON object", self.path.display()))?;

        let Value::Object(fields) = serde_json::to_value(value)? else {
            return Err(anyhow!("settings section {} must serialize to an object", section).into());
        };
        let target = root
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match target.as_object_mut() {
            Some(existing) => existing.extend(fields),
            None => *target = Value::Object(fields),
        }

        self.save_document(&document).await
    }

    pub async fn load_api_keys(&self) -> ApiKeys {
        self.load_section(KEYS_SECTION).await.unwrap_or_else(|e| {
            error!("Error loading API keys: {}", e);
            ApiKeys::default()
        })
    }

    pub async fn write_api_keys(&self, keys: &ApiKeys) {
        if let Err(e) = self.write_section(KEYS_SECTION, keys).await {
            error!("Error writing API keys: {}", e);
        }
    }

    pub async fn load_headline_settings(&self) -> HeadlineSettings {
        self.load_section(HEADLINES_SECTION).await.unwrap_or_else(|e| {
            error!("Error loading headline settings: {}", e);
            HeadlineSettings::default()
        })
    }

    pub async fn write_headline_settings(&self, settings: &HeadlineSettings) {
        if let Err(e) = self.write_section(HEADLINES_SECTION, settings).await {
            error!("Error writing headline settings: {}", e);
        }
    }
}
