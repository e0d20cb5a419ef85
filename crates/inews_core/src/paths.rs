use std::path::{Path, PathBuf};
use crate::{Error, Result};

pub const APP_FOLDER: &str = "Documents/IntelliNews";
pub const SETTINGS_FOLDER: &str = ".intellinews";
pub const SETTINGS_FILE: &str = "settings.json";

/// Where every piece of local state lives, rooted at a home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub headlines_dir: PathBuf,
    pub search_dir: PathBuf,
    pub folders_dir: PathBuf,
    pub settings_file: PathBuf,
}

impl AppPaths {
    pub fn from_home(home: impl AsRef<Path>) -> Self {
        let home = home.as_ref();
        let app = home.join(APP_FOLDER);
        Self {
            headlines_dir: app.join("headlines"),
            search_dir: app.join("search"),
            folders_dir: app.join("folders"),
            settings_file: home.join(SETTINGS_FOLDER).join(SETTINGS_FILE),
        }
    }

    /// Resolve paths from the current user's home directory
    pub fn discover() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not determine home directory",
            ))
        })?;
        Ok(Self::from_home(home))
    }

    /// Create every directory the stores write into
    pub async fn ensure_dirs(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.headlines_dir).await?;
        tokio::fs::create_dir_all(&self.search_dir).await?;
        tokio::fs::create_dir_all(&self.folders_dir).await?;
        if let Some(parent) = self.settings_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_dirs_creates_layout() {
        let home = tempfile::tempdir().unwrap();
        let paths = AppPaths::from_home(home.path());

        assert!(paths.headlines_dir.ends_with("Documents/IntelliNews/headlines"));
        assert!(paths.settings_file.ends_with(".intellinews/settings.json"));

        paths.ensure_dirs().await.unwrap();
        assert!(paths.headlines_dir.is_dir());
        assert!(paths.search_dir.is_dir());
        assert!(paths.folders_dir.is_dir());
        assert!(!paths.settings_file.exists());
    }
}
