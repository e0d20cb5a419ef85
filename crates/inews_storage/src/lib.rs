pub mod batch;
pub mod folders;
pub mod headlines;
pub mod search;
pub mod settings;

pub use folders::FolderStore;
pub use headlines::{date_prefix, today_utc, HeadlineStore};
pub use search::SearchResultStore;
pub use settings::SettingsStore;

use inews_core::{AppPaths, Result};

/// Every local store, rooted at one set of application paths.
#[derive(Debug, Clone)]
pub struct Stores {
    pub headlines: HeadlineStore,
    pub search: SearchResultStore,
    pub settings: SettingsStore,
    pub folders: FolderStore,
}

impl Stores {
    pub fn new(paths: &AppPaths) -> Self {
        Self {
            headlines: HeadlineStore::new(&paths.headlines_dir),
            search: SearchResultStore::new(&paths.search_dir),
            settings: SettingsStore::new(&paths.settings_file),
            folders: FolderStore::new(&paths.folders_dir),
        }
    }

    /// Create the directory layout and seed the settings file on first run
    pub async fn ensure_project_files(paths: &AppPaths) -> Result<Self> {
        paths.ensure_dirs().await?;
        let stores = Self::new(paths);
        stores.settings.ensure().await?;
        Ok(stores)
    }
}

pub mod prelude {
    pub use super::{FolderStore, HeadlineStore, SearchResultStore, SettingsStore, Stores};
}
