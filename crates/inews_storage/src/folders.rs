use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use inews_core::{Article, ArticleCollection, Error, FolderContents, Result, SubEditor};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ARTICLES_FILE: &str = "articles.json";
pub const COVER_IMAGE_FILE: &str = "cover.png";

/// A folder name must be a single, visible path component.
pub fn validate_folder_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if invalid {
        return Err(Error::InvalidFolderName(name.to_string()));
    }
    Ok(())
}

fn image_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(&b"WEBP"[..]) {
        "image/webp"
    } else {
        "image/png"
    }
}

/// User folders of saved articles and the artifacts generated for them.
#[derive(Debug, Clone)]
pub struct FolderStore {
    root: PathBuf,
}

impl FolderStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn folder_path(&self, name: &str) -> Result<PathBuf> {
        validate_folder_name(name)?;
        Ok(self.root.join(name))
    }

    pub async fn exists(&self, name: &str) -> Result<bool> {
        let path = self.folder_path(name)?;
        Ok(tokio::fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false))
    }

    async fn existing_folder(&self, name: &str) -> Result<PathBuf> {
        let path = self.folder_path(name)?;
        if !self.exists(name).await? {
            return Err(Error::FolderNotFound(name.to_string()));
        }
        Ok(path)
    }

    /// Folder names in alphabetical order
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                if !name.starts_with('.') {
                    names.push(name);
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Returns `false` when the folder already exists
    pub async fn create(&self, name: &str) -> Result<bool> {
        let path = self.folder_path(name)?;
        tokio::fs::create_dir_all(&self.root).await?;
        match tokio::fs::create_dir(&path).await {
            Ok(()) => {
                self.save_articles(&path, &ArticleCollection::default()).await?;
                info!("Created folder {}", name);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns `false` when there was no such folder
    pub async fn remove(&self, name: &str) -> Result<bool> {
        let path = self.folder_path(name)?;
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => {
                info!("Removed folder {}", name);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn load_articles(&self, folder: &Path) -> Result<ArticleCollection> {
        match tokio::fs::read_to_string(folder.join(ARTICLES_FILE)).await {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ArticleCollection::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_articles(&self, folder: &Path, articles: &ArticleCollection) -> Result<()> {
        let body = serde_json::to_string_pretty(articles)?;
        tokio::fs::write(folder.join(ARTICLES_FILE), body).await?;
        Ok(())
    }

    async fn read_optional(path: &Path) -> Result<String> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn contents(&self, name: &str) -> Result<FolderContents> {
        let folder = self.existing_folder(name).await?;
        let mut contents = FolderContents {
            articles: self.load_articles(&folder).await?.articles,
            ..FolderContents::default()
        };
        for editor in SubEditor::ALL {
            let text = Self::read_optional(&folder.join(editor.file_name())).await?;
            contents.generated_contents.set(editor, text);
        }
        Ok(contents)
    }

    /// Returns `false` when an article with the same title is already saved
    pub async fn add_article(&self, name: &str, article: &Article) -> Result<bool> {
        if article.title.is_empty() {
            return Err(Error::InvalidArgument("article has no title".to_string()));
        }
        let folder = self.existing_folder(name).await?;
        let mut saved = self.load_articles(&folder).await?;
        if saved.contains_title(&article.title) {
            return Ok(false);
        }
        saved.articles.push(article.clone());
        self.save_articles(&folder, &saved).await?;
        debug!("Saved \"{}\" to folder {}", article.title, name);
        Ok(true)
    }

    /// Returns `false` when no saved article has that title
    pub async fn remove_article(&self, name: &str, title: &str) -> Result<bool> {
        let folder = self.existing_folder(name).await?;
        let mut saved = self.load_articles(&folder).await?;
        let before = saved.len();
        saved.articles.retain(|a| a.title != title);
        if saved.len() == before {
            return Ok(false);
        }
        self.save_articles(&folder, &saved).await?;
        debug!("Removed \"{}\" from folder {}", title, name);
        Ok(true)
    }

    pub async fn write_generated(&self, name: &str, editor: SubEditor, text: &str) -> Result<()> {
        let folder = self.existing_folder(name).await?;
        tokio::fs::write(folder.join(editor.file_name()), text).await?;
        Ok(())
    }

    pub async fn write_cover_image(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let folder = self.existing_folder(name).await?;
        let path = folder.join(COVER_IMAGE_FILE);
        tokio::fs::write(&path, bytes).await?;
        info!("Wrote cover image for folder {} ({} bytes)", name, bytes.len());
        Ok(path)
    }

    /// The cover image as a `data:` URL, or `None` if none was generated
    pub async fn cover_image(&self, name: &str) -> Result<Option<String>> {
        let path = self.folder_path(name)?.join(COVER_IMAGE_FILE);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(format!(
                "data:{};base64,{}",
                image_mime(&bytes),
                STANDARD.encode(&bytes)
            ))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
