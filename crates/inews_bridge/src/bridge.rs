use inews_core::{
    ApiKeys, Article, Error, HeadlineSettings, ImageGenerator, ImageStyle, NewsSource, Result,
    SearchParams, SubEditor, TextGenerator,
};
use inews_inference::Config as InferenceConfig;
use inews_sources::NewsApiClient;
use inews_storage::Stores;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::Channel;

/// Builds the remote clients for one request from the keys stored at that moment.
pub trait ClientFactory: Send + Sync {
    fn news_source(&self, keys: &ApiKeys) -> Result<Arc<dyn NewsSource>>;
    fn text_model(&self, keys: &ApiKeys) -> Result<Arc<dyn TextGenerator>>;
    fn image_model(&self, keys: &ApiKeys) -> Result<Arc<dyn ImageGenerator>>;
}

/// NewsAPI, OpenAI and HuggingFace over HTTP.
#[derive(Debug, Clone, Default)]
pub struct RemoteClients {
    pub newsapi_url: Option<String>,
    pub inference: InferenceConfig,
}

impl ClientFactory for RemoteClients {
    fn news_source(&self, keys: &ApiKeys) -> Result<Arc<dyn NewsSource>> {
        let mut client = NewsApiClient::new(keys.newsapi.clone())?;
        if let Some(url) = &self.newsapi_url {
            client = client.with_base_url(url)?;
        }
        Ok(Arc::new(client))
    }

    fn text_model(&self, keys: &ApiKeys) -> Result<Arc<dyn TextGenerator>> {
        self.inference.text_model(keys)
    }

    fn image_model(&self, keys: &ApiKeys) -> Result<Arc<dyn ImageGenerator>> {
        self.inference.image_model(keys)
    }
}

/// Positional channel arguments, as the UI sends them.
struct Args {
    channel: Channel,
    values: Vec<Value>,
}

impl Args {
    fn take(&mut self, index: usize) -> Value {
        self.values
            .get_mut(index)
            .map(Value::take)
            .unwrap_or(Value::Null)
    }

    fn required<T: DeserializeOwned>(&mut self, index: usize, name: &str) -> Result<T> {
        let value = self.take(index);
        if value.is_null() {
            return Err(Error::InvalidArgument(format!(
                "{} expects `{}` at position {}",
                self.channel, name, index
            )));
        }
        serde_json::from_value(value).map_err(|e| {
            Error::InvalidArgument(format!("{}: bad `{}`: {}", self.channel, name, e))
        })
    }

    fn optional<T: DeserializeOwned>(&mut self, index: usize, name: &str) -> Result<Option<T>> {
        match self.take(index) {
            Value::Null => Ok(None),
            value => serde_json::from_value(value).map(Some).map_err(|e| {
                Error::InvalidArgument(format!("{}: bad `{}`: {}", self.channel, name, e))
            }),
        }
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Folder mutations report success as a plain boolean; failures are logged
fn flag(channel: Channel, result: Result<bool>) -> Value {
    Value::Bool(result.unwrap_or_else(|e| {
        warn!("{} failed: {}", channel, e);
        false
    }))
}

/// Forwards each channel to exactly one store or provider operation.
#[derive(Clone)]
pub struct Bridge {
    stores: Stores,
    clients: Arc<dyn ClientFactory>,
}

impl Bridge {
    pub fn new(stores: Stores, clients: Arc<dyn ClientFactory>) -> Self {
        Self { stores, clients }
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub async fn invoke(&self, channel: Channel, args: Vec<Value>) -> Result<Value> {
        debug!("IPC {} ({} args)", channel, args.len());
        let mut args = Args {
            channel,
            values: args,
        };
        let stores = &self.stores;

        match channel {
            Channel::GetHeadlines => {
                let keys = stores.settings.load_api_keys().await;
                let source = self.clients.news_source(&keys)?;
                inews_sources::get_headlines(source.as_ref(), stores).await?;
                Ok(Value::Null)
            }
            Channel::GetSearchResults => {
                let params: SearchParams = args.required(0, "searchParams")?;
                let keys = stores.settings.load_api_keys().await;
                let source = self.clients.news_source(&keys)?;
                inews_sources::get_search_results(source.as_ref(), stores, &params).await?;
                Ok(Value::Null)
            }
            Channel::GetOpenAIResponse => {
                let folder: String = args.required(0, "folder")?;
                let editor: SubEditor = args.required(1, "editor")?;
                let news: String = args.required(2, "news")?;
                let extra: Option<String> = args.optional(3, "extraInstruction")?;
                let keys = stores.settings.load_api_keys().await;
                let model = self.clients.text_model(&keys)?;
                let text = inews_inference::get_openai_response(
                    model.as_ref(),
                    &stores.folders,
                    &folder,
                    editor,
                    &news,
                    extra.as_deref(),
                )
                .await?;
                Ok(Value::String(text))
            }
            Channel::GetHuggingFaceResponse => {
                let titles: String = args.required(0, "newsTitles")?;
                let folder: String = args.required(1, "folder")?;
                let style: ImageStyle = args.optional(2, "style")?.unwrap_or_default();
                let keys = stores.settings.load_api_keys().await;
                let model = self.clients.image_model(&keys)?;
                let image = inews_inference::get_huggingface_response(
                    model.as_ref(),
                    &stores.folders,
                    &titles,
                    &folder,
                    style,
                )
                .await?;
                to_json(image)
            }
            Channel::LoadTodayHeadlines => to_json(stores.headlines.load_today().await),
            Channel::LoadPrevHeadlines => to_json(stores.headlines.load_previous().await),
            Channel::LoadSearchResults => to_json(stores.search.load().await),
            Channel::LoadFolderCoverImg => {
                let folder: String = args.required(0, "folder")?;
                to_json(stores.folders.cover_image(&folder).await?)
            }
            Channel::LoadApiKeys => to_json(stores.settings.load_api_keys().await),
            Channel::LoadHeadlineSettings => {
                to_json(stores.settings.load_headline_settings().await)
            }
            Channel::WriteApiKeys => {
                let keys: ApiKeys = args.required(0, "keys")?;
                stores.settings.write_api_keys(&keys).await;
                Ok(Value::Null)
            }
            Channel::WriteHeadlineSettings => {
                let settings: HeadlineSettings = args.required(0, "settings")?;
                stores.settings.write_headline_settings(&settings).await;
                Ok(Value::Null)
            }
            Channel::RemoveTodayHeadlines => {
                stores.headlines.remove_today().await?;
                Ok(Value::Null)
            }
            Channel::LoadUserFolders => to_json(stores.folders.list().await?),
            Channel::CreateUserFolder => {
                let folder: String = args.required(0, "folderName")?;
                Ok(flag(channel, stores.folders.create(&folder).await))
            }
            Channel::RemoveUserFolder => {
                let folder: String = args.required(0, "folderName")?;
                Ok(flag(channel, stores.folders.remove(&folder).await))
            }
            Channel::LoadFolderContents => {
                let folder: String = args.required(0, "folder")?;
                to_json(stores.folders.contents(&folder).await?)
            }
            Channel::AddArticleToFolder => {
                let article: Article = args.required(0, "article")?;
                let folder: String = args.required(1, "folderName")?;
                Ok(flag(channel, stores.folders.add_article(&folder, &article).await))
            }
            Channel::RemoveArticleFromFolder => {
                let article: Article = args.required(0, "article")?;
                let folder: String = args.required(1, "folderName")?;
                Ok(flag(
                    channel,
                    stores.folders.remove_article(&folder, &article.title).await,
                ))
            }
        }
    }

    /// Look a channel up by wire name, then invoke it
    pub async fn invoke_named(&self, name: &str, args: Vec<Value>) -> Result<Value> {
        let channel: Channel = name.parse()?;
        self.invoke(channel, args).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use inews_core::AppPaths;
    use inews_inference::models::DummyModel;
    use serde_json::json;

    #[derive(Debug)]
    pub(crate) struct CannedSource;

    #[async_trait]
    impl NewsSource for CannedSource {
        async fn top_headlines(&self, _settings: &HeadlineSettings) -> Result<Vec<Article>> {
            Ok(vec![Article::new("Markets rally"), Article::new("Storm warning")])
        }

        async fn search(&self, params: &SearchParams) -> Result<Vec<Article>> {
            Ok(vec![Article::new(format!(
                "Result for {}",
                params.keywords.clone().unwrap_or_default()
            ))])
        }
    }

    pub(crate) struct OfflineClients;

    impl ClientFactory for OfflineClients {
        fn news_source(&self, _keys: &ApiKeys) -> Result<Arc<dyn NewsSource>> {
            Ok(Arc::new(CannedSource))
        }

        fn text_model(&self, _keys: &ApiKeys) -> Result<Arc<dyn TextGenerator>> {
            Ok(Arc::new(DummyModel))
        }

        fn image_model(&self, _keys: &ApiKeys) -> Result<Arc<dyn ImageGenerator>> {
            Ok(Arc::new(DummyModel))
        }
    }

    pub(crate) async fn offline_bridge(home: &std::path::Path) -> Bridge {
        let stores = Stores::ensure_project_files(&AppPaths::from_home(home))
            .await
            .unwrap();
        Bridge::new(stores, Arc::new(OfflineClients))
    }

    #[tokio::test]
    async fn test_fetch_then_load_today() {
        let home = tempfile::tempdir().unwrap();
        let bridge = offline_bridge(home.path()).await;

        let before = bridge.invoke(Channel::LoadTodayHeadlines, vec![]).await.unwrap();
        assert_eq!(before, Value::Null);

        bridge.invoke(Channel::GetHeadlines, vec![]).await.unwrap();
        let today = bridge.invoke(Channel::LoadTodayHeadlines, vec![]).await.unwrap();
        assert_eq!(today["articles"][0]["title"], "Markets rally");
        assert_eq!(today["articles"].as_array().unwrap().len(), 2);
        assert_eq!(
            bridge.invoke(Channel::LoadPrevHeadlines, vec![]).await.unwrap(),
            Value::Null
        );

        bridge.invoke(Channel::RemoveTodayHeadlines, vec![]).await.unwrap();
        let after = bridge.invoke(Channel::LoadTodayHeadlines, vec![]).await.unwrap();
        assert_eq!(after, Value::Null);
    }

    #[tokio::test]
    async fn test_search_round_trip() {
        let home = tempfile::tempdir().unwrap();
        let bridge = offline_bridge(home.path()).await;

        bridge
            .invoke(Channel::GetSearchResults, vec![json!({ "keywords": "fusion" })])
            .await
            .unwrap();
        let results = bridge.invoke(Channel::LoadSearchResults, vec![]).await.unwrap();
        assert_eq!(results["articles"][0]["title"], "Result for fusion");
    }

    #[tokio::test]
    async fn test_settings_channels() {
        let home = tempfile::tempdir().unwrap();
        let bridge = offline_bridge(home.path()).await;

        let keys = json!({ "newsapi": "A", "openai": "B", "huggingface": "C" });
        let written = bridge
            .invoke(Channel::WriteApiKeys, vec![keys.clone()])
            .await
            .unwrap();
        assert_eq!(written, Value::Null);
        assert_eq!(bridge.invoke(Channel::LoadApiKeys, vec![]).await.unwrap(), keys);

        let settings = json!({ "category": "health", "headline_size": 30, "previous_days": 1 });
        bridge
            .invoke(Channel::WriteHeadlineSettings, vec![settings.clone()])
            .await
            .unwrap();
        assert_eq!(
            bridge.invoke(Channel::LoadHeadlineSettings, vec![]).await.unwrap(),
            settings
        );
    }

    #[tokio::test]
    async fn test_folder_channels() {
        let home = tempfile::tempdir().unwrap();
        let bridge = offline_bridge(home.path()).await;
        let article = json!({ "title": "Storm warning", "url": "http://example.com/storm" });

        let created = bridge
            .invoke(Channel::CreateUserFolder, vec![json!("Weather")])
            .await
            .unwrap();
        assert_eq!(created, json!(true));
        let again = bridge
            .invoke(Channel::CreateUserFolder, vec![json!("Weather")])
            .await
            .unwrap();
        assert_eq!(again, json!(false));
        let invalid = bridge
            .invoke(Channel::CreateUserFolder, vec![json!("../escape")])
            .await
            .unwrap();
        assert_eq!(invalid, json!(false));
        assert_eq!(
            bridge.invoke(Channel::LoadUserFolders, vec![]).await.unwrap(),
            json!(["Weather"])
        );

        let added = bridge
            .invoke(Channel::AddArticleToFolder, vec![article.clone(), json!("Weather")])
            .await
            .unwrap();
        assert_eq!(added, json!(true));

        let summary = bridge
            .invoke(
                Channel::GetOpenAIResponse,
                vec![json!("Weather"), json!("summary"), json!("Storm warning issued")],
            )
            .await
            .unwrap();
        assert_eq!(summary, json!("Storm warning issued"));

        let contents = bridge
            .invoke(Channel::LoadFolderContents, vec![json!("Weather")])
            .await
            .unwrap();
        assert_eq!(contents["articles"][0]["url"], "http://example.com/storm");
        assert_eq!(
            contents["generated_contents"]["summary"],
            "Storm warning issued"
        );

        assert_eq!(
            bridge
                .invoke(Channel::LoadFolderCoverImg, vec![json!("Weather")])
                .await
                .unwrap(),
            Value::Null
        );
        let cover = bridge
            .invoke(
                Channel::GetHuggingFaceResponse,
                vec![json!("Storm warning"), json!("Weather"), json!("sketch")],
            )
            .await
            .unwrap();
        assert_eq!(
            bridge
                .invoke(Channel::LoadFolderCoverImg, vec![json!("Weather")])
                .await
                .unwrap(),
            cover
        );

        let removed = bridge
            .invoke(Channel::RemoveArticleFromFolder, vec![article, json!("Weather")])
            .await
            .unwrap();
        assert_eq!(removed, json!(true));
        let removed = bridge
            .invoke(Channel::RemoveUserFolder, vec![json!("Weather")])
            .await
            .unwrap();
        assert_eq!(removed, json!(true));
    }

    #[tokio::test]
    async fn test_missing_or_bad_arguments_are_rejected() {
        let home = tempfile::tempdir().unwrap();
        let bridge = offline_bridge(home.path()).await;

        let missing = bridge.invoke(Channel::LoadFolderContents, vec![]).await;
        assert!(matches!(missing, Err(Error::InvalidArgument(_))));

        let bad = bridge
            .invoke(
                Channel::GetOpenAIResponse,
                vec![json!("Weather"), json!("poem"), json!("news")],
            )
            .await;
        assert!(matches!(bad, Err(Error::InvalidArgument(_))));

        let unknown = bridge.invoke_named("formatDisk", vec![]).await;
        assert!(matches!(unknown, Err(Error::UnknownChannel(_))));
    }

    #[tokio::test]
    async fn test_remote_clients_need_stored_keys() {
        let home = tempfile::tempdir().unwrap();
        let stores = Stores::ensure_project_files(&AppPaths::from_home(home.path()))
            .await
            .unwrap();
        let bridge = Bridge::new(stores, Arc::new(RemoteClients::default()));

        let result = bridge.invoke(Channel::GetHeadlines, vec![]).await;
        assert!(matches!(result, Err(Error::MissingApiKey("newsapi"))));
    }
}
