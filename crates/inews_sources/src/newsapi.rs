use async_trait::async_trait;
use inews_core::{Article, Error, HeadlineSettings, NewsSource, Result, SearchParams};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::debug;
use url::Url;

pub const NEWSAPI_URL: &str = "https://newsapi.org/v2/";
const MAX_PAGE_SIZE: u32 = 100;
const REMOVED_TITLE: &str = "[Removed]";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<Article>,
    code: Option<String>,
    message: Option<String>,
}

impl NewsApiResponse {
    fn into_articles(self) -> Result<Vec<Article>> {
        if self.status != "ok" {
            let message = self
                .message
                .or(self.code)
                .unwrap_or_else(|| format!("status {}", self.status));
            return Err(Error::NewsApi(message));
        }
        Ok(self
            .articles
            .into_iter()
            .filter(|a| a.title != REMOVED_TITLE)
            .collect())
    }
}

/// Client for the NewsAPI `top-headlines` and `everything` endpoints.
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: Url,
    country: String,
}

impl NewsApiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey("newsapi"));
        }
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: Url::parse(NEWSAPI_URL).map_err(|e| Error::InvalidArgument(e.to_string()))?,
            country: "us".to_string(),
        })
    }

    /// Point the client at another server; the path keeps a trailing slash so
    /// endpoints join underneath it
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        self.base_url = Url::parse(&normalized).map_err(|e| Error::InvalidArgument(e.to_string()))?;
        Ok(self)
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Vec<Article>> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| Error::InvalidArgument(e.to_string()))?;
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .query(query)
            .send()
            .await?
            .json::<NewsApiResponse>()
            .await?;
        response.into_articles()
    }
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("country", &self.country)
            .finish()
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn top_headlines(&self, settings: &HeadlineSettings) -> Result<Vec<Article>> {
        let page_size = settings.headline_size.clamp(1, MAX_PAGE_SIZE);
        let query = [
            ("country", self.country.clone()),
            ("category", settings.category.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        self.get("top-headlines", &query).await
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Article>> {
        let keywords = params
            .keywords
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::InvalidArgument("search keywords are required".to_string()))?;

        let mut query = vec![
            ("q", keywords.to_string()),
            ("pageSize", MAX_PAGE_SIZE.to_string()),
        ];
        let optional = [
            ("language", &params.language),
            ("sortBy", &params.sort_by),
            ("from", &params.from),
            ("to", &params.to),
        ];
        for (name, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                query.push((name, value.to_string()));
            }
        }
        self.get("everything", &query).await
    }
}
