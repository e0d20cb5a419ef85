use async_trait::async_trait;
use std::fmt;
use crate::types::{Article, HeadlineSettings, SearchParams};
use crate::Result;

#[async_trait]
pub trait TextGenerator: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Run one chat completion with a system instruction and a user prompt
    async fn complete(&self, instruction: &str, prompt: &str) -> Result<String>;
}

#[async_trait]
pub trait ImageGenerator: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Render a prompt into encoded image bytes
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait NewsSource: Send + Sync + fmt::Debug {
    /// Fetch the current top headlines for the configured category
    async fn top_headlines(&self, settings: &HeadlineSettings) -> Result<Vec<Article>>;

    /// Run a keyword search
    async fn search(&self, params: &SearchParams) -> Result<Vec<Article>>;
}
