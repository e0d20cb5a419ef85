use inews_core::{ApiKeys, ImageGenerator, Result, TextGenerator};
use std::sync::Arc;

pub mod editor;
pub mod models;

pub const OPENAI_URL: &str = "https://api.openai.com/v1";
pub const OPENAI_MODEL: &str = "gpt-4o-mini";
pub const HUGGINGFACE_URL: &str = "https://api-inference.huggingface.co/models";
pub const HUGGINGFACE_MODEL: &str = "stabilityai/stable-diffusion-xl-base-1.0";

/// Endpoints and model names for the remote providers.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_url: String,
    pub openai_model: String,
    pub huggingface_url: String,
    pub huggingface_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_url: OPENAI_URL.to_string(),
            openai_model: OPENAI_MODEL.to_string(),
            huggingface_url: HUGGINGFACE_URL.to_string(),
            huggingface_model: HUGGINGFACE_MODEL.to_string(),
        }
    }
}

impl Config {
    pub fn text_model(&self, keys: &ApiKeys) -> Result<Arc<dyn TextGenerator>> {
        models::create_text_model(keys, self)
    }

    pub fn image_model(&self, keys: &ApiKeys) -> Result<Arc<dyn ImageGenerator>> {
        models::create_image_model(keys, self)
    }
}

pub mod prelude {
    pub use super::Config;
    pub use super::editor::{get_huggingface_response, get_openai_response};
    pub use super::models::{create_image_model, create_text_model};
    pub use inews_core::{ImageGenerator, Result, SubEditor, TextGenerator};
}

pub use editor::{get_huggingface_response, get_openai_response};
pub use models::{create_image_model, create_text_model};
