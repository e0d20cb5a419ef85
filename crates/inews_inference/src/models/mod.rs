use inews_core::{ApiKeys, ImageGenerator, Result, TextGenerator};
use std::sync::Arc;
use crate::Config;

pub mod dummy;
pub mod huggingface;
pub mod openai;

pub use dummy::DummyModel;
pub use huggingface::HuggingFaceModel;
pub use openai::OpenAiModel;

pub fn create_text_model(keys: &ApiKeys, config: &Config) -> Result<Arc<dyn TextGenerator>> {
    let model = OpenAiModel::new(keys.openai.clone())?
        .with_base_url(&config.openai_url)
        .with_model(&config.openai_model);
    Ok(Arc::new(model))
}

pub fn create_image_model(keys: &ApiKeys, config: &Config) -> Result<Arc<dyn ImageGenerator>> {
    let model = HuggingFaceModel::new(keys.huggingface.clone())?
        .with_base_url(&config.huggingface_url)
        .with_model(&config.huggingface_model);
    Ok(Arc::new(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use inews_core::Error;

    #[test]
    fn test_create_models_need_keys() {
        let config = Config::default();
        let empty = ApiKeys::default();
        assert!(matches!(
            create_text_model(&empty, &config),
            Err(Error::MissingApiKey("openai"))
        ));
        assert!(matches!(
            create_image_model(&empty, &config),
            Err(Error::MissingApiKey("huggingface"))
        ));

        let keys = ApiKeys {
            newsapi: String::new(),
            openai: "sk-test".to_string(),
            huggingface: "hf-test".to_string(),
        };
        assert_eq!(create_text_model(&keys, &config).unwrap().name(), "OpenAI");
        assert_eq!(create_image_model(&keys, &config).unwrap().name(), "HuggingFace");
    }
}
