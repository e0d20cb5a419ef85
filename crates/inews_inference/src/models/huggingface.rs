use async_trait::async_trait;
use inews_core::{Error, ImageGenerator, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Text-to-image through the HuggingFace inference API.
pub struct HuggingFaceModel {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    model: String,
}

impl HuggingFaceModel {
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey("huggingface"));
        }
        Ok(Self {
            client: Arc::new(Client::new()),
            api_key,
            base_url: crate::HUGGINGFACE_URL.to_string(),
            model: crate::HUGGINGFACE_MODEL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

impl fmt::Debug for HuggingFaceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl ImageGenerator for HuggingFaceModel {
    fn name(&self) -> &str {
        "HuggingFace"
    }

    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        debug!("Requesting image from {}", self.model);
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, self.model))
            .bearer_auth(&self.api_key)
            .json(&json!({ "inputs": prompt }))
            .send()
            .await?;

        let status = response.status();
        // Errors come back as JSON, images as raw bytes
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));
        if !status.is_success() || is_json {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "HuggingFace request failed ({}): {}",
                status, body
            )));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(Error::Inference("HuggingFace returned an empty image".to_string()));
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_image_returns_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/org/painter"))
            .and(header("authorization", "Bearer hf-test"))
            .and(body_json(json!({ "inputs": "a lighthouse" })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1u8, 2, 3], "image/jpeg"))
            .mount(&server)
            .await;

        let model = HuggingFaceModel::new("hf-test".to_string())
            .unwrap()
            .with_base_url(&server.uri())
            .with_model("org/painter");
        assert_eq!(model.generate_image("a lighthouse").await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_loading_model_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "error": "Model is currently loading",
                "estimated_time": 20.0
            })))
            .mount(&server)
            .await;

        let model = HuggingFaceModel::new("hf-test".to_string())
            .unwrap()
            .with_base_url(&server.uri());
        let err = model.generate_image("x").await.unwrap_err();
        assert!(err.to_string().contains("currently loading"));
    }
}
