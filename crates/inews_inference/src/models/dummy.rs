use async_trait::async_trait;
use inews_core::{ImageGenerator, Result, TextGenerator};
use std::fmt;

/// Smallest valid PNG signature, enough for callers that only store the bytes
pub const DUMMY_IMAGE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Offline stand-in for the remote providers.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

#[async_trait]
impl TextGenerator for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, _instruction: &str, prompt: &str) -> Result<String> {
        // Take first 20 words and join them
        let words: Vec<&str> = prompt.split_whitespace().take(20).collect();
        Ok(words.join(" "))
    }
}

#[async_trait]
impl ImageGenerator for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate_image(&self, _prompt: &str) -> Result<Vec<u8>> {
        Ok(DUMMY_IMAGE.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel;

        let text = TextGenerator::complete(&model, "ignored", "one  two\nthree").await.unwrap();
        assert_eq!(text, "one two three");

        let image = model.generate_image("anything").await.unwrap();
        assert!(image.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
