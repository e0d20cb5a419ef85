use inews_core::{Error, ImageGenerator, ImageStyle, Result, SubEditor, TextGenerator};
use inews_storage::FolderStore;
use tracing::info;

pub fn editor_instruction(editor: SubEditor) -> &'static str {
    match editor {
        SubEditor::Summary => {
            "You are a news editor. Summarize the following articles into a concise \
             overview of the main events. Use plain prose and keep it under 300 words."
        }
        SubEditor::Trends => {
            "You are a news analyst. Identify the recurring themes and emerging trends \
             across the following articles and explain each in a short paragraph."
        }
        SubEditor::Suggestions => {
            "You are a research assistant. Based on the following articles, suggest \
             follow-up questions, angles and sources worth investigating next."
        }
        SubEditor::Report => {
            "You are a senior correspondent. Write a structured report on the following \
             articles with a headline, key facts, context and an outlook section."
        }
    }
}

pub fn build_prompt(news: &str, extra_instruction: Option<&str>) -> String {
    match extra_instruction.map(str::trim).filter(|s| !s.is_empty()) {
        Some(extra) => format!("{}\n\nAdditional instruction: {}", news.trim(), extra),
        None => news.trim().to_string(),
    }
}

pub fn image_prompt(news_titles: &str, style: ImageStyle) -> String {
    let style = match style {
        ImageStyle::Realistic => "photorealistic editorial photograph, natural light",
        ImageStyle::Cartoon => "bold flat cartoon illustration, vivid colors",
        ImageStyle::Watercolor => "soft watercolor painting, muted palette",
        ImageStyle::Sketch => "pencil sketch, cross-hatching, monochrome",
    };
    format!(
        "Magazine cover art inspired by these headlines: {}. Style: {}. No text or lettering.",
        news_titles.trim(),
        style
    )
}

/// Ask the text model for one editor's artifact and store it in the folder
pub async fn get_openai_response(
    model: &dyn TextGenerator,
    folders: &FolderStore,
    folder: &str,
    editor: SubEditor,
    news: &str,
    extra_instruction: Option<&str>,
) -> Result<String> {
    if !folders.exists(folder).await? {
        return Err(Error::FolderNotFound(folder.to_string()));
    }
    if news.trim().is_empty() {
        return Err(Error::InvalidArgument("no news to work from".to_string()));
    }

    let prompt = build_prompt(news, extra_instruction);
    let text = model.complete(editor_instruction(editor), &prompt).await?;
    folders.write_generated(folder, editor, &text).await?;
    info!("{} wrote {} for folder {}", model.name(), editor, folder);
    Ok(text)
}

/// Render a cover image for the folder and return it as a data URL
pub async fn get_huggingface_response(
    model: &dyn ImageGenerator,
    folders: &FolderStore,
    news_titles: &str,
    folder: &str,
    style: ImageStyle,
) -> Result<Option<String>> {
    if !folders.exists(folder).await? {
        return Err(Error::FolderNotFound(folder.to_string()));
    }

    let bytes = model.generate_image(&image_prompt(news_titles, style)).await?;
    folders.write_cover_image(folder, &bytes).await?;
    folders.cover_image(folder).await
}
