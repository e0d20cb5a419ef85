use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// NewsAPI sometimes sends `null` (or a bare number) where a string is expected.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// A missing or malformed source must not cost the whole article.
fn lenient_source<'de, D>(deserializer: D) -> std::result::Result<ArticleSource, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
        _ => ArticleSource::default(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
}

/// A single headline as cached in batch files and saved in folders.
///
/// Articles are identified by their exact `title`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Article {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub url: String,
    pub url_to_image: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub published_at: String,
    #[serde(deserialize_with = "lenient_source")]
    pub source: ArticleSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn published(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Ordered articles with unique titles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleCollection {
    pub articles: Vec<Article>,
}

impl ArticleCollection {
    /// Keeps the first article seen for every title and drops untitled ones.
    pub fn dedup_from<I>(articles: I) -> Self
    where
        I: IntoIterator<Item = Article>,
    {
        let mut seen = HashSet::new();
        let articles = articles
            .into_iter()
            .filter(|article| !article.title.is_empty() && seen.insert(article.title.clone()))
            .collect();
        Self { articles }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn contains_title(&self, title: &str) -> bool {
        self.articles.iter().any(|a| a.title == title)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.articles.iter().map(|a| a.title.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Entertainment,
    #[default]
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeys {
    pub newsapi: String,
    pub openai: String,
    pub huggingface: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlineSettings {
    pub category: Category,
    pub headline_size: u32,
    pub previous_days: u32,
}

impl Default for HeadlineSettings {
    fn default() -> Self {
        Self {
            category: Category::General,
            headline_size: 100,
            previous_days: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// The AI-written text artifacts kept next to a folder's articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubEditor {
    Summary,
    Trends,
    Suggestions,
    Report,
}

impl SubEditor {
    pub const ALL: [SubEditor; 4] = [
        SubEditor::Summary,
        SubEditor::Trends,
        SubEditor::Suggestions,
        SubEditor::Report,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubEditor::Summary => "summary",
            SubEditor::Trends => "trends",
            SubEditor::Suggestions => "suggestions",
            SubEditor::Report => "report",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.txt", self.as_str())
    }
}

impl fmt::Display for SubEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubEditor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SubEditor::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("Unknown editor: {}", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    #[default]
    Realistic,
    Cartoon,
    Watercolor,
    Sketch,
}

impl FromStr for ImageStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "realistic" => Ok(ImageStyle::Realistic),
            "cartoon" => Ok(ImageStyle::Cartoon),
            "watercolor" => Ok(ImageStyle::Watercolor),
            "sketch" => Ok(ImageStyle::Sketch),
            other => Err(format!("Unknown image style: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedContents {
    pub summary: String,
    pub trends: String,
    pub suggestions: String,
    pub report: String,
}

impl GeneratedContents {
    pub fn get(&self, editor: SubEditor) -> &str {
        match editor {
            SubEditor::Summary => &self.summary,
            SubEditor::Trends => &self.trends,
            SubEditor::Suggestions => &self.suggestions,
            SubEditor::Report => &self.report,
        }
    }

    pub fn set(&mut self, editor: SubEditor, text: String) {
        match editor {
            SubEditor::Summary => self.summary = text,
            SubEditor::Trends => self.trends = text,
            SubEditor::Suggestions => self.suggestions = text,
            SubEditor::Report => self.report = text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderContents {
    pub articles: Vec<Article>,
    pub generated_contents: GeneratedContents,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_article_tolerates_nulls_and_missing_fields() {
        let article: Article = serde_json::from_value(json!({
            "title": "Rates hold steady",
            "description": null,
            "url": null,
            "urlToImage": null,
            "source": { "id": null, "name": "Reuters" }
        }))
        .unwrap();

        assert_eq!(article.title, "Rates hold steady");
        assert_eq!(article.url, "");
        assert_eq!(article.description, None);
        assert_eq!(article.source.name, "Reuters");
        assert!(article.published().is_none());
    }

    #[test]
    fn test_article_survives_null_source_and_numeric_title() {
        let article: Article = serde_json::from_value(json!({
            "title": "Flood defences hold",
            "source": null
        }))
        .unwrap();
        assert_eq!(article.title, "Flood defences hold");
        assert_eq!(article.source, ArticleSource::default());

        let article: Article = serde_json::from_value(json!({
            "title": 2024,
            "source": "Reuters"
        }))
        .unwrap();
        assert_eq!(article.title, "2024");
        assert_eq!(article.source.name, "");

        let article: Article = serde_json::from_value(json!({
            "title": "Odd source",
            "source": { "id": 7, "name": "AP" }
        }))
        .unwrap();
        assert_eq!(article.source, ArticleSource::default());
    }

    #[test]
    fn test_article_serializes_camel_case() {
        let mut article = Article::new("X");
        article.url_to_image = Some("http://img".to_string());
        article.published_at = "2024-01-01T10:00:00Z".to_string();

        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["urlToImage"], "http://img");
        assert_eq!(value["publishedAt"], "2024-01-01T10:00:00Z");
        assert!(value.get("author").is_none());
        assert_eq!(
            article.published().unwrap().to_rfc3339(),
            "2024-01-01T10:00:00+00:00"
        );
    }

    #[test]
    fn test_dedup_keeps_first_title_and_drops_untitled() {
        let mut first = Article::new("X");
        first.source.name = "first".to_string();
        let mut second = Article::new("X");
        second.source.name = "second".to_string();

        let collection = ArticleCollection::dedup_from(vec![
            first,
            Article::new(""),
            second,
            Article::new("Y"),
            Article::new("x"),
        ]);

        assert_eq!(collection.titles().collect::<Vec<_>>(), vec!["X", "Y", "x"]);
        assert_eq!(collection.articles[0].source.name, "first");
    }

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let settings: HeadlineSettings =
            serde_json::from_value(json!({ "category": "sports" })).unwrap();
        assert_eq!(settings.category, Category::Sports);
        assert_eq!(settings.headline_size, 100);
        assert_eq!(settings.previous_days, 3);

        let keys: ApiKeys = serde_json::from_value(json!({ "newsapi": "A" })).unwrap();
        assert_eq!(keys.newsapi, "A");
        assert_eq!(keys.huggingface, "");
    }

    #[test]
    fn test_enum_names_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        for editor in SubEditor::ALL {
            assert_eq!(editor.as_str().parse::<SubEditor>().unwrap(), editor);
        }
        assert!("weather".parse::<Category>().is_err());
        assert_eq!(SubEditor::Report.file_name(), "report.txt");
    }

    #[test]
    fn test_search_params_use_sort_by_wire_name() {
        let params: SearchParams =
            serde_json::from_value(json!({ "keywords": "rust", "sortBy": "popularity" })).unwrap();
        assert_eq!(params.sort_by.as_deref(), Some("popularity"));
        assert_eq!(params.language, None);
    }
}
