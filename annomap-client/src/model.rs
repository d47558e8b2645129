use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference metadata as returned by `GET /references/{id}`.
///
/// The service returns a couple dozen fields; only the ones the report uses
/// are kept. Every field may be missing or null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub published_year: Option<Value>,
    #[serde(default)]
    pub authors_text: Option<String>,
    #[serde(default)]
    pub full_text_link: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
}

impl Reference {
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn abstract_text(&self) -> &str {
        self.abstract_text.as_deref().unwrap_or_default()
    }

    pub fn authors_text(&self) -> &str {
        self.authors_text.as_deref().unwrap_or_default()
    }

    /// The year arrives either as a number or as a string.
    pub fn published_year_text(&self) -> String {
        match &self.published_year {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}

/// One note attached to a highlighted passage, from `GET /references/{id}/notes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub highlight_text: Option<String>,
}

impl Annotation {
    pub fn new(comment: Option<&str>, highlight_text: &str) -> Self {
        Self {
            id: None,
            comment: comment.map(str::to_string),
            highlight_text: Some(highlight_text.to_string()),
        }
    }

    /// The comment, or `None` when it is absent or empty.
    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }

    pub fn highlight(&self) -> Option<&str> {
        self.highlight_text.as_deref()
    }
}
