use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::text::quantity::scale_servings_label;

/// Result of one scrape attempt.
///
/// `title` is never empty; every other field is absent when the page did not
/// provide it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedRecipe {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
    pub source_host: String,
}

impl ScrapedRecipe {
    /// A result carrying only the title and host
    pub fn minimal(title: impl Into<String>, source_host: impl Into<String>) -> Self {
        ScrapedRecipe {
            title: title.into(),
            source_host: source_host.into(),
            ..Default::default()
        }
    }

    pub fn servings_label(&self, multiplier: f64) -> Option<String> {
        scale_servings_label(self.servings, self.servings_text.as_deref(), multiplier)
    }
}

/// Lifecycle state of a record's most recent scrape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeStatus {
    #[default]
    Pending,
    Ok,
    Error,
}

impl ScrapeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapeStatus::Pending => "pending",
            ScrapeStatus::Ok => "ok",
            ScrapeStatus::Error => "error",
        }
    }
}

/// A stored list of lines.
///
/// Older records keep ingredients and instructions as one multi-line blob,
/// newer ones as an already-split list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredLines {
    Text(String),
    Items(Vec<Value>),
}

impl From<Vec<String>> for StoredLines {
    fn from(lines: Vec<String>) -> Self {
        StoredLines::Items(lines.into_iter().map(Value::String).collect())
    }
}

impl From<&str> for StoredLines {
    fn from(text: &str) -> Self {
        StoredLines::Text(text.to_string())
    }
}

/// A saved recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub owner_id: i64,
    pub source_url: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub servings: Option<f64>,
    pub servings_text: Option<String>,
    pub ingredients: Option<StoredLines>,
    pub instructions: Option<StoredLines>,
    pub source_host: String,
    pub scrape_status: ScrapeStatus,
    pub scrape_error: Option<String>,
    pub last_scraped_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    pub fn servings_label(&self, multiplier: f64) -> Option<String> {
        scale_servings_label(self.servings, self.servings_text.as_deref(), multiplier)
    }

    /// Apply a partial update, leaving unspecified fields untouched
    pub fn apply(&mut self, patch: RecipePatch) {
        if let Some(status) = patch.scrape_status {
            self.scrape_status = status;
        }
        if let Some(error) = patch.scrape_error {
            self.scrape_error = error;
        }
        if let Some(at) = patch.last_scraped_at {
            self.last_scraped_at = Some(at);
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(scraped) = patch.scraped {
            self.merge_scraped(scraped);
        }
        self.updated_at = Utc::now();
    }

    // Fields the new scrape did not find keep their previous values.
    fn merge_scraped(&mut self, scraped: ScrapedRecipe) {
        if !scraped.title.is_empty() {
            self.title = scraped.title;
        }
        if !scraped.source_host.is_empty() {
            self.source_host = scraped.source_host;
        }
        if scraped.description.is_some() {
            self.description = scraped.description;
        }
        if scraped.image_url.is_some() {
            self.image_url = scraped.image_url;
        }
        if scraped.servings.is_some() || scraped.servings_text.is_some() {
            self.servings = scraped.servings;
            self.servings_text = scraped.servings_text;
        }
        if let Some(ingredients) = scraped.ingredients {
            self.ingredients = Some(ingredients.into());
        }
        if let Some(instructions) = scraped.instructions {
            self.instructions = Some(instructions.into());
        }
    }
}

/// Input for creating a record
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub owner_id: i64,
    pub source_url: String,
    pub source_host: String,
}

/// Partial update of a record. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub scrape_status: Option<ScrapeStatus>,
    pub scrape_error: Option<Option<String>>,
    pub last_scraped_at: Option<DateTime<Utc>>,
    pub scraped: Option<ScrapedRecipe>,
    pub notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl RecipePatch {
    pub fn pending() -> Self {
        RecipePatch {
            scrape_status: Some(ScrapeStatus::Pending),
            ..Default::default()
        }
    }

    pub fn scraped(scraped: ScrapedRecipe) -> Self {
        RecipePatch {
            scrape_status: Some(ScrapeStatus::Ok),
            scrape_error: Some(None),
            last_scraped_at: Some(Utc::now()),
            scraped: Some(scraped),
            ..Default::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        RecipePatch {
            scrape_status: Some(ScrapeStatus::Error),
            scrape_error: Some(Some(message.into())),
            last_scraped_at: Some(Utc::now()),
            ..Default::default()
        }
    }
}
