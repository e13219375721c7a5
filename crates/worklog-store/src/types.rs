//! Work-log entry types

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of entry: raw daily logs, or synthesized reports stored back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Daily,
    Weekly,
    Annual,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Daily => "daily",
            Category::Weekly => "weekly",
            Category::Annual => "annual",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}' (expected daily, weekly or annual)")]
pub struct ParseCategoryError(String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Category::Daily),
            "weekly" | "week" => Ok(Category::Weekly),
            "annual" | "yearly" | "year" => Ok(Category::Annual),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

// Older files carry no category, or one this build does not know: both read as daily.
impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .and_then(|s| s.parse().ok())
            .unwrap_or_default())
    }
}

/// A single dated work-log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    id: String,
    pub date: DateTime<FixedOffset>,
    #[serde(default)]
    pub content: String,
    #[serde(
        rename = "imageData",
        default,
        with = "image_blobs",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub images: Vec<Vec<u8>>,
    #[serde(default)]
    pub category: Category,
}

impl LogEntry {
    /// New entry dated now, in the local offset
    pub fn new(content: impl Into<String>, category: Category) -> Self {
        Self::with_date(Local::now().fixed_offset(), content, category)
    }

    pub fn with_date(
        date: DateTime<FixedOffset>,
        content: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            content: content.into(),
            images: Vec::new(),
            category,
        }
    }

    pub fn with_images(mut self, images: Vec<Vec<u8>>) -> Self {
        self.images = images;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Calendar day of the entry in the offset it was recorded in
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// `YYYY-MM-DD`
    pub fn date_formatted(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Linear filter over entries by category and inclusive day range
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub category: Option<Category>,
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl EntryFilter {
    pub fn category(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(category) = self.category {
            if entry.category != category {
                return false;
            }
        }
        let day = entry.day();
        if let Some(since) = self.since {
            if day < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if day > until {
                return false;
            }
        }
        true
    }
}

/// Image blobs are stored as base64 strings
mod image_blobs {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::de::Error;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(blobs: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(blobs.len()))?;
        for blob in blobs {
            seq.serialize_element(&STANDARD.encode(blob))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        let encoded = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
        encoded
            .iter()
            .map(|s| STANDARD.decode(s.trim()).map_err(D::Error::custom))
            .collect()
    }
}
