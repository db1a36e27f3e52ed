use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Average reading speed used for the reading-time estimate.
pub const WORDS_PER_MINUTE: usize = 200;

/// Post entity - a published blog article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<u32>,
}

/// Author input for a new post. Omitted fields get server defaults.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub id: Option<String>,
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<DateTime<Utc>>,
    pub reading_time: Option<u32>,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Validate the draft and fill in defaults relative to `now`.
    pub fn into_post(self, now: DateTime<Utc>) -> Result<Post, StoreError> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)?;
        if let Some(minutes) = self.reading_time {
            require_positive_minutes(minutes)?;
        }

        let reading_time = self
            .reading_time
            .unwrap_or_else(|| estimate_reading_time(&self.content));

        Ok(Post {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: self.title,
            summary: self.summary.unwrap_or_default(),
            content: self.content,
            tags: self.tags.unwrap_or_default(),
            created_at: self.created_at.unwrap_or(now),
            reading_time: Some(reading_time),
        })
    }
}

/// Partial overlay applied by an update. The id is not part of the patch,
/// so identity cannot change.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<DateTime<Utc>>,
    pub reading_time: Option<u32>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.summary.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.created_at.is_none()
            && self.reading_time.is_none()
    }

    /// Reject overlays that would leave the post without a title or body.
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(content) = &self.content {
            require_text("content", content)?;
        }
        if let Some(minutes) = self.reading_time {
            require_positive_minutes(minutes)?;
        }
        Ok(())
    }

    pub fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(summary) = self.summary {
            post.summary = summary;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(tags) = self.tags {
            post.tags = tags;
        }
        if let Some(created_at) = self.created_at {
            post.created_at = created_at;
        }
        if let Some(minutes) = self.reading_time {
            post.reading_time = Some(minutes);
        }
    }
}

/// Minutes needed to read `content`, counting whitespace-separated words.
/// Never less than one minute.
pub fn estimate_reading_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

fn require_text(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_positive_minutes(minutes: u32) -> Result<(), StoreError> {
    if minutes == 0 {
        return Err(StoreError::validation("readingTime must be positive"));
    }
    Ok(())
}
