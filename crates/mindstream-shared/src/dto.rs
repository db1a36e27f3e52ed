//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to log in as the admin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<String>,
}

/// Response containing the admin token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Body of `POST /api/posts`. Only title and content are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    pub summary: Option<String>,
    #[serde(default)]
    pub content: String,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<DateTime<Utc>>,
    pub reading_time: Option<u32>,
}

/// Body of `PUT /api/posts/{id}`. Absent fields are left unchanged; an `id`
/// in the body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<DateTime<Utc>>,
    pub reading_time: Option<u32>,
}

/// Body of `POST /api/visitors`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterVisitorRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Acknowledgement for deletions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_partial_camel_case_body() {
        let req: CreatePostRequest = serde_json::from_str(
            r#"{"title":"A","content":"hello world","readingTime":3,"createdAt":"2024-05-01T08:00:00.000Z"}"#,
        )
        .unwrap();

        assert_eq!(req.title, "A");
        assert_eq!(req.reading_time, Some(3));
        assert!(req.created_at.is_some());
        assert!(req.tags.is_none());
    }

    #[test]
    fn test_update_request_ignores_id() {
        let req: UpdatePostRequest =
            serde_json::from_str(r#"{"id":"other","title":"B"}"#).unwrap();

        assert_eq!(req.title.as_deref(), Some("B"));
        assert!(req.content.is_none());
    }
}
