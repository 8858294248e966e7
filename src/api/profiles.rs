//! Student and educator profile endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::client::ApiClient;
use crate::error::Result;

/// An educator profile as the API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Educator {
    pub educator_id: String,
    pub educator_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub educator_photo_key: String,
    #[serde(default)]
    pub rating_sum: f64,
    #[serde(default)]
    pub rating_count: u64,
    #[serde(default)]
    pub follower_count: u64,
}

/// A student profile as the API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    pub student_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub enrolled_courses: Vec<String>,
    #[serde(default)]
    pub completed_courses: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub student_photo_key: String,
}

/// Payload for registering a student profile.
#[derive(Debug, Clone, Serialize)]
pub struct NewStudent {
    pub email: String,
    pub password: String,
    pub student_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_photo_key: Option<String>,
}

/// Payload for registering an educator profile.
#[derive(Debug, Clone, Serialize)]
pub struct NewEducator {
    pub email: String,
    pub password: String,
    pub educator_name: String,
    pub bio: String,
    pub subjects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub educator_photo_key: Option<String>,
}

impl ApiClient {
    pub async fn create_student(&self, student: &NewStudent) -> Result<Student> {
        let body = serde_json::to_value(student)
            .map_err(|e| crate::error::AuthError::Request(e.to_string()))?;
        Ok(self.post_data("/students/createStudent", &body).await?)
    }

    pub async fn create_educator(&self, educator: &NewEducator) -> Result<Educator> {
        let body = serde_json::to_value(educator)
            .map_err(|e| crate::error::AuthError::Request(e.to_string()))?;
        Ok(self.post_data("/educators/createEducator", &body).await?)
    }

    /// Partial update; `patch` carries only the fields to change.
    pub async fn update_educator(&self, id: &str, patch: &Value) -> Result<Educator> {
        Ok(self
            .put_data(&format!("/educators/updateEducator/{id}"), patch)
            .await?)
    }
}
