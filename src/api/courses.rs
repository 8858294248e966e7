//! Course endpoints, consumed by the dashboard views.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::client::ApiClient;
use crate::error::Result;

/// A published (or draft) course as the API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub course_id: String,
    pub educator_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub course_cover_image_key: String,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub rating_sum: f64,
    #[serde(default)]
    pub rating_count: u64,
    #[serde(default)]
    pub star_rating: f64,
    #[serde(default)]
    pub enrollment_count: u64,
    #[serde(default)]
    pub follower_count: u64,
}

/// Payload for creating a course.
#[derive(Debug, Clone, Serialize)]
pub struct NewCourse {
    pub educator_id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_cover_image_key: Option<String>,
    pub is_published: bool,
}

/// Filters for listing courses.
#[derive(Debug, Clone, Default)]
pub struct CourseQuery {
    pub educator_id: Option<String>,
    pub is_published: Option<bool>,
}

impl CourseQuery {
    /// Query-string pairs; only set filters appear.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = &self.educator_id {
            pairs.push(("educator_id", id.clone()));
        }
        if let Some(published) = self.is_published {
            pairs.push(("is_published", published.to_string()));
        }
        pairs
    }
}

impl ApiClient {
    pub async fn create_course(&self, course: &NewCourse) -> Result<Course> {
        let body = serde_json::to_value(course)
            .map_err(|e| crate::error::AuthError::Request(e.to_string()))?;
        Ok(self.post_data("/courses/createCourse", &body).await?)
    }

    pub async fn get_courses(&self, query: &CourseQuery) -> Result<Vec<Course>> {
        Ok(self
            .get_data("/courses/getCourses", &query.to_pairs())
            .await?)
    }

    /// Partial update; `patch` carries only the fields to change.
    pub async fn update_course(&self, id: &str, patch: &Value) -> Result<Course> {
        Ok(self
            .put_data(&format!("/courses/updateCourse/{id}"), patch)
            .await?)
    }
}
