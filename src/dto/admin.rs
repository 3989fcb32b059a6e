use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub finished: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddVideoRequest {
    pub title: String,
    pub url: String,
    /// Appended after the last video when omitted.
    pub position: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseStats {
    pub course_id: String,
    pub title: String,
    pub student_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsOverview {
    pub courses: Vec<CourseStats>,
    pub total_students: i64,
    pub generated_at: DateTime<Utc>,
}
