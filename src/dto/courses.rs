use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Course, CourseVideo, Journey, Rating};

#[derive(Debug, Serialize, ToSchema)]
pub struct JourneyWithCourses {
    pub journey: Journey,
    pub courses: Vec<Course>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JourneyList {
    pub items: Vec<JourneyWithCourses>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseList {
    pub items: Vec<Course>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetail {
    pub course: Course,
    pub videos: Vec<CourseVideo>,
    pub ratings: RatingSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Enrollment {
    pub course_id: String,
    pub enrolled_at: DateTime<Utc>,
    pub already_enrolled: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Progress {
    pub course_id: String,
    pub enrolled: bool,
    pub completed_video_ids: Vec<Uuid>,
    pub total_videos: i64,
    /// Whole percent, 0..=100.
    pub progress: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RateCourseRequest {
    pub rating: i16,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
    pub items: Vec<Rating>,
}
