use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::{
        certificate_requests::{self, CertificateStatus},
        course_videos, courses, journeys,
        payment_orders::{self, PaymentStatus, PaymentType},
        ratings, users,
    },
    video::{self, VideoProvider},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub role: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            display_name: model.display_name,
            created_at: model.created_at.with_timezone(&Utc),
            role: model.role,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Journey {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
}

impl From<journeys::Model> for Journey {
    fn from(model: journeys::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            position: model.position,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Course {
    pub id: String,
    pub journey_id: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub payment_enabled: bool,
    pub price: i64,
    pub finished: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<courses::Model> for Course {
    fn from(model: courses::Model) -> Self {
        Self {
            id: model.id,
            journey_id: model.journey_id,
            title: model.title,
            subtitle: model.subtitle,
            description: model.description,
            category: model.category,
            payment_enabled: model.payment_enabled,
            price: model.price,
            finished: model.finished,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseVideo {
    pub id: Uuid,
    pub course_id: String,
    pub title: String,
    pub url: String,
    pub position: i32,
    pub provider: VideoProvider,
    pub embed_url: String,
}

impl From<course_videos::Model> for CourseVideo {
    fn from(model: course_videos::Model) -> Self {
        // Rows are validated on insert; fall back to direct playback for legacy data.
        let (provider, embed_url) = match video::resolve(&model.url) {
            Some(source) => (source.provider, source.embed_url),
            None => (VideoProvider::Direct, model.url.clone()),
        };
        Self {
            id: model.id,
            course_id: model.course_id,
            title: model.title,
            url: model.url,
            position: model.position,
            provider,
            embed_url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentOrder {
    pub id: Uuid,
    pub reference: String,
    pub user_id: Uuid,
    pub course_id: String,
    pub amount: i64,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<payment_orders::Model> for PaymentOrder {
    fn from(model: payment_orders::Model) -> Self {
        Self {
            id: model.id,
            reference: model.reference,
            user_id: model.user_id,
            course_id: model.course_id,
            amount: model.amount,
            payment_type: model.payment_type,
            status: model.status,
            approved_by: model.approved_by,
            approved_at: model.approved_at.map(|dt| dt.with_timezone(&Utc)),
            rejected_by: model.rejected_by,
            rejected_at: model.rejected_at.map(|dt| dt.with_timezone(&Utc)),
            rejection_reason: model.rejection_reason,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Rating {
    pub user_id: Uuid,
    pub course_id: String,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

impl From<ratings::Model> for Rating {
    fn from(model: ratings::Model) -> Self {
        Self {
            user_id: model.user_id,
            course_id: model.course_id,
            rating: model.rating,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CertificateRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: String,
    pub full_name: String,
    pub email: String,
    pub status: CertificateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<certificate_requests::Model> for CertificateRequest {
    fn from(model: certificate_requests::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            course_id: model.course_id,
            full_name: model.full_name,
            email: model.email,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
