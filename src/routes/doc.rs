use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    access::{AccessDecision, AccessStatus, FreeModePhase},
    dto::{
        admin::{AddVideoRequest, CourseStats, StatsOverview, UpdateCourseRequest},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        certificates::{
            CertificateRequestList, CertificateRequestResult, RequestCertificateRequest,
            UpdateCertificateStatusRequest,
        },
        courses::{
            CourseDetail, CourseList, Enrollment, JourneyList, JourneyWithCourses, Progress,
            RateCourseRequest, RatingSummary,
        },
        free_mode::{FreeModeSettingsView, FreeModeStatus, UpdateFreeModeRequest},
        payments::{
            CoursePaymentSettingsRequest, CreatePaymentOrderRequest, PaymentInstructions,
            PaymentOrderList, PaymentStatusView, RejectOrderRequest,
        },
    },
    entity::{
        certificate_requests::CertificateStatus,
        payment_orders::{PaymentStatus, PaymentType},
    },
    models::{CertificateRequest, Course, CourseVideo, Journey, PaymentOrder, Rating, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, certificates, courses, free_mode, health, params, payments},
    video::VideoProvider,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        courses::list_journeys,
        courses::list_courses,
        courses::get_course,
        courses::course_access,
        courses::enroll,
        courses::progress,
        courses::complete_video,
        courses::list_ratings,
        courses::rate_course,
        payments::create_order,
        payments::list_my_orders,
        payments::payment_status,
        payments::instructions,
        free_mode::free_mode_status,
        certificates::request_certificate,
        certificates::get_my_request,
        admin::list_orders,
        admin::list_pending,
        admin::approve_order,
        admin::reject_order,
        admin::delete_order,
        admin::get_free_mode,
        admin::update_free_mode,
        admin::update_course,
        admin::update_payment_settings,
        admin::add_video,
        admin::remove_video,
        admin::list_certificate_requests,
        admin::update_certificate_status,
        admin::stats
    ),
    components(
        schemas(
            User,
            Journey,
            Course,
            CourseVideo,
            VideoProvider,
            PaymentOrder,
            PaymentStatus,
            PaymentType,
            Rating,
            CertificateRequest,
            CertificateStatus,
            AccessDecision,
            AccessStatus,
            FreeModePhase,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            JourneyWithCourses,
            JourneyList,
            CourseList,
            CourseDetail,
            Enrollment,
            Progress,
            RateCourseRequest,
            RatingSummary,
            CreatePaymentOrderRequest,
            PaymentOrderList,
            PaymentStatusView,
            PaymentInstructions,
            RejectOrderRequest,
            CoursePaymentSettingsRequest,
            FreeModeSettingsView,
            FreeModeStatus,
            UpdateFreeModeRequest,
            RequestCertificateRequest,
            CertificateRequestResult,
            CertificateRequestList,
            UpdateCertificateStatusRequest,
            UpdateCourseRequest,
            AddVideoRequest,
            CourseStats,
            StatsOverview,
            params::Pagination,
            params::SortOrder,
            params::CourseQuery,
            params::OrderListQuery,
            params::PaymentTypeQuery,
            params::CertificateListQuery,
            Meta,
            ApiResponse<Course>,
            ApiResponse<CourseList>,
            ApiResponse<PaymentOrder>,
            ApiResponse<PaymentOrderList>,
            ApiResponse<PaymentStatusView>,
            ApiResponse<FreeModeStatus>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Courses", description = "Journeys, courses, enrollment, progress and ratings"),
        (name = "Payments", description = "Bank transfer payment claims and access status"),
        (name = "Free mode", description = "Global free access window"),
        (name = "Certificates", description = "Certificate requests"),
        (name = "Admin", description = "Payment review, course settings and statistics"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_group_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/courses/{id}/access",
            "/api/payments/orders",
            "/api/free-mode",
            "/api/certificates/{course_id}",
            "/api/admin/payments/{id}/approve",
            "/api/admin/stats",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
