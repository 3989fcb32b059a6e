use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    access::{self, OrderSnapshot},
    audit,
    dto::certificates::{
        CertificateRequestList, CertificateRequestResult, RequestCertificateRequest,
        UpdateCertificateStatusRequest,
    },
    entity::{
        certificate_requests::{
            ActiveModel as RequestActive, CertificateStatus, Column as RequestCol,
            Entity as CertificateRequests, Model as RequestModel,
        },
        payment_orders::PaymentType,
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::CertificateRequest,
    response::{ApiResponse, Meta},
    routes::params::CertificateListQuery,
    services::{course_service, enrollment_service, payment_service},
    state::AppState,
};

async fn find_request(
    state: &AppState,
    user_id: Uuid,
    course_id: &str,
) -> AppResult<Option<RequestModel>> {
    let request = CertificateRequests::find()
        .filter(
            Condition::all()
                .add(RequestCol::UserId.eq(user_id))
                .add(RequestCol::CourseId.eq(course_id)),
        )
        .one(&state.orm)
        .await?;
    Ok(request)
}

/// Ask for a certificate once the course is complete and the certificate fee is approved.
pub async fn request_certificate(
    state: &AppState,
    user: &AuthUser,
    course_id: &str,
    payload: RequestCertificateRequest,
) -> AppResult<ApiResponse<CertificateRequestResult>> {
    let course = course_service::find_course(&state.orm, course_id).await?;

    if let Some(existing) = find_request(state, user.user_id, &course.id).await? {
        return Ok(ApiResponse::ok(
            "Certificate already requested",
            CertificateRequestResult {
                request: existing.into(),
                already_exists: true,
            },
        ));
    }

    let progress =
        enrollment_service::compute_progress(&state.orm, user.user_id, &course.id).await?;
    if !progress.enrolled {
        return Err(AppError::BadRequest(
            "Enroll in the course before requesting a certificate".into(),
        ));
    }
    if progress.progress < 100 {
        return Err(AppError::BadRequest(
            "Complete every video before requesting a certificate".into(),
        ));
    }

    let orders = payment_service::orders_for(
        &state.orm,
        user.user_id,
        &course.id,
        PaymentType::Certificate,
    )
    .await?;
    let history: Vec<OrderSnapshot> = orders.iter().map(OrderSnapshot::from).collect();
    if access::certificate_access(state.config.certificate_price, &history).locked {
        return Err(AppError::PaymentRequired);
    }

    let account = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let full_name = payload
        .full_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .or_else(|| account.display_name.clone())
        .unwrap_or_else(|| {
            account
                .email
                .split('@')
                .next()
                .unwrap_or("Student")
                .to_string()
        });

    let request = RequestActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        course_id: Set(course.id.clone()),
        full_name: Set(full_name),
        email: Set(account.email),
        status: Set(CertificateStatus::Sent),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(user_id = %user.user_id, course_id = %course.id, "certificate requested");
    audit::record(
        &state.pool,
        Some(user.user_id),
        "certificate_requested",
        "certificate_requests",
        serde_json::json!({ "request_id": request.id, "course_id": request.course_id }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Certificate requested",
        CertificateRequestResult {
            request: request.into(),
            already_exists: false,
        },
    ))
}

pub async fn get_my_request(
    state: &AppState,
    user: &AuthUser,
    course_id: &str,
) -> AppResult<ApiResponse<CertificateRequest>> {
    let request = find_request(state, user.user_id, course_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok("Certificate request", request.into()))
}

pub async fn list_requests(
    state: &AppState,
    user: &AuthUser,
    query: CertificateListQuery,
) -> AppResult<ApiResponse<CertificateRequestList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = CertificateRequests::find();
    if let Some(status) = query.status {
        finder = finder.filter(RequestCol::Status.eq(status));
    }
    let finder = finder.order_by_desc(RequestCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(CertificateRequest::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Certificate requests",
        CertificateRequestList { items },
        Some(meta),
    ))
}

/// Review a request. Only requests still in `sent` can be approved or rejected.
pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCertificateStatusRequest,
) -> AppResult<ApiResponse<CertificateRequest>> {
    ensure_admin(user)?;
    if payload.status == CertificateStatus::Sent {
        return Err(AppError::BadRequest(
            "Status must be approved or rejected".into(),
        ));
    }

    let existing = CertificateRequests::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if existing.status != CertificateStatus::Sent {
        return Err(AppError::BadRequest(
            "Certificate request was already reviewed".into(),
        ));
    }

    let mut active: RequestActive = existing.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let request = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "certificate_reviewed",
        "certificate_requests",
        serde_json::json!({ "request_id": request.id, "status": request.status }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Certificate request updated",
        CertificateRequest::from(request),
    ))
}
