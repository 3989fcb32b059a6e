//! Payment orders: user claims, gate lookups and admin verification.

use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    access::{self, CoursePricing, OrderSnapshot},
    audit,
    dto::payments::{
        CreatePaymentOrderRequest, PaymentInstructions, PaymentOrderList, PaymentStatusView,
        RejectOrderRequest,
    },
    entity::payment_orders::{
        ActiveModel as OrderActive, Column as OrderCol, Entity as PaymentOrders,
        Model as OrderModel, PaymentStatus, PaymentType,
    },
    entity::users::Entity as Users,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::PaymentOrder,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{course_service, enrollment_service, free_mode_service},
    state::AppState,
};

/// Every order a user placed for one course and payment type, newest first.
pub async fn orders_for<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    course_id: &str,
    payment_type: PaymentType,
) -> AppResult<Vec<OrderModel>> {
    let orders = PaymentOrders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user_id))
                .add(OrderCol::CourseId.eq(course_id))
                .add(OrderCol::PaymentType.eq(payment_type)),
        )
        .order_by_desc(OrderCol::CreatedAt)
        .all(conn)
        .await?;
    Ok(orders)
}

fn snapshots(orders: &[OrderModel]) -> Vec<OrderSnapshot> {
    orders.iter().map(OrderSnapshot::from).collect()
}

pub async fn payment_status(
    state: &AppState,
    user: &AuthUser,
    course_id: &str,
    payment_type: PaymentType,
) -> AppResult<ApiResponse<PaymentStatusView>> {
    let course = course_service::find_course(&state.orm, course_id).await?;
    let orders = orders_for(&state.orm, user.user_id, &course.id, payment_type).await?;
    let history = snapshots(&orders);

    let decision = match payment_type {
        PaymentType::Course => {
            let window = free_mode_service::current_window(&state.orm).await?;
            access::course_access(CoursePricing::from(&course), &window, &history, Utc::now())
        }
        PaymentType::Certificate => {
            access::certificate_access(state.config.certificate_price, &history)
        }
    };

    Ok(ApiResponse::ok(
        "Payment status",
        PaymentStatusView {
            course_id: course.id,
            payment_type,
            access: decision,
            order: orders.into_iter().next().map(PaymentOrder::from),
        },
    ))
}

pub async fn instructions(state: &AppState) -> ApiResponse<PaymentInstructions> {
    ApiResponse::ok(
        "Payment instructions",
        PaymentInstructions {
            iban: state.config.payment_iban.clone(),
            certificate_price: state.config.certificate_price,
        },
    )
}

/// Record a user's claim that they transferred the money ("I have paid").
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePaymentOrderRequest,
) -> AppResult<ApiResponse<PaymentOrder>> {
    let payment_type = payload.payment_type;
    let course = course_service::find_course(&state.orm, payload.course_id.trim()).await?;

    let txn = state.orm.begin().await?;

    // Serialise claims per user so the awaiting check and the insert cannot interleave.
    Users::find_by_id(user.user_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let orders = orders_for(&txn, user.user_id, &course.id, payment_type).await?;
    let history = snapshots(&orders);
    if access::has_approved(&history) {
        return Err(AppError::BadRequest(
            "Payment already approved for this course".into(),
        ));
    }
    if access::latest_status(&history) == Some(PaymentStatus::AwaitingVerification) {
        return Err(AppError::BadRequest(
            "A payment for this course is already awaiting verification".into(),
        ));
    }

    let amount = match payment_type {
        PaymentType::Course => {
            let pricing = CoursePricing::from(&course);
            if !pricing.is_payable() {
                return Err(AppError::BadRequest(
                    "Course does not require payment".into(),
                ));
            }
            pricing.price
        }
        PaymentType::Certificate => {
            let progress =
                enrollment_service::compute_progress(&txn, user.user_id, &course.id).await?;
            if !progress.enrolled || progress.progress < 100 {
                return Err(AppError::BadRequest(
                    "Complete the course before paying for the certificate".into(),
                ));
            }
            state.config.certificate_price
        }
    };

    let order_id = Uuid::new_v4();
    let order = OrderActive {
        id: Set(order_id),
        reference: Set(build_reference(payment_type, order_id)),
        user_id: Set(user.user_id),
        course_id: Set(course.id.clone()),
        amount: Set(amount),
        payment_type: Set(payment_type),
        status: Set(PaymentStatus::AwaitingVerification),
        approved_by: Set(None),
        approved_at: Set(None),
        rejected_by: Set(None),
        rejected_at: Set(None),
        rejection_reason: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::BadRequest(
            "A payment for this course is already awaiting verification".into(),
        ),
        _ => AppError::from(err),
    })?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        user_id = %user.user_id,
        course_id = %order.course_id,
        amount = order.amount,
        "payment order created"
    );

    audit::record(
        &state.pool,
        Some(user.user_id),
        "payment_order_created",
        "payment_orders",
        serde_json::json!({
            "order_id": order.id,
            "course_id": order.course_id,
            "payment_type": order.payment_type,
        }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Payment submitted for verification",
        PaymentOrder::from(order),
    ))
}

pub async fn list_my_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<PaymentOrderList>> {
    list_filtered(state, Some(user.user_id), query).await
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<PaymentOrderList>> {
    ensure_admin(user)?;
    list_filtered(state, None, query).await
}

pub async fn list_pending(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PaymentOrderList>> {
    ensure_admin(user)?;
    let items: Vec<PaymentOrder> = PaymentOrders::find()
        .filter(OrderCol::Status.eq(PaymentStatus::AwaitingVerification))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(PaymentOrder::from)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Pending orders",
        PaymentOrderList { items },
        Some(meta),
    ))
}

async fn list_filtered(
    state: &AppState,
    user_id: Option<Uuid>,
    query: OrderListQuery,
) -> AppResult<ApiResponse<PaymentOrderList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(user_id) = user_id {
        condition = condition.add(OrderCol::UserId.eq(user_id));
    }
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }
    if let Some(payment_type) = query.payment_type {
        condition = condition.add(OrderCol::PaymentType.eq(payment_type));
    }

    let mut finder = PaymentOrders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(PaymentOrder::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        PaymentOrderList { items },
        Some(meta),
    ))
}

pub async fn approve_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<PaymentOrder>> {
    ensure_admin(user)?;
    let order = transition(state, user, id, PaymentStatus::Approved, None).await?;
    Ok(ApiResponse::ok("Payment approved", PaymentOrder::from(order)))
}

pub async fn reject_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RejectOrderRequest,
) -> AppResult<ApiResponse<PaymentOrder>> {
    ensure_admin(user)?;
    let reason = payload
        .reason
        .map(|reason| reason.trim().to_string())
        .filter(|reason| !reason.is_empty());
    let order = transition(state, user, id, PaymentStatus::Rejected, reason).await?;
    Ok(ApiResponse::ok("Payment rejected", PaymentOrder::from(order)))
}

/// Remove an order outright. Deleting an approved order revokes the access it granted.
pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = PaymentOrders::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(order_id = %id, admin = %user.user_id, "payment order deleted");
    audit::record(
        &state.pool,
        Some(user.user_id),
        "payment_order_deleted",
        "payment_orders",
        serde_json::json!({ "order_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Order deleted", serde_json::json!({ "id": id })))
}

async fn transition(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    next: PaymentStatus,
    reason: Option<String>,
) -> AppResult<OrderModel> {
    let txn = state.orm.begin().await?;

    let order = PaymentOrders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let previous = order.status;
    if previous.is_terminal() {
        return Err(AppError::BadRequest(format!(
            "Order was already {}",
            previous.as_str()
        )));
    }
    if !previous.can_transition_to(next) {
        return Err(AppError::BadRequest(format!(
            "Order is {} and cannot become {}",
            previous.as_str(),
            next.as_str()
        )));
    }

    let now = Utc::now();
    let mut active: OrderActive = order.into();
    active.status = Set(next);
    match next {
        PaymentStatus::Approved => {
            active.approved_by = Set(Some(user.user_id));
            active.approved_at = Set(Some(now.into()));
        }
        PaymentStatus::Rejected => {
            active.rejected_by = Set(Some(user.user_id));
            active.rejected_at = Set(Some(now.into()));
            active.rejection_reason = Set(reason);
        }
        PaymentStatus::Pending | PaymentStatus::AwaitingVerification => {}
    }
    active.updated_at = Set(now.into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        admin = %user.user_id,
        from = previous.as_str(),
        to = next.as_str(),
        "payment order transitioned"
    );

    audit::record(
        &state.pool,
        Some(user.user_id),
        "payment_order_transition",
        "payment_orders",
        serde_json::json!({
            "order_id": order.id,
            "from": previous,
            "to": next,
        }),
    )
    .await;

    Ok(order)
}

fn build_reference(payment_type: PaymentType, order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string().to_uppercase();
    format!("{}-{}-{}", payment_type.reference_prefix(), date, &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_carry_the_payment_type() {
        let id = Uuid::parse_str("0f8fad5b-d9cb-469f-a165-70867728950e").unwrap();
        let course = build_reference(PaymentType::Course, id);
        assert!(course.starts_with("PAY-"));
        assert!(course.ends_with("-0F8FAD5B"));

        let cert = build_reference(PaymentType::Certificate, id);
        assert!(cert.starts_with("CERT-"));
        assert_eq!(cert.len(), "CERT-20250101-0F8FAD5B".len());
    }
}
