mod common;

use chrono::{Duration, Utc};
use course_portal_api::{
    access::AccessStatus,
    dto::{
        free_mode::UpdateFreeModeRequest,
        payments::{CreatePaymentOrderRequest, RejectOrderRequest},
    },
    entity::payment_orders::{PaymentStatus, PaymentType},
    error::AppError,
    routes::params::OrderListQuery,
    services::{enrollment_service, free_mode_service, payment_service},
};

// Claim -> review -> revoke, then rejection and resubmission, then free mode.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn payment_review_controls_course_access() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;

    let student = common::create_user(&state, "user", "student@example.com").await?;
    let admin = common::create_user(&state, "admin", "admin@example.com").await?;
    common::create_course(&state, "html", 1000, 2).await?;
    common::create_course(&state, "css", 900, 1).await?;
    common::create_course(&state, "javascript", 1500, 1).await?;

    // Paid course with no orders is locked and enrollment is refused.
    let status = payment_service::payment_status(&state, &student, "html", PaymentType::Course)
        .await?
        .data
        .unwrap();
    assert!(status.access.locked);
    assert_eq!(status.access.status_label, AccessStatus::PaymentRequired);
    let err = enrollment_service::enroll(&state, &student, "html")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PaymentRequired));

    // "I have paid"
    let order = payment_service::create_order(
        &state,
        &student,
        CreatePaymentOrderRequest {
            course_id: "html".into(),
            payment_type: PaymentType::Course,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(order.status, PaymentStatus::AwaitingVerification);
    assert_eq!(order.amount, 1000);
    assert!(order.reference.starts_with("PAY-"));

    let status = payment_service::payment_status(&state, &student, "html", PaymentType::Course)
        .await?
        .data
        .unwrap();
    assert!(status.access.locked);
    assert_eq!(status.access.status_label, AccessStatus::AwaitingVerification);

    // A second claim while one is awaiting is refused.
    let dup = payment_service::create_order(
        &state,
        &student,
        CreatePaymentOrderRequest {
            course_id: "html".into(),
            payment_type: PaymentType::Course,
        },
    )
    .await;
    assert!(matches!(dup, Err(AppError::BadRequest(_))));

    // Students cannot review their own claims.
    let forbidden = payment_service::approve_order(&state, &student, order.id).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    let pending = payment_service::list_pending(&state, &admin).await?.data.unwrap();
    assert!(pending.items.iter().any(|o| o.id == order.id));

    let approved = payment_service::approve_order(&state, &admin, order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(approved.status, PaymentStatus::Approved);
    assert_eq!(approved.approved_by, Some(admin.user_id));

    // Terminal orders don't move again.
    let again = payment_service::reject_order(
        &state,
        &admin,
        order.id,
        RejectOrderRequest::default(),
    )
    .await;
    assert!(matches!(again, Err(AppError::BadRequest(_))));

    let status = payment_service::payment_status(&state, &student, "html", PaymentType::Course)
        .await?
        .data
        .unwrap();
    assert!(!status.access.locked);
    assert_eq!(status.access.status_label, AccessStatus::Approved);

    let enrolled = enrollment_service::enroll(&state, &student, "html")
        .await?
        .data
        .unwrap();
    assert!(!enrolled.already_enrolled);

    // Deleting the approval takes the access away.
    payment_service::delete_order(&state, &admin, order.id).await?;
    let status = payment_service::payment_status(&state, &student, "html", PaymentType::Course)
        .await?
        .data
        .unwrap();
    assert!(status.access.locked);
    assert_eq!(status.order.map(|o| o.id), None);

    // Rejection keeps the course locked but allows a new claim.
    let first = payment_service::create_order(
        &state,
        &student,
        CreatePaymentOrderRequest {
            course_id: "css".into(),
            payment_type: PaymentType::Course,
        },
    )
    .await?
    .data
    .unwrap();
    let rejected = payment_service::reject_order(
        &state,
        &admin,
        first.id,
        RejectOrderRequest {
            reason: Some("  transfer not found ".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(rejected.status, PaymentStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("transfer not found"));

    let status = payment_service::payment_status(&state, &student, "css", PaymentType::Course)
        .await?
        .data
        .unwrap();
    assert!(status.access.locked);
    assert_eq!(status.access.status_label, AccessStatus::Rejected);

    let second = payment_service::create_order(
        &state,
        &student,
        CreatePaymentOrderRequest {
            course_id: "css".into(),
            payment_type: PaymentType::Course,
        },
    )
    .await?
    .data
    .unwrap();
    assert_ne!(second.reference, first.reference);

    let mine = payment_service::list_my_orders(&state, &student, OrderListQuery::default())
        .await?
        .data
        .unwrap();
    assert_eq!(mine.items.len(), 2);
    assert_eq!(mine.items[0].id, second.id);

    // Free mode: invalid windows are refused, an active one unlocks everything.
    let now = Utc::now();
    let invalid = free_mode_service::update_settings(
        &state,
        &admin,
        UpdateFreeModeRequest {
            is_enabled: true,
            start_at: Some(now),
            end_at: Some(now - Duration::hours(1)),
        },
    )
    .await;
    assert!(matches!(invalid, Err(AppError::BadRequest(_))));

    free_mode_service::update_settings(
        &state,
        &admin,
        UpdateFreeModeRequest {
            is_enabled: true,
            start_at: Some(now - Duration::hours(1)),
            end_at: Some(now + Duration::hours(1)),
        },
    )
    .await?;

    let free = free_mode_service::get_status(&state).await?.data.unwrap();
    assert!(free.is_active);
    assert_eq!(free.countdown_to.map(|t| t.timestamp()), Some((now + Duration::hours(1)).timestamp()));

    let status = payment_service::payment_status(&state, &student, "html", PaymentType::Course)
        .await?
        .data
        .unwrap();
    assert!(!status.access.locked);
    assert_eq!(status.access.status_label, AccessStatus::FreeMode);

    // Certificates are still charged during free mode.
    let cert = payment_service::payment_status(&state, &student, "html", PaymentType::Certificate)
        .await?
        .data
        .unwrap();
    assert!(cert.access.locked);

    // Simultaneous "I have paid" clicks store a single claim.
    let mut handles = Vec::new();
    for _ in 0..16 {
        let state = state.clone();
        let student = student.clone();
        handles.push(tokio::spawn(async move {
            payment_service::create_order(
                &state,
                &student,
                CreatePaymentOrderRequest {
                    course_id: "javascript".into(),
                    payment_type: PaymentType::Course,
                },
            )
            .await
        }));
    }
    let mut created = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => created += 1,
            Err(err) => assert!(matches!(err, AppError::BadRequest(_)), "{err:?}"),
        }
    }
    assert_eq!(created, 1);

    let awaiting = payment_service::list_my_orders(
        &state,
        &student,
        OrderListQuery {
            status: Some(PaymentStatus::AwaitingVerification),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    let javascript = awaiting
        .items
        .iter()
        .filter(|o| o.course_id == "javascript")
        .count();
    assert_eq!(javascript, 1);

    Ok(())
}
