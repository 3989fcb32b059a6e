mod common;

use course_portal_api::{
    dto::{
        certificates::{RequestCertificateRequest, UpdateCertificateStatusRequest},
        courses::RateCourseRequest,
        payments::CreatePaymentOrderRequest,
    },
    entity::{certificate_requests::CertificateStatus, payment_orders::PaymentType},
    error::AppError,
    services::{
        certificate_service, enrollment_service, payment_service, rating_service,
    },
};

// Free course -> complete every video -> pay for the certificate -> request -> review.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn completed_course_leads_to_certificate() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;

    let student = common::create_user(&state, "user", "student@example.com").await?;
    let admin = common::create_user(&state, "admin", "admin@example.com").await?;
    let videos = common::create_course(&state, "portugol-studio", 0, 3).await?;

    // Concurrent enrolls all succeed and leave one enrollment.
    let mut handles = Vec::new();
    for _ in 0..8 {
        let state = state.clone();
        let student = student.clone();
        handles.push(tokio::spawn(async move {
            enrollment_service::enroll(&state, &student, "portugol-studio").await
        }));
    }
    let mut fresh = 0;
    for handle in handles {
        let enrollment = handle.await??.data.unwrap();
        if !enrollment.already_enrolled {
            fresh += 1;
        }
    }
    assert_eq!(fresh, 1);

    let progress = enrollment_service::complete_video(&state, &student, "portugol-studio", videos[0])
        .await?
        .data
        .unwrap();
    assert_eq!(progress.progress, 33);

    // Completing twice counts once.
    let progress = enrollment_service::complete_video(&state, &student, "portugol-studio", videos[0])
        .await?
        .data
        .unwrap();
    assert_eq!(progress.completed_video_ids.len(), 1);

    let early = certificate_service::request_certificate(
        &state,
        &student,
        "portugol-studio",
        RequestCertificateRequest::default(),
    )
    .await;
    assert!(matches!(early, Err(AppError::BadRequest(_))));

    enrollment_service::complete_video(&state, &student, "portugol-studio", videos[1]).await?;
    let progress = enrollment_service::complete_video(&state, &student, "portugol-studio", videos[2])
        .await?
        .data
        .unwrap();
    assert_eq!(progress.progress, 100);

    let unpaid = certificate_service::request_certificate(
        &state,
        &student,
        "portugol-studio",
        RequestCertificateRequest::default(),
    )
    .await;
    assert!(matches!(unpaid, Err(AppError::PaymentRequired)));

    let order = payment_service::create_order(
        &state,
        &student,
        CreatePaymentOrderRequest {
            course_id: "portugol-studio".into(),
            payment_type: PaymentType::Certificate,
        },
    )
    .await?
    .data
    .unwrap();
    assert!(order.reference.starts_with("CERT-"));
    assert_eq!(order.amount, state.config.certificate_price);
    payment_service::approve_order(&state, &admin, order.id).await?;

    let result = certificate_service::request_certificate(
        &state,
        &student,
        "portugol-studio",
        RequestCertificateRequest {
            full_name: Some("Ana Souza".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(!result.already_exists);
    assert_eq!(result.request.full_name, "Ana Souza");
    assert_eq!(result.request.status, CertificateStatus::Sent);

    let repeat = certificate_service::request_certificate(
        &state,
        &student,
        "portugol-studio",
        RequestCertificateRequest::default(),
    )
    .await?
    .data
    .unwrap();
    assert!(repeat.already_exists);
    assert_eq!(repeat.request.id, result.request.id);

    let reviewed = certificate_service::update_status(
        &state,
        &admin,
        result.request.id,
        UpdateCertificateStatusRequest {
            status: CertificateStatus::Approved,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(reviewed.status, CertificateStatus::Approved);

    let twice = certificate_service::update_status(
        &state,
        &admin,
        result.request.id,
        UpdateCertificateStatusRequest {
            status: CertificateStatus::Rejected,
        },
    )
    .await;
    assert!(matches!(twice, Err(AppError::BadRequest(_))));

    // One immutable rating per student.
    rating_service::rate_course(&state, &student, "portugol-studio", RateCourseRequest { rating: 5 })
        .await?;
    let again =
        rating_service::rate_course(&state, &student, "portugol-studio", RateCourseRequest { rating: 1 })
            .await;
    assert!(matches!(again, Err(AppError::BadRequest(_))));
    let out_of_range =
        rating_service::rate_course(&state, &admin, "portugol-studio", RateCourseRequest { rating: 6 })
            .await;
    assert!(matches!(out_of_range, Err(AppError::BadRequest(_))));

    let summary = rating_service::summary(&state, "portugol-studio").await?;
    assert_eq!(summary.count, 1);
    assert_eq!(summary.average, 5.0);

    Ok(())
}
