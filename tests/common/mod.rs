#![allow(dead_code)]

use course_portal_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    entity::{
        course_videos::ActiveModel as VideoActive, courses::ActiveModel as CourseActive,
        users::ActiveModel as UserActive,
    },
    middleware::auth::AuthUser,
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

/// Returns `None` when no database is configured, so callers can skip.
pub fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            None
        }
    }
}

pub async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool).await?;
    let state = AppState::new(pool, AppConfig::with_database_url(database_url));

    // Clean tables between runs
    let backend = state.orm.get_database_backend();
    state
        .orm
        .execute(Statement::from_string(
            backend,
            "TRUNCATE TABLE audit_logs, certificate_requests, free_mode_settings, payment_orders, \
             ratings, video_completions, enrollments, course_videos, courses, journeys, users \
             RESTART IDENTITY CASCADE",
        ))
        .await?;

    Ok(state)
}

pub async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.into()),
        password_hash: Set("dummy".into()),
        display_name: Set(Some(format!("{role} tester"))),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}

pub async fn create_course(
    state: &AppState,
    id: &str,
    price: i64,
    videos: usize,
) -> anyhow::Result<Vec<Uuid>> {
    CourseActive {
        id: Set(id.into()),
        journey_id: Set(None),
        title: Set(id.to_uppercase()),
        subtitle: Set(None),
        description: Set(None),
        category: Set(Some("frontend".into())),
        payment_enabled: Set(price > 0),
        price: Set(price),
        finished: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let mut ids = Vec::with_capacity(videos);
    for position in 1..=videos {
        let video = VideoActive {
            id: Set(Uuid::new_v4()),
            course_id: Set(id.into()),
            title: Set(format!("Lesson {position}")),
            url: Set(format!("https://youtu.be/{id}{position}")),
            position: Set(position as i32),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await?;
        ids.push(video.id);
    }
    Ok(ids)
}
