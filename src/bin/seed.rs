use course_portal_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "admin").await?;
    let user_id = ensure_user(&pool, "student@example.com", "student123", "user").await?;
    seed_catalog(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, Student ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let journeys = [
        ("logic", "Programming logic", "First steps with algorithms", 1),
        ("web", "Web development", "HTML, CSS and JavaScript from scratch", 2),
    ];
    for (id, title, description, position) in journeys {
        sqlx::query(
            r#"
            INSERT INTO journeys (id, title, description, position)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(position)
        .execute(pool)
        .await?;
    }

    // (id, journey, title, category, price)
    let courses = [
        ("portugol-studio", "logic", "Portugol Studio", "logic", 500_i64),
        ("html", "web", "HTML", "frontend", 1000),
        ("css", "web", "CSS", "frontend", 900),
        ("javascript", "web", "JavaScript", "frontend", 1500),
    ];
    for (id, journey_id, title, category, price) in courses {
        sqlx::query(
            r#"
            INSERT INTO courses (id, journey_id, title, category, payment_enabled, price)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(journey_id)
        .bind(title)
        .bind(category)
        .bind(price)
        .execute(pool)
        .await?;

        for position in 1..=3 {
            sqlx::query(
                r#"
                INSERT INTO course_videos (id, course_id, title, url, position)
                SELECT $1, $2, $3, $4, $5
                WHERE NOT EXISTS (
                    SELECT 1 FROM course_videos WHERE course_id = $2 AND position = $5
                )
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(id)
            .bind(format!("{title} - lesson {position}"))
            .bind(format!("https://www.youtube.com/watch?v={id}-{position}"))
            .bind(position)
            .execute(pool)
            .await?;
        }
    }

    println!("Seeded journeys, courses and videos");
    Ok(())
}
