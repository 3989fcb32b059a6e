use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;

use crate::{
    dto::courses::{CourseDetail, CourseList, JourneyList, JourneyWithCourses},
    entity::{
        course_videos::{Column as VideoCol, Entity as CourseVideos},
        courses::{self, Column as CourseCol, Entity as Courses},
        journeys::{Column as JourneyCol, Entity as Journeys},
    },
    error::{AppError, AppResult},
    models::{Course, CourseVideo},
    response::{ApiResponse, Meta},
    routes::params::CourseQuery,
    services::rating_service,
    state::AppState,
};

pub async fn find_course<C: ConnectionTrait>(conn: &C, id: &str) -> AppResult<courses::Model> {
    Courses::find_by_id(id.to_owned())
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn list_journeys(state: &AppState) -> AppResult<ApiResponse<JourneyList>> {
    let journeys = Journeys::find()
        .order_by_asc(JourneyCol::Position)
        .order_by_asc(JourneyCol::Title)
        .all(&state.orm)
        .await?;

    let mut by_journey: HashMap<String, Vec<Course>> = HashMap::new();
    for course in Courses::find()
        .filter(CourseCol::JourneyId.is_not_null())
        .order_by_asc(CourseCol::Title)
        .all(&state.orm)
        .await?
    {
        if let Some(journey_id) = course.journey_id.clone() {
            by_journey.entry(journey_id).or_default().push(course.into());
        }
    }

    let items: Vec<JourneyWithCourses> = journeys
        .into_iter()
        .map(|journey| JourneyWithCourses {
            courses: by_journey.remove(&journey.id).unwrap_or_default(),
            journey: journey.into(),
        })
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Journeys", JourneyList { items }, Some(meta)))
}

pub async fn list_courses(
    state: &AppState,
    query: CourseQuery,
) -> AppResult<ApiResponse<CourseList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(CourseCol::Title).ilike(pattern.clone()))
                .add(Expr::col(CourseCol::Subtitle).ilike(pattern.clone()))
                .add(Expr::col(CourseCol::Description).ilike(pattern.clone()))
                .add(Expr::col(CourseCol::Category).ilike(pattern)),
        );
    }

    if let Some(journey_id) = query.journey_id.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(CourseCol::JourneyId.eq(journey_id.clone()));
    }

    let finder = Courses::find()
        .filter(condition)
        .order_by_asc(CourseCol::Title);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Course::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Courses", CourseList { items }, Some(meta)))
}

pub async fn get_course(state: &AppState, id: &str) -> AppResult<ApiResponse<CourseDetail>> {
    let course = find_course(&state.orm, id).await?;
    let videos = list_videos(&state.orm, &course.id).await?;
    let ratings = rating_service::summary(state, &course.id).await?;

    Ok(ApiResponse::ok(
        "Course",
        CourseDetail {
            course: course.into(),
            videos,
            ratings,
        },
    ))
}

pub async fn list_videos<C: ConnectionTrait>(
    conn: &C,
    course_id: &str,
) -> AppResult<Vec<CourseVideo>> {
    let videos = CourseVideos::find()
        .filter(VideoCol::CourseId.eq(course_id))
        .order_by_asc(VideoCol::Position)
        .order_by_asc(VideoCol::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(CourseVideo::from)
        .collect();
    Ok(videos)
}
