use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub journey_id: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub payment_enabled: bool,
    pub price: i64,
    pub finished: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journeys::Entity",
        from = "Column::JourneyId",
        to = "super::journeys::Column::Id"
    )]
    Journeys,
    #[sea_orm(has_many = "super::course_videos::Entity")]
    CourseVideos,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::payment_orders::Entity")]
    PaymentOrders,
    #[sea_orm(has_many = "super::ratings::Entity")]
    Ratings,
}

impl Related<super::journeys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Journeys.def()
    }
}

impl Related<super::course_videos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseVideos.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::payment_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentOrders.def()
    }
}

impl Related<super::ratings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
