use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "video_completions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: String,
    pub video_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course_videos::Entity",
        from = "Column::VideoId",
        to = "super::course_videos::Column::Id"
    )]
    CourseVideos,
}

impl Related<super::course_videos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseVideos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
