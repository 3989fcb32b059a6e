//! Self-reported payment claims awaiting admin verification.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "awaiting_verification")]
    AwaitingVerification,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl PaymentStatus {
    /// Orders only move forward; `approved` and `rejected` are terminal.
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::AwaitingVerification)
                | (PaymentStatus::AwaitingVerification, PaymentStatus::Approved)
                | (PaymentStatus::AwaitingVerification, PaymentStatus::Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PaymentStatus::Approved | PaymentStatus::Rejected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::AwaitingVerification => "awaiting_verification",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Rejected => "rejected",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    #[default]
    #[sea_orm(string_value = "course")]
    Course,
    #[sea_orm(string_value = "certificate")]
    Certificate,
}

impl PaymentType {
    pub fn reference_prefix(self) -> &'static str {
        match self {
            PaymentType::Course => "PAY",
            PaymentType::Certificate => "CERT",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub reference: String,
    pub user_id: Uuid,
    pub course_id: String,
    pub amount: i64,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTimeWithTimeZone>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Courses,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::PaymentStatus::*;

    #[test]
    fn awaiting_orders_can_be_approved_or_rejected() {
        assert!(AwaitingVerification.can_transition_to(Approved));
        assert!(AwaitingVerification.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(AwaitingVerification));
    }

    #[test]
    fn terminal_states_never_move() {
        for next in [Pending, AwaitingVerification, Approved, Rejected] {
            assert!(!Approved.can_transition_to(next));
            assert!(!Rejected.can_transition_to(next));
        }
        assert!(Approved.is_terminal());
        assert!(Rejected.is_terminal());
    }

    #[test]
    fn no_backward_or_skipping_edges() {
        assert!(!AwaitingVerification.can_transition_to(Pending));
        assert!(!AwaitingVerification.can_transition_to(AwaitingVerification));
        assert!(!Pending.can_transition_to(Approved));
        assert!(!Pending.can_transition_to(Rejected));
    }
}
