use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    access::AccessDecision,
    entity::payment_orders::PaymentType,
    models::PaymentOrder,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentOrderRequest {
    pub course_id: String,
    #[serde(default)]
    pub payment_type: PaymentType,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentOrderList {
    pub items: Vec<PaymentOrder>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentStatusView {
    pub course_id: String,
    pub payment_type: PaymentType,
    pub access: AccessDecision,
    /// Most recent order for this course and payment type.
    pub order: Option<PaymentOrder>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentInstructions {
    pub iban: String,
    pub certificate_price: i64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RejectOrderRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CoursePaymentSettingsRequest {
    pub payment_enabled: bool,
    pub price: i64,
}
