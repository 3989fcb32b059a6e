use serde::Deserialize;
use utoipa::ToSchema;

use crate::entity::{
    certificate_requests::CertificateStatus,
    payment_orders::{PaymentStatus, PaymentType},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

// Not flattened: urlencoded numbers don't survive `#[serde(flatten)]`.
macro_rules! paginated {
    ($($query:ty),+) => {
        $(impl $query {
            pub fn pagination(&self) -> Pagination {
                Pagination {
                    page: self.page,
                    per_page: self.per_page,
                }
            }
        })+
    };
}

paginated!(CourseQuery, OrderListQuery, CertificateListQuery);

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CourseQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Case-insensitive match on title, subtitle, description and category.
    pub q: Option<String>,
    pub journey_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<PaymentStatus>,
    pub payment_type: Option<PaymentType>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PaymentTypeQuery {
    #[serde(default)]
    pub payment_type: PaymentType,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CertificateListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<CertificateStatus>,
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn pagination_is_clamped() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(500),
        };
        assert_eq!(p.normalize(), (1, 100, 0));

        let p = Pagination {
            page: Some(3),
            per_page: None,
        };
        assert_eq!(p.normalize(), (3, 20, 40));
    }

    #[test]
    fn huge_page_saturates_offset() {
        let p = Pagination {
            page: Some(i64::MAX),
            per_page: Some(100),
        };
        let (page, per_page, offset) = p.normalize();
        assert_eq!((page, per_page), (i64::MAX, 100));
        assert_eq!(offset, i64::MAX);
        assert!(offset >= 0);
    }
}
