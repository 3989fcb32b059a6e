use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{entity::certificate_requests::CertificateStatus, models::CertificateRequest};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RequestCertificateRequest {
    /// Name printed on the certificate; defaults to the account's display name.
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CertificateRequestResult {
    pub request: CertificateRequest,
    pub already_exists: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CertificateRequestList {
    pub items: Vec<CertificateRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCertificateStatusRequest {
    pub status: CertificateStatus,
}
