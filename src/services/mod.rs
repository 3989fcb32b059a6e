pub mod admin_service;
pub mod auth_service;
pub mod certificate_service;
pub mod course_service;
pub mod enrollment_service;
pub mod free_mode_service;
pub mod payment_service;
pub mod rating_service;
