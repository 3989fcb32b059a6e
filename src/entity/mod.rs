pub mod audit_logs;
pub mod certificate_requests;
pub mod course_videos;
pub mod courses;
pub mod enrollments;
pub mod free_mode_settings;
pub mod journeys;
pub mod payment_orders;
pub mod ratings;
pub mod users;
pub mod video_completions;

pub use audit_logs::Entity as AuditLogs;
pub use certificate_requests::Entity as CertificateRequests;
pub use course_videos::Entity as CourseVideos;
pub use courses::Entity as Courses;
pub use enrollments::Entity as Enrollments;
pub use free_mode_settings::Entity as FreeModeSettings;
pub use journeys::Entity as Journeys;
pub use payment_orders::Entity as PaymentOrders;
pub use ratings::Entity as Ratings;
pub use users::Entity as Users;
pub use video_completions::Entity as VideoCompletions;
