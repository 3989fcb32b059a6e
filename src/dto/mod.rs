pub mod admin;
pub mod auth;
pub mod certificates;
pub mod courses;
pub mod free_mode;
pub mod payments;
