pub mod mood;
pub mod notification;
pub mod user;
pub mod work_log;
