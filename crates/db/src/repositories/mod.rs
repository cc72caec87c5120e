//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod daily_focus_repo;
pub mod document_repo;
pub mod notification_repo;
pub mod notification_settings_repo;
pub mod project_repo;
pub mod task_repo;

pub use daily_focus_repo::DailyFocusRepo;
pub use document_repo::DocumentRepo;
pub use notification_repo::NotificationRepo;
pub use notification_settings_repo::NotificationSettingsRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
