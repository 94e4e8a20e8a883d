//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument and run under
//! [`crate::CALL_DEADLINE`].

pub mod attachment_repo;
pub mod group_repo;
pub mod list_repo;
pub mod setting_repo;
pub mod step_repo;
pub mod tag_repo;
pub mod task_repo;
pub mod user_repo;

pub use attachment_repo::AttachmentRepo;
pub use group_repo::GroupRepo;
pub use list_repo::ListRepo;
pub use setting_repo::SettingRepo;
pub use step_repo::StepRepo;
pub use tag_repo::TagRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
