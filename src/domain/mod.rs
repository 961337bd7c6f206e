mod badge;
mod contributor;
pub(crate) mod storage;

pub use badge::{badge_info, Badge, BadgeTag, CustomBadge};
pub use contributor::ContributorRecord;
pub use storage::{KeyValueStore, StorageKeys};
