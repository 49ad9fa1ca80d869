//! Jobs domain module.
//!
//! This crate contains the job posting model and its business rules, all pure
//! and deterministic (no IO, no HTTP, no storage):
//! - `record`: the stored job posting shape
//! - `category` / `experience`: closed filter vocabularies
//! - `lifecycle`: moderation and engagement as an aggregate
//! - `feed`: the worker feed (filtering + ranking)
//! - `moderation`: the admin queue filter and dashboard counts

pub mod category;
pub mod experience;
pub mod feed;
pub mod lifecycle;
pub mod moderation;
pub mod record;

pub use category::{CATEGORY_MAP_VERSION, JobCategory, LEGACY_CATEGORY_KEYS, UnknownCategory};
pub use experience::{ExperienceBucket, ExperienceTable, UnknownExperienceBucket};
pub use feed::{
    DEFAULT_MAX_DISTANCE_KM, DEFAULT_TIE_WINDOW_KM, DISTANCE_OPTIONS_KM, FeedConfig, FeedCriteria,
    FeedJob, FeedOutcome, JobFeed, MISSING_DISTANCE_KM, compute_job_feed,
};
pub use lifecycle::{
    ApproveJob, ContactChannel, Job, JobAction, JobCommand, JobEvent, PostJob, RecordContact,
    RejectJob,
};
pub use moderation::{AdminJobFilter, DateRange, ModerationStats};
pub use record::{ContactInfo, DEFAULT_EXPIRY_DAYS, JobRecord, JobStatus, SalaryType, ShopPhoto};
