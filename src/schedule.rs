//! Post scheduling: slots, lifecycle, the post log, and poster dispatch.

pub mod log;
pub mod post;
pub mod poster;
pub mod scheduler;
pub mod slot;

pub use log::{LogEntry, PostIndex, PostLog};
pub use post::{compute_fingerprint, PostContent, PostState, ScheduledPost};
pub use poster::{PostOutcome, Poster, PosterRegistry, WebhookPoster};
pub use scheduler::{
    HistoryFilter, MultiScheduleReport, PlatformResult, PostScheduler, ScheduleOutcome,
    ScheduleStatus, SchedulerOptions, DEFAULT_POSTER_TIMEOUT,
};
pub use slot::SlotPolicy;
