//! trendpost: Lens-Rotated Content Planning and Post Scheduling
//!
//! Plans trend-driven social posts by rotating through a fixed cycle of analytical
//! lenses, anchors each plan to a domain workflow skeleton, and schedules the
//! resulting posts into one daily slot per platform with an append-only post log.

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod generation;
pub mod init;
pub mod lens;
pub mod logging;
pub mod plan;
pub mod schedule;
pub mod skeleton;
pub mod store;
pub mod types;
