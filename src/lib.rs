//! task-timeline
//!
//! Turns task records carrying due, scheduled, start and completion dates into
//! a deduplicated, chronologically grouped timeline.
//!
//! Pipeline: [`resolve::resolve_task_date`] picks one anchor per task,
//! [`time_info::resolve_time_info`] adds the time of day,
//! [`grouping::group_events`] sorts and splits events into time slots and
//! all-day events. [`agenda::build_timeline`] runs the whole chain.

pub mod agenda;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod grouping;
pub mod label;
pub mod render;
pub mod resolve;
pub mod time_info;
pub mod timestamp;
pub mod types;
