//! Weight Tracker Utility Library
//!
//! This library provides functionality for extracting weight history from a
//! spreadsheet, charting the trend against a goal progression, and sending
//! the summary via email.

pub mod helpers;
pub mod models;
pub mod service;

pub use service::{TrackerConfig, TrackerService};

// Re-export key types for convenience
pub use helpers::progression::{Direction, ProgressionSeries, RangeSpec};
pub use helpers::series::{ExtractOutcome, WeeklyChange, WeightEntry, WeightSeries};
pub use models::sheets::SheetRecord;
