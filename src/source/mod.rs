//! # Block Source Module
//!
//! Loads study blocks from a JSON export and narrows them to a single day.
//!
//! ## Data Format
//!
//! The file holds the array returned by the backend's `/study-blocks/`
//! endpoint:
//!
//! ```json
//! [
//!   {
//!     "id": 12,
//!     "start_time": "2024-05-01T09:00:00",
//!     "end_time": "2024-05-01T10:00:00",
//!     "is_countdown": true,
//!     "rating": 4.0,
//!     "study_category_id": 2
//!   },
//!   { "id": 13, "start_time": "2024-05-01T10:30:00Z", "end_time": null }
//! ]
//! ```
//!
//! Timestamps without an offset are read as UTC. A block with a `null` or
//! missing `end_time` is still running.

mod loader;
mod summary;

pub use loader::{blocks_for_day, load_blocks, parse_blocks};
pub use summary::{day_summary, DailyGoal, DaySummary};
