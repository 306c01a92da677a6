//! # Layout Module
//!
//! This module places a day's study blocks on a vertical time grid.
//!
//! ## Overview
//!
//! Rendering a day of study blocks needs two things from each block: where it
//! sits vertically (derived from its clock time) and which column band it
//! shares with other blocks so that overlapping blocks never collide.
//!
//! - [`calculate_grid_position`] converts a clock time into a grid offset
//!   (minutes since local midnight scaled by the zoom level).
//! - [`group_overlapping_blocks`] packs blocks into [`Group`]s whose members
//!   never overlap each other.
//!
//! ## Example
//!
//! ```text
//!  09:00 ┌──────┐
//!        │  A   │ ┌──────┐
//!  10:00 └──────┘ │  B   │
//!                 └──────┘
//!  11:00 ┌──────┐
//!        │  C   │
//!  12:00 └──────┘
//!
//!  group 0: A, C     group 1: B
//! ```
//!
//! Everything here is a pure function of the block list and the supplied
//! "now", so callers recompute it on every render.

pub mod block;
pub mod grid;
pub mod group;
pub mod timestamp;

pub use block::StudyBlock;
pub use grid::{
    calculate_grid_position, minutes_since_midnight, GridScale, GridSpan, RoundingPolicy,
    ZoomLevel, MINUTES_PER_DAY,
};
pub use group::{group_overlapping_blocks, Group, Placement};
