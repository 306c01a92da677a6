//! # UI Module
//!
//! This module provides the terminal day calendar.
//!
//! ## Components
//!
//! - [`App`] - Calendar state (shown day, zoom, scroll, selection, "now")
//! - [`mod@render`] - Rendering functions for drawing the TUI
//! - [`config`] - Persisted user preferences
//! - [`theme`] - Built-in color themes
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │  Study Blocks  Wed, May 1 2024   zoom 2x        │
//! ├─────────────────────────────────────────────────┤
//! │   9 AM ┌──────────┐                             │
//! │        │ ⏳ #1     │ ┌──────────┐                │
//! │  10 AM └──────────┘ │ ⏱ #2      │                │
//! │   10:24 ●───────────┼──────────┼─────────────── │
//! │  11 AM ┌──────────┐ └──────────┘                │
//! │        │ ⏳ #3     │                             │
//! ├─────────────────────────────────────────────────┤
//! │ 3 blocks   2h 05m focused                       │
//! │ Goal 2h 05m / 4h 00m (52%)  Sessions 3/4 ■■■□   │
//! │ [↑↓/jk] Scroll  [+/-] Zoom  [Tab] Select  ...   │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Each lane is one layout group; blocks in a lane never overlap.

pub mod app;
pub mod config;
pub mod render;
pub mod theme;

pub use app::App;
pub use render::render;
