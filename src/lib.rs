//! studyblock - a terminal day calendar for study sessions
//!
//! This library provides the layout engine that places overlapping study
//! blocks side by side on a time grid, the loader for study-block exports,
//! and the TUI that renders a day of blocks.

pub mod clock;
pub mod layout;
pub mod source;
pub mod ui;
