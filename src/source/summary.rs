use crate::layout::StudyBlock;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Planned study for a day: `quantity` blocks of `block_size` minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DailyGoal {
    pub quantity: u32,
    /// Minutes per block.
    pub block_size: u32,
}

impl Default for DailyGoal {
    fn default() -> Self {
        Self {
            quantity: 7,
            block_size: 60,
        }
    }
}

impl DailyGoal {
    pub fn total_minutes(&self) -> i64 {
        i64::from(self.quantity) * i64::from(self.block_size)
    }
}

impl fmt::Display for DailyGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.quantity, self.block_size)
    }
}

/// Parses `BLOCKSxMINUTES`, e.g. `7x60`.
impl FromStr for DailyGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_part = |part: &str| -> Result<u32, String> {
            match part.trim().parse::<u32>() {
                Ok(0) => Err(format!("daily goal {s:?} must use positive numbers")),
                Ok(value) => Ok(value),
                Err(e) => Err(format!("invalid daily goal {s:?}: {e}")),
            }
        };

        let lower = s.to_ascii_lowercase();
        let (quantity, block_size) = lower.split_once('x').ok_or_else(|| {
            format!("invalid daily goal {s:?}: expected BLOCKSxMINUTES, e.g. 7x60")
        })?;

        Ok(Self {
            quantity: parse_part(quantity)?,
            block_size: parse_part(block_size)?,
        })
    }
}

/// Totals for the blocks shown on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub block_count: usize,
    pub ongoing_count: usize,
    /// Finished blocks, counted against the goal's block quantity.
    pub completed_blocks: usize,
    /// Focused time, with ongoing blocks counted up to `now`.
    pub focused_minutes: i64,
    /// Mean over rated blocks only.
    pub average_rating: Option<f64>,
    pub goal: DailyGoal,
    /// Focused share of the goal's total time, rounded down. Not capped at 100.
    pub goal_percent: u32,
}

fn hours_minutes(minutes: i64) -> String {
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

impl DaySummary {
    /// `2h 05m` style label for the focused time.
    pub fn focused_label(&self) -> String {
        hours_minutes(self.focused_minutes)
    }

    pub fn goal_minutes(&self) -> i64 {
        self.goal.total_minutes()
    }

    /// `2h 05m / 7h 00m (29%)`.
    pub fn goal_label(&self) -> String {
        format!(
            "{} / {} ({}%)",
            self.focused_label(),
            hours_minutes(self.goal_minutes()),
            self.goal_percent
        )
    }

    /// Blocks still needed to reach the goal's quantity.
    pub fn remaining_blocks(&self) -> usize {
        usize::try_from(self.goal.quantity)
            .unwrap_or(usize::MAX)
            .saturating_sub(self.completed_blocks)
    }
}

pub fn day_summary(blocks: &[StudyBlock], now: DateTime<Utc>, goal: DailyGoal) -> DaySummary {
    let focused = blocks
        .iter()
        .fold(Duration::zero(), |total, block| total + block.duration(now));

    let ratings: Vec<f64> = blocks.iter().filter_map(|block| block.rating).collect();
    let average_rating = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    };

    let focused_minutes = focused.num_minutes();
    let goal_percent = match goal.total_minutes() {
        0 => 100,
        total => u32::try_from(focused_minutes * 100 / total).unwrap_or(u32::MAX),
    };
    let ongoing_count = blocks.iter().filter(|block| block.is_ongoing()).count();

    DaySummary {
        block_count: blocks.len(),
        ongoing_count,
        completed_blocks: blocks.len() - ongoing_count,
        focused_minutes,
        average_rating,
        goal,
        goal_percent,
    }
}
