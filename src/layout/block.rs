use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A recorded or in-progress interval of focused work.
///
/// Only `id`, `start_time`, `end_time` and `is_countdown` matter for layout.
/// The remaining fields come along from the backend record and are shown in
/// the details panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyBlock {
    pub id: i64,
    #[serde(with = "super::timestamp")]
    pub start_time: DateTime<Utc>,
    /// `None` while the block is still running.
    #[serde(default, with = "super::timestamp::option")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default = "default_is_countdown")]
    pub is_countdown: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_goal_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

fn default_is_countdown() -> bool {
    true
}

impl StudyBlock {
    /// Create a block with only the fields layout cares about.
    pub fn new(id: i64, start_time: DateTime<Utc>, end_time: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            start_time,
            end_time,
            is_countdown: default_is_countdown(),
            rating: None,
            daily_goal_id: None,
            study_category_id: None,
            user_id: None,
        }
    }

    pub fn is_ongoing(&self) -> bool {
        self.end_time.is_none()
    }

    /// The end used for layout: the recorded end, or `now` for an ongoing block.
    pub fn effective_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end_time.unwrap_or(now)
    }

    /// Time spent so far. Never negative, even if `now` lags behind the start.
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        let elapsed = self.effective_end(now) - self.start_time;
        elapsed.max(Duration::zero())
    }

    /// Human readable `9:05 AM - 10:00 AM` range in the given time zone.
    pub fn time_range_label<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let start = self.start_time.with_timezone(tz).format("%-I:%M %p");
        match self.end_time {
            Some(end) => format!("{} - {}", start, end.with_timezone(tz).format("%-I:%M %p")),
            None => format!("{} - now", start),
        }
    }
}
