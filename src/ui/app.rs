use crate::layout::{
    group_overlapping_blocks, GridScale, Group, RoundingPolicy, StudyBlock, ZoomLevel,
};
use crate::source::{blocks_for_day, day_summary, DailyGoal, DaySummary};
use crate::ui::theme::Theme;
use chrono::{DateTime, Days, Local, NaiveDate, Utc};

/// Grid minutes covered by one terminal row at 1x zoom.
pub const MINUTES_PER_ROW: i64 = 15;

/// State of the day calendar.
///
/// Everything the renderer needs lives here and is passed explicitly; there
/// is no global UI state.
pub struct App {
    pub blocks: Vec<StudyBlock>,
    pub day: NaiveDate,
    pub zoom: ZoomLevel,
    pub rounding: RoundingPolicy,
    pub now: DateTime<Utc>,
    /// First visible calendar row.
    pub scroll: usize,
    /// Rows the calendar pane can show, updated by the event loop.
    pub viewport_rows: usize,
    /// Index into [`App::day_blocks`].
    pub selected: Option<usize>,
    pub should_quit: bool,
    pub status: Option<String>,
    pub theme: Theme,
    pub goal: DailyGoal,
}

impl App {
    pub fn new(blocks: Vec<StudyBlock>, day: NaiveDate, now: DateTime<Utc>, theme: Theme) -> Self {
        Self {
            blocks,
            day,
            zoom: ZoomLevel::default(),
            rounding: RoundingPolicy::default(),
            now,
            scroll: 0,
            viewport_rows: 0,
            selected: None,
            should_quit: false,
            status: None,
            theme,
            goal: DailyGoal::default(),
        }
    }

    pub fn with_scale(mut self, zoom: ZoomLevel, rounding: RoundingPolicy) -> Self {
        self.zoom = zoom;
        self.rounding = rounding;
        self
    }

    pub fn with_goal(mut self, goal: DailyGoal) -> Self {
        self.goal = goal;
        self
    }

    pub fn scale(&self) -> GridScale {
        GridScale::new(self.zoom.value(), self.rounding)
    }

    /// Blocks starting on the shown day, ordered by start time.
    pub fn day_blocks(&self) -> Vec<StudyBlock> {
        let mut blocks = blocks_for_day(&self.blocks, self.day, &Local);
        blocks.sort_by_key(|block| block.start_time);
        blocks
    }

    pub fn groups(&self) -> Vec<Group> {
        group_overlapping_blocks(&self.day_blocks(), self.now, &Local, self.scale())
    }

    pub fn summary(&self) -> DaySummary {
        day_summary(&self.day_blocks(), self.now, self.goal)
    }

    pub fn is_today(&self) -> bool {
        self.now.with_timezone(&Local).date_naive() == self.day
    }

    /// Calendar row containing a grid position.
    pub fn row_of(position: i64) -> usize {
        usize::try_from(position.max(0) / MINUTES_PER_ROW).unwrap_or(usize::MAX)
    }

    /// First row past a grid position, for the bottom edge of a span.
    pub fn row_after(position: i64) -> usize {
        let rows = (position.max(0) + MINUTES_PER_ROW - 1) / MINUTES_PER_ROW;
        usize::try_from(rows).unwrap_or(usize::MAX)
    }

    pub fn total_rows(&self) -> usize {
        Self::row_after(self.scale().day_end())
    }

    /// Row of the current-time line, if the shown day is today.
    pub fn now_row(&self) -> Option<usize> {
        if !self.is_today() {
            return None;
        }
        let position = self.scale().position(&self.now.with_timezone(&Local));
        Some(Self::row_of(position))
    }

    pub fn refresh_now(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    fn max_scroll(&self) -> usize {
        self.total_rows().saturating_sub(self.viewport_rows.max(1))
    }

    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll());
    }

    /// Center the viewport on the current time, or on the first block when
    /// the shown day is not today.
    pub fn scroll_to_now(&mut self) {
        let target = match self.now_row() {
            Some(row) => row,
            None => match self.groups().first() {
                Some(group) => Self::row_of(group.grid_row.start),
                None => 0,
            },
        };
        self.scroll = target
            .saturating_sub(self.viewport_rows / 2)
            .min(self.max_scroll());
    }

    fn set_zoom(&mut self, zoom: ZoomLevel) {
        let old = self.zoom.value();
        self.zoom = zoom;
        // keep the same time of day at the top of the viewport
        let scaled = (self.scroll as f64 * zoom.value() / old).round();
        self.scroll = (scaled as usize).min(self.max_scroll());
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom.zoom_in());
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom.zoom_out());
    }

    pub fn selected_block(&self) -> Option<StudyBlock> {
        let index = self.selected?;
        self.day_blocks().into_iter().nth(index)
    }

    pub fn select_next(&mut self) {
        let count = self.day_blocks().len();
        if count == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(index) => (index + 1) % count,
            None => 0,
        });
        self.scroll_to_selected();
    }

    pub fn select_previous(&mut self) {
        let count = self.day_blocks().len();
        if count == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => count - 1,
            Some(index) => index - 1,
        });
        self.scroll_to_selected();
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn scroll_to_selected(&mut self) {
        let Some(block) = self.selected_block() else {
            return;
        };
        let start = self.scale().position(&block.start_time.with_timezone(&Local));
        let row = Self::row_of(start);
        let visible = self.scroll..self.scroll + self.viewport_rows.max(1);
        if !visible.contains(&row) {
            self.scroll = row.saturating_sub(2).min(self.max_scroll());
        }
    }

    fn show_day(&mut self, day: NaiveDate) {
        self.day = day;
        self.selected = None;
        self.scroll_to_now();
    }

    pub fn next_day(&mut self) {
        if let Some(day) = self.day.checked_add_days(Days::new(1)) {
            self.show_day(day);
        }
    }

    pub fn previous_day(&mut self) {
        if let Some(day) = self.day.checked_sub_days(Days::new(1)) {
            self.show_day(day);
        }
    }

    pub fn go_to_today(&mut self) {
        self.show_day(self.now.with_timezone(&Local).date_naive());
    }

    /// Swap in a freshly loaded block list.
    pub fn reload(&mut self, blocks: Vec<StudyBlock>) {
        let selected_id = self.selected_block().map(|block| block.id);
        self.blocks = blocks;
        self.selected = selected_id
            .and_then(|id| self.day_blocks().iter().position(|block| block.id == id));
        self.status = Some(format!("Reloaded {} blocks", self.blocks.len()));
    }
}
