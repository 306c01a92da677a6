//! Draws the header, the calendar and the footer.
//!
//! Each layout group is drawn as one equal-width lane. The per-member
//! `100 / n` slots from [`Group::placements`](crate::layout::Group::placements)
//! are not used on screen; they only appear in `--dump` output.

use crate::layout::{GridSpan, StudyBlock};
use crate::source::DaySummary;
use crate::ui::app::App;
use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 3;
/// Session squares drawn before the counter switches to digits only.
const MAX_SESSION_MARKS: u32 = 24;
const LABEL_WIDTH: u16 = 9;

/// Calendar rows visible in a terminal of the given height.
pub fn calendar_rows(terminal_height: u16) -> usize {
    // body borders take two rows
    usize::from(terminal_height.saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT + 2))
}

/// `12 AM`, `1 AM`, ... `11 PM`.
pub fn hour_label(hour: u32) -> String {
    let display = if hour % 12 == 0 { 12 } else { hour % 12 };
    let suffix = if hour < 12 { "AM" } else { "PM" };
    format!("{} {}", display, suffix)
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

pub fn render(frame: &mut Frame, app: &App) {
    // Main layout: Header + Calendar + Footer
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(frame.area());

    render_header(frame, app, main_chunks[0]);
    render_calendar(frame, app, main_chunks[1]);
    render_footer(frame, app, main_chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![
        Span::styled(
            "  Study Blocks  ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            app.day.format("%a, %b %-d %Y").to_string(),
            Style::default().fg(theme.fg),
        ),
        Span::styled(format!("   zoom {}", app.zoom), Style::default().fg(theme.fg_dim)),
    ];
    if app.is_today() {
        spans.push(Span::styled(
            format!(
                "   now {}",
                app.now.with_timezone(&Local).format("%-I:%M %p")
            ),
            Style::default().fg(theme.now_line),
        ));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent)),
        )
        .style(Style::default().bg(theme.bg));

    frame.render_widget(header, area);
}

fn render_calendar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let outer = Block::default()
        .borders(Borders::ALL)
        .title("📅 Calendar")
        .border_style(Style::default().fg(theme.fg_dim))
        .style(Style::default().bg(theme.bg));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    if inner.width <= LABEL_WIDTH || inner.height == 0 {
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LABEL_WIDTH), Constraint::Min(0)])
        .split(inner);
    let labels_area = columns[0];
    let lanes_area = columns[1];

    let first_row = app.scroll;
    let visible_rows = usize::from(inner.height);
    let now_row = app
        .now_row()
        .filter(|row| (first_row..first_row + visible_rows).contains(row));

    render_hour_labels(frame, app, labels_area, now_row);

    let groups = app.groups();
    if groups.is_empty() {
        let empty = Paragraph::new("No study blocks on this day")
            .style(Style::default().fg(theme.fg_dim))
            .alignment(Alignment::Center);
        let y = lanes_area.y + lanes_area.height / 2;
        frame.render_widget(empty, Rect::new(lanes_area.x, y, lanes_area.width, 1));
    } else {
        let lane_count = u32::try_from(groups.len()).unwrap_or(u32::MAX);
        let lanes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, lane_count); groups.len()])
            .split(lanes_area);

        let selected_id = app.selected_block().map(|block| block.id);
        for (group, lane) in groups.iter().zip(lanes.iter()) {
            for (block, span) in group.members() {
                let Some(rect) = block_rect(*lane, span, first_row) else {
                    continue;
                };
                render_block(frame, app, block, rect, selected_id == Some(block.id));
            }
        }
    }

    if let Some(row) = now_row {
        let y = lanes_area.y + to_u16(row - first_row);
        let line = Paragraph::new("─".repeat(usize::from(lanes_area.width)))
            .style(Style::default().fg(theme.now_line));
        frame.render_widget(line, Rect::new(lanes_area.x, y, lanes_area.width, 1));
    }
}

/// Screen rect for a span inside a lane, or `None` when it is scrolled out.
fn block_rect(lane: Rect, span: GridSpan, first_row: usize) -> Option<Rect> {
    let start_row = App::row_of(span.start);
    let end_row = App::row_after(span.end).max(start_row + 1);
    let last_visible = first_row + usize::from(lane.height);

    if end_row <= first_row || start_row >= last_visible {
        return None;
    }

    let top = start_row.max(first_row);
    let bottom = end_row.min(last_visible);
    // leave a one-column gap between lanes
    let width = lane.width.saturating_sub(1).max(1);

    Some(Rect::new(
        lane.x,
        lane.y + to_u16(top - first_row),
        width,
        to_u16(bottom - top),
    ))
}

fn render_block(frame: &mut Frame, app: &App, block: &StudyBlock, area: Rect, selected: bool) {
    let theme = &app.theme;
    let style = if selected {
        Style::default()
            .fg(theme.bg)
            .bg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else if block.is_ongoing() {
        Style::default().fg(theme.block_fg).bg(theme.ongoing)
    } else {
        Style::default().fg(theme.block_fg).bg(theme.block)
    };

    let icon = if block.is_countdown { "⏳" } else { "⏱" };
    let mut lines = vec![
        Line::from(format!("{} #{}", icon, block.id)),
        Line::from(block.time_range_label(&Local)),
    ];
    if let Some(rating) = block.rating {
        lines.push(Line::from(format!("★ {:.1}", rating)));
    }

    frame.render_widget(Paragraph::new(lines).style(style), area);
}

fn render_hour_labels(frame: &mut Frame, app: &App, area: Rect, now_row: Option<usize>) {
    let theme = &app.theme;
    let scale = app.scale();
    let first_row = app.scroll;

    let mut lines: Vec<Line> = vec![Line::from(""); usize::from(area.height)];
    for hour in 0..24u32 {
        let position = scale.rounding.apply(f64::from(hour * 60) * scale.zoom);
        let row = App::row_of(position);
        if let Some(line) = row
            .checked_sub(first_row)
            .and_then(|offset| lines.get_mut(offset))
        {
            *line = Line::from(Span::styled(
                format!("{:>7}", hour_label(hour)),
                Style::default().fg(theme.fg_dim),
            ));
        }
    }

    if let Some(row) = now_row {
        if let Some(line) = lines.get_mut(row - first_row) {
            let label = app.now.with_timezone(&Local).format("%-I:%M").to_string();
            *line = Line::from(Span::styled(
                format!("{:>7} ●", label),
                Style::default().fg(theme.now_line),
            ));
        }
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let summary = app.summary();
    let detail = match app.selected_block() {
        Some(block) => selected_details(app, &block),
        None => {
            let mut text = format!(
                "{} blocks   {} focused",
                summary.block_count,
                summary.focused_label()
            );
            if summary.ongoing_count > 0 {
                text.push_str(&format!("   {} running", summary.ongoing_count));
            }
            if let Some(avg) = summary.average_rating {
                text.push_str(&format!("   avg ★ {:.1}", avg));
            }
            text
        }
    };

    let help = app.status.clone().unwrap_or_else(|| {
        "[↑↓/jk] Scroll  [+/-] Zoom  [Tab] Select  [t] Now  [[/]] Day  [r] Reload  [q] Quit"
            .to_string()
    });

    let footer = Paragraph::new(vec![
        Line::from(Span::styled(detail, Style::default().fg(theme.fg))),
        goal_line(app, &summary),
        Line::from(Span::styled(help, Style::default().fg(theme.fg_dim))),
    ])
    .style(Style::default().bg(theme.bg));

    frame.render_widget(footer, area);
}

/// `Goal 1h 40m / 3h 00m (55%)   Sessions 2/4 ■■▣□`
fn goal_line(app: &App, summary: &DaySummary) -> Line<'static> {
    let theme = &app.theme;
    let target = summary.goal.quantity;
    let completed = u32::try_from(summary.completed_blocks).unwrap_or(u32::MAX);

    let mut spans = vec![
        Span::styled(
            format!("Goal {}", summary.goal_label()),
            Style::default().fg(theme.accent),
        ),
        Span::styled(
            format!("   Sessions {}/{} ", completed, target),
            Style::default().fg(theme.fg),
        ),
    ];

    if target <= MAX_SESSION_MARKS {
        let marks: String = (0..target)
            .map(|i| {
                if i < completed {
                    '■'
                } else if i == completed && summary.ongoing_count > 0 {
                    '▣'
                } else {
                    '□'
                }
            })
            .collect();
        spans.push(Span::styled(marks, Style::default().fg(theme.block)));
    }

    Line::from(spans)
}

fn selected_details(app: &App, block: &StudyBlock) -> String {
    let minutes = block.duration(app.now).num_minutes();
    let mut text = format!(
        "#{}   {}   {}m",
        block.id,
        block.time_range_label(&Local),
        minutes
    );
    if let Some(rating) = block.rating {
        text.push_str(&format!("   ★ {:.1}", rating));
    }
    if let Some(category) = block.study_category_id {
        text.push_str(&format!("   category {}", category));
    }
    if let Some(goal) = block.daily_goal_id {
        text.push_str(&format!("   goal {}", goal));
    }
    text.push_str(if block.is_countdown {
        "   countdown"
    } else {
        "   stopwatch"
    });
    text
}
