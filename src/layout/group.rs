//! # Overlap Grouping
//!
//! Greedy packing of study blocks into column bands.
//!
//! Blocks are visited in start order. Each block joins the first existing
//! group in which it overlaps no member; if it overlaps something in every
//! group, a new group is opened. This is first-fit interval colouring and runs
//! in O(n·g) for n blocks and g groups.

use super::block::StudyBlock;
use super::grid::{GridScale, GridSpan};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// A set of mutually non-overlapping blocks sharing one column band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    /// Union of the members' spans. Used for rendering bounds only.
    pub grid_row: GridSpan,
    pub blocks: Vec<StudyBlock>,
    /// Span of each member, parallel to `blocks`.
    #[serde(skip)]
    pub spans: Vec<GridSpan>,
}

/// Horizontal slot of one member inside its group, in percent of the band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub block_id: i64,
    pub span: GridSpan,
    pub left: f64,
    pub width: f64,
}

impl Group {
    fn new(block: StudyBlock, span: GridSpan) -> Self {
        Self {
            grid_row: span,
            blocks: vec![block],
            spans: vec![span],
        }
    }

    fn accepts(&self, span: &GridSpan) -> bool {
        !self.spans.iter().any(|existing| span.overlaps(existing))
    }

    fn push(&mut self, block: StudyBlock, span: GridSpan) {
        self.grid_row = self.grid_row.union(&span);
        self.blocks.push(block);
        self.spans.push(span);
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Members paired with their spans, in placement order.
    pub fn members(&self) -> impl Iterator<Item = (&StudyBlock, GridSpan)> {
        self.blocks.iter().zip(self.spans.iter().copied())
    }

    /// Side-by-side slots: each member gets `100 / len` percent, offset by its index.
    pub fn placements(&self) -> Vec<Placement> {
        if self.blocks.is_empty() {
            return Vec::new();
        }
        let width = 100.0 / self.blocks.len() as f64;
        self.members()
            .enumerate()
            .map(|(index, (block, span))| Placement {
                block_id: block.id,
                span,
                left: index as f64 * width,
                width,
            })
            .collect()
    }
}

/// Vertical span of a block on the grid.
///
/// Ongoing blocks end at `now`. A block that runs past the local midnight of
/// its start day is clipped to the end of that day, and an end earlier than
/// the start collapses to an empty span at the start.
pub fn block_span<Tz: TimeZone>(
    block: &StudyBlock,
    now: DateTime<Utc>,
    tz: &Tz,
    scale: GridScale,
) -> GridSpan {
    let start = block.start_time.with_timezone(tz);
    let end_instant = block.effective_end(now).max(block.start_time);
    let end = end_instant.with_timezone(tz);

    let start_pos = scale.position(&start);
    let end_pos = if end.date_naive() > start.date_naive() {
        scale.day_end()
    } else {
        scale.position(&end)
    };

    GridSpan::new(start_pos, end_pos.max(start_pos))
}

/// Sort blocks by start time and pack them into non-overlapping groups.
///
/// Groups come back in creation order. Every input block lands in exactly one
/// group. An empty input yields no groups.
pub fn group_overlapping_blocks<Tz: TimeZone>(
    blocks: &[StudyBlock],
    now: DateTime<Utc>,
    tz: &Tz,
    scale: GridScale,
) -> Vec<Group> {
    let mut sorted: Vec<&StudyBlock> = blocks.iter().collect();
    // stable: equal starts keep input order
    sorted.sort_by_key(|block| block.start_time);

    let mut groups: Vec<Group> = Vec::new();
    for block in sorted {
        let span = block_span(block, now, tz, scale);
        match groups.iter_mut().find(|group| group.accepts(&span)) {
            Some(group) => group.push(block.clone(), span),
            None => groups.push(Group::new(block.clone(), span)),
        }
    }
    groups
}
