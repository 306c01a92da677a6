use crate::layout::StudyBlock;
use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone};
use std::fs;
use std::path::Path;

/// Read a JSON array of study blocks from `path`.
pub fn load_blocks(path: &Path) -> Result<Vec<StudyBlock>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read blocks file: {}", path.display()))?;

    let blocks = parse_blocks(&content)
        .with_context(|| format!("Failed to parse blocks file: {}", path.display()))?;

    tracing::debug!(count = blocks.len(), path = %path.display(), "loaded study blocks");
    Ok(blocks)
}

/// Parse a JSON array of study blocks.
pub fn parse_blocks(json: &str) -> Result<Vec<StudyBlock>> {
    let blocks: Vec<StudyBlock> =
        serde_json::from_str(json).context("Invalid study block JSON")?;
    Ok(blocks)
}

/// Blocks whose start falls on `day` in the time zone `tz`, in input order.
pub fn blocks_for_day<Tz: TimeZone>(blocks: &[StudyBlock], day: NaiveDate, tz: &Tz) -> Vec<StudyBlock> {
    blocks
        .iter()
        .filter(|block| block.start_time.with_timezone(tz).date_naive() == day)
        .cloned()
        .collect()
}
