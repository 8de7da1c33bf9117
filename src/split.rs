//! Side-by-side reconciliation of parsed diff lines.
//!
//! Deletions from one change block go to the left column, additions to the
//! right, padded with synthetic blanks so both columns stay the same length
//! and a changed region reads as aligned rows.

use crate::diff::DiffLine;

/// Two equal-length columns derived from one parsed line sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDiff {
    pub left: Vec<DiffLine>,
    pub right: Vec<DiffLine>,
}

/// Regroup parsed lines into aligned left/right columns.
///
/// Deletions and additions buffer up until the change block closes (a header
/// or context line, a deletion arriving after buffered additions, or end of
/// input) and are then paired index-wise, the shorter side padded with
/// blanks. Blanks carry unique negative ids so identity-keyed consumers
/// never confuse them with parsed lines.
#[must_use]
pub fn split_columns(lines: &[DiffLine]) -> SplitDiff {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut pending_deletions: Vec<DiffLine> = Vec::new();
    let mut pending_additions: Vec<DiffLine> = Vec::new();
    let mut next_blank_id: i64 = -1;

    for line in lines {
        match line {
            DiffLine::Header { .. } | DiffLine::Context { .. } => {
                flush(
                    &mut pending_deletions,
                    &mut pending_additions,
                    &mut left,
                    &mut right,
                    &mut next_blank_id,
                );
                left.push(line.clone());
                right.push(line.clone());
            }
            DiffLine::Deletion { .. } => {
                // A deletion after buffered additions starts a new change
                // block; flushing first keeps unrelated add/remove runs
                // from merging into one region.
                if !pending_additions.is_empty() {
                    flush(
                        &mut pending_deletions,
                        &mut pending_additions,
                        &mut left,
                        &mut right,
                        &mut next_blank_id,
                    );
                }
                pending_deletions.push(line.clone());
            }
            DiffLine::Addition { .. } => {
                pending_additions.push(line.clone());
            }
        }
    }

    flush(
        &mut pending_deletions,
        &mut pending_additions,
        &mut left,
        &mut right,
        &mut next_blank_id,
    );

    SplitDiff { left, right }
}

/// Drain the pending buffers into the columns, padding the shorter side.
fn flush(
    deletions: &mut Vec<DiffLine>,
    additions: &mut Vec<DiffLine>,
    left: &mut Vec<DiffLine>,
    right: &mut Vec<DiffLine>,
    next_blank_id: &mut i64,
) {
    let rows = deletions.len().max(additions.len());
    for row in 0..rows {
        left.push(
            deletions
                .get(row)
                .cloned()
                .unwrap_or_else(|| blank(next_blank_id)),
        );
        right.push(
            additions
                .get(row)
                .cloned()
                .unwrap_or_else(|| blank(next_blank_id)),
        );
    }
    deletions.clear();
    additions.clear();
}

fn blank(next_id: &mut i64) -> DiffLine {
    let id = *next_id;
    *next_id -= 1;
    DiffLine::Context {
        id,
        text: String::new(),
        old_line: None,
        new_line: None,
    }
}

/// Format the columns as two text panes separated by `|`.
///
/// The old side shows old line numbers, the new side new ones; headers
/// repeat on both sides and blanks render as empty cells. Rows are
/// right-trimmed and the result carries no trailing newline.
pub fn format_split_output(diff: &SplitDiff) -> String {
    let left_cells: Vec<String> = diff.left.iter().map(|line| cell(line, true)).collect();
    let right_cells: Vec<String> = diff.right.iter().map(|line| cell(line, false)).collect();
    // Pad in chars, the same unit the format width counts.
    let width = left_cells
        .iter()
        .map(|text| text.chars().count())
        .max()
        .unwrap_or(0);

    left_cells
        .iter()
        .zip(&right_cells)
        .map(|(left, right)| format!("{left:<width$} | {right}").trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One formatted cell; `old_side` selects which line number to show.
fn cell(line: &DiffLine, old_side: bool) -> String {
    let marker = match line {
        DiffLine::Header { text, .. } => return text.clone(),
        DiffLine::Addition { .. } => '+',
        DiffLine::Deletion { .. } => '-',
        DiffLine::Context { .. } => ' ',
    };
    let number = if old_side {
        line.old_line()
    } else {
        line.new_line()
    };
    let number = number.map(|n| n.to_string()).unwrap_or_default();
    format!("{:>4} {} {}", number, marker, line.text())
        .trim_end()
        .to_string()
}
