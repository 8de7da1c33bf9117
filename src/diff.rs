use nom::character::complete::{char, u32};
use nom::combinator::opt;
use nom::sequence::preceded;
use nom::{IResult, Parser};

/// A single classified line from a unified diff.
///
/// `id` is a stable identity assigned in parse order; it increments once per
/// input line, so ids survive metadata lines being dropped (they are stable
/// but not necessarily contiguous). Synthetic blanks produced during
/// reconciliation use negative ids and never collide with parsed lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Hunk range header, raw text preserved
    Header { id: i64, text: String },
    /// Added line with its line number in the new file
    Addition { id: i64, text: String, new_line: u32 },
    /// Removed line with its line number in the old file
    Deletion { id: i64, text: String, old_line: u32 },
    /// Unchanged line; numbers are absent for pass-through text that was
    /// never part of a hunk body
    Context {
        id: i64,
        text: String,
        old_line: Option<u32>,
        new_line: Option<u32>,
    },
}

impl DiffLine {
    pub fn id(&self) -> i64 {
        match self {
            DiffLine::Header { id, .. }
            | DiffLine::Addition { id, .. }
            | DiffLine::Deletion { id, .. }
            | DiffLine::Context { id, .. } => *id,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            DiffLine::Header { text, .. }
            | DiffLine::Addition { text, .. }
            | DiffLine::Deletion { text, .. }
            | DiffLine::Context { text, .. } => text,
        }
    }

    /// Line number in the old file, when this line existed there.
    pub fn old_line(&self) -> Option<u32> {
        match self {
            DiffLine::Deletion { old_line, .. } => Some(*old_line),
            DiffLine::Context { old_line, .. } => *old_line,
            DiffLine::Header { .. } | DiffLine::Addition { .. } => None,
        }
    }

    /// Line number in the new file, when this line exists there.
    pub fn new_line(&self) -> Option<u32> {
        match self {
            DiffLine::Addition { new_line, .. } => Some(*new_line),
            DiffLine::Context { new_line, .. } => *new_line,
            DiffLine::Header { .. } | DiffLine::Deletion { .. } => None,
        }
    }

    /// Synthetic alignment blank inserted by the reconciler.
    pub fn is_blank(&self) -> bool {
        self.id() < 0
    }
}

/// Parsed diff with a best-effort display filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Filename from the `+++` header, empty when none was found
    pub file_name: String,
    pub lines: Vec<DiffLine>,
}

/// Parse unified diff text into classified lines.
///
/// One forward pass; hunk headers reseed the old/new line counters, body
/// lines consume and advance them. Metadata lines (`diff `, `index `, `---`,
/// `+++`) are dropped. Never fails: malformed headers seed counters with 0,
/// counters saturate at the top of their range instead of overflowing, and
/// unrecognized text falls through as context with no line numbers, so
/// arbitrary input degrades to a defined (if unhelpful) classification.
#[must_use]
pub fn parse_diff(text: &str) -> FileDiff {
    let mut lines = Vec::new();
    let mut old_counter = 0u32;
    let mut new_counter = 0u32;

    for (index, raw) in text.lines().enumerate() {
        let id = index as i64;

        if raw.starts_with("@@") {
            if let Some((old_start, new_start)) = seed_counters(raw) {
                old_counter = old_start;
                new_counter = new_start;
            }
            lines.push(DiffLine::Header {
                id,
                text: raw.to_string(),
            });
        } else if let Some(content) = raw.strip_prefix('+') {
            if raw.starts_with("+++") {
                continue;
            }
            lines.push(DiffLine::Addition {
                id,
                text: content.to_string(),
                new_line: new_counter,
            });
            new_counter = new_counter.saturating_add(1);
        } else if let Some(content) = raw.strip_prefix('-') {
            if raw.starts_with("---") {
                continue;
            }
            lines.push(DiffLine::Deletion {
                id,
                text: content.to_string(),
                old_line: old_counter,
            });
            old_counter = old_counter.saturating_add(1);
        } else if let Some(content) = raw.strip_prefix(' ') {
            lines.push(DiffLine::Context {
                id,
                text: content.to_string(),
                old_line: Some(old_counter),
                new_line: Some(new_counter),
            });
            old_counter = old_counter.saturating_add(1);
            new_counter = new_counter.saturating_add(1);
        } else if !raw.starts_with("diff ") && !raw.starts_with("index ") {
            // Pass-through for anything unrecognized, e.g. "\ No newline at
            // end of file" notices or plain non-diff text.
            lines.push(DiffLine::Context {
                id,
                text: raw.to_string(),
                old_line: None,
                new_line: None,
            });
        }
    }

    FileDiff {
        file_name: scan_file_name(text),
        lines,
    }
}

/// Counter seeds from a hunk header like `@@ -136,0 +137 @@ context`.
///
/// Returns `None` when fewer than two tokens follow `@@`, leaving the
/// counters untouched; unparsable tokens seed 0.
fn seed_counters(header: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = header.split(' ').collect();
    if parts.len() < 3 {
        return None;
    }
    Some((range_start(parts[1], '-'), range_start(parts[2], '+')))
}

/// Start of a range token like `-136,0` or `+137`, defaulting to 0.
fn range_start(token: &str, sign: char) -> u32 {
    let parsed: IResult<&str, u32> = preceded(opt(char(sign)), u32).parse(token);
    parsed.map(|(_, start)| start).unwrap_or(0)
}

/// Display filename from a `+++ b/path` or `+++ path` header, checking only
/// the first few input lines. First match wins; no match yields "".
fn scan_file_name(text: &str) -> String {
    for line in text.lines().take(5) {
        if let Some(name) = line.strip_prefix("+++ b/") {
            return name.to_string();
        }
        if let Some(name) = line.strip_prefix("+++ ") {
            return name.to_string();
        }
    }
    String::new()
}

/// Format parsed lines as an annotated listing with an old/new line number
/// gutter.
///
/// ```text
/// flake.nix:
/// @@ -136,0 +137 @@
///       137 +       debug = true;
/// ```
///
/// Rows are right-trimmed and the result carries no trailing newline; empty
/// input renders as the empty string.
pub fn format_diff_output(diff: &FileDiff) -> String {
    let mut rows = Vec::new();

    if !diff.file_name.is_empty() {
        rows.push(format!("{}:", diff.file_name));
    }

    for line in &diff.lines {
        let row = match line {
            DiffLine::Header { text, .. } => text.clone(),
            DiffLine::Addition { text, new_line, .. } => {
                format!("{:>4} {:>4} + {}", "", new_line, text)
            }
            DiffLine::Deletion { text, old_line, .. } => {
                format!("{:>4} {:>4} - {}", old_line, "", text)
            }
            DiffLine::Context {
                text,
                old_line,
                new_line,
                ..
            } => format!(
                "{:>4} {:>4}   {}",
                gutter(*old_line),
                gutter(*new_line),
                text
            ),
        };
        rows.push(row.trim_end().to_string());
    }

    rows.join("\n")
}

fn gutter(number: Option<u32>) -> String {
    number.map(|n| n.to_string()).unwrap_or_default()
}
