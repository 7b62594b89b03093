//! Hunk coordinates, line origins, and the hunk-header text format.

use crate::error::{DiffResult, Error};

/// Coordinates of one hunk: start line and line count on each side.
///
/// Starts are 1-based; a side with zero lines anchors at the line before
/// the hunk, which is how `@@ -0,0 +1 @@` arises for a pure addition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct HunkRange {
    /// First old line covered by the hunk.
    pub old_start: u32,
    /// Number of old lines covered.
    pub old_lines: u32,
    /// First new line covered by the hunk.
    pub new_start: u32,
    /// Number of new lines covered.
    pub new_lines: u32,
}

/// Classification of one emitted diff line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineOrigin {
    /// Unchanged context line.
    Context,
    /// Line present only on the new side.
    Addition,
    /// Line present only on the old side.
    Deletion,
    /// Both sides end without a newline on a shared final line.
    ContextEofnl,
    /// The old side lacked a trailing newline the new side has.
    AddEofnl,
    /// The new side lacks a trailing newline the old side had.
    DelEofnl,
    /// File header text (used by patch formatters).
    FileHeader,
    /// Hunk header text (used by patch formatters).
    HunkHeader,
    /// Binary-content notice (used by patch formatters).
    Binary,
}

impl LineOrigin {
    /// Single-character rendering used in patch output.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Context => ' ',
            Self::Addition => '+',
            Self::Deletion => '-',
            Self::ContextEofnl => '=',
            Self::AddEofnl => '>',
            Self::DelEofnl => '<',
            Self::FileHeader => 'F',
            Self::HunkHeader => 'H',
            Self::Binary => 'B',
        }
    }
}

/// Parses a `@@ -a[,b] +c[,d] @@` header into a [`HunkRange`].
///
/// Line counts default to 1 when their comma part is missing. Text after
/// the closing `@@` is ignored.
pub fn parse_hunk_header(header: &[u8]) -> DiffResult<HunkRange> {
    let malformed = || Error::MalformedHeader(String::from_utf8_lossy(header).into_owned());

    if header.first() != Some(&b'@') {
        return Err(malformed());
    }
    let mut rest = header;
    let old_start = read_next_int(&mut rest).ok_or_else(malformed)?;
    let old_lines = if rest.first() == Some(&b',') {
        read_next_int(&mut rest).ok_or_else(malformed)?
    } else {
        1
    };
    let new_start = read_next_int(&mut rest).ok_or_else(malformed)?;
    let new_lines = if rest.first() == Some(&b',') {
        read_next_int(&mut rest).ok_or_else(malformed)?
    } else {
        1
    };

    Ok(HunkRange {
        old_start,
        old_lines,
        new_start,
        new_lines,
    })
}

/// Scans forward to the next integer, consuming it from the cursor.
fn read_next_int(cursor: &mut &[u8]) -> Option<u32> {
    let start = cursor.iter().position(u8::is_ascii_digit)?;
    let mut value: u32 = 0;
    let mut end = start;
    while end < cursor.len() && cursor[end].is_ascii_digit() {
        value = value
            .checked_mul(10)?
            .checked_add(u32::from(cursor[end] - b'0'))?;
        end += 1;
    }
    *cursor = &cursor[end..];
    Some(value)
}

/// Formats a range into one of the four canonical header forms, without
/// the trailing newline. A line count of 1 omits its comma part.
#[must_use]
pub fn format_hunk_header(range: &HunkRange) -> String {
    let HunkRange {
        old_start,
        old_lines,
        new_start,
        new_lines,
    } = *range;
    match (old_lines != 1, new_lines != 1) {
        (true, true) => format!("@@ -{old_start},{old_lines} +{new_start},{new_lines} @@"),
        (true, false) => format!("@@ -{old_start},{old_lines} +{new_start} @@"),
        (false, true) => format!("@@ -{old_start} +{new_start},{new_lines} @@"),
        (false, false) => format!("@@ -{old_start} +{new_start} @@"),
    }
}
