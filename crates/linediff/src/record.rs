//! Line records and whitespace-aware equality.

use bitflags::bitflags;

bitflags! {
    /// Whitespace handling applied when comparing records.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct CompareFlags: u32 {
        /// Ignore whitespace entirely when comparing lines.
        const IGNORE_WHITESPACE = 1 << 0;
        /// Treat runs of whitespace as equivalent.
        const IGNORE_WHITESPACE_CHANGE = 1 << 1;
        /// Ignore whitespace at the end of lines.
        const IGNORE_WHITESPACE_EOL = 1 << 2;
    }
}

/// Splits a buffer into line records.
///
/// Every record except possibly the last ends with `\n`; a final record
/// without one marks a file that lacks its trailing newline.
pub(crate) fn split_records(data: &[u8]) -> Vec<&[u8]> {
    let mut records = Vec::new();
    let mut start = 0;
    for (i, &byte) in data.iter().enumerate() {
        if byte == b'\n' {
            records.push(&data[start..=i]);
            start = i + 1;
        }
    }
    if start < data.len() {
        records.push(&data[start..]);
    }
    records
}

const fn is_ws(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c)
}

/// Compares two records under the given whitespace flags.
pub(crate) fn records_equal(a: &[u8], b: &[u8], flags: CompareFlags) -> bool {
    if flags.contains(CompareFlags::IGNORE_WHITESPACE) {
        return equal_ignoring_all_ws(a, b);
    }
    if flags.contains(CompareFlags::IGNORE_WHITESPACE_CHANGE) {
        return equal_collapsing_ws(a, b);
    }
    if flags.contains(CompareFlags::IGNORE_WHITESPACE_EOL) {
        return trim_trailing_ws(a) == trim_trailing_ws(b);
    }
    a == b
}

fn equal_ignoring_all_ws(a: &[u8], b: &[u8]) -> bool {
    let (mut i, mut j) = (0, 0);
    loop {
        while i < a.len() && is_ws(a[i]) {
            i += 1;
        }
        while j < b.len() && is_ws(b[j]) {
            j += 1;
        }
        match (i < a.len(), j < b.len()) {
            (true, true) if a[i] == b[j] => {
                i += 1;
                j += 1;
            }
            (false, false) => return true,
            _ => return false,
        }
    }
}

fn equal_collapsing_ws(a: &[u8], b: &[u8]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if is_ws(a[i]) && is_ws(b[j]) {
            while i < a.len() && is_ws(a[i]) {
                i += 1;
            }
            while j < b.len() && is_ws(b[j]) {
                j += 1;
            }
        } else if a[i] == b[j] {
            i += 1;
            j += 1;
        } else {
            return false;
        }
    }
    while i < a.len() && is_ws(a[i]) {
        i += 1;
    }
    while j < b.len() && is_ws(b[j]) {
        j += 1;
    }
    i == a.len() && j == b.len()
}

fn trim_trailing_ws(mut rec: &[u8]) -> &[u8] {
    while let [head @ .., last] = rec {
        if is_ws(*last) {
            rec = head;
        } else {
            break;
        }
    }
    rec
}
