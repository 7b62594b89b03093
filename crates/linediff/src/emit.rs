//! Unified-hunk shaping and batch emission.

use std::ops::Range;

use crate::myers::{edit_script, Op};
use crate::record::{records_equal, split_records, CompareFlags};

/// Marker emitted as the third buffer of a batch when the preceding line
/// payload is the final record of its side and lacks a trailing newline.
pub const NO_NEWLINE_MARKER: &[u8] = b"\n\\ No newline at end of file\n";

/// Comparison parameters for the diff run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffParams {
    /// Whitespace handling applied when comparing records.
    pub flags: CompareFlags,
}

/// Output-shaping configuration for the emitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmitConfig {
    /// Unchanged lines shown around each hunk.
    pub context_lines: u32,
    /// Hunks separated by at most this many extra unchanged lines coalesce.
    pub interhunk_lines: u32,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            context_lines: 3,
            interhunk_lines: 0,
        }
    }
}

/// Diffs two buffers line by line, emitting buffer batches.
///
/// Batches have arity 1 (hunk header), 2 (origin byte + line payload), or
/// 3 (origin + payload + [`NO_NEWLINE_MARKER`]). The first error returned
/// by `emit` unwinds the run immediately and becomes the return value.
pub fn diff<E, F>(
    old: &[u8],
    new: &[u8],
    params: &DiffParams,
    config: &EmitConfig,
    mut emit: F,
) -> Result<(), E>
where
    F: FnMut(&[&[u8]]) -> Result<(), E>,
{
    let old_recs = split_records(old);
    let new_recs = split_records(new);
    let flags = params.flags;
    let script = edit_script(old_recs.len(), new_recs.len(), |i, j| {
        records_equal(old_recs[i], new_recs[j], flags)
    });

    let changes: Vec<usize> = script
        .iter()
        .enumerate()
        .filter(|(_, op)| !matches!(op, Op::Equal { .. }))
        .map(|(i, _)| i)
        .collect();
    if changes.is_empty() {
        return Ok(());
    }

    let context = config.context_lines as usize;
    let max_gap = 2 * context + config.interhunk_lines as usize;
    let mut cursor = ScriptCursor::new(&script);

    let mut first = 0;
    while first < changes.len() {
        let mut last = first;
        while last + 1 < changes.len() && changes[last + 1] - changes[last] - 1 <= max_gap {
            last += 1;
        }
        let start = changes[first].saturating_sub(context);
        let end = (changes[last] + context + 1).min(script.len());
        let (old_pos, new_pos) = cursor.positions_at(start);
        emit_hunk(
            &script,
            start..end,
            old_pos,
            new_pos,
            &old_recs,
            &new_recs,
            &mut emit,
        )?;
        first = last + 1;
    }
    Ok(())
}

/// Tracks how many records each side has consumed up to a script index.
struct ScriptCursor<'a> {
    script: &'a [Op],
    index: usize,
    old_pos: usize,
    new_pos: usize,
}

impl<'a> ScriptCursor<'a> {
    fn new(script: &'a [Op]) -> Self {
        Self {
            script,
            index: 0,
            old_pos: 0,
            new_pos: 0,
        }
    }

    /// Advances to `target` (monotone) and returns the side positions there.
    fn positions_at(&mut self, target: usize) -> (usize, usize) {
        while self.index < target {
            match self.script[self.index] {
                Op::Equal { .. } => {
                    self.old_pos += 1;
                    self.new_pos += 1;
                }
                Op::Delete { .. } => self.old_pos += 1,
                Op::Insert { .. } => self.new_pos += 1,
            }
            self.index += 1;
        }
        (self.old_pos, self.new_pos)
    }
}

fn emit_hunk<E, F>(
    script: &[Op],
    range: Range<usize>,
    old_pos: usize,
    new_pos: usize,
    old_recs: &[&[u8]],
    new_recs: &[&[u8]],
    emit: &mut F,
) -> Result<(), E>
where
    F: FnMut(&[&[u8]]) -> Result<(), E>,
{
    let slice = &script[range];
    let (mut old_count, mut new_count) = (0usize, 0usize);
    for op in slice {
        match op {
            Op::Equal { .. } => {
                old_count += 1;
                new_count += 1;
            }
            Op::Delete { .. } => old_count += 1,
            Op::Insert { .. } => new_count += 1,
        }
    }
    // Unified convention: a side with no lines anchors at the record
    // before the hunk, everything else is 1-based.
    let old_start = if old_count == 0 { old_pos } else { old_pos + 1 };
    let new_start = if new_count == 0 { new_pos } else { new_pos + 1 };

    let mut header = format_header(old_start, old_count, new_start, new_count);
    header.push('\n');
    emit(&[header.as_bytes()])?;

    let mut i = 0;
    while i < slice.len() {
        if let Op::Equal { old, .. } = slice[i] {
            emit_line(b' ', old_recs[old], emit)?;
            i += 1;
        } else {
            // A run of changes: every deletion, then every insertion.
            let run = i;
            while i < slice.len() && !matches!(slice[i], Op::Equal { .. }) {
                i += 1;
            }
            for op in &slice[run..i] {
                if let Op::Delete { old } = op {
                    emit_line(b'-', old_recs[*old], emit)?;
                }
            }
            for op in &slice[run..i] {
                if let Op::Insert { new } = op {
                    emit_line(b'+', new_recs[*new], emit)?;
                }
            }
        }
    }
    Ok(())
}

fn emit_line<E, F>(origin: u8, record: &[u8], emit: &mut F) -> Result<(), E>
where
    F: FnMut(&[&[u8]]) -> Result<(), E>,
{
    let origin_buf = [origin];
    if record.ends_with(b"\n") {
        emit(&[&origin_buf, record])
    } else {
        emit(&[&origin_buf, record, NO_NEWLINE_MARKER])
    }
}

fn format_header(old_start: usize, old_count: usize, new_start: usize, new_count: usize) -> String {
    match (old_count != 1, new_count != 1) {
        (true, true) => format!("@@ -{old_start},{old_count} +{new_start},{new_count} @@"),
        (true, false) => format!("@@ -{old_start},{old_count} +{new_start} @@"),
        (false, true) => format!("@@ -{old_start} +{new_start},{new_count} @@"),
        (false, false) => format!("@@ -{old_start} +{new_start} @@"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Batches = Vec<Vec<Vec<u8>>>;

    fn collect(old: &[u8], new: &[u8], config: &EmitConfig) -> Batches {
        collect_with(old, new, &DiffParams::default(), config)
    }

    fn collect_with(
        old: &[u8],
        new: &[u8],
        params: &DiffParams,
        config: &EmitConfig,
    ) -> Batches {
        let mut batches = Batches::new();
        diff(old, new, params, config, |bufs| -> Result<(), ()> {
            batches.push(bufs.iter().map(|b| b.to_vec()).collect());
            Ok(())
        })
        .unwrap();
        batches
    }

    #[test]
    fn identical_buffers_emit_nothing() {
        assert!(collect(b"a\nb\n", b"a\nb\n", &EmitConfig::default()).is_empty());
    }

    #[test]
    fn pure_addition_against_empty_old() {
        let batches = collect(b"", b"hello\n", &EmitConfig::default());
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0], vec![b"@@ -0,0 +1 @@\n".to_vec()]);
        assert_eq!(batches[1], vec![b"+".to_vec(), b"hello\n".to_vec()]);
    }

    #[test]
    fn pure_deletion_against_empty_new() {
        let batches = collect(b"hello\n", b"", &EmitConfig::default());
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0], vec![b"@@ -1 +0,0 @@\n".to_vec()]);
        assert_eq!(batches[1], vec![b"-".to_vec(), b"hello\n".to_vec()]);
    }

    #[test]
    fn missing_trailing_newline_adds_marker_buffer() {
        let batches = collect(b"a\nb\n", b"a\nb", &EmitConfig::default());
        assert_eq!(batches[0], vec![b"@@ -1,2 +1,2 @@\n".to_vec()]);
        assert_eq!(batches[1], vec![b" ".to_vec(), b"a\n".to_vec()]);
        assert_eq!(batches[2], vec![b"-".to_vec(), b"b\n".to_vec()]);
        assert_eq!(
            batches[3],
            vec![b"+".to_vec(), b"b".to_vec(), NO_NEWLINE_MARKER.to_vec()]
        );
        assert_eq!(batches.len(), 4);
    }

    #[test]
    fn replace_runs_group_deletions_before_insertions() {
        let batches = collect(b"x\ny\n", b"p\nq\n", &EmitConfig::default());
        let origins: Vec<u8> = batches[1..].iter().map(|b| b[0][0]).collect();
        assert_eq!(origins, vec![b'-', b'-', b'+', b'+']);
    }

    #[test]
    fn distant_changes_produce_separate_hunks() {
        let old = b"a1\nc\nc\nc\nc\nc\nc\nc\nc\nb1\n";
        let new = b"a2\nc\nc\nc\nc\nc\nc\nc\nc\nb2\n";
        let batches = collect(old, new, &EmitConfig::default());
        let headers: Vec<&Vec<u8>> = batches.iter().filter(|b| b.len() == 1).map(|b| &b[0]).collect();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0], &b"@@ -1,4 +1,4 @@\n".to_vec());
        assert_eq!(headers[1], &b"@@ -7,4 +7,4 @@\n".to_vec());
    }

    #[test]
    fn interhunk_setting_coalesces_nearby_hunks() {
        let old = b"a1\nc\nc\nc\nc\nc\nc\nc\nc\nb1\n";
        let new = b"a2\nc\nc\nc\nc\nc\nc\nc\nc\nb2\n";
        let config = EmitConfig {
            context_lines: 3,
            interhunk_lines: 4,
        };
        let batches = collect(old, new, &config);
        let headers: Vec<&Vec<u8>> = batches.iter().filter(|b| b.len() == 1).map(|b| &b[0]).collect();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0], &b"@@ -1,10 +1,10 @@\n".to_vec());
    }

    #[test]
    fn zero_context_emits_only_changed_lines() {
        let config = EmitConfig {
            context_lines: 0,
            interhunk_lines: 0,
        };
        let batches = collect(b"a\nb\nc\n", b"a\nx\nc\n", &config);
        assert_eq!(batches[0], vec![b"@@ -2 +2 @@\n".to_vec()]);
        assert_eq!(batches.len(), 3);
    }

    #[test]
    fn whitespace_change_flag_suppresses_the_diff() {
        let params = DiffParams {
            flags: CompareFlags::IGNORE_WHITESPACE_CHANGE,
        };
        let batches = collect_with(b"a  b\n", b"a b\n", &params, &EmitConfig::default());
        assert!(batches.is_empty());
    }

    #[test]
    fn callback_error_stops_emission() {
        let mut seen = 0usize;
        let result = diff(
            b"a\n",
            b"b\n",
            &DiffParams::default(),
            &EmitConfig::default(),
            |_| -> Result<(), &'static str> {
                seen += 1;
                Err("stop")
            },
        );
        assert_eq!(result, Err("stop"));
        assert_eq!(seen, 1);
    }
}
