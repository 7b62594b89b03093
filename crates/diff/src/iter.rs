//! The pull iterator: hunks and lines cached per file, stepped on demand.

use std::cell::RefCell;

use crate::delta::{should_skip, Delta, DeltaList};
use crate::error::{DiffResult, Error};
use crate::hunk::{format_hunk_header, HunkRange, LineOrigin};
use crate::processor::DeltaProcessor;
use crate::repo::Repository;

/// One recorded hunk: its range and the slice of the line arena it owns.
#[derive(Clone, Copy, Debug)]
struct HunkRecord {
    range: HunkRange,
    line_first: usize,
    line_count: usize,
}

/// Where a recorded line's bytes live.
///
/// Line events borrow from the loaded sides, so the arena stores spans
/// that resolve against them on access; only the end-of-file-newline
/// marker, which points into neither side, is copied inline.
#[derive(Debug)]
enum LineSpan {
    Old { offset: usize, len: usize },
    New { offset: usize, len: usize },
    Inline(Box<[u8]>),
}

impl LineSpan {
    fn bytes<'s>(&'s self, old: &'s [u8], new: &'s [u8]) -> &'s [u8] {
        match *self {
            Self::Old { offset, len } => &old[offset..offset + len],
            Self::New { offset, len } => &new[offset..offset + len],
            Self::Inline(ref bytes) => bytes,
        }
    }
}

#[derive(Debug)]
struct LineRecord {
    origin: LineOrigin,
    span: LineSpan,
}

/// Pull-style access to a delta list's diffs.
///
/// `next_file` advances across deltas (skipping the ones the options
/// exclude); the hunk and line accessors run the diff for the current file
/// once, record the results into per-file arenas, and step through them in
/// O(1) without re-diffing. Exhaustion at every level is signalled with
/// the [`Error::IterOver`] sentinel.
pub struct DeltaIter<'a> {
    list: &'a mut DeltaList,
    processor: DeltaProcessor<'a>,
    file_index: usize,
    next_index: usize,
    current: Option<usize>,
    hunks: Vec<HunkRecord>,
    lines: Vec<LineRecord>,
    hunk_cursor: usize,
    line_cursor: usize,
    header: String,
}

impl<'a> DeltaIter<'a> {
    /// Creates an iterator over the list; call [`DeltaIter::next_file`] to
    /// reach the first delta.
    #[must_use]
    pub fn new(repo: &'a Repository, list: &'a mut DeltaList) -> Self {
        let processor = DeltaProcessor::new(
            Some(repo),
            *list.options(),
            list.old_source(),
            list.new_source(),
        );
        Self {
            list,
            processor,
            file_index: 0,
            next_index: 0,
            current: None,
            hunks: Vec::new(),
            lines: Vec::new(),
            hunk_cursor: 0,
            line_cursor: 0,
            header: String::new(),
        }
    }

    /// Fraction of files stepped past, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        let total = self.list.len();
        if total == 0 {
            return 1.0;
        }
        self.next_index as f32 / total as f32
    }

    /// Total number of deltas in the list, including skippable ones.
    #[must_use]
    pub fn max_files(&self) -> usize {
        self.list.len()
    }

    /// Unloads the current file and advances to the next traversable
    /// delta, prepping it. Ambiguous deltas are resolved by loading before
    /// the skip decision. Returns [`Error::IterOver`] when exhausted.
    pub fn next_file(&mut self) -> DiffResult<&Delta> {
        self.file_index = self.next_index;
        self.unload_current();

        loop {
            if self.file_index >= self.list.len() {
                self.current = None;
                return Err(Error::IterOver);
            }
            let delta = &mut self.list.deltas_mut()[self.file_index];
            if delta.is_ambiguous() {
                if let Err(err) = self.processor.load(delta) {
                    self.processor.unload();
                    return Err(err);
                }
            }
            if !should_skip(self.processor.options(), delta) {
                break;
            }
            self.processor.unload();
            self.file_index += 1;
        }

        self.current = Some(self.file_index);
        self.next_index = self.file_index + 1;
        let delta = &mut self.list.deltas_mut()[self.file_index];
        self.processor.prep(delta);
        Ok(&self.list.deltas()[self.file_index])
    }

    /// Number of hunks in the current file, diffing it if necessary.
    pub fn num_hunks_in_file(&mut self) -> DiffResult<usize> {
        self.ensure_diffed()?;
        Ok(self.hunks.len())
    }

    /// Number of lines in the hunk the cursor stands on, or zero past the
    /// last hunk.
    pub fn num_lines_in_hunk(&mut self) -> DiffResult<usize> {
        self.ensure_diffed()?;
        Ok(self
            .hunks
            .get(self.hunk_cursor)
            .map_or(0, |hunk| hunk.line_count))
    }

    /// Consumes the current hunk: returns its range and formatted header
    /// (canonical form plus a trailing newline), advances the hunk cursor,
    /// and resets the line cursor to the new hunk's first line.
    pub fn next_hunk(&mut self) -> DiffResult<(HunkRange, &[u8])> {
        self.ensure_diffed()?;
        let Some(hunk) = self.hunks.get(self.hunk_cursor) else {
            self.line_cursor = self.lines.len();
            return Err(Error::IterOver);
        };
        let (range, line_first) = (hunk.range, hunk.line_first);
        self.hunk_cursor += 1;
        self.line_cursor = line_first;

        self.header.clear();
        self.header.push_str(&format_hunk_header(&range));
        self.header.push('\n');
        Ok((range, self.header.as_bytes()))
    }

    /// Returns the current line and advances. Stepping continues across
    /// hunk boundaries until the file's lines are exhausted; before the
    /// first `next_hunk` call the iterator advances to the first hunk
    /// implicitly.
    pub fn next_line(&mut self) -> DiffResult<(LineOrigin, &[u8])> {
        self.ensure_diffed()?;
        if self.hunk_cursor == 0 {
            self.next_hunk()?;
        }
        let index = self.line_cursor;
        if index >= self.lines.len() {
            return Err(Error::IterOver);
        }
        self.line_cursor = index + 1;
        let record = &self.lines[index];
        let content = record
            .span
            .bytes(self.processor.old_bytes(), self.processor.new_bytes());
        Ok((record.origin, content))
    }

    /// Runs the diff for the current file once, capturing hunks and lines
    /// into the arenas.
    fn ensure_diffed(&mut self) -> DiffResult<()> {
        let Some(index) = self.current else {
            return Ok(());
        };
        if self.processor.is_diffed() {
            return Ok(());
        }

        let delta = &mut self.list.deltas_mut()[index];
        self.processor.load(delta)?;
        let old_base = base_of(self.processor.old_bytes());
        let new_base = base_of(self.processor.new_bytes());

        let capture = RefCell::new(Capture {
            hunks: &mut self.hunks,
            lines: &mut self.lines,
            old_base,
            new_base,
            error: None,
        });
        let mut on_hunk = |_: &Delta, range: &HunkRange, _: &[u8]| -> bool {
            capture.borrow_mut().record_hunk(range)
        };
        let mut on_line = |_: &Delta, _: &HunkRange, origin: LineOrigin, content: &[u8]| -> bool {
            capture.borrow_mut().record_line(origin, content)
        };
        let outcome = self
            .processor
            .exec(delta, Some(&mut on_hunk), Some(&mut on_line));

        let arena_error = capture.borrow_mut().error.take();
        match outcome {
            Err(Error::UserAbort) => Err(arena_error.unwrap_or(Error::UserAbort)),
            other => other,
        }
    }

    fn unload_current(&mut self) {
        self.processor.unload();
        self.hunks.clear();
        self.lines.clear();
        self.hunk_cursor = 0;
        self.line_cursor = 0;
        self.current = None;
    }
}

impl Drop for DeltaIter<'_> {
    fn drop(&mut self) {
        self.unload_current();
    }
}

struct Capture<'s> {
    hunks: &'s mut Vec<HunkRecord>,
    lines: &'s mut Vec<LineRecord>,
    old_base: (usize, usize),
    new_base: (usize, usize),
    error: Option<Error>,
}

impl Capture<'_> {
    fn record_hunk(&mut self, range: &HunkRange) -> bool {
        if self.hunks.try_reserve(1).is_err() {
            self.error = Some(Error::ResourceExhaustion);
            return false;
        }
        self.hunks.push(HunkRecord {
            range: *range,
            line_first: self.lines.len(),
            line_count: 0,
        });
        true
    }

    fn record_line(&mut self, origin: LineOrigin, content: &[u8]) -> bool {
        if self.lines.try_reserve(1).is_err() {
            self.error = Some(Error::ResourceExhaustion);
            return false;
        }
        self.lines.push(LineRecord {
            origin,
            span: span_for(content, self.old_base, self.new_base),
        });
        if let Some(hunk) = self.hunks.last_mut() {
            hunk.line_count += 1;
        }
        true
    }
}

fn base_of(bytes: &[u8]) -> (usize, usize) {
    (bytes.as_ptr() as usize, bytes.len())
}

fn span_for(content: &[u8], old: (usize, usize), new: (usize, usize)) -> LineSpan {
    let addr = content.as_ptr() as usize;
    let len = content.len();
    if len == 0 {
        return LineSpan::Inline(Box::default());
    }
    if addr >= old.0 && addr + len <= old.0 + old.1 {
        return LineSpan::Old {
            offset: addr - old.0,
            len,
        };
    }
    if addr >= new.0 && addr + len <= new.0 + new.1 {
        return LineSpan::New {
            offset: addr - new.0,
            len,
        };
    }
    LineSpan::Inline(content.into())
}
