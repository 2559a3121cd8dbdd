//! Mapping a template onto a document's text.
//!
//! The template content and the document text are diffed line by line with
//! `similar` (Myers). Whole lines, newline included, are the comparison
//! tokens; a single trailing `\n` is ignored when comparing, so a last line
//! that only differs by its final newline still counts as unchanged.
//!
//! The diff runs under a time budget. A document that has drifted far from
//! its template gets a less minimal (but still valid) diff instead of
//! stalling every other event while Myers searches.
//!
//! The hunks are then walked with a cursor over the document's offsets: lines
//! only in the document move the cursor, lines only in the template are
//! skipped, and common lines become [`OffsetRange`]s.

use std::time::{Duration, Instant};

use similar::{Algorithm, DiffTag};

use crate::types::{OffsetRange, Template};

/// Time allowed for one line diff before it settles for a coarser result.
pub const DIFF_TIME_BUDGET: Duration = Duration::from_millis(50);

/// Which side(s) of the diff a hunk belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunkKind {
    /// Present only in the document.
    Added,
    /// Present only in the template.
    Removed,
    /// Present in both, unchanged.
    Common,
}

/// A run of whole lines sharing one [`HunkKind`].
///
/// `text` borrows from the document for [`HunkKind::Added`] and
/// [`HunkKind::Common`] hunks and from the template for
/// [`HunkKind::Removed`] hunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineHunk<'a> {
    pub kind: HunkKind,
    pub text: &'a str,
}

/// Line-tokenized text: comparison keys plus the byte offset of every line.
struct Lines<'a> {
    text: &'a str,
    keys: Vec<&'a str>,
    /// `starts[i]` is the first byte of line `i`; the last entry is `text.len()`.
    starts: Vec<usize>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        let mut keys = Vec::new();
        let mut starts = vec![0];
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            keys.push(line.strip_suffix('\n').unwrap_or(line));
            offset += line.len();
            starts.push(offset);
        }
        Self { text, keys, starts }
    }

    fn slice(&self, lines: std::ops::Range<usize>) -> &'a str {
        &self.text[self.starts[lines.start]..self.starts[lines.end]]
    }
}

/// Diff `before` against `after` at line granularity.
///
/// Hunks come back in order; a changed block yields its removed hunk before
/// its added hunk. Two empty inputs produce no hunks.
pub fn diff_lines<'a>(before: &'a str, after: &'a str) -> Vec<LineHunk<'a>> {
    let old = Lines::new(before);
    let new = Lines::new(after);

    let mut hunks = Vec::new();
    let deadline = Instant::now() + DIFF_TIME_BUDGET;
    for op in
        similar::capture_diff_slices_deadline(Algorithm::Myers, &old.keys, &new.keys, Some(deadline))
    {
        let (tag, old_lines, new_lines) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => hunks.push(LineHunk {
                kind: HunkKind::Common,
                text: new.slice(new_lines),
            }),
            DiffTag::Delete => hunks.push(LineHunk {
                kind: HunkKind::Removed,
                text: old.slice(old_lines),
            }),
            DiffTag::Insert => hunks.push(LineHunk {
                kind: HunkKind::Added,
                text: new.slice(new_lines),
            }),
            DiffTag::Replace => {
                hunks.push(LineHunk {
                    kind: HunkKind::Removed,
                    text: old.slice(old_lines),
                });
                hunks.push(LineHunk {
                    kind: HunkKind::Added,
                    text: new.slice(new_lines),
                });
            }
        }
    }
    hunks
}

/// Compute the spans of `document` that are unchanged template content.
///
/// Every common hunk becomes one range, so the result is ascending and
/// non-overlapping, every range is non-empty and lies within `document`, and
/// the function is pure in its two inputs. Ranges separated only by removed
/// template lines touch but are not merged.
///
/// # Example
///
/// ```rust
/// use template_overlay_core::{OffsetRange, Template, compute_template_ranges};
///
/// let template = Template::new("t", "A\nB\nC\n");
/// assert_eq!(
///     compute_template_ranges(&template, "A\nX\nC\n"),
///     vec![OffsetRange::new(0, 2), OffsetRange::new(4, 6)],
/// );
/// ```
pub fn compute_template_ranges(template: &Template, document: &str) -> Vec<OffsetRange> {
    let mut ranges: Vec<OffsetRange> = Vec::new();
    let mut cursor = 0;

    for hunk in diff_lines(&template.content, document) {
        match hunk.kind {
            HunkKind::Added => cursor += hunk.text.len(),
            HunkKind::Removed => {}
            HunkKind::Common => {
                let end = cursor + hunk.text.len();
                ranges.push(OffsetRange::new(cursor, end));
                cursor = end;
            }
        }
    }

    ranges
}
