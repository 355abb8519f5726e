//! Cursor movement over an in-memory line buffer.
//!
//! IWFM input files interleave comment lines with positional data lines. The
//! scanner skips a requested number of data lines and then every comment that
//! immediately follows, so the returned cursor always sits on the next data
//! line to interpret (or past the end of the buffer).

use crate::domain::{IwfmError, IwfmResult};

pub const DEFAULT_COMMENT_MARKERS: [char; 4] = ['C', 'c', '*', '#'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentMarkers<'a> {
    markers: &'a [char],
}

impl Default for CommentMarkers<'static> {
    fn default() -> Self {
        Self {
            markers: &DEFAULT_COMMENT_MARKERS,
        }
    }
}

impl<'a> CommentMarkers<'a> {
    pub const fn new(markers: &'a [char]) -> Self {
        Self { markers }
    }

    /// Non-empty line whose first character is a marker. Empty lines are data.
    pub fn is_comment(&self, line: &str) -> bool {
        line.chars()
            .next()
            .is_some_and(|first| self.markers.contains(&first))
    }
}

pub fn is_comment(line: &str) -> bool {
    CommentMarkers::default().is_comment(line)
}

/// Skip `skip` data lines starting at `cursor`, then any comments that follow.
///
/// Returns `None` when the buffer runs out in either phase.
pub fn skip_ahead<S: AsRef<str>>(cursor: usize, lines: &[S], skip: usize) -> Option<usize> {
    skip_ahead_with(cursor, lines, skip, CommentMarkers::default())
}

pub fn skip_ahead_with<S: AsRef<str>>(
    cursor: usize,
    lines: &[S],
    skip: usize,
    markers: CommentMarkers<'_>,
) -> Option<usize> {
    let mut index = cursor;
    let mut remaining = skip;

    while remaining > 0 {
        let line = lines.get(index)?;
        if !markers.is_comment(line.as_ref()) {
            remaining -= 1;
        }
        index += 1;
    }

    while markers.is_comment(lines.get(index)?.as_ref()) {
        index += 1;
    }

    Some(index)
}

/// Checked entry point for cursor and skip values that arrive as signed
/// integers, typically counts read from an input file.
pub fn try_skip_ahead<S: AsRef<str>>(
    cursor: i64,
    lines: &[S],
    skip: i64,
) -> IwfmResult<Option<usize>> {
    let cursor = usize::try_from(cursor).map_err(|_| {
        IwfmError::invalid_argument(
            "INPUT.SCANNER_CURSOR",
            format!("scanner cursor must be non-negative, got {}", cursor),
        )
    })?;
    let skip = usize::try_from(skip).map_err(|_| {
        IwfmError::invalid_argument(
            "INPUT.SCANNER_SKIP",
            format!("scanner skip count must be non-negative, got {}", skip),
        )
    })?;
    Ok(skip_ahead(cursor, lines, skip))
}
