use super::block::infer_layer_count;
use super::record::{is_blank, leading_int, parse_token};
use super::scanner::{CommentMarkers, skip_ahead_with};
use crate::domain::{IwfmError, ParserResult};
use std::str::FromStr;

/// Forward-only walk over an input buffer that accumulates the rewritten
/// output. Lines are either copied, dropped or replaced as the cursor passes
/// them; the input is never edited.
#[derive(Debug, Clone)]
pub struct LineCursor {
    label: String,
    lines: Vec<String>,
    pos: usize,
    out: Vec<String>,
    markers: CommentMarkers<'static>,
}

impl LineCursor {
    pub fn new(label: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            label: label.into(),
            out: Vec::with_capacity(lines.len()),
            lines,
            pos: 0,
            markers: CommentMarkers::default(),
        }
    }

    pub fn with_markers(mut self, markers: CommentMarkers<'static>) -> Self {
        self.markers = markers;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn input(&self) -> &[String] {
        &self.lines
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// True at end of input, on a comment line or on a blank line.
    pub fn at_block_end(&self) -> bool {
        match self.lines.get(self.pos) {
            None => true,
            Some(line) => self.markers.is_comment(line) || is_blank(line),
        }
    }

    /// Number of lines from the current one up to the next block end.
    pub fn block_len(&self) -> usize {
        self.lines[self.pos.min(self.lines.len())..]
            .iter()
            .take_while(|line| !self.markers.is_comment(line) && !is_blank(line))
            .count()
    }

    pub fn at_comment(&self) -> bool {
        self.lines
            .get(self.pos)
            .is_some_and(|line| self.markers.is_comment(line))
    }

    pub fn current(&self) -> ParserResult<&str> {
        self.lines
            .get(self.pos)
            .map(String::as_str)
            .ok_or_else(|| self.unexpected_end())
    }

    pub fn current_tokens(&self) -> ParserResult<Vec<&str>> {
        Ok(self.current()?.split_whitespace().collect())
    }

    pub fn current_int(&self) -> ParserResult<i64> {
        leading_int(&self.label, self.pos, self.current()?)
    }

    pub fn current_value<T: FromStr>(&self, position: usize) -> ParserResult<T> {
        parse_token(&self.label, self.pos, self.current()?, position)
    }

    /// Parse a token of an arbitrary input line, reporting errors against it.
    pub fn value_at<T: FromStr>(&self, index: usize, position: usize) -> ParserResult<T> {
        let line = self
            .lines
            .get(index)
            .ok_or_else(|| self.unexpected_end())?;
        parse_token(&self.label, index, line, position)
    }

    /// Copy through `skip` data lines and the comments after them.
    pub fn advance(&mut self, skip: usize) -> ParserResult<()> {
        let target = skip_ahead_with(self.pos, &self.lines, skip, self.markers)
            .ok_or_else(|| self.unexpected_end())?;
        self.copy_until(target);
        Ok(())
    }

    /// Like [`LineCursor::advance`], but running out of input copies the
    /// remainder and reports `false` instead of failing.
    pub fn try_advance(&mut self, skip: usize) -> bool {
        match skip_ahead_with(self.pos, &self.lines, skip, self.markers) {
            Some(target) => {
                self.copy_until(target);
                true
            }
            None => {
                self.copy_until(self.lines.len());
                false
            }
        }
    }

    /// Copy the current line and move past the data lines and comments that
    /// follow it.
    pub fn next_record(&mut self, skip: usize) -> ParserResult<()> {
        self.keep()?;
        self.advance(skip)
    }

    /// Output index the current line will occupy once copied.
    pub fn slot(&self) -> usize {
        self.out.len()
    }

    pub fn set(&mut self, slot: usize, line: impl Into<String>) -> ParserResult<()> {
        let len = self.out.len();
        let target = self.out.get_mut(slot).ok_or_else(|| {
            IwfmError::internal(
                "RUN.OUTPUT_SLOT",
                format!(
                    "{}: output slot {} has not been written (output holds {} lines)",
                    self.label, slot, len
                ),
            )
        })?;
        *target = line.into();
        Ok(())
    }

    pub fn output_line(&self, slot: usize) -> Option<&str> {
        self.out.get(slot).map(String::as_str)
    }

    pub fn keep(&mut self) -> ParserResult<()> {
        let line = self.current()?.to_string();
        self.out.push(line);
        self.pos += 1;
        Ok(())
    }

    pub fn drop_line(&mut self) -> ParserResult<()> {
        self.current()?;
        self.pos += 1;
        Ok(())
    }

    pub fn drop_lines(&mut self, count: usize) -> ParserResult<()> {
        for _ in 0..count {
            self.drop_line()?;
        }
        Ok(())
    }

    pub fn replace(&mut self, line: impl Into<String>) -> ParserResult<()> {
        self.current()?;
        self.out.push(line.into());
        self.pos += 1;
        Ok(())
    }

    /// Append a generated line without consuming input.
    pub fn emit(&mut self, line: impl Into<String>) {
        self.out.push(line.into());
    }

    pub fn skip_comments(&mut self) {
        while self.at_comment() {
            self.out.push(self.lines[self.pos].clone());
            self.pos += 1;
        }
    }

    /// Filter a block keyed by the leading integer. See [`LineCursor::filter_block_at`].
    pub fn filter_block(
        &mut self,
        extra_skip: usize,
        keep: impl Fn(i64) -> bool,
    ) -> ParserResult<usize> {
        self.filter_block_at(0, extra_skip, keep)
    }

    /// Skip `extra_skip` data lines, then drop every line of the block whose
    /// integer at `position` fails `keep`. A non-positive first key marks an
    /// empty block: that single line is copied and the block ends. Otherwise
    /// the block runs until a comment, a blank line or end of input.
    ///
    /// Returns the number of lines kept.
    pub fn filter_block_at(
        &mut self,
        position: usize,
        extra_skip: usize,
        keep: impl Fn(i64) -> bool,
    ) -> ParserResult<usize> {
        if !self.try_advance(extra_skip) || self.at_block_end() {
            return Ok(0);
        }

        if self.current_value::<i64>(position)? <= 0 {
            self.keep()?;
            return Ok(0);
        }

        let mut kept = 0;
        while !self.at_block_end() {
            let key = self.current_value::<i64>(position)?;
            if keep(key) {
                self.keep()?;
                kept += 1;
            } else {
                self.drop_line()?;
            }
        }
        Ok(kept)
    }

    /// Filter up to `limit` keyed lines, stopping early at a comment, blank
    /// line or end of input.
    pub fn filter_rows(
        &mut self,
        position: usize,
        limit: usize,
        keep: impl Fn(i64) -> bool,
    ) -> ParserResult<usize> {
        let mut kept = 0;
        for _ in 0..limit {
            if self.at_block_end() {
                break;
            }
            let key = self.current_value::<i64>(position)?;
            if keep(key) {
                self.keep()?;
                kept += 1;
            } else {
                self.drop_line()?;
            }
        }
        Ok(kept)
    }

    /// Filter a block of `ID v1 v2 ...` lines each followed by continuation
    /// lines without the ID. The group height is inferred from the first
    /// group and whole groups are kept or dropped together.
    ///
    /// Returns the number of groups kept.
    pub fn filter_layered_block(&mut self, keep: impl Fn(i64) -> bool) -> ParserResult<usize> {
        if self.at_block_end() {
            return Ok(0);
        }
        let layers = infer_layer_count(&self.lines, self.pos);
        tracing::debug!(file = %self.label, layers, "layered block");

        let mut kept = 0;
        while !self.at_block_end() {
            let key = self.current_int()?;
            let keep_group = keep(key);
            for layer in 0..layers {
                if layer > 0 && self.at_block_end() {
                    return Err(IwfmError::malformed_record(
                        "INPUT.MALFORMED_RECORD",
                        format!(
                            "{} line {}: layered group for {} ends after {} of {} lines",
                            self.label,
                            self.pos + 1,
                            key,
                            layer,
                            layers
                        ),
                    ));
                }
                if keep_group {
                    self.keep()?;
                } else {
                    self.drop_line()?;
                }
            }
            if keep_group {
                kept += 1;
            }
        }
        Ok(kept)
    }

    pub fn copy_rest(&mut self) {
        self.copy_until(self.lines.len());
    }

    /// Copy any remaining input and return the rewritten buffer.
    pub fn finish(mut self) -> Vec<String> {
        self.copy_rest();
        self.out
    }

    /// Return the rewritten buffer, discarding input not yet visited.
    pub fn into_output(self) -> Vec<String> {
        self.out
    }

    fn copy_until(&mut self, target: usize) {
        let target = target.min(self.lines.len());
        if target > self.pos {
            self.out.extend_from_slice(&self.lines[self.pos..target]);
            self.pos = target;
        }
    }

    fn unexpected_end(&self) -> IwfmError {
        IwfmError::malformed_record(
            "INPUT.UNEXPECTED_EOF",
            format!(
                "{}: unexpected end of file after line {}",
                self.label,
                self.pos.min(self.lines.len())
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::LineCursor;
    use crate::domain::IwfmErrorCategory;

    fn cursor(lines: &[&str]) -> LineCursor {
        LineCursor::new("test.dat", lines.iter().map(|line| line.to_string()).collect())
    }

    #[test]
    fn header_slot_is_rewritten_after_the_block() {
        let mut cursor = cursor(&["C head", "3   / N", "C rows", "1 a", "2 b", "3 c"]);
        cursor.advance(0).expect("header");
        let slot = cursor.slot();
        cursor.next_record(0).expect("rows");
        let kept = cursor.filter_block(0, |id| id != 2).expect("filter");
        cursor.set(slot, format!("{}   / N", kept)).expect("slot written");

        assert_eq!(
            cursor.finish(),
            vec!["C head", "2   / N", "C rows", "1 a", "3 c"]
        );
    }

    #[test]
    fn filter_block_stops_at_comment_and_blank() {
        let mut cursor = cursor(&["1", "5", "C x", "5", "", "9"]);
        assert_eq!(cursor.filter_block(0, |id| id == 1).expect("first"), 1);
        assert!(cursor.at_comment());
        cursor.advance(0).expect("comment");
        assert_eq!(cursor.filter_block(0, |_| false).expect("second"), 0);
        assert_eq!(cursor.current().expect("blank"), "");
        assert_eq!(cursor.finish(), vec!["1", "C x", "", "9"]);
    }

    #[test]
    fn block_len_counts_up_to_the_next_comment() {
        let cursor = cursor(&["1 a", "2 b", "C end", "3 c"]);
        assert_eq!(cursor.block_len(), 2);
    }

    #[test]
    fn zero_first_key_consumes_one_line() {
        let mut cursor = cursor(&["0  / none", "7 a"]);
        assert_eq!(cursor.filter_block(0, |_| false).expect("empty block"), 0);
        assert_eq!(cursor.pos(), 1);
        assert_eq!(cursor.finish(), vec!["0  / none", "7 a"]);
    }

    #[test]
    fn filter_by_second_token() {
        let mut cursor = cursor(&["1 10 x", "2 20 y", "3 30 z"]);
        let kept = cursor.filter_block_at(1, 0, |elem| elem >= 20).expect("filter");
        assert_eq!(kept, 2);
        assert_eq!(cursor.finish(), vec!["2 20 y", "3 30 z"]);
    }

    #[test]
    fn layered_groups_are_kept_whole() {
        let mut cursor = cursor(&[
            "1 1.0 2.0 3.0 4.0 5.0",
            "  1.1 2.1 3.1 4.1 5.1",
            "2 1.0 2.0 3.0 4.0 5.0",
            "  1.1 2.1 3.1 4.1 5.1",
            "C anomaly",
        ]);
        assert_eq!(cursor.filter_layered_block(|id| id == 2).expect("groups"), 1);
        assert_eq!(
            cursor.finish(),
            vec!["2 1.0 2.0 3.0 4.0 5.0", "  1.1 2.1 3.1 4.1 5.1", "C anomaly"]
        );
    }

    #[test]
    fn layered_group_cut_short_at_end_of_file_is_malformed() {
        let mut cursor = cursor(&[
            "1 1.0 2.0 3.0 4.0 5.0",
            "  1.1 2.1 3.1 4.1 5.1",
            "2 1.0 2.0 3.0 4.0 5.0",
        ]);
        let error = cursor
            .filter_layered_block(|_| true)
            .expect_err("second group is missing a layer");
        assert_eq!(error.category(), IwfmErrorCategory::MalformedRecord);
        assert!(error.message().contains("line 4"));
        assert!(error.message().contains("layered group for 2 ends after 1 of 2 lines"));
    }

    #[test]
    fn advancing_past_the_end_is_malformed() {
        let mut cursor = cursor(&["1", "C"]);
        let error = cursor.advance(3).expect_err("not enough data lines");
        assert_eq!(error.category(), IwfmErrorCategory::MalformedRecord);
        assert_eq!(error.placeholder(), "INPUT.UNEXPECTED_EOF");
    }

    #[test]
    fn unwritten_slot_is_internal_error() {
        let mut cursor = cursor(&["1"]);
        let error = cursor.set(4, "x").expect_err("slot beyond output");
        assert_eq!(error.category(), IwfmErrorCategory::Internal);
    }
}
