//! Token access and line formatting shared by every rewriter.

use crate::domain::{IwfmError, ParserResult};
use std::fmt::Display;
use std::str::FromStr;

/// Column where blanked file references put their `/`.
const BLANK_REFERENCE_COLUMN: usize = 41;

pub fn tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Parse the whitespace token at `position`, naming the file and line on failure.
pub fn parse_token<T: FromStr>(
    label: &str,
    index: usize,
    line: &str,
    position: usize,
) -> ParserResult<T> {
    let token = line.split_whitespace().nth(position).ok_or_else(|| {
        IwfmError::malformed_line(
            label,
            index,
            line,
            &format!("expected at least {} values", position + 1),
        )
    })?;
    token.parse::<T>().map_err(|_| {
        IwfmError::malformed_line(
            label,
            index,
            line,
            &format!("value {} ('{}') is not a valid number", position + 1, token),
        )
    })
}

pub fn leading_int(label: &str, index: usize, line: &str) -> ParserResult<i64> {
    parse_token(label, index, line, 0)
}

/// Replace the leading value of a `<value>   / TAG` line. The description
/// keeps its column when the new value fits in the old field.
pub fn count_header(line: &str, value: impl Display) -> String {
    let value = value.to_string();
    let start = line.len() - line.trim_start().len();
    let field_end = line[start..]
        .find(char::is_whitespace)
        .map_or(line.len(), |offset| start + offset);
    let rest = &line[field_end..];
    let old_width = field_end - start;

    let mut rewritten = String::with_capacity(line.len() + value.len());
    rewritten.push_str(&line[..start]);
    rewritten.push_str(&value);
    if rest.is_empty() {
        return rewritten;
    }
    let trimmed_rest = rest.trim_start();
    let gap = rest.len() - trimmed_rest.len();
    let padding = (old_width + gap).saturating_sub(value.len()).max(1);
    rewritten.push_str(&" ".repeat(padding));
    rewritten.push_str(trimmed_rest);
    rewritten
}

/// First token of a file reference line, or `None` when the reference is
/// blank (line starts with `/`).
pub fn reference_name(line: &str) -> Option<&str> {
    line.split_whitespace()
        .next()
        .filter(|token| !token.starts_with('/'))
}

/// Descriptive text of a record line starting at its first `/`.
pub fn description(line: &str) -> &str {
    line.find('/').map_or("", |index| &line[index..])
}

/// Tag after the `/` of a reference line (`BCFL` for `foo.dat  / BCFL`).
pub fn reference_tag(line: &str) -> &str {
    description(line).trim_start_matches('/').trim()
}

pub fn file_reference(name: &str, tag: &str) -> String {
    format!("   {}\t\t        / {}", name, tag)
}

pub fn blank_reference(tag: &str) -> String {
    format!("{:width$}/ {}", "", tag, width = BLANK_REFERENCE_COLUMN)
}

/// `value` indented by `front` spaces and left-justified to `width`.
pub fn pad_both(value: impl Display, front: usize, width: usize) -> String {
    let text = format!("{}{}", " ".repeat(front), value);
    format!("{:<width$}", text, width = width)
}

#[cfg(test)]
mod tests {
    use super::{
        blank_reference, count_header, description, file_reference, leading_int, pad_both,
        parse_token, reference_name, reference_tag,
    };
    use crate::domain::IwfmErrorCategory;

    #[test]
    fn count_header_keeps_the_description_column() {
        let line = "     12                  / NOUTH";
        let rewritten = count_header(line, 3);
        assert_eq!(rewritten, "     3                   / NOUTH");
        assert_eq!(rewritten.find('/'), line.find('/'));
        assert_eq!(leading_int("x", 0, &rewritten).expect("integer"), 3);
    }

    #[test]
    fn count_header_widens_when_the_value_grows() {
        assert_eq!(count_header("9 / NWELL", 120), "120 / NWELL");
        assert_eq!(count_header("\t4", 0), "\t0");
    }

    #[test]
    fn count_header_is_stable_on_its_own_output() {
        let once = count_header("   40      / NDIVS", 7);
        assert_eq!(count_header(&once, 7), once);
    }

    #[test]
    fn references_and_blank_references() {
        assert_eq!(reference_name("   BC.dat   / BCFL"), Some("BC.dat"));
        assert_eq!(reference_name("                / TDFL"), None);
        assert_eq!(reference_tag("   BC.dat   / BCFL"), "BCFL");
        assert_eq!(file_reference("Sub_BC.dat", "BCFL"), "   Sub_BC.dat\t\t        / BCFL");
        let blank = blank_reference("TDFL");
        assert_eq!(blank.find('/'), Some(41));
        assert_eq!(reference_name(&blank), None);
    }

    #[test]
    fn pad_both_left_justifies_after_indent() {
        assert_eq!(pad_both("GW.dat", 4, 12), "    GW.dat  ");
        assert_eq!(pad_both("long_name.dat", 4, 8), "    long_name.dat");
        assert_eq!(description("a b / NAME"), "/ NAME");
    }

    #[test]
    fn malformed_tokens_name_line_and_reason() {
        let error = leading_int("Wells.dat", 6, "  W1 10.0 20.0").expect_err("non-integer id");
        assert_eq!(error.category(), IwfmErrorCategory::MalformedRecord);
        assert!(error.message().starts_with("Wells.dat line 7"));

        let error = parse_token::<f64>("Wells.dat", 0, "1 2.0", 2).expect_err("too short");
        assert!(error.message().contains("expected at least 3 values"));
    }
}
