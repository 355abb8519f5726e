//! Main-file readers, submodel file names and the element pairs input.

mod names;
mod pairs;
mod preprocessor;
mod simulation;

pub use names::SubmodelNames;
pub use pairs::{parse_element_pairs, read_element_pairs};
pub use preprocessor::{PreprocFiles, rewrite_pp_lines, sub_pp_file};
pub use simulation::{SimFiles, rewrite_sim_lines, sub_sim_file};

use crate::domain::{IwfmError, ParserResult};
use crate::parser::{LineCursor, pad_both, reference_name};

/// Column the description of a main-file reference starts at.
const MAIN_REFERENCE_WIDTH: usize = 53;

fn required_reference(cursor: &LineCursor, tag: &str) -> ParserResult<String> {
    let line = cursor.current()?;
    reference_name(line).map(str::to_string).ok_or_else(|| {
        IwfmError::malformed_line(
            cursor.label(),
            cursor.pos(),
            line,
            &format!("{} file reference is required", tag),
        )
    })
}

/// Rewrite one reference line of a main file. `None` blanks a line that
/// named a file; already blank references are left alone.
fn main_reference(line: &str, new_name: Option<&str>) -> String {
    if reference_name(line).is_none() {
        return line.to_string();
    }
    let rest = line.split_whitespace().skip(1).collect::<Vec<_>>().join(" ");
    match new_name {
        Some(name) => pad_both(name, 4, MAIN_REFERENCE_WIDTH) + &rest,
        None if rest.starts_with('/') => pad_both("", 4, MAIN_REFERENCE_WIDTH) + &rest,
        None => pad_both("", 4, MAIN_REFERENCE_WIDTH) + "/ " + &rest,
    }
}
