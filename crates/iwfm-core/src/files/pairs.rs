use crate::domain::{ElementPair, IwfmError, IwfmResult, ParserResult};
use crate::modules::helpers::read_lines;
use crate::parser::{is_blank, is_comment};
use std::path::Path;

const SEPARATORS: [char; 5] = [',', '\t', ';', '*', ' '];

/// Rows of `old new subregion`, separated by commas, tabs, semicolons,
/// asterisks or spaces. Comment and blank lines are ignored.
pub fn parse_element_pairs(label: &str, lines: &[String]) -> ParserResult<Vec<ElementPair>> {
    let mut pairs = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        if is_blank(line) || is_comment(line) {
            continue;
        }
        let values = line
            .split(SEPARATORS)
            .filter(|token| !token.is_empty())
            .take(3)
            .map(|token| token.parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| {
                IwfmError::malformed_line(label, index, line, "element pair values must be integers")
            })?;
        let [old, new, subregion] = values.as_slice() else {
            return Err(IwfmError::malformed_line(
                label,
                index,
                line,
                "expected old element, new element and subregion",
            ));
        };
        pairs.push(ElementPair {
            old: *old,
            new: *new,
            subregion: *subregion,
        });
    }
    Ok(pairs)
}

pub fn read_element_pairs(path: &Path) -> IwfmResult<Vec<ElementPair>> {
    let lines = read_lines(path, "element pairs file")?;
    let pairs = parse_element_pairs(&path.display().to_string(), &lines)?;
    tracing::debug!(file = %path.display(), pairs = pairs.len(), "read element pairs");
    Ok(pairs)
}
