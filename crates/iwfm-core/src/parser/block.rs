use super::cursor::LineCursor;
use super::record::is_blank;
use super::scanner::is_comment;
use crate::domain::{IdSet, ParserResult};

/// Height of the first group of a layered block: the leading `ID v1 ...`
/// line plus every following data line that carries fewer tokens.
pub fn infer_layer_count<S: AsRef<str>>(lines: &[S], start: usize) -> usize {
    let Some(first) = lines.get(start) else {
        return 0;
    };
    let width = first.as_ref().split_whitespace().count();
    let continuation = lines
        .iter()
        .skip(start + 1)
        .map(AsRef::as_ref)
        .take_while(|line| {
            !is_comment(line) && !is_blank(line) && line.split_whitespace().count() < width
        })
        .count();
    1 + continuation
}

/// Buffer-level form of [`LineCursor::filter_block`]: returns the filtered
/// buffer and the index of the line that ended the block, or `None` when the
/// block ran to the end of the buffer.
pub fn remove_unlisted(
    label: &str,
    lines: &[String],
    cursor: usize,
    keep_ids: &IdSet,
    extra_skip: usize,
) -> ParserResult<(Vec<String>, Option<usize>)> {
    let mut walker = LineCursor::new(label, lines.to_vec());
    while walker.pos() < cursor && !walker.at_end() {
        walker.keep()?;
    }
    walker.filter_block(extra_skip, |id| keep_ids.contains(&id))?;
    let next = (!walker.at_end()).then(|| walker.slot());
    Ok((walker.finish(), next))
}
