use crate::domain::{IdSet, IwfmError, ParserResult};
use crate::parser::LineCursor;

/// Filter `groups` element groups of the form `ID NELEM FIRST` followed by
/// `NELEM - 1` lines holding one element each. Groups with no element left
/// in `elements` are removed; the rest keep their source id and are
/// rewritten with their survivors.
///
/// Returns the number of groups kept.
pub(super) fn filter_element_groups(
    cursor: &mut LineCursor,
    groups: usize,
    elements: &IdSet,
) -> ParserResult<usize> {
    let mut kept = 0;
    for ordinal in 1..=groups {
        let values = cursor.current_tokens()?;
        if values.len() < 3 {
            return Err(IwfmError::malformed_line(
                cursor.label(),
                cursor.pos(),
                cursor.current()?,
                &format!(
                    "element group {} of {} needs ID, NELEM and first element",
                    ordinal, groups
                ),
            ));
        }
        let group_id = cursor.current_value::<i64>(0)?;
        let count = cursor.current_value::<usize>(1)?;
        let first = cursor.current_value::<i64>(2)?;
        cursor.drop_line()?;

        let mut members = Vec::with_capacity(count);
        if elements.contains(&first) {
            members.push(first);
        }
        for _ in 1..count {
            let element = cursor.current_int()?;
            if elements.contains(&element) {
                members.push(element);
            }
            cursor.drop_line()?;
        }

        let Some((head, rest)) = members.split_first() else {
            continue;
        };
        cursor.emit(format!("{}\t{}\t{}", group_id, members.len(), head));
        for element in rest {
            cursor.emit(format!("\t\t{}", element));
        }
        kept += 1;
    }
    Ok(kept)
}
