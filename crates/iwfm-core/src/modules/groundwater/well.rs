use super::groups::filter_element_groups;
use crate::domain::{IdSet, RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, count_header};

/// Well specification file. Wells are kept when their location lies inside
/// the submodel boundary; the well characteristics follow the kept wells
/// and element groups are reduced to submodel elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct WellRewriter;

impl SubmodelRewriter for WellRewriter {
    fn role(&self) -> &'static str {
        "well specification file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let mut cursor = LineCursor::new(label, lines);

        cursor.advance(0)?;
        let well_slot = cursor.slot();
        let well_header = cursor.current()?.to_string();
        let wells = usize::try_from(cursor.current_int()?).unwrap_or(0);
        cursor.advance(4)?;

        let mut kept_wells = IdSet::new();
        for _ in 0..wells {
            let id = cursor.current_int()?;
            let x = cursor.current_value::<f64>(1)?;
            let y = cursor.current_value::<f64>(2)?;
            if submodel.contains_point(x, y) {
                kept_wells.insert(id);
                cursor.keep()?;
            } else {
                cursor.drop_line()?;
            }
        }
        cursor.set(well_slot, count_header(&well_header, kept_wells.len()))?;
        tracing::debug!(file = label, wells, kept = kept_wells.len(), "filtered wells");

        cursor.advance(0)?;
        cursor.filter_rows(0, wells, |id| kept_wells.contains(&id))?;

        cursor.advance(0)?;
        let group_slot = cursor.slot();
        let group_header = cursor.current()?.to_string();
        let groups = usize::try_from(cursor.current_int()?).unwrap_or(0);
        if groups > 0 {
            cursor.advance(1)?;
            let kept_groups = filter_element_groups(&mut cursor, groups, &submodel.elements)?;
            cursor.set(group_slot, count_header(&group_header, kept_groups))?;
        }

        Ok(Rewritten::new(cursor.finish()).with_kept(kept_wells.len()))
    }
}
