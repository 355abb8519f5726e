use super::groups::filter_element_groups;
use crate::domain::{RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, count_header};

/// Element pumping file: sink rows keyed by element, then element groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementPumpingRewriter;

impl SubmodelRewriter for ElementPumpingRewriter {
    fn role(&self) -> &'static str {
        "element pumping file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let mut cursor = LineCursor::new(label, lines);

        cursor.advance(0)?;
        let sink_slot = cursor.slot();
        let sink_header = cursor.current()?.to_string();
        let sinks = usize::try_from(cursor.current_int()?).unwrap_or(0);
        cursor.advance(1)?;
        let kept = cursor.filter_rows(0, sinks, |element| submodel.elements.contains(&element))?;
        cursor.set(sink_slot, count_header(&sink_header, kept))?;

        if cursor.try_advance(0) {
            let group_slot = cursor.slot();
            let group_header = cursor.current()?.to_string();
            let groups = usize::try_from(cursor.current_int()?).unwrap_or(0);
            if groups > 0 {
                cursor.advance(1)?;
                let kept_groups =
                    filter_element_groups(&mut cursor, groups, &submodel.elements)?;
                cursor.set(group_slot, count_header(&group_header, kept_groups))?;
            }
        }

        tracing::debug!(file = label, sinks, kept, "filtered element pumping");
        Ok(Rewritten::new(cursor.finish()).with_kept(kept))
    }
}
