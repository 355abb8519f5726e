use crate::domain::{IwfmError, RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, count_header};

#[derive(Debug, Clone, Copy, Default)]
pub struct SubsidenceRewriter;

impl SubmodelRewriter for SubsidenceRewriter {
    fn role(&self) -> &'static str {
        "subsidence file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let mut cursor = LineCursor::new(label, lines);

        // Version, initial conditions file, tecplot, final results and
        // interbed settings come before the hydrograph count.
        cursor.advance(5)?;
        let hydrograph_slot = cursor.slot();
        let hydrograph_header = cursor.current()?.to_string();
        let hydrographs = usize::try_from(cursor.current_int()?).unwrap_or(0);
        cursor.advance(3)?;

        let mut kept = 0;
        for _ in 0..hydrographs {
            let x = cursor.current_value::<f64>(3)?;
            let y = cursor.current_value::<f64>(4)?;
            if submodel.contains_point(x, y) {
                cursor.keep()?;
                kept += 1;
            } else {
                cursor.drop_line()?;
            }
            cursor.advance(0)?;
        }
        cursor.set(hydrograph_slot, count_header(&hydrograph_header, kept))?;

        if cursor.current_int()? > 0 {
            return Err(IwfmError::invalid_argument(
                "RUN.PARAMETRIC_GRID",
                format!("{}: parametric grids are not supported for subsidence", label),
            ));
        }
        cursor.next_record(1)?;
        let groups = cursor.filter_layered_block(|node| submodel.nodes.contains(&node))?;

        tracing::debug!(file = label, hydrographs, kept, groups, "filtered subsidence");
        Ok(Rewritten::new(cursor.finish()).with_kept(kept))
    }
}
