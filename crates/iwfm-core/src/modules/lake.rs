//! Lake component main file of the simulation.

use crate::domain::{ExtractionReport, RewriteResult, Submodel};
use crate::modules::traits::{RewriteContext, Rewritten, SubmodelRewriter};
use crate::parser::LineCursor;

/// LKBUDFL, then FACTK, FACTL and TUNITK.
const PARAMETER_HEADER: usize = 4;

/// FACTLKH ahead of the initial lake elevations.
const INITIAL_HEADER: usize = 1;

#[derive(Debug, Clone, Copy)]
pub struct LakeRewriter<'a> {
    context: RewriteContext<'a>,
}

impl<'a> LakeRewriter<'a> {
    pub fn new(context: RewriteContext<'a>) -> Self {
        Self { context }
    }
}

impl SubmodelRewriter for LakeRewriter<'_> {
    fn role(&self) -> &'static str {
        "lake main file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let in_submodel = |lake: i64| submodel.lakes.contains(&lake);
        let mut report = ExtractionReport::default();
        let mut cursor = LineCursor::new(label, lines);

        cursor.advance(0)?;
        let elevations = self.context.copy_nested(
            cursor.current()?,
            &self.context.names.max_lake_elevation,
            "MAXLKELEVFL",
            "maximum lake elevation file",
            &mut report,
        )?;
        cursor.replace(elevations)?;

        cursor.advance(PARAMETER_HEADER)?;
        let kept = cursor.filter_block(0, in_submodel)?;
        let initial = if cursor.try_advance(INITIAL_HEADER) {
            cursor.filter_block(0, in_submodel)?
        } else {
            0
        };

        tracing::debug!(file = label, kept, initial, "filtered lakes");
        Ok(Rewritten::new(cursor.finish())
            .with_kept(kept)
            .with_report(report))
    }
}
