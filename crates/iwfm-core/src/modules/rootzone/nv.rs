use super::{LandUseRewriter, filter_initial_conditions};
use crate::domain::{ExtractionReport, RewriteResult, Submodel};
use crate::modules::traits::{RewriteContext, Rewritten, SubmodelRewriter};
use crate::parser::LineCursor;

/// FACT, ROOTNV and ROOTRV.
const ROOT_DEPTH_LINES: usize = 3;

/// Native and riparian vegetation file. The initial conditions hold at most
/// one row per element listed in the parameter block.
#[derive(Debug, Clone, Copy)]
pub struct NativeVegRewriter<'a> {
    context: RewriteContext<'a>,
}

impl<'a> NativeVegRewriter<'a> {
    pub fn new(context: RewriteContext<'a>) -> Self {
        Self { context }
    }
}

impl SubmodelRewriter for NativeVegRewriter<'_> {
    fn role(&self) -> &'static str {
        "native and riparian vegetation file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let in_submodel = |element: i64| submodel.elements.contains(&element);
        let mut report = ExtractionReport::default();
        let mut cursor = LineCursor::new(label, lines);

        cursor.advance(0)?;
        let area = self.context.rewrite_nested(
            &LandUseRewriter,
            cursor.current()?,
            &self.context.names.native_veg_area,
            "LUFLNVRV",
            submodel,
            &mut report,
        )?;
        cursor.replace(area.reference)?;

        cursor.advance(ROOT_DEPTH_LINES)?;
        let listed = cursor.block_len();
        let kept = cursor.filter_block(0, in_submodel)?;
        let initial = filter_initial_conditions(&mut cursor, Some(listed), in_submodel)?;

        tracing::debug!(file = label, listed, kept, initial, "filtered native vegetation");
        Ok(Rewritten::new(cursor.finish())
            .with_kept(kept)
            .with_report(report))
    }
}
