use super::{LandUseRewriter, filter_initial_conditions};
use crate::domain::{ExtractionReport, RewriteResult, Submodel};
use crate::modules::traits::{RewriteContext, Rewritten, SubmodelRewriter};
use crate::parser::LineCursor;

/// FACT and ROOTURB, then the POPULFL, WTRUSEFL and URBSPECFL references.
const HEADER_LINES: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct UrbanRewriter<'a> {
    context: RewriteContext<'a>,
}

impl<'a> UrbanRewriter<'a> {
    pub fn new(context: RewriteContext<'a>) -> Self {
        Self { context }
    }
}

impl SubmodelRewriter for UrbanRewriter<'_> {
    fn role(&self) -> &'static str {
        "urban land use file"
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
            &self.context.names.urban_area,
            "LUFLU",
            submodel,
            &mut report,
        )?;
        cursor.replace(area.reference)?;

        cursor.advance(HEADER_LINES)?;
        let kept = cursor.filter_block(0, in_submodel)?;
        let initial = filter_initial_conditions(&mut cursor, None, in_submodel)?;

        tracing::debug!(file = label, kept, initial, "filtered urban elements");
        Ok(Rewritten::new(cursor.finish())
            .with_kept(kept)
            .with_report(report))
    }
}
