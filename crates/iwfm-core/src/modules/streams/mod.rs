//! Stream component main file and the inflow and bypass files it names.

mod bypass;
mod inflow;

pub use bypass::BypassRewriter;
pub use inflow::InflowRewriter;

use crate::domain::{ExtractionReport, RewriteResult, Submodel};
use crate::modules::traits::{RewriteContext, Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, count_header};

#[derive(Debug, Clone, Copy)]
pub struct StreamsRewriter<'a> {
    context: RewriteContext<'a>,
}

impl<'a> StreamsRewriter<'a> {
    pub fn new(context: RewriteContext<'a>) -> Self {
        Self { context }
    }

    fn rewrite_references(
        &self,
        cursor: &mut LineCursor,
        submodel: &Submodel,
        report: &mut ExtractionReport,
    ) -> RewriteResult<()> {
        let names = self.context.names;

        cursor.advance(0)?;
        let inflow = self.context.rewrite_nested(
            &InflowRewriter,
            cursor.current()?,
            &names.stream_inflow,
            "INFLOWFL",
            submodel,
            report,
        )?;
        cursor.replace(inflow.reference)?;

        cursor.advance(0)?;
        let diversion_spec = self.context.copy_nested(
            cursor.current()?,
            &names.diversion_spec,
            "DIVSPECFL",
            "diversion specification file",
            report,
        )?;
        cursor.replace(diversion_spec)?;

        cursor.advance(0)?;
        let bypass = self.context.rewrite_nested(
            &BypassRewriter,
            cursor.current()?,
            &names.bypass_spec,
            "BYPSPECFL",
            submodel,
            report,
        )?;
        cursor.replace(bypass.reference_or_blank("BYPSPECFL"))?;

        cursor.advance(0)?;
        let diversions = self.context.copy_nested(
            cursor.current()?,
            &names.diversions,
            "DIVFL",
            "diversion data file",
            report,
        )?;
        cursor.replace(diversions)?;
        Ok(())
    }
}

impl SubmodelRewriter for StreamsRewriter<'_> {
    fn role(&self) -> &'static str {
        "stream main file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let in_submodel = |node: i64| submodel.stream_nodes.contains(&node);
        let mut report = ExtractionReport::default();
        let mut cursor = LineCursor::new(label, lines);
        self.rewrite_references(&mut cursor, submodel, &mut report)?;

        // Reach and diversion budget files sit between DIVFL and NOUTR.
        cursor.advance(2)?;
        let hydrograph_slot = cursor.slot();
        let hydrograph_header = cursor.current()?.to_string();
        let hydrographs = usize::try_from(cursor.current_int()?).unwrap_or(0);
        cursor.next_record(6)?;
        let kept_hydrographs = cursor.filter_rows(0, hydrographs, in_submodel)?;
        cursor.set(hydrograph_slot, count_header(&hydrograph_header, kept_hydrographs))?;

        cursor.advance(0)?;
        let budget_slot = cursor.slot();
        let budget_header = cursor.current()?.to_string();
        let budgets = usize::try_from(cursor.current_int()?).unwrap_or(0);
        cursor.next_record(1)?;
        let kept_budgets = cursor.filter_rows(0, budgets, in_submodel)?;
        cursor.set(budget_slot, count_header(&budget_header, kept_budgets))?;

        cursor.advance(3)?;
        let streambed = cursor.filter_block(0, in_submodel)?;

        tracing::debug!(
            file = label,
            kept_hydrographs,
            kept_budgets,
            streambed,
            "filtered stream main file"
        );
        Ok(Rewritten::new(cursor.finish()).with_report(report))
    }
}
