use super::epump::ElementPumpingRewriter;
use super::well::WellRewriter;
use crate::domain::{ExtractionReport, RewriteResult, Submodel};
use crate::modules::traits::{RewriteContext, Rewritten, SubmodelRewriter};
use crate::parser::LineCursor;

/// Pumping main file: well specifications, element pumping and the pumping
/// rates time series. A nested file with nothing left in the submodel has
/// its reference blanked.
#[derive(Debug, Clone, Copy)]
pub struct PumpingRewriter<'a> {
    context: RewriteContext<'a>,
}

impl<'a> PumpingRewriter<'a> {
    pub fn new(context: RewriteContext<'a>) -> Self {
        Self { context }
    }
}

impl SubmodelRewriter for PumpingRewriter<'_> {
    fn role(&self) -> &'static str {
        "pumping main file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let names = self.context.names;
        let mut report = ExtractionReport::default();
        let mut cursor = LineCursor::new(label, lines);

        cursor.advance(0)?;
        let wells = self.context.rewrite_nested(
            &WellRewriter,
            cursor.current()?,
            &names.well_spec,
            "WELLFL",
            submodel,
            &mut report,
        )?;
        cursor.replace(wells.reference_or_blank("WELLFL"))?;

        cursor.advance(0)?;
        let sinks = self.context.rewrite_nested(
            &ElementPumpingRewriter,
            cursor.current()?,
            &names.element_pumping,
            "ELEMPUMPFL",
            submodel,
            &mut report,
        )?;
        cursor.replace(sinks.reference_or_blank("ELEMPUMPFL"))?;

        cursor.advance(0)?;
        let rates = self.context.copy_nested(
            cursor.current()?,
            &names.pump_rates,
            "PUMPFL",
            "pumping rates file",
            &mut report,
        )?;
        cursor.replace(rates)?;

        Ok(Rewritten::new(cursor.finish()).with_report(report))
    }
}
