//! Root zone component: the main file, the four land-use process files it
//! names and their land-use area time series.

mod landuse;
mod npc;
mod nv;
mod pc;
mod urban;

pub use landuse::LandUseRewriter;
pub use npc::NonPondedRewriter;
pub use nv::NativeVegRewriter;
pub use pc::PondedRewriter;
pub use urban::UrbanRewriter;

use crate::domain::{ExtractionReport, ParserResult, RewriteResult, Submodel};
use crate::modules::traits::{RewriteContext, Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, tokens};

/// Solver and budget settings between the version line and AGNPFL.
const SETTINGS_LINES: usize = 4;

/// Moisture-routing and output settings between NVRVFL and the element rows.
const ELEMENT_SETTINGS_LINES: usize = 13;

/// Runoff destination type for a stream node.
const RUNOFF_TO_STREAM: &str = "1";

#[derive(Debug, Clone, Copy)]
pub struct RootzoneRewriter<'a> {
    context: RewriteContext<'a>,
}

impl<'a> RootzoneRewriter<'a> {
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
        let processes: [(&dyn SubmodelRewriter, &str, &str); 4] = [
            (&NonPondedRewriter::new(self.context), &names.non_ponded, "AGNPFL"),
            (&PondedRewriter::new(self.context), &names.ponded, "PFL"),
            (&UrbanRewriter::new(self.context), &names.urban, "URBFL"),
            (&NativeVegRewriter::new(self.context), &names.native_veg, "NVRVFL"),
        ];
        for (rewriter, new_name, tag) in processes {
            cursor.advance(0)?;
            let nested = self.context.rewrite_nested(
                rewriter,
                cursor.current()?,
                new_name,
                tag,
                submodel,
                report,
            )?;
            cursor.replace(nested.reference)?;
        }
        Ok(())
    }
}

impl SubmodelRewriter for RootzoneRewriter<'_> {
    fn role(&self) -> &'static str {
        "rootzone main file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let mut report = ExtractionReport::default();
        let mut cursor = LineCursor::new(label, lines);
        cursor.keep()?;
        cursor.advance(SETTINGS_LINES)?;
        self.rewrite_references(&mut cursor, submodel, &mut report)?;
        cursor.advance(ELEMENT_SETTINGS_LINES)?;

        let mut kept = 0;
        let mut redirected = 0;
        while !cursor.at_end() {
            if cursor.at_block_end() {
                cursor.keep()?;
                continue;
            }
            if !submodel.elements.contains(&cursor.current_int()?) {
                cursor.drop_line()?;
                continue;
            }
            kept += 1;
            let mut fields = tokens(cursor.current()?);
            let exported = fields.len() > 11
                && fields[10] == RUNOFF_TO_STREAM
                && !submodel
                    .stream_nodes
                    .contains(&cursor.current_value::<i64>(11)?);
            if exported {
                fields[10] = "0";
                let row = fields.join("\t");
                cursor.replace(row)?;
                redirected += 1;
            } else {
                cursor.keep()?;
            }
        }

        tracing::debug!(file = label, kept, redirected, "filtered rootzone elements");
        Ok(Rewritten::new(cursor.finish())
            .with_kept(kept)
            .with_report(report))
    }
}

/// Element-keyed initial soil moisture rows closing every land-use process
/// file. A non-positive first key means one value applies everywhere and the
/// row is copied. `limit` bounds the rows read when the file fixes it.
pub(super) fn filter_initial_conditions(
    cursor: &mut LineCursor,
    limit: Option<usize>,
    elements: impl Fn(i64) -> bool,
) -> ParserResult<usize> {
    if !cursor.try_advance(0) || cursor.at_block_end() {
        return Ok(0);
    }
    if cursor.current_int()? <= 0 {
        return Ok(0);
    }
    cursor.filter_rows(0, limit.unwrap_or(usize::MAX), elements)
}
