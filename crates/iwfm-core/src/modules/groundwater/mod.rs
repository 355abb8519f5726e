//! Groundwater component: the main file plus the boundary-condition, tile
//! drain, pumping and subsidence files it references.

mod bc;
mod cghd;
mod epump;
mod groups;
mod pump;
mod subs;
mod td;
mod well;

pub use bc::{BoundaryRewriter, NodeBoundaryKind, NodeBoundaryRewriter};
pub use cghd::ConstrainedHeadRewriter;
pub use epump::ElementPumpingRewriter;
pub use pump::PumpingRewriter;
pub use subs::SubsidenceRewriter;
pub use td::TileDrainRewriter;
pub use well::WellRewriter;

use crate::domain::{ExtractionReport, IwfmError, RewriteResult, Submodel};
use crate::modules::traits::{RewriteContext, Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, count_header};

/// Output and debug settings between SUBSFL and NOUTH.
const SETTINGS_LINES: usize = 16;

/// Hydrograph locations given as a node number instead of x-y coordinates.
const NODE_HYDROGRAPH: i64 = 1;

#[derive(Debug, Clone, Copy)]
pub struct GroundwaterRewriter<'a> {
    context: RewriteContext<'a>,
}

impl<'a> GroundwaterRewriter<'a> {
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
        let boundary = self.context.rewrite_nested(
            &BoundaryRewriter::new(self.context),
            cursor.current()?,
            &names.boundary,
            "BCFL",
            submodel,
            report,
        )?;
        cursor.replace(boundary.reference)?;

        cursor.advance(0)?;
        let drains = self.context.rewrite_nested(
            &TileDrainRewriter,
            cursor.current()?,
            &names.tile_drain,
            "TDFL",
            submodel,
            report,
        )?;
        cursor.replace(drains.reference_or_blank("TDFL"))?;

        cursor.advance(0)?;
        let pumping = self.context.rewrite_nested(
            &PumpingRewriter::new(self.context),
            cursor.current()?,
            &names.pumping,
            "PUMPFL",
            submodel,
            report,
        )?;
        cursor.replace(pumping.reference)?;

        cursor.advance(0)?;
        let subsidence = self.context.rewrite_nested(
            &SubsidenceRewriter,
            cursor.current()?,
            &names.subsidence,
            "SUBSFL",
            submodel,
            report,
        )?;
        cursor.replace(subsidence.reference)?;
        Ok(())
    }
}

impl SubmodelRewriter for GroundwaterRewriter<'_> {
    fn role(&self) -> &'static str {
        "groundwater main file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let mut report = ExtractionReport::default();
        let mut cursor = LineCursor::new(label, lines);
        self.rewrite_references(&mut cursor, submodel, &mut report)?;

        cursor.advance(SETTINGS_LINES)?;
        let kept_hydrographs = filter_hydrographs(&mut cursor, submodel)?;

        cursor.advance(0)?;
        filter_face_flows(&mut cursor, submodel)?;

        if cursor.current_int()? > 0 {
            return Err(IwfmError::invalid_argument(
                "RUN.PARAMETRIC_GRID",
                format!("{}: parametric grids are not supported for aquifer parameters", label),
            ));
        }
        cursor.next_record(4)?;
        let parameter_nodes = cursor.filter_layered_block(|node| submodel.nodes.contains(&node))?;

        cursor.advance(0)?;
        let anomaly_slot = cursor.slot();
        let anomaly_header = cursor.current()?.to_string();
        let anomalies = usize::try_from(cursor.current_int()?).unwrap_or(0);
        cursor.next_record(2)?;
        let kept_anomalies =
            cursor.filter_rows(1, anomalies, |element| submodel.elements.contains(&element))?;
        cursor.set(anomaly_slot, count_header(&anomaly_header, kept_anomalies))?;

        cursor.advance(1)?;
        let initial_heads = cursor.filter_block(0, |node| submodel.nodes.contains(&node))?;

        tracing::debug!(
            file = label,
            kept_hydrographs,
            parameter_nodes,
            kept_anomalies,
            initial_heads,
            "filtered groundwater main file"
        );
        Ok(Rewritten::new(cursor.finish()).with_report(report))
    }
}

/// `NOUTH`, FACTXY, GWHYDOUTFL, then `ID HYDTYP IOUTHL X Y NAME` rows. Rows
/// located by node carry the node id where x would be.
fn filter_hydrographs(cursor: &mut LineCursor, submodel: &Submodel) -> RewriteResult<usize> {
    let slot = cursor.slot();
    let header = cursor.current()?.to_string();
    let count = usize::try_from(cursor.current_int()?).unwrap_or(0);
    cursor.next_record(2)?;

    let mut kept = 0;
    for _ in 0..count {
        if cursor.at_block_end() {
            break;
        }
        let inside = if cursor.current_value::<i64>(1)? == NODE_HYDROGRAPH {
            submodel.nodes.contains(&cursor.current_value::<i64>(3)?)
        } else {
            let x = cursor.current_value::<f64>(3)?;
            let y = cursor.current_value::<f64>(4)?;
            submodel.contains_point(x, y)
        };
        if inside {
            cursor.keep()?;
            kept += 1;
        } else {
            cursor.drop_line()?;
        }
    }
    cursor.set(slot, count_header(&header, kept))?;
    Ok(kept)
}

/// `NOUTF`, FCHYDOUTFL, then `ID LAYER NODE_A NODE_B NAME` rows kept when
/// both face nodes are in the submodel. Leaves the cursor on NGROUP.
fn filter_face_flows(cursor: &mut LineCursor, submodel: &Submodel) -> RewriteResult<usize> {
    let slot = cursor.slot();
    let header = cursor.current()?.to_string();
    let count = usize::try_from(cursor.current_int()?).unwrap_or(0);
    cursor.next_record(1)?;
    if count == 0 {
        return Ok(0);
    }

    let mut kept = 0;
    for _ in 0..count {
        if cursor.at_block_end() {
            break;
        }
        let node_a = cursor.current_value::<i64>(2)?;
        let node_b = cursor.current_value::<i64>(3)?;
        if submodel.nodes.contains(&node_a) && submodel.nodes.contains(&node_b) {
            cursor.keep()?;
            kept += 1;
        } else {
            cursor.drop_line()?;
        }
    }
    cursor.set(slot, count_header(&header, kept))?;
    cursor.advance(0)?;
    Ok(kept)
}
