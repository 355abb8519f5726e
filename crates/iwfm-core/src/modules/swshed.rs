//! Small watersheds file.

use crate::domain::{IdSet, RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, count_header};

/// SWBUDFL and FNSWFL precede NSW.
const OUTPUT_FILES: usize = 2;
/// NSW, FACTA, FACTQ and TUNITQ.
const DESCRIPTION_HEADER: usize = 4;
const ROOT_ZONE_FACTORS: usize = 6;
const AQUIFER_FACTORS: usize = 3;
const INITIAL_FACTORS: usize = 1;

/// Small watershed descriptions are `ID AREA IWBTS NWB IWB QMAXWB`
/// followed by `NWB - 1` lines `IWB QMAXWB`. A watershed survives when its
/// first groundwater node is in the submodel. A surviving watershed loses the
/// arc lines of excluded nodes, and its stream outflow node is zeroed when
/// that node left the submodel. The root zone, aquifer and initial condition
/// sections then keep only the surviving watershed ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmallWatershedRewriter;

impl SubmodelRewriter for SmallWatershedRewriter {
    fn role(&self) -> &'static str {
        "small watershed file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let mut cursor = LineCursor::new(label, lines);

        cursor.advance(OUTPUT_FILES)?;
        let count_slot = cursor.slot();
        let count_line = cursor.current()?.to_string();
        let watersheds = usize::try_from(cursor.current_int()?).unwrap_or(0);
        cursor.advance(DESCRIPTION_HEADER)?;

        let mut surviving = IdSet::new();
        for _ in 0..watersheds {
            cursor.advance(0)?;
            if let Some(id) = rewrite_description(&mut cursor, submodel)? {
                surviving.insert(id);
            }
        }
        cursor.set(count_slot, count_header(&count_line, surviving.len()))?;

        let in_submodel = |id: i64| surviving.contains(&id);
        cursor.advance(ROOT_ZONE_FACTORS)?;
        cursor.filter_rows(0, watersheds, in_submodel)?;
        cursor.advance(AQUIFER_FACTORS)?;
        cursor.filter_rows(0, watersheds, in_submodel)?;
        if cursor.try_advance(INITIAL_FACTORS) {
            cursor.filter_rows(0, watersheds, in_submodel)?;
        }

        tracing::debug!(
            file = label,
            watersheds,
            kept = surviving.len(),
            "filtered small watersheds"
        );
        Ok(Rewritten::new(cursor.finish()).with_kept(surviving.len()))
    }
}

/// Copy or drop one watershed description with its arc lines, returning the
/// watershed id when it survives.
fn rewrite_description(
    cursor: &mut LineCursor,
    submodel: &Submodel,
) -> RewriteResult<Option<i64>> {
    let id = cursor.current_int()?;
    let outflow = cursor.current_value::<i64>(2)?;
    let arcs = usize::try_from(cursor.current_value::<i64>(3)?).unwrap_or(0).max(1);
    let first_node = cursor.current_value::<i64>(4)?;

    if !submodel.nodes.contains(&first_node) {
        cursor.drop_line()?;
        for _ in 1..arcs {
            cursor.advance(0)?;
            cursor.drop_line()?;
        }
        return Ok(None);
    }

    let slot = cursor.slot();
    let mut fields: Vec<String> = cursor
        .current_tokens()?
        .into_iter()
        .map(str::to_string)
        .collect();
    cursor.keep()?;
    let mut kept_arcs = arcs;
    for _ in 1..arcs {
        cursor.advance(0)?;
        if submodel.nodes.contains(&cursor.current_int()?) {
            cursor.keep()?;
        } else {
            cursor.drop_line()?;
            kept_arcs -= 1;
        }
    }

    let rerouted = !submodel.stream_nodes.contains(&outflow);
    if rerouted || kept_arcs != arcs {
        if rerouted {
            fields[2] = "0".to_string();
        }
        fields[3] = kept_arcs.to_string();
        cursor.set(slot, fields.join("\t"))?;
    }
    Ok(Some(id))
}
