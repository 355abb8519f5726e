use crate::domain::{RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, tokens};

/// Stream inflow file. The inflow columns must keep their count, so an
/// inflow at a stream node outside the submodel is pointed at node 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct InflowRewriter;

impl SubmodelRewriter for InflowRewriter {
    fn role(&self) -> &'static str {
        "stream inflow file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let mut cursor = LineCursor::new(label, lines);
        cursor.advance(0)?;
        let columns = usize::try_from(cursor.current_int()?).unwrap_or(0);
        if !cursor.try_advance(5) {
            return Ok(Rewritten::new(cursor.finish()));
        }

        let mut kept = 0;
        for _ in 0..columns {
            if cursor.at_block_end() {
                break;
            }
            let node = cursor.current_int()?;
            if submodel.stream_nodes.contains(&node) {
                cursor.keep()?;
                kept += 1;
            } else {
                let rest = tokens(cursor.current()?)[1..].join(" ");
                cursor.replace(format!("\t0 {}", rest))?;
            }
        }

        tracing::debug!(file = label, columns, kept, "zeroed inflows outside the submodel");
        Ok(Rewritten::new(cursor.finish()).with_kept(kept))
    }
}
