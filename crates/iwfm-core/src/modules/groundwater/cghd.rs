use super::bc::filter_node_rows;
use crate::domain::{RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};

/// Lines between `NGB` and the first row: FACTH, FACTVL, TUNITVL, FACTC, TUNITC.
const FACTOR_LINES: usize = 5;

/// Constrained general-head boundary file, rows keyed by node.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstrainedHeadRewriter;

impl SubmodelRewriter for ConstrainedHeadRewriter {
    fn role(&self) -> &'static str {
        "constrained general head boundary file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        filter_node_rows(label, lines, submodel, FACTOR_LINES)
    }
}
