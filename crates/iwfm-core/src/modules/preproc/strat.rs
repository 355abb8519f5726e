use crate::domain::{RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};
use crate::parser::LineCursor;

/// Stratigraphy file: `NL`, `FACT`, then one row per node.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreprocStratRewriter;

impl SubmodelRewriter for PreprocStratRewriter {
    fn role(&self) -> &'static str {
        "stratigraphy file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let mut cursor = LineCursor::new(label, lines);
        cursor.advance(2)?;
        let kept = cursor.filter_block(0, |node| submodel.nodes.contains(&node))?;
        Ok(Rewritten::new(cursor.finish()).with_kept(kept))
    }
}
