//! Unsaturated zone file.

use crate::domain::{IwfmError, RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};
use crate::parser::LineCursor;

/// NUNSAT, UZCONV, UZITERMX and the three output file names.
const SETTINGS_LINES: usize = 6;

/// NGROUP, the conversion factors and TUNITZ.
const PARAMETER_HEADER: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct UnsatRewriter;

impl SubmodelRewriter for UnsatRewriter {
    fn role(&self) -> &'static str {
        "unsaturated zone file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let mut cursor = LineCursor::new(label, lines);
        cursor.advance(SETTINGS_LINES)?;
        if cursor.current_int()? > 0 {
            return Err(IwfmError::invalid_argument(
                "RUN.PARAMETRIC_GRID",
                format!(
                    "{}: parametric grids are not supported for the unsaturated zone",
                    label
                ),
            ));
        }
        cursor.advance(PARAMETER_HEADER)?;
        let kept = cursor.filter_block(0, |element| submodel.elements.contains(&element))?;

        tracing::debug!(file = label, kept, "filtered unsaturated zone elements");
        Ok(Rewritten::new(cursor.finish()).with_kept(kept))
    }
}
