use crate::domain::{RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, count_header};

/// Bypass specification file.
///
/// Each bypass record `ID IA TYPDEST DEST IDIVC ...` is followed by
/// `|IDIVC|` rating-table lines when `IDIVC` is negative. A bypass survives
/// when its source stream node `IA` is in the submodel, and its record is
/// removed or kept whole. The seepage section
/// holds one `ID NERELS ...` record per bypass spanning `max(1, NERELS)`
/// lines; each follows the fate of its bypass.
#[derive(Debug, Clone, Copy, Default)]
pub struct BypassRewriter;

impl SubmodelRewriter for BypassRewriter {
    fn role(&self) -> &'static str {
        "bypass specification file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let mut cursor = LineCursor::new(label, lines);

        cursor.advance(0)?;
        let slot = cursor.slot();
        let header = cursor.current()?.to_string();
        let bypasses = usize::try_from(cursor.current_int()?).unwrap_or(0);
        if !cursor.try_advance(5) {
            return Ok(Rewritten::new(cursor.finish()).with_kept(0));
        }

        let mut fates = Vec::with_capacity(bypasses);
        for _ in 0..bypasses {
            cursor.advance(0)?;
            let source = cursor.current_value::<i64>(1)?;
            let rating_column = cursor.current_value::<i64>(4)?;
            let span = if rating_column > 0 {
                1
            } else {
                1 + rating_column.unsigned_abs() as usize
            };
            let keep = submodel.stream_nodes.contains(&source);
            copy_or_drop(&mut cursor, span, keep)?;
            fates.push(keep);
        }
        let kept = fates.iter().filter(|keep| **keep).count();
        cursor.set(slot, count_header(&header, kept))?;

        for keep in &fates {
            if !cursor.try_advance(0) {
                break;
            }
            let elements = cursor.current_value::<i64>(1)?;
            let span = usize::try_from(elements).unwrap_or(0).max(1);
            copy_or_drop(&mut cursor, span, *keep)?;
        }

        tracing::debug!(file = label, bypasses, kept, "filtered bypasses");
        Ok(Rewritten::new(cursor.finish()).with_kept(kept))
    }
}

fn copy_or_drop(cursor: &mut LineCursor, span: usize, keep: bool) -> RewriteResult<()> {
    for _ in 0..span {
        if keep {
            cursor.keep()?;
        } else {
            cursor.drop_line()?;
        }
    }
    Ok(())
}
