use super::{LandUseRewriter, filter_initial_conditions};
use crate::domain::{ExtractionReport, RewriteResult, Submodel};
use crate::modules::traits::{RewriteContext, Rewritten, SubmodelRewriter};
use crate::parser::LineCursor;

/// Non-ponded agricultural crops file.
///
/// After the crop list, the area file reference and the budget section come
/// eight element blocks: curve numbers, ETc, water supply requirement,
/// irrigation periods, minimum and target soil moisture (each preceded by a
/// time-series file name), return flow and re-use fractions. The initial
/// conditions close the file with at most one row per listed element.
#[derive(Debug, Clone, Copy)]
pub struct NonPondedRewriter<'a> {
    context: RewriteContext<'a>,
}

impl<'a> NonPondedRewriter<'a> {
    pub fn new(context: RewriteContext<'a>) -> Self {
        Self { context }
    }
}

impl SubmodelRewriter for NonPondedRewriter<'_> {
    fn role(&self) -> &'static str {
        "non-ponded crop file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let in_submodel = |element: i64| submodel.elements.contains(&element);
        let mut report = ExtractionReport::default();
        let mut cursor = LineCursor::new(label, lines);

        cursor.advance(0)?;
        let crops = usize::try_from(cursor.current_int()?).unwrap_or(0);
        // NCROP, FLDMD and one code per crop.
        cursor.advance(2 + crops)?;
        let area = self.context.rewrite_nested(
            &LandUseRewriter,
            cursor.current()?,
            &self.context.names.non_ponded_area,
            "LUFLNP",
            submodel,
            &mut report,
        )?;
        cursor.replace(area.reference)?;

        cursor.advance(0)?;
        let budgets = usize::try_from(cursor.current_int()?).unwrap_or(0);
        // NBCROP, its crop codes, CLWUBUDFL and CRZBUDFL; then RZFRACFL,
        // FACT and one root depth per crop.
        cursor.advance(3 + budgets)?;
        cursor.advance(2)?;
        cursor.advance(crops)?;

        let listed = cursor.block_len();
        let mut kept = Vec::with_capacity(8);
        for _ in 0..4 {
            kept.push(cursor.filter_block(0, in_submodel)?);
        }
        for _ in 0..2 {
            kept.push(cursor.filter_block(1, in_submodel)?);
        }
        for _ in 0..2 {
            kept.push(cursor.filter_block(0, in_submodel)?);
        }
        let initial = filter_initial_conditions(&mut cursor, Some(listed), in_submodel)?;

        tracing::debug!(file = label, crops, listed, ?kept, initial, "filtered non-ponded crops");
        Ok(Rewritten::new(cursor.finish())
            .with_kept(kept[0])
            .with_report(report))
    }
}

#[cfg(test)]
mod tests {
    use super::NonPondedRewriter;
    use crate::domain::Submodel;
    use crate::files::SubmodelNames;
    use crate::geometry::BoundingPolygon;
    use crate::modules::traits::{RewriteContext, SubmodelRewriter};
    use tempfile::TempDir;

    const NPC_FIXTURE: &str = "C Non-ponded agricultural crops data file
C Number of crops
    2                                 / NCROP
    1                                  / FLDMD
C Crop codes
    GR         / CCODE[ 1]
    CO         / CCODE[ 2]
C Crop area file
                                                / LUFLNP
C Budget section
     1                                  / NBCROP
    GR                                 / BCCODE[ 1]
C Budget output files
                                                / CLWUBUDFL
                                                / CRZBUDFL
C Rooting depths
    RootZone\\RootDepthFracs.dat      / RZFRACFL
    1.0                                                     / FACT
C Root depths per crop
     1      4.0         1        / ROOTCP[ 1]
     2      4.0         2        / ROOTCP[ 2]
C Curve numbers
\t1\t60\t61
\t2\t62\t63
\t3\t64\t65
C Crop ETc
\t1\t1\t1
\t2\t1\t1
\t3\t1\t1
C Ag water supply requirement
\t1\t1\t1
\t2\t1\t1
\t3\t1\t1
C Irrigation periods
\t1\t1\t1
\t2\t1\t1
\t3\t1\t1
C Minimum soil moisture
    RootZone\\MinSoilMoisture.dat      / MINSMFL
\t1\t1\t1
\t2\t1\t1
\t3\t1\t1
C Target soil moisture
    RootZone\\TargetSoilMoisture.dat      / TRGSMFL
\t1\t1\t1
\t2\t1\t1
\t3\t1\t1
C Return flow fractions
\t1\t1\t1
\t2\t1\t1
\t3\t1\t1
C Reuse fractions
\t1\t1\t1
\t2\t1\t1
\t3\t1\t1
C Initial soil moisture conditions
\t1\t0.5\t0.20\t0.20
\t2\t0.5\t0.21\t0.21
\t3\t0.5\t0.22\t0.22
";

    fn rewrite(text: &str, elements: &[i64]) -> (Vec<String>, Option<usize>) {
        let temp = TempDir::new().expect("tempdir should be created");
        let names = SubmodelNames::new("Sub");
        let square = BoundingPolygon::from_ring([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let submodel = Submodel::new(elements.iter().copied(), [], [], square);
        let out = NonPondedRewriter::new(RewriteContext::new(temp.path(), temp.path(), &names))
            .rewrite_lines("NonPonded.dat", text.lines().map(str::to_string).collect(), &submodel)
            .expect("non-ponded fixture rewrites");
        (out.lines, out.kept)
    }

    #[test]
    fn every_element_block_is_filtered() {
        let (lines, kept) = rewrite(NPC_FIXTURE, &[1, 3]);
        assert_eq!(kept, Some(2));
        assert_eq!(lines.len(), NPC_FIXTURE.lines().count() - 9);
        assert!(!lines.iter().any(|line| line.starts_with("\t2\t")));
        assert!(lines.iter().any(|line| line.ends_with("/ MINSMFL")));
        assert!(lines.iter().any(|line| line.ends_with("/ TRGSMFL")));
        assert_eq!(lines.last().map(String::as_str), Some("\t3\t0.5\t0.22\t0.22"));
    }

    #[test]
    fn uniform_initial_conditions_are_copied() {
        let text = NPC_FIXTURE.replace(
            "\t1\t0.5\t0.20\t0.20\n\t2\t0.5\t0.21\t0.21\n\t3\t0.5\t0.22\t0.22\n",
            "\t0\t0.5\t0.20\t0.20\n",
        );
        let (lines, _) = rewrite(&text, &[1]);
        assert_eq!(lines.last().map(String::as_str), Some("\t0\t0.5\t0.20\t0.20"));
    }

    #[test]
    fn second_pass_is_byte_identical() {
        let (once, _) = rewrite(NPC_FIXTURE, &[2]);
        let (twice, _) = rewrite(&once.join("\n"), &[2]);
        assert_eq!(once, twice);
    }
}
