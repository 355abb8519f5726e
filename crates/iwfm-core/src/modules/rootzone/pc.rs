use super::{LandUseRewriter, filter_initial_conditions};
use crate::domain::{ExtractionReport, RewriteResult, Submodel};
use crate::modules::traits::{RewriteContext, Rewritten, SubmodelRewriter};
use crate::parser::LineCursor;

/// Rice (flooded, non-flooded, non-decomposed) and refuge (seasonal,
/// permanent) crops.
const PONDED_CROPS: usize = 5;

/// PNDEPTHFL and OPFL precede the ponding depths.
const DEPTH_FILES: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct PondedRewriter<'a> {
    context: RewriteContext<'a>,
}

impl<'a> PondedRewriter<'a> {
    pub fn new(context: RewriteContext<'a>) -> Self {
        Self { context }
    }
}

impl SubmodelRewriter for PondedRewriter<'_> {
    fn role(&self) -> &'static str {
        "ponded crop file"
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
        let area = self.context.rewrite_nested(
            &LandUseRewriter,
            cursor.current()?,
            &self.context.names.ponded_area,
            "LUFLP",
            submodel,
            &mut report,
        )?;
        cursor.replace(area.reference)?;

        cursor.advance(0)?;
        let budgets = usize::try_from(cursor.current_int()?).unwrap_or(0);
        // NBCROP, its crop codes, CLWUBUDFL and CRZBUDFL, then FACT and the
        // root depths.
        cursor.advance(3 + budgets)?;
        cursor.advance(1 + PONDED_CROPS)?;

        // Curve numbers, ETc, water supply requirement, irrigation periods.
        let kept = cursor.filter_block(0, in_submodel)?;
        for _ in 0..3 {
            cursor.filter_block(0, in_submodel)?;
        }
        // Ponding, application, return flow and re-use depths.
        cursor.filter_block(DEPTH_FILES, in_submodel)?;
        for _ in 0..3 {
            cursor.filter_block(0, in_submodel)?;
        }
        let initial = filter_initial_conditions(&mut cursor, None, in_submodel)?;

        tracing::debug!(file = label, kept, initial, "filtered ponded crops");
        Ok(Rewritten::new(cursor.finish())
            .with_kept(kept)
            .with_report(report))
    }
}

#[cfg(test)]
mod tests {
    use super::PondedRewriter;
    use crate::domain::Submodel;
    use crate::files::SubmodelNames;
    use crate::geometry::BoundingPolygon;
    use crate::modules::traits::{RewriteContext, SubmodelRewriter};
    use tempfile::TempDir;

    const PC_FIXTURE: &str = "C Rice and refuge lands data file
C Ponded crop area file
                                                / LUFLP
C Budget section
     2                                  / NBCROP
    RI_FL                        / BCCODE[ 1]
    RF_SL                        / BCCODE[ 2]
C Budget output files
                                                / CLWUBUDFL
                                                / CRZBUDFL
C Rooting depths
    1.0                   / FACT
    2.0                   / ROOTRI_NFL
    2.0                   / ROOTRI_FL
    2.0                   / ROOTRI_NDC
    2.0                   / ROOTRF_SL
    2.0                   / ROOTRF_PR
C Curve Numbers
\t1\t70\t70\t70\t70\t70
\t2\t71\t71\t71\t71\t71
C ETc columns
\t1\t1\t2\t3\t4\t5
\t2\t1\t2\t3\t4\t5
C Water supply requirement
\t1\t0\t0\t0\t0\t0
\t2\t0\t0\t0\t0\t0
C Irrigation periods
\t1\t1\t1\t1\t1\t1
\t2\t1\t1\t1\t1\t1
C Ponding depths
    RootZone\\PondedCrop_Depth.dat      / PNDEPTHFL
    RootZone\\PondedCrop_Operations.dat      / OPFL
\t1\t0.5\t0.5\t0.5\t0.5\t0.5
\t2\t0.5\t0.5\t0.5\t0.5\t0.5
C Application depths
\t1\t1.0\t1.0\t1.0\t1.0\t1.0
\t2\t1.0\t1.0\t1.0\t1.0\t1.0
C Return flow depths
\t1\t0.1\t0.1\t0.1\t0.1\t0.1
\t2\t0.1\t0.1\t0.1\t0.1\t0.1
C Re-use flow depths
\t1\t0.0\t0.0\t0.0\t0.0\t0.0
\t2\t0.0\t0.0\t0.0\t0.0\t0.0
C Initial Soil Moisture Conditions
\t1\t0.5\t0.2\t0.2\t0.2\t0.2\t0.2
\t2\t0.5\t0.3\t0.3\t0.3\t0.3\t0.3
";

    #[test]
    fn all_nine_element_sections_are_filtered() {
        let temp = TempDir::new().expect("tempdir should be created");
        let names = SubmodelNames::new("Sub");
        let square = BoundingPolygon::from_ring([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let submodel = Submodel::new([2], [], [], square);
        let out = PondedRewriter::new(RewriteContext::new(temp.path(), temp.path(), &names))
            .rewrite_lines(
                "Ponded.dat",
                PC_FIXTURE.lines().map(str::to_string).collect(),
                &submodel,
            )
            .expect("ponded fixture rewrites");

        assert_eq!(out.kept, Some(1));
        assert_eq!(out.lines.len(), PC_FIXTURE.lines().count() - 9);
        assert!(!out.lines.iter().any(|line| line.starts_with("\t1\t")));
        assert!(out.lines.iter().any(|line| line.ends_with("/ OPFL")));
        assert_eq!(
            out.lines.last().map(String::as_str),
            Some("\t2\t0.5\t0.3\t0.3\t0.3\t0.3\t0.3")
        );
    }
}
