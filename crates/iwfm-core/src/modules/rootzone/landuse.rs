use crate::domain::{IwfmError, RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, tokens};

/// FACTLN, NSPLU, NFQLU and DSSFL precede the area table.
const SPEC_LINES: usize = 4;

/// Land-use area time series. Each time step opens with a row
/// `DATE IE A1 A2 ...` followed by `IE A1 A2 ...` rows for the other
/// elements. When the dated row belongs to an element outside the submodel
/// the date moves onto the first surviving row of its step. A step with no
/// surviving element is an error, since dropping it would shorten the series.
#[derive(Debug, Clone, Copy, Default)]
pub struct LandUseRewriter;

impl SubmodelRewriter for LandUseRewriter {
    fn role(&self) -> &'static str {
        "land use area file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let mut cursor = LineCursor::new(label, lines);
        if !cursor.try_advance(SPEC_LINES) {
            return Ok(Rewritten::new(cursor.finish()).with_kept(0));
        }

        let mut pending_date: Option<String> = None;
        let mut steps = 0;
        let mut kept_first_step = 0;
        while !cursor.at_end() {
            if cursor.at_block_end() {
                cursor.keep()?;
                continue;
            }
            let line = cursor.current()?.to_string();
            let fields = tokens(&line);
            let dated = fields[0].parse::<i64>().is_err();
            if dated {
                if let Some(date) = pending_date.take() {
                    return Err(empty_step(label, &date));
                }
                steps += 1;
            }
            let (element_position, date) = if dated { (1, Some(fields[0])) } else { (0, None) };
            let element = cursor.current_value::<i64>(element_position)?;

            if !submodel.elements.contains(&element) {
                if let Some(date) = date {
                    pending_date = Some(date.to_string());
                }
                cursor.drop_line()?;
                continue;
            }

            if steps <= 1 {
                kept_first_step += 1;
            }
            match pending_date.take() {
                Some(date) => {
                    let values = fields[element_position..].join("\t");
                    cursor.replace(format!("{}\t{}", date, values))?;
                }
                None => cursor.keep()?,
            }
        }

        if let Some(date) = pending_date {
            return Err(empty_step(label, &date));
        }

        tracing::debug!(file = label, steps, kept = kept_first_step, "filtered land use areas");
        Ok(Rewritten::new(cursor.finish()).with_kept(kept_first_step))
    }
}

fn empty_step(label: &str, date: &str) -> IwfmError {
    IwfmError::invalid_argument(
        "INPUT.LAND_USE_STEP",
        format!("{}: no submodel element has land use areas for {}", label, date),
    )
}

#[cfg(test)]
mod tests {
    use super::LandUseRewriter;
    use crate::domain::{IwfmErrorCategory, Submodel};
    use crate::geometry::BoundingPolygon;
    use crate::modules::traits::SubmodelRewriter;

    const AREA_FIXTURE: &str = "C Land use areas
    43560.0                     / FACTLN
    1                           / NSPLU
    0                           / NFQLU
                                / DSSFL
C   DATE                IE   A1     A2
    09/30/1973_24:00    1    10.0   20.0
                        2    11.0   21.0
                        3    12.0   22.0
    09/30/1974_24:00    1    13.0   23.0
                        2    14.0   24.0
                        3    15.0   25.0
";

    fn rewrite(elements: &[i64], lines: Vec<String>) -> (Vec<String>, Option<usize>) {
        let square = BoundingPolygon::from_ring([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let submodel = Submodel::new(elements.iter().copied(), [], [], square);
        let out = LandUseRewriter
            .rewrite_lines("Area.dat", lines, &submodel)
            .expect("land use fixture rewrites");
        (out.lines, out.kept)
    }

    fn fixture() -> Vec<String> {
        AREA_FIXTURE.lines().map(str::to_string).collect()
    }

    #[test]
    fn date_moves_to_first_surviving_element() {
        let (lines, kept) = rewrite(&[2, 3], fixture());
        assert_eq!(kept, Some(2));
        assert_eq!(lines.len(), AREA_FIXTURE.lines().count() - 2);
        assert_eq!(lines[6], "09/30/1973_24:00\t2\t11.0\t21.0");
        assert_eq!(lines[7], "                        3    12.0   22.0");
        assert_eq!(lines[8], "09/30/1974_24:00\t2\t14.0\t24.0");
    }

    #[test]
    fn surviving_dated_rows_are_untouched() {
        let (lines, kept) = rewrite(&[1], fixture());
        assert_eq!(kept, Some(1));
        assert_eq!(lines[6], "    09/30/1973_24:00    1    10.0   20.0");
        assert_eq!(lines[7], "    09/30/1974_24:00    1    13.0   23.0");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn step_without_submodel_elements_is_rejected() {
        let text = AREA_FIXTURE.replace(
            "                        3    15.0   25.0\n",
            "",
        );
        let square = BoundingPolygon::from_ring([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let submodel = Submodel::new([3], [], [], square);
        let error = LandUseRewriter
            .rewrite_lines("Area.dat", text.lines().map(str::to_string).collect(), &submodel)
            .expect_err("second step has no element 3");
        assert_eq!(error.category(), IwfmErrorCategory::InvalidArgument);
        assert!(error.message().contains("09/30/1974_24:00"));
    }

    #[test]
    fn second_pass_changes_nothing() {
        let (once, _) = rewrite(&[3], fixture());
        let (twice, _) = rewrite(&[3], once.clone());
        assert_eq!(once, twice);
    }
}
