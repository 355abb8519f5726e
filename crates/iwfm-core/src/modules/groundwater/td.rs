use crate::domain::{IdSet, RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, count_header};

/// Tile drains, subsurface irrigation and tile drain hydrographs. Drains and
/// irrigation points are kept by groundwater node (second column);
/// hydrographs follow the drains that survived.
#[derive(Debug, Clone, Copy, Default)]
pub struct TileDrainRewriter;

impl SubmodelRewriter for TileDrainRewriter {
    fn role(&self) -> &'static str {
        "tile drain file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let mut cursor = LineCursor::new(label, lines);

        cursor.advance(0)?;
        let drain_slot = cursor.slot();
        let drain_header = cursor.current()?.to_string();
        let drains = count(&cursor)?;
        cursor.advance(4)?;

        let mut drain_nodes = IdSet::new();
        let mut kept_drains = 0;
        for _ in 0..drains {
            if cursor.at_block_end() {
                break;
            }
            let node = cursor.current_value::<i64>(1)?;
            if submodel.nodes.contains(&node) {
                drain_nodes.insert(node);
                cursor.keep()?;
                kept_drains += 1;
            } else {
                cursor.drop_line()?;
            }
        }
        cursor.advance(0)?;
        cursor.set(drain_slot, count_header(&drain_header, kept_drains))?;

        let irrigation_slot = cursor.slot();
        let irrigation_header = cursor.current()?.to_string();
        let irrigation = count(&cursor)?;
        cursor.next_record(3)?;
        let kept_irrigation =
            cursor.filter_rows(1, irrigation, |node| submodel.nodes.contains(&node))?;
        cursor.set(irrigation_slot, count_header(&irrigation_header, kept_irrigation))?;

        if cursor.try_advance(0) {
            let hydrograph_slot = cursor.slot();
            let hydrograph_header = cursor.current()?.to_string();
            let hydrographs = count(&cursor)?;
            if cursor.try_advance(4) {
                let kept = cursor.filter_rows(1, hydrographs, |node| drain_nodes.contains(&node))?;
                cursor.set(hydrograph_slot, count_header(&hydrograph_header, kept))?;
            }
        }

        tracing::debug!(
            file = label,
            drains,
            kept_drains,
            irrigation,
            kept_irrigation,
            "filtered tile drains"
        );
        Ok(Rewritten::new(cursor.finish()).with_kept(kept_drains))
    }
}

fn count(cursor: &LineCursor) -> RewriteResult<usize> {
    Ok(usize::try_from(cursor.current_int()?).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::TileDrainRewriter;
    use crate::domain::Submodel;
    use crate::geometry::BoundingPolygon;
    use crate::modules::traits::SubmodelRewriter;
    use crate::parser::leading_int;

    const TD_FIXTURE: &str = "C Tile drain file
    3                       / NTD
    1.0                     / FACTH
    1.0                     / FACTCDC
    1MON                    / TUNITDR
C   ID   IRN   ELEV   CDC   ISTRM   TYPDST  DST
    1    10    50.0   1.0   0       0       0
    2    20    50.0   1.0   0       0       0
    3    30    50.0   1.0   0       0       0
C subsurface irrigation
    2                       / NSI
    1.0                     / FACTH
    1.0                     / FACTCDC
    1MON                    / TUNITSI
C   ID   IRN   ELEV   CDC
    1    20    40.0   1.0
    2    40    40.0   1.0
C hydrographs
    2                       / NOUTTD
    1.0                     / FACTVLOU
    ac.ft.                  / UNITVLOU
    TD_Hyd.out              / TDOUTFL
C   ID   IDTYP   NAME
    1    10      drain_a
    2    30      drain_c
";

    fn rewrite(nodes: &[i64]) -> (Vec<String>, Option<usize>) {
        let square = BoundingPolygon::from_ring([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let submodel = Submodel::new([], nodes.iter().copied(), [], square);
        let out = TileDrainRewriter
            .rewrite_lines("TD.dat", TD_FIXTURE.lines().map(str::to_string).collect(), &submodel)
            .expect("tile drain fixture rewrites");
        (out.lines, out.kept)
    }

    fn header(lines: &[String], tag: &str) -> i64 {
        let line = lines
            .iter()
            .find(|line| line.ends_with(tag))
            .expect("header present");
        leading_int("out", 0, line).expect("integer header")
    }

    #[test]
    fn sections_follow_node_membership() {
        let (lines, kept) = rewrite(&[10, 20]);
        assert_eq!(kept, Some(2));
        assert_eq!(header(&lines, "/ NTD"), 2);
        assert_eq!(header(&lines, "/ NSI"), 1);
        assert_eq!(header(&lines, "/ NOUTTD"), 1);
        assert!(lines.iter().any(|line| line.contains("drain_a")));
        assert!(!lines.iter().any(|line| line.contains("drain_c")));
        assert!(!lines.iter().any(|line| line.starts_with("    2    40")));
    }

    #[test]
    fn no_drains_reports_zero() {
        let (lines, kept) = rewrite(&[99]);
        assert_eq!(kept, Some(0));
        assert_eq!(header(&lines, "/ NTD"), 0);
        assert_eq!(header(&lines, "/ NOUTTD"), 0);
        assert!(lines.iter().any(|line| line.contains("TD_Hyd.out")));
    }
}
