use crate::domain::{ElementPair, ElementRing, IdSet, ParserResult, RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, count_header, tokens};
use std::collections::BTreeMap;

/// Token holding the subregion (`IRGE`) of an element row.
const SUBREGION_TOKEN: usize = 5;

/// Element configuration file: `NE`, `NREGN`, `NREGN` subregion name rows
/// and `IE IDE1 IDE2 IDE3 IDE4 IRGE` element rows. Surviving elements take
/// the subregion assigned in the element pairs, and only those subregions
/// keep their name rows.
#[derive(Debug, Clone)]
pub struct PreprocElementRewriter {
    subregions: BTreeMap<i64, i64>,
}

impl PreprocElementRewriter {
    pub fn new(pairs: &[ElementPair]) -> Self {
        Self {
            subregions: pairs.iter().map(|pair| (pair.old, pair.subregion)).collect(),
        }
    }

    fn submodel_subregions(&self) -> IdSet {
        self.subregions.values().copied().collect()
    }
}

impl SubmodelRewriter for PreprocElementRewriter {
    fn role(&self) -> &'static str {
        "element configuration file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let mut cursor = LineCursor::new(label, lines);

        cursor.advance(0)?;
        let element_slot = cursor.slot();
        let element_header = cursor.current()?.to_string();
        cursor.next_record(0)?;
        let region_slot = cursor.slot();
        let region_header = cursor.current()?.to_string();
        let regions = usize::try_from(cursor.current_int()?).unwrap_or(0);
        cursor.next_record(0)?;

        let kept_regions = self.submodel_subregions();
        let regions_kept =
            cursor.filter_rows(0, regions, |region| kept_regions.contains(&region))?;
        cursor.set(region_slot, count_header(&region_header, regions_kept))?;

        cursor.advance(0)?;
        let mut kept = 0;
        while !cursor.at_block_end() {
            let element = cursor.current_int()?;
            let assigned = self
                .subregions
                .get(&element)
                .filter(|_| submodel.elements.contains(&element));
            let Some(subregion) = assigned else {
                cursor.drop_line()?;
                continue;
            };
            kept += 1;
            let current = cursor.current_value::<i64>(SUBREGION_TOKEN)?;
            if current == *subregion {
                cursor.keep()?;
            } else {
                let replacement = subregion.to_string();
                let mut fields = tokens(cursor.current()?);
                fields[SUBREGION_TOKEN] = &replacement;
                let row = format!("\t{}", fields.join("\t"));
                cursor.replace(row)?;
            }
        }
        cursor.set(element_slot, count_header(&element_header, kept))?;

        tracing::debug!(file = label, kept, regions_kept, "filtered elements");
        Ok(Rewritten::new(cursor.finish()).with_kept(kept))
    }
}

/// Element rings of the listed elements, in file order.
pub fn parse_element_rings(
    label: &str,
    lines: Vec<String>,
    elements: &IdSet,
) -> ParserResult<Vec<ElementRing>> {
    let mut cursor = LineCursor::new(label, lines);
    cursor.advance(1)?;
    let regions = usize::try_from(cursor.current_int()?).unwrap_or(0);
    cursor.advance(1 + regions)?;

    let mut rings = Vec::with_capacity(elements.len());
    while !cursor.at_block_end() {
        let element = cursor.current_int()?;
        if elements.contains(&element) {
            let mut nodes = Vec::with_capacity(4);
            for position in 1..=4 {
                nodes.push(cursor.current_value::<i64>(position)?);
            }
            rings.push(ElementRing::new(element, nodes));
        }
        cursor.keep()?;
    }
    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::{PreprocElementRewriter, parse_element_rings};
    use crate::domain::{ElementPair, IdSet, Submodel};
    use crate::geometry::BoundingPolygon;
    use crate::modules::traits::SubmodelRewriter;
    use crate::parser::leading_int;

    const ELEMENT_FIXTURE: &str = "C IWFM Element Configuration File
C*******************************************************************************
    5                          / NE
    2                            / NREGN
C Subregion Names
C  ID  RNAME
    1      Subregion 1             /RNAME1
    2      Subregion 2             /RNAME2
C Element Configuration Data
C  IE  IDE(1)  IDE(2)  IDE(3)  IDE(4)  IRGE
    1           1       8       9       5         1
    2           1       5       6       2         1
    3           2       6       7       3         1
    4           3       7       4       0         2
    5           5       9       10       6         2
";

    fn lines() -> Vec<String> {
        ELEMENT_FIXTURE.lines().map(str::to_string).collect()
    }

    fn pair(old: i64, new: i64, subregion: i64) -> ElementPair {
        ElementPair {
            old,
            new,
            subregion,
        }
    }

    #[test]
    fn elements_take_their_submodel_subregion() {
        let pairs = [pair(1, 1, 1), pair(2, 2, 1), pair(4, 3, 1)];
        let square = BoundingPolygon::from_ring([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let submodel = Submodel::new([1, 2, 4], [], [], square);
        let out = PreprocElementRewriter::new(&pairs)
            .rewrite_lines("Elements.dat", lines(), &submodel)
            .expect("element fixture rewrites");

        assert_eq!(out.kept, Some(3));
        assert_eq!(leading_int("out", 2, &out.lines[2]).expect("NE"), 3);
        assert_eq!(leading_int("out", 3, &out.lines[3]).expect("NREGN"), 1);
        assert!(!out.lines.iter().any(|line| line.contains("Subregion 2")));
        assert_eq!(out.lines.last().map(String::as_str), Some("\t4\t3\t7\t4\t0\t1"));
        assert_eq!(out.lines.len(), ELEMENT_FIXTURE.lines().count() - 3);
    }

    #[test]
    fn rings_are_read_for_listed_elements() {
        let listed: IdSet = [4, 5].into_iter().collect();
        let rings = parse_element_rings("Elements.dat", lines(), &listed).expect("rings parse");
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].ring(), vec![3, 7, 4]);
        assert_eq!(rings[1].nodes, vec![5, 9, 10, 6]);
    }
}
