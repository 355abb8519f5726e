use crate::domain::{NodeCoord, ParserResult, RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, count_header};

/// Nodal coordinate file: `ND`, `FACT`, then `ID X Y` rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreprocNodeRewriter;

impl SubmodelRewriter for PreprocNodeRewriter {
    fn role(&self) -> &'static str {
        "node coordinate file"
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
        cursor.advance(2)?;
        let kept = cursor.filter_block(0, |node| submodel.nodes.contains(&node))?;
        cursor.set(slot, count_header(&header, kept))?;
        Ok(Rewritten::new(cursor.finish()).with_kept(kept))
    }
}

/// Node coordinates as written, without applying `FACT`.
pub fn parse_node_coords(label: &str, lines: Vec<String>) -> ParserResult<Vec<NodeCoord>> {
    let mut cursor = LineCursor::new(label, lines);
    cursor.advance(0)?;
    let declared = usize::try_from(cursor.current_int()?).unwrap_or(0);
    cursor.advance(2)?;

    let mut coords = Vec::with_capacity(declared);
    while !cursor.at_block_end() {
        coords.push(NodeCoord::new(
            cursor.current_int()?,
            cursor.current_value(1)?,
            cursor.current_value(2)?,
        ));
        cursor.keep()?;
    }
    if coords.len() != declared {
        tracing::warn!(file = label, declared, read = coords.len(), "node count differs from ND");
    }
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::{PreprocNodeRewriter, parse_node_coords};
    use crate::domain::{NodeCoord, Submodel};
    use crate::geometry::BoundingPolygon;
    use crate::modules::traits::SubmodelRewriter;
    use crate::parser::leading_int;

    const NODE_FIXTURE: &str = "C IWFM Nodal X-Y Coordinate File
C*******************************************************************************
    5                          /ND
    3.2808                        /FACT
C Node Coordinates Section
C    ID            X                 Y
      1        551396.4         4496226
      2        555618.8         4497861
      3        561555.5         4500441
      4        568374.3         4498058
      5        553186.9         4492706
";

    fn lines() -> Vec<String> {
        NODE_FIXTURE.lines().map(str::to_string).collect()
    }

    #[test]
    fn nodes_outside_the_submodel_are_removed() {
        let square = BoundingPolygon::from_ring([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let submodel = Submodel::new([], [1, 2, 3], [], square);
        let out = PreprocNodeRewriter
            .rewrite_lines("Nodes.dat", lines(), &submodel)
            .expect("node fixture rewrites");
        assert_eq!(out.kept, Some(3));
        assert_eq!(leading_int("out", 2, &out.lines[2]).expect("ND"), 3);
        assert_eq!(out.lines.len(), 9);
        assert!(!out.lines.iter().any(|line| line.contains("568374.3")));
    }

    #[test]
    fn coordinates_are_read_unscaled() {
        let coords = parse_node_coords("Nodes.dat", lines()).expect("coordinates parse");
        assert_eq!(coords.len(), 5);
        assert_eq!(coords[1], NodeCoord::new(2, 555618.8, 4497861.0));
    }
}
