use crate::domain::{IdSet, LakeRecord, ParserResult, RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, count_header, reference_tag};

/// Lake configuration file: `NLAKE`, then per lake a record
/// `ID TYPDST DST NELAKE IELAKE / name` followed by `NELAKE - 1` element
/// lines. Lake elements outside the submodel are removed and a lake without
/// any remaining element is dropped whole.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreprocLakeRewriter;

impl SubmodelRewriter for PreprocLakeRewriter {
    fn role(&self) -> &'static str {
        "lake configuration file"
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
        let declared = usize::try_from(cursor.current_int()?).unwrap_or(0);
        cursor.next_record(0)?;

        let mut kept = 0;
        for _ in 0..declared {
            cursor.advance(0)?;
            let lake = read_lake(&mut cursor)?;
            let elements: Vec<i64> = lake
                .elements
                .iter()
                .copied()
                .filter(|element| submodel.elements.contains(element))
                .collect();
            if elements.is_empty() {
                tracing::debug!(file = label, lake = lake.id, "lake has no submodel element");
                continue;
            }
            kept += 1;
            for line in lake_lines(&LakeRecord { elements, ..lake }) {
                cursor.emit(line);
            }
        }
        cursor.set(slot, count_header(&header, kept))?;

        tracing::debug!(file = label, declared, kept, "filtered lakes");
        Ok(Rewritten::new(cursor.finish()).with_kept(kept))
    }
}

/// Lakes keeping at least one of `elements`, with their element lists
/// reduced to those elements.
pub fn parse_lakes(label: &str, lines: Vec<String>, elements: &IdSet) -> ParserResult<Vec<LakeRecord>> {
    let mut cursor = LineCursor::new(label, lines);
    cursor.advance(0)?;
    let declared = usize::try_from(cursor.current_int()?).unwrap_or(0);
    cursor.next_record(0)?;

    let mut lakes = Vec::with_capacity(declared);
    for _ in 0..declared {
        cursor.advance(0)?;
        let mut lake = read_lake(&mut cursor)?;
        lake.elements.retain(|element| elements.contains(element));
        if !lake.elements.is_empty() {
            lakes.push(lake);
        }
    }
    Ok(lakes)
}

/// Consume one lake record and its element lines without copying them.
fn read_lake(cursor: &mut LineCursor) -> ParserResult<LakeRecord> {
    let line = cursor.current()?.to_string();
    let id = cursor.current_int()?;
    let outflow_type = cursor.current_value::<String>(1)?;
    let destination = cursor.current_value::<String>(2)?;
    let count = usize::try_from(cursor.current_value::<i64>(3)?).unwrap_or(0);
    let mut elements = vec![cursor.current_value::<i64>(4)?];
    let name = reference_tag(&line).to_string();
    cursor.drop_line()?;

    for _ in 1..count {
        cursor.advance(0)?;
        elements.push(cursor.current_int()?);
        cursor.drop_line()?;
    }
    Ok(LakeRecord {
        id,
        outflow_type,
        destination,
        name,
        elements,
    })
}

fn lake_lines(lake: &LakeRecord) -> Vec<String> {
    let mut lines = Vec::with_capacity(lake.elements.len());
    let mut record = format!(
        "      {}       {}          {}         {}            {}",
        lake.id,
        lake.outflow_type,
        lake.destination,
        lake.elements.len(),
        lake.elements[0]
    );
    if !lake.name.is_empty() {
        record.push_str(" / ");
        record.push_str(&lake.name);
    }
    lines.push(record);
    for element in &lake.elements[1..] {
        lines.push(format!("{:49}{}", "", element));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{PreprocLakeRewriter, parse_lakes};
    use crate::domain::{IdSet, Submodel};
    use crate::geometry::BoundingPolygon;
    use crate::modules::traits::{Rewritten, SubmodelRewriter};
    use crate::parser::leading_int;

    const LAKE_FIXTURE: &str = "C IWFM Lake Configuration Data File
C*******************************************************************************
     2                          / NLAKE
C Lake Data Section
C     ID    TYPDST      DST       NELAKE        IELAKE
      1       0          0         2            100 / Lake One
                                                 101
      2       1          5         3            200 / Lake Two
                                                 201
                                                 202
";

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    fn rewrite(elements: &[i64], text: &str) -> Rewritten {
        let square = BoundingPolygon::from_ring([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let submodel = Submodel::new(elements.iter().copied(), [], [], square);
        PreprocLakeRewriter
            .rewrite_lines("Lake.dat", lines(text), &submodel)
            .expect("lake fixture rewrites")
    }

    #[test]
    fn lakes_shrink_to_submodel_elements() {
        let out = rewrite(&[101, 201, 202], LAKE_FIXTURE);
        assert_eq!(out.kept, Some(2));
        assert_eq!(out.lines[5], "      1       0          0         1            101 / Lake One");
        assert_eq!(out.lines[6], "      2       1          5         2            201 / Lake Two");
        assert_eq!(out.lines[7].trim(), "202");
        assert_eq!(out.lines.len(), 8);
    }

    #[test]
    fn lake_without_elements_is_dropped() {
        let out = rewrite(&[100], LAKE_FIXTURE);
        assert_eq!(out.kept, Some(1));
        assert_eq!(leading_int("out", 2, &out.lines[2]).expect("NLAKE"), 1);
        assert!(!out.lines.iter().any(|line| line.contains("Lake Two")));

        let again = rewrite(&[100], &out.lines.join("\n"));
        assert_eq!(again.lines, out.lines);
    }

    #[test]
    fn parsed_lakes_keep_names_and_destinations() {
        let elements: IdSet = [200, 202].into_iter().collect();
        let lakes = parse_lakes("Lake.dat", lines(LAKE_FIXTURE), &elements).expect("lakes parse");
        assert_eq!(lakes.len(), 1);
        assert_eq!(lakes[0].id, 2);
        assert_eq!(lakes[0].destination, "5");
        assert_eq!(lakes[0].name, "Lake Two");
        assert_eq!(lakes[0].elements, vec![200, 202]);
    }
}
