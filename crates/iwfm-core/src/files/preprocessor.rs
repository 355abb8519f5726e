use super::{SubmodelNames, main_reference, required_reference};
use crate::domain::{IwfmResult, ParserResult};
use crate::modules::helpers::{parent_dir, read_lines, resolve_reference, write_lines};
use crate::parser::{LineCursor, reference_name};
use std::path::{Path, PathBuf};

const ROLE: &str = "preprocessor main file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocFiles {
    pub source: PathBuf,
    pub preout: PathBuf,
    pub elements: PathBuf,
    pub nodes: PathBuf,
    pub stratigraphy: PathBuf,
    pub streams: PathBuf,
    pub lake: Option<PathBuf>,
}

impl PreprocFiles {
    pub fn read(path: &Path) -> IwfmResult<Self> {
        let lines = read_lines(path, ROLE)?;
        let label = path.display().to_string();
        Self::parse(&label, lines, path)
    }

    pub fn parse(label: &str, lines: Vec<String>, source: &Path) -> ParserResult<Self> {
        let base = parent_dir(source);
        let mut cursor = LineCursor::new(label, lines);
        cursor.advance(3)?;

        let next_path = |cursor: &mut LineCursor, tag: &str| -> ParserResult<PathBuf> {
            let name = required_reference(cursor, tag)?;
            cursor.next_record(0)?;
            Ok(resolve_reference(&base, &name))
        };

        let preout = next_path(&mut cursor, "PREOUT")?;
        let elements = next_path(&mut cursor, "ELEMFL")?;
        let nodes = next_path(&mut cursor, "NODEFL")?;
        let stratigraphy = next_path(&mut cursor, "STRATFL")?;
        let streams = next_path(&mut cursor, "STREAMFL")?;
        let lake = reference_name(cursor.current()?).map(|name| resolve_reference(&base, name));

        Ok(Self {
            source: source.to_path_buf(),
            preout,
            elements,
            nodes,
            stratigraphy,
            streams,
            lake,
        })
    }
}

/// Point the preprocessor main file at the submodel files.
pub fn rewrite_pp_lines(
    label: &str,
    lines: Vec<String>,
    names: &SubmodelNames,
    has_lake: bool,
) -> ParserResult<Vec<String>> {
    let mut cursor = LineCursor::new(label, lines);
    cursor.advance(3)?;

    let references = [
        Some(names.preout.as_str()),
        Some(names.elements.as_str()),
        Some(names.nodes.as_str()),
        Some(names.stratigraphy.as_str()),
        Some(names.stream_spec.as_str()),
        has_lake.then_some(names.lake_config.as_str()),
    ];
    let last = references.len() - 1;
    for (index, new_name) in references.into_iter().enumerate() {
        let line = main_reference(cursor.current()?, new_name);
        cursor.replace(line)?;
        if index < last {
            cursor.advance(0)?;
        }
    }
    Ok(cursor.finish())
}

pub fn sub_pp_file(
    old: &Path,
    new: &Path,
    names: &SubmodelNames,
    has_lake: bool,
) -> IwfmResult<()> {
    let lines = read_lines(old, ROLE)?;
    let label = old.display().to_string();
    let lines = rewrite_pp_lines(&label, lines, names, has_lake)?;
    write_lines(new, &lines, ROLE)?;
    tracing::info!(output = %new.display(), has_lake, "wrote submodel preprocessor main file");
    Ok(())
}
