use super::{SubmodelNames, main_reference, required_reference};
use crate::domain::{IwfmResult, ParserResult};
use crate::modules::helpers::{parent_dir, read_lines, resolve_reference, write_lines};
use crate::parser::{LineCursor, reference_name};
use std::path::{Path, PathBuf};

const ROLE: &str = "simulation main file";

/// Files and run settings named by a simulation main file. Paths are
/// resolved against the directory holding that file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimFiles {
    pub source: PathBuf,
    pub preout: PathBuf,
    pub groundwater: PathBuf,
    pub streams: PathBuf,
    pub lake: Option<PathBuf>,
    pub rootzone: PathBuf,
    pub small_watersheds: PathBuf,
    pub unsat: PathBuf,
    pub irrigation_fractions: PathBuf,
    pub supply_adjustment: PathBuf,
    pub precipitation: PathBuf,
    pub evapotranspiration: PathBuf,
    pub begin_date: String,
    pub time_step: String,
    pub end_date: String,
}

impl SimFiles {
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
        let groundwater = next_path(&mut cursor, "GWMAINFL")?;
        let streams = next_path(&mut cursor, "STRMAINFL")?;
        let lake = reference_name(cursor.current()?).map(|name| resolve_reference(&base, name));
        cursor.next_record(0)?;
        let rootzone = next_path(&mut cursor, "RZMAINFL")?;
        let small_watersheds = next_path(&mut cursor, "SWSHEDFL")?;
        let unsat = next_path(&mut cursor, "UNSATFL")?;
        let irrigation_fractions = next_path(&mut cursor, "IRFRACFL")?;
        let supply_adjustment = next_path(&mut cursor, "SUPPLYADJFL")?;
        let precipitation = next_path(&mut cursor, "PRECIPFL")?;
        let evapotranspiration = next_path(&mut cursor, "ETFL")?;

        let begin_date = cursor.current_value::<String>(0)?;
        // Restart option sits between the start date and the time step.
        cursor.next_record(1)?;
        let time_step = cursor.current_value::<String>(0)?;
        cursor.next_record(0)?;
        let end_date = cursor.current_value::<String>(0)?;

        Ok(Self {
            source: source.to_path_buf(),
            preout,
            groundwater,
            streams,
            lake,
            rootzone,
            small_watersheds,
            unsat,
            irrigation_fractions,
            supply_adjustment,
            precipitation,
            evapotranspiration,
            begin_date,
            time_step,
            end_date,
        })
    }

    pub fn base_dir(&self) -> PathBuf {
        parent_dir(&self.source)
    }
}

/// Point the component references of a simulation main file at the
/// submodel names. The lake reference is blanked when the submodel has no
/// lake.
pub fn rewrite_sim_lines(
    label: &str,
    lines: Vec<String>,
    names: &SubmodelNames,
    has_lake: bool,
) -> ParserResult<Vec<String>> {
    let mut cursor = LineCursor::new(label, lines);
    cursor.advance(3)?;

    let lake_name = has_lake.then_some(names.lakes.as_str());
    let references = [
        Some(names.preout.as_str()),
        Some(names.groundwater.as_str()),
        Some(names.streams.as_str()),
        lake_name,
        Some(names.rootzone.as_str()),
        Some(names.small_watersheds.as_str()),
        Some(names.unsat.as_str()),
    ];
    for (index, new_name) in references.into_iter().enumerate() {
        let line = main_reference(cursor.current()?, new_name);
        cursor.replace(line)?;
        if index + 1 < references.len() {
            cursor.advance(0)?;
        }
    }
    Ok(cursor.finish())
}

pub fn sub_sim_file(
    old: &Path,
    new: &Path,
    names: &SubmodelNames,
    has_lake: bool,
) -> IwfmResult<()> {
    let lines = read_lines(old, ROLE)?;
    let label = old.display().to_string();
    let lines = rewrite_sim_lines(&label, lines, names, has_lake)?;
    write_lines(new, &lines, ROLE)?;
    tracing::info!(output = %new.display(), has_lake, "wrote submodel simulation main file");
    Ok(())
}
