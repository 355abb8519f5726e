//! Per-node layer geometry derived from stratigraphy records.

use crate::domain::{IwfmError, IwfmResult};
use crate::modules::helpers::read_lines;
use crate::parser::{LineCursor, leading_int, parse_token};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StratError {
    #[error(
        "stratigraphy record for node {node_id} has {count} thickness values, expected aquitard/aquifer pairs"
    )]
    OddThicknessCount { node_id: i64, count: usize },
    #[error("stratigraphy row has {len} values, expected a node id and an elevation at least")]
    ShortRow { len: usize },
    #[error("stratigraphy node id {value} is not an integer")]
    NodeId { value: f64 },
}

impl From<StratError> for IwfmError {
    fn from(error: StratError) -> Self {
        IwfmError::malformed_record("INPUT.STRAT_RECORD", error.to_string())
    }
}

/// Land-surface elevation followed by alternating aquitard and aquifer
/// thicknesses, top layer first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StratRecord {
    pub node_id: i64,
    pub elevation: f64,
    pub thicknesses: Vec<f64>,
}

impl StratRecord {
    pub fn new(node_id: i64, elevation: f64, thicknesses: impl Into<Vec<f64>>) -> Self {
        Self {
            node_id,
            elevation,
            thicknesses: thicknesses.into(),
        }
    }

    /// Build from a flat `[node, elevation, t1, t2, ...]` row.
    pub fn from_row(row: &[f64]) -> Result<Self, StratError> {
        let [node, elevation, rest @ ..] = row else {
            return Err(StratError::ShortRow { len: row.len() });
        };
        let record = Self::new(node_id_from(*node)?, *elevation, rest.to_vec());
        record.num_layers()?;
        Ok(record)
    }

    pub fn num_layers(&self) -> Result<usize, StratError> {
        if self.thicknesses.len() % 2 != 0 {
            return Err(StratError::OddThicknessCount {
                node_id: self.node_id,
                count: self.thicknesses.len(),
            });
        }
        Ok(self.thicknesses.len() / 2)
    }
}

fn node_id_from(value: f64) -> Result<i64, StratError> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    if value.fract() != 0.0 || !in_range {
        return Err(StratError::NodeId { value });
    }
    Ok(value as i64)
}

/// Six parallel arrays indexed `[node][layer]`, in record order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StratArrays {
    pub aquitard_thickness: Vec<Vec<f64>>,
    pub aquifer_thickness: Vec<Vec<f64>>,
    pub aquitard_top: Vec<Vec<f64>>,
    pub aquitard_bottom: Vec<Vec<f64>>,
    pub aquifer_top: Vec<Vec<f64>>,
    pub aquifer_bottom: Vec<Vec<f64>>,
}

pub fn strat_arrays(records: &[StratRecord]) -> Result<StratArrays, StratError> {
    let mut arrays = StratArrays::default();
    for record in records {
        let layers = record.num_layers()?;
        let mut aquitard_thickness = Vec::with_capacity(layers);
        let mut aquifer_thickness = Vec::with_capacity(layers);
        let mut aquitard_top = Vec::with_capacity(layers);
        let mut aquitard_bottom = Vec::with_capacity(layers);
        let mut aquifer_top = Vec::with_capacity(layers);
        let mut aquifer_bottom = Vec::with_capacity(layers);

        let mut top = record.elevation;
        for pair in record.thicknesses.chunks_exact(2) {
            let (aquitard, aquifer) = (pair[0], pair[1]);
            let aquitard_base = top - aquitard;
            let aquifer_base = aquitard_base - aquifer;

            aquitard_thickness.push(aquitard);
            aquifer_thickness.push(aquifer);
            aquitard_top.push(top);
            aquitard_bottom.push(aquitard_base);
            aquifer_top.push(aquitard_base);
            aquifer_bottom.push(aquifer_base);
            top = aquifer_base;
        }

        arrays.aquitard_thickness.push(aquitard_thickness);
        arrays.aquifer_thickness.push(aquifer_thickness);
        arrays.aquitard_top.push(aquitard_top);
        arrays.aquitard_bottom.push(aquitard_bottom);
        arrays.aquifer_top.push(aquifer_top);
        arrays.aquifer_bottom.push(aquifer_bottom);
    }
    Ok(arrays)
}

pub fn aquitard_thickness(records: &[StratRecord]) -> Result<Vec<Vec<f64>>, StratError> {
    Ok(strat_arrays(records)?.aquitard_thickness)
}

pub fn aquifer_thickness(records: &[StratRecord]) -> Result<Vec<Vec<f64>>, StratError> {
    Ok(strat_arrays(records)?.aquifer_thickness)
}

pub fn aquitard_top(records: &[StratRecord]) -> Result<Vec<Vec<f64>>, StratError> {
    Ok(strat_arrays(records)?.aquitard_top)
}

pub fn aquitard_bottom(records: &[StratRecord]) -> Result<Vec<Vec<f64>>, StratError> {
    Ok(strat_arrays(records)?.aquitard_bottom)
}

pub fn aquifer_top(records: &[StratRecord]) -> Result<Vec<Vec<f64>>, StratError> {
    Ok(strat_arrays(records)?.aquifer_top)
}

pub fn aquifer_bottom(records: &[StratRecord]) -> Result<Vec<Vec<f64>>, StratError> {
    Ok(strat_arrays(records)?.aquifer_bottom)
}

/// Parse a stratigraphy file: `NL`, `FACT`, then one `ID ELV W...` row per
/// node. `FACT` scales the elevation and every thickness.
pub fn parse_strat_lines(label: &str, lines: Vec<String>) -> IwfmResult<Vec<StratRecord>> {
    let mut cursor = LineCursor::new(label, lines);
    cursor.advance(0)?;
    let layers = usize::try_from(cursor.current_int()?).map_err(|_| {
        IwfmError::malformed_record(
            "INPUT.STRAT_RECORD",
            format!("{}: layer count NL must be non-negative", label),
        )
    })?;
    cursor.next_record(0)?;
    let factor: f64 = cursor.current_value(0)?;
    cursor.next_record(0)?;

    let mut records = Vec::new();
    while !cursor.at_block_end() {
        let index = cursor.pos();
        let line = cursor.current()?;
        let node_id = leading_int(label, index, line)?;
        let mut values = Vec::with_capacity(1 + 2 * layers);
        for position in 1..=(1 + 2 * layers) {
            let value: f64 = parse_token(label, index, line, position)?;
            values.push(value * factor);
        }
        records.push(StratRecord::new(node_id, values[0], values[1..].to_vec()));
        cursor.keep()?;
    }
    tracing::debug!(file = label, nodes = records.len(), layers, "parsed stratigraphy");
    Ok(records)
}

pub fn read_strat_file(path: &Path) -> IwfmResult<Vec<StratRecord>> {
    let label = path.display().to_string();
    parse_strat_lines(&label, read_lines(path, "stratigraphy file")?)
}
