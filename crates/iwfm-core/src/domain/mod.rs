pub mod errors;

pub use errors::{
    ExitPlaceholder, IwfmError, IwfmErrorCategory, IwfmResult, ParserResult, RewriteResult,
};

use crate::geometry::BoundingPolygon;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Integer keys (node, element, stream-node or lake ids) defining a submodel.
pub type IdSet = BTreeSet<i64>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeCoord {
    pub id: i64,
    pub x: f64,
    pub y: f64,
}

impl NodeCoord {
    pub fn new(id: i64, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

/// Element configuration row: id plus the four vertex slots. A zero in the
/// last slot marks a triangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRing {
    pub id: i64,
    pub nodes: Vec<i64>,
}

impl ElementRing {
    pub fn new(id: i64, nodes: impl Into<Vec<i64>>) -> Self {
        Self {
            id,
            nodes: nodes.into(),
        }
    }

    /// Non-zero vertex ids in record order.
    pub fn ring(&self) -> Vec<i64> {
        self.nodes.iter().copied().filter(|node| *node != 0).collect()
    }
}

/// One row of the element pairs file: full-model element, submodel element,
/// submodel subregion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementPair {
    pub old: i64,
    pub new: i64,
    pub subregion: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LakeRecord {
    pub id: i64,
    pub outflow_type: String,
    pub destination: String,
    pub name: String,
    pub elements: Vec<i64>,
}

/// Read-only membership sets and boundary shared by every rewriter during
/// one extraction run.
#[derive(Debug, Clone)]
pub struct Submodel {
    pub elements: IdSet,
    pub nodes: IdSet,
    pub stream_nodes: IdSet,
    pub lakes: IdSet,
    pub boundary: BoundingPolygon,
}

impl Submodel {
    pub fn new(
        elements: impl IntoIterator<Item = i64>,
        nodes: impl IntoIterator<Item = i64>,
        stream_nodes: impl IntoIterator<Item = i64>,
        boundary: BoundingPolygon,
    ) -> Self {
        Self {
            elements: elements.into_iter().collect(),
            nodes: nodes.into_iter().collect(),
            stream_nodes: stream_nodes.into_iter().collect(),
            lakes: IdSet::new(),
            boundary,
        }
    }

    pub fn with_lakes(mut self, lakes: impl IntoIterator<Item = i64>) -> Self {
        self.lakes = lakes.into_iter().collect();
        self
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.boundary.contains(x, y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub role: String,
    pub source: PathBuf,
    pub output: PathBuf,
    pub kept: Option<usize>,
}

/// Files written by one extraction run, in write order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ExtractionReport {
    pub files: Vec<FileOutcome>,
}

impl ExtractionReport {
    pub fn record(
        &mut self,
        role: impl Into<String>,
        source: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        kept: Option<usize>,
    ) {
        self.files.push(FileOutcome {
            role: role.into(),
            source: source.into(),
            output: output.into(),
            kept,
        });
    }

    pub fn extend(&mut self, other: ExtractionReport) {
        self.files.extend(other.files);
    }

    pub fn outcome(&self, role: &str) -> Option<&FileOutcome> {
        self.files.iter().find(|outcome| outcome.role == role)
    }
}
