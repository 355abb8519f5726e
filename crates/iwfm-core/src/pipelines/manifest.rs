use crate::domain::{
    ElementPair, ElementRing, IdSet, IwfmError, IwfmResult, LakeRecord, NodeCoord, Submodel,
};
use crate::geometry::bounding_polygon;
use crate::modules::helpers::read_lines;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const ROLE: &str = "submodel manifest";

/// Membership data computed while extracting the preprocessor files and
/// needed again by the simulation extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmodelManifest {
    pub base: String,
    pub elements: Vec<ElementPair>,
    pub nodes: Vec<i64>,
    pub rings: Vec<ElementRing>,
    pub coords: Vec<NodeCoord>,
    /// Stream node to groundwater node over the whole model.
    pub stream_node_map: BTreeMap<i64, i64>,
    pub stream_nodes: Vec<i64>,
    pub lakes: Vec<LakeRecord>,
}

impl SubmodelManifest {
    pub fn element_ids(&self) -> IdSet {
        self.elements.iter().map(|pair| pair.old).collect()
    }

    /// Build the read-only membership sets and the boundary polygon.
    pub fn into_submodel(&self) -> IwfmResult<Submodel> {
        let boundary = bounding_polygon(&self.rings, &self.coords)?;
        Ok(Submodel::new(
            self.element_ids(),
            self.nodes.iter().copied(),
            self.stream_nodes.iter().copied(),
            boundary,
        )
        .with_lakes(self.lakes.iter().map(|lake| lake.id)))
    }

    pub fn load(path: &Path) -> IwfmResult<Self> {
        let text = read_lines(path, ROLE)?.join("\n");
        serde_json::from_str(&text).map_err(|source| {
            IwfmError::malformed_record(
                "INPUT.MANIFEST",
                format!("failed to parse {} '{}': {}", ROLE, path.display(), source),
            )
        })
    }

    pub fn save(&self, path: &Path) -> IwfmResult<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| {
                IwfmError::io_system(
                    "IO.OUTPUT_DIRECTORY",
                    format!("failed to create '{}': {}", parent.display(), source),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            IwfmError::internal(
                "SYS.MANIFEST_SERIALIZE",
                format!("failed to serialize {}: {}", ROLE, source),
            )
        })?;
        fs::write(path, json).map_err(|source| {
            IwfmError::io_system(
                "IO.OUTPUT_WRITE",
                format!("failed to write {} '{}': {}", ROLE, path.display(), source),
            )
        })?;
        tracing::info!(output = %path.display(), "wrote submodel manifest");
        Ok(())
    }
}
