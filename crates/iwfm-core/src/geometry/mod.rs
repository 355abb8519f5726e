//! Submodel boundary construction and the spatial predicates used by the
//! hydrograph, well and subsidence filters.

use crate::domain::{ElementRing, IwfmError, NodeCoord};
use geo::{BooleanOps, Contains, Coord, LineString, MultiPolygon, Point, Polygon};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("element {element} references node {node} which has no coordinates")]
    UnknownNode { element: i64, node: i64 },
    #[error("element {element} has {distinct} distinct non-zero nodes, at least 3 are required")]
    TooFewVertices { element: i64, distinct: usize },
    #[error("submodel boundary requires at least one element")]
    EmptyUnion,
    #[error("element union is disconnected into {parts} parts")]
    Disconnected { parts: usize },
}

impl From<GeometryError> for IwfmError {
    fn from(error: GeometryError) -> Self {
        let message = error.to_string();
        match error {
            GeometryError::UnknownNode { .. } => {
                IwfmError::malformed_record("INPUT.UNKNOWN_NODE", message)
            }
            GeometryError::TooFewVertices { .. }
            | GeometryError::EmptyUnion
            | GeometryError::Disconnected { .. } => {
                IwfmError::geometry_degenerate("RUN.BOUNDING_POLYGON", message)
            }
        }
    }
}

/// Outer boundary of the submodel footprint. Interior rings of the union are
/// discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingPolygon {
    polygon: Polygon<f64>,
}

impl BoundingPolygon {
    pub fn from_ring(vertices: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let exterior: LineString<f64> = vertices
            .into_iter()
            .map(|(x, y)| Coord { x, y })
            .collect::<Vec<_>>()
            .into();
        Self {
            polygon: Polygon::new(exterior, Vec::new()),
        }
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Closed exterior ring, first vertex repeated at the end.
    pub fn exterior(&self) -> Vec<(f64, f64)> {
        self.polygon
            .exterior()
            .coords()
            .map(|coord| (coord.x, coord.y))
            .collect()
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.polygon.contains(&Point::new(x, y))
    }
}

/// Union of every element footprint, reduced to its single outer ring.
pub fn bounding_polygon(
    elements: &[ElementRing],
    node_coords: &[NodeCoord],
) -> Result<BoundingPolygon, GeometryError> {
    let coords = coordinate_lookup(node_coords);

    let mut parts = Vec::with_capacity(elements.len());
    for element in elements {
        let ring = element_ring_coords(element, &coords)?;
        let distinct: BTreeSet<i64> = element.ring().into_iter().collect();
        if distinct.len() < 3 {
            return Err(GeometryError::TooFewVertices {
                element: element.id,
                distinct: distinct.len(),
            });
        }
        let exterior: LineString<f64> = ring
            .into_iter()
            .map(|(x, y)| Coord { x, y })
            .collect::<Vec<_>>()
            .into();
        parts.push(MultiPolygon::new(vec![Polygon::new(exterior, Vec::new())]));
    }

    // Pairwise reduction keeps intermediate unions small on large element sets.
    while parts.len() > 1 {
        parts = parts
            .chunks(2)
            .map(|pair| {
                pair.iter()
                    .skip(1)
                    .fold(pair[0].clone(), |merged, next| merged.union(next))
            })
            .collect();
    }

    let union = parts.pop().ok_or(GeometryError::EmptyUnion)?;
    let mut polygons = union.0;
    match polygons.len() {
        0 => Err(GeometryError::EmptyUnion),
        1 => {
            let outer = polygons.remove(0);
            let (exterior, _) = outer.into_inner();
            Ok(BoundingPolygon {
                polygon: Polygon::new(exterior, Vec::new()),
            })
        }
        parts => Err(GeometryError::Disconnected { parts }),
    }
}

/// Boundary-exclusive: a point on an edge or vertex is outside.
pub fn point_in_polygon(polygon: &BoundingPolygon, x: f64, y: f64) -> bool {
    polygon.contains(x, y)
}

/// Plain vertex mean, not the area-weighted centroid.
pub fn centroid(ring: &[(f64, f64)]) -> Option<(f64, f64)> {
    if ring.is_empty() {
        return None;
    }
    let count = ring.len() as f64;
    let (sum_x, sum_y) = ring
        .iter()
        .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
    Some((sum_x / count, sum_y / count))
}

pub fn element_centroids(
    elements: &[ElementRing],
    node_coords: &[NodeCoord],
) -> Result<BTreeMap<i64, (f64, f64)>, GeometryError> {
    let coords = coordinate_lookup(node_coords);
    let mut centroids = BTreeMap::new();
    for element in elements {
        let ring = element_ring_coords(element, &coords)?;
        if let Some(center) = centroid(&ring) {
            centroids.insert(element.id, center);
        }
    }
    Ok(centroids)
}

fn coordinate_lookup(node_coords: &[NodeCoord]) -> HashMap<i64, (f64, f64)> {
    node_coords
        .iter()
        .map(|node| (node.id, (node.x, node.y)))
        .collect()
}

fn element_ring_coords(
    element: &ElementRing,
    coords: &HashMap<i64, (f64, f64)>,
) -> Result<Vec<(f64, f64)>, GeometryError> {
    element
        .ring()
        .into_iter()
        .map(|node| {
            coords
                .get(&node)
                .copied()
                .ok_or(GeometryError::UnknownNode {
                    element: element.id,
                    node,
                })
        })
        .collect()
}
