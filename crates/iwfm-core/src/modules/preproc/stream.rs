//! Stream specification file of the preprocessor, version 4.2.
//!
//! The reach section is regenerated from the parsed reaches with standard
//! comment headers. Rating tables are kept per surviving stream node, and
//! the rating factors and the stream-aquifer section are copied as read.

use crate::domain::{IdSet, IwfmError, ParserResult, RewriteResult, Submodel};
use crate::modules::traits::{Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, count_header, tokens};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SUPPORTED_VERSION: &str = "4.2";

/// FACTLT, FACTQ and TUNIT ahead of the rating tables.
const RATING_FACTORS: usize = 3;

const SEPARATOR: &str =
    "C-------------------------------------------------------------------------------";

const REACHES_HEADER: [&str; 24] = [
    "C*******************************************************************************",
    "C                      Description of Stream Reaches",
    "C",
    "C   The following lists the stream nodes and corresponding groundwater",
    "C   nodes for each stream reach modeled in IWFM.",
    "C",
    "C   ID;    Reach number",
    "C   IBUR;  First upstream stream node of the reach",
    "C   IBDR;  Last downstream node of the reach",
    "C   IDWN;  Stream node into which the reach flows into",
    "C              0: If stream flow leaves the modeled area",
    "C           -nlk: If stream flows into lake number nlk",
    "C   NAME;  Name of the reach (maximum 20 characters)",
    "C",
    "C   In addition, for each stream node within the reach the corresponding",
    "C   groundwater nodes is listed.",
    "C",
    "C   IRV;   Stream node",
    "C   IGW;   Corresponding groundwater node(s) (can be more than one for wide streams)",
    "C           * Note: For wide streams with more than one corresponding groundwater nodes,",
    "C                    the groundwater node that is closest to the middle of the channel",
    "C                    cross-section must be listed first.",
    "C",
    SEPARATOR,
];

const REACH_HEADER: [&str; 4] = [
    "C\tReach\tNumber\tOutflow\tReach",
    "C\tNode\tNodes\tNode\tName",
    "C\tID\tNRD\tIDWN\tNAME",
    SEPARATOR,
];

const NODES_HEADER: [&str; 5] = [
    SEPARATOR,
    "C\tStream\tGroundwater",
    "C    node  node",
    "C\tIRV\tIGW",
    SEPARATOR,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamReach {
    pub id: i64,
    /// `IDWN`: downstream stream node, `-lake` into a lake, 0 out of the model.
    pub outflow: i64,
    pub name: String,
    /// `(stream node, groundwater node)` in upstream-to-downstream order.
    pub nodes: Vec<(i64, i64)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingTable {
    pub stream_node: i64,
    pub lines: Vec<String>,
}

/// Parsed v4.2 stream specification. Comment lines inside the reach and
/// rating table sections are not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSpec {
    prefix: Vec<String>,
    reach_count_line: String,
    rating_points_line: String,
    pub rating_points: usize,
    pub reaches: Vec<StreamReach>,
    rating_header: Vec<String>,
    pub rating_tables: Vec<RatingTable>,
    tail: Vec<String>,
}

impl StreamSpec {
    pub fn parse(label: &str, lines: Vec<String>) -> ParserResult<Self> {
        check_version(label, &lines)?;
        let mut cursor = LineCursor::new(label, lines);

        cursor.advance(0)?;
        let prefix = cursor.input()[..cursor.pos()].to_vec();
        let reach_count_line = cursor.current()?.to_string();
        let reach_count = non_negative(&cursor, cursor.current_int()?)?;
        cursor.advance(1)?;
        let rating_points_line = cursor.current()?.to_string();
        let rating_points = non_negative(&cursor, cursor.current_int()?)?;

        let mut reaches = Vec::with_capacity(reach_count);
        for _ in 0..reach_count {
            cursor.advance(1)?;
            let fields = cursor.current_tokens()?;
            let name = fields.get(3..).map(|rest| rest.join(" ")).unwrap_or_default();
            let id = cursor.current_int()?;
            let node_count = non_negative(&cursor, cursor.current_value::<i64>(1)?)?;
            let outflow = cursor.current_value::<i64>(2)?;

            let mut nodes = Vec::with_capacity(node_count);
            for _ in 0..node_count {
                cursor.advance(1)?;
                nodes.push((cursor.current_int()?, cursor.current_value::<i64>(1)?));
            }
            reaches.push(StreamReach {
                id,
                outflow,
                name,
                nodes,
            });
        }

        let header_start = cursor.pos() + 1;
        cursor.advance(1)?;
        cursor.advance(RATING_FACTORS)?;
        let rating_header = cursor.input()[header_start..cursor.pos()].to_vec();

        let stream_nodes: Vec<i64> = reaches
            .iter()
            .flat_map(|reach| reach.nodes.iter().map(|(stream, _)| *stream))
            .collect();
        let mut rating_tables = Vec::with_capacity(stream_nodes.len());
        for (index, stream_node) in stream_nodes.into_iter().enumerate() {
            if index > 0 {
                cursor.advance(1)?;
            }
            let mut lines = Vec::with_capacity(rating_points);
            for point in 0..rating_points {
                if point > 0 {
                    cursor.advance(1)?;
                }
                lines.push(cursor.current()?.to_string());
            }
            rating_tables.push(RatingTable { stream_node, lines });
        }

        let tail_start = if rating_tables.is_empty() {
            cursor.pos()
        } else {
            cursor.pos() + 1
        };
        let tail = cursor.input().get(tail_start..).unwrap_or_default().to_vec();

        Ok(Self {
            prefix,
            reach_count_line,
            rating_points_line,
            rating_points,
            reaches,
            rating_header,
            rating_tables,
            tail,
        })
    }

    /// Stream node to groundwater node, over every reach.
    pub fn stream_node_map(&self) -> BTreeMap<i64, i64> {
        self.reaches
            .iter()
            .flat_map(|reach| reach.nodes.iter().copied())
            .collect()
    }

    /// Stream nodes whose groundwater node belongs to `nodes`.
    pub fn submodel_stream_nodes(&self, nodes: &IdSet) -> IdSet {
        self.reaches
            .iter()
            .flat_map(|reach| reach.nodes.iter())
            .filter(|(_, groundwater)| nodes.contains(groundwater))
            .map(|(stream, _)| *stream)
            .collect()
    }

    /// Spec restricted to `stream_nodes`. Reaches left without nodes are
    /// removed; outflow into an excluded node or lake becomes 0.
    pub fn restrict(&self, stream_nodes: &IdSet, lakes: &IdSet) -> Self {
        let reaches = self
            .reaches
            .iter()
            .filter_map(|reach| {
                let nodes: Vec<(i64, i64)> = reach
                    .nodes
                    .iter()
                    .copied()
                    .filter(|(stream, _)| stream_nodes.contains(stream))
                    .collect();
                if nodes.is_empty() {
                    return None;
                }
                let outflow = match reach.outflow {
                    node if node > 0 && !stream_nodes.contains(&node) => 0,
                    lake if lake < 0 && !lakes.contains(&-lake) => 0,
                    other => other,
                };
                Some(StreamReach {
                    outflow,
                    nodes,
                    ..reach.clone()
                })
            })
            .collect();
        let rating_tables = self
            .rating_tables
            .iter()
            .filter(|table| stream_nodes.contains(&table.stream_node))
            .cloned()
            .collect();
        Self {
            reaches,
            rating_tables,
            ..self.clone()
        }
    }

    pub fn to_lines(&self) -> Vec<String> {
        let mut out = self.prefix.clone();
        out.push(count_header(&self.reach_count_line, self.reaches.len()));
        out.push(self.rating_points_line.clone());
        out.extend(REACHES_HEADER.iter().map(|line| line.to_string()));

        for (index, reach) in self.reaches.iter().enumerate() {
            if index > 0 {
                out.push(SEPARATOR.to_string());
            }
            out.push(format!("C     REACH   {}", reach.id));
            out.extend(REACH_HEADER.iter().map(|line| line.to_string()));
            out.push(format!(
                "\t{}\t{}\t{}\t{}",
                reach.id,
                reach.nodes.len(),
                reach.outflow,
                reach.name
            ));
            out.extend(NODES_HEADER.iter().map(|line| line.to_string()));
            for (stream, groundwater) in &reach.nodes {
                out.push(format!("\t{}\t{}", stream, groundwater));
            }
        }

        out.extend(self.rating_header.iter().cloned());
        for table in &self.rating_tables {
            out.extend(table.lines.iter().cloned());
        }
        out.extend(self.tail.iter().cloned());
        out
    }
}

fn check_version(label: &str, lines: &[String]) -> ParserResult<()> {
    let first = lines.first().map(String::as_str).unwrap_or_default();
    let version = first.trim().trim_start_matches('#').trim();
    if first.trim_start().starts_with('#') && version == SUPPORTED_VERSION {
        return Ok(());
    }
    Err(IwfmError::invalid_argument(
        "INPUT.STREAM_VERSION",
        format!(
            "{}: stream specification version '{}' is not supported (expected {})",
            label,
            tokens(first).first().copied().unwrap_or_default(),
            SUPPORTED_VERSION
        ),
    ))
}

fn non_negative(cursor: &LineCursor, value: i64) -> ParserResult<usize> {
    usize::try_from(value).map_err(|_| {
        IwfmError::malformed_line(
            cursor.label(),
            cursor.pos(),
            cursor.current().unwrap_or_default(),
            "count must not be negative",
        )
    })
}

/// Stream specification rewriter. Surviving stream nodes are those whose
/// groundwater node is in the submodel.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreprocStreamRewriter;

impl SubmodelRewriter for PreprocStreamRewriter {
    fn role(&self) -> &'static str {
        "stream specification file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let spec = StreamSpec::parse(label, lines)?;
        let stream_nodes = spec.submodel_stream_nodes(&submodel.nodes);
        let restricted = spec.restrict(&stream_nodes, &submodel.lakes);
        tracing::debug!(
            file = label,
            reaches = restricted.reaches.len(),
            stream_nodes = stream_nodes.len(),
            "filtered stream reaches"
        );
        Ok(Rewritten::new(restricted.to_lines()).with_kept(restricted.reaches.len()))
    }
}
