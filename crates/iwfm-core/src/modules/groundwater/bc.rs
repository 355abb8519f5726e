use super::cghd::ConstrainedHeadRewriter;
use crate::domain::{ExtractionReport, RewriteResult, Submodel};
use crate::modules::traits::{RewriteContext, Rewritten, SubmodelRewriter};
use crate::parser::{LineCursor, count_header};

/// Boundary-condition files whose rows are keyed by groundwater node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeBoundaryKind {
    SpecifiedFlow,
    SpecifiedHead,
    GeneralHead,
}

impl NodeBoundaryKind {
    /// Factor and unit lines between the count and the first row.
    pub const fn factor_lines(self) -> usize {
        match self {
            Self::SpecifiedFlow => 2,
            Self::SpecifiedHead => 1,
            Self::GeneralHead => 3,
        }
    }

    pub const fn role(self) -> &'static str {
        match self {
            Self::SpecifiedFlow => "specified flow boundary file",
            Self::SpecifiedHead => "specified head boundary file",
            Self::GeneralHead => "general head boundary file",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NodeBoundaryRewriter {
    kind: NodeBoundaryKind,
}

impl NodeBoundaryRewriter {
    pub fn new(kind: NodeBoundaryKind) -> Self {
        Self { kind }
    }
}

impl SubmodelRewriter for NodeBoundaryRewriter {
    fn role(&self) -> &'static str {
        self.kind.role()
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        filter_node_rows(label, lines, submodel, self.kind.factor_lines())
    }
}

/// `COUNT`, `factor_lines` settings, then `COUNT` rows keyed by node.
pub(super) fn filter_node_rows(
    label: &str,
    lines: Vec<String>,
    submodel: &Submodel,
    factor_lines: usize,
) -> RewriteResult<Rewritten> {
    let mut cursor = LineCursor::new(label, lines);
    cursor.advance(0)?;
    let count_slot = cursor.slot();
    let count = usize::try_from(cursor.current_int()?).unwrap_or(0);
    let header = cursor.current()?.to_string();

    if !cursor.try_advance(1 + factor_lines) {
        return Ok(Rewritten::new(cursor.finish()).with_kept(0));
    }
    let kept = cursor.filter_rows(0, count, |node| submodel.nodes.contains(&node))?;
    cursor.set(count_slot, count_header(&header, kept))?;
    tracing::debug!(file = label, total = count, kept, "filtered boundary nodes");
    Ok(Rewritten::new(cursor.finish()).with_kept(kept))
}

const BOUNDARY_TAGS: [(&str, NodeBoundaryKind); 3] = [
    ("SPFLOWBCFL", NodeBoundaryKind::SpecifiedFlow),
    ("SPHEADBCFL", NodeBoundaryKind::SpecifiedHead),
    ("GHBCFL", NodeBoundaryKind::GeneralHead),
];

/// Boundary-condition main file. The node-keyed files are filtered,
/// the time-series boundary data is copied and the hydrograph output block
/// is left as is.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryRewriter<'a> {
    context: RewriteContext<'a>,
}

impl<'a> BoundaryRewriter<'a> {
    pub fn new(context: RewriteContext<'a>) -> Self {
        Self { context }
    }

    fn output_name(&self, kind: NodeBoundaryKind) -> &'a str {
        let names = self.context.names;
        match kind {
            NodeBoundaryKind::SpecifiedFlow => &names.specified_flow_bc,
            NodeBoundaryKind::SpecifiedHead => &names.specified_head_bc,
            NodeBoundaryKind::GeneralHead => &names.general_head_bc,
        }
    }
}

impl SubmodelRewriter for BoundaryRewriter<'_> {
    fn role(&self) -> &'static str {
        "boundary conditions main file"
    }

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten> {
        let mut report = ExtractionReport::default();
        let mut cursor = LineCursor::new(label, lines);
        cursor.advance(0)?;

        for (tag, kind) in BOUNDARY_TAGS {
            let rewriter = NodeBoundaryRewriter::new(kind);
            let nested = self.context.rewrite_nested(
                &rewriter,
                cursor.current()?,
                self.output_name(kind),
                tag,
                submodel,
                &mut report,
            )?;
            cursor.replace(nested.reference)?;
            cursor.advance(0)?;
        }

        let nested = self.context.rewrite_nested(
            &ConstrainedHeadRewriter,
            cursor.current()?,
            &self.context.names.constrained_head_bc,
            "CONGHBCFL",
            submodel,
            &mut report,
        )?;
        cursor.replace(nested.reference)?;
        cursor.advance(0)?;

        let reference = self.context.copy_nested(
            cursor.current()?,
            &self.context.names.time_series_bc,
            "TSBCFL",
            "time-series boundary file",
            &mut report,
        )?;
        cursor.replace(reference)?;

        Ok(Rewritten::new(cursor.finish()).with_report(report))
    }
}
