use super::helpers::{copy_verbatim, read_lines, resolve_reference, write_lines};
use crate::domain::{ExtractionReport, RewriteResult, Submodel};
use crate::files::SubmodelNames;
use crate::parser::{blank_reference, file_reference, reference_name};
use std::path::{Path, PathBuf};

/// Output of one rewriter: the new buffer, the optional survivor count used
/// for logging and reference blanking, and the files written on its behalf.
#[derive(Debug, Clone, Default)]
pub struct Rewritten {
    pub lines: Vec<String>,
    pub kept: Option<usize>,
    pub report: ExtractionReport,
}

impl Rewritten {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }

    pub fn with_kept(mut self, kept: usize) -> Self {
        self.kept = Some(kept);
        self
    }

    pub fn with_report(mut self, report: ExtractionReport) -> Self {
        self.report = report;
        self
    }

    /// False only when a counted block ended up empty.
    pub fn survived(&self) -> bool {
        self.kept.is_none_or(|kept| kept > 0)
    }
}

pub trait SubmodelRewriter {
    /// Short description used in logs, diagnostics and the extraction report.
    fn role(&self) -> &'static str;

    fn rewrite_lines(
        &self,
        label: &str,
        lines: Vec<String>,
        submodel: &Submodel,
    ) -> RewriteResult<Rewritten>;

    fn rewrite_file(&self, old: &Path, new: &Path, submodel: &Submodel) -> RewriteResult<Rewritten> {
        let lines = read_lines(old, self.role())?;
        let total = lines.len();
        let label = old
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| old.display().to_string());

        let mut rewritten = self.rewrite_lines(&label, lines, submodel)?;
        write_lines(new, &rewritten.lines, self.role())?;
        tracing::info!(
            role = self.role(),
            output = %new.display(),
            lines_in = total,
            lines_out = rewritten.lines.len(),
            kept = ?rewritten.kept,
            "wrote submodel file"
        );
        rewritten
            .report
            .record(self.role(), old, new, rewritten.kept);
        Ok(rewritten)
    }
}

/// Result of following one file reference from a parent file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nested {
    pub reference: String,
    pub rewritten: bool,
    pub kept: Option<usize>,
}

impl Nested {
    /// True when the referenced file was written and still holds records.
    pub fn survived(&self) -> bool {
        self.rewritten && self.kept.is_none_or(|kept| kept > 0)
    }

    /// The new reference, or a blank one when nothing survived.
    pub fn reference_or_blank(&self, tag: &str) -> String {
        if self.survived() {
            self.reference.clone()
        } else {
            blank_reference(tag)
        }
    }
}

/// Where nested file references resolve from and where their rewritten
/// copies go.
#[derive(Debug, Clone, Copy)]
pub struct RewriteContext<'a> {
    pub source_dir: &'a Path,
    pub out_dir: &'a Path,
    pub names: &'a SubmodelNames,
}

impl<'a> RewriteContext<'a> {
    pub fn new(source_dir: &'a Path, out_dir: &'a Path, names: &'a SubmodelNames) -> Self {
        Self {
            source_dir,
            out_dir,
            names,
        }
    }

    /// Source path named by a reference line, `None` for a blank reference.
    pub fn source(&self, line: &str) -> Option<PathBuf> {
        reference_name(line).map(|name| resolve_reference(self.source_dir, name))
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.out_dir.join(name)
    }

    /// Rewrite the file named on `line` into `new_name`, folding the files it
    /// wrote into `report`. A blank source reference stays blank.
    pub fn rewrite_nested<R: SubmodelRewriter + ?Sized>(
        &self,
        rewriter: &R,
        line: &str,
        new_name: &str,
        tag: &str,
        submodel: &Submodel,
        report: &mut ExtractionReport,
    ) -> RewriteResult<Nested> {
        let Some(old) = self.source(line) else {
            tracing::debug!(tag, "reference is blank, nothing to rewrite");
            return Ok(Nested {
                reference: blank_reference(tag),
                rewritten: false,
                kept: None,
            });
        };
        let rewritten = rewriter.rewrite_file(&old, &self.output(new_name), submodel)?;
        report.extend(rewritten.report);
        Ok(Nested {
            reference: file_reference(new_name, tag),
            rewritten: true,
            kept: rewritten.kept,
        })
    }

    /// Copy the file named on `line` unchanged to `new_name`.
    pub fn copy_nested(
        &self,
        line: &str,
        new_name: &str,
        tag: &str,
        role: &str,
        report: &mut ExtractionReport,
    ) -> RewriteResult<String> {
        let Some(old) = self.source(line) else {
            return Ok(blank_reference(tag));
        };
        let new = self.output(new_name);
        copy_verbatim(&old, &new, role)?;
        report.record(role, old, new, None);
        Ok(file_reference(new_name, tag))
    }
}
