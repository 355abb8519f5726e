use super::manifest::SubmodelManifest;
use crate::domain::{ExtractionReport, IwfmResult, Submodel};
use crate::files::{SimFiles, SubmodelNames, sub_sim_file};
use crate::modules::groundwater::GroundwaterRewriter;
use crate::modules::helpers::require_file;
use crate::modules::rootzone::RootzoneRewriter;
use crate::modules::streams::StreamsRewriter;
use crate::modules::{
    LakeRewriter, RewriteContext, SmallWatershedRewriter, SubmodelRewriter, UnsatRewriter,
};
use std::path::Path;

const SIMULATION_ROLE: &str = "simulation main file";

/// Write the submodel version of every simulation input named by
/// `sim_file` into `out_dir`, then the new simulation main file.
///
/// The groundwater, small watershed and unsaturated zone files are checked
/// before anything is written. A failure part way leaves the files already
/// written in place.
pub fn extract_submodel(
    sim_file: &Path,
    submodel: &Submodel,
    names: &SubmodelNames,
    out_dir: &Path,
) -> IwfmResult<ExtractionReport> {
    let files = SimFiles::read(sim_file)?;
    require_file(&files.groundwater, "groundwater main file")?;
    require_file(&files.small_watersheds, "small watershed file")?;
    require_file(&files.unsat, "unsaturated zone file")?;

    let source_dir = files.base_dir();
    let context = RewriteContext::new(&source_dir, out_dir, names);
    let output = |name: &str| out_dir.join(name);
    let mut report = ExtractionReport::default();

    let steps: [(&dyn SubmodelRewriter, &Path, &str); 5] = [
        (
            &SmallWatershedRewriter,
            &files.small_watersheds,
            &names.small_watersheds,
        ),
        (&UnsatRewriter, &files.unsat, &names.unsat),
        (
            &GroundwaterRewriter::new(context),
            &files.groundwater,
            &names.groundwater,
        ),
        (&StreamsRewriter::new(context), &files.streams, &names.streams),
        (&RootzoneRewriter::new(context), &files.rootzone, &names.rootzone),
    ];
    for (rewriter, old, new_name) in steps {
        let rewritten = rewriter.rewrite_file(old, &output(new_name), submodel)?;
        report.extend(rewritten.report);
    }

    let lake_file = files.lake.as_deref().filter(|_| !submodel.lakes.is_empty());
    if let Some(lake) = lake_file {
        let rewritten =
            LakeRewriter::new(context).rewrite_file(lake, &output(&names.lakes), submodel)?;
        report.extend(rewritten.report);
    } else if files.lake.is_some() {
        tracing::warn!("no lake lies inside the submodel, lake reference blanked");
    }

    let new_sim = output(&names.simulation);
    sub_sim_file(sim_file, &new_sim, names, lake_file.is_some())?;
    report.record(SIMULATION_ROLE, sim_file, new_sim, None);

    tracing::info!(files = report.files.len(), "simulation extraction complete");
    Ok(report)
}

/// Simulation extraction driven by the manifest the preprocessor
/// extraction saved. The manifest is loaded before any file is written.
pub fn extract_simulation(
    sim_file: &Path,
    manifest_file: &Path,
    out_dir: &Path,
    base: &str,
) -> IwfmResult<ExtractionReport> {
    let manifest = SubmodelManifest::load(manifest_file)?;
    let submodel = manifest.into_submodel()?;
    tracing::info!(
        elements = submodel.elements.len(),
        nodes = submodel.nodes.len(),
        stream_nodes = submodel.stream_nodes.len(),
        lakes = submodel.lakes.len(),
        "loaded submodel"
    );
    extract_submodel(sim_file, &submodel, &SubmodelNames::new(base), out_dir)
}
