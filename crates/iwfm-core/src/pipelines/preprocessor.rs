use super::manifest::SubmodelManifest;
use crate::domain::{ExtractionReport, IdSet, IwfmError, IwfmResult, LakeRecord};
use crate::files::{PreprocFiles, SubmodelNames, read_element_pairs, sub_pp_file};
use crate::modules::helpers::{read_lines, require_file};
use crate::modules::preproc::{
    PreprocElementRewriter, PreprocLakeRewriter, PreprocNodeRewriter, PreprocStratRewriter,
    PreprocStreamRewriter, StreamSpec, parse_element_rings, parse_lakes, parse_node_coords,
};
use crate::modules::SubmodelRewriter;
use std::path::Path;

const PREPROCESSOR_ROLE: &str = "preprocessor main file";

#[derive(Debug, Clone)]
pub struct PreprocessorExtraction {
    pub manifest: SubmodelManifest,
    pub report: ExtractionReport,
}

/// Extract the preprocessor inputs for the elements listed in `pairs_file`
/// and save the manifest the simulation extraction reads.
///
/// Every input is read and the submodel boundary is built before the first
/// file is written.
pub fn extract_preprocessor(
    pp_file: &Path,
    pairs_file: &Path,
    out_dir: &Path,
    base: &str,
) -> IwfmResult<PreprocessorExtraction> {
    let files = PreprocFiles::read(pp_file)?;
    let names = SubmodelNames::new(base);
    let manifest = build_manifest(&files, pairs_file, base)?;
    let submodel = manifest.into_submodel()?;
    tracing::info!(
        elements = submodel.elements.len(),
        nodes = submodel.nodes.len(),
        stream_nodes = submodel.stream_nodes.len(),
        lakes = submodel.lakes.len(),
        "built submodel"
    );

    let element_rewriter = PreprocElementRewriter::new(&manifest.elements);
    let steps: [(&dyn SubmodelRewriter, &Path, &str); 4] = [
        (&PreprocNodeRewriter, &files.nodes, &names.nodes),
        (&element_rewriter, &files.elements, &names.elements),
        (&PreprocStratRewriter, &files.stratigraphy, &names.stratigraphy),
        (&PreprocStreamRewriter, &files.streams, &names.stream_spec),
    ];
    let mut report = ExtractionReport::default();
    for (rewriter, old, new_name) in steps {
        let rewritten = rewriter.rewrite_file(old, &out_dir.join(new_name), &submodel)?;
        report.extend(rewritten.report);
    }

    let lake_file = files.lake.as_deref().filter(|_| !manifest.lakes.is_empty());
    if let Some(lake) = lake_file {
        let rewritten = PreprocLakeRewriter.rewrite_file(
            lake,
            &out_dir.join(&names.lake_config),
            &submodel,
        )?;
        report.extend(rewritten.report);
    }

    let new_pp = out_dir.join(&names.preprocessor);
    sub_pp_file(pp_file, &new_pp, &names, lake_file.is_some())?;
    report.record(PREPROCESSOR_ROLE, pp_file, new_pp, None);

    let manifest_path = out_dir.join(&names.manifest);
    manifest.save(&manifest_path)?;
    report.record("submodel manifest", pairs_file, manifest_path, Some(manifest.elements.len()));

    Ok(PreprocessorExtraction { manifest, report })
}

fn build_manifest(
    files: &PreprocFiles,
    pairs_file: &Path,
    base: &str,
) -> IwfmResult<SubmodelManifest> {
    require_file(&files.stratigraphy, "stratigraphy file")?;

    let elements = read_element_pairs(pairs_file)?;
    if elements.is_empty() {
        return Err(IwfmError::invalid_argument(
            "INPUT.ELEMENT_PAIRS",
            format!("element pairs file '{}' lists no elements", pairs_file.display()),
        ));
    }
    let element_ids: IdSet = elements.iter().map(|pair| pair.old).collect();

    let rings = parse_element_rings(
        &files.elements.display().to_string(),
        read_lines(&files.elements, "element configuration file")?,
        &element_ids,
    )?;
    if rings.len() != element_ids.len() {
        tracing::warn!(
            listed = element_ids.len(),
            found = rings.len(),
            "some listed elements are not in the element configuration file"
        );
    }
    let nodes: IdSet = rings.iter().flat_map(|ring| ring.ring()).collect();

    let coords = parse_node_coords(
        &files.nodes.display().to_string(),
        read_lines(&files.nodes, "node coordinate file")?,
    )?
    .into_iter()
    .filter(|coord| nodes.contains(&coord.id))
    .collect();

    let streams = StreamSpec::parse(
        &files.streams.display().to_string(),
        read_lines(&files.streams, "stream specification file")?,
    )?;

    let lakes: Vec<LakeRecord> = match &files.lake {
        Some(path) => parse_lakes(
            &path.display().to_string(),
            read_lines(path, "lake configuration file")?,
            &element_ids,
        )?,
        None => Vec::new(),
    };

    Ok(SubmodelManifest {
        base: base.to_string(),
        elements,
        stream_node_map: streams.stream_node_map(),
        stream_nodes: streams.submodel_stream_nodes(&nodes).into_iter().collect(),
        nodes: nodes.into_iter().collect(),
        rings,
        coords,
        lakes,
    })
}
