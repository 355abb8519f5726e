use super::CliError;
use super::helpers::{render_summary, write_json};
use iwfm_core::pipelines::{extract_preprocessor, extract_simulation};
use iwfm_core::strat::{read_strat_file, strat_arrays};
use iwfm_core::SubmodelNames;
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct PreprocArgs {
    /// Preprocessor main file of the full model
    #[arg(value_name = "PP_FILE")]
    pp_file: PathBuf,

    /// Element pairs file: old element, new element, subregion per row
    #[arg(value_name = "PAIRS_FILE")]
    pairs_file: PathBuf,

    /// Directory receiving the submodel files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Base name prefixed to every submodel file
    #[arg(long, default_value = "Submodel")]
    base: String,

    /// JSON report output path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct SimArgs {
    /// Simulation main file of the full model
    #[arg(value_name = "SIM_FILE")]
    sim_file: PathBuf,

    /// Directory receiving the submodel files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Base name prefixed to every submodel file
    #[arg(long, default_value = "Submodel")]
    base: String,

    /// Submodel manifest written by `preproc` (default: <out-dir>/<base>_submodel.json)
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// JSON report output path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct StratArgs {
    /// Stratigraphy file (NL, FACT, one row per node)
    #[arg(value_name = "STRAT_FILE")]
    strat_file: PathBuf,
}

pub(super) fn run_preproc_command(args: PreprocArgs) -> Result<i32, CliError> {
    let extraction = extract_preprocessor(&args.pp_file, &args.pairs_file, &args.out_dir, &args.base)?;
    println!("{}", render_summary("Preprocessor", &extraction.report));
    if let Some(path) = &args.report {
        write_json(path, &extraction.report)?;
        println!("JSON report: {}", path.display());
    }
    Ok(0)
}

pub(super) fn run_sim_command(args: SimArgs) -> Result<i32, CliError> {
    let manifest = args
        .manifest
        .clone()
        .unwrap_or_else(|| args.out_dir.join(SubmodelNames::new(&args.base).manifest));
    let report = extract_simulation(&args.sim_file, &manifest, &args.out_dir, &args.base)?;
    println!("{}", render_summary("Simulation", &report));
    if let Some(path) = &args.report {
        write_json(path, &report)?;
        println!("JSON report: {}", path.display());
    }
    Ok(0)
}

pub(super) fn run_strat_command(args: StratArgs) -> Result<i32, CliError> {
    let records = read_strat_file(&args.strat_file)?;
    let arrays = strat_arrays(&records).map_err(|error| CliError::Extract(error.into()))?;
    let json = serde_json::to_string_pretty(&arrays)
        .map_err(|error| CliError::Internal(anyhow::Error::new(error)))?;
    println!("{}", json);
    Ok(0)
}
