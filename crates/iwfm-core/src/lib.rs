//! Submodel extraction for IWFM fixed-format model inputs.

pub mod domain;
pub mod files;
pub mod geometry;
pub mod modules;
pub mod parser;
pub mod pipelines;
pub mod strat;

pub use domain::{ExtractionReport, IwfmError, IwfmErrorCategory, IwfmResult, Submodel};
pub use files::SubmodelNames;
pub use pipelines::{SubmodelManifest, extract_preprocessor, extract_simulation, extract_submodel};
