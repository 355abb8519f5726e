//! Orchestrators: the preprocessor extraction that fixes the submodel, and
//! the simulation extraction that follows it.

pub mod manifest;
pub mod preprocessor;
pub mod simulation;

pub use manifest::SubmodelManifest;
pub use preprocessor::{PreprocessorExtraction, extract_preprocessor};
pub use simulation::{extract_simulation, extract_submodel};
