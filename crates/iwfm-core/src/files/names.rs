use serde::{Deserialize, Serialize};

/// Bare file names for every submodel file, derived from one base name.
/// References written into model files use these names; the files
/// themselves land in the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmodelNames {
    pub base: String,
    pub simulation: String,
    pub preprocessor: String,
    pub preout: String,
    pub manifest: String,

    pub elements: String,
    pub nodes: String,
    pub stratigraphy: String,
    pub stream_spec: String,
    pub lake_config: String,

    pub groundwater: String,
    pub boundary: String,
    pub specified_flow_bc: String,
    pub specified_head_bc: String,
    pub general_head_bc: String,
    pub constrained_head_bc: String,
    pub time_series_bc: String,
    pub pumping: String,
    pub element_pumping: String,
    pub well_spec: String,
    pub pump_rates: String,
    pub subsidence: String,
    pub tile_drain: String,

    pub streams: String,
    pub stream_inflow: String,
    pub diversion_spec: String,
    pub bypass_spec: String,
    pub diversions: String,

    pub lakes: String,
    pub max_lake_elevation: String,

    pub rootzone: String,
    pub non_ponded: String,
    pub ponded: String,
    pub urban: String,
    pub native_veg: String,
    pub non_ponded_area: String,
    pub ponded_area: String,
    pub urban_area: String,
    pub native_veg_area: String,

    pub small_watersheds: String,
    pub unsat: String,
}

impl SubmodelNames {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let name = |suffix: &str| format!("{}_{}", base, suffix);
        Self {
            simulation: name("Simulation.in"),
            preprocessor: name("Preprocessor.in"),
            preout: name("Preprocessor.bin"),
            manifest: name("submodel.json"),

            elements: name("Elements.dat"),
            nodes: name("Nodes.dat"),
            stratigraphy: name("Stratigraphy.dat"),
            stream_spec: name("StreamsSpec.dat"),
            lake_config: name("LakeConfig.dat"),

            groundwater: name("Groundwater.dat"),
            boundary: name("BC.dat"),
            specified_flow_bc: name("SpecifiedFlowBC.dat"),
            specified_head_bc: name("SpecifiedHeadBC.dat"),
            general_head_bc: name("GeneralHeadBC.dat"),
            constrained_head_bc: name("ConstrainedHeadBC.dat"),
            time_series_bc: name("TimeSeriesBC.dat"),
            pumping: name("Pumping.dat"),
            element_pumping: name("ElemPump.dat"),
            well_spec: name("WellSpec.dat"),
            pump_rates: name("PumpRates.dat"),
            subsidence: name("Subsidence.dat"),
            tile_drain: name("TileDrain.dat"),

            streams: name("Streams.dat"),
            stream_inflow: name("StreamInflow.dat"),
            diversion_spec: name("DiversionSpec.dat"),
            bypass_spec: name("BypassSpec.dat"),
            diversions: name("Diversions.dat"),

            lakes: name("Lakes.dat"),
            max_lake_elevation: name("MaxLakeElev.dat"),

            rootzone: name("Rootzone.dat"),
            non_ponded: name("NonPondedCrop.dat"),
            ponded: name("PondedCrop.dat"),
            urban: name("Urban.dat"),
            native_veg: name("NativeVeg.dat"),
            non_ponded_area: name("NonPondedCrop_Area.dat"),
            ponded_area: name("PondedCrop_Area.dat"),
            urban_area: name("Urban_Area.dat"),
            native_veg_area: name("NativeVeg_Area.dat"),

            small_watersheds: name("SmallWatersheds.dat"),
            unsat: name("Unsat.dat"),
            base,
        }
    }
}
