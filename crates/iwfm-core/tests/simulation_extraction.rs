use iwfm_core::domain::{ElementPair, ElementRing, IwfmErrorCategory, NodeCoord};
use iwfm_core::parser::{leading_int, reference_name};
use iwfm_core::pipelines::{SubmodelManifest, extract_simulation};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SIM_MAIN: &str = "C IWFM simulation main file
Two Element Model
Simulation
Version 2015
C  File names
    ..\\Preprocessor\\PreprocessorOut.bin               / 1: BINARY OUTPUT
    Groundwater\\GW_MAIN.dat                            / 2: GROUNDWATER
    Streams.dat                                         / 3: STREAMS
                                                        / 4: LAKES
    RootZone.dat                                        / 5: ROOTZONE
    SmallWatersheds.dat                                 / 6: SMALL WATERSHEDS
    Unsat.dat                                           / 7: UNSATURATED ZONE
    IrrFrac.dat                                         / 8: IRRIGATION FRACTIONS
    SupplyAdj.dat                                       / 9: SUPPLY ADJUSTMENT
    Precip.dat                                          / 10: PRECIPITATION
    ET.dat                                              / 11: EVAPOTRANSPIRATION
C  Time
    09/30/1973_24:00                                    / BDT
    0                                                   / RESTART
    1MON                                                / UNITT
    09/30/2015_24:00                                    / EDT
";

const GROUNDWATER: &str = "C IWFM Groundwater Component Main Data File
                                         / BCFL
                                         / TDFL
                                         / PUMPFL
                                         / SUBSFL
                                         / OVRWRTFL
   1                                     / FACTLTOU
   FEET                                  / UNITLTOU
   1.0                                   / FACTVLOU
   ACRE-FEET                             / UNITVLOU
   1.0                                   / FACTVROU
   AC-FT/MON                             / UNITVROU
                                         / VELOUTFL
                                         / VFLOWOUTFL
                                         / GWALLOUTFL
                                         / HTPOUTFL
                                         / VTPOUTFL
                                         / GWBUDFL
                                         / ZBUDFL
                                         / FNGWFL
      0                         / KDEB
C Hydrographs
     3                                       / NOUTH
     1.0                                     / FACTXY
     Results\\GW_Hyd.out                      / GWHYDOUTFL
C   ID    HYDTYP   IOUTHL      X             Y         NAME
1\t0\t1\t50.0\t50.0\tinside
2\t0\t1\t150.0\t50.0\toutside
3\t1\t1\t3\tnode_three
C Element face flows
      1                         / NOUTF
                                / FCHYDOUTFL
      1     1     1     2     face_1_2
C Aquifer Parameters
          0                     / NGROUP
   1.0    1.          1.          1.          1.          1.          / FX FKH FS FN FV FL
    1DAY               / TUNITKH
    1DAY               / TUNITV
    1DAY               / TUNITL
C Node Parameters
\t\t1\t\t70.0\t\t6.2e-06\t0.13\t0.0\t4.9
\t\t2\t\t54.0\t\t1.1e-05\t0.10\t0.0\t2.9
\t\t3\t\t44.0\t\t2.2e-05\t0.09\t0.0\t1.5
C Anomaly in Hydraulic Conductivity
      2                         / NEBK
      1.0                       / FACT
      1MON                      / TUNITH
C   IC      IEBK     BK[1]
      1       1       1.0
      2       2       1.0
C Initial Groundwater Head Values
      1.0                       / FACTHP
\t\t\t1\t\t100.0
\t\t\t2\t\t101.0
\t\t\t3\t\t102.0
";

const STREAMS: &str = "#4.2
C Stream parameters data file
                                                / INFLOWFL
                                                / DIVSPECFL
                                                / BYPSPECFL
                                                / DIVFL
    Results\\Streams_Budget.hdf                 / STRMRCHBUDFL
    Results\\Diversions.hdf                     / DIVDTLBUDFL
       2                                     \t/ NOUTR
       0                                       \t/ IHSQR
       1.0                                     \t/ FACTVROU
       AC-FT/MON                              \t/ UNITVROU
       1                                     \t/ FACTLTOU
       FEET                                   \t/ UNITLTOU
       Results\\Stream_Hydrographs.out         / STHYDOUTFL
C hydrographs
\t1\t\tNode1\t/\tStream Node 1
\t3\t\tNode3\t/\tStream Node 3
        1                         \t\t\t/ NBUDR
        Results\\StreamNode_Budget.hdf          / STNDBUDFL
\t3
C streambed
    1.0                                         / FACTK
    1.0                                         / FACTL
    1.0                                         / FACTW
\t1\t300\t100\t2.0\t1
\t2\t300\t101\t2.0\t1
\t3\t400\t200\t2.5\t1
";

const ROOTZONE: &str = "#4.0
C Root zone main file
    0.001                       / RZCONV
    150                         / RZITERMX
    0.083333                    / FACTCN
    2                           / GWUPTK
                                / AGNPFL
                                / PFL
                                / URBFL
                                / NVRVFL
                                / RFFL
                                / RUFL
                                / IPFL
                                / MSRCFL
                                / AGWDFL
                                / LWUBUDFL
                                / RZBUDFL
                                / ZLWUBUDFL
                                / ZRZBUDFL
                                / ARSCLFL
    1.0                         / FACTK
    1.0                         / FACTCPRISE
    1DAY                        / TUNITK
C   IE  WP   FC   TN   LAMBDA  K    RHC  CPRISE  IRNE  FRNE  TYPDSTRO  DSTRO
    1   0.1  0.2  0.3  0.5     1.0  2    0.0     1     0     1         3
    2   0.1  0.2  0.3  0.5     1.0  2    0.0     1     0     1         1
";

const SMALL_WATERSHEDS: &str = "#4.0
C Small watershed file
    Results\\Budget.hdf       / SWBUDFL
    Results\\Final.out        / FNSWFL
          2                                       / NSW
          43560                                   / FACTA
          43560                                   / FACTQ
          1MON                                    / TUNITQ
C ID   AREA    IWBTS  NWB  IWB   QMAXWB
    1\t400.0\t1\t1\t1\t-1
    2\t500.0\t3\t1\t6\t-1
C Root zone parameters
    0.0001                                    / TOLER
    150                                       / ITERMAX
    1.0                                       / FACTL
    0.0833333                                 / FACTCN
    1.0                                       / FACTK
    1MON                                      / TUNITK
    1\t0.15\t0.25\t0.33\t0.18\t6.2\t60
    2\t0.15\t0.25\t0.33\t0.18\t6.2\t60
C Aquifer parameters
    1.0                                       / FACTGW
    1.0                                       / FACTT
    1MON                                      / TUNITT
    1\t0.15\t0.10
    2\t0.15\t0.10
C Initial conditions
    1.0                                       / FACTIC
    1\t0.12\t0.5
    2\t0.12\t0.5
";

const UNSAT: &str = "#4.2
C Unsaturated zone parameter file
    1                                        / NUNSAT
    1e-8                                     / UZCONV
    150                                      / UZITERMX
                                             / UZBUDFL
                                             / UZZBUDFL
                                             / UZFNFL
    0                                        / NGROUP
    1.0            1.0           1.0
    1MON                                     / TUNITZ
C IE   PD    PN     PI    PK    PRHC
    1\t21.10\t0.11953\t0.4\t0.99997\t1
    2\t43.27\t0.11627\t0.4\t0.99982\t1
";

fn write(dir: &Path, name: &str, text: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("fixture directory should be created");
    }
    fs::write(path, text).expect("fixture should be written");
}

fn model(dir: &Path) {
    write(dir, "Simulation.in", SIM_MAIN);
    write(dir, "Groundwater/GW_MAIN.dat", GROUNDWATER);
    write(dir, "Streams.dat", STREAMS);
    write(dir, "RootZone.dat", ROOTZONE);
    write(dir, "SmallWatersheds.dat", SMALL_WATERSHEDS);
    write(dir, "Unsat.dat", UNSAT);
}

/// Element 1 of a two-square strip: nodes 1, 2, 4, 5 and stream node 1.
fn manifest() -> SubmodelManifest {
    SubmodelManifest {
        base: "Sub".to_string(),
        elements: vec![ElementPair {
            old: 1,
            new: 1,
            subregion: 1,
        }],
        nodes: vec![1, 2, 4, 5],
        rings: vec![ElementRing::new(1, [1, 2, 5, 4])],
        coords: vec![
            NodeCoord::new(1, 0.0, 0.0),
            NodeCoord::new(2, 100.0, 0.0),
            NodeCoord::new(4, 0.0, 100.0),
            NodeCoord::new(5, 100.0, 100.0),
        ],
        stream_node_map: BTreeMap::from([(1, 1), (2, 2), (3, 3)]),
        stream_nodes: vec![1, 2],
        lakes: Vec::new(),
    }
}

fn read(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("output should be readable")
        .lines()
        .map(str::to_string)
        .collect()
}

fn header(lines: &[String], tag: &str) -> i64 {
    let line = lines
        .iter()
        .find(|line| line.trim_end().ends_with(tag))
        .expect("count header should be present");
    leading_int("out", 0, line).expect("count header should be an integer")
}

fn extract(temp: &TempDir) -> (std::path::PathBuf, iwfm_core::ExtractionReport) {
    let model_dir = temp.path().join("model");
    let out = temp.path().join("sub");
    model(&model_dir);
    let manifest_path = out.join("Sub_submodel.json");
    manifest().save(&manifest_path).expect("manifest should be saved");
    let report = extract_simulation(&model_dir.join("Simulation.in"), &manifest_path, &out, "Sub")
        .expect("simulation extraction should succeed");
    (out, report)
}

#[test]
fn every_component_file_is_restricted_to_the_submodel() {
    let temp = TempDir::new().expect("tempdir should be created");
    let (out, report) = extract(&temp);

    let groundwater = read(&out.join("Sub_Groundwater.dat"));
    assert_eq!(header(&groundwater, "/ NOUTH"), 1);
    assert_eq!(header(&groundwater, "/ NEBK"), 1);
    assert!(groundwater.iter().any(|line| line.ends_with("inside")));
    assert!(!groundwater.iter().any(|line| line.contains("node_three")));
    assert!(!groundwater.iter().any(|line| line.contains("102.0")));

    let streams = read(&out.join("Sub_Streams.dat"));
    assert_eq!(header(&streams, "/ NOUTR"), 1);
    assert_eq!(header(&streams, "/ NBUDR"), 0);
    assert!(!streams.iter().any(|line| line.starts_with("\t3\t")));

    let rootzone = read(&out.join("Sub_Rootzone.dat"));
    let element_row = rootzone
        .iter()
        .find(|line| line.starts_with("1\t"))
        .expect("element 1 should be rewritten");
    assert!(element_row.ends_with("\t0\t3"));
    let element_ids: Vec<&str> = rootzone
        .iter()
        .filter(|line| line.split_whitespace().nth(1) == Some("0.1"))
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert_eq!(element_ids, vec!["1"], "only element 1 should keep a parameter row");

    let watersheds = read(&out.join("Sub_SmallWatersheds.dat"));
    assert_eq!(header(&watersheds, "/ NSW"), 1);
    assert!(!watersheds.iter().any(|line| line.starts_with("    2\t")));

    let unsat = read(&out.join("Sub_Unsat.dat"));
    assert!(unsat.iter().any(|line| line.contains("21.10")));
    assert!(!unsat.iter().any(|line| line.contains("43.27")));

    let main = read(&out.join("Sub_Simulation.in"));
    assert_eq!(reference_name(&main[6]), Some("Sub_Groundwater.dat"));
    assert_eq!(reference_name(&main[8]), None);
    assert_eq!(reference_name(&main[11]), Some("Sub_Unsat.dat"));
    assert_eq!(reference_name(&main[12]), Some("IrrFrac.dat"));

    let roles: Vec<&str> = report.files.iter().map(|file| file.role.as_str()).collect();
    assert_eq!(
        roles,
        vec![
            "small watershed file",
            "unsaturated zone file",
            "groundwater main file",
            "stream main file",
            "rootzone main file",
            "simulation main file",
        ]
    );
}

#[test]
fn second_extraction_of_the_output_changes_nothing() {
    let temp = TempDir::new().expect("tempdir should be created");
    let (out, _) = extract(&temp);

    let again = temp.path().join("again");
    let manifest_path = out.join("Sub_submodel.json");
    for name in [
        "Sub_Groundwater.dat",
        "Sub_Streams.dat",
        "Sub_Rootzone.dat",
        "Sub_SmallWatersheds.dat",
        "Sub_Unsat.dat",
    ] {
        fs::copy(out.join(name), temp.path().join("model").join(name))
            .expect("output should be staged as input");
    }
    let staged = SIM_MAIN
        .replace("Groundwater\\GW_MAIN.dat", "Sub_Groundwater.dat")
        .replace("Streams.dat     ", "Sub_Streams.dat ")
        .replace("RootZone.dat     ", "Sub_Rootzone.dat ")
        .replace("SmallWatersheds.dat    ", "Sub_SmallWatersheds.dat")
        .replace("Unsat.dat    ", "Sub_Unsat.dat");
    write(&temp.path().join("model"), "Staged.in", &staged);

    extract_simulation(
        &temp.path().join("model").join("Staged.in"),
        &manifest_path,
        &again,
        "Sub",
    )
    .expect("second extraction should succeed");

    for name in [
        "Sub_Groundwater.dat",
        "Sub_Streams.dat",
        "Sub_Rootzone.dat",
        "Sub_SmallWatersheds.dat",
        "Sub_Unsat.dat",
    ] {
        assert_eq!(
            read(&again.join(name)),
            read(&out.join(name)),
            "{} should be unchanged by a second pass",
            name
        );
    }
}

#[test]
fn missing_unsaturated_zone_file_stops_before_writing() {
    let temp = TempDir::new().expect("tempdir should be created");
    let model_dir = temp.path().join("model");
    let out = temp.path().join("sub");
    model(&model_dir);
    fs::remove_file(model_dir.join("Unsat.dat")).expect("fixture should be removed");
    let manifest_path = temp.path().join("Sub_submodel.json");
    manifest().save(&manifest_path).expect("manifest should be saved");

    let error = extract_simulation(&model_dir.join("Simulation.in"), &manifest_path, &out, "Sub")
        .expect_err("missing unsaturated zone file should fail");
    assert_eq!(error.category(), IwfmErrorCategory::MissingFile);
    assert!(!out.exists());
}

#[test]
fn missing_manifest_is_reported_as_a_missing_file() {
    let temp = TempDir::new().expect("tempdir should be created");
    let model_dir = temp.path().join("model");
    model(&model_dir);
    let error = extract_simulation(
        &model_dir.join("Simulation.in"),
        &temp.path().join("absent.json"),
        &temp.path().join("sub"),
        "Sub",
    )
    .expect_err("missing manifest should fail");
    assert_eq!(error.category(), IwfmErrorCategory::MissingFile);
}
