use std::io::{Cursor, Read};
use std::path::Path;

use test_log::test;
use webbv_rs::calculation::{run_calculation, CalculationError, CalculationRequest};
use webbv_rs::exclusions::parse_excluded_atoms;
use webbv_rs::report::{bundle_archive, report_file_name, steric_map_file_name};
use webbv_rs::session::{SessionContext, UploadedGeometry};
use webbv_rs::test_ressource;

fn load_fixture() -> UploadedGeometry {
    let path = Path::new(test_ressource!("pd-pme3.xyz"));
    UploadedGeometry::load(path).expect("Could not load the test geometry.")
}

fn phosphine_request() -> CalculationRequest {
    CalculationRequest {
        z_axis_index: 1,
        xz_plane_index: 2,
        ..CalculationRequest::default()
    }
}

#[test]
fn a_full_run_produces_consistent_artifacts() {
    let geometry = load_fixture();
    assert_eq!(geometry.ligand_name, "pd-pme3");
    assert_eq!(geometry.declared_atom_count, 14);

    let result = run_calculation(&geometry, &phosphine_request()).unwrap();
    assert!(result.fraction_buried_volume > 0.0);
    assert!(result.fraction_buried_volume < 1.0);

    let report = String::from_utf8(result.report.clone()).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "Ligand name: pd-pme3");
    assert_eq!(lines[2], "metal_index: 0");
    assert_eq!(lines[3], "z_axis_atoms_index: 1");
    assert_eq!(lines[4], "xz_plane_atoms_index: 2");
    assert_eq!(lines[5], "Reverse_z: false");

    // The steric map is a real PNG.
    let decoded = image::load_from_memory(&result.steric_map_png).unwrap();
    assert!(decoded.width() > 0);

    // The archive mirrors the standalone artifacts byte for byte.
    let archive_bytes = bundle_archive(&result).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(archive_bytes)).unwrap();
    assert_eq!(archive.len(), 2);
    for (name, reference) in [
        (report_file_name("pd-pme3"), &result.report),
        (steric_map_file_name("pd-pme3"), &result.steric_map_png),
    ] {
        let mut content = Vec::new();
        archive
            .by_name(&name)
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(&content, reference);
    }
}

#[test]
fn runs_are_deterministic() {
    let geometry = load_fixture();
    let request = phosphine_request();
    let first = run_calculation(&geometry, &request).unwrap();
    let second = run_calculation(&geometry, &request).unwrap();
    assert_eq!(first, second);
}

#[test]
fn hydrogens_increase_the_buried_volume_when_included() {
    let geometry = load_fixture();
    let without = run_calculation(&geometry, &phosphine_request()).unwrap();
    let request = CalculationRequest {
        include_hs: true,
        ..phosphine_request()
    };
    let with = run_calculation(&geometry, &request).unwrap();
    assert!(with.fraction_buried_volume > without.fraction_buried_volume);
}

#[test]
fn excluding_the_whole_ligand_empties_the_sphere() {
    let geometry = load_fixture();
    let request = CalculationRequest {
        excluded_atoms: parse_excluded_atoms("1,2,3,4,5,6,7,8,9,10,11,12,13"),
        ..phosphine_request()
    };
    let result = run_calculation(&geometry, &request).unwrap();
    assert_eq!(result.fraction_buried_volume, 0.0);
}

#[test]
fn a_bad_center_index_fails_the_calculation() {
    let geometry = load_fixture();
    let request = CalculationRequest {
        center_index: 99,
        ..phosphine_request()
    };
    let result = run_calculation(&geometry, &request);
    assert!(matches!(result, Err(CalculationError::Engine(_))));
}

#[test]
fn the_session_keeps_one_result_per_cycle() {
    let geometry = load_fixture();
    let mut session = SessionContext::new();
    session.stage_upload(&geometry).unwrap();
    let result = run_calculation(&geometry, &phosphine_request()).unwrap();
    session.store_result(result);
    assert!(session.result().is_some());

    session.reset();
    assert!(session.result().is_none());
}
