use super::*;
use crate::config::profile_catalog::ec_nog_profile;
use crate::domain::load::{Load, LoadId};
use crate::domain::types::{BulkSubtype, UldType};

// ==========================================
// 测试辅助函数
// ==========================================

fn request(destination: &str) -> ManifestRequest {
    ManifestRequest {
        flight_no: "XX123".to_string(),
        destination: destination.to_string(),
        day_of_month: 5,
        origin_code: "CZL".to_string(),
    }
}

fn load(id: u64, uld_type: UldType, uld_id: &str, weight: u32, position: &str) -> Load {
    Load {
        id: LoadId(id),
        uld_type,
        uld_id: uld_id.to_string(),
        bulk_subtype: BulkSubtype::By,
        weight,
        position: position.to_string(),
    }
}

fn body(manifest: &CpmManifest) -> Vec<&str> {
    manifest.lines.iter().map(|l| l.text.as_str()).collect()
}

// ==========================================
// 片段格式
// ==========================================

#[test]
fn test_segment_formats() {
    assert_eq!(format_segment("24L", None, "PAR"), "-24L/X");

    let placeholder = load(1, UldType::Ake, "", 300, "24L");
    assert_eq!(format_segment("24L", Some(&placeholder), "PAR"), "-24L/X");

    let ake = load(2, UldType::Ake, "TT1234", 0, "24L");
    assert_eq!(
        format_segment("24L", Some(&ake), "PAR"),
        "-24L/AKETT1234/X/BY/PAR"
    );

    let blk = load(3, UldType::Blk, "", 250, "51");
    assert_eq!(format_segment("51", Some(&blk), "PAR"), "-51/250/BY/PAR");

    let mut fkt = load(4, UldType::Blk, "", 0, "52");
    fkt.bulk_subtype = BulkSubtype::Fkt;
    assert_eq!(format_segment("52", Some(&fkt), "PAR"), "-52/BLK/E/PAR");

    let mut fkt_ake = load(5, UldType::Ake, "12345AB", 0, "11L");
    fkt_ake.bulk_subtype = BulkSubtype::Fkt;
    assert_eq!(format_segment("11L", Some(&fkt_ake), "PAR"), "-11L/AKE/E/PAR");
}

#[test]
fn test_numeric_prefix() {
    assert_eq!(numeric_prefix("24P"), 24);
    assert_eq!(numeric_prefix("26L"), 26);
    assert_eq!(numeric_prefix("53"), 53);
    assert_eq!(numeric_prefix("X1"), 0);
}

// ==========================================
// 报文整体
// ==========================================

#[test]
fn test_empty_load_set_exports_pallets_and_bulk() {
    let profile = ec_nog_profile();
    let manifest = ManifestFormatter::new().build(&[], &profile, &request("PAR"));

    assert_eq!(
        body(&manifest),
        vec![
            "-11P/X", "-12P/X", "-21P/X", "-22P/X", "-23P/X", "-24P/X", "-31P/X", "-32P/X",
            "-33P/X", "-41P/X", "-42P/X", "-51/X", "-52/X", "-53/X",
        ]
    );
    assert_eq!(manifest.total_weight, 0);
}

#[test]
fn test_paired_container_line() {
    let profile = ec_nog_profile();
    let loads = vec![
        load(1, UldType::Ake, "TT1234", 100, "24L"),
        load(2, UldType::Ake, "", 0, "24R"),
    ];
    let manifest = ManifestFormatter::new().build(&loads, &profile, &request("PAR"));

    let expected = "\
CPM
XX123/05.EC-NOG PAR
-11P/X
-12P/X
-21P/X
-22P/X
-24L/AKETT1234/100/BY/PAR-24R/X
-24P/X
-31P/X
-32P/X
-33P/X
-41P/X
-42P/X
-51/X
-52/X
-53/X
SI CZL-PAR C 0 M 0 Total Pieces/100 O 0 T 0";
    assert_eq!(manifest.to_text(), expected);
}

#[test]
fn test_pallet_only_suppression() {
    let profile = ec_nog_profile();
    let manifest = ManifestFormatter::new().build(&[], &profile, &request("PAR"));
    let texts = body(&manifest);

    assert!(texts.contains(&"-24P/X"));
    for c in ["26L", "26R", "25L", "25R"] {
        assert!(
            !texts.iter().any(|t| t.contains(&format!("-{}/", c))),
            "{} should be suppressed",
            c
        );
    }
}

#[test]
fn test_loaded_pallet_hides_blocked_containers() {
    let profile = ec_nog_profile();
    let loads = vec![load(1, UldType::Pmc, "12345R7", 1500, "24P")];
    let manifest = ManifestFormatter::new().build(&loads, &profile, &request("PAR"));
    let texts = body(&manifest);

    assert!(texts.contains(&"-24P/PMC12345R7/1500/BY/PAR"));
    // 23P 整板无货: 只输出 23P, 25/24 行被压制
    assert!(texts.contains(&"-23P/X"));
    assert!(!texts.iter().any(|t| t.starts_with("-26L") || t.starts_with("-25L")));
    assert!(!texts.iter().any(|t| t.starts_with("-24L")));
}

#[test]
fn test_sort_by_numeric_prefix() {
    let profile = ec_nog_profile();
    let loads = vec![load(1, UldType::Ake, "55555AB", 200, "13L")];
    let manifest = ManifestFormatter::new().build(&loads, &profile, &request("MAD"));
    let positions: Vec<&str> = manifest.lines.iter().map(|l| l.position.as_str()).collect();

    let i11 = positions.iter().position(|p| *p == "11P").unwrap();
    let i13 = positions.iter().position(|p| *p == "13L").unwrap();
    let i24 = positions.iter().position(|p| *p == "24P").unwrap();
    assert!(i11 < i13 && i13 < i24);
    assert!(!positions.contains(&"12P"));
    assert_eq!(&positions[positions.len() - 3..], &["51", "52", "53"]);
}

#[test]
fn test_same_prefix_orders_by_suffix() {
    let profile = ec_nog_profile();
    let loads = vec![load(1, UldType::Ake, "TT1234", 100, "24L")];
    let manifest = ManifestFormatter::new().build(&loads, &profile, &request("PAR"));
    let positions: Vec<&str> = manifest.lines.iter().map(|l| l.position.as_str()).collect();

    let i24l = positions.iter().position(|p| *p == "24L").unwrap();
    let i24p = positions.iter().position(|p| *p == "24P").unwrap();
    assert_eq!(i24l + 1, i24p);
}

#[test]
fn test_bulk_lines_and_total_weight() {
    let profile = ec_nog_profile();
    let mut fkt = load(2, UldType::Blk, "", 0, "52");
    fkt.bulk_subtype = BulkSubtype::Fkt;
    let loads = vec![
        load(1, UldType::Blk, "", 250, "51"),
        fkt,
        // 未放置记录同样计入总重量
        load(3, UldType::Ake, "99999AB", 400, ""),
    ];
    let manifest = ManifestFormatter::new().build(&loads, &profile, &request("PAR"));
    let texts = body(&manifest);

    assert!(texts.contains(&"-51/250/BY/PAR"));
    assert!(texts.contains(&"-52/BLK/E/PAR"));
    assert!(texts.contains(&"-53/X"));
    assert_eq!(manifest.total_weight, 650);
    assert_eq!(
        manifest.trailer,
        "SI CZL-PAR C 0 M 0 Total Pieces/650 O 0 T 0"
    );
}

#[test]
fn test_fkt_container_without_identity_is_kept() {
    let profile = ec_nog_profile();
    let mut fkt = load(1, UldType::Ake, "", 0, "26L");
    fkt.bulk_subtype = BulkSubtype::Fkt;
    let manifest = ManifestFormatter::new().build(&[fkt], &profile, &request("PAR"));
    let texts = body(&manifest);

    assert!(texts.contains(&"-26L/AKE/E/PAR-26R/X"));
    // 24P 因其下有货不再整板输出, 但未被互斥（FKT 无编号不占用）
    assert!(texts.contains(&"-24P/X"));
}

#[test]
fn test_header_zero_pads_day() {
    let profile = ec_nog_profile();
    let mut req = request("PAR");
    req.day_of_month = 9;
    let manifest = ManifestFormatter::new().build(&[], &profile, &req);
    assert_eq!(manifest.header, vec!["CPM", "XX123/09.EC-NOG PAR"]);
}

#[test]
fn test_pair_with_one_blocked_side_keeps_other_side() {
    use crate::domain::profile::{AircraftProfile, ProfileDefinition};
    use std::collections::BTreeMap;

    // 24P 只覆盖 26L, 26R 不受其互斥
    let mut pallet_blocks = BTreeMap::new();
    pallet_blocks.insert("24P".to_string(), vec!["26L".to_string()]);
    let profile = AircraftProfile::from_definition(ProfileDefinition {
        registration: "EC-ONE".to_string(),
        aircraft_type: "TEST".to_string(),
        container_positions: vec!["26L".to_string(), "26R".to_string()],
        pallet_positions: vec!["24P".to_string()],
        pallet_blocks,
        container_pairs: None,
    })
    .unwrap();

    let loads = vec![
        load(1, UldType::Pmc, "11111R7", 900, "24P"),
        load(2, UldType::Ake, "22222AB", 300, "26R"),
    ];
    let manifest = ManifestFormatter::new().build(&loads, &profile, &request("PAR"));

    assert_eq!(
        body(&manifest),
        vec![
            "-24P/PMC11111R7/900/BY/PAR",
            "-26R/AKE22222AB/300/BY/PAR",
            "-51/X",
            "-52/X",
            "-53/X",
        ]
    );
    assert_eq!(manifest.total_weight, 1200);
}
