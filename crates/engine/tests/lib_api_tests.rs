mod common;

use common::EntryFixture;
use trustplist_engine as tp;
use tp::TrustStoreEngine;

#[test]
fn parse_plist_exposes_grouped_values() {
    let doc = common::trust_store_doc(&[EntryFixture::addtrust()]);
    let tree = tp::parse_plist(doc.as_bytes()).unwrap();
    assert_eq!(tree.version(), Some("1.0"));

    let root = &tree.roots()[0];
    assert_eq!(root.keys(), &["trustList", "trustVersion"]);
    let list = &root.mappings()[0];
    assert_eq!(list.keys(), &[common::FINGERPRINT]);
    let entry = &list.mappings()[0];
    assert_eq!(entry.keys(), &["issuerName", "modDate", "serialNumber", "trustSettings"]);
    assert_eq!(entry.count(tp::ValueKind::Data), 2);
    assert_eq!(entry.count(tp::ValueKind::Date), 1);
    assert_eq!(entry.arrays()[0].len(), 1);
}

#[test]
fn tree_level_extraction_matches_facade() {
    let doc = common::trust_store_doc(&[EntryFixture::addtrust()]);
    let tree = tp::parse_plist(doc.as_bytes()).unwrap();
    let from_tree = tp::extract_records(&tree).unwrap();
    let from_bytes = tp::extract_trust_store(doc.as_bytes(), "mem").unwrap();
    assert_eq!(from_tree, from_bytes);
}

#[test]
fn engine_trait_runs_both_phases() {
    let doc = common::trust_store_doc(&[EntryFixture::addtrust()]);
    let cfg = tp::ExtractConfig::secure_default();
    let parsed = tp::PlistTrustStore::parse(doc.as_bytes(), &cfg).unwrap();
    let report = tp::PlistTrustStore::extract(&parsed, "trait.plist", &cfg).unwrap();
    assert_eq!(report.source_id, "trait.plist");
    assert!(report.record(common::FINGERPRINT).is_some());
    assert!(report.record("00").is_none());
}

#[test]
fn report_serializes_to_json() {
    let doc = common::trust_store_doc(&[EntryFixture::addtrust()]);
    let report =
        tp::extract_trust_store_report(doc.as_bytes(), "json.plist", &tp::ExtractConfig::default()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["source_id"], "json.plist");
    assert_eq!(json["trust_version"], 1);
    let record = &json["records"][0];
    assert_eq!(record["fingerprint"], common::FINGERPRINT);
    assert_eq!(record["mod_date"], "2018-02-20T02:13:51Z");
    assert_eq!(record["serial_number"], "1");
    assert_eq!(record["trust_settings"]["kSecTrustSettingsResult"], "4");
    assert_eq!(record["issuer"][2][0]["kind"], "CommonName");
    assert!(json.get("issues").is_none());
}

#[test]
fn empty_trust_list_yields_no_records() {
    let doc = common::trust_store_doc_with_list("");
    let records = tp::extract_trust_store(doc.as_bytes(), "empty.plist").unwrap();
    assert!(records.is_empty());
}
