//! Integration tests for loading and querying catalog snapshots.

use flowmap_core::{
    Catalog, ChannelRef, MessageKind, RelationKind, ResourceKind, ResourcePointer, VersionSpec,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn payments() -> Catalog {
    Catalog::from_json(
        r#"{
            "services": [
                {"id": "PaymentService", "version": "2.1.0",
                 "sends": [{"id": "PaymentTaken", "version": "^1.0.0",
                            "to": [{"id": "payments", "version": "1.x"}]}],
                 "receives": [{"id": "ChargeCard", "from": [{"id": "payments"}]}]}
            ],
            "events": [
                {"id": "PaymentTaken", "version": "0.9.0"},
                {"id": "PaymentTaken", "version": "1.0.0"},
                {"id": "PaymentTaken", "version": "1.4.2"},
                {"id": "PaymentTaken", "version": "2.0.0"}
            ],
            "commands": [{"id": "ChargeCard", "version": "1.0.0"}],
            "queries": [{"id": "GetBalance", "version": "1.0.0"}],
            "channels": [
                {"id": "payments", "version": "1.0.0"},
                {"id": "payments", "version": "1.3.0"},
                {"id": "payments", "version": "2.0.0"}
            ],
            "dataProducts": [
                {"id": "Ledger", "version": "1.0.0",
                 "inputs": [{"id": "PaymentTaken", "version": "~1.4.0"}],
                 "outputs": [{"id": "GetBalance"}]}
            ]
        }"#,
    )
    .expect("payments snapshot should load")
}

fn versions(catalog: &Catalog, id: &str, spec: &str) -> Vec<String> {
    let spec = VersionSpec::parse(spec).expect("spec should parse");
    catalog
        .messages_matching(id, &spec)
        .into_iter()
        .map(|m| m.version().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Hydration
// ---------------------------------------------------------------------------

#[test]
fn ranged_hydration_returns_every_match_in_catalog_order() {
    let catalog = payments();
    assert_eq!(versions(&catalog, "PaymentTaken", "^1.0.0"), ["1.0.0", "1.4.2"]);
    assert_eq!(versions(&catalog, "PaymentTaken", "~1.4.0"), ["1.4.2"]);
    assert_eq!(versions(&catalog, "PaymentTaken", "1.x"), ["1.0.0", "1.4.2"]);
    assert_eq!(versions(&catalog, "PaymentTaken", "latest"), ["2.0.0"]);
    assert_eq!(versions(&catalog, "PaymentTaken", "0.9.0"), ["0.9.0"]);
    assert!(versions(&catalog, "PaymentTaken", "3.0.0").is_empty());
}

#[test]
fn hydration_searches_every_message_kind() {
    let catalog = payments();
    let found = catalog.messages_matching("ChargeCard", &VersionSpec::Latest);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, MessageKind::Command);
}

#[test]
fn channel_ranges_resolve_to_highest_match() {
    let catalog = payments();
    let ranged = catalog
        .resolve_channel(&ChannelRef::new("payments", Some("1.x")))
        .expect("range should resolve");
    assert_eq!(ranged.version, "1.3.0");

    let latest = catalog
        .resolve_channel(&ChannelRef::new("payments", None))
        .expect("latest should resolve");
    assert_eq!(latest.version, "2.0.0");

    assert!(catalog
        .resolve_channel(&ChannelRef::new("payments", Some("1.1.0")))
        .is_none());
}

#[test]
fn exact_lookups_do_not_fall_back() {
    let catalog = payments();
    assert!(catalog.find_service("PaymentService", "2.1.0").is_some());
    assert!(catalog.find_service("PaymentService", "2.0.0").is_none());
    assert!(catalog
        .find_message(MessageKind::Event, "PaymentTaken", "1.4.2")
        .is_some());
    assert!(catalog
        .find_message(MessageKind::Command, "PaymentTaken", "1.4.2")
        .is_none());
    assert_eq!(
        catalog.latest_version(ResourceKind::Channel, "payments"),
        Some("2.0.0")
    );
}

// ---------------------------------------------------------------------------
// Lint
// ---------------------------------------------------------------------------

#[test]
fn consistent_snapshot_has_no_dangling_references() {
    assert!(payments().dangling_references().is_empty());
}

#[test]
fn every_relationship_kind_is_linted() {
    let catalog = Catalog::from_json(
        r#"{
            "services": [
                {"id": "S", "version": "1.0.0",
                 "sends": [{"id": "Gone", "to": [{"id": "void"}]}],
                 "receives": [{"id": "AlsoGone", "from": [{"id": "abyss"}]}]}
            ]
        }"#,
    )
    .unwrap();

    let relations: Vec<RelationKind> = catalog
        .dangling_references()
        .into_iter()
        .map(|d| d.relation)
        .collect();
    assert_eq!(
        relations,
        vec![
            RelationKind::Sends,
            RelationKind::PublishesTo,
            RelationKind::Receives,
            RelationKind::ReadsFrom,
        ]
    );
}

#[test]
fn dangling_target_keeps_its_declared_pointer() {
    let catalog = Catalog::from_json(
        r#"{"services": [{"id": "S", "version": "1.0.0",
                          "receives": [{"id": "Nope", "version": "^2.0.0"}]}]}"#,
    )
    .unwrap();
    let dangling = catalog.dangling_references();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].target, ResourcePointer::new("Nope", Some("^2.0.0")));
    assert_eq!(dangling[0].owner.to_string(), "S@1.0.0");
}

#[test]
fn unknown_fields_and_missing_collections_are_tolerated() {
    let catalog = Catalog::from_json(r#"{"events": [{"id": "A", "version": "1.0.0", "owners": ["x"]}]}"#)
        .unwrap();
    assert_eq!(catalog.events.len(), 1);
    assert!(catalog.services.is_empty());
    assert!(catalog.data_products.is_empty());
}
