//! Integration tests for the consumed-message, produced-message, service and
//! data-product views.

use flowmap_core::{Catalog, ChannelRef, MessageKind, Participant};
use flowmap_graph::{AssemblyOptions, GraphAssembler, NodeGraph};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn load(json: &str) -> Catalog {
    Catalog::from_json(json).expect("fixture catalog should load")
}

fn edge_ids(graph: &NodeGraph) -> Vec<&str> {
    graph.edges.iter().map(|e| e.id.as_str()).collect()
}

fn service<'c>(catalog: &'c Catalog, id: &str) -> Participant<'c> {
    Participant::Service(catalog.find_service(id, "1.0.0").expect("service in fixture"))
}

fn channels(ids: &[&str]) -> Vec<ChannelRef> {
    ids.iter().map(|id| ChannelRef::new(*id, Some("1.0.0"))).collect()
}

const CHAIN_CATALOG: &str = r#"{
    "services": [
        {"id": "OrderService", "version": "1.0.0",
         "sends": [{"id": "PaymentProcessed", "version": "1.0.0",
                    "to": [{"id": "EventBridgeChannel", "version": "1.0.0"}]}]},
        {"id": "PaymentService", "version": "1.0.0",
         "receives": [{"id": "PaymentProcessed", "version": "1.0.0",
                       "from": [{"id": "SQSChannel", "version": "1.0.0"}]}]}
    ],
    "events": [{"id": "PaymentProcessed", "version": "1.0.0"}],
    "channels": [
        {"id": "EventBridgeChannel", "version": "1.0.0",
         "routes": [{"id": "SNSChannel", "version": "1.0.0"}]},
        {"id": "SNSChannel", "version": "1.0.0",
         "routes": [{"id": "SQSChannel", "version": "1.0.0"}]},
        {"id": "SQSChannel", "version": "1.0.0"}
    ]
}"#;

const CHAIN_EDGES: [&str; 5] = [
    "OrderService-1.0.0-PaymentProcessed-1.0.0",
    "PaymentProcessed-1.0.0-EventBridgeChannel-1.0.0",
    "EventBridgeChannel-1.0.0-SNSChannel-1.0.0",
    "SNSChannel-1.0.0-SQSChannel-1.0.0",
    "SQSChannel-1.0.0-PaymentService-1.0.0",
];

// ---------------------------------------------------------------------------
// Consumed-message view
// ---------------------------------------------------------------------------

#[test]
fn consumed_view_follows_producer_chain_into_target() {
    let catalog = load(CHAIN_CATALOG);
    let assembler = GraphAssembler::new(&catalog);
    let message = catalog
        .find_message(MessageKind::Event, "PaymentProcessed", "1.0.0")
        .unwrap();
    let graph = assembler.consumed_message_graph(
        message,
        service(&catalog, "PaymentService"),
        &channels(&["SQSChannel"]),
    );

    let mut ids = edge_ids(&graph);
    ids.sort_unstable();
    let mut expected = CHAIN_EDGES.to_vec();
    expected.sort_unstable();
    assert_eq!(ids, expected);
    for channel in ["EventBridgeChannel-1.0.0", "SNSChannel-1.0.0", "SQSChannel-1.0.0"] {
        assert!(graph.has_node(channel), "{channel}");
    }
}

#[test]
fn consumed_view_warns_when_nothing_produces_the_message() {
    let catalog = load(
        r#"{
            "services": [{"id": "Lonely", "version": "1.0.0",
                          "receives": [{"id": "Orphan"}]}],
            "events": [{"id": "Orphan", "version": "1.0.0"}]
        }"#,
    );
    let assembler = GraphAssembler::new(&catalog);
    let message = catalog.find_message(MessageKind::Event, "Orphan", "1.0.0").unwrap();
    let graph = assembler.consumed_message_graph(message, service(&catalog, "Lonely"), &[]);

    assert_eq!(edge_ids(&graph), vec!["Orphan-1.0.0-Lonely-1.0.0-warning"]);
}

#[test]
fn consumed_view_without_producer_channels_stops_at_target_channel() {
    let catalog = load(
        r#"{
            "services": [
                {"id": "Producer", "version": "1.0.0", "sends": [{"id": "OrderPlaced"}]},
                {"id": "Consumer", "version": "1.0.0",
                 "receives": [{"id": "OrderPlaced", "from": [{"id": "sqs", "version": "1.0.0"}]}]}
            ],
            "events": [{"id": "OrderPlaced", "version": "1.0.0"}],
            "channels": [{"id": "sqs", "version": "1.0.0"}]
        }"#,
    );
    let assembler = GraphAssembler::new(&catalog);
    let message = catalog.find_message(MessageKind::Event, "OrderPlaced", "1.0.0").unwrap();
    let graph = assembler.consumed_message_graph(message, service(&catalog, "Consumer"), &channels(&["sqs"]));

    assert!(graph.has_node("sqs-1.0.0"));
    assert_eq!(
        edge_ids(&graph),
        vec![
            "Producer-1.0.0-OrderPlaced-1.0.0",
            "OrderPlaced-1.0.0-sqs-1.0.0",
        ]
    );
}

#[test]
fn consumed_view_ignores_producer_channels_when_target_reads_directly() {
    let catalog = load(
        r#"{
            "services": [
                {"id": "Producer", "version": "1.0.0",
                 "sends": [{"id": "OrderPlaced", "to": [{"id": "sqs"}]}]},
                {"id": "Consumer", "version": "1.0.0", "receives": [{"id": "OrderPlaced"}]}
            ],
            "events": [{"id": "OrderPlaced", "version": "1.0.0"}],
            "channels": [{"id": "sqs", "version": "1.0.0"}]
        }"#,
    );
    let assembler = GraphAssembler::new(&catalog);
    let message = catalog.find_message(MessageKind::Event, "OrderPlaced", "1.0.0").unwrap();
    let graph = assembler.consumed_message_graph(message, service(&catalog, "Consumer"), &[]);

    assert_eq!(
        edge_ids(&graph),
        vec![
            "Producer-1.0.0-OrderPlaced-1.0.0",
            "OrderPlaced-1.0.0-Consumer-1.0.0",
        ]
    );
    assert!(!graph.has_node("sqs-1.0.0"));
}

// ---------------------------------------------------------------------------
// Produced-message view
// ---------------------------------------------------------------------------

#[test]
fn produced_view_follows_source_chain_to_consumer() {
    let catalog = load(CHAIN_CATALOG);
    let assembler = GraphAssembler::new(&catalog);
    let message = catalog
        .find_message(MessageKind::Event, "PaymentProcessed", "1.0.0")
        .unwrap();
    let graph = assembler.produced_message_graph(
        message,
        service(&catalog, "OrderService"),
        &channels(&["EventBridgeChannel"]),
    );

    assert_eq!(edge_ids(&graph), CHAIN_EDGES.to_vec());
}

#[test]
fn produced_view_never_reverses_an_unresolvable_source_channel() {
    let catalog = load(
        r#"{
            "services": [
                {"id": "OrderService", "version": "1.0.0",
                 "sends": [{"id": "PaymentProcessed", "to": [{"id": "X", "version": "99.0.0"}]}]},
                {"id": "PaymentService", "version": "1.0.0",
                 "receives": [{"id": "PaymentProcessed"}]}
            ],
            "events": [{"id": "PaymentProcessed", "version": "1.0.0"}],
            "channels": [{"id": "X", "version": "1.0.0"}]
        }"#,
    );
    let assembler = GraphAssembler::new(&catalog);
    let message = catalog
        .find_message(MessageKind::Event, "PaymentProcessed", "1.0.0")
        .unwrap();
    let graph = assembler.produced_message_graph(
        message,
        service(&catalog, "OrderService"),
        &[ChannelRef::new("X", Some("99.0.0"))],
    );

    assert_eq!(
        edge_ids(&graph),
        vec![
            "OrderService-1.0.0-PaymentProcessed-1.0.0",
            "PaymentProcessed-1.0.0-PaymentService-1.0.0",
        ]
    );
    assert!(!graph.has_node("X-1.0.0"));
}

#[test]
fn produced_view_links_consumer_with_unknown_channel_directly() {
    let catalog = load(
        r#"{
            "services": [
                {"id": "Source", "version": "1.0.0", "sends": [{"id": "OrderPlaced"}]},
                {"id": "Sink", "version": "1.0.0",
                 "receives": [{"id": "OrderPlaced", "from": [{"id": "nonexistent"}]}]}
            ],
            "events": [{"id": "OrderPlaced", "version": "1.0.0"}]
        }"#,
    );
    let assembler = GraphAssembler::new(&catalog);
    let message = catalog.find_message(MessageKind::Event, "OrderPlaced", "1.0.0").unwrap();
    let graph = assembler.produced_message_graph(message, service(&catalog, "Source"), &[]);

    assert_eq!(
        edge_ids(&graph),
        vec![
            "Source-1.0.0-OrderPlaced-1.0.0",
            "OrderPlaced-1.0.0-Sink-1.0.0",
        ]
    );
    assert_eq!(graph.edge("OrderPlaced-1.0.0-Sink-1.0.0").unwrap().label, "consumes");
}

#[test]
fn produced_view_shows_source_channel_beside_direct_consumer() {
    let catalog = load(
        r#"{
            "services": [
                {"id": "Source", "version": "1.0.0",
                 "sends": [{"id": "OrderPlaced", "to": [{"id": "sqs"}]}]},
                {"id": "Sink", "version": "1.0.0", "receives": [{"id": "OrderPlaced"}]}
            ],
            "events": [{"id": "OrderPlaced", "version": "1.0.0"}],
            "channels": [{"id": "sqs", "version": "1.0.0"}]
        }"#,
    );
    let assembler = GraphAssembler::new(&catalog);
    let message = catalog.find_message(MessageKind::Event, "OrderPlaced", "1.0.0").unwrap();
    let graph = assembler.produced_message_graph(
        message,
        service(&catalog, "Source"),
        &[ChannelRef::new("sqs", None)],
    );

    assert_eq!(
        edge_ids(&graph),
        vec![
            "Source-1.0.0-OrderPlaced-1.0.0",
            "OrderPlaced-1.0.0-sqs-1.0.0",
            "OrderPlaced-1.0.0-Sink-1.0.0",
        ]
    );
}

#[test]
fn produced_view_shows_latest_consumer_versions_by_default() {
    let catalog = load(
        r#"{
            "services": [
                {"id": "Source", "version": "1.0.0", "sends": [{"id": "OrderPlaced"}]},
                {"id": "Sink", "version": "1.0.0", "receives": [{"id": "OrderPlaced"}]},
                {"id": "Sink", "version": "2.0.0", "receives": [{"id": "OrderPlaced"}]}
            ],
            "events": [{"id": "OrderPlaced", "version": "1.0.0"}]
        }"#,
    );
    let message = catalog.find_message(MessageKind::Event, "OrderPlaced", "1.0.0").unwrap();
    let source = service(&catalog, "Source");

    let latest_only = GraphAssembler::new(&catalog).produced_message_graph(message, source, &[]);
    assert!(latest_only.has_node("Sink-2.0.0"));
    assert!(!latest_only.has_node("Sink-1.0.0"));

    let every_version = GraphAssembler::with_options(
        &catalog,
        AssemblyOptions {
            latest_consumers_only: false,
            ..AssemblyOptions::default()
        },
    )
    .produced_message_graph(message, source, &[]);
    assert!(every_version.has_node("Sink-1.0.0"));
    assert!(every_version.has_node("Sink-2.0.0"));
}

// ---------------------------------------------------------------------------
// Service view
// ---------------------------------------------------------------------------

#[test]
fn service_view_merges_sent_and_received_messages() {
    let catalog = load(
        r#"{
            "services": [
                {"id": "Inventory", "version": "1.0.0",
                 "sends": [{"id": "StockReserved"}, {"id": "StockAdjusted"}],
                 "receives": [{"id": "OrderPlaced"}, {"id": "StockAdjusted"}]},
                {"id": "Orders", "version": "1.0.0",
                 "sends": [{"id": "OrderPlaced"}],
                 "receives": [{"id": "StockReserved"}]}
            ],
            "events": [
                {"id": "OrderPlaced", "version": "1.0.0"},
                {"id": "StockReserved", "version": "1.0.0"},
                {"id": "StockAdjusted", "version": "1.0.0"}
            ]
        }"#,
    );
    let graph = GraphAssembler::new(&catalog).service_graph("Inventory", "1.0.0");

    assert_eq!(graph.nodes[0].id.as_str(), "Inventory-1.0.0");
    for edge in [
        "Orders-1.0.0-OrderPlaced-1.0.0",
        "OrderPlaced-1.0.0-Inventory-1.0.0",
        "Inventory-1.0.0-StockReserved-1.0.0",
        "StockReserved-1.0.0-Orders-1.0.0",
        "Inventory-1.0.0-StockAdjusted-1.0.0-both",
    ] {
        assert!(graph.has_edge(edge), "missing {edge}");
    }
    assert_eq!(
        graph.edge("Inventory-1.0.0-StockAdjusted-1.0.0-both").unwrap().label,
        "publishes event & receives event"
    );
    assert!(!graph.has_edge("Inventory-1.0.0-OrderPlaced-1.0.0-both"));
    assert!(graph.validate().is_ok());
}

#[test]
fn service_view_hydrates_ranged_receives() {
    let catalog = load(
        r#"{
            "services": [
                {"id": "Reporter", "version": "1.0.0",
                 "receives": [{"id": "OrderPlaced", "version": "1.x"}]}
            ],
            "events": [
                {"id": "OrderPlaced", "version": "1.0.0"},
                {"id": "OrderPlaced", "version": "1.1.0"},
                {"id": "OrderPlaced", "version": "2.0.0"}
            ]
        }"#,
    );
    let graph = GraphAssembler::new(&catalog).service_graph("Reporter", "1.0.0");

    assert!(graph.has_node("OrderPlaced-1.0.0"));
    assert!(graph.has_node("OrderPlaced-1.1.0"));
    assert!(!graph.has_node("OrderPlaced-2.0.0"));
}

#[test]
fn unknown_service_yields_empty_graph() {
    let catalog = load(CHAIN_CATALOG);
    assert!(GraphAssembler::new(&catalog)
        .service_graph("Unknown", "1.0.0")
        .is_empty());
}

// ---------------------------------------------------------------------------
// Data-product view
// ---------------------------------------------------------------------------

#[test]
fn data_product_view_shows_inputs_with_producers_and_outputs() {
    let catalog = load(
        r#"{
            "services": [
                {"id": "Orders", "version": "1.0.0",
                 "sends": [{"id": "OrderPlaced", "to": [{"id": "orders"}]}]},
                {"id": "Inventory", "version": "1.0.0"}
            ],
            "events": [
                {"id": "OrderPlaced", "version": "1.0.0"},
                {"id": "SalesReported", "version": "1.0.0"}
            ],
            "channels": [{"id": "orders", "version": "1.0.0"}],
            "dataProducts": [
                {"id": "Sales", "version": "1.0.0",
                 "inputs": [{"id": "OrderPlaced"}, {"id": "Inventory"}, {"id": "Ghost"}],
                 "outputs": [{"id": "SalesReported", "version": "1.0.0"}]}
            ]
        }"#,
    );
    let graph = GraphAssembler::new(&catalog).data_product_graph("Sales", "1.0.0");

    assert_eq!(
        edge_ids(&graph),
        vec![
            "Orders-1.0.0-OrderPlaced-1.0.0",
            "OrderPlaced-1.0.0-Sales-1.0.0",
            "Inventory-1.0.0-Sales-1.0.0",
            "Sales-1.0.0-SalesReported-1.0.0",
        ]
    );
    assert_eq!(graph.edge("OrderPlaced-1.0.0-Sales-1.0.0").unwrap().label, "input");
    assert_eq!(graph.edge("Sales-1.0.0-SalesReported-1.0.0").unwrap().label, "output");
    assert!(!graph.has_node("orders-1.0.0"));
    assert!(graph.nodes.iter().all(|n| !n.id.as_str().starts_with("Ghost")));
}

#[test]
fn unknown_data_product_yields_empty_graph() {
    let catalog = load(CHAIN_CATALOG);
    assert!(GraphAssembler::new(&catalog)
        .data_product_graph("Unknown", "1.0.0")
        .is_empty());
}
