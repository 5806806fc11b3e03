//! Tests for Client
//!
//! Server-level commands against a scripted server.

#[path = "../common/mod.rs"]
mod common;

use bloomd::{BloomdError, Client, Config, FilterSpec};
use common::{refused_addr, MockServer};

// =============================================================================
// Helper Functions
// =============================================================================

fn client_on(server: &MockServer) -> Client {
    Client::new(server.config())
}

fn assert_not_dialed(client: &Client) {
    assert!(!client.connection().lock().is_connected());
}

// =============================================================================
// Create Tests
// =============================================================================

#[test]
fn test_create_filter_done_and_exists() {
    let server = MockServer::start(&["Done\n", "Exists\n"]);
    let client = client_on(&server);
    let spec = FilterSpec::new("foo").capacity(100).probability(0.01);

    let filter = client.create_filter(&spec).unwrap();
    assert_eq!(filter.name(), "foo");
    assert_eq!(filter.capacity(), Some(100));
    assert_eq!(filter.probability(), Some(0.01));

    // Creating again is not an error
    client.create_filter(&spec).unwrap();

    assert_eq!(
        server.received(),
        vec![
            "create foo capacity=100 prob=0.01",
            "create foo capacity=100 prob=0.01"
        ]
    );
}

#[test]
fn test_create_in_memory() {
    let server = MockServer::start(&["Done\n"]);
    let client = client_on(&server);

    let filter = client.create_filter(&FilterSpec::new("mem").in_memory(true)).unwrap();
    assert!(filter.in_memory());

    assert_eq!(server.received(), vec!["create mem in_memory=1"]);
}

#[test]
fn test_create_probability_without_capacity() {
    let server = MockServer::start(&[]);
    let client = client_on(&server);

    let err = client
        .create_filter(&FilterSpec::new("foo").probability(0.01))
        .unwrap_err();
    assert!(matches!(err, BloomdError::InvalidArgument(_)));
    assert_not_dialed(&client);
}

#[test]
fn test_create_rejects_bad_parameters() {
    let server = MockServer::start(&[]);
    let client = client_on(&server);

    for spec in [
        FilterSpec::new("foo").capacity(0),
        FilterSpec::new("foo").capacity(10).probability(1.5),
        FilterSpec::new("foo").capacity(10).probability(0.0),
        FilterSpec::new("foo bar"),
    ] {
        let err = client.create_filter(&spec).unwrap_err();
        assert!(matches!(err, BloomdError::InvalidArgument(_)), "{:?}", spec);
    }
    assert_not_dialed(&client);
}

#[test]
fn test_create_unexpected_reply() {
    let server = MockServer::start(&["Client Error: Bad arguments\n"]);
    let client = client_on(&server);

    let err = client.create_filter(&FilterSpec::new("foo")).unwrap_err();
    assert_eq!(err.remote_text(), Some("Client Error: Bad arguments"));
}

#[test]
fn test_created_filter_shares_connection() {
    let server = MockServer::start(&["Done\n", "Yes\n"]);
    let config = Config::builder()
        .server_addr(server.addr())
        .hash_keys(true)
        .build();
    let client = Client::new(config);

    let filter = client.create_filter(&FilterSpec::new("foo")).unwrap();
    assert!(filter.hash_keys());
    assert!(filter.set("k").unwrap());

    let received = server.received();
    assert_eq!(received[0], "create foo");
    assert_eq!(received[1], format!("set foo {}", bloomd::protocol::hash_key("k")));
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn test_get_filter_reads_parameters() {
    let server = MockServer::start(&[
        "START\ncapacity 100000\nchecks 0\ncheck_hits 0\ncheck_misses 0\nin_memory 1\n\
         page_ins 0\npage_outs 0\nprobability 0.000100\nsets 0\nset_hits 0\nset_misses 0\n\
         size 0\nstorage 240141\nEND\n",
    ]);
    let client = client_on(&server);

    let filter = client.get_filter("foo").unwrap();
    assert_eq!(filter.name(), "foo");
    assert_eq!(filter.capacity(), Some(100000));
    assert_eq!(filter.probability(), Some(0.0001));
    assert!(filter.in_memory());
    assert!(!filter.hash_keys());

    assert_eq!(server.received(), vec!["info foo"]);
}

#[test]
fn test_get_missing_filter() {
    let server = MockServer::start(&["Filter does not exist\n"]);
    let client = client_on(&server);

    let err = client.get_filter("nope").unwrap_err();
    assert!(err.is_filter_not_found(), "{:?}", err);
}

#[test]
fn test_get_filter_with_short_info_block() {
    let server = MockServer::start(&["START\ncapacity 10\nEND\n"]);
    let client = client_on(&server);

    assert!(matches!(client.get_filter("foo"), Err(BloomdError::Protocol(_))));
}

// =============================================================================
// List Tests
// =============================================================================

#[test]
fn test_list_filters() {
    let server = MockServer::start(&[
        "START\nfoo 100 0 0 00 0 0 0.0100 0\nbar 0.000100 300046 100000 0\nEND\n",
    ]);
    let client = client_on(&server);

    let filters = client.list_filters().unwrap();
    assert_eq!(filters.get("foo"), Some("100 0 0 00 0 0 0.0100 0"));
    assert_eq!(filters.get("bar"), Some("0.000100 300046 100000 0"));
    assert_eq!(filters.keys().collect::<Vec<_>>(), vec!["foo", "bar"]);

    assert_eq!(server.received(), vec!["list"]);
}

#[test]
fn test_list_no_filters() {
    let server = MockServer::start(&["START\nEND\n"]);
    let client = client_on(&server);

    assert!(client.list_filters().unwrap().is_empty());
}

#[test]
fn test_list_malformed_line() {
    let server = MockServer::start(&["START\nfoo\nEND\n"]);
    let client = client_on(&server);

    assert!(matches!(client.list_filters(), Err(BloomdError::Protocol(_))));
}

// =============================================================================
// Flush Tests
// =============================================================================

#[test]
fn test_flush() {
    let server = MockServer::start(&["Done\n"]);
    let client = client_on(&server);

    client.flush().unwrap();
    assert_eq!(server.received(), vec!["flush"]);
}

#[test]
fn test_flush_unexpected_reply() {
    let server = MockServer::start(&["Internal Error\n"]);
    let client = client_on(&server);

    let err = client.flush().unwrap_err();
    assert_eq!(err.remote_text(), Some("Internal Error"));
}

// =============================================================================
// Connection Tests
// =============================================================================

#[test]
fn test_connect_refused() {
    let config = Config::builder().server_addr(refused_addr()).build();
    assert!(matches!(Client::connect(config), Err(BloomdError::Connection(_))));
}

#[test]
fn test_close_client() {
    let server = MockServer::start(&["Done\n"]);
    let client = Client::connect(server.config()).unwrap();

    client.flush().unwrap();
    client.close();

    assert!(matches!(client.flush(), Err(BloomdError::Connection(_))));
}
