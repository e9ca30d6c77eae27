//! Event write path: writes become change events, the store is never written.

use client_gateway::{
    ClientId, ClientPatch, GatewayConfig, GatewayError, PublishError, RecordKind,
};

use crate::support::{ana, bob, Harness};

#[test]
fn create_returns_input_and_publishes_it() {
    let h = Harness::eventing();

    let created = h.gateway.create_client(ana()).unwrap();
    assert_eq!(created, ana());

    let events = h.published();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, RecordKind::Client);
    assert_eq!(events[0].content, ana());
}

#[test]
fn create_never_touches_the_store() {
    let h = Harness::eventing();
    h.gateway.create_client(ana()).unwrap();

    assert_eq!(h.store.stats(), Default::default());
    assert_eq!(h.store.count("clients"), 0);

    // The write is not readable until something downstream persists it.
    let err = h.gateway.get_client(&ana().id).unwrap_err();
    assert_eq!(err, GatewayError::NotFound(ana().id));
}

#[test]
fn create_publishes_to_configured_topic() {
    let h = Harness::new(GatewayConfig {
        topic: "crm.clients".into(),
        ..GatewayConfig::default().with_eventing(true)
    });
    h.gateway.create_client(ana()).unwrap();

    assert_eq!(h.queue.messages_for("crm.clients").len(), 1);
}

#[test]
fn update_publishes_once_from_last_stored_state() {
    let h = Harness::eventing();
    h.seed(&ana());

    let updated = h
        .gateway
        .update_client(&ana().id, &ClientPatch::new().location("LA"))
        .unwrap();

    let mut expected = ana();
    expected.location = "LA".into();
    assert_eq!(updated, expected);

    let events = h.published();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].content, expected);

    // Read, never written.
    let stats = h.store.stats();
    assert_eq!(stats.updates, 0);
    assert_eq!(stats.reads, 1);
    assert_eq!(h.gateway.get_client(&ana().id).unwrap().location, "NY");
}

#[test]
fn update_of_unknown_id_is_not_found_and_publishes_nothing() {
    let h = Harness::eventing();

    let err = h
        .gateway
        .update_client(&ClientId::new("ghost"), &ClientPatch::new().name("Casper"))
        .unwrap_err();

    assert_eq!(err, GatewayError::NotFound(ClientId::new("ghost")));
    assert!(h.queue.is_empty());
}

#[test]
fn update_with_store_down_is_store_unavailable() {
    let h = Harness::eventing();
    h.seed(&ana());
    h.store.set_offline(true);

    let err = h
        .gateway
        .update_client(&ana().id, &ClientPatch::new().name("Anna"))
        .unwrap_err();
    assert!(matches!(err, GatewayError::StoreUnavailable(_)));
    assert!(h.queue.is_empty());
}

#[test]
fn transport_failure_is_publish_failed() {
    let h = Harness::eventing();
    h.queue
        .inject_fault(PublishError::ConnectionFailed("broker unreachable".into()));

    let err = h.gateway.create_client(ana()).unwrap_err();
    assert!(matches!(err, GatewayError::PublishFailed(_)));
}

#[test]
fn updates_from_same_stored_state_diverge() {
    let h = Harness::eventing();
    h.seed(&bob());

    h.gateway
        .update_client(&bob().id, &ClientPatch::new().location("LA"))
        .unwrap();
    h.gateway
        .update_client(&bob().id, &ClientPatch::new().email("bob@z.com"))
        .unwrap();

    // Both versions were computed from the stored record, so neither
    // carries the other's change.
    let events = h.published();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].content.location, "LA");
    assert_eq!(events[0].content.email, "b@x.com");
    assert_eq!(events[1].content.location, "SF");
    assert_eq!(events[1].content.email, "bob@z.com");
}
