//! Direct write path: writes land in the store.

use client_gateway::{ClientId, ClientPatch, GatewayError, StoreError};

use crate::support::{ana, bob, Harness};

#[test]
fn create_then_get_returns_same_record() {
    let h = Harness::direct();

    let created = h.gateway.create_client(ana()).unwrap();
    assert_eq!(created, ana());

    let loaded = h.gateway.get_client(&ana().id).unwrap();
    assert_eq!(loaded, ana());
}

#[test]
fn create_never_publishes() {
    let h = Harness::direct();
    h.gateway.create_client(ana()).unwrap();

    assert!(h.queue.is_empty());
    assert_eq!(h.queue.pending_len(), 0);
}

#[test]
fn duplicate_create_is_insertion_failed() {
    let h = Harness::direct();
    h.gateway.create_client(ana()).unwrap();

    let err = h.gateway.create_client(ana()).unwrap_err();
    assert!(matches!(err, GatewayError::InsertionFailed(_)));
}

#[test]
fn create_with_store_down_is_insertion_failed() {
    let h = Harness::direct();
    h.store.set_offline(true);

    let err = h.gateway.create_client(ana()).unwrap_err();
    assert!(matches!(err, GatewayError::InsertionFailed(_)));
}

#[test]
fn partial_update_merges_instead_of_replacing() {
    let h = Harness::direct();
    h.gateway.create_client(ana()).unwrap();

    let updated = h
        .gateway
        .update_client(&ana().id, &ClientPatch::new().email("ana@y.com"))
        .unwrap();

    assert_eq!(updated.email, "ana@y.com");
    assert_eq!(updated.name, "Ana");
    assert_eq!(updated.location, "NY");
    assert_eq!(updated.phone_number, 555);
    assert_eq!(h.gateway.get_client(&ana().id).unwrap(), updated);
}

#[test]
fn update_only_touches_its_record() {
    let h = Harness::direct();
    h.gateway.create_client(ana()).unwrap();
    h.gateway.create_client(bob()).unwrap();

    h.gateway
        .update_client(&ana().id, &ClientPatch::new().location("LA"))
        .unwrap();

    assert_eq!(h.gateway.get_client(&bob().id).unwrap(), bob());
}

#[test]
fn update_of_unknown_id_is_not_found_and_creates_nothing() {
    let h = Harness::direct();

    let err = h
        .gateway
        .update_client(&ClientId::new("ghost"), &ClientPatch::new().name("Casper"))
        .unwrap_err();

    assert_eq!(err, GatewayError::NotFound(ClientId::new("ghost")));
    assert_eq!(h.store.count("clients"), 0);
}

#[test]
fn update_with_store_down_is_insertion_failed() {
    let h = Harness::direct();
    h.gateway.create_client(ana()).unwrap();
    h.store
        .inject_fault(StoreError::Timeout("update exceeded deadline".into()));

    let err = h
        .gateway
        .update_client(&ana().id, &ClientPatch::new().name("Anna"))
        .unwrap_err();
    assert!(matches!(err, GatewayError::InsertionFailed(_)));
}

#[test]
fn empty_update_returns_current_record() {
    let h = Harness::direct();
    h.gateway.create_client(ana()).unwrap();

    let updated = h
        .gateway
        .update_client(&ana().id, &ClientPatch::new())
        .unwrap();

    assert_eq!(updated, ana());
    assert_eq!(h.store.stats().updates, 0);
}
