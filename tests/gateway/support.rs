//! Test harness: a gateway wired to an in-memory store and queue.

#![allow(dead_code)]

use std::sync::Arc;

use client_gateway::bus::Subscriber;
use client_gateway::{
    ChangeEvent, Client, ClientId, Gateway, GatewayConfig, InMemoryDocumentStore, InMemoryQueue,
};

pub struct Harness {
    pub store: InMemoryDocumentStore,
    pub queue: InMemoryQueue,
    pub gateway: Gateway,
}

impl Harness {
    pub fn new(config: GatewayConfig) -> Self {
        let store = InMemoryDocumentStore::new();
        let queue = InMemoryQueue::new();
        let gateway = Gateway::new(&config, Arc::new(store.clone()), Arc::new(queue.clone()));
        Self {
            store,
            queue,
            gateway,
        }
    }

    pub fn direct() -> Self {
        Self::new(GatewayConfig::default())
    }

    pub fn eventing() -> Self {
        Self::new(GatewayConfig::default().with_eventing(true))
    }

    /// Put a record straight into the store, bypassing the gateway.
    pub fn seed(&self, client: &Client) {
        client_gateway::ClientRepository::new(
            Arc::new(self.store.clone()),
            &GatewayConfig::default(),
        )
        .insert(client)
        .unwrap();
    }

    /// Every change event delivered so far, in order.
    pub fn published(&self) -> Vec<ChangeEvent> {
        let subscriber = self.queue.new_subscriber();
        let mut events = Vec::new();
        while let Some(message) = subscriber.poll(0).unwrap() {
            events.push(message.decode().unwrap());
        }
        events
    }
}

pub fn ana() -> Client {
    Client::new("Ana", "NY", "a@x.com", 555).with_id(ClientId::new("ana-1"))
}

pub fn bob() -> Client {
    Client::new("Bob", "SF", "b@x.com", 777).with_id(ClientId::new("bob-1"))
}
