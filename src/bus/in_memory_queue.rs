//! In-memory queue for testing and single-process scenarios.
//!
//! This module provides a thread-safe in-memory broker that implements
//! both `Producer` and `Subscriber`, useful for:
//! - Unit and integration testing without a real broker
//! - Single-process applications
//! - Development and prototyping

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use super::{Message, Producer, PublishError, Subscriber};

/// In-memory broker for testing and single-process scenarios.
///
/// Features:
/// - Thread-safe (can be shared across threads via `Clone`)
/// - `produce` buffers locally; `flush` delivers the buffer to the log
/// - Flushes run one at a time; a failed flush puts its batch back in the
///   buffer, so a later flush still delivers it
/// - Supports multiple subscribers via `new_subscriber()`
/// - Each subscriber tracks its own read position
/// - Fault injection and a configurable delivery delay for exercising
///   publish failures and flush timeouts
///
/// ## Example
///
/// ```
/// use std::time::Duration;
/// use client_gateway::bus::{InMemoryQueue, Producer, Subscriber};
///
/// let queue = InMemoryQueue::new();
/// queue.produce("clients", br#"{"id":"123"}"#.to_vec()).unwrap();
/// queue.flush(Duration::from_secs(1)).unwrap();
///
/// let message = queue.poll(100).unwrap().unwrap();
/// assert_eq!(message.topic, "clients");
/// ```
#[derive(Clone)]
pub struct InMemoryQueue {
    /// Produced but not yet flushed
    pending: Arc<Mutex<Vec<Pending>>>,
    /// Held for the whole of a flush
    flushing: Arc<Mutex<()>>,
    /// Threads whose pending messages were thrown away by `clear`
    discarded: Arc<Mutex<HashSet<ThreadId>>>,
    /// Delivered message log
    log: Arc<RwLock<Vec<Message>>>,
    /// Per-subscriber read position
    position: Arc<Mutex<usize>>,
    /// Acknowledged offsets
    acked: Arc<Mutex<Vec<u64>>>,
    /// Failure returned by produce and flush while set
    fault: Arc<Mutex<Option<PublishError>>>,
    /// Simulated broker round-trip on flush
    delivery_delay: Duration,
}

/// A produced message awaiting a flush.
struct Pending {
    producer: ThreadId,
    topic: String,
    payload: Vec<u8>,
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl InMemoryQueue {
    /// Create a new in-memory queue.
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(Vec::new())),
            flushing: Arc::new(Mutex::new(())),
            discarded: Arc::new(Mutex::new(HashSet::new())),
            log: Arc::new(RwLock::new(Vec::new())),
            position: Arc::new(Mutex::new(0)),
            acked: Arc::new(Mutex::new(Vec::new())),
            fault: Arc::new(Mutex::new(None)),
            delivery_delay: Duration::ZERO,
        }
    }

    /// Make every flush take `delay`; a flush whose timeout is shorter fails
    /// with `PublishError::Timeout`.
    pub fn with_delivery_delay(mut self, delay: Duration) -> Self {
        self.delivery_delay = delay;
        self
    }

    /// Create a new subscriber that shares the same log but has its own position.
    pub fn new_subscriber(&self) -> Self {
        Self {
            position: Arc::new(Mutex::new(0)),
            acked: Arc::new(Mutex::new(Vec::new())),
            ..self.clone()
        }
    }

    /// Make produce and flush fail with `fault` until cleared.
    pub fn inject_fault(&self, fault: PublishError) {
        *lock(&self.fault) = Some(fault);
    }

    pub fn clear_fault(&self) {
        *lock(&self.fault) = None;
    }

    /// Get all delivered messages.
    pub fn messages(&self) -> Vec<Message> {
        self.log.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Get all delivered messages for one topic.
    pub fn messages_for(&self, topic: &str) -> Vec<Message> {
        self.log
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|m| m.topic == topic)
            .cloned()
            .collect()
    }

    /// Number of delivered messages.
    pub fn len(&self) -> usize {
        self.log.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of produced messages awaiting a flush.
    pub fn pending_len(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Get acknowledged offsets.
    pub fn acknowledged(&self) -> Vec<u64> {
        lock(&self.acked).clone()
    }

    /// Clear all messages (useful for test cleanup).
    ///
    /// Producers whose messages were still pending get an error from their
    /// next flush.
    pub fn clear(&self) {
        {
            let mut discarded = lock(&self.discarded);
            discarded.extend(lock(&self.pending).drain(..).map(|p| p.producer));
        }
        self.log.write().unwrap_or_else(|e| e.into_inner()).clear();
        *lock(&self.position) = 0;
        lock(&self.acked).clear();
    }

    /// Put an undelivered batch back at the front of the buffer.
    fn requeue(&self, batch: Vec<Pending>) {
        let mut pending = lock(&self.pending);
        let later = std::mem::take(&mut *pending);
        pending.extend(batch);
        pending.extend(later);
    }

    fn check_fault(&self) -> Result<(), PublishError> {
        match lock(&self.fault).as_ref() {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }
}

impl Producer for InMemoryQueue {
    fn produce(&self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        self.check_fault()?;
        lock(&self.pending).push(Pending {
            producer: thread::current().id(),
            topic: topic.to_string(),
            payload,
        });
        Ok(())
    }

    fn flush(&self, timeout: Duration) -> Result<(), PublishError> {
        let deadline = Instant::now() + timeout;
        // A flush that returns Ok must not race one still holding its messages.
        let _flushing = lock(&self.flushing);

        if lock(&self.discarded).remove(&thread::current().id()) {
            return Err(PublishError::Rejected(
                "message discarded before delivery".into(),
            ));
        }

        let batch: Vec<Pending> = lock(&self.pending).drain(..).collect();
        if batch.is_empty() {
            return Ok(());
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if self.delivery_delay > remaining {
            thread::sleep(remaining);
            self.requeue(batch);
            return Err(PublishError::Timeout);
        }
        if !self.delivery_delay.is_zero() {
            thread::sleep(self.delivery_delay);
        }
        if let Err(e) = self.check_fault() {
            self.requeue(batch);
            return Err(e);
        }

        let mut log = match self.log.write() {
            Ok(log) => log,
            Err(_) => {
                self.requeue(batch);
                return Err(PublishError::ConnectionFailed("log poisoned".into()));
            }
        };
        for pending in batch {
            let offset = log.len() as u64;
            log.push(Message {
                topic: pending.topic,
                offset,
                payload: pending.payload,
            });
        }
        Ok(())
    }
}

impl Subscriber for InMemoryQueue {
    fn poll(&self, timeout_ms: u64) -> Result<Option<Message>, PublishError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            {
                let log = self
                    .log
                    .read()
                    .map_err(|_| PublishError::ConnectionFailed("log poisoned".into()))?;
                let mut pos = lock(&self.position);

                if *pos < log.len() {
                    let message = log[*pos].clone();
                    *pos += 1;
                    return Ok(Some(message));
                }
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }

            // Small sleep to avoid busy-waiting
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn ack(&self, offset: u64) -> Result<(), PublishError> {
        lock(&self.acked).push(offset);
        Ok(())
    }
}
