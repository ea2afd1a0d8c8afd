//! Event bus implementation using tokio broadcast channels

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use j1939_core::{Outcome, PartResult, StepResult};

use crate::listener::ResultsListener;
use crate::types::{EventEnvelope, ResultEvent};

/// Capacity for the broadcast channel
const DEFAULT_CAPACITY: usize = 1000;

/// Event bus for publishing and subscribing to result events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
    /// Number of events published (for monitoring)
    event_count: Arc<AtomicUsize>,
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new event bus with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            event_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of subscribers that received the event.
    /// If there are no subscribers, returns 0 (the event is dropped).
    pub fn publish(&self, envelope: EventEnvelope) -> usize {
        self.event_count.fetch_add(1, Ordering::Relaxed);
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to events
    ///
    /// Events published before subscribing will not be received.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Get the number of current subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the total number of events published
    pub fn event_count(&self) -> usize {
        self.event_count.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .field("event_count", &self.event_count())
            .finish()
    }
}

/// Results listener that publishes every call onto an [`EventBus`].
///
/// Envelopes carry monotonically increasing sequence numbers so
/// subscribers can restore call order.
#[derive(Clone)]
pub struct EventBusListener {
    bus: EventBus,
    sequence: Arc<AtomicU64>,
}

impl EventBusListener {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    fn emit(&self, event: ResultEvent) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.bus.publish(EventEnvelope::new(sequence, event));
    }

    /// Get the current sequence number (for debugging/testing).
    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}

impl ResultsListener for EventBusListener {
    fn add_outcome(&self, part_number: u8, step_number: u8, outcome: Outcome, message: &str) {
        self.emit(ResultEvent::Outcome {
            part_number,
            step_number,
            outcome,
            message: message.to_string(),
        });
    }

    fn on_result(&self, result: &str) {
        self.emit(ResultEvent::Result {
            text: result.to_string(),
        });
    }

    fn on_progress(&self, current: u32, total: u32, message: &str) {
        self.emit(ResultEvent::Progress {
            current,
            total,
            message: message.to_string(),
        });
    }

    fn on_progress_message(&self, message: &str) {
        self.emit(ResultEvent::Milestone {
            message: message.to_string(),
        });
    }

    fn begin_part(&self, part: &PartResult) {
        self.emit(ResultEvent::begin_part(part));
    }

    fn end_part(&self, part: &PartResult) {
        self.emit(ResultEvent::end_part(part));
    }

    fn begin_step(&self, step: &StepResult) {
        self.emit(ResultEvent::begin_step(step));
    }

    fn end_step(&self, step: &StepResult) {
        self.emit(ResultEvent::end_step(step));
    }

    fn on_complete(&self, success: bool) {
        self.emit(ResultEvent::Complete { success });
    }
}
