//! Destinations for telemetry events.

use std::sync::Mutex;

use uuid::Uuid;

use crate::{SDK_VERSION, TelemetryEvent};

/// Destination for telemetry events.
pub trait TelemetrySink: Send + Sync + std::fmt::Debug {
    /// Delivers one event. Must not block.
    fn record(&self, session_id: Uuid, event: &TelemetryEvent);

    /// Returns false if the sink discards everything.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl TelemetrySink for NoopSink {
    fn record(&self, _session_id: Uuid, _event: &TelemetryEvent) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Emits each event as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn record(&self, session_id: Uuid, event: &TelemetryEvent) {
        tracing::info!(
            target: "oilprice::telemetry",
            %session_id,
            sdk_version = SDK_VERSION,
            operation = event.operation,
            duration_ms = event.duration_ms,
            success = event.success,
            error_type = event.error_type,
            endpoint = event.endpoint_used.map(|e| e.as_str()),
            pages = event.pages,
            records = event.records,
            "telemetry"
        );
    }
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<(Uuid, TelemetryEvent)>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded event.
    #[must_use]
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.lock().iter().map(|(_, e)| e.clone()).collect()
    }

    /// Returns the session id of every recorded event.
    #[must_use]
    pub fn sessions(&self) -> Vec<Uuid> {
        self.lock().iter().map(|(id, _)| *id).collect()
    }

    /// Removes all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Uuid, TelemetryEvent)>> {
        // A panic while recording leaves the vector intact.
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TelemetrySink for MemorySink {
    fn record(&self, session_id: Uuid, event: &TelemetryEvent) {
        self.lock().push((session_id, event.clone()));
    }
}
