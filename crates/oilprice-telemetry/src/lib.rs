//! Opt-in usage telemetry for the oilprice SDK.
//!
//! - [`TelemetryEvent`] - One record per client call
//! - [`TelemetrySink`] - Destination for events
//! - [`Telemetry`] - Session handle held by the client

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/oilpriceapi/oilprice-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod event;
mod sink;

use std::sync::Arc;

use uuid::Uuid;

pub use event::TelemetryEvent;
pub use sink::{MemorySink, NoopSink, TelemetrySink, TracingSink};

/// SDK version reported with every event.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Telemetry session shared by one client.
#[derive(Debug, Clone)]
pub struct Telemetry {
    session_id: Uuid,
    sink: Arc<dyn TelemetrySink>,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Telemetry {
    /// Creates a session that delivers events to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            sink,
        }
    }

    /// Creates a session that drops every event.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopSink))
    }

    /// Creates a session that logs events through `tracing`.
    #[must_use]
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    /// Random identifier of this session.
    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// SDK version reported with events.
    #[must_use]
    pub const fn sdk_version(&self) -> &'static str {
        SDK_VERSION
    }

    /// Returns true if events go anywhere.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.sink.is_enabled()
    }

    /// Delivers `event` to the sink.
    pub fn record(&self, event: &TelemetryEvent) {
        if self.sink.is_enabled() {
            self.sink.record(self.session_id, event);
        }
    }
}
