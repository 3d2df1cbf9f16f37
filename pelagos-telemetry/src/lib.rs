//! PELAGOS Telemetry - Tag Event Ingestion and Storage
//!
//! The ingestor is the only append path into the event store: raw wire
//! payloads become validated `TagEvent`s here or are rejected with a
//! structured, per-field error. Events are append-only; nothing updates
//! or deletes them.

pub mod ingest;
pub mod store;

pub use ingest::TelemetryIngestor;
pub use store::{EventStore, InMemoryEventStore};
