//! PELAGOS Core - Entity Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains ONLY data types - no business logic.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod config;
pub mod covariate;
pub mod error;
pub mod event;
pub mod geo;
pub mod hotspot;

pub use config::{MissingValuePolicy, PelagosConfig};
pub use covariate::{Covariate, CovariateVector};
pub use error::{
    ModelError, PelagosError, PelagosResult, PredictionError, RasterError, StorageError,
    ValidationError, ValidationFailure,
};
pub use event::{EventTrigger, RawTagEvent, TagEvent};
pub use geo::{BoundingBox, Region};
pub use hotspot::{CellFeatures, GridCell, HotspotResult, PredictionMode, PredictionSource};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Event identifier using UUIDv7 for timestamp-sortable IDs.
/// UUIDv7 embeds a Unix timestamp, making IDs naturally sortable by creation time.
pub type EventId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 EventId (timestamp-sortable).
pub fn new_event_id() -> EventId {
    Uuid::now_v7()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event_id_is_unique() {
        let a = new_event_id();
        let b = new_event_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_event_id_is_v7() {
        let id = new_event_id();
        assert_eq!(id.get_version_num(), 7);
    }
}
