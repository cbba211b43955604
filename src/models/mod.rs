//! Models Module
//!
//! Response bodies for the operational JSON endpoints. The peer protocol
//! itself uses the protobuf messages in [`crate::pb`], not these.

mod responses;

// Re-export public types
pub use responses::{HealthResponse, StatsResponse};
