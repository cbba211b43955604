//! Response DTOs for the operational endpoints
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::stats::StatsSnapshot;

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status, always "healthy" while the server answers
    pub status: String,
}

impl HealthResponse {
    /// Creates a healthy response
    pub fn healthy() -> Self {
        Self {
            status: String::from("healthy"),
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Per-group statistics, keyed by group name
    pub groups: BTreeMap<String, StatsSnapshot>,
}

impl StatsResponse {
    pub fn new(groups: BTreeMap<String, StatsSnapshot>) -> Self {
        Self { groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serializes() {
        let json = serde_json::to_value(HealthResponse::healthy()).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[test]
    fn test_stats_response_serializes() {
        let mut groups = BTreeMap::new();
        groups.insert(String::from("scores"), StatsSnapshot::default());

        let json = serde_json::to_value(StatsResponse::new(groups)).unwrap();
        assert_eq!(json["groups"]["scores"]["hits"], 0);
    }
}
