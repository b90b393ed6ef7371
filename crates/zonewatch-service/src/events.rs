//! Outbound zone events and the distribution collaborator interface.
//!
//! Events are fire-and-forget: a failed publish is logged and the
//! orchestrator's state still advances. Cache and persistence are the source
//! of truth, not delivered events.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zonewatch_core::{Coordinates, RiskLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Entry,
    Exit,
}

/// Logical event published to the distribution channel. The same shapes may
/// arrive inbound from other instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZoneEvent {
    ZoneUpdated {
        zone_id: String,
    },
    GeofenceAlert {
        alert_type: AlertType,
        tourist_id: String,
        zone_id: String,
        zone_name: String,
        location: Coordinates,
        timestamp: DateTime<Utc>,
        risk_level: RiskLevel,
    },
    RiskLevelChanged {
        zone_id: String,
        risk_level: RiskLevel,
    },
}

impl ZoneEvent {
    pub fn zone_id(&self) -> &str {
        match self {
            ZoneEvent::ZoneUpdated { zone_id }
            | ZoneEvent::GeofenceAlert { zone_id, .. }
            | ZoneEvent::RiskLevelChanged { zone_id, .. } => zone_id,
        }
    }
}

/// Outbound side of the event distribution collaborator.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &ZoneEvent) -> anyhow::Result<()>;
}

/// Publisher that discards everything. Useful for hosts without a
/// distribution channel and for tests.
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _event: &ZoneEvent) -> anyhow::Result<()> {
        Ok(())
    }
}
