//! Dashboard events and the EventBus
//!
//! Every state change in the data service is announced here so that
//! connected dashboards (SSE clients) can refresh the affected panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::{ActivityLog, Lead, LeadStatus, Notification};

/// Default channel capacity for the service's bus
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DashboardEvent {
    /// A lead was added to the pipeline
    LeadCreated {
        lead: Lead,
        timestamp: DateTime<Utc>,
    },

    /// Lead fields were edited
    LeadUpdated {
        lead: Lead,
        timestamp: DateTime<Utc>,
    },

    /// A lead moved between board columns
    LeadStageChanged {
        lead_id: String,
        from: LeadStatus,
        to: LeadStatus,
        timestamp: DateTime<Utc>,
    },

    /// A course was created or edited
    CourseChanged {
        course_id: String,
        timestamp: DateTime<Utc>,
    },

    CourseDeleted {
        course_id: String,
        timestamp: DateTime<Utc>,
    },

    GoalUpdated {
        target_revenue: f64,
        timestamp: DateTime<Utc>,
    },

    /// Commission table gained or lost a rate
    CommissionRatesChanged {
        count: usize,
        timestamp: DateTime<Utc>,
    },

    NotificationAdded {
        notification: Notification,
    },

    ActivityLogged {
        activity: ActivityLog,
    },

    /// All collections were reloaded from the store
    DataRefreshed {
        /// False when running on fixtures
        remote: bool,
        timestamp: DateTime<Utc>,
    },
}

impl DashboardEvent {
    /// Event name, used as the SSE event field
    pub fn event_type(&self) -> &str {
        match self {
            DashboardEvent::LeadCreated { .. } => "LeadCreated",
            DashboardEvent::LeadUpdated { .. } => "LeadUpdated",
            DashboardEvent::LeadStageChanged { .. } => "LeadStageChanged",
            DashboardEvent::CourseChanged { .. } => "CourseChanged",
            DashboardEvent::CourseDeleted { .. } => "CourseDeleted",
            DashboardEvent::GoalUpdated { .. } => "GoalUpdated",
            DashboardEvent::CommissionRatesChanged { .. } => "CommissionRatesChanged",
            DashboardEvent::NotificationAdded { .. } => "NotificationAdded",
            DashboardEvent::ActivityLogged { .. } => "ActivityLogged",
            DashboardEvent::DataRefreshed { .. } => "DataRefreshed",
        }
    }
}

/// Broadcast bus for [`DashboardEvent`]s
///
/// Cloning shares the same channel. Slow subscribers lag and lose the
/// oldest events once `capacity` is exceeded.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DashboardEvent>,
    capacity: usize,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Receiver for events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.tx.subscribe()
    }

    /// Emit to all subscribers; `Err` when nobody is listening
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: DashboardEvent,
    ) -> Result<usize, broadcast::error::SendError<DashboardEvent>> {
        self.tx.send(event)
    }

    /// Emit, ignoring the absence of subscribers
    pub fn emit_lossy(&self, event: DashboardEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = DashboardEvent::CourseDeleted {
            course_id: "c7".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "CourseDeleted");
        assert_eq!(json["course_id"], "c7");
        assert_eq!(event.event_type(), "CourseDeleted");
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new(8);
        let event = DashboardEvent::DataRefreshed {
            remote: false,
            timestamp: Utc::now(),
        };
        assert!(bus.emit(event.clone()).is_err());
        bus.emit_lossy(event);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.capacity(), 8);
    }

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        let sent = bus
            .emit(DashboardEvent::LeadStageChanged {
                lead_id: "l1".to_string(),
                from: LeadStatus::ProposalSent,
                to: LeadStatus::Enrolled,
                timestamp: Utc::now(),
            })
            .unwrap();
        assert_eq!(sent, 1);

        match rx.recv().await.unwrap() {
            DashboardEvent::LeadStageChanged { lead_id, to, .. } => {
                assert_eq!(lead_id, "l1");
                assert_eq!(to, LeadStatus::Enrolled);
            }
            other => panic!("unexpected event {}", other.event_type()),
        }
    }
}
