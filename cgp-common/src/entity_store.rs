//! In-memory entity collections
//!
//! Plain data plus the small lookups and replacements the service needs.
//! No cross-entity consistency is enforced.

use serde::Serialize;

use crate::fixtures;
use crate::models::{
    ActivityLog, CommissionRate, Course, GlobalGoal, Instructor, Lead, Notification, Seller,
};

/// Most recent activity entries kept in memory
pub const ACTIVITY_FEED_LIMIT: usize = 50;

/// Author used when a lead's owner cannot be resolved
pub const SYSTEM_AUTHOR: &str = "System";

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStore {
    pub courses: Vec<Course>,
    pub leads: Vec<Lead>,
    pub instructors: Vec<Instructor>,
    pub sellers: Vec<Seller>,
    pub commission_rates: Vec<CommissionRate>,
    pub global_goal: GlobalGoal,
    pub notifications: Vec<Notification>,
    /// Newest first
    pub activities: Vec<ActivityLog>,
}

impl EntityStore {
    /// Store seeded with the built-in sample data
    pub fn from_fixtures() -> Self {
        Self {
            courses: fixtures::courses(),
            leads: fixtures::leads(),
            instructors: fixtures::instructors(),
            sellers: fixtures::sellers(),
            commission_rates: fixtures::commission_rates(),
            global_goal: fixtures::global_goal(),
            notifications: fixtures::notifications(),
            activities: Vec::new(),
        }
    }

    pub fn lead(&self, id: &str) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == id)
    }

    pub fn lead_mut(&mut self, id: &str) -> Option<&mut Lead> {
        self.leads.iter_mut().find(|l| l.id == id)
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn seller(&self, id: &str) -> Option<&Seller> {
        self.sellers.iter().find(|s| s.id == id)
    }

    /// Display name of a seller, or [`SYSTEM_AUTHOR`]
    pub fn author_for(&self, seller_id: &str) -> String {
        self.seller(seller_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| SYSTEM_AUTHOR.to_string())
    }

    /// Replace the lead with the same id, or append it
    pub fn upsert_lead(&mut self, lead: Lead) {
        match self.lead_mut(&lead.id) {
            Some(existing) => *existing = lead,
            None => self.leads.push(lead),
        }
    }

    /// Replace the course with the same id; false when it is unknown
    pub fn replace_course(&mut self, course: Course) -> bool {
        match self.courses.iter_mut().find(|c| c.id == course.id) {
            Some(existing) => {
                *existing = course;
                true
            }
            None => false,
        }
    }

    pub fn remove_course(&mut self, id: &str) -> bool {
        let before = self.courses.len();
        self.courses.retain(|c| c.id != id);
        self.courses.len() != before
    }

    pub fn remove_commission_rate(&mut self, id: &str) -> bool {
        let before = self.commission_rates.len();
        self.commission_rates.retain(|r| r.id != id);
        self.commission_rates.len() != before
    }

    /// Prepend an activity entry, keeping the feed bounded
    pub fn push_activity(&mut self, log: ActivityLog) {
        self.activities.insert(0, log);
        self.activities.truncate(ACTIVITY_FEED_LIMIT);
    }

    /// Prepend a notification
    pub fn push_notification(&mut self, notification: Notification) {
        self.notifications.insert(0, notification);
    }

    pub fn mark_notification_read(&mut self, id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn unread_notifications(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }
}
