//! Notifications and the activity log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Success,
    Warning,
    Info,
    Danger,
}

impl ActivityKind {
    pub fn as_wire(&self) -> &'static str {
        match self {
            ActivityKind::Success => "success",
            ActivityKind::Warning => "warning",
            ActivityKind::Info => "info",
            ActivityKind::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub kind: ActivityKind,
    pub message: String,
    pub details: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

/// Activity entry before it is stamped with an id and a time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDraft {
    pub kind: ActivityKind,
    pub message: String,
    pub details: String,
    pub author: String,
}

impl ActivityDraft {
    pub fn new(
        kind: ActivityKind,
        message: impl Into<String>,
        details: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            details: details.into(),
            author: author.into(),
        }
    }

    pub fn stamp(self, id: String, timestamp: DateTime<Utc>) -> ActivityLog {
        ActivityLog {
            id,
            kind: self.kind,
            message: self.message,
            details: self.details,
            author: self.author,
            timestamp,
        }
    }
}
