//! Domain models
//!
//! In-memory (and JSON API) representation of every dashboard entity.
//! Field names serialize as camelCase; the snake_case wire form used by the
//! remote store lives in [`crate::rows`].

mod course;
mod feed;
mod finance;
mod lead;
mod people;

pub use course::{Course, CourseDraft, CourseStatus};
pub use feed::{ActivityDraft, ActivityKind, ActivityLog, Notification, NotificationKind};
pub use finance::{BonusTier, CommissionKind, CommissionRate, GlobalGoal, GoalPeriod, SCOPE_ALL};
pub use lead::{Lead, LeadDraft, LeadStatus};
pub use people::{Instructor, Seller};

/// Trim an optional free-text field, mapping blank input to `None`
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
