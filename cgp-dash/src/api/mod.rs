//! HTTP API handlers for cgp-dash
//!
//! JSON REST over the data service plus an SSE stream of dashboard events.

pub mod ai;
pub mod commissions;
pub mod courses;
pub mod dashboard;
pub mod feed;
pub mod goal;
pub mod health;
pub mod leads;
pub mod people;
pub mod pipeline;
pub mod sse;

pub use ai::ai_routes;
pub use commissions::commission_routes;
pub use courses::course_routes;
pub use dashboard::dashboard_routes;
pub use feed::feed_routes;
pub use goal::goal_routes;
pub use health::health_routes;
pub use leads::lead_routes;
pub use people::people_routes;
pub use pipeline::pipeline_routes;
pub use sse::sse_routes;

use serde::Deserialize;

/// `?course=<title>` filter shared by the lead and pipeline views
#[derive(Debug, Default, Deserialize)]
pub struct CourseFilter {
    pub course: Option<String>,
}

impl CourseFilter {
    /// Selected course title; blank means "all courses"
    pub fn title(&self) -> Option<&str> {
        self.course.as_deref().filter(|c| !c.trim().is_empty())
    }
}
