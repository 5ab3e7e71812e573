//! Training courses

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::non_blank;
use crate::{Error, Result};

/// Course lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseStatus {
    #[serde(rename = "Agendado", alias = "Scheduled")]
    Scheduled,
    #[serde(rename = "Em Andamento", alias = "InProgress")]
    InProgress,
    #[serde(rename = "Concluído", alias = "Completed")]
    Completed,
    #[serde(rename = "Cancelado", alias = "Cancelled")]
    Cancelled,
}

impl CourseStatus {
    pub fn as_wire(&self) -> &'static str {
        match self {
            CourseStatus::Scheduled => "Agendado",
            CourseStatus::InProgress => "Em Andamento",
            CourseStatus::Completed => "Concluído",
            CourseStatus::Cancelled => "Cancelado",
        }
    }

    /// Scheduled or running
    pub fn is_active(&self) -> bool {
        matches!(self, CourseStatus::Scheduled | CourseStatus::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub instructor_id: String,
    pub city: String,
    pub state: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub workload_hours: u32,
    /// Price of a single registration
    pub seat_price: f64,
    pub revenue_target: f64,
    pub revenue_to_date: f64,
    pub status: CourseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub enrolled: u32,
}

impl Course {
    /// Revenue attainment in percent, 0 when no target is set
    pub fn goal_percent(&self) -> f64 {
        if self.revenue_target > 0.0 {
            self.revenue_to_date / self.revenue_target * 100.0
        } else {
            0.0
        }
    }
}

/// Course as submitted by the management form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub instructor_id: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub workload_hours: u32,
    #[serde(default)]
    pub seat_price: f64,
    #[serde(default)]
    pub revenue_target: f64,
    #[serde(default)]
    pub revenue_to_date: f64,
    pub status: Option<CourseStatus>,
    pub notes: Option<String>,
    #[serde(default)]
    pub enrolled: u32,
}

impl CourseDraft {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("Course title is required".to_string()));
        }
        if self.end_date < self.start_date {
            return Err(Error::InvalidInput(
                "Course end date precedes its start date".to_string(),
            ));
        }
        if self.seat_price < 0.0 || self.revenue_target < 0.0 {
            return Err(Error::InvalidInput("Course values cannot be negative".to_string()));
        }
        let state = self.state.trim().to_uppercase();
        if !state.is_empty() && !crate::fixtures::BRAZIL_STATES.contains(&state.as_str()) {
            return Err(Error::InvalidInput(format!("Unknown state {:?}", self.state.trim())));
        }
        Ok(())
    }

    pub fn into_course(self, id: String) -> Course {
        Course {
            id,
            title: self.title.trim().to_string(),
            instructor_id: self.instructor_id.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_uppercase(),
            start_date: self.start_date,
            end_date: self.end_date,
            workload_hours: self.workload_hours,
            seat_price: self.seat_price,
            revenue_target: self.revenue_target,
            revenue_to_date: self.revenue_to_date,
            status: self.status.unwrap_or(CourseStatus::Scheduled),
            notes: non_blank(self.notes),
            enrolled: self.enrolled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CourseDraft {
        CourseDraft {
            title: "Gestão de Contratos".to_string(),
            instructor_id: "1".to_string(),
            city: "Natal".to_string(),
            state: "rn".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 5, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 5, 12).unwrap(),
            workload_hours: 16,
            seat_price: 2000.0,
            revenue_target: 50000.0,
            revenue_to_date: 0.0,
            status: None,
            notes: Some(" ".to_string()),
            enrolled: 0,
        }
    }

    #[test]
    fn test_draft_into_course_defaults() {
        let course = draft().into_course("c9".to_string());
        assert_eq!(course.status, CourseStatus::Scheduled);
        assert_eq!(course.state, "RN");
        assert_eq!(course.notes, None);
    }

    #[test]
    fn test_draft_rejects_inverted_dates() {
        let mut d = draft();
        d.end_date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_draft_state_must_be_a_federative_unit() {
        let mut d = draft();
        assert!(d.validate().is_ok());

        d.state = " ".to_string();
        assert!(d.validate().is_ok());

        d.state = "XX".to_string();
        assert!(matches!(d.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_goal_percent_without_target() {
        let mut course = draft().into_course("c9".to_string());
        course.revenue_target = 0.0;
        course.revenue_to_date = 1000.0;
        assert_eq!(course.goal_percent(), 0.0);

        course.revenue_target = 4000.0;
        assert_eq!(course.goal_percent(), 25.0);
    }

    #[test]
    fn test_active_statuses() {
        assert!(CourseStatus::Scheduled.is_active());
        assert!(CourseStatus::InProgress.is_active());
        assert!(!CourseStatus::Completed.is_active());
        assert!(!CourseStatus::Cancelled.is_active());
    }
}
