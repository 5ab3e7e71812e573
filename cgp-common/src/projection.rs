//! Course view projection
//!
//! Leads are not linked to courses by id in the board view. Instead a
//! lead's free-text interest is matched against course titles: the match
//! holds when either string contains the other, ignoring case. A lead may
//! match zero, one or several courses.

use serde::Serialize;

use crate::models::{Course, Lead, LeadStatus};

/// Case-insensitive, bidirectional containment; blank strings never match
pub fn matches_course(interest: &str, title: &str) -> bool {
    let interest = interest.trim().to_lowercase();
    let title = title.trim().to_lowercase();
    if interest.is_empty() || title.is_empty() {
        return false;
    }
    title.contains(&interest) || interest.contains(&title)
}

/// Leads matching `course_title`, or every lead when no title is given
pub fn filter_by_course(leads: &[Lead], course_title: Option<&str>) -> Vec<Lead> {
    match course_title {
        Some(title) => leads
            .iter()
            .filter(|l| matches_course(&l.interest, title))
            .cloned()
            .collect(),
        None => leads.to_vec(),
    }
}

/// Lead counts per stage for one course
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseFunnel {
    pub course_id: String,
    pub title: String,
    pub proposal_sent: usize,
    pub under_review: usize,
    pub enrolled: usize,
    pub declined: usize,
}

pub fn course_funnel(course: &Course, leads: &[Lead]) -> CourseFunnel {
    let mut funnel = CourseFunnel {
        course_id: course.id.clone(),
        title: course.title.clone(),
        proposal_sent: 0,
        under_review: 0,
        enrolled: 0,
        declined: 0,
    };
    for lead in leads.iter().filter(|l| matches_course(&l.interest, &course.title)) {
        match lead.status {
            LeadStatus::ProposalSent => funnel.proposal_sent += 1,
            LeadStatus::UnderReview => funnel.under_review += 1,
            LeadStatus::Enrolled => funnel.enrolled += 1,
            LeadStatus::Declined => funnel.declined += 1,
        }
    }
    funnel
}
