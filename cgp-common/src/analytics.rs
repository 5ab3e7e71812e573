//! Dashboard figures derived from courses, sellers and the global goal

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{BonusTier, Course, GlobalGoal, Seller};

/// Courses below this enrollment are flagged when about to start
pub const MIN_VIABLE_ENROLLMENT: u32 = 15;

/// Days ahead of the start date in which a course is checked for viability
pub const VIABILITY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_revenue: f64,
    pub total_enrolled: u64,
    pub course_count: usize,
    pub active_courses: usize,
    pub goal_target: f64,
    pub goal_percent: f64,
}

pub fn overview(courses: &[Course], goal: &GlobalGoal) -> Overview {
    let total_revenue: f64 = courses.iter().map(|c| c.revenue_to_date).sum();
    Overview {
        total_revenue,
        total_enrolled: courses.iter().map(|c| u64::from(c.enrolled)).sum(),
        course_count: courses.len(),
        active_courses: courses.iter().filter(|c| c.status.is_active()).count(),
        goal_target: goal.target_revenue,
        goal_percent: goal_percent(total_revenue, goal.target_revenue),
    }
}

/// `achieved` as a percentage of `target`; 0 when no target is set
pub fn goal_percent(achieved: f64, target: f64) -> f64 {
    if target > 0.0 {
        achieved / target * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGroup {
    /// `YYYY-MM`
    pub month: String,
    pub courses: Vec<Course>,
}

/// Courses grouped by start month, in start-date order
pub fn group_by_month(courses: &[Course]) -> Vec<MonthGroup> {
    let mut sorted = courses.to_vec();
    sorted.sort_by_key(|c| c.start_date);

    let mut groups: Vec<MonthGroup> = Vec::new();
    for course in sorted {
        let month = format!("{:04}-{:02}", course.start_date.year(), course.start_date.month());
        match groups.last_mut() {
            Some(group) if group.month == month => group.courses.push(course),
            _ => groups.push(MonthGroup {
                month,
                courses: vec![course],
            }),
        }
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityAlert {
    pub course_id: String,
    pub title: String,
    pub enrolled: u32,
    pub days_until_start: i64,
}

/// Courses starting within the window that are still under-enrolled
pub fn viability_alerts(courses: &[Course], today: NaiveDate) -> Vec<ViabilityAlert> {
    courses
        .iter()
        .filter_map(|c| {
            let days = (c.start_date - today).num_days();
            let at_risk = c.enrolled < MIN_VIABLE_ENROLLMENT
                && (0..=VIABILITY_WINDOW_DAYS).contains(&days);
            at_risk.then(|| ViabilityAlert {
                course_id: c.id.clone(),
                title: c.title.clone(),
                enrolled: c.enrolled,
                days_until_start: days,
            })
        })
        .collect()
}

/// Sellers ordered by total sales, best first
pub fn seller_ranking(sellers: &[Seller]) -> Vec<Seller> {
    let mut ranked = sellers.to_vec();
    ranked.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerShare {
    pub seller_id: String,
    pub name: String,
    pub annual_goal: f64,
    /// Rounded percent of the global target
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamGoals {
    pub global_target: f64,
    pub team_annual_total: f64,
    pub sellers: Vec<SellerShare>,
}

pub fn team_goals(sellers: &[Seller], goal: &GlobalGoal) -> TeamGoals {
    TeamGoals {
        global_target: goal.target_revenue,
        team_annual_total: sellers.iter().map(|s| s.annual_goal).sum(),
        sellers: sellers
            .iter()
            .map(|s| SellerShare {
                seller_id: s.id.clone(),
                name: s.name.clone(),
                annual_goal: s.annual_goal,
                share_percent: goal_percent(s.annual_goal, goal.target_revenue).round(),
            })
            .collect(),
    }
}

/// Highest tier whose threshold has been reached
pub fn bonus_tier_reached(goal: &GlobalGoal, attainment_percent: f64) -> Option<BonusTier> {
    goal.tiers
        .iter()
        .filter(|t| t.threshold_percent <= attainment_percent)
        .max_by(|a, b| a.threshold_percent.total_cmp(&b.threshold_percent))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::models::CourseStatus;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overview_from_fixtures() {
        let o = overview(&fixtures::courses(), &fixtures::global_goal());
        assert_eq!(o.course_count, 7);
        assert_eq!(o.total_revenue, 647_500.0);
        assert_eq!(o.total_enrolled, 249);
        assert_eq!(o.active_courses, 4);
        assert!((o.goal_percent - 32.375).abs() < 1e-9);
    }

    #[test]
    fn test_overview_enrollment_sum_is_wide() {
        let mut courses = fixtures::courses();
        courses.truncate(2);
        for c in &mut courses {
            c.enrolled = u32::MAX;
        }
        let o = overview(&courses, &fixtures::global_goal());
        assert_eq!(o.total_enrolled, 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_goal_percent_without_target() {
        assert_eq!(goal_percent(1000.0, 0.0), 0.0);
        assert_eq!(goal_percent(50.0, 200.0), 25.0);
    }

    #[test]
    fn test_month_groups_are_ordered() {
        let groups = group_by_month(&fixtures::courses());
        let months: Vec<&str> = groups.iter().map(|g| g.month.as_str()).collect();
        assert_eq!(months, vec!["2026-09", "2026-10", "2026-11", "2026-12"]);
        assert_eq!(groups[1].courses[0].id, "c7");
        assert_eq!(groups[2].courses.len(), 3);
    }

    #[test]
    fn test_viability_window_is_inclusive() {
        let mut course = fixtures::courses().remove(4);
        course.status = CourseStatus::Scheduled;
        course.enrolled = 14;
        let start = course.start_date;
        let courses = vec![course];

        assert_eq!(viability_alerts(&courses, start).len(), 1);
        assert_eq!(viability_alerts(&courses, start - chrono::Duration::days(7)).len(), 1);
        assert!(viability_alerts(&courses, start - chrono::Duration::days(8)).is_empty());
        assert!(viability_alerts(&courses, start + chrono::Duration::days(1)).is_empty());
    }

    #[test]
    fn test_viability_needs_low_enrollment() {
        // c5 starts 2026-11-20 with 13 enrolled, c6 2026-11-25 with 29
        let alerts = viability_alerts(&fixtures::courses(), day(2026, 11, 18));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].course_id, "c5");
        assert_eq!(alerts[0].days_until_start, 2);
    }

    #[test]
    fn test_seller_ranking() {
        let ranked = seller_ranking(&fixtures::sellers());
        assert_eq!(ranked[0].name, "Elis");
        assert_eq!(ranked.last().unwrap().name, "Halana");
    }

    #[test]
    fn test_team_goals() {
        let team = team_goals(&fixtures::sellers(), &fixtures::global_goal());
        assert_eq!(team.team_annual_total, 2_220_000.0);
        let andreia = team.sellers.iter().find(|s| s.name == "Andreia").unwrap();
        assert_eq!(andreia.share_percent, 23.0);
    }

    #[test]
    fn test_bonus_tier() {
        let goal = fixtures::global_goal();
        assert_eq!(bonus_tier_reached(&goal, 99.9), None);
        assert_eq!(bonus_tier_reached(&goal, 100.0).unwrap().amount, 1000.0);
        assert_eq!(bonus_tier_reached(&goal, 149.0).unwrap().amount, 2500.0);
        assert_eq!(bonus_tier_reached(&goal, 200.0).unwrap().amount, 5000.0);
    }
}
