//! Commission rate resolution
//!
//! Rates are scoped by seller, course and optionally month, each scope
//! either a concrete id or [`SCOPE_ALL`]. The most specific applicable rate
//! wins.

use serde::Serialize;

use crate::models::{CommissionRate, SCOPE_ALL};

fn scope_matches(scope: &str, id: Option<&str>) -> bool {
    scope == SCOPE_ALL || id.is_some_and(|id| scope == id)
}

fn specificity(rate: &CommissionRate) -> u8 {
    let mut score = 0;
    if !rate.applies_to_all_sellers() {
        score += 2;
    }
    if !rate.applies_to_all_courses() {
        score += 2;
    }
    if rate.month.is_some() {
        score += 1;
    }
    score
}

/// Pick the rate that applies to a sale
///
/// A specific seller or course outweighs a month restriction. Among equally
/// specific candidates the first listed wins.
pub fn resolve_rate<'a>(
    rates: &'a [CommissionRate],
    seller_id: Option<&str>,
    course_id: Option<&str>,
    month: Option<&str>,
) -> Option<&'a CommissionRate> {
    rates
        .iter()
        .filter(|r| scope_matches(&r.seller_id, seller_id))
        .filter(|r| scope_matches(&r.course_id, course_id))
        .filter(|r| match (&r.month, month) {
            (None, _) => true,
            (Some(m), Some(wanted)) => m == wanted,
            (Some(_), None) => false,
        })
        .fold(None, |best: Option<&CommissionRate>, r| match best {
            Some(b) if specificity(b) >= specificity(r) => Some(b),
            _ => Some(r),
        })
}

/// Commission owed on `value` at `rate` percent
pub fn commission_for(value: f64, rate: f64) -> f64 {
    value * rate / 100.0
}

/// Resolved rate together with the resulting commission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionQuote {
    pub rate_id: Option<String>,
    pub rate: f64,
    pub value: f64,
    pub commission: f64,
}

pub fn quote(
    rates: &[CommissionRate],
    seller_id: Option<&str>,
    course_id: Option<&str>,
    month: Option<&str>,
    value: f64,
) -> CommissionQuote {
    let resolved = resolve_rate(rates, seller_id, course_id, month);
    let rate = resolved.map(|r| r.rate).unwrap_or(0.0);
    CommissionQuote {
        rate_id: resolved.map(|r| r.id.clone()),
        rate,
        value,
        commission: commission_for(value, rate),
    }
}
