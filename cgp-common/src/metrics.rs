//! Derived pipeline metrics
//!
//! Every figure is a plain reduction over a lead snapshot (usually the
//! course-filtered set). Nothing is cached; callers recompute per request.

use serde::Serialize;

use crate::models::{Lead, LeadStatus, Seller};

/// Most entries returned by the ranking lists
pub const TOP_LIMIT: usize = 3;

/// Label for declined leads without a recorded reason
pub const UNSPECIFIED_REASON: &str = "Other";

/// Label for owners that are not in the seller list
pub const UNKNOWN_SELLER: &str = "Unknown";

/// One board column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageColumn {
    pub status: LeadStatus,
    pub count: usize,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LossReason {
    pub reason: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerTotal {
    pub seller_id: String,
    pub name: String,
    pub value: f64,
}

/// KPI panel for a lead set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineMetrics {
    pub lead_count: usize,
    pub conversion_rate: f64,
    pub average_discount: f64,
    pub average_ticket: f64,
    pub total_revenue: f64,
    pub enrolled_seats: u64,
    pub columns: Vec<StageColumn>,
    pub top_loss_reasons: Vec<LossReason>,
    pub top_sellers: Vec<SellerTotal>,
}

impl PipelineMetrics {
    pub fn compute(leads: &[Lead], sellers: &[Seller]) -> Self {
        Self {
            lead_count: leads.len(),
            conversion_rate: conversion_rate(leads),
            average_discount: average_discount(leads),
            average_ticket: average_ticket(leads),
            total_revenue: enrolled(leads).map(Lead::closing_value).sum(),
            enrolled_seats: enrolled_seats(leads),
            columns: stage_columns(leads),
            top_loss_reasons: top_loss_reasons(leads),
            top_sellers: top_sellers(leads, sellers),
        }
    }
}

fn enrolled(leads: &[Lead]) -> impl Iterator<Item = &Lead> {
    leads.iter().filter(|l| l.status == LeadStatus::Enrolled)
}

/// Seats across enrolled leads, summed wide enough for any `u32` quantities
pub fn enrolled_seats(leads: &[Lead]) -> u64 {
    enrolled(leads).map(|l| u64::from(l.seats())).sum()
}

/// Percent of leads enrolled; 0 for an empty set
pub fn conversion_rate(leads: &[Lead]) -> f64 {
    if leads.is_empty() {
        return 0.0;
    }
    enrolled(leads).count() as f64 / leads.len() as f64 * 100.0
}

/// Mean discount in percent over leads that were actually discounted
pub fn average_discount(leads: &[Lead]) -> f64 {
    let discounts: Vec<f64> = leads.iter().filter_map(Lead::discount_fraction).collect();
    if discounts.is_empty() {
        return 0.0;
    }
    discounts.iter().sum::<f64>() / discounts.len() as f64 * 100.0
}

/// Enrolled value per enrolled seat; 0 when nothing is enrolled
pub fn average_ticket(leads: &[Lead]) -> f64 {
    let seats = enrolled_seats(leads);
    if seats == 0 {
        return 0.0;
    }
    enrolled(leads).map(Lead::closing_value).sum::<f64>() / seats as f64
}

pub fn stage_columns(leads: &[Lead]) -> Vec<StageColumn> {
    LeadStatus::ALL
        .iter()
        .map(|&status| {
            let in_stage = leads.iter().filter(|l| l.status == status);
            StageColumn {
                status,
                count: in_stage.clone().count(),
                total_value: in_stage.map(Lead::closing_value).sum(),
            }
        })
        .collect()
}

/// Most frequent reasons among declined leads
pub fn top_loss_reasons(leads: &[Lead]) -> Vec<LossReason> {
    let mut reasons: Vec<LossReason> = Vec::new();
    for lead in leads.iter().filter(|l| l.status == LeadStatus::Declined) {
        let reason = lead
            .loss_reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(UNSPECIFIED_REASON);
        match reasons.iter_mut().find(|r| r.reason == reason) {
            Some(entry) => entry.count += 1,
            None => reasons.push(LossReason {
                reason: reason.to_string(),
                count: 1,
            }),
        }
    }
    // stable: equal counts keep first-seen order
    reasons.sort_by(|a, b| b.count.cmp(&a.count));
    reasons.truncate(TOP_LIMIT);
    reasons
}

/// Sellers with the highest pipeline value, across all stages
pub fn top_sellers(leads: &[Lead], sellers: &[Seller]) -> Vec<SellerTotal> {
    let mut totals: Vec<SellerTotal> = Vec::new();
    for lead in leads {
        let value = match lead.negotiated_value {
            Some(v) if v > 0.0 => v,
            _ => lead.standard_value,
        };
        match totals.iter_mut().find(|t| t.seller_id == lead.owner_id) {
            Some(entry) => entry.value += value,
            None => totals.push(SellerTotal {
                seller_id: lead.owner_id.clone(),
                name: sellers
                    .iter()
                    .find(|s| s.id == lead.owner_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| UNKNOWN_SELLER.to_string()),
                value,
            }),
        }
    }
    totals.sort_by(|a, b| b.value.total_cmp(&a.value));
    totals.truncate(TOP_LIMIT);
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn lead(id: &str, status: LeadStatus, standard: f64, negotiated: Option<f64>) -> Lead {
        let mut lead = fixtures::leads().remove(0);
        lead.id = id.to_string();
        lead.status = status;
        lead.standard_value = standard;
        lead.negotiated_value = negotiated;
        lead.quantity = None;
        lead.loss_reason = None;
        lead
    }

    #[test]
    fn test_conversion_rate_bounds() {
        assert_eq!(conversion_rate(&[]), 0.0);

        let leads = fixtures::leads();
        let rate = conversion_rate(&leads);
        assert!((0.0..=100.0).contains(&rate));
        // one of five fixture leads is enrolled
        assert!((rate - 20.0).abs() < 1e-9);

        let all_won = vec![
            lead("a", LeadStatus::Enrolled, 100.0, None),
            lead("b", LeadStatus::Enrolled, 100.0, None),
        ];
        assert_eq!(conversion_rate(&all_won), 100.0);
    }

    #[test]
    fn test_discount_excludes_non_discounted() {
        let leads = vec![
            lead("a", LeadStatus::ProposalSent, 1000.0, Some(800.0)),
            lead("b", LeadStatus::ProposalSent, 1000.0, Some(1000.0)),
            lead("c", LeadStatus::ProposalSent, 1000.0, Some(1200.0)),
            lead("d", LeadStatus::ProposalSent, 1000.0, None),
            lead("e", LeadStatus::ProposalSent, 1000.0, Some(0.0)),
        ];
        // only "a" qualifies: 20%
        assert!((average_discount(&leads) - 20.0).abs() < 1e-9);

        let none = vec![lead("b", LeadStatus::Enrolled, 1000.0, Some(1500.0))];
        assert_eq!(average_discount(&none), 0.0);
    }

    #[test]
    fn test_average_ticket_with_no_enrolled_is_zero() {
        let leads = vec![lead("a", LeadStatus::ProposalSent, 1000.0, None)];
        let ticket = average_ticket(&leads);
        assert_eq!(ticket, 0.0);
        assert!(!ticket.is_nan());
        assert_eq!(average_ticket(&[]), 0.0);
    }

    #[test]
    fn test_average_ticket_per_seat() {
        let mut a = lead("a", LeadStatus::Enrolled, 10_000.0, Some(9_000.0));
        a.quantity = Some(3);
        let b = lead("b", LeadStatus::Enrolled, 3_000.0, None);
        // (9000 + 3000) / (3 + 1)
        assert!((average_ticket(&[a, b]) - 3_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_large_seat_counts_do_not_overflow() {
        let leads: Vec<Lead> = (0..2)
            .map(|i| {
                let mut l = lead(&i.to_string(), LeadStatus::Enrolled, 6.0e9, None);
                l.quantity = Some(3_000_000_000);
                l
            })
            .collect();

        let m = PipelineMetrics::compute(&leads, &[]);
        assert_eq!(m.enrolled_seats, 6_000_000_000);
        assert!((m.average_ticket - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixture_metrics() {
        let m = PipelineMetrics::compute(&fixtures::leads(), &fixtures::sellers());
        assert_eq!(m.lead_count, 5);
        assert_eq!(m.total_revenue, 55_000.0);
        assert_eq!(m.enrolled_seats, 20);
        assert!((m.average_ticket - 2_750.0).abs() < 1e-9);
        assert_eq!(m.columns.len(), 4);
        assert_eq!(m.columns[0].count, 2);
        assert_eq!(m.top_loss_reasons.len(), 1);
        assert_eq!(m.top_loss_reasons[0].reason, "Sem orçamento para este exercício.");
        assert_eq!(m.top_sellers.len(), TOP_LIMIT);
        assert_eq!(m.top_sellers[0].name, "Ariane");
        assert_eq!(m.top_sellers[1].name, "Elis");
    }

    #[test]
    fn test_loss_reasons_default_and_limit() {
        let mut leads = Vec::new();
        for (i, reason) in ["Preço", "Preço", "Prazo", "", "Agenda"].iter().enumerate() {
            let mut l = lead(&i.to_string(), LeadStatus::Declined, 100.0, None);
            l.loss_reason = Some(reason.to_string());
            leads.push(l);
        }
        let top = top_loss_reasons(&leads);
        assert_eq!(top.len(), TOP_LIMIT);
        assert_eq!(top[0], LossReason { reason: "Preço".to_string(), count: 2 });
        assert_eq!(top[1].reason, "Prazo");
        assert_eq!(top[2].reason, UNSPECIFIED_REASON);
    }

    #[test]
    fn test_unknown_owner_name() {
        let mut l = lead("a", LeadStatus::ProposalSent, 100.0, None);
        l.owner_id = "ghost".to_string();
        let top = top_sellers(&[l], &fixtures::sellers());
        assert_eq!(top[0].name, UNKNOWN_SELLER);
        assert_eq!(top[0].value, 100.0);
    }
}
