//! Lead stage transitions
//!
//! Any stage may move to any other stage. The only guard is on
//! [`LeadStatus::Declined`], which requires a loss reason.

use tracing::debug;

use crate::entity_store::EntityStore;
use crate::models::{ActivityDraft, ActivityKind, Lead, LeadStatus};
use crate::{Error, Result};

/// Outcome of a successful stage move
#[derive(Debug, Clone)]
pub struct StageChange {
    /// Lead after the move
    pub lead: Lead,
    /// Stage the lead was in before the move
    pub previous: LeadStatus,
    /// Activity entry to append, if the target stage warrants one
    pub activity: Option<ActivityDraft>,
}

/// Move a lead to `target`
///
/// Declining requires a non-blank `reason`; without one the lead is left
/// untouched and `InvalidInput` is returned. The trimmed reason becomes the
/// lead's loss reason.
pub fn apply_transition(
    store: &mut EntityStore,
    lead_id: &str,
    target: LeadStatus,
    reason: Option<&str>,
) -> Result<StageChange> {
    let author = match store.lead(lead_id) {
        Some(lead) => store.author_for(&lead.owner_id),
        None => return Err(Error::NotFound(format!("Lead {}", lead_id))),
    };

    let reason = reason.map(str::trim).filter(|r| !r.is_empty());
    if target == LeadStatus::Declined && reason.is_none() {
        return Err(Error::InvalidInput(
            "A loss reason is required to decline a lead".to_string(),
        ));
    }

    let lead = store
        .lead_mut(lead_id)
        .ok_or_else(|| Error::NotFound(format!("Lead {}", lead_id)))?;
    let previous = lead.status;
    lead.status = target;
    if target == LeadStatus::Declined {
        lead.loss_reason = reason.map(str::to_string);
    }
    let lead = lead.clone();

    debug!(lead_id = %lead.id, from = %previous, to = %target, "Lead stage changed");

    let activity = transition_activity(&lead, target, author);
    Ok(StageChange {
        lead,
        previous,
        activity,
    })
}

fn transition_activity(lead: &Lead, target: LeadStatus, author: String) -> Option<ActivityDraft> {
    match target {
        LeadStatus::Enrolled => Some(ActivityDraft::new(
            ActivityKind::Success,
            "New enrollment confirmed",
            format!("Seller {} closed with {}.", author, lead.organization),
            author,
        )),
        LeadStatus::Declined => Some(ActivityDraft::new(
            ActivityKind::Warning,
            "Opportunity lost",
            format!("Lead \"{}\" declined.", lead.name),
            author,
        )),
        LeadStatus::ProposalSent | LeadStatus::UnderReview => None,
    }
}

/// Activity entry for a newly created lead
pub fn creation_activity(store: &EntityStore, lead: &Lead) -> ActivityDraft {
    ActivityDraft::new(
        ActivityKind::Info,
        "New deal started",
        format!("Proposal sent to {}.", lead.organization),
        store.author_for(&lead.owner_id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decline_without_reason_keeps_status() {
        let mut store = EntityStore::from_fixtures();
        for reason in [None, Some(""), Some("   ")] {
            let err = apply_transition(&mut store, "l1", LeadStatus::Declined, reason);
            assert!(matches!(err, Err(Error::InvalidInput(_))));
            let lead = store.lead("l1").unwrap();
            assert_eq!(lead.status, LeadStatus::ProposalSent);
            assert_eq!(lead.loss_reason, None);
        }
    }

    #[test]
    fn test_decline_with_reason_records_it() {
        let mut store = EntityStore::from_fixtures();
        let change =
            apply_transition(&mut store, "l2", LeadStatus::Declined, Some("  Preço alto ")).unwrap();

        assert_eq!(change.previous, LeadStatus::UnderReview);
        assert_eq!(change.lead.status, LeadStatus::Declined);
        assert_eq!(change.lead.loss_reason.as_deref(), Some("Preço alto"));
        assert_eq!(store.lead("l2").unwrap().status, LeadStatus::Declined);

        let activity = change.activity.unwrap();
        assert_eq!(activity.kind, ActivityKind::Warning);
        assert_eq!(activity.details, "Lead \"Amanda Oliveira\" declined.");
        assert_eq!(activity.author, "Andreia");
    }

    #[test]
    fn test_enroll_logs_success() {
        let mut store = EntityStore::from_fixtures();
        let change = apply_transition(&mut store, "l1", LeadStatus::Enrolled, None).unwrap();
        let activity = change.activity.unwrap();
        assert_eq!(activity.kind, ActivityKind::Success);
        assert_eq!(activity.message, "New enrollment confirmed");
        assert_eq!(activity.details, "Seller Elis closed with Prefeitura de Osasco.");
    }

    #[test]
    fn test_any_stage_reaches_any_other() {
        let mut store = EntityStore::from_fixtures();
        // l3 is enrolled; moving back is allowed and logs nothing
        let change = apply_transition(&mut store, "l3", LeadStatus::ProposalSent, None).unwrap();
        assert_eq!(change.previous, LeadStatus::Enrolled);
        assert!(change.activity.is_none());

        // same stage again is accepted too
        let again = apply_transition(&mut store, "l3", LeadStatus::ProposalSent, None).unwrap();
        assert_eq!(again.previous, LeadStatus::ProposalSent);
    }

    #[test]
    fn test_unknown_lead() {
        let mut store = EntityStore::from_fixtures();
        let err = apply_transition(&mut store, "nope", LeadStatus::Enrolled, None);
        assert!(matches!(err, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_unknown_owner_is_system() {
        let mut store = EntityStore::from_fixtures();
        store.lead_mut("l4").unwrap().owner_id = "ghost".to_string();
        let change = apply_transition(&mut store, "l4", LeadStatus::Enrolled, None).unwrap();
        assert_eq!(change.activity.unwrap().author, "System");

        let lead = store.lead("l4").unwrap().clone();
        let created = creation_activity(&store, &lead);
        assert_eq!(created.kind, ActivityKind::Info);
        assert_eq!(created.details, "Proposal sent to Tribunal de Contas - GO.");
    }
}
