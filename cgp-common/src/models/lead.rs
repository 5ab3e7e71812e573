//! Sales leads and pipeline stages

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::non_blank;
use crate::{Error, Result};

/// Pipeline stage of a lead
///
/// Serialized with the labels the remote store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
    #[serde(rename = "Proposta Enviada", alias = "ProposalSent")]
    ProposalSent,
    #[serde(rename = "Em Análise", alias = "UnderReview")]
    UnderReview,
    #[serde(rename = "Inscrito", alias = "Enrolled")]
    Enrolled,
    #[serde(rename = "Declinado", alias = "Declined")]
    Declined,
}

impl LeadStatus {
    /// Board column order
    pub const ALL: [LeadStatus; 4] = [
        LeadStatus::ProposalSent,
        LeadStatus::UnderReview,
        LeadStatus::Enrolled,
        LeadStatus::Declined,
    ];

    /// Label stored in the `status` column
    pub fn as_wire(&self) -> &'static str {
        match self {
            LeadStatus::ProposalSent => "Proposta Enviada",
            LeadStatus::UnderReview => "Em Análise",
            LeadStatus::Enrolled => "Inscrito",
            LeadStatus::Declined => "Declinado",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for LeadStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Proposta Enviada" | "ProposalSent" => Ok(LeadStatus::ProposalSent),
            "Em Análise" | "UnderReview" => Ok(LeadStatus::UnderReview),
            "Inscrito" | "Enrolled" => Ok(LeadStatus::Enrolled),
            "Declinado" | "Declined" => Ok(LeadStatus::Declined),
            other => Err(Error::InvalidInput(format!("Unknown lead status: {}", other))),
        }
    }
}

/// A prospective customer moving through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub name: String,
    /// Public body the contact works for
    pub organization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Free text, loosely matched against course titles
    #[serde(default)]
    pub interest: String,
    pub status: LeadStatus,
    /// List price for the requested seats
    #[serde(default)]
    pub standard_value: f64,
    /// Price actually agreed with the customer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negotiated_value: Option<f64>,
    /// Number of seats in the proposal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    /// Seller responsible for the lead
    #[serde(default)]
    pub owner_id: String,
    pub created_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss_reason: Option<String>,
}

impl Lead {
    /// Negotiated value when present, list price otherwise
    pub fn closing_value(&self) -> f64 {
        self.negotiated_value.unwrap_or(self.standard_value)
    }

    /// Seats in the proposal, one when unspecified
    pub fn seats(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }

    /// Fractional discount granted, if any
    ///
    /// Only a positive negotiated value below a positive list price counts
    /// as a discount; zero or missing negotiated values do not.
    pub fn discount_fraction(&self) -> Option<f64> {
        let negotiated = self.negotiated_value?;
        if negotiated > 0.0 && self.standard_value > 0.0 && negotiated < self.standard_value {
            Some((self.standard_value - negotiated) / self.standard_value)
        } else {
            None
        }
    }
}

/// Lead as submitted by the create/edit form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub organization: String,
    pub role: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub interest: String,
    pub status: Option<LeadStatus>,
    #[serde(default)]
    pub standard_value: f64,
    pub negotiated_value: Option<f64>,
    pub quantity: Option<u32>,
    pub course_id: Option<String>,
    #[serde(default)]
    pub owner_id: String,
    pub created_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub loss_reason: Option<String>,
}

impl LeadDraft {
    /// Check the fields the form requires
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("Lead name is required".to_string()));
        }
        if self.organization.trim().is_empty() {
            return Err(Error::InvalidInput("Lead organization is required".to_string()));
        }
        if self.standard_value < 0.0 || self.negotiated_value.is_some_and(|v| v < 0.0) {
            return Err(Error::InvalidInput("Lead values cannot be negative".to_string()));
        }
        if self.quantity == Some(0) {
            return Err(Error::InvalidInput("Seat quantity must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Build a lead with the given id, defaulting the status and creation date
    pub fn into_lead(self, id: String, today: NaiveDate) -> Lead {
        Lead {
            id,
            name: self.name.trim().to_string(),
            organization: self.organization.trim().to_string(),
            role: non_blank(self.role),
            city: non_blank(self.city),
            state: non_blank(self.state),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            interest: self.interest.trim().to_string(),
            status: self.status.unwrap_or(LeadStatus::ProposalSent),
            standard_value: self.standard_value,
            negotiated_value: self.negotiated_value,
            quantity: self.quantity,
            course_id: non_blank(self.course_id),
            owner_id: self.owner_id.trim().to_string(),
            created_on: self.created_on.unwrap_or(today),
            notes: non_blank(self.notes),
            loss_reason: non_blank(self.loss_reason),
        }
    }
}
