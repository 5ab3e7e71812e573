//! Commission rates and the global revenue goal

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Scope value meaning "every seller" or "every course"
pub const SCOPE_ALL: &str = "todos";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommissionKind {
    #[serde(rename = "Padrão", alias = "Standard")]
    Standard,
    #[serde(rename = "Específica", alias = "Specific")]
    Specific,
}

impl CommissionKind {
    pub fn as_wire(&self) -> &'static str {
        match self {
            CommissionKind::Standard => "Padrão",
            CommissionKind::Specific => "Específica",
        }
    }
}

/// Commission percentage scoped to a seller, a course and optionally a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRate {
    pub id: String,
    /// Percentage, e.g. `5.0` for 5%
    pub rate: f64,
    /// Seller id or [`SCOPE_ALL`]
    pub seller_id: String,
    /// Course id or [`SCOPE_ALL`]
    pub course_id: String,
    pub kind: CommissionKind,
    /// Month the rate applies to (`YYYY-MM`); every month when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

impl CommissionRate {
    pub fn applies_to_all_sellers(&self) -> bool {
        self.seller_id == SCOPE_ALL
    }

    pub fn applies_to_all_courses(&self) -> bool {
        self.course_id == SCOPE_ALL
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.rate) {
            return Err(Error::InvalidInput(format!(
                "Commission rate must be between 0 and 100, got {}",
                self.rate
            )));
        }
        if self.seller_id.trim().is_empty() || self.course_id.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Commission scope requires a seller and a course (or \"todos\")".to_string(),
            ));
        }
        if let Some(month) = &self.month {
            if chrono::NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").is_err() {
                return Err(Error::InvalidInput(format!(
                    "Commission month must be YYYY-MM, got {}",
                    month
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GoalPeriod {
    #[serde(rename = "Bimestral", alias = "Bimonthly")]
    Bimonthly,
    #[serde(rename = "Trimestral", alias = "Quarterly")]
    Quarterly,
    #[serde(rename = "Semestral", alias = "Semiannual")]
    Semiannual,
    #[default]
    #[serde(rename = "Anual", alias = "Annual")]
    Annual,
}

/// Bonus paid once attainment reaches `threshold_percent`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusTier {
    pub threshold_percent: f64,
    pub amount: f64,
}

/// Organization-wide revenue target, a singleton record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalGoal {
    pub period: GoalPeriod,
    pub target_revenue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tiers: [BonusTier; 3],
}

impl GlobalGoal {
    pub fn validate(&self) -> Result<()> {
        if self.target_revenue < 0.0 {
            return Err(Error::InvalidInput("Goal target cannot be negative".to_string()));
        }
        if self.tiers.iter().any(|t| t.threshold_percent < 0.0 || t.amount < 0.0) {
            return Err(Error::InvalidInput("Bonus tiers cannot be negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(value: f64, month: Option<&str>) -> CommissionRate {
        CommissionRate {
            id: "tx".to_string(),
            rate: value,
            seller_id: SCOPE_ALL.to_string(),
            course_id: "c1".to_string(),
            kind: CommissionKind::Specific,
            month: month.map(str::to_string),
        }
    }

    #[test]
    fn test_rate_validation() {
        assert!(rate(5.0, None).validate().is_ok());
        assert!(rate(5.0, Some("2026-11")).validate().is_ok());
        assert!(rate(120.0, None).validate().is_err());
        assert!(rate(-1.0, None).validate().is_err());
        assert!(rate(5.0, Some("novembro")).validate().is_err());
    }

    #[test]
    fn test_scope_helpers() {
        let r = rate(5.0, None);
        assert!(r.applies_to_all_sellers());
        assert!(!r.applies_to_all_courses());
    }

    #[test]
    fn test_goal_period_labels() {
        let json = serde_json::to_string(&GoalPeriod::Annual).unwrap();
        assert_eq!(json, "\"Anual\"");
        let parsed: GoalPeriod = serde_json::from_str("\"Quarterly\"").unwrap();
        assert_eq!(parsed, GoalPeriod::Quarterly);
    }
}
