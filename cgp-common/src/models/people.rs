//! Instructors and sellers

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: String,
    pub name: String,
    /// Cumulative sales to date
    #[serde(default)]
    pub total_sales: f64,
    /// Legacy single goal, kept alongside the three tiers
    #[serde(default)]
    pub individual_goal: f64,
    #[serde(default)]
    pub monthly_goal: f64,
    #[serde(default)]
    pub quarterly_goal: f64,
    #[serde(default)]
    pub annual_goal: f64,
    #[serde(default)]
    pub avatar: String,
    /// Attainment in percent as reported by the store
    #[serde(default)]
    pub performance: f64,
}
