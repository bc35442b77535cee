//! Score results produced by the scoring engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::weights::Scope;

/// Output of scoring one answer set. All figures are kg CO₂e.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub scope: Scope,
    /// Weights table version the result was computed with
    pub weights_version: String,
    /// Sum of every matched weight
    pub raw_total: f64,
    /// Sum of the home-electric categories
    pub electric_subtotal: f64,
    /// Monthly: subtracted from `raw_total`. Weekly: reporting figure only.
    pub renewable_discount: f64,
    pub adjusted_total: f64,
    /// Monthly scope: `adjusted_total / household_size`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_person: Option<f64>,
    /// Weekly scope: change against the previous week's adjusted total
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_change_from_previous: Option<f64>,
    /// Weekly scope: `adjusted_total * 4`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_estimate_per_person: Option<f64>,
}

impl ScoreResult {
    /// Monthly footprint this result stands for: the adjusted total of a
    /// baseline, or the monthly estimate of a weekly checkup.
    pub fn monthly_footprint(&self) -> f64 {
        match self.scope {
            Scope::Monthly => self.adjusted_total,
            Scope::Weekly => self.monthly_estimate.unwrap_or(self.adjusted_total * 4.0),
        }
    }

    /// Flat key → number view for storage and display. Null fields are omitted.
    pub fn to_flat_map(&self) -> BTreeMap<String, f64> {
        let mut out = BTreeMap::new();
        out.insert("raw_total".to_string(), self.raw_total);
        out.insert("electric_subtotal".to_string(), self.electric_subtotal);
        out.insert("renewable_discount".to_string(), self.renewable_discount);
        out.insert("adjusted_total".to_string(), self.adjusted_total);

        let optional = [
            ("per_person", self.per_person),
            ("percent_change_from_previous", self.percent_change_from_previous),
            ("monthly_estimate", self.monthly_estimate),
            ("monthly_estimate_per_person", self.monthly_estimate_per_person),
        ];
        for (key, value) in optional {
            if let Some(v) = value {
                out.insert(key.to_string(), v);
            }
        }
        out
    }
}
