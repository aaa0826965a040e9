use super::{optional, required};
use crate::errors::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Volume tier with a unit price in XAF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    /// Plan ID.
    pub id: String,
    /// Plan name.
    pub name: String,
    /// Price of one SMS part, in XAF.
    pub price_per_sms: f64,
    /// Smallest purchase covered by this plan.
    #[serde(default)]
    pub min_volume: u64,
    /// Largest purchase covered, if bounded.
    #[serde(default)]
    pub max_volume: Option<u64>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the plan is offered.
    #[serde(default = "active_default")]
    pub active: bool,
}

fn active_default() -> bool {
    true
}

impl PricingPlan {
    /// Whether `volume` SMS fall within this tier.
    pub fn covers(&self, volume: u64) -> bool {
        volume >= self.min_volume && self.max_volume.map_or(true, |max| volume <= max)
    }

    /// Cost of `parts` SMS parts, in XAF.
    pub fn cost(&self, parts: u64) -> f64 {
        self.price_per_sms * parts as f64
    }
}

/// Payload for creating or updating a pricing plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlanInput {
    /// Plan name.
    pub name: String,
    /// Price of one SMS part, in XAF.
    pub price_per_sms: f64,
    /// Smallest purchase covered.
    pub min_volume: u64,
    /// Largest purchase covered, if bounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_volume: Option<u64>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the plan is offered.
    pub active: bool,
}

impl PricingPlanInput {
    /// Create an active plan input.
    pub fn new(name: impl Into<String>, price_per_sms: f64, min_volume: u64) -> Self {
        Self {
            name: name.into(),
            price_per_sms,
            min_volume,
            max_volume: None,
            description: None,
            active: true,
        }
    }

    /// Bound the tier.
    #[must_use]
    pub fn max_volume(mut self, max: u64) -> Self {
        self.max_volume = Some(max);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check name, price and volume bounds.
    ///
    /// # Errors
    ///
    /// Fails on a blank name, a non-positive price, or `min_volume > max_volume`.
    pub fn validate(self) -> CoreResult<Self> {
        let name = required(&self.name, "name")?;

        if !self.price_per_sms.is_finite() || self.price_per_sms <= 0.0 {
            return Err(CoreError::validation("pricePerSms must be positive"));
        }
        if let Some(max) = self.max_volume {
            if max < self.min_volume {
                return Err(CoreError::validation(
                    "maxVolume must not be below minVolume",
                ));
            }
        }

        Ok(Self {
            name,
            description: optional(self.description.as_deref()),
            ..self
        })
    }
}
