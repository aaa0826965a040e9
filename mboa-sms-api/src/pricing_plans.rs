//! Pricing plans.

use crate::error::ApiResult;
use mboa_sms_core::{Page, PricingPlan, PricingPlanInput};
use mboa_sms_http::AuthenticatedHttpClient;
use serde::de::IgnoredAny;
use serde::Deserialize;

/// The plans endpoint answers with a bare array or a page, depending on the
/// backend version.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlanList {
    Plain(Vec<PricingPlan>),
    Paged(Page<PricingPlan>),
}

impl PlanList {
    fn into_vec(self) -> Vec<PricingPlan> {
        match self {
            PlanList::Plain(plans) => plans,
            PlanList::Paged(page) => page.data,
        }
    }
}

/// Pricing plan endpoints.
#[derive(Debug, Clone)]
pub struct PricingPlansService {
    client: AuthenticatedHttpClient,
}

impl PricingPlansService {
    /// Create the service.
    pub fn new(client: AuthenticatedHttpClient) -> Self {
        Self { client }
    }

    /// All plans.
    pub async fn list(&self) -> ApiResult<Vec<PricingPlan>> {
        let plans: PlanList = self.client.get("/pricing-plans").await?;
        Ok(plans.into_vec())
    }

    /// The cheapest active plan covering `volume` SMS.
    pub async fn plan_for(&self, volume: u64) -> ApiResult<Option<PricingPlan>> {
        let plan = self
            .list()
            .await?
            .into_iter()
            .filter(|p| p.active && p.covers(volume))
            .min_by(|a, b| a.price_per_sms.total_cmp(&b.price_per_sms));
        Ok(plan)
    }

    /// A single plan.
    pub async fn get(&self, id: &str) -> ApiResult<PricingPlan> {
        Ok(self.client.get(&format!("/pricing-plans/{id}")).await?)
    }

    /// Create a plan.
    pub async fn create(&self, input: PricingPlanInput) -> ApiResult<PricingPlan> {
        let input = input.validate()?;
        Ok(self.client.post("/pricing-plans", &input).await?)
    }

    /// Replace a plan.
    pub async fn update(&self, id: &str, input: PricingPlanInput) -> ApiResult<PricingPlan> {
        let input = input.validate()?;
        Ok(self
            .client
            .put(&format!("/pricing-plans/{id}"), &input)
            .await?)
    }

    /// Delete a plan.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete::<IgnoredAny>(&format!("/pricing-plans/{id}"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::service_client;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn plans() -> serde_json::Value {
        json!([
            {"id": "p1", "name": "Starter", "pricePerSms": 15.0, "minVolume": 0, "maxVolume": 999},
            {"id": "p2", "name": "Pro", "pricePerSms": 12.0, "minVolume": 1000, "maxVolume": 9999},
            {"id": "p3", "name": "Promo", "pricePerSms": 9.0, "minVolume": 1000, "active": false},
            {"id": "p4", "name": "Entreprise", "pricePerSms": 10.0, "minVolume": 10000}
        ])
    }

    #[tokio::test]
    async fn test_list_accepts_array_or_page() {
        let (client, _) = service_client(plans());
        assert_eq!(PricingPlansService::new(client).list().await.unwrap().len(), 4);

        let (client, _) = service_client(json!({"data": plans(), "total": 4}));
        assert_eq!(PricingPlansService::new(client).list().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_plan_for_volume_skips_inactive() {
        let (client, _) = service_client(plans());
        let service = PricingPlansService::new(client);

        assert_eq!(service.plan_for(500).await.unwrap().unwrap().id, "p1");
        assert_eq!(service.plan_for(5_000).await.unwrap().unwrap().id, "p2");
        assert_eq!(service.plan_for(50_000).await.unwrap().unwrap().id, "p4");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_price() {
        let (client, mock) = service_client(json!({}));
        let err = PricingPlansService::new(client)
            .create(PricingPlanInput::new("Free", 0.0, 0))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(mock.request_count(), 0);
    }
}
