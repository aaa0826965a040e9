//! Credit purchases.

use crate::error::ApiResult;
use bytes::Bytes;
use mboa_sms_core::{Page, PageQuery, Recharge, RechargeInput, RechargeStatus};
use mboa_sms_http::{AuthenticatedHttpClient, Method, MultipartForm, RequestBody, RequestOptions};
use serde::Serialize;
use tracing::info;

/// Proof-of-payment file attached to a recharge.
#[derive(Debug, Clone)]
pub struct PaymentProof {
    /// File name.
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: mime::Mime,
    /// File contents.
    pub bytes: Bytes,
}

impl PaymentProof {
    /// Create a proof attachment.
    pub fn new(file_name: impl Into<String>, content_type: mime::Mime, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes: bytes.into(),
        }
    }
}

#[derive(Serialize)]
struct Rejection<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// Recharge endpoints.
#[derive(Debug, Clone)]
pub struct RechargesService {
    client: AuthenticatedHttpClient,
}

impl RechargesService {
    /// Create the service.
    pub fn new(client: AuthenticatedHttpClient) -> Self {
        Self { client }
    }

    /// One page of recharges, optionally filtered by status.
    pub async fn list(
        &self,
        query: &PageQuery,
        status: Option<RechargeStatus>,
    ) -> ApiResult<Page<Recharge>> {
        let mut query = query.clone();
        if let Some(status) = status {
            query = query.filter("status", status.as_str());
        }
        let options = RequestOptions::new().query_pairs(query.to_pairs());
        Ok(self
            .client
            .request(Method::GET, "/recharges", None, options)
            .await?)
    }

    /// A single recharge.
    pub async fn get(&self, id: &str) -> ApiResult<Recharge> {
        Ok(self.client.get(&format!("/recharges/{id}")).await?)
    }

    /// Submit a recharge. With a proof file the request is sent as a
    /// multipart form, otherwise as JSON.
    pub async fn create(
        &self,
        input: RechargeInput,
        proof: Option<PaymentProof>,
    ) -> ApiResult<Recharge> {
        let input = input.validate()?;
        let recharge: Recharge = match proof {
            None => self.client.post("/recharges", &input).await?,
            Some(proof) => {
                let form = input
                    .form_fields()
                    .into_iter()
                    .fold(MultipartForm::new(), |form, (name, value)| form.text(name, value))
                    .file("proof", proof.file_name, Some(&proof.content_type), proof.bytes);
                self.client.post_form("/recharges", form).await?
            }
        };
        info!(recharge_id = %recharge.id, amount = recharge.amount, "Recharge submitted");
        Ok(recharge)
    }

    /// Approve a recharge and credit the account (administrators).
    pub async fn approve(&self, id: &str) -> ApiResult<Recharge> {
        Ok(self
            .client
            .request(
                Method::PATCH,
                &format!("/recharges/{id}/approve"),
                None,
                RequestOptions::default(),
            )
            .await?)
    }

    /// Reject a recharge.
    pub async fn reject(&self, id: &str, reason: Option<&str>) -> ApiResult<Recharge> {
        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        let body = RequestBody::json(&Rejection { reason })?;
        Ok(self
            .client
            .request(
                Method::PATCH,
                &format!("/recharges/{id}/reject"),
                Some(body),
                RequestOptions::default(),
            )
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::service_client;
    use mboa_sms_http::header::CONTENT_TYPE;
    use mboa_sms_http::FormValue;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn recharge() -> serde_json::Value {
        json!({"id": "r1", "amount": 25000, "paymentMethod": "orange_money", "status": "pending"})
    }

    #[tokio::test]
    async fn test_create_without_proof_is_json() {
        let (client, mock) = service_client(recharge());
        let created = RechargesService::new(client)
            .create(RechargeInput::new(25_000, "orange_money"), None)
            .await
            .unwrap();
        assert_eq!(created.status, RechargeStatus::Pending);
        assert_eq!(mock.requests()[0].headers[CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn test_create_with_proof_is_multipart() {
        let (client, mock) = service_client(recharge());
        RechargesService::new(client)
            .create(
                RechargeInput::new(25_000, "mtn_momo").reference("TX-889"),
                Some(PaymentProof::new("receipt.png", mime::IMAGE_PNG, vec![0x89_u8, 0x50])),
            )
            .await
            .unwrap();

        let sent = &mock.requests()[0];
        assert_eq!(sent.headers[CONTENT_TYPE], "multipart/form-data");
        let Some(RequestBody::Multipart(form)) = &sent.body else {
            panic!("expected multipart body");
        };
        assert_eq!(form.text_value("amount"), Some("25000"));
        assert_eq!(form.text_value("reference"), Some("TX-889"));
        assert!(form.parts().iter().any(|p| p.name == "proof"
            && matches!(&p.value, FormValue::File { content_type: Some(ct), .. } if ct == "image/png")));
    }

    #[tokio::test]
    async fn test_zero_amount_rejected_locally() {
        let (client, mock) = service_client(recharge());
        let err = RechargesService::new(client)
            .create(RechargeInput::new(0, "orange_money"), None)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_review_actions() {
        let (client, mock) = service_client(recharge());
        let service = RechargesService::new(client);

        service.approve("r1").await.unwrap();
        service.reject("r1", Some("  ")).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].method, Method::PATCH);
        assert_eq!(requests[0].path, "/recharges/r1/approve");
        assert!(matches!(
            &requests[1].body,
            Some(RequestBody::Json(body)) if body == &json!({})
        ));
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let (client, mock) = service_client(json!({"data": [recharge()], "total": 1}));
        let page = RechargesService::new(client)
            .list(&PageQuery::new(), Some(RechargeStatus::Pending))
            .await
            .unwrap();
        assert_eq!(page.data[0].id, "r1");
        assert!(mock.requests()[0]
            .query
            .contains(&("status".to_string(), "pending".to_string())));
    }
}
