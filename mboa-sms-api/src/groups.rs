//! Contact groups.

use crate::error::ApiResult;
use mboa_sms_core::{CoreError, Group, GroupInput, Page, PageQuery};
use mboa_sms_http::{AuthenticatedHttpClient, Method, RequestBody, RequestOptions};
use serde::de::IgnoredAny;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Members<'a> {
    contact_ids: &'a [String],
}

/// Group endpoints.
#[derive(Debug, Clone)]
pub struct GroupsService {
    client: AuthenticatedHttpClient,
}

impl GroupsService {
    /// Create the service.
    pub fn new(client: AuthenticatedHttpClient) -> Self {
        Self { client }
    }

    /// One page of groups.
    pub async fn list(&self, query: &PageQuery) -> ApiResult<Page<Group>> {
        let options = RequestOptions::new().query_pairs(query.to_pairs());
        Ok(self
            .client
            .request(Method::GET, "/groups", None, options)
            .await?)
    }

    /// A single group.
    pub async fn get(&self, id: &str) -> ApiResult<Group> {
        Ok(self.client.get(&format!("/groups/{id}")).await?)
    }

    /// Create a group.
    pub async fn create(&self, input: GroupInput) -> ApiResult<Group> {
        let input = input.validate()?;
        Ok(self.client.post("/groups", &input).await?)
    }

    /// Rename or redescribe a group.
    pub async fn update(&self, id: &str, input: GroupInput) -> ApiResult<Group> {
        let input = input.validate()?;
        Ok(self.client.put(&format!("/groups/{id}"), &input).await?)
    }

    /// Delete a group. Its contacts are kept.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete::<IgnoredAny>(&format!("/groups/{id}"))
            .await?;
        Ok(())
    }

    /// Add contacts to a group.
    pub async fn add_contacts(&self, id: &str, contact_ids: &[String]) -> ApiResult<Group> {
        let body = members(contact_ids)?;
        Ok(self
            .client
            .request(
                Method::POST,
                &format!("/groups/{id}/contacts"),
                Some(body),
                RequestOptions::default(),
            )
            .await?)
    }

    /// Remove contacts from a group.
    pub async fn remove_contacts(&self, id: &str, contact_ids: &[String]) -> ApiResult<Group> {
        let body = members(contact_ids)?;
        Ok(self
            .client
            .request(
                Method::DELETE,
                &format!("/groups/{id}/contacts"),
                Some(body),
                RequestOptions::default(),
            )
            .await?)
    }
}

fn members(contact_ids: &[String]) -> ApiResult<RequestBody> {
    if contact_ids.is_empty() {
        return Err(CoreError::EmptyField("contactIds").into());
    }
    Ok(RequestBody::json(&Members { contact_ids })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::service_client;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_trims_name() {
        let (client, mock) = service_client(json!({"id": "g1", "name": "VIP"}));
        let group = GroupsService::new(client)
            .create(GroupInput::new("  VIP "))
            .await
            .unwrap();
        assert_eq!(group.name, "VIP");
        assert!(matches!(
            &mock.requests()[0].body,
            Some(RequestBody::Json(body)) if body == &json!({"name": "VIP"})
        ));
    }

    #[tokio::test]
    async fn test_membership_changes() {
        let (client, mock) = service_client(json!({"id": "g1", "name": "VIP", "contactCount": 3}));
        let groups = GroupsService::new(client);
        let ids = vec!["c1".to_string(), "c2".to_string()];

        groups.add_contacts("g1", &ids).await.unwrap();
        groups.remove_contacts("g1", &ids[..1]).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[1].method, Method::DELETE);
        assert_eq!(requests[1].path, "/groups/g1/contacts");
        assert!(matches!(
            &requests[1].body,
            Some(RequestBody::Json(body)) if body == &json!({"contactIds": ["c1"]})
        ));
    }

    #[tokio::test]
    async fn test_empty_membership_change_rejected() {
        let (client, mock) = service_client(json!({}));
        let err = GroupsService::new(client)
            .add_contacts("g1", &[])
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(mock.request_count(), 0);
    }
}
