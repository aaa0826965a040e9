//! Address book.

use crate::error::ApiResult;
use bytes::Bytes;
use mboa_sms_core::{Contact, ContactInput, Page, PageQuery};
use mboa_sms_http::{AuthenticatedHttpClient, Method, MultipartForm, RequestOptions};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome of a CSV import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Rows added.
    #[serde(default)]
    pub imported: u64,
    /// Rows skipped as duplicates.
    #[serde(default, alias = "duplicates")]
    pub skipped: u64,
    /// Per-row errors reported by the server.
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Contact endpoints.
#[derive(Debug, Clone)]
pub struct ContactsService {
    client: AuthenticatedHttpClient,
}

impl ContactsService {
    /// Create the service.
    pub fn new(client: AuthenticatedHttpClient) -> Self {
        Self { client }
    }

    /// One page of contacts.
    pub async fn list(&self, query: &PageQuery) -> ApiResult<Page<Contact>> {
        let options = RequestOptions::new().query_pairs(query.to_pairs());
        Ok(self
            .client
            .request(Method::GET, "/contacts", None, options)
            .await?)
    }

    /// One page of the contacts in a group.
    pub async fn list_in_group(&self, group_id: &str, query: &PageQuery) -> ApiResult<Page<Contact>> {
        self.list(&query.clone().filter("groupId", group_id)).await
    }

    /// A single contact.
    pub async fn get(&self, id: &str) -> ApiResult<Contact> {
        Ok(self.client.get(&format!("/contacts/{id}")).await?)
    }

    /// Create a contact. The phone number is normalised to E.164 first.
    pub async fn create(&self, input: ContactInput) -> ApiResult<Contact> {
        let input = input.validate()?;
        let contact: Contact = self.client.post("/contacts", &input).await?;
        info!(contact_id = %contact.id, operator = %contact.operator(), "Contact created");
        Ok(contact)
    }

    /// Replace a contact.
    pub async fn update(&self, id: &str, input: ContactInput) -> ApiResult<Contact> {
        let input = input.validate()?;
        Ok(self.client.put(&format!("/contacts/{id}"), &input).await?)
    }

    /// Delete a contact.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete::<IgnoredAny>(&format!("/contacts/{id}"))
            .await?;
        Ok(())
    }

    /// Upload a CSV of contacts, optionally adding them all to a group.
    pub async fn import_csv(
        &self,
        file_name: &str,
        csv: impl Into<Bytes>,
        group_id: Option<&str>,
    ) -> ApiResult<ImportSummary> {
        let mut form = MultipartForm::new().file("file", file_name, Some(&mime::TEXT_CSV), csv);
        if let Some(group_id) = group_id {
            form = form.text("groupId", group_id);
        }
        let summary: ImportSummary = self.client.post_form("/contacts/import", form).await?;
        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            errors = summary.errors.len(),
            "Contacts imported"
        );
        Ok(summary)
    }
}
