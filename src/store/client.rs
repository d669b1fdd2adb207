use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::debug;

use super::error::StoreError;
use super::model::UserDocument;
use crate::cache::EnrollmentInfo;

const LIST_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SIZE: u32 = 300;

#[async_trait]
/// Source of enrollment candidates.
pub trait EnrollmentStore: Send + Sync {
    /// Lists every user document that carries an avatar reference, in store order.
    async fn list_candidates(&self) -> Result<Vec<EnrollmentInfo>, StoreError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    /// `projects/{p}/databases/{d}/documents/{collection}/{id}`
    name: String,
    #[serde(default)]
    fields: HashMap<String, FirestoreValue>,
}

/// Typed Firestore value; only string values are read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirestoreValue {
    string_value: Option<String>,
}

impl FirestoreDocument {
    fn string_field(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(|v| v.string_value.clone())
    }

    fn into_user_document(self) -> UserDocument {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        UserDocument {
            name: self.string_field("name"),
            avatar_url: self.string_field("avatarUrl"),
            noel_emoji: self.string_field("noelEmoji"),
            id,
        }
    }
}

#[derive(Debug, Clone)]
/// Firestore REST client listing one collection of user documents.
pub struct FirestoreStore {
    http: HttpClient,
    base_url: String,
    project: String,
    collection: String,
    token: Option<String>,
}

impl FirestoreStore {
    /// Creates a client. `base_url` is usually `https://firestore.googleapis.com` or an
    /// emulator address.
    pub fn new(
        base_url: impl Into<String>,
        project: impl Into<String>,
        collection: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, StoreError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = HttpClient::builder()
            .timeout(LIST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::ConnectionFailed {
                url: base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url,
            project: project.into(),
            collection: collection.into(),
            token,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the collection listing URL.
    pub fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project, self.collection
        )
    }

    /// Lists every document of the collection, following `nextPageToken`.
    pub async fn list_documents(&self) -> Result<Vec<UserDocument>, StoreError> {
        let url = self.documents_url();
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(&url)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            if let Some(bearer) = &self.token {
                request = request.bearer_auth(bearer);
            }

            let response = request
                .send()
                .await
                .map_err(|e| StoreError::ConnectionFailed {
                    url: url.clone(),
                    message: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(StoreError::QueryFailed {
                    collection: self.collection.clone(),
                    message: format!("{}: {}", status, body),
                });
            }

            let page: ListDocumentsResponse =
                response
                    .json()
                    .await
                    .map_err(|e| StoreError::InvalidResponse {
                        message: e.to_string(),
                    })?;

            documents.extend(
                page.documents
                    .into_iter()
                    .map(FirestoreDocument::into_user_document),
            );

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        debug!(
            collection = %self.collection,
            documents = documents.len(),
            "Listed store documents"
        );
        Ok(documents)
    }
}

#[async_trait]
impl EnrollmentStore for FirestoreStore {
    async fn list_candidates(&self) -> Result<Vec<EnrollmentInfo>, StoreError> {
        Ok(self
            .list_documents()
            .await?
            .into_iter()
            .filter_map(UserDocument::into_candidate)
            .collect())
    }
}

#[cfg(test)]
pub(crate) fn parse_list_response(
    body: &str,
) -> Result<(Vec<UserDocument>, Option<String>), serde_json::Error> {
    let page: ListDocumentsResponse = serde_json::from_str(body)?;
    Ok((
        page.documents
            .into_iter()
            .map(FirestoreDocument::into_user_document)
            .collect(),
        page.next_page_token,
    ))
}
