use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::{
    AuthError, BackendError, CollectionPath, Document, DocumentPath, DocumentStore, FieldFilter,
    Fields,
};
use crate::config::Config;

const PAGE_SIZE: &str = "300";

/// Supplies ID tokens for authenticated requests
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Current ID token, if a session exists
    fn id_token(&self) -> Option<String>;

    /// Exchange the refresh token for a new ID token
    async fn refresh_id_token(&self) -> Result<String, AuthError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Fields,
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        let id = raw.name.rsplit('/').next().unwrap_or_default().to_string();
        Document {
            id,
            fields: raw.fields,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    document: Option<RawDocument>,
}

#[derive(Debug, Serialize)]
struct WriteBody<'a> {
    fields: &'a Fields,
}

/// Structured query body for `:runQuery`
pub(crate) fn structured_query(
    collection: &CollectionPath,
    filter: &FieldFilter,
) -> serde_json::Value {
    serde_json::json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection.collection_id() }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": filter.field },
                    "op": filter.op.as_wire(),
                    "value": filter.value,
                }
            }
        }
    })
}

/// Document store backed by the Firestore REST API
pub struct FirestoreClient {
    client: Client,
    documents_url: String,
    tokens: Option<Arc<dyn TokenSource>>,
}

impl FirestoreClient {
    /// Create a new client for the configured project
    pub fn new(
        config: &Config,
        tokens: Option<Arc<dyn TokenSource>>,
    ) -> Result<Self, BackendError> {
        let timeout = Duration::from_secs(config.firebase.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                BackendError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        let documents_url = format!(
            "{}/projects/{}/databases/(default)/documents",
            config.firebase.firestore_url.trim_end_matches('/'),
            config.firebase.project_id
        );

        Ok(Self {
            client,
            documents_url,
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.documents_url, path)
    }

    fn with_token(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request, refreshing the ID token and replaying once on 401
    async fn send<F>(&self, build: F) -> Result<Response, BackendError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let token = self.tokens.as_ref().and_then(|t| t.id_token());
        let response = Self::with_token(build(&self.client), token.as_deref())
            .send()
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED || token.is_none() {
            return Ok(response);
        }

        let Some(tokens) = &self.tokens else {
            return Ok(response);
        };

        tracing::debug!("Received 401, attempting token refresh");

        let new_token = tokens
            .refresh_id_token()
            .await
            .map_err(|e| BackendError::Unauthorized(e.to_string()))?;

        let response = Self::with_token(build(&self.client), Some(&new_token))
            .send()
            .await?;

        Ok(response)
    }

    async fn error_from(response: Response) -> BackendError {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        BackendError::from_status(status, error_text)
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Document>, BackendError> {
        let url = self.url(path.as_str());
        tracing::debug!("Fetching document {}", path);

        let response = self.send(|client| client.get(&url)).await?;

        match response.status() {
            status if status.is_success() => {
                let raw: RawDocument = response.json().await?;
                Ok(Some(raw.into()))
            }
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(Self::error_from(response).await),
        }
    }

    async fn list_documents(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<Document>, BackendError> {
        let url = self.url(collection.as_str());
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            tracing::debug!("Listing {} (page token: {:?})", collection, page_token);

            let response = self
                .send(|client| {
                    let mut request = client.get(&url).query(&[("pageSize", PAGE_SIZE)]);
                    if let Some(token) = &page_token {
                        request = request.query(&[("pageToken", token.as_str())]);
                    }
                    request
                })
                .await?;

            if !response.status().is_success() {
                return Err(Self::error_from(response).await);
            }

            let page: ListResponse = response.json().await?;
            documents.extend(page.documents.into_iter().map(Document::from));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(documents)
    }

    async fn query_documents(
        &self,
        collection: &CollectionPath,
        filter: &FieldFilter,
    ) -> Result<Vec<Document>, BackendError> {
        let url = match collection.parent() {
            Some(parent) => format!("{}:runQuery", self.url(parent.as_str())),
            None => format!("{}:runQuery", self.documents_url),
        };
        let body = structured_query(collection, filter);

        tracing::debug!("Querying {} where {} {}", collection, filter.field, filter.op.as_wire());

        let response = self.send(|client| client.post(&url).json(&body)).await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let items: Vec<RunQueryItem> = response.json().await?;
        Ok(items
            .into_iter()
            .filter_map(|item| item.document)
            .map(Document::from)
            .collect())
    }

    async fn create_document(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<String, BackendError> {
        let url = self.url(collection.as_str());
        let body = WriteBody { fields: &fields };

        let response = self.send(|client| client.post(&url).json(&body)).await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let created: RawDocument = response.json().await?;
        let document = Document::from(created);
        tracing::info!("Created document {}/{}", collection, document.id);
        Ok(document.id)
    }

    async fn set_document(&self, path: &DocumentPath, fields: Fields) -> Result<(), BackendError> {
        let url = self.url(path.as_str());
        let body = WriteBody { fields: &fields };

        let response = self.send(|client| client.patch(&url).json(&body)).await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        tracing::info!("Wrote document {}", path);
        Ok(())
    }

    async fn update_fields(&self, path: &DocumentPath, fields: Fields) -> Result<(), BackendError> {
        let url = self.url(path.as_str());
        let mut params: Vec<(&str, &str)> = fields
            .keys()
            .map(|name| ("updateMask.fieldPaths", name.as_str()))
            .collect();
        params.push(("currentDocument.exists", "true"));
        let body = WriteBody { fields: &fields };

        let response = self
            .send(|client| client.patch(&url).query(&params).json(&body))
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        tracing::info!("Updated {} field(s) of {}", fields.len(), path);
        Ok(())
    }
}
