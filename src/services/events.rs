use crate::models::{EventRecord, Participant};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Registration document as stored by the registration collection
#[derive(Debug, Clone, Deserialize)]
struct RegistrationDoc {
    #[serde(rename = "userId")]
    user_id: String,
    status: String,
}

/// Collection IDs in the document store
#[derive(Debug, Clone)]
pub struct StoreCollections {
    pub events: String,
    pub registrations: String,
    pub users: String,
}

/// Read-only client for the hosted Event/Registration Store.
///
/// The engine only ever reads: event status to gate session start, and
/// the checked-in registrant list to build the participant pool. Event
/// and registration records are written elsewhere.
pub struct EventStoreClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: StoreCollections,
}

impl EventStoreClient {
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: StoreCollections,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        }
    }

    /// Fetch a single event document by ID
    pub async fn get_event(&self, event_id: &str) -> Result<EventRecord, StoreError> {
        let url = format!(
            "{}/databases/{}/collections/{}/documents/{}",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.collections.events,
            event_id
        );

        tracing::debug!("Fetching event from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Store-Key", &self.api_key)
            .header("X-Store-Project", &self.project_id)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("Event {} not found", event_id)));
        }
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(StoreError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "Failed to fetch event: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        let data = json.get("data").unwrap_or(&json);

        serde_json::from_value(data.clone())
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse event: {}", e)))
    }

    /// Load the checked-in participant pool for an event.
    ///
    /// Joins the event's registrations (status `checked-in`) against the
    /// user collection. User-collection return order is preserved so the
    /// pool order, and therefore the pairing, is reproducible.
    pub async fn list_checked_in(&self, event_id: &str) -> Result<Vec<Participant>, StoreError> {
        let registrations = self.fetch_registrations(event_id).await?;
        let checked_in: Vec<String> = registrations
            .into_iter()
            .filter(|r| r.status == "checked-in")
            .map(|r| r.user_id)
            .collect();

        if checked_in.is_empty() {
            return Ok(Vec::new());
        }

        let users = self.fetch_users().await?;
        let pool: Vec<Participant> = users
            .into_iter()
            .filter(|u| checked_in.contains(&u.id))
            .collect();

        tracing::debug!(
            "Loaded {} checked-in participants for event {}",
            pool.len(),
            event_id
        );

        Ok(pool)
    }

    /// Ping the store's health endpoint
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url.trim_end_matches('/'));
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn fetch_registrations(&self, event_id: &str) -> Result<Vec<RegistrationDoc>, StoreError> {
        let queries = vec![format!("equal(\"eventId\", \"{}\")", event_id)];
        let queries_json = serde_json::to_string(&queries)
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        let encoded = urlencoding::encode(&queries_json);

        let url = format!(
            "{}/databases/{}/collections/{}/documents?query={}",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.collections.registrations,
            encoded
        );

        let documents = self.fetch_documents(&url).await?;
        Ok(documents
            .iter()
            .filter_map(|doc| {
                let data = doc.get("data").unwrap_or(doc);
                serde_json::from_value(data.clone()).ok()
            })
            .collect())
    }

    async fn fetch_users(&self) -> Result<Vec<Participant>, StoreError> {
        let url = format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.collections.users
        );

        let documents = self.fetch_documents(&url).await?;
        Ok(documents
            .iter()
            .filter_map(|doc| {
                let data = doc.get("data").unwrap_or(doc);
                serde_json::from_value(data.clone()).ok()
            })
            .collect())
    }

    async fn fetch_documents(&self, url: &str) -> Result<Vec<Value>, StoreError> {
        let response = self
            .client
            .get(url)
            .header("X-Store-Key", &self.api_key)
            .header("X-Store-Project", &self.project_id)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(StoreError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "Document query failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| StoreError::InvalidResponse("Missing documents array".into()))?;

        Ok(documents.clone())
    }
}
