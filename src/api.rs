use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Mutex;
use url::Url;

// ── Save collaborator ──────────────────────────────────────────────────────

/// Persistence boundary the editor session saves through.
///
/// Errors are opaque: the session only logs them and shows them in the status
/// line.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn save(&self, title: &str, content: &str) -> Result<()>;
}

// ── Wire types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDraft {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    /// Ids of resources attached to this draft
    #[serde(default, deserialize_with = "null_as_empty")]
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDraftRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

// The backend replaces every field on update, so this carries the full draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDraftRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

#[derive(Deserialize)]
struct DraftEnvelope {
    draft: BlogDraft,
}

#[derive(Deserialize)]
struct DraftListEnvelope {
    #[serde(default, deserialize_with = "null_as_empty")]
    drafts: Vec<BlogDraft>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// The backend encodes empty lists as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ── HTTP client ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DraftClient {
    http: Client,
    base_url: Url,
}

impl DraftClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API base URL '{}'", base_url))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Invalid API path '{}'", path))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.context("API request failed")?;
        let status = response.status();
        tracing::debug!(url = %response.url(), status = status.as_u16(), "api response");

        if status.is_success() {
            return Ok(response);
        }

        let reason = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("").to_string());
        bail!("API Error: {} {}", status.as_u16(), reason)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.execute(request)
            .await?
            .json::<T>()
            .await
            .context("Invalid API response body")
    }

    pub async fn health_check(&self) -> Result<HealthStatus> {
        self.fetch(self.http.get(self.endpoint("health")?)).await
    }

    pub async fn list_drafts(&self) -> Result<Vec<BlogDraft>> {
        let envelope: DraftListEnvelope = self
            .fetch(self.http.get(self.endpoint("api/drafts")?))
            .await?;
        Ok(envelope.drafts)
    }

    pub async fn get_draft(&self, id: &str) -> Result<BlogDraft> {
        let url = self.endpoint(&format!("api/drafts/{}", id))?;
        let envelope: DraftEnvelope = self.fetch(self.http.get(url)).await?;
        Ok(envelope.draft)
    }

    pub async fn create_draft(&self, request: &CreateDraftRequest) -> Result<BlogDraft> {
        let url = self.endpoint("api/drafts")?;
        let envelope: DraftEnvelope = self.fetch(self.http.post(url).json(request)).await?;
        Ok(envelope.draft)
    }

    pub async fn update_draft(&self, id: &str, request: &UpdateDraftRequest) -> Result<BlogDraft> {
        let url = self.endpoint(&format!("api/drafts/{}", id))?;
        let envelope: DraftEnvelope = self.fetch(self.http.put(url).json(request)).await?;
        Ok(envelope.draft)
    }

    pub async fn delete_draft(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&format!("api/drafts/{}", id))?;
        self.execute(self.http.delete(url)).await?;
        Ok(())
    }
}

// ── Remote store ───────────────────────────────────────────────────────────

/// Saves one draft through the REST backend: created on the first save,
/// updated in place afterwards.
pub struct RemoteDraftStore {
    client: DraftClient,
    draft_id: Mutex<Option<String>>,
}

impl RemoteDraftStore {
    pub fn new(client: DraftClient) -> Self {
        Self {
            client,
            draft_id: Mutex::new(None),
        }
    }

    pub fn for_draft(client: DraftClient, id: impl Into<String>) -> Self {
        Self {
            client,
            draft_id: Mutex::new(Some(id.into())),
        }
    }

    pub fn draft_id(&self) -> Option<String> {
        self.draft_id.lock().expect("draft id mutex").clone()
    }
}

#[async_trait]
impl DraftStore for RemoteDraftStore {
    async fn save(&self, title: &str, content: &str) -> Result<()> {
        // The backend rejects drafts without a title.
        let title = if title.trim().is_empty() {
            "Untitled"
        } else {
            title
        };

        let draft = match self.draft_id() {
            Some(id) => {
                let request = UpdateDraftRequest {
                    title: title.to_string(),
                    content: content.to_string(),
                    tags: Vec::new(),
                };
                self.client.update_draft(&id, &request).await?
            }
            None => {
                let request = CreateDraftRequest {
                    title: title.to_string(),
                    content: content.to_string(),
                    tags: Vec::new(),
                };
                let draft = self.client.create_draft(&request).await?;
                tracing::info!(id = %draft.id, "created remote draft");
                draft
            }
        };

        *self.draft_id.lock().expect("draft id mutex") = Some(draft.id);
        Ok(())
    }
}
