//! HTTP client for the compliance pipeline backend.

use std::path::Path;
use std::time::Duration;

use reglens_core::{GapAnalysis, OrganizedGroup, ProcessResponse, RequirementCluster};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1/parser";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ORGANIZED_PATH: &str = "/final-organized-requirements";
const CLUSTERS_PATH: &str = "/requirement-clusters/all";
const ANALYSES_PATH: &str = "/gap-analyses/get-all";
const PROCESS_PATH: &str = "/process-document-complete";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL including any API prefix, e.g. `http://localhost:8000/api/v1/parser`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Thin client over the backend's stored-results and processing endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct OrganizedEnvelope {
    #[serde(default)]
    organized_requirements: Option<Vec<OrganizedGroup>>,
}

#[derive(Deserialize)]
struct ClustersEnvelope {
    #[serde(default)]
    clusters: Option<Vec<RequirementCluster>>,
}

#[derive(Deserialize)]
struct AnalysesEnvelope {
    #[serde(default)]
    analyses: Option<Vec<GapAnalysis>>,
}

impl ApiClient {
    /// Create a client with the default timeout.
    ///
    /// `base_url` should not end in a slash; a trailing one is trimmed.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the stored LLM-organized requirement groups.
    pub async fn organized_requirements(&self) -> Result<Vec<OrganizedGroup>, ApiError> {
        let env: OrganizedEnvelope = self.get_json(ORGANIZED_PATH).await?;
        let groups = env.organized_requirements.unwrap_or_default();
        info!(count = groups.len(), "fetched organized requirement groups");
        Ok(groups)
    }

    /// Fetch the stored requirement clusters.
    pub async fn requirement_clusters(&self) -> Result<Vec<RequirementCluster>, ApiError> {
        let env: ClustersEnvelope = self.get_json(CLUSTERS_PATH).await?;
        let clusters = env.clusters.unwrap_or_default();
        info!(count = clusters.len(), "fetched requirement clusters");
        Ok(clusters)
    }

    /// Fetch all stored gap analyses.
    pub async fn gap_analyses(&self) -> Result<Vec<GapAnalysis>, ApiError> {
        let env: AnalysesEnvelope = self.get_json(ANALYSES_PATH).await?;
        let analyses = env.analyses.unwrap_or_default();
        info!(count = analyses.len(), "fetched gap analyses");
        Ok(analyses)
    }

    /// Upload a document and run the full pipeline on it.
    pub async fn process_document(
        &self,
        filename: String,
        bytes: Vec<u8>,
    ) -> Result<ProcessResponse, ApiError> {
        let url = self.url(PROCESS_PATH);
        info!(url = %url, filename = %filename, size = bytes.len(), "uploading document");

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename);
        let form = reqwest::multipart::Form::new().part("file", part);
        let resp = self.client.post(&url).multipart(form).send().await?;
        let result: ProcessResponse = decode(resp).await?;

        info!(
            document_id = %result.document_id,
            requirements = result.pipeline_results.requirements_extracted,
            groups = result.organized_requirements.len(),
            "document processed"
        );
        Ok(result)
    }

    /// Read a file from disk and hand it to [`Self::process_document`].
    pub async fn process_file(&self, path: &Path) -> Result<ProcessResponse, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        self.process_document(filename, bytes).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        info!(url = %url, "fetching");
        let resp = self.client.get(&url).send().await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Server {
            status: status.as_u16(),
            body,
        });
    }
    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}
