//! Ecolens client implementation.

use crate::error::SdkError;
use crate::wire::{
    AnalysisResponse, DatasetLoad, Envelope, GapFillRequest, GapFillResponse, OpenLcaStatus,
    SaveConfirmedRequest, StructuredAnalysisRequest, TextAnalysisRequest, UploadReceipt,
};
use ecolens_domain::{Analysis, DataSource, IntakeService, ProductRecord};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// File extensions the dataset upload endpoint accepts
pub const DATASET_EXTENSIONS: [&str; 5] = ["csv", "xlsx", "xls", "json", "xml"];

const ANALYZE_NLP: &str = "/api/analyze-nlp";
const ANALYZE_STRUCTURED: &str = "/api/analyze-structured";
const GAP_FILL: &str = "/api/gap-fill";
const SAVE_CONFIRMED: &str = "/api/save-confirmed-data";
const CHECK_OPENLCA: &str = "/api/check-openlca";
const DATASETS: &str = "/api/datasets";
const UPLOAD_DATASET: &str = "/api/upload-dataset";

/// Client for the analysis backend
///
/// No request timeout is configured: a call is awaited until the server
/// answers or the connection fails.
#[derive(Debug, Clone)]
pub struct IntakeClient {
    base_url: String,
    http: reqwest::Client,
}

impl IntakeClient {
    /// Create a new client for the backend at `base_url`
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Create a client that reuses an existing `reqwest::Client`
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Backend base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Probe whether the OpenLCA service behind the backend is reachable
    pub async fn check_openlca(&self) -> Result<bool, SdkError> {
        let url = self.url(CHECK_OPENLCA);
        debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        let status: OpenLcaStatus = read_response(response, "OpenLCA status check failed").await?;
        Ok(status.available)
    }

    /// Load a dataset on the backend
    pub async fn load_dataset(&self, data_source: DataSource) -> Result<DatasetLoad, SdkError> {
        let url = self.url(DATASETS);
        debug!("GET {} (source={})", url, data_source);
        let response = self
            .http
            .get(&url)
            .query(&[("source", data_source.as_str())])
            .send()
            .await?;
        let load = read_response(response, "Failed to load dataset. Please try again.").await?;
        info!("Loaded {} dataset", data_source.display_name());
        Ok(load)
    }

    /// Upload dataset files as one multipart request
    ///
    /// Every file must have one of [`DATASET_EXTENSIONS`]; nothing is sent
    /// if any file is rejected.
    pub async fn upload_dataset<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<UploadReceipt, SdkError> {
        if paths.is_empty() {
            return Err(SdkError::UnsupportedFile("no files given".to_string()));
        }

        let mut form = Form::new();
        for path in paths {
            let path = path.as_ref();
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
                .unwrap_or_default();
            if !DATASET_EXTENSIONS.contains(&extension.as_str()) {
                return Err(SdkError::UnsupportedFile(path.display().to_string()));
            }

            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "dataset".to_string());
            form = form.part("files", Part::bytes(bytes).file_name(file_name));
        }

        let url = self.url(UPLOAD_DATASET);
        debug!("POST {} ({} files)", url, paths.len());
        let response = self.http.post(&url).multipart(form).send().await?;
        read_response(response, "Upload failed. Please try again.").await
    }

    async fn post_json<B, R>(&self, path: &str, body: &B, default_message: &str) -> Result<R, SdkError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self.http.post(&url).json(body).send().await?;
        read_response(response, default_message).await
    }
}

/// Decode a backend response
///
/// A JSON body with `success: false` is a rejection whatever the status;
/// otherwise a non-success status is an HTTP error.
async fn read_response<R: DeserializeOwned>(
    response: reqwest::Response,
    default_message: &str,
) -> Result<R, SdkError> {
    let status = response.status();
    let text = response.text().await?;

    let body: Option<Value> = serde_json::from_str(&text).ok();

    if let Some(body) = &body {
        let envelope: Envelope = serde_json::from_value(body.clone()).unwrap_or_default();
        if envelope.success == Some(false) {
            let message = envelope
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| default_message.to_string());
            warn!("Request rejected (HTTP {}): {}", status, message);
            return Err(SdkError::Rejected(message));
        }
    }

    if !status.is_success() {
        return Err(SdkError::HttpError {
            status: status.as_u16(),
            body: text.chars().take(512).collect(),
        });
    }

    match body {
        Some(body) => Ok(serde_json::from_value(body)?),
        None => Err(SdkError::InvalidResponse(format!(
            "expected a JSON body, got {} bytes",
            text.len()
        ))),
    }
}

fn into_analysis(response: AnalysisResponse) -> Result<Analysis, SdkError> {
    let record = response
        .data
        .ok_or_else(|| SdkError::InvalidResponse("analysis response has no data".to_string()))?;
    Ok(Analysis {
        record,
        missing: response.missing_data.unwrap_or_default(),
    })
}

impl IntakeService for IntakeClient {
    type Error = SdkError;

    async fn analyze_text(&self, text: &str, data_source: DataSource) -> Result<Analysis, SdkError> {
        let request = TextAnalysisRequest { text, data_source };
        let response: AnalysisResponse = self
            .post_json(ANALYZE_NLP, &request, "Analysis failed. Please try again.")
            .await?;
        let analysis = into_analysis(response)?;
        info!("Text analysis returned {} missing fields", analysis.missing.len());
        Ok(analysis)
    }

    async fn analyze_structured(
        &self,
        record: &ProductRecord,
        data_source: DataSource,
    ) -> Result<Analysis, SdkError> {
        let request = StructuredAnalysisRequest { record, data_source };
        let response: AnalysisResponse = self
            .post_json(ANALYZE_STRUCTURED, &request, "Calculation failed. Please try again.")
            .await?;
        let analysis = into_analysis(response)?;
        info!("Structured analysis returned {} missing fields", analysis.missing.len());
        Ok(analysis)
    }

    async fn gap_fill(
        &self,
        record: &ProductRecord,
        missing: &[String],
        data_source: DataSource,
    ) -> Result<ProductRecord, SdkError> {
        let request = GapFillRequest {
            data: record,
            missing_fields: missing,
            data_source,
        };
        let response: GapFillResponse = self
            .post_json(GAP_FILL, &request, "Gap filling failed. Please review your data.")
            .await?;
        response
            .data
            .ok_or_else(|| SdkError::InvalidResponse("gap-fill response has no data".to_string()))
    }

    async fn save_confirmed(
        &self,
        record: &ProductRecord,
        data_source: DataSource,
    ) -> Result<(), SdkError> {
        let request = SaveConfirmedRequest {
            product_data: record,
            data_source,
        };
        let _: Envelope = self
            .post_json(SAVE_CONFIRMED, &request, "Error saving data")
            .await?;
        Ok(())
    }
}
