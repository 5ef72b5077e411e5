//! Request and response bodies of the backend API.

use ecolens_domain::{DataSource, ProductRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-text analysis request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TextAnalysisRequest<'a> {
    pub text: &'a str,
    pub data_source: DataSource,
}

/// Structured-form analysis request: the record fields plus the data source
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StructuredAnalysisRequest<'a> {
    #[serde(flatten)]
    pub record: &'a ProductRecord,
    pub data_source: DataSource,
}

/// Gap-fill request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GapFillRequest<'a> {
    pub data: &'a ProductRecord,
    pub missing_fields: &'a [String],
    pub data_source: DataSource,
}

/// Confirmation request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SaveConfirmedRequest<'a> {
    pub product_data: &'a ProductRecord,
    pub data_source: DataSource,
}

/// Common `success`/`message` envelope every endpoint answers with
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Envelope {
    pub success: Option<bool>,
    pub message: Option<String>,
}

/// Analysis response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnalysisResponse {
    pub data: Option<ProductRecord>,
    #[serde(default)]
    pub missing_data: Option<Vec<String>>,
}

/// Gap-fill response
#[derive(Debug, Deserialize)]
pub(crate) struct GapFillResponse {
    pub data: Option<ProductRecord>,
}

/// OpenLCA availability probe
#[derive(Debug, Deserialize)]
pub(crate) struct OpenLcaStatus {
    #[serde(default)]
    pub available: bool,
}

/// Outcome of loading a dataset on the backend
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetLoad {
    /// Server message, if any
    #[serde(default)]
    pub message: Option<String>,

    /// Dataset metadata returned by the backend
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Outcome of uploading dataset files
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    /// Server message, if any
    #[serde(default)]
    pub message: Option<String>,

    /// Names of the files the backend stored
    #[serde(default)]
    pub files: Vec<String>,
}
