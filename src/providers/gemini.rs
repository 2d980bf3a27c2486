use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{FileReference, GenerationRequest, Provider};

/// Default public API base URL
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Gemini client for the generateContent and File APIs
#[derive(Debug)]
pub struct GeminiClient {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL (optional, defaults to the public API)
    endpoint: String,
    /// Model identifier, e.g. "gemini-2.0-flash"
    model: String,
}

/// generateContent request body
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    /// Conversation contents
    contents: Vec<Content>,

    /// Generation parameters
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

/// One content turn
#[derive(Debug, Serialize)]
struct Content {
    /// Content parts, file data first when present
    parts: Vec<Part>,
}

/// One content part: either text or a file reference
#[derive(Debug, Serialize)]
struct Part {
    /// Text part
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,

    /// Uploaded-file part
    #[serde(rename = "fileData", skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
}

/// Reference to an uploaded file inside a request part
#[derive(Debug, Serialize)]
struct FileData {
    /// MIME type of the file
    #[serde(rename = "mimeType")]
    mime_type: String,

    /// Provider-side file URI
    #[serde(rename = "fileUri")]
    file_uri: String,
}

/// Generation parameters
#[derive(Debug, Serialize)]
struct GenerationConfig {
    /// Sampling temperature
    temperature: f32,

    /// Response MIME type, "application/json" for JSON mode
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,

    /// Output token cap
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// generateContent response body
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    /// Candidate completions
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// One candidate completion
#[derive(Debug, Deserialize)]
struct Candidate {
    /// Candidate content
    content: CandidateContent,
}

/// Content of a candidate
#[derive(Debug, Deserialize)]
struct CandidateContent {
    /// Content parts
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

/// One part of a candidate's content
#[derive(Debug, Deserialize)]
struct CandidatePart {
    /// Text payload
    #[serde(default)]
    text: String,
}

/// File metadata returned by the File API
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    /// Resource name, e.g. "files/abc123"
    pub name: String,

    /// Full resource URI
    pub uri: String,

    /// MIME type recorded by the provider
    #[serde(rename = "mimeType")]
    pub mime_type: String,

    /// Processing state at upload time
    #[serde(default)]
    pub state: String,
}

/// Wrapper object around the uploaded file metadata
#[derive(Debug, Deserialize)]
struct UploadResponse {
    /// The uploaded file
    file: UploadedFile,
}

/// File processing state as reported by the File API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Still being processed
    Processing,
    /// Ready for use
    Active,
    /// Processing failed on the provider side
    Failed,
}

/// Bare state response used while polling
#[derive(Debug, Deserialize)]
struct FileStateResponse {
    /// State string: "PROCESSING", "ACTIVE" or "FAILED"
    #[serde(default)]
    state: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(300))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Resolve the API base URL
    fn base_url(&self) -> &str {
        if self.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.endpoint.trim_end_matches('/')
        }
    }

    /// Turn a non-success response into a ProviderError, reading the body
    async fn error_from_response(response: reqwest::Response) -> ProviderError {
        let status = response.status();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("Gemini API error ({}): {}", status, message);

        if status.as_u16() == 401 || status.as_u16() == 403 {
            ProviderError::AuthenticationError(message)
        } else {
            ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            }
        }
    }

    /// Upload a media file via the resumable File API.
    ///
    /// Two steps: an init request that yields the upload URL in the
    /// `X-Goog-Upload-URL` header, then a single upload-and-finalize POST of
    /// the file bytes.
    pub async fn upload_file(
        &self,
        path: &Path,
        mime_type: &str,
    ) -> Result<UploadedFile, ProviderError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read file: {}", e)))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());
        let file_size = bytes.len();

        let init_url = format!("{}/upload/v1beta/files?key={}", self.base_url(), self.api_key);
        let init_response = self
            .client
            .post(&init_url)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", file_size.to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&serde_json::json!({ "file": { "displayName": file_name } }))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Upload init failed: {}", e)))?;

        if !init_response.status().is_success() {
            return Err(Self::error_from_response(init_response).await);
        }

        let upload_url = init_response
            .headers()
            .get("X-Goog-Upload-URL")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
            .ok_or_else(|| {
                ProviderError::ParseError("Upload init response carried no upload URL".to_string())
            })?;

        let upload_response = self
            .client
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("Content-Length", file_size.to_string())
            .body(bytes)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Upload failed: {}", e)))?;

        if !upload_response.status().is_success() {
            return Err(Self::error_from_response(upload_response).await);
        }

        let uploaded = upload_response
            .json::<UploadResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Upload response: {}", e)))?;

        Ok(uploaded.file)
    }

    /// Query the processing state of an uploaded file.
    ///
    /// Accepts either the full resource URI or the bare `files/...` name.
    pub async fn file_state(&self, file_uri: &str) -> Result<FileState, ProviderError> {
        let resource = file_uri
            .split_once("/v1beta/")
            .map_or(file_uri, |(_, rest)| rest);
        let url = format!("{}/v1beta/{}?key={}", self.base_url(), resource, self.api_key);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("State check failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let state = response
            .json::<FileStateResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("State response: {}", e)))?;

        Ok(match state.state.as_str() {
            "ACTIVE" => FileState::Active,
            "FAILED" => FileState::Failed,
            _ => FileState::Processing,
        })
    }

    /// Build a file reference suitable for [`GenerationRequest::with_file`]
    pub fn file_reference(uploaded: &UploadedFile) -> FileReference {
        FileReference {
            uri: uploaded.uri.clone(),
            mime_type: uploaded.mime_type.clone(),
        }
    }
}

#[async_trait]
impl Provider for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
        let mut parts = Vec::new();
        if let Some(file) = &request.file {
            parts.push(Part {
                text: None,
                file_data: Some(FileData {
                    mime_type: file.mime_type.clone(),
                    file_uri: file.uri.clone(),
                }),
            });
        }
        parts.push(Part {
            text: Some(request.prompt),
            file_data: None,
        });

        let body = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                response_mime_type: request
                    .json_output
                    .then(|| "application/json".to_string()),
                max_output_tokens: request.max_output_tokens,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url(),
            self.model,
            self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("generateContent failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("generateContent response: {}", e)))?;

        let text: String = parsed
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(text)
    }
}
