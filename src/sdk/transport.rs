use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Url};
use serde_json::Value;

use crate::sdk::{Auth, SdkError, ShimoSdkApi};

pub const TOKEN_HEADER: &str = "X-Shimo-Token";
pub const SIGNATURE_HEADER: &str = "X-Shimo-Signature";
pub const USER_UUID_HEADER: &str = "X-Shimo-User-Uuid";

#[derive(Debug, Clone, PartialEq)]
pub enum SdkBody {
    Empty,
    Json(Value),
    Multipart(Vec<FormField>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Text { name: String, value: String },
    File { name: String, path: PathBuf, file_name: String },
}

/// Fully built vendor request
#[derive(Debug, Clone)]
pub struct SdkRequest {
    pub api: ShimoSdkApi,
    pub method: Method,
    /// Host plus path
    pub url: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: SdkBody,
    pub auth: Auth,
}

/// Status and body as received, before any decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Sends vendor requests; non-2xx statuses are returned, not raised
#[async_trait]
pub trait SdkTransport: Send + Sync {
    async fn send(&self, request: &SdkRequest) -> Result<RawResponse, SdkError>;
}

/// reqwest backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, SdkError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn build_form(fields: &[FormField]) -> Result<Form, SdkError> {
        let mut form = Form::new();
        for field in fields {
            form = match field {
                FormField::Text { name, value } => form.text(name.clone(), value.clone()),
                FormField::File {
                    name,
                    path,
                    file_name,
                } => {
                    let bytes = tokio::fs::read(path)
                        .await
                        .map_err(|e| SdkError::Io(format!("{}: {}", path.display(), e)))?;
                    form.part(name.clone(), Part::bytes(bytes).file_name(file_name.clone()))
                }
            };
        }
        Ok(form)
    }
}

#[async_trait]
impl SdkTransport for HttpTransport {
    async fn send(&self, request: &SdkRequest) -> Result<RawResponse, SdkError> {
        let url = if request.query.is_empty() {
            Url::parse(&request.url)
        } else {
            Url::parse_with_params(&request.url, &request.query)
        }
        .map_err(|e| SdkError::Transport(format!("Invalid URL {}: {}", request.url, e)))?;

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(TOKEN_HEADER, &request.auth.token)
            .header(SIGNATURE_HEADER, &request.auth.signature);

        if let Some(user_uuid) = &request.auth.user_uuid {
            builder = builder.header(USER_UUID_HEADER, user_uuid);
        }

        builder = match &request.body {
            SdkBody::Empty => builder,
            SdkBody::Json(body) => builder.json(body),
            SdkBody::Multipart(fields) => builder.multipart(Self::build_form(fields).await?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| SdkError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SdkError::Transport(format!("Failed to read response body: {}", e)))?;

        Ok(RawResponse { status, body })
    }
}
