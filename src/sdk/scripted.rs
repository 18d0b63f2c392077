use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::sdk::api::path_matches;
use crate::sdk::{RawResponse, SdkBody, SdkError, SdkRequest, SdkTransport, ShimoSdkApi};

/// Canned reply for a scripted route
#[derive(Debug, Clone)]
pub enum Reply {
    Response(RawResponse),
    Fail(String),
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self::Response(RawResponse {
            status,
            body: body.to_string(),
        })
    }

    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self::Response(RawResponse {
            status,
            body: body.to_string(),
        })
    }

    pub fn fail(message: &str) -> Self {
        Self::Fail(message.to_string())
    }
}

/// Request as seen by the scripted transport
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub api: ShimoSdkApi,
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: SdkBody,
}

struct Route {
    method: Method,
    template: String,
    replies: VecDeque<Reply>,
}

/// In-memory transport for tests. Replies are consumed in order and the
/// last one repeats. Unrouted requests answer 404.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<ScriptedTransportInner>>,
}

#[derive(Default)]
struct ScriptedTransportInner {
    routes: Vec<Route>,
    requests: Vec<RecordedRequest>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script replies for a vendor operation
    pub async fn on(&self, api: ShimoSdkApi, replies: Vec<Reply>) {
        self.on_path(api.method(), api.path_template(), replies).await;
    }

    /// Script replies for an explicit method and path template
    pub async fn on_path(&self, method: Method, template: &str, replies: Vec<Reply>) {
        let mut inner = self.inner.lock().await;
        inner.routes.push(Route {
            method,
            template: template.to_string(),
            replies: replies.into(),
        });
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().await.requests.clone()
    }

    /// Number of recorded calls to a vendor operation
    pub async fn calls(&self, api: ShimoSdkApi) -> usize {
        let inner = self.inner.lock().await;
        inner.requests.iter().filter(|r| r.api == api).count()
    }
}

#[async_trait]
impl SdkTransport for ScriptedTransport {
    async fn send(&self, request: &SdkRequest) -> Result<RawResponse, SdkError> {
        let mut inner = self.inner.lock().await;
        inner.requests.push(RecordedRequest {
            api: request.api,
            method: request.method.clone(),
            path: request.path.clone(),
            query: request.query.clone(),
            body: request.body.clone(),
        });

        let route = inner
            .routes
            .iter_mut()
            .find(|r| r.method == request.method && path_matches(&r.template, &request.path));

        let reply = match route {
            Some(route) if route.replies.len() > 1 => route.replies.pop_front(),
            Some(route) => route.replies.front().cloned(),
            None => None,
        };

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Fail(message)) => Err(SdkError::Transport(message)),
            None => Ok(RawResponse {
                status: 404,
                body: format!(
                    "{{\"error\":\"no scripted route for {} {}\"}}",
                    request.method, request.path
                ),
            }),
        }
    }
}
