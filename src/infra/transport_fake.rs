use crate::domain_port::*;
use bytes::Bytes;
use futures_util::future::BoxFuture;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::{Arc, Mutex, PoisonError};

type Reply = BoxFuture<'static, Result<TransportResponse, TransportError>>;
type Responder = dyn Fn(OutgoingRequest) -> Reply + Send + Sync;

/// Scripted transport: every request is recorded, then answered by the responder.
#[derive(Clone)]
pub struct FakeTransport {
    responder: Arc<Responder>,
    sent: Arc<Mutex<Vec<OutgoingRequest>>>,
}

impl FakeTransport {
    pub fn new<F, Fut>(responder: F) -> Self
    where
        F: Fn(OutgoingRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<TransportResponse, TransportError>> + Send + 'static,
    {
        let responder: Arc<Responder> =
            Arc::new(move |request: OutgoingRequest| -> Reply { Box::pin(responder(request)) });
        Self {
            responder,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers every request with the same status and JSON body.
    pub fn always(status: u16, body: serde_json::Value) -> Self {
        Self::new(move |_| {
            let response = FakeResponse::json(status, &body);
            async move { Ok(response) }
        })
    }

    pub fn sent(&self) -> Vec<OutgoingRequest> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sent_to(&self, path: &str) -> Vec<OutgoingRequest> {
        self.sent()
            .into_iter()
            .filter(|r| r.path() == path)
            .collect()
    }
}

#[async_trait::async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<TransportResponse, TransportError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        (self.responder)(request).await
    }
}

/// Response builders for fake transports.
pub struct FakeResponse;

impl FakeResponse {
    pub fn json(status: u16, body: &serde_json::Value) -> TransportResponse {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("content-type"),
            HeaderValue::from_static("application/json"),
        );
        TransportResponse {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            headers,
            body: Bytes::from(body.to_string()),
        }
    }

    pub fn status(status: u16) -> TransportResponse {
        Self::json(status, &serde_json::Value::Null)
    }

    /// No body and no content type, as for a 204.
    pub fn empty(status: u16) -> TransportResponse {
        TransportResponse {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_cookie(mut response: TransportResponse, cookie: &'static str) -> TransportResponse {
        response.headers.insert(
            HeaderName::from_static("set-cookie"),
            HeaderValue::from_static(cookie),
        );
        response
    }
}
