//! Processing client: the single point of entry for calls to the remote
//! tailoring service.
//!
//! The service is opaque. It receives one multipart form per submission and
//! answers with a JSON object carrying `tailored_resume`. No retries, no
//! streaming.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::submission::payload::{SubjectPayload, SubmissionPayload};

/// Field of the response body that carries the tailored text.
pub const RESULT_FIELD: &str = "tailored_resume";

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Processing service error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response body is JSON null")]
    NullBody,
}

/// Parsed response body. Only [`RESULT_FIELD`] is read; an empty or
/// non-string value counts as absent, and so does any body that is valid
/// JSON but not an object. A `null` body has no fields to read and is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResponse {
    pub tailored_resume: Option<String>,
}

impl ProcessResponse {
    pub fn from_body(body: &str) -> Result<Self, ProcessingError> {
        let value: Value = serde_json::from_str(body)?;
        if value.is_null() {
            return Err(ProcessingError::NullBody);
        }
        Ok(Self {
            tailored_resume: value
                .as_object()
                .and_then(|object| object.get(RESULT_FIELD))
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(String::from),
        })
    }
}

/// Anything that can turn a payload into a processing response.
/// Carried in `AppState` as `Arc<dyn ProcessingClient>`.
#[async_trait]
pub trait ProcessingClient: Send + Sync {
    async fn process(&self, payload: &SubmissionPayload)
        -> Result<ProcessResponse, ProcessingError>;
}

/// Talks to the processing endpoint over HTTP.
#[derive(Clone)]
pub struct HttpProcessingClient {
    client: Client,
    endpoint: String,
}

impl HttpProcessingClient {
    /// `timeout: None` keeps reqwest's default (no overall timeout).
    pub fn new(endpoint: String, timeout: Option<Duration>) -> Result<Self, ProcessingError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ProcessingClient for HttpProcessingClient {
    async fn process(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<ProcessResponse, ProcessingError> {
        let form = build_form(payload)?;

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProcessingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Processing service answered {} ({} bytes)", status, body.len());

        ProcessResponse::from_body(&body)
    }
}

/// One field per subject; the unused fields are left out of the form.
fn build_form(payload: &SubmissionPayload) -> Result<Form, ProcessingError> {
    let mut form = Form::new();
    for (subject, part) in payload.subjects() {
        let name = part.field_name(subject);
        form = match part {
            SubjectPayload::File(file) => form.part(
                name,
                Part::bytes(file.bytes.to_vec())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.content_type)?,
            ),
            SubjectPayload::Url(value) | SubjectPayload::Text(value) => {
                form.text(name, value.clone())
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::selection::{InputSelection, UploadedFile};
    use crate::submission::payload::build_payload;
    use axum::{extract::Multipart, http::StatusCode, routing::post, Json, Router};
    use bytes::Bytes;
    use serde_json::json;

    /// Serves `router` on an ephemeral port and returns the `/process` URL.
    pub(crate) async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, router).await.expect("serve stub") });
        format!("http://{addr}/process")
    }

    /// Replies with the field names it received and the tailored text `X`.
    pub(crate) fn echo_router() -> Router {
        Router::new().route(
            "/process",
            post(|mut multipart: Multipart| async move {
                let mut fields = Vec::new();
                while let Some(field) = multipart.next_field().await.expect("next field") {
                    let name = field.name().unwrap_or_default().to_string();
                    let file_name = field.file_name().map(String::from);
                    let content = field.bytes().await.expect("field bytes");
                    fields.push(json!({
                        "name": name,
                        "file_name": file_name,
                        "content": String::from_utf8_lossy(&content),
                    }));
                }
                Json(json!({ "tailored_resume": "X", "fields": fields }))
            }),
        )
    }

    /// An address nothing is listening on.
    pub(crate) async fn closed_endpoint() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        format!("http://{addr}/process")
    }

    #[test]
    fn test_response_reads_result_field() {
        let response = ProcessResponse::from_body(r#"{"tailored_resume":"X","extra":1}"#)
            .expect("valid body");
        assert_eq!(response.tailored_resume.as_deref(), Some("X"));
    }

    #[test]
    fn test_response_treats_empty_or_non_string_as_absent() {
        for body in [
            r#"{}"#,
            r#"{"tailored_resume":""}"#,
            r#"{"tailored_resume":null}"#,
            r#"{"tailored_resume":42}"#,
        ] {
            let response = ProcessResponse::from_body(body).expect("valid body");
            assert_eq!(response.tailored_resume, None, "body: {body}");
        }
    }

    #[test]
    fn test_response_rejects_unparsable_and_null_bodies() {
        assert!(matches!(
            ProcessResponse::from_body("<html>bad gateway</html>"),
            Err(ProcessingError::Parse(_))
        ));
        assert!(matches!(
            ProcessResponse::from_body("null"),
            Err(ProcessingError::NullBody)
        ));
    }

    #[test]
    fn test_response_non_object_json_has_no_result() {
        for body in ["[1, 2]", r#""text""#, "7", "true"] {
            let response = ProcessResponse::from_body(body).expect("valid json");
            assert_eq!(response.tailored_resume, None, "body: {body}");
        }
    }

    #[tokio::test]
    async fn test_sends_one_field_per_subject() {
        let url = spawn_stub(echo_router()).await;
        let client = HttpProcessingClient::new(url, None).expect("client");

        let resume = InputSelection::Paste("Rust engineer".to_string());
        let mut job = InputSelection::default();
        job.attach_file(
            UploadedFile::new(
                "posting.txt",
                Some("text/plain".to_string()),
                Bytes::from_static(b"We need Rust"),
            )
            .expect("txt is accepted"),
        );

        let response = client
            .process(&build_payload(&resume, &job))
            .await
            .expect("stub answers");
        assert_eq!(response.tailored_resume.as_deref(), Some("X"));
    }

    #[tokio::test]
    async fn test_stub_sees_expected_multipart_fields() {
        let url = spawn_stub(echo_router()).await;

        let resume = InputSelection::Url("https://cv.example.com".to_string());
        let mut job = InputSelection::default();
        job.attach_file(
            UploadedFile::new("posting.txt", None, Bytes::from_static(b"We need Rust"))
                .expect("txt is accepted"),
        );
        let form = build_form(&build_payload(&resume, &job)).expect("form");

        let body: Value = reqwest::Client::new()
            .post(&url)
            .multipart(form)
            .send()
            .await
            .expect("send")
            .json()
            .await
            .expect("json");

        let fields = body["fields"].as_array().expect("fields");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["name"], "resume_url");
        assert_eq!(fields[0]["content"], "https://cv.example.com");
        assert_eq!(fields[1]["name"], "job_file");
        assert_eq!(fields[1]["file_name"], "posting.txt");
        assert_eq!(fields[1]["content"], "We need Rust");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let url = spawn_stub(Router::new().route(
            "/process",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        ))
        .await;
        let client = HttpProcessingClient::new(url, None).expect("client");
        let payload = build_payload(&InputSelection::default(), &InputSelection::default());

        match client.process(&payload).await {
            Err(ProcessingError::Status { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_http_error() {
        let client = HttpProcessingClient::new(closed_endpoint().await, None).expect("client");
        let payload = build_payload(&InputSelection::default(), &InputSelection::default());

        assert!(matches!(
            client.process(&payload).await,
            Err(ProcessingError::Http(_))
        ));
    }
}
