//! One-shot backend endpoints.
//!
//! Every call follows the same pattern: build the request, send, map any
//! non-success status to [`ApiError::Server`] (with the backend's `detail`
//! message when it sent one), then deserialize the body.

use std::path::Path;

use reqwest::multipart;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::types::{
    AnswerEvaluation, ChatHistory, FlashcardSet, ProcessResult, Quiz, SessionInfo,
};

/// Client for the AI Learning Assistant backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) http: Client,
    base_url: String,
}

#[derive(Serialize)]
struct VideoRequest<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    session_id: &'a str,
    count: u32,
}

#[derive(Serialize)]
struct AnswerSubmission<'a> {
    session_id: &'a str,
    question_id: &'a str,
    selected_answer: usize,
}

#[derive(Deserialize)]
struct SessionList {
    sessions: Vec<SessionInfo>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Backend liveness probe.
    pub async fn health(&self) -> Result<(), ApiError> {
        let response = self.http.get(self.url("/health")).send().await?;
        check(response).await?;
        Ok(())
    }

    /// List all processed study sessions, newest first.
    pub async fn sessions(&self) -> Result<Vec<SessionInfo>, ApiError> {
        let response = self.http.get(self.url("/api/sessions")).send().await?;
        let list: SessionList = check(response).await?.json().await?;
        Ok(list.sessions)
    }

    /// Ingest a video URL into a new session.
    pub async fn process_video(&self, url: &str) -> Result<ProcessResult, ApiError> {
        let response = self
            .http
            .post(self.url("/api/process-video"))
            .json(&VideoRequest { url })
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Upload a PDF into a new session.
    pub async fn process_pdf(&self, path: &Path) -> Result<ProcessResult, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.pdf")
            .to_string();
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.url("/api/process-pdf"))
            .multipart(form)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Prior chat messages for a session.
    pub async fn chat_history(&self, session_id: &str, limit: u32) -> Result<ChatHistory, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/chat/history/{session_id}")))
            .query(&[("limit", limit)])
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Generate a fresh flashcard set for a session.
    ///
    /// The backend clamps `count` to its supported range.
    pub async fn generate_flashcards(
        &self,
        session_id: &str,
        count: u32,
    ) -> Result<FlashcardSet, ApiError> {
        let response = self
            .http
            .post(self.url("/api/generate-flashcards"))
            .json(&GenerateRequest { session_id, count })
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Retrieve previously generated flashcards.
    pub async fn flashcards(&self, session_id: &str) -> Result<FlashcardSet, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/flashcards/{session_id}")))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Generate a fresh quiz for a session.
    pub async fn generate_quiz(&self, session_id: &str, count: u32) -> Result<Quiz, ApiError> {
        let response = self
            .http
            .post(self.url("/api/generate-quiz"))
            .json(&GenerateRequest { session_id, count })
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Retrieve the stored quiz for a session (questions carry ids here).
    pub async fn quiz(&self, session_id: &str) -> Result<Quiz, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/quiz/{session_id}")))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Submit one quiz answer for evaluation.
    pub async fn evaluate_answer(
        &self,
        session_id: &str,
        question_id: &str,
        selected_answer: usize,
    ) -> Result<AnswerEvaluation, ApiError> {
        let response = self
            .http
            .post(self.url("/api/quiz/evaluate"))
            .json(&AnswerSubmission {
                session_id,
                question_id,
                selected_answer,
            })
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}

/// Map a non-success response to [`ApiError::Server`].
pub(crate) async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = match response.text().await {
        Ok(body) => extract_detail(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        }),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    Err(ApiError::Server { status, detail })
}

/// Pull the `detail` message out of a FastAPI-style error body.
fn extract_detail(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: String,
    }
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_path() {
        let client = ApiClient::new("http://localhost:8000");
        assert_eq!(client.url("/api/sessions"), "http://localhost:8000/api/sessions");
    }

    #[test]
    fn trailing_slash_in_base_url_is_dropped() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.url("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn extracts_detail_from_error_body() {
        assert_eq!(
            extract_detail(r#"{"detail": "Session not found."}"#),
            Some("Session not found.".to_string())
        );
    }

    #[test]
    fn non_json_error_body_has_no_detail() {
        assert_eq!(extract_detail("<html>502 Bad Gateway</html>"), None);
        assert_eq!(extract_detail(""), None);
    }

    #[test]
    fn submission_serializes_backend_field_names() {
        let body = serde_json::to_value(AnswerSubmission {
            session_id: "s1",
            question_id: "q1",
            selected_answer: 2,
        })
        .unwrap();
        assert_eq!(body["session_id"], "s1");
        assert_eq!(body["question_id"], "q1");
        assert_eq!(body["selected_answer"], 2);
    }
}
