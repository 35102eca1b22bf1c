//! Question answering over analyzed logs, and the request/response shapes a
//! serving layer exchanges with it.

use crate::blob::{self, BlobError, BlobStore};
use crate::completion::{CompletionError, CompletionService};
use crate::context;
use crate::corpus::CorpusStore;
use crate::pipeline::{self, AnalyzeError};
use crate::report::Report;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Answer given when the completion service returns no text.
pub const EMPTY_ANSWER: &str = "No response";
/// The only detail ever shown for a failed completion.
pub const COMPLETION_FAILED: &str = "AI error.";

const MISSING_QUESTION_INPUT: &str = "fileKey and question are required.";
const MISSING_FILE: &str = "file is required.";

#[derive(Debug, Error)]
pub enum QaError {
    /// Carries the client-facing message naming what was missing.
    #[error("{0}")]
    MissingInput(&'static str),
    #[error("malformed request: {0}")]
    MalformedRequest(#[from] serde_json::Error),
    #[error(transparent)]
    SourceRead(#[from] AnalyzeError),
    #[error("no analyzed log for source '{0}'")]
    CorpusNotFound(String),
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error(transparent)]
    Blob(#[from] BlobError),
}

impl QaError {
    /// HTTP status a serving layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            QaError::MissingInput(_) | QaError::MalformedRequest(_) => 400,
            QaError::CorpusNotFound(_) => 404,
            QaError::Blob(BlobError::NotFound(_)) => 404,
            QaError::Blob(BlobError::InvalidKey(_)) => 400,
            QaError::SourceRead(_) | QaError::Completion(_) | QaError::Blob(_) => 500,
        }
    }

    /// Message safe to show a client. Collaborator fault details stay in the
    /// logs.
    pub fn public_message(&self) -> String {
        match self {
            QaError::MissingInput(message) => message.to_string(),
            QaError::MalformedRequest(_) => "Malformed request.".to_string(),
            QaError::CorpusNotFound(_) => "Log not found.".to_string(),
            QaError::Blob(BlobError::NotFound(_)) => "File not found.".to_string(),
            QaError::Blob(BlobError::InvalidKey(key)) => format!("Invalid file key '{key}'."),
            QaError::SourceRead(_) | QaError::Blob(_) => "Failed to analyze file.".to_string(),
            QaError::Completion(_) => COMPLETION_FAILED.to_string(),
        }
    }
}

/// Accepts both request shapes: `{ logId, query }` from the chat form and
/// `{ fileKey, question }` from the standardized API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawQuestionRequest")]
pub struct QuestionRequest {
    pub source_id: Option<String>,
    pub question: Option<String>,
}

/// Every accepted spelling in its own slot, so a body mixing shapes is not a
/// duplicate-field error.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestionRequest {
    #[serde(default)]
    source_id: Option<String>,
    #[serde(default)]
    file_key: Option<String>,
    #[serde(default)]
    log_id: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    query: Option<String>,
}

impl From<RawQuestionRequest> for QuestionRequest {
    fn from(raw: RawQuestionRequest) -> Self {
        Self {
            source_id: first_filled([raw.source_id, raw.file_key, raw.log_id]),
            question: first_filled([raw.question, raw.query]),
        }
    }
}

fn first_filled<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionResponse {
    Answer(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: QuestionResponse,
}

impl From<Result<String, QaError>> for Reply {
    fn from(res: Result<String, QaError>) -> Self {
        match res {
            Ok(answer) => Reply { status: 200, body: QuestionResponse::Answer(answer) },
            Err(e) => Reply { status: e.status_code(), body: QuestionResponse::Error(e.public_message()) },
        }
    }
}

/// Ties the collaborators together: blobs in, reports and corpora out,
/// questions answered against published corpora.
pub struct Assistant {
    blobs: Box<dyn BlobStore>,
    completer: Box<dyn CompletionService>,
    corpora: CorpusStore,
}

impl Assistant {
    pub fn new<B, C>(blobs: B, completer: C, corpora: CorpusStore) -> Self
    where
        B: BlobStore + 'static,
        C: CompletionService + 'static,
    {
        Self { blobs: Box::new(blobs), completer: Box::new(completer), corpora }
    }

    pub fn corpora(&self) -> &CorpusStore {
        &self.corpora
    }

    /// Stores an uploaded log under a fresh key and returns the key.
    pub fn upload(&self, original_name: &str, bytes: &[u8], content_type: &str) -> Result<String, QaError> {
        if original_name.is_empty() {
            return Err(QaError::MissingInput(MISSING_FILE));
        }
        let key = blob::object_key(original_name);
        self.blobs.put(&key, bytes, content_type)?;
        info!(key = %key, bytes = bytes.len(), "log uploaded");
        Ok(key)
    }

    pub fn list_sources(&self) -> Result<Vec<String>, QaError> {
        Ok(self.blobs.list()?)
    }

    /// Streams the stored log through the pipeline and publishes its corpus
    /// once the pass has completed.
    pub fn analyze_source(&self, key: &str) -> Result<Report, QaError> {
        if key.is_empty() {
            return Err(QaError::MissingInput(MISSING_FILE));
        }
        let body = self.blobs.get(key)?;
        let analysis = pipeline::analyze_reader(body)?;
        self.corpora.publish(key, analysis.corpus);
        Ok(analysis.report)
    }

    pub fn ask(&self, source_id: &str, question: &str) -> Result<String, QaError> {
        if source_id.is_empty() || question.is_empty() {
            return Err(QaError::MissingInput(MISSING_QUESTION_INPUT));
        }
        let corpus = self
            .corpora
            .get(source_id)
            .ok_or_else(|| QaError::CorpusNotFound(source_id.to_string()))?;
        let prompt = context::build_prompt(&corpus, question);
        let answer = self.completer.complete(&prompt).map_err(|e| {
            warn!(source_id, error = %e, "completion failed");
            QaError::Completion(e)
        })?;
        if answer.is_empty() {
            return Ok(EMPTY_ANSWER.to_string());
        }
        Ok(answer)
    }

    pub fn handle(&self, request: &QuestionRequest) -> Reply {
        let source_id = request.source_id.as_deref().unwrap_or_default();
        let question = request.question.as_deref().unwrap_or_default();
        self.ask(source_id, question).into()
    }

    /// Parses a raw request body, then answers it. A body that is not a JSON
    /// object of the request shape is a client error.
    pub fn handle_json(&self, body: &str) -> Reply {
        match serde_json::from_str::<QuestionRequest>(body) {
            Ok(request) => self.handle(&request),
            Err(e) => Err::<String, _>(QaError::from(e)).into(),
        }
    }
}
