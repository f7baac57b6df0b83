#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use company_research::errors::ResearchError;
use company_research::llm::{LLMProvider, LLMResponse};
use company_research::models::{CloudLocation, ProviderKind, ProviderResult, SearchResult};
use company_research::pipeline::{RenderedArtifact, ReportRenderer};
use company_research::providers::{CompanyDataProvider, ProviderSet, SearchProvider};
use company_research::sinks::{CloudStore, DriveFile, Mailer, ReportEmail};

/// Company provider returning a fixed payload or error.
pub struct StubCompanyProvider {
    pub kind: ProviderKind,
    pub reply: Result<Value, String>,
    pub calls: AtomicUsize,
}

impl StubCompanyProvider {
    pub fn ok(kind: ProviderKind, payload: Value) -> Arc<Self> {
        Arc::new(Self { kind, reply: Ok(payload), calls: AtomicUsize::new(0) })
    }

    pub fn failing(kind: ProviderKind, message: &str) -> Arc<Self> {
        Arc::new(Self { kind, reply: Err(message.to_string()), calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompanyDataProvider for StubCompanyProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn fetch(&self, _identifier: &str) -> Result<ProviderResult, ResearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(payload) => Ok(ProviderResult::from_raw(payload.clone())),
            Err(msg) => Err(ResearchError::Upstream(msg.clone())),
        }
    }
}

pub struct StubSearchProvider {
    pub hits: Vec<SearchResult>,
    pub queried: Mutex<Vec<String>>,
}

impl StubSearchProvider {
    pub fn new(hits: Vec<SearchResult>) -> Arc<Self> {
        Arc::new(Self { hits, queried: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl SearchProvider for StubSearchProvider {
    async fn fetch(&self, identifier: &str) -> Result<Vec<SearchResult>, ResearchError> {
        self.queried.lock().unwrap().push(identifier.to_string());
        Ok(self.hits.clone())
    }
}

pub fn provider_set(
    enrichment: Arc<StubCompanyProvider>,
    firmographic: Arc<StubCompanyProvider>,
    search: Arc<StubSearchProvider>,
) -> ProviderSet {
    ProviderSet {
        enrichment: Some(enrichment),
        firmographic: Some(firmographic),
        search: Some(search),
    }
}

/// LLM that records every prompt and echoes a canned report.
pub struct RecordingLLM {
    pub reply: String,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingLLM {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self { reply: reply.to_string(), prompts: Mutex::new(Vec::new()) })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for RecordingLLM {
    async fn complete(&self, prompt: &str, _system: Option<&str>) -> Result<LLMResponse, ResearchError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(LLMResponse {
            content: self.reply.clone(),
            input_tokens: None,
            output_tokens: None,
            model: "recording".into(),
        })
    }

    fn provider_name(&self) -> &str {
        "recording"
    }

    fn model_name(&self) -> &str {
        "recording"
    }
}

/// Writes a file of `size` bytes instead of invoking pandoc.
pub struct FileRenderer {
    pub dir: PathBuf,
    pub size: usize,
}

impl FileRenderer {
    pub fn new(dir: &Path, size: usize) -> Arc<Self> {
        Arc::new(Self { dir: dir.to_path_buf(), size })
    }
}

#[async_trait]
impl ReportRenderer for FileRenderer {
    async fn render(&self, _markdown: &str, filename: &str) -> Result<RenderedArtifact, ResearchError> {
        let path = self.dir.join(filename);
        tokio::fs::write(&path, vec![b'%'; self.size]).await?;
        RenderedArtifact::from_path(path, filename).await
    }
}

pub struct FailingRenderer;

#[async_trait]
impl ReportRenderer for FailingRenderer {
    async fn render(&self, _markdown: &str, _filename: &str) -> Result<RenderedArtifact, ResearchError> {
        Err(ResearchError::Render("pandoc exited with 43".into()))
    }
}

pub struct StubCloud {
    pub fail: bool,
    pub uploads: Mutex<Vec<(String, String, String)>>,
    pub files: Vec<DriveFile>,
}

impl StubCloud {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self { fail: false, uploads: Mutex::new(Vec::new()), files: Vec::new() })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { fail: true, uploads: Mutex::new(Vec::new()), files: Vec::new() })
    }

    pub fn with_files(files: Vec<DriveFile>) -> Arc<Self> {
        Arc::new(Self { fail: false, uploads: Mutex::new(Vec::new()), files })
    }
}

#[async_trait]
impl CloudStore for StubCloud {
    async fn upload(
        &self,
        path: &Path,
        filename: &str,
        folder_id: &str,
        description: &str,
    ) -> Result<CloudLocation, ResearchError> {
        assert!(path.exists(), "artifact must exist while uploading");
        self.uploads
            .lock()
            .unwrap()
            .push((filename.to_string(), folder_id.to_string(), description.to_string()));
        if self.fail {
            return Err(ResearchError::Sink("Drive upload returned 403".into()));
        }
        Ok(CloudLocation {
            file_id: "file-1".into(),
            file_name: Some(filename.to_string()),
            view_link: Some("https://drive.example.com/file-1".into()),
            size: Some("1024".into()),
        })
    }

    async fn list(&self, _folder_id: &str) -> Result<Vec<DriveFile>, ResearchError> {
        Ok(self.files.clone())
    }
}

pub struct StubMailer {
    pub fail: bool,
    pub sent: Mutex<Vec<ReportEmail>>,
}

impl StubMailer {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self { fail: false, sent: Mutex::new(Vec::new()) })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { fail: true, sent: Mutex::new(Vec::new()) })
    }

    pub fn sent(&self) -> Vec<ReportEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for StubMailer {
    async fn send(&self, email: &ReportEmail) -> Result<String, ResearchError> {
        if let Some(attachment) = &email.attachment {
            assert!(attachment.path.exists(), "attachment must exist while sending");
        }
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            return Err(ResearchError::Sink("Failed to send email: connection refused".into()));
        }
        Ok(format!("Report sent to {}", email.to))
    }
}
