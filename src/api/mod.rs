pub mod errors;
pub mod jobs;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::errors::ResearchError;
use crate::llm::{self, LLMProvider};
use crate::pipeline::{DeliveryPipeline, PandocRenderer, ReportRenderer, ResearchOrchestrator};
use crate::providers::ProviderSet;
use crate::reporting::ReportSynthesizer;
use crate::sinks::{CloudStore, DriveClient, Mailer, SmtpMailer};

/// Shared handler state. Every capability whose credentials are missing is `None`
/// and reported by the health endpoint.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub providers: ProviderSet,
    pub llm: Option<Arc<dyn LLMProvider>>,
    pub renderer: Arc<dyn ReportRenderer>,
    pub cloud: Option<Arc<dyn CloudStore>>,
    pub mailer: Option<Arc<dyn Mailer>>,
}

impl AppState {
    pub fn orchestrator(&self) -> Result<ResearchOrchestrator, ResearchError> {
        let llm = self.llm.clone().ok_or_else(|| {
            ResearchError::Config(format!("No API key configured for LLM provider '{}'", self.config.llm.provider))
        })?;
        Ok(ResearchOrchestrator::new(self.providers.clone(), ReportSynthesizer::new(llm)))
    }

    pub fn delivery(&self) -> DeliveryPipeline {
        DeliveryPipeline::new(self.renderer.clone(), self.cloud.clone(), self.mailer.clone())
    }
}

pub async fn create_app_state(config: AppConfig) -> AppState {
    let providers = ProviderSet::from_config(&config);

    let llm: Option<Arc<dyn LLMProvider>> = match llm::create_provider(&config.llm) {
        Ok(provider) => {
            info!(provider = provider.provider_name(), model = provider.model_name(), "LLM provider ready");
            Some(Arc::from(provider))
        }
        Err(e) => {
            warn!(error = %e, "Report synthesis disabled");
            None
        }
    };

    let cloud = match DriveClient::from_config(&config.drive).await {
        Ok(client) => Some(Arc::new(client) as Arc<dyn CloudStore>),
        Err(e) => {
            warn!(error = %e, "Google Drive disabled");
            None
        }
    };

    let mailer = if config.smtp.is_configured() {
        match SmtpMailer::from_config(&config.smtp) {
            Ok(mailer) => Some(Arc::new(mailer) as Arc<dyn Mailer>),
            Err(e) => {
                warn!(error = %e, "Email disabled");
                None
            }
        }
    } else {
        warn!("Email disabled: EMAIL_USER or EMAIL_PASSWORD not set");
        None
    };

    let renderer = Arc::new(PandocRenderer::new(
        config.pandoc_path.clone(),
        std::env::temp_dir().join("company-research"),
    ));

    AppState {
        config: Arc::new(config),
        providers,
        llm,
        renderer,
        cloud,
        mailer,
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/multi-source-research", post(routes::research::multi_source_research))
        .route(
            "/api/multi-source-research-background",
            post(routes::research::multi_source_research_background),
        )
        .route("/api/coresignal/generate-pdf", post(routes::coresignal::generate_pdf))
        .route(
            "/api/coresignal/generate-pdf-background",
            post(routes::coresignal::generate_pdf_background),
        )
        .route("/api/drive-files", get(routes::drive::list_drive_files))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
