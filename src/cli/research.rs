use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::cli::commands::ResearchArgs;
use crate::config::load_config;
use crate::errors::ResearchError;
use crate::llm::{self, LLMProvider};
use crate::pipeline::ResearchOrchestrator;
use crate::providers::ProviderSet;
use crate::reporting::ReportSynthesizer;
use crate::utils::formatting::safe_file_stem;

pub async fn handle_research(args: ResearchArgs) -> Result<(), ResearchError> {
    let config = load_config(args.config.as_deref().map(Path::new)).await?;
    let llm: Arc<dyn LLMProvider> = Arc::from(llm::create_provider(&config.llm)?);
    let orchestrator = ResearchOrchestrator::new(ProviderSet::from_config(&config), ReportSynthesizer::new(llm));

    let bundle = orchestrator.research(&args.domain).await?;

    let output_dir = PathBuf::from(&args.output);
    tokio::fs::create_dir_all(&output_dir).await?;
    let path = output_dir.join(report_filename(&bundle.company_name));
    tokio::fs::write(&path, &bundle.report).await?;

    info!(company = %bundle.company_name, path = %path.display(), "Report written");
    println!("{}", path.display());
    Ok(())
}

pub fn report_filename(company_name: &str) -> String {
    format!("{}_multi_source_research_report.md", safe_file_stem(company_name))
}
