use std::collections::BTreeMap;

use tracing::info;

use crate::errors::ResearchError;
use crate::models::{ProviderKind, ProviderPayload, ProviderResult, ResearchBundle};
use crate::providers::ProviderSet;
use crate::reporting::ReportSynthesizer;
use crate::utils::identifier::{display_name_from_identifier, ensure_scheme, normalize_domain};

/// Company name used when the firmographic payload carries none.
pub const UNKNOWN_COMPANY: &str = "Unknown_Company";

/// Fans a request out to the providers, joins their results and hands them to the synthesizer.
#[derive(Clone)]
pub struct ResearchOrchestrator {
    providers: ProviderSet,
    synthesizer: ReportSynthesizer,
}

impl ResearchOrchestrator {
    pub fn new(providers: ProviderSet, synthesizer: ReportSynthesizer) -> Self {
        Self { providers, synthesizer }
    }

    /// Three-provider research. All fetches run concurrently; the first failure aborts the join
    /// and nothing is synthesized.
    pub async fn research(&self, identifier: &str) -> Result<ResearchBundle, ResearchError> {
        let domain = normalize_domain(identifier);
        if domain.is_empty() {
            return Err(ResearchError::InvalidRequest("domain must not be empty".into()));
        }

        let enrichment = self.providers.enrichment()?;
        let firmographic = self.providers.firmographic()?;
        let search = self.providers.search()?;

        info!(domain = %domain, "Starting multi-source research");

        let (apollo, coresignal, customers) = tokio::try_join!(
            enrichment.fetch(&domain),
            firmographic.fetch(&domain),
            search.fetch(&domain),
        )?;

        let company_name = resolve_company_name(&apollo, &coresignal, &domain);
        info!(
            company = %company_name,
            customers = customers.len(),
            "Provider data collected"
        );

        let report = self
            .synthesizer
            .synthesize(&company_name, &apollo, &coresignal, &customers)
            .await?;

        let mut payloads = BTreeMap::new();
        payloads.insert(ProviderKind::Apollo, ProviderPayload::Company(apollo));
        payloads.insert(ProviderKind::CoreSignal, ProviderPayload::Company(coresignal));
        payloads.insert(ProviderKind::Tavily, ProviderPayload::Search(customers));

        Ok(ResearchBundle {
            company_name,
            domain: identifier.to_string(),
            report,
            payloads,
        })
    }

    /// Firmographic-only research keyed by website.
    pub async fn research_firmographic(&self, website: &str) -> Result<ResearchBundle, ResearchError> {
        if website.trim().is_empty() {
            return Err(ResearchError::InvalidRequest("website must not be empty".into()));
        }
        let website = ensure_scheme(website.trim());
        let firmographic = self.providers.firmographic()?;

        info!(website = %website, "Starting firmographic research");
        let coresignal = firmographic.fetch(&website).await?;

        let company_name = coresignal
            .view
            .company_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());

        let report = self.synthesizer.synthesize_firmographic(&website, &coresignal).await?;

        let mut payloads = BTreeMap::new();
        payloads.insert(ProviderKind::CoreSignal, ProviderPayload::Company(coresignal));

        Ok(ResearchBundle {
            company_name,
            domain: website,
            report,
            payloads,
        })
    }
}

/// Enrichment organization name, then firmographic company name, then the enrichment
/// top-level name, then a name derived from the domain.
pub fn resolve_company_name(enrichment: &ProviderResult, firmographic: &ProviderResult, domain: &str) -> String {
    enrichment
        .view
        .organization_name
        .clone()
        .or_else(|| firmographic.view.company_name.clone())
        .or_else(|| enrichment.view.name.clone())
        .unwrap_or_else(|| display_name_from_identifier(domain))
}
