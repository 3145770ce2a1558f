// src/audit.rs
use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ats::types::{AtsDetection, GeneratedFacts, JobAnalysis};
use crate::ats::{
    analyse_jobs, generate_facts, has_substantial_facts, AtsDetector, AtsProvider, ClientRegistry,
    SignalExtractor,
};
use crate::config::AuditConfig;

/// Everything one audit run produced. `analysis` and `facts` are absent when
/// detection was unreliable or the board yielded no postings; `facts` is
/// additionally absent when too thin to be worth displaying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub careers_url: String,
    pub provider: Option<AtsProvider>,
    pub board_token: Option<String>,
    pub confidence: f64,
    pub job_count: usize,
    pub analysis: Option<JobAnalysis>,
    pub facts: Option<GeneratedFacts>,
    pub generated_at: String,
}

impl AuditReport {
    fn from_detection(careers_url: &str, detection: &AtsDetection) -> Self {
        Self {
            careers_url: careers_url.to_string(),
            provider: detection.provider,
            board_token: detection.board_token.clone(),
            confidence: detection.confidence,
            job_count: 0,
            analysis: None,
            facts: None,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Runs the full pipeline for one employer: detect the ATS, pull its
/// postings, analyse them, and derive the facts record.
pub struct Auditor {
    config: AuditConfig,
    detector: AtsDetector,
    registry: ClientRegistry,
    extractor: SignalExtractor,
}

impl Auditor {
    pub fn new(config: AuditConfig) -> Result<Self> {
        Ok(Self {
            detector: AtsDetector::new(&config)?,
            registry: ClientRegistry::new(&config)?,
            extractor: SignalExtractor::new()?,
            config,
        })
    }

    pub fn detector(&self) -> &AtsDetector {
        &self.detector
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// Audit one careers page. Never fails: malformed input, failed
    /// detection, and provider outages all degrade to a partially populated
    /// report rather than an error.
    pub async fn run(&self, careers_url: &str) -> AuditReport {
        let detection = self.detector.detect(careers_url).await;

        if !detection.is_reliable(self.config.min_confidence) {
            info!(
                "No reliable ATS detection for {} (confidence {:.2})",
                careers_url, detection.confidence
            );
            return AuditReport::from_detection(careers_url, &detection);
        }

        // is_reliable guarantees a provider; a missing token still means
        // there is no board to call.
        let (provider, board_token) = match (detection.provider, detection.board_token.as_deref()) {
            (Some(provider), Some(token)) => (provider, token),
            _ => {
                info!(
                    "Detected {} for {} but no board token could be extracted",
                    detection.provider.map(|p| p.label()).unwrap_or("unknown"),
                    careers_url
                );
                return AuditReport::from_detection(careers_url, &detection);
            }
        };

        let jobs = self.registry.fetch_jobs(provider, board_token).await;
        let mut report = AuditReport::from_detection(careers_url, &detection);
        report.job_count = jobs.len();

        if jobs.is_empty() {
            return report;
        }

        let analysis = analyse_jobs(&self.extractor, &jobs);
        let facts = generate_facts(&self.extractor, &jobs, &analysis, provider);

        info!(
            "Audited {}: {} postings, readiness score {}",
            careers_url, report.job_count, analysis.ai_readiness_score
        );

        report.facts = has_substantial_facts(&facts).then_some(facts);
        report.analysis = Some(analysis);
        report
    }
}
