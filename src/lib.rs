//! Audit an employer's public hiring data to estimate how AI-readable it is.
//!
//! Given only a careers-page URL, the pipeline identifies which Applicant
//! Tracking System serves the page, pulls the employer's live postings
//! through that ATS's public API, mines each posting for disclosure signals
//! (salary, benefits, remote policy, tech stack, interview process,
//! diversity language), and combines them into a bounded 0-100 readiness
//! score plus a structured facts record.
//!
//! The pipeline is fail-soft throughout: malformed input, provider outages,
//! and schema drift all degrade to empty results with logged warnings, never
//! to errors crossing the crate boundary.

use anyhow::Result;

pub mod ats;
pub mod audit;
pub mod cli;
pub mod config;
pub mod http;
pub mod report;

pub use ats::types::{AtsDetection, GeneratedFacts, JobAnalysis, RawJob};
pub use ats::{
    analyse_jobs, generate_facts, has_substantial_facts, AtsDetector, AtsProvider, ClientRegistry,
    SignalExtractor,
};
pub use audit::{AuditReport, Auditor};
pub use config::AuditConfig;

/// Convenience entry point: audit one careers page with default
/// configuration (environment overrides applied).
pub async fn audit_careers_page(careers_url: &str) -> Result<AuditReport> {
    let auditor = Auditor::new(AuditConfig::load())?;
    Ok(auditor.run(careers_url).await)
}
