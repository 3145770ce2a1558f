// src/ats/mod.rs
use serde::{Deserialize, Serialize};

pub mod analyse;
pub mod detect;
pub mod facts;
pub mod providers;
pub mod text;
pub mod types;

pub use analyse::{analyse_jobs, SignalExtractor};
pub use detect::AtsDetector;
pub use facts::{generate_facts, has_substantial_facts};
pub use providers::ClientRegistry;

/// Third-party Applicant Tracking Systems this pipeline can recognize.
///
/// Recognition covers all variants; job fetching is implemented for
/// Greenhouse, Lever, and Ashby. The rest are detected so an audit can name
/// the system even when it cannot pull postings from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtsProvider {
    Greenhouse,
    Lever,
    Ashby,
    Workable,
    Teamtailor,
    SmartRecruiters,
    BambooHr,
}

impl AtsProvider {
    pub const ALL: [AtsProvider; 7] = [
        AtsProvider::Greenhouse,
        AtsProvider::Lever,
        AtsProvider::Ashby,
        AtsProvider::Workable,
        AtsProvider::Teamtailor,
        AtsProvider::SmartRecruiters,
        AtsProvider::BambooHr,
    ];

    /// Human-readable provider name.
    pub fn label(&self) -> &'static str {
        match self {
            AtsProvider::Greenhouse => "Greenhouse",
            AtsProvider::Lever => "Lever",
            AtsProvider::Ashby => "Ashby",
            AtsProvider::Workable => "Workable",
            AtsProvider::Teamtailor => "Teamtailor",
            AtsProvider::SmartRecruiters => "SmartRecruiters",
            AtsProvider::BambooHr => "BambooHR",
        }
    }

    /// Lowercase identifier used in serialized output and on the CLI.
    pub fn slug(&self) -> &'static str {
        match self {
            AtsProvider::Greenhouse => "greenhouse",
            AtsProvider::Lever => "lever",
            AtsProvider::Ashby => "ashby",
            AtsProvider::Workable => "workable",
            AtsProvider::Teamtailor => "teamtailor",
            AtsProvider::SmartRecruiters => "smartrecruiters",
            AtsProvider::BambooHr => "bamboohr",
        }
    }
}

impl std::fmt::Display for AtsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for AtsProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        AtsProvider::ALL
            .iter()
            .find(|provider| provider.slug() == normalized)
            .copied()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown ATS provider '{}'. Known providers: {}",
                    s,
                    AtsProvider::ALL
                        .iter()
                        .map(|p| p.slug())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}
