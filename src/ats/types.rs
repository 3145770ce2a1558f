// src/ats/types.rs
use serde::{Deserialize, Serialize};

use super::AtsProvider;

/// Filler location for postings whose provider gave none.
pub const UNSPECIFIED_LOCATION: &str = "Not specified";
/// Filler department for postings whose provider gave none.
pub const DEFAULT_DEPARTMENT: &str = "General";

/// One normalized job posting, regardless of source ATS.
///
/// `description` may contain markup and is never null; providers that omit
/// it produce an empty string. Every posting from one fetch carries the same
/// `source`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawJob {
    pub id: String,
    pub title: String,
    pub location: String,
    pub department: String,
    pub description: String,
    pub url: String,
    pub source: AtsProvider,
}

/// Outcome of ATS detection for one careers-page URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsDetection {
    pub provider: Option<AtsProvider>,
    pub board_token: Option<String>,
    pub confidence: f64,
}

impl AtsDetection {
    /// The "could not detect" outcome: no provider, no token, zero confidence.
    pub fn none() -> Self {
        Self {
            provider: None,
            board_token: None,
            confidence: 0.0,
        }
    }

    /// Caller-side gate: callers acting on detections below `min_confidence`
    /// do so explicitly.
    pub fn is_reliable(&self, min_confidence: f64) -> bool {
        self.provider.is_some() && self.confidence >= min_confidence
    }
}

/// Employer-level remote-work classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemotePolicy {
    Remote,
    Hybrid,
    Office,
    Unclear,
}

impl std::fmt::Display for RemotePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RemotePolicy::Remote => "remote",
            RemotePolicy::Hybrid => "hybrid",
            RemotePolicy::Office => "office",
            RemotePolicy::Unclear => "unclear",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryTransparency {
    pub count: usize,
    pub percentage: u32,
    /// Up to three literal salary strings pulled from postings.
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitsMentioned {
    pub count: usize,
    pub percentage: u32,
    /// Up to five benefit categories, most frequently mentioned first.
    pub top_benefits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePolicySummary {
    pub mentioned: bool,
    pub policy: RemotePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewProcess {
    pub mentioned: bool,
    pub stages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversityInfo {
    pub mentioned: bool,
}

/// Aggregate statistics over one batch of postings.
///
/// Percentage fields are `round(count / total_jobs * 100)`; the empty batch
/// yields every field zeroed and a score of 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub total_jobs: usize,
    pub salary_transparency: SalaryTransparency,
    pub benefits_mentioned: BenefitsMentioned,
    pub remote_policy: RemotePolicySummary,
    pub tech_stack: Vec<String>,
    pub departments: Vec<String>,
    pub locations: Vec<String>,
    pub interview_process: InterviewProcess,
    pub diversity_info: DiversityInfo,
    pub ai_readiness_score: u8,
}

impl JobAnalysis {
    /// The all-zero analysis for an empty batch.
    pub fn empty() -> Self {
        Self {
            total_jobs: 0,
            salary_transparency: SalaryTransparency {
                count: 0,
                percentage: 0,
                examples: Vec::new(),
            },
            benefits_mentioned: BenefitsMentioned {
                count: 0,
                percentage: 0,
                top_benefits: Vec::new(),
            },
            remote_policy: RemotePolicySummary {
                mentioned: false,
                policy: RemotePolicy::Unclear,
            },
            tech_stack: Vec::new(),
            departments: Vec::new(),
            locations: Vec::new(),
            interview_process: InterviewProcess {
                mentioned: false,
                stages: Vec::new(),
            },
            diversity_info: DiversityInfo { mentioned: false },
            ai_readiness_score: 0,
        }
    }
}

/// A literal salary range traced back to the posting it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub role: String,
    pub range: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitFact {
    pub category: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentCount {
    pub name: String,
    pub open_roles: usize,
}

/// The externally consumable artifact of one audit run. Created fresh each
/// run and never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFacts {
    pub salary_ranges: Vec<SalaryRange>,
    pub benefits: Vec<BenefitFact>,
    pub tech_stack: Vec<String>,
    pub work_policy: String,
    pub interview_process: Vec<String>,
    pub departments: Vec<DepartmentCount>,
    pub last_updated: String,
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_none_is_not_reliable() {
        let detection = AtsDetection::none();
        assert!(!detection.is_reliable(0.6));
        assert_eq!(detection.confidence, 0.0);
        assert!(detection.provider.is_none());
        assert!(detection.board_token.is_none());
    }

    #[test]
    fn test_detection_reliability_threshold() {
        let detection = AtsDetection {
            provider: Some(AtsProvider::Greenhouse),
            board_token: Some("acme".to_string()),
            confidence: 0.6,
        };
        assert!(detection.is_reliable(0.6));
        assert!(!detection.is_reliable(0.7));
    }

    #[test]
    fn test_empty_analysis_is_all_zero() {
        let analysis = JobAnalysis::empty();
        assert_eq!(analysis.total_jobs, 0);
        assert_eq!(analysis.ai_readiness_score, 0);
        assert_eq!(analysis.salary_transparency.percentage, 0);
        assert_eq!(analysis.remote_policy.policy, RemotePolicy::Unclear);
        assert!(!analysis.remote_policy.mentioned);
    }
}
