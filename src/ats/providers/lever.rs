// src/ats/providers/lever.rs
//! Lever postings API client.
//! Public API documentation: https://github.com/lever/postings-api

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use super::JobBoardClient;
use crate::ats::types::{RawJob, DEFAULT_DEPARTMENT, UNSPECIFIED_LOCATION};
use crate::ats::AtsProvider;
use crate::config::AuditConfig;
use crate::http::FetchGate;

const API_BASE: &str = "https://api.lever.co/v0/postings";

#[derive(Debug, Deserialize)]
struct LeverJob {
    id: String,
    /// Lever calls the job title `text`.
    text: String,
    #[serde(default)]
    categories: LeverCategories,
    #[serde(default)]
    description: String,
    #[serde(default)]
    lists: Vec<LeverList>,
    #[serde(default)]
    additional: String,
    #[serde(default, rename = "hostedUrl")]
    hosted_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct LeverCategories {
    team: Option<String>,
    department: Option<String>,
    location: Option<String>,
}

/// One titled section of the posting body (requirements, benefits, ...).
#[derive(Debug, Deserialize)]
struct LeverList {
    #[serde(default)]
    text: String,
    #[serde(default)]
    content: String,
}

pub struct LeverClient {
    gate: FetchGate,
}

impl LeverClient {
    pub fn new(config: &AuditConfig) -> Result<Self> {
        Ok(Self {
            gate: FetchGate::new(
                config.fetch_timeout,
                config.min_request_interval,
                &config.user_agent,
            )?,
        })
    }
}

/// Lever splits the posting body across `description`, titled `lists`, and
/// `additional`; recombine them so the analyzer sees the whole text.
fn normalize_job(job: LeverJob) -> RawJob {
    let mut description = job.description;
    for list in &job.lists {
        description.push_str(&format!("\n\n<h3>{}</h3>\n{}", list.text, list.content));
    }
    if !job.additional.is_empty() {
        description.push_str("\n\n");
        description.push_str(&job.additional);
    }

    let location = job
        .categories
        .location
        .unwrap_or_else(|| UNSPECIFIED_LOCATION.to_string());
    let department = job
        .categories
        .team
        .or(job.categories.department)
        .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string());

    RawJob {
        id: job.id,
        title: job.text,
        location,
        department,
        description,
        url: job.hosted_url,
        source: AtsProvider::Lever,
    }
}

#[async_trait]
impl JobBoardClient for LeverClient {
    fn provider(&self) -> AtsProvider {
        AtsProvider::Lever
    }

    async fn fetch_jobs(&self, board_token: &str) -> Vec<RawJob> {
        let url = format!("{}/{}", API_BASE, board_token);

        let response = match self.gate.get_json(&url).await {
            Ok(response) => response,
            Err(error) => {
                warn!("Lever fetch failed for board {}: {:#}", board_token, error);
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(
                "Lever API returned {} for board {}",
                response.status(),
                board_token
            );
            return Vec::new();
        }

        let jobs: Vec<LeverJob> = match response.json().await {
            Ok(jobs) => jobs,
            Err(error) => {
                warn!(
                    "Unexpected Lever response shape for board {}: {:#}",
                    board_token, error
                );
                return Vec::new();
            }
        };

        info!(
            "Fetched {} Lever postings for board {}",
            jobs.len(),
            board_token
        );

        jobs.into_iter().map(normalize_job).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_combines_description_sections() {
        let payload = r#"[{
            "id": "a1b2",
            "text": "Platform Engineer",
            "categories": {"team": "Infrastructure", "location": "Remote - UK"},
            "description": "<p>Intro</p>",
            "lists": [
                {"text": "Requirements", "content": "<li>Rust</li>"},
                {"text": "Benefits", "content": "<li>Pension</li>"}
            ],
            "additional": "<p>We are an equal opportunity employer.</p>",
            "hostedUrl": "https://jobs.lever.co/acme/a1b2"
        }]"#;

        let jobs: Vec<LeverJob> = serde_json::from_str(payload).unwrap();
        let job = normalize_job(jobs.into_iter().next().unwrap());

        assert_eq!(job.title, "Platform Engineer");
        assert_eq!(job.location, "Remote - UK");
        assert_eq!(job.department, "Infrastructure");
        assert_eq!(job.url, "https://jobs.lever.co/acme/a1b2");
        assert!(job.description.starts_with("<p>Intro</p>"));
        assert!(job.description.contains("<h3>Requirements</h3>\n<li>Rust</li>"));
        assert!(job.description.contains("<h3>Benefits</h3>"));
        assert!(job.description.ends_with("<p>We are an equal opportunity employer.</p>"));
        assert_eq!(job.source, AtsProvider::Lever);
    }

    #[test]
    fn test_normalize_department_falls_back_through_categories() {
        let payload = r#"[{
            "id": "x",
            "text": "Recruiter",
            "categories": {"department": "People"},
            "hostedUrl": "https://jobs.lever.co/acme/x"
        }]"#;

        let jobs: Vec<LeverJob> = serde_json::from_str(payload).unwrap();
        let job = normalize_job(jobs.into_iter().next().unwrap());

        assert_eq!(job.department, "People");
        assert_eq!(job.location, UNSPECIFIED_LOCATION);
        assert_eq!(job.description, "");
    }
}
