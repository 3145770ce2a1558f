// src/ats/providers/greenhouse.rs
//! Greenhouse job board API client.
//! Public API documentation: https://developers.greenhouse.io/job-board.html

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use super::JobBoardClient;
use crate::ats::types::{RawJob, DEFAULT_DEPARTMENT, UNSPECIFIED_LOCATION};
use crate::ats::AtsProvider;
use crate::config::AuditConfig;
use crate::http::FetchGate;

const API_BASE: &str = "https://boards-api.greenhouse.io/v1/boards";

#[derive(Debug, Deserialize)]
struct BoardResponse {
    jobs: Vec<GreenhouseJob>,
}

#[derive(Debug, Deserialize)]
struct GreenhouseJob {
    id: u64,
    title: String,
    #[serde(default)]
    location: Option<GreenhouseLocation>,
    #[serde(default)]
    departments: Vec<GreenhouseDepartment>,
    #[serde(default)]
    offices: Vec<GreenhouseOffice>,
    /// HTML job description; present when the list is requested with
    /// `content=true`.
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GreenhouseLocation {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GreenhouseDepartment {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GreenhouseOffice {
    name: Option<String>,
    location: Option<String>,
}

pub struct GreenhouseClient {
    gate: FetchGate,
}

impl GreenhouseClient {
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

/// Flatten Greenhouse's nested location/department/office objects into the
/// normalized posting shape.
fn normalize_job(board_token: &str, job: GreenhouseJob) -> RawJob {
    let GreenhouseJob {
        id,
        title,
        location,
        departments,
        offices,
        content,
    } = job;

    let location = location
        .and_then(|l| l.name)
        .or_else(|| offices.iter().find_map(|office| office.location.clone()))
        .or_else(|| offices.iter().find_map(|office| office.name.clone()))
        .unwrap_or_else(|| UNSPECIFIED_LOCATION.to_string());

    let department = departments
        .into_iter()
        .find_map(|department| department.name)
        .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string());

    RawJob {
        url: format!("https://boards.greenhouse.io/{}/jobs/{}", board_token, id),
        id: id.to_string(),
        title,
        location,
        department,
        description: content.unwrap_or_default(),
        source: AtsProvider::Greenhouse,
    }
}

#[async_trait]
impl JobBoardClient for GreenhouseClient {
    fn provider(&self) -> AtsProvider {
        AtsProvider::Greenhouse
    }

    async fn fetch_jobs(&self, board_token: &str) -> Vec<RawJob> {
        let url = format!("{}/{}/jobs?content=true", API_BASE, board_token);

        let response = match self.gate.get_json(&url).await {
            Ok(response) => response,
            Err(error) => {
                warn!(
                    "Greenhouse fetch failed for board {}: {:#}",
                    board_token, error
                );
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(
                "Greenhouse API returned {} for board {}",
                response.status(),
                board_token
            );
            return Vec::new();
        }

        let board: BoardResponse = match response.json().await {
            Ok(board) => board,
            Err(error) => {
                warn!(
                    "Unexpected Greenhouse response shape for board {}: {:#}",
                    board_token, error
                );
                return Vec::new();
            }
        };

        info!(
            "Fetched {} Greenhouse postings for board {}",
            board.jobs.len(),
            board_token
        );

        board
            .jobs
            .into_iter()
            .map(|job| normalize_job(board_token, job))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_full_job() {
        let payload = r#"{
            "jobs": [{
                "id": 4012345,
                "title": "Backend Engineer",
                "location": {"name": "London"},
                "departments": [{"id": 1, "name": "Engineering"}],
                "offices": [{"id": 7, "name": "London HQ", "location": "London, UK"}],
                "content": "<p>Build services in Rust.</p>"
            }]
        }"#;

        let board: BoardResponse = serde_json::from_str(payload).unwrap();
        let job = normalize_job("acme", board.jobs.into_iter().next().unwrap());

        assert_eq!(job.id, "4012345");
        assert_eq!(job.title, "Backend Engineer");
        assert_eq!(job.location, "London");
        assert_eq!(job.department, "Engineering");
        assert_eq!(job.description, "<p>Build services in Rust.</p>");
        assert_eq!(job.url, "https://boards.greenhouse.io/acme/jobs/4012345");
        assert_eq!(job.source, AtsProvider::Greenhouse);
    }

    #[test]
    fn test_normalize_falls_back_to_office_location() {
        let payload = r#"{
            "jobs": [{
                "id": 99,
                "title": "Designer",
                "offices": [{"id": 1, "name": "Paris Office", "location": null}]
            }]
        }"#;

        let board: BoardResponse = serde_json::from_str(payload).unwrap();
        let job = normalize_job("acme", board.jobs.into_iter().next().unwrap());

        assert_eq!(job.location, "Paris Office");
        assert_eq!(job.department, DEFAULT_DEPARTMENT);
        assert_eq!(job.description, "");
    }

    #[test]
    fn test_normalize_uses_sentinels_when_everything_is_missing() {
        let payload = r#"{"jobs": [{"id": 1, "title": "Analyst"}]}"#;

        let board: BoardResponse = serde_json::from_str(payload).unwrap();
        let job = normalize_job("acme", board.jobs.into_iter().next().unwrap());

        assert_eq!(job.location, UNSPECIFIED_LOCATION);
        assert_eq!(job.department, DEFAULT_DEPARTMENT);
    }
}
