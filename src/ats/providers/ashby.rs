// src/ats/providers/ashby.rs
//! Ashby job board client, using their public GraphQL endpoint.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::JobBoardClient;
use crate::ats::types::{RawJob, DEFAULT_DEPARTMENT, UNSPECIFIED_LOCATION};
use crate::ats::AtsProvider;
use crate::config::AuditConfig;
use crate::http::FetchGate;

const API_ENDPOINT: &str = "https://jobs.ashbyhq.com/api/non-user-graphql";

const JOB_POSTINGS_QUERY: &str = r#"
  query JobPostings($organizationHostedJobsPageName: String!) {
    jobPostings: jobPostingsWithFilters(
      organizationHostedJobsPageName: $organizationHostedJobsPageName
    ) {
      id
      title
      location
      department
      description
    }
  }
"#;

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: GraphqlVariables<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlVariables<'a> {
    organization_hosted_jobs_page_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    #[serde(default)]
    job_postings: Option<Vec<AshbyJob>>,
}

#[derive(Debug, Deserialize)]
struct AshbyJob {
    id: String,
    title: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

pub struct AshbyClient {
    gate: FetchGate,
}

impl AshbyClient {
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

fn normalize_job(board_token: &str, job: AshbyJob) -> RawJob {
    RawJob {
        url: format!("https://jobs.ashbyhq.com/{}/{}", board_token, job.id),
        id: job.id,
        title: job.title,
        location: job
            .location
            .filter(|location| !location.is_empty())
            .unwrap_or_else(|| UNSPECIFIED_LOCATION.to_string()),
        department: job
            .department
            .filter(|department| !department.is_empty())
            .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string()),
        description: job.description.unwrap_or_default(),
        source: AtsProvider::Ashby,
    }
}

#[async_trait]
impl JobBoardClient for AshbyClient {
    fn provider(&self) -> AtsProvider {
        AtsProvider::Ashby
    }

    async fn fetch_jobs(&self, board_token: &str) -> Vec<RawJob> {
        let request = GraphqlRequest {
            query: JOB_POSTINGS_QUERY,
            variables: GraphqlVariables {
                organization_hosted_jobs_page_name: board_token,
            },
        };

        let response = match self.gate.post_json(API_ENDPOINT, &request).await {
            Ok(response) => response,
            Err(error) => {
                warn!("Ashby fetch failed for board {}: {:#}", board_token, error);
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(
                "Ashby API returned {} for board {}",
                response.status(),
                board_token
            );
            return Vec::new();
        }

        let body: GraphqlResponse = match response.json().await {
            Ok(body) => body,
            Err(error) => {
                warn!(
                    "Unexpected Ashby response shape for board {}: {:#}",
                    board_token, error
                );
                return Vec::new();
            }
        };

        let jobs = match body.data.and_then(|data| data.job_postings) {
            Some(jobs) => jobs,
            None => {
                warn!("Ashby response for board {} carried no job postings", board_token);
                return Vec::new();
            }
        };

        info!(
            "Fetched {} Ashby postings for board {}",
            jobs.len(),
            board_token
        );

        jobs.into_iter()
            .map(|job| normalize_job(board_token, job))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_serialize_to_camel_case() {
        let request = GraphqlRequest {
            query: JOB_POSTINGS_QUERY,
            variables: GraphqlVariables {
                organization_hosted_jobs_page_name: "acme",
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["variables"]["organizationHostedJobsPageName"],
            "acme"
        );
    }

    #[test]
    fn test_normalize_unwraps_graphql_envelope() {
        let payload = r#"{
            "data": {
                "jobPostings": [{
                    "id": "uuid-1",
                    "title": "Data Engineer",
                    "location": "Berlin",
                    "department": "Data",
                    "description": "<p>Pipelines.</p>"
                }]
            }
        }"#;

        let body: GraphqlResponse = serde_json::from_str(payload).unwrap();
        let jobs = body.data.and_then(|data| data.job_postings).unwrap();
        let job = normalize_job("acme", jobs.into_iter().next().unwrap());

        assert_eq!(job.id, "uuid-1");
        assert_eq!(job.location, "Berlin");
        assert_eq!(job.department, "Data");
        assert_eq!(job.url, "https://jobs.ashbyhq.com/acme/uuid-1");
        assert_eq!(job.source, AtsProvider::Ashby);
    }

    #[test]
    fn test_normalize_fills_missing_fields() {
        let job = AshbyJob {
            id: "uuid-2".to_string(),
            title: "Generalist".to_string(),
            location: Some(String::new()),
            department: None,
            description: None,
        };

        let normalized = normalize_job("acme", job);
        assert_eq!(normalized.location, UNSPECIFIED_LOCATION);
        assert_eq!(normalized.department, DEFAULT_DEPARTMENT);
        assert_eq!(normalized.description, "");
    }
}
