// src/ats/detect.rs
use anyhow::{Context, Result};
use regex::Regex;
use tracing::warn;

use super::types::AtsDetection;
use super::AtsProvider;
use crate::config::AuditConfig;
use crate::http::FetchGate;

// Confidence tiers. Structural URL matches always outrank textual
// fingerprints, and a match with an extracted token outranks one without.
const URL_MATCH_WITH_TOKEN: f64 = 1.0;
const URL_MATCH_NO_TOKEN: f64 = 0.9;
const RESCAN_WITH_TOKEN: f64 = 0.95;
const RESCAN_NO_TOKEN: f64 = 0.85;
const HTML_WITH_TOKEN_CAP: f64 = 0.8;
const HTML_NO_TOKEN_CAP: f64 = 0.7;

/// Subdomain captures that are hosting infrastructure, not board tokens.
const NON_TOKEN_SUBDOMAINS: [&str; 2] = ["apply", "www"];

/// Hosting-domain patterns, HTML fingerprints, and token-extraction
/// patterns for one provider.
struct ProviderSignature {
    provider: AtsProvider,
    url_patterns: Vec<Regex>,
    html_patterns: Vec<Regex>,
    token_patterns: Vec<Regex>,
}

impl ProviderSignature {
    fn matches_url(&self, url: &str) -> bool {
        self.url_patterns.iter().any(|pattern| pattern.is_match(url))
    }

    fn html_hits(&self, html: &str) -> usize {
        self.html_patterns
            .iter()
            .filter(|pattern| pattern.is_match(html))
            .count()
    }

    /// Pull the board token out of the URL, falling back to the page body.
    fn extract_token(&self, url: &str, html: &str) -> Option<String> {
        for haystack in [url, html] {
            for pattern in &self.token_patterns {
                if let Some(captures) = pattern.captures(haystack) {
                    if let Some(token) = captures.get(1) {
                        let token = token.as_str();
                        if !NON_TOKEN_SUBDOMAINS.contains(&token) {
                            return Some(token.to_string());
                        }
                    }
                }
            }
        }
        None
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).with_context(|| format!("Invalid signature pattern: {}", pattern))
        })
        .collect()
}

fn build_signatures() -> Result<Vec<ProviderSignature>> {
    Ok(vec![
        ProviderSignature {
            provider: AtsProvider::Greenhouse,
            url_patterns: compile(&[
                r"(?i)boards\.greenhouse\.io/([A-Za-z0-9_-]+)",
                r"(?i)boards-api\.greenhouse\.io",
            ])?,
            html_patterns: compile(&[
                r"(?i)greenhouse",
                r"(?i)gh-jobboard",
                r"(?i)boards\.greenhouse\.io",
            ])?,
            token_patterns: compile(&[r"(?i)boards\.greenhouse\.io/([A-Za-z0-9_-]+)"])?,
        },
        ProviderSignature {
            provider: AtsProvider::Lever,
            url_patterns: compile(&[
                r"(?i)jobs\.lever\.co/([A-Za-z0-9_-]+)",
                r"(?i)api\.lever\.co",
            ])?,
            html_patterns: compile(&[
                r"(?i)lever\.co",
                r"(?i)lever-framework",
                r"(?i)postings\.lever\.co",
            ])?,
            token_patterns: compile(&[r"(?i)jobs\.lever\.co/([A-Za-z0-9_-]+)"])?,
        },
        ProviderSignature {
            provider: AtsProvider::Ashby,
            url_patterns: compile(&[r"(?i)jobs\.ashbyhq\.com/([A-Za-z0-9_-]+)"])?,
            html_patterns: compile(&[r"(?i)ashbyhq\.com", r"(?i)ashby-embed"])?,
            token_patterns: compile(&[r"(?i)jobs\.ashbyhq\.com/([A-Za-z0-9_-]+)"])?,
        },
        ProviderSignature {
            provider: AtsProvider::Workable,
            url_patterns: compile(&[
                r"(?i)apply\.workable\.com/([A-Za-z0-9_-]+)",
                r"(?i)([A-Za-z0-9-]+)\.workable\.com",
            ])?,
            html_patterns: compile(&[r"(?i)workable\.com", r"(?i)whr-embed"])?,
            token_patterns: compile(&[
                r"(?i)apply\.workable\.com/([A-Za-z0-9_-]+)",
                r"(?i)//([A-Za-z0-9-]+)\.workable\.com",
            ])?,
        },
        ProviderSignature {
            provider: AtsProvider::Teamtailor,
            url_patterns: compile(&[r"(?i)career\.teamtailor\.com/([A-Za-z0-9_-]+)"])?,
            html_patterns: compile(&[r"(?i)teamtailor\.com", r"(?i)teamtailor-embed"])?,
            token_patterns: compile(&[r"(?i)career\.teamtailor\.com/([A-Za-z0-9_-]+)"])?,
        },
        ProviderSignature {
            provider: AtsProvider::SmartRecruiters,
            url_patterns: compile(&[r"(?i)jobs\.smartrecruiters\.com/([A-Za-z0-9_-]+)"])?,
            html_patterns: compile(&[r"(?i)smartrecruiters\.com", r"(?i)sr-widget"])?,
            token_patterns: compile(&[r"(?i)jobs\.smartrecruiters\.com/([A-Za-z0-9_-]+)"])?,
        },
        ProviderSignature {
            provider: AtsProvider::BambooHr,
            url_patterns: compile(&[r"(?i)([A-Za-z0-9-]+)\.bamboohr\.com/jobs"])?,
            html_patterns: compile(&[r"(?i)bamboohr\.com", r"BambooHR"])?,
            token_patterns: compile(&[r"(?i)//([A-Za-z0-9-]+)\.bamboohr\.com/jobs"])?,
        },
    ])
}

/// Structural stage: test a URL against every provider's hosting-domain
/// patterns. First signature to match wins; confidence depends on whether a
/// board token could also be extracted.
fn url_pattern_stage(
    signatures: &[ProviderSignature],
    url: &str,
    html: &str,
    with_token: f64,
    without_token: f64,
) -> Option<AtsDetection> {
    for signature in signatures {
        if signature.matches_url(url) {
            let token = signature.extract_token(url, html);
            let confidence = if token.is_some() {
                with_token
            } else {
                without_token
            };
            return Some(AtsDetection {
                provider: Some(signature.provider),
                board_token: token,
                confidence,
            });
        }
    }
    None
}

/// Textual stage: count fingerprint hits per provider in the page body and
/// pick the strongest candidate. Token-bearing candidates outrank token-less
/// ones; confidence scales with hit count but stays below the URL tiers.
fn html_signature_stage(
    signatures: &[ProviderSignature],
    final_url: &str,
    html: &str,
) -> Option<AtsDetection> {
    struct Candidate {
        provider: AtsProvider,
        hits: usize,
        token: Option<String>,
    }

    let mut candidates: Vec<Candidate> = signatures
        .iter()
        .filter_map(|signature| {
            let hits = signature.html_hits(html);
            if hits == 0 {
                return None;
            }
            Some(Candidate {
                provider: signature.provider,
                hits,
                token: signature.extract_token(final_url, html),
            })
        })
        .collect();

    if candidates.is_empty() {
        return None;
    }

    candidates.sort_by(|a, b| {
        b.token
            .is_some()
            .cmp(&a.token.is_some())
            .then(b.hits.cmp(&a.hits))
    });

    let best = candidates.remove(0);
    let confidence = if best.token.is_some() {
        (0.5 + best.hits as f64 * 0.1).min(HTML_WITH_TOKEN_CAP)
    } else {
        (0.4 + best.hits as f64 * 0.1).min(HTML_NO_TOKEN_CAP)
    };

    Some(AtsDetection {
        provider: Some(best.provider),
        board_token: best.token,
        confidence,
    })
}

/// Decides which ATS serves a careers page and extracts the board token
/// needed to call its public API.
pub struct AtsDetector {
    gate: FetchGate,
    signatures: Vec<ProviderSignature>,
}

impl AtsDetector {
    pub fn new(config: &AuditConfig) -> Result<Self> {
        Ok(Self {
            gate: FetchGate::new(
                config.detect_timeout,
                config.min_request_interval,
                &config.user_agent,
            )?,
            signatures: build_signatures()?,
        })
    }

    /// Run the detection cascade. Never fails: malformed input, network
    /// failure, and "no match" all come back as the zero-confidence result.
    pub async fn detect(&self, careers_page_url: &str) -> AtsDetection {
        let url = careers_page_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            warn!("Rejecting non-absolute careers page URL: {}", careers_page_url);
            return AtsDetection::none();
        }

        // Stage 1: the given URL may already be an ATS-hosted board. No I/O.
        if let Some(detection) =
            url_pattern_stage(&self.signatures, url, "", URL_MATCH_WITH_TOKEN, URL_MATCH_NO_TOKEN)
        {
            return detection;
        }

        // Stage 2: fetch the page; many careers pages redirect straight to
        // the hosted board, so re-test the final URL.
        let (final_url, html) = match self.fetch_page(url).await {
            Some(page) => page,
            None => return AtsDetection::none(),
        };

        if let Some(detection) = url_pattern_stage(
            &self.signatures,
            &final_url,
            &html,
            RESCAN_WITH_TOKEN,
            RESCAN_NO_TOKEN,
        ) {
            return detection;
        }

        // Stage 3: provider fingerprints embedded in the page body.
        if let Some(detection) = html_signature_stage(&self.signatures, &final_url, &html) {
            return detection;
        }

        AtsDetection::none()
    }

    /// Fetch the careers page, following redirects. A failed fetch is a
    /// legitimate "could not detect" outcome, not an error.
    async fn fetch_page(&self, url: &str) -> Option<(String, String)> {
        let response = match self.gate.get(url).await {
            Ok(response) => response,
            Err(error) => {
                warn!("Careers page fetch failed for {}: {:#}", url, error);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "Careers page fetch for {} returned {}",
                url,
                response.status()
            );
            return None;
        }

        let final_url = response.url().to_string();
        match response.text().await {
            Ok(html) => Some((final_url, html)),
            Err(error) => {
                warn!("Failed to read careers page body for {}: {:#}", url, error);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signatures() -> Vec<ProviderSignature> {
        build_signatures().unwrap()
    }

    fn detector() -> AtsDetector {
        AtsDetector::new(&AuditConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_hosted_board_url_detects_without_network() {
        // Stage 1 short-circuits before any request is issued.
        let detection = detector()
            .detect("https://boards.greenhouse.io/acme")
            .await;

        assert_eq!(detection.provider, Some(AtsProvider::Greenhouse));
        assert_eq!(detection.board_token.as_deref(), Some("acme"));
        assert_eq!(detection.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_relative_url_rejected_without_network() {
        let detection = detector().detect("acme.com/careers").await;
        assert_eq!(detection, AtsDetection::none());
    }

    #[test]
    fn test_url_stage_without_token_reduces_confidence() {
        let detection = url_pattern_stage(
            &signatures(),
            "https://boards-api.greenhouse.io/v1/boards",
            "",
            URL_MATCH_WITH_TOKEN,
            URL_MATCH_NO_TOKEN,
        )
        .unwrap();

        assert_eq!(detection.provider, Some(AtsProvider::Greenhouse));
        assert!(detection.board_token.is_none());
        assert_eq!(detection.confidence, URL_MATCH_NO_TOKEN);
    }

    #[test]
    fn test_url_stage_recognizes_each_hosted_domain() {
        let cases = [
            ("https://jobs.lever.co/acme", AtsProvider::Lever, "acme"),
            ("https://jobs.ashbyhq.com/acme", AtsProvider::Ashby, "acme"),
            ("https://apply.workable.com/acme", AtsProvider::Workable, "acme"),
            (
                "https://career.teamtailor.com/acme",
                AtsProvider::Teamtailor,
                "acme",
            ),
            (
                "https://jobs.smartrecruiters.com/acme",
                AtsProvider::SmartRecruiters,
                "acme",
            ),
            (
                "https://acme.bamboohr.com/jobs",
                AtsProvider::BambooHr,
                "acme",
            ),
        ];

        for (url, provider, token) in cases {
            let detection = url_pattern_stage(
                &signatures(),
                url,
                "",
                URL_MATCH_WITH_TOKEN,
                URL_MATCH_NO_TOKEN,
            )
            .unwrap_or_else(|| panic!("no detection for {}", url));
            assert_eq!(detection.provider, Some(provider), "{}", url);
            assert_eq!(detection.board_token.as_deref(), Some(token), "{}", url);
        }
    }

    #[test]
    fn test_workable_subdomain_is_not_a_token() {
        let sigs = signatures();
        let workable = sigs
            .iter()
            .find(|s| s.provider == AtsProvider::Workable)
            .unwrap();

        assert_eq!(
            workable.extract_token("https://apply.workable.com/acme", ""),
            Some("acme".to_string())
        );
        assert_eq!(workable.extract_token("https://apply.workable.com/", ""), None);
    }

    #[test]
    fn test_html_stage_prefers_token_bearing_candidate() {
        // Lever gets two fingerprint hits, Greenhouse one hit plus a token.
        let html = r#"
            <script src="https://lever.co/embed.js"></script>
            <div class="lever-framework"></div>
            <script src="https://boards.greenhouse.io/acme/embed/job_board"></script>
        "#;

        let detection =
            html_signature_stage(&signatures(), "https://acme.com/careers", html).unwrap();

        assert_eq!(detection.provider, Some(AtsProvider::Greenhouse));
        assert_eq!(detection.board_token.as_deref(), Some("acme"));
    }

    #[test]
    fn test_html_stage_confidence_stays_below_url_tiers() {
        let html = r#"
            <script src="https://boards.greenhouse.io/acme/embed/job_board"></script>
            <div id="gh-jobboard"></div>
        "#;

        let detection =
            html_signature_stage(&signatures(), "https://acme.com/careers", html).unwrap();

        assert!(detection.confidence <= HTML_WITH_TOKEN_CAP);
        assert!(detection.confidence < RESCAN_NO_TOKEN);
    }

    #[test]
    fn test_html_stage_no_fingerprints_yields_none() {
        let html = "<html><body>We are hiring!</body></html>";
        assert!(html_signature_stage(&signatures(), "https://acme.com", html).is_none());
    }

    #[test]
    fn test_confidence_tier_ordering() {
        assert!(URL_MATCH_WITH_TOKEN > URL_MATCH_NO_TOKEN);
        assert!(RESCAN_WITH_TOKEN > RESCAN_NO_TOKEN);
        assert!(URL_MATCH_NO_TOKEN > HTML_WITH_TOKEN_CAP);
        assert!(RESCAN_NO_TOKEN > HTML_WITH_TOKEN_CAP);
        assert!(HTML_WITH_TOKEN_CAP > HTML_NO_TOKEN_CAP);
    }
}
