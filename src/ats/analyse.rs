// src/ats/analyse.rs
//! Mine job-posting text for disclosure signals and fold a batch of
//! postings into one analysis with an AI readiness score.
//!
//! Every classifier is keyword- or pattern-driven rather than model-based:
//! recall is traded for determinism so an audit is reproducible.

use std::collections::{BTreeSet, HashMap};

use anyhow::{Context, Result};
use regex::Regex;

use super::text::plain_text;
use super::types::{
    BenefitsMentioned, DiversityInfo, InterviewProcess, JobAnalysis, RawJob, RemotePolicy,
    RemotePolicySummary, SalaryTransparency, DEFAULT_DEPARTMENT, UNSPECIFIED_LOCATION,
};

const SALARY_RANGE_PATTERN: &str = r"(?i)(?:£|€|\$|USD|GBP|EUR)\s*\d{2,3}[,.]?\d{0,3}k?\s*(?:-|–|to)\s*(?:£|€|\$|USD|GBP|EUR)?\s*\d{2,3}[,.]?\d{0,3}k?";
const SALARY_SINGLE_PATTERN: &str =
    r"(?i)(?:£|€|\$|USD|GBP|EUR)\s*\d{2,3}[,.]?\d{0,3}k?(?:\s*(?:per|/)\s*(?:year|annum|pa))?";
const COMPETITIVE_SALARY_PATTERN: &str =
    r"(?i)competitive\s+salary|salary\s+(?:commensurate|dependent)\s+(?:with|on)\s+experience";

const REMOTE_PATTERN: &str = r"(?i)\b(?:fully\s+)?remote(?:\s+(?:work|position|role|job))?\b|\bwork\s+from\s+(?:home|anywhere)\b|\bremote[-\s]first\b";
const HYBRID_PATTERN: &str = r"(?i)\bhybrid\b|\bflexible\s+(?:work|working)\b|\bremote\s+and\s+office\b|\boffice\s+and\s+remote\b";
const OFFICE_PATTERN: &str = r"(?i)\b(?:in[-\s]office|on[-\s]site|office[-\s]based)\b";

/// Benefit taxonomy: category token plus the keywords that signal it.
const BENEFIT_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "healthcare",
        &["health insurance", "healthcare", "medical insurance", "dental", "vision"],
    ),
    ("pension", &["pension", "401k", "retirement", "superannuation"]),
    ("equity", &["equity", "stock options", "rsu", "shares", "ownership"]),
    ("flexible", &["flexible", "flextime", "flex hours", "work-life balance"]),
    (
        "remote",
        &["remote work", "work from home", "wfh", "remote-first", "distributed"],
    ),
    (
        "pto",
        &["unlimited pto", "unlimited vacation", "time off", "annual leave", "holiday"],
    ),
    (
        "learning",
        &["learning budget", "training", "development", "courses", "conferences"],
    ),
    ("parental", &["parental leave", "maternity", "paternity", "family leave"]),
    ("wellbeing", &["mental health", "wellbeing", "wellness", "gym", "fitness"]),
    ("meals", &["free lunch", "free food", "catered", "snacks", "meals"]),
];

/// Curated technology vocabulary. Each entry carries its own pattern so
/// names ending in symbols (`C++`, `C#`, `.NET`) still match as whole words.
const TECH_KEYWORDS: &[(&str, &str)] = &[
    ("JavaScript", r"(?i)\bJavaScript\b"),
    ("TypeScript", r"(?i)\bTypeScript\b"),
    ("Python", r"(?i)\bPython\b"),
    ("Java", r"(?i)\bJava\b"),
    ("C#", r"(?i)\bC#"),
    ("C++", r"(?i)\bC\+\+"),
    // Case-sensitive: lowercase "go" is almost always the verb.
    ("Go", r"\bGo\b"),
    ("Rust", r"(?i)\bRust\b"),
    ("Ruby", r"(?i)\bRuby\b"),
    ("PHP", r"(?i)\bPHP\b"),
    ("Swift", r"(?i)\bSwift\b"),
    ("Kotlin", r"(?i)\bKotlin\b"),
    ("React", r"(?i)\bReact\b"),
    ("Vue", r"(?i)\bVue\b"),
    ("Angular", r"(?i)\bAngular\b"),
    ("Next.js", r"(?i)\bNext\.js\b"),
    ("Svelte", r"(?i)\bSvelte\b"),
    ("Tailwind", r"(?i)\bTailwind\b"),
    ("Node.js", r"(?i)\bNode\.js\b"),
    ("Django", r"(?i)\bDjango\b"),
    ("Flask", r"(?i)\bFlask\b"),
    ("Spring", r"(?i)\bSpring\b"),
    ("Express", r"(?i)\bExpress\b"),
    (".NET", r"(?i)\.NET\b"),
    ("Rails", r"(?i)\bRails\b"),
    ("PostgreSQL", r"(?i)\bPostgreSQL\b"),
    ("MySQL", r"(?i)\bMySQL\b"),
    ("MongoDB", r"(?i)\bMongoDB\b"),
    ("Redis", r"(?i)\bRedis\b"),
    ("Elasticsearch", r"(?i)\bElasticsearch\b"),
    ("DynamoDB", r"(?i)\bDynamoDB\b"),
    ("AWS", r"(?i)\bAWS\b"),
    ("Azure", r"(?i)\bAzure\b"),
    ("GCP", r"(?i)\bGCP\b"),
    ("Google Cloud", r"(?i)\bGoogle Cloud\b"),
    ("Kubernetes", r"(?i)\bKubernetes\b"),
    ("Docker", r"(?i)\bDocker\b"),
    ("GraphQL", r"(?i)\bGraphQL\b"),
    ("REST API", r"(?i)\bREST API\b"),
    ("microservices", r"(?i)\bmicroservices\b"),
    ("CI/CD", r"(?i)\bCI/CD\b"),
    ("Git", r"(?i)\bGit\b"),
];

const INTERVIEW_STAGES: &[&str] = &[
    "interview",
    "screening",
    "technical test",
    "take-home",
    "coding challenge",
    "onsite",
    "culture fit",
    "final round",
    "assessment",
    "phone screen",
];

const DIVERSITY_KEYWORDS: &[&str] = &[
    "diversity",
    "inclusion",
    "equal opportunity",
    "eeo",
    "affirmative action",
    "underrepresented",
    "diverse",
    "inclusive",
    "equitable",
];

/// The classifier battery, compiled once and reused across postings.
/// Every method is pure: identical text always yields identical signals.
pub struct SignalExtractor {
    salary_range: Regex,
    salary_single: Regex,
    competitive_salary: Regex,
    remote: Regex,
    hybrid: Regex,
    office: Regex,
    tech: Vec<(&'static str, Regex)>,
}

impl SignalExtractor {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).with_context(|| format!("Invalid classifier pattern: {}", pattern))
        };

        let tech = TECH_KEYWORDS
            .iter()
            .map(|(label, pattern)| Ok((*label, compile(pattern)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            salary_range: compile(SALARY_RANGE_PATTERN)?,
            salary_single: compile(SALARY_SINGLE_PATTERN)?,
            competitive_salary: compile(COMPETITIVE_SALARY_PATTERN)?,
            remote: compile(REMOTE_PATTERN)?,
            hybrid: compile(HYBRID_PATTERN)?,
            office: compile(OFFICE_PATTERN)?,
            tech,
        })
    }

    /// First salary figure found in the text: a numeric range takes priority
    /// over a single amount. "Competitive salary" boilerplate mentions pay
    /// without disclosing it, so it yields no figure.
    pub fn extract_salary(&self, text: &str) -> Option<String> {
        if let Some(found) = self.salary_range.find(text) {
            return Some(found.as_str().trim().to_string());
        }
        if let Some(found) = self.salary_single.find(text) {
            return Some(found.as_str().trim().to_string());
        }
        if self.competitive_salary.is_match(text) {
            return None;
        }
        None
    }

    /// Salary ranges only, used for facts attribution.
    pub fn find_salary_range(&self, text: &str) -> Option<String> {
        self.salary_range
            .find(text)
            .map(|found| found.as_str().trim().to_string())
    }

    /// Benefit categories the posting mentions, at most once each.
    pub fn extract_benefits(&self, text: &str) -> Vec<&'static str> {
        let lower = text.to_lowercase();
        BENEFIT_KEYWORDS
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
            .map(|(category, _)| *category)
            .collect()
    }

    /// Per-posting remote classification: the keyword family with the most
    /// matches wins; a tie or no matches is unclear.
    pub fn classify_remote_policy(&self, text: &str) -> RemotePolicy {
        let remote = self.remote.find_iter(text).count();
        let hybrid = self.hybrid.find_iter(text).count();
        let office = self.office.find_iter(text).count();

        let top = remote.max(hybrid).max(office);
        if top == 0 {
            return RemotePolicy::Unclear;
        }

        let leaders = [remote, hybrid, office]
            .iter()
            .filter(|count| **count == top)
            .count();
        if leaders > 1 {
            return RemotePolicy::Unclear;
        }

        if remote == top {
            RemotePolicy::Remote
        } else if hybrid == top {
            RemotePolicy::Hybrid
        } else {
            RemotePolicy::Office
        }
    }

    /// Technologies mentioned as whole words, in vocabulary order.
    pub fn extract_tech_stack(&self, text: &str) -> Vec<&'static str> {
        self.tech
            .iter()
            .filter(|(_, pattern)| pattern.is_match(text))
            .map(|(label, _)| *label)
            .collect()
    }

    /// Interview-process stages named in the text, in vocabulary order.
    pub fn interview_stages(&self, text: &str) -> Vec<&'static str> {
        let lower = text.to_lowercase();
        INTERVIEW_STAGES
            .iter()
            .filter(|stage| lower.contains(**stage))
            .copied()
            .collect()
    }

    pub fn mentions_diversity(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        DIVERSITY_KEYWORDS
            .iter()
            .any(|keyword| lower.contains(keyword))
    }
}

fn percentage(count: usize, total: usize) -> u32 {
    (count as f64 / total as f64 * 100.0).round() as u32
}

/// The six independently-capped score buckets. Tiers reward breadth of
/// disclosure: a partially transparent employer still scores above an
/// opaque one. Buckets sum to 100, so the result is bounded by construction.
fn readiness_score(
    salary_percentage: u32,
    benefits_percentage: u32,
    remote_mentioned: bool,
    tech_count: usize,
    interview_mentioned: bool,
    stage_count: usize,
    diversity_mentioned: bool,
) -> u8 {
    let mut score = 0u8;

    score += match salary_percentage {
        p if p > 50 => 25,
        p if p > 20 => 15,
        p if p > 0 => 5,
        _ => 0,
    };

    score += match benefits_percentage {
        p if p > 50 => 20,
        p if p > 20 => 12,
        p if p > 0 => 5,
        _ => 0,
    };

    if remote_mentioned {
        score += 15;
    }

    score += match tech_count {
        c if c > 10 => 15,
        c if c > 5 => 10,
        c if c > 0 => 5,
        _ => 0,
    };

    if interview_mentioned && stage_count > 3 {
        score += 15;
    } else if interview_mentioned {
        score += 8;
    }

    if diversity_mentioned {
        score += 10;
    }

    score
}

/// Resolve the employer-level remote policy from per-posting votes.
/// Unclear postings abstain; a tie among the leaders stays unclear.
fn resolve_remote_policy(votes: &[(RemotePolicy, usize)]) -> RemotePolicySummary {
    let top = votes.iter().map(|(_, count)| *count).max().unwrap_or(0);
    if top == 0 {
        return RemotePolicySummary {
            mentioned: false,
            policy: RemotePolicy::Unclear,
        };
    }

    let mut leaders = votes.iter().filter(|(_, count)| *count == top);
    let first = leaders.next().map(|(policy, _)| *policy);
    let policy = match (first, leaders.next()) {
        (Some(policy), None) => policy,
        _ => RemotePolicy::Unclear,
    };

    RemotePolicySummary {
        mentioned: policy != RemotePolicy::Unclear,
        policy,
    }
}

/// Run the classifier battery over a whole batch and aggregate the signals.
pub fn analyse_jobs(extractor: &SignalExtractor, jobs: &[RawJob]) -> JobAnalysis {
    if jobs.is_empty() {
        return JobAnalysis::empty();
    }

    let total = jobs.len();

    let mut salary_count = 0;
    let mut salary_examples: Vec<String> = Vec::new();
    let mut benefits_count = 0;
    let mut benefit_frequency: HashMap<&str, usize> = HashMap::new();
    let mut remote_votes = 0usize;
    let mut hybrid_votes = 0usize;
    let mut office_votes = 0usize;
    let mut tech_stack: Vec<String> = Vec::new();
    let mut departments: BTreeSet<String> = BTreeSet::new();
    let mut locations: BTreeSet<String> = BTreeSet::new();
    let mut interview_mentions = 0;
    let mut stage_union: Vec<String> = Vec::new();
    let mut diversity_count = 0;

    for job in jobs {
        let text = plain_text(&job.description);

        if let Some(salary) = extractor.extract_salary(&text) {
            salary_count += 1;
            if salary_examples.len() < 3 {
                salary_examples.push(salary);
            }
        }

        let benefits = extractor.extract_benefits(&text);
        if !benefits.is_empty() {
            benefits_count += 1;
            for category in benefits {
                *benefit_frequency.entry(category).or_insert(0) += 1;
            }
        }

        match extractor.classify_remote_policy(&text) {
            RemotePolicy::Remote => remote_votes += 1,
            RemotePolicy::Hybrid => hybrid_votes += 1,
            RemotePolicy::Office => office_votes += 1,
            RemotePolicy::Unclear => {}
        }

        for tech in extractor.extract_tech_stack(&text) {
            if !tech_stack.iter().any(|known| known == tech) {
                tech_stack.push(tech.to_string());
            }
        }

        if job.department != DEFAULT_DEPARTMENT {
            departments.insert(job.department.clone());
        }
        if job.location != UNSPECIFIED_LOCATION {
            locations.insert(job.location.clone());
        }

        let stages = extractor.interview_stages(&text);
        if !stages.is_empty() {
            interview_mentions += 1;
            for stage in stages {
                if !stage_union.iter().any(|known| known == stage) {
                    stage_union.push(stage.to_string());
                }
            }
        }

        if extractor.mentions_diversity(&text) {
            diversity_count += 1;
        }
    }

    let mut ranked_benefits: Vec<(&str, usize)> = benefit_frequency.into_iter().collect();
    ranked_benefits.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    let top_benefits: Vec<String> = ranked_benefits
        .into_iter()
        .take(5)
        .map(|(category, _)| category.to_string())
        .collect();

    let remote_policy = resolve_remote_policy(&[
        (RemotePolicy::Remote, remote_votes),
        (RemotePolicy::Hybrid, hybrid_votes),
        (RemotePolicy::Office, office_votes),
    ]);

    let salary_percentage = percentage(salary_count, total);
    let benefits_percentage = percentage(benefits_count, total);

    let ai_readiness_score = readiness_score(
        salary_percentage,
        benefits_percentage,
        remote_policy.mentioned,
        tech_stack.len(),
        interview_mentions > 0,
        stage_union.len(),
        diversity_count > 0,
    );

    JobAnalysis {
        total_jobs: total,
        salary_transparency: SalaryTransparency {
            count: salary_count,
            percentage: salary_percentage,
            examples: salary_examples,
        },
        benefits_mentioned: BenefitsMentioned {
            count: benefits_count,
            percentage: benefits_percentage,
            top_benefits,
        },
        remote_policy,
        tech_stack,
        departments: departments.into_iter().collect(),
        locations: locations.into_iter().collect(),
        interview_process: InterviewProcess {
            mentioned: interview_mentions > 0,
            stages: stage_union,
        },
        diversity_info: DiversityInfo {
            mentioned: diversity_count > 0,
        },
        ai_readiness_score,
    }
}
