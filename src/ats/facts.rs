// src/ats/facts.rs
//! Reshape an analysis plus the raw postings into the presentation-agnostic
//! facts record, with every published figure traceable to its source posting.

use std::collections::HashMap;

use chrono::Utc;

use super::analyse::SignalExtractor;
use super::text::plain_text;
use super::types::{
    BenefitFact, DepartmentCount, GeneratedFacts, JobAnalysis, RawJob, RemotePolicy, SalaryRange,
};
use super::AtsProvider;

const MAX_TECHNOLOGIES: usize = 15;

/// Human-readable descriptions for the benefit taxonomy.
const BENEFIT_DESCRIPTIONS: &[(&str, &str)] = &[
    ("healthcare", "Comprehensive health, dental, and vision insurance"),
    ("pension", "Retirement savings plan with employer contributions"),
    ("equity", "Employee stock options or equity ownership"),
    ("flexible", "Flexible working hours and work-life balance support"),
    ("remote", "Remote work options available"),
    ("pto", "Generous paid time off policy"),
    ("learning", "Professional development and learning budget"),
    ("parental", "Extended parental leave for all parents"),
    ("wellbeing", "Mental health and wellness support programs"),
    ("meals", "Free meals and snacks provided"),
];

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Re-scan individual postings for literal salary ranges so each published
/// figure carries its source posting.
fn extract_salary_ranges(extractor: &SignalExtractor, jobs: &[RawJob]) -> Vec<SalaryRange> {
    jobs.iter()
        .filter_map(|job| {
            let text = plain_text(&job.description);
            extractor.find_salary_range(&text).map(|range| SalaryRange {
                role: job.title.clone(),
                range,
                source: format!("{} job posting", job.title),
            })
        })
        .collect()
}

/// Map benefit-category tokens to readable sentences. Unknown categories
/// degrade to a generic sentence instead of being dropped.
fn benefits_list(analysis: &JobAnalysis) -> Vec<BenefitFact> {
    analysis
        .benefits_mentioned
        .top_benefits
        .iter()
        .map(|category| {
            let details = BENEFIT_DESCRIPTIONS
                .iter()
                .find(|(token, _)| token == category)
                .map(|(_, description)| description.to_string())
                .unwrap_or_else(|| format!("{} benefits mentioned", category));
            BenefitFact {
                category: capitalize(category),
                details,
            }
        })
        .collect()
}

fn work_policy_sentence(analysis: &JobAnalysis) -> String {
    if !analysis.remote_policy.mentioned {
        return "Work policy not clearly specified in job postings".to_string();
    }

    match analysis.remote_policy.policy {
        RemotePolicy::Remote => "Fully remote positions available".to_string(),
        RemotePolicy::Hybrid => {
            "Hybrid working model with a mix of remote and office-based work".to_string()
        }
        RemotePolicy::Office => "Office-based roles with an in-person collaboration focus".to_string(),
        RemotePolicy::Unclear => {
            "Work policy varies by role; check individual job postings".to_string()
        }
    }
}

fn interview_process_labels(analysis: &JobAnalysis) -> Vec<String> {
    if !analysis.interview_process.mentioned {
        return vec!["Interview process not specified in job postings".to_string()];
    }

    analysis
        .interview_process
        .stages
        .iter()
        .map(|stage| capitalize(stage))
        .collect()
}

fn department_counts(jobs: &[RawJob]) -> Vec<DepartmentCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for job in jobs {
        *counts.entry(job.department.as_str()).or_insert(0) += 1;
    }

    let mut departments: Vec<DepartmentCount> = counts
        .into_iter()
        .map(|(name, open_roles)| DepartmentCount {
            name: name.to_string(),
            open_roles,
        })
        .collect();
    departments.sort_by(|a, b| b.open_roles.cmp(&a.open_roles).then(a.name.cmp(&b.name)));
    departments
}

/// Build the facts record for one audit run.
pub fn generate_facts(
    extractor: &SignalExtractor,
    jobs: &[RawJob],
    analysis: &JobAnalysis,
    provider: AtsProvider,
) -> GeneratedFacts {
    GeneratedFacts {
        salary_ranges: extract_salary_ranges(extractor, jobs),
        benefits: benefits_list(analysis),
        tech_stack: analysis
            .tech_stack
            .iter()
            .take(MAX_TECHNOLOGIES)
            .cloned()
            .collect(),
        work_policy: work_policy_sentence(analysis),
        interview_process: interview_process_labels(analysis),
        departments: department_counts(jobs),
        last_updated: Utc::now().to_rfc3339(),
        source: format!("Extracted from {} job postings", provider.label()),
    }
}

/// Whether the record is rich enough to be worth displaying, so consumers
/// can suppress a near-empty report.
pub fn has_substantial_facts(facts: &GeneratedFacts) -> bool {
    !facts.salary_ranges.is_empty()
        || facts.benefits.len() >= 3
        || facts.tech_stack.len() >= 5
        || facts.departments.len() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ats::analyse::analyse_jobs;
    use crate::ats::types::{BenefitsMentioned, DEFAULT_DEPARTMENT, UNSPECIFIED_LOCATION};

    fn extractor() -> SignalExtractor {
        SignalExtractor::new().unwrap()
    }

    fn job(title: &str, department: &str, description: &str) -> RawJob {
        RawJob {
            id: "1".to_string(),
            title: title.to_string(),
            location: UNSPECIFIED_LOCATION.to_string(),
            department: department.to_string(),
            description: description.to_string(),
            url: "https://example.com/jobs/1".to_string(),
            source: AtsProvider::Lever,
        }
    }

    #[test]
    fn test_salary_ranges_carry_posting_attribution() {
        let ex = extractor();
        let jobs = vec![
            job(
                "Backend Engineer",
                "Engineering",
                "<p>We pay £50,000 - £65,000</p>",
            ),
            job("Designer", "Design", "No salary details"),
        ];
        let analysis = analyse_jobs(&ex, &jobs);
        let facts = generate_facts(&ex, &jobs, &analysis, AtsProvider::Lever);

        assert_eq!(facts.salary_ranges.len(), 1);
        assert_eq!(facts.salary_ranges[0].role, "Backend Engineer");
        assert_eq!(facts.salary_ranges[0].range, "£50,000 - £65,000");
        assert_eq!(facts.salary_ranges[0].source, "Backend Engineer job posting");
        assert_eq!(facts.source, "Extracted from Lever job postings");
    }

    #[test]
    fn test_unknown_benefit_category_degrades_gracefully() {
        let mut analysis = analyse_jobs(&extractor(), &[]);
        analysis.benefits_mentioned = BenefitsMentioned {
            count: 1,
            percentage: 100,
            top_benefits: vec!["pension".to_string(), "commute".to_string()],
        };

        let benefits = benefits_list(&analysis);
        assert_eq!(benefits[0].category, "Pension");
        assert_eq!(
            benefits[0].details,
            "Retirement savings plan with employer contributions"
        );
        assert_eq!(benefits[1].category, "Commute");
        assert_eq!(benefits[1].details, "commute benefits mentioned");
    }

    #[test]
    fn test_work_policy_sentences() {
        let ex = extractor();

        let remote_jobs = vec![job("Engineer", DEFAULT_DEPARTMENT, "Fully remote role")];
        let analysis = analyse_jobs(&ex, &remote_jobs);
        assert_eq!(work_policy_sentence(&analysis), "Fully remote positions available");

        let silent_jobs = vec![job("Engineer", DEFAULT_DEPARTMENT, "No policy")];
        let analysis = analyse_jobs(&ex, &silent_jobs);
        assert_eq!(
            work_policy_sentence(&analysis),
            "Work policy not clearly specified in job postings"
        );
    }

    #[test]
    fn test_interview_placeholder_when_unmentioned() {
        let ex = extractor();
        let jobs = vec![job("Engineer", DEFAULT_DEPARTMENT, "Nothing here")];
        let analysis = analyse_jobs(&ex, &jobs);
        let labels = interview_process_labels(&analysis);
        assert_eq!(labels, vec!["Interview process not specified in job postings"]);

        let jobs = vec![job(
            "Engineer",
            DEFAULT_DEPARTMENT,
            "Phone screen then onsite interview",
        )];
        let analysis = analyse_jobs(&ex, &jobs);
        let labels = interview_process_labels(&analysis);
        assert!(labels.contains(&"Onsite".to_string()));
        assert!(labels.contains(&"Phone screen".to_string()));
    }

    #[test]
    fn test_departments_sorted_by_head_count() {
        let jobs = vec![
            job("A", "Engineering", ""),
            job("B", "Engineering", ""),
            job("C", "Design", ""),
            job("D", DEFAULT_DEPARTMENT, ""),
        ];
        let departments = department_counts(&jobs);

        assert_eq!(departments[0].name, "Engineering");
        assert_eq!(departments[0].open_roles, 2);
        assert_eq!(departments[1].name, "Design");
        assert_eq!(departments[2].name, DEFAULT_DEPARTMENT);
    }

    #[test]
    fn test_substantiality_gate() {
        let ex = extractor();
        let empty_jobs: Vec<RawJob> = Vec::new();
        let analysis = analyse_jobs(&ex, &empty_jobs);
        let mut facts = generate_facts(&ex, &empty_jobs, &analysis, AtsProvider::Greenhouse);
        // Interview placeholder aside, nothing substantial is present.
        assert!(!has_substantial_facts(&facts));

        facts.salary_ranges.push(SalaryRange {
            role: "Engineer".to_string(),
            range: "£50,000 - £60,000".to_string(),
            source: "Engineer job posting".to_string(),
        });
        assert!(has_substantial_facts(&facts));

        facts.salary_ranges.clear();
        facts.benefits = vec![
            BenefitFact { category: "Pension".into(), details: "x".into() },
            BenefitFact { category: "Healthcare".into(), details: "x".into() },
            BenefitFact { category: "Equity".into(), details: "x".into() },
        ];
        assert!(has_substantial_facts(&facts));

        facts.benefits.clear();
        facts.tech_stack = vec!["Rust".into(), "Go".into(), "AWS".into(), "Docker".into(), "React".into()];
        assert!(has_substantial_facts(&facts));

        facts.tech_stack.clear();
        facts.departments = vec![
            DepartmentCount { name: "Engineering".into(), open_roles: 2 },
            DepartmentCount { name: "Design".into(), open_roles: 1 },
        ];
        assert!(has_substantial_facts(&facts));
    }
}
