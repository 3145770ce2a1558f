// src/report.rs
//! Render an audit report as markdown or llms.txt for publication.

use crate::audit::AuditReport;

/// Markdown rendering of one audit run.
pub fn render_markdown(report: &AuditReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Hiring data audit".to_string());
    lines.push(String::new());
    lines.push(format!("**Careers page**: {}", report.careers_url));
    match report.provider {
        Some(provider) => lines.push(format!(
            "**ATS**: {} (confidence {:.2})",
            provider, report.confidence
        )),
        None => lines.push("**ATS**: not detected".to_string()),
    }
    if let Some(token) = &report.board_token {
        lines.push(format!("**Board token**: `{}`", token));
    }
    lines.push(format!("**Open postings**: {}", report.job_count));

    let analysis = match &report.analysis {
        Some(analysis) => analysis,
        None => {
            lines.push(String::new());
            lines.push(
                "No job data was available for this employer, so no analysis was produced."
                    .to_string(),
            );
            return lines.join("\n");
        }
    };

    lines.push(format!(
        "**AI readiness score**: {}/100",
        analysis.ai_readiness_score
    ));
    lines.push(String::new());

    lines.push("## Disclosure signals".to_string());
    lines.push(format!(
        "- Salary transparency: {}% of postings ({} of {})",
        analysis.salary_transparency.percentage,
        analysis.salary_transparency.count,
        analysis.total_jobs
    ));
    lines.push(format!(
        "- Benefits mentioned: {}% of postings",
        analysis.benefits_mentioned.percentage
    ));
    lines.push(format!("- Remote policy: {}", analysis.remote_policy.policy));
    lines.push(format!(
        "- Diversity language: {}",
        if analysis.diversity_info.mentioned {
            "present"
        } else {
            "absent"
        }
    ));
    lines.push(String::new());

    if let Some(facts) = &report.facts {
        if !facts.salary_ranges.is_empty() {
            lines.push("## Salary ranges".to_string());
            for range in &facts.salary_ranges {
                lines.push(format!(
                    "- {}: {} (source: {})",
                    range.role, range.range, range.source
                ));
            }
            lines.push(String::new());
        }

        if !facts.benefits.is_empty() {
            lines.push("## Benefits".to_string());
            for benefit in &facts.benefits {
                lines.push(format!("- **{}**: {}", benefit.category, benefit.details));
            }
            lines.push(String::new());
        }

        lines.push("## Work policy".to_string());
        lines.push(facts.work_policy.clone());
        lines.push(String::new());

        if !facts.tech_stack.is_empty() {
            lines.push("## Tech stack".to_string());
            lines.push(facts.tech_stack.join(", "));
            lines.push(String::new());
        }

        lines.push("## Interview process".to_string());
        for stage in &facts.interview_process {
            lines.push(format!("- {}", stage));
        }
        lines.push(String::new());

        if !facts.departments.is_empty() {
            lines.push("## Departments".to_string());
            for department in &facts.departments {
                lines.push(format!(
                    "- {}: {} open role{}",
                    department.name,
                    department.open_roles,
                    if department.open_roles == 1 { "" } else { "s" }
                ));
            }
            lines.push(String::new());
        }

        lines.push("---".to_string());
        lines.push(format!("{} · generated {}", facts.source, facts.last_updated));
    }

    lines.join("\n")
}

/// Dense llms.txt rendering: short declarative lines, one fact per line,
/// suited to retrieval chunking.
pub fn render_llms_txt(report: &AuditReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# Employer hiring facts: {}", report.careers_url));
    match (&report.facts, report.provider) {
        (Some(facts), _) => lines.push(format!("> Source: {}", facts.source)),
        (None, Some(provider)) => {
            lines.push(format!("> Source: {} (no substantial facts extracted)", provider))
        }
        (None, None) => lines.push("> Source: no ATS detected".to_string()),
    }
    lines.push(String::new());

    if let Some(analysis) = &report.analysis {
        lines.push(format!(
            "AI readiness score: {} out of 100.",
            analysis.ai_readiness_score
        ));
        lines.push(format!("Open postings: {}.", report.job_count));
        lines.push(String::new());
    }

    let facts = match &report.facts {
        Some(facts) => facts,
        None => return lines.join("\n"),
    };

    if !facts.salary_ranges.is_empty() {
        lines.push("## Salary ranges".to_string());
        for range in &facts.salary_ranges {
            lines.push(format!("{}: {}.", range.role, range.range));
        }
        lines.push(String::new());
    }

    if !facts.benefits.is_empty() {
        lines.push("## Benefits".to_string());
        for benefit in &facts.benefits {
            lines.push(format!("{}: {}.", benefit.category, benefit.details));
        }
        lines.push(String::new());
    }

    lines.push("## Work policy".to_string());
    lines.push(format!("{}.", facts.work_policy));
    lines.push(String::new());

    if !facts.tech_stack.is_empty() {
        lines.push("## Tech stack".to_string());
        lines.push(format!("Technologies: {}.", facts.tech_stack.join(", ")));
        lines.push(String::new());
    }

    if !facts.departments.is_empty() {
        lines.push("## Departments".to_string());
        for department in &facts.departments {
            lines.push(format!("{}: {} open roles.", department.name, department.open_roles));
        }
        lines.push(String::new());
    }

    lines.push("---".to_string());
    lines.push(format!("Generated: {}", facts.last_updated));

    lines.join("\n")
}
