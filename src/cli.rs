// src/cli.rs
use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::ats::{AtsDetector, AtsProvider, ClientRegistry};
use crate::audit::Auditor;
use crate::config::AuditConfig;
use crate::report;

#[derive(Parser)]
#[command(name = "roleaudit")]
#[command(about = "Audit an employer's public hiring data for AI readability")]
pub struct AuditCli {
    #[command(subcommand)]
    pub command: AuditCommand,
}

#[derive(Subcommand)]
pub enum AuditCommand {
    /// Run the full pipeline: detect the ATS, fetch postings, analyse, score
    Audit {
        /// Careers page URL (absolute, http or https)
        url: String,
        /// Render the report as markdown instead of JSON
        #[arg(long)]
        markdown: bool,
        /// Render the report as llms.txt instead of JSON
        #[arg(long = "llms-txt")]
        llms_txt: bool,
        /// Override the detection confidence gate
        #[arg(long)]
        min_confidence: Option<f64>,
    },
    /// Detect which ATS serves a careers page
    Detect {
        /// Careers page URL (absolute, http or https)
        url: String,
    },
    /// Fetch normalized postings from one provider board
    Jobs {
        /// Provider slug (greenhouse, lever, ashby, ...)
        provider: String,
        /// Board token identifying the employer on that provider
        board_token: String,
    },
}

pub async fn handle_command(cli: AuditCli) -> Result<()> {
    match cli.command {
        AuditCommand::Audit {
            url,
            markdown,
            llms_txt,
            min_confidence,
        } => {
            let mut config = AuditConfig::load();
            if let Some(min_confidence) = min_confidence {
                config.min_confidence = min_confidence.clamp(0.0, 1.0);
            }

            let auditor = Auditor::new(config)?;
            let report = auditor.run(&url).await;

            if markdown {
                println!("{}", report::render_markdown(&report));
            } else if llms_txt {
                println!("{}", report::render_llms_txt(&report));
            } else {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }

        AuditCommand::Detect { url } => {
            let config = AuditConfig::load();
            let detector = AtsDetector::new(&config)?;
            let detection = detector.detect(&url).await;
            println!("{}", serde_json::to_string_pretty(&detection)?);
        }

        AuditCommand::Jobs {
            provider,
            board_token,
        } => {
            let provider: AtsProvider = provider.parse()?;
            let config = AuditConfig::load();
            let registry = ClientRegistry::new(&config)?;
            let jobs = registry.fetch_jobs(provider, &board_token).await;
            println!("{}", serde_json::to_string_pretty(&jobs)?);
        }
    }

    Ok(())
}
