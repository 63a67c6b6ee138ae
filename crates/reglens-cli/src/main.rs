mod display;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use reglens_client::http::DEFAULT_BASE_URL;
use reglens_client::{ApiClient, ClientConfig, Dashboard};
use reglens_core::schema::requirement_report;
use reglens_core::stats::severity_breakdown;
use reglens_core::{
    RequirementFilter, RiskLevel, RiskSource, TaskStatus, assess_confidence, categorize, classify,
};

/// Compliance requirements dashboard for the terminal.
#[derive(Parser, Debug)]
#[command(name = "reglens", version, about)]
struct Cli {
    /// Backend base URL including the API prefix.
    #[arg(long, env = "REGLENS_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    api_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "REGLENS_TIMEOUT_SECS", default_value_t = 30, global = true)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse organized requirements by category.
    Groups {
        /// Case-insensitive text search.
        #[arg(long)]
        query: Option<String>,
        /// Only this category.
        #[arg(long)]
        category: Option<String>,
        /// Only this derived risk level (high, medium, low).
        #[arg(long, value_parser = parse_risk)]
        risk: Option<RiskLevel>,
    },
    /// Show requirement clusters with per-requirement confidence.
    Clusters,
    /// Dashboard roll-ups across gap analyses and requirements.
    Stats {
        /// Print the roll-ups as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show the task board. Moves are applied locally and never saved.
    Tasks {
        /// Move a task, e.g. `--move ga_1/task_1=completed`. Repeatable.
        #[arg(long = "move", value_name = "ID=STATUS", value_parser = parse_move)]
        moves: Vec<(String, TaskStatus)>,
    },
    /// Tabular report of every requirement.
    Report,
    /// Upload a document and run the full pipeline.
    Upload {
        /// Document to upload (PDF, DOCX or TXT).
        path: PathBuf,
    },
    /// Classify risk offline from penalty/deadline text or a confidence score.
    Classify {
        #[arg(long)]
        penalty: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long, conflicts_with_all = ["penalty", "deadline"])]
        confidence: Option<f64>,
    },
}

fn parse_risk(s: &str) -> Result<RiskLevel, String> {
    RiskLevel::parse(s).ok_or_else(|| format!("expected high, medium or low, got '{s}'"))
}

fn parse_move(s: &str) -> Result<(String, TaskStatus), String> {
    let (id, status) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=STATUS, got '{s}'"))?;
    let status = TaskStatus::parse(status).map_err(|e| e.to_string())?;
    Ok((id.trim().to_string(), status))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("reglens v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    let client = ApiClient::with_config(ClientConfig {
        base_url: cli.api_url.clone(),
        timeout: Duration::from_secs(cli.timeout_secs),
    })?;
    let dash = Dashboard::new(client);

    match cli.command {
        Command::Groups {
            query,
            category,
            risk,
        } => {
            dash.refresh_groups().await;
            display::print_errors(&dash.errors());

            let filter = RequirementFilter {
                query,
                category,
                risk,
            };
            let all = dash.requirements();
            let shown: Vec<_> = filter.apply(&all).into_iter().cloned().collect();
            display::print_organized_summary(&dash.organized_summary());
            if !filter.is_empty() {
                println!("Showing {} of {} requirements\n", shown.len(), all.len());
            }
            display::print_category_view(&categorize(&shown));
        }
        Command::Clusters => {
            dash.refresh_clusters().await;
            display::print_errors(&dash.errors());
            display::print_clusters(&dash.clusters());
        }
        Command::Stats { json } => {
            dash.refresh_all().await;
            display::print_errors(&dash.errors());

            let stats = dash.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                display::print_stats(
                    &stats,
                    &dash.status_summary(),
                    &severity_breakdown(&dash.analyses()),
                );
                display::print_organized_summary(&dash.organized_summary());
            }
        }
        Command::Tasks { moves } => {
            dash.refresh_analyses().await;
            display::print_errors(&dash.errors());

            for (id, to) in &moves {
                match dash.move_task(id, *to) {
                    Ok(from) => println!("moved {id}: {from} -> {to}"),
                    Err(e) => eprintln!("  skipped: {e}"),
                }
            }
            display::print_board(&dash.task_board());
        }
        Command::Report => {
            dash.refresh_groups().await;
            display::print_errors(&dash.errors());

            let batch = requirement_report(&dash.requirements())?;
            if batch.num_rows() == 0 {
                println!("No requirements loaded.");
            } else {
                arrow::util::pretty::print_batches(&[batch])?;
            }
        }
        Command::Upload { path } => {
            let resp = dash.upload(&path).await?;
            display::print_upload(&resp);
            display::print_category_view(&categorize(&dash.requirements()));
        }
        Command::Classify {
            penalty,
            deadline,
            confidence,
        } => match confidence {
            Some(score) => {
                let (risk, status) = assess_confidence(score);
                println!("risk: {risk}\nstatus: {status}");
            }
            None => {
                let risk = classify(&RiskSource::Text {
                    penalty: penalty.as_deref(),
                    deadline: deadline.as_deref(),
                });
                println!("risk: {risk}");
            }
        },
    }

    Ok(())
}
