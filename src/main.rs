use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use salon_insight::aggregate::{CampaignMetric, DistrictMetric, ServiceMetric};
use salon_insight::config::{Config, ConfigOverrides, SourceKind};
use salon_insight::dataset::{DataSource, FetchReport, FileSource, HttpSource};
use salon_insight::output::csv::{campaigns_to_csv, metrics_to_csv, ranking_to_csv, services_to_csv};
use salon_insight::output::render_json;
use salon_insight::output::table::{
    render_campaigns_table, render_cards_table, render_fetch_report_table, render_metrics_table,
    render_ranking_table, render_recommendations_table, render_services_table,
};
use salon_insight::pipeline::fetch_and_analyze;
use salon_insight::scoring::{Recommendation, SuitabilityScore};
use salon_insight::view::{chart_points, score_cards};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "salon-insight",
    about = "District suitability scoring for salon expansion planning"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum)]
    source: Option<SourceKind>,
    #[arg(short, long = "base-url")]
    base_url: Option<String>,
    #[arg(long)]
    snapshot: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank districts by composite suitability.
    Rank {
        #[arg(long)]
        top: Option<usize>,
    },
    /// Per-district counts and revenue, including the unknown bucket.
    Metrics,
    Services,
    Campaigns,
    Recommend {
        #[arg(long)]
        top: Option<usize>,
    },
    /// Score cards and chart points for the dashboard.
    Cards,
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(config_path.as_path()))?;
    config.apply_overrides(ConfigOverrides {
        source_kind: cli.source,
        base_url: cli.base_url.clone(),
        snapshot_path: cli.snapshot.clone(),
        top_n: match &cli.command {
            Commands::Rank { top } | Commands::Recommend { top } => *top,
            _ => None,
        },
    });

    if let Commands::Config { init, show } = &cli.command {
        return handle_config_command(*init, *show, &config, &config_path);
    }

    let source = build_source(&config)?;
    info!("loading dataset from {}", source.name());
    let scoring = config.scoring_config();
    let top_n = limit(config.report.top_n);
    let (analysis, report) = fetch_and_analyze(source.as_ref(), &scoring, top_n).await;
    report_fetch_failures(&report, cli.output);

    match &cli.command {
        Commands::Rank { .. } => print_ranking(&analysis.ranking, cli.output)?,
        Commands::Metrics => print_metrics(&analysis.metrics, cli.output)?,
        Commands::Services => print_services(&analysis.services, cli.output)?,
        Commands::Campaigns => {
            print_campaigns(&analysis.campaigns, cli.output)?;
            if matches!(cli.output, OutputFormat::Table) {
                println!(
                    "{} appointments ({:.2} revenue) fall outside every campaign window",
                    analysis.uncampaigned.count, analysis.uncampaigned.sum
                );
            }
        }
        Commands::Recommend { .. } => {
            print_recommendations(&analysis.recommendations, cli.output)?
        }
        Commands::Cards => {
            let cards = score_cards(&analysis.ranking);
            match cli.output {
                OutputFormat::Table => println!("{}", render_cards_table(&cards)),
                OutputFormat::Json => {
                    let payload = json!({
                        "cards": cards,
                        "chart": chart_points(&analysis.ranking),
                    });
                    println!("{}", render_json(&payload)?);
                }
                OutputFormat::Csv => {
                    warn!("CSV output for cards not implemented, using JSON");
                    println!("{}", render_json(&cards)?);
                }
            }
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn limit(top_n: usize) -> Option<usize> {
    (top_n > 0).then_some(top_n)
}

fn build_source(config: &Config) -> Result<Box<dyn DataSource>> {
    match config.source.kind {
        SourceKind::Http => {
            let source = HttpSource::new(&config.source)
                .with_context(|| format!("building HTTP source for {}", config.source.base_url))?;
            Ok(Box::new(source))
        }
        SourceKind::File => Ok(Box::new(FileSource::new(config.resolved_snapshot_path()))),
    }
}

fn report_fetch_failures(report: &FetchReport, format: OutputFormat) {
    let failed = report.failed_collections();
    if failed.is_empty() {
        return;
    }
    warn!(
        "{} of {} collections unavailable, results are partial",
        failed.len(),
        report.collections.len()
    );
    if matches!(format, OutputFormat::Table) {
        eprintln!("{}", render_fetch_report_table(report));
    }
}

fn handle_config_command(init: bool, show: bool, config: &Config, config_path: &Path) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn print_ranking(scores: &[SuitabilityScore], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_ranking_table(scores)),
        OutputFormat::Json => println!("{}", render_json(scores)?),
        OutputFormat::Csv => println!("{}", ranking_to_csv(scores)?),
    }
    Ok(())
}

fn print_metrics(metrics: &[DistrictMetric], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_metrics_table(metrics)),
        OutputFormat::Json => println!("{}", render_json(metrics)?),
        OutputFormat::Csv => println!("{}", metrics_to_csv(metrics)?),
    }
    Ok(())
}

fn print_services(services: &[ServiceMetric], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_services_table(services)),
        OutputFormat::Json => println!("{}", render_json(services)?),
        OutputFormat::Csv => println!("{}", services_to_csv(services)?),
    }
    Ok(())
}

fn print_campaigns(campaigns: &[CampaignMetric], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_campaigns_table(campaigns)),
        OutputFormat::Json => println!("{}", render_json(campaigns)?),
        OutputFormat::Csv => println!("{}", campaigns_to_csv(campaigns)?),
    }
    Ok(())
}

fn print_recommendations(items: &[Recommendation], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_recommendations_table(items)),
        OutputFormat::Json => println!("{}", render_json(items)?),
        OutputFormat::Csv => {
            warn!("CSV output for recommend not implemented, using JSON");
            println!("{}", render_json(items)?);
        }
    }
    Ok(())
}
