// src/main.rs
use anyhow::{bail, Context, Result};
use avg_down::config::{AppConfig, SourceKind};
use avg_down::connectors::http::HttpPageProvider;
use avg_down::connectors::snapshot::SnapshotFileProvider;
use avg_down::connectors::traits::PageDataProvider;
use avg_down::report::{render_scan, render_sized, render_sizing, scan_json, SizedPosition};
use avg_down::{Holding, PositionFilter, ScanReport, ShareSizingCalculator, SizingResult};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use rust_decimal::Decimal;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "avg-down",
    about = "Size an averaging-down purchase or scan for positions past a loss limit"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (extension optional)
    #[arg(short, long, default_value = "Settings")]
    config: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Size a purchase from manually entered figures
    Calc {
        #[arg(long)]
        price: f64,
        #[arg(long)]
        avg_cost: f64,
        #[arg(long)]
        shares: f64,
        /// Target loss percent after the purchase (0 = break even)
        #[arg(long)]
        target: Option<Decimal>,
    },
    /// Size a purchase for a holding read from the page data source
    Size {
        #[arg(short, long)]
        symbol: String,
        #[arg(long)]
        target: Option<Decimal>,
    },
    /// List positions whose loss is beyond the threshold
    Scan {
        #[arg(long)]
        threshold: Option<Decimal>,
        /// Also size every flagged position, using the threshold as the target
        #[arg(long)]
        size: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&cli.config).context("failed to load settings")?;
    let _log_guard = avg_down::logging::init(&config.log)?;

    // 2. Dispatch
    match cli.command {
        Commands::Calc {
            price,
            avg_cost,
            shares,
            target,
        } => {
            let holding = Holding::from_f64(price, avg_cost, shares)?;
            let target = target.unwrap_or(config.target_loss_percent);
            let result = ShareSizingCalculator::compute(&holding, target)?;
            print_sizing(&result, cli.json)?;
        }
        Commands::Size { symbol, target } => {
            let provider = build_provider(&config)?;
            let target = target.unwrap_or(config.target_loss_percent);
            let result = size_symbol(provider.as_ref(), &symbol, target).await?;
            print_sizing(&result, cli.json)?;
        }
        Commands::Scan { threshold, size } => {
            let provider = build_provider(&config)?;
            let threshold = threshold.unwrap_or(config.monitor_threshold_percent);
            let entries = provider
                .fetch_positions()
                .await
                .context("could not read positions from the page")?;
            let report = PositionFilter::scan(&entries, threshold)?;
            info!(
                "Scan finished: {} flagged, {} skipped",
                report.flagged.len(),
                report.skipped.len()
            );

            let mut sized = Vec::new();
            if size {
                // Sequential: one request in flight at a time.
                for position in &report.flagged {
                    let outcome = size_symbol(provider.as_ref(), &position.ticker, threshold)
                        .await
                        .map_err(|e| format!("{:#}", e));
                    if let Err(e) = &outcome {
                        error!("Could not size {}: {}", position.ticker, e);
                    }
                    sized.push(SizedPosition {
                        ticker: position.ticker.clone(),
                        outcome,
                    });
                }
            }
            print_scan(&report, &sized, cli.json)?;
        }
    }

    Ok(())
}

fn build_provider(config: &AppConfig) -> Result<Box<dyn PageDataProvider>> {
    let source = &config.source;
    match source.kind {
        SourceKind::Snapshot => {
            info!("Using page snapshot {}", source.snapshot_path);
            Ok(Box::new(SnapshotFileProvider::new(&source.snapshot_path)))
        }
        SourceKind::Http => {
            let Some(base_url) = source.base_url.as_deref() else {
                bail!("source.base_url must be set for the http source");
            };
            info!("Using page bridge at {}", base_url);
            Ok(Box::new(HttpPageProvider::new(base_url, source.timeout_secs)?))
        }
    }
}

async fn size_symbol(
    provider: &dyn PageDataProvider,
    symbol: &str,
    target: Decimal,
) -> Result<SizingResult> {
    let raw = provider
        .fetch_holding(symbol)
        .await
        .with_context(|| format!("could not read the {} position page", symbol))?;
    let holding = raw.into_holding()?;
    Ok(ShareSizingCalculator::compute(&holding, target)?)
}

fn print_sizing(result: &SizingResult, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!("{}", render_sizing(result));
    }
    Ok(())
}

fn print_scan(report: &ScanReport, sized: &[SizedPosition], as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&scan_json(report, sized))?);
    } else {
        print!("{}{}", render_scan(report), render_sized(sized));
    }
    Ok(())
}
