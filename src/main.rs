//! Luma CLI
//!
//! Command-line interface for the café dashboard:
//! - Print a one-shot summary of the sheet
//! - Inspect how columns were resolved
//! - Check or refresh a running API server
//! - Generate a config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use luma::config::{generate_default_config, Config, LoggingConfig};
use luma::dashboard::{format_count, Dashboard};
use luma::sheet::{CsvSource, Dataset, SheetSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "luma")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live sales dashboard for a small café")]
#[command(long_about = "Luma reads café sales from a Google Sheet or CSV export and\nsummarizes revenue, items sold and best sellers.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: user config dir, /etc/luma, ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the sheet and print the dashboard
    Summary {
        /// Read a local CSV export instead of the configured sheet
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Show which column was matched to each role
    Columns {
        /// Read a local CSV export instead of the configured sheet
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Show the status of a running API server
    Status,

    /// Ask a running API server to refresh now
    Refresh,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    luma::logging::init(&LoggingConfig {
        level: if cli.verbose { "debug" } else { "warn" }.to_string(),
        ..Default::default()
    });

    match &cli.command {
        Commands::Summary { csv } => {
            let config = Config::resolve(cli.config.as_deref())?;
            config.log_origin();
            let dataset = fetch(&config, csv.as_deref()).await?;
            let snapshot = dataset.snapshot();
            let dashboard =
                Dashboard::from_optional(snapshot.as_ref(), &config.display.options());

            match cli.format {
                OutputFormat::Json => {
                    let body = serde_json::json!({
                        "live": snapshot.is_some(),
                        "snapshot": snapshot,
                        "dashboard": dashboard,
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Table => {
                    if snapshot.is_none() {
                        println!("No sales rows found, showing demo data.");
                        println!();
                    }
                    print_dashboard(&dashboard);
                }
            }
        }

        Commands::Columns { csv } => {
            let config = Config::resolve(cli.config.as_deref())?;
            config.log_origin();
            let dataset = fetch(&config, csv.as_deref()).await?;
            let map = dataset.column_map();

            match cli.format {
                OutputFormat::Json => {
                    let body = serde_json::json!({
                        "columns": dataset.columns,
                        "roles": map,
                        "unresolved": map.unresolved(),
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Table => {
                    println!("Detected columns:");
                    for (i, column) in dataset.columns.iter().enumerate() {
                        println!("  {}: {}", i, column);
                    }
                    println!();
                    println!("{:<10} {}", "Role", "Column");
                    println!("{}", "-".repeat(30));
                    for role in luma::Role::ALL {
                        println!("{:<10} {}", role, map.get(role).unwrap_or("(none)"));
                    }
                }
            }
        }

        Commands::Status => {
            let body = api_call(reqwest::Method::GET, &cli.api_url, "/api/v1/status").await?;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&body)?),
                OutputFormat::Table => {
                    println!("Luma v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("Status:    {}", body["message"].as_str().unwrap_or("unknown"));
                    println!("Source:    {}", body["source"].as_str().unwrap_or("unknown"));
                    if let Some(url) = body["sheet_url"].as_str() {
                        println!("Sheet:     {}", url);
                    }
                    println!("Rows:      {}", body["row_count"]);
                    println!(
                        "Refreshed: {}",
                        body["refreshed_at"].as_str().unwrap_or("never")
                    );
                }
            }
        }

        Commands::Refresh => {
            let body = api_call(reqwest::Method::POST, &cli.api_url, "/api/v1/refresh").await?;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&body)?),
                OutputFormat::Table => match body["outcome"].as_str() {
                    Some("committed") => println!(
                        "Refreshed: {} rows in {}ms",
                        body["rows"], body["duration_ms"]
                    ),
                    Some("superseded") => {
                        println!("Superseded by a newer refresh (#{})", body["latest"])
                    }
                    _ => println!(
                        "Refresh failed: {}",
                        body["error"].as_str().unwrap_or("unknown error")
                    ),
                },
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            if let Some(path) = output {
                std::fs::write(path, config)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            } else {
                print!("{}", config);
            }
        }
    }

    Ok(())
}

async fn fetch(config: &Config, csv: Option<&Path>) -> anyhow::Result<Dataset> {
    let source: Arc<dyn SheetSource> = match csv {
        Some(path) => Arc::new(CsvSource::new(path)),
        None => config.sheet.source()?,
    };

    source
        .fetch()
        .await
        .with_context(|| format!("Failed to fetch sales from {}", source.name()))
}

async fn api_call(
    method: reqwest::Method,
    api_url: &str,
    path: &str,
) -> anyhow::Result<serde_json::Value> {
    let url = format!("{}{}", api_url.trim_end_matches('/'), path);
    let response = reqwest::Client::new()
        .request(method, &url)
        .send()
        .await
        .with_context(|| {
            format!(
                "Cannot connect to Luma API at {}\nMake sure the server is running:\n  cargo run --bin luma-api",
                api_url
            )
        })?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        bail!("API returned {}: {}", status, text);
    }

    Ok(response.json().await?)
}

fn print_dashboard(dashboard: &Dashboard) {
    for kpi in &dashboard.kpis {
        if kpi.delta.is_empty() {
            println!("{:<15} {}", kpi.label, kpi.value);
        } else {
            println!("{:<15} {} ({})", kpi.label, kpi.value, kpi.delta);
        }
    }

    println!();
    println!("Item distribution:");
    for point in &dashboard.item_distribution {
        println!("  {:<24} {:>8}", point.name, format_count(point.value));
    }

    println!();
    println!("{:<14} {:>10} {:>12}", "Day", "Items", "Revenue");
    println!("{}", "-".repeat(38));
    for (items, revenue) in dashboard.items_sold.iter().zip(&dashboard.revenue_trend) {
        println!(
            "{:<14} {:>10} {:>12}",
            items.name,
            format_count(items.value),
            format_count(revenue.value)
        );
    }

    if dashboard.daily_summaries.is_empty() {
        return;
    }

    println!();
    println!("Daily summaries:");
    for day in &dashboard.daily_summaries {
        println!(
            "  {:<14} {:>12}  {} items",
            day.label,
            day.revenue_display,
            format_count(day.items_sold)
        );
        for item in &day.top_items {
            println!("      {:<22} {:>6}", item.name, format_count(item.quantity));
        }
    }
}
