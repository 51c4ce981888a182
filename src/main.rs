use analytics::MetricsSummary;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use configuration::{settings::Config, LoggingSettings, Overrides};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use web_server::{ResponseAssembler, TradingData};

/// The main entry point for the Tradescope dashboard backend.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load API keys from a .env file if one is present.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config(&cli.config)?;
    config.apply(&cli.overrides);

    // The guard flushes buffered log lines on exit, so it must outlive the command.
    let _guard = init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve => web_server::run_server(config).await,
        Commands::Summary => handle_summary(&config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Serves a trading bot's log and its performance metrics over HTTP.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. A missing file is not an error;
    /// settings can come entirely from TRADESCOPE__* environment variables.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (GET /api/trading-data).
    Serve,
    /// Fetch the data once and print the metrics summary.
    Summary,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
fn init_tracing(settings: &LoggingSettings) -> anyhow::Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))?;
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    let registry = tracing_subscriber::registry().with(filter);
    if settings.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(writer),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .try_init()?;
    }

    Ok(guard)
}

// ==============================================================================
// Summary Command Logic
// ==============================================================================

/// Runs the same assembly the HTTP endpoint does and prints the result.
async fn handle_summary(config: &Config) -> anyhow::Result<()> {
    let assembler = ResponseAssembler::from_config(config)?;
    let data = assembler.assemble().await.map_err(|e| {
        anyhow::anyhow!("{} ({e})", e.client_message())
    })?;

    println!("{}", render_summary(assembler.source_name(), &data));
    Ok(())
}

fn render_summary(source: &str, data: &TradingData) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    let latest = data
        .trades
        .last()
        .map(|trade| format!("{} {}", trade.timestamp, trade.symbol))
        .unwrap_or_default();

    table.add_row(vec![Cell::new("Source"), Cell::new(source)]);
    table.add_row(vec![Cell::new("Trades returned"), Cell::new(data.trades.len())]);
    table.add_row(vec![Cell::new("Latest trade"), Cell::new(latest)]);
    for (name, value) in metric_rows(&data.metrics) {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn metric_rows(metrics: &MetricsSummary) -> Vec<(&'static str, String)> {
    vec![
        ("Total trades", metrics.total_trades.to_string()),
        ("Win rate", format!("{:.2}%", metrics.win_rate)),
        ("Account value", format!("{:.2}", metrics.account_value)),
        ("Stop loss", format!("{:.2}", metrics.stop_loss)),
        ("Largest win", format!("{:.2}%", metrics.largest_win)),
        ("Largest loss", format!("{:.2}%", metrics.largest_loss)),
        ("Average win", format!("{:.2}%", metrics.average_win)),
        ("Average loss", format!("{:.2}%", metrics.average_loss)),
        ("Profit factor", format!("{:.2}", metrics.profit_factor)),
        ("Sharpe ratio", format!("{:.2}", metrics.sharpe_ratio)),
    ]
}
