use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use iso_duration::{evaluate, DurationReport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "isodur")]
#[command(about = "Evaluate ISO 8601 durations against a reference instant")]
#[command(version)]
struct Cli {
    /// ISO 8601 duration (e.g., "P1Y2M3DT4H5M6S", "-P1DT2H", "PT1.5H")
    #[arg(allow_hyphen_values = true)]
    duration: String,

    /// Reference instant as RFC 3339 [default: now]
    #[arg(long, env = "ISODUR_REFERENCE")]
    reference: Option<String>,

    /// IANA timezone used for calendar arithmetic
    #[arg(long, env = "ISODUR_TIMEZONE", default_value = "UTC")]
    timezone: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Seconds)]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Signed total seconds
    Seconds,
    /// e.g. "1 day, 2 hours"
    Human,
    /// Full report as JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let reference = cli
        .reference
        .clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339());
    tracing::debug!(%reference, timezone = %cli.timezone, duration = %cli.duration, "evaluating");

    let report = evaluate(&reference, &cli.duration, &cli.timezone)
        .with_context(|| format!("cannot evaluate duration '{}'", cli.duration))?;
    tracing::debug!(
        adjusted = %report.adjusted_local,
        total_seconds = report.elapsed.total_seconds,
        "evaluated"
    );

    println!("{}", render(&report, cli.format)?);
    Ok(())
}

fn render(report: &DurationReport, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Seconds => report.elapsed.total_seconds.to_string(),
        OutputFormat::Human => report.elapsed.human_readable.clone(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("failed to serialize report")?
        }
    })
}
