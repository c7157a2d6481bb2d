use clap::{Parser, Subcommand};

mod charts;
mod cmd;
mod data;
mod error;
mod metrics;
mod narrative;
mod pipeline;
mod report;

#[derive(Parser, Debug)]
#[command(name = "adreport", version, about = "AdTech performance reports from CSV exports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute metrics, request a narrative, draw charts and write the PDF report
    Report(cmd::report::ReportCommand),
    /// Print the six headline metrics for a file
    Metrics(cmd::metrics::MetricsCommand),
    /// Print the expected input format
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    match cli.command {
        Command::Report(report) => report.exec(),
        Command::Metrics(metrics) => metrics.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}

fn init_logging() {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            builder.filter_module("adreport", log::LevelFilter::Info);
        }
    }
    builder.init();
}
