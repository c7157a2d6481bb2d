//! Metrics command - load a file and print the six insights

use crate::{data, metrics};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct MetricsCommand {
    /// CSV file of ad performance rows
    input: PathBuf,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    label: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

impl MetricsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let table = data::load(&self.input)?;
        let insights = metrics::compute(&table)
            .with_context(|| format!("cannot compute metrics for {}", self.input.display()))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&insights)?);
        } else {
            let rows: Vec<MetricRow> = insights
                .entries()
                .into_iter()
                .map(|(label, value)| MetricRow {
                    label,
                    value: value.to_string(),
                })
                .collect();
            let table = Table::new(rows)
                .with(Style::rounded())
                .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
        }
        Ok(())
    }
}
