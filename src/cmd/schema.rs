//! Schema command - print the expected input format

use crate::data::AdRecord;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for one input row
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(AdRecord);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => {
                let names: Vec<&str> = CSV_FIELDS.iter().map(|(name, _)| *name).collect();
                println!("{}", names.join(","));
            }
            SchemaFormat::CsvFields => print_csv_fields(),
        }
        Ok(())
    }
}

fn print_csv_fields() {
    println!("CSV Input Format");
    println!("================");
    println!();
    for (name, description) in CSV_FIELDS {
        println!("{:24}  {}", name, description);
    }
    println!();
    println!("Dates are read day-first: 03/01/2024 is 3 January 2024.");
    println!("Empty numeric cells are skipped; extra columns are ignored.");
}

const CSV_FIELDS: &[(&str, &str)] = &[
    ("date", "Reporting date, DD/MM/YYYY or YYYY-MM-DD (unparseable values are dropped from the time series)"),
    ("geo_id", "Geography identifier, revenue is grouped by it"),
    ("total_impressions", "Impressions served"),
    ("total_revenue", "Revenue earned"),
    ("revenue_share_percent", "Revenue share in percent, averaged"),
    ("viewable_impressions", "Impressions meeting the viewability standard"),
    ("measurable_impressions", "Impressions where viewability could be measured"),
];
