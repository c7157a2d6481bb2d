//! Report command - run the whole pipeline and write the PDF

use crate::narrative::{GeminiClient, NarrativeConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::pipeline::{OutputPaths, Pipeline};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct ReportCommand {
    /// CSV file of ad performance rows
    input: PathBuf,

    /// Directory the charts and report are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Generative Language API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model used for the executive summary
    #[arg(long, env = "ADREPORT_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the Generative Language API
    #[arg(long, env = "ADREPORT_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Seconds to wait for the narrative before giving up
    #[arg(long, env = "ADREPORT_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,

    /// Open the finished report with the system viewer
    #[arg(long)]
    open: bool,
}

impl ReportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = self.narrative_config()?;
        log::debug!("{:?}", config);

        let outputs = OutputPaths::in_dir(&self.output_dir);
        let pipeline = Pipeline::new(GeminiClient::new(config), outputs);
        let report = pipeline
            .run(&self.input)
            .inspect_err(|err| log::error!("Run stopped in the {} stage", err.stage()))
            .with_context(|| format!("report generation failed for {}", self.input.display()))?;

        println!("Report written to: {}", report.display());
        if self.open {
            opener::open(&report)?;
        }
        Ok(())
    }

    fn narrative_config(&self) -> anyhow::Result<NarrativeConfig> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .context("no API key: set GEMINI_API_KEY or pass --api-key")?;
        let mut config = NarrativeConfig::new(api_key);
        config.model = self.model.clone();
        config.api_base = self.api_base.clone();
        config.timeout = Duration::from_secs(self.timeout_secs);
        Ok(config)
    }
}
