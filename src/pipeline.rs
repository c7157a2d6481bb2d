//! The end-to-end run: load, compute, narrate, chart, assemble

use crate::error::Result;
use crate::narrative::NarrativeService;
use crate::{charts, data, metrics, narrative, report};
use std::path::{Path, PathBuf};

pub const IMPRESSIONS_CHART: &str = "impressions_over_time.png";
pub const REVENUE_CHART: &str = "revenue_by_geo.png";
pub const REPORT_FILE: &str = "ADTech_Report.pdf";

/// Where a run writes its artifacts; existing files are overwritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub impressions_chart: PathBuf,
    pub revenue_chart: PathBuf,
    pub report: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        OutputPaths {
            impressions_chart: dir.join(IMPRESSIONS_CHART),
            revenue_chart: dir.join(REVENUE_CHART),
            report: dir.join(REPORT_FILE),
        }
    }
}

pub struct Pipeline<N> {
    narrator: N,
    outputs: OutputPaths,
}

impl<N: NarrativeService> Pipeline<N> {
    pub fn new(narrator: N, outputs: OutputPaths) -> Self {
        Pipeline { narrator, outputs }
    }

    /// Run every stage against `input`, returning the report path
    pub fn run(&self, input: &Path) -> Result<PathBuf> {
        let table = data::load(input)?;
        let insights = metrics::compute(&table)?;
        let summary = narrative::generate(&self.narrator, &insights)?;
        let figures = charts::render(&table, &self.outputs)?;
        report::assemble(&insights, &summary, &figures, &self.outputs.report)?;
        Ok(self.outputs.report.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Stage};
    use std::cell::Cell;
    use std::fs;

    const CAMPAIGN: &str = "\
date,geo_id,total_impressions,total_revenue,revenue_share_percent,viewable_impressions,measurable_impressions
01/02/2024,2840,100,10.0,50,80,100
02/02/2024,2826,200,20.0,60,150,200
03/02/2024,2840,300,5.0,40,100,150
";

    struct Fixed {
        calls: Cell<usize>,
    }

    impl NarrativeService for Fixed {
        fn complete(&self, _prompt: &str) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok("Impressions reached **600** across two geos.\n\nRevenue was steady.".to_string())
        }
    }

    struct Unavailable;

    impl NarrativeService for Unavailable {
        fn complete(&self, _prompt: &str) -> Result<String> {
            Err(Error::NarrativeService("connection refused".to_string()))
        }
    }

    #[test]
    fn run_writes_every_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("campaign.csv");
        fs::write(&input, CAMPAIGN).unwrap();

        let pipeline = Pipeline::new(
            Fixed {
                calls: Cell::new(0),
            },
            OutputPaths::in_dir(dir.path()),
        );
        let report = pipeline.run(&input).unwrap();

        assert_eq!(report, dir.path().join(REPORT_FILE));
        assert!(fs::read(&report).unwrap().starts_with(b"%PDF"));
        assert!(dir.path().join(IMPRESSIONS_CHART).exists());
        assert!(dir.path().join(REVENUE_CHART).exists());
        assert_eq!(pipeline.narrator.calls.get(), 1);
    }

    #[test]
    fn rerun_overwrites_with_same_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("campaign.csv");
        fs::write(&input, CAMPAIGN).unwrap();
        let pipeline = Pipeline::new(
            Fixed {
                calls: Cell::new(0),
            },
            OutputPaths::in_dir(dir.path()),
        );

        let first = pipeline.run(&input).unwrap();
        let metrics_before = metrics::compute(&data::load(&input).unwrap()).unwrap();
        let second = pipeline.run(&input).unwrap();
        let metrics_after = metrics::compute(&data::load(&input).unwrap()).unwrap();

        assert_eq!(first, second);
        assert_eq!(metrics_before, metrics_after);
        assert_eq!(pipeline.narrator.calls.get(), 2);
        let pdfs = fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .is_ok_and(|e| e.path().extension().is_some_and(|x| x == "pdf"))
            })
            .count();
        assert_eq!(pdfs, 1);
    }

    #[test]
    fn narrative_failure_stops_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("campaign.csv");
        fs::write(&input, CAMPAIGN).unwrap();
        let outputs = OutputPaths::in_dir(dir.path());

        let err = Pipeline::new(Unavailable, outputs.clone())
            .run(&input)
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Narrative);
        assert!(!outputs.impressions_chart.exists());
        assert!(!outputs.report.exists());
    }

    #[test]
    fn missing_input_fails_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let err = Pipeline::new(Unavailable, OutputPaths::in_dir(dir.path()))
            .run(&dir.path().join("absent.csv"))
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Load);
    }
}
