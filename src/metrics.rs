//! Aggregate metrics over the loaded table

use crate::data::{AdRecord, RecordTable};
use crate::error::{Error, Result, Stage};
use serde::Serialize;
use std::fmt;

/// Columns the metrics are computed from
pub const METRIC_COLUMNS: &[&str] = &[
    "total_impressions",
    "total_revenue",
    "revenue_share_percent",
    "viewable_impressions",
    "measurable_impressions",
];

/// The six headline metrics of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    #[serde(rename = "Total Impressions")]
    pub total_impressions: i64,
    #[serde(rename = "Total Revenue")]
    pub total_revenue: f64,
    #[serde(rename = "Average Revenue Share %")]
    pub average_revenue_share: f64,
    #[serde(rename = "Total Viewable Impressions")]
    pub total_viewable_impressions: i64,
    #[serde(rename = "Total Measurable Impressions")]
    pub total_measurable_impressions: i64,
    #[serde(rename = "Viewability Rate (%)")]
    pub viewability_rate: f64,
}

/// A metric value as it is displayed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Count(i64),
    Amount(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Amount(x) => write!(f, "{:.2}", x),
        }
    }
}

impl Insights {
    /// Labelled values in report order
    pub fn entries(&self) -> [(&'static str, MetricValue); 6] {
        [
            ("Total Impressions", MetricValue::Count(self.total_impressions)),
            ("Total Revenue", MetricValue::Amount(self.total_revenue)),
            (
                "Average Revenue Share %",
                MetricValue::Amount(self.average_revenue_share),
            ),
            (
                "Total Viewable Impressions",
                MetricValue::Count(self.total_viewable_impressions),
            ),
            (
                "Total Measurable Impressions",
                MetricValue::Count(self.total_measurable_impressions),
            ),
            ("Viewability Rate (%)", MetricValue::Amount(self.viewability_rate)),
        ]
    }
}

/// Reduce the table to [`Insights`].
///
/// Missing cells are skipped. The viewability rate divides by
/// `max(measurable, 1)` so a table with no measurable impressions reports 0.
pub fn compute(table: &RecordTable) -> Result<Insights> {
    log::info!("Computing insights over {} rows", table.len());
    if let Some(column) = table.first_missing(METRIC_COLUMNS) {
        return Err(Error::Schema {
            stage: Stage::Metrics,
            column: column.to_string(),
        });
    }

    let records = table.records();
    let impressions = sum(records, |r| r.total_impressions);
    let revenue = sum(records, |r| r.total_revenue);
    let revenue_share = mean(records, |r| r.revenue_share_percent);
    let viewable = sum(records, |r| r.viewable_impressions);
    let measurable = sum(records, |r| r.measurable_impressions);

    let insights = Insights {
        total_impressions: impressions as i64,
        total_revenue: revenue,
        average_revenue_share: revenue_share,
        total_viewable_impressions: viewable as i64,
        total_measurable_impressions: measurable as i64,
        viewability_rate: viewable / measurable.max(1.0) * 100.0,
    };
    log::debug!("Insights: {:?}", insights);
    Ok(insights)
}

fn sum<F>(records: &[AdRecord], field: F) -> f64
where
    F: Fn(&AdRecord) -> Option<f64>,
{
    records.iter().filter_map(field).sum()
}

/// Mean of the present values; NaN when there are none
fn mean<F>(records: &[AdRecord], field: F) -> f64
where
    F: Fn(&AdRecord) -> Option<f64>,
{
    let (total, count) = records
        .iter()
        .filter_map(field)
        .fold((0.0, 0usize), |(total, count), v| (total + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        total / count as f64
    }
}
