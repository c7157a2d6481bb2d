//! Chart rendering: impressions over time and revenue by geo

mod canvas;
mod plot;
mod raster;
mod scale;

use crate::data::RecordTable;
use crate::error::{Error, Result, Stage};
use crate::pipeline::OutputPaths;
use chrono::NaiveDateTime;
use plot::Labels;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

const IMPRESSIONS: Labels<'static> = Labels {
    title: "Total Impressions Over Time",
    x: "date",
    y: "total_impressions",
};

const REVENUE: Labels<'static> = Labels {
    title: "Revenue by Geo",
    x: "geo_id",
    y: "total_revenue",
};

/// Render both charts, returning their paths in report order
pub fn render(table: &RecordTable, paths: &OutputPaths) -> Result<Vec<PathBuf>> {
    log::info!("Creating charts");
    let impressions = impressions_over_time(table)?;
    let revenue = revenue_by_geo(table)?;

    let options = raster::svg_options();
    raster::write_png(
        &plot::line_chart(&IMPRESSIONS, &impressions),
        &options,
        plot::WIDTH,
        plot::HEIGHT,
        &paths.impressions_chart,
    )?;
    log::info!(
        "Wrote {} ({} points)",
        paths.impressions_chart.display(),
        impressions.len()
    );

    raster::write_png(
        &plot::bar_chart(&REVENUE, &revenue),
        &options,
        plot::WIDTH,
        plot::HEIGHT,
        &paths.revenue_chart,
    )?;
    log::info!(
        "Wrote {} ({} geos)",
        paths.revenue_chart.display(),
        revenue.len()
    );

    Ok(vec![
        paths.impressions_chart.clone(),
        paths.revenue_chart.clone(),
    ])
}

/// Mean impressions per date, in date order; rows without a date or value are dropped
pub fn impressions_over_time(table: &RecordTable) -> Result<Vec<(NaiveDateTime, f64)>> {
    require(table, &["date", "total_impressions"])?;

    let mut by_date: BTreeMap<NaiveDateTime, (f64, usize)> = BTreeMap::new();
    for record in table.records() {
        if let (Some(date), Some(impressions)) = (record.date, record.total_impressions) {
            let entry = by_date.entry(date).or_insert((0.0, 0));
            entry.0 += impressions;
            entry.1 += 1;
        }
    }
    let dropped = table.len() - by_date.values().map(|(_, n)| n).sum::<usize>();
    if dropped > 0 {
        log::debug!("Dropped {} rows without date or impressions from time series", dropped);
    }

    Ok(by_date
        .into_iter()
        .map(|(date, (total, count))| (date, total / count as f64))
        .collect())
}

/// Revenue summed per geo, ordered by geo key
pub fn revenue_by_geo(table: &RecordTable) -> Result<Vec<(String, f64)>> {
    require(table, &["geo_id", "total_revenue"])?;

    let mut totals: HashMap<&str, f64> = HashMap::new();
    for record in table.records() {
        if let Some(geo) = record.geo_id.as_deref() {
            *totals.entry(geo).or_insert(0.0) += record.total_revenue.unwrap_or(0.0);
        }
    }

    let mut groups: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(geo, revenue)| (geo.to_string(), revenue))
        .collect();
    let numeric = groups.iter().all(|(geo, _)| geo.parse::<f64>().is_ok());
    if numeric {
        groups.sort_by(|a, b| {
            let x: f64 = a.0.parse().unwrap_or_default();
            let y: f64 = b.0.parse().unwrap_or_default();
            x.total_cmp(&y)
        });
    } else {
        groups.sort_by(|a, b| a.0.cmp(&b.0));
    }
    for (geo, revenue) in &groups {
        log::debug!("Geo {}: revenue {:.2}", geo, revenue);
    }
    Ok(groups)
}

fn require(table: &RecordTable, columns: &[&str]) -> Result<()> {
    match table.first_missing(columns) {
        Some(column) => Err(Error::render(
            Stage::Charts,
            format!("required column '{}' is missing", column),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::read_csv;
    use chrono::NaiveDate;

    const HEADER: &str = "date,geo_id,total_impressions,total_revenue";

    fn table(rows: &[&str]) -> RecordTable {
        read_csv(format!("{}\n{}", HEADER, rows.join("\n")).as_bytes()).unwrap()
    }

    #[test]
    fn time_series_drops_missing_dates_and_averages_duplicates() {
        let table = table(&[
            "03/01/2024,A,300,1.0",
            "not-a-date,A,999,1.0",
            "01/01/2024,B,100,1.0",
            "01/01/2024,A,200,1.0",
        ]);

        let series = impressions_over_time(&table).unwrap();
        let day = |d| {
            NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        assert_eq!(series, vec![(day(1), 150.0), (day(3), 300.0)]);
    }

    #[test]
    fn revenue_is_summed_per_geo_in_numeric_order() {
        let table = table(&[
            "01/01/2024,2840,1,10.0",
            "01/01/2024,840,1,20.0",
            "02/01/2024,2840,1,5.0",
            "02/01/2024,,1,7.0",
        ]);

        let groups = revenue_by_geo(&table).unwrap();
        assert_eq!(
            groups,
            vec![("840".to_string(), 20.0), ("2840".to_string(), 15.0)]
        );
    }

    #[test]
    fn text_geo_keys_sort_lexically() {
        let table = table(&["01/01/2024,US,1,1.0", "01/01/2024,DE,1,2.0", "01/01/2024,GB,1,"]);

        let keys: Vec<String> = revenue_by_geo(&table)
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["DE", "GB", "US"]);
    }

    #[test]
    fn missing_group_column_is_render_error() {
        let table = read_csv("date,total_revenue\n01/01/2024,1.0".as_bytes()).unwrap();

        let err = revenue_by_geo(&table).unwrap_err();
        assert_eq!(err.stage(), Stage::Charts);
        assert_eq!(err.to_string(), "charts: required column 'geo_id' is missing");
    }

    #[test]
    fn render_writes_both_pngs() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::in_dir(dir.path());
        let table = table(&["01/01/2024,2840,100,10.0", "02/01/2024,2826,200,20.0"]);

        let figures = render(&table, &paths).unwrap();
        assert_eq!(figures, vec![paths.impressions_chart.clone(), paths.revenue_chart.clone()]);
        for figure in &figures {
            let bytes = std::fs::read(figure).unwrap();
            assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        }
    }

    #[test]
    fn render_fails_when_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::in_dir(&dir.path().join("absent"));
        let table = table(&["01/01/2024,2840,100,10.0"]);

        let err = render(&table, &paths).unwrap_err();
        assert!(matches!(err, Error::Render { stage: Stage::Charts, .. }));
    }
}
