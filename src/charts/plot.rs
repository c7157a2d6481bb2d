//! SVG line and bar charts

use super::canvas::{Anchor, Canvas, PlotArea, ACCENT, GRID, INK, MUTED};
use super::scale::{compact_label, nice_ticks};
use chrono::{NaiveDateTime, Timelike};

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 400;

const AREA: PlotArea = PlotArea {
    left: 80.0,
    top: 48.0,
    width: 690.0,
    height: 250.0,
};

const MAX_X_LABELS: usize = 10;
const MAX_MARKERS: usize = 60;
const LABEL_SIZE: f64 = 11.0;

/// tab10, as used by the usual plotting defaults
const PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Axis titles and chart heading
pub struct Labels<'a> {
    pub title: &'a str,
    pub x: &'a str,
    pub y: &'a str,
}

/// Line chart of `points`, which must be sorted by time
pub fn line_chart(labels: &Labels, points: &[(NaiveDateTime, f64)]) -> String {
    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        frame(&mut canvas, labels, &nice_ticks(0.0, 0.0, 5));
        no_data(&mut canvas);
        return canvas.finish();
    };

    let lo = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let hi = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let ticks = nice_ticks(lo, hi, 5);
    let (axis_lo, axis_hi) = axis_bounds(&ticks);
    frame(&mut canvas, labels, &ticks);

    let start = first.0.and_utc().timestamp();
    let span = (last.0.and_utc().timestamp() - start) as f64;
    let x_for = |t: &NaiveDateTime| {
        if span <= 0.0 {
            AREA.left + AREA.width / 2.0
        } else {
            AREA.left + (t.and_utc().timestamp() - start) as f64 / span * AREA.width
        }
    };

    let coords: Vec<(f64, f64)> = points
        .iter()
        .map(|(t, v)| (x_for(t), AREA.y_for(*v, axis_lo, axis_hi)))
        .collect();
    canvas.polyline(&coords, ACCENT, 2.0);
    if coords.len() <= MAX_MARKERS {
        for (x, y) in &coords {
            canvas.circle(*x, *y, 3.0, ACCENT);
        }
    }

    let with_time = points.iter().any(|(t, _)| t.num_seconds_from_midnight() != 0);
    for i in label_indices(points.len()) {
        let (t, _) = &points[i];
        let label = if with_time {
            t.format("%Y-%m-%d %H:%M").to_string()
        } else {
            t.format("%Y-%m-%d").to_string()
        };
        let x = x_for(t);
        canvas.line(x, AREA.bottom(), x, AREA.bottom() + 5.0, INK, 1.0);
        canvas.rotated_text(x, AREA.bottom() + 16.0, -45.0, 11.0, Anchor::End, &label);
    }

    canvas.finish()
}

/// Bar chart with one bar per `(category, value)`, in the given order
pub fn bar_chart(labels: &Labels, bars: &[(String, f64)]) -> String {
    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    if bars.is_empty() {
        frame(&mut canvas, labels, &nice_ticks(0.0, 0.0, 5));
        no_data(&mut canvas);
        return canvas.finish();
    }

    let lo = bars.iter().map(|b| b.1).fold(0.0, f64::min);
    let hi = bars.iter().map(|b| b.1).fold(0.0, f64::max);
    let ticks = nice_ticks(lo, hi, 5);
    let (axis_lo, axis_hi) = axis_bounds(&ticks);
    frame(&mut canvas, labels, &ticks);

    let slot = AREA.width / bars.len() as f64;
    let bar_width = slot * 0.8;
    let baseline = AREA.y_for(0.0, axis_lo, axis_hi);
    for (i, (_, value)) in bars.iter().enumerate() {
        let x = AREA.left + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = AREA.y_for(*value, axis_lo, axis_hi);
        canvas.rect(x, y.min(baseline), bar_width, (baseline - y).abs(), PALETTE[i % PALETTE.len()]);
    }
    canvas.line(AREA.left, baseline, AREA.right(), baseline, INK, 1.0);

    let rotate = bars.len() > 12;
    for i in bar_label_indices(bars.len(), slot) {
        let centre = AREA.left + (i as f64 + 0.5) * slot;
        let category = &bars[i].0;
        if rotate {
            canvas.rotated_text(centre, AREA.bottom() + 16.0, -45.0, LABEL_SIZE, Anchor::End, category);
        } else {
            canvas.text(centre, AREA.bottom() + 18.0, LABEL_SIZE, Anchor::Middle, MUTED, category);
        }
    }

    canvas.finish()
}

/// Title, horizontal grid with value labels, axes and axis titles
fn frame(canvas: &mut Canvas, labels: &Labels, ticks: &[f64]) {
    let (lo, hi) = axis_bounds(ticks);
    canvas.bold_text(f64::from(WIDTH) / 2.0, 28.0, 16.0, labels.title);

    for tick in ticks {
        let y = AREA.y_for(*tick, lo, hi);
        canvas.line(AREA.left, y, AREA.right(), y, GRID, 1.0);
        canvas.text(AREA.left - 8.0, y + 4.0, 11.0, Anchor::End, MUTED, &compact_label(*tick));
    }
    canvas.line(AREA.left, AREA.top, AREA.left, AREA.bottom(), INK, 1.0);
    canvas.line(AREA.left, AREA.bottom(), AREA.right(), AREA.bottom(), INK, 1.0);

    canvas.text(
        AREA.left + AREA.width / 2.0,
        f64::from(HEIGHT) - 8.0,
        12.0,
        Anchor::Middle,
        INK,
        labels.x,
    );
    let y_mid = AREA.top + AREA.height / 2.0;
    canvas.rotated_text(22.0, y_mid, -90.0, 12.0, Anchor::Middle, labels.y);
}

fn no_data(canvas: &mut Canvas) {
    canvas.text(
        AREA.left + AREA.width / 2.0,
        AREA.top + AREA.height / 2.0,
        14.0,
        Anchor::Middle,
        MUTED,
        "No data",
    );
}

fn axis_bounds(ticks: &[f64]) -> (f64, f64) {
    match (ticks.first(), ticks.last()) {
        (Some(lo), Some(hi)) => (*lo, *hi),
        _ => (0.0, 1.0),
    }
}

/// At most `MAX_X_LABELS` evenly spread indices, always including the first
fn label_indices(len: usize) -> impl Iterator<Item = usize> {
    let step = len.div_ceil(MAX_X_LABELS).max(1);
    (0..len).step_by(step)
}

/// Every bar is labelled unless the slots get narrower than the label text is tall
fn bar_label_indices(len: usize, slot: f64) -> impl Iterator<Item = usize> {
    let step = (LABEL_SIZE / slot).ceil().max(1.0) as usize;
    (0..len).step_by(step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const LABELS: Labels<'static> = Labels {
        title: "Total Impressions Over Time",
        x: "date",
        y: "total_impressions",
    };

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn line_chart_plots_every_point_with_date_labels() {
        let svg = line_chart(&LABELS, &[(day(1), 100.0), (day(2), 200.0), (day(3), 300.0)]);
        assert!(svg.contains("Total Impressions Over Time"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains(">2024-01-02</text>"));
        assert!(svg.contains("rotate(-45"));
    }

    #[test]
    fn empty_series_renders_placeholder() {
        let svg = line_chart(&LABELS, &[]);
        assert!(svg.contains("No data"));
        assert!(!svg.contains("<polyline"));

        let svg = bar_chart(&LABELS, &[]);
        assert!(svg.contains("No data"));
    }

    #[test]
    fn bar_chart_draws_one_bar_per_category() {
        let bars = vec![("2826".to_string(), 20.0), ("2840".to_string(), 15.0)];
        let svg = bar_chart(
            &Labels {
                title: "Revenue by Geo",
                x: "geo_id",
                y: "total_revenue",
            },
            &bars,
        );
        // background plus two bars
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains(">2826</text>"));
        assert!(svg.contains(">2840</text>"));
    }

    #[test]
    fn every_geo_bar_is_labelled() {
        let bars: Vec<(String, f64)> = (0..30).map(|i| (format!("G{:02}", i), i as f64)).collect();
        let svg = bar_chart(
            &Labels {
                title: "Revenue by Geo",
                x: "geo_id",
                y: "total_revenue",
            },
            &bars,
        );
        for (geo, _) in &bars {
            assert!(svg.contains(&format!(">{}</text>", geo)), "no label for {}", geo);
        }

        let twelve: Vec<(String, f64)> = (0..12).map(|i| (format!("{}", 100 + i), 1.0)).collect();
        let svg = bar_chart(&LABELS, &twelve);
        assert!(twelve.iter().all(|(geo, _)| svg.contains(&format!(">{}</text>", geo))));
    }

    #[test]
    fn bar_labels_thin_only_when_slots_are_narrow() {
        assert_eq!(bar_label_indices(50, 13.8).count(), 50);
        let dense: Vec<_> = bar_label_indices(300, 2.3).collect();
        assert_eq!(dense[..3], [0, 5, 10]);
    }

    #[test]
    fn label_indices_are_thinned() {
        assert_eq!(label_indices(3).collect::<Vec<_>>(), vec![0, 1, 2]);
        let many: Vec<_> = label_indices(95).collect();
        assert!(many.len() <= MAX_X_LABELS);
        assert_eq!(many[0], 0);
    }
}
