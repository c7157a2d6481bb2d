//! Axis ticks and value labels

/// Evenly spaced "nice" tick values (1, 2 or 5 × 10ⁿ apart) covering `lo..=hi`
pub fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    let (lo, hi) = if hi > lo {
        (lo, hi)
    } else if lo == 0.0 {
        (0.0, 1.0)
    } else {
        let pad = lo.abs() * 0.1;
        (lo - pad, hi + pad)
    };
    let intervals = target.max(2) - 1;

    let range = nice_number(hi - lo, false);
    let step = nice_number(range / intervals as f64, true);
    let start = (lo / step).floor() * step;
    let end = (hi / step).ceil() * step;
    let count = ((end - start) / step).round() as usize;

    (0..=count).map(|i| start + i as f64 * step).collect()
}

fn nice_number(x: f64, round: bool) -> f64 {
    let exponent = x.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let fraction = x / magnitude;
    let nice = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Short label for an axis value: `950`, `1.5K`, `12M`, `0.25`
pub fn compact_label(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };
    let decimals = if suffix.is_empty() && abs < 10.0 { 2 } else { 1 };
    let formatted = format!("{:.*}", decimals, scaled);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    let trimmed = if trimmed == "-0" { "0" } else { trimmed };
    format!("{}{}", trimmed, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_cover_range_with_round_steps() {
        assert_eq!(nice_ticks(0.0, 35.0, 5), vec![0.0, 10.0, 20.0, 30.0, 40.0]);

        let unit = nice_ticks(0.0, 1.0, 5);
        assert_eq!(unit.len(), 6);
        assert!((unit[1] - 0.2).abs() < 1e-9);
        assert!((unit[5] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ticks_for_large_values() {
        let ticks = nice_ticks(100.0, 300.0, 5);
        assert_eq!(ticks.first(), Some(&100.0));
        assert_eq!(ticks.last(), Some(&300.0));
        assert!(ticks.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn degenerate_range_is_widened() {
        let zero = nice_ticks(0.0, 0.0, 5);
        assert_eq!(zero.first(), Some(&0.0));
        assert!(*zero.last().unwrap() >= 1.0);

        let flat = nice_ticks(200.0, 200.0, 5);
        assert!(flat.first().unwrap() < &200.0);
        assert!(flat.last().unwrap() > &200.0);
    }

    #[test]
    fn compact_labels() {
        assert_eq!(compact_label(0.0), "0");
        assert_eq!(compact_label(0.25), "0.25");
        assert_eq!(compact_label(950.0), "950");
        assert_eq!(compact_label(1500.0), "1.5K");
        assert_eq!(compact_label(12_000_000.0), "12M");
        assert_eq!(compact_label(2_500_000_000.0), "2.5B");
    }
}
