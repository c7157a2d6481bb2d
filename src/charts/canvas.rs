//! Minimal SVG document builder for the report charts

use std::fmt::Write;

const FONT_FAMILY: &str = "DejaVu Sans, Liberation Sans, Arial, Helvetica, sans-serif";

pub const INK: &str = "#262626";
pub const MUTED: &str = "#595959";
pub const GRID: &str = "#e5e5e5";
pub const ACCENT: &str = "#1f77b4";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Rectangle of the canvas that data is drawn into
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Vertical pixel position of `value` on a `lo..hi` axis
    pub fn y_for(&self, value: f64, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return self.bottom();
        }
        self.bottom() - (value - lo) / (hi - lo) * self.height
    }
}

pub struct Canvas {
    svg: String,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns='http://www.w3.org/2000/svg' width='{w}' height='{h}' viewBox='0 0 {w} {h}'>",
            w = width,
            h = height
        );
        let _ = writeln!(svg, "  <rect width='{}' height='{}' fill='#ffffff'/>", width, height);
        Canvas { svg }
    }

    pub fn text(&mut self, x: f64, y: f64, size: f64, anchor: Anchor, fill: &str, text: &str) {
        let _ = writeln!(
            self.svg,
            "  <text x='{:.2}' y='{:.2}' text-anchor='{}' fill='{}' font-family='{}' font-size='{}'>{}</text>",
            x,
            y,
            anchor.as_str(),
            fill,
            FONT_FAMILY,
            size,
            escape_text(text)
        );
    }

    /// Muted tick label rotated `degrees` clockwise around its anchor point
    pub fn rotated_text(&mut self, x: f64, y: f64, degrees: f64, size: f64, anchor: Anchor, text: &str) {
        let _ = writeln!(
            self.svg,
            "  <text x='{x:.2}' y='{y:.2}' transform='rotate({degrees} {x:.2} {y:.2})' text-anchor='{}' fill='{}' font-family='{}' font-size='{}'>{}</text>",
            anchor.as_str(),
            MUTED,
            FONT_FAMILY,
            size,
            escape_text(text)
        );
    }

    pub fn bold_text(&mut self, x: f64, y: f64, size: f64, text: &str) {
        let _ = writeln!(
            self.svg,
            "  <text x='{:.2}' y='{:.2}' text-anchor='middle' fill='{}' font-family='{}' font-size='{}' font-weight='700'>{}</text>",
            x,
            y,
            INK,
            FONT_FAMILY,
            size,
            escape_text(text)
        );
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
        let _ = writeln!(
            self.svg,
            "  <line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' stroke='{}' stroke-width='{}'/>",
            x1, y1, x2, y2, stroke, width
        );
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: &str, width: f64) {
        let coords = points
            .iter()
            .map(|(x, y)| format!("{:.2},{:.2}", x, y))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            self.svg,
            "  <polyline points='{}' fill='none' stroke='{}' stroke-width='{}' stroke-linejoin='round' stroke-linecap='round'/>",
            coords, stroke, width
        );
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str) {
        let _ = writeln!(
            self.svg,
            "  <circle cx='{:.2}' cy='{:.2}' r='{}' fill='{}'/>",
            cx, cy, r, fill
        );
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str) {
        let _ = writeln!(
            self.svg,
            "  <rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' fill='{}'/>",
            x, y, width, height, fill
        );
    }

    pub fn finish(mut self) -> String {
        self.svg.push_str("</svg>\n");
        self.svg
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}
