//! Flow layout of paragraphs and figures onto US Letter pages using the
//! standard Helvetica faces.

use super::markup::{self, Span, Word};
use printpdf::font::BuiltinFont;
use printpdf::xobject::XObjectTransform;
use printpdf::{Mm, Op, PdfPage, Pt, TextItem, TextMatrix, XObjectId};

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 72.0;
pub const FRAME_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub size: f32,
    pub leading: f32,
    pub align: Align,
    /// Render every run bold regardless of markup
    pub bold: bool,
    pub space_after: f32,
}

pub const TITLE: Style = Style {
    size: 20.0,
    leading: 24.0,
    align: Align::Center,
    bold: true,
    space_after: 6.0,
};

pub const HEADING: Style = Style {
    size: 14.0,
    leading: 18.0,
    align: Align::Left,
    bold: true,
    space_after: 6.0,
};

pub const BODY: Style = Style {
    size: 10.0,
    leading: 13.0,
    align: Align::Left,
    bold: false,
    space_after: 6.0,
};

// Advance widths in 1/1000 em for ASCII 32..=126, from the Adobe core font metrics.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn font(bold: bool) -> BuiltinFont {
    if bold {
        BuiltinFont::HelveticaBold
    } else {
        BuiltinFont::Helvetica
    }
}

/// Width of `text` in points; characters outside the table count as a digit
pub fn text_width(text: &str, bold: bool, size: f32) -> f32 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    let units: u32 = text
        .chars()
        .map(|c| {
            (c as usize)
                .checked_sub(32)
                .and_then(|i| table.get(i))
                .copied()
                .unwrap_or(556) as u32
        })
        .sum();
    units as f32 * size / 1000.0
}

/// One laid-out line of styled runs
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub runs: Vec<Span>,
    pub width: f32,
}

impl Line {
    fn empty() -> Self {
        Line {
            runs: Vec::new(),
            width: 0.0,
        }
    }

    fn push(&mut self, text: &str, bold: bool, size: f32) {
        self.width += text_width(text, bold, size);
        match self.runs.last_mut() {
            Some(run) if run.bold == bold => run.text.push_str(text),
            _ => self.runs.push(Span {
                text: text.to_string(),
                bold,
            }),
        }
    }
}

fn word_width(word: &Word, style: &Style) -> f32 {
    word.iter()
        .map(|f| text_width(&f.text, f.bold || style.bold, style.size))
        .sum()
}

/// Greedy line breaking; a word wider than `max_width` gets a line to itself
pub fn wrap(words: &[Word], style: &Style, max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::empty();

    for word in words {
        let width = word_width(word, style);
        if !line.runs.is_empty() {
            let gap_bold = style.bold || line.runs.last().is_some_and(|r| r.bold);
            let gap = text_width(" ", gap_bold, style.size);
            if line.width + gap + width > max_width {
                lines.push(std::mem::replace(&mut line, Line::empty()));
            } else {
                line.push(" ", gap_bold, style.size);
            }
        }
        for fragment in word {
            line.push(&fragment.text, fragment.bold || style.bold, style.size);
        }
    }
    if !line.runs.is_empty() {
        lines.push(line);
    }
    lines
}

/// Places content top to bottom inside the page frame, breaking pages as needed
pub struct PageFlow {
    pages: Vec<Vec<Op>>,
    ops: Vec<Op>,
    /// Distance from the top edge of the page to the next free position
    cursor: f32,
}

impl Default for PageFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFlow {
    pub fn new() -> Self {
        PageFlow {
            pages: Vec::new(),
            ops: Vec::new(),
            cursor: MARGIN,
        }
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= MARGIN
    }

    fn remaining(&self) -> f32 {
        PAGE_HEIGHT - MARGIN - self.cursor
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.cursor = MARGIN;
    }

    fn reserve(&mut self, height: f32) {
        if height > self.remaining() && !self.at_page_top() {
            self.break_page();
        }
    }

    /// Lay out one paragraph of inline markup
    pub fn paragraph(&mut self, text: &str, style: &Style) {
        let words = markup::words(&markup::parse_inline(text));
        if words.is_empty() {
            return;
        }
        for line in wrap(&words, style, FRAME_WIDTH) {
            self.reserve(style.leading);
            let x = match style.align {
                Align::Left => MARGIN,
                Align::Center => MARGIN + ((FRAME_WIDTH - line.width) / 2.0).max(0.0),
            };
            let baseline = PAGE_HEIGHT - self.cursor - style.size;
            self.write_line(&line, x, baseline, style.size);
            self.cursor += style.leading;
        }
        self.space(style.space_after);
    }

    fn write_line(&mut self, line: &Line, x: f32, y: f32, size: f32) {
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextMatrix {
            matrix: TextMatrix::Translate(Pt(x), Pt(y)),
        });
        for run in &line.runs {
            let font = font(run.bold);
            self.ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(size),
                font,
            });
            self.ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(run.text.clone())],
                font,
            });
        }
        self.ops.push(Op::EndTextSection);
    }

    /// Vertical gap; a gap that runs off the page is dropped rather than carried over
    pub fn space(&mut self, height: f32) {
        if self.at_page_top() {
            return;
        }
        if height >= self.remaining() {
            self.break_page();
        } else {
            self.cursor += height;
        }
    }

    /// Draw a `pixels`-sized image scaled to `width` x `height` points, centred in the frame
    pub fn image(&mut self, id: XObjectId, pixels: (u32, u32), width: f32, height: f32) {
        self.reserve(height);
        let x = MARGIN + (FRAME_WIDTH - width) / 2.0;
        let y = PAGE_HEIGHT - self.cursor - height;
        let transform = XObjectTransform {
            translate_x: Some(Pt(x)),
            translate_y: Some(Pt(y)),
            scale_x: Some(width / pixels.0.max(1) as f32),
            scale_y: Some(height / pixels.1.max(1) as f32),
            rotate: None,
            dpi: Some(72.0),
        };
        self.ops.push(Op::UseXobject { id, transform });
        self.cursor += height;
    }

    /// Images placed so far, across all pages
    pub fn image_count(&self) -> usize {
        self.pages
            .iter()
            .flatten()
            .chain(&self.ops)
            .filter(|op| matches!(op, Op::UseXobject { .. }))
            .count()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(!self.ops.is_empty())
    }

    pub fn finish(mut self) -> Vec<PdfPage> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.break_page();
        }
        let width: Mm = Pt(PAGE_WIDTH).into();
        let height: Mm = Pt(PAGE_HEIGHT).into();
        self.pages
            .into_iter()
            .map(|ops| PdfPage::new(width, height, ops))
            .collect()
    }
}
