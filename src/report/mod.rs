//! PDF report assembly

mod layout;
mod markup;

use crate::error::{Error, Result, Stage};
use crate::metrics::Insights;
use layout::PageFlow;
use printpdf::image::RawImage;
use printpdf::xobject::XObject;
use printpdf::{PdfDocument, PdfSaveOptions, XObjectId};
use std::fs;
use std::path::{Path, PathBuf};

pub const TITLE: &str = "AD-Tech Performance Report";

const SECTION_GAP: f32 = 12.0;
const FIGURE_WIDTH: f32 = 400.0;
const FIGURE_HEIGHT: f32 = 240.0;

/// Write the report to `path`: summary, key metrics, then each figure in order
pub fn assemble(insights: &Insights, narrative: &str, figures: &[PathBuf], path: &Path) -> Result<()> {
    log::info!("Generating PDF report");
    let mut doc = PdfDocument::new(TITLE);
    let flow = compose(&mut doc, insights, narrative, figures)?;

    log::debug!(
        "Report laid out on {} page(s) with {} figure(s)",
        flow.page_count(),
        flow.image_count()
    );
    doc.pages.extend(flow.finish());

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        log::debug!("PDF writer reported {} warning(s)", warnings.len());
    }
    fs::write(path, bytes).map_err(|err| {
        Error::render(
            Stage::Report,
            format!("cannot write {}: {}", path.display(), err),
        )
    })?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Lay out every section, registering each figure as an image on `doc`
fn compose(
    doc: &mut PdfDocument,
    insights: &Insights,
    narrative: &str,
    figures: &[PathBuf],
) -> Result<PageFlow> {
    let mut flow = PageFlow::new();

    flow.paragraph(TITLE, &layout::TITLE);
    flow.space(SECTION_GAP);

    flow.paragraph("Executive Summary", &layout::HEADING);
    for paragraph in markup::paragraphs(narrative) {
        flow.paragraph(&paragraph, &layout::BODY);
    }
    flow.space(SECTION_GAP);

    flow.paragraph("Key Metrics", &layout::HEADING);
    for (label, value) in insights.entries() {
        flow.paragraph(&format!("<b>{}:</b> {}", label, value), &layout::BODY);
    }
    flow.space(SECTION_GAP);

    flow.paragraph("Visual Insights", &layout::HEADING);
    for figure in figures {
        let bytes = fs::read(figure).map_err(|err| {
            Error::render(
                Stage::Report,
                format!("cannot read figure {}: {}", figure.display(), err),
            )
        })?;
        let mut warnings = Vec::new();
        let image = RawImage::decode_from_bytes(&bytes, &mut warnings).map_err(|err| {
            Error::render(
                Stage::Report,
                format!("cannot decode figure {}: {}", figure.display(), err),
            )
        })?;
        let pixels = (image.width as u32, image.height as u32);
        let id = XObjectId::new();
        doc.resources
            .xobjects
            .map
            .insert(id.clone(), XObject::Image(image));
        flow.image(id, pixels, FIGURE_WIDTH, FIGURE_HEIGHT);
        flow.space(SECTION_GAP);
    }

    Ok(flow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Insights;
    use std::fs::File;
    use std::io::BufWriter;

    fn insights() -> Insights {
        Insights {
            total_impressions: 600,
            total_revenue: 35.0,
            average_revenue_share: 50.0,
            total_viewable_impressions: 220,
            total_measurable_impressions: 300,
            viewability_rate: 73.33333333333333,
        }
    }

    fn write_png(path: &Path) {
        let file = File::create(path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), 4, 2);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[200u8; 4 * 2 * 4]).unwrap();
        writer.finish().unwrap();
    }

    fn position(haystack: &[u8], needle: &str) -> usize {
        haystack
            .windows(needle.len())
            .position(|w| w == needle.as_bytes())
            .unwrap_or_else(|| panic!("{:?} not found in PDF", needle))
    }

    #[test]
    fn writes_sections_in_report_order() {
        let dir = tempfile::tempdir().unwrap();
        let figures = vec![dir.path().join("a.png"), dir.path().join("b.png")];
        for figure in &figures {
            write_png(figure);
        }
        let out = dir.path().join("report.pdf");

        let narrative = "Impressions <b>rose</b> \u{2014} steadily.\n\nRevenue held.";
        assemble(&insights(), narrative, &figures, &out).unwrap();

        let bytes = fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let order = [
            position(&bytes, TITLE),
            position(&bytes, "Executive Summary"),
            position(&bytes, "Revenue held."),
            position(&bytes, "Key Metrics"),
            position(&bytes, "Total Impressions:"),
            position(&bytes, "Total Revenue:"),
            position(&bytes, "Visual Insights"),
        ];
        assert!(order.windows(2).all(|pair| pair[0] < pair[1]), "sections out of order: {:?}", order);
    }

    #[test]
    fn places_one_image_per_figure() {
        let dir = tempfile::tempdir().unwrap();
        let figures = vec![dir.path().join("a.png"), dir.path().join("b.png")];
        for figure in &figures {
            write_png(figure);
        }

        let mut doc = PdfDocument::new(TITLE);
        let flow = compose(&mut doc, &insights(), "Summary.", &figures).unwrap();
        assert_eq!(flow.image_count(), 2);
        assert_eq!(doc.resources.xobjects.map.len(), 2);
    }

    #[test]
    fn writes_pdf_without_narrative_or_figures() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.pdf");

        assemble(&insights(), "", &[], &out).unwrap();
        assert!(fs::read(&out).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn missing_figure_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.pdf");

        let err = assemble(&insights(), "ok", &[dir.path().join("absent.png")], &out).unwrap_err();
        assert_eq!(err.stage(), Stage::Report);
        assert!(!out.exists());
    }

    #[test]
    fn unwritable_destination_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing").join("report.pdf");

        let err = assemble(&insights(), "ok", &[], &out).unwrap_err();
        assert!(matches!(err, Error::Render { stage: Stage::Report, .. }));
    }
}
