use crate::error::{Error, Result, Stage};
use png::{BitDepth, ColorType, Encoder};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tiny_skia::{Pixmap, Transform};
use usvg::{Options, Tree};

/// Rasterize `svg` and write it to `path` as an RGBA PNG, replacing any existing file
pub fn write_png(svg: &str, options: &Options, width: u32, height: u32, path: &Path) -> Result<()> {
    let tree = Tree::from_data(svg.as_bytes(), options)
        .map_err(|err| Error::render(Stage::Charts, format!("SVG parse failed: {err}")))?;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| Error::render(Stage::Charts, "pixmap allocation failed"))?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    let write_failed =
        |err: &dyn std::fmt::Display| Error::render(Stage::Charts, format!("cannot write {}: {}", path.display(), err));

    let file = File::create(path).map_err(|err| write_failed(&err))?;
    let mut encoder = Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(|err| write_failed(&err))?;
    writer
        .write_image_data(pixmap.data())
        .map_err(|err| write_failed(&err))?;
    writer.finish().map_err(|err| write_failed(&err))?;
    Ok(())
}

/// SVG options with the system fonts loaded, shared across charts in a run
pub fn svg_options() -> Options<'static> {
    let mut options = Options::default();
    options.fontdb_mut().load_system_fonts();
    log::debug!("Loaded {} system font faces", options.fontdb.len());
    if !has_fonts(&options) {
        log::warn!("No system fonts found; chart titles and axis labels will be missing");
    }
    options
}

/// Without any font face usvg drops every text node, so titles and axis labels vanish
fn has_fonts(options: &Options) -> bool {
    options.fontdb.faces().next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_font_database_is_detected() {
        assert!(!has_fonts(&Options::default()));
    }
}
