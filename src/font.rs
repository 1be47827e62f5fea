use crate::layout::TextMeasure;
use crate::render::TextRender;
use crate::{BillboardError, Colour, Px};
use ab_glyph::{Font as _, FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::pixelops::interpolate;
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use std::path::Path;

/// A parsed TrueType / OpenType font. Metrics (advances, ascent, descent) are
/// read through [owned_ttf_parser] so that measuring a string and drawing it
/// advance the pen by exactly the same amounts; glyph outlines are rasterized
/// with [ab_glyph].
///
/// A `Font` has no intrinsic size. Use [Font::sized] to obtain a handle that
/// can measure and draw at a given pixel size.
pub struct Font {
    pub face: OwnedFace,
    outlines: FontVec,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed. Only the first face of a collection is used
    pub fn load(bytes: Vec<u8>) -> Result<Font, BillboardError> {
        let face = OwnedFace::from_vec(bytes.clone(), 0)?;
        let outlines = FontVec::try_from_vec(bytes)?;

        Ok(Font { face, outlines })
    }

    /// Read and parse a font file
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Font, BillboardError> {
        let bytes = std::fs::read(path.as_ref())?;
        Font::load(bytes)
    }

    /// Obtain the full name of the font, if it has one
    pub fn name(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
    }

    /// Obtain the family name of the font, if it has one
    pub fn family(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
    }

    fn name_entry(&self, id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Obtain the weight of the font (400 is regular, 700 is bold)
    pub fn weight(&self) -> u16 {
        self.face.as_face_ref().weight().to_number()
    }

    fn scaling(&self, size: Px) -> Px {
        size / self.face.as_face_ref().units_per_em() as f32
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Px) -> Px {
        self.scaling(size) * self.face.as_face_ref().ascender() as f32
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Px) -> Px {
        self.scaling(size) * self.face.as_face_ref().descender() as f32
    }

    /// Calculate the leading (extra space between lines) for the given font size
    pub fn leading(&self, size: Px) -> Px {
        self.scaling(size) * self.face.as_face_ref().line_gap() as f32
    }

    /// Calculate the natural line height of the font for the given size. Billboard layout
    /// uses a fixed `1.2 × size` spacing instead; this is reported for diagnostics
    pub fn line_height(&self, size: Px) -> Px {
        self.leading(size) + self.ascent(size) - self.descent(size)
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(ch).map(|i| i.0)
    }

    pub fn replacement_glyph_id(&self) -> Option<u16> {
        self.face.as_face_ref().glyph_index('\u{FFFD}').map(|i| i.0)
    }

    /// The glyph used to draw `ch`: its own glyph, else the replacement character,
    /// else a question mark, else `.notdef`
    fn glyph_or_fallback(&self, ch: char) -> GlyphId {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
            .unwrap_or(GlyphId(0))
    }

    fn advance(&self, gid: GlyphId, size: Px) -> Px {
        self.scaling(size) * self.face.as_face_ref().glyph_hor_advance(gid).unwrap_or_default() as f32
    }

    /// Calculate the width of a given string of text at the given font size
    pub fn width_of_text(&self, text: &str, size: Px) -> Px {
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| self.advance(self.glyph_or_fallback(ch), size))
            .sum()
    }

    /// Bind the font to a pixel size (the em size, as in CSS `font-size`)
    pub fn sized(&self, size: Px) -> SizedFont<'_> {
        SizedFont { font: self, size }
    }

    /// ab_glyph scales by ascent-to-descent height, not by em, so convert
    fn px_scale(&self, size: Px) -> PxScale {
        let upem = self
            .outlines
            .units_per_em()
            .unwrap_or(self.face.as_face_ref().units_per_em() as f32);
        PxScale::from(size.0 * self.outlines.height_unscaled() / upem)
    }

    /// Draws `text` with its top-left (ascender line) corner at `origin`, blending
    /// glyph coverage over the existing canvas pixels. Glyphs entirely off the
    /// canvas are not rasterized and stray pixels of the rest are clipped.
    fn draw(&self, canvas: &mut RgbImage, origin: (i32, i32), size: Px, text: &str, colour: Colour) {
        let scale = self.px_scale(size);
        let baseline = origin.1 as f32 + self.ascent(size).0;
        let fill: Rgb<u8> = colour.into();
        let (width, height) = (canvas.width() as i32, canvas.height() as i32);

        let mut pen = Px(origin.0 as f32);
        for ch in text.chars().filter(|ch| !ch.is_control()) {
            let gid = self.glyph_or_fallback(ch);
            let glyph = ab_glyph::GlyphId(gid.0)
                .with_scale_and_position(scale, ab_glyph::point(pen.0, baseline));

            let outlined = self.outlines.outline_glyph(glyph).filter(|outlined| {
                let bounds = outlined.px_bounds();
                bounds.max.x > 0.0
                    && bounds.max.y > 0.0
                    && bounds.min.x < width as f32
                    && bounds.min.y < height as f32
            });
            if let Some(outlined) = outlined {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let x = bounds.min.x as i32 + gx as i32;
                    let y = bounds.min.y as i32 + gy as i32;
                    if x < 0 || y < 0 || x >= width || y >= height || coverage <= 0.0 {
                        return;
                    }
                    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                    *pixel = interpolate(fill, *pixel, coverage.min(1.0));
                });
            }

            pen += self.advance(gid, size);
        }
    }
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.name())
            .field("weight", &self.weight())
            .finish()
    }
}

/// A [Font] bound to a pixel size; the measure / draw handle consumed by layout
/// and rendering
#[derive(Debug, Clone, Copy)]
pub struct SizedFont<'f> {
    pub font: &'f Font,
    pub size: Px,
}

impl TextMeasure for SizedFont<'_> {
    fn text_width(&self, text: &str) -> Px {
        self.font.width_of_text(text, self.size)
    }
}

impl TextRender for SizedFont<'_> {
    fn draw_text(&self, canvas: &mut RgbImage, origin: (i32, i32), text: &str, colour: Colour) {
        self.font.draw(canvas, origin, self.size, text, colour);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colours;

    // Tests that need real outlines use whatever common system font is installed
    // and are skipped otherwise.
    fn system_font() -> Option<Font> {
        [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
            "/Library/Fonts/Arial.ttf",
            "C:\\Windows\\Fonts\\arialbd.ttf",
        ]
        .iter()
        .find_map(|path| Font::load_from_path(path).ok())
    }

    #[test]
    fn rejects_non_font_bytes() {
        assert!(matches!(
            Font::load(b"definitely not a font".to_vec()),
            Err(BillboardError::FaceParsing(_))
        ));
    }

    #[test]
    fn width_is_sum_of_parts() {
        let Some(font) = system_font() else { return };
        let size = Px(40.0);
        let whole = font.width_of_text("HELLO WORLD", size);
        let parts = font.width_of_text("HELLO", size)
            + font.width_of_text(" ", size)
            + font.width_of_text("WORLD", size);
        assert!((whole.0 - parts.0).abs() < 0.001);
        assert!(whole > Px::ZERO);
    }

    #[test]
    fn width_scales_linearly_with_size() {
        let Some(font) = system_font() else { return };
        let small = font.width_of_text("BILLBOARD", Px(20.0));
        let large = font.width_of_text("BILLBOARD", Px(40.0));
        assert!((large.0 - 2.0 * small.0).abs() < 0.01);
    }

    #[test]
    fn drawing_touches_pixels_near_origin() {
        let Some(font) = system_font() else { return };
        let mut canvas = RgbImage::from_pixel(200, 80, colours::BLACK.into());
        font.sized(Px(40.0))
            .draw_text(&mut canvas, (10, 10), "HI", colours::WHITE);

        let lit: Vec<(u32, u32)> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [0, 0, 0])
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|&(x, y)| x >= 10 && y >= 10));
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let Some(font) = system_font() else { return };
        let mut canvas = RgbImage::from_pixel(20, 20, colours::BLACK.into());
        font.sized(Px(40.0))
            .draw_text(&mut canvas, (-500, -500), "OFF", colours::WHITE);
        assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn far_off_canvas_lines_are_not_rasterized() {
        let Some(font) = system_font() else { return };
        let mut canvas = RgbImage::from_pixel(100, 100, colours::BLACK.into());
        let sized = font.sized(crate::layout::MAX_FONT_SIZE);
        let text = "W".repeat(200);

        let started = std::time::Instant::now();
        for origin in [(-10_000_000, 0), (1_000, 0), (0, 100_000), (0, -100_000)] {
            sized.draw_text(&mut canvas, origin, &text, colours::WHITE);
        }
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
        assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0]));
    }
}
