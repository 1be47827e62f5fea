use billboard::image::{Rgb, RgbImage};
use billboard::layout::TextMeasure;
use billboard::{Colour, Px, TextRender};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// A stand-in font that draws every character as a solid block, so layout and
/// compositing can be checked pixel by pixel without shipping a font file.
/// Spaces advance the pen but paint nothing.
pub struct BlockFont {
    pub size: Px,
}

impl BlockFont {
    pub fn new(size: f32) -> BlockFont {
        BlockFont { size: Px(size) }
    }

    pub fn advance(&self) -> f32 {
        (self.size.0 * 0.6).round()
    }
}

impl TextMeasure for BlockFont {
    fn text_width(&self, text: &str) -> Px {
        Px(text.chars().count() as f32 * self.advance())
    }
}

impl TextRender for BlockFont {
    fn draw_text(&self, canvas: &mut RgbImage, origin: (i32, i32), text: &str, colour: Colour) {
        let advance = self.advance() as i32;
        let (w, h) = ((advance - 2).max(1) as u32, self.size.0.max(1.0) as u32);
        for (i, ch) in text.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let rect = Rect::at(origin.0 + i as i32 * advance + 1, origin.1).of_size(w, h);
            draw_filled_rect_mut(canvas, rect, colour.into());
        }
    }
}

/// A background with some structure, so accidental copies or shifts show up
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 97) as u8])
    })
}

/// Bounding box (min x, min y, max x, max y) of pixels equal to `colour`
pub fn ink_bounds(canvas: &RgbImage, colour: Colour) -> Option<(u32, u32, u32, u32)> {
    let target: Rgb<u8> = colour.into();
    canvas
        .enumerate_pixels()
        .filter(|(_, _, p)| **p == target)
        .fold(None, |acc, (x, y, _)| match acc {
            None => Some((x, y, x, y)),
            Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
        })
}
