use super::{LayoutBand, Line, TextMeasure};
use crate::units::Px;
use serde::{Deserialize, Serialize};

/// Nominal distance between consecutive lines, as a multiple of the font size
pub const LINE_SPACING: f32 = 1.2;

/// Font sizes below this are raised to it before layout
pub const MIN_FONT_SIZE: Px = Px(1.0);

/// Largest font size billboard options accept; every glyph is rasterized at
/// this size at most
pub const MAX_FONT_SIZE: Px = Px(1024.0);

/// How far apart consecutive lines are placed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineHeight {
    /// `1.2 × font size`, tightened when that many lines wouldn't fit in the band
    #[default]
    ShrinkToBand,
    /// Always `1.2 × font size`
    Fixed,
}

/// How fractional origins are snapped to the pixel grid when drawing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Round towards negative infinity
    #[default]
    Floor,
    /// Round to the nearest pixel, halves away from zero
    Nearest,
}

impl Rounding {
    pub fn apply(self, value: Px) -> i32 {
        match self {
            Rounding::Floor => value.0.floor() as i32,
            Rounding::Nearest => value.0.round() as i32,
        }
    }
}

/// A line with its measured width and the top-left corner it is drawn from
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: Line,
    pub width: Px,
    pub origin: (Px, Px),
}

impl PlacedLine {
    /// The origin snapped to whole pixels
    pub fn pixel_origin(&self, rounding: Rounding) -> (i32, i32) {
        (rounding.apply(self.origin.0), rounding.apply(self.origin.1))
    }
}

/// Where every line of a message goes on a particular canvas
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderPlan {
    pub line_height: Px,
    pub lines: Vec<PlacedLine>,
}

impl RenderPlan {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Height of the whole block of lines, blank lines included
    pub fn total_height(&self) -> Px {
        self.line_height * self.lines.len() as f32
    }
}

/// Raises font sizes below [MIN_FONT_SIZE] to that minimum.
pub fn clamp_font_size(size: Px) -> Px {
    if size < MIN_FONT_SIZE || size.0.is_nan() {
        MIN_FONT_SIZE
    } else {
        size
    }
}

/// Computes the origin of every line so that the block sits inside `band` and
/// each line is centred horizontally on a canvas `canvas_width` pixels wide.
///
/// The block is centred vertically within the band when it fits. When it doesn't
/// (possible with [LineHeight::Fixed], or when rounding leaves it a hair too tall),
/// it starts at the top of the band and runs past the bottom: lines are never
/// dropped and the text is never shrunk.
///
/// Blank lines get a slot in the block like any other line.
pub fn plan_lines<M>(
    lines: Vec<Line>,
    measure: &M,
    canvas_width: u32,
    band: LayoutBand,
    font_size: Px,
    line_height: LineHeight,
) -> RenderPlan
where
    M: TextMeasure + ?Sized,
{
    let font_size = clamp_font_size(font_size);
    let available = band.available_height().max(Px::ZERO);
    let nominal = font_size * LINE_SPACING;

    let line_height = match line_height {
        LineHeight::ShrinkToBand => nominal.min(available / lines.len().max(1) as f32),
        LineHeight::Fixed => nominal,
    };

    let total_height = line_height * lines.len() as f32;
    let start_y = if total_height >= available {
        band.top
    } else {
        band.top + (available - total_height) / 2.0
    };

    let canvas_width = Px::from(canvas_width);
    let lines: Vec<PlacedLine> = lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let width = measure.text_width(&text);
            let x = (canvas_width - width) / 2.0;
            let y = start_y + line_height * i as f32;
            PlacedLine {
                text,
                width,
                origin: (x, y),
            }
        })
        .collect();

    tracing::debug!(
        lines = lines.len(),
        line_height = line_height.0,
        start_y = start_y.0,
        "planned text block"
    );

    RenderPlan { line_height, lines }
}
