use crate::colour::{colours, Colour};
use crate::layout::{plan_lines, LayoutBand, LineHeight, Line, RenderPlan, Rounding, TextMeasure};
use crate::units::Px;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Something that can draw a string onto a canvas with its top-left corner (the
/// left end of the ascender line) at `origin`. Drawing outside the canvas must be
/// silently clipped.
pub trait TextRender {
    fn draw_text(&self, canvas: &mut RgbImage, origin: (i32, i32), text: &str, colour: Colour);
}

/// A copy of each line drawn underneath it, shifted by `offset` pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shadow {
    pub offset: (i32, i32),
    pub colour: Colour,
}

impl Default for Shadow {
    fn default() -> Self {
        Shadow {
            offset: (3, 3),
            colour: colours::BLACK,
        }
    }
}

/// How lines are painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub fill: Colour,
    pub shadow: Option<Shadow>,
    pub rounding: Rounding,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            fill: colours::WHITE,
            shadow: None,
            rounding: Rounding::default(),
        }
    }
}

/// Paints every non-empty line of `plan` onto `canvas`, shadow first when the
/// style has one. Blank lines are skipped; their space is already part of the plan.
pub fn render<R>(canvas: &mut RgbImage, plan: &RenderPlan, font: &R, style: &TextStyle)
where
    R: TextRender + ?Sized,
{
    for line in plan.lines.iter().filter(|line| !line.text.is_empty()) {
        let (x, y) = line.pixel_origin(style.rounding);

        if let Some(shadow) = &style.shadow {
            font.draw_text(
                canvas,
                (
                    x.saturating_add(shadow.offset.0),
                    y.saturating_add(shadow.offset.1),
                ),
                line.text.as_str(),
                shadow.colour,
            );
        }

        font.draw_text(canvas, (x, y), line.text.as_str(), style.fill);
    }
}

/// Lays `lines` out in `band` and paints them in one go, returning the plan that
/// was drawn
#[tracing::instrument(level = "debug", skip_all, fields(lines = lines.len()))]
pub fn render_lines<F>(
    canvas: &mut RgbImage,
    lines: Vec<Line>,
    font: &F,
    band: LayoutBand,
    font_size: Px,
    line_height: LineHeight,
    style: &TextStyle,
) -> RenderPlan
where
    F: TextMeasure + TextRender + ?Sized,
{
    let plan = plan_lines(lines, font, canvas.width(), band, font_size, line_height);
    render(canvas, &plan, font, style);
    plan
}
