use crate::background::BackgroundCache;
use crate::colour::{colours, Colour};
use crate::font::Font;
use crate::layout::{
    clamp_font_size, plan_lines, wrap_text, BandFractions, BlankLines, LayoutBand, LineHeight,
    RenderPlan, Rounding, TextMeasure, MAX_FONT_SIZE,
};
use crate::render::{render, Shadow, TextRender, TextStyle};
use crate::units::Px;
use crate::BillboardError;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Messages longer than this many characters are cut short before layout
pub const MAX_MESSAGE_LENGTH: usize = 200;

/// Text shown when a caller doesn't supply a message
pub const DEFAULT_MESSAGE: &str = "WELCOME TO OREGON";

/// Everything about how a message is placed and painted on a billboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillboardOptions {
    /// Em size of the text, in pixels
    pub font_size: Px,
    pub text_colour: Colour,
    /// Share of the canvas width a line may occupy before wrapping
    pub width_fraction: f32,
    /// Vertical region for the text; the whole canvas height when `None`
    pub band: Option<BandFractions>,
    pub line_height: LineHeight,
    pub blank_lines: BlankLines,
    pub shadow: Option<Shadow>,
    pub rounding: Rounding,
}

impl BillboardOptions {
    /// Text confined to the painted panel of the billboard, with line spacing
    /// tightened to keep long messages inside it and blank lines kept
    pub fn banded() -> BillboardOptions {
        BillboardOptions {
            font_size: Px(50.0),
            text_colour: colours::WHITE,
            width_fraction: 0.7,
            band: Some(BandFractions::BILLBOARD),
            line_height: LineHeight::ShrinkToBand,
            blank_lines: BlankLines::Preserve,
            shadow: None,
            rounding: Rounding::Floor,
        }
    }

    /// Text centred on the whole image at fixed spacing, blank lines dropped, with
    /// a black drop shadow
    pub fn classic() -> BillboardOptions {
        BillboardOptions {
            band: None,
            line_height: LineHeight::Fixed,
            blank_lines: BlankLines::Collapse,
            shadow: Some(Shadow::default()),
            ..BillboardOptions::banded()
        }
    }

    /// Rejects options that can't describe a drawable layout, including font sizes
    /// above [MAX_FONT_SIZE]. Small or negative font sizes are not rejected; they
    /// are raised to [crate::layout::MIN_FONT_SIZE]
    pub fn validate(&self) -> Result<(), BillboardError> {
        if !self.font_size.is_finite() || self.font_size > MAX_FONT_SIZE {
            return Err(BillboardError::InvalidLayoutParameters(format!(
                "font size must be at most {MAX_FONT_SIZE}, got {}",
                self.font_size
            )));
        }
        if !self.width_fraction.is_finite() || self.width_fraction <= 0.0 {
            return Err(BillboardError::InvalidLayoutParameters(format!(
                "width fraction must be positive, got {}",
                self.width_fraction
            )));
        }
        if let Some(band) = &self.band {
            band.validate()?;
        }
        Ok(())
    }

    /// The text band on a canvas `height` pixels tall
    pub fn band_for(&self, height: u32) -> Result<LayoutBand, BillboardError> {
        match &self.band {
            Some(fractions) => fractions.resolve(height),
            None => Ok(LayoutBand::full(height)),
        }
    }

    /// Widest a line may be on a canvas `width` pixels wide, in whole pixels
    pub fn max_text_width(&self, width: u32) -> Px {
        Px((width as f32 * self.width_fraction).floor())
    }

    pub fn style(&self) -> TextStyle {
        TextStyle {
            fill: self.text_colour,
            shadow: self.shadow,
            rounding: self.rounding,
        }
    }

    /// Font size with the minimum applied
    pub fn effective_font_size(&self) -> Px {
        let size = clamp_font_size(self.font_size);
        if size != self.font_size {
            tracing::debug!(requested = %self.font_size, used = %size, "clamped font size");
        }
        size
    }
}

impl Default for BillboardOptions {
    fn default() -> Self {
        BillboardOptions::banded()
    }
}

/// Cuts `message` down to at most `max_chars` characters
pub fn truncate_message(message: &str, max_chars: usize) -> &str {
    match message.char_indices().nth(max_chars) {
        Some((end, _)) => &message[..end],
        None => message,
    }
}

/// Uppercases `message`, wraps it to the options' text width, lays it out in the
/// options' band and paints it onto `canvas`.
///
/// `font` must measure and draw at [BillboardOptions::effective_font_size]; the size
/// in `options` only drives line spacing here. [compose] takes care of that pairing
/// for a real [Font].
pub fn compose_with<F>(
    canvas: &mut RgbImage,
    message: &str,
    font: &F,
    options: &BillboardOptions,
) -> Result<RenderPlan, BillboardError>
where
    F: TextMeasure + TextRender + ?Sized,
{
    options.validate()?;
    let font_size = options.effective_font_size();
    compose_validated(canvas, message, font, options, font_size)
}

/// The body of [compose_with] once `options` are validated and `font_size` is
/// the clamped size `font` works at
fn compose_validated<F>(
    canvas: &mut RgbImage,
    message: &str,
    font: &F,
    options: &BillboardOptions,
    font_size: Px,
) -> Result<RenderPlan, BillboardError>
where
    F: TextMeasure + TextRender + ?Sized,
{
    let (width, height) = canvas.dimensions();
    let band = options.band_for(height)?;

    let message = message.to_uppercase();
    let lines = wrap_text(
        &message,
        font,
        options.max_text_width(width),
        options.blank_lines,
    );
    let plan = plan_lines(
        lines,
        font,
        width,
        band,
        font_size,
        options.line_height,
    );
    render(canvas, &plan, font, &options.style());

    Ok(plan)
}

/// Composites `message` onto `canvas` using `font` at the options' font size.
/// The canvas is modified in place; pass a copy if the original must survive
#[tracing::instrument(level = "debug", skip(canvas, font, options), fields(chars = message.chars().count()))]
pub fn compose(
    canvas: &mut RgbImage,
    message: &str,
    font: &Font,
    options: &BillboardOptions,
) -> Result<RenderPlan, BillboardError> {
    options.validate()?;
    let font_size = options.effective_font_size();
    compose_validated(canvas, message, &font.sized(font_size), options, font_size)
}

/// A background, a font, and options: everything needed to turn messages into
/// finished billboard images. Safe to share between threads; each call works on
/// its own copy of the background.
#[derive(Debug)]
pub struct Billboard {
    pub background: BackgroundCache,
    pub font: Font,
    pub options: BillboardOptions,
}

impl Billboard {
    pub fn new(background: BackgroundCache, font: Font, options: BillboardOptions) -> Billboard {
        Billboard {
            background,
            font,
            options,
        }
    }

    /// Renders `message` (truncated to [MAX_MESSAGE_LENGTH] characters) onto a
    /// fresh copy of the background
    pub fn generate(&self, message: &str) -> Result<RgbImage, BillboardError> {
        self.generate_with(message, &self.options)
    }

    /// Like [Billboard::generate], with options overriding the stored ones
    pub fn generate_with(
        &self,
        message: &str,
        options: &BillboardOptions,
    ) -> Result<RgbImage, BillboardError> {
        let message = truncate_message(message, MAX_MESSAGE_LENGTH);
        let mut canvas = self.background.canvas();
        let plan = compose(&mut canvas, message, &self.font, options)?;
        tracing::debug!(lines = plan.len(), "generated billboard");
        Ok(canvas)
    }
}
