use crate::units::Px;
use crate::BillboardError;
use serde::{Deserialize, Serialize};

/// The vertical stretch of the canvas that text is laid out in. Nothing stops
/// text from overflowing the band; it is a guideline that the layout centres
/// lines within, and lines that don't fit simply run past the bottom edge.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LayoutBand {
    pub top: Px,
    pub bottom: Px,
}

impl LayoutBand {
    /// Create a band from absolute pixel rows, top first
    pub fn new(top: f32, bottom: f32) -> LayoutBand {
        LayoutBand {
            top: Px(top),
            bottom: Px(bottom),
        }
    }

    /// A band covering the whole height of a canvas
    pub fn full(height: u32) -> LayoutBand {
        LayoutBand {
            top: Px::ZERO,
            bottom: Px::from(height),
        }
    }

    /// A band whose edges are given as fractions (0.0 at the top, 1.0 at the bottom)
    /// of the canvas height
    pub fn fractions(height: u32, top: f32, bottom: f32) -> Result<LayoutBand, BillboardError> {
        BandFractions { top, bottom }.resolve(height)
    }

    /// Vertical space between the two edges
    pub fn available_height(&self) -> Px {
        self.bottom - self.top
    }

    /// Whether a row lies on or between the band edges
    pub fn contains(&self, y: Px) -> bool {
        y >= self.top && y <= self.bottom
    }
}

/// Band edges relative to canvas height, as stored in configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandFractions {
    pub top: f32,
    pub bottom: f32,
}

impl BandFractions {
    /// The painted panel of the billboard artwork
    pub const BILLBOARD: BandFractions = BandFractions {
        top: 0.28,
        bottom: 0.72,
    };

    /// Checks that both edges lie in `[0, 1]` and are not inverted
    pub fn validate(&self) -> Result<(), BillboardError> {
        let in_range = |f: f32| f.is_finite() && (0.0..=1.0).contains(&f);
        if !in_range(self.top) || !in_range(self.bottom) {
            return Err(BillboardError::InvalidLayoutParameters(format!(
                "band fractions must lie within [0, 1], got {}..{}",
                self.top, self.bottom
            )));
        }
        if self.top > self.bottom {
            return Err(BillboardError::InvalidLayoutParameters(format!(
                "band top {} is below band bottom {}",
                self.top, self.bottom
            )));
        }
        Ok(())
    }

    /// Converts the fractions into pixel rows of a canvas `height` pixels tall
    pub fn resolve(&self, height: u32) -> Result<LayoutBand, BillboardError> {
        self.validate()?;
        let height = Px::from(height);
        Ok(LayoutBand {
            top: height * self.top,
            bottom: height * self.bottom,
        })
    }
}

impl Default for BandFractions {
    fn default() -> Self {
        BandFractions::BILLBOARD
    }
}
