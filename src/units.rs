use derive_more::{Add, AddAssign, Display, From, Into, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

/// A distance on the canvas, measured in (possibly fractional) pixels. Canvas
/// coordinates grow rightwards and downwards from the top-left corner.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[display("{_0}px")]
#[serde(transparent)]
pub struct Px(pub f32);

impl Px {
    pub const ZERO: Px = Px(0.0);

    pub fn min(self, other: Px) -> Px {
        Px(self.0.min(other.0))
    }

    pub fn max(self, other: Px) -> Px {
        Px(self.0.max(other.0))
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Mul<f32> for Px {
    type Output = Px;

    fn mul(self, rhs: f32) -> Px {
        Px(self.0 * rhs)
    }
}

impl Mul<Px> for f32 {
    type Output = Px;

    fn mul(self, rhs: Px) -> Px {
        Px(self * rhs.0)
    }
}

impl Div<f32> for Px {
    type Output = Px;

    fn div(self, rhs: f32) -> Px {
        Px(self.0 / rhs)
    }
}

/// Dividing two distances yields a plain ratio
impl Div<Px> for Px {
    type Output = f32;

    fn div(self, rhs: Px) -> f32 {
        self.0 / rhs.0
    }
}

impl From<u32> for Px {
    fn from(value: u32) -> Self {
        Px(value as f32)
    }
}
