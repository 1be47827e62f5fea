//! Text layout utilities for positioning message text on a billboard.
//!
//! Layout happens in two steps, neither of which touches pixels:
//!
//! - [`wrap_text`](crate::layout::wrap_text) - breaks a message into [`Line`]s no wider
//!   than a maximum, keeping words whole and (optionally) blank lines intact
//! - [`plan_lines`](crate::layout::plan_lines) - stacks those lines inside a
//!   [`LayoutBand`], centring the block vertically and every line horizontally
//!
//! Both only need a [`TextMeasure`], so they can be driven by a real font or by
//! any `Fn(&str) -> f32`.
//!
//! # Example
//!
//! ```
//! use billboard::layout::{plan_lines, wrap_text, BlankLines, LayoutBand, LineHeight};
//! use billboard::Px;
//!
//! // pretend every character is 30px wide
//! let measure = |s: &str| s.chars().count() as f32 * 30.0;
//!
//! let lines = wrap_text("WELCOME TO\n\nOREGON", &measure, Px(560.0), BlankLines::Preserve);
//! assert_eq!(lines.len(), 3);
//!
//! let band = LayoutBand::fractions(533, 0.28, 0.72).expect("valid band");
//! let plan = plan_lines(lines, &measure, 800, band, Px(50.0), LineHeight::ShrinkToBand);
//! assert!(plan.lines.iter().all(|line| band.contains(line.origin.1)));
//! ```

mod band;
mod plan;
mod wrap;

pub use band::*;
pub use plan::*;
pub use wrap::*;
