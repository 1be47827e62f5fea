//! Composites wrapped, centred message text onto billboard images.
//!
//! The core is two pure steps and one drawing step:
//!
//! 1. [layout::wrap_text] breaks an (uppercased) message into lines that fit a width
//! 2. [layout::plan_lines] places those lines inside a vertical [layout::LayoutBand]
//! 3. [render()] paints the plan onto a caller-owned canvas, optionally with a drop shadow
//!
//! [compose] runs all three for a [Font]; [Billboard] adds a cached background and
//! message truncation on top. Font discovery ([FontResolver]), output files
//! ([OutputStore]) and configuration ([Config]) are optional helpers around the core.

mod background;
pub use background::*;

mod billboard;
pub use billboard::*;

mod colour;
pub use colour::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod font_source;
pub use font_source::*;

/// Wrapping and placement of text lines, independent of any pixels
pub mod layout;

mod output;
pub use output::*;

mod render;
pub use render::*;

mod units;
pub use units::*;

/// Re-export of the image crate, whose buffers serve as canvases
pub use image;
