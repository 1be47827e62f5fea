use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum BillboardError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error("font could not be loaded for rasterization")]
    /// [ab_glyph] rejected a face that the metrics parser accepted
    InvalidFont(#[from] ab_glyph::InvalidFont),

    #[error(transparent)]
    /// [image] failed to decode or encode an image
    Image(#[from] image::ImageError),

    #[error("invalid layout parameters: {0}")]
    /// Numeric layout inputs (band fractions, width fraction, font size) that
    /// cannot describe a drawable region
    InvalidLayoutParameters(String),

    #[error("no usable font found after trying {tried} candidate(s)")]
    /// Every candidate of a [crate::FontResolver] failed to load
    NoFontAvailable { tried: usize },

    #[error("invalid colour `{0}`")]
    /// A colour string that is neither hex nor a known colour name
    InvalidColour(String),

    #[error("output image `{0}` not found")]
    /// A requested output file does not exist in the [crate::OutputStore]
    OutputNotFound(String),

    #[error(transparent)]
    /// The configuration file could not be parsed
    Config(#[from] serde_json::Error),
}
