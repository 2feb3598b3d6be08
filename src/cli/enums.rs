//! CLI enum types for the image resolution tier.

use clap::ValueEnum;

/// Image variant requested from the image server.
///
/// Each variant maps to the single-letter derivative code the image server
/// understands. Letters are case-sensitive: `t` and `T` are different tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ResolutionTier {
    /// .jpeg center cropped thumbnail (100x100 pixels)
    #[default]
    #[value(name = "b")]
    CroppedThumbnail,
    /// .jpeg (140 pixels tall with variable width)
    #[value(name = "f")]
    FixedHeight,
    /// .gif (150 pixels on the long side)
    #[value(name = "t")]
    Gif,
    /// .jpeg (300 pixels on the long side)
    #[value(name = "r")]
    LongSide300,
    /// .jpeg (760 pixels on the long side)
    #[value(name = "w")]
    LongSide760,
    /// .jpeg (1600 pixels on the long side)
    #[value(name = "q")]
    LongSide1600,
    /// .jpeg (2560 pixels on the long side)
    #[value(name = "v")]
    LongSide2560,
    /// .jpeg original dimensions
    #[value(name = "g")]
    Original,
    /// .tif full size
    #[value(name = "T")]
    FullTiff,
}

impl ResolutionTier {
    /// The derivative letter sent as the `t` query parameter.
    pub fn code(self) -> &'static str {
        match self {
            ResolutionTier::CroppedThumbnail => "b",
            ResolutionTier::FixedHeight => "f",
            ResolutionTier::Gif => "t",
            ResolutionTier::LongSide300 => "r",
            ResolutionTier::LongSide760 => "w",
            ResolutionTier::LongSide1600 => "q",
            ResolutionTier::LongSide2560 => "v",
            ResolutionTier::Original => "g",
            ResolutionTier::FullTiff => "T",
        }
    }

    /// File extension used for downloaded images of this tier.
    ///
    /// Only the full-size tier is a TIFF; every other tier is saved as
    /// `.jpeg`, including the gif tier.
    pub fn extension(self) -> &'static str {
        match self {
            ResolutionTier::FullTiff => "tif",
            _ => "jpeg",
        }
    }
}

impl std::fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
