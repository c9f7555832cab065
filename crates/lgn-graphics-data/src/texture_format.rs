use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Error returned when a texture format name is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown texture format: '{0}'")]
pub struct UnknownTextureFormat(pub String);

/// Hardware encoding of a compiled texture.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum TextureFormat {
    /// RGB(A) block compression, 4 bits per pixel.
    BC1,
    /// RGBA block compression with explicit alpha, 8 bits per pixel.
    BC2,
    /// RGBA block compression with interpolated alpha, 8 bits per pixel.
    BC3,
    /// Single channel block compression, 4 bits per pixel.
    BC4,
    /// Two channel block compression, 8 bits per pixel.
    BC5,
    /// PVRTC1, 4 bits per pixel.
    PTC14,
    /// Uncompressed RGB, 8 bits per channel.
    RGB8,
    /// Uncompressed RGBA, 8 bits per channel.
    RGBA8,
}

impl TextureFormat {
    /// Every supported format.
    pub const ALL: [Self; 8] = [
        Self::BC1,
        Self::BC2,
        Self::BC3,
        Self::BC4,
        Self::BC5,
        Self::PTC14,
        Self::RGB8,
        Self::RGBA8,
    ];

    /// Name of the format, as written in source descriptions and passed to
    /// the encoder.
    pub fn name(self) -> &'static str {
        match self {
            Self::BC1 => "BC1",
            Self::BC2 => "BC2",
            Self::BC3 => "BC3",
            Self::BC4 => "BC4",
            Self::BC5 => "BC5",
            Self::PTC14 => "PTC14",
            Self::RGB8 => "RGB8",
            Self::RGBA8 => "RGBA8",
        }
    }
}

impl Default for TextureFormat {
    fn default() -> Self {
        Self::RGBA8
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextureFormat {
    type Err = UnknownTextureFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| UnknownTextureFormat(s.to_owned()))
    }
}
