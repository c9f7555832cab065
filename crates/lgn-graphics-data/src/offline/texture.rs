//! Texture source descriptions.
//!
//! A texture source description references the image to encode and the
//! output settings, either per platform:
//!
//! ```json
//! {
//!     "source": "checker.png",
//!     "output": {
//!         "windows": { "format": "BC3", "generate_mips": true, "mip_skip_smallest": 2 },
//!         "android": { "format": "PTC14" }
//!     }
//! }
//! ```
//!
//! or, in the legacy form, with `generate_mips` and `normal_map` at the top
//! level and no way to choose the format.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{TextureFormat, UnknownTextureFormat};

/// Error raised while reading a texture source description.
#[derive(thiserror::Error, Debug)]
pub enum TextureSettingsError {
    /// The `format` of the active platform block is not a [`TextureFormat`].
    #[error("Unknown texture format: '{0}'")]
    UnknownFormat(String),
    /// The document is not valid JSON or has an unexpected shape.
    #[error("Invalid texture description: {0}")]
    InvalidDocument(#[from] serde_json::Error),
}

impl From<UnknownTextureFormat> for TextureSettingsError {
    fn from(err: UnknownTextureFormat) -> Self {
        Self::UnknownFormat(err.0)
    }
}

/// Validated encoder options.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct OutputSettings {
    /// Target encoding.
    pub format: TextureFormat,
    /// Whether to generate the mip chain.
    pub generate_mips: bool,
    /// Number of smallest mip levels to omit.
    pub mip_skip_smallest: u32,
    /// Whether the texture holds normals, disabling gamma correction.
    pub normal_map: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: TextureFormat::default(),
            generate_mips: true,
            mip_skip_smallest: 0,
            normal_map: false,
        }
    }
}

#[derive(Deserialize, Default)]
struct PlatformBlock {
    format: Option<String>,
    generate_mips: Option<bool>,
    mip_skip_smallest: Option<u32>,
    normal_map: Option<bool>,
}

/// Parsed texture source description.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TextureSource {
    /// Name of the image to encode, relative to the source directory.
    pub source: String,
    /// Output settings keyed by platform name.
    #[serde(default)]
    pub output: Option<Map<String, Value>>,
    /// Legacy mip generation flag, only read without `output`.
    #[serde(default)]
    pub generate_mips: Option<bool>,
    /// Legacy normal map flag, only read without `output`.
    #[serde(default)]
    pub normal_map: Option<bool>,
}

impl TextureSource {
    /// Parses a texture source description.
    ///
    /// # Errors
    ///
    /// Fails with [`TextureSettingsError::InvalidDocument`] if the document
    /// is not valid JSON or misses `source`.
    pub fn from_json(document: &[u8]) -> Result<Self, TextureSettingsError> {
        Ok(serde_json::from_slice(document)?)
    }

    /// Output settings for `platform`.
    ///
    /// With an `output` object, the block keyed by `platform` overrides the
    /// defaults; blocks of other platforms are ignored. Without it, only the
    /// legacy `generate_mips` and `normal_map` flags are read.
    ///
    /// # Errors
    ///
    /// Fails if the active block is malformed or names an unknown format.
    pub fn output_settings(&self, platform: &str) -> Result<OutputSettings, TextureSettingsError> {
        let mut settings = OutputSettings::default();

        if let Some(output) = &self.output {
            let block = match output.get(platform) {
                Some(value) => PlatformBlock::deserialize(value)?,
                None => {
                    debug!("no output settings for {}, using defaults", platform);
                    PlatformBlock::default()
                }
            };
            if let Some(format) = block.format {
                settings.format = format.parse()?;
            }
            if let Some(generate_mips) = block.generate_mips {
                settings.generate_mips = generate_mips;
            }
            if let Some(mip_skip_smallest) = block.mip_skip_smallest {
                settings.mip_skip_smallest = mip_skip_smallest;
            }
            if let Some(normal_map) = block.normal_map {
                settings.normal_map = normal_map;
            }
        } else {
            if let Some(generate_mips) = self.generate_mips {
                settings.generate_mips = generate_mips;
            }
            if let Some(normal_map) = self.normal_map {
                settings.normal_map = normal_map;
            }
        }

        Ok(settings)
    }
}
