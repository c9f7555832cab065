//! Compiled resource container.
//!
//! ```markdown
//! |------------- header -------------|
//! | tag: u64 | payload_length: u32   |
//! |------------- payload ------------|
//! | payload_length bytes             |
//! ```
//!
//! All integers are little-endian. The tag packs the [`ResourceType`], a magic
//! number and the data version of the resource kind. There is no checksum: a
//! loader only validates the tag.

use std::{fmt, io};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::{ResourceError, ResourceType};

/// Magic number stored in every container tag.
pub const RESOURCE_MAGIC: u16 = 0x1e60;

/// Kind and version stamp of a compiled resource.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct ResourceTag(u64);

impl ResourceTag {
    /// Creates the tag of version `version` of resource kind `kind`.
    pub const fn new(kind: ResourceType, version: u16) -> Self {
        Self(((kind.raw() as u64) << 32) | ((RESOURCE_MAGIC as u64) << 16) | version as u64)
    }

    /// Creates a tag from its serialized form.
    pub const fn from_raw(v: u64) -> Self {
        Self(v)
    }

    /// Returns the serialized form.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Resource kind stamped in the tag.
    pub const fn kind(self) -> ResourceType {
        ResourceType::from_raw((self.0 >> 32) as u32)
    }

    /// Data version stamped in the tag.
    pub const fn version(self) -> u16 {
        self.0 as u16
    }
}

impl fmt::Display for ResourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:#018x}", self.0))
    }
}

/// Fixed size header preceding the payload of a compiled resource.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ResourceHeader {
    /// Resource kind and version.
    pub tag: ResourceTag,
    /// Number of payload bytes following the header.
    pub size: u32,
}

impl ResourceHeader {
    /// Size of the serialized header in bytes.
    pub const SIZE: usize = 12;

    /// Creates a header for `payload`.
    ///
    /// # Errors
    ///
    /// Fails when the payload is larger than `u32::MAX` bytes.
    pub fn for_payload(tag: ResourceTag, payload: &[u8]) -> Result<Self, ResourceError> {
        let size =
            u32::try_from(payload.len()).map_err(|_e| ResourceError::PayloadTooLarge(payload.len()))?;
        Ok(Self { tag, size })
    }

    /// Serializes the header.
    pub fn write(&self, writer: &mut dyn io::Write) -> io::Result<()> {
        writer.write_u64::<LittleEndian>(self.tag.raw())?;
        writer.write_u32::<LittleEndian>(self.size)
    }

    /// Deserializes a header without validating it.
    pub fn read(reader: &mut dyn io::Read) -> io::Result<Self> {
        let tag = ResourceTag::from_raw(reader.read_u64::<LittleEndian>()?);
        let size = reader.read_u32::<LittleEndian>()?;
        Ok(Self { tag, size })
    }

    /// Deserializes a header and checks it carries `expected` tag.
    ///
    /// # Errors
    ///
    /// A tag mismatch is reported as [`ResourceError::WrongVersion`].
    pub fn read_expected(
        reader: &mut dyn io::Read,
        expected: ResourceTag,
    ) -> Result<Self, ResourceError> {
        let header = Self::read(reader)?;
        if header.tag != expected {
            return Err(ResourceError::WrongVersion {
                expected,
                found: header.tag,
            });
        }
        Ok(header)
    }
}

/// Writes a complete container: tag, payload length and payload, in that order.
///
/// # Errors
///
/// Fails if the payload is too large or the writer fails.
pub fn write_resource(
    writer: &mut dyn io::Write,
    tag: ResourceTag,
    payload: &[u8],
) -> Result<usize, ResourceError> {
    let header = ResourceHeader::for_payload(tag, payload)?;
    header.write(writer)?;
    writer.write_all(payload)?;
    Ok(ResourceHeader::SIZE + payload.len())
}
