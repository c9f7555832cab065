use core::fmt;
use std::{fmt::LowerHex, hash::Hash, num::NonZeroU64, str::FromStr};

use serde::{Deserialize, Serialize};

/// Type identifier of a compiled resource.
///
/// Computed from the resource kind name so that it can be used as a constant:
///
/// ```
/// # use lgn_data_runtime::ResourceType;
/// const TEXTURE: ResourceType = ResourceType::new(b"texture");
/// assert_eq!(TEXTURE, ResourceType::new(b"texture"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Debug)]
pub struct ResourceType(u32);

impl ResourceType {
    const CRC32_ALGO: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_CKSUM);

    /// Creates a new 32 bit resource type id from series of bytes.
    ///
    /// It is recommended to use this method to define a public constant
    /// which can be used to identify a resource type.
    pub const fn new(v: &[u8]) -> Self {
        Self(Self::CRC32_ALGO.checksum(v))
    }

    /// Creates a 32 bit resource type id from a raw value.
    pub const fn from_raw(v: u32) -> Self {
        Self(v)
    }

    /// Returns the raw 32 bit value.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:08x}", self.0))
    }
}

/// Identifier of a resource instance, derived from its logical name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Debug)]
pub struct ResourceId(NonZeroU64);

impl ResourceId {
    const CRC64_ALGO: crc::Crc<u64> = crc::Crc::<u64>::new(&crc::CRC_64_ECMA_182);

    /// Hashes a logical resource name into an id.
    pub fn from_name(name: &str) -> Self {
        let hash = Self::CRC64_ALGO.checksum(name.as_bytes());
        // a zero hash is as likely as any other, fold it onto 1
        Self(NonZeroU64::new(hash).unwrap_or(NonZeroU64::MIN))
    }

    /// Creates an id from a raw non-zero value.
    pub fn from_raw(internal: u64) -> Option<Self> {
        NonZeroU64::new(internal).map(Self)
    }

    /// Returns the raw 64 bit value.
    pub fn raw(self) -> u64 {
        self.0.get()
    }
}

impl LowerHex for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:#016x}", self.0))
    }
}

/// Error returned when parsing a [`ResourceId`] fails.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseResourceIdError {
    /// Not a hexadecimal number.
    #[error("invalid resource id: {0}")]
    Invalid(#[from] std::num::ParseIntError),
    /// Resource ids are never zero.
    #[error("resource id cannot be zero")]
    Zero,
}

impl FromStr for ResourceId {
    type Err = ParseResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_start_matches("0x");
        let id = u64::from_str_radix(s, 16)?;
        Self::from_raw(id).ok_or(ParseResourceIdError::Zero)
    }
}

/// Key of a resource in a [`crate::ResourceStore`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Debug)]
pub struct ResourceTypeAndId {
    /// Kind of the resource.
    pub kind: ResourceType,
    /// Id of the resource.
    pub id: ResourceId,
}

impl ResourceTypeAndId {
    /// Creates a new key.
    pub fn new(kind: ResourceType, id: ResourceId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for ResourceTypeAndId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}:{}", self.kind, self.id))
    }
}
