//! A module providing runtime texture related functionality.

use std::{
    io::{self, Read},
    num::NonZeroU32,
};

use lgn_data_runtime::{Resource, ResourceError, ResourceHeader, ResourceLifecycle, ResourceType};

// Upper bound of the buffer reserved from the header length before any
// payload byte is read.
const PREALLOCATION_LIMIT: usize = 16 * 1024 * 1024;

/// Handle of a texture realized on a [`TextureDevice`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TextureHandle(NonZeroU32);

impl TextureHandle {
    /// Wraps a device specific texture index.
    pub fn new(index: NonZeroU32) -> Self {
        Self(index)
    }

    /// Device specific texture index.
    pub fn index(self) -> NonZeroU32 {
        self.0
    }
}

/// Graphics device textures are realized on.
///
/// Creation is assumed to succeed; a device unable to create a texture
/// aborts upstream.
pub trait TextureDevice {
    /// Creates a texture from an encoded payload.
    fn create_texture(&mut self, data: &[u8]) -> TextureHandle;

    /// Destroys a texture created by [`Self::create_texture`].
    fn destroy_texture(&mut self, handle: TextureHandle);
}

/// Runtime texture.
///
/// Owns the encoded payload from load to unload. The device texture derived
/// from it comes and goes with `online` and `offline`.
#[derive(Debug)]
pub struct TextureResource {
    data: Box<[u8]>,
    handle: Option<TextureHandle>,
}

impl TextureResource {
    /// Encoded payload, as produced by the texture encoder.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Device texture, `None` unless online.
    pub fn handle(&self) -> Option<TextureHandle> {
        self.handle
    }
}

impl Resource for TextureResource {
    const TYPE: ResourceType = ResourceType::new(b"texture");
    const VERSION: u16 = 1;
}

impl ResourceLifecycle for TextureResource {
    type Device = dyn TextureDevice;

    fn load(reader: &mut dyn io::Read) -> Result<Self, ResourceError> {
        let header = ResourceHeader::read_expected(reader, Self::tag())?;

        let size = header.size as usize;
        let mut data = Vec::with_capacity(size.min(PREALLOCATION_LIMIT));
        reader.take(u64::from(header.size)).read_to_end(&mut data)?;
        if data.len() != size {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("payload truncated: {} of {} bytes", data.len(), size),
            )
            .into());
        }

        Ok(Self {
            data: data.into_boxed_slice(),
            handle: None,
        })
    }

    fn online(&mut self, device: &mut Self::Device) {
        debug_assert!(self.handle.is_none());
        self.handle = Some(device.create_texture(&self.data));
    }

    fn offline(&mut self, device: &mut Self::Device) {
        if let Some(handle) = self.handle.take() {
            device.destroy_texture(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use lgn_data_runtime::{write_resource, ResourceTag};

    use super::*;

    #[derive(Default)]
    struct FakeDevice {
        next: u32,
        live: Vec<(TextureHandle, Vec<u8>)>,
    }

    impl TextureDevice for FakeDevice {
        fn create_texture(&mut self, data: &[u8]) -> TextureHandle {
            self.next += 1;
            let handle = TextureHandle::new(NonZeroU32::new(self.next).unwrap());
            self.live.push((handle, data.to_vec()));
            handle
        }

        fn destroy_texture(&mut self, handle: TextureHandle) {
            self.live.retain(|(live, _)| *live != handle);
        }
    }

    fn container(tag: ResourceTag, payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![];
        write_resource(&mut bytes, tag, payload).unwrap();
        bytes
    }

    #[test]
    fn load_keeps_payload() {
        let payload = b"KTX payload \xab\xcd";
        let bytes = container(TextureResource::tag(), payload);

        let texture = TextureResource::load(&mut &bytes[..]).unwrap();
        assert_eq!(texture.data(), payload);
        assert_eq!(texture.handle(), None);
    }

    #[test]
    fn load_rejects_other_version() {
        let bytes = container(ResourceTag::new(TextureResource::TYPE, 2), b"payload");
        assert!(matches!(
            TextureResource::load(&mut &bytes[..]),
            Err(ResourceError::WrongVersion { .. })
        ));
    }

    #[test]
    fn load_rejects_truncated_payload() {
        let bytes = container(TextureResource::tag(), b"payload");
        assert!(matches!(
            TextureResource::load(&mut &bytes[..bytes.len() - 1]),
            Err(ResourceError::Io(_))
        ));
    }

    #[test]
    fn load_rejects_oversized_length() {
        let mut bytes = vec![];
        ResourceHeader {
            tag: TextureResource::tag(),
            size: u32::MAX,
        }
        .write(&mut bytes)
        .unwrap();
        bytes.extend_from_slice(b"abc");

        match TextureResource::load(&mut &bytes[..]) {
            Err(ResourceError::Io(err)) => {
                assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn online_offline_cycle() {
        let bytes = container(TextureResource::tag(), b"texels");
        let mut texture = TextureResource::load(&mut &bytes[..]).unwrap();
        let mut device = FakeDevice::default();

        for round in 1..=3 {
            texture.online(&mut device);
            let handle = texture.handle().unwrap();
            assert_eq!(handle.index().get(), round);
            assert_eq!(device.live, vec![(handle, b"texels".to_vec())]);

            texture.offline(&mut device);
            assert_eq!(texture.handle(), None);
            assert!(device.live.is_empty());
            assert_eq!(texture.data(), b"texels");
        }

        texture.unload();
    }
}
