use std::num::NonZeroU32;

use lgn_data_runtime::{
    write_resource, Resource, ResourceError, ResourceId, ResourceState, ResourceStore, ResourceTag,
    ResourceTypeAndId,
};
use lgn_graphics_data::{TextureDevice, TextureHandle, TextureResource};

#[derive(Default)]
struct RecordingDevice {
    created: Vec<Vec<u8>>,
    destroyed: Vec<TextureHandle>,
}

impl TextureDevice for RecordingDevice {
    fn create_texture(&mut self, data: &[u8]) -> TextureHandle {
        self.created.push(data.to_vec());
        TextureHandle::new(NonZeroU32::new(self.created.len() as u32).unwrap())
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        self.destroyed.push(handle);
    }
}

#[test]
fn texture_through_store() {
    let mut bytes = vec![];
    write_resource(&mut bytes, TextureResource::tag(), b"ktx bytes").unwrap();

    let id = ResourceId::from_name("textures/checker");
    let key = ResourceTypeAndId::new(TextureResource::TYPE, id);
    let mut store = ResourceStore::new();
    let mut recording = RecordingDevice::default();
    let device: &mut dyn TextureDevice = &mut recording;

    store.load::<TextureResource>(id, &mut &bytes[..]).unwrap();
    assert_eq!(store.state(key), Some(ResourceState::Loaded));

    store.online::<TextureResource>(id, &mut *device).unwrap();
    assert_eq!(store.state(key), Some(ResourceState::Online));
    let handle = store.get::<TextureResource>(id).unwrap().handle();
    assert!(handle.is_some());

    // a texture can't be unloaded while it lives on the device
    assert!(matches!(
        store.unload::<TextureResource>(id),
        Err(ResourceError::InvalidTransition { .. })
    ));

    store.offline::<TextureResource>(id, &mut *device).unwrap();
    assert_eq!(
        store.get::<TextureResource>(id).unwrap().data(),
        b"ktx bytes"
    );
    store.unload::<TextureResource>(id).unwrap();
    assert_eq!(store.state(key), None);

    assert_eq!(recording.created, vec![b"ktx bytes".to_vec()]);
    assert_eq!(recording.destroyed, vec![handle.unwrap()]);
}

#[test]
fn stale_container_is_rejected() {
    let mut bytes = vec![];
    let stale = ResourceTag::new(TextureResource::TYPE, TextureResource::VERSION + 1);
    write_resource(&mut bytes, stale, b"ktx bytes").unwrap();

    let id = ResourceId::from_name("textures/stale");
    let mut store = ResourceStore::new();
    assert!(matches!(
        store.load::<TextureResource>(id, &mut &bytes[..]),
        Err(ResourceError::WrongVersion { .. })
    ));
    assert!(store.is_empty());
}
