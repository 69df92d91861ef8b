//! Test-scene framework: the `TestScene` trait and the by-name registry.
//!
//! A scene owns its device-side world. `commit` populates and commits the
//! world graph; afterwards the device exclusively owns everything in it and
//! the scene only keeps the world handle, which it releases on drop.

pub mod textured_cube;

use std::sync::Arc;

use crate::camera::Camera;
use crate::device::{Device, ElementType, ParamValue, RawHandle, SceneObject};

/// A deterministic, fully-specified scene a render harness can commit and frame.
pub trait TestScene {
    /// Builds the scene graph on the device and commits the world. All device
    /// calls happen here, synchronously and in a fixed order.
    fn commit(&mut self);

    /// The device-side world handle. The scene keeps a reference until drop.
    fn world(&self) -> RawHandle;

    /// Cameras the scene wants renders framed from. Pure query.
    fn cameras(&self) -> Vec<Camera>;
}

/// Names accepted by [`scene`].
pub fn scene_names() -> &'static [&'static str] {
    &["textured_cube"]
}

/// Looks a scene up by name.
pub fn scene(name: &str, device: Arc<dyn Device>) -> anyhow::Result<Box<dyn TestScene>> {
    match name {
        "textured_cube" => Ok(textured_cube::scene_textured_cube(device)),
        other => anyhow::bail!("no test scene registered under the name {other:?}"),
    }
}

/// Attaches a unit-strength ambient light to `world` so every scene renders
/// without scene-specific lighting setup.
pub fn set_default_ambient_light(device: &dyn Device, world: RawHandle) {
    let light = device.new_light("ambient");
    device.set_param(light.raw(), "color", ParamValue::Vec3([1.0; 3]));
    device.set_param(light.raw(), "intensity", ParamValue::F32(1.0));
    device.commit(light.raw());

    let lights = device.new_handle_array(ElementType::Light, &[light.raw()]);
    device.release(light.into_raw());
    device.transfer(world, "light", lights);
}
