//! scene-rig
//!
//! A small library of deterministic test scenes for exercising rendering
//! devices. A scene describes itself to a device through a fixed protocol:
//! create an object, set named parameters on it, commit it, release the
//! reference. The device itself lives outside this crate; implementations
//! only need to provide the [`device::Device`] trait. An in-memory
//! [`device::record::RecordingDevice`] backend is included so harnesses and
//! tests can inspect exactly what a scene committed.
//!
//! High-level modules
//! - `camera`: camera descriptors returned by scenes for framing renders
//! - `device`: object handles and the create/parameter/commit device protocol
//! - `resources`: procedurally generated resource data (textures)
//! - `scenes`: the `TestScene` trait, the scene registry and the scenes

pub mod camera;
pub mod device;
pub mod resources;
pub mod scenes;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
