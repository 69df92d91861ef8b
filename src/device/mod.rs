//! The rendering-device protocol: object handles, named parameters, commits.
//!
//! A device exposes a flat object model. Scenes create objects, set string-keyed
//! parameters on them, commit them to finalize, and release references they no
//! longer need. Parameters that carry another object come in two flavours:
//!
//! - [`Device::set_param`] with [`ParamValue::Object`] *borrows* the child; the
//!   device takes its own reference and the caller keeps theirs.
//! - [`Device::transfer_param`] hands the caller's reference over to the device
//!   in the same call.
//!
//! Typed handles ([`ArrayHandle`], [`GroupHandle`], ...) are deliberately not
//! `Copy` or `Clone`: one value is one reference. Consuming a handle with
//! [`SceneObject::into_raw`] is how ownership leaves the caller, so a scene
//! that compiles cannot leak a reference it forgot to hand over or release.

pub mod record;

use cgmath::{Matrix4, Vector3};

/// Opaque device-side object id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawHandle(pub u64);

/// Common surface of every typed object handle.
pub trait SceneObject {
    fn raw(&self) -> RawHandle;

    /// Consumes the handle, yielding the raw id. The caller's reference goes
    /// with it, so the id must be passed on to the device (as a transfer or a
    /// release) or the object stays alive device-side.
    fn into_raw(self) -> RawHandle;
}

macro_rules! typed_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, PartialEq, Eq, Hash)]
        pub struct $name(RawHandle);

        impl $name {
            /// Wraps a raw id minted by a device implementation.
            pub fn new(raw: RawHandle) -> Self {
                Self(raw)
            }
        }

        impl SceneObject for $name {
            fn raw(&self) -> RawHandle {
                self.0
            }

            fn into_raw(self) -> RawHandle {
                self.0
            }
        }
    };
}

typed_handle!(
    /// A one- or two-dimensional data array uploaded to the device.
    ArrayHandle
);
typed_handle!(
    /// A geometry built from vertex/index arrays.
    GeometryHandle
);
typed_handle!(
    /// A texture-lookup object bound to a material's map slot.
    SamplerHandle
);
typed_handle!(MaterialHandle);
typed_handle!(
    /// Pairing of a geometry with a material.
    SurfaceHandle
);
typed_handle!(
    /// A reusable collection of surfaces that can be instanced multiple times.
    GroupHandle
);
typed_handle!(
    /// A placement (transform) of a shared group within the world.
    InstanceHandle
);
typed_handle!(LightHandle);
typed_handle!(
    /// Top-level scene container owned by the device.
    WorldHandle
);

/// What a device-side object is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Array1D,
    Array2D,
    Geometry,
    Sampler,
    Material,
    Surface,
    Group,
    Instance,
    Light,
    World,
}

/// Element type tag for uploaded arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    Float32Vec2,
    Float32Vec3,
    UInt32Vec3,
    Surface,
    Instance,
    Light,
}

impl ElementType {
    /// Size of one element in bytes, for data arrays. Handle-array element
    /// types have no byte representation on the caller's side.
    pub fn size_bytes(&self) -> Option<usize> {
        match self {
            ElementType::Float32Vec2 => Some(8),
            ElementType::Float32Vec3 => Some(12),
            ElementType::UInt32Vec3 => Some(12),
            ElementType::Surface | ElementType::Instance | ElementType::Light => None,
        }
    }
}

/// A named-parameter value.
///
/// `PartialEq` is part of the contract: recorded parameter sets from two scene
/// builds must compare bit-identical for the determinism guarantees the test
/// harness relies on.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Str(String),
    F32(f32),
    Vec3([f32; 3]),
    /// Column-major 4x3 transform: rotation columns plus translation.
    Mat4x3([[f32; 3]; 4]),
    Object(RawHandle),
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::F32(v)
    }
}

impl From<Vector3<f32>> for ParamValue {
    fn from(v: Vector3<f32>) -> Self {
        ParamValue::Vec3(v.into())
    }
}

impl From<Matrix4<f32>> for ParamValue {
    /// Drops the projective row; device transforms are rigid placements.
    fn from(m: Matrix4<f32>) -> Self {
        ParamValue::Mat4x3([
            m.x.truncate().into(),
            m.y.truncate().into(),
            m.z.truncate().into(),
            m.w.truncate().into(),
        ])
    }
}

/// The rendering-device protocol surface.
///
/// All operations are infallible from the caller's perspective; scenes are
/// fixed-shape fixtures and a device-side failure is the implementation's
/// concern. Methods take `&self` so a device can be shared as `Arc<dyn Device>`.
pub trait Device: Send + Sync {
    /// Uploads `count` elements of `element` type from a flat byte buffer.
    fn new_array1d(&self, bytes: &[u8], element: ElementType, count: usize) -> ArrayHandle;

    /// Uploads a `width` x `height` row-major element grid.
    fn new_array2d(
        &self,
        bytes: &[u8],
        element: ElementType,
        width: usize,
        height: usize,
    ) -> ArrayHandle;

    /// Builds a one-dimensional array of object references. The device takes
    /// its own reference on each listed object; the caller keeps theirs.
    fn new_handle_array(&self, element: ElementType, handles: &[RawHandle]) -> ArrayHandle;

    fn new_geometry(&self, subtype: &str) -> GeometryHandle;
    fn new_sampler(&self, subtype: &str) -> SamplerHandle;
    fn new_material(&self, subtype: &str) -> MaterialHandle;
    fn new_light(&self, subtype: &str) -> LightHandle;
    fn new_surface(&self) -> SurfaceHandle;
    fn new_group(&self) -> GroupHandle;
    fn new_instance(&self) -> InstanceHandle;
    fn new_world(&self) -> WorldHandle;

    /// Sets a named parameter. Object-valued parameters are borrowed.
    fn set_param(&self, object: RawHandle, name: &str, value: ParamValue);

    /// Sets an object-valued parameter and relinquishes the caller's
    /// reference on `child` in the same step.
    fn transfer_param(&self, object: RawHandle, name: &str, child: RawHandle);

    /// Finalizes the parameters set so far.
    fn commit(&self, object: RawHandle);

    /// Drops the caller's reference.
    fn release(&self, object: RawHandle);
}

impl dyn Device + '_ {
    /// Typed form of [`Device::transfer_param`]: consuming the child handle
    /// makes the ownership hand-over visible at the call site.
    pub fn transfer(&self, object: RawHandle, name: &str, child: impl SceneObject) {
        self.transfer_param(object, name, child.into_raw());
    }
}
