//! In-memory reference implementation of the device protocol.
//!
//! `RecordingDevice` performs no rendering. It keeps every object a scene
//! creates, every parameter set on it and an append-only operation log, and
//! tracks the caller-side reference count per object. Harnesses use it to
//! assert what a scene actually committed: graph shape, parameter values,
//! commit order, determinism across runs and the no-leak property of the
//! handle ownership model.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use log::warn;

use crate::device::{
    ArrayHandle, Device, ElementType, GeometryHandle, GroupHandle, InstanceHandle, LightHandle,
    MaterialHandle, ObjectKind, ParamValue, RawHandle, SamplerHandle, SurfaceHandle, WorldHandle,
};

/// Payload of an array object.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayRecord {
    Data {
        bytes: Vec<u8>,
        element: ElementType,
        /// (width, height); height is 1 for one-dimensional arrays.
        dims: (usize, usize),
    },
    Handles {
        element: ElementType,
        handles: Vec<RawHandle>,
    },
}

/// Everything the device knows about one object.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectRecord {
    pub kind: ObjectKind,
    pub subtype: Option<String>,
    /// Last-write-wins parameter map, keyed by parameter name.
    pub params: BTreeMap<String, ParamValue>,
    /// How many times the object was committed.
    pub committed: u32,
    /// References held by the caller. Internal references the device-side
    /// graph takes through parameters are not counted here, so a value of 0
    /// means exactly "the builder no longer owns this".
    pub caller_refs: i64,
    pub array: Option<ArrayRecord>,
}

/// One protocol call, as recorded in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Create {
        handle: RawHandle,
        kind: ObjectKind,
        subtype: Option<String>,
    },
    SetParam {
        object: RawHandle,
        name: String,
        value: ParamValue,
    },
    TransferParam {
        object: RawHandle,
        name: String,
        child: RawHandle,
    },
    Commit {
        object: RawHandle,
    },
    Release {
        object: RawHandle,
    },
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    objects: HashMap<RawHandle, ObjectRecord>,
    ops: Vec<Op>,
}

/// Recording implementation of [`Device`].
///
/// Handle ids are allocated sequentially from 1, so two identical scene
/// builds against two fresh devices produce identical operation logs.
#[derive(Default)]
pub struct RecordingDevice {
    inner: Mutex<Inner>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn create(
        &self,
        kind: ObjectKind,
        subtype: Option<&str>,
        array: Option<ArrayRecord>,
    ) -> RawHandle {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let handle = RawHandle(inner.next_id);
        inner.objects.insert(
            handle,
            ObjectRecord {
                kind,
                subtype: subtype.map(str::to_string),
                params: BTreeMap::new(),
                committed: 0,
                caller_refs: 1,
                array,
            },
        );
        inner.ops.push(Op::Create {
            handle,
            kind,
            subtype: subtype.map(str::to_string),
        });
        handle
    }

    // Inspection queries. All of them clone out of the store so the lock is
    // never held across caller code.

    pub fn object(&self, handle: RawHandle) -> Option<ObjectRecord> {
        self.inner.lock().unwrap().objects.get(&handle).cloned()
    }

    pub fn param(&self, handle: RawHandle, name: &str) -> Option<ParamValue> {
        self.inner
            .lock()
            .unwrap()
            .objects
            .get(&handle)
            .and_then(|record| record.params.get(name).cloned())
    }

    /// The referenced handles of a handle array, if `handle` is one.
    pub fn array_handles(&self, handle: RawHandle) -> Option<Vec<RawHandle>> {
        match self.object(handle)?.array? {
            ArrayRecord::Handles { handles, .. } => Some(handles),
            ArrayRecord::Data { .. } => None,
        }
    }

    /// Byte payload, element type and dims of a data array, if `handle` is one.
    pub fn array_data(&self, handle: RawHandle) -> Option<(Vec<u8>, ElementType, (usize, usize))> {
        match self.object(handle)?.array? {
            ArrayRecord::Data {
                bytes,
                element,
                dims,
            } => Some((bytes, element, dims)),
            ArrayRecord::Handles { .. } => None,
        }
    }

    pub fn caller_refs(&self, handle: RawHandle) -> i64 {
        self.object(handle).map(|record| record.caller_refs).unwrap_or(0)
    }

    /// Every handle ever created, in id order.
    pub fn handles(&self) -> Vec<RawHandle> {
        let inner = self.inner.lock().unwrap();
        let mut handles: Vec<RawHandle> = inner.objects.keys().copied().collect();
        handles.sort();
        handles
    }

    pub fn objects_of_kind(&self, kind: ObjectKind) -> Vec<RawHandle> {
        let inner = self.inner.lock().unwrap();
        let mut handles: Vec<RawHandle> = inner
            .objects
            .iter()
            .filter(|(_, record)| record.kind == kind)
            .map(|(handle, _)| *handle)
            .collect();
        handles.sort();
        handles
    }

    /// Handles the caller still owns a reference to.
    pub fn caller_owned(&self) -> Vec<RawHandle> {
        let inner = self.inner.lock().unwrap();
        let mut handles: Vec<RawHandle> = inner
            .objects
            .iter()
            .filter(|(_, record)| record.caller_refs > 0)
            .map(|(handle, _)| *handle)
            .collect();
        handles.sort();
        handles
    }

    /// The full operation log, in call order.
    pub fn ops(&self) -> Vec<Op> {
        self.inner.lock().unwrap().ops.clone()
    }

    fn record_param(&self, object: RawHandle, name: &str, value: ParamValue, op: Op) {
        let mut inner = self.inner.lock().unwrap();
        match inner.objects.get_mut(&object) {
            Some(record) => {
                if record.caller_refs <= 0 {
                    warn!("parameter {name:?} set on released object {object:?}");
                }
                record.params.insert(name.to_string(), value);
            }
            None => warn!("parameter {name:?} set on unknown object {object:?}"),
        }
        inner.ops.push(op);
    }

    fn check_payload(bytes: &[u8], element: ElementType, count: usize) {
        if let Some(size) = element.size_bytes() {
            if bytes.len() != size * count {
                warn!(
                    "array payload is {} bytes but {} elements of {element:?} need {}",
                    bytes.len(),
                    count,
                    size * count
                );
            }
        }
    }
}

impl Device for RecordingDevice {
    fn new_array1d(&self, bytes: &[u8], element: ElementType, count: usize) -> ArrayHandle {
        Self::check_payload(bytes, element, count);
        ArrayHandle::new(self.create(
            ObjectKind::Array1D,
            None,
            Some(ArrayRecord::Data {
                bytes: bytes.to_vec(),
                element,
                dims: (count, 1),
            }),
        ))
    }

    fn new_array2d(
        &self,
        bytes: &[u8],
        element: ElementType,
        width: usize,
        height: usize,
    ) -> ArrayHandle {
        Self::check_payload(bytes, element, width * height);
        ArrayHandle::new(self.create(
            ObjectKind::Array2D,
            None,
            Some(ArrayRecord::Data {
                bytes: bytes.to_vec(),
                element,
                dims: (width, height),
            }),
        ))
    }

    fn new_handle_array(&self, element: ElementType, handles: &[RawHandle]) -> ArrayHandle {
        ArrayHandle::new(self.create(
            ObjectKind::Array1D,
            None,
            Some(ArrayRecord::Handles {
                element,
                handles: handles.to_vec(),
            }),
        ))
    }

    fn new_geometry(&self, subtype: &str) -> GeometryHandle {
        GeometryHandle::new(self.create(ObjectKind::Geometry, Some(subtype), None))
    }

    fn new_sampler(&self, subtype: &str) -> SamplerHandle {
        SamplerHandle::new(self.create(ObjectKind::Sampler, Some(subtype), None))
    }

    fn new_material(&self, subtype: &str) -> MaterialHandle {
        MaterialHandle::new(self.create(ObjectKind::Material, Some(subtype), None))
    }

    fn new_light(&self, subtype: &str) -> LightHandle {
        LightHandle::new(self.create(ObjectKind::Light, Some(subtype), None))
    }

    fn new_surface(&self) -> SurfaceHandle {
        SurfaceHandle::new(self.create(ObjectKind::Surface, None, None))
    }

    fn new_group(&self) -> GroupHandle {
        GroupHandle::new(self.create(ObjectKind::Group, None, None))
    }

    fn new_instance(&self) -> InstanceHandle {
        InstanceHandle::new(self.create(ObjectKind::Instance, None, None))
    }

    fn new_world(&self) -> WorldHandle {
        WorldHandle::new(self.create(ObjectKind::World, None, None))
    }

    fn set_param(&self, object: RawHandle, name: &str, value: ParamValue) {
        let op = Op::SetParam {
            object,
            name: name.to_string(),
            value: value.clone(),
        };
        self.record_param(object, name, value, op);
    }

    fn transfer_param(&self, object: RawHandle, name: &str, child: RawHandle) {
        let op = Op::TransferParam {
            object,
            name: name.to_string(),
            child,
        };
        self.record_param(object, name, ParamValue::Object(child), op);
        // The device-side graph now holds the reference the caller gave up.
        let mut inner = self.inner.lock().unwrap();
        match inner.objects.get_mut(&child) {
            Some(record) => record.caller_refs -= 1,
            None => warn!("ownership of unknown object {child:?} transferred"),
        }
    }

    fn commit(&self, object: RawHandle) {
        let mut inner = self.inner.lock().unwrap();
        match inner.objects.get_mut(&object) {
            Some(record) => record.committed += 1,
            None => warn!("commit of unknown object {object:?}"),
        }
        inner.ops.push(Op::Commit { object });
    }

    fn release(&self, object: RawHandle) {
        let mut inner = self.inner.lock().unwrap();
        match inner.objects.get_mut(&object) {
            Some(record) => {
                record.caller_refs -= 1;
                if record.caller_refs < 0 {
                    warn!(
                        "object {object:?} released more often than it was referenced ({})",
                        record.caller_refs
                    );
                }
            }
            None => warn!("release of unknown object {object:?}"),
        }
        inner.ops.push(Op::Release { object });
    }
}
