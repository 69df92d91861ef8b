use scene_rig::device::record::{ArrayRecord, Op, RecordingDevice};
use scene_rig::device::{Device, ElementType, ObjectKind, ParamValue, SceneObject};

#[test]
fn operations_are_recorded_in_call_order() {
    let device = RecordingDevice::new();

    let geometry = device.new_geometry("mesh");
    device.set_param(geometry.raw(), "primitive.id", ParamValue::F32(1.0));
    device.commit(geometry.raw());
    let raw = geometry.into_raw();
    device.release(raw);

    assert_eq!(
        device.ops(),
        vec![
            Op::Create {
                handle: raw,
                kind: ObjectKind::Geometry,
                subtype: Some("mesh".to_string()),
            },
            Op::SetParam {
                object: raw,
                name: "primitive.id".to_string(),
                value: ParamValue::F32(1.0),
            },
            Op::Commit { object: raw },
            Op::Release { object: raw },
        ]
    );
}

#[test]
fn handle_ids_are_sequential_and_deterministic() {
    let device = RecordingDevice::new();
    let first = device.new_world();
    let second = device.new_group();
    assert_eq!(first.raw().0, 1);
    assert_eq!(second.raw().0, 2);

    let other = RecordingDevice::new();
    assert_eq!(other.new_world().raw(), first.raw());
}

#[test]
fn transfer_relinquishes_the_caller_reference() {
    let device = RecordingDevice::new();

    let world = device.new_world();
    let group = device.new_group();
    let group_raw = group.raw();
    assert_eq!(device.caller_refs(group_raw), 1);

    device.transfer_param(world.raw(), "group", group.into_raw());
    assert_eq!(device.caller_refs(group_raw), 0);
    assert_eq!(
        device.param(world.raw(), "group"),
        Some(ParamValue::Object(group_raw))
    );

    // Borrowing with set_param leaves the caller's reference alone.
    let surface = device.new_surface();
    device.set_param(world.raw(), "surface", ParamValue::Object(surface.raw()));
    assert_eq!(device.caller_refs(surface.raw()), 1);
}

#[test]
fn typed_transfer_works_through_a_borrowed_device() {
    let device = RecordingDevice::new();

    // Scene code passes the device around as a plain `&dyn Device` borrow;
    // the typed transfer helper must be callable through it.
    fn attach_group(device: &dyn Device, world: scene_rig::device::RawHandle) {
        let group = device.new_group();
        device.transfer(world, "group", group);
    }

    let world = device.new_world();
    attach_group(&device, world.raw());

    let Some(ParamValue::Object(group)) = device.param(world.raw(), "group") else {
        panic!("group was not attached");
    };
    assert_eq!(device.caller_refs(group), 0);
}

#[test]
fn parameters_overwrite_by_name() {
    let device = RecordingDevice::new();
    let sampler = device.new_sampler("texture2d");

    device.set_param(sampler.raw(), "filter", "linear".into());
    device.set_param(sampler.raw(), "filter", "nearest".into());

    assert_eq!(
        device.param(sampler.raw(), "filter"),
        Some(ParamValue::Str("nearest".to_string()))
    );
    // Both calls still show up in the log.
    let sets = device
        .ops()
        .iter()
        .filter(|op| matches!(op, Op::SetParam { .. }))
        .count();
    assert_eq!(sets, 2);
}

#[test]
fn data_arrays_keep_their_payload_and_dims() {
    let device = RecordingDevice::new();

    let texels: Vec<[f32; 3]> = vec![[0.2; 3]; 6];
    let array = device.new_array2d(bytemuck::cast_slice(&texels), ElementType::Float32Vec3, 3, 2);

    let (bytes, element, dims) = device.array_data(array.raw()).unwrap();
    assert_eq!(element, ElementType::Float32Vec3);
    assert_eq!(dims, (3, 2));
    assert_eq!(bytes.len(), 6 * 12);
    assert!(device.array_handles(array.raw()).is_none());
}

#[test]
fn handle_arrays_list_their_references() {
    let device = RecordingDevice::new();

    let first = device.new_instance();
    let second = device.new_instance();
    let array = device.new_handle_array(ElementType::Instance, &[first.raw(), second.raw()]);

    assert_eq!(
        device.array_handles(array.raw()),
        Some(vec![first.raw(), second.raw()])
    );
    match device.object(array.raw()).unwrap().array {
        Some(ArrayRecord::Handles { element, .. }) => {
            assert_eq!(element, ElementType::Instance)
        }
        other => panic!("expected a handle array, got {other:?}"),
    }
    // Creating the array does not touch the caller's references.
    assert_eq!(device.caller_refs(first.raw()), 1);
    assert_eq!(device.caller_refs(second.raw()), 1);
}
