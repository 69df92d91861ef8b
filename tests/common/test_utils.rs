use std::sync::Arc;

use scene_rig::device::Device;
use scene_rig::device::record::RecordingDevice;
use scene_rig::scenes::{self, TestScene};

/// Builds and commits the textured cube against a fresh recording device.
pub(crate) fn committed_textured_cube() -> (Arc<RecordingDevice>, Box<dyn TestScene>) {
    let device = Arc::new(RecordingDevice::new());
    let mut scene = scenes::scene("textured_cube", device.clone() as Arc<dyn Device>)
        .expect("textured_cube is a registered scene");
    scene.commit();
    (device, scene)
}

/// Applies a column-major 4x3 transform to a point.
pub(crate) fn apply_mat4x3(columns: &[[f32; 3]; 4], point: [f32; 3]) -> [f32; 3] {
    let mut result = columns[3];
    for axis in 0..3 {
        for (column, &coordinate) in point.iter().enumerate() {
            result[axis] += columns[column][axis] * coordinate;
        }
    }
    result
}

pub(crate) fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}
