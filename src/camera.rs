//! Camera descriptors returned by scenes.

use cgmath::{InnerSpace, Point3, Vector3};

/// A fixed camera a scene wants renders framed from.
///
/// `direction` is always the unit vector from `position` towards `at`; use
/// [`Camera::looking_at`] to keep the two consistent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub at: Point3<f32>,
    pub direction: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn looking_at(position: Point3<f32>, at: Point3<f32>, up: Vector3<f32>) -> Self {
        Self {
            position,
            at,
            direction: (at - position).normalize(),
            up,
        }
    }
}
