//! A textured cube assembled from six instanced quads.
//!
//! One checkerboard-textured unit quad is built once, wrapped in a group and
//! placed six times: each instance translates the quad half a unit out of the
//! origin and rotates it onto one face of a unit cube centered at the origin.

use std::sync::Arc;

use cgmath::{Deg, Matrix4, Point3, Vector3};
use log::debug;

use crate::camera::Camera;
use crate::device::{Device, ElementType, InstanceHandle, ParamValue, RawHandle, SceneObject, WorldHandle};
use crate::resources::checkerboard_texels;
use crate::scenes::{TestScene, set_default_ambient_light};

/// Unit quad in the z = 0 plane, centered at the origin.
const QUAD_VERTICES: [[f32; 3]; 4] = [
    [-0.5, 0.5, 0.0],
    [0.5, 0.5, 0.0],
    [-0.5, -0.5, 0.0],
    [0.5, -0.5, 0.0],
];

/// Two triangles covering the quad.
const QUAD_INDICES: [[u32; 3]; 2] = [[0, 2, 3], [3, 1, 0]];

/// One texture coordinate per vertex, spanning the full texture.
const QUAD_TEXCOORDS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]];

const TEXTURE_DIM: usize = 8;

pub struct TexturedCube {
    device: Arc<dyn Device>,
    world: WorldHandle,
}

impl TexturedCube {
    pub fn new(device: Arc<dyn Device>) -> Self {
        let world = device.new_world();
        Self { device, world }
    }
}

impl TestScene for TexturedCube {
    fn commit(&mut self) {
        let d = self.device.as_ref();

        let vertex_data = d.new_array1d(
            bytemuck::cast_slice(&QUAD_VERTICES),
            ElementType::Float32Vec3,
            QUAD_VERTICES.len(),
        );
        let texcoord_data = d.new_array1d(
            bytemuck::cast_slice(&QUAD_TEXCOORDS),
            ElementType::Float32Vec2,
            QUAD_TEXCOORDS.len(),
        );
        let index_data = d.new_array1d(
            bytemuck::cast_slice(&QUAD_INDICES),
            ElementType::UInt32Vec3,
            QUAD_INDICES.len(),
        );

        let geometry = d.new_geometry("mesh");
        d.transfer(geometry.raw(), "vertex.position", vertex_data);
        d.transfer(geometry.raw(), "vertex.texcoord", texcoord_data);
        d.transfer(geometry.raw(), "index", index_data);
        d.commit(geometry.raw());

        let surface = d.new_surface();
        d.transfer(surface.raw(), "geometry", geometry);

        let texels = checkerboard_texels(TEXTURE_DIM);
        let texture = d.new_array2d(
            bytemuck::cast_slice(&texels),
            ElementType::Float32Vec3,
            TEXTURE_DIM,
            TEXTURE_DIM,
        );
        let sampler = d.new_sampler("texture2d");
        d.transfer(sampler.raw(), "data", texture);
        d.set_param(sampler.raw(), "filter", "nearest".into());
        d.commit(sampler.raw());

        let material = d.new_material("matte");
        d.transfer(material.raw(), "map_kd", sampler);
        d.commit(material.raw());
        d.transfer(surface.raw(), "material", material);
        d.commit(surface.raw());

        let surfaces = d.new_handle_array(ElementType::Surface, &[surface.raw()]);
        let group = d.new_group();
        d.set_param(group.raw(), "surface", ParamValue::Object(surfaces.raw()));
        d.commit(group.raw());

        d.release(surfaces.into_raw());
        d.release(surface.into_raw());

        // One rotation per cube face: the quad is pushed out along +z first,
        // then rotated into place.
        let face_rotations: [(Deg<f32>, Vector3<f32>); 6] = [
            (Deg(0.0), Vector3::unit_y()),
            (Deg(180.0), Vector3::unit_y()),
            (Deg(90.0), Vector3::unit_y()),
            (Deg(270.0), Vector3::unit_y()),
            (Deg(90.0), Vector3::unit_x()),
            (Deg(270.0), Vector3::unit_x()),
        ];
        let translate = Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.5));

        let instances: Vec<InstanceHandle> = face_rotations
            .into_iter()
            .map(|(angle, axis)| {
                let instance = d.new_instance();
                let transform = Matrix4::from_axis_angle(axis, angle) * translate;
                d.set_param(instance.raw(), "transform", transform.into());
                d.set_param(instance.raw(), "group", ParamValue::Object(group.raw()));
                d.commit(instance.raw());
                instance
            })
            .collect();

        let instance_raws: Vec<RawHandle> =
            instances.iter().map(|instance| instance.raw()).collect();
        let instance_array = d.new_handle_array(ElementType::Instance, &instance_raws);
        d.transfer(self.world.raw(), "instance", instance_array);

        d.release(group.into_raw());
        for instance in instances {
            d.release(instance.into_raw());
        }

        set_default_ambient_light(d, self.world.raw());

        d.commit(self.world.raw());
        debug!("textured cube committed: 6 instances of 1 quad group");
    }

    fn world(&self) -> RawHandle {
        self.world.raw()
    }

    fn cameras(&self) -> Vec<Camera> {
        vec![Camera::looking_at(
            Point3::new(1.25, 1.25, 1.25),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        )]
    }
}

impl Drop for TexturedCube {
    fn drop(&mut self) {
        self.device.release(self.world.raw());
    }
}

pub fn scene_textured_cube(device: Arc<dyn Device>) -> Box<dyn TestScene> {
    Box::new(TexturedCube::new(device))
}
