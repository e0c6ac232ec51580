use crate::config::{MATERIAL_METALNESS, MATERIAL_ROUGHNESS, SUBMESH_PALETTE};
use crate::objects::Point;
use crate::objects::triangle_mesh::SubMesh;
use image::Rgb;
use nalgebra::Matrix4;

pub type Triangle = (usize, usize, usize);

pub trait Model3D {
    /// Shared vertex positions in mesh-local coordinates
    fn vertices(&self) -> &[Point];

    /// Face groups, each with its own material
    fn submeshes(&self) -> &[SubMesh];

    /// Local-to-world transformation
    fn model_matrix(&self) -> Matrix4<f64>;
}

pub trait Rotate {
    /// Sets the absolute rotation around the vertical axis.
    fn set_rotation_y(&mut self, radians: f64);
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Rgb<u8>,
    pub roughness: f64,
    pub metalness: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Rgb([255, 255, 255]),
            roughness: MATERIAL_ROUGHNESS,
            metalness: MATERIAL_METALNESS,
        }
    }
}

impl Material {
    pub fn from_hex(hex: u32) -> Self {
        Self {
            color: rgb_from_hex(hex),
            ..Default::default()
        }
    }

    /// Material for the `index`-th submesh in traversal order.
    pub fn from_palette(index: usize) -> Self {
        Self::from_hex(SUBMESH_PALETTE[index % SUBMESH_PALETTE.len()])
    }
}

pub fn rgb_from_hex(hex: u32) -> Rgb<u8> {
    Rgb([
        ((hex >> 16) & 0xFF) as u8,
        ((hex >> 8) & 0xFF) as u8,
        (hex & 0xFF) as u8,
    ])
}
