use crate::objects::Point;
use crate::objects::model3d::{Material, Model3D, Rotate};
use crate::objects::triangle_mesh::{SubMesh, TriangleMesh};
use crate::utils::bounds::Aabb;
use nalgebra::{Matrix4, Vector3};

/// Wrapper node that recenters a mesh's bounding-box centroid to the origin
/// without touching the mesh's own coordinates. Rotation is applied around
/// the recentered origin.
pub struct Pivot {
    mesh: TriangleMesh,
    bounds: Aabb,
    offset: Vector3<f64>,
    rotation_y: f64,
}

impl Pivot {
    /// Recenters the mesh and assigns palette materials to its submeshes.
    /// Returns `None` for a mesh without faces.
    pub fn new(mut mesh: TriangleMesh) -> Option<Self> {
        let bounds = Aabb::from_points(mesh.used_vertices())?;
        let offset = -bounds.center().coords;

        let mut color_index = 0;
        for submesh in mesh.submeshes_mut() {
            submesh.material = Material::from_palette(color_index);
            color_index += 1;
        }

        Some(Self {
            mesh,
            bounds,
            offset,
            rotation_y: 0.,
        })
    }

    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// Bounds of the mesh in its own (uncentered) coordinates
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn rotation_y(&self) -> f64 {
        self.rotation_y
    }
}

impl Model3D for Pivot {
    fn vertices(&self) -> &[Point] {
        self.mesh.vertices()
    }

    fn submeshes(&self) -> &[SubMesh] {
        self.mesh.submeshes()
    }

    fn model_matrix(&self) -> Matrix4<f64> {
        Matrix4::new_rotation(Vector3::y() * self.rotation_y)
            * Matrix4::new_translation(&self.offset)
    }
}

impl Rotate for Pivot {
    fn set_rotation_y(&mut self, radians: f64) {
        self.rotation_y = radians;
    }
}
