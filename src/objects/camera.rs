use crate::config::{CAMERA_POSITION, FAR_PLANE, FOV_DEGREES, NEAR_PLANE};
use nalgebra::{Matrix4, Point3, Vector3};

/// Perspective camera. Rebuilt, never mutated, when the drawing surface changes.
pub struct Camera {
    pub pos: Point3<f64>,
    fov_radians: f64,
    aspect_ratio: f64,
    near_plane: f64,
    far_plane: f64,
    pub perspective_matrix: Matrix4<f64>,
    pub view_matrix: Matrix4<f64>,
    pub camera_matrix: Matrix4<f64>,
}

impl Camera {
    pub fn new(
        pos: Point3<f64>,
        look_at: Point3<f64>,
        up: Vector3<f64>,
        fov_radians: f64,
        aspect_ratio: f64,
        near_plane: f64,
        far_plane: f64,
    ) -> Self {
        let perspective_matrix =
            Matrix4::new_perspective(aspect_ratio, fov_radians, near_plane, far_plane);
        let view_matrix = Matrix4::look_at_rh(&pos, &look_at, &up);
        let camera_matrix = perspective_matrix * view_matrix;

        Camera {
            pos,
            fov_radians,
            aspect_ratio,
            near_plane,
            far_plane,
            perspective_matrix,
            view_matrix,
            camera_matrix,
        }
    }

    /// The viewer camera: 75° fov, 0.1/1000 planes, at (0, 0, 3) looking at the origin.
    pub fn for_surface(width: u32, height: u32) -> Self {
        let aspect_ratio = if height == 0 {
            1.0
        } else {
            width as f64 / height as f64
        };
        let [x, y, z] = CAMERA_POSITION;

        Camera::new(
            Point3::new(x, y, z),
            Point3::origin(),
            Vector3::y(),
            FOV_DEGREES.to_radians(),
            aspect_ratio,
            NEAR_PLANE,
            FAR_PLANE,
        )
    }

    pub fn fov_radians(&self) -> f64 {
        self.fov_radians
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn near_plane(&self) -> f64 {
        self.near_plane
    }

    pub fn far_plane(&self) -> f64 {
        self.far_plane
    }
}
