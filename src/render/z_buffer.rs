use crate::config::BACKGROUND_COLOR;
use crate::objects::camera::Camera;
use crate::objects::light::AmbientLight;
use crate::objects::model3d::Model3D;
use crate::render::{Renderer, calculate_color};
use crate::scene::Scene;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use nalgebra::{Matrix4, Point3, Vector4};

/// Clip-space w below which a vertex counts as behind the camera.
const MIN_CLIP_W: f64 = 1e-6;

struct FittedBackground {
    revision: u64,
    width: u32,
    height: u32,
    image: RgbImage,
}

#[derive(Default)]
pub struct ZBufferPerformer {
    width: u32,
    height: u32,
    z_buffer: Vec<f64>,
    background: Option<FittedBackground>,
}

impl ZBufferPerformer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            z_buffer: vec![f64::INFINITY; (width * height) as usize],
            background: None,
        }
    }

    fn reset(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.z_buffer
            .resize((width * height) as usize, f64::INFINITY);
        self.z_buffer.fill(f64::INFINITY);
    }

    /// Устанавливает значение глубины в указанных координатах.
    fn set_depth(&mut self, x: u32, y: u32, depth: f64) {
        let index = (y * self.width + x) as usize;
        self.z_buffer[index] = depth;
    }

    /// Получает значение глубины в указанных координатах.
    fn get_depth(&self, x: u32, y: u32) -> f64 {
        let index = (y * self.width + x) as usize;
        self.z_buffer[index]
    }

    /// Заливает кадр фоном сцены, растянутым на весь кадр, либо сплошным цветом.
    fn draw_background(&mut self, image: &mut RgbImage, scene: &Scene) {
        let Some(source) = scene.background() else {
            image.pixels_mut().for_each(|px| *px = BACKGROUND_COLOR);
            return;
        };

        let (width, height) = image.dimensions();
        let stale = match &self.background {
            Some(fitted) => {
                fitted.revision != scene.background_revision()
                    || fitted.width != width
                    || fitted.height != height
            }
            None => true,
        };

        if stale {
            self.background = Some(FittedBackground {
                revision: scene.background_revision(),
                width,
                height,
                image: imageops::resize(source, width, height, FilterType::Triangle),
            });
        }

        if let Some(fitted) = &self.background {
            image.copy_from_slice(fitted.image.as_raw());
        }
    }

    /// Вычисляет матрицу преобразования вьюпорта для заданных размеров изображения.
    ///
    /// Матрица преобразует нормализованные координаты устройства (NDC) в пространство экрана.
    fn calculate_viewport_matrix(width: u32, height: u32) -> Matrix4<f64> {
        Matrix4::new(
            width as f64 / 2.,
            0.,
            0.,
            width as f64 / 2.,
            0.,
            -(height as f64 / 2.),
            0.,
            height as f64 / 2.,
            0.,
            0.,
            1.,
            0.,
            0.,
            0.,
            0.,
            1.,
        )
    }

    /// Переводит вершины в пространство экрана.
    /// Вершины за камерой дают `None`, и их треугольники пропускаются.
    fn transform_vertices_to_screen(
        vertices: &[Point3<f64>],
        mvp_matrix: &Matrix4<f64>,
        viewport_matrix: &Matrix4<f64>,
    ) -> Vec<Option<Point3<f64>>> {
        vertices
            .iter()
            .map(|v| {
                let clip: Vector4<f64> = mvp_matrix * v.to_homogeneous();
                if clip.w < MIN_CLIP_W {
                    return None;
                }
                let ndc = Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w);
                Some(viewport_matrix.transform_point(&ndc))
            })
            .collect()
    }

    fn draw_triangle(&mut self, image: &mut RgbImage, tri: &[Point3<f64>; 3], color: Rgb<u8>) {
        let [p1, p2, p3] = *tri;

        let min_x = p1.x.min(p2.x).min(p3.x).floor();
        let max_x = p1.x.max(p2.x).max(p3.x).ceil();
        let min_y = p1.y.min(p2.y).min(p3.y).floor();
        let max_y = p1.y.max(p2.y).max(p3.y).ceil();

        // Треугольник целиком за пределами кадра.
        if max_x < 0. || max_y < 0. || min_x >= self.width as f64 || min_y >= self.height as f64 {
            return;
        }

        let min_x = min_x.max(0.) as u32;
        let max_x = (max_x as u32).min(self.width - 1);
        let min_y = min_y.max(0.) as u32;
        let max_y = (max_y as u32).min(self.height - 1);

        let denom = (p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x);
        if denom.abs() < f64::EPSILON {
            return;
        }

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);

                // Барицентрические координаты.
                let u = ((p3.x - p2.x) * (py - p2.y) - (p3.y - p2.y) * (px - p2.x)) / denom;
                let v = ((p1.x - p3.x) * (py - p3.y) - (p1.y - p3.y) * (px - p3.x)) / denom;
                let w = 1.0 - u - v;

                if u < -f64::EPSILON || v < -f64::EPSILON || w < -f64::EPSILON {
                    continue;
                }

                let z = p1.z * u + p2.z * v + p3.z * w;
                if z < self.get_depth(x, y) {
                    self.set_depth(x, y, z);
                    image.put_pixel(x, y, color);
                }
            }
        }
    }

    fn draw_object(
        &mut self,
        image: &mut RgbImage,
        model: &dyn Model3D,
        camera: &Camera,
        light: &AmbientLight,
    ) {
        let (width, height) = image.dimensions();
        let mvp_matrix = camera.camera_matrix * model.model_matrix();
        let viewport_matrix = Self::calculate_viewport_matrix(width, height);

        let screen_vertices =
            Self::transform_vertices_to_screen(model.vertices(), &mvp_matrix, &viewport_matrix);

        for submesh in model.submeshes() {
            let color = calculate_color(&submesh.material, light);

            for tri in &submesh.triangles {
                let (Some(a), Some(b), Some(c)) = (
                    screen_vertices[tri.0],
                    screen_vertices[tri.1],
                    screen_vertices[tri.2],
                ) else {
                    continue;
                };
                self.draw_triangle(image, &[a, b, c], color);
            }
        }
    }
}

impl Renderer for ZBufferPerformer {
    fn create_frame_mut(&mut self, image: &mut RgbImage, scene: &Scene) {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return;
        }
        self.reset(width, height);
        self.draw_background(image, scene);

        if let Some(model) = scene.model() {
            self.draw_object(image, model, &scene.camera, &scene.ambient_light);
        }
    }
}
