pub mod render_loop;
pub mod z_buffer;

use crate::objects::light::AmbientLight;
use crate::objects::model3d::Material;
use crate::scene::Scene;
use image::{Rgb, RgbImage};

/// Color of a standard (roughness/metalness) surface lit only by ambient light.
/// Metallic surfaces have no diffuse response, so metalness darkens the base color.
fn calculate_color(material: &Material, light: &AmbientLight) -> Rgb<u8> {
    let diffuse_factor = (1. - material.metalness.clamp(0., 1.)) * light.intensity;

    let channel = |i: usize| {
        let light_channel = light.color[i] as f64 / 255.;
        (material.color[i] as f64 * light_channel * diffuse_factor)
            .clamp(0., 255.)
            .round() as u8
    };

    Rgb([channel(0), channel(1), channel(2)])
}

pub trait Renderer {
    fn create_frame(&mut self, width: u32, height: u32, scene: &Scene) -> RgbImage {
        let mut image = RgbImage::new(width, height);
        self.create_frame_mut(&mut image, scene);
        image
    }
    fn create_frame_mut(&mut self, image: &mut RgbImage, scene: &Scene);
}
