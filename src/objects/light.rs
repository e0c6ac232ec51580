use crate::config::AMBIENT_INTENSITY;
use image::Rgb;
use imageproc::definitions::HasWhite;

/// Uniform light that reaches every surface regardless of orientation.
pub struct AmbientLight {
    pub intensity: f64,
    pub color: Rgb<u8>,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            intensity: AMBIENT_INTENSITY,
            color: Rgb::white(),
        }
    }
}
