use crate::api::{ApiError, AssetSource};
use crate::objects::camera::Camera;
use crate::objects::light::AmbientLight;
use crate::objects::pivot::Pivot;
use crate::objects::triangle_mesh::{ObjError, TriangleMesh};
use image::RgbImage;

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to fetch model: {0}")]
    Fetch(#[from] ApiError),
    #[error("failed to parse model: {0}")]
    Parse(#[from] ObjError),
}

#[derive(Debug, thiserror::Error)]
pub enum BackgroundError {
    #[error("failed to fetch background: {0}")]
    Fetch(#[from] ApiError),
    #[error("failed to decode background: {0}")]
    Decode(#[from] image::ImageError),
}

pub struct Scene {
    pub camera: Camera,
    pub ambient_light: AmbientLight,
    background: Option<RgbImage>,
    background_revision: u64,
    model: Option<Pivot>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            ambient_light: AmbientLight::default(),
            background: None,
            background_revision: 0,
            model: None,
        }
    }

    pub fn model(&self) -> Option<&Pivot> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut Pivot> {
        self.model.as_mut()
    }

    /// Replaces the current model, returning the removed one.
    pub fn attach_model(&mut self, pivot: Pivot) -> Option<Pivot> {
        self.model.replace(pivot)
    }

    pub fn background(&self) -> Option<&RgbImage> {
        self.background.as_ref()
    }

    /// Bumped on every background change so renderers can drop cached resizes
    pub fn background_revision(&self) -> u64 {
        self.background_revision
    }

    pub fn set_background(&mut self, image: RgbImage) {
        self.background = Some(image);
        self.background_revision += 1;
    }
}

/// Fetches, parses and recenters a model. The result is ready to attach:
/// nothing reaches the scene before centroid correction is done.
pub fn prepare_model(source: &dyn AssetSource, url: &str) -> Result<Pivot, ModelLoadError> {
    let body = source.fetch_text(url)?;
    let mesh = TriangleMesh::from_obj_str(&body)?;
    let pivot = Pivot::new(mesh).ok_or(ObjError::Empty)?;

    log::info!(
        "Model parsed: {} submeshes, {} triangles",
        pivot.mesh().submeshes().len(),
        pivot.mesh().triangle_count()
    );
    Ok(pivot)
}

pub fn fetch_background(source: &dyn AssetSource, url: &str) -> Result<RgbImage, BackgroundError> {
    let bytes = source.fetch_bytes(url)?;
    Ok(image::load_from_memory(&bytes)?.to_rgb8())
}
