use crate::api::AssetSource;
use crate::config::BACKGROUND_COLOR;
use crate::input::RotationState;
use crate::objects::camera::Camera;
use crate::objects::model3d::Rotate;
use crate::objects::pivot::Pivot;
use crate::render::Renderer;
use crate::render::render_loop::{CancellationToken, RenderLoop};
use crate::render::z_buffer::ZBufferPerformer;
use crate::scene::{ModelLoadError, Scene, prepare_model};
use image::RgbImage;

/// Pixel dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

/// Owns the scene, the renderer bound to a surface, and the render loop.
pub struct SceneController {
    scene: Scene,
    renderer: ZBufferPerformer,
    frame: RgbImage,
    surface: Surface,
    rotation: RotationState,
    render_loop: RenderLoop,
}

impl SceneController {
    /// Builds renderer, camera and lighting for `surface`. Assets are loaded
    /// separately and the render loop is started by the caller.
    pub fn initialize(surface: Surface, rotation: RotationState) -> Self {
        log::info!(
            "Initializing scene for {}x{} surface",
            surface.width,
            surface.height
        );

        Self {
            scene: Scene::new(Camera::for_surface(surface.width, surface.height)),
            renderer: ZBufferPerformer::new(surface.width, surface.height),
            frame: RgbImage::from_pixel(surface.width, surface.height, BACKGROUND_COLOR),
            surface,
            rotation,
            render_loop: RenderLoop::default(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn frame(&self) -> &RgbImage {
        &self.frame
    }

    /// Rebinds to a surface of a different size. Camera and frame buffer are
    /// recreated, the loaded model and background stay.
    pub fn resize(&mut self, surface: Surface) -> bool {
        if surface == self.surface {
            return false;
        }
        log::debug!("Surface resized to {}x{}", surface.width, surface.height);

        self.surface = surface;
        self.scene.camera = Camera::for_surface(surface.width, surface.height);
        self.frame = RgbImage::from_pixel(surface.width, surface.height, BACKGROUND_COLOR);
        true
    }

    /// Fetches, parses and attaches a model. On error the current model is kept.
    pub fn load_model(
        &mut self,
        source: &dyn AssetSource,
        url: &str,
    ) -> Result<(), ModelLoadError> {
        let pivot = prepare_model(source, url)?;
        self.attach_model(pivot);
        Ok(())
    }

    /// Attaches an already prepared model, dropping the previous one.
    pub fn attach_model(&mut self, pivot: Pivot) {
        if self.scene.attach_model(pivot).is_some() {
            log::debug!("Previous model removed from scene");
        }
    }

    pub fn set_background(&mut self, image: RgbImage) {
        self.scene.set_background(image);
    }

    pub fn start_render_loop(&mut self) -> CancellationToken {
        self.render_loop.start()
    }

    pub fn stop_render_loop(&mut self) {
        self.render_loop.cancel();
    }

    pub fn is_rendering(&self) -> bool {
        self.render_loop.is_running()
    }

    /// One frame: applies the current yaw, rasterizes and returns the frame.
    /// Returns `None` once the render loop is not running.
    pub fn render(&mut self) -> Option<&RgbImage> {
        if !self.render_loop.tick() {
            return None;
        }

        let yaw = self.rotation.yaw();
        if let Some(model) = self.scene.model_mut() {
            model.set_rotation_y(yaw);
        }

        self.renderer.create_frame_mut(&mut self.frame, &self.scene);
        Some(&self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::input::GestureMapper;
    use crate::scene::tests::{FakeAssets, TRIANGLE_OBJ, TWO_PART_OBJ};

    fn controller() -> (SceneController, RotationState) {
        let rotation = RotationState::default();
        let controller = SceneController::initialize(Surface::new(48, 32), rotation.clone());
        (controller, rotation)
    }

    #[test]
    fn test_initialize_binds_surface() {
        let (controller, _) = controller();
        assert_eq!(controller.frame().dimensions(), (48, 32));
        assert_eq!(controller.scene().camera.aspect_ratio(), 1.5);
        assert!(controller.scene().model().is_none());
        assert!(!controller.is_rendering());
    }

    #[test]
    fn test_loading_twice_keeps_one_model() {
        let assets = FakeAssets::default();
        assets.serve("first", TRIANGLE_OBJ);
        assets.serve("second", TWO_PART_OBJ);

        let (mut controller, _) = controller();
        controller.load_model(&assets, "first").unwrap();
        controller.load_model(&assets, "second").unwrap();

        let model = controller.scene().model().unwrap();
        assert_eq!(model.mesh().submeshes().len(), 2);
    }

    #[test]
    fn test_failed_load_keeps_previous_model() {
        let assets = FakeAssets::default();
        assets.serve("model", TRIANGLE_OBJ);

        let (mut controller, _) = controller();
        controller.load_model(&assets, "model").unwrap();

        assets.fail("model", ApiError::Transport("network unreachable".into()));
        assert!(controller.load_model(&assets, "model").is_err());

        assets.serve("model", "v 1 2\n");
        assert!(controller.load_model(&assets, "model").is_err());

        let model = controller.scene().model().unwrap();
        assert_eq!(model.mesh().submeshes()[0].name, "body");
    }

    #[test]
    fn test_render_applies_current_yaw() {
        let assets = FakeAssets::default();
        assets.serve("model", TRIANGLE_OBJ);

        let (mut controller, rotation) = controller();
        controller.load_model(&assets, "model").unwrap();
        controller.start_render_loop();

        let mut mapper = GestureMapper::new(rotation);
        mapper.begin_drag();
        mapper.on_move(300.0);

        assert!(controller.render().is_some());
        let yaw = controller.scene().model().unwrap().rotation_y();
        assert!((yaw - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_render_without_model_is_tolerated() {
        let (mut controller, rotation) = controller();
        rotation.add(1.0);
        controller.start_render_loop();
        assert!(controller.render().is_some());
    }

    #[test]
    fn test_stopped_loop_renders_nothing() {
        let (mut controller, _) = controller();
        assert!(controller.render().is_none());

        let token = controller.start_render_loop();
        assert!(controller.render().is_some());

        token.cancel();
        assert!(controller.render().is_none());
    }

    #[test]
    fn test_resize_rebuilds_camera_only_on_change() {
        let assets = FakeAssets::default();
        assets.serve("model", TRIANGLE_OBJ);
        let (mut controller, _) = controller();
        controller.load_model(&assets, "model").unwrap();

        assert!(!controller.resize(Surface::new(48, 32)));
        assert!(controller.resize(Surface::new(100, 50)));
        assert_eq!(controller.frame().dimensions(), (100, 50));
        assert_eq!(controller.scene().camera.aspect_ratio(), 2.0);
        assert!(controller.scene().model().is_some());
    }
}
