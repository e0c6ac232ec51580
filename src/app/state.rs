use super::actions::{
    self, INITIAL_LOAD_FAILED, NO_IMAGE_PICKED, PERMISSION_REQUIRED, PickOutcome,
};
use super::picker::ImagePicker;
use super::tasks::{Executor, PendingOp, TaskPoll};
use crate::api::{ApiError, AssetSource, ServerApi};
use crate::config::AppConfig;
use crate::controller::{SceneController, Surface};
use crate::input::{GestureMapper, RotationState};
use crate::objects::pivot::Pivot;
use crate::scene::{self, BackgroundError, ModelLoadError};
use eframe::egui::TextureHandle;
use image::RgbImage;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelLoadKind {
    Initial,
    Reload,
}

type ModelResult = Result<Pivot, ModelLoadError>;
type MessageResult = Result<String, ApiError>;

pub struct ViewerApp {
    pub(super) config: AppConfig,
    assets: Arc<dyn AssetSource>,
    api: Arc<dyn ServerApi>,
    picker: Box<dyn ImagePicker>,
    executor: Executor,

    pub(super) texture: Option<TextureHandle>,
    pub(super) controller: Option<SceneController>,
    rotation: RotationState,
    pub(super) gestures: GestureMapper,

    // UI state
    pub selected_image: Option<String>,
    pub height: String,
    notices: VecDeque<String>,

    // In-flight operations
    model_load: Option<(ModelLoadKind, PendingOp<ModelResult>)>,
    background_load: Option<PendingOp<Result<RgbImage, BackgroundError>>>,
    upload: Option<PendingOp<MessageResult>>,
    generate: Option<PendingOp<MessageResult>>,
}

impl ViewerApp {
    pub fn new(
        config: AppConfig,
        assets: Arc<dyn AssetSource>,
        api: Arc<dyn ServerApi>,
        picker: Box<dyn ImagePicker>,
        executor: Executor,
    ) -> Self {
        let rotation = RotationState::default();

        Self {
            config,
            assets,
            api,
            picker,
            executor,
            texture: None,
            controller: None,
            gestures: GestureMapper::new(rotation.clone()),
            rotation,
            selected_image: None,
            height: String::new(),
            notices: VecDeque::new(),
            model_load: None,
            background_load: None,
            upload: None,
            generate: None,
        }
    }

    pub fn controller(&self) -> Option<&SceneController> {
        self.controller.as_ref()
    }

    /// Drives the blocking modal.
    pub fn is_loading(&self) -> bool {
        self.model_load.is_some() || self.upload.is_some() || self.generate.is_some()
    }

    pub fn current_notice(&self) -> Option<&str> {
        self.notices.front().map(String::as_str)
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("Notice: {}", message);
        self.notices.push_back(message);
    }

    /// Binds the scene to the drawing surface. The first call creates the
    /// scene and starts loading the background and the model, later calls
    /// only follow size changes.
    pub fn attach_surface(&mut self, surface: Surface) {
        if let Some(controller) = &mut self.controller {
            controller.resize(surface);
            return;
        }

        self.controller = Some(SceneController::initialize(surface, self.rotation.clone()));
        self.start_background_load();
        self.start_model_load(ModelLoadKind::Initial);
    }

    /// Stops the render loop. The next `attach_surface` sets everything up again.
    pub fn detach_surface(&mut self) {
        if let Some(mut controller) = self.controller.take() {
            controller.stop_render_loop();
        }
        self.texture = None;
    }

    fn start_background_load(&mut self) {
        let assets = Arc::clone(&self.assets);
        let url = self.config.background_url.clone();
        self.background_load = Some(PendingOp::spawn(self.executor, "background", move || {
            scene::fetch_background(assets.as_ref(), &url)
        }));
    }

    fn start_model_load(&mut self, kind: ModelLoadKind) {
        if self.model_load.is_some() {
            return;
        }
        let assets = Arc::clone(&self.assets);
        let url = self.config.model_url();
        log::info!("Loading model from {}", url);

        let op = PendingOp::spawn(self.executor, "model-load", move || {
            scene::prepare_model(assets.as_ref(), &url)
        });
        self.model_load = Some((kind, op));
    }

    pub fn pick_image(&mut self) {
        match actions::pick_image(self.picker.as_mut()) {
            PickOutcome::Selected(uri) => {
                log::info!("Selected image {}", uri);
                self.selected_image = Some(uri);
            }
            PickOutcome::PermissionDenied => self.notify(PERMISSION_REQUIRED),
            PickOutcome::NothingSelected => self.notify(NO_IMAGE_PICKED),
        }
    }

    pub fn upload_image(&mut self) {
        if self.upload.is_some() {
            return;
        }
        let draft = match actions::validate_upload(self.selected_image.as_deref(), &self.height) {
            Ok(draft) => draft,
            Err(e) => {
                self.notify(e.to_string());
                return;
            }
        };

        // The image is read and encoded on the worker
        let api = Arc::clone(&self.api);
        self.upload = Some(PendingOp::spawn(self.executor, "upload", move || {
            api.upload(&draft.into_request())
        }));
    }

    pub fn generate(&mut self) {
        if self.generate.is_some() {
            return;
        }
        let api = Arc::clone(&self.api);
        self.generate = Some(PendingOp::spawn(self.executor, "generate", move || {
            api.generate()
        }));
    }

    /// Re-runs the model load against the existing scene. Ignored before
    /// the scene exists.
    pub fn reload_model(&mut self) {
        if self.controller.is_some() {
            self.start_model_load(ModelLoadKind::Reload);
        }
    }

    /// Applies finished operations. Every completion path, including a lost
    /// worker, clears the operation so the loading modal goes away.
    pub fn poll_tasks(&mut self) {
        self.poll_model_load();
        self.poll_background();

        if let Some(result) = take_finished(&mut self.upload) {
            let result = result.unwrap_or_else(|| Err(lost_worker()));
            if let Err(e) = &result {
                log::error!("Error uploading image: {}", e);
            }
            self.notify(actions::upload_notice(&result));
        }

        if let Some(result) = take_finished(&mut self.generate) {
            let result = result.unwrap_or_else(|| Err(lost_worker()));
            if let Err(e) = &result {
                log::error!("Generate failed: {}", e);
            }
            self.notify(actions::generate_notice(&result));
        }
    }

    fn poll_model_load(&mut self) {
        let Some((kind, op)) = &self.model_load else {
            return;
        };
        let kind = *kind;
        let result = match op.poll() {
            TaskPoll::Pending => return,
            TaskPoll::Ready(result) => result,
            TaskPoll::Lost => Err(ModelLoadError::Fetch(lost_worker())),
        };
        self.model_load = None;

        let outcome = match result {
            Ok(pivot) => {
                if let Some(controller) = &mut self.controller {
                    controller.attach_model(pivot);
                }
                Ok(())
            }
            Err(e) => {
                log::error!("Error loading model: {}", e);
                Err(e)
            }
        };

        match kind {
            ModelLoadKind::Initial => {
                if let Some(controller) = &mut self.controller {
                    controller.start_render_loop();
                }
                if outcome.is_err() {
                    self.notify(INITIAL_LOAD_FAILED);
                }
            }
            ModelLoadKind::Reload => self.notify(actions::reload_notice(&outcome)),
        }
    }

    fn poll_background(&mut self) {
        match take_finished(&mut self.background_load) {
            Some(Some(Ok(image))) => {
                log::info!("Background loaded successfully");
                if let Some(controller) = &mut self.controller {
                    controller.set_background(image);
                }
            }
            Some(Some(Err(e))) => log::error!("Error loading background image: {}", e),
            Some(None) => log::error!("Background worker exited without a result"),
            None => {}
        }
    }
}

/// `Some(Some(v))` when done, `Some(None)` when the worker was lost, `None` while pending.
fn take_finished<T: Send + 'static>(slot: &mut Option<PendingOp<T>>) -> Option<Option<T>> {
    let finished = match slot.as_ref()?.poll() {
        TaskPoll::Pending => return None,
        TaskPoll::Ready(value) => Some(value),
        TaskPoll::Lost => None,
    };
    *slot = None;
    Some(finished)
}

fn lost_worker() -> ApiError {
    ApiError::Transport("request worker exited unexpectedly".to_string())
}
