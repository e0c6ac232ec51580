use super::state::ViewerApp;
use eframe::egui::Response;

impl ViewerApp {
    /// Feeds horizontal drag motion over the viewport into the gesture mapper.
    pub fn viewport_drag(&mut self, response: &Response) {
        if response.drag_started() {
            self.gestures.begin_drag();
        }

        if response.dragged() {
            let dx = response.drag_delta().x;
            if dx != 0.0 {
                self.gestures.on_move(dx.into());
            }
        }

        if response.drag_stopped() {
            self.gestures.end_drag();
        }
    }
}
