// Экран просмотра: состояние, UI, ввод и фоновые операции
pub mod actions;
pub mod input;
pub mod picker;
pub mod state;
pub mod tasks;
pub mod ui;

pub use state::ViewerApp;

use eframe::egui::Context;
use eframe::{App, Frame};

impl App for ViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        self.render_ui(ctx);
    }

    // Окно закрывается: останавливаем цикл отрисовки
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.detach_surface();
    }
}

impl Drop for ViewerApp {
    fn drop(&mut self) {
        self.detach_surface();
    }
}
