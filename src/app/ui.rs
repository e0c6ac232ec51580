use super::state::ViewerApp;
use crate::controller::Surface;
use eframe::egui::{
    self, Align2, CentralPanel, Color32, ColorImage, Context, Sense, TextEdit, TopBottomPanel, Ui,
    Vec2,
};

impl ViewerApp {
    pub fn render_ui(&mut self, ctx: &Context) {
        self.poll_tasks();

        // Нижняя панель: рост и действия
        TopBottomPanel::bottom("controls_panel").show(ctx, |ui| {
            ui.add_space(8.0);
            self.render_controls(ui);
            ui.add_space(8.0);
        });

        // Окно просмотра на всё оставшееся место
        CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.render_viewport(ui));

        if self.is_loading() {
            self.render_loading_modal(ctx);
        }
        self.render_notice(ctx);

        let rendering = self.controller().is_some_and(|c| c.is_rendering());
        if rendering || self.is_loading() {
            ctx.request_repaint();
        }
    }

    fn render_controls(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add(
                TextEdit::singleline(&mut self.height)
                    .hint_text("Enter height (in meters)")
                    .desired_width(240.0),
            );

            if let Some(selected) = &self.selected_image {
                let name = selected
                    .rsplit(['/', '\\'])
                    .next()
                    .filter(|_| !selected.starts_with("data:"))
                    .unwrap_or("embedded image");
                ui.label(format!("Selected: {}", name));
            }

            if ui.add_sized(Vec2::new(160.0, 32.0), egui::Button::new("Pick Image")).clicked() {
                self.pick_image();
            }
        });

        ui.add_space(6.0);
        ui.columns(3, |columns| {
            if columns[0].button("Upload Image").clicked() {
                self.upload_image();
            }
            if columns[1].button("Generate").clicked() {
                self.generate();
            }
            if columns[2].button("Reload Model").clicked() {
                self.reload_model();
            }
        });
    }

    fn render_viewport(&mut self, ui: &mut Ui) {
        let available_size = ui.available_size();

        // Размер поверхности в физических пикселях
        let pixels_per_point = ui.ctx().pixels_per_point();
        let width = (available_size.x * pixels_per_point) as u32;
        let height = (available_size.y * pixels_per_point) as u32;
        if width == 0 || height == 0 {
            return;
        }
        self.attach_surface(Surface::new(width, height));

        self.update_frame(ui.ctx());

        let response = match &self.texture {
            Some(texture) => ui.add(
                egui::Image::new((texture.id(), available_size)).sense(Sense::drag()),
            ),
            None => ui.allocate_response(available_size, Sense::drag()),
        };
        self.viewport_drag(&response);
    }

    /// Renders one frame and uploads it to the viewport texture.
    fn update_frame(&mut self, ctx: &Context) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        let Some(frame) = controller.render() else {
            return;
        };

        let egui_image = ColorImage::from_rgb(
            [frame.width() as usize, frame.height() as usize],
            frame.as_raw(),
        );

        match &mut self.texture {
            Some(texture) => texture.set(egui_image, Default::default()),
            None => {
                self.texture =
                    Some(ctx.load_texture("rendered_image", egui_image, Default::default()))
            }
        }
    }

    fn render_loading_modal(&self, ctx: &Context) {
        egui::Modal::new(egui::Id::new("loading_modal")).show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add(egui::Spinner::new().size(36.0).color(Color32::from_rgb(0, 0, 255)));
                ui.add_space(10.0);
                ui.label("Loading...");
            });
        });
    }

    fn render_notice(&mut self, ctx: &Context) {
        let Some(message) = self.current_notice().map(str::to_owned) else {
            return;
        };

        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.separator();
                if ui.add_sized(Vec2::new(120.0, 32.0), egui::Button::new("OK")).clicked() {
                    self.dismiss_notice();
                }
            });
    }
}
