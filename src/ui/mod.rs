//! Caption overlay drawn with egui on top of the scene.

use crate::gallery::DisplayState;

/// Seconds taken to fade the caption in or out.
pub const CAPTION_FADE_SECONDS: f32 = 0.25;

const TITLE_SIZE: f32 = 32.0;
const ARTIST_SIZE: f32 = 20.0;
const BOTTOM_MARGIN: f32 = 48.0;

/// Draw the title and artist centred near the bottom of the window.
///
/// The caption never takes pointer input, so clicks always reach the scene.
pub fn draw_caption(ctx: &egui::Context, display: &DisplayState) {
    let opacity = ctx.animate_bool_with_time(
        egui::Id::new("caption_visibility"),
        display.visible,
        CAPTION_FADE_SECONDS,
    );
    if opacity <= 0.0 {
        return;
    }

    let alpha = (opacity * 255.0).round() as u8;
    let title_color = egui::Color32::from_rgba_unmultiplied(255, 255, 255, alpha);
    let artist_color = egui::Color32::from_rgba_unmultiplied(200, 200, 200, alpha);

    egui::Area::new(egui::Id::new("caption"))
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -BOTTOM_MARGIN))
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(&display.title)
                        .size(TITLE_SIZE)
                        .strong()
                        .color(title_color),
                );
                ui.label(
                    egui::RichText::new(&display.artist)
                        .size(ARTIST_SIZE)
                        .color(artist_color),
                );
            });
        });
}
