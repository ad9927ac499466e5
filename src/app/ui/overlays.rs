use eframe::egui::{
    self, Align2, Color32, Context, CornerRadius, Id, Order, RichText, Stroke, Vec2, vec2,
};

use crate::map::node::NodeKind;
use crate::map::{InfoPanel, SessionEvent, Side};
use crate::util::zoom_percent;

use super::super::MapView;
use super::super::render_utils::TEXT_ACCENT;

const PANEL_WIDTH: f32 = 256.0;
const PANEL_TOP: f32 = 140.0;

pub(super) fn panel_frame() -> egui::Frame {
    egui::Frame::NONE
        .fill(Color32::from_rgba_unmultiplied(0, 0, 0, 178))
        .stroke(Stroke::new(1.0, Color32::from_gray(55)))
        .corner_radius(CornerRadius::same(8))
        .inner_margin(12.0)
}

fn bottom_area(id: &str, offset: f32) -> egui::Area {
    egui::Area::new(Id::new(id))
        .order(Order::Foreground)
        .anchor(Align2::CENTER_BOTTOM, vec2(0.0, -offset))
}

impl MapView {
    pub(in crate::app) fn draw_overlays(&mut self, ctx: &Context, back_requested: &mut bool) {
        self.draw_back_button(ctx, back_requested);
        self.draw_info_panels(ctx);
        self.draw_tooltip(ctx);
        draw_legend(ctx);
        self.draw_zoom_indicator(ctx);
        self.draw_tutorial(ctx);
        self.draw_split(ctx);
        self.draw_merged_view(ctx);
        self.draw_emotion_wheel(ctx);
        self.draw_belief_builder(ctx);
        self.draw_toast(ctx);
    }

    fn draw_back_button(&mut self, ctx: &Context, back_requested: &mut bool) {
        egui::Area::new(Id::new("back"))
            .order(Order::Foreground)
            .anchor(Align2::LEFT_TOP, vec2(16.0, 16.0))
            .show(ctx, |ui| {
                if ui.button("< Back").clicked() {
                    *back_requested = true;
                }
            });
    }

    fn draw_toast(&mut self, ctx: &Context) {
        if self.session.continue_visible() {
            bottom_area("continue", 32.0).show(ctx, |ui| {
                let button = egui::Button::new(RichText::new("Continue").size(17.0))
                    .min_size(vec2(160.0, 40.0));
                if ui.add(button).clicked() {
                    self.session.apply(SessionEvent::ContinueAfterEmotion);
                }
            });
            return;
        }

        let Some(text) = self.session.toast() else {
            return;
        };
        let offset = if self.session.belief_builder_visible() { 112.0 } else { 32.0 };
        bottom_area("toast", offset).interactable(false).show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.label(RichText::new(text).size(17.0).color(Color32::WHITE));
            });
        });
    }

    fn draw_tutorial(&mut self, ctx: &Context) {
        if !self.session.tutorial_visible() {
            return;
        }

        egui::Area::new(Id::new("tutorial"))
            .order(Order::Foreground)
            .anchor(Align2::CENTER_TOP, vec2(0.0, 32.0))
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.horizontal(|ui| {
                            ui.label("drag to explore");
                            ui.separator();
                            ui.label("pinch to zoom");
                            ui.separator();
                            ui.label("tap for more");
                            ui.separator();
                            if ui.button("Skip").clicked() {
                                self.session.apply(SessionEvent::DismissTutorial);
                            }
                        });
                        ui.label(
                            RichText::new("(Tap a node or pinch to zoom to continue)")
                                .small()
                                .weak(),
                        );
                    });
                });
            });
    }

    fn draw_info_panels(&mut self, ctx: &Context) {
        for panel in self.session.info_panels() {
            self.draw_info_panel(ctx, panel);
        }
    }

    fn draw_info_panel(&mut self, ctx: &Context, panel: InfoPanel) {
        let Some(node) = self.session.nodes().get(panel.node) else {
            return;
        };
        let (title, kind, body) = if panel.belief_side {
            (
                "Belief created: Unknown (yet).".to_owned(),
                "Hidden".to_owned(),
                "Every experience carries a deeper layer: a belief it created, strengthened or broke apart.",
            )
        } else {
            (
                node.display_title(),
                node.kind.label().to_owned(),
                "This experience has left a mark, shaping the way you think and move forward.",
            )
        };

        let (align, offset) = match panel.side {
            Side::Left => (Align2::LEFT_TOP, vec2(16.0, PANEL_TOP)),
            Side::Right => (Align2::RIGHT_TOP, vec2(-16.0, PANEL_TOP)),
        };

        let mut close = false;
        egui::Area::new(Id::new(("info-panel", panel.side, panel.belief_side)))
            .order(Order::Foreground)
            .anchor(align, offset)
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    ui.set_width(PANEL_WIDTH);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(title).strong().size(15.0).color(Color32::WHITE));
                        if panel.closable {
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                                close = ui.small_button("x").clicked();
                            });
                        }
                    });
                    ui.label(RichText::new(kind).small().color(TEXT_ACCENT));
                    ui.add_space(6.0);
                    ui.label(RichText::new(body).color(Color32::from_gray(160)));
                });
            });

        if close {
            self.session.apply(SessionEvent::CloseInfo);
        }
    }

    fn draw_tooltip(&self, ctx: &Context) {
        let Some(tooltip) = self.session.tooltip() else {
            return;
        };

        egui::Area::new(Id::new("node-tooltip"))
            .order(Order::Tooltip)
            .interactable(false)
            .fixed_pos(self.canvas_rect.min + tooltip.pos.to_vec2() + Vec2::splat(15.0))
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    ui.label(RichText::new(&tooltip.text).strong().color(Color32::WHITE));
                });
            });
    }

    fn draw_zoom_indicator(&self, ctx: &Context) {
        egui::Area::new(Id::new("zoom-indicator"))
            .order(Order::Foreground)
            .interactable(false)
            .anchor(Align2::LEFT_BOTTOM, vec2(16.0, -16.0))
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    ui.label(zoom_percent(self.session.viewport().zoom));
                });
            });
    }
}

fn draw_legend(ctx: &Context) {
    egui::Area::new(Id::new("node-legend"))
        .order(Order::Foreground)
        .interactable(false)
        .anchor(Align2::RIGHT_BOTTOM, vec2(-16.0, -16.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(180.0);
                ui.label(RichText::new("NODE TYPES").strong().color(Color32::WHITE));
                for kind in NodeKind::ALL {
                    ui.label(RichText::new(kind.legend()).small().weak());
                }
            });
        });
}
