use std::f32::consts::PI;

use eframe::egui::{self, Align2, Color32, Context, Id, Order, Pos2, RichText, Stroke, vec2};

use crate::map::{SessionEvent, Side, Stage};

use super::super::MapView;
use super::super::render_utils::blend_color;

/// Spreads `count` points along the arc on `side` of the node.
fn wheel_positions(center: Pos2, radius: f32, count: usize, side: Side) -> Vec<Pos2> {
    if count == 0 {
        return Vec::new();
    }

    let span = PI * 0.8;
    let mid = match side {
        Side::Right => 0.0,
        Side::Left => PI,
    };
    (0..count)
        .map(|index| {
            let t = if count == 1 {
                0.5
            } else {
                index as f32 / (count - 1) as f32
            };
            let angle = mid - span * 0.5 + span * t;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

impl MapView {
    pub(super) fn draw_emotion_wheel(&mut self, ctx: &Context) {
        if self.session.stage() != Stage::EmotionSelection || !self.session.split_visible() {
            return;
        }
        let Some((center, radius)) = self.focus_circle() else {
            return;
        };

        let side = self.session.split().belief_side.unwrap_or(Side::Right);
        let emotions = self.session.emotions().to_vec();
        let selected = self.session.selected_emotion().map(|emotion| emotion.name.clone());
        let positions = wheel_positions(center, radius + 70.0, emotions.len(), side);

        let mut picked = None;
        for (emotion, pos) in emotions.iter().zip(positions) {
            let [r, g, b] = emotion.color;
            let base = Color32::from_rgb(r, g, b);
            let is_selected = selected.as_deref() == Some(emotion.name.as_str());
            let fill = if is_selected {
                blend_color(base, Color32::WHITE, 0.25)
            } else {
                base.gamma_multiply(0.55)
            };

            egui::Area::new(Id::new(("emotion", emotion.name.as_str())))
                .order(Order::Foreground)
                .pivot(Align2::CENTER_CENTER)
                .fixed_pos(pos)
                .show(ctx, |ui| {
                    let stroke = if is_selected {
                        Stroke::new(2.0, Color32::WHITE)
                    } else {
                        Stroke::new(1.0, base)
                    };
                    let button = egui::Button::new(RichText::new(&emotion.name).color(Color32::WHITE))
                        .fill(fill)
                        .stroke(stroke)
                        .corner_radius(14.0)
                        .min_size(vec2(96.0, 28.0));
                    if ui.add(button).clicked() {
                        picked = Some(emotion.clone());
                    }
                });
        }

        if let Some(emotion) = picked {
            self.session.apply(SessionEvent::SelectEmotion(emotion));
        }
    }
}
