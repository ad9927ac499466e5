use eframe::egui::{
    self, Align2, Color32, Context, FontId, Id, Order, Painter, Pos2, Rect, Sense, Shape, Stroke,
    Vec2, vec2,
};

use crate::map::{SessionEvent, Side, Stage};

use super::super::MapView;
use super::super::render_utils::{TEXT_ACCENT, blend_color, half_disc, with_alpha};

const EVENT_TEXT: &str = "The event\nas it happened.";
const BELIEF_TEXT: &str = "Belief formed\nbecause of it.";

impl MapView {
    /// Screen circle of the focused node.
    pub(super) fn focus_circle(&self) -> Option<(Pos2, f32)> {
        let node = self.session.focused_node()?;
        let viewport = self.session.viewport();
        let center = self.canvas_rect.min + viewport.world_to_screen(node.pos).to_vec2();
        Some((center, node.radius * viewport.zoom))
    }

    pub(super) fn draw_split(&mut self, ctx: &Context) {
        if !self.session.split_visible() || self.session.merged() {
            return;
        }
        let Some((center, radius)) = self.focus_circle() else {
            return;
        };

        let split = self.session.split();
        let choosing = self.session.stage() == Stage::NodeFocus;
        let belief_side = split.belief_side;
        let bounds = Rect::from_center_size(center, Vec2::splat(radius * 2.0));

        let mut tapped = None;
        egui::Area::new(Id::new("node-split"))
            .order(Order::Middle)
            .fixed_pos(bounds.min)
            .show(ctx, |ui| {
                let (rect, response) = ui.allocate_exact_size(bounds.size(), Sense::click());
                let center = rect.center();
                let painter = ui.painter();

                let hover_side = response
                    .hover_pos()
                    .filter(|pos| pos.distance(center) <= radius)
                    .map(|pos| if pos.x < center.x { Side::Left } else { Side::Right });

                for side in [Side::Left, Side::Right] {
                    let base = match side {
                        Side::Left => Color32::from_rgba_unmultiplied(180, 180, 180, 102),
                        Side::Right => Color32::from_rgba_unmultiplied(100, 100, 100, 102),
                    };
                    let can_pick = choosing && !split.contains(side);
                    let fill = if can_pick && hover_side == Some(side) {
                        blend_color(base, Color32::from_rgba_unmultiplied(200, 200, 200, 150), 0.4)
                    } else {
                        base
                    };
                    let faded = !choosing && belief_side.map(Side::other) == Some(side);
                    let opacity = if faded { 0.3 } else { 1.0 };

                    painter.add(Shape::convex_polygon(
                        half_disc(center, radius, side == Side::Left, 48),
                        fill.gamma_multiply(opacity),
                        Stroke::new(2.0, Color32::from_gray(136).gamma_multiply(opacity)),
                    ));

                    let label = if split.second == Some(side) {
                        Some(BELIEF_TEXT)
                    } else if split.first == Some(side) {
                        Some(EVENT_TEXT)
                    } else {
                        None
                    };
                    if let Some(label) = label {
                        draw_half_label(painter, center, radius, side, label, opacity);
                    }
                }

                painter.line_segment(
                    [center - vec2(0.0, radius), center + vec2(0.0, radius)],
                    Stroke::new(1.0, Color32::from_gray(136)),
                );

                if choosing
                    && response.clicked()
                    && let Some(pos) = response.interact_pointer_pos()
                    && pos.distance(center) <= radius
                {
                    tapped = Some(if pos.x < center.x { Side::Left } else { Side::Right });
                }
            });

        if let Some(side) = tapped {
            self.session.apply(SessionEvent::HalfTap(side));
        }
    }

    pub(super) fn draw_merged_view(&self, ctx: &Context) {
        if !self.session.merged() {
            return;
        }
        let (Some(node), Some(belief)) = (self.session.focused_node(), self.session.completed_belief())
        else {
            return;
        };
        let Some((center, radius)) = self.focus_circle() else {
            return;
        };

        let painter = ctx.layer_painter(egui::LayerId::new(Order::Middle, Id::new("merged-view")));
        painter.circle(
            center,
            radius,
            Color32::from_rgba_unmultiplied(180, 180, 180, 76),
            Stroke::new(2.0, Color32::from_gray(136)),
        );

        let wrap = radius * 1.4;
        let title = node.display_title();
        let lines = [
            ("The Belief", 12.0, TEXT_ACCENT),
            (belief.full_sentence.as_str(), 18.0, Color32::WHITE),
            ("The Event", 12.0, TEXT_ACCENT),
            (title.as_str(), 16.0, Color32::from_gray(220)),
            ("Seed Experience", 11.0, Color32::from_gray(150)),
        ]
        .map(|(text, size, color)| painter.layout(text.to_owned(), FontId::proportional(size), color, wrap));

        let gap = 8.0;
        let total = lines.iter().map(|galley| galley.size().y).sum::<f32>() + gap * 4.0;
        let mut y = center.y - total * 0.5;
        for galley in lines {
            let size = galley.size();
            painter.galley(Pos2::new(center.x - size.x * 0.5, y), galley, Color32::WHITE);
            y += size.y + gap;
        }
    }
}

fn draw_half_label(painter: &Painter, center: Pos2, radius: f32, side: Side, text: &str, opacity: f32) {
    let width = radius * 0.7;
    let height = radius * 0.6;
    let inset = radius * 0.25;
    let box_center = match side {
        Side::Left => Pos2::new(center.x - radius + inset + width * 0.5, center.y),
        Side::Right => Pos2::new(center.x + radius - inset - width * 0.5, center.y),
    };
    let rect = Rect::from_center_size(box_center, vec2(width, height));

    painter.rect_filled(rect, 18.0, with_alpha(Color32::from_rgb(31, 31, 30), 0.7 * opacity));
    painter.text(
        box_center,
        Align2::CENTER_CENTER,
        text,
        FontId::proportional((radius * 0.08).max(14.0)),
        Color32::WHITE.gamma_multiply(opacity),
    );
}
