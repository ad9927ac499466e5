use eframe::egui::{self, Color32, Pos2, Rect, Sense, Stroke, TextureHandle, Ui};

use crate::map::node::Node;
use crate::map::{Session, SessionEvent, Stage};

use super::super::MapView;
use super::super::render_utils::{
    circle_visible, draw_loading_backdrop, full_uv, segment_visible, square_at, with_alpha,
};

const EDGE_RANGE: f32 = 400.0;
const DIM_ALPHA: f32 = 0.3;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct NodeFlags {
    selected: bool,
    hovered: bool,
    prompt: bool,
    highlighted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct RingStyle {
    /// Screen-space offset added to the ring radius.
    pulse: f32,
    color: Color32,
    width: f32,
    alpha: f32,
}

fn ring_style(flags: NodeFlags, id: usize, time_ms: f64) -> Option<RingStyle> {
    if !(flags.selected || flags.hovered || flags.prompt || flags.highlighted) {
        return None;
    }

    let t = time_ms as f32;
    if flags.prompt {
        return Some(RingStyle {
            pulse: (t / 250.0).sin() * 6.0,
            color: Color32::from_gray(204),
            width: 2.0,
            alpha: 0.6,
        });
    }

    let phase = if flags.highlighted { 0.0 } else { id as f32 };
    let (color, width, alpha) = if flags.highlighted {
        (Color32::WHITE, 3.0, 0.8)
    } else if flags.selected {
        (Color32::WHITE, 2.0, 0.6)
    } else {
        (Color32::from_gray(170), 1.0, 0.6)
    };

    Some(RingStyle {
        pulse: (t / 400.0 + phase).sin() * 4.0,
        color,
        width,
        alpha,
    })
}

/// Breathing scale of the node body.
fn body_scale(flags: NodeFlags, id: usize, time_ms: f64) -> f32 {
    let t = time_ms as f32;
    if flags.prompt {
        1.0 + (t / 800.0 + id as f32 * 0.3).sin() * 0.03
    } else if flags.highlighted {
        1.0 + (t / 600.0).sin() * 0.02
    } else {
        1.0
    }
}

fn edge_alpha(distance: f32, dimmed: bool) -> Option<f32> {
    if distance >= EDGE_RANGE {
        return None;
    }
    let falloff = (1.0 - distance / EDGE_RANGE).max(0.0);
    Some(falloff * if dimmed { 0.1 } else { 0.3 })
}

fn node_flags(session: &Session, index: usize) -> NodeFlags {
    let dimmed = session.is_dimmed();
    NodeFlags {
        selected: session.selected() == Some(index),
        hovered: session.hovered() == Some(index),
        prompt: session.stage() == Stage::SelectionPrompt,
        highlighted: dimmed && session.focused() == Some(index),
    }
}

/// Paints edges and nodes. Reads the session, never mutates it.
fn paint_map(
    painter: &egui::Painter,
    rect: Rect,
    session: &Session,
    seed: Option<&TextureHandle>,
    time_ms: f64,
) {
    painter.rect_filled(rect, 0.0, Color32::BLACK);
    if session.stage() == Stage::Loading {
        draw_loading_backdrop(painter, rect, time_ms / 1000.0);
    }

    let nodes = session.nodes();
    if nodes.is_empty() {
        return;
    }

    let viewport = session.viewport();
    let zoom = viewport.zoom;
    let dimmed = session.is_dimmed();
    let to_screen = |node: &Node| -> Pos2 { rect.min + viewport.world_to_screen(node.pos).to_vec2() };

    let edge_color = Color32::from_gray(51);
    for (a_index, a) in nodes.iter().enumerate() {
        for b in &nodes[a_index + 1..] {
            let Some(alpha) = edge_alpha((b.pos - a.pos).length(), dimmed) else {
                continue;
            };
            let (start, end) = (to_screen(a), to_screen(b));
            if !segment_visible(rect, start, end) {
                continue;
            }
            painter.line_segment(
                [start, end],
                Stroke::new(zoom.max(0.5), with_alpha(edge_color, alpha)),
            );
        }
    }

    for (index, node) in nodes.iter().enumerate() {
        let center = to_screen(node);
        let radius = node.radius * zoom;
        if !circle_visible(rect, center, radius * 1.4 + 8.0) {
            continue;
        }

        let flags = node_flags(session, index);
        let body_alpha = if dimmed && !flags.highlighted { DIM_ALPHA } else { 1.0 };

        if let Some(ring) = ring_style(flags, node.id, time_ms) {
            painter.circle_stroke(
                center,
                (radius * 1.2 + ring.pulse).max(0.0),
                Stroke::new(ring.width, with_alpha(ring.color, ring.alpha)),
            );
        }

        let scaled = radius * body_scale(flags, node.id, time_ms);
        match seed.filter(|_| node.has_image) {
            Some(texture) => {
                painter.image(
                    texture.id(),
                    square_at(center, scaled * 2.0),
                    full_uv(),
                    Color32::WHITE.gamma_multiply(body_alpha),
                );
            }
            None => {
                painter.circle_filled(center, scaled, with_alpha(Color32::from_gray(45), body_alpha));
                painter.circle_stroke(
                    center,
                    scaled,
                    Stroke::new(2.0, with_alpha(Color32::from_gray(102), body_alpha)),
                );
            }
        }
    }
}

impl MapView {
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.canvas_rect = rect;

        if self.session.canvas_size() != rect.size() {
            self.session.apply(SessionEvent::Resize(rect.size()));
        }

        self.handle_canvas_input(ui, rect, &response);

        let now_ms = ui.input(|input| input.time) * 1000.0;
        self.session.tick(now_ms);
        if self.seed_texture.is_some() && self.session.nodes().iter().any(|node| !node.has_image) {
            self.session.attach_images();
        }

        let painter = ui.painter_at(rect);
        paint_map(&painter, rect, &self.session, self.seed_texture.as_ref(), now_ms);

        let cursor = if self.session.input_locked() {
            egui::CursorIcon::Default
        } else if self.session.dragging().is_some() || self.session.is_panning() {
            egui::CursorIcon::Grabbing
        } else if self.session.hovered().is_some() {
            egui::CursorIcon::PointingHand
        } else {
            egui::CursorIcon::Grab
        };
        if response.hovered() {
            ui.output_mut(|output| output.cursor_icon = cursor);
        }

        ui.ctx().request_repaint();
    }
}
