use eframe::egui::{self, Pos2, Rect, TouchId, TouchPhase, Ui};

use crate::map::SessionEvent;

use super::super::MapView;

/// Live touch points in arrival order; the first two drive a pinch.
#[derive(Default)]
pub(in crate::app) struct TouchTracker {
    points: Vec<(TouchId, Pos2)>,
    pinching: bool,
}

impl TouchTracker {
    fn record(&mut self, id: TouchId, phase: TouchPhase, pos: Pos2) {
        match phase {
            TouchPhase::Start | TouchPhase::Move => {
                if let Some(entry) = self.points.iter_mut().find(|(touch, _)| *touch == id) {
                    entry.1 = pos;
                } else {
                    self.points.push((id, pos));
                }
            }
            TouchPhase::End | TouchPhase::Cancel => {
                self.points.retain(|(touch, _)| *touch != id);
            }
        }
    }

    fn pair(&self) -> Option<(Pos2, Pos2)> {
        match self.points.as_slice() {
            [(_, a), (_, b), ..] => Some((*a, *b)),
            _ => None,
        }
    }

    fn is_active(&self) -> bool {
        self.pinching || self.points.len() >= 2
    }
}

fn canvas_local(rect: Rect, pos: Pos2) -> Pos2 {
    (pos - rect.min).to_pos2()
}

impl MapView {
    /// Translates this frame's egui input into session events.
    pub(in crate::app) fn handle_canvas_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let (touch_events, hover_pos, pressed, released, pointer_moved, gone, scroll, zoom_delta) =
            ui.input(|input| {
                let touches = input
                    .events
                    .iter()
                    .filter_map(|event| match event {
                        egui::Event::Touch { id, phase, pos, .. } => Some((*id, *phase, *pos)),
                        _ => None,
                    })
                    .collect::<Vec<_>>();
                let gone = input
                    .events
                    .iter()
                    .any(|event| matches!(event, egui::Event::PointerGone));
                (
                    touches,
                    input.pointer.hover_pos(),
                    input.pointer.primary_pressed(),
                    input.pointer.primary_released(),
                    input.pointer.is_moving(),
                    gone,
                    input.raw_scroll_delta.y,
                    input.zoom_delta(),
                )
            });

        for (id, phase, pos) in touch_events {
            self.touches.record(id, phase, pos);
        }
        self.handle_pinch(rect);

        let hovered = response.hovered();
        let inside = hover_pos.is_some_and(|pos| rect.contains(pos));

        if !self.touches.is_active() {
            if pressed
                && hovered
                && let Some(pos) = hover_pos
            {
                self.session.apply(SessionEvent::PointerDown(canvas_local(rect, pos)));
            }

            let tracking = self.session.dragging().is_some() || self.session.is_panning();
            if pointer_moved
                && (inside || tracking)
                && let Some(pos) = hover_pos
            {
                self.session.apply(SessionEvent::PointerMove(canvas_local(rect, pos)));
            }

            if hovered && (zoom_delta - 1.0).abs() > f32::EPSILON {
                let anchor = hover_pos.unwrap_or_else(|| rect.center());
                self.session.apply(SessionEvent::ZoomFactor {
                    pos: canvas_local(rect, anchor),
                    factor: zoom_delta,
                });
            } else if hovered && scroll.abs() > f32::EPSILON {
                let anchor = hover_pos.unwrap_or_else(|| rect.center());
                self.session.apply(SessionEvent::Wheel {
                    pos: canvas_local(rect, anchor),
                    delta_y: -scroll,
                });
            }
        }

        if released {
            self.session.apply(SessionEvent::PointerUp);
        }

        if gone || (self.pointer_inside && !inside && hover_pos.is_some()) {
            self.session.apply(SessionEvent::PointerLeave);
        }
        self.pointer_inside = inside;
    }

    fn handle_pinch(&mut self, rect: Rect) {
        match self.touches.pair() {
            Some((a, b)) => {
                let (a, b) = (canvas_local(rect, a), canvas_local(rect, b));
                if self.touches.pinching {
                    self.session.apply(SessionEvent::PinchMove(a, b));
                } else {
                    self.touches.pinching = true;
                    self.session.apply(SessionEvent::PinchStart(a, b));
                }
            }
            None if self.touches.pinching => {
                self.touches.pinching = false;
                self.session.apply(SessionEvent::PinchEnd);
            }
            None => {}
        }
    }
}
