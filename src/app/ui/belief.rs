use eframe::egui::{self, Align2, Color32, Context, Id, Order, RichText, vec2};

use crate::map::stage::BELIEF_STARTERS;
use crate::map::{Belief, SessionEvent};

use super::super::MapView;
use super::super::render_utils::TEXT_ACCENT;
use super::overlays::panel_frame;

impl MapView {
    pub(super) fn draw_belief_builder(&mut self, ctx: &Context) {
        if !self.session.belief_builder_visible() {
            return;
        }
        let Some(emotion) = self.session.selected_emotion().map(|emotion| emotion.name.clone()) else {
            return;
        };

        let mut completed = None;
        let draft = &mut self.belief_draft;
        egui::Area::new(Id::new("belief-builder"))
            .order(Order::Foreground)
            .anchor(Align2::CENTER_BOTTOM, vec2(0.0, -180.0))
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    ui.set_width(420.0);
                    ui.label(RichText::new(format!("You felt {}.", emotion.to_lowercase())).color(TEXT_ACCENT));
                    ui.add_space(4.0);
                    ui.label(RichText::new("How does the belief start?").strong().color(Color32::WHITE));
                    ui.horizontal_wrapped(|ui| {
                        for (index, starter) in BELIEF_STARTERS.iter().enumerate() {
                            ui.selectable_value(&mut draft.starter, index, *starter);
                        }
                    });
                    ui.add_space(6.0);

                    let starter = BELIEF_STARTERS
                        .get(draft.starter)
                        .copied()
                        .unwrap_or(BELIEF_STARTERS[0]);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(starter).color(Color32::WHITE));
                        ui.add(
                            egui::TextEdit::singleline(&mut draft.ending)
                                .hint_text("finish the sentence")
                                .desired_width(260.0),
                        );
                    });

                    ui.add_space(8.0);
                    let belief = Belief::new(starter, &draft.ending);
                    let button = ui.add_enabled(belief.is_some(), egui::Button::new("Complete belief"));
                    if button.clicked() {
                        completed = belief;
                    }
                });
            });

        if let Some(belief) = completed {
            self.session.apply(SessionEvent::BeliefComplete(belief));
        }
    }
}
