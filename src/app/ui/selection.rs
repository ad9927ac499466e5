use eframe::egui::{self, Align, Context, Key, Layout, RichText};

use super::super::SelectionDraft;

/// Experience entry screen. Returns the labels once the user opens the map.
pub(in crate::app) fn show_selection(ctx: &Context, draft: &mut SelectionDraft) -> Option<Vec<String>> {
    let mut open = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading("Which experiences shaped you?");
            ui.add_space(6.0);
            ui.label(
                RichText::new("Add one or more experiences. Prefix with \"Other - \" to name a category.")
                    .weak(),
            );
            ui.add_space(16.0);

            ui.horizontal(|ui| {
                let field = ui.add(
                    egui::TextEdit::singleline(&mut draft.input)
                        .hint_text("e.g. Exam")
                        .desired_width(280.0),
                );
                let submitted = field.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));
                if ui.button("Add").clicked() || submitted {
                    push_label(draft);
                    field.request_focus();
                }
            });

            ui.add_space(12.0);
            let mut remove = None;
            for (index, label) in draft.labels.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(label);
                    if ui.small_button("x").on_hover_text("Remove").clicked() {
                        remove = Some(index);
                    }
                });
            }
            if let Some(index) = remove {
                draft.labels.remove(index);
            }

            ui.add_space(20.0);
            ui.with_layout(Layout::top_down(Align::Center), |ui| {
                let button = ui.add_enabled(
                    !draft.labels.is_empty(),
                    egui::Button::new(RichText::new("Show on my map").size(16.0)),
                );
                if button.clicked() {
                    open = Some(draft.labels.clone());
                }
            });
        });
    });

    open
}

fn push_label(draft: &mut SelectionDraft) {
    let label = draft.input.trim();
    if label.is_empty() || draft.labels.iter().any(|existing| existing == label) {
        return;
    }
    draft.labels.push(label.to_owned());
    draft.input.clear();
}
