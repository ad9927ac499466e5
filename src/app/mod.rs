use std::sync::Arc;

use eframe::egui::{self, Color32, Context, Rect, TextureHandle, TextureOptions};

use crate::catalog::Catalog;
use crate::map::{Session, Timings};

mod canvas;
mod render_utils;
mod ui;

use canvas::TouchTracker;

const SEED_TEXTURE_SIZE: usize = 128;

pub struct BeliefMapApp {
    catalog: Arc<Catalog>,
    timings: Timings,
    state: AppState,
}

enum AppState {
    Selecting(SelectionDraft),
    Map(Box<MapView>),
}

#[derive(Default)]
struct SelectionDraft {
    input: String,
    labels: Vec<String>,
}

struct MapView {
    session: Session,
    seed_texture: Option<TextureHandle>,
    touches: TouchTracker,
    pointer_inside: bool,
    canvas_rect: Rect,
    belief_draft: BeliefDraft,
}

#[derive(Default)]
struct BeliefDraft {
    starter: usize,
    ending: String,
}

impl BeliefMapApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        labels: Vec<String>,
        catalog: Catalog,
        timings: Timings,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let state = if labels.is_empty() {
            AppState::Selecting(SelectionDraft::default())
        } else {
            AppState::Map(Box::new(MapView::new(&cc.egui_ctx, labels, &catalog, timings)))
        };

        Self {
            catalog,
            timings,
            state,
        }
    }
}

impl MapView {
    fn new(ctx: &Context, labels: Vec<String>, catalog: &Arc<Catalog>, timings: Timings) -> Self {
        log::info!("opening map with {} experience(s)", labels.len());
        let now_ms = ctx.input(|input| input.time) * 1000.0;
        Self {
            session: Session::new(labels, Arc::clone(catalog), timings, now_ms),
            seed_texture: None,
            touches: TouchTracker::default(),
            pointer_inside: false,
            canvas_rect: Rect::NOTHING,
            belief_draft: BeliefDraft::default(),
        }
    }

    fn ensure_seed_texture(&mut self, ctx: &Context) {
        if self.seed_texture.is_none() {
            self.seed_texture = Some(ctx.load_texture(
                "seed-node",
                render_utils::seed_image(SEED_TEXTURE_SIZE),
                TextureOptions::LINEAR,
            ));
        }
    }

    fn show(&mut self, ctx: &Context, back_requested: &mut bool) {
        self.ensure_seed_texture(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(Color32::BLACK))
            .show(ctx, |ui| self.draw_canvas(ui));

        self.draw_overlays(ctx, back_requested);
    }
}

impl eframe::App for BeliefMapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Selecting(draft) => {
                if let Some(labels) = ui::selection::show_selection(ctx, draft) {
                    transition = Some(AppState::Map(Box::new(MapView::new(
                        ctx,
                        labels,
                        &self.catalog,
                        self.timings,
                    ))));
                }
            }
            AppState::Map(view) => {
                let mut back_requested = false;
                view.show(ctx, &mut back_requested);
                if back_requested {
                    log::info!("returning to experience selection");
                    transition = Some(AppState::Selecting(SelectionDraft {
                        input: String::new(),
                        labels: view.session.labels().to_vec(),
                    }));
                }
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
