use std::sync::Arc;

use eframe::egui::{Pos2, Vec2};

use crate::catalog::{Catalog, Emotion};

use super::hit::hit_test;
use super::node::{Node, spawn_nodes};
use super::physics::{PhysicsConfig, freeze, step_physics};
use super::stage::{Belief, Side, SplitSelection, Stage};
use super::timers::{TimerAction, TimerToken, Timers};
use super::viewport::{CameraMove, PinchGesture, Viewport};

pub const FOCUS_ZOOM: f32 = 4.0;

/// Scripted delays of the guided flow, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timings {
    pub loading: f64,
    pub intro_toast: f64,
    pub follow_up_toast: f64,
    pub camera_move: f64,
    pub split_reveal: f64,
    pub tap_other_hint: f64,
    pub emotion_selection: f64,
    pub belief_builder: f64,
    pub merge: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            loading: 2_500.0,
            intro_toast: 3_300.0,
            follow_up_toast: 6_000.0,
            camera_move: 400.0,
            split_reveal: 4_700.0,
            tap_other_hint: 3_000.0,
            emotion_selection: 7_000.0,
            belief_builder: 6_000.0,
            merge: 3_000.0,
        }
    }
}

impl Timings {
    /// Scales the stage delays; the camera move keeps its duration.
    pub fn scaled(self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        Self {
            loading: self.loading * factor,
            intro_toast: self.intro_toast * factor,
            follow_up_toast: self.follow_up_toast * factor,
            camera_move: self.camera_move,
            split_reveal: self.split_reveal * factor,
            tap_other_hint: self.tap_other_hint * factor,
            emotion_selection: self.emotion_selection * factor,
            belief_builder: self.belief_builder * factor,
            merge: self.merge * factor,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Resize(Vec2),
    PointerDown(Pos2),
    PointerMove(Pos2),
    PointerUp,
    PointerLeave,
    /// Browser wheel convention: positive `delta_y` zooms out.
    Wheel { pos: Pos2, delta_y: f32 },
    ZoomFactor { pos: Pos2, factor: f32 },
    PinchStart(Pos2, Pos2),
    PinchMove(Pos2, Pos2),
    PinchEnd,
    DismissTutorial,
    CloseInfo,
    HalfTap(Side),
    SelectEmotion(Emotion),
    ContinueAfterEmotion,
    BeliefComplete(Belief),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub pos: Pos2,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InfoPanel {
    pub node: usize,
    pub side: Side,
    pub belief_side: bool,
    pub closable: bool,
}

/// All state of one map visit. Inputs arrive through [`Session::apply`],
/// time through [`Session::tick`].
pub struct Session {
    catalog: Arc<Catalog>,
    timings: Timings,
    physics: PhysicsConfig,
    labels: Vec<String>,
    nodes: Vec<Node>,
    viewport: Viewport,
    canvas_size: Vec2,
    now_ms: f64,
    stage: Stage,
    timers: Timers,
    camera: Option<CameraMove>,
    pinch: Option<PinchGesture>,
    pan_anchor: Option<Pos2>,
    selected: Option<usize>,
    hovered: Option<usize>,
    tooltip: Option<Tooltip>,
    info_side: Side,
    focused: Option<usize>,
    split_visible: bool,
    split: SplitSelection,
    tap_other_hint: bool,
    hint_timer: Option<TimerToken>,
    emotions: Vec<Emotion>,
    selected_emotion: Option<Emotion>,
    belief_builder_visible: bool,
    completed_belief: Option<Belief>,
    merged: bool,
}

impl Session {
    pub fn new(labels: Vec<String>, catalog: Arc<Catalog>, timings: Timings, now_ms: f64) -> Self {
        let mut timers = Timers::default();
        timers.schedule(
            now_ms,
            timings.loading,
            TimerAction::Advance(Stage::IntroToast),
            Stage::Loading,
        );

        Self {
            catalog,
            timings,
            physics: PhysicsConfig::default(),
            labels,
            nodes: Vec::new(),
            viewport: Viewport::default(),
            canvas_size: Vec2::ZERO,
            now_ms,
            stage: Stage::Loading,
            timers,
            camera: None,
            pinch: None,
            pan_anchor: None,
            selected: None,
            hovered: None,
            tooltip: None,
            info_side: Side::Left,
            focused: None,
            split_visible: false,
            split: SplitSelection::default(),
            tap_other_hint: false,
            hint_timer: None,
            emotions: Vec::new(),
            selected_emotion: None,
            belief_builder_visible: false,
            completed_belief: None,
            merged: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Marks every node as drawn with the seed bitmap.
    pub fn attach_images(&mut self) {
        for node in &mut self.nodes {
            node.has_image = true;
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_node(&self) -> Option<&Node> {
        self.focused.and_then(|index| self.nodes.get(index))
    }

    pub fn split(&self) -> SplitSelection {
        self.split
    }

    pub fn split_visible(&self) -> bool {
        self.split_visible
    }

    pub fn emotions(&self) -> &[Emotion] {
        &self.emotions
    }

    pub fn selected_emotion(&self) -> Option<&Emotion> {
        self.selected_emotion.as_ref()
    }

    pub fn belief_builder_visible(&self) -> bool {
        self.belief_builder_visible
    }

    pub fn completed_belief(&self) -> Option<&Belief> {
        self.completed_belief.as_ref()
    }

    pub fn merged(&self) -> bool {
        self.merged
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    pub fn dragging(&self) -> Option<usize> {
        self.nodes.iter().position(|node| node.is_dragging)
    }

    /// The layout is frozen and dimmed behind an overlay.
    pub fn is_dimmed(&self) -> bool {
        self.stage.is_modal() || self.merged
    }

    /// Canvas pointer, wheel and touch input is ignored.
    pub fn input_locked(&self) -> bool {
        self.is_dimmed() || self.split_visible
    }

    /// Hover label, hidden while an info panel is open.
    pub fn tooltip(&self) -> Option<&Tooltip> {
        if self.selected.is_some() {
            return None;
        }
        self.tooltip.as_ref()
    }

    pub fn info_panels(&self) -> Vec<InfoPanel> {
        let Some(node) = self.selected.filter(|&index| index < self.nodes.len()) else {
            return Vec::new();
        };

        match (self.split.first, self.split.second) {
            (Some(first), Some(second)) => vec![
                InfoPanel {
                    node,
                    side: first,
                    belief_side: false,
                    closable: false,
                },
                InfoPanel {
                    node,
                    side: second,
                    belief_side: true,
                    closable: true,
                },
            ],
            _ => vec![InfoPanel {
                node,
                side: self.info_side,
                belief_side: false,
                closable: true,
            }],
        }
    }

    pub fn tutorial_visible(&self) -> bool {
        self.stage == Stage::Tutorial
    }

    pub fn continue_visible(&self) -> bool {
        self.stage == Stage::EmotionSelection && self.selected_emotion.is_some()
    }

    /// Bottom toast for the current moment of the flow.
    pub fn toast(&self) -> Option<String> {
        let plural = self.labels.len() > 1;
        let text = match self.stage {
            _ if self.merged => "This experience is now whole.",
            _ if self.completed_belief.is_some() => {
                return self.completed_belief.as_ref().map(|b| b.full_sentence.clone());
            }
            Stage::IntroToast if plural => "First experiences created.",
            Stage::IntroToast => "First experience created.",
            Stage::FollowUpToast if plural => {
                "New experiences are on your map. You don't know yet what beliefs they created."
            }
            Stage::FollowUpToast => {
                "A new experience is on your map. You don't know yet what belief it created."
            }
            Stage::SelectionPrompt => "Tap a node to continue",
            Stage::NodeFocus if !self.split_visible => "Let's see what this experience means to you.",
            Stage::NodeFocus if self.split_visible && self.split.first.is_none() => {
                "Each side holds a piece of your story. Pick one."
            }
            Stage::NodeFocus if self.tap_other_hint => {
                "When you're ready, tap to uncover the other side."
            }
            Stage::EmotionSelection if self.selected_emotion.is_none() => {
                "Looking back on this moment, how did it make you feel?"
            }
            Stage::BeliefIntro => {
                "Got it. The feeling you chose shapes a belief. Begin by choosing how it starts."
            }
            _ => return None,
        };
        Some(text.to_owned())
    }

    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Resize(size) => self.resize(size),
            SessionEvent::DismissTutorial => self.dismiss_tutorial(),
            SessionEvent::CloseInfo => self.selected = None,
            SessionEvent::HalfTap(side) => self.half_tap(side),
            SessionEvent::SelectEmotion(emotion) => {
                if self.stage == Stage::EmotionSelection {
                    log::debug!("emotion selected: {}", emotion.name);
                    self.selected_emotion = Some(emotion);
                }
            }
            SessionEvent::ContinueAfterEmotion => {
                if self.continue_visible() {
                    self.set_stage(Stage::BeliefIntro);
                }
            }
            SessionEvent::BeliefComplete(belief) => self.complete_belief(belief),
            input if self.input_locked() => {
                log::trace!("ignored while locked: {input:?}");
            }
            SessionEvent::PointerDown(pos) => self.pointer_down(pos),
            SessionEvent::PointerMove(pos) => self.pointer_move(pos),
            SessionEvent::PointerUp => self.release(),
            SessionEvent::PointerLeave => {
                self.release();
                self.hovered = None;
                self.tooltip = None;
            }
            SessionEvent::Wheel { pos, delta_y } => {
                self.dismiss_tutorial();
                self.viewport.wheel_zoom(pos, delta_y);
            }
            SessionEvent::ZoomFactor { pos, factor } => {
                self.dismiss_tutorial();
                self.viewport.zoom_at(pos, factor);
            }
            SessionEvent::PinchStart(a, b) => {
                self.dismiss_tutorial();
                self.pinch = Some(PinchGesture::begin(&self.viewport, a, b));
                self.selected = None;
                self.tooltip = None;
                self.release();
            }
            SessionEvent::PinchMove(a, b) => {
                if let Some(pinch) = self.pinch.as_mut() {
                    pinch.update(&mut self.viewport, a, b);
                }
            }
            SessionEvent::PinchEnd => {
                self.pinch = None;
                self.tooltip = None;
                self.release();
            }
        }
    }

    /// Advances the clock: camera move, due timers, then one physics step.
    pub fn tick(&mut self, now_ms: f64) {
        self.now_ms = now_ms.max(self.now_ms);

        if let Some(camera) = self.camera
            && camera.step(&mut self.viewport, self.now_ms)
        {
            self.camera = None;
            self.timers.schedule(
                self.now_ms,
                self.timings.split_reveal,
                TimerAction::RevealSplit,
                Stage::NodeFocus,
            );
        }

        while let Some(action) = self.timers.pop_due(self.now_ms, self.stage) {
            self.run_timer(action);
        }

        if self.is_dimmed() {
            freeze(&mut self.nodes);
        } else {
            step_physics(&mut self.nodes, &self.viewport, self.canvas_size, self.physics);
        }
    }

    fn set_stage(&mut self, next: Stage) {
        if next == self.stage {
            return;
        }

        log::info!("stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
        self.timers.cancel_outside(next);
        if next != Stage::NodeFocus {
            self.camera = None;
        }

        let entry = match next {
            Stage::IntroToast => Some((self.timings.intro_toast, TimerAction::Advance(Stage::Tutorial))),
            Stage::FollowUpToast => Some((
                self.timings.follow_up_toast,
                TimerAction::Advance(Stage::SelectionPrompt),
            )),
            Stage::BeliefIntro => Some((self.timings.belief_builder, TimerAction::ShowBeliefBuilder)),
            _ => None,
        };
        if let Some((delay, action)) = entry {
            self.timers.schedule(self.now_ms, delay, action, next);
        }
    }

    fn run_timer(&mut self, action: TimerAction) {
        match action {
            TimerAction::Advance(stage) => self.set_stage(stage),
            TimerAction::RevealSplit => self.split_visible = true,
            TimerAction::ShowTapOtherSide => {
                self.hint_timer = None;
                if self.split.second.is_none() {
                    self.tap_other_hint = true;
                }
            }
            TimerAction::EnterEmotionSelection => {
                self.set_stage(Stage::EmotionSelection);
                self.emotions = self
                    .focused_node()
                    .map(|node| self.catalog.emotions_for(&node.label))
                    .unwrap_or_else(|| self.catalog.fallback.clone());
            }
            TimerAction::ShowBeliefBuilder => self.belief_builder_visible = true,
            TimerAction::ShowMergedView => {
                log::info!("merged view shown");
                self.merged = true;
            }
        }
    }

    fn resize(&mut self, size: Vec2) {
        self.canvas_size = size;
        self.viewport.reset();

        if self.nodes.is_empty() && size.x > 0.0 && size.y > 0.0 && !self.labels.is_empty() {
            self.nodes = spawn_nodes(&self.labels, size * 0.5);
            log::info!("created {} experience nodes", self.nodes.len());
        }

        // Keep the focused node under the split overlay.
        if self.stage.is_modal()
            && let Some(target) = self.focused_node().map(|node| node.pos)
        {
            if self.camera.is_some() {
                self.camera = Some(CameraMove::centering(
                    self.viewport,
                    target,
                    FOCUS_ZOOM,
                    size,
                    self.now_ms,
                    self.timings.camera_move,
                ));
            } else {
                self.viewport.zoom = FOCUS_ZOOM;
                self.viewport.pan = size * 0.5 - target * FOCUS_ZOOM;
            }
        }
    }

    fn dismiss_tutorial(&mut self) {
        if self.stage == Stage::Tutorial {
            self.set_stage(Stage::FollowUpToast);
        }
    }

    fn pointer_down(&mut self, pos: Pos2) {
        match hit_test(&self.nodes, &self.viewport, pos) {
            Some(index) => self.node_tap(index),
            None => {
                self.selected = None;
                self.tooltip = None;
                self.pan_anchor = Some(pos);
            }
        }
    }

    fn node_tap(&mut self, index: usize) {
        match self.stage {
            Stage::Tutorial => self.dismiss_tutorial(),
            Stage::SelectionPrompt => self.focus_node(index),
            _ => {
                for (other, node) in self.nodes.iter_mut().enumerate() {
                    node.is_dragging = other == index;
                }
                self.nodes[index].velocity = Vec2::ZERO;
                self.selected = Some(index);
                self.info_side = Side::Left;
                self.tooltip = None;
            }
        }
    }

    fn focus_node(&mut self, index: usize) {
        let Some(target) = self.nodes.get(index).map(|node| node.pos) else {
            return;
        };

        log::info!("focusing node {index}");
        self.release();
        self.hovered = None;
        self.tooltip = None;
        self.selected = None;
        self.set_stage(Stage::NodeFocus);
        self.focused = Some(index);
        self.split = SplitSelection::default();
        self.split_visible = false;
        self.tap_other_hint = false;
        self.hint_timer = None;
        freeze(&mut self.nodes);
        self.camera = Some(CameraMove::centering(
            self.viewport,
            target,
            FOCUS_ZOOM,
            self.canvas_size,
            self.now_ms,
            self.timings.camera_move,
        ));
    }

    fn pointer_move(&mut self, pos: Pos2) {
        if self.pinch.is_some() {
            return;
        }

        let world = self.viewport.screen_to_world(pos);
        if let Some(node) = self.nodes.iter_mut().find(|node| node.is_dragging) {
            node.pos = world;
            node.velocity = Vec2::ZERO;
        } else if let Some(anchor) = self.pan_anchor {
            self.viewport.pan_by(pos - anchor);
            self.pan_anchor = Some(pos);
        } else {
            self.hovered = hit_test(&self.nodes, &self.viewport, pos);
            self.tooltip = match self.hovered {
                Some(index) if self.stage != Stage::SelectionPrompt => Some(Tooltip {
                    pos,
                    text: self.nodes[index].label.clone(),
                }),
                _ => None,
            };
        }
    }

    fn release(&mut self) {
        for node in &mut self.nodes {
            node.is_dragging = false;
        }
        self.pan_anchor = None;
    }

    fn half_tap(&mut self, side: Side) {
        if self.stage != Stage::NodeFocus
            || !self.split_visible
            || self.split.is_complete()
            || self.split.contains(side)
        {
            return;
        }

        if self.split.first.is_none() {
            self.split.first = Some(side);
            self.selected = self.focused;
            self.info_side = side;
            self.hint_timer = Some(self.timers.schedule(
                self.now_ms,
                self.timings.tap_other_hint,
                TimerAction::ShowTapOtherSide,
                Stage::NodeFocus,
            ));
        } else {
            if let Some(token) = self.hint_timer.take() {
                self.timers.cancel(token);
            }
            self.tap_other_hint = false;
            self.split.second = Some(side);
            self.split.belief_side = Some(side);
            self.selected = self.focused;
            self.info_side = side;
            self.timers.schedule(
                self.now_ms,
                self.timings.emotion_selection,
                TimerAction::EnterEmotionSelection,
                Stage::NodeFocus,
            );
        }
    }

    fn complete_belief(&mut self, belief: Belief) {
        if self.stage != Stage::BeliefIntro || self.completed_belief.is_some() {
            return;
        }

        log::info!("completed belief: {}", belief.full_sentence);
        self.completed_belief = Some(belief);
        self.belief_builder_visible = false;
        self.timers.schedule(
            self.now_ms,
            self.timings.merge,
            TimerAction::ShowMergedView,
            Stage::BeliefIntro,
        );
    }
}

#[cfg(test)]
impl Session {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn camera_moving(&self) -> bool {
        self.camera.is_some()
    }

    fn tap_other_hint(&self) -> bool {
        self.tap_other_hint
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    const CANVAS: Vec2 = Vec2::new(800.0, 600.0);

    fn start(labels: &[&str]) -> Session {
        let labels = labels.iter().map(|label| (*label).to_owned()).collect();
        let mut session = Session::new(labels, Arc::new(Catalog::builtin()), Timings::default(), 0.0);
        session.apply(SessionEvent::Resize(CANVAS));
        session
    }

    fn node_screen(session: &Session, index: usize) -> Pos2 {
        session.viewport().world_to_screen(session.nodes()[index].pos)
    }

    /// Ticks in 16 ms frames from the current clock up to `until_ms`.
    fn run_until(session: &mut Session, until_ms: f64) {
        let mut now = session.now_ms();
        while now < until_ms {
            now = (now + 16.0).min(until_ms);
            session.tick(now);
        }
    }

    fn to_selection_prompt(session: &mut Session) {
        run_until(session, 6_000.0);
        assert_eq!(session.stage(), Stage::Tutorial);
        session.apply(SessionEvent::DismissTutorial);
        assert_eq!(session.stage(), Stage::FollowUpToast);
        let now = session.now_ms();
        run_until(session, now + 6_000.0 + 10.0);
        assert_eq!(session.stage(), Stage::SelectionPrompt);
    }

    fn to_split(session: &mut Session) {
        to_selection_prompt(session);
        let pos = node_screen(session, 0);
        session.apply(SessionEvent::PointerDown(pos));
        let now = session.now_ms();
        run_until(session, now + 400.0 + 4_700.0 + 50.0);
        assert!(session.split_visible());
    }

    #[test]
    fn nodes_created_once_canvas_has_size() {
        let labels = vec!["Exam".to_owned(), "Breakup".to_owned(), "Move".to_owned()];
        let mut session = Session::new(labels, Arc::new(Catalog::builtin()), Timings::default(), 0.0);
        session.apply(SessionEvent::Resize(Vec2::ZERO));
        assert!(session.nodes().is_empty());

        session.apply(SessionEvent::Resize(CANVAS));
        let ids = session.nodes().iter().map(|node| node.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(session.nodes().iter().all(|node| node.kind.label() == "Seed"));

        session.apply(SessionEvent::Resize(vec2(1024.0, 768.0)));
        assert_eq!(session.nodes().len(), 3);
    }

    #[test]
    fn scripted_toasts_advance() {
        let mut session = start(&["Exam"]);
        assert_eq!(session.stage(), Stage::Loading);
        run_until(&mut session, 2_510.0);
        assert_eq!(session.stage(), Stage::IntroToast);
        assert_eq!(session.toast().as_deref(), Some("First experience created."));
        run_until(&mut session, 6_000.0);
        assert_eq!(session.stage(), Stage::Tutorial);
        assert!(session.tutorial_visible());

        // The tutorial waits for the user.
        run_until(&mut session, 60_000.0);
        assert_eq!(session.stage(), Stage::Tutorial);
    }

    #[test]
    fn wheel_and_node_tap_dismiss_tutorial() {
        let mut session = start(&["Exam", "Move"]);
        run_until(&mut session, 6_000.0);
        session.apply(SessionEvent::Wheel {
            pos: pos2(10.0, 10.0),
            delta_y: -100.0,
        });
        assert_eq!(session.stage(), Stage::FollowUpToast);
        assert!(session.toast().is_some_and(|text| text.starts_with("New experiences")));

        let mut session = start(&["Exam"]);
        run_until(&mut session, 6_000.0);
        let pos = node_screen(&session, 0);
        session.apply(SessionEvent::PointerDown(pos));
        assert_eq!(session.stage(), Stage::FollowUpToast);
        assert_eq!(session.dragging(), None);
    }

    #[test]
    fn drag_marks_exactly_one_node_and_release_clears() {
        let mut session = start(&["Exam", "Breakup", "Move"]);
        let pos = node_screen(&session, 2);
        session.apply(SessionEvent::PointerDown(pos));
        let dragged = session.dragging().expect("a node is dragged");
        assert_eq!(session.nodes().iter().filter(|node| node.is_dragging).count(), 1);
        assert_eq!(session.selected(), Some(dragged));

        session.apply(SessionEvent::PointerMove(pos2(700.0, 500.0)));
        let node = &session.nodes()[dragged];
        assert_eq!(node.pos, vec2(700.0, 500.0));
        assert_eq!(node.velocity, Vec2::ZERO);

        session.apply(SessionEvent::PointerUp);
        assert!(session.nodes().iter().all(|node| !node.is_dragging));
    }

    #[test]
    fn empty_space_drag_pans() {
        let mut session = start(&["Exam"]);
        session.apply(SessionEvent::PointerDown(pos2(5.0, 5.0)));
        assert!(session.is_panning());
        session.apply(SessionEvent::PointerMove(pos2(25.0, 15.0)));
        session.apply(SessionEvent::PointerMove(pos2(30.0, 35.0)));
        assert_eq!(session.viewport().pan, vec2(25.0, 30.0));
        session.apply(SessionEvent::PointerUp);
        assert!(!session.is_panning());
    }

    #[test]
    fn hover_tooltip_suppressed_during_prompt() {
        let mut session = start(&["Exam"]);
        let pos = node_screen(&session, 0);
        session.apply(SessionEvent::PointerMove(pos));
        assert_eq!(session.hovered(), Some(0));
        assert_eq!(session.tooltip().map(|tip| tip.text.as_str()), Some("Exam"));

        to_selection_prompt(&mut session);
        let pos = node_screen(&session, 0);
        session.apply(SessionEvent::PointerMove(pos));
        assert_eq!(session.hovered(), Some(0));
        assert!(session.tooltip().is_none());
    }

    #[test]
    fn selecting_node_zooms_onto_it() {
        let mut session = start(&["Exam", "Breakup", "Move"]);
        to_selection_prompt(&mut session);

        let target = session.nodes()[1].pos;
        let pos = node_screen(&session, 1);
        let index = crate::map::hit::hit_test(session.nodes(), &session.viewport(), pos);
        session.apply(SessionEvent::PointerDown(pos));
        assert_eq!(session.stage(), Stage::NodeFocus);
        assert_eq!(session.focused(), index);
        assert!(session.camera_moving());

        let now = session.now_ms();
        run_until(&mut session, now + 400.0);
        assert!(!session.camera_moving());
        assert!((session.viewport().zoom - 4.0).abs() < 1e-4);
        let focused = session.focused_node().expect("focused").pos;
        let centre = session.viewport().world_to_screen(focused);
        assert!((centre.x - 400.0).abs() < 0.5 && (centre.y - 300.0).abs() < 0.5);
        if index == Some(1) {
            assert_eq!(focused, target);
        }
    }

    #[test]
    fn modal_stages_freeze_layout_and_input() {
        let mut session = start(&["Exam", "Breakup", "Move"]);
        to_selection_prompt(&mut session);
        let pos = node_screen(&session, 0);
        session.apply(SessionEvent::PointerDown(pos));

        let before = session.nodes().iter().map(|node| node.pos).collect::<Vec<_>>();
        let now = session.now_ms();
        run_until(&mut session, now + 1_000.0);
        let after = session.nodes().iter().map(|node| node.pos).collect::<Vec<_>>();
        assert_eq!(before, after);

        let viewport = session.viewport();
        session.apply(SessionEvent::Wheel {
            pos: pos2(0.0, 0.0),
            delta_y: 500.0,
        });
        session.apply(SessionEvent::PointerDown(pos2(1.0, 1.0)));
        assert_eq!(session.viewport(), viewport);
        assert!(!session.is_panning());
    }

    #[test]
    fn split_prompt_shown_until_first_half_tap() {
        let mut session = start(&["Exam"]);
        to_selection_prompt(&mut session);
        let pos = node_screen(&session, 0);
        session.apply(SessionEvent::PointerDown(pos));
        assert_eq!(
            session.toast().as_deref(),
            Some("Let's see what this experience means to you.")
        );

        let now = session.now_ms();
        run_until(&mut session, now + 400.0 + 4_700.0 + 50.0);
        assert!(session.split_visible());
        assert_eq!(
            session.toast().as_deref(),
            Some("Each side holds a piece of your story. Pick one.")
        );

        session.apply(SessionEvent::HalfTap(Side::Right));
        assert_eq!(session.split().first, Some(Side::Right));
        assert!(session.toast().is_none());
    }

    #[test]
    fn pinch_start_dismisses_tutorial() {
        let mut session = start(&["Exam"]);
        run_until(&mut session, 6_000.0);
        assert_eq!(session.stage(), Stage::Tutorial);

        session.apply(SessionEvent::PinchStart(pos2(300.0, 300.0), pos2(500.0, 300.0)));
        assert_eq!(session.stage(), Stage::FollowUpToast);

        session.apply(SessionEvent::PinchMove(pos2(200.0, 300.0), pos2(600.0, 300.0)));
        assert!((session.viewport().zoom - 2.0).abs() < 1e-4);
        session.apply(SessionEvent::PinchEnd);
    }

    #[test]
    fn pinch_ignored_in_modal_stages() {
        let mut session = start(&["Exam", "Move"]);
        to_split(&mut session);
        assert!(session.stage().is_modal());

        let viewport = session.viewport();
        session.apply(SessionEvent::PinchStart(pos2(300.0, 300.0), pos2(500.0, 300.0)));
        session.apply(SessionEvent::PinchMove(pos2(100.0, 300.0), pos2(700.0, 300.0)));
        session.apply(SessionEvent::PinchEnd);
        assert_eq!(session.viewport(), viewport);
        assert_eq!(session.stage(), Stage::NodeFocus);
    }

    #[test]
    fn half_taps_lead_to_emotion_selection() {
        let mut session = start(&["Exam"]);
        to_split(&mut session);

        session.apply(SessionEvent::HalfTap(Side::Left));
        session.apply(SessionEvent::HalfTap(Side::Left));
        assert_eq!(
            session.split(),
            SplitSelection {
                first: Some(Side::Left),
                second: None,
                belief_side: None,
            }
        );
        assert_eq!(session.info_panels().len(), 1);

        let now = session.now_ms();
        run_until(&mut session, now + 3_010.0);
        assert!(session.tap_other_hint());

        session.apply(SessionEvent::HalfTap(Side::Right));
        assert_eq!(
            session.split(),
            SplitSelection {
                first: Some(Side::Left),
                second: Some(Side::Right),
                belief_side: Some(Side::Right),
            }
        );
        assert!(!session.tap_other_hint());
        let panels = session.info_panels();
        assert_eq!(panels.len(), 2);
        assert!(panels[1].belief_side && panels[1].side == Side::Right);

        let now = session.now_ms();
        run_until(&mut session, now + 6_900.0);
        assert_eq!(session.stage(), Stage::NodeFocus);
        run_until(&mut session, now + 7_050.0);
        assert_eq!(session.stage(), Stage::EmotionSelection);
        let school = Catalog::builtin().emotions_for("Exam");
        assert_eq!(session.emotions(), school.as_slice());
    }

    #[test]
    fn emotion_then_belief_then_merge() {
        let mut session = start(&["Exam"]);
        to_split(&mut session);
        session.apply(SessionEvent::HalfTap(Side::Right));
        session.apply(SessionEvent::HalfTap(Side::Left));
        let now = session.now_ms();
        run_until(&mut session, now + 7_050.0);

        session.apply(SessionEvent::ContinueAfterEmotion);
        assert_eq!(session.stage(), Stage::EmotionSelection);

        let emotion = session.emotions()[0].clone();
        session.apply(SessionEvent::SelectEmotion(emotion));
        assert!(session.continue_visible());
        session.apply(SessionEvent::ContinueAfterEmotion);
        assert_eq!(session.stage(), Stage::BeliefIntro);

        let now = session.now_ms();
        run_until(&mut session, now + 6_050.0);
        assert!(session.belief_builder_visible());

        let belief = Belief::new("I am", "not enough").expect("belief");
        session.apply(SessionEvent::BeliefComplete(belief.clone()));
        assert_eq!(session.completed_belief(), Some(&belief));
        assert!(!session.belief_builder_visible());
        assert_eq!(session.toast().as_deref(), Some("I am not enough."));

        let now = session.now_ms();
        run_until(&mut session, now + 2_900.0);
        assert!(!session.merged());
        run_until(&mut session, now + 3_050.0);
        assert!(session.merged());
        assert!(session.is_dimmed());
        assert_eq!(session.toast().as_deref(), Some("This experience is now whole."));
    }

    #[test]
    fn stale_timer_does_not_rewind_stage() {
        let mut session = start(&["Exam"]);
        run_until(&mut session, 6_000.0);
        session.apply(SessionEvent::DismissTutorial);
        // A follow-up timer is pending; a second dismiss must not reschedule or rewind.
        session.apply(SessionEvent::DismissTutorial);
        let now = session.now_ms();
        run_until(&mut session, now + 6_010.0);
        assert_eq!(session.stage(), Stage::SelectionPrompt);
        run_until(&mut session, now + 20_000.0);
        assert_eq!(session.stage(), Stage::SelectionPrompt);
    }

    #[test]
    fn resize_resets_viewport() {
        let mut session = start(&["Exam"]);
        session.apply(SessionEvent::Wheel {
            pos: pos2(100.0, 100.0),
            delta_y: -300.0,
        });
        assert!(session.viewport().zoom > 1.0);
        session.apply(SessionEvent::Resize(vec2(640.0, 480.0)));
        assert_eq!(session.viewport(), Viewport::default());
        assert_eq!(session.canvas_size(), vec2(640.0, 480.0));
    }
}
