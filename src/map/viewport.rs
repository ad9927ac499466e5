use eframe::egui::{Pos2, Vec2};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;
const WHEEL_ZOOM_RATE: f32 = -0.001;

/// Pan and zoom of the canvas. Screen points are canvas-local pixels;
/// `screen = world * zoom + pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() {
        return MIN_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

impl Viewport {
    pub fn screen_to_world(&self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.pan) / self.zoom
    }

    pub fn world_to_screen(&self, world: Vec2) -> Pos2 {
        (world * self.zoom + self.pan).to_pos2()
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Scales by `factor`, keeping the world point under `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        let world = self.screen_to_world(anchor);
        self.zoom = clamp_zoom(self.zoom * factor);
        self.pan = anchor.to_vec2() - world * self.zoom;
    }

    /// `delta_y` follows browser wheel convention: positive scrolls down and zooms out.
    pub fn wheel_zoom(&mut self, anchor: Pos2, delta_y: f32) {
        self.zoom_at(anchor, 1.0 + delta_y * WHEEL_ZOOM_RATE);
    }

    /// World point drawn at the canvas centre.
    pub fn center_world(&self, canvas_size: Vec2) -> Vec2 {
        self.screen_to_world((canvas_size * 0.5).to_pos2())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Two-finger zoom. The world anchor is fixed at gesture start; each move
/// scales by the distance ratio to the previous move.
#[derive(Clone, Copy, Debug)]
pub struct PinchGesture {
    last_distance: f32,
    anchor_world: Vec2,
}

impl PinchGesture {
    pub fn begin(viewport: &Viewport, a: Pos2, b: Pos2) -> Self {
        let centroid = Pos2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
        Self {
            last_distance: a.distance(b),
            anchor_world: viewport.screen_to_world(centroid),
        }
    }

    pub fn update(&mut self, viewport: &mut Viewport, a: Pos2, b: Pos2) {
        let distance = a.distance(b);
        if self.last_distance <= f32::EPSILON {
            self.last_distance = distance;
            return;
        }

        let centroid = Pos2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
        viewport.zoom = clamp_zoom(viewport.zoom * (distance / self.last_distance));
        viewport.pan = centroid.to_vec2() - self.anchor_world * viewport.zoom;
        self.last_distance = distance;
    }
}

pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Scripted ease-out move of the viewport onto a world point.
#[derive(Clone, Copy, Debug)]
pub struct CameraMove {
    from: Viewport,
    to: Viewport,
    started_ms: f64,
    duration_ms: f64,
}

impl CameraMove {
    pub fn centering(
        from: Viewport,
        target_world: Vec2,
        target_zoom: f32,
        canvas_size: Vec2,
        started_ms: f64,
        duration_ms: f64,
    ) -> Self {
        let zoom = clamp_zoom(target_zoom);
        Self {
            from,
            to: Viewport {
                pan: canvas_size * 0.5 - target_world * zoom,
                zoom,
            },
            started_ms,
            duration_ms,
        }
    }

    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.started_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// Writes the interpolated viewport; returns true once finished.
    pub fn step(&self, viewport: &mut Viewport, now_ms: f64) -> bool {
        let progress = self.progress(now_ms);
        let eased = ease_out_cubic(progress);
        viewport.zoom = self.from.zoom + (self.to.zoom - self.from.zoom) * eased;
        viewport.pan = self.from.pan + (self.to.pan - self.from.pan) * eased;
        progress >= 1.0
    }
}
