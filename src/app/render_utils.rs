use std::f32::consts::{FRAC_PI_2, PI};

use eframe::egui::{Color32, ColorImage, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};

pub(super) const TEXT_ACCENT: Color32 = Color32::from_rgb(225, 193, 92);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Faint grid drawn behind the map while the session is still loading.
pub(super) fn draw_loading_backdrop(painter: &Painter, rect: Rect, time_secs: f64) {
    let step = 64.0;
    let drift = vec2(
        (time_secs * 0.5).sin() as f32 * 6.0,
        (time_secs * 0.4).cos() as f32 * 6.0,
    );
    let origin = rect.min + drift;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 50));

    let mut x = rect.left() + origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2) -> bool {
    let bounds = Rect::from_two_pos(start, end).expand(1.0);
    bounds.intersects(rect)
}

/// Points of the left or right half disc, for a convex polygon.
pub(super) fn half_disc(center: Pos2, radius: f32, left: bool, segments: usize) -> Vec<Pos2> {
    let start = if left { FRAC_PI_2 } else { -FRAC_PI_2 };
    let segments = segments.max(2);
    (0..=segments)
        .map(|step| {
            let angle = start + PI * (step as f32 / segments as f32);
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Soft seed bitmap: a dark core with a warm rim.
pub(super) fn seed_image(size: usize) -> ColorImage {
    let size = size.max(8);
    let mut image = ColorImage::filled([size, size], Color32::TRANSPARENT);
    let center = (size as f32 - 1.0) * 0.5;
    let radius = size as f32 * 0.5;

    for y in 0..size {
        for x in 0..size {
            let distance = vec2(x as f32 - center, y as f32 - center).length() / radius;
            if distance > 1.0 {
                continue;
            }

            let rim = ((distance - 0.72) / 0.28).clamp(0.0, 1.0);
            let core = Color32::from_rgb(45, 45, 45);
            let glow = Color32::from_rgb(196, 174, 118);
            let color = blend_color(core, glow, rim * rim);
            let edge_alpha = ((1.0 - distance) * radius).clamp(0.0, 1.0);
            image.pixels[y * size + x] = with_alpha(color, edge_alpha);
        }
    }

    image
}

pub(super) fn full_uv() -> Rect {
    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0))
}

pub(super) fn square_at(center: Pos2, side: f32) -> Rect {
    Rect::from_center_size(center, Vec2::splat(side))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_disc_stays_on_its_side() {
        let center = pos2(100.0, 100.0);
        let left = half_disc(center, 20.0, true, 16);
        let right = half_disc(center, 20.0, false, 16);
        assert!(left.iter().all(|p| p.x <= center.x + 1e-3));
        assert!(right.iter().all(|p| p.x >= center.x - 1e-3));
        assert_eq!(left.len(), 17);
    }

    #[test]
    fn seed_image_is_round() {
        let image = seed_image(32);
        assert_eq!(image.size, [32, 32]);
        assert_eq!(image.pixels[0], Color32::TRANSPARENT);
        assert!(image.pixels[16 * 32 + 16].a() > 0);
    }

    #[test]
    fn culling_helpers() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        assert!(circle_visible(rect, pos2(-10.0, 50.0), 20.0));
        assert!(!circle_visible(rect, pos2(-30.0, 50.0), 20.0));
        assert!(segment_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0)));
        assert!(!segment_visible(rect, pos2(-50.0, -50.0), pos2(-10.0, -20.0)));
    }

    #[test]
    fn alpha_helper() {
        assert_eq!(with_alpha(Color32::WHITE, 0.0).a(), 0);
        assert_eq!(with_alpha(Color32::WHITE, 1.0).a(), 255);
    }
}
