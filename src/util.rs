use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic pair in `[-1, 1]` derived from `key`.
pub fn stable_pair<K: Hash + ?Sized>(key: &K) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

pub fn zoom_percent(zoom: f32) -> String {
    format!("Zoom: {}%", (zoom * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let a = stable_pair("Exam");
        let b = stable_pair("Exam");
        assert_eq!(a, b);
        assert!((-1.0..=1.0).contains(&a.0));
        assert!((-1.0..=1.0).contains(&a.1));
        assert_ne!(stable_pair("Exam"), stable_pair("Move"));
    }

    #[test]
    fn zoom_percent_rounds() {
        assert_eq!(zoom_percent(1.0), "Zoom: 100%");
        assert_eq!(zoom_percent(0.1234), "Zoom: 12%");
        assert_eq!(zoom_percent(4.0), "Zoom: 400%");
    }
}
